//! All error conditions the scheme analyzer can detect.
//!
//! Every stage of the pipeline raises a distinct, named variant at the first
//! violation and aborts; errors propagate unwrapped so the failing stage is
//! always identifiable from the variant alone.

use thiserror::Error;

/// Errors raised while decomposing an algebraic expression into terms.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum DecomposeError {
    #[error("expression contains a term shape the decomposition does not support")]
    UnsupportedTerm,
    #[error("expression contains an unsupported exponent")]
    UnsupportedExponent,
    #[error("expression divides by a vanishing sub-expression")]
    DivisionByZero,
}

/// Errors raised by the scheme analyzer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum AnalysisError {
    // -- variant detection ------------------------------------------------
    #[error("the scheme cannot be unambiguously categorized as KP- or CP-ABE")]
    VariantAmbiguous,
    #[error("the scheme fits neither the KP- nor the CP-ABE variant")]
    VariantContradictory,

    // -- master key vars --------------------------------------------------
    #[error("no master key vars are specified")]
    MasterKeyVarsEmpty,
    #[error("two or more master key vars are similar")]
    MasterKeyVarsNonUnique,
    #[error("a master key var is quantified over an ineligible base set")]
    MasterKeyVarsIllegalQuant,
    #[error("the indices of a master key var do not type check")]
    MasterKeyVarsType,
    #[error("a master key var quantification introduces a name that is never used")]
    MasterKeyVarsUnusedQuants,
    #[error("a master key var is a special variable")]
    MasterKeyVarsSpecial,

    // -- common vars ------------------------------------------------------
    #[error("two or more common vars are similar")]
    CommonVarsNonUnique,
    #[error("a common var is quantified over an ineligible base set")]
    CommonVarsIllegalQuant,
    #[error("the indices of a common var do not type check")]
    CommonVarsType,
    #[error("a common var quantification introduces a name that is never used")]
    CommonVarsUnusedQuants,
    #[error("a common var is a special variable")]
    CommonVarsSpecial,
    #[error("a common var is equivalent to a master key var")]
    CommonVarsOverlapMasterKeyVars,

    // -- key polys --------------------------------------------------------
    #[error("no key polys are given")]
    KeyPolysEmpty,
    #[error("two or more key polys are similar")]
    KeyPolysNonUnique,
    #[error("a key poly is itself a special variable")]
    KeyPolyIsSpecial,
    #[error("a key poly is already associated with another role")]
    KeyPolyInconsistentPoly,
    #[error("a key poly is placed in a group other than G or H")]
    KeyPolyInvalidGroup,
    #[error("a key poly is quantified over a base set not available during keygen")]
    KeyPolyIllegalQuants,
    #[error("the expression of a key poly cannot be decomposed")]
    KeyPolyInvalidExpression,
    #[error("a key poly references a disallowed special variable")]
    KeyPolyIllegalSpecialVar,
    #[error("a key poly contains a term with an unexpected number of symbols")]
    KeyPolyInvalidTerm,
    #[error("a key poly contains a unary term that is a common variable")]
    KeyPolyInvalidUnaryTerm,
    #[error("a key poly contains a binary term without exactly one common variable")]
    KeyPolyInvalidBinaryTerm,
    #[error("a key poly or a variable in its body does not type check")]
    KeyPolyType,
    #[error("a key poly quantification introduces a name that is never used")]
    KeyPolyUnusedQuants,
    #[error("a key lone random variable is already associated with another role")]
    KeyPolyInconsistentLoneRandom,
    #[error("a key non-lone random variable is already associated with another role")]
    KeyPolyInconsistentNonLoneRandom,
    #[error("key polys in different groups both bind the identity randomness")]
    KeyPolyConflictingRgidGroups,
    #[error("a key poly term multiplies two hashed quantities and is uncomputable")]
    KeyPolyUncomputableTerm,

    // -- primary cipher polys ---------------------------------------------
    #[error("no primary cipher polys are given")]
    PrimaryPolysEmpty,
    #[error("two or more primary cipher polys are similar")]
    PrimaryPolysNonUnique,
    #[error("a primary cipher poly is itself a special variable")]
    PrimaryPolyIsSpecial,
    #[error("a primary cipher poly is already associated with another role")]
    PrimaryPolyInconsistentPoly,
    #[error("a primary cipher poly is quantified over a base set not available during encryption")]
    PrimaryPolyIllegalQuants,
    #[error("the expression of a primary cipher poly cannot be decomposed")]
    PrimaryPolyInvalidExpression,
    #[error("a primary cipher poly references a disallowed special variable")]
    PrimaryPolyIllegalSpecialVar,
    #[error("a primary cipher poly contains a term with an unexpected number of symbols")]
    PrimaryPolyInvalidTerm,
    #[error("a primary cipher poly contains a unary term that is a common or master key variable")]
    PrimaryPolyInvalidUnaryTerm,
    #[error("a primary cipher poly contains a binary term with operands of unexpected kind")]
    PrimaryPolyInvalidBinaryTerm,
    #[error("a primary cipher poly or a variable in its body does not type check")]
    PrimaryPolyType,
    #[error("a primary cipher poly quantification introduces a name that is never used")]
    PrimaryPolyUnusedQuants,
    #[error("a cipher lone random variable is already associated with another role")]
    PrimaryPolyInconsistentLoneRandom,
    #[error("a cipher non-lone random variable is already associated with another role")]
    PrimaryPolyInconsistentNonLoneRandom,

    // -- secondary cipher polys -------------------------------------------
    #[error("two or more secondary cipher polys are similar")]
    SecondaryPolysNonUnique,
    #[error("a secondary cipher poly is itself a special variable")]
    SecondaryPolyIsSpecial,
    #[error("a secondary cipher poly uses the name reserved for the blinding poly")]
    SecondaryPolyReservedName,
    #[error("a secondary cipher poly is placed in a group other than Gt")]
    SecondaryPolyInvalidGroup,
    #[error("a secondary cipher poly is already associated with another role")]
    SecondaryPolyInconsistentPoly,
    #[error("a secondary cipher poly is quantified over a base set not available during encryption")]
    SecondaryPolyIllegalQuants,
    #[error("the expression of a secondary cipher poly cannot be decomposed")]
    SecondaryPolyInvalidExpression,
    #[error("a secondary cipher poly references a disallowed special variable")]
    SecondaryPolyIllegalSpecialVar,
    #[error("a secondary cipher poly contains a term with an unexpected number of symbols")]
    SecondaryPolyInvalidTerm,
    #[error("a secondary cipher poly contains a unary term that is a common or master key variable")]
    SecondaryPolyInvalidUnaryTerm,
    #[error("a secondary cipher poly contains a binary term referencing a common variable")]
    SecondaryPolyInvalidBinaryTerm,
    #[error("a secondary cipher poly or a variable in its body does not type check")]
    SecondaryPolyType,
    #[error("a secondary cipher poly quantification introduces a name that is never used")]
    SecondaryPolyUnusedQuants,
    #[error("a cipher special-lone random variable is already associated with another role")]
    SecondaryPolyInconsistentSpecialLoneRandom,
    #[error("a cipher non-lone random variable is already associated with another role")]
    SecondaryPolyInconsistentNonLoneRandom,

    // -- blinding poly ----------------------------------------------------
    #[error("no blinding poly is specified")]
    BlindingPolyMissing,
    #[error("multiple blinding polys are specified")]
    BlindingPolyAmbiguous,
    #[error("the blinding poly is not placed in the target group")]
    BlindingPolyInvalidGroup,
    #[error("the blinding poly is quantified over base sets")]
    BlindingPolyIsQuantified,
    #[error("the blinding poly has indices")]
    BlindingPolyIsIndexed,
    #[error("the blinding poly is itself a special variable")]
    BlindingPolyIsSpecial,
    #[error("the blinding poly does not carry the reserved blinding name")]
    BlindingPolyInvalidName,
    #[error("the blinding poly is already associated with another role")]
    BlindingPolyInconsistentPoly,
    #[error("the expression of the blinding poly cannot be decomposed")]
    BlindingPolyInvalidExpression,
    #[error("the blinding poly references a disallowed special variable")]
    BlindingPolyIllegalSpecialVar,
    #[error("the blinding poly contains a term with an unexpected number of symbols")]
    BlindingPolyInvalidTerm,
    #[error("the blinding poly contains a unary term that is a common or master key variable")]
    BlindingPolyInvalidUnaryTerm,
    #[error("the blinding poly contains a binary term with operands of unexpected kind")]
    BlindingPolyInvalidBinaryTerm,
    #[error("a variable in the body of the blinding poly does not type check")]
    BlindingPolyType,
    #[error("a cipher special-lone random variable is already associated with another role")]
    BlindingPolyInconsistentSpecialLoneRandom,
    #[error("a cipher non-lone random variable is already associated with another role")]
    BlindingPolyInconsistentNonLoneRandom,

    // -- FDH map ----------------------------------------------------------
    #[error("two or more FDH entries refer to similar variables")]
    FdhMapNonUnique,
    #[error("an FDH entry quantification introduces a name that is never used")]
    FdhMapUnusedQuants,
    #[error("an FDH entry references a special variable")]
    FdhMapSpecial,
    #[error("the indices of an FDH entry do not type check")]
    FdhMapType,
    #[error("an FDH entry is quantified over an ineligible base set")]
    FdhMapIllegalQuant,
    #[error("an FDH index is zero, which is reserved for unhashed variables")]
    FdhMapInvalidIndex,
    #[error("a hashed variable is neither a common var nor a key non-lone random")]
    FdhMapIllegalVarKind,

    // -- group map inference ----------------------------------------------
    #[error("a common var is not used in any primary cipher poly")]
    GroupMapUnusedCommonVar,
    #[error("primary cipher polys in different groups share a common var")]
    GroupMapConflictingCommonVarGroups,
    #[error("no pairing determines the group of a key non-lone random")]
    GroupMapMissingKeyRandomPartner,
    #[error("pairings place a key non-lone random in conflicting groups")]
    GroupMapConflictingKeyRandomPartners,
    #[error("no pairing determines the group of a cipher non-lone random")]
    GroupMapMissingCipherRandomPartner,
    #[error("pairings place a cipher non-lone random in conflicting groups")]
    GroupMapConflictingCipherRandomPartners,
    #[error("polys sharing a hashed common var are not all in the same group")]
    GroupMapConflictingHashedCommonVarGroups,
    #[error("a hashed non-lone random of a key poly lives in a different group than the poly")]
    GroupMapConflictingHashedKeyRandomGroups,
    #[error("a pairing pairs a variable with itself")]
    GroupMapSelfPairing,

    // -- decryption singles -----------------------------------------------
    #[error("the exponent expression of a single cannot be decomposed")]
    SingleInvalidExpression,
    #[error("a single references a variable that is not a secondary cipher poly")]
    SingleInconsistentVarKind,
    #[error("the indices of a single do not type check")]
    SinglesType,
    #[error("a single references a disallowed special variable")]
    SinglesIllegalSpecialVar,
    #[error("a single quantification introduces a name that is never used")]
    SingleUnusedQuants,

    // -- decryption pairs -------------------------------------------------
    #[error("the exponent expression of a pair cannot be decomposed")]
    PairInvalidExpression,
    #[error("the indices of a pair do not type check")]
    PairsType,
    #[error("a pair references a disallowed special variable")]
    PairsIllegalSpecialVar,
    #[error("a pair quantification introduces a name that is never used")]
    PairUnusedQuants,
    #[error("the operands of a pair are not of an allowed role combination")]
    PairInconsistentOperandKinds,
    #[error("the operands of a pair are not in opposite source groups")]
    PairIllegalGroupCombination,
}
