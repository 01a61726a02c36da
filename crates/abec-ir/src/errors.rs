use thiserror::Error;

/// Errors raised while lowering a validated scheme to IR.
///
/// These cover shapes the analyzer admits but the code generators cannot
/// express yet, plus direct-API misuse (compiling with an incomplete group
/// map).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum CodegenError {
    #[error("a coefficient shape is not supported by the scalar compiler")]
    UnsupportedCoefficient,
    #[error("a decryption exponent does not reduce to a single product term")]
    UnsupportedExponent,
    #[error("an index cannot be resolved under its quantifications")]
    UnresolvedIndex,
    #[error("a variable reached code generation without a group assignment")]
    UnassignedGroup,
    #[error("a pairing operand resolves to no storage location")]
    UnknownOperandLocation,
}
