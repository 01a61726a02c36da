//! Scheme variant detection: KP-ABE versus CP-ABE.

use indexmap::IndexSet;

use abec_core::{QSet, Quant};

use crate::errors::AnalysisError;

/// The two supported scheme variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AbeVariant {
    KpAbe,
    CpAbe,
}

impl AbeVariant {
    /// The base sets available during key generation for this variant.
    pub fn allowed_quants_keygen(self) -> &'static [QSet] {
        match self {
            // KP-ABE keys carry the access policy
            AbeVariant::KpAbe => &[
                QSet::AttributeUniverse,
                QSet::Labels,
                QSet::Authorities,
                QSet::LsssRows,
                QSet::PosLsssRows,
                QSet::NegLsssRows,
                QSet::DedupIndices,
            ],
            // CP-ABE keys carry the user attributes
            AbeVariant::CpAbe => &[
                QSet::AttributeUniverse,
                QSet::UserAttributes,
                QSet::Labels,
                QSet::Authorities,
            ],
        }
    }

    /// The base sets available during encryption: the mirror image of the
    /// other variant's keygen sets.
    pub fn allowed_quants_encrypt(self) -> &'static [QSet] {
        match self {
            AbeVariant::KpAbe => AbeVariant::CpAbe.allowed_quants_keygen(),
            AbeVariant::CpAbe => AbeVariant::KpAbe.allowed_quants_keygen(),
        }
    }
}

/// Determine whether a scheme is KP- or CP-ABE from the quantifications of
/// its key polys (keygen side) and cipher polys (encrypt side).
///
/// Exactly one variant must admit both sides: zero admitting variants means
/// the specification is contradictory, two means it is ambiguous.
pub fn analyze_variant<'a>(
    keygen_quants: impl IntoIterator<Item = &'a Quant>,
    cipher_quants: impl IntoIterator<Item = &'a Quant>,
) -> Result<AbeVariant, AnalysisError> {
    let keygen_sets: IndexSet<QSet> = keygen_quants.into_iter().map(|q| q.base_set).collect();
    let cipher_sets: IndexSet<QSet> = cipher_quants.into_iter().map(|q| q.base_set).collect();

    let admits = |variant: AbeVariant| {
        let keygen_ref = variant.allowed_quants_keygen();
        let encrypt_ref = variant.allowed_quants_encrypt();
        keygen_sets.iter().all(|s| keygen_ref.contains(s))
            && cipher_sets.iter().all(|s| encrypt_ref.contains(s))
    };

    match (admits(AbeVariant::KpAbe), admits(AbeVariant::CpAbe)) {
        (true, false) => Ok(AbeVariant::KpAbe),
        (false, true) => Ok(AbeVariant::CpAbe),
        (true, true) => Err(AnalysisError::VariantAmbiguous),
        (false, false) => Err(AnalysisError::VariantContradictory),
    }
}
