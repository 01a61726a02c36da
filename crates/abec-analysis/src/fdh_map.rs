//! Analysis of the user-specified FDH map.

use abec_core::{FdhEntry, FdhMap, QSet, Var, VarType, VarTypeMap};

use crate::errors::AnalysisError;
use crate::validate;

/// Analyze the FDH declarations of a scheme.
///
/// Enforces that entries are pairwise non-similar, fully quantified over
/// eligible base sets, type-checked and non-special, that indices are
/// strictly positive, and that every hashed variable was already classified
/// as a common var or a key non-lone random.
pub fn analyze_fdh_map(
    var_type_map: &VarTypeMap,
    raw_entries: &[FdhEntry],
) -> Result<FdhMap, AnalysisError> {
    let allowed_qsets = [
        QSet::AttributeUniverse,
        QSet::UserAttributes,
        QSet::Labels,
        QSet::Authorities,
    ];
    let vars: Vec<Var> = raw_entries.iter().map(|e| e.var.clone()).collect();
    if !validate::unique_sim(&vars) {
        return Err(AnalysisError::FdhMapNonUnique);
    }
    if !validate::all_quants_used(&vars) {
        return Err(AnalysisError::FdhMapUnusedQuants);
    }
    if !validate::no_specials(&vars) {
        return Err(AnalysisError::FdhMapSpecial);
    }
    if !validate::types_check(&vars) {
        return Err(AnalysisError::FdhMapType);
    }
    if !validate::quants_allowed(&vars, &allowed_qsets) {
        return Err(AnalysisError::FdhMapIllegalQuant);
    }

    let mut fdh_map = FdhMap::new();
    for entry in raw_entries {
        if entry.idx == 0 {
            return Err(AnalysisError::FdhMapInvalidIndex);
        }
        match var_type_map.get(&entry.var) {
            Some(VarType::CommonVar) | Some(VarType::KeyNonLoneRandom) => {
                fdh_map
                    .insert(entry.var.clone(), entry.idx)
                    .map_err(|_| AnalysisError::FdhMapNonUnique)?;
            }
            _ => return Err(AnalysisError::FdhMapIllegalVarKind),
        }
    }
    Ok(fdh_map)
}
