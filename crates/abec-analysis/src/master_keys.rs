//! Analysis of master key variables.

use abec_core::{QSet, Var, VarType, VarTypeMap};

use crate::errors::AnalysisError;
use crate::validate;

/// Analyze the master key variables of a scheme.
///
/// Enforces that there is at least one, that no two are similar, that
/// quantifications range only over the attribute universe, authorities or
/// labels and are fully used, that indices type check, and that none is a
/// special variable. All master keys register in the `VarTypeMap`.
pub fn analyze_master_key_vars(
    var_type_map: &mut VarTypeMap,
    msks: &[Var],
) -> Result<Vec<Var>, AnalysisError> {
    let allowed_qsets = [QSet::AttributeUniverse, QSet::Authorities, QSet::Labels];
    if msks.is_empty() {
        return Err(AnalysisError::MasterKeyVarsEmpty);
    }
    if !validate::unique_sim(msks) {
        return Err(AnalysisError::MasterKeyVarsNonUnique);
    }
    if !validate::quants_allowed(msks, &allowed_qsets) {
        return Err(AnalysisError::MasterKeyVarsIllegalQuant);
    }
    if !validate::types_check(msks) {
        return Err(AnalysisError::MasterKeyVarsType);
    }
    if !validate::all_quants_used(msks) {
        return Err(AnalysisError::MasterKeyVarsUnusedQuants);
    }
    if !validate::no_specials(msks) {
        return Err(AnalysisError::MasterKeyVarsSpecial);
    }
    for msk in msks {
        var_type_map
            .insert(msk.clone(), VarType::MasterKeyVar)
            .map_err(|_| AnalysisError::MasterKeyVarsNonUnique)?;
    }
    Ok(msks.to_vec())
}
