//! Analysis of common variables.

use abec_core::{QSet, Var, VarType, VarTypeMap};

use crate::errors::AnalysisError;
use crate::validate;

/// Analyze the common variables of a scheme.
///
/// The same structural checks as master keys, except that the list may be
/// empty; additionally no common var may collide (by equivalence) with a
/// master key var. All common vars register in the `VarTypeMap`. A common
/// var no primary cipher poly references is rejected later, during
/// group-map inference.
pub fn analyze_common_vars(
    var_type_map: &mut VarTypeMap,
    cvs: &[Var],
) -> Result<Vec<Var>, AnalysisError> {
    let allowed_qsets = [QSet::AttributeUniverse, QSet::Authorities, QSet::Labels];
    if !validate::unique_sim(cvs) {
        return Err(AnalysisError::CommonVarsNonUnique);
    }
    if !validate::quants_allowed(cvs, &allowed_qsets) {
        return Err(AnalysisError::CommonVarsIllegalQuant);
    }
    if !validate::types_check(cvs) {
        return Err(AnalysisError::CommonVarsType);
    }
    if !validate::all_quants_used(cvs) {
        return Err(AnalysisError::CommonVarsUnusedQuants);
    }
    if !validate::no_specials(cvs) {
        return Err(AnalysisError::CommonVarsSpecial);
    }
    for cv in cvs {
        var_type_map.expect(cv, VarType::CommonVar, || {
            AnalysisError::CommonVarsOverlapMasterKeyVars
        })?;
    }
    Ok(cvs.to_vec())
}
