//! Analysis of decryption "singles": secondary cipher polys exponentiated
//! with a custom coefficient during decryption.

use abec_core::{Quant, SpecialVar, Var, VarType, VarTypeMap};
use abec_dsl::RawSingle;

use crate::errors::AnalysisError;
use crate::expr::{decompose, Atom, Term};
use crate::validate;

/// One analyzed decryption single.
#[derive(Debug, Clone, PartialEq)]
pub struct Single {
    pub entry: Var,
    pub coeff: Vec<Term>,
    pub quants: Vec<Quant>,
}

/// Analyze the singles of a scheme.
///
/// Enforces that the exponent expression decomposes, that the referenced
/// entry is a secondary cipher poly, that every variable type checks, that
/// quantifications are used, and that only the permitted special symbols
/// appear.
pub fn analyze_singles(
    var_type_map: &VarTypeMap,
    raw_singles: &[RawSingle],
) -> Result<Vec<Single>, AnalysisError> {
    let allowed_specials = [SpecialVar::Rgid, SpecialVar::Epsilon];

    let mut singles = Vec::with_capacity(raw_singles.len());
    for raw in raw_singles {
        let terms =
            decompose(&raw.expr).map_err(|_| AnalysisError::SingleInvalidExpression)?;

        if var_type_map.get(&raw.entry.quantify(&raw.quants))
            != Some(VarType::CipherSecondaryPoly)
        {
            return Err(AnalysisError::SingleInconsistentVarKind);
        }

        let mut all_vars = vec![raw.entry.clone()];
        for term in &terms {
            for coeff in &term.coeffs {
                if let Atom::Sym(var) = &coeff.num {
                    all_vars.push(var.quantify(&raw.quants));
                }
                for factors in &coeff.denom {
                    for atom in factors {
                        if let Atom::Sym(var) = atom {
                            all_vars.push(var.quantify(&raw.quants));
                        }
                    }
                }
            }
        }

        if !validate::types_check(&all_vars) {
            return Err(AnalysisError::SinglesType);
        }
        if !validate::all_quants_occur(&all_vars, &raw.quants) {
            return Err(AnalysisError::SingleUnusedQuants);
        }
        for var in &all_vars {
            if let Some(kind) = var.special() {
                if !allowed_specials.contains(&kind) {
                    return Err(AnalysisError::SinglesIllegalSpecialVar);
                }
            }
        }

        singles.push(Single {
            entry: raw.entry.clone(),
            coeff: terms,
            quants: raw.quants.clone(),
        });
    }
    Ok(singles)
}
