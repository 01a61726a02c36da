//! Analysis of the blinding polynomial: the single Gt-valued quantity that
//! masks the plaintext and is recovered during decryption.

use abec_core::{EquivSet, Group, Poly, SpecialVar, Var, VarName, VarType, VarTypeMap};

use crate::errors::AnalysisError;
use crate::expr::decompose;
use crate::secondary_poly::BLINDING_POLY_NAME;
use crate::terms::{split_term, MasterKeyProductTerm, SpecialLoneRandomTerm};
use crate::validate;

/// The fully classified blinding polynomial.
#[derive(Debug, Clone, PartialEq)]
pub struct BlindingPoly {
    pub name: VarName,
    pub group: Group,
    pub special_lone_random_terms: Vec<SpecialLoneRandomTerm>,
    pub master_key_terms: Vec<MasterKeyProductTerm>,
}

impl BlindingPoly {
    pub fn head(&self) -> Var {
        Var {
            name: self.name.clone(),
            idcs: Vec::new(),
            quants: Vec::new(),
        }
    }
}

/// Analyze the blinding poly of a scheme.
///
/// Exactly one polynomial must carry the reserved name; it lives in Gt, is
/// unindexed and unquantified, and consists of special-lone random terms and
/// master-key terms. The special secret operand of a master-key term
/// registers as a cipher non-lone random so decryption pairings can resolve
/// it.
pub fn analyze_blinding_poly(
    var_type_map: &mut VarTypeMap,
    cipher_non_lone_randoms: &mut EquivSet,
    cipher_special_lone_randoms: &mut EquivSet,
    raw_polys: &[Poly],
) -> Result<BlindingPoly, AnalysisError> {
    let poly = match raw_polys {
        [] => return Err(AnalysisError::BlindingPolyMissing),
        [poly] => poly,
        _ => return Err(AnalysisError::BlindingPolyAmbiguous),
    };
    if poly.group != Group::Gt {
        return Err(AnalysisError::BlindingPolyInvalidGroup);
    }
    if !poly.quants.is_empty() {
        return Err(AnalysisError::BlindingPolyIsQuantified);
    }
    if !poly.idcs.is_empty() {
        return Err(AnalysisError::BlindingPolyIsIndexed);
    }

    let cm = analyze_one(
        var_type_map,
        cipher_non_lone_randoms,
        cipher_special_lone_randoms,
        poly,
    )?;

    let mut all_vars = vec![poly.head()];
    for t in &cm.master_key_terms {
        all_vars.push(t.master_key_var.quantify(&poly.quants));
        all_vars.push(t.random_var.quantify(&poly.quants));
    }
    for t in &cm.special_lone_random_terms {
        all_vars.push(t.random_var.quantify(&poly.quants));
    }
    if !validate::types_check(&all_vars) {
        return Err(AnalysisError::BlindingPolyType);
    }

    Ok(cm)
}

fn analyze_one(
    var_type_map: &mut VarTypeMap,
    cipher_non_lone_randoms: &mut EquivSet,
    cipher_special_lone_randoms: &mut EquivSet,
    poly: &Poly,
) -> Result<BlindingPoly, AnalysisError> {
    if poly.name.is_special() {
        return Err(AnalysisError::BlindingPolyIsSpecial);
    }
    if poly.name != VarName::named(BLINDING_POLY_NAME) {
        return Err(AnalysisError::BlindingPolyInvalidName);
    }
    var_type_map.expect(&poly.head(), VarType::CipherBlindingPoly, || {
        AnalysisError::BlindingPolyInconsistentPoly
    })?;

    let terms = decompose(&poly.expr).map_err(|_| AnalysisError::BlindingPolyInvalidExpression)?;

    let mut special_lone_random_terms = Vec::new();
    let mut master_key_terms = Vec::new();

    for term in &terms {
        let parts = split_term(
            term,
            |v| v.special() != Some(SpecialVar::Epsilon),
            &[SpecialVar::Rgid, SpecialVar::Secret],
            || AnalysisError::BlindingPolyIllegalSpecialVar,
        )?;

        match parts.symbols.as_slice() {
            [var] => {
                let quantified = var.quantify(&poly.quants);
                if var_type_map.is_master_key_var(&quantified)
                    || var_type_map.is_common_var(&quantified)
                {
                    return Err(AnalysisError::BlindingPolyInvalidUnaryTerm);
                }
                if !var.is_special() {
                    cipher_special_lone_randoms.update(quantified.clone());
                    var_type_map.expect(&quantified, VarType::CipherSpecialLoneRandom, || {
                        AnalysisError::BlindingPolyInconsistentSpecialLoneRandom
                    })?;
                }
                special_lone_random_terms.push(SpecialLoneRandomTerm {
                    random_var: var.clone(),
                    factor: parts.factor,
                });
            }
            [lhs, rhs] => {
                let lhs_q = lhs.quantify(&poly.quants);
                let rhs_q = rhs.quantify(&poly.quants);
                if var_type_map.is_common_var(&lhs_q) || var_type_map.is_common_var(&rhs_q) {
                    return Err(AnalysisError::BlindingPolyInvalidBinaryTerm);
                }
                let (random_var, master_key_var) = match (
                    var_type_map.is_master_key_var(&lhs_q),
                    var_type_map.is_master_key_var(&rhs_q),
                ) {
                    (true, false) => (rhs.clone(), lhs.clone()),
                    (false, true) => (lhs.clone(), rhs.clone()),
                    _ => return Err(AnalysisError::BlindingPolyInvalidBinaryTerm),
                };

                // the secret registers like an ordinary non-lone random so
                // decryption pairings can place it
                if !random_var.is_special() || random_var.special() == Some(SpecialVar::Secret) {
                    let quantified = random_var.quantify(&poly.quants);
                    cipher_non_lone_randoms.update(quantified.clone());
                    var_type_map.expect(&quantified, VarType::CipherNonLoneRandom, || {
                        AnalysisError::BlindingPolyInconsistentNonLoneRandom
                    })?;
                }
                master_key_terms.push(MasterKeyProductTerm {
                    random_var,
                    master_key_var,
                    factor: parts.factor,
                });
            }
            _ => return Err(AnalysisError::BlindingPolyInvalidTerm),
        }
    }

    Ok(BlindingPoly {
        name: poly.name.clone(),
        group: poly.group,
        special_lone_random_terms,
        master_key_terms,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use abec_dsl::{parse_poly, parse_var};

    fn setup_map() -> VarTypeMap {
        let mut vtm = VarTypeMap::new();
        vtm.insert(parse_var("alpha").unwrap(), VarType::MasterKeyVar)
            .unwrap();
        vtm.insert(parse_var("b").unwrap(), VarType::CommonVar)
            .unwrap();
        vtm
    }

    fn analyze(polys: &[Poly], vtm: &mut VarTypeMap) -> Result<BlindingPoly, AnalysisError> {
        let mut non_lone = EquivSet::new();
        let mut special_lone = EquivSet::new();
        analyze_blinding_poly(vtm, &mut non_lone, &mut special_lone, polys)
    }

    #[test]
    fn bare_secret_is_a_special_lone_term() {
        let mut vtm = setup_map();
        let cm = analyze(&[parse_poly("cm : Gt = <secret>").unwrap()], &mut vtm).unwrap();
        assert_eq!(cm.special_lone_random_terms.len(), 1);
        assert!(cm.master_key_terms.is_empty());
    }

    #[test]
    fn secret_times_master_key_registers_secret() {
        let mut vtm = setup_map();
        let mut non_lone = EquivSet::new();
        let mut special_lone = EquivSet::new();
        let cm = analyze_blinding_poly(
            &mut vtm,
            &mut non_lone,
            &mut special_lone,
            &[parse_poly("cm : Gt = <secret>*alpha").unwrap()],
        )
        .unwrap();
        assert_eq!(cm.master_key_terms.len(), 1);
        assert_eq!(non_lone.len(), 1);
        assert_eq!(
            vtm.get(&parse_var("<secret>").unwrap()),
            Some(VarType::CipherNonLoneRandom)
        );
    }

    #[test]
    fn missing_and_ambiguous_are_detected() {
        let mut vtm = setup_map();
        assert_eq!(
            analyze(&[], &mut vtm).unwrap_err(),
            AnalysisError::BlindingPolyMissing
        );
        let mut vtm = setup_map();
        let polys = [
            parse_poly("cm : Gt = <secret>").unwrap(),
            parse_poly("cm : Gt = v").unwrap(),
        ];
        assert_eq!(
            analyze(&polys, &mut vtm).unwrap_err(),
            AnalysisError::BlindingPolyAmbiguous
        );
    }

    #[test]
    fn group_shape_and_name_are_checked() {
        let mut vtm = setup_map();
        assert_eq!(
            analyze(&[parse_poly("cm : G = <secret>").unwrap()], &mut vtm).unwrap_err(),
            AnalysisError::BlindingPolyInvalidGroup
        );
        let mut vtm = setup_map();
        assert_eq!(
            analyze(
                &[parse_poly("(cm : Gt = <secret>)_[j:LSSS_ROWS]").unwrap()],
                &mut vtm
            )
            .unwrap_err(),
            AnalysisError::BlindingPolyIsQuantified
        );
        let mut vtm = setup_map();
        assert_eq!(
            analyze(&[parse_poly("cm_{1} : Gt = <secret>").unwrap()], &mut vtm).unwrap_err(),
            AnalysisError::BlindingPolyIsIndexed
        );
        let mut vtm = setup_map();
        assert_eq!(
            analyze(&[parse_poly("cx : Gt = <secret>").unwrap()], &mut vtm).unwrap_err(),
            AnalysisError::BlindingPolyInvalidName
        );
    }

    #[test]
    fn unary_master_key_is_rejected() {
        let mut vtm = setup_map();
        assert_eq!(
            analyze(&[parse_poly("cm : Gt = alpha").unwrap()], &mut vtm).unwrap_err(),
            AnalysisError::BlindingPolyInvalidUnaryTerm
        );
    }

    #[test]
    fn binary_without_master_key_is_rejected() {
        let mut vtm = setup_map();
        assert_eq!(
            analyze(&[parse_poly("cm : Gt = v*w").unwrap()], &mut vtm).unwrap_err(),
            AnalysisError::BlindingPolyInvalidBinaryTerm
        );
    }

    #[test]
    fn epsilon_is_rejected() {
        let mut vtm = setup_map();
        assert_eq!(
            analyze(
                &[parse_poly("cm : Gt = <epsilon>_{j}*<secret>").unwrap()],
                &mut vtm
            )
            .unwrap_err(),
            AnalysisError::BlindingPolyIllegalSpecialVar
        );
    }
}
