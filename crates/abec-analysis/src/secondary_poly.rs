//! Analysis of secondary cipher polynomials (Gt-valued, non-blinding).

use abec_core::{
    EquivSet, Group, Idx, Poly, Quant, SpecialVar, Var, VarName, VarType, VarTypeMap,
};

use crate::errors::AnalysisError;
use crate::expr::decompose;
use crate::terms::{split_term, MasterKeyProductTerm, SpecialLoneRandomTerm};
use crate::validate;
use crate::variant::AbeVariant;

/// The reserved name of the blinding polynomial.
pub const BLINDING_POLY_NAME: &str = "cm";

/// A fully classified secondary cipher polynomial.
#[derive(Debug, Clone, PartialEq)]
pub struct SecondaryCipherPoly {
    pub name: VarName,
    pub idcs: Vec<Idx>,
    pub quants: Vec<Quant>,
    pub group: Group,
    pub master_key_terms: Vec<MasterKeyProductTerm>,
    pub special_lone_random_terms: Vec<SpecialLoneRandomTerm>,
}

impl SecondaryCipherPoly {
    pub fn head(&self) -> Var {
        Var {
            name: self.name.clone(),
            idcs: self.idcs.clone(),
            quants: self.quants.clone(),
        }
    }
}

/// Analyze the secondary cipher polys of a scheme.
///
/// Secondary polys live in Gt and consist of special-lone random terms and
/// master-key terms (a non-lone random multiplied with a master-key var).
/// The list may be empty; the reserved blinding name is rejected.
pub fn analyze_secondary_cipher_polys(
    variant: AbeVariant,
    var_type_map: &mut VarTypeMap,
    cipher_non_lone_randoms: &mut EquivSet,
    cipher_special_lone_randoms: &mut EquivSet,
    raw_polys: &[Poly],
) -> Result<Vec<SecondaryCipherPoly>, AnalysisError> {
    let heads: Vec<Var> = raw_polys.iter().map(Poly::head).collect();
    if !validate::unique_sim(&heads) {
        return Err(AnalysisError::SecondaryPolysNonUnique);
    }

    let mut cipher_polys = Vec::with_capacity(raw_polys.len());
    for poly in raw_polys {
        let cp = analyze_one(
            variant,
            var_type_map,
            cipher_non_lone_randoms,
            cipher_special_lone_randoms,
            poly,
        )?;

        let mut all_vars = vec![poly.head()];
        for t in &cp.master_key_terms {
            all_vars.push(t.master_key_var.quantify(&poly.quants));
            all_vars.push(t.random_var.quantify(&poly.quants));
        }
        for t in &cp.special_lone_random_terms {
            all_vars.push(t.random_var.quantify(&poly.quants));
        }
        if !validate::types_check(&all_vars) {
            return Err(AnalysisError::SecondaryPolyType);
        }
        if !validate::all_quants_occur(&all_vars, &poly.quants) {
            return Err(AnalysisError::SecondaryPolyUnusedQuants);
        }

        cipher_polys.push(cp);
    }
    Ok(cipher_polys)
}

fn analyze_one(
    variant: AbeVariant,
    var_type_map: &mut VarTypeMap,
    cipher_non_lone_randoms: &mut EquivSet,
    cipher_special_lone_randoms: &mut EquivSet,
    poly: &Poly,
) -> Result<SecondaryCipherPoly, AnalysisError> {
    if poly.name.is_special() {
        return Err(AnalysisError::SecondaryPolyIsSpecial);
    }
    if poly.name == VarName::named(BLINDING_POLY_NAME) {
        return Err(AnalysisError::SecondaryPolyReservedName);
    }
    if poly.group != Group::Gt {
        return Err(AnalysisError::SecondaryPolyInvalidGroup);
    }
    let head = poly.head();
    var_type_map.expect(&head, VarType::CipherSecondaryPoly, || {
        AnalysisError::SecondaryPolyInconsistentPoly
    })?;
    if !validate::quants_allowed(&[head], variant.allowed_quants_encrypt()) {
        return Err(AnalysisError::SecondaryPolyIllegalQuants);
    }

    let terms =
        decompose(&poly.expr).map_err(|_| AnalysisError::SecondaryPolyInvalidExpression)?;

    let mut master_key_terms = Vec::new();
    let mut special_lone_random_terms = Vec::new();

    for term in &terms {
        let parts = split_term(
            term,
            |v| v.special() != Some(SpecialVar::Epsilon),
            &[
                SpecialVar::Rgid,
                SpecialVar::XAttr,
                SpecialVar::Lambda,
                SpecialVar::Mu,
            ],
            || AnalysisError::SecondaryPolyIllegalSpecialVar,
        )?;

        match parts.symbols.as_slice() {
            [var] => {
                let quantified = var.quantify(&poly.quants);
                if var_type_map.is_master_key_var(&quantified)
                    || var_type_map.is_common_var(&quantified)
                {
                    return Err(AnalysisError::SecondaryPolyInvalidUnaryTerm);
                }
                if !var.is_special() {
                    cipher_special_lone_randoms.update(quantified.clone());
                    var_type_map.expect(&quantified, VarType::CipherSpecialLoneRandom, || {
                        AnalysisError::SecondaryPolyInconsistentSpecialLoneRandom
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
                    return Err(AnalysisError::SecondaryPolyInvalidBinaryTerm);
                }
                let (random_var, master_key_var) = match (
                    var_type_map.is_master_key_var(&lhs_q),
                    var_type_map.is_master_key_var(&rhs_q),
                ) {
                    (true, false) => (rhs.clone(), lhs.clone()),
                    (false, true) => (lhs.clone(), rhs.clone()),
                    _ => return Err(AnalysisError::SecondaryPolyInvalidTerm),
                };

                if !random_var.is_special() {
                    let quantified = random_var.quantify(&poly.quants);
                    cipher_non_lone_randoms.update(quantified.clone());
                    var_type_map.expect(&quantified, VarType::CipherNonLoneRandom, || {
                        AnalysisError::SecondaryPolyInconsistentNonLoneRandom
                    })?;
                }
                master_key_terms.push(MasterKeyProductTerm {
                    random_var,
                    master_key_var,
                    factor: parts.factor,
                });
            }
            _ => return Err(AnalysisError::SecondaryPolyInvalidTerm),
        }
    }

    Ok(SecondaryCipherPoly {
        name: poly.name.clone(),
        idcs: poly.idcs.clone(),
        quants: poly.quants.clone(),
        group: poly.group,
        master_key_terms,
        special_lone_random_terms,
    })
}
