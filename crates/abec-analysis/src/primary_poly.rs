//! Analysis of primary cipher polynomials (those valued in G or H).

use abec_core::{
    EquivSet, FdhMap, Group, GroupMap, Idx, Poly, Quant, SpecialVar, Var, VarName, VarType,
    VarTypeMap,
};

use crate::errors::AnalysisError;
use crate::expr::decompose;
use crate::terms::{split_term, CommonTerm, LoneRandomTerm};
use crate::validate;
use crate::variant::AbeVariant;

/// A fully classified primary cipher polynomial.
#[derive(Debug, Clone, PartialEq)]
pub struct PrimaryCipherPoly {
    pub name: VarName,
    pub idcs: Vec<Idx>,
    pub quants: Vec<Quant>,
    pub group: Group,
    pub lone_random_terms: Vec<LoneRandomTerm>,
    pub common_terms_plain: Vec<CommonTerm>,
    pub common_terms_hashed: Vec<CommonTerm>,
}

impl PrimaryCipherPoly {
    pub fn head(&self) -> Var {
        Var {
            name: self.name.clone(),
            idcs: self.idcs.clone(),
            quants: self.quants.clone(),
        }
    }
}

/// Analyze the primary cipher polys of a scheme.
///
/// The structure mirrors key-poly analysis without master-key terms: every
/// term is either a lone-random term or a common term, and the random
/// operand of a common term may be an unregistered special placeholder (a
/// share or the encryption secret).
///
/// All common terms are classified as plain here; FDH reclassification
/// happens in [`post_analyze_primary_cipher_polys`].
pub fn analyze_primary_cipher_polys(
    variant: AbeVariant,
    var_type_map: &mut VarTypeMap,
    group_map: &mut GroupMap,
    cipher_lone_randoms: &mut EquivSet,
    cipher_non_lone_randoms: &mut EquivSet,
    raw_polys: &[Poly],
) -> Result<Vec<PrimaryCipherPoly>, AnalysisError> {
    if raw_polys.is_empty() {
        return Err(AnalysisError::PrimaryPolysEmpty);
    }
    let heads: Vec<Var> = raw_polys.iter().map(Poly::head).collect();
    if !validate::unique_sim(&heads) {
        return Err(AnalysisError::PrimaryPolysNonUnique);
    }

    let mut cipher_polys = Vec::with_capacity(raw_polys.len());
    for poly in raw_polys {
        let cp = analyze_one(
            variant,
            var_type_map,
            group_map,
            cipher_lone_randoms,
            cipher_non_lone_randoms,
            poly,
        )?;

        let mut all_vars = vec![poly.head()];
        for t in &cp.lone_random_terms {
            all_vars.push(t.random_var.quantify(&poly.quants));
        }
        for t in &cp.common_terms_plain {
            all_vars.push(t.random_var.quantify(&poly.quants));
            all_vars.push(t.common_var.quantify(&poly.quants));
        }
        if !validate::types_check(&all_vars) {
            return Err(AnalysisError::PrimaryPolyType);
        }
        if !validate::all_quants_occur(&all_vars, &poly.quants) {
            return Err(AnalysisError::PrimaryPolyUnusedQuants);
        }

        cipher_polys.push(cp);
    }
    Ok(cipher_polys)
}

/// Reclassify the common terms of verified primary polys against the FDH
/// map: terms whose common operand is hashed move to the hashed list.
pub fn post_analyze_primary_cipher_polys(
    mut cipher_polys: Vec<PrimaryCipherPoly>,
    fdh_map: &FdhMap,
) -> Vec<PrimaryCipherPoly> {
    for poly in &mut cipher_polys {
        let quants = poly.quants.clone();
        for term in std::mem::take(&mut poly.common_terms_plain) {
            if fdh_map.is_hashed(&term.common_var.quantify(&quants)) {
                poly.common_terms_hashed.push(term);
            } else {
                poly.common_terms_plain.push(term);
            }
        }
    }
    cipher_polys
}

fn analyze_one(
    variant: AbeVariant,
    var_type_map: &mut VarTypeMap,
    group_map: &mut GroupMap,
    cipher_lone_randoms: &mut EquivSet,
    cipher_non_lone_randoms: &mut EquivSet,
    poly: &Poly,
) -> Result<PrimaryCipherPoly, AnalysisError> {
    if poly.name.is_special() {
        return Err(AnalysisError::PrimaryPolyIsSpecial);
    }
    let head = poly.head();
    var_type_map.expect(&head, VarType::CipherPrimaryPoly, || {
        AnalysisError::PrimaryPolyInconsistentPoly
    })?;
    group_map
        .assign(&head, poly.group)
        .map_err(|_| AnalysisError::PrimaryPolyInconsistentPoly)?;
    if !validate::quants_allowed(&[head], variant.allowed_quants_encrypt()) {
        return Err(AnalysisError::PrimaryPolyIllegalQuants);
    }

    let terms = decompose(&poly.expr).map_err(|_| AnalysisError::PrimaryPolyInvalidExpression)?;

    let mut lone_random_terms = Vec::new();
    let mut common_terms = Vec::new();

    for term in &terms {
        let parts = split_term(
            term,
            |v| {
                !v.is_special()
                    || matches!(
                        v.special(),
                        Some(SpecialVar::Mu) | Some(SpecialVar::Secret) | Some(SpecialVar::Lambda)
                    )
            },
            &[
                SpecialVar::Rgid,
                SpecialVar::XAttr,
                SpecialVar::Lambda,
                SpecialVar::Mu,
            ],
            || AnalysisError::PrimaryPolyIllegalSpecialVar,
        )?;

        match parts.symbols.as_slice() {
            [var] => {
                let quantified = var.quantify(&poly.quants);
                if var_type_map.is_common_var(&quantified)
                    || var_type_map.is_master_key_var(&quantified)
                {
                    return Err(AnalysisError::PrimaryPolyInvalidUnaryTerm);
                }
                if !var.is_special() {
                    cipher_lone_randoms.update(quantified.clone());
                    var_type_map.expect(&quantified, VarType::CipherLoneRandom, || {
                        AnalysisError::PrimaryPolyInconsistentLoneRandom
                    })?;
                }
                lone_random_terms.push(LoneRandomTerm {
                    random_var: var.clone(),
                    factor: parts.factor,
                });
            }
            [lhs, rhs] => {
                let lhs_q = lhs.quantify(&poly.quants);
                let rhs_q = rhs.quantify(&poly.quants);
                if var_type_map.is_master_key_var(&lhs_q) || var_type_map.is_master_key_var(&rhs_q)
                {
                    return Err(AnalysisError::PrimaryPolyInvalidBinaryTerm);
                }
                let (random_var, common_var) = match (
                    var_type_map.is_common_var(&lhs_q),
                    var_type_map.is_common_var(&rhs_q),
                ) {
                    (true, false) => (rhs.clone(), lhs.clone()),
                    (false, true) => (lhs.clone(), rhs.clone()),
                    _ => return Err(AnalysisError::PrimaryPolyInvalidBinaryTerm),
                };

                if !random_var.is_special() {
                    let quantified = random_var.quantify(&poly.quants);
                    cipher_non_lone_randoms.update(quantified.clone());
                    var_type_map.expect(&quantified, VarType::CipherNonLoneRandom, || {
                        AnalysisError::PrimaryPolyInconsistentNonLoneRandom
                    })?;
                }
                common_terms.push(CommonTerm {
                    random_var,
                    common_var,
                    factor: parts.factor,
                });
            }
            _ => return Err(AnalysisError::PrimaryPolyInvalidTerm),
        }
    }

    Ok(PrimaryCipherPoly {
        name: poly.name.clone(),
        idcs: poly.idcs.clone(),
        quants: poly.quants.clone(),
        group: poly.group,
        lone_random_terms,
        common_terms_plain: common_terms,
        common_terms_hashed: Vec::new(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use abec_dsl::{parse_poly, parse_var};

    fn setup_maps() -> (VarTypeMap, GroupMap) {
        let mut vtm = VarTypeMap::new();
        vtm.insert(
            parse_var("alpha_{l}_[l:AUTHS]").unwrap(),
            VarType::MasterKeyVar,
        )
        .unwrap();
        vtm.insert(parse_var("b_{l}_[l:AUTHS]").unwrap(), VarType::CommonVar)
            .unwrap();
        (vtm, GroupMap::new())
    }

    fn analyze(
        polys: &[Poly],
        vtm: &mut VarTypeMap,
        gm: &mut GroupMap,
    ) -> Result<(Vec<PrimaryCipherPoly>, EquivSet, EquivSet), AnalysisError> {
        let mut lone = EquivSet::new();
        let mut non_lone = EquivSet::new();
        let cps = analyze_primary_cipher_polys(
            AbeVariant::CpAbe,
            vtm,
            gm,
            &mut lone,
            &mut non_lone,
            polys,
        )?;
        Ok((cps, lone, non_lone))
    }

    #[test]
    fn classifies_share_and_common_terms() {
        let (mut vtm, mut gm) = setup_maps();
        let poly =
            parse_poly("(c_{j} : H = <mu>_{j} + s_{j}*b_{j.auth})_[j:LSSS_ROWS]").unwrap();
        let (cps, lone, non_lone) = analyze(&[poly], &mut vtm, &mut gm).unwrap();

        let cp = &cps[0];
        assert_eq!(cp.lone_random_terms.len(), 1);
        assert_eq!(cp.common_terms_plain.len(), 1);
        // <mu> never registers as a random
        assert!(lone.is_empty());
        assert_eq!(non_lone.len(), 1);
        assert_eq!(
            vtm.get(&parse_var("s_{j}_[j:LSSS_ROWS]").unwrap()),
            Some(VarType::CipherNonLoneRandom)
        );
        assert_eq!(gm.get(&cps[0].head()), Some(Group::H));
    }

    #[test]
    fn empty_list_is_error() {
        let (mut vtm, mut gm) = setup_maps();
        assert_eq!(
            analyze(&[], &mut vtm, &mut gm).unwrap_err(),
            AnalysisError::PrimaryPolysEmpty
        );
    }

    #[test]
    fn unary_master_key_term_is_rejected() {
        let (mut vtm, mut gm) = setup_maps();
        let poly = parse_poly("(c_{j} : H = alpha_{j.auth})_[j:LSSS_ROWS]").unwrap();
        assert_eq!(
            analyze(&[poly], &mut vtm, &mut gm).unwrap_err(),
            AnalysisError::PrimaryPolyInvalidUnaryTerm
        );
    }

    #[test]
    fn binary_master_key_operand_is_rejected() {
        let (mut vtm, mut gm) = setup_maps();
        let poly = parse_poly("(c_{j} : H = s_{j}*alpha_{j.auth})_[j:LSSS_ROWS]").unwrap();
        assert_eq!(
            analyze(&[poly], &mut vtm, &mut gm).unwrap_err(),
            AnalysisError::PrimaryPolyInvalidBinaryTerm
        );
    }

    #[test]
    fn keygen_only_quantification_is_rejected() {
        let (mut vtm, mut gm) = setup_maps();
        // user attributes belong to the keygen side of CP-ABE
        let poly = parse_poly("(c_{att} : H = s_{att}*b_{att.auth})_[att:USER_ATTRS]").unwrap();
        assert_eq!(
            analyze(&[poly], &mut vtm, &mut gm).unwrap_err(),
            AnalysisError::PrimaryPolyIllegalQuants
        );
    }

    #[test]
    fn epsilon_in_expression_is_rejected() {
        let (mut vtm, mut gm) = setup_maps();
        let poly = parse_poly("(c_{j} : H = <epsilon>_{j}*s_{j}*b_{j.auth})_[j:LSSS_ROWS]").unwrap();
        assert_eq!(
            analyze(&[poly], &mut vtm, &mut gm).unwrap_err(),
            AnalysisError::PrimaryPolyIllegalSpecialVar
        );
    }

    #[test]
    fn secret_placeholder_stays_unregistered() {
        let (mut vtm, mut gm) = setup_maps();
        let poly = parse_poly("(c_{j} : G = <secret>*b_{j.auth})_[j:LSSS_ROWS]").unwrap();
        let (cps, _, non_lone) = analyze(&[poly], &mut vtm, &mut gm).unwrap();
        assert_eq!(cps[0].common_terms_plain.len(), 1);
        assert!(non_lone.is_empty());
    }

    #[test]
    fn post_analysis_moves_hashed_common_terms() {
        let (mut vtm, mut gm) = setup_maps();
        let poly = parse_poly("(c_{j} : H = s_{j}*b_{j.auth})_[j:LSSS_ROWS]").unwrap();
        let (cps, _, _) = analyze(&[poly], &mut vtm, &mut gm).unwrap();

        let mut fdh = FdhMap::new();
        fdh.insert(parse_var("b_{l}_[l:AUTHS]").unwrap(), 3).unwrap();
        let cps = post_analyze_primary_cipher_polys(cps, &fdh);
        assert!(cps[0].common_terms_plain.is_empty());
        assert_eq!(cps[0].common_terms_hashed.len(), 1);
    }
}
