//! Analysis of key polynomials.

use abec_core::{
    EquivSet, FdhMap, Group, GroupMap, Idx, Poly, Quant, SpecialVar, Var, VarName, VarType,
    VarTypeMap,
};

use crate::errors::AnalysisError;
use crate::expr::decompose;
use crate::terms::{split_term, CommonTerm, LoneRandomTerm, MasterKeyTerm};
use crate::validate;
use crate::variant::AbeVariant;

/// A fully classified key polynomial.
#[derive(Debug, Clone, PartialEq)]
pub struct KeyPoly {
    pub name: VarName,
    pub idcs: Vec<Idx>,
    pub quants: Vec<Quant>,
    pub group: Group,
    pub master_key_terms: Vec<MasterKeyTerm>,
    pub lone_random_terms: Vec<LoneRandomTerm>,
    pub common_terms_plain: Vec<CommonTerm>,
    pub common_terms_random_hashed: Vec<CommonTerm>,
    pub common_terms_common_hashed: Vec<CommonTerm>,
}

impl KeyPoly {
    pub fn head(&self) -> Var {
        Var {
            name: self.name.clone(),
            idcs: self.idcs.clone(),
            quants: self.quants.clone(),
        }
    }
}

/// Analyze the key polys of a scheme.
///
/// Enforces that there is at least one key poly, that all key polys are
/// pairwise non-similar and placed in G or H, that quantifications come from
/// the variant's keygen sets and are fully used, that everything type
/// checks, and that every term is a master-key, lone-random or common term.
/// Key polys and newly discovered random variables register in the
/// `VarTypeMap` with conflict detection.
///
/// All common terms are classified as plain here; FDH reclassification
/// happens in [`post_analyze_key_polys`] once the FDH map is verified.
pub fn analyze_key_polys(
    variant: AbeVariant,
    var_type_map: &mut VarTypeMap,
    group_map: &mut GroupMap,
    key_lone_randoms: &mut EquivSet,
    key_non_lone_randoms: &mut EquivSet,
    raw_polys: &[Poly],
) -> Result<Vec<KeyPoly>, AnalysisError> {
    if raw_polys.is_empty() {
        return Err(AnalysisError::KeyPolysEmpty);
    }
    let heads: Vec<Var> = raw_polys.iter().map(Poly::head).collect();
    if !validate::unique_sim(&heads) {
        return Err(AnalysisError::KeyPolysNonUnique);
    }

    let mut key_polys = Vec::with_capacity(raw_polys.len());
    for poly in raw_polys {
        let kp = analyze_one(
            variant,
            var_type_map,
            group_map,
            key_lone_randoms,
            key_non_lone_randoms,
            poly,
        )?;

        let mut all_vars = vec![poly.head()];
        for t in &kp.master_key_terms {
            all_vars.push(t.master_key_var.quantify(&poly.quants));
        }
        for t in &kp.lone_random_terms {
            all_vars.push(t.random_var.quantify(&poly.quants));
        }
        for t in &kp.common_terms_plain {
            all_vars.push(t.random_var.quantify(&poly.quants));
            all_vars.push(t.common_var.quantify(&poly.quants));
        }
        if !validate::types_check(&all_vars) {
            return Err(AnalysisError::KeyPolyType);
        }
        if !validate::all_quants_occur(&all_vars, &poly.quants) {
            return Err(AnalysisError::KeyPolyUnusedQuants);
        }

        key_polys.push(kp);
    }
    Ok(key_polys)
}

/// Reclassify the common terms of verified key polys against the FDH map.
///
/// A term whose random operand is the identity randomness, or whose random
/// or common operand is hashed, moves to the corresponding hashed list. A
/// term with both operands hashed is uncomputable.
pub fn post_analyze_key_polys(
    mut key_polys: Vec<KeyPoly>,
    fdh_map: &FdhMap,
) -> Result<Vec<KeyPoly>, AnalysisError> {
    for poly in &mut key_polys {
        let quants = poly.quants.clone();
        let is_hashed = |var: &Var| fdh_map.is_hashed(&var.quantify(&quants));

        for term in std::mem::take(&mut poly.common_terms_plain) {
            if term.random_var.special() == Some(SpecialVar::Rgid) {
                if is_hashed(&term.common_var) {
                    return Err(AnalysisError::KeyPolyUncomputableTerm);
                }
                poly.common_terms_random_hashed.push(term);
            } else {
                match (is_hashed(&term.random_var), is_hashed(&term.common_var)) {
                    (false, false) => poly.common_terms_plain.push(term),
                    (true, false) => poly.common_terms_random_hashed.push(term),
                    (false, true) => poly.common_terms_common_hashed.push(term),
                    (true, true) => return Err(AnalysisError::KeyPolyUncomputableTerm),
                }
            }
        }
    }
    Ok(key_polys)
}

fn analyze_one(
    variant: AbeVariant,
    var_type_map: &mut VarTypeMap,
    group_map: &mut GroupMap,
    key_lone_randoms: &mut EquivSet,
    key_non_lone_randoms: &mut EquivSet,
    poly: &Poly,
) -> Result<KeyPoly, AnalysisError> {
    if poly.name.is_special() {
        return Err(AnalysisError::KeyPolyIsSpecial);
    }
    let head = poly.head();
    var_type_map.expect(&head, VarType::KeyPoly, || {
        AnalysisError::KeyPolyInconsistentPoly
    })?;
    if !matches!(poly.group, Group::G | Group::H) {
        return Err(AnalysisError::KeyPolyInvalidGroup);
    }
    group_map
        .assign(&head, poly.group)
        .map_err(|_| AnalysisError::KeyPolyInconsistentPoly)?;
    if !validate::quants_allowed(&[head], variant.allowed_quants_keygen()) {
        return Err(AnalysisError::KeyPolyIllegalQuants);
    }

    let terms = decompose(&poly.expr).map_err(|_| AnalysisError::KeyPolyInvalidExpression)?;

    let mut master_key_terms = Vec::new();
    let mut lone_random_terms = Vec::new();
    let mut common_terms = Vec::new();

    for term in &terms {
        let parts = split_term(
            term,
            |v| !v.is_special() || v.special() == Some(SpecialVar::Rgid),
            &[SpecialVar::Rgid, SpecialVar::XAttr],
            || AnalysisError::KeyPolyIllegalSpecialVar,
        )?;

        match parts.symbols.as_slice() {
            [var] => {
                let quantified = var.quantify(&poly.quants);
                if var_type_map.is_master_key_var(&quantified) {
                    master_key_terms.push(MasterKeyTerm {
                        master_key_var: var.clone(),
                        factor: parts.factor,
                    });
                } else if var_type_map.is_common_var(&quantified) {
                    return Err(AnalysisError::KeyPolyInvalidUnaryTerm);
                } else {
                    key_lone_randoms.update(quantified.clone());
                    var_type_map.expect(&quantified, VarType::KeyLoneRandom, || {
                        AnalysisError::KeyPolyInconsistentLoneRandom
                    })?;
                    lone_random_terms.push(LoneRandomTerm {
                        random_var: var.clone(),
                        factor: parts.factor,
                    });
                }
            }
            [lhs, rhs] => {
                let lhs_common = var_type_map.is_common_var(&lhs.quantify(&poly.quants));
                let rhs_common = var_type_map.is_common_var(&rhs.quantify(&poly.quants));
                let (random_var, common_var) = match (lhs_common, rhs_common) {
                    (true, false) => (rhs.clone(), lhs.clone()),
                    (false, true) => (lhs.clone(), rhs.clone()),
                    _ => return Err(AnalysisError::KeyPolyInvalidBinaryTerm),
                };

                if !random_var.is_special() {
                    let quantified = random_var.quantify(&poly.quants);
                    key_non_lone_randoms.update(quantified.clone());
                    var_type_map.expect(&quantified, VarType::KeyNonLoneRandom, || {
                        AnalysisError::KeyPolyInconsistentNonLoneRandom
                    })?;
                } else if random_var.special() == Some(SpecialVar::Rgid) {
                    // rgid is never sampled; it fixes the poly's own group
                    group_map
                        .assign(&random_var, poly.group)
                        .map_err(|_| AnalysisError::KeyPolyConflictingRgidGroups)?;
                }
                common_terms.push(CommonTerm {
                    random_var,
                    common_var,
                    factor: parts.factor,
                });
            }
            _ => return Err(AnalysisError::KeyPolyInvalidTerm),
        }
    }

    Ok(KeyPoly {
        name: poly.name.clone(),
        idcs: poly.idcs.clone(),
        quants: poly.quants.clone(),
        group: poly.group,
        master_key_terms,
        lone_random_terms,
        common_terms_plain: common_terms,
        common_terms_random_hashed: Vec::new(),
        common_terms_common_hashed: Vec::new(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use abec_core::Expr;
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
        vtm.insert(parse_var("b'_{l}_[l:AUTHS]").unwrap(), VarType::CommonVar)
            .unwrap();
        (vtm, GroupMap::new())
    }

    fn analyze(
        polys: &[Poly],
        vtm: &mut VarTypeMap,
        gm: &mut GroupMap,
    ) -> Result<(Vec<KeyPoly>, EquivSet, EquivSet), AnalysisError> {
        let mut lone = EquivSet::new();
        let mut non_lone = EquivSet::new();
        let kps = analyze_key_polys(AbeVariant::CpAbe, vtm, gm, &mut lone, &mut non_lone, polys)?;
        Ok((kps, lone, non_lone))
    }

    #[test]
    fn classifies_master_rgid_and_random_terms() {
        let (mut vtm, mut gm) = setup_maps();
        let poly = parse_poly(
            "(k_{l} : G = alpha_{l} + <rgid>*b_{l} + r_{l}*b'_{l})_[l:attr_to_auth(USER_ATTRS)]",
        )
        .unwrap();
        let (kps, lone, non_lone) = analyze(&[poly], &mut vtm, &mut gm).unwrap();

        assert_eq!(kps.len(), 1);
        let kp = &kps[0];
        assert_eq!(kp.master_key_terms.len(), 1);
        assert!(kp.lone_random_terms.is_empty());
        // rgid stays a common term until FDH post-analysis
        assert_eq!(kp.common_terms_plain.len(), 2);
        assert!(lone.is_empty());
        assert_eq!(non_lone.len(), 1);
        assert!(non_lone.contains(
            &parse_var("r_{l}_[l:attr_to_auth(USER_ATTRS)]").unwrap()
        ));
        // rgid got the poly's group
        assert_eq!(
            gm.get(&Var::new(VarName::Special(SpecialVar::Rgid), vec![])),
            Some(Group::G)
        );
    }

    #[test]
    fn lone_random_registers() {
        let (mut vtm, mut gm) = setup_maps();
        let poly = parse_poly("(k_{att} : H = u_{att})_[att:USER_ATTRS]").unwrap();
        let (kps, lone, _) = analyze(&[poly], &mut vtm, &mut gm).unwrap();
        assert_eq!(kps[0].lone_random_terms.len(), 1);
        assert_eq!(lone.len(), 1);
        assert_eq!(
            vtm.get(&parse_var("u_{att}_[att:USER_ATTRS]").unwrap()),
            Some(VarType::KeyLoneRandom)
        );
    }

    #[test]
    fn empty_list_is_error() {
        let (mut vtm, mut gm) = setup_maps();
        assert_eq!(
            analyze(&[], &mut vtm, &mut gm).unwrap_err(),
            AnalysisError::KeyPolysEmpty
        );
    }

    #[test]
    fn similar_polys_are_rejected() {
        let (mut vtm, mut gm) = setup_maps();
        let polys = [
            parse_poly("(k_{att} : G = u_{att})_[att:USER_ATTRS]").unwrap(),
            parse_poly("(k_{x} : H = w_{x})_[x:USER_ATTRS]").unwrap(),
        ];
        assert_eq!(
            analyze(&polys, &mut vtm, &mut gm).unwrap_err(),
            AnalysisError::KeyPolysNonUnique
        );
    }

    #[test]
    fn gt_valued_key_poly_is_rejected() {
        let (mut vtm, mut gm) = setup_maps();
        let poly = parse_poly("(k_{att} : Gt = u_{att})_[att:USER_ATTRS]").unwrap();
        assert_eq!(
            analyze(&[poly], &mut vtm, &mut gm).unwrap_err(),
            AnalysisError::KeyPolyInvalidGroup
        );
    }

    #[test]
    fn encrypt_only_quantification_is_rejected() {
        let (mut vtm, mut gm) = setup_maps();
        let poly = parse_poly("(k_{j} : G = u_{j})_[j:NEG_LSSS_ROWS]").unwrap();
        assert_eq!(
            analyze(&[poly], &mut vtm, &mut gm).unwrap_err(),
            AnalysisError::KeyPolyIllegalQuants
        );
    }

    #[test]
    fn unary_common_var_is_rejected() {
        let (mut vtm, mut gm) = setup_maps();
        let poly = parse_poly("(k_{l} : G = b_{l})_[l:attr_to_auth(USER_ATTRS)]").unwrap();
        assert_eq!(
            analyze(&[poly], &mut vtm, &mut gm).unwrap_err(),
            AnalysisError::KeyPolyInvalidUnaryTerm
        );
    }

    #[test]
    fn binary_term_needs_exactly_one_common_var() {
        let (mut vtm, mut gm) = setup_maps();
        let both = parse_poly("(k_{l} : G = b_{l}*b'_{l})_[l:attr_to_auth(USER_ATTRS)]").unwrap();
        assert_eq!(
            analyze(&[both], &mut vtm, &mut gm).unwrap_err(),
            AnalysisError::KeyPolyInvalidBinaryTerm
        );

        let (mut vtm, mut gm) = setup_maps();
        let neither = parse_poly("(k_{att} : G = r_{att}*u_{att})_[att:USER_ATTRS]").unwrap();
        assert_eq!(
            analyze(&[neither], &mut vtm, &mut gm).unwrap_err(),
            AnalysisError::KeyPolyInvalidBinaryTerm
        );
    }

    #[test]
    fn ternary_term_is_rejected() {
        let (mut vtm, mut gm) = setup_maps();
        let poly =
            parse_poly("(k_{att} : G = r_{att}*u_{att}*b_{att.auth})_[att:USER_ATTRS]").unwrap();
        assert_eq!(
            analyze(&[poly], &mut vtm, &mut gm).unwrap_err(),
            AnalysisError::KeyPolyInvalidTerm
        );
    }

    #[test]
    fn unused_quantification_is_rejected() {
        let (mut vtm, mut gm) = setup_maps();
        let poly = parse_poly("(k_{att} : G = u_{att})_[att:USER_ATTRS, lbl:LABELS]").unwrap();
        assert_eq!(
            analyze(&[poly], &mut vtm, &mut gm).unwrap_err(),
            AnalysisError::KeyPolyUnusedQuants
        );
    }

    #[test]
    fn role_conflict_for_random_is_detected() {
        let (mut vtm, mut gm) = setup_maps();
        // alpha is a master key var; using it as the random side of a
        // common term must conflict
        let poly =
            parse_poly("(k_{l} : G = alpha_{l}*b_{l})_[l:attr_to_auth(USER_ATTRS)]").unwrap();
        assert_eq!(
            analyze(&[poly], &mut vtm, &mut gm).unwrap_err(),
            AnalysisError::KeyPolyInconsistentNonLoneRandom
        );
    }

    #[test]
    fn conflicting_rgid_groups_are_detected() {
        let (mut vtm, mut gm) = setup_maps();
        let polys = [
            parse_poly("(k_{l} : G = <rgid>*b_{l})_[l:attr_to_auth(USER_ATTRS)]").unwrap(),
            parse_poly("(kk_{l} : H = <rgid>*b'_{l})_[l:attr_to_auth(USER_ATTRS)]").unwrap(),
        ];
        assert_eq!(
            analyze(&polys, &mut vtm, &mut gm).unwrap_err(),
            AnalysisError::KeyPolyConflictingRgidGroups
        );
    }

    #[test]
    fn special_poly_name_is_rejected() {
        let (mut vtm, mut gm) = setup_maps();
        let poly = Poly::new(
            VarName::Special(SpecialVar::Rgid),
            vec![],
            vec![],
            Expr::sym(Var::new("u", vec![])),
            Group::G,
        );
        assert_eq!(
            analyze(&[poly], &mut vtm, &mut gm).unwrap_err(),
            AnalysisError::KeyPolyIsSpecial
        );
    }

    #[test]
    fn ill_typed_body_var_is_rejected() {
        let (mut vtm, mut gm) = setup_maps();
        // u_{att.attr}: the `attr` conversion needs an LSSS row, not an
        // attribute
        let poly = parse_poly("(k_{att} : G = u_{att.attr})_[att:USER_ATTRS]").unwrap();
        assert_eq!(
            analyze(&[poly], &mut vtm, &mut gm).unwrap_err(),
            AnalysisError::KeyPolyType
        );
    }

    // ---------------------------------------------------------------
    // post-analysis
    // ---------------------------------------------------------------

    fn one_key_poly() -> (Vec<KeyPoly>, VarTypeMap, GroupMap) {
        let (mut vtm, mut gm) = setup_maps();
        let poly = parse_poly(
            "(k_{l} : G = alpha_{l} + <rgid>*b_{l} + r_{l}*b'_{l})_[l:attr_to_auth(USER_ATTRS)]",
        )
        .unwrap();
        let (kps, _, _) = analyze(&[poly], &mut vtm, &mut gm).unwrap();
        (kps, vtm, gm)
    }

    #[test]
    fn post_analysis_moves_rgid_terms() {
        let (kps, _, _) = one_key_poly();
        let kps = post_analyze_key_polys(kps, &FdhMap::new()).unwrap();
        let kp = &kps[0];
        assert_eq!(kp.common_terms_plain.len(), 1);
        assert_eq!(kp.common_terms_random_hashed.len(), 1);
        assert!(kp.common_terms_common_hashed.is_empty());
    }

    #[test]
    fn post_analysis_moves_hashed_common_terms() {
        let (kps, _, _) = one_key_poly();
        let mut fdh = FdhMap::new();
        fdh.insert(
            parse_var("b'_{l}_[l:AUTHS]").unwrap(),
            1,
        )
        .unwrap();
        let kps = post_analyze_key_polys(kps, &fdh).unwrap();
        let kp = &kps[0];
        assert!(kp.common_terms_plain.is_empty());
        assert_eq!(kp.common_terms_random_hashed.len(), 1);
        assert_eq!(kp.common_terms_common_hashed.len(), 1);
    }

    #[test]
    fn post_analysis_rejects_rgid_with_hashed_common_var() {
        let (kps, _, _) = one_key_poly();
        let mut fdh = FdhMap::new();
        fdh.insert(parse_var("b_{l}_[l:AUTHS]").unwrap(), 1).unwrap();
        assert_eq!(
            post_analyze_key_polys(kps, &fdh).unwrap_err(),
            AnalysisError::KeyPolyUncomputableTerm
        );
    }
}
