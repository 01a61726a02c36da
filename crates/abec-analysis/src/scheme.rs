//! The scheme analyzer pipeline: a fixed linear order of stages turning a
//! raw scheme into a fully classified [`Scheme`], or the first violation
//! found.

use tracing::debug;

use abec_core::{EquivSet, FdhMap, Group, GroupMap, Poly, Var, VarName, VarTypeMap};
use abec_dsl::RawScheme;

use crate::blinding_poly::{analyze_blinding_poly, BlindingPoly};
use crate::common_vars::analyze_common_vars;
use crate::errors::AnalysisError;
use crate::fdh_map::analyze_fdh_map;
use crate::group_map::analyze_group_map;
use crate::key_poly::{analyze_key_polys, post_analyze_key_polys, KeyPoly};
use crate::master_keys::analyze_master_key_vars;
use crate::pair::{analyze_pairs, Pair};
use crate::primary_poly::{
    analyze_primary_cipher_polys, post_analyze_primary_cipher_polys, PrimaryCipherPoly,
};
use crate::secondary_poly::{
    analyze_secondary_cipher_polys, SecondaryCipherPoly, BLINDING_POLY_NAME,
};
use crate::single::{analyze_singles, Single};
use crate::variant::{analyze_variant, AbeVariant};

/// The terminal artifact of analysis: every variable classified, every
/// polynomial annotated, every implicit assignment inferred.
#[derive(Debug, Clone)]
pub struct Scheme {
    pub variant: AbeVariant,

    pub master_key_vars: Vec<Var>,
    pub common_vars: Vec<Var>,

    pub key_polys: Vec<KeyPoly>,
    pub key_lone_randoms: EquivSet,
    pub key_non_lone_randoms: EquivSet,

    pub cipher_primaries: Vec<PrimaryCipherPoly>,
    pub cipher_secondaries: Vec<SecondaryCipherPoly>,
    pub cipher_blinding: BlindingPoly,
    pub cipher_lone_randoms: EquivSet,
    pub cipher_special_lone_randoms: EquivSet,
    pub cipher_non_lone_randoms: EquivSet,

    pub dec_singles: Vec<Single>,
    pub dec_pairs: Vec<Pair>,

    pub group_map: GroupMap,
    pub fdh_map: FdhMap,
    pub var_type_map: VarTypeMap,
}

/// Run the full analysis pipeline over a raw scheme.
///
/// Stages run strictly in order: variant detection, master-key vars,
/// common vars, key polys, cipher polys (primary, secondary, blinding), FDH
/// map, FDH post-analysis, group-map inference, decryption singles and
/// pairs. The first violation aborts the compilation; no partial `Scheme`
/// is ever returned.
pub fn analyze_scheme(raw: &RawScheme) -> Result<Scheme, AnalysisError> {
    let variant = analyze_variant(
        raw.key_polys.iter().flat_map(|p| p.quants.iter()),
        raw.cipher_polys.iter().flat_map(|p| p.quants.iter()),
    )?;
    debug!(?variant, "detected scheme variant");

    let mut var_type_map = VarTypeMap::new();

    let master_key_vars = analyze_master_key_vars(&mut var_type_map, &raw.master_key_vars)?;
    let common_vars = analyze_common_vars(&mut var_type_map, &raw.common_vars)?;
    debug!(
        master_keys = master_key_vars.len(),
        common = common_vars.len(),
        "classified scheme variables"
    );

    let mut group_map = GroupMap::new();

    let mut key_lone_randoms = EquivSet::new();
    let mut key_non_lone_randoms = EquivSet::new();
    let key_polys = analyze_key_polys(
        variant,
        &mut var_type_map,
        &mut group_map,
        &mut key_lone_randoms,
        &mut key_non_lone_randoms,
        &raw.key_polys,
    )?;

    let (primaries, secondaries, blindings) = categorize_cipher_polys(&raw.cipher_polys);

    let mut cipher_lone_randoms = EquivSet::new();
    let mut cipher_non_lone_randoms = EquivSet::new();
    let mut cipher_special_lone_randoms = EquivSet::new();
    let cipher_primaries = analyze_primary_cipher_polys(
        variant,
        &mut var_type_map,
        &mut group_map,
        &mut cipher_lone_randoms,
        &mut cipher_non_lone_randoms,
        &primaries,
    )?;
    let cipher_secondaries = analyze_secondary_cipher_polys(
        variant,
        &mut var_type_map,
        &mut cipher_non_lone_randoms,
        &mut cipher_special_lone_randoms,
        &secondaries,
    )?;
    let cipher_blinding = analyze_blinding_poly(
        &mut var_type_map,
        &mut cipher_non_lone_randoms,
        &mut cipher_special_lone_randoms,
        &blindings,
    )?;
    debug!(
        key = key_polys.len(),
        primary = cipher_primaries.len(),
        secondary = cipher_secondaries.len(),
        "classified polynomials"
    );

    let fdh_map = analyze_fdh_map(&var_type_map, &raw.fdh_map)?;
    let key_polys = post_analyze_key_polys(key_polys, &fdh_map)?;
    let cipher_primaries = post_analyze_primary_cipher_polys(cipher_primaries, &fdh_map);

    analyze_group_map(
        &mut group_map,
        &fdh_map,
        &key_polys,
        &cipher_primaries,
        &common_vars,
        &key_non_lone_randoms,
        &cipher_non_lone_randoms,
        &raw.e_mat,
    )?;

    let dec_singles = analyze_singles(&var_type_map, &raw.e_vec)?;
    let dec_pairs = analyze_pairs(&var_type_map, &group_map, &raw.e_mat)?;
    debug!(
        singles = dec_singles.len(),
        pairs = dec_pairs.len(),
        "analysis complete"
    );

    Ok(Scheme {
        variant,
        master_key_vars,
        common_vars,
        key_polys,
        key_lone_randoms,
        key_non_lone_randoms,
        cipher_primaries,
        cipher_secondaries,
        cipher_blinding,
        cipher_lone_randoms,
        cipher_special_lone_randoms,
        cipher_non_lone_randoms,
        dec_singles,
        dec_pairs,
        group_map,
        fdh_map,
        var_type_map,
    })
}

/// Partition cipher polys into primaries (G/H), secondaries (Gt, not the
/// blinding name) and blinding candidates (the reserved name, any group).
fn categorize_cipher_polys(raw_polys: &[Poly]) -> (Vec<Poly>, Vec<Poly>, Vec<Poly>) {
    let blinding_name = VarName::named(BLINDING_POLY_NAME);
    let primaries = raw_polys
        .iter()
        .filter(|p| matches!(p.group, Group::G | Group::H))
        .cloned()
        .collect();
    let secondaries = raw_polys
        .iter()
        .filter(|p| p.group == Group::Gt && p.name != blinding_name)
        .cloned()
        .collect();
    let blindings = raw_polys
        .iter()
        .filter(|p| p.name == blinding_name)
        .cloned()
        .collect();
    (primaries, secondaries, blindings)
}

#[cfg(test)]
mod tests {
    use super::*;
    use abec_core::Group;
    use abec_dsl::parse_json;

    /// A decentralized CP-ABE scheme exercising every classification the
    /// analyzer knows: master keys and common vars per authority, key polys
    /// with rgid and non-lone randoms, primary/secondary cipher polys and
    /// the blinding poly, plus a full decryption recipe.
    const SCHEME: &str = r#"
    {
        "meta": {},
        "spec": {
            "master_key_vars": [
                "alpha_{l}_[l:AUTHS]"
            ],
            "common_vars": [
                "b_{l}_[l:AUTHS]",
                "b'_{l}_[l:AUTHS]",
                "b_{1, att}_[att:ATTR_UNI]"
            ],
            "key_polys": [
                "(k_{1, l} : G = alpha_{l} + <rgid>*b_{l} + r_{l}*b'_{l})_[l:attr_to_auth(USER_ATTRS)]",
                "(k_{2, att} : G = r_{att.auth}*b_{1, att})_[att:USER_ATTRS]"
            ],
            "cipher_polys": [
                "cm : Gt = <secret>",
                "(c_{1, j} : H = <mu>_{j} + s_{1, j}*b_{j.auth})_[j:LSSS_ROWS]",
                "(c_{2, j} : H = s_{1, j}*b'_{j.auth} + s_{2, j.dedup}*b_{1, j.attr})_[j:LSSS_ROWS]",
                "(c'_{j} : Gt = <lambda>_{j} + alpha_{j.auth}*s_{1, j})_[j:LSSS_ROWS]"
            ],
            "e_vec": [
                "(c'_{j} = <epsilon>_{j})_[j:LIN_COMB]"
            ],
            "e_mat": [
                "(s_{2, j.dedup} ~ k_{2, j.attr} = -<epsilon>_{j})_[j:LIN_COMB]",
                "(s_{1, j} ~ k_{1, j.auth} = -<epsilon>_{j})_[j:LIN_COMB]",
                "(c_{1, j} ~ <rgid> = <epsilon>_{j})_[j:LIN_COMB]",
                "(c_{2, j} ~ r_{j.auth} = <epsilon>_{j})_[j:LIN_COMB]"
            ],
            "fdh_map": []
        }
    }"#;

    #[test]
    fn analyzes_decentralized_cp_abe() {
        let raw = parse_json(SCHEME).unwrap();
        let scheme = analyze_scheme(&raw).unwrap();

        assert_eq!(scheme.variant, AbeVariant::CpAbe);
        assert_eq!(scheme.master_key_vars.len(), 1);
        assert_eq!(scheme.common_vars.len(), 3);
        assert_eq!(scheme.key_polys.len(), 2);
        assert_eq!(scheme.cipher_primaries.len(), 2);
        assert_eq!(scheme.cipher_secondaries.len(), 1);
        assert_eq!(scheme.dec_singles.len(), 1);
        assert_eq!(scheme.dec_pairs.len(), 4);

        // rgid terms moved to the random-hashed list of the first key poly
        assert_eq!(scheme.key_polys[0].common_terms_random_hashed.len(), 1);
        assert_eq!(scheme.key_polys[0].common_terms_plain.len(), 1);

        // randoms: r on the key side, s1/s2 on the cipher side
        assert_eq!(scheme.key_non_lone_randoms.len(), 1);
        assert!(scheme.key_lone_randoms.is_empty());
        assert_eq!(scheme.cipher_non_lone_randoms.len(), 2);
        assert_eq!(scheme.cipher_special_lone_randoms.len(), 0);

        // the common vars follow the H-valued primaries, the randoms flip
        let b = abec_dsl::parse_var("b_{l}_[l:AUTHS]").unwrap();
        assert_eq!(scheme.group_map.get(&b), Some(Group::H));
        let r = abec_dsl::parse_var("r_{l}_[l:attr_to_auth(USER_ATTRS)]").unwrap();
        assert_eq!(scheme.group_map.get(&r), Some(Group::G));
        let s1 = abec_dsl::parse_var("s_{1, j}_[j:LSSS_ROWS]").unwrap();
        assert_eq!(scheme.group_map.get(&s1), Some(Group::H));
    }

    #[test]
    fn pairs_are_normalized_g_first() {
        let raw = parse_json(SCHEME).unwrap();
        let scheme = analyze_scheme(&raw).unwrap();
        // "(s_{1, j} ~ k_{1, j.auth})": the key poly k is in G, s in H
        let pair = &scheme.dec_pairs[1];
        assert_eq!(pair.arg_g, abec_dsl::parse_var("k_{1, j.auth}").unwrap());
        assert_eq!(pair.arg_h, abec_dsl::parse_var("s_{1, j}").unwrap());
    }

    #[test]
    fn key_poly_over_encrypt_only_set_breaks_variant_detection() {
        let raw = parse_json(
            &SCHEME.replace("_[l:attr_to_auth(USER_ATTRS)]", "_[l:ls_row_to_auth(NEG_LSSS_ROWS)]"),
        )
        .unwrap();
        assert_eq!(
            analyze_scheme(&raw).unwrap_err(),
            AnalysisError::VariantContradictory
        );
    }

    #[test]
    fn blinding_poly_is_required() {
        let raw = parse_json(&SCHEME.replace("\"cm : Gt = <secret>\",", "")).unwrap();
        assert_eq!(
            analyze_scheme(&raw).unwrap_err(),
            AnalysisError::BlindingPolyMissing
        );
    }
}
