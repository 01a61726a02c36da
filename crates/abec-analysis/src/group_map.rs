//! Group-map inference: completes the group assignment of every variable
//! that is only implicitly placed in a group.

use abec_core::{equiv, EquivSet, FdhMap, Group, GroupMap, Var};
use abec_dsl::RawPair;

use crate::errors::AnalysisError;
use crate::key_poly::KeyPoly;
use crate::primary_poly::PrimaryCipherPoly;

/// Complete the group map of a scheme.
///
/// Four ordered passes:
/// 1. each common var takes the (consistent) group of every primary poly
///    referencing it;
/// 2. each key non-lone random takes the flipped group of its unique
///    decryption-pairing partner;
/// 3. likewise each cipher non-lone random;
/// 4. all polys sharing a hashed common var must sit in one group, and a
///    key poly's hashed-random common term must match the poly's own group.
pub fn analyze_group_map(
    group_map: &mut GroupMap,
    fdh_map: &FdhMap,
    key_polys: &[KeyPoly],
    cipher_primaries: &[PrimaryCipherPoly],
    common_vars: &[Var],
    key_non_lone_randoms: &EquivSet,
    cipher_non_lone_randoms: &EquivSet,
    pairs: &[RawPair],
) -> Result<(), AnalysisError> {
    for cv in common_vars {
        let mut groups = Vec::new();
        for cp in cipher_primaries {
            for term in cp
                .common_terms_plain
                .iter()
                .chain(cp.common_terms_hashed.iter())
            {
                if equiv(&term.common_var.quantify(&cp.quants), cv) {
                    groups.push(cp.group);
                }
            }
        }
        let Some(&first) = groups.first() else {
            return Err(AnalysisError::GroupMapUnusedCommonVar);
        };
        if groups.iter().any(|g| *g != first) {
            return Err(AnalysisError::GroupMapConflictingCommonVarGroups);
        }
        group_map
            .assign(cv, first)
            .map_err(|_| AnalysisError::GroupMapConflictingCommonVarGroups)?;
    }

    for nlr in key_non_lone_randoms {
        assign_opposite_group(
            nlr,
            pairs,
            group_map,
            AnalysisError::GroupMapMissingKeyRandomPartner,
            AnalysisError::GroupMapConflictingKeyRandomPartners,
        )?;
    }

    for nlr in cipher_non_lone_randoms {
        assign_opposite_group(
            nlr,
            pairs,
            group_map,
            AnalysisError::GroupMapMissingCipherRandomPartner,
            AnalysisError::GroupMapConflictingCipherRandomPartners,
        )?;
    }

    for cv in common_vars.iter().filter(|cv| fdh_map.is_hashed(cv)) {
        let key_users = key_polys
            .iter()
            .filter(|p| {
                p.common_terms_common_hashed
                    .iter()
                    .any(|t| equiv(&t.common_var.quantify(&p.quants), cv))
            })
            .map(|p| group_map.get(&p.head()));
        let cipher_users = cipher_primaries
            .iter()
            .filter(|p| {
                p.common_terms_hashed
                    .iter()
                    .any(|t| equiv(&t.common_var.quantify(&p.quants), cv))
            })
            .map(|p| group_map.get(&p.head()));

        let groups: Vec<Option<Group>> = key_users.chain(cipher_users).collect();
        if let Some(first) = groups.first() {
            if groups.iter().any(|g| g != first) {
                return Err(AnalysisError::GroupMapConflictingHashedCommonVarGroups);
            }
        }
    }

    for kp in key_polys {
        for term in &kp.common_terms_random_hashed {
            if group_map.get(&term.random_var.quantify(&kp.quants)) != Some(kp.group) {
                return Err(AnalysisError::GroupMapConflictingHashedKeyRandomGroups);
            }
        }
    }

    Ok(())
}

fn find_all_partners(var: &Var, pairs: &[RawPair]) -> Result<Vec<Var>, AnalysisError> {
    let mut partners = Vec::new();
    for pair in pairs {
        let lhs = pair.lhs.quantify(&pair.quants);
        let rhs = pair.rhs.quantify(&pair.quants);
        match (equiv(var, &lhs), equiv(var, &rhs)) {
            (true, true) => return Err(AnalysisError::GroupMapSelfPairing),
            (true, false) => partners.push(rhs),
            (false, true) => partners.push(lhs),
            (false, false) => {}
        }
    }
    Ok(partners)
}

fn assign_opposite_group(
    var: &Var,
    pairs: &[RawPair],
    group_map: &mut GroupMap,
    on_missing: AnalysisError,
    on_conflict: AnalysisError,
) -> Result<(), AnalysisError> {
    let partners = find_all_partners(var, pairs)?;
    let groups: Vec<Option<Group>> = partners.iter().map(|p| group_map.get(p)).collect();
    let Some(&first) = groups.first() else {
        return Err(on_missing);
    };
    let Some(first) = first else {
        // a partner the earlier stages never placed cannot determine a group
        return Err(on_missing);
    };
    if groups.iter().any(|g| *g != Some(first)) {
        return Err(on_conflict);
    }
    group_map.assign(var, first.flip()).map_err(|_| on_conflict)
}
