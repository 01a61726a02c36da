//! Index type-checking against quantifications.

use crate::sets::{IMap, QMap, QSet};
use crate::var::{Idx, Quant};

/// A type error between an index and a set of quantifications.
///
/// Carries the components that failed to compose so error output can point
/// at the offending base set and maps.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdxTypeError {
    pub qset: Option<QSet>,
    pub global_map: Option<QMap>,
    pub local_map: Option<IMap>,
}

/// Type-check a list of indices under the given quantifications, collecting
/// one error per ill-typed index.
pub fn typecheck(idcs: &[Idx], quants: &[Quant]) -> Vec<IdxTypeError> {
    idcs.iter()
        .filter_map(|idx| typecheck_idx(idx, quants))
        .collect()
}

/// Type-check a single index under the given quantifications.
///
/// Checks that `local_map(global_map(base_set))` is well typed, with the
/// identity function standing in for an absent map. An unquantified,
/// unmapped index always type-checks; an unquantified index carrying a local
/// map does not (there is no value to map). Quantifications not affecting
/// the index are not inspected.
///
/// Panics if the index is quantified more than once; the analyzer validates
/// quantification lists before any index is checked.
pub fn typecheck_idx(idx: &Idx, quants: &[Quant]) -> Option<IdxTypeError> {
    let matching: Vec<&Quant> = quants.iter().filter(|q| q.name == idx.name).collect();
    let quant = match matching.as_slice() {
        [] => {
            return idx.local_map.map(|local_map| IdxTypeError {
                qset: None,
                global_map: None,
                local_map: Some(local_map),
            });
        }
        [q] => q,
        _ => panic!("quantification of index '{}' is ambiguous", idx.name),
    };

    let qset = quant.base_set;
    let global_map = quant.global_map;
    let local_map = idx.local_map;

    let mut curr_type = qset.element_type();
    if let Some(map) = global_map {
        if curr_type != map.domain_type() {
            return Some(IdxTypeError {
                qset: Some(qset),
                global_map,
                local_map,
            });
        }
        curr_type = map.codomain_type();
    }

    if let Some(map) = local_map {
        if !map.allowed_domain_types().contains(&curr_type) {
            return Some(IdxTypeError {
                qset: Some(qset),
                global_map,
                local_map,
            });
        }
    }

    None
}
