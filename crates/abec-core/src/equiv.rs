//! The `equiv` relation and the containers keyed by it.
//!
//! Two variables are *equivalent* when the compiler cannot distinguish them:
//! same name, same index count, and at each position either both indices are
//! unquantified with identical names, or both are quantified with the same
//! resolved type. Equivalence is the identity notion for every container in
//! this module; it is deliberately not keyed on structural equality, since a
//! scheme may spell the same variable with different index names (`a_{i}` for
//! all `i` in `S` versus `a_{k}` for all `k` in `S`).

use thiserror::Error;

use crate::sets::{QSet, QType};
use crate::var::{Quant, Var};

/// Determine if two variables (or polynomial heads) are *equivalent*.
///
/// Attribute-typed and alternate-attribute-typed indices are treated
/// interchangeably. Note the relation is not necessarily transitive: at the
/// first position whose resolved types differ, the comparison short-circuits
/// on attribute-likeness without examining the remaining positions. This
/// mirrors the accumulation behavior the analyzer is built around and is
/// pinned by tests.
pub fn equiv(x: &Var, y: &Var) -> bool {
    if x.name != y.name {
        return false;
    }
    if x.idcs.len() != y.idcs.len() {
        return false;
    }

    for (x_idx, y_idx) in x.idcs.iter().zip(y.idcs.iter()) {
        if x_idx.is_quantified(&x.quants) != y_idx.is_quantified(&y.quants) {
            return false;
        }

        if !x_idx.is_quantified(&x.quants) && x_idx.name != y_idx.name {
            return false;
        }

        let x_type = x_idx.get_type(&x.quants);
        let y_type = y_idx.get_type(&y.quants);
        if x_type != y_type {
            let is_attr = |t: Option<QType>| {
                matches!(t, Some(QType::Attribute) | Some(QType::AltAttr))
            };
            return is_attr(x_type) && is_attr(y_type);
        }
    }

    true
}

/// Error raised when inserting a key that is already (equivalently) present.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("duplicate key '{0}' in equivalence-keyed map")]
pub struct DuplicateKeyError(pub Var);

/// A map keyed by [`equiv`] rather than structural equality.
///
/// Linear-scan on purpose: a scheme has at most a few dozen distinct
/// variables, and no canonical normal form consistent with `equiv`'s
/// type-level equality exists that a hash could be built on.
#[derive(Debug, Clone)]
pub struct EquivMap<V> {
    entries: Vec<(Var, V)>,
}

impl<V> Default for EquivMap<V> {
    fn default() -> Self {
        EquivMap {
            entries: Vec::new(),
        }
    }
}

impl<V> EquivMap<V> {
    pub fn new() -> Self {
        EquivMap::default()
    }

    /// Add a new key-value pair; an equivalent key already being present is
    /// an error.
    pub fn insert(&mut self, key: Var, value: V) -> Result<(), DuplicateKeyError> {
        if self.contains(&key) {
            return Err(DuplicateKeyError(key));
        }
        self.entries.push((key, value));
        Ok(())
    }

    pub fn get(&self, key: &Var) -> Option<&V> {
        self.entries
            .iter()
            .find(|(k, _)| equiv(k, key))
            .map(|(_, v)| v)
    }

    pub fn contains(&self, key: &Var) -> bool {
        self.entries.iter().any(|(k, _)| equiv(k, key))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &(Var, V)> {
        self.entries.iter()
    }

    pub fn keys(&self) -> impl Iterator<Item = &Var> {
        self.entries.iter().map(|(k, _)| k)
    }
}

impl<V: PartialEq> PartialEq for EquivMap<V> {
    /// Semantic equality: mutual inclusion of domains with equal values, not
    /// representation equality.
    fn eq(&self, other: &Self) -> bool {
        self.entries
            .iter()
            .all(|(k, v)| other.get(k) == Some(v))
            && other.entries.iter().all(|(k, v)| self.get(k) == Some(v))
    }
}

/// A set keyed by [`equiv`] rather than structural equality.
#[derive(Debug, Clone, Default)]
pub struct EquivSet {
    elements: Vec<Var>,
}

impl EquivSet {
    pub fn new() -> Self {
        EquivSet {
            elements: Vec::new(),
        }
    }

    pub fn from_elements(elements: impl IntoIterator<Item = Var>) -> Self {
        let mut set = EquivSet::new();
        for el in elements {
            set.add(el);
        }
        set
    }

    pub fn add(&mut self, el: Var) {
        if !self.contains(&el) {
            self.elements.push(el);
        }
    }

    /// Add an element, or widen the colliding entry.
    ///
    /// Repeated insertions of equivalent entries may carry quantifications
    /// whose base sets are not identical but stand in a subset relation
    /// (POS/NEG LSSS-row subsets of the full row set). The existing entry is
    /// then generalized to the full row set.
    pub fn update(&mut self, el: Var) {
        let Some(pos) = self.elements.iter().position(|e| equiv(&el, e)) else {
            self.elements.push(el);
            return;
        };

        let conflict = &self.elements[pos];
        let quants = conflict
            .quants
            .iter()
            .map(|q| {
                let base_set = match q.base_set {
                    QSet::PosLsssRows | QSet::NegLsssRows => QSet::LsssRows,
                    other => other,
                };
                Quant {
                    name: q.name.clone(),
                    base_set,
                    global_map: q.global_map,
                }
            })
            .collect();
        self.elements[pos] = Var {
            name: conflict.name.clone(),
            idcs: conflict.idcs.clone(),
            quants,
        };
    }

    pub fn contains(&self, el: &Var) -> bool {
        self.elements.iter().any(|e| equiv(el, e))
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Var> {
        self.elements.iter()
    }
}

impl<'a> IntoIterator for &'a EquivSet {
    type Item = &'a Var;
    type IntoIter = std::slice::Iter<'a, Var>;

    fn into_iter(self) -> Self::IntoIter {
        self.elements.iter()
    }
}

impl PartialEq for EquivSet {
    /// Semantic equality: each set is a subset of the other.
    fn eq(&self, other: &Self) -> bool {
        self.elements.iter().all(|e| other.contains(e))
            && other.elements.iter().all(|e| self.contains(e))
    }
}
