//! Full-domain-hash bookkeeping: which variables are produced by a
//! hash-to-group function instead of being sampled.

use crate::equiv::{DuplicateKeyError, EquivMap};
use crate::var::Var;

/// One user-specified FDH declaration: `var # index`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FdhEntry {
    pub var: Var,
    pub idx: u32,
}

/// Records which variables are produced by an FDH.
///
/// Index `0` (the default for absent entries) means *not hashed*; an index
/// `i > 0` means the variable is produced by hash function `i`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FdhMap {
    inner: EquivMap<u32>,
}

impl FdhMap {
    pub fn new() -> Self {
        FdhMap {
            inner: EquivMap::new(),
        }
    }

    pub fn insert(&mut self, var: Var, idx: u32) -> Result<(), DuplicateKeyError> {
        self.inner.insert(var, idx)
    }

    /// The hash-function index for a variable; `0` when not hashed.
    pub fn index_of(&self, var: &Var) -> u32 {
        self.inner.get(var).copied().unwrap_or(0)
    }

    pub fn is_hashed(&self, var: &Var) -> bool {
        self.index_of(var) != 0
    }

    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sets::QSet;
    use crate::var::{Idx, Quant};

    #[test]
    fn absent_vars_are_not_hashed() {
        let map = FdhMap::new();
        let var = Var::new("b", vec![]);
        assert_eq!(map.index_of(&var), 0);
        assert!(!map.is_hashed(&var));
    }

    #[test]
    fn lookup_by_equivalence() {
        let mut map = FdhMap::new();
        map.insert(
            Var::quantified(
                "b",
                vec![Idx::new("att")],
                vec![Quant::new("att", QSet::AttributeUniverse)],
            ),
            2,
        )
        .unwrap();
        let probe = Var::quantified(
            "b",
            vec![Idx::new("a")],
            vec![Quant::new("a", QSet::AttributeUniverse)],
        );
        assert_eq!(map.index_of(&probe), 2);
        assert!(map.is_hashed(&probe));
    }
}
