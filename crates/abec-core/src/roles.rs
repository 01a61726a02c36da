//! Structural roles of scheme variables and the role-assignment map.

use serde::Serialize;
use std::fmt;

use crate::equiv::{DuplicateKeyError, EquivMap};
use crate::var::Var;

/// The structural role a variable plays in a scheme.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum VarType {
    MasterKeyVar,
    CommonVar,
    KeyLoneRandom,
    KeyNonLoneRandom,
    KeyPoly,
    CipherLoneRandom,
    CipherNonLoneRandom,
    CipherSpecialLoneRandom,
    CipherPrimaryPoly,
    CipherSecondaryPoly,
    CipherBlindingPoly,
}

impl fmt::Display for VarType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            VarType::MasterKeyVar => "master-key var",
            VarType::CommonVar => "common var",
            VarType::KeyLoneRandom => "key lone random",
            VarType::KeyNonLoneRandom => "key non-lone random",
            VarType::KeyPoly => "key poly",
            VarType::CipherLoneRandom => "cipher lone random",
            VarType::CipherNonLoneRandom => "cipher non-lone random",
            VarType::CipherSpecialLoneRandom => "cipher special-lone random",
            VarType::CipherPrimaryPoly => "primary cipher poly",
            VarType::CipherSecondaryPoly => "secondary cipher poly",
            VarType::CipherBlindingPoly => "blinding poly",
        };
        f.write_str(name)
    }
}

/// Records the structural role of every classified variable.
///
/// Invariant: one role per equivalence class per compilation. Re-asserting
/// the same role is a no-op; asserting a different role is a hard error
/// surfaced through [`VarTypeMap::expect`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct VarTypeMap {
    inner: EquivMap<VarType>,
}

impl VarTypeMap {
    pub fn new() -> Self {
        VarTypeMap {
            inner: EquivMap::new(),
        }
    }

    pub fn insert(&mut self, var: Var, ty: VarType) -> Result<(), DuplicateKeyError> {
        self.inner.insert(var, ty)
    }

    pub fn get(&self, var: &Var) -> Option<VarType> {
        self.inner.get(var).copied()
    }

    /// Whether the given var is equivalent to a known master-key variable.
    pub fn is_master_key_var(&self, candidate: &Var) -> bool {
        self.get(candidate) == Some(VarType::MasterKeyVar)
    }

    /// Whether the given var is equivalent to a known common variable.
    pub fn is_common_var(&self, candidate: &Var) -> bool {
        self.get(candidate) == Some(VarType::CommonVar)
    }

    /// Assert a role for a variable if conflict-free.
    ///
    /// Absent: the pair is added. Present with the same role: no-op.
    /// Present with a different role: the caller-supplied error is returned.
    pub fn expect<E>(
        &mut self,
        var: &Var,
        expected: VarType,
        on_conflict: impl FnOnce() -> E,
    ) -> Result<(), E> {
        match self.get(var) {
            Some(current) if current != expected => Err(on_conflict()),
            Some(_) => Ok(()),
            None => {
                self.inner
                    .insert(var.clone(), expected)
                    .expect("absence was just checked");
                Ok(())
            }
        }
    }

    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }
}
