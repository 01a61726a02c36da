//! Pairing groups and the group-assignment map.

use serde::Serialize;
use std::fmt;
use thiserror::Error;

use crate::equiv::EquivMap;
use crate::var::Var;

/// One of the three pairing-connected groups (bilinear map G x H -> Gt).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Group {
    G,
    H,
    Gt,
}

impl Group {
    /// The "opposite" source group in a pairing.
    ///
    /// Only meaningful for G and H; callers query it after source-group
    /// validation, so a Gt argument is an internal invariant breach.
    pub fn flip(self) -> Group {
        match self {
            Group::G => Group::H,
            Group::H => Group::G,
            Group::Gt => panic!("cannot flip the target group Gt"),
        }
    }

    /// The surface-syntax token for this group.
    pub fn token(self) -> &'static str {
        match self {
            Group::G => "G",
            Group::H => "H",
            Group::Gt => "Gt",
        }
    }

    pub fn from_token(token: &str) -> Option<Self> {
        Some(match token {
            "G" => Group::G,
            "H" => Group::H,
            "Gt" => Group::Gt,
            _ => return None,
        })
    }
}

impl fmt::Display for Group {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.token())
    }
}

/// Error raised when a variable would be placed in two different groups.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("conflicting group assignment for '{var}': {existing} vs {requested}")]
pub struct GroupConflictError {
    pub var: Var,
    pub existing: Group,
    pub requested: Group,
}

/// Records which group each variable or polynomial lives in.
///
/// Filled incrementally: explicit assignments during polynomial analysis,
/// inferred assignments during group-map completion. Looking up an
/// unassigned variable yields `None`, not an error. Re-asserting an existing
/// assignment is a no-op; a conflicting assignment is a hard error.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GroupMap {
    inner: EquivMap<Group>,
}

impl GroupMap {
    pub fn new() -> Self {
        GroupMap {
            inner: EquivMap::new(),
        }
    }

    pub fn assign(&mut self, var: &Var, group: Group) -> Result<(), GroupConflictError> {
        if let Some(existing) = self.inner.get(var) {
            if *existing != group {
                return Err(GroupConflictError {
                    var: var.clone(),
                    existing: *existing,
                    requested: group,
                });
            }
            return Ok(());
        }
        self.inner
            .insert(var.clone(), group)
            .expect("absence was just checked");
        Ok(())
    }

    pub fn get(&self, var: &Var) -> Option<Group> {
        self.inner.get(var).copied()
    }

    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }
}
