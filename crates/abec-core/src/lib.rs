#![doc = include_str!("../README.md")]

//! The core data model of the abec compiler.
//!
//! This crate defines the entities an ABE scheme specification is made of
//! (variables, indices, quantifications, polynomials, expressions), the
//! closed vocabularies they range over (domain sets, element types, mapping
//! functions, pairing groups), and the variable algebra the analyzer is built
//! on: the `equiv`/`sim` relations, the containers keyed by them, and index
//! type-checking.

pub mod equiv;
pub mod expr;
pub mod fdh;
pub mod group;
pub mod poly;
pub mod roles;
pub mod sets;
pub mod sim;
pub mod typecheck;
pub mod var;

pub use equiv::{equiv, DuplicateKeyError, EquivMap, EquivSet};
pub use expr::Expr;
pub use fdh::{FdhEntry, FdhMap};
pub use group::{Group, GroupMap};
pub use poly::Poly;
pub use roles::{VarType, VarTypeMap};
pub use sets::{IMap, QMap, QSet, QType};
pub use sim::sim;
pub use typecheck::{typecheck, typecheck_idx, IdxTypeError};
pub use var::{Idx, Quant, SpecialVar, Var, VarName};
