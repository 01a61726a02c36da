#![doc = include_str!("../README.md")]

pub mod blinding_poly;
pub mod common_vars;
pub mod errors;
pub mod expr;
pub mod fdh_map;
pub mod group_map;
pub mod key_poly;
pub mod master_keys;
pub mod pair;
pub mod primary_poly;
pub mod scheme;
pub mod secondary_poly;
pub mod single;
pub mod terms;
pub mod validate;
pub mod variant;

pub use errors::{AnalysisError, DecomposeError};
pub use expr::{decompose, Atom, Coeff, Term};
pub use scheme::{analyze_scheme, Scheme};
pub use variant::AbeVariant;
