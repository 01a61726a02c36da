#![doc = include_str!("../README.md")]

pub mod errors;
pub mod parser;
pub mod raw;

pub use errors::ParseError;
pub use parser::{
    parse_fdh_entry, parse_json, parse_matrix_entry, parse_poly, parse_var, parse_vector_entry,
};
pub use raw::{RawPair, RawScheme, RawSingle};
