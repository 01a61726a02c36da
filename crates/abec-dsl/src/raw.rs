//! Raw scheme structures: the parsed but semantically unvalidated form of a
//! scheme document.

use abec_core::{Expr, FdhEntry, Poly, Quant, Var};

/// One entry of the decryption vector: a secondary cipher poly exponentiated
/// with a custom coefficient.
#[derive(Debug, Clone, PartialEq)]
pub struct RawSingle {
    pub entry: Var,
    pub expr: Expr,
    pub quants: Vec<Quant>,
}

/// One entry of the decryption matrix: two quantities to be paired during
/// decryption, exponentiated with a custom coefficient.
#[derive(Debug, Clone, PartialEq)]
pub struct RawPair {
    pub lhs: Var,
    pub rhs: Var,
    pub expr: Expr,
    pub quants: Vec<Quant>,
}

/// A raw scheme just after parsing. No semantic validation has happened:
/// the flat string lists have only been lifted into typed structures.
#[derive(Debug, Clone, PartialEq)]
pub struct RawScheme {
    pub master_key_vars: Vec<Var>,
    pub common_vars: Vec<Var>,
    pub key_polys: Vec<Poly>,
    pub cipher_polys: Vec<Poly>,
    pub e_vec: Vec<RawSingle>,
    pub e_mat: Vec<RawPair>,
    pub fdh_map: Vec<FdhEntry>,
}
