//! Polynomials: named, indexed, quantified quantities placed in a group.

use crate::expr::Expr;
use crate::group::Group;
use crate::var::{Idx, Quant, Var, VarName};

/// A polynomial of the scheme: a (possibly indexed and quantified) head, the
/// target pairing group, and the defining algebraic expression.
#[derive(Debug, Clone, PartialEq)]
pub struct Poly {
    pub name: VarName,
    pub idcs: Vec<Idx>,
    pub quants: Vec<Quant>,
    pub expr: Expr,
    pub group: Group,
}

impl Poly {
    pub fn new(
        name: impl Into<VarName>,
        idcs: Vec<Idx>,
        quants: Vec<Quant>,
        expr: Expr,
        group: Group,
    ) -> Self {
        Poly {
            name: name.into(),
            idcs,
            quants,
            expr,
            group,
        }
    }

    /// The polynomial's head as a variable, for `equiv`/`sim` comparisons
    /// and container keys.
    pub fn head(&self) -> Var {
        Var {
            name: self.name.clone(),
            idcs: self.idcs.clone(),
            quants: self.quants.clone(),
        }
    }
}
