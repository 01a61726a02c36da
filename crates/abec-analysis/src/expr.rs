//! Expression decomposition.
//!
//! Normalizes an algebraic expression into a sum of product terms: each
//! [`Term`] is a list of [`Coeff`]s, each coefficient being an integer, a
//! symbol, or a reciprocal with a structured denominator (supporting
//! `1/(x - y)`-shaped expressions). The decomposition expands products over
//! sums, folds rational literals, and collects like terms; anything beyond
//! that (genuinely symbolic simplification) is out of scope and rejected.

use num::rational::Rational64;
use num::{One, Zero};

use abec_core::{Expr, Var};

use crate::errors::DecomposeError;

/// A single multiplicative atom: an integer literal or a symbol.
#[derive(Debug, Clone, PartialEq)]
pub enum Atom {
    Int(i64),
    Sym(Var),
}

/// One multiplicative coefficient of a term.
///
/// `num` is the numerator; `denom` is a sum of factor-lists, so the
/// denominator `x - y` is represented as `[[x], [-1, y]]`. An empty `denom`
/// means the coefficient is just its numerator.
#[derive(Debug, Clone, PartialEq)]
pub struct Coeff {
    pub num: Atom,
    pub denom: Vec<Vec<Atom>>,
}

impl Coeff {
    pub fn int(value: i64) -> Coeff {
        Coeff {
            num: Atom::Int(value),
            denom: Vec::new(),
        }
    }

    pub fn sym(var: Var) -> Coeff {
        Coeff {
            num: Atom::Sym(var),
            denom: Vec::new(),
        }
    }

    pub fn reciprocal(denom: Vec<Vec<Atom>>) -> Coeff {
        Coeff {
            num: Atom::Int(1),
            denom,
        }
    }

    pub fn one() -> Coeff {
        Coeff::int(1)
    }

    /// Whether this coefficient is the multiplicative identity.
    pub fn is_one(&self) -> bool {
        self.num == Atom::Int(1) && self.denom.is_empty()
    }
}

/// One additive term: a product of coefficients.
///
/// Equality is multiset-based: two terms are equal when their coefficients
/// match irrespective of order.
#[derive(Debug, Clone)]
pub struct Term {
    pub coeffs: Vec<Coeff>,
}

impl Term {
    pub fn new(coeffs: Vec<Coeff>) -> Term {
        Term { coeffs }
    }

    /// The term `1`, used as the neutral factor of classified terms.
    pub fn unit() -> Term {
        Term::new(vec![Coeff::one()])
    }
}

impl PartialEq for Term {
    fn eq(&self, other: &Self) -> bool {
        let mut todo: Vec<&Coeff> = self.coeffs.iter().collect();
        for coeff in &other.coeffs {
            match todo.iter().position(|candidate| *candidate == coeff) {
                Some(pos) => {
                    todo.remove(pos);
                }
                None => return false,
            }
        }
        todo.is_empty()
    }
}

/// A product of symbols and reciprocals with a folded rational coefficient,
/// the internal sum-of-products normal form.
#[derive(Debug, Clone)]
struct Monomial {
    coeff: Rational64,
    syms: Vec<Var>,
    recips: Vec<Vec<Vec<Atom>>>,
}

impl Monomial {
    fn constant(coeff: Rational64) -> Monomial {
        Monomial {
            coeff,
            syms: Vec::new(),
            recips: Vec::new(),
        }
    }

    fn symbol(var: Var) -> Monomial {
        Monomial {
            coeff: Rational64::one(),
            syms: vec![var],
            recips: Vec::new(),
        }
    }

    fn mul(&self, other: &Monomial) -> Monomial {
        let mut syms = self.syms.clone();
        syms.extend(other.syms.iter().cloned());
        let mut recips = self.recips.clone();
        recips.extend(other.recips.iter().cloned());
        Monomial {
            coeff: self.coeff * other.coeff,
            syms,
            recips,
        }
    }

    /// Multiset comparison of the symbolic parts (coefficient excluded).
    fn same_shape(&self, other: &Monomial) -> bool {
        if self.recips != other.recips || self.syms.len() != other.syms.len() {
            return false;
        }
        let mut todo: Vec<&Var> = self.syms.iter().collect();
        for sym in &other.syms {
            match todo.iter().position(|candidate| *candidate == sym) {
                Some(pos) => {
                    todo.remove(pos);
                }
                None => return false,
            }
        }
        todo.is_empty()
    }
}

/// Decompose an expression into a list of additive terms.
///
/// A fully cancelling expression yields the single term `[0]`.
pub fn decompose(expr: &Expr) -> Result<Vec<Term>, DecomposeError> {
    let monomials = collect(expand(expr)?);
    if monomials.is_empty() {
        return Ok(vec![Term::new(vec![Coeff::int(0)])]);
    }
    Ok(monomials.into_iter().map(monomial_to_term).collect())
}

fn expand(expr: &Expr) -> Result<Vec<Monomial>, DecomposeError> {
    match expr {
        Expr::Literal(value) => Ok(vec![Monomial::constant(Rational64::from_integer(*value))]),
        Expr::Symbol(var) => Ok(vec![Monomial::symbol(var.clone())]),
        Expr::Sum(args) => {
            let mut monomials = Vec::new();
            for arg in args {
                monomials.extend(expand(arg)?);
            }
            Ok(monomials)
        }
        Expr::Product(args) => {
            let mut acc = vec![Monomial::constant(Rational64::one())];
            for arg in args {
                let rhs = expand(arg)?;
                let mut next = Vec::with_capacity(acc.len() * rhs.len());
                for left in &acc {
                    for right in &rhs {
                        next.push(left.mul(right));
                    }
                }
                acc = next;
            }
            Ok(acc)
        }
        Expr::Power(base, exp) => match *exp {
            0 => Ok(vec![Monomial::constant(Rational64::one())]),
            -1 => expand_reciprocal(base),
            e if e > 0 => {
                let base_monomials = expand(base)?;
                let mut acc = vec![Monomial::constant(Rational64::one())];
                for _ in 0..e {
                    let mut next = Vec::with_capacity(acc.len() * base_monomials.len());
                    for left in &acc {
                        for right in &base_monomials {
                            next.push(left.mul(right));
                        }
                    }
                    acc = next;
                }
                Ok(acc)
            }
            _ => Err(DecomposeError::UnsupportedExponent),
        },
        Expr::Reciprocal(inner) => expand_reciprocal(inner),
    }
}

fn expand_reciprocal(inner: &Expr) -> Result<Vec<Monomial>, DecomposeError> {
    let monomials = collect(expand(inner)?);
    if monomials.iter().any(|m| !m.recips.is_empty()) {
        // nested reciprocals are beyond the supported denominator shapes
        return Err(DecomposeError::UnsupportedTerm);
    }

    match monomials.as_slice() {
        [] => Err(DecomposeError::DivisionByZero),
        [single] => {
            if single.coeff.is_zero() {
                return Err(DecomposeError::DivisionByZero);
            }
            // each symbol becomes its own singleton denominator
            let recips = single
                .syms
                .iter()
                .map(|sym| vec![vec![Atom::Sym(sym.clone())]])
                .collect();
            Ok(vec![Monomial {
                coeff: single.coeff.recip(),
                syms: Vec::new(),
                recips,
            }])
        }
        summands => {
            let mut denom = Vec::with_capacity(summands.len());
            for m in summands {
                if !m.coeff.denom().is_one() {
                    return Err(DecomposeError::UnsupportedTerm);
                }
                let numer = *m.coeff.numer();
                let mut factors = Vec::new();
                if numer != 1 || m.syms.is_empty() {
                    factors.push(Atom::Int(numer));
                }
                factors.extend(m.syms.iter().map(|sym| Atom::Sym(sym.clone())));
                denom.push(factors);
            }
            Ok(vec![Monomial {
                coeff: Rational64::one(),
                syms: Vec::new(),
                recips: vec![denom],
            }])
        }
    }
}

/// Collect like terms and drop vanished ones.
fn collect(monomials: Vec<Monomial>) -> Vec<Monomial> {
    let mut collected: Vec<Monomial> = Vec::new();
    for m in monomials {
        match collected.iter_mut().find(|c| c.same_shape(&m)) {
            Some(existing) => existing.coeff += m.coeff,
            None => collected.push(m),
        }
    }
    collected.retain(|m| !m.coeff.is_zero());
    collected
}

fn monomial_to_term(m: Monomial) -> Term {
    let mut coeffs = Vec::new();
    let numer = *m.coeff.numer();
    let denom = *m.coeff.denom();

    if denom == 1 {
        // keep integers merged (sign included); drop a bare factor of 1
        // unless it is the whole term
        if numer != 1 || (m.syms.is_empty() && m.recips.is_empty()) {
            coeffs.push(Coeff::int(numer));
        }
    } else {
        // non-integer rationals split the sign off and carry the integer
        // denominator as a reciprocal coefficient
        if numer < 0 {
            coeffs.push(Coeff::int(-1));
        }
        let magnitude = numer.abs();
        if magnitude != 1 {
            coeffs.push(Coeff::int(magnitude));
        }
        coeffs.push(Coeff::reciprocal(vec![vec![Atom::Int(denom)]]));
    }

    coeffs.extend(m.syms.into_iter().map(Coeff::sym));
    coeffs.extend(m.recips.into_iter().map(Coeff::reciprocal));
    Term::new(coeffs)
}
