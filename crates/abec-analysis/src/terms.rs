//! Classified summands of analyzed polynomials, and the shared splitting of
//! decomposed terms into coefficient and symbol parts.

use abec_core::{SpecialVar, Var};

use crate::expr::{Atom, Coeff, Term};

/// A summand consisting of a master-key variable and a coefficient.
#[derive(Debug, Clone, PartialEq)]
pub struct MasterKeyTerm {
    pub master_key_var: Var,
    pub factor: Term,
}

/// A summand consisting of a lone random variable and a coefficient.
#[derive(Debug, Clone, PartialEq)]
pub struct LoneRandomTerm {
    pub random_var: Var,
    pub factor: Term,
}

/// A summand consisting of a special-lone random variable and a coefficient.
#[derive(Debug, Clone, PartialEq)]
pub struct SpecialLoneRandomTerm {
    pub random_var: Var,
    pub factor: Term,
}

/// A summand multiplying a non-lone random variable with a common variable.
#[derive(Debug, Clone, PartialEq)]
pub struct CommonTerm {
    pub random_var: Var,
    pub common_var: Var,
    pub factor: Term,
}

/// A summand multiplying a non-lone random variable with a master-key
/// variable.
#[derive(Debug, Clone, PartialEq)]
pub struct MasterKeyProductTerm {
    pub random_var: Var,
    pub master_key_var: Var,
    pub factor: Term,
}

/// A decomposed term split into its proper variables and its coefficient.
pub(crate) struct TermParts {
    /// The product of all non-variable coefficients (integers, reciprocals,
    /// coefficient-only specials); the unit term when there are none.
    pub factor: Term,
    /// The variables the term is classified by.
    pub symbols: Vec<Var>,
}

/// Split a term's coefficients into proper variables and coefficient parts.
///
/// `is_symbolic` decides which variables count as classification operands;
/// the remaining special variables are coefficient material and must come
/// from `allowed_specials`.
pub(crate) fn split_term<E>(
    term: &Term,
    is_symbolic: impl Fn(&Var) -> bool,
    allowed_specials: &[SpecialVar],
    on_illegal_special: impl Fn() -> E,
) -> Result<TermParts, E> {
    let mut nums: Vec<Coeff> = Vec::new();
    let mut specials: Vec<Coeff> = Vec::new();
    let mut symbols: Vec<Var> = Vec::new();

    for coeff in &term.coeffs {
        match &coeff.num {
            Atom::Int(_) => nums.push(coeff.clone()),
            Atom::Sym(var) => {
                if is_symbolic(var) {
                    symbols.push(var.clone());
                } else {
                    match var.special() {
                        Some(kind) if allowed_specials.contains(&kind) => {
                            specials.push(coeff.clone());
                        }
                        _ => return Err(on_illegal_special()),
                    }
                }
            }
        }
    }

    nums.extend(specials);
    let factor = if nums.is_empty() {
        Term::unit()
    } else {
        Term::new(nums)
    };
    Ok(TermParts { factor, symbols })
}
