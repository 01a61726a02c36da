//! The `sim` relation.

use crate::var::Var;

/// Determine if two variables (or polynomial heads) are *similar*.
///
/// A coarser, type-oblivious companion of [`crate::equiv`]: same name, same
/// index count, and at each position either both indices are unquantified
/// with identical names, or at least one is quantified. Similarity means "a
/// generated backend could possibly not distinguish the two", so structures
/// required to be unique are checked pairwise against it.
pub fn sim(x: &Var, y: &Var) -> bool {
    if x.name != y.name {
        return false;
    }
    if x.idcs.len() != y.idcs.len() {
        return false;
    }

    for (x_idx, y_idx) in x.idcs.iter().zip(y.idcs.iter()) {
        let x_is_fix = !x_idx.is_quantified(&x.quants);
        let y_is_fix = !y_idx.is_quantified(&y.quants);

        if x_is_fix && y_is_fix && x_idx.name != y_idx.name {
            return false;
        }
    }

    true
}
