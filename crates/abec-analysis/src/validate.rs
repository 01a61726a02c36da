//! Validation helpers shared by the analyzer stages.

use indexmap::IndexSet;

use abec_core::{equiv, sim, typecheck, QSet, Quant, Var};

/// No two variables are equivalent.
pub fn unique_equiv(vars: &[Var]) -> bool {
    for (i, v) in vars.iter().enumerate() {
        if vars[i + 1..].iter().any(|w| equiv(v, w)) {
            return false;
        }
    }
    true
}

/// No two variables are similar.
pub fn unique_sim(vars: &[Var]) -> bool {
    for (i, v) in vars.iter().enumerate() {
        if vars[i + 1..].iter().any(|w| sim(v, w)) {
            return false;
        }
    }
    true
}

/// Every quantification ranges over one of the allowed base sets.
pub fn quants_allowed(vars: &[Var], allowed: &[QSet]) -> bool {
    vars.iter()
        .flat_map(|v| v.quants.iter())
        .all(|q| allowed.contains(&q.base_set))
}

/// Every variable's indices type-check under its quantifications.
pub fn types_check(vars: &[Var]) -> bool {
    vars.iter().all(|v| typecheck(&v.idcs, &v.quants).is_empty())
}

/// Every quantification name of a variable is referenced by one of its own
/// indices.
pub fn all_quants_used(vars: &[Var]) -> bool {
    vars.iter().all(|v| {
        let idcs: IndexSet<&str> = v.idcs.iter().map(|i| i.name.as_str()).collect();
        v.quants.iter().all(|q| idcs.contains(q.name.as_str()))
    })
}

/// Every given quantification name occurs in the indices of at least one of
/// the given variables.
pub fn all_quants_occur(vars: &[Var], quants: &[Quant]) -> bool {
    quants.iter().all(|q| {
        vars.iter()
            .any(|v| v.idcs.iter().any(|i| i.name == q.name))
    })
}

/// No variable is a special variable.
pub fn no_specials(vars: &[Var]) -> bool {
    !vars.iter().any(|v| v.is_special())
}
