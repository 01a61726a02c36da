//! Analysis of decryption "pairs": the two-sided pairing products applied
//! during decryption.

use abec_core::{Group, GroupMap, Quant, SpecialVar, Var, VarType, VarTypeMap};
use abec_dsl::RawPair;

use crate::errors::AnalysisError;
use crate::expr::{decompose, Atom, Term};
use crate::validate;

/// One analyzed decryption pair, normalized so the G-valued operand comes
/// first.
#[derive(Debug, Clone, PartialEq)]
pub struct Pair {
    pub arg_g: Var,
    pub arg_h: Var,
    pub terms: Vec<Term>,
    pub quants: Vec<Quant>,
}

/// Analyze the pairs of a scheme.
///
/// Enforces that the exponent expression decomposes, that the operands form
/// one of the two permitted role combinations ({key non-lone random,
/// primary cipher poly} or {key poly, cipher non-lone random}) in opposite
/// source groups, that everything type checks and every quantification is
/// used, and that only the permitted special symbols appear. The operand
/// order is normalized to G first.
pub fn analyze_pairs(
    var_type_map: &VarTypeMap,
    group_map: &GroupMap,
    raw_pairs: &[RawPair],
) -> Result<Vec<Pair>, AnalysisError> {
    let allowed_specials = [SpecialVar::Rgid, SpecialVar::Epsilon, SpecialVar::Secret];

    let mut pairs = Vec::with_capacity(raw_pairs.len());
    for raw in raw_pairs {
        let terms = decompose(&raw.expr).map_err(|_| AnalysisError::PairInvalidExpression)?;

        let (arg_g, arg_h) = normalize_pair(raw, group_map)?;
        validate_operand_kinds(var_type_map, &arg_g, &arg_h, &raw.quants)?;

        let mut all_vars = vec![arg_g.quantify(&raw.quants), arg_h.quantify(&raw.quants)];
        for term in &terms {
            for coeff in &term.coeffs {
                if let Atom::Sym(var) = &coeff.num {
                    all_vars.push(var.quantify(&raw.quants));
                }
            }
        }

        if !validate::types_check(&all_vars) {
            return Err(AnalysisError::PairsType);
        }
        if !validate::all_quants_occur(&all_vars, &raw.quants) {
            return Err(AnalysisError::PairUnusedQuants);
        }
        for var in &all_vars {
            if let Some(kind) = var.special() {
                if !allowed_specials.contains(&kind) {
                    return Err(AnalysisError::PairsIllegalSpecialVar);
                }
            }
        }

        pairs.push(Pair {
            arg_g,
            arg_h,
            terms,
            quants: raw.quants.clone(),
        });
    }
    Ok(pairs)
}

fn normalize_pair(raw: &RawPair, group_map: &GroupMap) -> Result<(Var, Var), AnalysisError> {
    match (raw.lhs.is_special(), raw.rhs.is_special()) {
        (false, false) => {
            let lhs_group = group_map.get(&raw.lhs.quantify(&raw.quants));
            let rhs_group = group_map.get(&raw.rhs.quantify(&raw.quants));
            match (lhs_group, rhs_group) {
                (Some(Group::G), Some(Group::H)) => Ok((raw.lhs.clone(), raw.rhs.clone())),
                (Some(Group::H), Some(Group::G)) => Ok((raw.rhs.clone(), raw.lhs.clone())),
                _ => Err(AnalysisError::PairIllegalGroupCombination),
            }
        }
        (true, false) => normalize_special(&raw.lhs, &raw.rhs, &raw.quants, group_map),
        (false, true) => normalize_special(&raw.rhs, &raw.lhs, &raw.quants, group_map),
        (true, true) => Err(AnalysisError::PairInconsistentOperandKinds),
    }
}

/// Order a special operand against its partner.
///
/// The identity randomness carries a directly-assigned group; every other
/// special operand takes the side opposite its partner.
fn normalize_special(
    special: &Var,
    partner: &Var,
    quants: &[Quant],
    group_map: &GroupMap,
) -> Result<(Var, Var), AnalysisError> {
    let partner_group = group_map.get(&partner.quantify(quants));
    if special.special() == Some(SpecialVar::Rgid) {
        let special_group = group_map.get(special);
        if special_group == partner_group {
            return Err(AnalysisError::PairIllegalGroupCombination);
        }
        if special_group == Some(Group::G) {
            Ok((special.clone(), partner.clone()))
        } else {
            Ok((partner.clone(), special.clone()))
        }
    } else if partner_group == Some(Group::H) {
        Ok((special.clone(), partner.clone()))
    } else {
        Ok((partner.clone(), special.clone()))
    }
}

fn validate_operand_kinds(
    var_type_map: &VarTypeMap,
    lhs: &Var,
    rhs: &Var,
    quants: &[Quant],
) -> Result<(), AnalysisError> {
    if lhs.is_special() || rhs.is_special() {
        return Ok(());
    }

    let lhs_kind = var_type_map.get(&lhs.quantify(quants));
    let rhs_kind = var_type_map.get(&rhs.quantify(quants));

    match (lhs_kind, rhs_kind) {
        (Some(VarType::KeyNonLoneRandom), Some(VarType::CipherPrimaryPoly))
        | (Some(VarType::CipherPrimaryPoly), Some(VarType::KeyNonLoneRandom))
        | (Some(VarType::KeyPoly), Some(VarType::CipherNonLoneRandom))
        | (Some(VarType::CipherNonLoneRandom), Some(VarType::KeyPoly)) => Ok(()),
        _ => Err(AnalysisError::PairInconsistentOperandKinds),
    }
}
