//! Decrypt compilation: accumulate the singles and pairings recovering the
//! blinding value.

use abec_core::{FdhMap, Group, SpecialVar, Var, VarType, VarTypeMap};

use abec_analysis::pair::Pair;
use abec_analysis::single::Single;

use crate::builder::IrBuilder;
use crate::coeff::compile_coeff;
use crate::errors::CodegenError;
use crate::ir::{regs, slots, IrVar, Stmt};

/// Generate IR for _decrypt_ from the analyzed singles and pairs.
///
/// Singles scale stored secondary polys in Gt; pairs materialize their two
/// sides (storage lookup, hash-to-group, or the identity source), pair
/// them, scale by the exponent coefficient, and accumulate. The final
/// accumulator is stored as the recovered blinding value.
pub fn compile_decrypt(
    singles: &[Single],
    pairs: &[Pair],
    var_type_map: &VarTypeMap,
    fdh_map: &FdhMap,
) -> Result<Vec<Stmt>, CodegenError> {
    let mut cg = IrBuilder::new();
    cg.comment("BEGIN DECRYPT");
    for single in singles {
        compile_single(&mut cg, single)?;
    }
    for pair in pairs {
        compile_pair(&mut cg, pair, var_type_map, fdh_map)?;
    }
    cg.store(slots::blinding(), regs::acc_gt());
    cg.comment("END DECRYPT");
    Ok(cg.build())
}

fn compile_single(cg: &mut IrBuilder, single: &Single) -> Result<(), CodegenError> {
    let [coeff] = single.coeff.as_slice() else {
        return Err(CodegenError::UnsupportedExponent);
    };
    cg.build_loops(&single.quants, &mut |cg| {
        compile_coeff(cg, coeff)?;
        cg.build_index(&single.entry.quantify(&single.quants))?;
        cg.scale(
            Group::Gt,
            regs::tmp_gt(),
            regs::tmp_z(),
            slots::ct_secondaries().indexed_at(&regs::idx()),
        );
        cg.add(Group::Gt, regs::acc_gt(), regs::acc_gt(), regs::tmp_gt());
        Ok(())
    })
}

fn compile_pair(
    cg: &mut IrBuilder,
    pair: &Pair,
    var_type_map: &VarTypeMap,
    fdh_map: &FdhMap,
) -> Result<(), CodegenError> {
    let [coeff] = pair.terms.as_slice() else {
        return Err(CodegenError::UnsupportedExponent);
    };
    cg.build_loops(&pair.quants, &mut |cg| {
        compile_operand(cg, &pair.arg_g, Group::G, pair, var_type_map, fdh_map)?;
        compile_operand(cg, &pair.arg_h, Group::H, pair, var_type_map, fdh_map)?;
        cg.pair(regs::tmp_gt(), regs::tmp_g(), regs::tmp_h());
        compile_coeff(cg, coeff)?;
        cg.scale(Group::Gt, regs::tmp_gt(), regs::tmp_z(), regs::tmp_gt());
        cg.add(Group::Gt, regs::acc_gt(), regs::acc_gt(), regs::tmp_gt());
        Ok(())
    })
}

/// Materialize one side of a pairing into the group's scratch register.
fn compile_operand(
    cg: &mut IrBuilder,
    arg: &Var,
    group: Group,
    pair: &Pair,
    var_type_map: &VarTypeMap,
    fdh_map: &FdhMap,
) -> Result<(), CodegenError> {
    let tmp = match group {
        Group::G => regs::tmp_g(),
        _ => regs::tmp_h(),
    };

    if arg.special() == Some(SpecialVar::Rgid) {
        match group {
            Group::G => cg.get_rgid_g(tmp),
            _ => cg.get_rgid_h(tmp),
        }
        return Ok(());
    }

    let quantified = arg.quantify(&pair.quants);
    cg.build_index(&quantified)?;
    if fdh_map.is_hashed(&quantified) {
        let idx = fdh_map.index_of(&quantified);
        match group {
            Group::G => cg.fdh_g(tmp, idx, regs::idx()),
            _ => cg.fdh_h(tmp, idx, regs::idx()),
        }
        return Ok(());
    }

    let location = storage_location(var_type_map, &quantified, group)
        .ok_or(CodegenError::UnknownOperandLocation)?;
    cg.store(tmp, location.indexed_at(&regs::idx()));
    Ok(())
}

/// Where a pairing operand of a given role lives, per group.
fn storage_location(var_type_map: &VarTypeMap, var: &Var, group: Group) -> Option<IrVar> {
    match (group, var_type_map.get(var)?) {
        (Group::G, VarType::KeyNonLoneRandom) => Some(slots::usk_randoms_g()),
        (Group::H, VarType::KeyNonLoneRandom) => Some(slots::usk_randoms_h()),
        (Group::G, VarType::KeyPoly) => Some(slots::usk_polys_g()),
        (Group::H, VarType::KeyPoly) => Some(slots::usk_polys_h()),
        (Group::G, VarType::CipherNonLoneRandom) => Some(slots::ct_randoms_g()),
        (Group::H, VarType::CipherNonLoneRandom) => Some(slots::ct_randoms_h()),
        (Group::G, VarType::CipherPrimaryPoly) => Some(slots::ct_primaries_g()),
        (Group::H, VarType::CipherPrimaryPoly) => Some(slots::ct_primaries_h()),
        _ => None,
    }
}
