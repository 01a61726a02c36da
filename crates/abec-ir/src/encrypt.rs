//! Encrypt compilation: sample the encryption randomness, assemble the
//! cipher polynomials, and produce the blinding value.

use abec_core::{EquivSet, FdhMap, Group, GroupMap, SpecialVar, Var};

use abec_analysis::blinding_poly::BlindingPoly;
use abec_analysis::primary_poly::PrimaryCipherPoly;
use abec_analysis::secondary_poly::SecondaryCipherPoly;
use abec_analysis::terms::{
    CommonTerm, LoneRandomTerm, MasterKeyProductTerm, SpecialLoneRandomTerm,
};

use crate::builder::IrBuilder;
use crate::coeff::compile_coeff;
use crate::errors::CodegenError;
use crate::ir::{regs, slots, IrVar, Stmt};

/// Generate IR for _encrypt_ over the given random variables and cipher
/// polys.
///
/// Sampling loops come first, one per random class (non-lone randoms are
/// additionally lifted and stored in the ciphertext; the encryption secret
/// is fetched rather than sampled and never sits in a loop). Then one loop
/// per primary poly, the secondary-poly loops, and the single blinding
/// block.
pub fn compile_encrypt(
    lone_randoms: &EquivSet,
    special_lone_randoms: &EquivSet,
    non_lone_randoms: &EquivSet,
    primaries: &[PrimaryCipherPoly],
    secondaries: &[SecondaryCipherPoly],
    blinding: &BlindingPoly,
    group_map: &GroupMap,
    fdh_map: &FdhMap,
) -> Result<Vec<Stmt>, CodegenError> {
    let mut cg = IrBuilder::new();
    cg.comment("BEGIN ENCRYPT");
    for lr in lone_randoms {
        compile_lone_random(&mut cg, lr)?;
    }
    for slr in special_lone_randoms {
        compile_special_lone_random(&mut cg, slr)?;
    }
    for nlr in non_lone_randoms {
        compile_non_lone_random(&mut cg, nlr, group_map)?;
    }
    for poly in primaries {
        compile_primary(&mut cg, poly, fdh_map)?;
    }
    for poly in secondaries {
        compile_secondary(&mut cg, poly)?;
    }
    compile_blinding(&mut cg, blinding)?;
    cg.comment("END ENCRYPT");
    Ok(cg.build())
}

fn compile_lone_random(cg: &mut IrBuilder, lr: &Var) -> Result<(), CodegenError> {
    cg.build_loops(&lr.quants, &mut |cg| {
        cg.build_index(lr)?;
        cg.sample_z(slots::lone_randoms().indexed_at(&regs::idx()));
        Ok(())
    })
}

fn compile_special_lone_random(cg: &mut IrBuilder, slr: &Var) -> Result<(), CodegenError> {
    cg.build_loops(&slr.quants, &mut |cg| {
        cg.build_index(slr)?;
        cg.sample_z(slots::special_lone_randoms().indexed_at(&regs::idx()));
        Ok(())
    })
}

fn compile_non_lone_random(
    cg: &mut IrBuilder,
    nlr: &Var,
    group_map: &GroupMap,
) -> Result<(), CodegenError> {
    let (group, target) = match group_map.get(nlr) {
        Some(g @ Group::G) => (g, slots::ct_randoms_g()),
        Some(g @ Group::H) => (g, slots::ct_randoms_h()),
        _ => return Err(CodegenError::UnassignedGroup),
    };

    if nlr.special() == Some(SpecialVar::Secret) {
        // the secret is a single runtime value, never looped over
        cg.build_index(nlr)?;
        cg.get_secret(slots::non_lone_randoms().indexed_at(&regs::idx()));
        cg.lift(
            group,
            target.indexed_at(&regs::idx()),
            slots::non_lone_randoms().indexed_at(&regs::idx()),
        );
        return Ok(());
    }

    cg.build_loops(&nlr.quants, &mut |cg| {
        cg.build_index(nlr)?;
        cg.sample_z(slots::non_lone_randoms().indexed_at(&regs::idx()));
        cg.lift(
            group,
            target.indexed_at(&regs::idx()),
            slots::non_lone_randoms().indexed_at(&regs::idx()),
        );
        Ok(())
    })
}

fn compile_primary(
    cg: &mut IrBuilder,
    poly: &PrimaryCipherPoly,
    fdh_map: &FdhMap,
) -> Result<(), CodegenError> {
    let group = poly.group;
    let (tmp, acc, target) = match group {
        Group::G => (regs::tmp_g(), regs::acc_g(), slots::ct_primaries_g()),
        _ => (regs::tmp_h(), regs::acc_h(), slots::ct_primaries_h()),
    };

    cg.build_loops(&poly.quants, &mut |cg| {
        cg.reset_z(regs::tmp_z());
        cg.reset_z(regs::acc_z());
        cg.reset(group, tmp.clone());
        cg.reset(group, acc.clone());

        for term in &poly.lone_random_terms {
            compile_primary_lone_random_term(cg, term, poly)?;
        }

        cg.lift(group, acc.clone(), regs::acc_z());

        for term in &poly.common_terms_plain {
            compile_primary_plain_common_term(cg, term, poly, &tmp, &acc)?;
        }
        for term in &poly.common_terms_hashed {
            compile_primary_hashed_common_term(cg, term, poly, &tmp, &acc, fdh_map)?;
        }

        cg.build_index(&poly.head())?;
        cg.store(target.indexed_at(&regs::idx()), acc.clone());
        Ok(())
    })
}

fn compile_primary_lone_random_term(
    cg: &mut IrBuilder,
    term: &LoneRandomTerm,
    poly: &PrimaryCipherPoly,
) -> Result<(), CodegenError> {
    compile_coeff(cg, &term.factor)?;
    match term.random_var.special() {
        Some(SpecialVar::Mu) => {
            let idx = special_index(&term.random_var)?;
            cg.get_mu(regs::aux_z(), idx);
            cg.mul_z(regs::tmp_z(), regs::tmp_z(), regs::aux_z());
        }
        Some(SpecialVar::Lambda) => {
            let idx = special_index(&term.random_var)?;
            cg.get_lambda(regs::aux_z(), idx);
            cg.mul_z(regs::tmp_z(), regs::tmp_z(), regs::aux_z());
        }
        Some(SpecialVar::Secret) => {
            cg.get_secret(regs::aux_z());
            cg.mul_z(regs::tmp_z(), regs::tmp_z(), regs::aux_z());
        }
        _ => {
            cg.build_index(&term.random_var.quantify(&poly.quants))?;
            cg.mul_z(
                regs::tmp_z(),
                regs::tmp_z(),
                slots::lone_randoms().indexed_at(&regs::idx()),
            );
        }
    }
    cg.add_z(regs::acc_z(), regs::acc_z(), regs::tmp_z());
    Ok(())
}

fn compile_primary_plain_common_term(
    cg: &mut IrBuilder,
    term: &CommonTerm,
    poly: &PrimaryCipherPoly,
    tmp: &IrVar,
    acc: &IrVar,
) -> Result<(), CodegenError> {
    compile_coeff(cg, &term.factor)?;
    compile_primary_random_factor(cg, term, poly)?;

    let source = match poly.group {
        Group::G => slots::mpk_common_vars_g(),
        _ => slots::mpk_common_vars_h(),
    };
    cg.build_index(&term.common_var.quantify(&poly.quants))?;
    cg.store(tmp.clone(), source.indexed_at(&regs::idx()));
    cg.scale(poly.group, tmp.clone(), regs::tmp_z(), tmp.clone());
    cg.add(poly.group, acc.clone(), acc.clone(), tmp.clone());
    Ok(())
}

fn compile_primary_hashed_common_term(
    cg: &mut IrBuilder,
    term: &CommonTerm,
    poly: &PrimaryCipherPoly,
    tmp: &IrVar,
    acc: &IrVar,
    fdh_map: &FdhMap,
) -> Result<(), CodegenError> {
    compile_coeff(cg, &term.factor)?;
    compile_primary_random_factor(cg, term, poly)?;

    let quantified = term.common_var.quantify(&poly.quants);
    cg.build_index(&quantified)?;
    cg.fdh(
        poly.group,
        tmp.clone(),
        fdh_map.index_of(&quantified),
        regs::idx(),
    );
    cg.scale(poly.group, tmp.clone(), regs::tmp_z(), tmp.clone());
    cg.add(poly.group, acc.clone(), acc.clone(), tmp.clone());
    Ok(())
}

/// The random side of a primary common term: the share getter for
/// `<lambda>`, a storage read for everything else (including the lifted
/// secret).
fn compile_primary_random_factor(
    cg: &mut IrBuilder,
    term: &CommonTerm,
    poly: &PrimaryCipherPoly,
) -> Result<(), CodegenError> {
    if term.random_var.special() == Some(SpecialVar::Lambda) {
        let idx = special_index(&term.random_var)?;
        cg.get_lambda(regs::aux_z(), idx);
        cg.mul_z(regs::tmp_z(), regs::tmp_z(), regs::aux_z());
    } else {
        cg.build_index(&term.random_var.quantify(&poly.quants))?;
        cg.mul_z(
            regs::tmp_z(),
            regs::tmp_z(),
            slots::non_lone_randoms().indexed_at(&regs::idx()),
        );
    }
    Ok(())
}

fn compile_secondary(cg: &mut IrBuilder, poly: &SecondaryCipherPoly) -> Result<(), CodegenError> {
    cg.build_loops(&poly.quants, &mut |cg| {
        cg.reset_z(regs::tmp_z());
        cg.reset_z(regs::acc_z());
        cg.reset(Group::Gt, regs::tmp_gt());
        cg.reset(Group::Gt, regs::acc_gt());

        for term in &poly.special_lone_random_terms {
            compile_special_lone_term(cg, term, &poly.quants)?;
        }

        cg.lift(Group::Gt, regs::acc_gt(), regs::acc_z());

        for term in &poly.master_key_terms {
            compile_gt_master_key_term(cg, term, &poly.quants, slots::non_lone_randoms())?;
        }

        cg.build_index(&poly.head())?;
        cg.store(slots::ct_secondaries().indexed_at(&regs::idx()), regs::acc_gt());
        Ok(())
    })
}

fn compile_blinding(cg: &mut IrBuilder, blinding: &BlindingPoly) -> Result<(), CodegenError> {
    cg.reset_z(regs::tmp_z());
    cg.reset_z(regs::acc_z());
    cg.reset(Group::Gt, regs::tmp_gt());
    cg.reset(Group::Gt, regs::acc_gt());

    for term in &blinding.special_lone_random_terms {
        if term.random_var.special() == Some(SpecialVar::Secret) {
            compile_coeff(cg, &term.factor)?;
            cg.get_secret(regs::aux_z());
            cg.mul_z(regs::tmp_z(), regs::tmp_z(), regs::aux_z());
            cg.add_z(regs::acc_z(), regs::acc_z(), regs::tmp_z());
        } else {
            compile_special_lone_term(cg, term, &[])?;
        }
    }

    cg.lift(Group::Gt, regs::acc_gt(), regs::acc_z());

    for term in &blinding.master_key_terms {
        if term.random_var.special() == Some(SpecialVar::Secret) {
            compile_coeff(cg, &term.factor)?;
            cg.build_index(&term.master_key_var)?;
            cg.store(regs::tmp_gt(), slots::mpk_master_keys().indexed_at(&regs::idx()));
            cg.get_secret(regs::aux_z());
            cg.mul_z(regs::tmp_z(), regs::tmp_z(), regs::aux_z());
            cg.scale(Group::Gt, regs::tmp_gt(), regs::tmp_z(), regs::tmp_gt());
            cg.add(Group::Gt, regs::acc_gt(), regs::acc_gt(), regs::tmp_gt());
        } else {
            compile_gt_master_key_term(cg, term, &[], slots::non_lone_randoms())?;
        }
    }

    cg.store(slots::ct_blinding(), regs::acc_gt());
    Ok(())
}

/// A special-lone random summand in Gt context: the share getter for
/// `<lambda>`, otherwise a read of the sampled special-lone pool.
fn compile_special_lone_term(
    cg: &mut IrBuilder,
    term: &SpecialLoneRandomTerm,
    quants: &[abec_core::Quant],
) -> Result<(), CodegenError> {
    compile_coeff(cg, &term.factor)?;
    if term.random_var.special() == Some(SpecialVar::Lambda) {
        let idx = special_index(&term.random_var)?;
        cg.get_lambda(regs::aux_z(), idx);
        cg.mul_z(regs::tmp_z(), regs::tmp_z(), regs::aux_z());
    } else {
        cg.build_index(&term.random_var.quantify(quants))?;
        cg.mul_z(
            regs::tmp_z(),
            regs::tmp_z(),
            slots::special_lone_randoms().indexed_at(&regs::idx()),
        );
    }
    cg.add_z(regs::acc_z(), regs::acc_z(), regs::tmp_z());
    Ok(())
}

/// A master-key product summand in Gt context: fetch the lifted master key,
/// scale it by coefficient times random, accumulate.
fn compile_gt_master_key_term(
    cg: &mut IrBuilder,
    term: &MasterKeyProductTerm,
    quants: &[abec_core::Quant],
    random_pool: IrVar,
) -> Result<(), CodegenError> {
    compile_coeff(cg, &term.factor)?;
    cg.build_index(&term.master_key_var.quantify(quants))?;
    cg.store(regs::tmp_gt(), slots::mpk_master_keys().indexed_at(&regs::idx()));
    cg.build_index(&term.random_var.quantify(quants))?;
    cg.mul_z(
        regs::tmp_z(),
        regs::tmp_z(),
        random_pool.indexed_at(&regs::idx()),
    );
    cg.scale(Group::Gt, regs::tmp_gt(), regs::tmp_z(), regs::tmp_gt());
    cg.add(Group::Gt, regs::acc_gt(), regs::acc_gt(), regs::tmp_gt());
    Ok(())
}

fn special_index(var: &Var) -> Result<IrVar, CodegenError> {
    let [idx] = var.idcs.as_slice() else {
        return Err(CodegenError::UnresolvedIndex);
    };
    Ok(IrVar::new(idx.name.clone()))
}
