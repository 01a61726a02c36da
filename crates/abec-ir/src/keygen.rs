//! Keygen compilation: sample the key randomness and assemble the key
//! polynomials.

use abec_core::{EquivSet, FdhMap, Group, GroupMap, SpecialVar, Var};

use abec_analysis::key_poly::KeyPoly;
use abec_analysis::terms::{CommonTerm, LoneRandomTerm, MasterKeyTerm};

use crate::builder::IrBuilder;
use crate::coeff::compile_coeff;
use crate::errors::CodegenError;
use crate::ir::{regs, slots, IrVar, Stmt};

/// Generate IR for _keygen_ over the given random variables and key polys.
///
/// Lone randoms are sampled into the operation-local pool. Non-lone randoms
/// are sampled and additionally lifted into the user key in their inferred
/// group; hashed non-lone randoms are neither sampled nor stored. Each key
/// poly accumulates its master-key, lone-random and plain common terms in
/// the scalar field, is lifted once, then collects its hashed terms in the
/// group, and is stored under its built index.
pub fn compile_keygen(
    lone_randoms: &EquivSet,
    non_lone_randoms: &EquivSet,
    key_polys: &[KeyPoly],
    group_map: &GroupMap,
    fdh_map: &FdhMap,
) -> Result<Vec<Stmt>, CodegenError> {
    let mut cg = IrBuilder::new();
    cg.comment("BEGIN KEYGEN");
    for lr in lone_randoms {
        compile_lone_random(&mut cg, lr)?;
    }
    for nlr in non_lone_randoms {
        if !fdh_map.is_hashed(nlr) {
            compile_non_lone_random(&mut cg, nlr, group_map)?;
        }
    }
    for poly in key_polys {
        compile_key_poly(&mut cg, poly, fdh_map)?;
    }
    cg.comment("END KEYGEN");
    Ok(cg.build())
}

fn compile_lone_random(cg: &mut IrBuilder, lr: &Var) -> Result<(), CodegenError> {
    cg.build_loops(&lr.quants, &mut |cg| {
        cg.build_index(lr)?;
        cg.sample_z(slots::lone_randoms().indexed_at(&regs::idx()));
        Ok(())
    })
}

fn compile_non_lone_random(
    cg: &mut IrBuilder,
    nlr: &Var,
    group_map: &GroupMap,
) -> Result<(), CodegenError> {
    let (group, target) = match group_map.get(nlr) {
        Some(g @ Group::G) => (g, slots::usk_randoms_g()),
        Some(g @ Group::H) => (g, slots::usk_randoms_h()),
        _ => return Err(CodegenError::UnassignedGroup),
    };
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

fn compile_key_poly(
    cg: &mut IrBuilder,
    poly: &KeyPoly,
    fdh_map: &FdhMap,
) -> Result<(), CodegenError> {
    let group = poly.group;
    let (tmp, acc, target) = match group {
        Group::G => (regs::tmp_g(), regs::acc_g(), slots::usk_polys_g()),
        _ => (regs::tmp_h(), regs::acc_h(), slots::usk_polys_h()),
    };

    cg.build_loops(&poly.quants, &mut |cg| {
        cg.reset_z(regs::tmp_z());
        cg.reset_z(regs::acc_z());

        for term in &poly.master_key_terms {
            compile_master_key_term(cg, term, poly)?;
        }
        for term in &poly.lone_random_terms {
            compile_lone_random_term(cg, term, poly)?;
        }
        for term in &poly.common_terms_plain {
            compile_plain_common_term(cg, term, poly)?;
        }

        cg.lift(group, acc.clone(), regs::acc_z());

        for term in &poly.common_terms_random_hashed {
            compile_hashed_random_term(cg, term, poly, &tmp, &acc, fdh_map)?;
        }
        for term in &poly.common_terms_common_hashed {
            compile_hashed_common_term(cg, term, poly, &tmp, &acc, fdh_map)?;
        }

        cg.build_index(&poly.head())?;
        cg.store(target.indexed_at(&regs::idx()), acc.clone());
        Ok(())
    })
}

fn compile_master_key_term(
    cg: &mut IrBuilder,
    term: &MasterKeyTerm,
    poly: &KeyPoly,
) -> Result<(), CodegenError> {
    compile_coeff(cg, &term.factor)?;
    cg.build_index(&term.master_key_var.quantify(&poly.quants))?;
    cg.mul_z(
        regs::tmp_z(),
        regs::tmp_z(),
        slots::msk_master_keys().indexed_at(&regs::idx()),
    );
    cg.add_z(regs::acc_z(), regs::acc_z(), regs::tmp_z());
    Ok(())
}

fn compile_lone_random_term(
    cg: &mut IrBuilder,
    term: &LoneRandomTerm,
    poly: &KeyPoly,
) -> Result<(), CodegenError> {
    compile_coeff(cg, &term.factor)?;
    cg.build_index(&term.random_var.quantify(&poly.quants))?;
    cg.mul_z(
        regs::tmp_z(),
        regs::tmp_z(),
        slots::lone_randoms().indexed_at(&regs::idx()),
    );
    cg.add_z(regs::acc_z(), regs::acc_z(), regs::tmp_z());
    Ok(())
}

fn compile_plain_common_term(
    cg: &mut IrBuilder,
    term: &CommonTerm,
    poly: &KeyPoly,
) -> Result<(), CodegenError> {
    compile_coeff(cg, &term.factor)?;
    cg.build_index(&term.random_var.quantify(&poly.quants))?;
    cg.mul_z(
        regs::tmp_z(),
        regs::tmp_z(),
        slots::non_lone_randoms().indexed_at(&regs::idx()),
    );
    cg.build_index(&term.common_var.quantify(&poly.quants))?;
    cg.mul_z(
        regs::tmp_z(),
        regs::tmp_z(),
        slots::msk_common_vars().indexed_at(&regs::idx()),
    );
    cg.add_z(regs::acc_z(), regs::acc_z(), regs::tmp_z());
    Ok(())
}

fn compile_hashed_random_term(
    cg: &mut IrBuilder,
    term: &CommonTerm,
    poly: &KeyPoly,
    tmp: &IrVar,
    acc: &IrVar,
    fdh_map: &FdhMap,
) -> Result<(), CodegenError> {
    compile_coeff(cg, &term.factor)?;
    cg.build_index(&term.common_var.quantify(&poly.quants))?;
    cg.mul_z(
        regs::tmp_z(),
        regs::tmp_z(),
        slots::msk_common_vars().indexed_at(&regs::idx()),
    );
    if term.random_var.special() == Some(SpecialVar::Rgid) {
        match poly.group {
            Group::G => cg.get_rgid_g(tmp.clone()),
            _ => cg.get_rgid_h(tmp.clone()),
        }
    } else {
        let quantified = term.random_var.quantify(&poly.quants);
        cg.build_index(&quantified)?;
        cg.fdh(
            poly.group,
            tmp.clone(),
            fdh_map.index_of(&quantified),
            regs::idx(),
        );
    }
    cg.scale(poly.group, tmp.clone(), regs::tmp_z(), tmp.clone());
    cg.add(poly.group, acc.clone(), acc.clone(), tmp.clone());
    Ok(())
}

fn compile_hashed_common_term(
    cg: &mut IrBuilder,
    term: &CommonTerm,
    poly: &KeyPoly,
    tmp: &IrVar,
    acc: &IrVar,
    fdh_map: &FdhMap,
) -> Result<(), CodegenError> {
    compile_coeff(cg, &term.factor)?;
    cg.build_index(&term.random_var.quantify(&poly.quants))?;
    cg.mul_z(
        regs::tmp_z(),
        regs::tmp_z(),
        slots::non_lone_randoms().indexed_at(&regs::idx()),
    );
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
