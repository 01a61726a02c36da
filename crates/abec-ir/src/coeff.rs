//! The shared coefficient compiler: multiplies a term's coefficients into
//! the scalar accumulator `tmp_z`.

use abec_analysis::{Atom, Coeff, Term};
use abec_core::{IMap, SpecialVar, Var};

use crate::builder::IrBuilder;
use crate::errors::CodegenError;
use crate::ir::{regs, IrExpr, IrFunc, IrType, IrVar};

/// Compile a coefficient term: `tmp_z` is set to 1, then every coefficient
/// is materialized into `aux_z` and multiplied in.
///
/// Supported coefficient shapes: integers, integer reciprocals, the fixed
/// alternating-attribute denominator `1/(xattralt_i - xattr_{i.attr})`, and
/// the runtime scalar sources `<xattr>` (directly indexed or through the
/// row-to-attribute conversion) and `<epsilon>`.
pub fn compile_coeff(cg: &mut IrBuilder, factor: &Term) -> Result<(), CodegenError> {
    cg.set_z(regs::tmp_z(), 1);
    for coeff in &factor.coeffs {
        if coeff.is_one() {
            // multiplications with 1 are dropped
            continue;
        }
        if coeff.denom.is_empty() {
            compile_numerator(cg, coeff)?;
        } else {
            compile_denominator(cg, coeff)?;
        }
        cg.mul_z(regs::tmp_z(), regs::tmp_z(), regs::aux_z());
    }
    Ok(())
}

fn compile_numerator(cg: &mut IrBuilder, coeff: &Coeff) -> Result<(), CodegenError> {
    match &coeff.num {
        Atom::Int(value) => {
            cg.set_z(regs::aux_z(), *value);
            Ok(())
        }
        Atom::Sym(var) => compile_scalar_source(cg, var),
    }
}

/// Runtime scalar sources usable as coefficients.
fn compile_scalar_source(cg: &mut IrBuilder, var: &Var) -> Result<(), CodegenError> {
    match var.special() {
        Some(SpecialVar::XAttr) => {
            let [idx] = var.idcs.as_slice() else {
                return Err(CodegenError::UnsupportedCoefficient);
            };
            match idx.local_map {
                None => {
                    cg.get_xattr(regs::aux_z(), IrVar::new(idx.name.clone()));
                    Ok(())
                }
                Some(IMap::ToAttr) => {
                    let aux = IrVar::new("x_attr_aux");
                    cg.alloc(
                        aux.clone(),
                        IrType::Attribute,
                        IrExpr::Call {
                            func: IrFunc::LsssRowToAttr,
                            args: vec![IrExpr::Read(IrVar::new(idx.name.clone()))],
                        },
                    );
                    cg.get_xattr(regs::aux_z(), aux);
                    Ok(())
                }
                Some(_) => Err(CodegenError::UnsupportedCoefficient),
            }
        }
        Some(SpecialVar::Epsilon) => {
            let [idx] = var.idcs.as_slice() else {
                return Err(CodegenError::UnsupportedCoefficient);
            };
            cg.get_epsilon(regs::aux_z(), IrVar::new(idx.name.clone()));
            Ok(())
        }
        _ => Err(CodegenError::UnsupportedCoefficient),
    }
}

fn compile_denominator(cg: &mut IrBuilder, coeff: &Coeff) -> Result<(), CodegenError> {
    if coeff.num != Atom::Int(1) {
        return Err(CodegenError::UnsupportedCoefficient);
    }
    if let [factors] = coeff.denom.as_slice() {
        if let [Atom::Int(value)] = factors.as_slice() {
            cg.set_z(regs::aux_z(), *value);
            cg.inv_z(regs::aux_z(), regs::aux_z());
            return Ok(());
        }
    }

    let idx_name = alt_attr_denom(&coeff.denom).ok_or(CodegenError::UnsupportedCoefficient)?;

    // 1/(xattralt_i - xattr_{i.attr}): fetch both attribute scalars for the
    // current row and invert their difference
    let tmp_z_2 = IrVar::new("tmp_z_2");
    cg.get_xattr_alt(tmp_z_2.clone(), IrVar::new(idx_name.clone()));
    let aux = IrVar::new("x_attr_aux");
    cg.alloc(
        aux.clone(),
        IrType::Attribute,
        IrExpr::Call {
            func: IrFunc::LsssRowToAttr,
            args: vec![IrExpr::Read(IrVar::new(idx_name))],
        },
    );
    cg.get_xattr(regs::aux_z(), aux);
    cg.neg_z(regs::aux_z(), regs::aux_z());
    cg.add_z(regs::aux_z(), tmp_z_2, regs::aux_z());
    cg.inv_z(regs::aux_z(), regs::aux_z());
    Ok(())
}

/// Recognize the alternating-attribute denominator shape
/// `[[xattralt_i], [-1, xattr_{i.attr}]]`, returning the row index name.
fn alt_attr_denom(denom: &[Vec<Atom>]) -> Option<String> {
    let [first, second] = denom else {
        return None;
    };
    let [Atom::Sym(alt)] = first.as_slice() else {
        return None;
    };
    let [Atom::Int(-1), Atom::Sym(xattr)] = second.as_slice() else {
        return None;
    };
    if alt.special() != Some(SpecialVar::XAttrAlt) || xattr.special() != Some(SpecialVar::XAttr) {
        return None;
    }
    let ([alt_idx], [xattr_idx]) = (alt.idcs.as_slice(), xattr.idcs.as_slice()) else {
        return None;
    };
    if alt_idx.local_map.is_some() || xattr_idx.local_map != Some(IMap::ToAttr) {
        return None;
    }
    if alt_idx.name != xattr_idx.name {
        return None;
    }
    Some(alt_idx.name.clone())
}
