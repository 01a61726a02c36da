//! Setup compilation: sample the master secret and publish the public key.

use abec_core::{FdhMap, Group, GroupMap, Var};

use crate::builder::IrBuilder;
use crate::errors::CodegenError;
use crate::ir::{regs, slots, Stmt};

/// Generate IR for _setup_ over the given master key and common vars.
///
/// Master keys are sampled and lifted into Gt for the public key. Common
/// vars are sampled and lifted into their inferred source group; hashed
/// common vars are skipped entirely (the hash produces them on demand).
/// Both lists must be free of duplicates by equivalence.
pub fn compile_setup(
    master_key_vars: &[Var],
    common_vars: &[Var],
    group_map: &GroupMap,
    fdh_map: &FdhMap,
) -> Result<Vec<Stmt>, CodegenError> {
    let mut cg = IrBuilder::new();
    cg.comment("BEGIN SETUP");
    for msk in master_key_vars {
        compile_master_key_var(&mut cg, msk)?;
    }
    for cv in common_vars {
        if !fdh_map.is_hashed(cv) {
            compile_common_var(&mut cg, cv, group_map)?;
        }
    }
    cg.comment("END SETUP");
    Ok(cg.build())
}

fn compile_master_key_var(cg: &mut IrBuilder, msk: &Var) -> Result<(), CodegenError> {
    cg.build_loops(&msk.quants, &mut |cg| {
        cg.build_index(msk)?;
        cg.sample_z(slots::msk_master_keys().indexed_at(&regs::idx()));
        cg.lift(
            Group::Gt,
            slots::mpk_master_keys().indexed_at(&regs::idx()),
            slots::msk_master_keys().indexed_at(&regs::idx()),
        );
        Ok(())
    })
}

fn compile_common_var(
    cg: &mut IrBuilder,
    cv: &Var,
    group_map: &GroupMap,
) -> Result<(), CodegenError> {
    let (group, target) = match group_map.get(cv) {
        Some(g @ Group::G) => (g, slots::mpk_common_vars_g()),
        Some(g @ Group::H) => (g, slots::mpk_common_vars_h()),
        _ => return Err(CodegenError::UnassignedGroup),
    };
    cg.build_loops(&cv.quants, &mut |cg| {
        cg.build_index(cv)?;
        cg.sample_z(slots::msk_common_vars().indexed_at(&regs::idx()));
        cg.lift(
            group,
            target.indexed_at(&regs::idx()),
            slots::msk_common_vars().indexed_at(&regs::idx()),
        );
        Ok(())
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ir::{IrExpr, IrFunc, IrType, IrVar};
    use abec_core::QSet;
    use abec_dsl::parse_var;
    use pretty_assertions::assert_eq;

    #[test]
    fn empty_setup_is_only_markers() {
        let stmts = compile_setup(&[], &[], &GroupMap::new(), &FdhMap::new()).unwrap();
        assert_eq!(
            stmts,
            vec![
                Stmt::Comment("BEGIN SETUP".into()),
                Stmt::Comment("END SETUP".into()),
            ]
        );
    }

    #[test]
    fn master_key_samples_and_lifts_to_gt() {
        let msk = parse_var("alpha_{l}_[l:AUTHS]").unwrap();
        let stmts = compile_setup(&[msk], &[], &GroupMap::new(), &FdhMap::new()).unwrap();
        assert_eq!(
            stmts,
            vec![
                Stmt::Comment("BEGIN SETUP".into()),
                Stmt::Loop {
                    var: "l".into(),
                    ty: IrType::Authority,
                    set: QSet::Authorities,
                    body: vec![
                        Stmt::SetIndex("".into()),
                        Stmt::AppendIndexLiteral("alpha".into()),
                        Stmt::AppendIndexLiteral("_{".into()),
                        Stmt::AppendIndex {
                            source: IrVar::new("l"),
                            conversion: IrFunc::AuthorityToString,
                        },
                        Stmt::AppendIndexLiteral("}".into()),
                        Stmt::SampleZ {
                            target: slots::msk_master_keys().indexed_at(&regs::idx()),
                        },
                        Stmt::LiftGt {
                            target: slots::mpk_master_keys().indexed_at(&regs::idx()),
                            source: slots::msk_master_keys().indexed_at(&regs::idx()),
                        },
                    ],
                },
                Stmt::Comment("END SETUP".into()),
            ]
        );
    }

    #[test]
    fn common_var_with_global_map_loops_over_untransformed_set() {
        let cv = parse_var("b_{l}_[l:attr_to_lbl(USER_ATTRS)]").unwrap();
        let mut group_map = GroupMap::new();
        group_map.assign(&cv, Group::G).unwrap();

        let stmts = compile_setup(&[], &[cv], &group_map, &FdhMap::new()).unwrap();
        assert_eq!(
            stmts,
            vec![
                Stmt::Comment("BEGIN SETUP".into()),
                Stmt::Loop {
                    var: "l_global".into(),
                    ty: IrType::Attribute,
                    set: QSet::UserAttributes,
                    body: vec![
                        Stmt::Alloc {
                            target: IrVar::new("l"),
                            ty: IrType::Label,
                            expr: IrExpr::Call {
                                func: IrFunc::AttrToLabel,
                                args: vec![IrExpr::Read(IrVar::new("l_global"))],
                            },
                        },
                        Stmt::SetIndex("".into()),
                        Stmt::AppendIndexLiteral("b".into()),
                        Stmt::AppendIndexLiteral("_{".into()),
                        Stmt::AppendIndex {
                            source: IrVar::new("l"),
                            conversion: IrFunc::LabelToString,
                        },
                        Stmt::AppendIndexLiteral("}".into()),
                        Stmt::SampleZ {
                            target: slots::msk_common_vars().indexed_at(&regs::idx()),
                        },
                        Stmt::LiftG {
                            target: slots::mpk_common_vars_g().indexed_at(&regs::idx()),
                            source: slots::msk_common_vars().indexed_at(&regs::idx()),
                        },
                    ],
                },
                Stmt::Comment("END SETUP".into()),
            ]
        );
    }

    #[test]
    fn hashed_common_var_is_skipped() {
        let cv = parse_var("b_{att}_[att:ATTR_UNI]").unwrap();
        let mut fdh = FdhMap::new();
        fdh.insert(cv.clone(), 1).unwrap();
        let stmts = compile_setup(&[], &[cv], &GroupMap::new(), &fdh).unwrap();
        assert_eq!(stmts.len(), 2);
    }

    #[test]
    fn unassigned_common_var_group_is_an_error() {
        let cv = parse_var("b_{l}_[l:AUTHS]").unwrap();
        assert_eq!(
            compile_setup(&[], &[cv], &GroupMap::new(), &FdhMap::new()).unwrap_err(),
            CodegenError::UnassignedGroup
        );
    }
}
