//! The IR builder: statement emission, loop lowering and index building.

use abec_core::{Group, Idx, Quant, Var};

use crate::errors::CodegenError;
use crate::ir::{IrExpr, IrFunc, IrType, IrVar, Stmt};

type BodyFn<'a> = dyn FnMut(&mut IrBuilder) -> Result<(), CodegenError> + 'a;

/// Accumulates a flat statement sequence.
///
/// Loop bodies are built in nested builders so the local-allocation counter
/// used by [`IrBuilder::build_index`] restarts per loop body.
#[derive(Debug, Default)]
pub struct IrBuilder {
    stmts: Vec<Stmt>,
    num_locals: usize,
}

impl IrBuilder {
    pub fn new() -> IrBuilder {
        IrBuilder::default()
    }

    pub fn build(self) -> Vec<Stmt> {
        self.stmts
    }

    /// Lower a quantification list to nested loops, outermost first, and run
    /// `body` in the innermost scope.
    ///
    /// A globally-mapped quantification lowers to a loop over the
    /// untransformed base set plus one allocation computing the mapped
    /// value; the remaining quantifications still lower to loops beneath
    /// it.
    pub fn build_loops(
        &mut self,
        quants: &[Quant],
        body: &mut BodyFn<'_>,
    ) -> Result<(), CodegenError> {
        let Some((curr, rest)) = quants.split_first() else {
            let mut nested = IrBuilder::new();
            body(&mut nested)?;
            self.stmts.extend(nested.stmts);
            return Ok(());
        };

        let mut nested = IrBuilder::new();
        let loop_var = match curr.global_map {
            Some(global_map) => {
                let loop_var = format!("{}_global", curr.name);
                nested.alloc(
                    IrVar::new(curr.name.clone()),
                    IrType::from_qtype(global_map.codomain_type()),
                    IrExpr::Call {
                        func: IrFunc::from_qmap(global_map),
                        args: vec![IrExpr::Read(IrVar::new(loop_var.clone()))],
                    },
                );
                loop_var
            }
            None => curr.name.clone(),
        };
        nested.build_loops(rest, body)?;

        self.stmts.push(Stmt::Loop {
            var: loop_var,
            ty: IrType::from_qtype(curr.base_set.element_type()),
            set: curr.base_set,
            body: nested.stmts,
        });
        Ok(())
    }

    /// Emit the statements computing the runtime index string of a concrete
    /// variable use: the name, then per index either a literal or a
    /// conversion of the loop variable, with locally-mapped indices
    /// materialized through an allocation first.
    pub fn build_index(&mut self, var: &Var) -> Result<(), CodegenError> {
        self.set_index("");
        self.append_index_literal(var.name.to_string());
        self.append_index_literal("_{");
        for (i, idx) in var.idcs.iter().enumerate() {
            self.build_index_component(idx, var)?;
            if i < var.idcs.len() - 1 {
                self.append_index_literal(",");
            }
        }
        self.append_index_literal("}");
        Ok(())
    }

    fn build_index_component(&mut self, idx: &Idx, var: &Var) -> Result<(), CodegenError> {
        let Some(local_map) = idx.local_map else {
            if idx.is_quantified(&var.quants) {
                let qtype = idx
                    .get_type(&var.quants)
                    .ok_or(CodegenError::UnresolvedIndex)?;
                let ty = IrType::from_qtype(qtype);
                self.append_index(IrVar::new(idx.name.clone()), IrFunc::to_string_conversion(ty));
            } else {
                self.append_index_literal(idx.name.clone());
            }
            return Ok(());
        };

        let matching: Vec<&Quant> = var.quants.iter().filter(|q| q.name == idx.name).collect();
        let [quant] = matching.as_slice() else {
            return Err(CodegenError::UnresolvedIndex);
        };
        let mut domain_type = quant.base_set.element_type();
        if let Some(global_map) = quant.global_map {
            if global_map.domain_type() != domain_type {
                return Err(CodegenError::UnresolvedIndex);
            }
            domain_type = global_map.codomain_type();
        }
        let codomain = local_map.codomain_type();
        let conversion = IrFunc::from_domain_codomain(domain_type, codomain)
            .ok_or(CodegenError::UnresolvedIndex)?;
        let ty = IrType::from_qtype(codomain);

        let target = IrVar::new(format!("{}_local_{}", idx.name, self.num_locals));
        self.num_locals += 1;
        self.alloc(
            target.clone(),
            ty,
            IrExpr::Call {
                func: conversion,
                args: vec![IrExpr::Read(IrVar::new(idx.name.clone()))],
            },
        );
        self.append_index(target, IrFunc::to_string_conversion(ty));
        Ok(())
    }

    // -- plain statement emission ----------------------------------------

    pub fn comment(&mut self, text: impl Into<String>) {
        self.stmts.push(Stmt::Comment(text.into()));
    }

    pub fn alloc(&mut self, target: IrVar, ty: IrType, expr: IrExpr) {
        self.stmts.push(Stmt::Alloc { target, ty, expr });
    }

    pub fn store(&mut self, target: IrVar, source: IrVar) {
        self.stmts.push(Stmt::Store { target, source });
    }

    pub fn store_expr(&mut self, target: IrVar, expr: IrExpr) {
        self.stmts.push(Stmt::StoreExpr { target, expr });
    }

    pub fn reset_z(&mut self, target: IrVar) {
        self.stmts.push(Stmt::ResetZ { target });
    }

    pub fn sample_z(&mut self, target: IrVar) {
        self.stmts.push(Stmt::SampleZ { target });
    }

    pub fn add_z(&mut self, target: IrVar, lhs: IrVar, rhs: IrVar) {
        self.stmts.push(Stmt::AddZ { target, lhs, rhs });
    }

    pub fn mul_z(&mut self, target: IrVar, lhs: IrVar, rhs: IrVar) {
        self.stmts.push(Stmt::MulZ { target, lhs, rhs });
    }

    pub fn set_z(&mut self, target: IrVar, value: i64) {
        self.stmts.push(Stmt::SetZ { target, value });
    }

    pub fn neg_z(&mut self, target: IrVar, source: IrVar) {
        self.stmts.push(Stmt::NegZ { target, source });
    }

    pub fn inv_z(&mut self, target: IrVar, source: IrVar) {
        self.stmts.push(Stmt::InvZ { target, source });
    }

    pub fn pair(&mut self, target: IrVar, source_g: IrVar, source_h: IrVar) {
        self.stmts.push(Stmt::Pair {
            target,
            source_g,
            source_h,
        });
    }

    pub fn fdh_g(&mut self, target: IrVar, idx: u32, arg: IrVar) {
        self.stmts.push(Stmt::FdhG { target, idx, arg });
    }

    pub fn fdh_h(&mut self, target: IrVar, idx: u32, arg: IrVar) {
        self.stmts.push(Stmt::FdhH { target, idx, arg });
    }

    pub fn get_rgid_g(&mut self, target: IrVar) {
        self.stmts.push(Stmt::GetRgidG { target });
    }

    pub fn get_rgid_h(&mut self, target: IrVar) {
        self.stmts.push(Stmt::GetRgidH { target });
    }

    pub fn get_mu(&mut self, target: IrVar, idx: IrVar) {
        self.stmts.push(Stmt::GetMu { target, idx });
    }

    pub fn get_lambda(&mut self, target: IrVar, idx: IrVar) {
        self.stmts.push(Stmt::GetLambda { target, idx });
    }

    pub fn get_epsilon(&mut self, target: IrVar, idx: IrVar) {
        self.stmts.push(Stmt::GetEpsilon { target, idx });
    }

    pub fn get_xattr(&mut self, target: IrVar, idx: IrVar) {
        self.stmts.push(Stmt::GetXAttr { target, idx });
    }

    pub fn get_xattr_alt(&mut self, target: IrVar, idx: IrVar) {
        self.stmts.push(Stmt::GetXAttrAlt { target, idx });
    }

    pub fn get_secret(&mut self, target: IrVar) {
        self.stmts.push(Stmt::GetSecret { target });
    }

    pub fn set_index(&mut self, literal: impl Into<String>) {
        self.stmts.push(Stmt::SetIndex(literal.into()));
    }

    pub fn append_index_literal(&mut self, literal: impl Into<String>) {
        self.stmts.push(Stmt::AppendIndexLiteral(literal.into()));
    }

    pub fn append_index(&mut self, source: IrVar, conversion: IrFunc) {
        self.stmts.push(Stmt::AppendIndex { source, conversion });
    }

    // -- group-dispatched emission ---------------------------------------

    pub fn reset(&mut self, group: Group, target: IrVar) {
        self.stmts.push(match group {
            Group::G => Stmt::ResetG { target },
            Group::H => Stmt::ResetH { target },
            Group::Gt => Stmt::ResetGt { target },
        });
    }

    pub fn lift(&mut self, group: Group, target: IrVar, source: IrVar) {
        self.stmts.push(match group {
            Group::G => Stmt::LiftG { target, source },
            Group::H => Stmt::LiftH { target, source },
            Group::Gt => Stmt::LiftGt { target, source },
        });
    }

    pub fn add(&mut self, group: Group, target: IrVar, lhs: IrVar, rhs: IrVar) {
        self.stmts.push(match group {
            Group::G => Stmt::AddG { target, lhs, rhs },
            Group::H => Stmt::AddH { target, lhs, rhs },
            Group::Gt => Stmt::AddGt { target, lhs, rhs },
        });
    }

    pub fn scale(&mut self, group: Group, target: IrVar, coeff: IrVar, source: IrVar) {
        self.stmts.push(match group {
            Group::G => Stmt::ScaleG {
                target,
                coeff,
                source,
            },
            Group::H => Stmt::ScaleH {
                target,
                coeff,
                source,
            },
            Group::Gt => Stmt::ScaleGt {
                target,
                coeff,
                source,
            },
        });
    }

    /// Hash-to-group; only the source groups carry FDH primitives.
    pub fn fdh(&mut self, group: Group, target: IrVar, idx: u32, arg: IrVar) {
        match group {
            Group::G => self.fdh_g(target, idx, arg),
            Group::H => self.fdh_h(target, idx, arg),
            Group::Gt => panic!("no hash-to-group primitive exists for Gt"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ir::regs;
    use abec_core::{IMap, QMap, QSet};
    use pretty_assertions::assert_eq;

    #[test]
    fn plain_quant_lowers_to_one_loop() {
        let mut cg = IrBuilder::new();
        let quants = [Quant::new("l", QSet::Authorities)];
        cg.build_loops(&quants, &mut |cg| {
            cg.comment("body");
            Ok(())
        })
        .unwrap();
        assert_eq!(
            cg.build(),
            vec![Stmt::Loop {
                var: "l".into(),
                ty: IrType::Authority,
                set: QSet::Authorities,
                body: vec![Stmt::Comment("body".into())],
            }]
        );
    }

    #[test]
    fn mapped_quant_adds_allocation_over_untransformed_set() {
        let mut cg = IrBuilder::new();
        let quants = [Quant::mapped("l", QSet::UserAttributes, QMap::AttrToAuthority)];
        cg.build_loops(&quants, &mut |cg| {
            cg.comment("body");
            Ok(())
        })
        .unwrap();
        assert_eq!(
            cg.build(),
            vec![Stmt::Loop {
                var: "l_global".into(),
                ty: IrType::Attribute,
                set: QSet::UserAttributes,
                body: vec![
                    Stmt::Alloc {
                        target: IrVar::new("l"),
                        ty: IrType::Authority,
                        expr: IrExpr::Call {
                            func: IrFunc::AttrToAuthority,
                            args: vec![IrExpr::Read(IrVar::new("l_global"))],
                        },
                    },
                    Stmt::Comment("body".into()),
                ],
            }]
        );
    }

    #[test]
    fn quants_after_a_mapped_one_still_lower_to_loops() {
        let mut cg = IrBuilder::new();
        let quants = [
            Quant::mapped("l", QSet::UserAttributes, QMap::AttrToAuthority),
            Quant::new("i", QSet::Labels),
        ];
        cg.build_loops(&quants, &mut |cg| {
            cg.comment("body");
            Ok(())
        })
        .unwrap();
        let stmts = cg.build();
        let Stmt::Loop { body, .. } = &stmts[0] else {
            panic!("expected outer loop");
        };
        assert!(matches!(body[0], Stmt::Alloc { .. }));
        let Stmt::Loop {
            var, set, body, ..
        } = &body[1]
        else {
            panic!("expected inner loop");
        };
        assert_eq!(var, "i");
        assert_eq!(*set, QSet::Labels);
        assert_eq!(body, &vec![Stmt::Comment("body".into())]);
    }

    #[test]
    fn index_of_fixed_and_quantified_components() {
        let mut cg = IrBuilder::new();
        let var = Var::quantified(
            "k",
            vec![Idx::new("1"), Idx::new("l")],
            vec![Quant::new("l", QSet::Authorities)],
        );
        cg.build_index(&var).unwrap();
        assert_eq!(
            cg.build(),
            vec![
                Stmt::SetIndex("".into()),
                Stmt::AppendIndexLiteral("k".into()),
                Stmt::AppendIndexLiteral("_{".into()),
                Stmt::AppendIndexLiteral("1".into()),
                Stmt::AppendIndexLiteral(",".into()),
                Stmt::AppendIndex {
                    source: IrVar::new("l"),
                    conversion: IrFunc::AuthorityToString,
                },
                Stmt::AppendIndexLiteral("}".into()),
            ]
        );
    }

    #[test]
    fn locally_mapped_index_allocates_conversion() {
        let mut cg = IrBuilder::new();
        let var = Var::quantified(
            "b",
            vec![Idx::mapped("l", IMap::ToAuthority)],
            vec![Quant::new("l", QSet::AttributeUniverse)],
        );
        cg.build_index(&var).unwrap();
        assert_eq!(
            cg.build(),
            vec![
                Stmt::SetIndex("".into()),
                Stmt::AppendIndexLiteral("b".into()),
                Stmt::AppendIndexLiteral("_{".into()),
                Stmt::Alloc {
                    target: IrVar::new("l_local_0"),
                    ty: IrType::Authority,
                    expr: IrExpr::Call {
                        func: IrFunc::AttrToAuthority,
                        args: vec![IrExpr::Read(IrVar::new("l"))],
                    },
                },
                Stmt::AppendIndex {
                    source: IrVar::new("l_local_0"),
                    conversion: IrFunc::AuthorityToString,
                },
                Stmt::AppendIndexLiteral("}".into()),
            ]
        );
    }

    #[test]
    fn local_allocation_counter_increments_within_a_body() {
        let mut cg = IrBuilder::new();
        let var = Var::quantified(
            "b",
            vec![Idx::mapped("j", IMap::ToAuthority)],
            vec![Quant::new("j", QSet::LsssRows)],
        );
        cg.build_index(&var).unwrap();
        cg.build_index(&var).unwrap();
        let names: Vec<String> = cg
            .build()
            .into_iter()
            .filter_map(|s| match s {
                Stmt::Alloc { target, .. } => Some(target.name),
                _ => None,
            })
            .collect();
        assert_eq!(names, vec!["j_local_0", "j_local_1"]);
    }

    #[test]
    fn unquantified_mapped_index_is_an_error() {
        let mut cg = IrBuilder::new();
        let var = Var::new("b", vec![Idx::mapped("j", IMap::ToAttr)]);
        assert_eq!(
            cg.build_index(&var).unwrap_err(),
            CodegenError::UnresolvedIndex
        );
    }

    #[test]
    fn loop_bodies_restart_the_local_counter() {
        let mut cg = IrBuilder::new();
        let var = Var::quantified(
            "b",
            vec![Idx::mapped("j", IMap::ToAuthority)],
            vec![Quant::new("j", QSet::LsssRows)],
        );
        cg.build_loops(&var.quants.clone(), &mut |cg| {
            cg.build_index(&var)?;
            Ok(())
        })
        .unwrap();
        cg.build_loops(&var.quants.clone(), &mut |cg| {
            cg.build_index(&var)?;
            Ok(())
        })
        .unwrap();
        for stmt in cg.build() {
            let Stmt::Loop { body, .. } = stmt else {
                panic!("expected loop");
            };
            assert!(body.iter().any(|s| matches!(
                s,
                Stmt::Alloc { target, .. } if target.name == "j_local_0"
            )));
        }
    }

    #[test]
    fn group_dispatch_picks_the_right_variant() {
        let mut cg = IrBuilder::new();
        cg.lift(Group::G, regs::acc_g(), regs::acc_z());
        cg.lift(Group::Gt, regs::acc_gt(), regs::acc_z());
        cg.add(Group::H, regs::acc_h(), regs::acc_h(), regs::tmp_h());
        let stmts = cg.build();
        assert!(matches!(stmts[0], Stmt::LiftG { .. }));
        assert!(matches!(stmts[1], Stmt::LiftGt { .. }));
        assert!(matches!(stmts[2], Stmt::AddH { .. }));
    }
}
