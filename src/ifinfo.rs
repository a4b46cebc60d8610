//! Recognition of high-level `if` patterns from a dominator tree (spec.md §4.5).
//!
//! `IfInfos::create` sweeps every block with exactly two predecessors looking for a diamond whose
//! header is a two-way `ConditionalBranch`. This is the read-only analysis `IfConversion`
//! (§4.6) consumes; it never mutates the method.

use crate::context::IrContext;
use crate::dominators::Dominators;
use crate::ids::{BlockId, ValueId};
use crate::scope::Scope;
use crate::terminator::TerminatorKind;
use crate::value::ValueReference;

/// One exit-block parameter paired with the value each branch of the diamond supplies for it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Variable {
    pub param: ValueId,
    pub true_value: ValueReference,
    pub false_value: ValueReference,
}

/// A recognized `if` shape: `entry` branches on `condition` to `if_block`/`else_block`, both of
/// which (in the general case, possibly through further blocks) reach `exit_block`.
#[derive(Debug, Clone)]
pub struct IfInfo {
    pub condition: ValueReference,
    pub entry: BlockId,
    pub if_block: BlockId,
    pub else_block: BlockId,
    pub exit_block: BlockId,
    pub variables: Vec<Variable>,
}

impl IfInfo {
    /// spec.md §4.5: `entry`'s successors must go *directly* to `if_block`/`else_block`, and each
    /// of those must have exactly one successor, equal to `exit_block`. This is the shape
    /// `IfConversion` can merge without moving anything other than the three blocks themselves.
    pub fn is_simple_if(&self, ctx: &IrContext) -> bool {
        let entry_succs = self.entry.successors(ctx);
        if entry_succs.len() != 2 || !entry_succs.contains(&self.if_block) || !entry_succs.contains(&self.else_block)
        {
            return false;
        }
        for branch in [self.if_block, self.else_block] {
            let succs = branch.successors(ctx);
            if succs.len() != 1 || succs[0] != self.exit_block {
                return false;
            }
        }
        true
    }
}

/// Finds every diamond-shaped `if` reachable in `scope`.
pub struct IfInfos;

impl IfInfos {
    pub fn create(ctx: &IrContext, scope: &Scope, doms: &Dominators<'_>) -> Vec<IfInfo> {
        let mut infos = Vec::new();
        for &exit in &scope.blocks {
            let preds = exit.predecessors(ctx);
            if preds.len() != 2 {
                continue;
            }
            let (p_true, p_false) = (preds[0], preds[1]);
            let Some(header) = doms.common_dominator(p_true, p_false) else {
                continue;
            };
            if header.successors(ctx).len() != 2 {
                continue;
            }
            let Some(term) = header.terminator(ctx).and_then(|t| t.as_terminator(ctx)) else {
                continue;
            };
            let TerminatorKind::ConditionalBranch {
                condition,
                true_target,
                false_target,
            } = term
            else {
                continue;
            };
            let Some(if_block) = true_target.as_branch_target(ctx).map(|bt| bt.destination) else {
                continue;
            };
            let Some(else_block) = false_target.as_branch_target(ctx).map(|bt| bt.destination) else {
                continue;
            };

            let variables = exit_variables(ctx, header, if_block, else_block, exit);

            infos.push(IfInfo {
                condition,
                entry: header,
                if_block,
                else_block,
                exit_block: exit,
                variables,
            });
        }
        infos
    }
}

/// Pairs the exit block's parameters positionally with the branch arguments `if_block` and
/// `else_block` supply, per spec.md §4.5 "per-variable info".
fn exit_variables(
    ctx: &IrContext,
    header: BlockId,
    if_block: BlockId,
    else_block: BlockId,
    exit: BlockId,
) -> Vec<Variable> {
    let true_args = branch_arguments_to(ctx, if_block, exit).or_else(|| branch_arguments_to(ctx, header, exit));
    let false_args = branch_arguments_to(ctx, else_block, exit).or_else(|| branch_arguments_to(ctx, header, exit));
    let (Some(true_args), Some(false_args)) = (true_args, false_args) else {
        return Vec::new();
    };

    exit.parameters(ctx)
        .iter()
        .enumerate()
        .filter_map(|(i, param)| {
            Some(Variable {
                param,
                true_value: *true_args.get(i)?,
                false_value: *false_args.get(i)?,
            })
        })
        .collect()
}

/// The argument tuple `from`'s terminator supplies to `to`, if `from` branches directly to `to`.
fn branch_arguments_to(ctx: &IrContext, from: BlockId, to: BlockId) -> Option<smallvec::SmallVec<[ValueReference; 4]>> {
    let term = from.terminator(ctx)?.as_terminator(ctx)?;
    for target in term.target_ids() {
        if let Some(bt) = target.as_branch_target(ctx) {
            if bt.destination == to {
                return Some(bt.arguments);
            }
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cfg::Cfg;
    use crate::context::IrContext;
    use crate::method::Method;
    use crate::types::BasicValueType;
    use crate::value::ConstantValue;
    use pretty_assertions::assert_eq;

    #[test]
    fn recognizes_a_simple_diamond() {
        let mut ctx = IrContext::new();
        let i1_ty = ctx.types.basic(BasicValueType::Int1);
        let i32_ty = ctx.types.basic(BasicValueType::Int32);
        let method = Method::declare(&mut ctx, "f", vec![(None, i1_ty)], i32_ty);
        let mut builder = method.create_builder(&mut ctx).unwrap();
        let entry = method.entry_block(&ctx);
        let if_b = builder.create_block(&mut ctx, None);
        let else_b = builder.create_block(&mut ctx, None);
        let exit = builder.create_block(&mut ctx, None);

        let cond = method.parameters(&ctx).get(0).unwrap();

        let mut exit_bb = builder.block_builder(exit);
        let exit_param = exit_bb.add_parameter(&mut ctx, None, i32_ty);
        exit_bb.set_return(&mut ctx, Some(exit_param)).unwrap();

        let mut if_bb = builder.block_builder(if_b);
        let one = if_bb.create_constant(&mut ctx, ConstantValue::Int(1), i32_ty);
        if_bb.set_unconditional_branch(&mut ctx, exit, vec![one]).unwrap();

        let mut else_bb = builder.block_builder(else_b);
        let two = else_bb.create_constant(&mut ctx, ConstantValue::Int(2), i32_ty);
        else_bb.set_unconditional_branch(&mut ctx, exit, vec![two]).unwrap();

        let mut entry_bb = builder.block_builder(entry);
        entry_bb
            .set_conditional_branch(&mut ctx, cond, if_b, vec![], else_b, vec![])
            .unwrap();
        builder.dispose(&mut ctx).unwrap();

        let scope = Scope::create(&mut ctx, method);
        let cfg = Cfg::create(&ctx, &scope);
        let doms = Dominators::create(&cfg);
        let infos = IfInfos::create(&ctx, &scope, &doms);

        assert_eq!(infos.len(), 1);
        let info = &infos[0];
        assert_eq!(info.entry, entry);
        assert_eq!(info.if_block, if_b);
        assert_eq!(info.else_block, else_b);
        assert_eq!(info.exit_block, exit);
        assert!(info.is_simple_if(&ctx));

        assert_eq!(
            info.variables,
            vec![Variable {
                param: exit_param,
                true_value: ValueReference::resolved(one),
                false_value: ValueReference::resolved(two),
            }]
        );
    }
}
