//! If-conversion: rewrites a simple control-flow diamond into a straight-line block whose joined
//! values are selected by a `Predicate` (spec.md §4.6).
//!
//! For each recognized [`crate::ifinfo::IfInfo`]: skip unless it's a simple if; skip if either
//! branch exceeds `max_block_size` or the branches differ in size by more than
//! `max_size_difference`; skip if either branch has side effects. Otherwise merge `if_block` and
//! `else_block` into `entry` without importing their parameters, replace each exit-block
//! parameter with a `Predicate`, then merge `exit_block` into `entry` too.

use rustc_hash::FxHashSet;

use crate::cfg::Cfg;
use crate::context::IrContext;
use crate::dominators::Dominators;
use crate::error::{IrError, IrResult};
use crate::ids::BlockId;
use crate::ifinfo::IfInfos;
use crate::method::Method;
use crate::scope::Scope;
use crate::transform::Pass;

/// The tunable skip thresholds from spec.md §6 "Configuration knobs (if-conversion)".
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IfConversionConfig {
    pub max_block_size: usize,
    pub max_size_difference: usize,
}

impl Default for IfConversionConfig {
    fn default() -> Self {
        IfConversionConfig {
            max_block_size: 2,
            max_size_difference: 1,
        }
    }
}

impl IfConversionConfig {
    /// Validates both knobs are `>= 1`, per spec.md §6 ("Out-of-range values fail with
    /// InvalidArgument").
    pub fn new(max_block_size: usize, max_size_difference: usize) -> IrResult<Self> {
        if max_block_size < 1 {
            return Err(IrError::invalid_argument("max_block_size must be >= 1"));
        }
        if max_size_difference < 1 {
            return Err(IrError::invalid_argument("max_size_difference must be >= 1"));
        }
        Ok(IfConversionConfig {
            max_block_size,
            max_size_difference,
        })
    }
}

pub struct IfConversion {
    config: IfConversionConfig,
}

impl IfConversion {
    pub fn new(config: IfConversionConfig) -> Self {
        IfConversion { config }
    }
}

impl Pass for IfConversion {
    fn run(&self, ctx: &mut IrContext, method: Method) -> IrResult<bool> {
        let scope = Scope::create(ctx, method);
        let cfg = Cfg::create(ctx, &scope);
        let doms = Dominators::create(&cfg);
        let candidates = IfInfos::create(ctx, &scope, &doms);
        if candidates.is_empty() {
            return Ok(false);
        }

        let method_builder = method.create_builder(ctx)?;
        let mut changed = false;
        // A single sweep over the snapshot (spec.md §4.6 "Termination"): candidates that share a
        // block with one already applied are skipped rather than applied twice against a stale
        // shape, since merging is destructive to the blocks it consumes.
        let mut consumed: FxHashSet<BlockId> = FxHashSet::default();

        for info in &candidates {
            let touched = [info.entry, info.if_block, info.else_block, info.exit_block];
            if touched.iter().any(|b| consumed.contains(b)) {
                continue;
            }
            if !info.is_simple_if(ctx) {
                continue;
            }

            let if_size = info.if_block.body(ctx).len();
            let else_size = info.else_block.body(ctx).len();
            if if_size > self.config.max_block_size || else_size > self.config.max_block_size {
                continue;
            }
            if if_size.abs_diff(else_size) > self.config.max_size_difference {
                continue;
            }
            if info.if_block.has_side_effects(ctx) || info.else_block.has_side_effects(ctx) {
                continue;
            }

            tracing::debug!(
                entry = ?info.entry,
                if_block = ?info.if_block,
                else_block = ?info.else_block,
                exit_block = ?info.exit_block,
                "if-converting diamond"
            );

            let mut entry_builder = method_builder.block_builder(info.entry);
            entry_builder.merge_block(ctx, info.if_block, false)?;
            entry_builder.merge_block(ctx, info.else_block, false)?;

            for variable in &info.variables {
                let ty = variable.param.ty(ctx);
                let predicate = entry_builder.create_predicate(
                    ctx,
                    ty,
                    info.condition,
                    variable.true_value,
                    variable.false_value,
                );
                variable.param.replace(ctx, predicate)?;
            }

            entry_builder.merge_block(ctx, info.exit_block, false)?;
            entry_builder.perform_parameter_removal(ctx);
            entry_builder.perform_removal(ctx);

            consumed.insert(info.entry);
            consumed.insert(info.if_block);
            consumed.insert(info.else_block);
            consumed.insert(info.exit_block);
            changed = true;
        }

        method_builder.dispose(ctx)?;
        Ok(changed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::IrContext;
    use crate::types::BasicValueType;
    use crate::value::{ConstantValue, ValueKind};

    fn build_diamond(ctx: &mut IrContext, if_has_call: bool) -> Method {
        let i1_ty = ctx.types.basic(BasicValueType::Int1);
        let i32_ty = ctx.types.basic(BasicValueType::Int32);
        let callee = Method::declare(ctx, "callee", vec![], i32_ty);
        {
            let cb = callee.create_builder(ctx).unwrap();
            let mut cbb = cb.block(ctx);
            let z = cbb.create_constant(ctx, ConstantValue::Int(0), i32_ty);
            cbb.set_return(ctx, Some(z)).unwrap();
            cb.dispose(ctx).unwrap();
        }

        let method = Method::declare(ctx, "f", vec![(None, i1_ty)], i32_ty);
        let mut builder = method.create_builder(ctx).unwrap();
        let entry = method.entry_block(ctx);
        let if_b = builder.create_block(ctx, None);
        let else_b = builder.create_block(ctx, None);
        let exit = builder.create_block(ctx, None);

        let cond = method.parameters(ctx).get(0).unwrap();

        let mut exit_bb = builder.block_builder(exit);
        let exit_param = exit_bb.add_parameter(ctx, None, i32_ty);
        exit_bb.set_return(ctx, Some(exit_param)).unwrap();

        let mut if_bb = builder.block_builder(if_b);
        if if_has_call {
            if_bb.create_call(ctx, callee, vec![]);
        }
        let one = if_bb.create_constant(ctx, ConstantValue::Int(1), i32_ty);
        if_bb.set_unconditional_branch(ctx, exit, vec![one]).unwrap();

        let mut else_bb = builder.block_builder(else_b);
        let two = else_bb.create_constant(ctx, ConstantValue::Int(2), i32_ty);
        else_bb.set_unconditional_branch(ctx, exit, vec![two]).unwrap();

        let mut entry_bb = builder.block_builder(entry);
        entry_bb
            .set_conditional_branch(ctx, cond, if_b, vec![], else_b, vec![])
            .unwrap();
        builder.dispose(ctx).unwrap();
        method
    }

    #[test]
    fn collapses_a_simple_diamond_into_one_block() {
        let mut ctx = IrContext::new();
        let method = build_diamond(&mut ctx, false);

        let pass = IfConversion::new(IfConversionConfig::default());
        let changed = pass.run(&mut ctx, method).unwrap();
        assert!(changed);

        let scope = Scope::create(&mut ctx, method);
        assert_eq!(scope.blocks.len(), 1);
        let entry = scope.entry;
        let term = entry.terminator(&ctx).unwrap().as_terminator(&ctx).unwrap();
        let crate::terminator::TerminatorKind::Return { value } = term else {
            panic!("expected a return terminator after if-conversion");
        };
        let returned = value.unwrap().target(&ctx);
        assert!(matches!(returned.kind(&ctx), ValueKind::Predicate { .. }));
    }

    #[test]
    fn skips_diamonds_with_side_effects() {
        let mut ctx = IrContext::new();
        let method = build_diamond(&mut ctx, true);

        let pass = IfConversion::new(IfConversionConfig::default());
        let changed = pass.run(&mut ctx, method).unwrap();
        assert!(!changed);

        let scope = Scope::create(&mut ctx, method);
        assert_eq!(scope.blocks.len(), 4);
    }

    #[test]
    fn rejects_out_of_range_config() {
        assert!(IfConversionConfig::new(0, 1).is_err());
        assert!(IfConversionConfig::new(2, 0).is_err());
        assert!(IfConversionConfig::new(2, 1).is_ok());
    }
}
