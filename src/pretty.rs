//! Textual debug rendering (spec.md §6 "Debug surface").
//!
//! Every value renders as `<type> <reference>`, e.g. `i32 %v7`, and carries a short kind prefix
//! (`ret`, `branch`, `switch`, `param`, …) via [`ValueId::debug_prefix`]. This exists for test
//! goldens, not as a stable API. Grounded on `sway_ir::pretty::DebugWithContext`
//! (`examples/Natalie359738-sway/sway-ir/src/block.rs`, `instruction.rs`, `constant.rs`): a
//! `ValueId` is a bare arena index and can't stringify on its own, so rendering takes the owning
//! [`IrContext`] explicitly rather than going through `std::fmt::Display`.

use std::fmt;

use crate::context::IrContext;
use crate::ids::ValueId;

/// Implemented by anything that needs an [`IrContext`] in hand to render itself.
pub trait DebugWithContext {
    fn fmt_with_context(&self, f: &mut fmt::Formatter<'_>, ctx: &IrContext) -> fmt::Result;
}

impl DebugWithContext for ValueId {
    fn fmt_with_context(&self, f: &mut fmt::Formatter<'_>, ctx: &IrContext) -> fmt::Result {
        write!(f, "{} %v{}", self.ty(ctx).name(&ctx.types), self.node_id(ctx).0)
    }
}

/// A `Display`-able wrapper pairing a value with the context it needs to render. Build one with
/// [`ValueId::debug`].
pub struct ValueDebug<'a> {
    value: ValueId,
    ctx: &'a IrContext,
}

impl fmt::Display for ValueDebug<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.value.fmt_with_context(f, self.ctx)
    }
}

impl ValueId {
    /// `<type> <reference>`, e.g. `i32 %v7`. Test-golden use only (spec.md §6).
    pub fn debug(self, ctx: &IrContext) -> ValueDebug<'_> {
        ValueDebug { value: self, ctx }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::IrContext;
    use crate::method::Method;
    use crate::types::BasicValueType;
    use crate::value::ConstantValue;

    #[test]
    fn renders_type_and_reference() {
        let mut ctx = IrContext::new();
        let i32_ty = ctx.types.basic(BasicValueType::Int32);
        let method = Method::declare(&mut ctx, "f", vec![], i32_ty);
        let mut builder = method.create_builder(&mut ctx).unwrap();
        let entry = method.entry_block(&ctx);
        let mut entry_bb = builder.block_builder(entry);
        let forty_two = entry_bb.create_constant(&mut ctx, ConstantValue::Int(42), i32_ty);
        entry_bb.set_return(&mut ctx, Some(forty_two)).unwrap();
        builder.dispose(&mut ctx).unwrap();

        assert_eq!(forty_two.debug(&ctx).to_string(), format!("i32 %v{}", forty_two.node_id(&ctx).0));
        assert_eq!(forty_two.debug_prefix(&ctx), "const");

        let term = entry.terminator(&ctx).unwrap();
        assert_eq!(term.debug_prefix(&ctx), "ret");
    }

    #[test]
    fn every_terminator_kind_has_a_short_prefix() {
        let mut ctx = IrContext::new();
        let i1_ty = ctx.types.basic(BasicValueType::Int1);
        let i32_ty = ctx.types.basic(BasicValueType::Int32);
        let method = Method::declare(&mut ctx, "f", vec![(None, i1_ty)], i32_ty);
        let mut builder = method.create_builder(&mut ctx).unwrap();
        let entry = method.entry_block(&ctx);
        let if_b = builder.create_block(&mut ctx, None);
        let else_b = builder.create_block(&mut ctx, None);
        let cond = method.parameters(&ctx).get(0).unwrap();

        let mut if_bb = builder.block_builder(if_b);
        let one = if_bb.create_constant(&mut ctx, ConstantValue::Int(1), i32_ty);
        if_bb.set_return(&mut ctx, Some(one)).unwrap();

        let mut else_bb = builder.block_builder(else_b);
        let two = else_bb.create_constant(&mut ctx, ConstantValue::Int(2), i32_ty);
        else_bb.set_return(&mut ctx, Some(two)).unwrap();

        let mut entry_bb = builder.block_builder(entry);
        entry_bb
            .set_conditional_branch(&mut ctx, cond, if_b, vec![], else_b, vec![])
            .unwrap();
        builder.dispose(&mut ctx).unwrap();

        let term = entry.terminator(&ctx).unwrap();
        assert_eq!(term.debug_prefix(&ctx), "branch");
        assert_eq!(param_prefix(&ctx, cond), "param");
    }

    fn param_prefix(ctx: &IrContext, v: ValueId) -> &'static str {
        v.debug_prefix(ctx)
    }
}
