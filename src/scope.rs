//! Frozen snapshots of a method's reachable graph.
//!
//! Analyses (`Cfg`, `Dominators`, `IfInfos`) never walk a live `MethodBuilder`: they operate on a
//! [`Scope`], a read-only, deterministically ordered view computed once and discarded when the
//! underlying method is mutated again (spec.md §3 "Scope", §5 "mutating the underlying method
//! invalidates [analyses] — consumers must rebuild").

use rustc_hash::FxHashSet;

use crate::context::IrContext;
use crate::ids::BlockId;
use crate::method::Method;

/// A method's reachable blocks, visited from the entry block in reverse-post-order.
///
/// Reverse-post-order is the traversal spec.md §6 promises for the `Scope` iterator ("visits
/// reachable blocks in reverse-post-order deterministically — same input ⇒ same order"); it also
/// happens to be the order every analysis in §4.5 wants blocks in (a block's dominator is always
/// visited before it).
#[derive(Debug, Clone)]
pub struct Scope {
    pub method: Method,
    pub entry: BlockId,
    pub blocks: Vec<BlockId>,
}

impl Scope {
    /// Computes the reachable-block snapshot for `method` and caches it on the method's
    /// `MethodData::reachable_blocks` (spec.md §3 Method: "an unordered set of reachable blocks
    /// (materialised by analyses)").
    pub fn create(ctx: &mut IrContext, method: Method) -> Scope {
        let entry = method.entry_block(ctx);
        let blocks = reverse_post_order(ctx, entry);
        let reachable: FxHashSet<BlockId> = blocks.iter().copied().collect();
        method.set_reachable_blocks(ctx, reachable);
        Scope { method, entry, blocks }
    }

    pub fn contains(&self, block: BlockId) -> bool {
        self.blocks.contains(&block)
    }

    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }
}

/// Post-order depth-first walk over successors starting at `entry`, reversed. Equivalent to the
/// standard reverse-postorder used for forward dataflow problems, computed directly rather than
/// through `petgraph` since we only have `BlockId`s in hand here, not yet a `Cfg`.
fn reverse_post_order(ctx: &IrContext, entry: BlockId) -> Vec<BlockId> {
    let mut visited = FxHashSet::default();
    let mut post_order = Vec::new();
    let mut stack: Vec<(BlockId, std::vec::IntoIter<BlockId>)> = Vec::new();

    visited.insert(entry);
    stack.push((entry, entry.successors(ctx).into_iter()));

    while let Some((block, iter)) = stack.last_mut() {
        match iter.next() {
            Some(succ) => {
                if visited.insert(succ) {
                    let succ_iter = succ.successors(ctx).into_iter();
                    stack.push((succ, succ_iter));
                }
            }
            None => {
                post_order.push(*block);
                stack.pop();
            }
        }
    }

    post_order.reverse();
    post_order
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::IrContext;
    use crate::types::BasicValueType;

    #[test]
    fn scope_visits_entry_first_in_a_straight_line() {
        let mut ctx = IrContext::new();
        let i32_ty = ctx.types.basic(BasicValueType::Int32);
        let method = Method::declare(&mut ctx, "f", vec![], i32_ty);
        let mut builder = method.create_builder(&mut ctx).unwrap();
        let entry = method.entry_block(&ctx);
        let mid = builder.create_block(&mut ctx, None);
        let tail = builder.create_block(&mut ctx, None);

        let mut entry_b = builder.block_builder(entry);
        entry_b.set_unconditional_branch(&mut ctx, mid, vec![]).unwrap();
        let mut mid_b = builder.block_builder(mid);
        mid_b.set_unconditional_branch(&mut ctx, tail, vec![]).unwrap();
        let mut tail_b = builder.block_builder(tail);
        let c = tail_b.create_constant(&mut ctx, crate::value::ConstantValue::Int(1), i32_ty);
        tail_b.set_return(&mut ctx, Some(c)).unwrap();
        builder.dispose(&mut ctx).unwrap();

        let scope = Scope::create(&mut ctx, method);
        assert_eq!(scope.blocks, vec![entry, mid, tail]);
        assert_eq!(scope.entry, entry);
    }

    #[test]
    fn scope_skips_unreachable_blocks() {
        let mut ctx = IrContext::new();
        let i32_ty = ctx.types.basic(BasicValueType::Int32);
        let method = Method::declare(&mut ctx, "f", vec![], i32_ty);
        let mut builder = method.create_builder(&mut ctx).unwrap();
        let entry = method.entry_block(&ctx);
        let _unreachable = builder.create_block(&mut ctx, None);

        let mut entry_b = builder.block_builder(entry);
        let c = entry_b.create_constant(&mut ctx, crate::value::ConstantValue::Int(1), i32_ty);
        entry_b.set_return(&mut ctx, Some(c)).unwrap();
        builder.dispose(&mut ctx).unwrap();

        let scope = Scope::create(&mut ctx, method);
        assert_eq!(scope.blocks, vec![entry]);
    }
}
