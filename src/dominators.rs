//! Dominator tree over a [`Cfg`].
//!
//! spec.md §4.5 leaves the algorithm a free choice ("standard iterative fixed-point or
//! Lengauer–Tarjan"); `petgraph::algo::dominators::simple_fast` implements the iterative
//! fixed-point variant, matching `sway-core`'s existing `petgraph` dependency rather than hand
//! -rolling a second graph algorithm.

use petgraph::algo::dominators::{self, Dominators as PetgraphDominators};
use petgraph::graph::NodeIndex;
use rustc_hash::FxHashSet;

use crate::cfg::Cfg;
use crate::ids::BlockId;

pub struct Dominators<'a> {
    cfg: &'a Cfg,
    inner: PetgraphDominators<NodeIndex>,
}

impl<'a> Dominators<'a> {
    pub fn create(cfg: &'a Cfg) -> Dominators<'a> {
        let inner = dominators::simple_fast(&cfg.graph, cfg.entry);
        Dominators { cfg, inner }
    }

    /// The immediate dominator of `block`, or `None` for the entry block (which has none).
    pub fn immediate_dominator(&self, block: BlockId) -> Option<BlockId> {
        let node = self.cfg.node_of(block)?;
        self.inner.immediate_dominator(node).map(|n| self.cfg.block_of(n))
    }

    pub fn dominates(&self, a: BlockId, b: BlockId) -> bool {
        let (Some(a_node), Some(b_node)) = (self.cfg.node_of(a), self.cfg.node_of(b)) else {
            return false;
        };
        self.inner.dominators(b_node).map(|mut ds| ds.any(|d| d == a_node)).unwrap_or(false)
    }

    /// Walks both blocks' dominator chains to find their closest common ancestor, per spec.md
    /// §4.5 `GetImmediateCommonDominator(a, b)`.
    pub fn common_dominator(&self, a: BlockId, b: BlockId) -> Option<BlockId> {
        let a_node = self.cfg.node_of(a)?;
        let b_node = self.cfg.node_of(b)?;
        let a_chain: Vec<NodeIndex> = self.inner.dominators(a_node)?.collect();
        let b_chain: FxHashSet<NodeIndex> = self.inner.dominators(b_node)?.collect();
        a_chain
            .into_iter()
            .find(|n| b_chain.contains(n))
            .map(|n| self.cfg.block_of(n))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::IrContext;
    use crate::method::Method;
    use crate::scope::Scope;
    use crate::types::BasicValueType;
    use crate::value::ConstantValue;

    #[test]
    fn entry_dominates_a_diamonds_exit_through_the_header() {
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
        let mut entry_bb = builder.block_builder(entry);
        entry_bb
            .set_conditional_branch(&mut ctx, cond, if_b, vec![], else_b, vec![])
            .unwrap();
        let mut if_bb = builder.block_builder(if_b);
        if_bb.set_unconditional_branch(&mut ctx, exit, vec![]).unwrap();
        let mut else_bb = builder.block_builder(else_b);
        else_bb.set_unconditional_branch(&mut ctx, exit, vec![]).unwrap();
        let mut exit_bb = builder.block_builder(exit);
        let c = exit_bb.create_constant(&mut ctx, ConstantValue::Int(0), i32_ty);
        exit_bb.set_return(&mut ctx, Some(c)).unwrap();
        builder.dispose(&mut ctx).unwrap();

        let scope = Scope::create(&mut ctx, method);
        let cfg = Cfg::create(&ctx, &scope);
        let doms = Dominators::create(&cfg);

        assert_eq!(doms.immediate_dominator(if_b), Some(entry));
        assert_eq!(doms.immediate_dominator(else_b), Some(entry));
        assert_eq!(doms.immediate_dominator(exit), Some(entry));
        assert!(doms.dominates(entry, exit));
        assert_eq!(doms.common_dominator(if_b, else_b), Some(entry));
    }
}
