//! Control-flow graph derived from a frozen [`Scope`].
//!
//! `Cfg` is a thin `petgraph` wrapper: one node per reachable block, one edge per terminator
//! target, built once from a `Scope` and handed to `Dominators` (spec.md §4.5). Grounded on
//! `sway-core`'s own dependency on `petgraph` for its control-flow-graph-shaped analyses.

use petgraph::graph::{DiGraph, NodeIndex};
use rustc_hash::FxHashMap;

use crate::context::IrContext;
use crate::ids::BlockId;
use crate::scope::Scope;

/// A `petgraph::Graph` over a method's reachable blocks, plus the `BlockId <-> NodeIndex`
/// bookkeeping `Dominators` and `IfInfos` need to translate between the two.
pub struct Cfg {
    pub graph: DiGraph<BlockId, ()>,
    pub entry: NodeIndex,
    node_of: FxHashMap<BlockId, NodeIndex>,
}

impl Cfg {
    /// Builds a CFG node per block in `scope`, with one edge per terminator target — spec.md
    /// §4.5's "`Scope.CreateCFG()` produces a CFG node per reachable block with
    /// predecessor/successor lists derived from terminators' target blocks".
    pub fn create(ctx: &IrContext, scope: &Scope) -> Cfg {
        let mut graph = DiGraph::new();
        let mut node_of = FxHashMap::default();
        for &block in &scope.blocks {
            node_of.insert(block, graph.add_node(block));
        }
        for &block in &scope.blocks {
            let from = node_of[&block];
            for succ in block.successors(ctx) {
                if let Some(&to) = node_of.get(&succ) {
                    graph.add_edge(from, to, ());
                }
            }
        }
        let entry = node_of[&scope.entry];
        Cfg { graph, entry, node_of }
    }

    pub fn node_of(&self, block: BlockId) -> Option<NodeIndex> {
        self.node_of.get(&block).copied()
    }

    pub fn block_of(&self, node: NodeIndex) -> BlockId {
        self.graph[node]
    }

    pub fn predecessors(&self, block: BlockId) -> Vec<BlockId> {
        let Some(node) = self.node_of(block) else {
            return Vec::new();
        };
        self.graph
            .neighbors_directed(node, petgraph::Direction::Incoming)
            .map(|n| self.block_of(n))
            .collect()
    }

    pub fn successors(&self, block: BlockId) -> Vec<BlockId> {
        let Some(node) = self.node_of(block) else {
            return Vec::new();
        };
        self.graph
            .neighbors_directed(node, petgraph::Direction::Outgoing)
            .map(|n| self.block_of(n))
            .collect()
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
    fn cfg_mirrors_a_diamond() {
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
        assert_eq!(cfg.successors(entry).len(), 2);
        assert_eq!(cfg.predecessors(exit).len(), 2);
        assert!(cfg.successors(exit).is_empty());
    }
}
