//! The IR context: the sole owner of every value, block and method in a compilation.
//!
//! Mirrors `sway_ir::context::Context`'s role as the backing [`generational_arena::Arena`] store,
//! generalised to the node-id + replacement-chain model spec.md calls for. Everything else in this
//! crate holds `Copy` handles into these arenas and never a lifetime root into them.

use std::cell::Cell;
use std::sync::atomic::{AtomicU64, Ordering};

use generational_arena::Arena;
use rustc_hash::FxHashSet;

use crate::block::BasicBlockData;
use crate::error::{IrError, IrResult};
use crate::ids::{BlockId, MethodId, NodeId, ValueId};
use crate::method::MethodData;
use crate::types::TypeTable;
use crate::value::ValueData;

/// A single-use stamp handed out by [`IrContext::new_marker`] for visit-bit bookkeeping in
/// analyses (reachability sweeps, dominator fixed-point iteration). Comparing a block's
/// `last_visited` stamp against the current marker is cheaper than clearing a `HashSet` per pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Marker(u64);

/// Owns every [`crate::value::ValueData`], [`crate::block::BasicBlockData`] and
/// [`crate::method::MethodData`] in a compilation unit. Node ids and visit markers are allocated
/// from atomic counters so that distinct methods may be mutated from distinct threads, per
/// spec.md §5's "method-level isolation" concurrency model — the context itself is the one
/// structure those threads would contend on.
pub struct IrContext {
    pub(crate) values: Arena<ValueData>,
    pub(crate) blocks: Arena<BasicBlockData>,
    pub(crate) methods: Arena<MethodData>,
    pub types: TypeTable,
    next_node_id: AtomicU64,
    next_marker: AtomicU64,
    /// Methods with a live `Method::Builder`. Enforces spec.md §5's "at most one live builder per
    /// method" via an acquire/release handshake instead of a runtime borrow-check trick.
    builders_live: FxHashSet<MethodId>,
}

impl Default for IrContext {
    fn default() -> Self {
        Self::new()
    }
}

impl IrContext {
    pub fn new() -> Self {
        IrContext {
            values: Arena::new(),
            blocks: Arena::new(),
            methods: Arena::new(),
            types: TypeTable::new(),
            next_node_id: AtomicU64::new(0),
            next_marker: AtomicU64::new(1),
            builders_live: FxHashSet::default(),
        }
    }

    pub(crate) fn new_node_id(&self) -> NodeId {
        NodeId(self.next_node_id.fetch_add(1, Ordering::Relaxed))
    }

    /// Allocate a fresh marker. No two live markers from the same context are ever equal, so a
    /// block's `last_visited` stamp can be compared for equality to test set membership.
    pub fn new_marker(&self) -> Marker {
        Marker(self.next_marker.fetch_add(1, Ordering::Relaxed))
    }

    pub(crate) fn value(&self, id: ValueId) -> &ValueData {
        self.values
            .get(id.0)
            .expect("ValueId outlived its IrContext")
    }

    pub(crate) fn value_mut(&mut self, id: ValueId) -> &mut ValueData {
        self.values
            .get_mut(id.0)
            .expect("ValueId outlived its IrContext")
    }

    pub(crate) fn block(&self, id: BlockId) -> &BasicBlockData {
        self.blocks
            .get(id.0)
            .expect("BlockId outlived its IrContext")
    }

    pub(crate) fn block_mut(&mut self, id: BlockId) -> &mut BasicBlockData {
        self.blocks
            .get_mut(id.0)
            .expect("BlockId outlived its IrContext")
    }

    pub(crate) fn method_data(&self, id: MethodId) -> &MethodData {
        self.methods
            .get(id.0)
            .expect("MethodId outlived its IrContext")
    }

    pub(crate) fn method_data_mut(&mut self, id: MethodId) -> &mut MethodData {
        self.methods
            .get_mut(id.0)
            .expect("MethodId outlived its IrContext")
    }

    /// Acquire the exclusive mutation right for `method`. Returns `InvalidState` if a builder for
    /// this method is already live — never blocks, per spec.md §5 ("no operation in the core
    /// suspends").
    pub(crate) fn acquire_builder(&mut self, method: MethodId) -> IrResult<()> {
        if !self.builders_live.insert(method) {
            return Err(IrError::invalid_state(
                "a Method::Builder is already live for this method",
            ));
        }
        Ok(())
    }

    pub(crate) fn release_builder(&mut self, method: MethodId) {
        self.builders_live.remove(&method);
    }
}

/// A `Cell`-backed visited-bit, stored inline on a block so reachability sweeps over a [`Marker`]
/// avoid allocating a `HashSet` per pass.
#[derive(Debug, Default)]
pub(crate) struct VisitStamp(Cell<Option<u64>>);

impl VisitStamp {
    pub(crate) fn mark(&self, marker: Marker) -> bool {
        let already = self.0.get() == Some(marker.0);
        self.0.set(Some(marker.0));
        !already
    }

    pub(crate) fn is_marked(&self, marker: Marker) -> bool {
        self.0.get() == Some(marker.0)
    }
}
