//! The top-level IR container: a method's parameters, return type, and entry block.
//!
//! A [`Method`] is interned into an [`IrContext`] by [`Method::declare`] and is mutated only
//! through a live [`MethodBuilder`], acquired via [`Method::create_builder`]. The context enforces
//! at most one live builder per method (spec.md §5).

use rustc_hash::FxHashSet;

use crate::block::{BasicBlockData, BlockBuilder};
use crate::context::IrContext;
use crate::error::IrResult;
use crate::ids::{BlockId, MethodId, ValueId};
use crate::parameter::{ParameterCollection, ParameterCollectionBuilder, ParameterFactory, ParameterOwner};
use crate::types::TypeHandle;

pub(crate) struct MethodData {
    pub(crate) name: String,
    pub(crate) parameters: ParameterCollection,
    pub(crate) return_type: TypeHandle,
    pub(crate) entry_block: BlockId,
    /// Populated by analyses (`Scope::create`); empty until the first analysis runs.
    pub(crate) reachable_blocks: FxHashSet<BlockId>,
}

/// A handle to a method interned in an [`IrContext`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Method(pub(crate) MethodId);

struct MethodParamFactory {
    method: MethodId,
}

impl ParameterFactory for MethodParamFactory {
    fn owner(&self) -> ParameterOwner {
        ParameterOwner::Method(self.method)
    }
}

impl Method {
    /// Declares a new method: interns a `MethodData` with the given function parameter types and
    /// return type, and creates its entry block. Mirrors `sway_ir::Context::Declare` /
    /// `Module::create_function`'s role as the method-interning entry point.
    pub fn declare(ctx: &mut IrContext, name: impl Into<String>, param_types: Vec<(Option<String>, TypeHandle)>, return_type: TypeHandle) -> Method {
        // Reserve the method slot first so the entry block can be told its owner.
        let placeholder = ctx.methods.insert(MethodData {
            name: name.into(),
            parameters: ParameterCollection::new(),
            return_type,
            entry_block: BlockId(generational_arena::Index::from_raw_parts(0, 0)),
            reachable_blocks: FxHashSet::default(),
        });
        let method_id = MethodId(placeholder);

        let entry_block = BasicBlockData::create(ctx, method_id, Some("entry".to_string()));
        ctx.method_data_mut(method_id).entry_block = entry_block;

        let factory = MethodParamFactory { method: method_id };
        let mut params = ParameterCollection::new();
        {
            let mut builder = ParameterCollectionBuilder::new(&mut params, factory);
            for (name, ty) in param_types {
                builder.create_and_append(ctx, name, ty);
            }
        }
        ctx.method_data_mut(method_id).parameters = params;

        Method(method_id)
    }

    pub fn id(self) -> MethodId {
        self.0
    }

    pub fn name(self, ctx: &IrContext) -> String {
        ctx.method_data(self.0).name.clone()
    }

    pub fn entry_block(self, ctx: &IrContext) -> BlockId {
        ctx.method_data(self.0).entry_block
    }

    pub fn return_type(self, ctx: &IrContext) -> TypeHandle {
        ctx.method_data(self.0).return_type
    }

    pub fn parameters(self, ctx: &IrContext) -> ParameterCollection {
        ctx.method_data(self.0).parameters.clone()
    }

    /// Caches the reachable-block set computed by `Scope::create`. Only analyses write this; it
    /// is never consulted for correctness, only exposed for debugging/introspection.
    pub(crate) fn set_reachable_blocks(self, ctx: &mut IrContext, blocks: FxHashSet<BlockId>) {
        ctx.method_data_mut(self.0).reachable_blocks = blocks;
    }

    pub fn reachable_blocks(self, ctx: &IrContext) -> FxHashSet<BlockId> {
        ctx.method_data(self.0).reachable_blocks.clone()
    }

    /// Acquires the exclusive mutation right for this method. Fails with `InvalidState` if a
    /// builder is already live (spec.md §5).
    pub fn create_builder(self, ctx: &mut IrContext) -> IrResult<MethodBuilder> {
        ctx.acquire_builder(self.0)?;
        tracing::debug!(method = %self.name(ctx), "acquired Method::Builder");
        Ok(MethodBuilder { method: self })
    }
}

/// The single mutator for a method's graph. Hands out [`BlockBuilder`]s for individual blocks;
/// disposing the `MethodBuilder` releases the method for the next builder to acquire.
pub struct MethodBuilder {
    method: Method,
}

impl MethodBuilder {
    pub fn method(&self) -> Method {
        self.method
    }

    /// Returns a fresh [`BlockBuilder`] for the method's entry block — a convenience for the very
    /// common "build the one block this method needs" case.
    pub fn block(&self, ctx: &IrContext) -> BlockBuilder {
        BlockBuilder::new(self.method.entry_block(ctx))
    }

    pub fn create_block(&mut self, ctx: &mut IrContext, name: Option<String>) -> BlockId {
        let block = BasicBlockData::create(ctx, self.method.0, name);
        block
    }

    pub fn block_builder(&self, block: BlockId) -> BlockBuilder {
        BlockBuilder::new(block)
    }

    /// Commits this builder's work and releases the method for the next builder. Discarding a
    /// `MethodBuilder` without calling `dispose` loses any pending edits silently, per spec.md §5
    /// ("transformation drivers... may abandon a pass by discarding the builder without disposing,
    /// in which case no effect is observed").
    pub fn dispose(self, ctx: &mut IrContext) -> IrResult<Method> {
        ctx.release_builder(self.method.0);
        tracing::debug!(method = %self.method.name(ctx), "released Method::Builder");
        Ok(self.method)
    }
}

impl ValueId {
    pub(crate) fn is_call_to(self, ctx: &IrContext, method: Method) -> bool {
        matches!(&ctx.value(self).kind, crate::value::ValueKind::Call { callee, .. } if *callee == method.0)
    }
}
