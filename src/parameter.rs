//! Parameters and the ordered, mutable collection that owns them.
//!
//! A [`ParameterData`] is either a function parameter (owned by a [`crate::method::Method`], its
//! `block` field is `None`) or a block parameter (owned by a [`crate::block::BasicBlock`], acting
//! as that block's SSA join point). Per spec.md §9, ownership is expressed as a tagged variant on
//! the parameter itself rather than two separate types — the non-owning back-pointer (a block
//! parameter's `BasicBlock`) is a lookup, never a lifetime root.

use crate::context::IrContext;
use crate::error::{IrError, IrResult};
use crate::ids::{BlockId, MethodId, ValueId};
use crate::types::TypeHandle;
use crate::value::{ValueData, ValueKind};

/// Which graph element owns a parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ParameterOwner {
    Method(MethodId),
    Block(BlockId),
}

#[derive(Debug, Clone)]
pub struct ParameterData {
    pub owner: ParameterOwner,
    pub index: usize,
    pub name: Option<String>,
}

/// An ordered, mutable list of parameter `ValueId`s belonging to a method or block.
///
/// Indices are observably stable: they only change via [`ParameterCollection::perform_removal`]
/// or an explicit [`ParameterCollection::update_indices`] call, never as a side effect of reading
/// the collection (spec.md §3).
#[derive(Debug, Clone, Default)]
pub struct ParameterCollection {
    params: Vec<ValueId>,
}

impl ParameterCollection {
    pub fn new() -> Self {
        ParameterCollection { params: Vec::new() }
    }

    pub fn len(&self) -> usize {
        self.params.len()
    }

    pub fn is_empty(&self) -> bool {
        self.params.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = ValueId> + '_ {
        self.params.iter().copied()
    }

    pub fn get(&self, index: usize) -> Option<ValueId> {
        self.params.get(index).copied()
    }

    pub fn contains(&self, id: ValueId) -> bool {
        self.params.contains(&id)
    }

    pub fn index_of(&self, id: ValueId) -> Option<usize> {
        self.params.iter().position(|p| *p == id)
    }

    pub(crate) fn append(&mut self, id: ValueId) {
        self.params.push(id);
    }

    pub(crate) fn insert_at_front(&mut self, id: ValueId) {
        self.params.insert(0, id);
    }

    pub(crate) fn add_range(&mut self, other: &ParameterCollection) {
        self.params.extend(other.params.iter().copied());
    }

    pub(crate) fn remove(&mut self, id: ValueId) -> bool {
        if let Some(pos) = self.index_of(id) {
            self.params.remove(pos);
            true
        } else {
            false
        }
    }

    pub(crate) fn remove_at(&mut self, index: usize) -> ValueId {
        self.params.remove(index)
    }

    /// Re-numbers every parameter's `index` field to match its current position.
    pub(crate) fn update_indices(&self, ctx: &mut IrContext) {
        for (i, id) in self.params.iter().enumerate() {
            if let ValueKind::Parameter(p) = &mut ctx.value_mut(*id).kind {
                p.index = i;
            }
        }
    }

    /// Drops every parameter that has been `Replace`d and compacts the remaining indices.
    /// Returns the indices (in the collection's order *before* compaction) that were dropped, so
    /// callers can strip the corresponding branch-target arguments in lock-step.
    pub(crate) fn perform_removal(&mut self, ctx: &mut IrContext) -> Vec<usize> {
        let mut dropped = Vec::new();
        let mut kept = Vec::with_capacity(self.params.len());
        for (i, id) in self.params.iter().enumerate() {
            if id.is_replaced(ctx) {
                dropped.push(i);
            } else {
                kept.push(*id);
            }
        }
        self.params = kept;
        self.update_indices(ctx);
        dropped
    }
}

/// The capability an owner (method or block) supplies to actually construct a [`ParameterData`]
/// node, register it in the [`IrContext`], and receive add/remove notifications. Spec.md §4.2
/// calls this a "parameter-creation strategy"; spec.md §9 calls for it to be expressed as a small
/// trait rather than a generic type parameter threaded everywhere.
pub trait ParameterFactory {
    fn owner(&self) -> ParameterOwner;

    fn create(&self, ctx: &mut IrContext, name: Option<String>, ty: TypeHandle, index: usize) -> ValueId {
        let block = match self.owner() {
            ParameterOwner::Block(b) => Some(b),
            ParameterOwner::Method(_) => None,
        };
        let node_id = ctx.new_node_id();
        let data = ValueData::new(
            node_id,
            block,
            ty,
            ValueKind::Parameter(ParameterData {
                owner: self.owner(),
                index,
                name,
            }),
        );
        ValueId(ctx.values.insert(data))
    }
}

/// Mutator over a [`ParameterCollection`] paired with the owner's [`ParameterFactory`]. This is
/// the only way new parameters are created or removed; the collection itself has no way to
/// fabricate a `ValueId` on its own.
pub struct ParameterCollectionBuilder<'a, P: ParameterFactory> {
    collection: &'a mut ParameterCollection,
    factory: P,
}

impl<'a, P: ParameterFactory> ParameterCollectionBuilder<'a, P> {
    pub fn new(collection: &'a mut ParameterCollection, factory: P) -> Self {
        ParameterCollectionBuilder { collection, factory }
    }

    pub fn create_and_append(&mut self, ctx: &mut IrContext, name: Option<String>, ty: TypeHandle) -> ValueId {
        let index = self.collection.len();
        let id = self.factory.create(ctx, name, ty, index);
        self.collection.append(id);
        id
    }

    pub fn create_and_insert_at_front(
        &mut self,
        ctx: &mut IrContext,
        name: Option<String>,
        ty: TypeHandle,
    ) -> ValueId {
        let id = self.factory.create(ctx, name, ty, 0);
        self.collection.insert_at_front(id);
        self.collection.update_indices(ctx);
        id
    }

    pub fn add_range(&mut self, ctx: &mut IrContext, other: &ParameterCollection) {
        self.collection.add_range(other);
        self.collection.update_indices(ctx);
    }

    pub fn remove(&mut self, ctx: &mut IrContext, id: ValueId) -> IrResult<()> {
        if !self.collection.remove(id) {
            return Err(IrError::invalid_argument("parameter not found in this collection"));
        }
        self.collection.update_indices(ctx);
        Ok(())
    }

    pub fn remove_at(&mut self, ctx: &mut IrContext, index: usize) -> IrResult<ValueId> {
        if index >= self.collection.len() {
            return Err(IrError::invalid_argument("parameter index out of range"));
        }
        let id = self.collection.remove_at(index);
        self.collection.update_indices(ctx);
        Ok(id)
    }

    pub fn perform_removal(&mut self, ctx: &mut IrContext) -> Vec<usize> {
        self.collection.perform_removal(ctx)
    }
}

impl ValueId {
    pub fn as_parameter(self, ctx: &IrContext) -> Option<ParameterData> {
        match &ctx.value(self).kind {
            ValueKind::Parameter(p) => Some(p.clone()),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::method::Method;
    use crate::types::BasicValueType;

    #[test]
    fn perform_removal_compacts_and_renumbers() {
        let mut ctx = IrContext::new();
        let i32_ty = ctx.types.basic(BasicValueType::Int32);
        let method = Method::declare(&mut ctx, "f", vec![], i32_ty);
        let method_builder = method.create_builder(&mut ctx).unwrap();
        let entry = method.entry_block(&ctx);
        let mut block_builder = method_builder.block_builder(entry);

        let p0 = block_builder.add_parameter(&mut ctx, None, i32_ty);
        let p1 = block_builder.add_parameter(&mut ctx, None, i32_ty);
        let p2 = block_builder.add_parameter(&mut ctx, None, i32_ty);

        assert_eq!(p0.as_parameter(&ctx).unwrap().index, 0);
        assert_eq!(p1.as_parameter(&ctx).unwrap().index, 1);
        assert_eq!(p2.as_parameter(&ctx).unwrap().index, 2);

        let replacement = block_builder.add_parameter(&mut ctx, None, i32_ty);
        p1.replace(&mut ctx, replacement).unwrap();
        block_builder.perform_parameter_removal(&mut ctx);

        assert_eq!(p0.as_parameter(&ctx).unwrap().index, 0);
        assert_eq!(p2.as_parameter(&ctx).unwrap().index, 1);

        method_builder.dispose(&mut ctx).unwrap();
    }
}
