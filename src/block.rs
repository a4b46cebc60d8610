//! Basic blocks and the builder that is their only mutator.
//!
//! A [`BasicBlockData`] is an ordered instruction list (its *body*), a parameter list, and exactly
//! one terminator (possibly absent mid-construction). [`BlockBuilder`] is the sole way to mutate
//! one: it tracks an insertion cursor, schedules removals, and commits both on
//! [`BlockBuilder::dispose`] — mirroring `sway_ir::block::Block`/`Block::Builder`'s split between
//! a `Copy` handle and a privileged mutator.

use rustc_hash::FxHashSet;

use crate::context::{IrContext, VisitStamp};
use crate::error::{IrError, IrResult};
use crate::ids::{BlockId, MethodId, ValueId};
use crate::method::Method;
use crate::parameter::{ParameterCollection, ParameterCollectionBuilder, ParameterFactory, ParameterOwner};
use crate::scope::Scope;
use crate::terminator::{self, TerminatorKind};
use crate::types::{BasicValueType, TypeHandle};
use crate::value::{ConstantValue, ValueData, ValueKind, ValueReference};

pub(crate) struct BasicBlockData {
    pub(crate) method: MethodId,
    pub(crate) name: String,
    pub(crate) body: Vec<ValueId>,
    pub(crate) parameters: ParameterCollection,
    pub(crate) terminator: Option<ValueId>,
    pub(crate) predecessors: FxHashSet<BlockId>,
    pub(crate) sequence_point: Option<String>,
    pub(crate) visit_stamp: VisitStamp,
}

impl BasicBlockData {
    pub(crate) fn create(ctx: &mut IrContext, method: MethodId, name: Option<String>) -> BlockId {
        let data = BasicBlockData {
            method,
            name: name.unwrap_or_else(|| "block".to_string()),
            body: Vec::new(),
            parameters: ParameterCollection::new(),
            terminator: None,
            predecessors: FxHashSet::default(),
            sequence_point: None,
            visit_stamp: VisitStamp::default(),
        };
        BlockId(ctx.blocks.insert(data))
    }
}

struct BlockParamFactory {
    block: BlockId,
}

impl ParameterFactory for BlockParamFactory {
    fn owner(&self) -> ParameterOwner {
        ParameterOwner::Block(self.block)
    }
}

impl BlockId {
    pub fn method(self, ctx: &IrContext) -> Method {
        Method(ctx.block(self).method)
    }

    pub fn name(self, ctx: &IrContext) -> String {
        ctx.block(self).name.clone()
    }

    pub fn parameters(self, ctx: &IrContext) -> ParameterCollection {
        ctx.block(self).parameters.clone()
    }

    pub fn body(self, ctx: &IrContext) -> Vec<ValueId> {
        ctx.block(self).body.clone()
    }

    pub fn terminator(self, ctx: &IrContext) -> Option<ValueId> {
        ctx.block(self).terminator
    }

    pub fn predecessors(self, ctx: &IrContext) -> Vec<BlockId> {
        ctx.block(self).predecessors.iter().copied().collect()
    }

    pub fn num_predecessors(self, ctx: &IrContext) -> usize {
        ctx.block(self).predecessors.len()
    }

    /// Destination blocks of this block's terminator, in target order, empty for `Return`.
    pub fn successors(self, ctx: &IrContext) -> Vec<BlockId> {
        let Some(term) = self.terminator(ctx) else {
            return Vec::new();
        };
        let Some(kind) = term.as_terminator(ctx) else {
            return Vec::new();
        };
        kind.target_ids()
            .into_iter()
            .filter_map(|t| t.as_branch_target(ctx).map(|bt| bt.destination))
            .collect()
    }

    /// True iff any value in this block's body may perform a side effect. Only `Call` is marked
    /// side-effecting in this core (spec.md scopes memory/contract ops out); a fuller IR would
    /// extend this match the way `sway_ir::Instruction::may_have_side_effect` does.
    pub fn has_side_effects(self, ctx: &IrContext) -> bool {
        ctx.block(self).body.iter().any(|v| matches!(&ctx.value(*v).kind, ValueKind::Call { .. }))
    }

    fn add_pred(self, ctx: &mut IrContext, from: BlockId) {
        ctx.block_mut(self).predecessors.insert(from);
    }

    fn remove_pred(self, ctx: &mut IrContext, from: BlockId) {
        ctx.block_mut(self).predecessors.remove(&from);
    }
}

/// Where a subsequent `add` inserts into a block's body.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum InsertPosition {
    End,
    After(ValueId),
}

/// The sole mutator of a [`BasicBlockData`]. Holds a cursor and a set of scheduled removals;
/// nothing is actually removed from the body until [`BlockBuilder::dispose`] (or an explicit
/// [`BlockBuilder::perform_removal`]) commits them.
pub struct BlockBuilder {
    block: BlockId,
    cursor: InsertPosition,
    scheduled_removals: Vec<ValueId>,
}

impl BlockBuilder {
    pub fn new(block: BlockId) -> Self {
        BlockBuilder {
            block,
            cursor: InsertPosition::End,
            scheduled_removals: Vec::new(),
        }
    }

    pub fn block(&self) -> BlockId {
        self.block
    }

    /// Positions the cursor immediately after `value`; subsequent `add` calls insert there.
    pub fn setup_insert_position(&mut self, value: ValueId) {
        self.cursor = InsertPosition::After(value);
    }

    /// Inserts `value` at the cursor and advances the cursor past it.
    pub fn add(&mut self, ctx: &mut IrContext, value: ValueId) {
        let body = &mut ctx.block_mut(self.block).body;
        match self.cursor {
            InsertPosition::End => body.push(value),
            InsertPosition::After(after) => {
                let pos = body.iter().position(|v| *v == after).map(|i| i + 1).unwrap_or(body.len());
                body.insert(pos, value);
            }
        }
        self.cursor = InsertPosition::After(value);
    }

    /// Prepends `value` without moving the cursor past the existing head.
    pub fn insert_at_beginning(&mut self, ctx: &mut IrContext, value: ValueId) {
        ctx.block_mut(self.block).body.insert(0, value);
    }

    pub fn remove(&mut self, value: ValueId) {
        self.scheduled_removals.push(value);
    }

    /// Compacts the body, preserving relative order, skipping any value scheduled for removal or
    /// already `Replace`d.
    pub fn perform_removal(&mut self, ctx: &mut IrContext) {
        let scheduled: FxHashSet<ValueId> = self.scheduled_removals.drain(..).collect();
        let block = &mut ctx.blocks;
        // Re-borrow block data directly; `ctx.block_mut` would conflict with the outer `ctx.values`
        // borrow needed to test `is_replaced`.
        let data = block.get_mut(self.block.0).expect("BlockId outlived its IrContext");
        data.body.retain(|v| !scheduled.contains(v));
        drop(data);
        let retained: Vec<ValueId> = ctx
            .block(self.block)
            .body
            .iter()
            .copied()
            .filter(|v| !v.is_replaced(ctx))
            .collect();
        ctx.block_mut(self.block).body = retained;
    }

    pub fn clear(&mut self, ctx: &mut IrContext) {
        ctx.block_mut(self.block).body.clear();
    }

    // ---- value construction -------------------------------------------------------------

    pub fn create_constant(&mut self, ctx: &mut IrContext, value: ConstantValue, ty: TypeHandle) -> ValueId {
        let node_id = ctx.new_node_id();
        let data = ValueData::new(node_id, None, ty, ValueKind::Constant(value));
        ValueId(ctx.values.insert(data))
    }

    pub fn create_call(&mut self, ctx: &mut IrContext, callee: Method, args: Vec<ValueId>) -> ValueId {
        let ty = callee.return_type(ctx);
        let node_id = ctx.new_node_id();
        let args = args.into_iter().map(ValueReference::resolved).collect();
        let data = ValueData::new(
            node_id,
            Some(self.block),
            ty,
            ValueKind::Call {
                callee: callee.id(),
                args,
            },
        );
        let id = ValueId(ctx.values.insert(data));
        self.add(ctx, id);
        id
    }

    /// `select(condition, if_true, if_false)` — introduced only by if-conversion (spec.md §4.6
    /// step 5). `condition`/`if_true`/`if_false` are already-resolved operand references taken
    /// straight from the diamond being collapsed.
    pub fn create_predicate(
        &mut self,
        ctx: &mut IrContext,
        ty: TypeHandle,
        condition: ValueReference,
        if_true: ValueReference,
        if_false: ValueReference,
    ) -> ValueId {
        let node_id = ctx.new_node_id();
        let data = ValueData::new(
            node_id,
            Some(self.block),
            ty,
            ValueKind::Predicate {
                condition,
                if_true,
                if_false,
            },
        );
        let id = ValueId(ctx.values.insert(data));
        self.add(ctx, id);
        id
    }

    pub fn add_parameter(&mut self, ctx: &mut IrContext, name: Option<String>, ty: TypeHandle) -> ValueId {
        let mut params = std::mem::take(&mut ctx.block_mut(self.block).parameters);
        let factory = BlockParamFactory { block: self.block };
        let id = {
            let mut builder = ParameterCollectionBuilder::new(&mut params, factory);
            builder.create_and_append(ctx, name, ty)
        };
        ctx.block_mut(self.block).parameters = params;
        id
    }

    /// Drops every replaced parameter, compacts indices, and strips the corresponding argument
    /// from every predecessor's branch target in lock-step (spec.md §4.4 "ArgumentMapper").
    pub fn perform_parameter_removal(&mut self, ctx: &mut IrContext) -> Vec<usize> {
        let mut params = std::mem::take(&mut ctx.block_mut(self.block).parameters);
        let dropped = params.perform_removal(ctx);
        ctx.block_mut(self.block).parameters = params;
        if !dropped.is_empty() {
            for pred in self.block.predecessors(ctx) {
                if let Some(term_id) = pred.terminator(ctx) {
                    if let Some(kind) = term_id.as_terminator(ctx) {
                        for target_id in kind.target_ids() {
                            if let Some(bt) = target_id.as_branch_target(ctx) {
                                if bt.destination == self.block {
                                    // Drop from highest index first so earlier indices stay valid.
                                    for &idx in dropped.iter().rev() {
                                        terminator::drop_branch_target_argument(ctx, target_id, idx);
                                    }
                                }
                            }
                        }
                    }
                }
            }
        }
        dropped
    }

    // ---- terminators ----------------------------------------------------------------------

    fn install_terminator(&mut self, ctx: &mut IrContext, new_kind: TerminatorKind) -> IrResult<ValueId> {
        let new_targets: Vec<BlockId> = new_kind
            .target_ids()
            .iter()
            .filter_map(|t| t.as_branch_target(ctx).map(|bt| bt.destination))
            .collect();

        let void = ctx.types.void();
        let new_id = terminator::new_terminator_value(ctx, self.block, void, new_kind);

        if let Some(old_id) = ctx.block(self.block).terminator {
            if let Some(old_kind) = old_id.as_terminator(ctx) {
                for old_target in old_kind.target_ids() {
                    if let Some(bt) = old_target.as_branch_target(ctx) {
                        bt.destination.remove_pred(ctx, self.block);
                    }
                }
            }
            old_id.replace(ctx, new_id)?;
        }
        for dest in new_targets {
            dest.add_pred(ctx, self.block);
        }
        ctx.block_mut(self.block).terminator = Some(new_id);
        Ok(new_id)
    }

    /// Installs a transient placeholder terminator. Must be replaced before the builder disposes.
    pub fn set_builder_terminator(&mut self, ctx: &mut IrContext) -> IrResult<ValueId> {
        self.install_terminator(ctx, TerminatorKind::Builder)
    }

    pub fn set_return(&mut self, ctx: &mut IrContext, value: Option<ValueId>) -> IrResult<ValueId> {
        let kind = TerminatorKind::Return {
            value: value.map(ValueReference::resolved),
        };
        self.install_terminator(ctx, kind)
    }

    pub fn set_unconditional_branch(
        &mut self,
        ctx: &mut IrContext,
        target: BlockId,
        args: Vec<ValueId>,
    ) -> IrResult<ValueId> {
        let target_val = terminator::seal_branch_target(ctx, target, args)?;
        self.install_terminator(ctx, TerminatorKind::UnconditionalBranch { target: target_val })
    }

    pub fn set_conditional_branch(
        &mut self,
        ctx: &mut IrContext,
        condition: ValueId,
        true_block: BlockId,
        true_args: Vec<ValueId>,
        false_block: BlockId,
        false_args: Vec<ValueId>,
    ) -> IrResult<ValueId> {
        let cond_ty = condition.ty(ctx);
        if cond_ty.basic_value_type(&ctx.types) != Some(BasicValueType::Int1) {
            return Err(IrError::invalid_argument(
                "conditional branch condition must be of type Int1",
            ));
        }
        let true_target = terminator::seal_branch_target(ctx, true_block, true_args)?;
        let false_target = terminator::seal_branch_target(ctx, false_block, false_args)?;
        self.install_terminator(
            ctx,
            TerminatorKind::ConditionalBranch {
                condition: ValueReference::resolved(condition),
                true_target,
                false_target,
            },
        )
    }

    /// Builds a switch terminator. Per spec.md §4.4, a switch with exactly two targets whose
    /// selector is already `Int1` is constructor-time-canonicalized into a conditional branch:
    /// `targets[0]` (the default, selector `false`/0) becomes the false destination, `targets[1]`
    /// the true destination. A wider-than-`Int1` two-target switch is left as a `SwitchBranch`
    /// since this core's type system has no general equality-comparison value to lower it through.
    pub fn set_switch_branch(
        &mut self,
        ctx: &mut IrContext,
        selector: ValueId,
        targets: Vec<(BlockId, Vec<ValueId>)>,
    ) -> IrResult<ValueId> {
        if targets.is_empty() {
            return Err(IrError::invalid_argument("switch must have at least one target"));
        }
        let selector_ty = selector.ty(ctx);
        match selector_ty.basic_value_type(&ctx.types) {
            Some(bt) if bt.is_integer() => {}
            _ => return Err(IrError::invalid_argument("switch selector must be an integer primitive")),
        }

        if targets.len() == 2 && selector_ty.basic_value_type(&ctx.types) == Some(BasicValueType::Int1) {
            let mut targets = targets;
            let (false_block, false_args) = targets.remove(0);
            let (true_block, true_args) = targets.remove(0);
            return self.set_conditional_branch(ctx, selector, true_block, true_args, false_block, false_args);
        }

        let mut target_vals: smallvec::SmallVec<[ValueId; 4]> = smallvec::SmallVec::with_capacity(targets.len());
        for (dest, args) in targets {
            target_vals.push(terminator::seal_branch_target(ctx, dest, args)?);
        }
        self.install_terminator(
            ctx,
            TerminatorKind::SwitchBranch {
                selector: ValueReference::resolved(selector),
                targets: target_vals,
            },
        )
    }

    // ---- split / merge --------------------------------------------------------------------

    /// Splits this block at `v`. If `keep_v` is true, `v` stays in this (the first) block;
    /// otherwise it moves to the new (second) block along with everything after it. Returns
    /// `(first, second)`, both of which may be `self.block` depending on the split point.
    pub fn split_block(&mut self, ctx: &mut IrContext, v: ValueId, keep_v: bool) -> IrResult<(BlockId, BlockId)> {
        let body = ctx.block(self.block).body.clone();
        let pos = body
            .iter()
            .position(|b| *b == v)
            .ok_or_else(|| IrError::invalid_argument("split point is not in this block's body"))?;
        let split_at = if keep_v { pos + 1 } else { pos };

        let method = self.block.method(ctx).id();
        let new_block = BasicBlockData::create(ctx, method, None);

        let tail: Vec<ValueId> = body[split_at..].to_vec();
        ctx.block_mut(self.block).body.truncate(split_at);
        ctx.block_mut(new_block).body = tail;

        // Move the terminator to the new (tail) block.
        let old_terminator = ctx.block_mut(self.block).terminator.take();
        if let Some(term_id) = old_terminator {
            if let Some(kind) = term_id.as_terminator(ctx) {
                for target in kind.target_ids() {
                    if let Some(bt) = target.as_branch_target(ctx) {
                        bt.destination.remove_pred(ctx, self.block);
                        bt.destination.add_pred(ctx, new_block);
                    }
                }
            }
            ctx.block_mut(new_block).terminator = Some(term_id);
        }

        // Wire old -> new with an unconditional branch carrying no arguments (new block gets no
        // parameters of its own from the split).
        new_block.add_pred(ctx, self.block);
        let void = ctx.types.void();
        let target_val = terminator::seal_branch_target(ctx, new_block, vec![])?;
        let bridge = terminator::new_terminator_value(ctx, self.block, void, TerminatorKind::UnconditionalBranch { target: target_val });
        ctx.block_mut(self.block).terminator = Some(bridge);

        Ok((self.block, new_block))
    }

    /// Appends `other`'s compacted body to this block, re-parenting its values, optionally
    /// concatenating parameter lists, and taking over `other`'s terminator. Used by if-conversion
    /// to flatten diamonds (spec.md §4.3, §4.6).
    ///
    /// DESIGN: if both blocks carry parameters at the same index and `merge_parameters` is true,
    /// this rejects the merge with `Incompatible` rather than guessing a union policy — see
    /// DESIGN.md's resolution of spec.md §9's open "// TODO: merge block argument values".
    pub fn merge_block(&mut self, ctx: &mut IrContext, other: BlockId, merge_parameters: bool) -> IrResult<()> {
        if self.block == other {
            return Err(IrError::invalid_argument("cannot merge a block into itself"));
        }
        if merge_parameters && !ctx.block(self.block).parameters.is_empty() && !ctx.block(other).parameters.is_empty()
        {
            return Err(IrError::incompatible(
                "merging two blocks that both already carry parameters is not supported",
            ));
        }

        // Re-parent `other`'s body values into `self.block`.
        for v in ctx.block(other).body.clone() {
            if let Some(block_field) = Self::block_field_mut(ctx, v) {
                *block_field = self.block;
            }
        }
        let other_body = ctx.block(other).body.clone();
        ctx.block_mut(self.block).body.extend(other_body);

        if merge_parameters {
            let other_params = ctx.block(other).parameters.clone();
            for p in other_params.iter() {
                if let ValueKind::Parameter(param) = &mut ctx.value_mut(p).kind {
                    param.owner = ParameterOwner::Block(self.block);
                }
                if let Some(block_field) = Self::block_field_mut(ctx, p) {
                    *block_field = self.block;
                }
            }
            let mut params = std::mem::take(&mut ctx.block_mut(self.block).parameters);
            params.add_range(&other_params);
            params.update_indices(ctx);
            ctx.block_mut(self.block).parameters = params;
        }

        // Take over `other`'s terminator, re-parenting it and fixing predecessor bookkeeping:
        // anything that pointed at `other` for its targets now effectively flows through
        // `self.block`, since `other` no longer terminates independently.
        if let Some(term_id) = ctx.block_mut(other).terminator.take() {
            if let Some(block_field) = Self::block_field_mut(ctx, term_id) {
                *block_field = self.block;
            }
            if let Some(old_self_term) = ctx.block(self.block).terminator {
                if let Some(kind) = old_self_term.as_terminator(ctx) {
                    for target in kind.target_ids() {
                        if let Some(bt) = target.as_branch_target(ctx) {
                            bt.destination.remove_pred(ctx, self.block);
                        }
                    }
                }
            }
            if let Some(kind) = term_id.as_terminator(ctx) {
                for target in kind.target_ids() {
                    if let Some(bt) = target.as_branch_target(ctx) {
                        bt.destination.add_pred(ctx, self.block);
                    }
                }
            }
            ctx.block_mut(self.block).terminator = Some(term_id);
        }

        Ok(())
    }

    fn block_field_mut(ctx: &mut IrContext, v: ValueId) -> Option<&mut BlockId> {
        ctx.value_mut(v).block.as_mut()
    }

    /// Inlines a call: splits at `call`, rebuilds `callee_scope`'s blocks into fresh ones wired
    /// from the current block to the post-split tail, and replaces `call` with either the single
    /// exit's return value or a fresh parameter fed by every exit (spec.md §4.3 "SpecializeCall").
    pub fn specialize_call(&mut self, ctx: &mut IrContext, call: ValueId, callee_scope: &Scope) -> IrResult<()> {
        let ValueKind::Call { args, .. } = call.kind(ctx).clone() else {
            return Err(IrError::invalid_argument("specialize_call target is not a Call value"));
        };
        let (_before, tail) = self.split_block(ctx, call, false)?;

        let callee_params = callee_scope.entry.parameters(ctx);
        if callee_params.len() != args.len() {
            return Err(IrError::incompatible(
                "call argument count does not match callee parameter count",
            ));
        }

        let mut value_map = rustc_hash::FxHashMap::default();
        for (param, arg) in callee_params.iter().zip(args.iter()) {
            value_map.insert(param, arg.target(ctx));
        }
        let mut block_map = rustc_hash::FxHashMap::default();
        let method = self.block.method(ctx).id();
        for &src_block in &callee_scope.blocks {
            let fresh = BasicBlockData::create(ctx, method, None);
            block_map.insert(src_block, fresh);
        }

        let mut exit_returns = Vec::new();
        for &src_block in &callee_scope.blocks {
            let fresh = block_map[&src_block];
            for src_param in src_block.parameters(ctx).iter() {
                if src_param.block(ctx) == Some(callee_scope.entry) {
                    continue; // entry params are bound to call args, not re-created
                }
                let ty = src_param.ty(ctx);
                let mut fresh_builder = BlockBuilder::new(fresh);
                let new_param = fresh_builder.add_parameter(ctx, None, ty);
                value_map.insert(src_param, new_param);
            }
            for body_val in src_block.body(ctx) {
                let remapped_kind = body_val.rebuild(ctx, &value_map, &block_map)?;
                let node_id = ctx.new_node_id();
                let ty = body_val.ty(ctx);
                let data = ValueData::new(node_id, Some(fresh), ty, remapped_kind);
                let new_val = ValueId(ctx.values.insert(data));
                value_map.insert(body_val, new_val);
                let mut fresh_builder = BlockBuilder::new(fresh);
                fresh_builder.add(ctx, new_val);
            }
            if let Some(term) = src_block.terminator(ctx) {
                for t in term.as_terminator(ctx).into_iter().flat_map(|k| k.target_ids()) {
                    if let Some(bt) = t.as_branch_target(ctx) {
                        let remapped_args = bt
                            .arguments
                            .iter()
                            .map(|a| value_map.get(&a.direct_target()).copied().unwrap_or(a.direct_target()))
                            .collect();
                        let dest = block_map[&bt.destination];
                        let new_target = terminator::seal_branch_target(ctx, dest, remapped_args)?;
                        value_map.insert(t, new_target);
                    }
                }
                let remapped = term.rebuild(ctx, &value_map, &block_map)?;
                if let TerminatorKind::Return { value } = &remapped {
                    exit_returns.push((fresh, *value));
                }
                let ty = term.ty(ctx);
                let node_id = ctx.new_node_id();
                let data = ValueData::new(node_id, Some(fresh), ty, remapped);
                let new_term = ValueId(ctx.values.insert(data));
                for remapped_target in new_term.as_terminator(ctx).into_iter().flat_map(|k| k.target_ids()) {
                    if let Some(bt) = remapped_target.as_branch_target(ctx) {
                        bt.destination.add_pred(ctx, fresh);
                    }
                }
                ctx.block_mut(fresh).terminator = Some(new_term);
            }
        }

        let entry_fresh = block_map[&callee_scope.entry];
        self.set_unconditional_branch(ctx, entry_fresh, vec![])?;

        let mut tail_builder = BlockBuilder::new(tail);
        let call_ty = call.ty(ctx);
        let replacement = if exit_returns.len() == 1 {
            let (_, value) = &exit_returns[0];
            value.map(|v| v.target(ctx))
        } else if call_ty.is_void(&ctx.types) {
            for (exit_block, _) in &exit_returns {
                let mut exit_builder = BlockBuilder::new(*exit_block);
                exit_builder.set_unconditional_branch(ctx, tail, vec![])?;
            }
            None
        } else {
            let param = tail_builder.add_parameter(ctx, None, call_ty);
            for (exit_block, value) in &exit_returns {
                let mut exit_builder = BlockBuilder::new(*exit_block);
                let arg = value.map(|v| v.target(ctx));
                exit_builder.set_unconditional_branch(ctx, tail, arg.into_iter().collect())?;
            }
            Some(param)
        };
        if let Some(new_val) = replacement {
            call.replace(ctx, new_val)?;
        }

        Ok(())
    }

    /// Commits this builder's pending edits: drops replaced parameters (and the branch-target
    /// arguments that fed them), then applies scheduled body removals.
    pub fn dispose(mut self, ctx: &mut IrContext) -> IrResult<()> {
        self.perform_parameter_removal(ctx);
        self.perform_removal(ctx);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::IrContext;

    #[test]
    fn a_method_with_a_single_block_just_returns_a_constant() {
        let mut ctx = IrContext::new();
        let i32_ty = ctx.types.basic(BasicValueType::Int32);
        let method = Method::declare(&mut ctx, "f", vec![], i32_ty);
        let mut builder = method.create_builder(&mut ctx).unwrap();
        let entry = method.entry_block(&ctx);

        let mut entry_bb = builder.block_builder(entry);
        let forty_two = entry_bb.create_constant(&mut ctx, ConstantValue::Int(42), i32_ty);
        entry_bb.set_return(&mut ctx, Some(forty_two)).unwrap();
        builder.dispose(&mut ctx).unwrap();

        let term = entry.terminator(&ctx).unwrap().as_terminator(&ctx).unwrap();
        match term {
            TerminatorKind::Return { value: Some(v) } => assert_eq!(v.target(&ctx), forty_two),
            other => panic!("expected a Return terminator, got {other:?}"),
        }
    }

    #[test]
    fn conditional_branch_carries_exactly_two_targets_with_matching_arguments() {
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

        let term = entry.terminator(&ctx).unwrap().as_terminator(&ctx).unwrap();
        let targets = term.target_ids();
        assert_eq!(targets.len(), 2);
        match term {
            TerminatorKind::ConditionalBranch {
                true_target,
                false_target,
                ..
            } => {
                assert_eq!(true_target.as_branch_target(&ctx).unwrap().destination, if_b);
                assert_eq!(false_target.as_branch_target(&ctx).unwrap().destination, else_b);
            }
            other => panic!("expected a ConditionalBranch terminator, got {other:?}"),
        }
    }

    #[test]
    fn a_two_target_int1_switch_is_canonicalized_into_a_conditional_branch() {
        let mut ctx = IrContext::new();
        let i1_ty = ctx.types.basic(BasicValueType::Int1);
        let i32_ty = ctx.types.basic(BasicValueType::Int32);
        let method = Method::declare(&mut ctx, "f", vec![(None, i1_ty)], i32_ty);
        let mut builder = method.create_builder(&mut ctx).unwrap();
        let entry = method.entry_block(&ctx);
        let false_b = builder.create_block(&mut ctx, None);
        let true_b = builder.create_block(&mut ctx, None);
        let selector = method.parameters(&ctx).get(0).unwrap();

        let mut false_bb = builder.block_builder(false_b);
        let zero = false_bb.create_constant(&mut ctx, ConstantValue::Int(0), i32_ty);
        false_bb.set_return(&mut ctx, Some(zero)).unwrap();

        let mut true_bb = builder.block_builder(true_b);
        let one = true_bb.create_constant(&mut ctx, ConstantValue::Int(1), i32_ty);
        true_bb.set_return(&mut ctx, Some(one)).unwrap();

        let mut entry_bb = builder.block_builder(entry);
        entry_bb
            .set_switch_branch(&mut ctx, selector, vec![(false_b, vec![]), (true_b, vec![])])
            .unwrap();
        builder.dispose(&mut ctx).unwrap();

        let term = entry.terminator(&ctx).unwrap().as_terminator(&ctx).unwrap();
        match term {
            TerminatorKind::ConditionalBranch {
                true_target,
                false_target,
                ..
            } => {
                assert_eq!(true_target.as_branch_target(&ctx).unwrap().destination, true_b);
                assert_eq!(false_target.as_branch_target(&ctx).unwrap().destination, false_b);
            }
            other => panic!("expected switch-to-conditional canonicalization, got {other:?}"),
        }
    }

    #[test]
    fn a_two_target_non_int1_switch_is_left_as_a_switch_branch() {
        let mut ctx = IrContext::new();
        let i32_ty = ctx.types.basic(BasicValueType::Int32);
        let method = Method::declare(&mut ctx, "f", vec![(None, i32_ty)], i32_ty);
        let mut builder = method.create_builder(&mut ctx).unwrap();
        let entry = method.entry_block(&ctx);
        let default_b = builder.create_block(&mut ctx, None);
        let other_b = builder.create_block(&mut ctx, None);
        let selector = method.parameters(&ctx).get(0).unwrap();

        let mut default_bb = builder.block_builder(default_b);
        let zero = default_bb.create_constant(&mut ctx, ConstantValue::Int(0), i32_ty);
        default_bb.set_return(&mut ctx, Some(zero)).unwrap();

        let mut other_bb = builder.block_builder(other_b);
        let one = other_bb.create_constant(&mut ctx, ConstantValue::Int(1), i32_ty);
        other_bb.set_return(&mut ctx, Some(one)).unwrap();

        let mut entry_bb = builder.block_builder(entry);
        entry_bb
            .set_switch_branch(&mut ctx, selector, vec![(default_b, vec![]), (other_b, vec![])])
            .unwrap();
        builder.dispose(&mut ctx).unwrap();

        let term = entry.terminator(&ctx).unwrap().as_terminator(&ctx).unwrap();
        match term {
            TerminatorKind::SwitchBranch { targets, .. } => {
                assert_eq!(targets.len(), 2);
                assert_eq!(targets[0].as_branch_target(&ctx).unwrap().destination, default_b);
                assert_eq!(targets[1].as_branch_target(&ctx).unwrap().destination, other_b);
            }
            other => panic!("an Int32 selector must not be canonicalized into a conditional branch, got {other:?}"),
        }
    }
}
