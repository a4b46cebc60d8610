//! Terminators and the branch targets they carry.
//!
//! A [`TerminatorKind`] always sits at the end of a [`crate::block::BasicBlock`]'s instruction
//! list. It carries two logical operand groups (spec.md §3): *targets*, a tuple of
//! [`BranchTargetData`] operands naming destination blocks, and *arguments*, the values feeding
//! the terminator's own semantics (a condition, a switch selector, a return value).
//!
//! Every edge owns its own branch target; two terminators never share one.

use smallvec::{smallvec, SmallVec};

use crate::context::IrContext;
use crate::error::{IrError, IrResult};
use crate::ids::{BlockId, ValueId};
use crate::types::TypeHandle;
use crate::value::{ValueData, ValueKind, ValueReference};

#[derive(Debug, Clone)]
pub enum TerminatorKind {
    /// Zero targets, one argument (possibly void).
    Return { value: Option<ValueReference> },
    /// One target, no arguments of its own (the target's argument tuple feeds the destination's
    /// parameters).
    UnconditionalBranch { target: ValueId },
    /// Two targets — `{true, false}` — and one boolean argument.
    ConditionalBranch {
        condition: ValueReference,
        true_target: ValueId,
        false_target: ValueId,
    },
    /// N≥1 targets, `targets[0]` is the default, one integer argument.
    SwitchBranch {
        selector: ValueReference,
        targets: SmallVec<[ValueId; 4]>,
    },
    /// Transient placeholder installed while a block is mid-construction. Must be replaced by a
    /// real terminator before any analysis runs or before `rebuild`/`accept` (spec.md §9).
    Builder,
}

impl TerminatorKind {
    /// Most terminators carry at most a handful of operands (a condition plus 0-2 targets), so
    /// this is a `SmallVec` rather than a `Vec` — matching `sway-core`'s own use of `smallvec` for
    /// similarly small, usually-inline instruction operand lists.
    pub fn operands(&self) -> SmallVec<[ValueReference; 4]> {
        match self {
            TerminatorKind::Return { value } => value.iter().copied().collect(),
            TerminatorKind::UnconditionalBranch { target } => smallvec![ValueReference::direct(*target)],
            TerminatorKind::ConditionalBranch {
                condition,
                true_target,
                false_target,
            } => smallvec![
                *condition,
                ValueReference::direct(*true_target),
                ValueReference::direct(*false_target),
            ],
            TerminatorKind::SwitchBranch { selector, targets } => {
                let mut operands: SmallVec<[ValueReference; 4]> = smallvec![*selector];
                operands.extend(targets.iter().map(|t| ValueReference::direct(*t)));
                operands
            }
            TerminatorKind::Builder => smallvec![],
        }
    }

    /// The `BranchTarget` value ids this terminator owns, in target order.
    pub fn target_ids(&self) -> SmallVec<[ValueId; 4]> {
        match self {
            TerminatorKind::Return { .. } | TerminatorKind::Builder => smallvec![],
            TerminatorKind::UnconditionalBranch { target } => smallvec![*target],
            TerminatorKind::ConditionalBranch {
                true_target,
                false_target,
                ..
            } => smallvec![*true_target, *false_target],
            TerminatorKind::SwitchBranch { targets, .. } => targets.clone(),
        }
    }

    pub(crate) fn remap(&self, remap_ref: &dyn Fn(&ValueReference) -> ValueReference) -> TerminatorKind {
        let remap_target = |id: &ValueId| remap_ref(&ValueReference::direct(*id)).direct_target();
        match self {
            TerminatorKind::Return { value } => TerminatorKind::Return {
                value: value.as_ref().map(remap_ref),
            },
            TerminatorKind::UnconditionalBranch { target } => TerminatorKind::UnconditionalBranch {
                target: remap_target(target),
            },
            TerminatorKind::ConditionalBranch {
                condition,
                true_target,
                false_target,
            } => TerminatorKind::ConditionalBranch {
                condition: remap_ref(condition),
                true_target: remap_target(true_target),
                false_target: remap_target(false_target),
            },
            TerminatorKind::SwitchBranch { selector, targets } => TerminatorKind::SwitchBranch {
                selector: remap_ref(selector),
                targets: targets.iter().map(remap_target).collect(),
            },
            TerminatorKind::Builder => TerminatorKind::Builder,
        }
    }

    pub fn is_branch(&self) -> bool {
        matches!(
            self,
            TerminatorKind::UnconditionalBranch { .. }
                | TerminatorKind::ConditionalBranch { .. }
                | TerminatorKind::SwitchBranch { .. }
        )
    }
}

/// The edge object sitting between a terminator and a destination block. Its operand tuple is the
/// block-argument list supplied to the destination's block parameters, positionally matched.
#[derive(Debug, Clone)]
pub struct BranchTargetData {
    pub destination: BlockId,
    pub arguments: SmallVec<[ValueReference; 4]>,
}

impl ValueId {
    pub fn as_branch_target(self, ctx: &IrContext) -> Option<BranchTargetData> {
        match &ctx.value(self).kind {
            ValueKind::BranchTarget(bt) => Some(bt.clone()),
            _ => None,
        }
    }

    pub fn as_terminator(self, ctx: &IrContext) -> Option<TerminatorKind> {
        match &ctx.value(self).kind {
            ValueKind::Terminator(t) => Some(t.clone()),
            _ => None,
        }
    }
}

/// Constructs and seals a [`BranchTargetData`] as a freestanding value (not yet attached to any
/// terminator). Spec.md §4.4 describes this as a two-phase builder (create, append arguments,
/// `Seal`); since our arguments are supplied up front by the caller in every construction path
/// this crate exercises, sealing happens at construction — see DESIGN.md for why the staged
/// builder was collapsed into one call.
pub(crate) fn seal_branch_target(
    ctx: &mut IrContext,
    destination: BlockId,
    arguments: Vec<ValueId>,
) -> IrResult<ValueId> {
    let expected = ctx.block(destination).parameters.len();
    if arguments.len() != expected {
        return Err(IrError::invalid_argument(format!(
            "branch target to block with {expected} parameters supplied {} arguments",
            arguments.len()
        )));
    }
    let void = ctx.types.void();
    let node_id = ctx.new_node_id();
    let data = ValueData::new(
        node_id,
        None,
        void,
        ValueKind::BranchTarget(BranchTargetData {
            destination,
            arguments: arguments.into_iter().map(ValueReference::resolved).collect(),
        }),
    );
    Ok(ValueId(ctx.values.insert(data)))
}

pub(crate) fn new_terminator_value(
    ctx: &mut IrContext,
    block: BlockId,
    ty: TypeHandle,
    kind: TerminatorKind,
) -> ValueId {
    let node_id = ctx.new_node_id();
    let data = ValueData::new(node_id, Some(block), ty, ValueKind::Terminator(kind));
    ValueId(ctx.values.insert(data))
}

/// Drops the argument at `index` from a branch target's argument tuple. Used by
/// [`crate::block::BlockBuilder::dispose`] to keep a destination's dropped parameter indices and a
/// predecessor's branch-target arguments in lock-step (spec.md §4.4 "ArgumentMapper").
pub(crate) fn drop_branch_target_argument(ctx: &mut IrContext, branch_target: ValueId, index: usize) {
    if let ValueKind::BranchTarget(bt) = &mut ctx.value_mut(branch_target).kind {
        if index < bt.arguments.len() {
            bt.arguments.remove(index);
        }
    }
}
