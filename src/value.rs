//! The value graph and the replace-with protocol.
//!
//! Every element of the IR — parameters, branch targets, terminators, calls, predicates and
//! constants — is a [`ValueData`] addressed by a `Copy` [`ValueId`]. A value is *sealed* once its
//! kind-specific operands are fixed; after that, [`ValueId::replace`] is the only permitted
//! mutation, and it never clears once set (spec.md §4.1).

use rustc_hash::FxHashMap;

use crate::error::{IrError, IrResult};
use crate::ids::{BlockId, MethodId, NodeId, ValueId};
use crate::parameter::ParameterData;
use crate::terminator::{BranchTargetData, TerminatorKind};
use crate::types::TypeHandle;

/// Discriminates a [`ValueData`]'s concrete payload. Matches on this enum are kept exhaustive
/// throughout the crate so that adding a kind is a compile error at every dispatch site, per
/// spec.md §9's note on replacing visitor double-dispatch with a tagged-union match.
#[derive(Debug, Clone)]
pub enum ValueKind {
    /// A function or block parameter (spec.md §3 "Parameter").
    Parameter(ParameterData),
    /// An immediate constant. Never belongs to a block (`ValueData::block` is `None`).
    Constant(ConstantValue),
    /// A call to another method.
    Call { callee: MethodId, args: Vec<ValueReference> },
    /// `select(condition, if_true, if_false)`, introduced by if-conversion.
    Predicate {
        condition: ValueReference,
        if_true: ValueReference,
        if_false: ValueReference,
    },
    /// The edge object between a terminator and a destination block (spec.md §3/§4.4).
    BranchTarget(BranchTargetData),
    /// A block terminator (spec.md §3 "Terminator").
    Terminator(TerminatorKind),
}

#[derive(Debug, Clone, PartialEq)]
pub enum ConstantValue {
    Null,
    Bool(bool),
    Int(u64),
    Float(u64 /* bits, to keep this Eq-able */),
}

/// A node in the graph: identity, parent block, cached type, and the replacement pointer.
///
/// The kind-specific operand list (`ValueKind`'s payload) is immutable once `sealed` is true,
/// except through [`ValueId::replace`] — per spec.md's invariant that sealed operands are
/// constant "until `v` is replaced".
#[derive(Debug, Clone)]
pub struct ValueData {
    pub(crate) node_id: NodeId,
    pub(crate) block: Option<BlockId>,
    pub(crate) ty: TypeHandle,
    pub(crate) sealed: bool,
    pub(crate) replacement: Option<ValueId>,
    pub(crate) kind: ValueKind,
}

impl ValueData {
    pub(crate) fn new(node_id: NodeId, block: Option<BlockId>, ty: TypeHandle, kind: ValueKind) -> Self {
        ValueData {
            node_id,
            block,
            ty,
            sealed: true,
            replacement: None,
            kind,
        }
    }
}

/// Which way an operand slot dereferences a value: straight to the node it was constructed with
/// ([`ResolutionMode::Direct`]), or transitively through any `Replace` chain
/// ([`ResolutionMode::Resolved`]). Spec.md §9 calls out the source's implicit "DirectTarget vs.
/// resolved access" distinction as something a reimplementation should make an explicit handle
/// rather than an implicit conversion — this is that handle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResolutionMode {
    Direct,
    Resolved,
}

/// A stored operand. Operands are held as `ValueReference`s rather than bare `ValueId`s so that an
/// in-place `Replace` propagates to every user without rewalking the graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ValueReference {
    id: ValueId,
    mode: ResolutionMode,
}

impl ValueReference {
    pub fn direct(id: ValueId) -> Self {
        ValueReference {
            id,
            mode: ResolutionMode::Direct,
        }
    }

    pub fn resolved(id: ValueId) -> Self {
        ValueReference {
            id,
            mode: ResolutionMode::Resolved,
        }
    }

    /// The id this reference was constructed with, bypassing any replacement chain.
    pub fn direct_target(&self) -> ValueId {
        self.id
    }

    /// The id this reference currently dereferences to: itself for [`ResolutionMode::Direct`], or
    /// the end of the replacement chain for [`ResolutionMode::Resolved`].
    pub fn target(&self, ctx: &crate::context::IrContext) -> ValueId {
        match self.mode {
            ResolutionMode::Direct => self.id,
            ResolutionMode::Resolved => self.id.resolve(ctx),
        }
    }
}

impl ValueId {
    pub fn node_id(self, ctx: &crate::context::IrContext) -> NodeId {
        ctx.value(self).node_id
    }

    pub fn block(self, ctx: &crate::context::IrContext) -> Option<BlockId> {
        ctx.value(self).block
    }

    pub fn ty(self, ctx: &crate::context::IrContext) -> TypeHandle {
        ctx.value(self).ty
    }

    pub fn kind(self, ctx: &crate::context::IrContext) -> &ValueKind {
        &ctx.value(self).kind
    }

    pub fn is_sealed(self, ctx: &crate::context::IrContext) -> bool {
        ctx.value(self).sealed
    }

    pub fn is_replaced(self, ctx: &crate::context::IrContext) -> bool {
        ctx.value(self).replacement.is_some()
    }

    /// The value this one was replaced with directly, or itself if it hasn't been replaced.
    pub fn direct_target(self) -> ValueId {
        self
    }

    /// Follows the replacement chain to its end. Idempotent: resolving an already-resolved value
    /// returns itself (spec.md §8, testable property 5).
    pub fn resolve(self, ctx: &crate::context::IrContext) -> ValueId {
        let mut current = self;
        loop {
            match ctx.value(current).replacement {
                Some(next) => current = next,
                None => return current,
            }
        }
    }

    /// Sets this value's replacement pointer to `other`.
    ///
    /// Requires `other` to be in the same method as `self`, or to belong to no block at all
    /// (shared constants/function parameters may replace anything). Monotone: calling this twice
    /// with the same `other` is a no-op, matching spec.md §8 property 5; replacing an
    /// already-replaced value with a *different* target is rejected rather than silently
    /// re-pointing a live chain, since nothing in spec.md calls for chain retargeting and allowing
    /// it would make `resolve` order-dependent.
    pub fn replace(self, ctx: &mut crate::context::IrContext, other: ValueId) -> IrResult<()> {
        if self == other {
            return Err(IrError::invalid_argument("a value cannot replace itself"));
        }
        if let (Some(self_block), Some(other_block)) = (ctx.value(self).block, ctx.value(other).block) {
            let self_method = ctx.block(self_block).method;
            let other_method = ctx.block(other_block).method;
            if self_method != other_method {
                return Err(IrError::invalid_argument(
                    "Replace target must be in the same method",
                ));
            }
        }
        let existing = ctx.value(self).replacement;
        match existing {
            None => {
                ctx.value_mut(self).replacement = Some(other);
                Ok(())
            }
            Some(current) if current == other => Ok(()),
            Some(_) => Err(IrError::invalid_state(
                "value has already been replaced with a different target",
            )),
        }
    }

    /// Derives this value's operand list from its kind. Not stored redundantly: the kind payload
    /// *is* the operand list, so it is trivially kept in sync with `Replace`d operands (each
    /// operand is a [`ValueReference`], which resolves lazily).
    pub fn operands(self, ctx: &crate::context::IrContext) -> Vec<ValueReference> {
        match &ctx.value(self).kind {
            ValueKind::Parameter(_) => vec![],
            ValueKind::Constant(_) => vec![],
            ValueKind::Call { args, .. } => args.clone(),
            ValueKind::Predicate {
                condition,
                if_true,
                if_false,
            } => vec![*condition, *if_true, *if_false],
            ValueKind::BranchTarget(bt) => bt.arguments.to_vec(),
            ValueKind::Terminator(term) => term.operands().to_vec(),
        }
    }

    /// Short kind prefix for the debug surface (spec.md §6: "every node produces a short prefix —
    /// `ret`, `branch`, `switch`, `param`, …").
    pub fn debug_prefix(self, ctx: &crate::context::IrContext) -> &'static str {
        match &ctx.value(self).kind {
            ValueKind::Parameter(_) => "param",
            ValueKind::Constant(_) => "const",
            ValueKind::Call { .. } => "call",
            ValueKind::Predicate { .. } => "predicate",
            ValueKind::BranchTarget(_) => "target",
            ValueKind::Terminator(TerminatorKind::Return { .. }) => "ret",
            ValueKind::Terminator(TerminatorKind::UnconditionalBranch { .. })
            | ValueKind::Terminator(TerminatorKind::ConditionalBranch { .. }) => "branch",
            ValueKind::Terminator(TerminatorKind::SwitchBranch { .. }) => "switch",
            ValueKind::Terminator(TerminatorKind::Builder) => "builder",
        }
    }

    /// Static double-dispatch over kinds, replacing the source's visitor pattern (spec.md §9):
    /// `visitor` is matched against an exhaustive enum rather than invoking a virtual method.
    pub fn accept<V: ValueVisitor>(self, ctx: &crate::context::IrContext, visitor: &mut V) {
        match &ctx.value(self).kind {
            ValueKind::Parameter(p) => visitor.visit_parameter(self, p),
            ValueKind::Constant(c) => visitor.visit_constant(self, c),
            ValueKind::Call { callee, args } => visitor.visit_call(self, *callee, args),
            ValueKind::Predicate {
                condition,
                if_true,
                if_false,
            } => visitor.visit_predicate(self, *condition, *if_true, *if_false),
            ValueKind::BranchTarget(bt) => visitor.visit_branch_target(self, bt),
            ValueKind::Terminator(term) => visitor.visit_terminator(self, term),
        }
    }

    /// Rebuilds this value into a fresh method, remapping every operand through `remap`.
    ///
    /// `BuilderTerminator` values can never be rebuilt: they're a transient placeholder that must
    /// be replaced by a real terminator before any analysis or rebuild runs (spec.md §9 open
    /// question — enforced here as a hard `Incompatible` error rather than the source's runtime
    /// throw, so the bug surfaces at the rebuild call site instead of deeper in codegen).
    pub fn rebuild(
        self,
        ctx: &crate::context::IrContext,
        remap_values: &FxHashMap<ValueId, ValueId>,
        remap_blocks: &FxHashMap<BlockId, BlockId>,
    ) -> IrResult<ValueKind> {
        let remap_ref = |vr: &ValueReference| -> ValueReference {
            let mapped = remap_values
                .get(&vr.direct_target())
                .copied()
                .unwrap_or(vr.direct_target());
            ValueReference {
                id: mapped,
                mode: vr.mode,
            }
        };
        match &ctx.value(self).kind {
            ValueKind::Terminator(TerminatorKind::Builder) => Err(IrError::incompatible(
                "BuilderTerminator must be replaced before rebuild",
            )),
            ValueKind::Parameter(p) => Ok(ValueKind::Parameter(p.clone())),
            ValueKind::Constant(c) => Ok(ValueKind::Constant(c.clone())),
            ValueKind::Call { callee, args } => Ok(ValueKind::Call {
                callee: *callee,
                args: args.iter().map(remap_ref).collect(),
            }),
            ValueKind::Predicate {
                condition,
                if_true,
                if_false,
            } => Ok(ValueKind::Predicate {
                condition: remap_ref(condition),
                if_true: remap_ref(if_true),
                if_false: remap_ref(if_false),
            }),
            ValueKind::BranchTarget(bt) => {
                let destination = remap_blocks.get(&bt.destination).copied().ok_or_else(|| {
                    IrError::incompatible("rebuild mapping does not cover this branch target's destination block")
                })?;
                Ok(ValueKind::BranchTarget(BranchTargetData {
                    destination,
                    arguments: bt.arguments.iter().map(remap_ref).collect(),
                }))
            }
            ValueKind::Terminator(term) => Ok(ValueKind::Terminator(term.remap(&remap_ref))),
        }
    }
}

/// Visitor trait for [`ValueId::accept`]. Default methods make every hook optional, matching the
/// common case of a pass only caring about one or two kinds.
pub trait ValueVisitor {
    fn visit_parameter(&mut self, _value: ValueId, _param: &ParameterData) {}
    fn visit_constant(&mut self, _value: ValueId, _constant: &ConstantValue) {}
    fn visit_call(&mut self, _value: ValueId, _callee: MethodId, _args: &[ValueReference]) {}
    fn visit_predicate(
        &mut self,
        _value: ValueId,
        _condition: ValueReference,
        _if_true: ValueReference,
        _if_false: ValueReference,
    ) {
    }
    fn visit_branch_target(&mut self, _value: ValueId, _target: &BranchTargetData) {}
    fn visit_terminator(&mut self, _value: ValueId, _terminator: &TerminatorKind) {}
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::IrContext;
    use crate::method::Method;
    use crate::types::BasicValueType;

    #[test]
    fn replace_is_idempotent() {
        let mut ctx = IrContext::new();
        let i32_ty = ctx.types.basic(BasicValueType::Int32);
        let method = Method::declare(&mut ctx, "f", vec![], i32_ty);
        let builder = method.create_builder(&mut ctx).unwrap();
        let v = builder.block(&ctx).create_constant(&mut ctx, ConstantValue::Int(1), i32_ty);
        let w = builder.block(&ctx).create_constant(&mut ctx, ConstantValue::Int(2), i32_ty);

        v.replace(&mut ctx, w).unwrap();
        v.replace(&mut ctx, w).unwrap(); // idempotent
        assert_eq!(v.resolve(&ctx), w);
        assert!(v.is_replaced(&ctx));

        let err = v.replace(&mut ctx, v);
        assert!(matches!(err, Err(IrError::InvalidArgument(_))));
    }

    #[test]
    fn replace_rejects_retargeting() {
        let mut ctx = IrContext::new();
        let i32_ty = ctx.types.basic(BasicValueType::Int32);
        let method = Method::declare(&mut ctx, "f", vec![], i32_ty);
        let builder = method.create_builder(&mut ctx).unwrap();
        let v = builder.block(&ctx).create_constant(&mut ctx, ConstantValue::Int(1), i32_ty);
        let w = builder.block(&ctx).create_constant(&mut ctx, ConstantValue::Int(2), i32_ty);
        let x = builder.block(&ctx).create_constant(&mut ctx, ConstantValue::Int(3), i32_ty);

        v.replace(&mut ctx, w).unwrap();
        assert!(v.replace(&mut ctx, x).is_err());
    }
}
