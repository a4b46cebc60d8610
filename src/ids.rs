//! Arena handles for the graph.
//!
//! Every [`ValueId`], [`BlockId`] and [`MethodId`] is a `Copy` index into an
//! [`crate::context::IrContext`] arena, never a lifetime root. Two handles compare equal iff
//! they name the same arena slot.

use generational_arena::Index;

/// Handle to a [`crate::value::ValueData`] stored in the owning [`crate::context::IrContext`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ValueId(pub(crate) Index);

/// Handle to a [`crate::block::BasicBlock`] stored in the owning [`crate::context::IrContext`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BlockId(pub(crate) Index);

/// Handle to a [`crate::method::Method`] stored in the owning [`crate::context::IrContext`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MethodId(pub(crate) Index);

/// Monotonically increasing id assigned to every [`crate::value::ValueData`] at creation time.
///
/// Distinct from [`ValueId`]: the arena index can be reused after a slot is freed, the node id
/// never is. Debug output and golden tests key off the node id, not the arena slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub(crate) u64);
