//! An SSA-form intermediate representation for a JIT that lowers CPU kernel code into accelerator
//! kernels: basic blocks joined by block parameters instead of phi nodes, explicit
//! branch-argument passing, and a structural transformation pass (if-conversion) built on top of
//! CFG/dominator/if-pattern analyses.
//!
//! The graph itself ([`value`], [`parameter`], [`block`], [`terminator`], [`method`]) is owned
//! exclusively by an [`context::IrContext`] arena; everything else holds `Copy` handles
//! ([`ids`]) into it, never a lifetime root. Mutation only happens through a builder — see
//! [`method::MethodBuilder`] and [`block::BlockBuilder`] — which commits its pending edits on
//! disposal. Analyses ([`scope`], [`cfg`], [`dominators`], [`ifinfo`]) consume a frozen [`scope::Scope`]
//! snapshot and never a live builder. [`if_conversion`] is the one transformation pass built on
//! top of that analysis stack, driven through the small [`transform`] framework. [`pretty`] gives
//! every value a textual debug form for test goldens.

pub mod block;
pub mod cfg;
pub mod context;
pub mod dominators;
pub mod error;
pub mod if_conversion;
pub mod ids;
pub mod ifinfo;
pub mod method;
pub mod parameter;
pub mod pretty;
pub mod scope;
pub mod terminator;
pub mod transform;
pub mod types;
pub mod value;

pub use error::{IrError, IrResult};
pub use method::Method;
