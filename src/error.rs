//! Error taxonomy for the IR core.
//!
//! Mirrors the categories spec'd for the embedding compiler driver: a caller-supplied precondition
//! violation ([`IrError::InvalidArgument`]), an operation attempted against a builder/value that's
//! no longer live ([`IrError::InvalidState`]), a rebuild/specialisation mapping mismatch
//! ([`IrError::Incompatible`]), and an invariant that should have been prevented upstream
//! ([`IrError::Internal`]).

use thiserror::Error;

use crate::ids::ValueId;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum IrError {
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("invalid builder state: {0}")]
    InvalidState(String),

    #[error("incompatible rebuild/specialisation mapping: {0}")]
    Incompatible(String),

    #[error("internal IR invariant violated: {0}")]
    Internal(String),
}

impl IrError {
    pub fn invalid_argument(msg: impl Into<String>) -> Self {
        IrError::InvalidArgument(msg.into())
    }

    pub fn invalid_state(msg: impl Into<String>) -> Self {
        IrError::InvalidState(msg.into())
    }

    pub fn incompatible(msg: impl Into<String>) -> Self {
        IrError::Incompatible(msg.into())
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        IrError::Internal(msg.into())
    }

    pub(crate) fn replaced_value(value: ValueId) -> Self {
        debug_assert!(false, "operation attempted on replaced value {value:?}");
        IrError::InvalidState(format!("{value:?} has already been replaced"))
    }
}

pub type IrResult<T> = Result<T, IrError>;
