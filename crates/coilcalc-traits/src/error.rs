//! Low-level error vocabulary for the data model.
//!
//! These are the failures that can arise while constructing or reading a
//! [`crate::bundle::ParameterBundle`] or a [`crate::output::NodeOutput`],
//! before a graph or an engine is ever involved. [`crate::strategy`]
//! implementations also raise these to describe an internal numeric
//! failure; `coilcalc-engine` wraps one of these into its own
//! `EngineError::StrategyFailure`.

use thiserror::Error;

/// Common error type for data-model operations.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum TraitError {
    /// A parameter or dependency name was not found where required.
    #[error("not found: {0}")]
    NotFound(String),

    /// A value supplied at construction time was not valid (non-finite,
    /// wrong shape, unknown field).
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// A strategy read a declared dependency name that was absent at
    /// evaluation time.
    #[error("missing input: {0}")]
    MissingInput(String),

    /// Internal failure inside a strategy's own computation (division by
    /// zero, shape mismatch, etc).
    #[error("internal error: {0}")]
    Internal(String),
}
