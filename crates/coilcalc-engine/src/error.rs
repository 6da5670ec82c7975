//! Engine error taxonomy.
//!
//! `EngineError` is the high-level error surfaced by every public
//! operation on [`crate::engine::CalculationEngine`]. Low-level failures
//! from the data model (`coilcalc_traits::TraitError`) are wrapped rather
//! than discarded, mirroring the two-tier error design this codebase uses
//! at the traits/engine seam.

use thiserror::Error;

use coilcalc_traits::TraitError;

/// Engine error type.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum EngineError {
    /// A value supplied by the caller was not valid.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// A strategy's declared dependency names neither a known node nor a
    /// known parameter.
    #[error("node '{node}' has an unresolved dependency '{missing}'")]
    UnresolvedDependency {
        /// The node declaring the bad dependency.
        node: String,
        /// The dependency name that could not be resolved.
        missing: String,
    },

    /// The dependency graph contains a cycle. `cycle` names one witness
    /// cycle, in order.
    #[error("cycle detected: {}", cycle.join(" -> "))]
    CycleDetected {
        /// The node names forming the witness cycle.
        cycle: Vec<String>,
    },

    /// A strategy read a declared dependency name that was absent at
    /// evaluation time.
    #[error("node '{node}' is missing required input '{input}'")]
    MissingInput {
        /// The node that was missing an input.
        node: String,
        /// The input name that could not be found.
        input: String,
    },

    /// `delete_node` was called on a node other installed nodes still
    /// depend on.
    #[error("node '{node}' is still in use by: {}", dependents.join(", "))]
    InUse {
        /// The node the caller tried to delete.
        node: String,
        /// The nodes that still declare a dependency on it.
        dependents: Vec<String>,
    },

    /// A strategy's own computation failed internally.
    #[error("strategy for node '{node}' failed: {cause}")]
    StrategyFailure {
        /// The node whose strategy failed.
        node: String,
        /// The underlying cause.
        cause: TraitError,
    },

    /// `run_calculations` aborted because a node's evaluation failed.
    #[error("evaluation of node '{node}' failed: {cause}")]
    EvaluationFailed {
        /// The node whose evaluation caused the abort.
        node: String,
        /// The underlying cause.
        cause: TraitError,
    },

    /// A read or commit was requested while the engine still has stale
    /// nodes.
    #[error("engine is not ready: {0}")]
    NotReady(String),

    /// A history index was out of the retained range.
    #[error("history index {index} is out of range (have {available} snapshots)")]
    OutOfRange {
        /// The requested index.
        index: usize,
        /// The number of snapshots actually retained.
        available: usize,
    },

    /// `run_calculations` was aborted by the caller's `should_abort`
    /// predicate.
    #[error("calculation cancelled")]
    Cancelled,

    /// A node name referenced an installed node that does not exist.
    #[error("node not found: {0}")]
    NodeNotFound(String),

    /// Internal error not otherwise classified.
    #[error("internal error: {0}")]
    Internal(String),
}

impl From<TraitError> for EngineError {
    fn from(e: TraitError) -> Self {
        EngineError::Internal(e.to_string())
    }
}

/// Convenience alias for engine operations.
pub type EngineResult<T> = Result<T, EngineError>;
