//! Strategy Descriptor: a pure function plus its declared dependencies.
//!
//! A strategy is the plug-in unit of this crate: implementers provide
//! [`StrategyDescriptor::dependencies`] and [`StrategyDescriptor::calculate`]
//! and nothing else. There is no class hierarchy; any value that can name
//! its inputs and map them to an output qualifies. [`ClosureStrategy`]
//! exists so a caller (or a test) can install one without declaring a
//! dedicated type, mirroring the ergonomics of a closure-based calculation
//! node.

use std::collections::HashMap;
use std::fmt;

use crate::bundle::ParameterBundle;
use crate::error::TraitError;
use crate::output::NodeOutput;

/// One resolved dependency value handed to a strategy's `calculate`.
///
/// Dependencies are declared uniformly as names; at resolution time each
/// name is discriminated into either a parameter value or an upstream
/// node's output.
#[derive(Debug, Clone, PartialEq)]
pub enum DepValue {
    /// The dependency name resolved to a parameter.
    Scalar(f64),
    /// The dependency name resolved to another node's output.
    Node(NodeOutput),
}

impl DepValue {
    /// Returns the scalar value, failing with [`TraitError::InvalidInput`]
    /// if this dependency actually resolved to a node output.
    pub fn as_scalar(&self) -> Result<f64, TraitError> {
        match self {
            DepValue::Scalar(v) => Ok(*v),
            DepValue::Node(_) => Err(TraitError::InvalidInput(
                "expected a scalar parameter, found a node output".into(),
            )),
        }
    }

    /// Returns the node output, failing with [`TraitError::InvalidInput`]
    /// if this dependency actually resolved to a parameter.
    pub fn as_node(&self) -> Result<&NodeOutput, TraitError> {
        match self {
            DepValue::Node(out) => Ok(out),
            DepValue::Scalar(_) => Err(TraitError::InvalidInput(
                "expected a node output, found a scalar parameter".into(),
            )),
        }
    }
}

/// A mapping from declared dependency name to its resolved value, handed
/// to [`StrategyDescriptor::calculate`] alongside the full parameter
/// bundle.
pub type DepMap = HashMap<String, DepValue>;

/// The cause of a strategy's internal failure, wrapped by the engine into
/// `EngineError::StrategyFailure`.
pub type StrategyFailureCause = TraitError;

/// The capability set every calculation node installs: a declared list of
/// dependency names and a pure function from those dependencies (plus the
/// full parameter bundle) to a [`NodeOutput`].
///
/// Implementations must be deterministic with respect to their declared
/// inputs, since the engine's caching and minimal-invalidation guarantees
/// depend on it, and must not perform I/O.
pub trait StrategyDescriptor: Send + Sync {
    /// The names this strategy reads, drawn from the union of parameter
    /// names and node names. Order is preserved in diagnostics but does
    /// not affect resolution.
    fn dependencies(&self) -> Vec<String>;

    /// Computes this node's output from its resolved dependencies and the
    /// full parameter bundle.
    fn calculate(
        &self,
        deps: &DepMap,
        params: &ParameterBundle,
    ) -> Result<NodeOutput, StrategyFailureCause>;
}

impl fmt::Debug for dyn StrategyDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StrategyDescriptor")
            .field("dependencies", &self.dependencies())
            .finish()
    }
}

/// A [`StrategyDescriptor`] built from a dependency list and a closure,
/// for installing ad hoc strategies without a dedicated type.
pub struct ClosureStrategy<F>
where
    F: Fn(&DepMap, &ParameterBundle) -> Result<NodeOutput, StrategyFailureCause> + Send + Sync,
{
    dependencies: Vec<String>,
    calculate_fn: F,
}

impl<F> ClosureStrategy<F>
where
    F: Fn(&DepMap, &ParameterBundle) -> Result<NodeOutput, StrategyFailureCause> + Send + Sync,
{
    /// Creates a new closure-backed strategy declaring `dependencies`.
    pub fn new(dependencies: Vec<String>, calculate_fn: F) -> Self {
        Self {
            dependencies,
            calculate_fn,
        }
    }
}

impl<F> StrategyDescriptor for ClosureStrategy<F>
where
    F: Fn(&DepMap, &ParameterBundle) -> Result<NodeOutput, StrategyFailureCause> + Send + Sync,
{
    fn dependencies(&self) -> Vec<String> {
        self.dependencies.clone()
    }

    fn calculate(
        &self,
        deps: &DepMap,
        params: &ParameterBundle,
    ) -> Result<NodeOutput, StrategyFailureCause> {
        (self.calculate_fn)(deps, params)
    }
}
