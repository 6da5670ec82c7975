//! Calculation Engine: owns nodes, parameters, and the result store;
//! orchestrates dependency resolution and (re)evaluation.
//!
//! This is the component named (F) in the design, the only piece that
//! mutates state. It holds the installed [`StrategyDescriptor`]s, the
//! current [`ParameterBundle`], and the [`ResultStore`], and is the sole
//! caller of the [`DependencyGraph`] resolver. Every public operation here
//! corresponds to one bullet of the calculation engine's public contract.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

use coilcalc_traits::bundle::ParameterBundle;
use coilcalc_traits::config::EngineConfig;
use coilcalc_traits::output::NodeOutput;
use coilcalc_traits::strategy::{DepMap, DepValue, StrategyDescriptor};
use serde::Serialize;

use crate::error::{EngineError, EngineResult};
use crate::graph::DependencyGraph;
use crate::registry::StrategyRegistry;
use crate::store::{ResultStore, Snapshot};

struct NodeEntry {
    strategy: Arc<dyn StrategyDescriptor>,
}

/// A dependency-resolving, incrementally-recomputing calculation engine.
///
/// `CalculationEngine` is deliberately single-threaded in its evaluation
/// loop (see the crate-level concurrency notes): every mutating operation
/// takes `&mut self`, so two `run_calculations` calls on the same instance
/// can never overlap in safe code. Multiple independent instances may still
/// run on separate threads, since nothing is shared between them but
/// `Arc`-shared, immutable strategy descriptors.
pub struct CalculationEngine {
    config: EngineConfig,
    nodes: BTreeMap<String, NodeEntry>,
    params: ParameterBundle,
    params_seeded: bool,
    store: ResultStore,
    order_cache: Option<Vec<String>>,
}

impl CalculationEngine {
    /// Creates an empty engine: no nodes, an empty parameter bundle, and an
    /// empty result store sized by `config.history_capacity`.
    pub fn new(config: EngineConfig) -> Self {
        let store = ResultStore::new(config.history_capacity);
        Self {
            config,
            nodes: BTreeMap::new(),
            params: ParameterBundle::empty(),
            params_seeded: false,
            store,
            order_cache: None,
        }
    }

    /// Creates an engine with a default [`EngineConfig`].
    pub fn with_defaults() -> Self {
        Self::new(EngineConfig::default())
    }

    /// The configuration this engine was constructed with.
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    fn dependency_lists(&self) -> BTreeMap<String, Vec<String>> {
        self.nodes
            .iter()
            .map(|(name, entry)| (name.clone(), entry.strategy.dependencies()))
            .collect()
    }

    /// Installs or replaces the strategy for `name`. Invalidates `name` and
    /// its full transitive downstream closure; upstream nodes are left
    /// untouched. The cached topological order is dropped and rebuilt
    /// lazily on the next [`CalculationEngine::run_calculations`].
    pub fn add_or_update_node(&mut self, name: impl Into<String>, strategy: Arc<dyn StrategyDescriptor>) {
        let name = name.into();
        tracing::debug!(engine = %self.config.name, node = %name, "installing strategy");
        self.nodes.insert(name.clone(), NodeEntry { strategy });
        self.invalidate_minimal(&name);
        self.order_cache = None;
    }

    /// Marks `name` and its downstream closure stale, computed from the
    /// current node-to-node edges (parameter dependencies never contribute
    /// an edge, so they never widen this set).
    fn invalidate_minimal(&mut self, name: &str) {
        let edges = DependencyGraph::from_edges(&self.dependency_lists());
        let mut stale = edges.downstream_closure(name);
        stale.insert(name.to_string());
        self.store.register(name);
        for affected in &stale {
            self.store.invalidate([affected.as_str()]);
        }
    }

    /// Removes the installed strategy for `name`. Fails with
    /// [`EngineError::InUse`] if any other installed node still declares
    /// `name` as a dependency.
    pub fn delete_node(&mut self, name: &str) -> EngineResult<()> {
        let edges = DependencyGraph::from_edges(&self.dependency_lists());
        let dependents = edges.dependents_of(name);

        if !dependents.is_empty() {
            tracing::warn!(engine = %self.config.name, node = %name, ?dependents, "delete rejected, node is in use");
            return Err(EngineError::InUse {
                node: name.to_string(),
                dependents,
            });
        }

        self.nodes.remove(name);
        self.store.unregister(name);
        self.order_cache = None;
        Ok(())
    }

    /// Replaces the current parameter bundle. On the first call, every
    /// installed node becomes stale. On subsequent calls, only nodes whose
    /// declared dependencies include a parameter name whose value changed
    /// (directly or through their downstream closure) become stale; every
    /// other node's cached output is left alone.
    pub fn update_parameters(&mut self, bundle: ParameterBundle) {
        let directly_affected: Vec<String> = if !self.params_seeded {
            self.nodes.keys().cloned().collect()
        } else {
            let changed = self.params.changed_names(&bundle);
            self.nodes
                .iter()
                .filter(|(_, entry)| entry.strategy.dependencies().iter().any(|d| changed.contains(d)))
                .map(|(name, _)| name.clone())
                .collect()
        };

        let edges = DependencyGraph::from_edges(&self.dependency_lists());
        let mut stale: BTreeSet<String> = BTreeSet::new();
        for name in &directly_affected {
            stale.insert(name.clone());
            stale.extend(edges.downstream_closure(name));
        }

        tracing::debug!(
            engine = %self.config.name,
            changed_nodes = stale.len(),
            first_update = !self.params_seeded,
            "parameters updated"
        );
        self.store.invalidate(stale.iter().map(String::as_str));
        self.params = bundle;
        self.params_seeded = true;
    }

    /// Evaluates every stale node in topological order with no cancellation
    /// hook. Equivalent to `run_calculations_with_abort(None)`.
    pub fn run_calculations(&mut self) -> EngineResult<()> {
        self.run_calculations_with_abort(None)
    }

    /// Evaluates every stale node in topological order. `should_abort`, if
    /// given, is consulted between node evaluations; when it returns
    /// `true` the run aborts with [`EngineError::Cancelled`] and leaves
    /// already-completed nodes fresh, exactly as a strategy failure would.
    ///
    /// Rebuilds the cached topological order first if it was invalidated
    /// by a prior `add_or_update_node`/`delete_node`; a cycle or an
    /// unresolved dependency is surfaced unmodified from the resolver.
    pub fn run_calculations_with_abort(
        &mut self,
        should_abort: Option<&dyn Fn() -> bool>,
    ) -> EngineResult<()> {
        if self.order_cache.is_none() {
            let graph = DependencyGraph::build(&self.dependency_lists(), |name| self.params.contains(name))?;
            self.order_cache = Some(graph.topological_order()?);
        }
        // Cloned so the loop body can mutate `self.store` while walking the
        // order without fighting the borrow checker over `self`.
        let order = self.order_cache.clone().expect("computed above");

        for (i, name) in order.iter().enumerate() {
            if i > 0 {
                if let Some(abort) = should_abort {
                    if abort() {
                        tracing::warn!(engine = %self.config.name, node = %name, "run_calculations cancelled");
                        return Err(EngineError::Cancelled);
                    }
                }
            }

            if !self.store.is_stale(name) {
                continue;
            }

            let entry = self.nodes.get(name).expect("node named in evaluation order is installed");
            let deps = self.build_dep_map(name, &entry.strategy)?;

            match entry.strategy.calculate(&deps, &self.params) {
                Ok(output) => {
                    tracing::trace!(engine = %self.config.name, node = %name, "node evaluated");
                    self.store.put(name, output);
                }
                Err(cause) => {
                    let failure = EngineError::StrategyFailure {
                        node: name.clone(),
                        cause: cause.clone(),
                    };
                    tracing::warn!(engine = %self.config.name, node = %name, error = %failure, "strategy evaluation failed");
                    return Err(EngineError::EvaluationFailed {
                        node: name.clone(),
                        cause,
                    });
                }
            }
        }
        Ok(())
    }

    /// Assembles the `deps` map handed to a strategy's `calculate`,
    /// discriminating each declared name into a resolved parameter scalar
    /// or an upstream node's output. Only reachable with an absent value
    /// if the graph was built against a parameter bundle that has since
    /// been replaced without a corresponding `run`; surfaced as
    /// [`EngineError::MissingInput`] rather than panicking.
    fn build_dep_map(&self, name: &str, strategy: &Arc<dyn StrategyDescriptor>) -> EngineResult<DepMap> {
        let mut deps = DepMap::new();
        for dep_name in strategy.dependencies() {
            if self.nodes.contains_key(&dep_name) {
                let output = self.store.current().get(&dep_name).cloned().ok_or_else(|| {
                    EngineError::MissingInput {
                        node: name.to_string(),
                        input: dep_name.clone(),
                    }
                })?;
                deps.insert(dep_name, DepValue::Node(output));
            } else {
                let value = self.params.get(&dep_name).map_err(|_| EngineError::MissingInput {
                    node: name.to_string(),
                    input: dep_name.clone(),
                })?;
                deps.insert(dep_name, DepValue::Scalar(value));
            }
        }
        Ok(deps)
    }

    /// Commits the current mapping into history at logical position
    /// `index`, bounded `0..history_capacity`. The ring always evicts the
    /// oldest snapshot first regardless of `index` (the only policy this
    /// engine supports, per the design notes); `index` is validated purely
    /// as a bounds check so a caller cannot address a slot history will
    /// never retain. Fails with [`EngineError::NotReady`] if any node is
    /// stale.
    pub fn save_calculation_results(&mut self, index: usize) -> EngineResult<()> {
        if index >= self.config.history_capacity {
            return Err(EngineError::InvalidInput(format!(
                "history index {index} is out of the retained range 0..{}",
                self.config.history_capacity
            )));
        }
        self.store.commit()
    }

    /// Drops the current outputs. Installed strategies and the parameter
    /// bundle are retained; every node becomes stale again.
    pub fn clear_calculation_results(&mut self) {
        self.store.clear();
        let names: Vec<String> = self.nodes.keys().cloned().collect();
        self.store.invalidate(names.iter().map(String::as_str));
    }

    /// Installs `strategy` at `name` (as [`CalculationEngine::add_or_update_node`])
    /// and, if `overlay_params` is given, merges it over the current
    /// parameter bundle and applies the merged result via
    /// [`CalculationEngine::update_parameters`].
    pub fn swap_strategy_for_node(
        &mut self,
        name: impl Into<String>,
        strategy: Arc<dyn StrategyDescriptor>,
        overlay_params: Option<ParameterBundle>,
    ) {
        self.add_or_update_node(name, strategy);
        if let Some(overlay) = overlay_params {
            let merged = self.params.merged_with(&overlay);
            self.update_parameters(merged);
        }
    }

    /// Rebuilds this engine's node set wholesale from `registry`: every
    /// registered name is seeded with its default strategy and marked
    /// stale. The existing parameter bundle is left in place (mirroring
    /// the original `swap_strategy_map`'s re-application of the last known
    /// inputs), and history is reset.
    pub fn reset_with(&mut self, registry: &StrategyRegistry) -> EngineResult<()> {
        let mut nodes = BTreeMap::new();
        for name in registry.names() {
            let strategy = registry.default_for(&name)?;
            nodes.insert(name, NodeEntry { strategy });
        }
        tracing::debug!(engine = %self.config.name, node_count = nodes.len(), "engine reset from registry");
        self.nodes = nodes;
        self.store = ResultStore::new(self.config.history_capacity);
        for name in self.nodes.keys() {
            self.store.register(name);
        }
        self.order_cache = None;
        Ok(())
    }

    /// All installed node names, in lexicographic order.
    pub fn node_names(&self) -> Vec<String> {
        self.nodes.keys().cloned().collect()
    }

    /// Whether `name` currently holds a stale (or never-computed) output.
    /// Returns `false` for a name that is not installed.
    pub fn is_stale(&self, name: &str) -> bool {
        self.store.is_stale(name)
    }

    /// A read-only view of the current `{name -> NodeOutput}` mapping.
    pub fn current(&self) -> &Snapshot {
        self.store.current()
    }

    /// The current output for a single node.
    pub fn current_output(&self, name: &str) -> EngineResult<&NodeOutput> {
        self.store
            .current()
            .get(name)
            .ok_or_else(|| EngineError::NodeNotFound(name.to_string()))
    }

    /// The history snapshot retained at `index` (0 = oldest retained).
    pub fn history(&self, index: usize) -> EngineResult<&Snapshot> {
        self.store.history(index)
    }

    /// The number of snapshots currently retained in history.
    pub fn history_len(&self) -> usize {
        self.store.history_len()
    }

    /// A point-in-time snapshot of engine size and freshness, suitable for
    /// an embedding application's own health/metrics surface.
    pub fn stats(&self) -> EngineStats {
        let stale_count = self.nodes.keys().filter(|name| self.store.is_stale(name)).count();
        EngineStats {
            name: self.config.name.clone(),
            node_count: self.nodes.len(),
            stale_count,
            history_len: self.store.history_len(),
            history_capacity: self.config.history_capacity,
        }
    }
}

/// A point-in-time snapshot of a [`CalculationEngine`]'s size and
/// freshness. Serializable so an embedding application can fold it into
/// its own health/metrics reporting without the core depending on any
/// specific observability backend.
#[derive(Debug, Clone, Serialize)]
pub struct EngineStats {
    /// The engine's configured name.
    pub name: String,
    /// Number of installed nodes.
    pub node_count: usize,
    /// Number of installed nodes currently stale.
    pub stale_count: usize,
    /// Number of snapshots currently retained in history.
    pub history_len: usize,
    /// Construction-time history capacity (`K`).
    pub history_capacity: usize,
}
