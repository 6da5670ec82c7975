//! Strategy Registry: named map from node-name to {default, alternatives}.
//!
//! A registry is built once per model (e.g. an instrument profile) and
//! installed into an engine with [`crate::engine::CalculationEngine::reset_with`],
//! which seeds every node with its default strategy and marks the whole
//! graph stale, mirroring the original `STRATEGY_MAP`/`swap_strategy_map`
//! pattern, but as an explicit value instead of module-scoped global state.

use std::collections::BTreeMap;
use std::sync::Arc;

use coilcalc_traits::strategy::StrategyDescriptor;

use crate::error::{EngineError, EngineResult};

struct RegistryEntry {
    default: Arc<dyn StrategyDescriptor>,
    alternatives: Vec<Arc<dyn StrategyDescriptor>>,
}

/// A named collection of installable strategies, one default (plus
/// optional alternatives) per node-name.
#[derive(Default)]
pub struct StrategyRegistry {
    entries: BTreeMap<String, RegistryEntry>,
}

impl StrategyRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `name` with a default strategy and no alternatives.
    pub fn register(&mut self, name: impl Into<String>, default: Arc<dyn StrategyDescriptor>) {
        self.entries.insert(
            name.into(),
            RegistryEntry {
                default,
                alternatives: Vec::new(),
            },
        );
    }

    /// Registers `name` with a default strategy and a list of selectable
    /// alternatives.
    pub fn register_with_alternatives(
        &mut self,
        name: impl Into<String>,
        default: Arc<dyn StrategyDescriptor>,
        alternatives: Vec<Arc<dyn StrategyDescriptor>>,
    ) {
        self.entries
            .insert(name.into(), RegistryEntry { default, alternatives });
    }

    /// All registered node-names, in lexicographic order.
    pub fn names(&self) -> Vec<String> {
        self.entries.keys().cloned().collect()
    }

    /// The default strategy for `name`.
    pub fn default_for(&self, name: &str) -> EngineResult<Arc<dyn StrategyDescriptor>> {
        self.entries
            .get(name)
            .map(|entry| entry.default.clone())
            .ok_or_else(|| EngineError::NodeNotFound(name.to_string()))
    }

    /// The selectable alternative strategies for `name` (may be empty).
    pub fn alternatives_for(&self, name: &str) -> Vec<Arc<dyn StrategyDescriptor>> {
        self.entries
            .get(name)
            .map(|entry| entry.alternatives.clone())
            .unwrap_or_default()
    }
}
