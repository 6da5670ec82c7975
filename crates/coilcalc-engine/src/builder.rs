//! Builder for constructing a [`CalculationEngine`] from a config, a
//! registry, and an initial parameter bundle in one step.
//!
//! Most callers only need `CalculationEngine::with_defaults()` followed by
//! `reset_with`/`update_parameters`; this builder exists for the common
//! "known model, known initial inputs" construction path so a caller does
//! not have to sequence those calls itself.

use coilcalc_traits::bundle::ParameterBundle;
use coilcalc_traits::config::EngineConfig;

use crate::engine::CalculationEngine;
use crate::error::EngineResult;
use crate::registry::StrategyRegistry;

/// Builder for a [`CalculationEngine`].
#[derive(Default)]
pub struct CalculationEngineBuilder {
    config: Option<EngineConfig>,
    registry: Option<StrategyRegistry>,
    params: Option<ParameterBundle>,
}

impl CalculationEngineBuilder {
    /// Starts a new builder with nothing configured.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the engine configuration (history capacity, log-span name).
    /// Defaults to [`EngineConfig::default`] if never called.
    pub fn with_config(mut self, config: EngineConfig) -> Self {
        self.config = Some(config);
        self
    }

    /// Seeds the engine's node set from `registry`'s defaults. Optional;
    /// an engine with no registry starts with no installed nodes.
    pub fn with_registry(mut self, registry: StrategyRegistry) -> Self {
        self.registry = Some(registry);
        self
    }

    /// Sets the initial parameter bundle, applied after the registry is
    /// installed. Optional; an engine with no initial parameters starts
    /// with an empty bundle and every node stale.
    pub fn with_parameters(mut self, params: ParameterBundle) -> Self {
        self.params = Some(params);
        self
    }

    /// Builds the engine, applying the registry and parameters in the
    /// order a caller would: seed nodes, then seed inputs.
    pub fn build(self) -> EngineResult<CalculationEngine> {
        let mut engine = CalculationEngine::new(self.config.unwrap_or_default());
        if let Some(registry) = &self.registry {
            engine.reset_with(registry)?;
        }
        if let Some(params) = self.params {
            engine.update_parameters(params);
        }
        Ok(engine)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use coilcalc_traits::output::NodeOutput;
    use coilcalc_traits::strategy::ClosureStrategy;
    use std::collections::HashMap;
    use std::sync::Arc;

    #[test]
    fn builder_with_no_registry_yields_empty_engine() {
        let engine = CalculationEngineBuilder::new().build().unwrap();
        assert!(engine.node_names().is_empty());
    }

    #[test]
    fn builder_seeds_registry_and_parameters() {
        let mut registry = StrategyRegistry::new();
        registry.register(
            "a",
            Arc::new(ClosureStrategy::new(vec!["x".to_string()], |deps, _params| {
                let x = deps.get("x").unwrap().as_scalar()?;
                Ok(NodeOutput::scalar(x * 2.0, vec!["v".into()], vec!["".into()]))
            })),
        );
        let params = ParameterBundle::new(HashMap::from([("x".to_string(), 3.0)])).unwrap();

        let mut engine = CalculationEngineBuilder::new()
            .with_registry(registry)
            .with_parameters(params)
            .build()
            .unwrap();

        engine.run_calculations().unwrap();
        assert_eq!(engine.current_output("a").unwrap().as_scalar(), Some(6.0));
    }
}
