//! # coilcalc-engine
//!
//! Dependency-resolving, incrementally-recomputing calculation engine for
//! search-coil sensor models.
//!
//! This crate composes many small analytical "strategies" (see
//! `coilcalc_traits::strategy::StrategyDescriptor`) into a DAG of named
//! calculation nodes. It is the stateful half of the coilcalc workspace:
//!
//! - [`graph`]: the Dependency Resolver, deterministic topological
//!   ordering and cycle detection over the installed node set.
//! - [`store`]: the Result Store, current outputs plus a bounded FIFO
//!   ring of prior complete snapshots.
//! - [`registry`]: the Strategy Registry, a named `{default,
//!   alternatives}` map used to seed or reset an engine.
//! - [`engine`]: the Calculation Engine itself, which owns the above and
//!   exposes the public contract (`add_or_update_node`, `run_calculations`,
//!   `save_calculation_results`, ...).
//! - [`builder`]: construction ergonomics for wiring a config, a registry,
//!   and an initial parameter bundle into one engine in a single call.
//!
//! ## Example
//!
//! ```
//! use std::sync::Arc;
//! use std::collections::HashMap;
//! use coilcalc_engine::prelude::*;
//! use coilcalc_traits::prelude::*;
//!
//! let mut engine = CalculationEngine::with_defaults();
//! engine.add_or_update_node(
//!     "resistance",
//!     Arc::new(ClosureStrategy::new(vec!["nb_spire".to_string()], |deps, _params| {
//!         let n = deps.get("nb_spire").unwrap().as_scalar()?;
//!         Ok(NodeOutput::scalar(n * 0.5, vec!["resistance".into()], vec!["ohm".into()]))
//!     })),
//! );
//! engine.update_parameters(
//!     ParameterBundle::new(HashMap::from([("nb_spire".to_string(), 100.0)])).unwrap(),
//! );
//! engine.run_calculations().unwrap();
//! assert_eq!(engine.current_output("resistance").unwrap().as_scalar(), Some(50.0));
//! ```
//!
//! ## What is out of scope
//!
//! The graphical front-end, SPICE interop, and stochastic optimizers of
//! the system this engine was extracted from are external collaborators
//! of the [`engine::CalculationEngine`] public contract only; none of them
//! are modeled in this crate.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(unsafe_code)]

pub mod builder;
pub mod engine;
pub mod error;
pub mod graph;
pub mod registry;
pub mod store;

pub use engine::{CalculationEngine, EngineStats};
pub use error::{EngineError, EngineResult};

/// Re-exports of the most commonly used types, for
/// `use coilcalc_engine::prelude::*;`.
pub mod prelude {
    pub use crate::builder::CalculationEngineBuilder;
    pub use crate::engine::{CalculationEngine, EngineStats};
    pub use crate::error::{EngineError, EngineResult};
    pub use crate::graph::DependencyGraph;
    pub use crate::registry::StrategyRegistry;
    pub use crate::store::{ResultStore, Snapshot};
}
