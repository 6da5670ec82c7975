//! # coilcalc-traits
//!
//! Data model and plug-in contract for the coilcalc calculation engine.
//!
//! This crate contains ONLY the data model and trait definitions, no
//! graph algorithm, no caching, no I/O. `coilcalc-engine` depends on it
//! and supplies the orchestration.
//!
//! ## Module Structure
//!
//! - [`bundle`]: the Parameter Bundle, an immutable snapshot of scalar inputs
//! - [`output`]: the Node Output produced by one strategy evaluation
//! - [`strategy`]: the `DepValue` sum type and the `StrategyDescriptor` trait
//! - [`config`]: construction-time engine configuration
//! - [`error`]: the low-level error vocabulary raised by this crate
//!
//! ## Installing a strategy
//!
//! ```
//! use coilcalc_traits::prelude::*;
//!
//! let doubling = ClosureStrategy::new(vec!["x".to_string()], |deps, _params| {
//!     let x = deps.get("x").unwrap().as_scalar()?;
//!     Ok(NodeOutput::scalar(x * 2.0, vec!["y".into()], vec!["".into()]))
//! });
//! assert_eq!(doubling.dependencies(), vec!["x".to_string()]);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod bundle;
pub mod config;
pub mod error;
pub mod output;
pub mod strategy;

pub use error::TraitError;

/// Re-exports of the most commonly used types, for `use coilcalc_traits::prelude::*;`.
pub mod prelude {
    pub use crate::bundle::ParameterBundle;
    pub use crate::config::EngineConfig;
    pub use crate::error::TraitError;
    pub use crate::output::{NodeData, NodeOutput};
    pub use crate::strategy::{ClosureStrategy, DepMap, DepValue, StrategyDescriptor};
}
