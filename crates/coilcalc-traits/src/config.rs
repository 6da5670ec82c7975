//! Engine configuration.
//!
//! Configuration here is limited to construction-time knobs the engine
//! itself consults. The engine never reads a file; an embedding
//! application's own config layer is free to deserialize an
//! [`EngineConfig`] from whatever source it likes and hand it to the
//! engine constructor.

use serde::{Deserialize, Serialize};

/// Construction-time configuration for a calculation engine.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Free-text identifier surfaced in log spans and engine stats. Has
    /// no semantic effect on calculation.
    pub name: String,

    /// Maximum number of prior result snapshots retained by the Result
    /// Store (`K` in the design notes). Oldest snapshot is evicted first.
    pub history_capacity: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            name: "coilcalc-engine".to_string(),
            history_capacity: 3,
        }
    }
}
