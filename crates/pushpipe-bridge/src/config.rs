use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Global application configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    /// Time budget in seconds the host grants the mutation service per push
    /// before the deadline escape hatch fires.
    pub time_budget_secs: u64,
    /// Path to a JSON file with the push payload the demo host delivers.
    /// When unset, a built-in sample payload is used.
    pub payload_path: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            time_budget_secs: 25,
            payload_path: None,
        }
    }
}
