//! Node configuration, stored with confy and overridable from the command line.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use ballot_registry::BallotConfig;
use ballot_shared_types::Principal;

pub const APP_NAME: &str = "ballot-node";
pub const CONFIG_NAME: &str = "node-config";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NodeConfig {
    /// Principal allowed to drive phase transitions and register voters.
    pub administrator: Principal,
    /// JSON file holding the ballot snapshot.
    pub state_file: PathBuf,
    pub log_level: String,
    pub ballot: BallotConfig,
}

impl Default for NodeConfig {
    fn default() -> Self {
        Self {
            administrator: Principal::from_bytes([0u8; 20]),
            state_file: PathBuf::from("ballot-state.json"),
            log_level: "info".to_string(),
            ballot: BallotConfig::default(),
        }
    }
}

/// Loads the config from `path`, or from the per-user confy location.
pub fn load(path: Option<&Path>) -> Result<NodeConfig, confy::ConfyError> {
    match path {
        Some(path) => confy::load_path(path),
        None => confy::load(APP_NAME, CONFIG_NAME),
    }
}

#[cfg(test)]
pub fn store(path: Option<&Path>, config: &NodeConfig) -> Result<(), confy::ConfyError> {
    match path {
        Some(path) => confy::store_path(path, config),
        None => confy::store(APP_NAME, CONFIG_NAME, config),
    }
}

pub fn config_file_path(path: Option<&Path>) -> Result<PathBuf, confy::ConfyError> {
    match path {
        Some(path) => Ok(path.to_path_buf()),
        None => confy::get_configuration_file_path(APP_NAME, CONFIG_NAME),
    }
}
