//! CLI configuration: state file location and engine settings

use anyhow::{Context, Result};
use pool_core::EngineConfig;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Environment variable naming a config file
pub const CONFIG_ENV: &str = "AMM_CONFIG";

const DEFAULT_CONFIG_PATH: &str = "~/.config/amm/config.toml";
const DEFAULT_STATE_PATH: &str = "~/.config/amm/state.json";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CliConfig {
    /// Where pools and balances persist between invocations (`~` expanded)
    pub state_path: String,

    /// Fee used by `init` when none is given
    pub default_fee_bps: u16,

    pub engine: EngineConfig,
}

impl Default for CliConfig {
    fn default() -> Self {
        Self {
            state_path: DEFAULT_STATE_PATH.to_string(),
            default_fee_bps: 30,
            engine: EngineConfig::default(),
        }
    }
}

impl CliConfig {
    /// Resolve configuration
    ///
    /// An explicit path must exist. Otherwise `AMM_CONFIG`, then the default
    /// location, are tried; if neither names a file the defaults apply.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        if let Some(path) = explicit {
            return Self::from_file(path);
        }

        let candidate = match std::env::var(CONFIG_ENV) {
            Ok(path) => expand(&path)?,
            Err(_) => expand(DEFAULT_CONFIG_PATH)?,
        };
        if candidate.exists() {
            Self::from_file(&candidate)
        } else {
            log::debug!("No config at {}, using defaults", candidate.display());
            Ok(Self::default())
        }
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let data = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        toml::from_str(&data)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }

    /// State file path with `~` and environment variables expanded
    pub fn state_path(&self) -> Result<PathBuf> {
        expand(&self.state_path)
    }
}

fn expand(path: &str) -> Result<PathBuf> {
    let expanded = shellexpand::full(path)
        .with_context(|| format!("Failed to expand path: {}", path))?;
    Ok(PathBuf::from(expanded.as_ref()))
}
