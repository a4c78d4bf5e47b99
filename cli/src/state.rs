//! Persistent engine state between CLI invocations

use anyhow::{Context, Result};
use pool_core::{Address, BalanceEntry, EngineConfig, InMemoryAccountStore, Pool, PoolRegistry};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// On-disk layout: every pool plus every non-zero holder balance
#[derive(Debug, Default, Serialize, Deserialize)]
struct StateFile {
    pools: Vec<Pool>,
    balances: Vec<BalanceEntry>,
}

/// A registry rebuilt from disk, with its store kept concrete for funding
pub struct Session {
    pub registry: PoolRegistry,
    pub store: Arc<InMemoryAccountStore>,
    path: PathBuf,
}

impl Session {
    /// Load state from `path`; a missing file starts an empty engine
    pub fn open(path: &Path, engine: EngineConfig) -> Result<Self> {
        let state = if path.exists() {
            let data = fs::read_to_string(path)
                .with_context(|| format!("Failed to read state file: {}", path.display()))?;
            serde_json::from_str(&data)
                .with_context(|| format!("Failed to parse state file: {}", path.display()))?
        } else {
            log::info!("No state at {}, starting empty", path.display());
            StateFile::default()
        };

        let store = Arc::new(
            InMemoryAccountStore::from_entries(&state.balances)
                .context("State file holds inconsistent balances")?,
        );
        let registry = PoolRegistry::restore(store.clone(), engine, state.pools)
            .with_context(|| format!("Failed to restore pools from: {}", path.display()))?;

        Ok(Self {
            registry,
            store,
            path: path.to_path_buf(),
        })
    }

    pub fn save(&self) -> Result<()> {
        let state = StateFile {
            pools: self.registry.export()?,
            balances: self.store.entries(),
        };
        let dir = match self.path.parent() {
            Some(dir) if !dir.as_os_str().is_empty() => dir,
            _ => Path::new("."),
        };
        fs::create_dir_all(dir)
            .with_context(|| format!("Failed to create state directory: {}", dir.display()))?;

        // Write a sibling file and rename it over the old state
        let mut file = tempfile::NamedTempFile::new_in(dir)
            .with_context(|| format!("Failed to create temp file in: {}", dir.display()))?;
        serde_json::to_writer_pretty(file.as_file_mut(), &state)?;
        file.as_file_mut()
            .sync_all()
            .context("Failed to flush state")?;
        file.persist(&self.path)
            .with_context(|| format!("Failed to write state file: {}", self.path.display()))?;
        log::debug!("Saved state to {}", self.path.display());
        Ok(())
    }
}

/// Parse an identity: a base58 address, or any other string as a label
pub fn parse_identity(input: &str) -> Address {
    input
        .parse()
        .unwrap_or_else(|_| Address::from_label(input))
}
