//! Engine configuration

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::address::{Address, Sha256Deriver};

/// Default bound on waiting for a pool's exclusive lock
pub const DEFAULT_LOCK_TIMEOUT_MS: u64 = 250;

/// Default program identity label
pub const DEFAULT_PROGRAM_ID: &str = "constant-product-amm";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Longest an operation waits for its pool before failing with PoolBusy
    pub lock_timeout_ms: u64,

    /// Program identity: a base58 address or a label hashed into one
    pub program_id: String,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            lock_timeout_ms: DEFAULT_LOCK_TIMEOUT_MS,
            program_id: DEFAULT_PROGRAM_ID.to_string(),
        }
    }
}

impl EngineConfig {
    pub fn lock_timeout(&self) -> Duration {
        Duration::from_millis(self.lock_timeout_ms)
    }

    pub fn program_address(&self) -> Address {
        self.program_id
            .parse()
            .unwrap_or_else(|_| Address::from_label(&self.program_id))
    }

    pub fn deriver(&self) -> Sha256Deriver {
        Sha256Deriver::new(self.program_address())
    }
}
