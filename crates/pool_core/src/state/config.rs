//! Pool configuration record

use serde::{Deserialize, Serialize};

use crate::address::{Address, AddressDeriver};

/// Seed prefix of the configuration address: ["config", seed_le]
pub const CONFIG_SEED: &[u8] = b"config";
/// Seed prefix of the share mint address: ["lp", config]
pub const SHARE_MINT_SEED: &[u8] = b"lp";
/// Seed prefix of the vault addresses: ["vault", config, asset]
pub const VAULT_SEED: &[u8] = b"vault";

/// Bumps that re-derive the configuration and share mint addresses
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DerivationBumps {
    pub config: u8,
    pub share_mint: u8,
}

/// Persistent description of one pool
///
/// Everything except `locked` is immutable after initialization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PoolConfig {
    /// Caller-chosen pool identifier
    pub seed: u64,
    /// Derived configuration address
    pub address: Address,
    pub asset_a: Address,
    pub asset_b: Address,
    /// Swap fee in basis points (0..=10_000)
    pub fee_bps: u16,
    /// Identity allowed to lock/unlock the pool
    pub authority: Address,
    /// When set, deposit/withdraw/swap are rejected
    pub locked: bool,
    pub share_mint: Address,
    pub vault_a: Address,
    pub vault_b: Address,
    pub bumps: DerivationBumps,
}

impl PoolConfig {
    /// Check that the recorded bumps still re-derive the recorded addresses
    /// and that both vault addresses derive from this configuration
    pub fn verify_derivation(&self, deriver: &dyn AddressDeriver) -> bool {
        let seed = self.seed.to_le_bytes();
        let config = deriver.create_address(&[CONFIG_SEED, &seed], self.bumps.config);
        let share_mint = deriver.create_address(
            &[SHARE_MINT_SEED, self.address.as_bytes()],
            self.bumps.share_mint,
        );
        let vault = |asset: &Address| {
            deriver
                .find_address(&[VAULT_SEED, self.address.as_bytes(), asset.as_bytes()])
                .map(|(address, _)| address)
        };
        config == Some(self.address)
            && share_mint == Some(self.share_mint)
            && vault(&self.asset_a) == Some(self.vault_a)
            && vault(&self.asset_b) == Some(self.vault_b)
    }
}
