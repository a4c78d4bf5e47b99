//! Pool aggregate: configuration + vaults + share ledger

use serde::{Deserialize, Serialize};

use super::{PoolConfig, ShareLedger, Vault};
use amm_math::MAX_FEE_BPS;

use crate::address::{Address, AddressDeriver};

/// Swap direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SwapDirection {
    /// Sell asset A, receive asset B
    AToB,
    /// Sell asset B, receive asset A
    BToA,
}

/// One pool: the unit of consistency for every operation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pool {
    pub config: PoolConfig,
    pub vault_a: Vault,
    pub vault_b: Vault,
    pub shares: ShareLedger,
}

/// Read-only view of a pool at one instant
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PoolSnapshot {
    pub config: PoolConfig,
    pub reserve_a: u64,
    pub reserve_b: u64,
    pub total_shares: u64,
}

impl Pool {
    /// Fresh pool with empty vaults and zero share supply
    pub fn new(config: PoolConfig) -> Self {
        Self {
            vault_a: Vault::new(config.vault_a, config.asset_a),
            vault_b: Vault::new(config.vault_b, config.asset_b),
            shares: ShareLedger::new(config.share_mint),
            config,
        }
    }

    /// (input vault, output vault) for a swap direction
    pub fn vaults_for(&self, direction: SwapDirection) -> (&Vault, &Vault) {
        match direction {
            SwapDirection::AToB => (&self.vault_a, &self.vault_b),
            SwapDirection::BToA => (&self.vault_b, &self.vault_a),
        }
    }

    /// Write settled reserves for a swap direction
    pub fn set_swap_reserves(&mut self, direction: SwapDirection, reserve_in: u64, reserve_out: u64) {
        match direction {
            SwapDirection::AToB => {
                self.vault_a.balance = reserve_in;
                self.vault_b.balance = reserve_out;
            }
            SwapDirection::BToA => {
                self.vault_b.balance = reserve_in;
                self.vault_a.balance = reserve_out;
            }
        }
    }

    /// Structural checks for a pool loaded from outside the engine
    ///
    /// Holds for every pool the handlers produce: valid fee, distinct assets,
    /// vaults matching the configuration, addresses re-deriving under
    /// `deriver`, closed share accounting, and reserves empty exactly when
    /// the share supply is.
    pub fn is_consistent(&self, deriver: &dyn AddressDeriver) -> bool {
        let c = &self.config;
        let empty_reserves = self.vault_a.balance == 0 && self.vault_b.balance == 0;
        let no_reserve = self.vault_a.balance == 0 || self.vault_b.balance == 0;
        let empty_supply = self.shares.total_supply == 0;

        c.fee_bps <= MAX_FEE_BPS
            && c.asset_a != c.asset_b
            && self.vault_a.asset == c.asset_a
            && self.vault_b.asset == c.asset_b
            && self.vault_a.address == c.vault_a
            && self.vault_b.address == c.vault_b
            && self.shares.mint == c.share_mint
            && self.shares.is_balanced()
            && (if empty_supply { empty_reserves } else { !no_reserve })
            && c.verify_derivation(deriver)
    }

    pub fn share_balance(&self, holder: &Address) -> u64 {
        self.shares.balance_of(holder)
    }

    pub fn snapshot(&self) -> PoolSnapshot {
        PoolSnapshot {
            config: self.config,
            reserve_a: self.vault_a.balance,
            reserve_b: self.vault_b.balance,
            total_shares: self.shares.total_supply,
        }
    }
}

impl PoolSnapshot {
    /// k = reserve_a · reserve_b
    pub fn invariant(&self) -> u128 {
        amm_math::constant_product(self.reserve_a, self.reserve_b)
    }
}
