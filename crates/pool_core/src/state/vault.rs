//! Custody vaults

use serde::{Deserialize, Serialize};

use crate::address::Address;
use crate::error::{PoolError, PoolResult};

/// Balance of one pool asset, owned exclusively by the pool
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Vault {
    /// Derived vault address: ["vault", config, asset]
    pub address: Address,
    /// Asset held in this vault
    pub asset: Address,
    /// Current reserve
    pub balance: u64,
}

impl Vault {
    pub fn new(address: Address, asset: Address) -> Self {
        Self {
            address,
            asset,
            balance: 0,
        }
    }

    /// Reserve after receiving `amount` (not applied)
    pub fn after_deposit(&self, amount: u64) -> PoolResult<u64> {
        self.balance
            .checked_add(amount)
            .ok_or(PoolError::ArithmeticOverflow)
    }

    /// Reserve after paying out `amount` (not applied)
    pub fn after_withdraw(&self, amount: u64) -> PoolResult<u64> {
        self.balance
            .checked_sub(amount)
            .ok_or(PoolError::InsufficientReserves)
    }
}
