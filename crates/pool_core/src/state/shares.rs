//! Share (LP token) ledger

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::address::Address;
use crate::error::{PoolError, PoolResult};

/// Claim-token supply and per-holder balances
///
/// Invariant: `total_supply == holders.values().sum()`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShareLedger {
    /// Derived share mint address: ["lp", config]
    pub mint: Address,
    pub total_supply: u64,
    holders: BTreeMap<Address, u64>,
}

/// Post-operation values for one holder, computed before anything is written
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShareUpdate {
    pub holder_balance: u64,
    pub total_supply: u64,
}

impl ShareLedger {
    pub fn new(mint: Address) -> Self {
        Self {
            mint,
            total_supply: 0,
            holders: BTreeMap::new(),
        }
    }

    pub fn balance_of(&self, holder: &Address) -> u64 {
        self.holders.get(holder).copied().unwrap_or(0)
    }

    pub fn holders(&self) -> impl Iterator<Item = (&Address, &u64)> {
        self.holders.iter()
    }

    /// Values after minting `amount` to `holder`
    pub fn preview_mint(&self, holder: &Address, amount: u64) -> PoolResult<ShareUpdate> {
        let holder_balance = self
            .balance_of(holder)
            .checked_add(amount)
            .ok_or(PoolError::ArithmeticOverflow)?;
        let total_supply = self
            .total_supply
            .checked_add(amount)
            .ok_or(PoolError::ArithmeticOverflow)?;
        Ok(ShareUpdate {
            holder_balance,
            total_supply,
        })
    }

    /// Values after burning `amount` from `holder`
    pub fn preview_burn(&self, holder: &Address, amount: u64) -> PoolResult<ShareUpdate> {
        let have = self.balance_of(holder);
        let holder_balance = have
            .checked_sub(amount)
            .ok_or(PoolError::InsufficientShares { have, need: amount })?;
        // holder balance is part of total supply
        let total_supply = self
            .total_supply
            .checked_sub(amount)
            .ok_or(PoolError::ArithmeticOverflow)?;
        Ok(ShareUpdate {
            holder_balance,
            total_supply,
        })
    }

    /// Write a previewed update. Emptied holder entries are dropped.
    pub fn apply(&mut self, holder: &Address, update: ShareUpdate) {
        if update.holder_balance == 0 {
            self.holders.remove(holder);
        } else {
            self.holders.insert(*holder, update.holder_balance);
        }
        self.total_supply = update.total_supply;
    }

    /// Closed accounting check
    pub fn is_balanced(&self) -> bool {
        let sum: u128 = self.holders.values().map(|&v| v as u128).sum();
        sum == self.total_supply as u128
    }
}
