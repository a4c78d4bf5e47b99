//! Holder balances outside the pool
//!
//! The pool only custodies its vaults. Holder balances of asset A and B live
//! in an `AccountStore`, which the operations debit and credit. Caller
//! authorization is assumed to have been checked by the store's owner before
//! any operation runs.

use std::collections::HashMap;

use log::error;
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::address::Address;

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreError {
    #[error("insufficient funds: have {have}, need {need}")]
    InsufficientFunds { have: u64, need: u64 },

    #[error("balance overflow")]
    Overflow,

    #[error("settlement rollback failed, balances are inconsistent")]
    RollbackFailed,
}

/// Balance ledger for (owner, asset) pairs
pub trait AccountStore: Send + Sync {
    fn balance(&self, owner: &Address, asset: &Address) -> u64;

    fn debit(&self, owner: &Address, asset: &Address, amount: u64) -> Result<(), StoreError>;

    fn credit(&self, owner: &Address, asset: &Address, amount: u64) -> Result<(), StoreError>;

    /// Apply `legs` in order; undo the applied prefix if any leg fails
    ///
    /// Either every leg takes effect or none does. Zero-amount legs are
    /// skipped. If undoing a leg fails the store is left inconsistent and
    /// `RollbackFailed` is returned. Stores that can apply a batch under one
    /// lock should override this.
    fn settle(&self, owner: &Address, legs: &[Leg]) -> Result<(), StoreError> {
        for (i, leg) in legs.iter().enumerate() {
            if leg.amount() == 0 {
                continue;
            }
            if let Err(err) = leg.apply(self, owner) {
                for done in legs[..i].iter().rev().filter(|l| l.amount() > 0) {
                    if let Err(undo_err) = done.reverse().apply(self, owner) {
                        error!("settlement rollback failed for {}: {}", owner, undo_err);
                        return Err(StoreError::RollbackFailed);
                    }
                }
                return Err(err);
            }
        }
        Ok(())
    }
}

/// One movement between a holder and the pool
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Leg {
    /// Holder pays `amount` of `asset` into the pool
    Debit { asset: Address, amount: u64 },
    /// Pool pays `amount` of `asset` out to the holder
    Credit { asset: Address, amount: u64 },
}

impl Leg {
    fn apply<S: AccountStore + ?Sized>(&self, store: &S, owner: &Address) -> Result<(), StoreError> {
        match *self {
            Leg::Debit { asset, amount } => store.debit(owner, &asset, amount),
            Leg::Credit { asset, amount } => store.credit(owner, &asset, amount),
        }
    }

    fn reverse(&self) -> Leg {
        match *self {
            Leg::Debit { asset, amount } => Leg::Credit { asset, amount },
            Leg::Credit { asset, amount } => Leg::Debit { asset, amount },
        }
    }

    fn amount(&self) -> u64 {
        match *self {
            Leg::Debit { amount, .. } | Leg::Credit { amount, .. } => amount,
        }
    }

    fn asset(&self) -> Address {
        match *self {
            Leg::Debit { asset, .. } | Leg::Credit { asset, .. } => asset,
        }
    }
}

/// Serializable balance row
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BalanceEntry {
    pub owner: Address,
    pub asset: Address,
    pub amount: u64,
}

/// In-process `AccountStore`
#[derive(Debug, Default)]
pub struct InMemoryAccountStore {
    balances: RwLock<HashMap<(Address, Address), u64>>,
}

impl InMemoryAccountStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mint `amount` of `asset` to `owner` (airdrop)
    pub fn fund(&self, owner: &Address, asset: &Address, amount: u64) -> Result<u64, StoreError> {
        let mut balances = self.balances.write();
        let entry = balances.entry((*owner, *asset)).or_insert(0);
        *entry = entry.checked_add(amount).ok_or(StoreError::Overflow)?;
        Ok(*entry)
    }

    /// All non-zero balances, ordered by (owner, asset)
    pub fn entries(&self) -> Vec<BalanceEntry> {
        let balances = self.balances.read();
        let mut entries: Vec<BalanceEntry> = balances
            .iter()
            .filter(|(_, amount)| **amount > 0)
            .map(|(&(owner, asset), &amount)| BalanceEntry { owner, asset, amount })
            .collect();
        entries.sort_by(|a, b| (a.owner, a.asset).cmp(&(b.owner, b.asset)));
        entries
    }

    pub fn from_entries(entries: &[BalanceEntry]) -> Result<Self, StoreError> {
        let store = Self::new();
        for entry in entries {
            store.fund(&entry.owner, &entry.asset, entry.amount)?;
        }
        Ok(store)
    }
}

impl AccountStore for InMemoryAccountStore {
    fn balance(&self, owner: &Address, asset: &Address) -> u64 {
        self.balances
            .read()
            .get(&(*owner, *asset))
            .copied()
            .unwrap_or(0)
    }

    fn debit(&self, owner: &Address, asset: &Address, amount: u64) -> Result<(), StoreError> {
        let mut balances = self.balances.write();
        let have = balances.get(&(*owner, *asset)).copied().unwrap_or(0);
        let remaining = have
            .checked_sub(amount)
            .ok_or(StoreError::InsufficientFunds { have, need: amount })?;
        if remaining == 0 {
            balances.remove(&(*owner, *asset));
        } else {
            balances.insert((*owner, *asset), remaining);
        }
        Ok(())
    }

    fn credit(&self, owner: &Address, asset: &Address, amount: u64) -> Result<(), StoreError> {
        let mut balances = self.balances.write();
        let have = balances.get(&(*owner, *asset)).copied().unwrap_or(0);
        let updated = have.checked_add(amount).ok_or(StoreError::Overflow)?;
        balances.insert((*owner, *asset), updated);
        Ok(())
    }

    /// Stage every leg under one write guard, then write them all
    ///
    /// Nothing is written unless every leg succeeds, so no rollback is needed
    /// and no other writer observes a partial settlement.
    fn settle(&self, owner: &Address, legs: &[Leg]) -> Result<(), StoreError> {
        let mut balances = self.balances.write();
        let mut staged: HashMap<Address, u64> = HashMap::new();

        for leg in legs.iter().filter(|l| l.amount() > 0) {
            let asset = leg.asset();
            let have = staged
                .get(&asset)
                .copied()
                .or_else(|| balances.get(&(*owner, asset)).copied())
                .unwrap_or(0);
            let updated = match *leg {
                Leg::Debit { amount, .. } => have
                    .checked_sub(amount)
                    .ok_or(StoreError::InsufficientFunds { have, need: amount })?,
                Leg::Credit { amount, .. } => {
                    have.checked_add(amount).ok_or(StoreError::Overflow)?
                }
            };
            staged.insert(asset, updated);
        }

        for (asset, amount) in staged {
            if amount == 0 {
                balances.remove(&(*owner, asset));
            } else {
                balances.insert((*owner, asset), amount);
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn addr(label: &str) -> Address {
        Address::from_label(label)
    }

    #[test]
    fn test_debit_and_credit() {
        let store = InMemoryAccountStore::new();
        store.fund(&addr("alice"), &addr("x"), 100).unwrap();

        store.debit(&addr("alice"), &addr("x"), 40).unwrap();
        assert_eq!(store.balance(&addr("alice"), &addr("x")), 60);

        store.credit(&addr("alice"), &addr("x"), 5).unwrap();
        assert_eq!(store.balance(&addr("alice"), &addr("x")), 65);
    }

    #[test]
    fn test_debit_insufficient() {
        let store = InMemoryAccountStore::new();
        store.fund(&addr("alice"), &addr("x"), 10).unwrap();
        assert_eq!(
            store.debit(&addr("alice"), &addr("x"), 11),
            Err(StoreError::InsufficientFunds { have: 10, need: 11 })
        );
        assert_eq!(store.balance(&addr("alice"), &addr("x")), 10);
    }

    #[test]
    fn test_settle_rolls_back_first_leg() {
        let store = InMemoryAccountStore::new();
        store.fund(&addr("alice"), &addr("x"), 100).unwrap();
        store.fund(&addr("alice"), &addr("y"), 5).unwrap();

        let legs = [
            Leg::Debit { asset: addr("x"), amount: 50 },
            Leg::Debit { asset: addr("y"), amount: 50 },
        ];
        let result = store.settle(&addr("alice"), &legs);

        assert_eq!(result, Err(StoreError::InsufficientFunds { have: 5, need: 50 }));
        assert_eq!(store.balance(&addr("alice"), &addr("x")), 100);
        assert_eq!(store.balance(&addr("alice"), &addr("y")), 5);
    }

    #[test]
    fn test_settle_rolls_back_debit_when_credit_overflows() {
        let store = InMemoryAccountStore::new();
        store.fund(&addr("alice"), &addr("x"), 100).unwrap();
        store.fund(&addr("alice"), &addr("y"), u64::MAX).unwrap();

        let legs = [
            Leg::Debit { asset: addr("x"), amount: 10 },
            Leg::Credit { asset: addr("y"), amount: 1 },
        ];
        assert_eq!(store.settle(&addr("alice"), &legs), Err(StoreError::Overflow));
        assert_eq!(store.balance(&addr("alice"), &addr("x")), 100);
    }

    #[test]
    fn test_settle_same_asset_legs_net_out() {
        let store = InMemoryAccountStore::new();
        store.fund(&addr("alice"), &addr("x"), 10).unwrap();

        let legs = [
            Leg::Credit { asset: addr("x"), amount: 5 },
            Leg::Debit { asset: addr("x"), amount: 15 },
        ];
        store.settle(&addr("alice"), &legs).unwrap();

        assert_eq!(store.balance(&addr("alice"), &addr("x")), 0);
        assert!(store.entries().is_empty());
    }

    /// Store using the trait's leg-by-leg settlement; can refuse credits
    struct LegByLegStore {
        inner: InMemoryAccountStore,
        refuse_credits: bool,
    }

    impl AccountStore for LegByLegStore {
        fn balance(&self, owner: &Address, asset: &Address) -> u64 {
            self.inner.balance(owner, asset)
        }

        fn debit(&self, owner: &Address, asset: &Address, amount: u64) -> Result<(), StoreError> {
            self.inner.debit(owner, asset, amount)
        }

        fn credit(&self, owner: &Address, asset: &Address, amount: u64) -> Result<(), StoreError> {
            if self.refuse_credits {
                return Err(StoreError::Overflow);
            }
            self.inner.credit(owner, asset, amount)
        }
    }

    #[test]
    fn test_default_settle_undoes_applied_legs() {
        let store = LegByLegStore { inner: InMemoryAccountStore::new(), refuse_credits: false };
        store.inner.fund(&addr("alice"), &addr("x"), 100).unwrap();
        store.inner.fund(&addr("alice"), &addr("y"), 5).unwrap();

        let legs = [
            Leg::Debit { asset: addr("x"), amount: 50 },
            Leg::Debit { asset: addr("y"), amount: 50 },
        ];

        assert_eq!(
            store.settle(&addr("alice"), &legs),
            Err(StoreError::InsufficientFunds { have: 5, need: 50 })
        );
        assert_eq!(store.balance(&addr("alice"), &addr("x")), 100);
    }

    #[test]
    fn test_default_settle_reports_failed_rollback() {
        let store = LegByLegStore { inner: InMemoryAccountStore::new(), refuse_credits: true };
        store.inner.fund(&addr("alice"), &addr("x"), 100).unwrap();

        // The second debit fails and the undo credit of the first is refused
        let legs = [
            Leg::Debit { asset: addr("x"), amount: 50 },
            Leg::Debit { asset: addr("y"), amount: 1 },
        ];

        assert_eq!(store.settle(&addr("alice"), &legs), Err(StoreError::RollbackFailed));
    }

    #[test]
    fn test_entries_round_trip() {
        let store = InMemoryAccountStore::new();
        store.fund(&addr("alice"), &addr("x"), 7).unwrap();
        store.fund(&addr("bob"), &addr("y"), 9).unwrap();

        let restored = InMemoryAccountStore::from_entries(&store.entries()).unwrap();
        assert_eq!(restored.entries(), store.entries());
    }
}
