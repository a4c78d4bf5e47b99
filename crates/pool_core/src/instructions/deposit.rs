//! Deposit instruction - supply both assets, mint shares

use amm_math::{quote_deposit, PairAmounts};
use log::{debug, info};

use super::ensure_unlocked;
use crate::address::Address;
use crate::error::{PoolError, PoolResult};
use crate::state::Pool;
use crate::store::{AccountStore, Leg};

/// Process deposit instruction
///
/// Moves the quoted amounts of asset A and B from the user into the vaults
/// and mints `shares` to the user. On an empty pool the maximums are taken
/// as the initial reserves.
///
/// # Arguments
/// * `pool` - Pool state (exclusively held by the caller)
/// * `store` - Holder balances
/// * `user` - Depositor
/// * `shares` - Shares to mint (must be > 0)
/// * `max_a` / `max_b` - Most the user is willing to pay of each asset
///
/// # Returns
/// * The amounts actually deposited
///
/// # Errors
/// * PoolLocked, InvalidAmount, SlippageExceeded, InsufficientFunds,
///   ArithmeticOverflow
pub fn process_deposit(
    pool: &mut Pool,
    store: &dyn AccountStore,
    user: &Address,
    shares: u64,
    max_a: u64,
    max_b: u64,
) -> PoolResult<PairAmounts> {
    ensure_unlocked(pool)?;
    if shares == 0 {
        return Err(PoolError::InvalidAmount);
    }

    let need = quote_deposit(
        pool.vault_a.balance,
        pool.vault_b.balance,
        pool.shares.total_supply,
        shares,
        max_a,
        max_b,
    )?;
    debug!(
        "Deposit quote for pool {}: {} shares need a={} b={}",
        pool.config.seed, shares, need.a, need.b
    );

    if need.a > max_a {
        return Err(PoolError::SlippageExceeded { limit: max_a, quoted: need.a });
    }
    if need.b > max_b {
        return Err(PoolError::SlippageExceeded { limit: max_b, quoted: need.b });
    }

    // Compute every new value before moving funds
    let reserve_a = pool.vault_a.after_deposit(need.a)?;
    let reserve_b = pool.vault_b.after_deposit(need.b)?;
    let minted = pool.shares.preview_mint(user, shares)?;

    store.settle(
        user,
        &[
            Leg::Debit { asset: pool.config.asset_a, amount: need.a },
            Leg::Debit { asset: pool.config.asset_b, amount: need.b },
        ],
    )?;

    pool.vault_a.balance = reserve_a;
    pool.vault_b.balance = reserve_b;
    pool.shares.apply(user, minted);

    info!(
        "Deposit into pool {}: {} shares for a={} b={}",
        pool.config.seed, shares, need.a, need.b
    );

    Ok(need)
}
