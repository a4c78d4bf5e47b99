//! Withdraw instruction - burn shares, release proportional reserves

use amm_math::{quote_withdraw, PairAmounts};
use log::{debug, info};

use super::ensure_unlocked;
use crate::address::Address;
use crate::error::{PoolError, PoolResult};
use crate::state::Pool;
use crate::store::{AccountStore, Leg};

/// Process withdraw instruction
///
/// Burns `shares` from the user and pays out
/// `floor(shares * reserve / total_shares)` of each asset. The burn and both
/// payouts take effect together or not at all.
///
/// # Arguments
/// * `pool` - Pool state (exclusively held by the caller)
/// * `store` - Holder balances
/// * `user` - Share holder
/// * `shares` - Shares to burn (0 < shares <= user balance)
/// * `min_a` / `min_b` - Least the user accepts of each asset
///
/// # Returns
/// * The amounts paid out
///
/// # Errors
/// * PoolLocked, InvalidAmount, InsufficientShares, NoLiquidity,
///   SlippageExceeded, InsufficientReserves, ArithmeticOverflow
pub fn process_withdraw(
    pool: &mut Pool,
    store: &dyn AccountStore,
    user: &Address,
    shares: u64,
    min_a: u64,
    min_b: u64,
) -> PoolResult<PairAmounts> {
    ensure_unlocked(pool)?;
    if shares == 0 {
        return Err(PoolError::InvalidAmount);
    }

    let burned = pool.shares.preview_burn(user, shares)?;

    let out = quote_withdraw(
        pool.vault_a.balance,
        pool.vault_b.balance,
        pool.shares.total_supply,
        shares,
    )?;
    debug!(
        "Withdraw quote for pool {}: {} shares release a={} b={}",
        pool.config.seed, shares, out.a, out.b
    );

    if out.a < min_a {
        return Err(PoolError::SlippageExceeded { limit: min_a, quoted: out.a });
    }
    if out.b < min_b {
        return Err(PoolError::SlippageExceeded { limit: min_b, quoted: out.b });
    }

    let reserve_a = pool.vault_a.after_withdraw(out.a)?;
    let reserve_b = pool.vault_b.after_withdraw(out.b)?;

    store.settle(
        user,
        &[
            Leg::Credit { asset: pool.config.asset_a, amount: out.a },
            Leg::Credit { asset: pool.config.asset_b, amount: out.b },
        ],
    )?;

    pool.shares.apply(user, burned);
    pool.vault_a.balance = reserve_a;
    pool.vault_b.balance = reserve_b;

    info!(
        "Withdraw from pool {}: burned {} shares for a={} b={}",
        pool.config.seed, shares, out.a, out.b
    );

    Ok(out)
}
