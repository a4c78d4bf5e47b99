//! Swap instruction - constant product exchange with fee on input

use amm_math::{quote_swap, SwapQuote};
use log::{debug, info};

use super::ensure_unlocked;
use crate::address::Address;
use crate::error::{PoolError, PoolResult};
use crate::state::{Pool, SwapDirection};
use crate::store::{AccountStore, Leg};

/// Process swap instruction
///
/// Sells `amount_in` of the input asset into the pool and pays out the
/// quoted output. The fee stays in the input vault, so k never decreases.
///
/// # Arguments
/// * `pool` - Pool state (exclusively held by the caller)
/// * `store` - Holder balances
/// * `user` - Trader
/// * `direction` - A→B or B→A
/// * `amount_in` - Gross input (must be > 0)
/// * `min_out` - Least output the trader accepts
///
/// # Returns
/// * The settled quote
///
/// # Errors
/// * PoolLocked, InvalidAmount, NoLiquidity, SlippageExceeded,
///   InsufficientReserves, InsufficientFunds, ArithmeticOverflow
pub fn process_swap(
    pool: &mut Pool,
    store: &dyn AccountStore,
    user: &Address,
    direction: SwapDirection,
    amount_in: u64,
    min_out: u64,
) -> PoolResult<SwapQuote> {
    ensure_unlocked(pool)?;
    if amount_in == 0 {
        return Err(PoolError::InvalidAmount);
    }

    let (vault_in, vault_out) = pool.vaults_for(direction);
    if vault_in.balance == 0 || vault_out.balance == 0 {
        return Err(PoolError::NoLiquidity);
    }

    let quote = quote_swap(
        vault_in.balance,
        vault_out.balance,
        amount_in,
        pool.config.fee_bps,
    )?;
    debug!(
        "Swap quote for pool {} ({:?}): in={} fee={} out={}",
        pool.config.seed, direction, amount_in, quote.fee, quote.amount_out
    );

    if quote.amount_out < min_out {
        return Err(PoolError::SlippageExceeded { limit: min_out, quoted: quote.amount_out });
    }
    if quote.amount_out == 0 {
        return Err(PoolError::InvalidAmount);
    }
    if quote.amount_out >= vault_out.balance {
        return Err(PoolError::InsufficientReserves);
    }

    let asset_in = vault_in.asset;
    let asset_out = vault_out.asset;

    store.settle(
        user,
        &[
            Leg::Debit { asset: asset_in, amount: amount_in },
            Leg::Credit { asset: asset_out, amount: quote.amount_out },
        ],
    )?;

    pool.set_swap_reserves(direction, quote.new_reserve_in, quote.new_reserve_out);

    info!(
        "Swap in pool {} ({:?}): {} in, {} out",
        pool.config.seed, direction, amount_in, quote.amount_out
    );

    Ok(quote)
}
