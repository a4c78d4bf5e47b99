//! Constant product pool math (x·y=k)

use crate::{MathError, BPS_SCALE, MAX_FEE_BPS};

/// Amounts of both pool assets (A, B)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PairAmounts {
    pub a: u64,
    pub b: u64,
}

/// Swap quote with post-trade reserves
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SwapQuote {
    /// Gross input supplied by the trader
    pub amount_in: u64,

    /// Input that participates in pricing after the fee is removed
    pub amount_in_after_fee: u64,

    /// Fee retained by the pool (amount_in - amount_in_after_fee)
    pub fee: u64,

    /// Output paid to the trader
    pub amount_out: u64,

    /// Input reserve after settlement (includes the fee)
    pub new_reserve_in: u64,

    /// Output reserve after settlement
    pub new_reserve_out: u64,
}

/// Pool invariant k = x·y
#[inline]
pub fn constant_product(reserve_a: u64, reserve_b: u64) -> u128 {
    (reserve_a as u128) * (reserve_b as u128)
}

#[inline]
fn div_ceil(numerator: u128, denominator: u128) -> u128 {
    let q = numerator / denominator;
    if numerator % denominator == 0 {
        q
    } else {
        q + 1
    }
}

#[inline]
fn to_u64(value: u128) -> Result<u64, MathError> {
    u64::try_from(value).map_err(|_| MathError::Overflow)
}

/// Calculate the asset amounts required to mint `desired_shares`
///
/// - Bootstrap (`total_shares == 0`): the caller's maximums become the
///   initial reserves and `desired_shares` is minted as given.
/// - Otherwise: `need = ceil(desired_shares * reserve / total_shares)` for
///   each side, preserving the current ratio.
///
/// # Arguments
/// * `reserve_a` / `reserve_b` - Current vault balances
/// * `total_shares` - Current share supply
/// * `desired_shares` - Shares the caller wants minted (must be > 0)
/// * `max_a` / `max_b` - Caller maximums (used directly on bootstrap)
///
/// # Returns
/// * `PairAmounts` the caller must supply
/// * `MathError` if invalid inputs or the result does not fit `u64`
pub fn quote_deposit(
    reserve_a: u64,
    reserve_b: u64,
    total_shares: u64,
    desired_shares: u64,
    max_a: u64,
    max_b: u64,
) -> Result<PairAmounts, MathError> {
    if desired_shares == 0 {
        return Err(MathError::InvalidAmount);
    }

    if total_shares == 0 {
        // Empty pool: no ratio to preserve
        if max_a == 0 || max_b == 0 {
            return Err(MathError::InvalidAmount);
        }
        return Ok(PairAmounts { a: max_a, b: max_b });
    }

    if reserve_a == 0 || reserve_b == 0 {
        return Err(MathError::InvalidReserves);
    }

    let shares = desired_shares as u128;
    let supply = total_shares as u128;

    // Round up: the pool is never under-collateralised by a deposit
    let need_a = div_ceil(shares * reserve_a as u128, supply);
    let need_b = div_ceil(shares * reserve_b as u128, supply);

    Ok(PairAmounts {
        a: to_u64(need_a)?,
        b: to_u64(need_b)?,
    })
}

/// Calculate the asset amounts released by burning `burn_shares`
///
/// `out = floor(burn_shares * reserve / total_shares)` for each side.
///
/// # Returns
/// * `PairAmounts` paid to the caller
/// * `MathError::InvalidReserves` if the pool has no shares outstanding
/// * `MathError::InvalidAmount` if `burn_shares` is zero or exceeds supply
pub fn quote_withdraw(
    reserve_a: u64,
    reserve_b: u64,
    total_shares: u64,
    burn_shares: u64,
) -> Result<PairAmounts, MathError> {
    if total_shares == 0 {
        return Err(MathError::InvalidReserves);
    }
    if burn_shares == 0 || burn_shares > total_shares {
        return Err(MathError::InvalidAmount);
    }

    let shares = burn_shares as u128;
    let supply = total_shares as u128;

    // Round down: the pool never pays out more than the burned claim
    let out_a = (shares * reserve_a as u128) / supply;
    let out_b = (shares * reserve_b as u128) / supply;

    Ok(PairAmounts {
        a: to_u64(out_a)?,
        b: to_u64(out_b)?,
    })
}

/// Calculate the output of selling `amount_in` into the pool
///
/// With fee on input:
/// - Δin_net = Δin * (BPS_SCALE - fee_bps) / BPS_SCALE (truncating)
/// - k = in0·out0
/// - out1 = ceil(k / (in0 + Δin_net))
/// - Δout = out0 - out1
///
/// The retained output reserve is rounded up so that
/// `(in0 + Δin)·out1 >= k` for every fee rate, including zero.
///
/// # Arguments
/// * `reserve_in` - Current reserve of the asset being sold
/// * `reserve_out` - Current reserve of the asset being bought
/// * `amount_in` - Gross input amount (must be > 0)
/// * `fee_bps` - Fee in basis points (0..=10_000)
///
/// # Returns
/// * `SwapQuote` with output amount and new reserves
/// * `MathError` if invalid inputs or the new input reserve overflows
pub fn quote_swap(
    reserve_in: u64,
    reserve_out: u64,
    amount_in: u64,
    fee_bps: u16,
) -> Result<SwapQuote, MathError> {
    // Validate inputs
    if reserve_in == 0 || reserve_out == 0 {
        return Err(MathError::InvalidReserves);
    }
    if amount_in == 0 {
        return Err(MathError::InvalidAmount);
    }
    if fee_bps > MAX_FEE_BPS {
        return Err(MathError::InvalidFee);
    }

    let x0 = reserve_in as u128;
    let y0 = reserve_out as u128;
    let dx = amount_in as u128;

    let fee_multiplier = (BPS_SCALE - fee_bps as u64) as u128;
    let dx_net = (dx * fee_multiplier) / BPS_SCALE as u128;

    let k = constant_product(reserve_in, reserve_out);
    let x1 = x0 + dx_net;
    let y1 = div_ceil(k, x1);

    // y1 <= y0 because x1 >= x0
    let dy_out = y0 - y1;

    let new_reserve_in = reserve_in
        .checked_add(amount_in)
        .ok_or(MathError::Overflow)?;

    let amount_in_after_fee = to_u64(dx_net)?;
    Ok(SwapQuote {
        amount_in,
        amount_in_after_fee,
        fee: amount_in - amount_in_after_fee,
        amount_out: to_u64(dy_out)?,
        new_reserve_in,
        new_reserve_out: to_u64(y1)?,
    })
}
