//! Kani proofs for constant product pool math
//!
//! - **P1: Invariant Non-Decreasing** - a swap never lowers x·y
//! - **P2: Reserves Stay Positive** - a swap never empties the output reserve
//! - **P3: Fee Split** - fee + net input == gross input
//! - **P4: Deposit Rounds Up** - a deposit is never cheaper than its pro-rata value
//! - **P5: Withdraw Rounds Down** - a withdrawal never pays more than its pro-rata value
//! - **P6: Round Trip** - deposit then withdraw of the same shares never profits

use amm_math::{constant_product, quote_deposit, quote_swap, quote_withdraw, MAX_FEE_BPS};

const BOUND: u64 = 1 << 40;

/// P1: x·y after a swap is at least x·y before it, for every fee including zero
#[kani::proof]
#[kani::unwind(4)]
fn p1_invariant_non_decreasing() {
    let x0: u64 = kani::any();
    let y0: u64 = kani::any();
    let dx: u64 = kani::any();
    let fee_bps: u16 = kani::any();

    kani::assume(x0 > 0 && x0 < BOUND);
    kani::assume(y0 > 0 && y0 < BOUND);
    kani::assume(dx > 0 && dx < BOUND);
    kani::assume(fee_bps <= MAX_FEE_BPS);

    if let Ok(q) = quote_swap(x0, y0, dx, fee_bps) {
        assert!(
            constant_product(q.new_reserve_in, q.new_reserve_out) >= constant_product(x0, y0),
            "P1: swap must not lower the invariant"
        );
    }
}

/// P2: output is strictly less than the output reserve
#[kani::proof]
#[kani::unwind(4)]
fn p2_reserves_stay_positive() {
    let x0: u64 = kani::any();
    let y0: u64 = kani::any();
    let dx: u64 = kani::any();
    let fee_bps: u16 = kani::any();

    kani::assume(x0 > 0 && x0 < BOUND);
    kani::assume(y0 > 0 && y0 < BOUND);
    kani::assume(dx > 0 && dx < BOUND);
    kani::assume(fee_bps <= MAX_FEE_BPS);

    if let Ok(q) = quote_swap(x0, y0, dx, fee_bps) {
        assert!(q.amount_out < y0, "P2: swap must not drain the output reserve");
        assert!(q.new_reserve_out > 0);
        assert_eq!(q.new_reserve_out, y0 - q.amount_out);
        assert_eq!(q.new_reserve_in, x0 + dx);
    }
}

#[kani::proof]
#[kani::unwind(4)]
fn p3_fee_split() {
    let x0: u64 = kani::any();
    let y0: u64 = kani::any();
    let dx: u64 = kani::any();
    let fee_bps: u16 = kani::any();

    kani::assume(x0 > 0 && x0 < BOUND);
    kani::assume(y0 > 0 && y0 < BOUND);
    kani::assume(dx > 0 && dx < BOUND);
    kani::assume(fee_bps <= MAX_FEE_BPS);

    if let Ok(q) = quote_swap(x0, y0, dx, fee_bps) {
        assert_eq!(q.fee + q.amount_in_after_fee, dx, "P3: fee split must be exact");
        if fee_bps == 0 {
            assert_eq!(q.fee, 0);
        }
    }
}

/// P4: need * supply >= shares * reserve on both sides
#[kani::proof]
#[kani::unwind(4)]
fn p4_deposit_rounds_up() {
    let ra: u64 = kani::any();
    let rb: u64 = kani::any();
    let supply: u64 = kani::any();
    let shares: u64 = kani::any();

    kani::assume(ra > 0 && ra < BOUND);
    kani::assume(rb > 0 && rb < BOUND);
    kani::assume(supply > 0 && supply < BOUND);
    kani::assume(shares > 0 && shares < BOUND);

    if let Ok(need) = quote_deposit(ra, rb, supply, shares, u64::MAX, u64::MAX) {
        assert!(need.a as u128 * supply as u128 >= shares as u128 * ra as u128);
        assert!(need.b as u128 * supply as u128 >= shares as u128 * rb as u128);
    }
}

/// P5: out * supply <= shares * reserve, and burning everything pays out everything
#[kani::proof]
#[kani::unwind(4)]
fn p5_withdraw_rounds_down() {
    let ra: u64 = kani::any();
    let rb: u64 = kani::any();
    let supply: u64 = kani::any();
    let burn: u64 = kani::any();

    kani::assume(ra < BOUND && rb < BOUND);
    kani::assume(supply > 0 && supply < BOUND);
    kani::assume(burn > 0 && burn <= supply);

    if let Ok(out) = quote_withdraw(ra, rb, supply, burn) {
        assert!(out.a <= ra && out.b <= rb);
        assert!(out.a as u128 * supply as u128 <= burn as u128 * ra as u128);
        assert!(out.b as u128 * supply as u128 <= burn as u128 * rb as u128);
        if burn == supply {
            assert_eq!((out.a, out.b), (ra, rb));
        }
    }
}

#[kani::proof]
#[kani::unwind(4)]
fn p6_round_trip_never_profits() {
    let ra: u64 = kani::any();
    let rb: u64 = kani::any();
    let supply: u64 = kani::any();
    let shares: u64 = kani::any();

    kani::assume(ra > 0 && ra < BOUND);
    kani::assume(rb > 0 && rb < BOUND);
    kani::assume(supply > 0 && supply < BOUND);
    kani::assume(shares > 0 && shares < BOUND);

    let Ok(paid) = quote_deposit(ra, rb, supply, shares, u64::MAX, u64::MAX) else {
        return;
    };
    if let (Some(new_a), Some(new_b)) = (ra.checked_add(paid.a), rb.checked_add(paid.b)) {
        if let Ok(got) = quote_withdraw(new_a, new_b, supply + shares, shares) {
            assert!(got.a <= paid.a, "P6: round trip must not return more A");
            assert!(got.b <= paid.b, "P6: round trip must not return more B");
        }
    }
}
