//! AMM Math - Pure constant product pool arithmetic (x·y=k)
//!
//! This crate holds every quantity the pool engine moves: deposit quotes,
//! withdrawal quotes and swap quotes. All functions are total, side-effect
//! free and computed in `u128` so that `reserve × amount` never overflows.
//!
//! Rounding always favours the pool:
//! - amounts a caller must supply round **up**
//! - amounts a caller receives round **down**

#![cfg_attr(not(test), no_std)]
#![forbid(unsafe_code)]

pub mod math;

pub use math::{
    constant_product, quote_deposit, quote_swap, quote_withdraw, PairAmounts, SwapQuote,
};

/// Basis points scale (10,000 bps = 100%)
pub const BPS_SCALE: u64 = 10_000;

/// Highest accepted fee rate (100%)
pub const MAX_FEE_BPS: u16 = 10_000;

/// Error types for pool math
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MathError {
    /// Reserves or share supply are zero where a ratio is required
    InvalidReserves,
    /// Invalid amount (zero, or larger than the supply it is drawn from)
    InvalidAmount,
    /// Fee rate above `MAX_FEE_BPS`
    InvalidFee,
    /// Arithmetic overflow
    Overflow,
}
