//! Pool errors

use amm_math::MathError;
use thiserror::Error;

use crate::store::StoreError;

/// Error returned by every pool operation
///
/// All variants are detected before any state is mutated.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum PoolError {
    #[error("pool already initialized for seed {0}")]
    AlreadyInitialized(u64),

    #[error("no pool initialized for seed {0}")]
    PoolNotFound(u64),

    #[error("fee must be between 0 and 10000 bps")]
    InvalidFee,

    #[error("asset A and asset B must differ")]
    IdenticalAssets,

    #[error("pool is locked")]
    PoolLocked,

    #[error("caller is not the pool authority")]
    Unauthorized,

    #[error("invalid amount")]
    InvalidAmount,

    #[error("slippage exceeded: limit {limit}, quoted {quoted}")]
    SlippageExceeded { limit: u64, quoted: u64 },

    #[error("insufficient funds: have {have}, need {need}")]
    InsufficientFunds { have: u64, need: u64 },

    #[error("insufficient shares: have {have}, need {need}")]
    InsufficientShares { have: u64, need: u64 },

    #[error("insufficient reserves")]
    InsufficientReserves,

    #[error("pool has no liquidity")]
    NoLiquidity,

    #[error("arithmetic overflow")]
    ArithmeticOverflow,

    #[error("pool is busy, exclusive access timed out")]
    PoolBusy,

    #[error("could not derive a pool address")]
    AddressDerivation,

    #[error("invalid instruction data")]
    InvalidInstruction,

    #[error("settlement could not be undone, holder balances are inconsistent")]
    SettlementFailed,

    #[error("persisted state for pool {0} is corrupt")]
    CorruptState(u64),
}

/// Result type for pool operations
pub type PoolResult<T> = Result<T, PoolError>;

impl From<MathError> for PoolError {
    fn from(err: MathError) -> Self {
        match err {
            MathError::InvalidReserves => PoolError::NoLiquidity,
            MathError::InvalidAmount => PoolError::InvalidAmount,
            MathError::InvalidFee => PoolError::InvalidFee,
            MathError::Overflow => PoolError::ArithmeticOverflow,
        }
    }
}

impl From<StoreError> for PoolError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::InsufficientFunds { have, need } => {
                PoolError::InsufficientFunds { have, need }
            }
            StoreError::Overflow => PoolError::ArithmeticOverflow,
            StoreError::RollbackFailed => PoolError::SettlementFailed,
        }
    }
}
