//! Constant product pool settlement engine
//!
//! A pool custodies two fungible assets, issues shares proportional to
//! ownership and executes x·y=k swaps with a fee on input. This crate holds
//! the state transitions only; holder balances and address derivation are
//! injected collaborators (`AccountStore`, `AddressDeriver`).
//!
//! Every operation either applies completely or leaves the pool and the
//! store exactly as they were.

#![forbid(unsafe_code)]

pub mod address;
pub mod config;
pub mod error;
pub mod instructions;
pub mod registry;
pub mod state;
pub mod store;

pub use address::{Address, AddressDeriver, AddressError, Sha256Deriver};
pub use amm_math::{PairAmounts, SwapQuote};
pub use config::EngineConfig;
pub use error::{PoolError, PoolResult};
pub use instructions::{InitializeParams, PoolInstruction};
pub use registry::PoolRegistry;
pub use state::{Pool, PoolConfig, PoolSnapshot, SwapDirection};
pub use store::{AccountStore, BalanceEntry, InMemoryAccountStore, StoreError};
