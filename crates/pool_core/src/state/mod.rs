//! Pool state: configuration, custody vaults and share ledger

pub mod config;
pub mod pool;
pub mod shares;
pub mod vault;

pub use config::*;
pub use pool::*;
pub use shares::*;
pub use vault::*;
