//! SetLocked instruction - authority halts or resumes a pool
//!
//! While locked, deposit, withdraw and swap are rejected. Reads are
//! unaffected.

use log::{info, warn};

use crate::address::Address;
use crate::error::{PoolError, PoolResult};
use crate::state::Pool;

/// Process set_locked instruction
///
/// # Errors
/// * Unauthorized - If caller is not the pool authority
pub fn process_set_locked(pool: &mut Pool, authority: &Address, locked: bool) -> PoolResult<()> {
    if &pool.config.authority != authority {
        warn!("Only the authority can lock pool {}", pool.config.seed);
        return Err(PoolError::Unauthorized);
    }

    pool.config.locked = locked;
    info!(
        "Pool {} {}",
        pool.config.seed,
        if locked { "locked" } else { "unlocked" }
    );

    Ok(())
}
