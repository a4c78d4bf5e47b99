//! Initialize instruction - create a pool configuration, vaults and share mint

use amm_math::MAX_FEE_BPS;
use log::info;

use crate::address::{Address, AddressDeriver};
use crate::error::{PoolError, PoolResult};
use crate::state::{DerivationBumps, Pool, PoolConfig, CONFIG_SEED, SHARE_MINT_SEED, VAULT_SEED};

/// Arguments of the initialize instruction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InitializeParams {
    pub seed: u64,
    pub fee_bps: u16,
    pub authority: Address,
    pub asset_a: Address,
    pub asset_b: Address,
}

/// Process initialize instruction
///
/// Builds a new, unlocked pool with empty vaults and zero share supply. No
/// funds move. Uniqueness of `seed` is enforced by the registry before this
/// runs.
///
/// # Errors
/// * InvalidFee - `fee_bps` above 10_000
/// * IdenticalAssets - asset A equals asset B
/// * AddressDerivation - no usable bump for a pool address
pub fn process_initialize(
    deriver: &dyn AddressDeriver,
    params: &InitializeParams,
) -> PoolResult<Pool> {
    if params.fee_bps > MAX_FEE_BPS {
        return Err(PoolError::InvalidFee);
    }
    if params.asset_a == params.asset_b {
        return Err(PoolError::IdenticalAssets);
    }

    let seed = params.seed.to_le_bytes();
    let (address, config_bump) = deriver
        .find_address(&[CONFIG_SEED, &seed])
        .ok_or(PoolError::AddressDerivation)?;
    let (share_mint, share_mint_bump) = deriver
        .find_address(&[SHARE_MINT_SEED, address.as_bytes()])
        .ok_or(PoolError::AddressDerivation)?;
    let (vault_a, _) = deriver
        .find_address(&[VAULT_SEED, address.as_bytes(), params.asset_a.as_bytes()])
        .ok_or(PoolError::AddressDerivation)?;
    let (vault_b, _) = deriver
        .find_address(&[VAULT_SEED, address.as_bytes(), params.asset_b.as_bytes()])
        .ok_or(PoolError::AddressDerivation)?;

    let config = PoolConfig {
        seed: params.seed,
        address,
        asset_a: params.asset_a,
        asset_b: params.asset_b,
        fee_bps: params.fee_bps,
        authority: params.authority,
        locked: false,
        share_mint,
        vault_a,
        vault_b,
        bumps: DerivationBumps {
            config: config_bump,
            share_mint: share_mint_bump,
        },
    };

    info!(
        "Pool {} initialized at {} (fee {} bps)",
        params.seed, address, params.fee_bps
    );

    Ok(Pool::new(config))
}
