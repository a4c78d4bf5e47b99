//! Pool lifecycle commands

use amm_math::quote_swap;
use anyhow::{bail, Result};
use colored::Colorize;
use pool_core::{InitializeParams, SwapDirection};

use crate::state::{parse_identity, Session};

pub fn initialize_pool(
    session: &Session,
    seed: u64,
    fee_bps: u16,
    authority: String,
    asset_a: String,
    asset_b: String,
) -> Result<()> {
    println!("{}", "=== Initialize Pool ===".bright_green().bold());

    let config = session.registry.initialize(InitializeParams {
        seed,
        fee_bps,
        authority: parse_identity(&authority),
        asset_a: parse_identity(&asset_a),
        asset_b: parse_identity(&asset_b),
    })?;

    println!("{} {}", "Seed:".bright_cyan(), config.seed);
    println!("{} {}", "Pool:".bright_cyan(), config.address);
    println!("{} {}", "Share mint:".bright_cyan(), config.share_mint);
    println!("{} {}", "Vault A:".bright_cyan(), config.vault_a);
    println!("{} {}", "Vault B:".bright_cyan(), config.vault_b);
    println!("{} {} bps", "Fee:".bright_cyan(), config.fee_bps);
    Ok(())
}

pub fn set_locked(session: &Session, seed: u64, authority: String, locked: bool) -> Result<()> {
    let title = if locked { "=== Lock Pool ===" } else { "=== Unlock Pool ===" };
    println!("{}", title.bright_green().bold());

    session
        .registry
        .set_locked(seed, &parse_identity(&authority), locked)?;

    let status = if locked { "locked".yellow() } else { "open".green() };
    println!("{} {}", "Pool:".bright_cyan(), seed);
    println!("{} {}", "Status:".bright_cyan(), status);
    Ok(())
}

pub fn show_pools(session: &Session, seed: Option<u64>) -> Result<()> {
    println!("{}", "=== Pools ===".bright_green().bold());

    let seeds = match seed {
        Some(seed) => vec![seed],
        None => session.registry.seeds(),
    };
    if seeds.is_empty() {
        println!("{}", "No pools initialized".dimmed());
        return Ok(());
    }

    for seed in seeds {
        let snapshot = session.registry.snapshot(seed)?;
        let config = snapshot.config;
        let status = if config.locked { "locked".yellow() } else { "open".green() };

        println!();
        println!("{} {} ({})", "Pool".bright_cyan().bold(), seed, status);
        println!("  {} {}", "Address:".bright_cyan(), config.address);
        println!("  {} {}", "Authority:".bright_cyan(), config.authority);
        println!("  {} {} bps", "Fee:".bright_cyan(), config.fee_bps);
        println!("  {} {} ({})", "Reserve A:".bright_cyan(), snapshot.reserve_a, config.asset_a);
        println!("  {} {} ({})", "Reserve B:".bright_cyan(), snapshot.reserve_b, config.asset_b);
        println!("  {} {}", "Shares:".bright_cyan(), snapshot.total_shares);
        println!("  {} {}", "k:".bright_cyan(), snapshot.invariant());
    }
    Ok(())
}

/// Price a swap against the current reserves without executing it
pub fn quote(session: &Session, seed: u64, direction: SwapDirection, amount_in: u64) -> Result<()> {
    println!("{}", "=== Swap Quote ===".bright_green().bold());

    let snapshot = session.registry.snapshot(seed)?;
    let (reserve_in, reserve_out) = match direction {
        SwapDirection::AToB => (snapshot.reserve_a, snapshot.reserve_b),
        SwapDirection::BToA => (snapshot.reserve_b, snapshot.reserve_a),
    };
    if reserve_in == 0 || reserve_out == 0 {
        bail!("Pool {} has no liquidity", seed);
    }

    let q = quote_swap(reserve_in, reserve_out, amount_in, snapshot.config.fee_bps)
        .map_err(pool_core::PoolError::from)?;

    println!("{} {:?}", "Direction:".bright_cyan(), direction);
    println!("{} {}", "Amount in:".bright_cyan(), q.amount_in);
    println!("{} {}", "Fee:".bright_cyan(), q.fee);
    println!("{} {}", "Amount out:".bright_cyan(), q.amount_out);
    if q.amount_out == 0 {
        println!("\n{}", "Input too small to buy anything".yellow());
    }
    Ok(())
}
