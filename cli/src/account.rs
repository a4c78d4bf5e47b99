//! Holder balances

use anyhow::Result;
use colored::Colorize;

use crate::state::{parse_identity, Session};

/// Credit `amount` of `asset` to `owner` out of thin air (local testing only)
pub fn fund(session: &Session, owner: String, asset: String, amount: u64) -> Result<()> {
    println!("{}", "=== Fund ===".bright_green().bold());

    let owner = parse_identity(&owner);
    let asset = parse_identity(&asset);
    let balance = session.store.fund(&owner, &asset, amount)?;

    println!("{} {}", "Owner:".bright_cyan(), owner);
    println!("{} {}", "Asset:".bright_cyan(), asset);
    println!("{} {}", "Balance:".bright_cyan(), balance);
    Ok(())
}

pub fn show_balance(session: &Session, owner: String) -> Result<()> {
    println!("{}", "=== Balances ===".bright_green().bold());

    let owner = parse_identity(&owner);
    println!("{} {}", "Owner:".bright_cyan(), owner);

    let mut any = false;
    for entry in session.store.entries().iter().filter(|e| e.owner == owner) {
        println!("  {} {}", format!("{}:", entry.asset).bright_cyan(), entry.amount);
        any = true;
    }
    for seed in session.registry.seeds() {
        let shares = session.registry.share_balance(seed, &owner)?;
        if shares > 0 {
            println!("  {} {}", format!("pool {} shares:", seed).bright_cyan(), shares);
            any = true;
        }
    }
    if !any {
        println!("{}", "No balances".dimmed());
    }
    Ok(())
}
