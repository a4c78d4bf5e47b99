//! Liquidity provider operations

use anyhow::Result;
use colored::Colorize;

use crate::state::{parse_identity, Session};

pub fn deposit(
    session: &Session,
    seed: u64,
    user: String,
    shares: u64,
    max_a: u64,
    max_b: u64,
) -> Result<()> {
    println!("{}", "=== Deposit ===".bright_green().bold());

    let user = parse_identity(&user);
    let paid = session.registry.deposit(seed, &user, shares, max_a, max_b)?;

    println!("{} {}", "Pool:".bright_cyan(), seed);
    println!("{} {}", "User:".bright_cyan(), user);
    println!("{} {}", "Shares minted:".bright_cyan(), shares);
    println!("{} {}", "Paid A:".bright_cyan(), paid.a);
    println!("{} {}", "Paid B:".bright_cyan(), paid.b);
    println!(
        "{} {}",
        "Share balance:".bright_cyan(),
        session.registry.share_balance(seed, &user)?
    );
    Ok(())
}

pub fn withdraw(
    session: &Session,
    seed: u64,
    user: String,
    shares: u64,
    min_a: u64,
    min_b: u64,
) -> Result<()> {
    println!("{}", "=== Withdraw ===".bright_green().bold());

    let user = parse_identity(&user);
    let out = session.registry.withdraw(seed, &user, shares, min_a, min_b)?;

    println!("{} {}", "Pool:".bright_cyan(), seed);
    println!("{} {}", "User:".bright_cyan(), user);
    println!("{} {}", "Shares burned:".bright_cyan(), shares);
    println!("{} {}", "Received A:".bright_cyan(), out.a);
    println!("{} {}", "Received B:".bright_cyan(), out.b);
    Ok(())
}
