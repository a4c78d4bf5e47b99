//! Trading operations

use anyhow::Result;
use colored::Colorize;
use pool_core::SwapDirection;

use crate::state::{parse_identity, Session};

pub fn swap(
    session: &Session,
    seed: u64,
    user: String,
    direction: SwapDirection,
    amount_in: u64,
    min_out: u64,
) -> Result<()> {
    println!("{}", "=== Swap ===".bright_green().bold());

    let user = parse_identity(&user);
    let quote = session
        .registry
        .swap(seed, &user, direction, amount_in, min_out)?;

    println!("{} {}", "Pool:".bright_cyan(), seed);
    println!("{} {:?}", "Direction:".bright_cyan(), direction);
    println!("{} {}", "Sold:".bright_cyan(), quote.amount_in);
    println!("{} {}", "Fee:".bright_cyan(), quote.fee);
    println!("{} {}", "Bought:".bright_cyan(), quote.amount_out.to_string().green());
    Ok(())
}
