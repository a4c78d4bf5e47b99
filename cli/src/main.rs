//! AMM CLI - local driver for constant product pools
//!
//! Every invocation loads the engine state from a JSON file, runs one
//! command against it and writes the state back if anything changed.
//! Identities (users, authorities, assets) are base58 addresses or labels;
//! a label is hashed into an address so `alice` always names the same holder.

use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use pool_core::SwapDirection;
use std::path::PathBuf;

mod account;
mod config;
mod liquidity;
mod pool;
mod state;
mod trading;

use config::CliConfig;
use state::Session;

#[derive(Parser)]
#[command(name = "amm")]
#[command(about = "Constant product AMM - initialize pools, provide liquidity and swap", long_about = None)]
#[command(version)]
struct Cli {
    /// Config file (defaults to $AMM_CONFIG, then ~/.config/amm/config.toml)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// State file (overrides the config file)
    #[arg(short, long)]
    state: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, ValueEnum)]
enum Direction {
    /// Sell asset A for asset B
    AToB,
    /// Sell asset B for asset A
    BToA,
}

impl From<Direction> for SwapDirection {
    fn from(direction: Direction) -> Self {
        match direction {
            Direction::AToB => SwapDirection::AToB,
            Direction::BToA => SwapDirection::BToA,
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Create a new pool for an asset pair
    Init {
        /// Pool seed (unique per pool)
        seed: u64,

        /// Asset A identity
        asset_a: String,

        /// Asset B identity
        asset_b: String,

        /// Authority allowed to lock and unlock the pool
        #[arg(long)]
        authority: String,

        /// Swap fee in basis points (defaults to the config value)
        #[arg(long)]
        fee_bps: Option<u16>,
    },

    /// Credit an asset balance to a holder (local testing only)
    Fund {
        /// Holder identity
        owner: String,

        /// Asset identity
        asset: String,

        /// Amount to credit
        amount: u64,
    },

    /// Deposit both assets and mint pool shares
    Deposit {
        /// Pool seed
        seed: u64,

        /// Depositor identity
        user: String,

        /// Shares to mint
        shares: u64,

        /// Most of asset A the depositor will pay
        #[arg(long)]
        max_a: u64,

        /// Most of asset B the depositor will pay
        #[arg(long)]
        max_b: u64,
    },

    /// Burn pool shares and withdraw both assets
    Withdraw {
        /// Pool seed
        seed: u64,

        /// Holder identity
        user: String,

        /// Shares to burn
        shares: u64,

        /// Least of asset A accepted
        #[arg(long, default_value = "0")]
        min_a: u64,

        /// Least of asset B accepted
        #[arg(long, default_value = "0")]
        min_b: u64,
    },

    /// Swap one asset for the other
    Swap {
        /// Pool seed
        seed: u64,

        /// Trader identity
        user: String,

        /// Which asset is sold
        #[arg(value_enum)]
        direction: Direction,

        /// Amount sold
        amount_in: u64,

        /// Least output accepted
        #[arg(long, default_value = "0")]
        min_out: u64,
    },

    /// Reject deposits, withdrawals and swaps (authority only)
    Lock {
        seed: u64,

        #[arg(long)]
        authority: String,
    },

    /// Accept operations again (authority only)
    Unlock {
        seed: u64,

        #[arg(long)]
        authority: String,
    },

    /// Show pool configuration and reserves
    Show {
        /// Pool seed (all pools if omitted)
        seed: Option<u64>,
    },

    /// Show a holder's asset and share balances
    Balance {
        /// Holder identity
        owner: String,
    },

    /// Price a swap without executing it
    Quote {
        seed: u64,

        #[arg(value_enum)]
        direction: Direction,

        amount_in: u64,
    },
}

impl Commands {
    fn mutates(&self) -> bool {
        !matches!(
            self,
            Commands::Show { .. } | Commands::Balance { .. } | Commands::Quote { .. }
        )
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let level = if cli.verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();

    let config = CliConfig::load(cli.config.as_deref())?;
    let state_path = match cli.state.clone() {
        Some(path) => path,
        None => config.state_path()?,
    };

    if cli.verbose {
        println!("{} {}", "State:".bright_cyan(), state_path.display());
        println!("{} {}", "Program:".bright_cyan(), config.engine.program_address());
        println!("{} {} ms", "Lock timeout:".bright_cyan(), config.engine.lock_timeout_ms);
    }

    let session = Session::open(&state_path, config.engine.clone())?;
    let mutates = cli.command.mutates();

    // Execute command
    match cli.command {
        Commands::Init { seed, asset_a, asset_b, authority, fee_bps } => {
            let fee_bps = fee_bps.unwrap_or(config.default_fee_bps);
            pool::initialize_pool(&session, seed, fee_bps, authority, asset_a, asset_b)?;
        }
        Commands::Fund { owner, asset, amount } => {
            account::fund(&session, owner, asset, amount)?;
        }
        Commands::Deposit { seed, user, shares, max_a, max_b } => {
            liquidity::deposit(&session, seed, user, shares, max_a, max_b)?;
        }
        Commands::Withdraw { seed, user, shares, min_a, min_b } => {
            liquidity::withdraw(&session, seed, user, shares, min_a, min_b)?;
        }
        Commands::Swap { seed, user, direction, amount_in, min_out } => {
            trading::swap(&session, seed, user, direction.into(), amount_in, min_out)?;
        }
        Commands::Lock { seed, authority } => {
            pool::set_locked(&session, seed, authority, true)?;
        }
        Commands::Unlock { seed, authority } => {
            pool::set_locked(&session, seed, authority, false)?;
        }
        Commands::Show { seed } => {
            pool::show_pools(&session, seed)?;
        }
        Commands::Balance { owner } => {
            account::show_balance(&session, owner)?;
        }
        Commands::Quote { seed, direction, amount_in } => {
            pool::quote(&session, seed, direction.into(), amount_in)?;
        }
    }

    if mutates {
        session.save()?;
    }

    Ok(())
}
