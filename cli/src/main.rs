//! pairswap CLI - operate token pairs, liquidity pools and swaps
//!
//! Every invocation loads the exchange state from a JSON file, runs one
//! command against the registry and its pools, and writes the state back
//! if the command changed anything.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;
use pairswap_common::PoolEvent;
use std::path::Path;

mod config;
mod liquidity;
mod pools;
mod state;
mod tokens;
mod trading;

use config::{CliConfig, DEFAULT_STATE_PATH};
use state::Session;

#[derive(Parser)]
#[command(name = "pairswap")]
#[command(about = "pairswap - constant-product token pairs, liquidity and swaps", long_about = None)]
#[command(version)]
struct Cli {
    /// State file
    #[arg(short, long, default_value = DEFAULT_STATE_PATH)]
    state: String,

    /// TOML config with pool parameters, tokens and accounts (used by init)
    #[arg(short, long)]
    config: Option<String>,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create a fresh state file from the config
    Init {
        /// Overwrite an existing state file
        #[arg(long)]
        force: bool,
    },

    /// List tokens with decimals and supply
    Tokens,

    /// Mint test tokens to an account
    Faucet {
        token: String,
        account: String,
        /// Whole-unit amount, e.g. 12.5
        amount: String,
    },

    /// Set the allowance an owner grants a spender (account or pool)
    Approve {
        token: String,
        owner: String,
        spender: String,
        /// Whole-unit amount, or `max` for unlimited
        amount: String,
    },

    /// Show an account's token balance
    Balance { token: String, account: String },

    /// Create the pool for a token pair
    CreatePair { token_a: String, token_b: String },

    /// List pools with reserves and shares
    Pools,

    /// Show pool details and liquidity positions
    Pool {
        /// Pool address or pair such as TKA/TKB
        pool: String,

        /// Only show this account's shares
        #[arg(long)]
        account: Option<String>,
    },

    /// Deposit both tokens and mint shares
    Provide {
        pool: String,
        account: String,
        amount0: String,
        amount1: String,

        /// Approve the pool for the offered amounts first
        #[arg(long)]
        approve: bool,
    },

    /// Burn shares for the pro-rata reserves
    Withdraw {
        pool: String,
        account: String,
        /// Shares to burn; all of the account's shares when omitted
        shares: Option<String>,
    },

    /// Estimate a swap without executing it
    Quote {
        pool: String,
        token_in: String,
        amount: String,
    },

    /// Amount of the other token matching a deposit at the current ratio
    Equivalent {
        pool: String,
        token_in: String,
        amount: String,
    },

    /// Sell one token of a pool for the other
    Swap {
        pool: String,
        account: String,
        token_in: String,
        amount: String,

        /// Fail unless at least this much is received
        #[arg(long)]
        min_out: Option<String>,

        /// Approve the pool for the input amount first
        #[arg(long)]
        approve: bool,
    },
}

impl Commands {
    fn mutates(&self) -> bool {
        !matches!(
            self,
            Commands::Tokens
                | Commands::Balance { .. }
                | Commands::Pools
                | Commands::Pool { .. }
                | Commands::Quote { .. }
                | Commands::Equivalent { .. }
        )
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut logger = env_logger::Builder::from_default_env();
    if cli.verbose {
        logger.filter_level(log::LevelFilter::Debug);
    }
    logger.init();

    let state_path = state::state_path(&cli.state)?;

    if cli.verbose {
        println!("{} {}", "State:".bright_cyan(), state_path.display());
        if let Some(config) = &cli.config {
            println!("{} {}", "Config:".bright_cyan(), config);
        }
    }

    match cli.command {
        Commands::Init { force } => init(&state_path, cli.config.as_deref(), force),
        command => run(command, &state_path, cli.verbose),
    }
}

fn init(state_path: &Path, config: Option<&str>, force: bool) -> Result<()> {
    if state_path.exists() && !force {
        anyhow::bail!(
            "State file already exists: {} (use --force to overwrite)",
            state_path.display()
        );
    }
    let config = CliConfig::load(config)?;
    let session = Session::init(&config).context("Failed to initialize state")?;
    session.save(state_path)?;

    println!("{}", "=== Initialized ===".bright_green().bold());
    println!("{} {}", "State:".bright_cyan(), state_path.display());
    println!("{} {}", "Tokens:".bright_cyan(), session.bank.tokens().len());
    println!("{} {}", "Accounts:".bright_cyan(), session.accounts.len());
    Ok(())
}

fn run(command: Commands, state_path: &Path, verbose: bool) -> Result<()> {
    let session = Session::load(state_path)?;
    let mutates = command.mutates();

    match command {
        Commands::Init { .. } => anyhow::bail!("init does not run against an existing state"),
        Commands::Tokens => tokens::list_tokens(&session)?,
        Commands::Faucet { token, account, amount } => {
            tokens::faucet(&session, &token, &account, &amount)?;
        }
        Commands::Approve { token, owner, spender, amount } => {
            tokens::approve(&session, &token, &owner, &spender, &amount)?;
        }
        Commands::Balance { token, account } => tokens::balance(&session, &token, &account)?,
        Commands::CreatePair { token_a, token_b } => pools::create_pair(&session, &token_a, &token_b)?,
        Commands::Pools => pools::list_pools(&session)?,
        Commands::Pool { pool, account } => pools::show_pool(&session, &pool, account.as_deref())?,
        Commands::Provide { pool, account, amount0, amount1, approve } => {
            liquidity::provide(&session, &pool, &account, &amount0, &amount1, approve)?;
        }
        Commands::Withdraw { pool, account, shares } => {
            liquidity::withdraw(&session, &pool, &account, shares.as_deref())?;
        }
        Commands::Quote { pool, token_in, amount } => trading::quote(&session, &pool, &token_in, &amount)?,
        Commands::Equivalent { pool, token_in, amount } => {
            liquidity::equivalent(&session, &pool, &token_in, &amount)?;
        }
        Commands::Swap { pool, account, token_in, amount, min_out, approve } => {
            trading::swap(&session, &pool, &account, &token_in, &amount, min_out.as_deref(), approve)?;
        }
    }

    if mutates {
        print_events(&session, verbose);
        session.save(state_path)?;
    }
    Ok(())
}

fn print_events(session: &Session, verbose: bool) {
    for event in session.drain_events() {
        if verbose {
            println!("{} {:?}", "Event:".dimmed(), event);
            continue;
        }
        let summary = match &event {
            PoolEvent::PairCreated { pool, .. } => format!("pool {}", session.label(*pool)),
            PoolEvent::Provide { provider, shares, .. } | PoolEvent::Withdraw { provider, shares, .. } => {
                format!("{} shares by {}", shares, session.label(*provider))
            }
            PoolEvent::Swap { trader, amount_in, amount_out, .. } => {
                format!("{} in, {} out by {}", amount_in, amount_out, session.label(*trader))
            }
        };
        println!("{} {} {}", "Event:".dimmed(), event.name().dimmed(), summary.dimmed());
    }
}
