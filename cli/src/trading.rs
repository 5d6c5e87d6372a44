//! Swap quotes and execution

use anyhow::{Context, Result};
use colored::Colorize;
use pairswap_amm::{LiquidityPool, SwapDirection};
use pairswap_common::math::format_units;
use pairswap_common::Address;

use crate::state::Session;

fn output_token(pool: &LiquidityPool, direction: SwapDirection) -> Address {
    match direction {
        SwapDirection::Token0ForToken1 => pool.token1(),
        SwapDirection::Token1ForToken0 => pool.token0(),
    }
}

pub fn quote(session: &Session, pool: &str, token_in: &str, amount: &str) -> Result<()> {
    let pool = session.resolve_pool(pool)?;
    let token_in = session.resolve_token(token_in)?;
    let direction = pool.direction_for(token_in)?;
    let units = session.parse_amount(token_in, amount)?;

    let out = pool.estimate(direction, units)?;
    let token_out = output_token(&pool, direction);

    println!("{}", "=== Quote ===".bright_green().bold());
    println!("{} {} {}", "Sell:".bright_cyan(), amount, session.symbol(token_in));
    println!(
        "{} {} {}",
        "Receive:".bright_cyan(),
        format_units(out, session.decimals(token_out)?),
        session.symbol(token_out)
    );
    if out == 0 {
        println!("{}", "Input too small to buy anything".yellow());
    }
    Ok(())
}

/// Execute a swap. With `approve`, first grant the pool exactly `amount`.
pub fn swap(
    session: &Session,
    pool: &str,
    account: &str,
    token_in: &str,
    amount: &str,
    min_out: Option<&str>,
    approve: bool,
) -> Result<()> {
    let pool = session.resolve_pool(pool)?;
    let account = session.resolve_account(account)?;
    let token_in = session.resolve_token(token_in)?;
    let direction = pool.direction_for(token_in)?;
    let token_out = output_token(&pool, direction);
    let units = session.parse_amount(token_in, amount)?;
    let min_out = match min_out {
        Some(min) => session.parse_amount(token_out, min)?,
        None => 0,
    };

    if approve {
        session.bank.approve(token_in, account, pool.address(), units)?;
    }

    let out = pool
        .swap(account, direction, units, min_out)
        .context("Swap failed")?;

    println!("{}", "=== Swap ===".bright_green().bold());
    println!(
        "{} {} {} -> {} {}",
        "Executed:".bright_cyan(),
        amount,
        session.symbol(token_in),
        format_units(out, session.decimals(token_out)?),
        session.symbol(token_out)
    );
    let details = pool.get_pool_details();
    println!(
        "{} {} {} / {} {}",
        "Reserves:".bright_cyan(),
        format_units(details.reserve0, session.decimals(pool.token0())?),
        session.symbol(pool.token0()),
        format_units(details.reserve1, session.decimals(pool.token1())?),
        session.symbol(pool.token1())
    );
    Ok(())
}
