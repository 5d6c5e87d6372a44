//! Liquidity provider operations

use anyhow::{Context, Result};
use colored::Colorize;
use pairswap_common::math::{format_units, parse_units};

use crate::state::Session;

/// Deposit into a pool. With `approve`, first grant the pool exactly the
/// offered amounts.
pub fn provide(
    session: &Session,
    pool: &str,
    account: &str,
    amount0: &str,
    amount1: &str,
    approve: bool,
) -> Result<()> {
    let pool = session.resolve_pool(pool)?;
    let account = session.resolve_account(account)?;
    let (token0, token1) = (pool.token0(), pool.token1());
    let units0 = session.parse_amount(token0, amount0)?;
    let units1 = session.parse_amount(token1, amount1)?;

    if approve {
        session.bank.approve(token0, account, pool.address(), units0)?;
        session.bank.approve(token1, account, pool.address(), units1)?;
    }

    let before = pool.get_pool_details();
    let minted = pool.provide(account, units0, units1).context("Provide failed")?;
    let after = pool.get_pool_details();

    println!("{}", "=== Provide ===".bright_green().bold());
    println!(
        "{} {} {} + {} {}",
        "Deposited:".bright_cyan(),
        format_units(after.reserve0 - before.reserve0, session.decimals(token0)?),
        session.symbol(token0),
        format_units(after.reserve1 - before.reserve1, session.decimals(token1)?),
        session.symbol(token1)
    );
    println!(
        "{} {} (now {})",
        "Shares minted:".bright_cyan(),
        format_units(minted, pool.config().share_decimals),
        format_units(pool.shares(account), pool.config().share_decimals)
    );
    Ok(())
}

/// Redeem shares; every share the account holds when `shares` is `None`
pub fn withdraw(session: &Session, pool: &str, account: &str, shares: Option<&str>) -> Result<()> {
    let pool = session.resolve_pool(pool)?;
    let account = session.resolve_account(account)?;
    let share_decimals = pool.config().share_decimals;
    let shares = match shares {
        Some(shares) => {
            parse_units(shares, share_decimals).with_context(|| format!("Invalid share amount: {}", shares))?
        }
        None => pool.shares(account),
    };

    let (amount0, amount1) = pool.withdraw(account, shares).context("Withdraw failed")?;

    println!("{}", "=== Withdraw ===".bright_green().bold());
    println!("{} {}", "Shares burned:".bright_cyan(), format_units(shares, share_decimals));
    println!(
        "{} {} {} + {} {}",
        "Received:".bright_cyan(),
        format_units(amount0, session.decimals(pool.token0())?),
        session.symbol(pool.token0()),
        format_units(amount1, session.decimals(pool.token1())?),
        session.symbol(pool.token1())
    );
    if pool.is_empty() {
        println!("{}", "Pool is now empty".yellow());
    }
    Ok(())
}

/// Amount of the other token that matches `amount` of `token_in` at the
/// current ratio
pub fn equivalent(session: &Session, pool: &str, token_in: &str, amount: &str) -> Result<()> {
    let pool = session.resolve_pool(pool)?;
    let token_in = session.resolve_token(token_in)?;
    let units = session.parse_amount(token_in, amount)?;

    let (token_out, estimate) = if token_in == pool.token0() {
        (pool.token1(), pool.get_equivalent_token1_estimate(units)?)
    } else if token_in == pool.token1() {
        (pool.token0(), pool.get_equivalent_token0_estimate(units)?)
    } else {
        anyhow::bail!("{} is not part of this pool", session.symbol(token_in));
    };

    println!(
        "{} {} {} pairs with {} {}",
        "Equivalent:".bright_cyan(),
        amount,
        session.symbol(token_in),
        format_units(estimate, session.decimals(token_out)?),
        session.symbol(token_out)
    );
    Ok(())
}
