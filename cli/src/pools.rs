//! Pair creation and pool inspection

use anyhow::{Context, Result};
use colored::Colorize;
use pairswap_amm::LiquidityPool;
use pairswap_common::math::format_units;
use pairswap_common::Address;

use crate::state::Session;

pub fn create_pair(session: &Session, token_a: &str, token_b: &str) -> Result<()> {
    let token_a = session.resolve_token(token_a)?;
    let token_b = session.resolve_token(token_b)?;

    let pool = session
        .registry
        .create_pair(token_a, token_b)
        .context("Failed to create pair")?;

    println!("{}", "=== Pair Created ===".bright_green().bold());
    println!("{} {}", "Pool:".bright_cyan(), pool);
    if let Some(handle) = session.registry.pool(pool) {
        println!(
            "{} {} / {}",
            "Pair:".bright_cyan(),
            session.symbol(handle.token0()),
            session.symbol(handle.token1())
        );
    }
    Ok(())
}

pub fn list_pools(session: &Session) -> Result<()> {
    println!("{}", "=== Pools ===".bright_green().bold());
    let pools = session.registry.all_pools();
    if pools.is_empty() {
        println!("{}", "No pools created yet".dimmed());
        return Ok(());
    }
    for address in pools {
        let pool = session
            .registry
            .pool(address)
            .with_context(|| format!("Registry lost pool {}", address))?;
        print_summary(session, &pool)?;
    }
    Ok(())
}

pub fn show_pool(session: &Session, pool: &str, account: Option<&str>) -> Result<()> {
    let pool = session.resolve_pool(pool)?;
    println!("{}", "=== Pool ===".bright_green().bold());
    println!("{} {}", "Address:".bright_cyan(), pool.address());
    print_summary(session, &pool)?;

    let config = pool.config();
    println!(
        "{} {}/{} ({} bps)",
        "Fee:".bright_cyan(),
        config.fee_numerator,
        config.fee_denominator,
        config.fee_bps()
    );

    let details = pool.get_pool_details();
    if details.total_shares > 0 {
        let (d0, d1) = (session.decimals(pool.token0())?, session.decimals(pool.token1())?);
        let price = spot_price(details.reserve0, details.reserve1, d0, d1);
        println!(
            "{} 1 {} = {:.6} {}",
            "Price:".bright_cyan(),
            session.symbol(pool.token0()),
            price,
            session.symbol(pool.token1())
        );
    }

    match account {
        Some(account) => {
            let account = session.resolve_account(account)?;
            print_position(session, &pool, account);
        }
        None => {
            for (holder, _) in pool.holders() {
                print_position(session, &pool, holder);
            }
        }
    }
    Ok(())
}

fn print_summary(session: &Session, pool: &LiquidityPool) -> Result<()> {
    let details = pool.get_pool_details();
    let (token0, token1) = (pool.token0(), pool.token1());
    println!(
        "{:<12} {}: {}  {}: {}  shares: {}",
        format!("{}/{}", session.symbol(token0), session.symbol(token1)).bright_cyan(),
        session.symbol(token0),
        format_units(details.reserve0, session.decimals(token0)?),
        session.symbol(token1),
        format_units(details.reserve1, session.decimals(token1)?),
        format_units(details.total_shares, pool.config().share_decimals)
    );
    Ok(())
}

fn print_position(session: &Session, pool: &LiquidityPool, account: Address) {
    let shares = pool.shares(account);
    let total = pool.get_pool_details().total_shares;
    let pct = if total == 0 { 0.0 } else { shares as f64 * 100.0 / total as f64 };
    println!(
        "  {} {} shares ({:.2}%)",
        format!("{}:", session.label(account)).bright_cyan(),
        format_units(shares, pool.config().share_decimals),
        pct
    );
}

/// token1 per whole token0, for display only
fn spot_price(reserve0: u128, reserve1: u128, decimals0: u8, decimals1: u8) -> f64 {
    let whole0 = reserve0 as f64 / 10f64.powi(i32::from(decimals0));
    let whole1 = reserve1 as f64 / 10f64.powi(i32::from(decimals1));
    whole1 / whole0
}
