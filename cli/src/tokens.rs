//! Token faucet, allowances and balances

use anyhow::{Context, Result};
use colored::Colorize;
use pairswap_common::math::format_units;
use pairswap_common::{Address, TokenLedger, UNLIMITED_ALLOWANCE};

use crate::state::Session;

pub fn list_tokens(session: &Session) -> Result<()> {
    println!("{}", "=== Tokens ===".bright_green().bold());
    let tokens = session.bank.tokens();
    if tokens.is_empty() {
        println!("{}", "No tokens (declare [[tokens]] in the config and run init)".dimmed());
        return Ok(());
    }
    for (address, metadata) in tokens {
        let supply = session.bank.total_supply(address)?;
        println!(
            "{:<8} {:<20} {} decimals={} supply={}",
            metadata.symbol.bright_cyan(),
            metadata.name,
            address,
            metadata.decimals,
            format_units(supply, metadata.decimals)
        );
    }
    Ok(())
}

/// Mint test tokens to an account
pub fn faucet(session: &Session, token: &str, account: &str, amount: &str) -> Result<()> {
    let token = session.resolve_token(token)?;
    let account = session.resolve_account(account)?;
    let units = session.parse_amount(token, amount)?;

    session.bank.mint(token, account, units).context("Mint failed")?;

    println!(
        "{} {} {} to {}",
        "Minted".bright_green(),
        amount,
        session.symbol(token),
        session.label(account)
    );
    print_balance(session, token, account)
}

/// Set the allowance `owner` grants `spender`; `max` is unlimited
pub fn approve(session: &Session, token: &str, owner: &str, spender: &str, amount: &str) -> Result<()> {
    let token = session.resolve_token(token)?;
    let owner = session.resolve_account(owner)?;
    let spender = resolve_spender(session, spender)?;
    let units = if amount.eq_ignore_ascii_case("max") {
        UNLIMITED_ALLOWANCE
    } else {
        session.parse_amount(token, amount)?
    };

    session.bank.approve(token, owner, spender, units)?;

    println!(
        "{} {} may spend {} of {}'s {}",
        "Approved".bright_green(),
        session.label(spender),
        describe_allowance(session, token, units)?,
        session.label(owner),
        session.symbol(token)
    );
    Ok(())
}

pub fn balance(session: &Session, token: &str, account: &str) -> Result<()> {
    let token = session.resolve_token(token)?;
    let account = session.resolve_account(account)?;
    print_balance(session, token, account)
}

fn print_balance(session: &Session, token: Address, account: Address) -> Result<()> {
    let decimals = session.decimals(token)?;
    let amount = session.bank.balance_of(token, account);
    println!(
        "{} {} {}",
        format!("{}:", session.label(account)).bright_cyan(),
        format_units(amount, decimals),
        session.symbol(token)
    );
    Ok(())
}

fn describe_allowance(session: &Session, token: Address, units: u128) -> Result<String> {
    if units == UNLIMITED_ALLOWANCE {
        return Ok("unlimited".to_string());
    }
    Ok(format_units(units, session.decimals(token)?))
}

/// Spender by account name, pool pair (`TKA/TKB`) or base58 address
fn resolve_spender(session: &Session, spender: &str) -> Result<Address> {
    if spender.contains('/') {
        return Ok(session.resolve_pool(spender)?.address());
    }
    session.resolve_account(spender)
}
