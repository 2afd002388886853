//! Profile and balance commands.

use std::str::FromStr;

use rust_decimal::Decimal;
use seller_console_client::Resource;
use seller_console_client::resource::ProfileFetch;
use seller_console_core::{BalanceChange, Kopecks};

use super::{CliError, Context, settle};

pub async fn show(ctx: &Context) -> Result<(), CliError> {
    ctx.require_login()?;
    let (resource, handle) = Resource::mount(ProfileFetch(ctx.api.clone()), ());
    let profile = settle(&resource, handle).await?;

    println!("{} <{}>", profile.name, profile.email);
    println!("  Id:      {}", profile.id);
    println!("  Balance: {}", profile.balance_kopecks);
    if let Some(created) = profile.created_at {
        println!("  Since:   {}", created.format("%Y-%m-%d"));
    }
    Ok(())
}

pub async fn balance(ctx: &Context) -> Result<(), CliError> {
    ctx.require_login()?;
    let balance = ctx.api.balance().await?;
    println!("Balance: {}", balance.balance_kopecks);
    Ok(())
}

pub async fn add_balance(ctx: &Context, amount: &str) -> Result<(), CliError> {
    ctx.require_login()?;
    let change = BalanceChange::new(parse_roubles(amount)?)?;
    ctx.api.add_balance(change).await?;
    println!("Added {}", change.amount_kopecks);
    Ok(())
}

pub async fn withdraw_balance(ctx: &Context, amount: &str) -> Result<(), CliError> {
    ctx.require_login()?;
    let change = BalanceChange::new(parse_roubles(amount)?)?;
    ctx.api.withdraw_balance(change).await?;
    println!("Withdrew {}", change.amount_kopecks);
    Ok(())
}

/// Parse a rouble amount such as `150` or `99.90`.
fn parse_roubles(amount: &str) -> Result<Kopecks, CliError> {
    Decimal::from_str(amount.trim())
        .ok()
        .and_then(Kopecks::from_decimal)
        .ok_or_else(|| CliError::InvalidArgument(format!("not an amount: {amount}")))
}
