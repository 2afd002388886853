//! Login, logout and account switching.

use std::io::{self, BufRead, Write};

use secrecy::SecretString;
use seller_console_core::AccountId;
use tracing::info;

use super::{CliError, Context};

/// Log in, reading the password from stdin if none was given.
pub async fn login(ctx: &mut Context, email: &str, password: Option<String>) -> Result<(), CliError> {
    let password = match password {
        Some(password) => SecretString::from(password),
        None => prompt_password()?,
    };

    let account = ctx.session.login(email, password).await?;
    println!("Logged in as {} ({})", account.shop_name, account.id);
    Ok(())
}

fn prompt_password() -> Result<SecretString, CliError> {
    let mut stderr = io::stderr();
    write!(stderr, "Password: ")?;
    stderr.flush()?;

    let mut line = String::new();
    io::stdin().lock().read_line(&mut line)?;
    Ok(SecretString::from(line.trim_end_matches(['\r', '\n']).to_owned()))
}

/// Register a seller and print the temporary password.
pub async fn register(ctx: &Context, name: &str, email: &str) -> Result<(), CliError> {
    let response = ctx.session.register(name, email).await?;
    if let Some(message) = &response.message {
        println!("{message}");
    }
    println!("Temporary password: {}", response.temporary_password);
    println!("Log in with `sc-cli login -e {email}` and change it.");
    Ok(())
}

pub fn logout(ctx: &mut Context, all: bool) -> Result<(), CliError> {
    if all {
        ctx.session.logout_all()?;
        println!("Logged out of all accounts");
    } else {
        ctx.session.logout()?;
        println!("Logged out");
    }
    Ok(())
}

/// Print remembered accounts, marking the active one.
pub fn accounts(ctx: &Context) {
    let active = ctx.session.active_account().map(|a| a.id.clone());
    if ctx.session.accounts().is_empty() {
        println!("No remembered accounts");
        return;
    }

    for account in ctx.session.accounts() {
        let marker = if Some(&account.id) == active.as_ref() { "*" } else { " " };
        let email = account.email().map_or("-", |e| e.as_str());
        let source = match &account.user {
            Some(user) if user.is_confirmed() => "",
            Some(_) => " (unconfirmed)",
            None => " (linked)",
        };
        println!("{marker} {}  {}  {email}{source}", account.id, account.shop_name);
    }
}

pub fn switch(ctx: &mut Context, id: &AccountId) -> Result<(), CliError> {
    if ctx.session.switch_account(id)? {
        info!(account_id = %id, "Switched");
        println!("Switched to {id}");
    } else {
        println!("No remembered account with id {id}");
    }
    Ok(())
}
