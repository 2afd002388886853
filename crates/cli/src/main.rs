//! Seller Console CLI - manage a marketplace seller account from the terminal.
//!
//! # Usage
//!
//! ```bash
//! # Log in (password from --password, SELLER_PASSWORD or stdin)
//! sc-cli login -e seller@example.com
//!
//! # Remembered accounts and switching between them
//! sc-cli accounts
//! sc-cli switch 6f1c2a4e-...
//!
//! # Orders
//! sc-cli orders list --status new
//! sc-cli orders status o-123 confirmed --comment "Packed"
//!
//! # Dashboard KPIs for the last week
//! sc-cli dashboard --period week
//! ```
//!
//! # Environment Variables
//!
//! - `SELLER_API_URL` - API base URL (default `http://localhost:3001`)
//! - `SELLER_STATE_DIR` - where `session.json` is kept
//! - `RUST_LOG` - log filter (default `info`)

#![cfg_attr(not(test), forbid(unsafe_code))]
#![allow(clippy::print_stdout)]

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use seller_console_core::{AccountId, OrderId, OrderStatus, ProductId, StatsPeriod, TrendWindow};
use seller_console_client::api::ExportFormat;

mod commands;

use commands::{CliError, Context};

#[derive(Parser)]
#[command(name = "sc-cli")]
#[command(author, version, about = "Seller Console command-line client")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Log in and make the account active
    Login {
        /// Account email
        #[arg(short, long)]
        email: String,

        /// Password; read from stdin when omitted
        #[arg(short, long, env = "SELLER_PASSWORD", hide_env_values = true)]
        password: Option<String>,
    },
    /// Register a new seller account
    Register {
        /// Seller display name
        #[arg(short, long)]
        name: String,

        /// Account email
        #[arg(short, long)]
        email: String,
    },
    /// Log out of the active account
    Logout {
        /// Forget every remembered account
        #[arg(long)]
        all: bool,
    },
    /// List remembered accounts
    Accounts,
    /// Make a remembered account active
    Switch {
        /// Account id as shown by `accounts`
        id: AccountId,
    },
    /// Order management
    Orders {
        #[command(subcommand)]
        action: OrdersAction,
    },
    /// Catalog management
    Products {
        #[command(subcommand)]
        action: ProductsAction,
    },
    /// Dashboard KPIs
    Dashboard {
        /// Reporting period (`today`, `week`, `month`, `quarter`, `year`)
        #[arg(short, long, default_value = "month")]
        period: StatsPeriod,
    },
    /// Sales analytics
    Analytics {
        #[command(subcommand)]
        action: AnalyticsAction,
    },
    /// Show the seller profile
    Profile,
    /// Show or change the account balance
    Balance {
        #[command(subcommand)]
        action: Option<BalanceAction>,
    },
}

#[derive(Subcommand)]
enum OrdersAction {
    /// List orders
    List {
        #[arg(short, long)]
        status: Option<OrderStatus>,

        #[arg(short, long, default_value_t = 20)]
        limit: u32,

        #[arg(long, default_value_t = 0)]
        offset: u64,
    },
    /// Show one order
    Show { id: OrderId },
    /// Change an order's status
    Status {
        id: OrderId,
        status: OrderStatus,

        #[arg(short, long)]
        comment: Option<String>,
    },
}

#[derive(Subcommand)]
enum ProductsAction {
    /// List products
    List {
        #[arg(short, long)]
        search: Option<String>,

        #[arg(short, long)]
        category: Option<String>,

        #[arg(short, long, default_value_t = 20)]
        limit: u32,
    },
    /// Show one product
    Show { id: ProductId },
    /// Delete a product
    Delete { id: ProductId },
    /// Export the catalog to a file
    Export {
        /// `csv` or `xlsx`
        #[arg(short, long, default_value = "csv")]
        format: ExportFormat,

        #[arg(short, long)]
        output: PathBuf,
    },
}

#[derive(Subcommand)]
enum AnalyticsAction {
    /// Best-selling products
    TopProducts {
        /// `7d`, `30d`, `90d` or `1y`
        #[arg(short, long, default_value = "30d")]
        period: TrendWindow,

        #[arg(short, long, default_value_t = 10)]
        limit: u32,
    },
}

#[derive(Subcommand)]
enum BalanceAction {
    /// Top up, in roubles
    Add { amount: String },
    /// Withdraw, in roubles
    Withdraw { amount: String },
}

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "info".into());
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), CliError> {
    let mut ctx = Context::new()?;

    match cli.command {
        Commands::Login { email, password } => {
            commands::session::login(&mut ctx, &email, password).await?;
        }
        Commands::Register { name, email } => {
            commands::session::register(&ctx, &name, &email).await?;
        }
        Commands::Logout { all } => commands::session::logout(&mut ctx, all)?,
        Commands::Accounts => commands::session::accounts(&ctx),
        Commands::Switch { id } => commands::session::switch(&mut ctx, &id)?,
        Commands::Orders { action } => match action {
            OrdersAction::List {
                status,
                limit,
                offset,
            } => commands::orders::list(&ctx, status, limit, offset).await?,
            OrdersAction::Show { id } => commands::orders::show(&ctx, id).await?,
            OrdersAction::Status {
                id,
                status,
                comment,
            } => commands::orders::set_status(&ctx, id, status, comment).await?,
        },
        Commands::Products { action } => match action {
            ProductsAction::List {
                search,
                category,
                limit,
            } => commands::products::list(&ctx, search, category, limit).await?,
            ProductsAction::Show { id } => commands::products::show(&ctx, id).await?,
            ProductsAction::Delete { id } => commands::products::delete(&ctx, &id).await?,
            ProductsAction::Export { format, output } => {
                commands::products::export(&ctx, format, &output).await?;
            }
        },
        Commands::Dashboard { period } => commands::dashboard::stats(&ctx, period).await?,
        Commands::Analytics { action } => match action {
            AnalyticsAction::TopProducts { period, limit } => {
                commands::dashboard::top_products(&ctx, period, limit).await?;
            }
        },
        Commands::Profile => commands::profile::show(&ctx).await?,
        Commands::Balance { action } => match action {
            None => commands::profile::balance(&ctx).await?,
            Some(BalanceAction::Add { amount }) => {
                commands::profile::add_balance(&ctx, &amount).await?;
            }
            Some(BalanceAction::Withdraw { amount }) => {
                commands::profile::withdraw_balance(&ctx, &amount).await?;
            }
        },
    }
    Ok(())
}
