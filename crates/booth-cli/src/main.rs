mod cart;
mod catalog;
mod checkout;
mod locations;
mod orders;
mod session_store;

use std::path::PathBuf;

use anyhow::Context as _;
use booth_client::StorefrontClient;
use booth_core::{AppConfig, ShippingZone};
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use crate::cart::CartCommands;
use crate::catalog::CatalogCommands;
use crate::checkout::CheckoutArgs;
use crate::locations::LocationArgs;

#[derive(Debug, Parser)]
#[command(name = "booth")]
#[command(about = "Storefront client: browse, fill a cart, check out, track orders")]
struct Cli {
    /// Session file holding the cart, coupon and shipping zone; overrides
    /// BOOTH_SESSION_PATH
    #[arg(long, global = true)]
    session: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Browse products, combos and categories
    Catalog {
        #[command(subcommand)]
        command: CatalogCommands,
    },
    /// Inspect and change the cart
    Cart {
        #[command(subcommand)]
        command: CartCommands,
    },
    /// Stage or drop a coupon
    Coupon {
        #[command(subcommand)]
        command: CouponCommands,
    },
    /// Choose the shipping zone used in the cart summary
    Shipping {
        #[command(subcommand)]
        command: ShippingCommands,
    },
    /// Walk the division → district → upazila → union hierarchy
    Locations(LocationArgs),
    /// Place the order held in the session
    Checkout(CheckoutArgs),
    /// Track orders by order id
    Track {
        /// Order id (at least 5 characters)
        id: String,
    },
    /// Show one order's details
    Order {
        /// Order id (at least 5 characters)
        id: String,
    },
}

#[derive(Debug, Subcommand)]
enum CouponCommands {
    /// Stage a coupon against the cart
    Apply {
        /// Coupon code
        code: String,
        /// `percentage` or `fixed`
        #[arg(long = "type", value_parser = parse_discount_type)]
        discount_type: booth_core::DiscountType,
        /// Percent off, or a fixed amount off
        #[arg(long)]
        value: rust_decimal::Decimal,
    },
    /// Drop the staged coupon
    Remove,
}

#[derive(Debug, Subcommand)]
enum ShippingCommands {
    /// Set the zone: `inside` or `outside` the hub city
    Set {
        #[arg(value_parser = parse_zone)]
        zone: ShippingZone,
    },
    /// Forget the zone; the summary shows no shipping charge
    Clear,
}

fn parse_zone(raw: &str) -> Result<ShippingZone, String> {
    raw.parse()
}

fn parse_discount_type(raw: &str) -> Result<booth_core::DiscountType, String> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "percentage" | "percent" => Ok(booth_core::DiscountType::Percentage),
        "fixed" => Ok(booth_core::DiscountType::Fixed),
        other => Err(format!(
            "unknown discount type '{other}' (expected percentage or fixed)"
        )),
    }
}

/// Parse a `Name=value` variant choice.
pub(crate) fn parse_variant(raw: &str) -> Result<(String, String), String> {
    let (name, value) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected Name=value, got '{raw}'"))?;
    let (name, value) = (name.trim(), value.trim());
    if name.is_empty() || value.is_empty() {
        return Err(format!("expected Name=value, got '{raw}'"));
    }
    Ok((name.to_owned(), value.to_owned()))
}

/// Everything a command handler needs.
pub(crate) struct Context {
    pub config: AppConfig,
    pub client: StorefrontClient,
    pub session_path: PathBuf,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    let Some(command) = cli.command else {
        println!("booth: run `booth --help` for commands");
        return Ok(());
    };

    let config = booth_core::load_app_config().context("failed to load configuration")?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    let client = StorefrontClient::from_config(&config)?;
    let session_path = cli
        .session
        .unwrap_or_else(|| config.session_path.clone());
    let ctx = Context {
        config,
        client,
        session_path,
    };

    match command {
        Commands::Catalog { command } => catalog::run(&ctx, command).await,
        Commands::Cart { command } => cart::run(&ctx, command).await,
        Commands::Coupon { command } => run_coupon(&ctx, command),
        Commands::Shipping { command } => run_shipping(&ctx, command),
        Commands::Locations(args) => locations::run(&ctx, &args).await,
        Commands::Checkout(args) => checkout::run(&ctx, &args).await,
        Commands::Track { id } => orders::run_track(&ctx, &id).await,
        Commands::Order { id } => orders::run_order(&ctx, &id).await,
    }
}

fn run_coupon(ctx: &Context, command: CouponCommands) -> anyhow::Result<()> {
    let mut session = session_store::load(&ctx.session_path)?;
    match command {
        CouponCommands::Apply {
            code,
            discount_type,
            value,
        } => {
            if value.is_sign_negative() {
                anyhow::bail!("coupon value must not be negative");
            }
            let coupon = booth_core::Coupon {
                code,
                discount_type,
                value,
            };
            println!("coupon {} staged", coupon.code);
            session.apply_coupon(coupon);
        }
        CouponCommands::Remove => match session.remove_coupon() {
            Some(c) => println!("coupon {} removed", c.code),
            None => println!("no coupon staged"),
        },
    }
    session_store::save(&ctx.session_path, &session)?;
    cart::print_summary(&session, &ctx.config.shipping_rates());
    Ok(())
}

fn run_shipping(ctx: &Context, command: ShippingCommands) -> anyhow::Result<()> {
    let mut session = session_store::load(&ctx.session_path)?;
    match command {
        ShippingCommands::Set { zone } => session.set_shipping_zone(Some(zone)),
        ShippingCommands::Clear => session.set_shipping_zone(None),
    }
    session_store::save(&ctx.session_path, &session)?;
    cart::print_summary(&session, &ctx.config.shipping_rates());
    Ok(())
}

#[cfg(test)]
mod tests;
