use std::collections::BTreeMap;

use booth_core::{
    format_price, CartLine, Clamp, ComboSelection, QuantityChange, ShippingRates, ShopSession,
    VariantSelection,
};
use clap::Subcommand;

use crate::{parse_variant, session_store, Context};

#[derive(Debug, Subcommand)]
pub(crate) enum CartCommands {
    /// Add a product, merging with an identical line
    Add {
        /// Product slug or id
        slug: String,
        #[arg(long, default_value_t = 1)]
        qty: u32,
        /// Variant choice as Name=value; repeat for several variants
        #[arg(long = "variant", value_parser = parse_variant)]
        variants: Vec<(String, String)>,
    },
    /// Add the items of a combo bundle
    AddCombo {
        /// Combo slug or id
        slug: String,
        /// Product id to leave out; repeatable
        #[arg(long = "skip")]
        skip: Vec<String>,
        /// Extra units as product_id=N; repeatable
        #[arg(long = "more", value_parser = parse_variant)]
        more: Vec<(String, String)>,
    },
    /// Set a line's quantity
    Set {
        product_id: String,
        qty: u32,
        /// Variant choice identifying the line, as Name=value
        #[arg(long = "variant", value_parser = parse_variant)]
        variants: Vec<(String, String)>,
    },
    /// Change the variant choice of a line
    Variant {
        /// Product slug or id
        slug: String,
        /// Current choice identifying the line, as Name=value
        #[arg(long = "from", value_parser = parse_variant)]
        from: Vec<(String, String)>,
        /// New choice, as Name=value
        #[arg(long = "to", value_parser = parse_variant, required = true)]
        to: Vec<(String, String)>,
    },
    /// Remove every line of a product
    Remove { product_id: String },
    /// Empty the cart
    Clear,
    /// Print the cart and its totals
    Show,
}

pub(crate) async fn run(ctx: &Context, command: CartCommands) -> anyhow::Result<()> {
    let mut session = session_store::load(&ctx.session_path)?;
    match command {
        CartCommands::Add {
            slug,
            qty,
            variants,
        } => add_product(ctx, &mut session, &slug, qty, variants).await?,
        CartCommands::AddCombo { slug, skip, more } => {
            add_combo(ctx, &mut session, &slug, &skip, &more).await?;
        }
        CartCommands::Set {
            product_id,
            qty,
            variants,
        } => {
            let variants: Vec<VariantSelection> = variants
                .into_iter()
                .map(|(name, value)| VariantSelection::new(name, value))
                .collect();
            let change = session.cart.set_quantity(&product_id, qty, &variants)?;
            report_change(&product_id, change);
        }
        CartCommands::Variant { slug, from, to } => {
            change_variant(ctx, &mut session, &slug, from, to).await?;
        }
        CartCommands::Remove { product_id } => {
            let removed = session.cart.remove_line(&product_id);
            println!("removed {removed} line(s) for {product_id}");
        }
        CartCommands::Clear => {
            session.cart.clear();
            println!("cart cleared");
        }
        CartCommands::Show => {}
    }
    session_store::save(&ctx.session_path, &session)?;
    print_cart(&session, &ctx.config.shipping_rates());
    Ok(())
}

async fn add_product(
    ctx: &Context,
    session: &mut ShopSession,
    slug: &str,
    qty: u32,
    overrides: Vec<(String, String)>,
) -> anyhow::Result<()> {
    let Some(product) = ctx.client.get_product(slug).await? else {
        anyhow::bail!("product '{slug}' not found");
    };

    let existing: Option<BTreeMap<String, String>> = session
        .cart
        .lines()
        .into_iter()
        .find(|l| l.product_id == product.id)
        .map(|l| {
            l.variants
                .iter()
                .map(|v| (v.name.clone(), v.value.clone()))
                .collect()
        });
    let mut selection = product.default_selection(existing.as_ref());
    selection.extend(overrides);

    if product.available_quantity(&selection) == 0 {
        anyhow::bail!("{} is out of stock for this selection", product.name);
    }
    let change = session.cart.add_line(product.cart_line(qty, &selection))?;
    report_change(&product.name, change);
    Ok(())
}

async fn change_variant(
    ctx: &Context,
    session: &mut ShopSession,
    slug: &str,
    from: Vec<(String, String)>,
    to: Vec<(String, String)>,
) -> anyhow::Result<()> {
    let Some(product) = ctx.client.get_product(slug).await? else {
        anyhow::bail!("product '{slug}' not found");
    };

    let current = product.cart_line(1, &from.iter().cloned().collect());
    let mut selection: BTreeMap<String, String> = from.into_iter().collect();
    selection.extend(to);
    let target = product.cart_line(1, &selection);

    let (key, change) = session
        .cart
        .change_variants(&current.key(), target.variants)?;
    report_change(&key.to_string(), change);
    Ok(())
}

async fn add_combo(
    ctx: &Context,
    session: &mut ShopSession,
    slug: &str,
    skip: &[String],
    more: &[(String, String)],
) -> anyhow::Result<()> {
    let combo = ctx.client.get_combo(slug).await?;
    let mut selection = ComboSelection::new(&combo);
    for id in skip {
        selection.toggle(id)?;
    }
    for (id, extra) in more {
        let delta: i64 = extra
            .parse()
            .map_err(|_| anyhow::anyhow!("'{extra}' is not a number of units"))?;
        selection.adjust_quantity(id, delta)?;
    }

    for added in selection.add_to_cart(&mut session.cart)? {
        match added.result {
            Ok(change) => report_change(&added.product_id, change),
            Err(e) => println!("skipped {}: {e}", added.product_id),
        }
    }
    Ok(())
}

fn report_change(what: &str, change: QuantityChange) {
    match change.clamp {
        Clamp::Unchanged => println!("{what}: quantity {}", change.applied),
        Clamp::ReducedToStock => println!(
            "{what}: only {} in stock, quantity set to {}",
            change.limit, change.applied
        ),
        Clamp::RaisedToMinimum => println!("{what}: quantity raised to 1"),
        Clamp::NoStock => println!("{what}: stock unknown, quantity held at 1"),
    }
}

fn variant_label(line: &CartLine) -> String {
    line.variants
        .iter()
        .map(|v| format!("{}={}", v.name, v.value))
        .collect::<Vec<_>>()
        .join(", ")
}

pub(crate) fn print_cart(session: &ShopSession, rates: &ShippingRates) {
    let lines = session.cart.lines();
    if lines.is_empty() {
        println!("Cart is empty.");
        return;
    }

    println!(
        "\n{:<26} {:<20} {:>4} {:>12}",
        "PRODUCT", "VARIANTS", "QTY", "LINE TOTAL"
    );
    println!("{}", "-".repeat(65));
    for line in lines {
        println!(
            "{:<26} {:<20} {:>4} {:>12}",
            crate::catalog::truncate(&line.name, 26),
            crate::catalog::truncate(&variant_label(line), 20),
            line.quantity,
            format_price(line.line_total()),
        );
    }
    print_summary(session, rates);
}

pub(crate) fn print_summary(session: &ShopSession, rates: &ShippingRates) {
    let summary = session.summary(rates);
    println!();
    println!("{:<16} {:>12}", "subtotal", format_price(summary.subtotal));
    if let Some(coupon) = &session.coupon {
        println!(
            "{:<16} {:>12}",
            format!("coupon {}", coupon.code),
            format!("-{}", format_price(summary.discount))
        );
    }
    match session.shipping_zone {
        Some(zone) => println!(
            "{:<16} {:>12}",
            format!("shipping ({})", zone_label(zone)),
            format_price(summary.shipping_charge)
        ),
        None => println!("{:<16} {:>12}", "shipping", "not set"),
    }
    println!("{:<16} {:>12}", "total", format_price(summary.total));
}

fn zone_label(zone: booth_core::ShippingZone) -> &'static str {
    match zone {
        booth_core::ShippingZone::Inside => "inside",
        booth_core::ShippingZone::Outside => "outside",
    }
}
