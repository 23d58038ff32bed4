use booth_core::{format_price, OrderRecord, StepState, Timeline};

use crate::Context;

pub(crate) async fn run_track(ctx: &Context, id: &str) -> anyhow::Result<()> {
    let orders = ctx.client.track_order(id).await?;
    if orders.is_empty() {
        println!("No orders found for '{id}'.");
        return Ok(());
    }
    for (i, order) in orders.iter().enumerate() {
        if i > 0 {
            println!();
        }
        print_tracking(order);
    }
    Ok(())
}

pub(crate) async fn run_order(ctx: &Context, id: &str) -> anyhow::Result<()> {
    let order = ctx.client.get_order(id).await?;
    print_tracking(&order);

    println!("\n{:<30} {:>4} {:>12}", "ITEM", "QTY", "PRICE");
    println!("{}", "-".repeat(48));
    for item in &order.order_items {
        println!(
            "{:<30} {:>4} {:>12}",
            crate::catalog::truncate(&item.name, 30),
            item.quantity,
            format_price(item.price),
        );
    }
    println!();
    println!("{:<16} {:>12}", "subtotal", format_price(order.sub_total));
    println!("{:<16} {:>12}", "discount", format_price(order.discount));
    println!("{:<16} {:>12}", "shipping", format_price(order.shipping_charge));
    println!("{:<16} {:>12}", "total", format_price(order.total));
    Ok(())
}

fn print_tracking(order: &OrderRecord) {
    println!(
        "order {}  [{}]  placed {}",
        order.id,
        order.badge_label(),
        order
            .created_at
            .map_or_else(|| "N/A".to_owned(), |at| at.format("%Y-%m-%d").to_string())
    );
    println!("{} item(s) to {}", order.item_count(), order.delivery_line());

    match order.timeline() {
        Timeline::Steps(steps) => {
            for step in steps {
                let mark = match step.state {
                    StepState::Complete => "[x]",
                    StepState::Current => "[>]",
                    StepState::Upcoming => "[ ]",
                };
                let at = step
                    .at
                    .map(|t| t.format("%Y-%m-%d %H:%M").to_string())
                    .unwrap_or_default();
                println!("  {mark} {:<14} {at}", step.label);
            }
            println!("progress: {}%", order.progress_percent());
        }
        Timeline::Closed { status, at } => match at {
            Some(at) => println!("  {} on {}", status.label(), at.format("%Y-%m-%d")),
            None => println!("  {}", status.label()),
        },
    }

    if let Some(eta) = order.estimated_delivery() {
        println!("estimated delivery: {}", eta.format("%Y-%m-%d"));
    }
}
