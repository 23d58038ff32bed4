use booth_client::{CascadeLoader, LocationSource};
use booth_core::{AddressCascade, Applied, LocationTier};
use clap::Args;

use crate::Context;

/// Ids chosen so far, top tier first.
#[derive(Debug, Clone, Default, Args)]
pub(crate) struct LocationPath {
    #[arg(long)]
    pub division: Option<String>,
    #[arg(long)]
    pub district: Option<String>,
    #[arg(long)]
    pub upazila: Option<String>,
    #[arg(long)]
    pub union: Option<String>,
}

#[derive(Debug, Args)]
pub(crate) struct LocationArgs {
    #[command(flatten)]
    pub path: LocationPath,

    /// Fetch each tier as it is needed instead of loading everything first
    #[arg(long)]
    pub live: bool,
}

pub(crate) async fn run(ctx: &Context, args: &LocationArgs) -> anyhow::Result<()> {
    let cascade = select(ctx, &args.path, args.live).await?;
    print_options(&cascade);
    Ok(())
}

/// Build a cascade with `path` selected, loading tiers either per request
/// or from the full directory.
pub(crate) async fn select(
    ctx: &Context,
    path: &LocationPath,
    live: bool,
) -> anyhow::Result<AddressCascade> {
    if live {
        let mut loader = CascadeLoader::new(ctx.client.clone());
        walk(&mut loader, path).await?;
        Ok(loader.into_cascade())
    } else {
        let directory = ctx.client.load_locations().await;
        if directory.is_empty() {
            anyhow::bail!("no location data available");
        }
        let mut loader = CascadeLoader::new(directory);
        walk(&mut loader, path).await?;
        Ok(loader.into_cascade())
    }
}

async fn walk<S: LocationSource>(
    loader: &mut CascadeLoader<S>,
    path: &LocationPath,
) -> anyhow::Result<()> {
    report(LocationTier::Division, loader.start().await);
    if let Some(id) = &path.division {
        report(LocationTier::District, loader.select_division(id).await?);
    }
    if let Some(id) = &path.district {
        report(LocationTier::Upazila, loader.select_district(id).await?);
    }
    if let Some(id) = &path.upazila {
        report(LocationTier::Union, loader.select_upazila(id).await?);
    }
    if let Some(id) = &path.union {
        loader.select_union(id)?;
    }
    Ok(())
}

fn report(tier: LocationTier, applied: Applied) {
    match applied {
        Applied::Accepted { options } => tracing::debug!(%tier, options, "tier loaded"),
        Applied::Stale => tracing::debug!(%tier, "tier response superseded"),
    }
}

/// Print the selections made and the options of the first unselected tier.
fn print_options(cascade: &AddressCascade) {
    for tier in LocationTier::ALL {
        if let Some(node) = cascade.selected(tier) {
            println!("{:<10} {}", tier.to_string(), node.label());
            continue;
        }
        let options = cascade.options(tier);
        if options.is_empty() {
            println!("No {tier} options available.");
            return;
        }
        println!("\n{:<10} {}", "ID", tier.to_string().to_uppercase());
        println!("{}", "-".repeat(40));
        for node in options {
            println!("{:<10} {}", node.id, node.label());
        }
        return;
    }
}
