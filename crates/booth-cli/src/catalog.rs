use booth_core::{format_price, Category, Product};
use clap::Subcommand;

use crate::Context;

#[derive(Debug, Subcommand)]
pub(crate) enum CatalogCommands {
    /// List products, one page at a time
    List {
        /// Only featured products
        #[arg(long)]
        featured: bool,
        /// Category id or slug
        #[arg(long)]
        category: Option<String>,
        /// Free-text search
        #[arg(long)]
        search: Option<String>,
        #[arg(long, default_value_t = 1)]
        page: u32,
        /// Page size; defaults to the configured page size
        #[arg(long)]
        limit: Option<u32>,
    },
    /// Show one product with its variants and stock
    Show {
        /// Product slug or id
        slug: String,
    },
    /// Show a combo bundle and its savings
    Combo {
        /// Combo slug or id
        slug: String,
    },
    /// Print the category tree
    Categories,
}

pub(crate) async fn run(ctx: &Context, command: CatalogCommands) -> anyhow::Result<()> {
    match command {
        CatalogCommands::List {
            featured,
            category,
            search,
            page,
            limit,
        } => {
            let mut query = if featured {
                booth_core::ProductQuery {
                    limit: ctx.client.page_size(),
                    ..booth_core::ProductQuery::featured()
                }
            } else {
                ctx.client.product_query()
            };
            query.category = category;
            query.search = search;
            query.page = page;
            if let Some(limit) = limit {
                query.limit = limit;
            }
            run_list(ctx, &query).await
        }
        CatalogCommands::Show { slug } => run_show(ctx, &slug).await,
        CatalogCommands::Combo { slug } => run_combo(ctx, &slug).await,
        CatalogCommands::Categories => run_categories(ctx).await,
    }
}

async fn run_list(ctx: &Context, query: &booth_core::ProductQuery) -> anyhow::Result<()> {
    let page = ctx.client.list_products(query).await?;
    if page.products.is_empty() {
        println!("No products found.");
        return Ok(());
    }

    println!("{:<28} {:<12} {:>12} {:>6}", "SLUG", "CODE", "PRICE", "STOCK");
    println!("{}", "-".repeat(61));
    for product in &page.products {
        println!(
            "{:<28} {:<12} {:>12} {:>6}",
            truncate(product.slug.as_deref().unwrap_or(&product.id), 28),
            truncate(&product.code, 12),
            format_price(product.effective_price()),
            product.available_stock(),
        );
    }
    if let Some(meta) = page.meta {
        println!(
            "\npage {} of {} ({} products)",
            meta.page,
            meta.total_pages(),
            meta.total
        );
    }
    Ok(())
}

async fn run_show(ctx: &Context, slug: &str) -> anyhow::Result<()> {
    let Some(product) = ctx.client.get_product(slug).await? else {
        anyhow::bail!("product '{slug}' not found");
    };
    print_product(&product);
    Ok(())
}

fn print_product(product: &Product) {
    println!("{} ({})", product.name, product.code);
    if product.has_discount() {
        println!(
            "price: {} (was {})",
            format_price(product.effective_price()),
            format_price(product.price)
        );
    } else {
        println!("price: {}", format_price(product.price));
    }
    println!("stock: {}", product.available_stock());
    for variant in &product.variants {
        println!("{}:", variant.name);
        for value in &variant.values {
            let label = if value.name.is_empty() {
                &value.value
            } else {
                &value.name
            };
            println!("  {:<20} {:>4} left", label, value.quantity);
        }
    }
    println!("path: {}", product.path());
}

async fn run_combo(ctx: &Context, slug: &str) -> anyhow::Result<()> {
    let combo = ctx.client.get_combo(slug).await?;
    let selection = booth_core::ComboSelection::new(&combo);

    println!("{}", combo.name);
    println!("{:<28} {:>12} {:>12}", "ITEM", "PRICE", "LIST");
    println!("{}", "-".repeat(54));
    for item in selection.items() {
        println!(
            "{:<28} {:>12} {:>12}",
            truncate(&item.product.name, 28),
            format_price(item.product.effective_price()),
            format_price(item.product.price),
        );
    }
    println!("\nbundle total: {}", format_price(selection.total_price()));
    let savings = selection.savings_percentage();
    if savings > 0 {
        println!("you save {savings}%");
    }
    Ok(())
}

async fn run_categories(ctx: &Context) -> anyhow::Result<()> {
    let categories = ctx.client.categories().await?;
    if categories.is_empty() {
        println!("No categories.");
    }
    for category in &categories {
        print_category(category, 0);
    }
    Ok(())
}

fn print_category(category: &Category, depth: usize) {
    println!(
        "{}{} [{}]",
        "  ".repeat(depth),
        category.name,
        category.slug.as_deref().unwrap_or(&category.id)
    );
    for child in &category.children {
        print_category(child, depth + 1);
    }
}

pub(crate) fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        return s.to_owned();
    }
    let cut: String = s.chars().take(max.saturating_sub(1)).collect();
    format!("{cut}…")
}
