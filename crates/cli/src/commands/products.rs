//! Catalog commands.

use std::path::Path;

use seller_console_client::Resource;
use seller_console_client::api::ExportFormat;
use seller_console_client::resource::{ProductFetch, ProductsFetch};
use seller_console_core::{ProductId, ProductsFilters};

use super::{CliError, Context, settle};

pub async fn list(
    ctx: &Context,
    search: Option<String>,
    category: Option<String>,
    limit: u32,
) -> Result<(), CliError> {
    ctx.require_login()?;
    let filters = ProductsFilters {
        search,
        category,
        limit: Some(limit),
        ..ProductsFilters::default()
    };

    let (resource, handle) = Resource::mount(ProductsFetch(ctx.api.clone()), filters);
    let page = settle(&resource, handle).await?;

    for product in &page.products {
        println!(
            "{:<14} {:<32} {:>10} {:>5} in stock  {:?}",
            product.sku, product.name, product.price, product.total_stock, product.status
        );
    }
    println!("{} of {} products", page.products.len(), page.pagination.total);
    Ok(())
}

pub async fn show(ctx: &Context, id: ProductId) -> Result<(), CliError> {
    ctx.require_login()?;
    let (resource, handle) = Resource::mount(ProductFetch(ctx.api.clone()), id);
    let detail = settle(&resource, handle).await?;
    let product = &detail.product;

    println!("{} ({})", product.name, product.id);
    println!("  Brand:    {}", product.brand);
    println!("  Category: {} / {}", product.category, product.subcategory);
    println!("  Price:    {} {}", product.price, product.currency);
    if let Some(margin) = product.margin_percent() {
        println!("  Margin:   {}%", margin.round_dp(1));
    }
    println!("  Stock:    {}", product.total_stock);
    for variant in &detail.variants {
        println!(
            "  - {} {} {}: {} available",
            variant.sku, variant.size, variant.color, variant.available
        );
    }
    Ok(())
}

pub async fn delete(ctx: &Context, id: &ProductId) -> Result<(), CliError> {
    ctx.require_login()?;
    ctx.api.delete_product(id).await?;
    println!("Deleted {id}");
    Ok(())
}

pub async fn export(ctx: &Context, format: ExportFormat, output: &Path) -> Result<(), CliError> {
    ctx.require_login()?;
    let bytes = ctx.api.export_products(format).await?;
    tokio::fs::write(output, &bytes).await?;
    println!("Wrote {} bytes to {}", bytes.len(), output.display());
    Ok(())
}
