//! Dashboard and analytics commands.

use seller_console_client::resource::DashboardFetch;
use seller_console_client::{Resource, ResponseCache};
use seller_console_core::{AnalyticsFilters, Metric, StatsPeriod, TopProductsParams, TrendWindow};

use super::{CliError, Context, settle};

pub async fn stats(ctx: &Context, period: StatsPeriod) -> Result<(), CliError> {
    ctx.require_login()?;
    let cache = ResponseCache::new(ctx.config.dashboard_cache_ttl);
    let (resource, handle) = Resource::mount_cached(
        DashboardFetch(ctx.api.clone()),
        AnalyticsFilters::for_period(period),
        cache,
    );
    let stats = settle(&resource, handle).await?;

    print_metric("Revenue", &stats.revenue);
    print_metric("Orders", &stats.orders);
    print_metric("Items sold", &stats.items_sold);
    print_metric("Avg order", &stats.avg_order_value);
    print_metric("Conversion", &stats.conversion_rate);
    print_metric("Returns", &stats.return_rate);

    if !stats.top_categories.is_empty() {
        println!("Top categories:");
        for category in &stats.top_categories {
            println!(
                "  {:<24} {:>12.2} ({} orders)",
                category.name, category.revenue, category.orders
            );
        }
    }
    if let Some(peak) = stats.peak_hour() {
        println!("Peak hour: {:02}:00 ({:.2})", peak.hour, peak.revenue);
    }
    Ok(())
}

fn print_metric(label: &str, metric: &Metric) {
    println!(
        "{label:<12} {:>14.2} {:>+8.1}% ({:?})",
        metric.current, metric.change_percent, metric.trend
    );
}

pub async fn top_products(ctx: &Context, period: TrendWindow, limit: u32) -> Result<(), CliError> {
    ctx.require_login()?;
    let params = TopProductsParams {
        period,
        metric: None,
        category: None,
        limit: Some(limit),
    };
    let top = ctx.api.top_products(&params).await?;

    for product in &top.products {
        println!(
            "{:>3}. {:<32} {:>6} sold {:>12.2}",
            product.rank, product.name, product.sales_count, product.revenue
        );
    }
    println!(
        "Total: {} sold, {:.2} revenue, {:.1}% avg margin",
        top.summary.total_sales, top.summary.total_revenue, top.summary.avg_margin
    );
    Ok(())
}
