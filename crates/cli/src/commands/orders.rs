//! Order commands.

use seller_console_client::Resource;
use seller_console_client::resource::{OrderFetch, OrdersFetch};
use seller_console_core::{Order, OrderId, OrderStatus, OrdersFilters, UpdateOrderStatus};

use super::{CliError, Context, settle};

pub async fn list(
    ctx: &Context,
    status: Option<OrderStatus>,
    limit: u32,
    offset: u64,
) -> Result<(), CliError> {
    ctx.require_login()?;
    let filters = OrdersFilters {
        status,
        limit: Some(limit),
        offset: Some(offset),
        ..OrdersFilters::default()
    };

    let (resource, handle) = Resource::mount(OrdersFetch(ctx.api.clone()), filters);
    let page = settle(&resource, handle).await?;

    if page.orders.is_empty() {
        println!("No orders");
        return Ok(());
    }
    for order in &page.orders {
        println!(
            "{:<12} {:<10} {:<11} {:>4} pcs {:>12}",
            order.order_number,
            order.status,
            order.date.format("%Y-%m-%d"),
            order.unit_count(),
            order.totals.total,
        );
    }
    println!(
        "{} of {} orders, total {}",
        page.orders.len(),
        page.pagination.total,
        page.summary.total_amount
    );
    if let Some(next) = page.pagination.next_offset() {
        println!("More: --offset {next}");
    }
    Ok(())
}

pub async fn show(ctx: &Context, id: OrderId) -> Result<(), CliError> {
    ctx.require_login()?;
    let (resource, handle) = Resource::mount(OrderFetch(ctx.api.clone()), id);
    let order = settle(&resource, handle).await?;
    print_order(&order);
    Ok(())
}

pub async fn set_status(
    ctx: &Context,
    id: OrderId,
    status: OrderStatus,
    comment: Option<String>,
) -> Result<(), CliError> {
    ctx.require_login()?;
    let (resource, handle) = Resource::mount(OrderFetch(ctx.api.clone()), id);
    let order = settle(&resource, handle).await?;
    if order.status.is_final() {
        return Err(CliError::InvalidArgument(format!(
            "order {} is already {}",
            order.order_number, order.status
        )));
    }

    let update = UpdateOrderStatus {
        comment,
        ..UpdateOrderStatus::to(status)
    };
    resource.update_status(&update).await?;

    if let Some(order) = resource.snapshot().data {
        println!("Order {} is now {}", order.order_number, order.status);
    }
    Ok(())
}

fn print_order(order: &Order) {
    println!("Order {} ({})", order.order_number, order.id);
    println!("  Status:   {}", order.status);
    println!("  Date:     {}", order.date.format("%Y-%m-%d %H:%M"));
    println!("  Customer: {} {}", order.customer.name, order.customer.phone);
    println!(
        "  Delivery: {} {}, {}",
        order.delivery.kind, order.delivery.address.city, order.delivery.address.street
    );
    for item in &order.items {
        println!(
            "  - {} {} x{} = {}",
            item.name, item.size, item.quantity, item.total
        );
    }
    println!("  Total:    {}", order.totals.total);
    for change in &order.status_history {
        println!(
            "  {} {} {}",
            change.date.format("%Y-%m-%d %H:%M"),
            change.status,
            change.comment
        );
    }
}
