//! Fetchers for the dashboard screens.

use chrono::Utc;
use seller_console_core::{
    AnalyticsFilters, DashboardStats, Order, OrderId, OrdersFilters, OrdersPage, ProductDetail,
    ProductId, ProductsFilters, ProductsPage, Profile, UpdateOrderStatus,
};
use tracing::instrument;

use super::{Fetch, Resource};
use crate::gateway::{ApiClient, ApiError};

/// Dashboard KPIs. Pair with a [`ResponseCache`](super::ResponseCache).
#[derive(Debug, Clone)]
pub struct DashboardFetch(pub ApiClient);

impl Fetch for DashboardFetch {
    type Filters = AnalyticsFilters;
    type Output = DashboardStats;

    async fn fetch(&self, filters: AnalyticsFilters) -> Result<DashboardStats, ApiError> {
        self.0.dashboard_stats(&filters).await
    }

    fn failure_message() -> &'static str {
        "Failed to load dashboard data"
    }
}

/// Order list.
#[derive(Debug, Clone)]
pub struct OrdersFetch(pub ApiClient);

impl Fetch for OrdersFetch {
    type Filters = OrdersFilters;
    type Output = OrdersPage;

    async fn fetch(&self, filters: OrdersFilters) -> Result<OrdersPage, ApiError> {
        self.0.list_orders(&filters).await
    }

    fn failure_message() -> &'static str {
        "Failed to load orders"
    }
}

/// A single order.
#[derive(Debug, Clone)]
pub struct OrderFetch(pub ApiClient);

impl Fetch for OrderFetch {
    type Filters = OrderId;
    type Output = Order;

    async fn fetch(&self, id: OrderId) -> Result<Order, ApiError> {
        self.0.get_order(&id).await
    }

    fn failure_message() -> &'static str {
        "Failed to load order details"
    }
}

/// Product list.
#[derive(Debug, Clone)]
pub struct ProductsFetch(pub ApiClient);

impl Fetch for ProductsFetch {
    type Filters = ProductsFilters;
    type Output = ProductsPage;

    async fn fetch(&self, filters: ProductsFilters) -> Result<ProductsPage, ApiError> {
        self.0.list_products(&filters).await
    }

    fn failure_message() -> &'static str {
        "Failed to load products"
    }
}

/// A single product.
#[derive(Debug, Clone)]
pub struct ProductFetch(pub ApiClient);

impl Fetch for ProductFetch {
    type Filters = ProductId;
    type Output = ProductDetail;

    async fn fetch(&self, id: ProductId) -> Result<ProductDetail, ApiError> {
        self.0.get_product(&id).await
    }

    fn failure_message() -> &'static str {
        "Failed to load product details"
    }
}

/// The seller's profile.
#[derive(Debug, Clone)]
pub struct ProfileFetch(pub ApiClient);

impl Fetch for ProfileFetch {
    type Filters = ();
    type Output = Profile;

    async fn fetch(&self, (): ()) -> Result<Profile, ApiError> {
        self.0.profile().await
    }

    fn failure_message() -> &'static str {
        "Failed to load profile"
    }
}

impl Resource<OrdersFetch> {
    /// Change an order's status and patch the loaded list to match.
    ///
    /// # Errors
    ///
    /// Returns `ApiError` if the backend refuses; the list is left untouched.
    #[instrument(skip(self, update), fields(order_id = %id))]
    pub async fn update_status(
        &self,
        id: &OrderId,
        update: &UpdateOrderStatus,
    ) -> Result<(), ApiError> {
        let ack = self.fetcher().0.update_order_status(id, update).await?;
        let at = ack.updated_date.unwrap_or_else(Utc::now);
        self.mutate(|page| {
            if let Some(order) = page.orders.iter_mut().find(|o| &o.id == id) {
                order.record_status(ack.status, at);
            }
        });
        Ok(())
    }
}

impl Resource<OrderFetch> {
    /// Change the loaded order's status and patch it locally.
    ///
    /// # Errors
    ///
    /// Returns `ApiError` if the backend refuses; the order is left untouched.
    #[instrument(skip(self, update))]
    pub async fn update_status(&self, update: &UpdateOrderStatus) -> Result<(), ApiError> {
        let id = self.filters();
        let ack = self.fetcher().0.update_order_status(&id, update).await?;
        let at = ack.updated_date.unwrap_or_else(Utc::now);
        self.mutate(|order| {
            if order.id == id {
                order.record_status(ack.status, at);
            }
        });
        Ok(())
    }
}
