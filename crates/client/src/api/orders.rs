//! Order endpoints.

use seller_console_core::{Order, OrderId, OrdersFilters, OrdersPage, StatusUpdated, UpdateOrderStatus};
use serde::Deserialize;
use tracing::instrument;

use crate::gateway::{ApiClient, ApiError};

#[derive(Deserialize)]
struct StatusUpdateResponse {
    order: StatusUpdated,
}

impl ApiClient {
    /// List orders matching `filters`.
    ///
    /// # Errors
    ///
    /// Returns `ApiError` if the request fails.
    #[instrument(skip(self))]
    pub async fn list_orders(&self, filters: &OrdersFilters) -> Result<OrdersPage, ApiError> {
        self.get_with_query(&["api", "orders"], filters).await
    }

    /// Fetch one order with its full history.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::NotFound` for an unknown id.
    #[instrument(skip(self), fields(order_id = %id))]
    pub async fn get_order(&self, id: &OrderId) -> Result<Order, ApiError> {
        self.get(&["api", "orders", id.as_str()]).await
    }

    /// Move an order to a new status.
    ///
    /// # Errors
    ///
    /// Returns `ApiError` if the backend refuses the transition.
    #[instrument(skip(self, update), fields(order_id = %id, status = %update.status))]
    pub async fn update_order_status(
        &self,
        id: &OrderId,
        update: &UpdateOrderStatus,
    ) -> Result<StatusUpdated, ApiError> {
        let response: StatusUpdateResponse = self
            .put(&["api", "orders", id.as_str(), "status"], update)
            .await?;
        Ok(response.order)
    }
}
