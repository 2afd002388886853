//! Analytics endpoints.

use seller_console_core::{CategoryAnalytics, CategoryAnalyticsParams, TopProducts, TopProductsParams};
use tracing::instrument;

use crate::gateway::{ApiClient, ApiError};

impl ApiClient {
    /// Best-selling products for a period.
    ///
    /// # Errors
    ///
    /// Returns `ApiError` if the request fails.
    #[instrument(skip(self))]
    pub async fn top_products(&self, params: &TopProductsParams) -> Result<TopProducts, ApiError> {
        self.get_with_query(&["api", "analytics", "top-products"], params)
            .await
    }

    /// Revenue and margin per category.
    ///
    /// # Errors
    ///
    /// Returns `ApiError` if the request fails.
    #[instrument(skip(self))]
    pub async fn category_analytics(
        &self,
        params: &CategoryAnalyticsParams,
    ) -> Result<CategoryAnalytics, ApiError> {
        self.get_with_query(&["api", "analytics", "categories"], params)
            .await
    }
}
