//! Dashboard endpoints.

use seller_console_core::{AnalyticsFilters, DashboardStats, SalesChart, SalesChartParams};
use tracing::instrument;

use crate::gateway::{ApiClient, ApiError};

impl ApiClient {
    /// KPI block for the dashboard.
    ///
    /// # Errors
    ///
    /// Returns `ApiError` if the request fails.
    #[instrument(skip(self))]
    pub async fn dashboard_stats(&self, filters: &AnalyticsFilters) -> Result<DashboardStats, ApiError> {
        self.get_with_query(&["api", "dashboard", "stats"], filters)
            .await
    }

    /// Sales time series for the dashboard chart.
    ///
    /// # Errors
    ///
    /// Returns `ApiError` if the request fails.
    #[instrument(skip(self))]
    pub async fn sales_chart(&self, params: &SalesChartParams) -> Result<SalesChart, ApiError> {
        self.get_with_query(&["api", "dashboard", "sales-chart"], params)
            .await
    }
}
