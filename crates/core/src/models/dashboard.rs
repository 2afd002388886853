//! Dashboard KPI models for `/api/dashboard/*`.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::types::{StatsPeriod, TrendWindow};

/// Query filters for `GET /api/dashboard/stats`.
///
/// Also serves as the dashboard cache key, so field order is part of the
/// key format.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AnalyticsFilters {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub period: Option<StatsPeriod>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date_from: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date_to: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub compare_with_previous: Option<bool>,
}

impl AnalyticsFilters {
    #[must_use]
    pub const fn for_period(period: StatsPeriod) -> Self {
        Self {
            period: Some(period),
            date_from: None,
            date_to: None,
            compare_with_previous: None,
        }
    }
}

/// Direction of a KPI compared to the previous period.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Trend {
    Up,
    Down,
    #[default]
    Stable,
}

/// One KPI with its comparison to the previous period.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Metric {
    #[serde(default)]
    pub current: f64,
    #[serde(default)]
    pub previous: f64,
    #[serde(default)]
    pub change_percent: f64,
    #[serde(default)]
    pub change_absolute: f64,
    #[serde(default)]
    pub trend: Trend,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PeriodInfo {
    #[serde(default, rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub date_from: Option<DateTime<Utc>>,
    #[serde(default)]
    pub date_to: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TopCategory {
    pub category: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub revenue: f64,
    #[serde(default)]
    pub orders: u64,
    #[serde(default)]
    pub items: u64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct HourlySale {
    pub hour: u8,
    #[serde(default)]
    pub revenue: f64,
    #[serde(default)]
    pub orders: u64,
}

/// Response of `GET /api/dashboard/stats`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DashboardStats {
    #[serde(default)]
    pub period: PeriodInfo,
    #[serde(default)]
    pub revenue: Metric,
    #[serde(default)]
    pub orders: Metric,
    #[serde(default)]
    pub items_sold: Metric,
    #[serde(default)]
    pub avg_order_value: Metric,
    #[serde(default)]
    pub conversion_rate: Metric,
    #[serde(default)]
    pub return_rate: Metric,
    #[serde(default)]
    pub top_categories: Vec<TopCategory>,
    #[serde(default)]
    pub hourly_sales: Vec<HourlySale>,
}

impl DashboardStats {
    /// Hour of the day with the highest revenue.
    #[must_use]
    pub fn peak_hour(&self) -> Option<&HourlySale> {
        self.hourly_sales
            .iter()
            .max_by(|a, b| a.revenue.total_cmp(&b.revenue))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChartMetric {
    Revenue,
    Orders,
    Items,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Granularity {
    Hour,
    Day,
    Week,
    Month,
}

/// Query of `GET /api/dashboard/sales-chart`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SalesChartParams {
    pub period: TrendWindow,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metric: Option<ChartMetric>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub granularity: Option<Granularity>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SalesPoint {
    pub date: String,
    #[serde(default)]
    pub orders_revenue: f64,
    #[serde(default)]
    pub purchases_revenue: f64,
    #[serde(default)]
    pub orders_count: u64,
    #[serde(default)]
    pub purchases_count: u64,
    #[serde(default)]
    pub return_count: u64,
}

/// Response of `GET /api/dashboard/sales-chart`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SalesChart {
    #[serde(default)]
    pub period: String,
    #[serde(default)]
    pub metric: String,
    #[serde(default)]
    pub granularity: String,
    #[serde(default)]
    pub data: Vec<SalesPoint>,
}
