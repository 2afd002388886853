//! Analytics models for `/api/analytics/*`.

use serde::{Deserialize, Serialize};

use crate::types::{ProductId, TrendWindow};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RankingMetric {
    Revenue,
    Quantity,
    Profit,
    Margin,
}

/// Query of `GET /api/analytics/top-products`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TopProductsParams {
    pub period: TrendWindow,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metric: Option<RankingMetric>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TopProduct {
    pub id: ProductId,
    pub name: String,
    #[serde(default)]
    pub brand: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub sales_count: u64,
    #[serde(default)]
    pub revenue: f64,
    #[serde(default)]
    pub profit: f64,
    #[serde(default)]
    pub margin_percent: f64,
    #[serde(default)]
    pub return_rate: f64,
    #[serde(default)]
    pub rank: u32,
    /// Positive means the product dropped, negative means it climbed.
    #[serde(default)]
    pub rank_change: i32,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TopProductsSummary {
    #[serde(default)]
    pub total_revenue: f64,
    #[serde(default)]
    pub total_sales: u64,
    #[serde(default)]
    pub total_profit: f64,
    #[serde(default)]
    pub avg_margin: f64,
}

/// Response of `GET /api/analytics/top-products`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TopProducts {
    #[serde(default)]
    pub period: String,
    #[serde(default)]
    pub products: Vec<TopProduct>,
    #[serde(default)]
    pub summary: TopProductsSummary,
}

/// Query of `GET /api/analytics/categories`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CategoryAnalyticsParams {
    pub period: TrendWindow,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sort_by: Option<RankingMetric>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CategoryPerformance {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub revenue: f64,
    #[serde(default)]
    pub quantity: u64,
    #[serde(default)]
    pub margin_percent: f64,
    #[serde(default)]
    pub return_rate: f64,
    #[serde(default)]
    pub revenue_share: f64,
}

/// Response of `GET /api/analytics/categories`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CategoryAnalytics {
    #[serde(default)]
    pub period: String,
    #[serde(default)]
    pub categories: Vec<CategoryPerformance>,
}
