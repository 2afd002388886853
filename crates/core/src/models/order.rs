//! Order models for `/api/orders`.

use std::collections::BTreeMap;

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::Pagination;
use crate::types::{CustomerId, OrderId, OrderStatus, PaymentStatus, ProductId, SortOrder, VariantId};

/// A marketplace order as seen by the seller.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
    pub id: OrderId,
    pub order_number: String,
    pub date: DateTime<Utc>,
    pub status: OrderStatus,
    #[serde(default)]
    pub status_history: Vec<StatusChange>,
    #[serde(default)]
    pub customer: Customer,
    #[serde(default)]
    pub delivery: Delivery,
    #[serde(default)]
    pub items: Vec<OrderItem>,
    #[serde(default)]
    pub payment: Payment,
    #[serde(default)]
    pub totals: Totals,
    #[serde(default)]
    pub notes: String,
    #[serde(default)]
    pub created_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_date: Option<DateTime<Utc>>,
}

impl Order {
    /// Apply a confirmed status change locally.
    pub fn record_status(&mut self, status: OrderStatus, at: DateTime<Utc>) {
        self.status = status;
        self.updated_date = Some(at);
    }

    /// Number of units across all lines.
    #[must_use]
    pub fn unit_count(&self) -> u32 {
        self.items.iter().map(|item| item.quantity).sum()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatusChange {
    pub status: OrderStatus,
    pub date: DateTime<Utc>,
    #[serde(default)]
    pub comment: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Customer {
    #[serde(default)]
    pub id: Option<CustomerId>,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub is_regular: bool,
    #[serde(default)]
    pub orders_count: u32,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Delivery {
    /// `courier`, `pickup` or `post`.
    #[serde(default, rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub address: Address,
    #[serde(default)]
    pub estimated_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub cost: Decimal,
    #[serde(default)]
    pub tracking_number: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Address {
    #[serde(default)]
    pub city: String,
    #[serde(default)]
    pub street: String,
    #[serde(default)]
    pub house: String,
    #[serde(default)]
    pub apartment: String,
    #[serde(default)]
    pub postal_code: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderItem {
    #[serde(default)]
    pub product_id: Option<ProductId>,
    #[serde(default)]
    pub variant_id: Option<VariantId>,
    pub name: String,
    #[serde(default)]
    pub brand: String,
    #[serde(default)]
    pub sku: String,
    #[serde(default)]
    pub size: String,
    #[serde(default)]
    pub color: String,
    pub quantity: u32,
    pub price: Decimal,
    #[serde(default)]
    pub discount: Decimal,
    pub total: Decimal,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Payment {
    /// `card`, `cash` or `online`.
    #[serde(default)]
    pub method: String,
    #[serde(default)]
    pub status: PaymentStatus,
    #[serde(default)]
    pub amount: Decimal,
    /// Marketplace fee withheld from the payment.
    #[serde(default, alias = "commission_lamoda")]
    pub commission: Decimal,
    #[serde(default)]
    pub seller_amount: Decimal,
    #[serde(default)]
    pub transaction_id: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Totals {
    #[serde(default)]
    pub subtotal: Decimal,
    #[serde(default)]
    pub discount: Decimal,
    #[serde(default)]
    pub delivery: Decimal,
    #[serde(default)]
    pub total: Decimal,
}

/// Response of `GET /api/orders`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OrdersPage {
    pub orders: Vec<Order>,
    #[serde(default)]
    pub summary: OrdersSummary,
    #[serde(default)]
    pub pagination: Pagination,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OrdersSummary {
    #[serde(default)]
    pub total_orders: u64,
    #[serde(default)]
    pub total_amount: Decimal,
    #[serde(default)]
    pub avg_order_value: Decimal,
    #[serde(default)]
    pub status_breakdown: BTreeMap<String, StatusBucket>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusBucket {
    pub count: u64,
    pub amount: Decimal,
}

/// Sortable columns of the order list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderSortField {
    Date,
    Amount,
    Status,
}

/// Query filters for `GET /api/orders`. Unset fields are left out of the
/// query string.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct OrdersFilters {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<OrderStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date_from: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date_to: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub customer_id: Option<CustomerId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub product_id: Option<ProductId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_amount: Option<Decimal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_amount: Option<Decimal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sort_by: Option<OrderSortField>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sort_order: Option<SortOrder>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub offset: Option<u64>,
}

/// Body of `PUT /api/orders/{id}/status`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateOrderStatus {
    pub status: OrderStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub estimated_delivery_date: Option<NaiveDate>,
}

impl UpdateOrderStatus {
    #[must_use]
    pub const fn to(status: OrderStatus) -> Self {
        Self {
            status,
            comment: None,
            estimated_delivery_date: None,
        }
    }
}

/// The `order` part of a status update response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusUpdated {
    pub id: OrderId,
    pub status: OrderStatus,
    #[serde(default)]
    pub updated_date: Option<DateTime<Utc>>,
}
