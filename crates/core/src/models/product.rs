//! Catalog models for `/api/products`.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::Pagination;
use crate::types::{ProductId, ProductStatus, SortOrder, StockStatus, ValidationError, VariantId};
use crate::types::validation::require;

/// Catalog list entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    #[serde(default)]
    pub brand: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub subcategory: String,
    #[serde(default)]
    pub sku: String,
    pub price: Decimal,
    #[serde(default)]
    pub cost_price: Decimal,
    #[serde(default)]
    pub currency: String,
    #[serde(default)]
    pub main_image: Option<String>,
    #[serde(default, alias = "stock")]
    pub total_stock: i64,
    #[serde(default)]
    pub available_sizes: Vec<String>,
    #[serde(default)]
    pub available_colors: Vec<String>,
    #[serde(default)]
    pub sales_count_30d: u64,
    #[serde(default)]
    pub revenue_30d: Decimal,
    #[serde(default)]
    pub rating: f64,
    #[serde(default)]
    pub status: ProductStatus,
    #[serde(default)]
    pub created_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_date: Option<DateTime<Utc>>,
}

impl Product {
    /// Margin over cost as a percentage of price, when price is non-zero.
    #[must_use]
    pub fn margin_percent(&self) -> Option<Decimal> {
        if self.price.is_zero() {
            return None;
        }
        Some((self.price - self.cost_price) / self.price * Decimal::ONE_HUNDRED)
    }
}

/// Full product card from `GET /api/products/{id}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductDetail {
    #[serde(flatten)]
    pub product: Product,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub barcode: String,
    #[serde(default)]
    pub images: Vec<ProductImage>,
    #[serde(default)]
    pub variants: Vec<ProductVariant>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub material: String,
    #[serde(default)]
    pub care_instructions: String,
    #[serde(default)]
    pub country_origin: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductImage {
    pub id: String,
    pub url: String,
    #[serde(default)]
    pub alt: String,
    #[serde(default)]
    pub is_main: bool,
    #[serde(default)]
    pub order: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductVariant {
    #[serde(default)]
    pub id: Option<VariantId>,
    pub sku: String,
    pub size: String,
    #[serde(default)]
    pub color: String,
    #[serde(default)]
    pub color_hex: String,
    #[serde(default)]
    pub stock: i64,
    #[serde(default)]
    pub reserved: i64,
    #[serde(default)]
    pub available: i64,
    #[serde(default)]
    pub price: Option<Decimal>,
}

/// Facet counters returned with a product page.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProductFacets {
    #[serde(default)]
    pub categories: Vec<Facet>,
    #[serde(default)]
    pub brands: Vec<Facet>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Facet {
    pub id: String,
    pub name: String,
    pub count: u64,
}

/// Response of `GET /api/products`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProductsPage {
    pub products: Vec<Product>,
    #[serde(default)]
    pub pagination: Pagination,
    #[serde(default)]
    pub filters: ProductFacets,
}

/// Sortable columns of the product list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProductSortField {
    Name,
    Price,
    Stock,
    Sales,
    CreatedDate,
}

/// Query filters for `GET /api/products`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ProductsFilters {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub search: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub brand: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_price: Option<Decimal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_price: Option<Decimal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stock_status: Option<StockStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sort_by: Option<ProductSortField>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sort_order: Option<SortOrder>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub offset: Option<u64>,
}

/// Body of `POST /api/products` and (with every field optional on the
/// server) `PUT /api/products/{id}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductDraft {
    pub name: String,
    pub description: String,
    pub brand: String,
    pub category: String,
    #[serde(default)]
    pub subcategory: String,
    pub sku: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub price: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub cost_price: Decimal,
    pub currency: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
    #[serde(default)]
    pub variants: Vec<VariantDraft>,
}

impl ProductDraft {
    /// Check the fields the backend refuses to accept blank.
    ///
    /// # Errors
    ///
    /// Returns the first [`ValidationError`] found.
    pub fn validate(&self) -> Result<(), ValidationError> {
        require("name", &self.name)?;
        require("brand", &self.brand)?;
        require("category", &self.category)?;
        require("sku", &self.sku)?;
        if self.price <= Decimal::ZERO {
            return Err(ValidationError::NonPositiveAmount("price"));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VariantDraft {
    pub sku: String,
    pub size: String,
    pub color: String,
    #[serde(default)]
    pub color_hex: String,
    pub stock: i64,
}

/// One row of `POST /api/products/bulk`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BulkProductUpdate {
    pub id: ProductId,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "rust_decimal::serde::float_option"
    )]
    pub price: Option<Decimal>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<ProductStatus>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stock: Option<i64>,
}

/// Outcome of bulk updates and file imports.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchReport {
    #[serde(default)]
    pub updated: u64,
    #[serde(default)]
    pub created: u64,
    #[serde(default)]
    pub failed: u64,
    #[serde(default)]
    pub errors: Vec<String>,
}

/// Catalog tree from `GET /api/products/categories`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub subcategories: Vec<Category>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoriesResponse {
    #[serde(default)]
    pub categories: Vec<Category>,
}

/// Size chart from `GET /api/products/sizes?category=...`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SizeChart {
    pub category: String,
    #[serde(default)]
    pub size_chart: serde_json::Value,
}
