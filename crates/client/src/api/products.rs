//! Product catalog endpoints.

use reqwest::multipart::{Form, Part};
use seller_console_core::{
    BatchReport, BulkProductUpdate, CategoriesResponse, Category, ProductDetail, ProductDraft,
    ProductId, ProductImage, ProductsFilters, ProductsPage, SizeChart,
};
use serde::{Deserialize, Serialize};
use tracing::{info, instrument};

use crate::gateway::{ApiClient, ApiError};

/// Create and update responses wrap the product with a status message.
#[derive(Deserialize)]
struct ProductEnvelope {
    product: ProductDetail,
}

#[derive(Deserialize)]
struct ImagesEnvelope {
    #[serde(default)]
    images: Vec<ProductImage>,
}

#[derive(Serialize)]
struct BulkRequest<'a> {
    updates: &'a [BulkProductUpdate],
}

/// One file for [`ApiClient::upload_product_images`].
#[derive(Debug, Clone)]
pub struct ImageUpload {
    pub file_name: String,
    pub bytes: Vec<u8>,
    pub alt: String,
    pub is_main: bool,
}

/// File format for catalog export.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExportFormat {
    #[default]
    Csv,
    Xlsx,
}

impl ExportFormat {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Csv => "csv",
            Self::Xlsx => "xlsx",
        }
    }
}

impl std::str::FromStr for ExportFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "csv" => Ok(Self::Csv),
            "xlsx" => Ok(Self::Xlsx),
            other => Err(format!("unknown export format: {other}")),
        }
    }
}

impl ApiClient {
    /// List catalog products matching `filters`.
    ///
    /// # Errors
    ///
    /// Returns `ApiError` if the request fails.
    #[instrument(skip(self))]
    pub async fn list_products(&self, filters: &ProductsFilters) -> Result<ProductsPage, ApiError> {
        self.get_with_query(&["api", "products"], filters).await
    }

    /// Fetch a product with variants and images.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::NotFound` for an unknown id.
    #[instrument(skip(self), fields(product_id = %id))]
    pub async fn get_product(&self, id: &ProductId) -> Result<ProductDetail, ApiError> {
        self.get(&["api", "products", id.as_str()]).await
    }

    /// Create a product. The draft is validated before anything is sent.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Validation` for a draft with blank required fields.
    #[instrument(skip(self, draft), fields(sku = %draft.sku))]
    pub async fn create_product(&self, draft: &ProductDraft) -> Result<ProductDetail, ApiError> {
        draft.validate()?;
        let envelope: ProductEnvelope = self.post(&["api", "products"], draft).await?;
        info!(product_id = %envelope.product.product.id, "Product created");
        Ok(envelope.product)
    }

    /// Replace a product's editable fields.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Validation` for an invalid draft, or `ApiError` if
    /// the request fails.
    #[instrument(skip(self, draft), fields(product_id = %id))]
    pub async fn update_product(
        &self,
        id: &ProductId,
        draft: &ProductDraft,
    ) -> Result<ProductDetail, ApiError> {
        draft.validate()?;
        let envelope: ProductEnvelope = self.put(&["api", "products", id.as_str()], draft).await?;
        Ok(envelope.product)
    }

    /// Delete a product.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::NotFound` for an unknown id.
    #[instrument(skip(self), fields(product_id = %id))]
    pub async fn delete_product(&self, id: &ProductId) -> Result<(), ApiError> {
        self.delete(&["api", "products", id.as_str()]).await?;
        info!(product_id = %id, "Product deleted");
        Ok(())
    }

    /// Upload product photos.
    ///
    /// Files go in repeated `files` parts; alt texts and main-image flags
    /// travel as JSON arrays in the same order.
    ///
    /// # Errors
    ///
    /// Returns `ApiError` if the request fails.
    #[instrument(skip(self, images), fields(product_id = %id, count = images.len()))]
    pub async fn upload_product_images(
        &self,
        id: &ProductId,
        images: Vec<ImageUpload>,
    ) -> Result<Vec<ProductImage>, ApiError> {
        let alt_texts: Vec<&str> = images.iter().map(|i| i.alt.as_str()).collect();
        let is_main: Vec<bool> = images.iter().map(|i| i.is_main).collect();
        let alt_texts = serde_json::to_string(&alt_texts)?;
        let is_main = serde_json::to_string(&is_main)?;

        let form = images.into_iter().fold(Form::new(), |form, image| {
            form.part("files", Part::bytes(image.bytes).file_name(image.file_name))
        });
        let form = form.text("alt_texts", alt_texts).text("is_main", is_main);

        let envelope: ImagesEnvelope = self
            .post_multipart(&["api", "products", id.as_str(), "images"], form)
            .await?;
        Ok(envelope.images)
    }

    /// Apply price, status and stock changes to many products at once.
    ///
    /// # Errors
    ///
    /// Returns `ApiError` if the request fails.
    #[instrument(skip(self, updates), fields(count = updates.len()))]
    pub async fn bulk_update_products(
        &self,
        updates: &[BulkProductUpdate],
    ) -> Result<BatchReport, ApiError> {
        self.post(&["api", "products", "bulk"], &BulkRequest { updates })
            .await
    }

    /// Import a CSV or XLSX catalog file.
    ///
    /// # Errors
    ///
    /// Returns `ApiError` if the request fails.
    #[instrument(skip(self, bytes), fields(file_name = %file_name, size = bytes.len()))]
    pub async fn import_products(
        &self,
        file_name: &str,
        bytes: Vec<u8>,
    ) -> Result<BatchReport, ApiError> {
        let form = Form::new().part("file", Part::bytes(bytes).file_name(file_name.to_owned()));
        self.post_multipart(&["api", "products", "import"], form)
            .await
    }

    /// Download the catalog as a file.
    ///
    /// # Errors
    ///
    /// Returns `ApiError` if the request fails.
    #[instrument(skip(self), fields(format = format.as_str()))]
    pub async fn export_products(&self, format: ExportFormat) -> Result<Vec<u8>, ApiError> {
        self.get_bytes(&["api", "products", "export"], &[("format", format.as_str())])
            .await
    }

    /// Category tree for product forms.
    ///
    /// # Errors
    ///
    /// Returns `ApiError` if the request fails.
    #[instrument(skip(self))]
    pub async fn product_categories(&self) -> Result<Vec<Category>, ApiError> {
        let response: CategoriesResponse = self.get(&["api", "products", "categories"]).await?;
        Ok(response.categories)
    }

    /// Size chart for a category.
    ///
    /// # Errors
    ///
    /// Returns `ApiError` if the request fails.
    #[instrument(skip(self))]
    pub async fn size_chart(&self, category: &str) -> Result<SizeChart, ApiError> {
        self.get_with_query(&["api", "products", "sizes"], &[("category", category)])
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_export_format_parse() {
        assert_eq!("CSV".parse::<ExportFormat>(), Ok(ExportFormat::Csv));
        assert_eq!("xlsx".parse::<ExportFormat>(), Ok(ExportFormat::Xlsx));
        assert!("pdf".parse::<ExportFormat>().is_err());
    }
}
