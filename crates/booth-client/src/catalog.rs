//! Product, combo and category lookups.

use booth_core::{Category, ComboProduct, PageMeta, Product, ProductQuery};

use crate::client::StorefrontClient;
use crate::error::ClientError;

/// One page of a product listing.
#[derive(Debug, Clone, PartialEq)]
pub struct ProductPage {
    pub products: Vec<Product>,
    pub meta: Option<PageMeta>,
}

impl StorefrontClient {
    /// A query for the first page, sized by the configured page size.
    #[must_use]
    pub fn product_query(&self) -> ProductQuery {
        ProductQuery {
            limit: self.page_size(),
            ..ProductQuery::default()
        }
    }

    /// Lists products matching `query` via `GET /product/all`.
    ///
    /// # Errors
    ///
    /// - [`ClientError::Api`] if the backend rejects the request.
    /// - [`ClientError::Http`] on network failure.
    /// - [`ClientError::Deserialize`] if the response does not match the
    ///   expected shape.
    pub async fn list_products(&self, query: &ProductQuery) -> Result<ProductPage, ClientError> {
        let url = self.api_url(&["product", "all"])?;
        let body = self.get_json(&url, &query.to_query_pairs()).await?;
        let envelope = Self::decode::<Vec<Product>>(body, "product/all")?;
        Ok(ProductPage {
            products: envelope.data,
            meta: envelope.meta,
        })
    }

    /// Fetches one product by slug or id.
    ///
    /// Falls back to scanning the full listing when the detail endpoint
    /// answers 404, matching on `_id` or `slug`. `None` when neither finds it.
    ///
    /// # Errors
    ///
    /// Same as [`StorefrontClient::list_products`].
    pub async fn get_product(&self, slug: &str) -> Result<Option<Product>, ClientError> {
        let url = self.api_url(&["product", slug])?;
        match self.get_json(&url, &[]).await {
            Ok(body) => {
                let envelope = Self::decode::<Product>(body, &format!("product/{slug}"))?;
                Ok(Some(envelope.data))
            }
            Err(ClientError::NotFound { .. }) => {
                tracing::debug!(slug, "product detail not found, scanning listing");
                let all_url = self.api_url(&["product", "all"])?;
                let body = self.get_json(&all_url, &[]).await?;
                let products = Self::decode::<Vec<Product>>(body, "product/all")?.data;
                Ok(products
                    .into_iter()
                    .find(|p| p.id == slug || p.slug.as_deref() == Some(slug)))
            }
            Err(e) => Err(e),
        }
    }

    /// Fetches a combo bundle and its items via `GET /combo/{slug}`.
    ///
    /// # Errors
    ///
    /// [`ClientError::NotFound`] for an unknown slug, otherwise as
    /// [`StorefrontClient::list_products`].
    pub async fn get_combo(&self, slug: &str) -> Result<ComboProduct, ClientError> {
        let url = self.api_url(&["combo", slug])?;
        let body = self.get_json(&url, &[]).await?;
        Ok(Self::decode::<ComboProduct>(body, &format!("combo/{slug}"))?.data)
    }

    /// # Errors
    ///
    /// Same as [`StorefrontClient::list_products`].
    pub async fn categories(&self) -> Result<Vec<Category>, ClientError> {
        let url = self.api_url(&["category", "categories"])?;
        let body = self.get_json(&url, &[]).await?;
        Ok(Self::decode::<Vec<Category>>(body, "category/categories")?.data)
    }

    /// Looks up a category by id or slug anywhere in the category tree.
    ///
    /// # Errors
    ///
    /// Same as [`StorefrontClient::list_products`].
    pub async fn find_category(&self, key: &str) -> Result<Option<Category>, ClientError> {
        let tree = self.categories().await?;
        Ok(tree.iter().find_map(|c| c.find(key)).cloned())
    }
}
