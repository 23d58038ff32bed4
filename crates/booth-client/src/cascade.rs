//! Async driver for [`AddressCascade`].
//!
//! A [`LocationSource`] answers one [`TierRequest`] at a time. The loader
//! applies each answer through the cascade's generation check, so an answer
//! to a superseded request never overwrites a newer one. A failed load
//! empties the tier and is logged; it never blocks the form.

use std::future::Future;

use booth_core::{
    AddressCascade, Applied, CascadeError, LocationDirectory, LocationNode, LocationTier,
    TierRequest,
};

use crate::client::StorefrontClient;
use crate::error::ClientError;

/// Something that can answer a tier request with location nodes.
pub trait LocationSource {
    fn fetch_tier(
        &self,
        request: &TierRequest,
    ) -> impl Future<Output = Result<Vec<LocationNode>, ClientError>> + Send;
}

/// Answers from the flat per-tier document, or from the nested document
/// when the flat one is missing or unusable.
impl LocationSource for StorefrontClient {
    fn fetch_tier(
        &self,
        request: &TierRequest,
    ) -> impl Future<Output = Result<Vec<LocationNode>, ClientError>> + Send {
        let request = request.clone();
        async move {
            match self.fetch_location_tier(request.tier).await {
                Ok(mut nodes) => {
                    if request.tier.parent().is_some() {
                        nodes.retain(|n| n.parent_id == request.parent_id);
                    }
                    Ok(nodes)
                }
                Err(e) if flat_document_unusable(&e) => {
                    tracing::debug!(
                        tier = %request.tier,
                        error = %e,
                        "flat location document unusable, reading nested document"
                    );
                    let directory = self.fetch_nested_locations().await?;
                    Ok(directory.fulfil(&request))
                }
                Err(e) => Err(e),
            }
        }
    }
}

fn flat_document_unusable(err: &ClientError) -> bool {
    matches!(
        err,
        ClientError::NotFound { .. }
            | ClientError::LocationData(_)
            | ClientError::Deserialize { .. }
    )
}

impl LocationSource for LocationDirectory {
    fn fetch_tier(
        &self,
        request: &TierRequest,
    ) -> impl Future<Output = Result<Vec<LocationNode>, ClientError>> + Send {
        std::future::ready(Ok(self.fulfil(request)))
    }
}

/// Owns an [`AddressCascade`] and fills each tier from a [`LocationSource`].
#[derive(Debug)]
pub struct CascadeLoader<S> {
    source: S,
    cascade: AddressCascade,
}

impl<S: LocationSource> CascadeLoader<S> {
    #[must_use]
    pub fn new(source: S) -> Self {
        Self {
            source,
            cascade: AddressCascade::new(),
        }
    }

    #[must_use]
    pub fn cascade(&self) -> &AddressCascade {
        &self.cascade
    }

    #[must_use]
    pub fn into_cascade(self) -> AddressCascade {
        self.cascade
    }

    /// Load the division list.
    pub async fn start(&mut self) -> Applied {
        let request = self.cascade.start();
        self.fulfil(request).await
    }

    /// Select a division and load its districts.
    ///
    /// # Errors
    ///
    /// [`CascadeError::UnknownOption`] when `id` is not a loaded division.
    pub async fn select_division(&mut self, id: &str) -> Result<Applied, CascadeError> {
        let request = self.cascade.select_division(id)?;
        Ok(self.fulfil(request).await)
    }

    /// Select a district and load its upazilas.
    ///
    /// # Errors
    ///
    /// [`CascadeError::UnknownOption`] when `id` is not a loaded district.
    pub async fn select_district(&mut self, id: &str) -> Result<Applied, CascadeError> {
        let request = self.cascade.select_district(id)?;
        Ok(self.fulfil(request).await)
    }

    /// Select an upazila and load its unions.
    ///
    /// # Errors
    ///
    /// [`CascadeError::UnknownOption`] when `id` is not a loaded upazila.
    pub async fn select_upazila(&mut self, id: &str) -> Result<Applied, CascadeError> {
        let request = self.cascade.select_upazila(id)?;
        Ok(self.fulfil(request).await)
    }

    /// # Errors
    ///
    /// [`CascadeError::UnknownOption`] when `id` is not a loaded union.
    pub fn select_union(&mut self, id: &str) -> Result<(), CascadeError> {
        self.cascade.select_union(id)
    }

    #[must_use]
    pub fn options(&self, tier: LocationTier) -> &[LocationNode] {
        self.cascade.options(tier)
    }

    async fn fulfil(&mut self, request: TierRequest) -> Applied {
        match self.source.fetch_tier(&request).await {
            Ok(nodes) => self.cascade.apply(&request, nodes),
            Err(e) => {
                tracing::warn!(tier = %request.tier, error = %e, "location tier unavailable");
                self.cascade.fail(&request)
            }
        }
    }
}
