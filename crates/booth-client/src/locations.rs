//! Static location data: the consolidated nested document, or four flat
//! per-tier documents as a fallback.

use booth_core::{parse_nested, parse_tier, LocationDirectory, LocationNode, LocationTier};
use futures::future::join_all;

use crate::client::StorefrontClient;
use crate::error::ClientError;

/// Consolidated document holding every tier.
pub const NESTED_DOCUMENT: &str = "bd-locations.json";

const DATA_DIR: &str = "data";

impl StorefrontClient {
    /// Fetches one tier's flat document from the asset base.
    ///
    /// # Errors
    ///
    /// - [`ClientError::Http`] / [`ClientError::NotFound`] when the document
    ///   cannot be fetched.
    /// - [`ClientError::LocationData`] when it holds no usable node list.
    pub async fn fetch_location_tier(
        &self,
        tier: LocationTier,
    ) -> Result<Vec<LocationNode>, ClientError> {
        let url = self.asset_url(&[DATA_DIR, tier.file_name()])?;
        let body = self.get_json(&url, &[]).await?;
        Ok(parse_tier(tier, &body)?)
    }

    /// Fetches and flattens the consolidated nested document.
    ///
    /// # Errors
    ///
    /// As [`StorefrontClient::fetch_location_tier`].
    pub async fn fetch_nested_locations(&self) -> Result<LocationDirectory, ClientError> {
        let url = self.asset_url(&[DATA_DIR, NESTED_DOCUMENT])?;
        let body = self.get_json(&url, &[]).await?;
        Ok(parse_nested(&body)?)
    }

    /// Loads every tier, never failing.
    ///
    /// The nested document is tried first. If it is missing or malformed the
    /// four flat documents are fetched concurrently. A tier that fails to
    /// load is left empty together with every tier below it.
    pub async fn load_locations(&self) -> LocationDirectory {
        match self.fetch_nested_locations().await {
            Ok(directory) => return directory,
            Err(e) => {
                tracing::debug!(
                    error = %e,
                    "nested location document unavailable, using per-tier files"
                );
            }
        }

        let results = join_all(LocationTier::ALL.map(|tier| self.fetch_location_tier(tier))).await;

        let mut directory = LocationDirectory::new();
        let mut broken = false;
        for (tier, result) in LocationTier::ALL.into_iter().zip(results) {
            match result {
                Ok(nodes) if !broken => directory.set_tier(tier, nodes),
                Ok(_) => {}
                Err(e) => {
                    tracing::warn!(%tier, error = %e, "failed to load location tier");
                    broken = true;
                }
            }
        }
        directory
    }
}
