//! Order creation and tracking.

use booth_core::{validate_order_id, OrderPayload, OrderRecord, OrderStatus};
use serde::Deserialize;
use serde_json::Value;

use crate::client::StorefrontClient;
use crate::error::ClientError;

/// Header carrying the per-submission idempotency key.
pub const IDEMPOTENCY_HEADER: &str = "Idempotency-Key";

/// The part of a freshly created order the client needs.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CreatedOrder {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(default)]
    pub status: Option<OrderStatus>,
}

impl StorefrontClient {
    /// Creates an order via `POST /order`.
    ///
    /// A fresh idempotency key is generated per call and reused across
    /// transport retries of that call.
    ///
    /// # Errors
    ///
    /// - [`ClientError::Api`] with the backend's message when it rejects
    ///   the order.
    /// - [`ClientError::Http`] on network failure.
    /// - [`ClientError::Deserialize`] if the response lacks an order id.
    pub async fn create_order(&self, payload: &OrderPayload) -> Result<CreatedOrder, ClientError> {
        let url = self.api_url(&["order"])?;
        let key = uuid::Uuid::new_v4().to_string();
        let body = self
            .post_json(&url, payload, &[(IDEMPOTENCY_HEADER, key.as_str())])
            .await?;
        Ok(Self::decode::<CreatedOrder>(body, "order")?.data)
    }

    /// Tracks orders by id via `GET /order/track/{id}`. The id is trimmed
    /// and checked locally first.
    ///
    /// # Errors
    ///
    /// - [`ClientError::Tracking`] for an id that is too short; no request
    ///   is made.
    /// - [`ClientError::NotFound`] when the backend knows no such order.
    /// - [`ClientError::Http`] / [`ClientError::Deserialize`] as usual.
    pub async fn track_order(&self, id: &str) -> Result<Vec<OrderRecord>, ClientError> {
        let id = validate_order_id(id)?;
        let url = self.api_url(&["order", "track", id])?;
        let body = self.get_json(&url, &[]).await?;
        let context = format!("order/track/{id}");
        // Answers with either a list of orders or a single one.
        let data = Self::decode::<Value>(body, &context)?.data;
        let records = if data.is_array() {
            serde_json::from_value::<Vec<OrderRecord>>(data)
        } else {
            serde_json::from_value::<OrderRecord>(data).map(|record| vec![record])
        };
        records.map_err(|source| ClientError::Deserialize { context, source })
    }

    /// Fetches one order's details via `GET /order/{id}`.
    ///
    /// # Errors
    ///
    /// Same as [`StorefrontClient::track_order`].
    pub async fn get_order(&self, id: &str) -> Result<OrderRecord, ClientError> {
        let id = validate_order_id(id)?;
        let url = self.api_url(&["order", id])?;
        let body = self.get_json(&url, &[]).await?;
        Ok(Self::decode::<OrderRecord>(body, &format!("order/{id}"))?.data)
    }
}
