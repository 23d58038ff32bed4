//! Checkout submission: validate, resolve, submit, then clear.

use booth_core::{
    build_order_payload, confirmation_path, validate_checkout, CheckoutForm, LocationNames,
    OrderSummary, ResolvedAddress, ShippingRates, ShopSession,
};

use crate::client::StorefrontClient;
use crate::error::ClientError;

const FALLBACK_MESSAGE: &str = "Failed to submit order";

/// A successfully placed order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderConfirmation {
    pub order_id: String,
    /// Storefront path of the confirmation page.
    pub path: String,
    pub summary: OrderSummary,
}

/// Message to show the customer for a failed submission: the backend's
/// own message when it sent one, else the HTTP status text, else a generic
/// fallback.
#[must_use]
pub fn submission_message(err: &ClientError) -> String {
    match err {
        ClientError::Api { message, .. } => message.clone(),
        ClientError::Checkout(e) => e.to_string(),
        other => other
            .status()
            .and_then(|s| reqwest::StatusCode::from_u16(s).ok())
            .and_then(|s| s.canonical_reason())
            .map_or_else(|| FALLBACK_MESSAGE.to_owned(), str::to_owned),
    }
}

impl StorefrontClient {
    /// Place the order held in `session`.
    ///
    /// The cart and form are validated and the location ids resolved to
    /// names before any request is made. On success the cart and coupon are
    /// cleared and the confirmation carries the new order id. On failure
    /// `session` is left exactly as it was.
    ///
    /// # Errors
    ///
    /// - [`ClientError::Checkout`] for an empty cart, invalid fields or an
    ///   unresolvable location; no request is made.
    /// - Any error from [`StorefrontClient::create_order`].
    pub async fn submit_checkout(
        &self,
        session: &mut ShopSession,
        form: &CheckoutForm,
        names: &impl LocationNames,
        rates: &ShippingRates,
    ) -> Result<OrderConfirmation, ClientError> {
        validate_checkout(&session.cart, form)?;
        let address = ResolvedAddress::resolve(&form.shipping_address, names)?;
        let payload = build_order_payload(session, form, &address, rates)?;

        let created = self.create_order(&payload).await?;
        tracing::info!(
            order_id = %created.id,
            items = payload.order_items.len(),
            total = %payload.total,
            "order submitted"
        );

        let summary = OrderSummary {
            subtotal: payload.sub_total,
            discount: payload.discount,
            shipping_charge: payload.shipping_charge,
            total: payload.total,
        };
        session.clear_order_state();
        Ok(OrderConfirmation {
            path: confirmation_path(&created.id),
            order_id: created.id,
            summary,
        })
    }
}
