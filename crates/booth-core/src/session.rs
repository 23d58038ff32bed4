//! The shopper's client-side state: cart, staged coupon and shipping zone.

use serde::{Deserialize, Serialize};

use crate::cart::CartStore;
use crate::pricing::{derive_summary, Coupon, OrderSummary, ShippingRates, ShippingZone};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ShopSession {
    #[serde(default)]
    pub cart: CartStore,
    #[serde(default)]
    pub coupon: Option<Coupon>,
    #[serde(default)]
    pub shipping_zone: Option<ShippingZone>,
}

impl ShopSession {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Summary derived from the current cart, coupon and zone.
    #[must_use]
    pub fn summary(&self, rates: &ShippingRates) -> OrderSummary {
        derive_summary(&self.cart, self.coupon.as_ref(), self.shipping_zone, rates)
    }

    /// Stage a coupon, replacing any previous one. Returns the replaced coupon.
    pub fn apply_coupon(&mut self, coupon: Coupon) -> Option<Coupon> {
        self.coupon.replace(coupon)
    }

    pub fn remove_coupon(&mut self) -> Option<Coupon> {
        self.coupon.take()
    }

    pub fn set_shipping_zone(&mut self, zone: Option<ShippingZone>) {
        self.shipping_zone = zone;
    }

    /// Drop everything tied to a placed order: the cart lines and the coupon.
    pub fn clear_order_state(&mut self) {
        self.cart.clear();
        self.coupon = None;
    }
}

#[cfg(test)]
mod tests {
    use rust_decimal::Decimal;

    use super::*;
    use crate::cart::CartLine;

    fn session_with_item() -> ShopSession {
        let mut session = ShopSession::new();
        session
            .cart
            .add_line(CartLine {
                product_id: "p1".to_string(),
                name: "Toner".to_string(),
                code: "TN-1".to_string(),
                thumbnail: String::new(),
                unit_price: Decimal::from(1000),
                quantity: 1,
                variants: Vec::new(),
                available_stock: 3,
            })
            .unwrap();
        session
    }

    #[test]
    fn summary_tracks_every_input() {
        let rates = ShippingRates::default();
        let mut session = session_with_item();
        assert_eq!(session.summary(&rates).total, Decimal::from(1000));

        session.apply_coupon(Coupon::percentage("TEN", Decimal::from(10)));
        assert_eq!(session.summary(&rates).total, Decimal::from(900));

        session.set_shipping_zone(Some(ShippingZone::Outside));
        assert_eq!(session.summary(&rates).total, Decimal::from(1050));

        session.cart.set_quantity("p1", 2, &[]).unwrap();
        assert_eq!(session.summary(&rates).total, Decimal::from(1950));
    }

    #[test]
    fn clear_order_state_keeps_zone() {
        let mut session = session_with_item();
        session.apply_coupon(Coupon::fixed("FLAT", Decimal::from(50)));
        session.set_shipping_zone(Some(ShippingZone::Inside));

        session.clear_order_state();
        assert!(session.cart.is_empty());
        assert!(session.coupon.is_none());
        assert_eq!(session.shipping_zone, Some(ShippingZone::Inside));
    }

    #[test]
    fn round_trips_through_json() {
        let mut session = session_with_item();
        session.apply_coupon(Coupon::fixed("FLAT", Decimal::from(50)));
        let json = serde_json::to_string(&session).unwrap();
        let restored: ShopSession = serde_json::from_str(&json).unwrap();
        assert_eq!(restored, session);
    }

    #[test]
    fn empty_document_is_an_empty_session() {
        let restored: ShopSession = serde_json::from_str("{}").unwrap();
        assert!(restored.cart.is_empty());
        assert!(restored.coupon.is_none());
    }
}
