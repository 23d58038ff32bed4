//! Order summary arithmetic: coupon discount, shipping zone, total.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::cart::CartStore;
use crate::money::round_money;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DiscountType {
    Percentage,
    Fixed,
}

/// A coupon staged against the whole cart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Coupon {
    pub code: String,
    pub discount_type: DiscountType,
    #[serde(rename = "discount", alias = "discountValue")]
    pub value: Decimal,
}

impl Coupon {
    #[must_use]
    pub fn percentage(code: impl Into<String>, percent: Decimal) -> Self {
        Self {
            code: code.into(),
            discount_type: DiscountType::Percentage,
            value: percent,
        }
    }

    #[must_use]
    pub fn fixed(code: impl Into<String>, amount: Decimal) -> Self {
        Self {
            code: code.into(),
            discount_type: DiscountType::Fixed,
            value: amount,
        }
    }

    /// Discount this coupon grants on `subtotal`. A fixed coupon grants its
    /// full value regardless of the subtotal; the total floor absorbs any
    /// excess.
    #[must_use]
    pub fn discount_for(&self, subtotal: Decimal) -> Decimal {
        match self.discount_type {
            DiscountType::Percentage => {
                round_money(subtotal * self.value / Decimal::ONE_HUNDRED)
            }
            DiscountType::Fixed => self.value,
        }
    }
}

/// Flat-rate shipping tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ShippingZone {
    /// Inside the hub city.
    Inside,
    Outside,
}

impl ShippingZone {
    /// Zone for a selected division: inside when it names the hub city.
    #[must_use]
    pub fn from_division_name(division: &str, rates: &ShippingRates) -> Self {
        if division.trim().eq_ignore_ascii_case(rates.hub_city.trim()) {
            Self::Inside
        } else {
            Self::Outside
        }
    }
}

impl std::str::FromStr for ShippingZone {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "inside" => Ok(Self::Inside),
            "outside" => Ok(Self::Outside),
            other => Err(format!(
                "unknown shipping zone '{other}' (expected inside or outside)"
            )),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShippingRates {
    pub inside: Decimal,
    pub outside: Decimal,
    pub hub_city: String,
}

impl Default for ShippingRates {
    fn default() -> Self {
        Self {
            inside: Decimal::from(80),
            outside: Decimal::from(150),
            hub_city: "Dhaka".to_string(),
        }
    }
}

impl ShippingRates {
    #[must_use]
    pub fn charge(&self, zone: ShippingZone) -> Decimal {
        match zone {
            ShippingZone::Inside => self.inside,
            ShippingZone::Outside => self.outside,
        }
    }
}

/// Derived order totals. Never stored; rebuild with [`derive_summary`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderSummary {
    pub subtotal: Decimal,
    pub discount: Decimal,
    pub shipping_charge: Decimal,
    pub total: Decimal,
}

impl OrderSummary {
    /// Build a summary from its inputs. `total` is floored at zero.
    #[must_use]
    pub fn new(subtotal: Decimal, discount: Decimal, shipping_charge: Decimal) -> Self {
        let total = (subtotal - discount + shipping_charge).max(Decimal::ZERO);
        Self {
            subtotal,
            discount,
            shipping_charge,
            total,
        }
    }
}

/// Compute the summary for the current cart. Shipping is zero until a
/// zone has been chosen.
#[must_use]
pub fn derive_summary(
    cart: &CartStore,
    coupon: Option<&Coupon>,
    zone: Option<ShippingZone>,
    rates: &ShippingRates,
) -> OrderSummary {
    let subtotal = cart.subtotal();
    let discount = coupon.map_or(Decimal::ZERO, |c| c.discount_for(subtotal));
    let shipping = zone.map_or(Decimal::ZERO, |z| rates.charge(z));
    OrderSummary::new(subtotal, discount, shipping)
}
