//! Checkout form validation and order payload assembly.
//!
//! Nothing here touches the network: [`validate_checkout`] rejects a bad
//! submission before any request is built, and [`build_order_payload`]
//! produces the exact body the order endpoint expects.

use std::sync::LazyLock;

use regex::Regex;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::cart::{CartLine, CartStore, VariantSelection};
use crate::locations::{AddressCascade, LocationDirectory, LocationTier};
use crate::pricing::{derive_summary, ShippingRates, ShippingZone};
use crate::session::ShopSession;

pub const PAYMENT_METHOD: &str = "Cash On Delivery";
pub const DEFAULT_COUNTRY: &str = "Bangladesh";

static PHONE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\+?[1-9]\d{1,14}$").expect("valid phone regex"));
static EMAIL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("valid email regex"));

/// One rejected form field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    /// Dotted form path, e.g. `shippingAddress.line1`.
    pub field: &'static str,
    pub message: String,
}

impl std::fmt::Display for FieldError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CheckoutError {
    #[error("cart is empty")]
    EmptyCart,

    #[error("invalid checkout form: {}", join_errors(.0))]
    Invalid(Vec<FieldError>),

    #[error("unknown {tier} selection: {id}")]
    UnknownLocation { tier: LocationTier, id: String },
}

fn join_errors(errors: &[FieldError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShippingAddressForm {
    pub line1: String,
    #[serde(default)]
    pub line2: Option<String>,
    #[serde(default = "default_country")]
    pub country: String,
    /// Delivery contact; the customer's phone is used when absent.
    #[serde(default)]
    pub phone: Option<String>,
    /// Selected location ids.
    #[serde(default)]
    pub division: Option<String>,
    #[serde(default)]
    pub district: Option<String>,
    #[serde(default)]
    pub upazila: Option<String>,
    #[serde(default)]
    pub union: Option<String>,
}

fn default_country() -> String {
    DEFAULT_COUNTRY.to_string()
}

impl Default for ShippingAddressForm {
    fn default() -> Self {
        Self {
            line1: String::new(),
            line2: None,
            country: default_country(),
            phone: None,
            division: None,
            district: None,
            upazila: None,
            union: None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutForm {
    pub name: String,
    #[serde(default)]
    pub email: Option<String>,
    pub phone: String,
    pub shipping_address: ShippingAddressForm,
    /// True when no signed-in account places the order.
    #[serde(default = "default_guest")]
    pub is_guest: bool,
}

fn default_guest() -> bool {
    true
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

struct Rules {
    errors: Vec<FieldError>,
}

impl Rules {
    fn fail(&mut self, field: &'static str, message: &str) {
        self.errors.push(FieldError {
            field,
            message: message.to_string(),
        });
    }

    fn length(&mut self, field: &'static str, label: &str, value: &str, min: usize, max: usize) {
        let len = value.trim().chars().count();
        if len < min {
            self.fail(field, &format!("{label} is required"));
        } else if len > max {
            self.fail(field, &format!("{label} is too long"));
        }
    }

    fn phone(&mut self, field: &'static str, value: &str) {
        let value = value.trim();
        let len = value.chars().count();
        if len < 8 {
            self.fail(field, "phone number must be at least 8 digits");
        } else if len > 15 {
            self.fail(field, "phone number is too long");
        } else if !PHONE_RE.is_match(value) {
            self.fail(
                field,
                "enter a valid international phone number (e.g. +8801842236261)",
            );
        }
    }

    fn required(&mut self, field: &'static str, label: &str, value: Option<&str>) {
        if non_blank(value).is_none() {
            self.fail(field, &format!("{label} is required"));
        }
    }
}

/// Check the cart and form before anything is sent.
///
/// # Errors
///
/// [`CheckoutError::EmptyCart`] when the cart has no lines; otherwise
/// [`CheckoutError::Invalid`] carrying every failing field.
pub fn validate_checkout(cart: &CartStore, form: &CheckoutForm) -> Result<(), CheckoutError> {
    if cart.is_empty() {
        return Err(CheckoutError::EmptyCart);
    }

    let mut rules = Rules { errors: Vec::new() };
    rules.length("name", "name", &form.name, 1, 100);
    if let Some(email) = non_blank(form.email.as_deref()) {
        if !EMAIL_RE.is_match(email) {
            rules.fail("email", "invalid email address");
        }
    }
    rules.phone("phone", &form.phone);

    let address = &form.shipping_address;
    rules.length("shippingAddress.line1", "address line 1", &address.line1, 1, 100);
    if let Some(line2) = address.line2.as_deref() {
        rules.length("shippingAddress.line2", "address line 2", line2, 0, 100);
    }
    rules.length("shippingAddress.country", "country", &address.country, 1, 50);
    if let Some(phone) = non_blank(address.phone.as_deref()) {
        rules.phone("shippingAddress.phone", phone);
    }
    rules.required("shippingAddress.division", "division", address.division.as_deref());
    rules.required("shippingAddress.district", "district", address.district.as_deref());
    rules.required("shippingAddress.upazila", "upazila", address.upazila.as_deref());

    if rules.errors.is_empty() {
        Ok(())
    } else {
        Err(CheckoutError::Invalid(rules.errors))
    }
}

/// Turns a selected location id back into its display name.
pub trait LocationNames {
    fn location_name(&self, tier: LocationTier, id: &str) -> Option<String>;
}

impl LocationNames for LocationDirectory {
    fn location_name(&self, tier: LocationTier, id: &str) -> Option<String> {
        self.name_of(tier, id).map(str::to_string)
    }
}

impl LocationNames for AddressCascade {
    fn location_name(&self, tier: LocationTier, id: &str) -> Option<String> {
        self.options(tier)
            .iter()
            .find(|n| n.id == id)
            .map(|n| n.name.clone())
    }
}

/// Location names for the selected ids.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedAddress {
    pub division: String,
    pub district: String,
    pub upazila: String,
    pub union: Option<String>,
}

impl ResolvedAddress {
    /// # Errors
    ///
    /// [`CheckoutError::UnknownLocation`] for the first id that `names`
    /// cannot resolve. A missing union selection is allowed.
    pub fn resolve(
        form: &ShippingAddressForm,
        names: &impl LocationNames,
    ) -> Result<Self, CheckoutError> {
        let lookup = |tier: LocationTier, id: Option<&str>| {
            let id = non_blank(id).unwrap_or_default();
            names
                .location_name(tier, id)
                .ok_or_else(|| CheckoutError::UnknownLocation {
                    tier,
                    id: id.to_string(),
                })
        };

        let union = match non_blank(form.union.as_deref()) {
            Some(id) => Some(lookup(LocationTier::Union, Some(id))?),
            None => None,
        };
        Ok(Self {
            division: lookup(LocationTier::Division, form.division.as_deref())?,
            district: lookup(LocationTier::District, form.district.as_deref())?,
            upazila: lookup(LocationTier::Upazila, form.upazila.as_deref())?,
            union,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OrderVariant {
    pub name: String,
    pub value: String,
}

impl From<&VariantSelection> for OrderVariant {
    fn from(v: &VariantSelection) -> Self {
        Self {
            name: v.name.clone(),
            value: v.value.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderLine {
    pub product_id: String,
    pub name: String,
    pub code: String,
    pub thumbnail: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub price: Decimal,
    pub quantity: u32,
    #[serde(with = "rust_decimal::serde::float")]
    pub total_price: Decimal,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub variants: Vec<OrderVariant>,
    pub available_stock: u32,
}

impl From<&CartLine> for OrderLine {
    fn from(line: &CartLine) -> Self {
        Self {
            product_id: line.product_id.clone(),
            name: line.name.clone(),
            code: line.code.clone(),
            thumbnail: line.thumbnail.clone(),
            price: line.unit_price,
            quantity: line.quantity,
            total_price: line.line_total(),
            variants: line.variants.iter().map(OrderVariant::from).collect(),
            available_stock: line.stock_limit(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OrderAddress {
    pub line1: String,
    pub line2: String,
    pub country: String,
    pub phone: String,
    pub division: String,
    pub district: String,
    pub upazila: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub union: Option<String>,
}

/// Body of the order-creation request.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderPayload {
    pub order_items: Vec<OrderLine>,
    #[serde(with = "rust_decimal::serde::float")]
    pub order_total: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub sub_total: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub discount: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub shipping_charge: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub total: Decimal,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    pub phone: String,
    pub shipping_address: OrderAddress,
    pub payment_method: String,
    pub has_coupon: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub coupon_code: Option<String>,
    pub is_guest_checkout: bool,
}

/// Validate and assemble the order body. Shipping is charged by the zone of
/// the resolved division, regardless of any zone staged in the session.
///
/// # Errors
///
/// Any error from [`validate_checkout`].
pub fn build_order_payload(
    session: &ShopSession,
    form: &CheckoutForm,
    address: &ResolvedAddress,
    rates: &ShippingRates,
) -> Result<OrderPayload, CheckoutError> {
    validate_checkout(&session.cart, form)?;

    let zone = ShippingZone::from_division_name(&address.division, rates);
    let summary = derive_summary(&session.cart, session.coupon.as_ref(), Some(zone), rates);
    let form_address = &form.shipping_address;
    let phone = form.phone.trim().to_string();

    Ok(OrderPayload {
        order_items: session.cart.lines().into_iter().map(OrderLine::from).collect(),
        order_total: summary.total,
        sub_total: summary.subtotal,
        discount: summary.discount,
        shipping_charge: summary.shipping_charge,
        total: summary.total,
        name: form.name.trim().to_string(),
        email: non_blank(form.email.as_deref()).map(str::to_string),
        shipping_address: OrderAddress {
            line1: form_address.line1.trim().to_string(),
            line2: form_address.line2.clone().unwrap_or_default(),
            country: form_address.country.trim().to_string(),
            phone: non_blank(form_address.phone.as_deref())
                .map_or_else(|| phone.clone(), str::to_string),
            division: address.division.clone(),
            district: address.district.clone(),
            upazila: address.upazila.clone(),
            union: address.union.clone(),
        },
        phone,
        payment_method: PAYMENT_METHOD.to_string(),
        has_coupon: session.coupon.is_some(),
        coupon_code: session.coupon.as_ref().map(|c| c.code.clone()),
        is_guest_checkout: form.is_guest,
    })
}

/// Storefront path of the confirmation page for a placed order.
#[must_use]
pub fn confirmation_path(order_id: &str) -> String {
    format!("/checkout/success/{order_id}")
}

#[cfg(test)]
#[path = "checkout_test.rs"]
mod tests;
