//! Domain types and client-side state for the booth storefront.
//!
//! Everything here is synchronous and free of network I/O: the cart store,
//! order summary arithmetic, the four-tier address cascade, checkout
//! validation and payload assembly, and order status presentation. The
//! `booth-client` crate drives these against the storefront backend.

pub mod app_config;
pub mod cart;
pub mod checkout;
pub mod combo;
pub mod config;
pub mod locations;
pub mod money;
pub mod orders;
pub mod pricing;
pub mod products;
pub mod session;

use thiserror::Error;

pub use app_config::{AppConfig, Environment};
pub use cart::{
    CartCommand, CartError, CartEvent, CartLine, CartStore, Clamp, LineKey, QuantityChange,
    VariantSelection,
};
pub use checkout::{
    build_order_payload, confirmation_path, validate_checkout, CheckoutError, CheckoutForm,
    FieldError, LocationNames, OrderAddress, OrderLine, OrderPayload, ResolvedAddress,
    ShippingAddressForm, DEFAULT_COUNTRY, PAYMENT_METHOD,
};
pub use combo::{ComboAdd, ComboError, ComboItem, ComboSelection};
pub use config::{load_app_config, load_app_config_from_env};
pub use locations::{
    parse_nested, parse_tier, AddressCascade, Applied, CascadeError, LocationDataError,
    LocationDirectory, LocationNode, LocationTier, TierRequest,
};
pub use money::format_price;
pub use orders::{
    validate_order_id, OrderRecord, OrderShippingAddress, OrderStatus, OrderedItem, StepState,
    Timeline, TimelineStep, TrackingError,
};
pub use pricing::{derive_summary, Coupon, DiscountType, OrderSummary, ShippingRates, ShippingZone};
pub use products::{
    Category, ComboProduct, PageMeta, Product, ProductQuery, ProductVariant, VariantValue,
};
pub use session::ShopSession;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },
}
