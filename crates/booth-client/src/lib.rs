//! Async client for the storefront REST backend.
//!
//! [`StorefrontClient`] wraps `reqwest` with envelope checking, typed
//! decoding and retry on transient failures. Catalog, order, location and
//! checkout calls are split across modules as `impl` blocks on the client.

pub mod cascade;
pub mod catalog;
pub mod checkout;
pub mod client;
pub mod error;
pub mod locations;
pub mod orders;
pub(crate) mod retry;

pub use cascade::{CascadeLoader, LocationSource};
pub use catalog::ProductPage;
pub use checkout::{submission_message, OrderConfirmation};
pub use client::StorefrontClient;
pub use error::ClientError;
pub use orders::CreatedOrder;
