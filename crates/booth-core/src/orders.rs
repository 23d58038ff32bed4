//! Placed orders as returned by the tracking endpoints, and their
//! status presentation.

use chrono::{DateTime, Duration, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Shortest order id the tracking lookup accepts.
pub const MIN_ORDER_ID_LEN: usize = 5;

/// Days added to the order date for the delivery estimate.
pub const DELIVERY_ESTIMATE_DAYS: i64 = 7;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum TrackingError {
    #[error("order id must be at least {MIN_ORDER_ID_LEN} characters")]
    IdTooShort,
}

/// Trim and check an order id before any lookup is made.
///
/// # Errors
///
/// [`TrackingError::IdTooShort`] when fewer than five characters remain.
pub fn validate_order_id(id: &str) -> Result<&str, TrackingError> {
    let id = id.trim();
    if id.chars().count() < MIN_ORDER_ID_LEN {
        return Err(TrackingError::IdTooShort);
    }
    Ok(id)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    Pending,
    Processing,
    Shipped,
    Delivered,
    Cancelled,
    Returned,
    #[serde(other)]
    Unknown,
}

impl OrderStatus {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Processing => "processing",
            Self::Shipped => "shipped",
            Self::Delivered => "delivered",
            Self::Cancelled => "cancelled",
            Self::Returned => "returned",
            Self::Unknown => "unknown",
        }
    }

    /// Capitalized form shown on the status badge.
    #[must_use]
    pub fn label(self) -> String {
        let s = self.as_str();
        let mut chars = s.chars();
        match chars.next() {
            Some(first) => first.to_uppercase().chain(chars).collect(),
            None => String::new(),
        }
    }

    #[must_use]
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Cancelled | Self::Returned)
    }

    /// Share of the delivery journey completed, in percent.
    #[must_use]
    pub fn progress_percent(self) -> u8 {
        match self {
            Self::Processing => 33,
            Self::Shipped => 66,
            Self::Delivered => 100,
            _ => 0,
        }
    }
}

impl std::fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OrderShippingAddress {
    pub line1: String,
    pub line2: String,
    pub country: String,
    pub phone: String,
    pub division: String,
    pub district: String,
    pub upazila: String,
    pub union: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderedItem {
    #[serde(default)]
    pub product_id: Option<String>,
    pub name: String,
    #[serde(default)]
    pub code: String,
    #[serde(default)]
    pub thumbnail: String,
    #[serde(default)]
    pub price: Decimal,
    #[serde(default)]
    pub quantity: u32,
    /// Per-item status when it differs from the order's.
    #[serde(default)]
    pub status: Option<OrderStatus>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderRecord {
    #[serde(rename = "_id")]
    pub id: String,
    pub status: OrderStatus,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub processed_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub shipped_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub delivered_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub cancelled_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub shipping_address: OrderShippingAddress,
    #[serde(default)]
    pub order_items: Vec<OrderedItem>,
    #[serde(default)]
    pub sub_total: Decimal,
    #[serde(default)]
    pub discount: Decimal,
    #[serde(default)]
    pub shipping_charge: Decimal,
    #[serde(default)]
    pub total: Decimal,
    #[serde(default)]
    pub payment_method: String,
    #[serde(default)]
    pub is_guest_checkout: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StepState {
    Complete,
    Current,
    Upcoming,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TimelineStep {
    pub label: &'static str,
    pub state: StepState,
    pub at: Option<DateTime<Utc>>,
}

/// How an order's history is presented.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum Timeline {
    /// Placed → processing → shipped → delivered.
    Steps(Vec<TimelineStep>),
    /// Cancelled or returned; no journey is shown.
    Closed {
        status: OrderStatus,
        at: Option<DateTime<Utc>>,
    },
}

fn step(
    label: &'static str,
    reached: bool,
    current: bool,
    at: Option<DateTime<Utc>>,
) -> TimelineStep {
    let state = if current {
        StepState::Current
    } else if reached {
        StepState::Complete
    } else {
        StepState::Upcoming
    };
    let at = if state == StepState::Upcoming { None } else { at };
    TimelineStep { label, state, at }
}

impl OrderRecord {
    #[must_use]
    pub fn timeline(&self) -> Timeline {
        use OrderStatus::{Delivered, Processing, Shipped};

        if self.status.is_terminal() {
            return Timeline::Closed {
                status: self.status,
                at: self.cancelled_at,
            };
        }
        let s = self.status;
        Timeline::Steps(vec![
            step("Order placed", true, false, self.created_at),
            step(
                "Processing",
                matches!(s, Shipped | Delivered),
                s == Processing,
                self.processed_at,
            ),
            step("Shipped", s == Delivered, s == Shipped, self.shipped_at),
            step("Delivered", s == Delivered, false, self.delivered_at),
        ])
    }

    #[must_use]
    pub fn progress_percent(&self) -> u8 {
        self.status.progress_percent()
    }

    /// Order date plus seven days, while the order is still on its way.
    /// `None` when the order date is unknown.
    #[must_use]
    pub fn estimated_delivery(&self) -> Option<DateTime<Utc>> {
        match self.status {
            OrderStatus::Delivered | OrderStatus::Cancelled | OrderStatus::Returned => None,
            _ => self
                .created_at
                .map(|at| at + Duration::days(DELIVERY_ESTIMATE_DAYS)),
        }
    }

    #[must_use]
    pub fn badge_label(&self) -> String {
        self.status.label()
    }

    /// `upazila, district, division`, skipping blank parts.
    #[must_use]
    pub fn delivery_line(&self) -> String {
        let a = &self.shipping_address;
        [&a.upazila, &a.district, &a.division]
            .into_iter()
            .map(|s| s.trim())
            .filter(|s| !s.is_empty())
            .collect::<Vec<_>>()
            .join(", ")
    }

    #[must_use]
    pub fn item_count(&self) -> u32 {
        self.order_items.iter().map(|i| i.quantity).sum()
    }
}
