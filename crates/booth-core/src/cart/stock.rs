use serde::Serialize;

/// How a requested quantity was adjusted before being applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Clamp {
    /// The request was applied as-is.
    Unchanged,
    /// The request exceeded stock and was cut down to the stock figure.
    ReducedToStock,
    /// The request was below 1 and was raised to 1.
    RaisedToMinimum,
    /// No stock is known for the line; it is held at quantity 1.
    NoStock,
}

/// Outcome of every quantity-affecting cart operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct QuantityChange {
    pub requested: u32,
    pub applied: u32,
    pub limit: u32,
    pub clamp: Clamp,
}

impl QuantityChange {
    #[must_use]
    pub fn was_clamped(&self) -> bool {
        self.clamp != Clamp::Unchanged
    }
}

/// Fit `requested` into `[1, limit]`.
pub(crate) fn clamp_quantity(requested: u32, limit: u32) -> QuantityChange {
    let (applied, clamp) = if limit == 0 {
        (1, Clamp::NoStock)
    } else if requested == 0 {
        (1, Clamp::RaisedToMinimum)
    } else if requested > limit {
        (limit, Clamp::ReducedToStock)
    } else {
        (requested, Clamp::Unchanged)
    };

    QuantityChange {
        requested,
        applied,
        limit,
        clamp,
    }
}
