//! Client-side shopping cart.
//!
//! [`CartStore`] is an owned, single-writer state object. Mutations go
//! through [`CartStore::apply`] with a [`CartCommand`]; the named methods
//! (`add_line`, `set_quantity`, ...) are thin wrappers over the same
//! reducer. Lines are keyed by [`LineKey`], so a product added with the same
//! variant choices always lands on the same line.

mod line;
mod stock;

use std::collections::HashMap;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use line::{CartLine, LineKey, VariantSelection};
pub use stock::{Clamp, QuantityChange};

use stock::clamp_quantity;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CartError {
    #[error("quantity must be at least 1")]
    InvalidQuantity,

    #[error("{name} is out of stock")]
    OutOfStock { name: String },

    #[error("no cart line for {0}")]
    LineNotFound(LineKey),
}

/// A request to change the cart.
#[derive(Debug, Clone, PartialEq)]
pub enum CartCommand {
    Add(CartLine),
    SetQuantity {
        product_id: String,
        quantity: u32,
        variants: Vec<VariantSelection>,
    },
    /// Replace the variant choice of the line at `key`.
    ChangeVariants {
        key: LineKey,
        variants: Vec<VariantSelection>,
    },
    Remove {
        product_id: String,
    },
    Clear,
}

/// What a [`CartCommand`] did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CartEvent {
    Added {
        key: LineKey,
        merged: bool,
        change: QuantityChange,
    },
    QuantityChanged {
        key: LineKey,
        change: QuantityChange,
    },
    /// The line moved from `from` to `to`; `merged` when `to` already
    /// existed and the two lines were combined.
    VariantsChanged {
        from: LineKey,
        to: LineKey,
        merged: bool,
        change: QuantityChange,
    },
    Removed {
        product_id: String,
        lines: usize,
    },
    Cleared {
        lines: usize,
    },
}

#[derive(Debug, Clone, PartialEq)]
struct Entry {
    seq: u64,
    line: CartLine,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "CartSnapshot", into = "CartSnapshot")]
pub struct CartStore {
    entries: HashMap<LineKey, Entry>,
    next_seq: u64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct CartSnapshot {
    #[serde(default)]
    lines: Vec<CartLine>,
}

impl From<CartSnapshot> for CartStore {
    fn from(snapshot: CartSnapshot) -> Self {
        let mut store = CartStore::new();
        for mut line in snapshot.lines {
            if line.quantity == 0 {
                continue;
            }
            line.quantity = clamp_quantity(line.quantity, line.stock_limit()).applied;
            store.insert_new(line);
        }
        store
    }
}

impl From<CartStore> for CartSnapshot {
    fn from(store: CartStore) -> Self {
        CartSnapshot {
            lines: store.lines().into_iter().cloned().collect(),
        }
    }
}

impl CartStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply one command and report what it did.
    ///
    /// # Errors
    ///
    /// - [`CartError::InvalidQuantity`] when adding zero units.
    /// - [`CartError::OutOfStock`] when adding a product with no stock.
    /// - [`CartError::LineNotFound`] when setting the quantity or variants
    ///   of a line that is not in the cart.
    /// - [`CartError::OutOfStock`] when the new variant choice has no stock;
    ///   the cart is left unchanged.
    pub fn apply(&mut self, command: CartCommand) -> Result<CartEvent, CartError> {
        match command {
            CartCommand::Add(item) => {
                let (key, merged, change) = self.reduce_add(item)?;
                Ok(CartEvent::Added {
                    key,
                    merged,
                    change,
                })
            }
            CartCommand::SetQuantity {
                product_id,
                quantity,
                variants,
            } => {
                let (key, change) =
                    self.reduce_set_quantity(&product_id, quantity, &variants)?;
                Ok(CartEvent::QuantityChanged { key, change })
            }
            CartCommand::ChangeVariants { key, variants } => {
                let (to, merged, change) = self.reduce_change_variants(&key, variants)?;
                Ok(CartEvent::VariantsChanged {
                    from: key,
                    to,
                    merged,
                    change,
                })
            }
            CartCommand::Remove { product_id } => {
                let lines = self.remove_line(&product_id);
                Ok(CartEvent::Removed { product_id, lines })
            }
            CartCommand::Clear => {
                let lines = self.entries.len();
                self.clear();
                Ok(CartEvent::Cleared { lines })
            }
        }
    }

    /// Add `item`, merging into an existing line with the same product and
    /// variant set. Merging adds the quantities (never beyond stock) and
    /// refreshes the stored stock figures from `item`.
    ///
    /// # Errors
    ///
    /// See [`CartStore::apply`].
    pub fn add_line(&mut self, item: CartLine) -> Result<QuantityChange, CartError> {
        self.reduce_add(item).map(|(_, _, change)| change)
    }

    /// Set the quantity of the line identified by `product_id` and
    /// `variants`, clamped into `[1, stock]`. Variant stock figures passed
    /// in `variants` replace the stored ones.
    ///
    /// # Errors
    ///
    /// See [`CartStore::apply`].
    pub fn set_quantity(
        &mut self,
        product_id: &str,
        quantity: u32,
        variants: &[VariantSelection],
    ) -> Result<QuantityChange, CartError> {
        self.reduce_set_quantity(product_id, quantity, variants)
            .map(|(_, change)| change)
    }

    /// Replace the variant choice of the line at `key`, keeping its
    /// position. When another line already has the new choice the two are
    /// merged. The quantity is clamped to the new variants' stock.
    ///
    /// # Errors
    ///
    /// See [`CartStore::apply`].
    pub fn change_variants(
        &mut self,
        key: &LineKey,
        variants: Vec<VariantSelection>,
    ) -> Result<(LineKey, QuantityChange), CartError> {
        self.reduce_change_variants(key, variants)
            .map(|(to, _, change)| (to, change))
    }

    /// Remove every line for `product_id`. Returns how many lines went away.
    pub fn remove_line(&mut self, product_id: &str) -> usize {
        let before = self.entries.len();
        self.entries.retain(|key, _| key.product_id != product_id);
        before - self.entries.len()
    }

    /// Remove exactly one line.
    pub fn remove_key(&mut self, key: &LineKey) -> bool {
        self.entries.remove(key).is_some()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Lines in the order they were first added.
    #[must_use]
    pub fn lines(&self) -> Vec<&CartLine> {
        let mut entries: Vec<&Entry> = self.entries.values().collect();
        entries.sort_by_key(|e| e.seq);
        entries.into_iter().map(|e| &e.line).collect()
    }

    #[must_use]
    pub fn get(&self, key: &LineKey) -> Option<&CartLine> {
        self.entries.get(key).map(|e| &e.line)
    }

    /// Σ unit price × quantity over the current lines.
    #[must_use]
    pub fn subtotal(&self) -> Decimal {
        self.entries.values().map(|e| e.line.line_total()).sum()
    }

    /// Total units across all lines.
    #[must_use]
    pub fn item_count(&self) -> u32 {
        self.entries
            .values()
            .map(|e| e.line.quantity)
            .fold(0u32, u32::saturating_add)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn reduce_add(
        &mut self,
        item: CartLine,
    ) -> Result<(LineKey, bool, QuantityChange), CartError> {
        if item.quantity == 0 {
            return Err(CartError::InvalidQuantity);
        }
        if item.stock_limit() == 0 {
            return Err(CartError::OutOfStock { name: item.name });
        }

        let key = item.key();
        if let Some(entry) = self.entries.get_mut(&key) {
            let requested = entry.line.quantity.saturating_add(item.quantity);
            entry.line.available_stock = item.available_stock;
            entry.line.variants = item.variants;
            let change = clamp_quantity(requested, entry.line.stock_limit());
            entry.line.quantity = change.applied;
            return Ok((key, true, change));
        }

        let change = clamp_quantity(item.quantity, item.stock_limit());
        let mut line = item;
        line.quantity = change.applied;
        self.insert_new(line);
        Ok((key, false, change))
    }

    fn reduce_set_quantity(
        &mut self,
        product_id: &str,
        quantity: u32,
        variants: &[VariantSelection],
    ) -> Result<(LineKey, QuantityChange), CartError> {
        let key = LineKey::new(product_id, variants);
        let entry = self
            .entries
            .get_mut(&key)
            .ok_or_else(|| CartError::LineNotFound(key.clone()))?;

        for incoming in variants {
            if incoming.available_stock.is_none() {
                continue;
            }
            if let Some(stored) = entry
                .line
                .variants
                .iter_mut()
                .find(|v| v.name == incoming.name)
            {
                stored.available_stock.clone_from(&incoming.available_stock);
            }
        }

        let change = clamp_quantity(quantity, entry.line.stock_limit());
        entry.line.quantity = change.applied;
        Ok((key, change))
    }

    fn reduce_change_variants(
        &mut self,
        key: &LineKey,
        variants: Vec<VariantSelection>,
    ) -> Result<(LineKey, bool, QuantityChange), CartError> {
        let entry = self
            .entries
            .get(key)
            .ok_or_else(|| CartError::LineNotFound(key.clone()))?;
        let seq = entry.seq;
        let mut line = entry.line.clone();
        line.variants = variants;
        if line.stock_limit() == 0 {
            return Err(CartError::OutOfStock { name: line.name });
        }

        let to = line.key();
        self.entries.remove(key);
        let mut merged = false;
        if to != *key {
            if let Some(existing) = self.entries.remove(&to) {
                line.quantity = line.quantity.saturating_add(existing.line.quantity);
                merged = true;
            }
        }

        let change = clamp_quantity(line.quantity, line.stock_limit());
        line.quantity = change.applied;
        self.entries.insert(to.clone(), Entry { seq, line });
        Ok((to, merged, change))
    }

    fn insert_new(&mut self, line: CartLine) {
        let key = line.key();
        if self.entries.contains_key(&key) {
            return;
        }
        let seq = self.next_seq;
        self.next_seq += 1;
        self.entries.insert(key, Entry { seq, line });
    }
}

#[cfg(test)]
#[path = "cart_test.rs"]
mod tests;
