//! Per-item selection inside a combo bundle.

use std::collections::BTreeMap;

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use thiserror::Error;

use crate::cart::{CartError, CartStore, QuantityChange};
use crate::products::{ComboProduct, Product};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ComboError {
    #[error("select at least one item")]
    NothingSelected,

    #[error("item {0} is not part of this combo")]
    UnknownItem(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct ComboItem {
    pub product: Product,
    pub selected: bool,
    pub quantity: u32,
    pub variants: BTreeMap<String, String>,
}

/// Outcome of adding one combo item to the cart.
#[derive(Debug)]
pub struct ComboAdd {
    pub product_id: String,
    pub result: Result<QuantityChange, CartError>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ComboSelection {
    items: Vec<ComboItem>,
}

impl ComboSelection {
    /// Every item starts selected at quantity 1 with the first value of
    /// each variant chosen.
    #[must_use]
    pub fn new(combo: &ComboProduct) -> Self {
        let items = combo
            .items
            .iter()
            .map(|product| {
                let variants = product
                    .variants
                    .iter()
                    .map(|v| {
                        let first = v.values.first().map(|x| x.value.clone());
                        (v.name.clone(), first.unwrap_or_default())
                    })
                    .collect();
                ComboItem {
                    product: product.clone(),
                    selected: true,
                    quantity: 1,
                    variants,
                }
            })
            .collect();
        Self { items }
    }

    #[must_use]
    pub fn items(&self) -> &[ComboItem] {
        &self.items
    }

    fn item_mut(&mut self, product_id: &str) -> Result<&mut ComboItem, ComboError> {
        self.items
            .iter_mut()
            .find(|i| i.product.id == product_id)
            .ok_or_else(|| ComboError::UnknownItem(product_id.to_string()))
    }

    /// Flip selection of one item. Returns the new state.
    ///
    /// # Errors
    ///
    /// [`ComboError::UnknownItem`] when `product_id` is not in the bundle.
    pub fn toggle(&mut self, product_id: &str) -> Result<bool, ComboError> {
        let item = self.item_mut(product_id)?;
        item.selected = !item.selected;
        Ok(item.selected)
    }

    /// Adjust one item's quantity by `delta`, never going below 1.
    ///
    /// # Errors
    ///
    /// [`ComboError::UnknownItem`] when `product_id` is not in the bundle.
    pub fn adjust_quantity(&mut self, product_id: &str, delta: i64) -> Result<u32, ComboError> {
        let item = self.item_mut(product_id)?;
        let next = (i64::from(item.quantity) + delta).clamp(1, i64::from(u32::MAX));
        item.quantity = u32::try_from(next).unwrap_or(1);
        Ok(item.quantity)
    }

    /// # Errors
    ///
    /// [`ComboError::UnknownItem`] when `product_id` is not in the bundle.
    pub fn choose_variant(
        &mut self,
        product_id: &str,
        variant: &str,
        value: &str,
    ) -> Result<(), ComboError> {
        let item = self.item_mut(product_id)?;
        item.variants.insert(variant.to_string(), value.to_string());
        Ok(())
    }

    /// Σ effective price × quantity over the selected items.
    #[must_use]
    pub fn total_price(&self) -> Decimal {
        self.items
            .iter()
            .filter(|i| i.selected)
            .map(|i| i.product.effective_price() * Decimal::from(i.quantity))
            .sum()
    }

    /// Whole-percent saving of the bundle's effective prices over list
    /// prices, counting every item once.
    #[must_use]
    pub fn savings_percentage(&self) -> u32 {
        let list: Decimal = self.items.iter().map(|i| i.product.price).sum();
        let effective: Decimal = self.items.iter().map(|i| i.product.effective_price()).sum();
        if list <= Decimal::ZERO || list <= effective {
            return 0;
        }
        let percent = ((list - effective) / list * Decimal::ONE_HUNDRED)
            .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero);
        percent.to_u32().unwrap_or(0)
    }

    /// Add every selected item to `cart`, merging with identical lines.
    /// Items that cannot be added are reported per item; the rest still go in.
    ///
    /// # Errors
    ///
    /// [`ComboError::NothingSelected`] when no item is selected.
    pub fn add_to_cart(&self, cart: &mut CartStore) -> Result<Vec<ComboAdd>, ComboError> {
        if !self.items.iter().any(|i| i.selected) {
            return Err(ComboError::NothingSelected);
        }
        let outcomes = self
            .items
            .iter()
            .filter(|i| i.selected)
            .map(|i| ComboAdd {
                product_id: i.product.id.clone(),
                result: cart.add_line(i.product.cart_line(i.quantity, &i.variants)),
            })
            .collect();
        Ok(outcomes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn combo() -> ComboProduct {
        serde_json::from_value(serde_json::json!({
            "_id": "combo1",
            "name": "Glow Kit",
            "products": [
                {
                    "_id": "a", "name": "Cleanser", "price": 500, "discount_price": 100,
                    "quantity": 10,
                    "variants": [{ "name": "Size", "values": [
                        { "name": "Small", "value": "s", "quantity": 6 },
                        { "name": "Large", "value": "l", "quantity": 2 }
                    ]}]
                },
                { "_id": "b", "name": "Toner", "price": 500, "quantity": 3 }
            ]
        }))
        .unwrap()
    }

    #[test]
    fn starts_with_everything_selected() {
        let sel = ComboSelection::new(&combo());
        assert!(sel.items().iter().all(|i| i.selected && i.quantity == 1));
        assert_eq!(sel.items()[0].variants.get("Size").map(String::as_str), Some("s"));
        assert_eq!(sel.total_price(), Decimal::from(900));
    }

    #[test]
    fn total_follows_selection_and_quantity() {
        let mut sel = ComboSelection::new(&combo());
        sel.adjust_quantity("a", 2).unwrap();
        assert_eq!(sel.total_price(), Decimal::from(1700));
        assert!(!sel.toggle("b").unwrap());
        assert_eq!(sel.total_price(), Decimal::from(1200));
    }

    #[test]
    fn quantity_never_drops_below_one() {
        let mut sel = ComboSelection::new(&combo());
        assert_eq!(sel.adjust_quantity("a", -5).unwrap(), 1);
    }

    #[test]
    fn savings_rounds_to_whole_percent() {
        let sel = ComboSelection::new(&combo());
        assert_eq!(sel.savings_percentage(), 10);
    }

    #[test]
    fn unknown_item_is_rejected() {
        let mut sel = ComboSelection::new(&combo());
        assert_eq!(
            sel.toggle("zzz").unwrap_err(),
            ComboError::UnknownItem("zzz".to_string())
        );
    }

    #[test]
    fn add_to_cart_requires_a_selection() {
        let mut sel = ComboSelection::new(&combo());
        sel.toggle("a").unwrap();
        sel.toggle("b").unwrap();
        let mut cart = CartStore::new();
        assert_eq!(
            sel.add_to_cart(&mut cart).unwrap_err(),
            ComboError::NothingSelected
        );
        assert!(cart.is_empty());
    }

    #[test]
    fn add_to_cart_merges_and_respects_variant_stock() {
        let mut sel = ComboSelection::new(&combo());
        sel.choose_variant("a", "Size", "l").unwrap();
        let mut cart = CartStore::new();

        sel.add_to_cart(&mut cart).unwrap();
        let outcomes = sel.add_to_cart(&mut cart).unwrap();
        assert_eq!(outcomes.len(), 2);
        assert!(outcomes.iter().all(|o| o.result.is_ok()));

        assert_eq!(cart.len(), 2);
        assert_eq!(cart.item_count(), 4);
        assert_eq!(cart.subtotal(), Decimal::from(1800));
    }
}
