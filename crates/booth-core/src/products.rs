use std::collections::BTreeMap;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::cart::{CartLine, VariantSelection};

/// A catalog product as returned by the storefront backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    #[serde(rename = "_id")]
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub slug: Option<String>,
    #[serde(default)]
    pub code: String,
    #[serde(default)]
    pub thumbnail: String,
    pub price: Decimal,
    /// Amount taken off `price`; zero or absent means no markdown.
    #[serde(default)]
    pub discount_price: Option<Decimal>,
    #[serde(default)]
    pub quantity: Option<u32>,
    #[serde(default)]
    pub stock: Option<u32>,
    #[serde(default)]
    pub variants: Vec<ProductVariant>,
    #[serde(default)]
    pub is_featured: bool,
}

/// A named variant axis, e.g. `"Shade"` with one value per shade.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductVariant {
    pub name: String,
    #[serde(default)]
    pub values: Vec<VariantValue>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VariantValue {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub value: String,
    #[serde(default)]
    pub quantity: u32,
}

impl VariantValue {
    fn matches(&self, selected: &str) -> bool {
        self.value == selected || self.name == selected
    }
}

impl Product {
    /// Price the customer pays for one unit.
    #[must_use]
    pub fn effective_price(&self) -> Decimal {
        match self.discount_price {
            Some(off) if off > Decimal::ZERO && off < self.price => self.price - off,
            _ => self.price,
        }
    }

    #[must_use]
    pub fn has_discount(&self) -> bool {
        self.effective_price() < self.price
    }

    /// Product-level stock figure; `quantity` wins over `stock` when both are sent.
    #[must_use]
    pub fn available_stock(&self) -> u32 {
        self.quantity.or(self.stock).unwrap_or(0)
    }

    /// Stock available for the given variant selection.
    ///
    /// Without variants this is the product stock. With variants it is the
    /// smallest quantity among the selected values; selections that match
    /// no value are ignored, and `0` is returned when nothing matches.
    #[must_use]
    pub fn available_quantity(&self, selection: &BTreeMap<String, String>) -> u32 {
        if self.variants.is_empty() {
            return self.available_stock();
        }

        self.variants
            .iter()
            .filter_map(|variant| {
                let selected = selection.get(&variant.name)?;
                variant.values.iter().find(|v| v.matches(selected))
            })
            .map(|v| v.quantity)
            .min()
            .unwrap_or(0)
    }

    /// Stock of one selected variant value, if it can be found.
    #[must_use]
    pub fn variant_stock(&self, variant_name: &str, selected: &str) -> Option<u32> {
        self.variants
            .iter()
            .find(|v| v.name == variant_name)?
            .values
            .iter()
            .find(|v| v.matches(selected))
            .map(|v| v.quantity)
    }

    /// Initial variant selection: prefer a value that is in stock, else the
    /// first value. `existing` (typically the selection of a matching cart
    /// line) wins for any variant it names.
    #[must_use]
    pub fn default_selection(
        &self,
        existing: Option<&BTreeMap<String, String>>,
    ) -> BTreeMap<String, String> {
        let mut selection = BTreeMap::new();
        for variant in &self.variants {
            if let Some(chosen) = existing.and_then(|e| e.get(&variant.name)) {
                selection.insert(variant.name.clone(), chosen.clone());
                continue;
            }
            let pick = variant
                .values
                .iter()
                .find(|v| v.quantity > 0)
                .or_else(|| variant.values.first());
            if let Some(value) = pick {
                selection.insert(variant.name.clone(), display_value(value).to_string());
            }
        }
        selection
    }

    /// Build a cart line for `quantity` units with the given selection.
    ///
    /// Selected values are stored in their canonical `value` form, so a
    /// selection made by display name and one made by value land on the
    /// same cart line. Each variant carries its own stock figure when it
    /// can be resolved.
    #[must_use]
    pub fn cart_line(&self, quantity: u32, selection: &BTreeMap<String, String>) -> CartLine {
        let variants = self
            .variants
            .iter()
            .filter_map(|variant| {
                let selected = selection.get(&variant.name)?;
                let found = variant.values.iter().find(|v| v.matches(selected));
                let value = found.map_or(selected.as_str(), canonical_value);
                Some(VariantSelection {
                    name: variant.name.clone(),
                    value: value.to_string(),
                    available_stock: found.map(|v| v.quantity.to_string()),
                })
            })
            .collect();

        CartLine {
            product_id: self.id.clone(),
            name: self.name.clone(),
            code: self.code.clone(),
            thumbnail: self.thumbnail.clone(),
            unit_price: self.effective_price(),
            quantity,
            variants,
            available_stock: self.available_stock(),
        }
    }

    /// Storefront path for this product, preferring the slug.
    #[must_use]
    pub fn path(&self) -> String {
        format!("/products/{}", self.slug.as_deref().unwrap_or(&self.id))
    }
}

fn canonical_value(value: &VariantValue) -> &str {
    if value.value.is_empty() {
        &value.name
    } else {
        &value.value
    }
}

fn display_value(value: &VariantValue) -> &str {
    if value.name.is_empty() {
        &value.value
    } else {
        &value.name
    }
}

/// A bundle of independently selectable products.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComboProduct {
    #[serde(rename = "_id")]
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub slug: Option<String>,
    #[serde(default)]
    pub thumbnail: Option<String>,
    #[serde(default, alias = "products")]
    pub items: Vec<Product>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Category {
    #[serde(rename = "_id")]
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub slug: Option<String>,
    #[serde(default)]
    pub children: Vec<Category>,
}

impl Category {
    /// Depth-first search by id or slug.
    #[must_use]
    pub fn find(&self, key: &str) -> Option<&Category> {
        if self.id == key || self.slug.as_deref() == Some(key) {
            return Some(self);
        }
        self.children.iter().find_map(|c| c.find(key))
    }
}

/// Catalog listing filter: flag pairs such as `("is_featured", "true")`,
/// an optional category, and a page window.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductQuery {
    pub flags: Vec<(String, String)>,
    pub category: Option<String>,
    pub search: Option<String>,
    pub page: u32,
    pub limit: u32,
}

impl Default for ProductQuery {
    fn default() -> Self {
        Self {
            flags: Vec::new(),
            category: None,
            search: None,
            page: 1,
            limit: 15,
        }
    }
}

impl ProductQuery {
    #[must_use]
    pub fn featured() -> Self {
        Self::default().with_flag("is_featured", "true")
    }

    #[must_use]
    pub fn with_flag(mut self, name: &str, value: &str) -> Self {
        self.flags.push((name.to_string(), value.to_string()));
        self
    }

    /// Query-string pairs in a stable order. Page numbers below 1 are sent as 1.
    #[must_use]
    pub fn to_query_pairs(&self) -> Vec<(String, String)> {
        let mut pairs: Vec<(String, String)> = self.flags.clone();
        if let Some(category) = &self.category {
            pairs.push(("category".to_string(), category.clone()));
        }
        if let Some(search) = &self.search {
            pairs.push(("searchTerm".to_string(), search.clone()));
        }
        pairs.push(("page".to_string(), self.page.max(1).to_string()));
        pairs.push(("limit".to_string(), self.limit.to_string()));
        pairs
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageMeta {
    pub page: u32,
    pub limit: u32,
    pub total: u32,
}

impl PageMeta {
    #[must_use]
    pub fn total_pages(&self) -> u32 {
        if self.limit == 0 {
            return 0;
        }
        self.total.div_ceil(self.limit)
    }

    #[must_use]
    pub fn has_next(&self) -> bool {
        self.page < self.total_pages()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lipstick() -> Product {
        serde_json::from_value(serde_json::json!({
            "_id": "p1",
            "name": "Velvet Lipstick",
            "slug": "velvet-lipstick",
            "code": "VL-01",
            "thumbnail": "https://cdn.example.com/vl.png",
            "price": 1200,
            "discount_price": 200,
            "quantity": 9,
            "variants": [
                { "name": "Shade", "values": [
                    { "name": "Rose", "value": "rose", "quantity": 0 },
                    { "name": "Coral", "value": "coral", "quantity": 4 }
                ]},
                { "name": "Size", "values": [
                    { "name": "Mini", "value": "mini", "quantity": 7 }
                ]}
            ]
        }))
        .unwrap()
    }

    #[test]
    fn effective_price_subtracts_discount() {
        let p = lipstick();
        assert_eq!(p.effective_price(), Decimal::from(1000));
        assert!(p.has_discount());
    }

    #[test]
    fn effective_price_ignores_zero_discount() {
        let mut p = lipstick();
        p.discount_price = Some(Decimal::ZERO);
        assert_eq!(p.effective_price(), Decimal::from(1200));
        assert!(!p.has_discount());
    }

    #[test]
    fn available_quantity_takes_min_over_selected_values() {
        let p = lipstick();
        let selection = BTreeMap::from([
            ("Shade".to_string(), "coral".to_string()),
            ("Size".to_string(), "Mini".to_string()),
        ]);
        assert_eq!(p.available_quantity(&selection), 4);
    }

    #[test]
    fn available_quantity_without_match_is_zero() {
        let p = lipstick();
        let selection = BTreeMap::from([("Shade".to_string(), "plum".to_string())]);
        assert_eq!(p.available_quantity(&selection), 0);
    }

    #[test]
    fn available_quantity_without_variants_uses_stock() {
        let mut p = lipstick();
        p.variants.clear();
        assert_eq!(p.available_quantity(&BTreeMap::new()), 9);
    }

    #[test]
    fn stock_falls_back_to_stock_field() {
        let mut p = lipstick();
        p.quantity = None;
        p.stock = Some(3);
        assert_eq!(p.available_stock(), 3);
    }

    #[test]
    fn default_selection_prefers_in_stock_values() {
        let p = lipstick();
        let selection = p.default_selection(None);
        assert_eq!(selection.get("Shade").map(String::as_str), Some("Coral"));
        assert_eq!(selection.get("Size").map(String::as_str), Some("Mini"));
    }

    #[test]
    fn default_selection_keeps_existing_choice() {
        let p = lipstick();
        let existing = BTreeMap::from([("Shade".to_string(), "rose".to_string())]);
        let selection = p.default_selection(Some(&existing));
        assert_eq!(selection.get("Shade").map(String::as_str), Some("rose"));
    }

    #[test]
    fn cart_line_uses_effective_price_and_canonical_values() {
        let p = lipstick();
        let selection = BTreeMap::from([
            ("Shade".to_string(), "Coral".to_string()),
            ("Size".to_string(), "mini".to_string()),
        ]);
        let line = p.cart_line(2, &selection);
        assert_eq!(line.unit_price, Decimal::from(1000));
        assert_eq!(line.available_stock, 9);
        assert_eq!(line.variants[0].value, "coral");
        assert_eq!(line.variants[0].stock_figure(), Some(4));
        assert_eq!(line.stock_limit(), 4);

        let by_value = BTreeMap::from([
            ("Shade".to_string(), "coral".to_string()),
            ("Size".to_string(), "Mini".to_string()),
        ]);
        assert_eq!(p.cart_line(1, &by_value).key(), line.key());
    }

    #[test]
    fn query_pairs_include_flags_and_paging() {
        let mut q = ProductQuery::featured();
        q.category = Some("skincare".to_string());
        q.page = 0;
        let pairs = q.to_query_pairs();
        assert_eq!(
            pairs,
            vec![
                ("is_featured".to_string(), "true".to_string()),
                ("category".to_string(), "skincare".to_string()),
                ("page".to_string(), "1".to_string()),
                ("limit".to_string(), "15".to_string()),
            ]
        );
    }

    #[test]
    fn page_meta_total_pages_rounds_up() {
        let meta = PageMeta {
            page: 2,
            limit: 15,
            total: 31,
        };
        assert_eq!(meta.total_pages(), 3);
        assert!(meta.has_next());
    }

    #[test]
    fn category_find_searches_children() {
        let tree: Category = serde_json::from_value(serde_json::json!({
            "_id": "c1", "name": "Makeup", "slug": "makeup",
            "children": [{ "_id": "c2", "name": "Lips", "slug": "lips" }]
        }))
        .unwrap();
        assert_eq!(tree.find("lips").map(|c| c.id.as_str()), Some("c2"));
        assert!(tree.find("hair").is_none());
    }
}
