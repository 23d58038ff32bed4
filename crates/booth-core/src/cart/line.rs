use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// One chosen value on a variant axis, optionally carrying the stock
/// figure the storefront reported for that value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VariantSelection {
    pub name: String,
    pub value: String,
    /// Sent by the backend as a string; may be missing or malformed.
    #[serde(
        rename = "availableStock",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub available_stock: Option<String>,
}

impl VariantSelection {
    #[must_use]
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
            available_stock: None,
        }
    }

    #[must_use]
    pub fn with_stock(mut self, stock: u32) -> Self {
        self.available_stock = Some(stock.to_string());
        self
    }

    /// The parsed stock figure, or `None` when it is absent or unparseable.
    #[must_use]
    pub fn stock_figure(&self) -> Option<u32> {
        self.available_stock
            .as_deref()
            .and_then(|s| s.trim().parse::<u32>().ok())
    }
}

/// Structural identity of a cart line: the product plus its variant
/// choices sorted by name, so selection order never matters.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct LineKey {
    pub product_id: String,
    pub variants: Vec<(String, String)>,
}

impl LineKey {
    #[must_use]
    pub fn new(product_id: &str, variants: &[VariantSelection]) -> Self {
        let mut pairs: Vec<(String, String)> = variants
            .iter()
            .map(|v| (v.name.clone(), v.value.clone()))
            .collect();
        pairs.sort();
        Self {
            product_id: product_id.to_string(),
            variants: pairs,
        }
    }
}

impl std::fmt::Display for LineKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.product_id)?;
        if !self.variants.is_empty() {
            let joined: Vec<String> = self
                .variants
                .iter()
                .map(|(name, value)| format!("{name}={value}"))
                .collect();
            write!(f, " [{}]", joined.join(", "))?;
        }
        Ok(())
    }
}

/// A cart entry with its price and stock snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartLine {
    pub product_id: String,
    pub name: String,
    #[serde(default)]
    pub code: String,
    #[serde(default)]
    pub thumbnail: String,
    #[serde(alias = "price")]
    pub unit_price: Decimal,
    pub quantity: u32,
    #[serde(default)]
    pub variants: Vec<VariantSelection>,
    #[serde(default)]
    pub available_stock: u32,
}

impl CartLine {
    #[must_use]
    pub fn key(&self) -> LineKey {
        LineKey::new(&self.product_id, &self.variants)
    }

    #[must_use]
    pub fn line_total(&self) -> Decimal {
        self.unit_price * Decimal::from(self.quantity)
    }

    /// Upper quantity bound for this line.
    ///
    /// With variants the bound is the smallest variant stock figure that
    /// can be read. When no variant figure is readable the product-level
    /// `available_stock` is used instead of failing.
    #[must_use]
    pub fn stock_limit(&self) -> u32 {
        self.variants
            .iter()
            .filter_map(VariantSelection::stock_figure)
            .min()
            .unwrap_or(self.available_stock)
    }
}
