//! Shopping cart data shapes.

use serde::{Deserialize, Serialize};

/// Product snapshot handed to the cart by listing or detail pages.
///
/// Mirrors the product payload returned by the catalog API; only the fields
/// the cart needs are kept. A missing `id` makes the product un-addable.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ProductSummary {
    #[serde(default)]
    pub id: Option<u64>,
    #[serde(default)]
    pub slug: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub thumbnail: String,
    #[serde(default)]
    pub price: f64,
    #[serde(default)]
    pub sale_price: Option<f64>,
    #[serde(default)]
    pub product_category: Option<String>,
    #[serde(default)]
    pub stock: Option<u32>,
}

impl ProductSummary {
    /// Upper quantity bound, when the stock count is known and positive.
    ///
    /// An unknown or zero stock imposes no bound (out-of-stock display is the
    /// page's concern, not the cart's).
    pub fn stock_limit(&self) -> Option<u32> {
        self.stock.filter(|s| *s > 0)
    }
}

/// One cart line, keyed by `product_id`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CartItem {
    pub product_id: u64,
    #[serde(default)]
    pub slug: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub thumbnail: String,
    #[serde(default)]
    pub price: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sale_price: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub product_category: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stock: Option<u32>,
    pub quantity: u32,
    #[serde(default)]
    pub added_at: String,
}

impl CartItem {
    /// Effective unit price: sale price wins over list price when present.
    pub fn unit_price(&self) -> f64 {
        self.sale_price.unwrap_or(self.price)
    }

    pub fn line_total(&self) -> f64 {
        self.unit_price() * f64::from(self.quantity)
    }

    /// Upper quantity bound from the stock recorded at add time.
    pub fn stock_limit(&self) -> Option<u32> {
        self.stock.filter(|s| *s > 0)
    }
}

/// The cart ledger: one singleton per browser profile.
///
/// Items are ordered newest-first (new lines are unshifted to the front);
/// quantity updates keep their position.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Cart {
    #[serde(default)]
    pub items: Vec<CartItem>,
}

impl Cart {
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Sum of quantities across all lines.
    pub fn item_count(&self) -> u32 {
        self.items.iter().map(|it| it.quantity).sum()
    }

    /// Order total using each line's effective unit price.
    pub fn total(&self) -> f64 {
        self.items.iter().map(CartItem::line_total).sum()
    }

    pub fn find(&self, product_id: u64) -> Option<&CartItem> {
        self.items.iter().find(|it| it.product_id == product_id)
    }
}
