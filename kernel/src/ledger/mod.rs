// Catalog & Sale Ledger
//
// The persisted store document: a mutable product catalog plus an
// append-only history of completed sales. Every mutation of the
// document goes through this module; durability lives in `store`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::cart::CartLine;

pub mod store;

/// Stable identifier for a catalog product, generated at creation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ProductId(pub Uuid);

impl ProductId {
    /// Generate a fresh identifier.
    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }
}

impl std::fmt::Display for ProductId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

impl std::str::FromStr for ProductId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(Uuid::parse_str(s)?))
    }
}

/// Time-derived identifier for a completed sale.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SaleId(pub String);

impl std::fmt::Display for SaleId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

/// Field values for creating or replacing a product record.
///
/// Missing numeric fields default to zero. A blank name is permitted
/// here; rejecting one is a presentation concern.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductFields {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub sku: String,
    #[serde(default)]
    pub cost: f64,
    #[serde(default)]
    pub price: f64,
    #[serde(default)]
    pub qty: u32,
    #[serde(default)]
    pub image: Option<String>,
}

/// One catalog record.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: ProductId,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub sku: String,
    #[serde(default)]
    pub cost: f64,
    #[serde(default)]
    pub price: f64,
    /// Quantity on hand. Unsigned, so it can never go negative.
    #[serde(default)]
    pub qty: u32,
    /// Optional base64 image payload.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
}

/// One line of a recorded sale.
///
/// Name and price are captured from the cart at checkout time; later
/// catalog edits or deletions do not touch them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaleItem {
    pub product_id: ProductId,
    #[serde(default)]
    pub name: String,
    pub qty: u32,
    pub price: f64,
}

/// A completed transaction. The ledger never edits or removes one.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Sale {
    pub id: SaleId,
    pub date: DateTime<Utc>,
    pub items: Vec<SaleItem>,
    pub total: f64,
}

/// The entire persisted state: store name, catalog, sale history.
///
/// Rewritten wholesale after every mutation; there are no partial
/// updates and no versioning.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Ledger {
    store_name: String,
    products: Vec<Product>,
    sales: Vec<Sale>,
}

impl Ledger {
    /// Create an empty document.
    pub fn new(store_name: impl Into<String>) -> Self {
        Self {
            store_name: store_name.into(),
            products: Vec::new(),
            sales: Vec::new(),
        }
    }

    /// The documented default document: a small seeded catalog and no
    /// sales. Taken when no document exists yet, and when an
    /// unreadable one is failed closed.
    pub fn starter(store_name: impl Into<String>) -> Self {
        let seed = [
            ("Espresso", 120.0, 50),
            ("Cappuccino", 160.0, 40),
            ("Latte", 180.0, 30),
            ("Sandwich", 200.0, 25),
            ("Burger", 250.0, 15),
        ];

        let mut ledger = Self::new(store_name);
        for (name, price, qty) in seed {
            ledger.add_product(ProductFields {
                name: name.into(),
                price,
                qty,
                ..ProductFields::default()
            });
        }
        ledger
    }

    pub fn store_name(&self) -> &str {
        &self.store_name
    }

    pub fn products(&self) -> &[Product] {
        &self.products
    }

    pub fn sales(&self) -> &[Sale] {
        &self.sales
    }

    /// Look up a product by identifier.
    pub fn product(&self, id: ProductId) -> Option<&Product> {
        self.products.iter().find(|p| p.id == id)
    }

    /// Products whose name contains `query`, case-insensitively.
    pub fn search_products(&self, query: &str) -> Vec<&Product> {
        let needle = query.to_lowercase();
        self.products
            .iter()
            .filter(|p| p.name.to_lowercase().contains(&needle))
            .collect()
    }

    /// Append a new product with a fresh identifier and return it.
    pub fn add_product(&mut self, fields: ProductFields) -> ProductId {
        let id = ProductId::generate();
        tracing::debug!(%id, name = %fields.name, "product added");
        self.products.push(Product {
            id,
            name: fields.name,
            category: fields.category,
            sku: fields.sku,
            cost: fields.cost,
            price: fields.price,
            qty: fields.qty,
            image: fields.image,
        });
        id
    }

    /// Replace the stored record for `id` with `fields`.
    ///
    /// Returns `false` (a no-op, not a failure) when `id` is absent;
    /// callers are responsible for existence checks.
    pub fn edit_product(&mut self, id: ProductId, fields: ProductFields) -> bool {
        match self.products.iter_mut().find(|p| p.id == id) {
            Some(product) => {
                product.name = fields.name;
                product.category = fields.category;
                product.sku = fields.sku;
                product.cost = fields.cost;
                product.price = fields.price;
                product.qty = fields.qty;
                product.image = fields.image;
                true
            }
            None => {
                tracing::debug!(%id, "edit of unknown product ignored");
                false
            }
        }
    }

    /// Remove the record for `id`.
    ///
    /// Returns `false` (a no-op) when `id` is absent. Sales that
    /// reference the removed product keep their captured name and
    /// price untouched.
    pub fn delete_product(&mut self, id: ProductId) -> bool {
        let before = self.products.len();
        self.products.retain(|p| p.id != id);
        let removed = self.products.len() != before;
        if removed {
            tracing::debug!(%id, "product deleted");
        }
        removed
    }

    /// Record a completed sale.
    ///
    /// Decrements each referenced product's stock by the purchased
    /// quantity, clamped at zero: oversell is permitted and the sale
    /// still records the requested quantity. Lines naming a product
    /// that no longer exists decrement nothing but still record.
    pub fn record_sale(&mut self, lines: &[CartLine], total: f64, now: DateTime<Utc>) -> Sale {
        for line in lines {
            if let Some(product) = self.products.iter_mut().find(|p| p.id == line.product_id) {
                product.qty = product.qty.saturating_sub(line.qty);
            }
        }

        let sale = Sale {
            id: self.fresh_sale_id(now),
            date: now,
            items: lines
                .iter()
                .map(|line| SaleItem {
                    product_id: line.product_id,
                    name: line.name.clone(),
                    qty: line.qty,
                    price: line.price,
                })
                .collect(),
            total,
        };

        tracing::info!(id = %sale.id, total, "sale recorded");
        self.sales.push(sale.clone());
        sale
    }

    // Sale identifiers derive from the millisecond timestamp. They
    // must stay unique within the document, so bump on collision.
    fn fresh_sale_id(&self, now: DateTime<Utc>) -> SaleId {
        let mut millis = now.timestamp_millis();
        loop {
            let candidate = SaleId(format!("s{millis}"));
            if !self.sales.iter().any(|s| s.id == candidate) {
                return candidate;
            }
            millis += 1;
        }
    }
}
