// Cart
//
// The in-progress transaction: a transient list of lines that lives
// only in memory. Lifecycle is
// Empty -> Populated -> (Cleared | Checked-out) -> Empty.

use serde::Serialize;

use crate::ledger::{Product, ProductId};

pub mod totals;

/// One product/quantity/price entry in the in-progress transaction.
///
/// `name` and `price` are captured when the product is first added and
/// never re-read from the catalog, so an in-progress cart is immune to
/// later catalog edits.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CartLine {
    pub product_id: ProductId,
    pub name: String,
    pub price: f64,
    pub qty: u32,
}

/// The in-progress transaction.
#[derive(Debug, Clone, Default)]
pub struct Cart {
    lines: Vec<CartLine>,
}

impl Cart {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Add one unit of `product` and return the affected line's index.
    ///
    /// An existing line for the same product grows by exactly one;
    /// otherwise a new line captures the product's current name and
    /// price with quantity 1.
    pub fn add_line(&mut self, product: &Product) -> usize {
        if let Some(index) = self.lines.iter().position(|l| l.product_id == product.id) {
            self.lines[index].qty += 1;
            return index;
        }

        self.lines.push(CartLine {
            product_id: product.id,
            name: product.name.clone(),
            price: product.price,
            qty: 1,
        });
        self.lines.len() - 1
    }

    /// Replace the quantity of the line at `index`, clamped to a
    /// minimum of 1. Returns `false` (a no-op) on an out-of-range
    /// index.
    pub fn set_line_quantity(&mut self, index: usize, qty: u32) -> bool {
        match self.lines.get_mut(index) {
            Some(line) => {
                line.qty = qty.max(1);
                true
            }
            None => false,
        }
    }

    /// Remove the line at `index`. Returns `false` (a no-op) on an
    /// out-of-range index.
    pub fn remove_line(&mut self, index: usize) -> bool {
        if index < self.lines.len() {
            self.lines.remove(index);
            true
        } else {
            false
        }
    }

    pub fn clear(&mut self) {
        self.lines.clear();
    }
}
