// Checkout
//
// Converts the in-progress cart into a permanent sale:
// totals -> record sale -> outcome. The caller clears the cart after
// a successful checkout, which keeps this pipeline free of
// view-refresh side effects.

use chrono::{DateTime, Utc};

use crate::cart::totals::{compute_totals, Totals};
use crate::cart::Cart;
use crate::ledger::{Ledger, Sale};

/// Errors produced during checkout.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum CheckoutError {
    /// Checkout was attempted on an empty cart. Nothing was mutated.
    #[error("cannot check out an empty cart")]
    EmptyCart,
}

/// Result of a successful checkout.
#[derive(Debug, Clone)]
pub struct CheckoutOutcome {
    pub sale: Sale,
    pub totals: Totals,
}

/// Check out `cart` against `ledger`.
///
/// Computes the totals, records the sale (decrementing stock), and
/// returns both. The cart itself is left untouched.
pub fn checkout(
    cart: &Cart,
    tax_pct: f64,
    discount_pct: f64,
    ledger: &mut Ledger,
    now: DateTime<Utc>,
) -> Result<CheckoutOutcome, CheckoutError> {
    if cart.is_empty() {
        return Err(CheckoutError::EmptyCart);
    }

    let totals = compute_totals(cart, tax_pct, discount_pct);
    let sale = ledger.record_sale(cart.lines(), totals.grand_total, now);

    Ok(CheckoutOutcome { sale, totals })
}
