// Cart Totals
//
// Pure arithmetic over the in-progress transaction. No rounding here;
// currency rounding belongs to the presentation boundary.

use serde::Serialize;

use super::Cart;

/// Computed money amounts for one transaction.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Totals {
    pub subtotal: f64,
    pub tax: f64,
    pub discount: f64,
    pub grand_total: f64,
}

/// Compute subtotal, tax, discount, and grand total for `cart`.
///
/// `tax_pct` and `discount_pct` are percentages (5 means 5%).
pub fn compute_totals(cart: &Cart, tax_pct: f64, discount_pct: f64) -> Totals {
    let subtotal: f64 = cart
        .lines()
        .iter()
        .map(|line| line.price * f64::from(line.qty))
        .sum();
    let tax = subtotal * tax_pct / 100.0;
    let discount = subtotal * discount_pct / 100.0;

    Totals {
        subtotal,
        tax,
        discount,
        grand_total: subtotal + tax - discount,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cart::CartLine;
    use crate::ledger::ProductId;
    use proptest::prelude::*;

    fn cart_of(lines: &[(f64, u32)]) -> Cart {
        Cart {
            lines: lines
                .iter()
                .map(|&(price, qty)| CartLine {
                    product_id: ProductId::generate(),
                    name: String::new(),
                    price,
                    qty,
                })
                .collect(),
        }
    }

    #[test]
    fn worked_example() {
        let cart = cart_of(&[(50.0, 3)]);
        let totals = compute_totals(&cart, 5.0, 0.0);

        assert_eq!(totals.subtotal, 150.0);
        assert_eq!(totals.tax, 7.5);
        assert_eq!(totals.discount, 0.0);
        assert_eq!(totals.grand_total, 157.5);
    }

    #[test]
    fn zero_percentages_leave_grand_total_at_subtotal() {
        let cart = cart_of(&[(120.0, 2), (160.0, 1)]);
        let totals = compute_totals(&cart, 0.0, 0.0);

        assert_eq!(totals.subtotal, 400.0);
        assert_eq!(totals.tax, 0.0);
        assert_eq!(totals.discount, 0.0);
        assert_eq!(totals.grand_total, 400.0);
    }

    #[test]
    fn discount_subtracts_from_grand_total() {
        let cart = cart_of(&[(100.0, 1)]);
        let totals = compute_totals(&cart, 10.0, 25.0);

        assert_eq!(totals.tax, 10.0);
        assert_eq!(totals.discount, 25.0);
        assert_eq!(totals.grand_total, 85.0);
    }

    #[test]
    fn empty_cart_totals_are_zero() {
        let totals = compute_totals(&Cart::new(), 5.0, 10.0);

        assert_eq!(totals.subtotal, 0.0);
        assert_eq!(totals.tax, 0.0);
        assert_eq!(totals.discount, 0.0);
        assert_eq!(totals.grand_total, 0.0);
    }

    proptest! {
        // Doubling every quantity scales by an exact power of two, so
        // these hold exactly even in floating point.
        #[test]
        fn doubling_quantities_doubles_the_money(
            lines in proptest::collection::vec((0.01f64..500.0, 1u32..50), 1..8),
            tax_pct in 0.0f64..100.0,
            discount_pct in 0.0f64..100.0,
        ) {
            let cart = cart_of(&lines);
            let doubled: Vec<(f64, u32)> =
                lines.iter().map(|&(price, qty)| (price, qty * 2)).collect();
            let doubled = cart_of(&doubled);

            let base = compute_totals(&cart, tax_pct, discount_pct);
            let twice = compute_totals(&doubled, tax_pct, discount_pct);

            prop_assert_eq!(twice.subtotal, 2.0 * base.subtotal);
            prop_assert_eq!(twice.tax, 2.0 * base.tax);
            prop_assert_eq!(twice.discount, 2.0 * base.discount);
        }

        #[test]
        fn grand_total_identity_holds(
            lines in proptest::collection::vec((0.01f64..500.0, 1u32..50), 0..8),
            tax_pct in 0.0f64..100.0,
            discount_pct in 0.0f64..100.0,
        ) {
            let totals = compute_totals(&cart_of(&lines), tax_pct, discount_pct);
            prop_assert_eq!(totals.grand_total, totals.subtotal + totals.tax - totals.discount);
        }
    }
}
