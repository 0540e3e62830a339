// Reports
//
// Read-only summaries over the ledger: the dashboard numbers and the
// text receipt for a completed checkout. Amounts are rounded to two
// decimals here, at the presentation boundary.

use std::fmt::Write as _;

use serde::Serialize;

use crate::checkout::CheckoutOutcome;
use crate::ledger::Ledger;

/// Headline numbers for the dashboard view.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardSummary {
    /// Sum of every recorded sale's grand total.
    pub gross_sales: f64,
    pub orders: usize,
    pub products: usize,
    /// Price times quantity on hand, summed over the catalog.
    pub stock_value: f64,
}

/// Compute the dashboard numbers for `ledger`.
pub fn summarize(ledger: &Ledger) -> DashboardSummary {
    DashboardSummary {
        gross_sales: ledger.sales().iter().map(|s| s.total).sum(),
        orders: ledger.sales().len(),
        products: ledger.products().len(),
        stock_value: ledger
            .products()
            .iter()
            .map(|p| p.price * f64::from(p.qty))
            .sum(),
    }
}

/// Render a plain-text receipt for a completed checkout.
pub fn receipt(outcome: &CheckoutOutcome, store_name: &str, currency: &str) -> String {
    let money = |v: f64| format!("{currency}{v:.2}");

    let mut out = String::new();
    let _ = writeln!(out, "{store_name}");
    let _ = writeln!(out, "Order: {}", outcome.sale.id);
    let _ = writeln!(out, "Date: {}", outcome.sale.date.to_rfc3339());
    let _ = writeln!(out);
    for item in &outcome.sale.items {
        let _ = writeln!(
            out,
            "{} x{}  {}",
            item.name,
            item.qty,
            money(item.price * f64::from(item.qty))
        );
    }
    let _ = writeln!(out);
    let _ = writeln!(out, "Subtotal: {}", money(outcome.totals.subtotal));
    let _ = writeln!(out, "Tax: {}", money(outcome.totals.tax));
    let _ = writeln!(out, "Discount: {}", money(outcome.totals.discount));
    let _ = writeln!(out, "Total: {}", money(outcome.totals.grand_total));
    let _ = writeln!(out);
    let _ = writeln!(out, "Thank you!");
    out
}
