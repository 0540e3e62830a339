// Views
//
// Human-readable renderings of ledger state. All currency rounding
// happens here, at the presentation boundary.

use till_kernel::config::RegisterConfig;
use till_kernel::ledger::{Ledger, Product};
use till_kernel::report::DashboardSummary;

fn money(config: &RegisterConfig, v: f64) -> String {
    format!("{}{:.2}", config.currency, v)
}

pub fn dashboard(summary: &DashboardSummary, config: &RegisterConfig) {
    println!("Total sales:  {}", money(config, summary.gross_sales));
    println!("Orders:       {}", summary.orders);
    println!("Products:     {}", summary.products);
    println!("Stock value:  {}", money(config, summary.stock_value));
}

pub fn product_list(products: &[&Product], config: &RegisterConfig) {
    if products.is_empty() {
        println!("No products");
        return;
    }
    for p in products {
        println!("{}  {}  {}  stock {}", p.id, p.name, money(config, p.price), p.qty);
    }
}

pub fn inventory(ledger: &Ledger, config: &RegisterConfig) {
    if ledger.products().is_empty() {
        println!("No products");
        return;
    }
    for p in ledger.products() {
        println!("{} — {} — qty {}", p.name, money(config, p.price), p.qty);
    }
}

pub fn sales(ledger: &Ledger, config: &RegisterConfig) {
    if ledger.sales().is_empty() {
        println!("No sales yet");
        return;
    }
    for sale in ledger.sales().iter().rev() {
        println!("Order #{} • {}", sale.id, sale.date.to_rfc3339());
        println!("  Total: {}", money(config, sale.total));
        for item in &sale.items {
            // Deleted products keep their captured name in history;
            // mark them so the operator knows the id is gone.
            let marker = if ledger.product(item.product_id).is_none() {
                " (deleted)"
            } else {
                ""
            };
            println!(
                "  {}{}  x{}  {}",
                item.name,
                marker,
                item.qty,
                money(config, item.price * f64::from(item.qty))
            );
        }
    }
}
