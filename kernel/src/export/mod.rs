// Exports
//
// Flat tabular extracts over the ledger collections, produced on
// demand and never persisted. Every field is quoted.

use csv::{QuoteStyle, WriterBuilder};

use crate::ledger::Ledger;

/// Raised when an extract cannot be produced.
#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    #[error("csv writer: {0}")]
    Csv(#[from] csv::Error),

    #[error("csv flush: {0}")]
    Io(#[from] std::io::Error),

    #[error("extract is not utf-8: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),
}

/// Product extract: `id,name,category,sku,cost,price,qty`.
pub fn products_csv(ledger: &Ledger) -> Result<String, ExportError> {
    let mut buf = Vec::new();
    {
        let mut writer = quoted_writer(&mut buf);
        writer.write_record(["id", "name", "category", "sku", "cost", "price", "qty"])?;
        for p in ledger.products() {
            writer.write_record([
                p.id.to_string(),
                p.name.clone(),
                p.category.clone(),
                p.sku.clone(),
                p.cost.to_string(),
                p.price.to_string(),
                p.qty.to_string(),
            ])?;
        }
        writer.flush()?;
    }
    Ok(String::from_utf8(buf)?)
}

/// Sale extract: `saleId,date,total,items`, where `items` is a
/// semicolon-separated list of `productId:quantity` pairs.
pub fn sales_csv(ledger: &Ledger) -> Result<String, ExportError> {
    let mut buf = Vec::new();
    {
        let mut writer = quoted_writer(&mut buf);
        writer.write_record(["saleId", "date", "total", "items"])?;
        for sale in ledger.sales() {
            let items = sale
                .items
                .iter()
                .map(|item| format!("{}:{}", item.product_id, item.qty))
                .collect::<Vec<_>>()
                .join(";");
            writer.write_record([
                sale.id.to_string(),
                sale.date.to_rfc3339(),
                sale.total.to_string(),
                items,
            ])?;
        }
        writer.flush()?;
    }
    Ok(String::from_utf8(buf)?)
}

fn quoted_writer(buf: &mut Vec<u8>) -> csv::Writer<&mut Vec<u8>> {
    WriterBuilder::new()
        .quote_style(QuoteStyle::Always)
        .from_writer(buf)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cart::Cart;
    use crate::ledger::ProductFields;
    use chrono::{TimeZone, Utc};

    #[test]
    fn product_extract_has_the_expected_columns() {
        let mut ledger = Ledger::new("Test");
        ledger.add_product(ProductFields {
            name: "Espresso".into(),
            category: "Drinks".into(),
            sku: "ESP-1".into(),
            cost: 40.0,
            price: 120.0,
            qty: 50,
            ..ProductFields::default()
        });

        let csv = products_csv(&ledger).unwrap();
        let lines: Vec<&str> = csv.lines().collect();

        assert_eq!(
            lines[0],
            "\"id\",\"name\",\"category\",\"sku\",\"cost\",\"price\",\"qty\""
        );
        let id = ledger.products()[0].id;
        assert_eq!(
            lines[1],
            format!("\"{id}\",\"Espresso\",\"Drinks\",\"ESP-1\",\"40\",\"120\",\"50\"")
        );
    }

    #[test]
    fn embedded_quotes_are_escaped() {
        let mut ledger = Ledger::new("Test");
        ledger.add_product(ProductFields {
            name: "12\" Sub".into(),
            ..ProductFields::default()
        });

        let csv = products_csv(&ledger).unwrap();
        assert!(csv.contains("\"12\"\" Sub\""));
    }

    #[test]
    fn sale_extract_joins_items_with_semicolons() {
        let mut ledger = Ledger::new("Test");
        let espresso = ledger.add_product(ProductFields {
            name: "Espresso".into(),
            price: 120.0,
            qty: 50,
            ..ProductFields::default()
        });
        let latte = ledger.add_product(ProductFields {
            name: "Latte".into(),
            price: 180.0,
            qty: 30,
            ..ProductFields::default()
        });

        let mut cart = Cart::new();
        let index = cart.add_line(ledger.product(espresso).unwrap());
        cart.set_line_quantity(index, 2);
        cart.add_line(ledger.product(latte).unwrap());

        let now = Utc.with_ymd_and_hms(2026, 1, 15, 12, 0, 0).unwrap();
        let sale = ledger.record_sale(cart.lines(), 420.0, now);

        let csv = sales_csv(&ledger).unwrap();
        let lines: Vec<&str> = csv.lines().collect();

        assert_eq!(lines[0], "\"saleId\",\"date\",\"total\",\"items\"");
        assert_eq!(
            lines[1],
            format!(
                "\"{}\",\"{}\",\"420\",\"{espresso}:2;{latte}:1\"",
                sale.id,
                now.to_rfc3339()
            )
        );
    }

    #[test]
    fn empty_ledger_exports_headers_only() {
        let ledger = Ledger::new("Test");

        assert_eq!(products_csv(&ledger).unwrap().lines().count(), 1);
        assert_eq!(sales_csv(&ledger).unwrap().lines().count(), 1);
    }
}
