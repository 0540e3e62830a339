use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use chrono::Utc;
use clap::{Args, Parser, Subcommand};

use till_kernel::cart::Cart;
use till_kernel::checkout::checkout;
use till_kernel::config::RegisterConfig;
use till_kernel::export;
use till_kernel::ledger::store::{JsonFileStore, LedgerStore, LoadOutcome};
use till_kernel::ledger::{Ledger, Product, ProductFields, ProductId};
use till_kernel::report;

mod views;

/// Till point-of-sale CLI
#[derive(Parser, Debug)]
#[command(name = "till")]
#[command(about = "Single-store point of sale over one JSON document", long_about = None)]
struct Cli {
    /// Path to the ledger document
    #[arg(long, default_value = "pos_demo_v1.json")]
    store: PathBuf,

    /// Path to register config JSON
    #[arg(long)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Headline numbers for the store
    Dashboard,
    /// Manage the product catalog
    Products {
        #[command(subcommand)]
        action: ProductAction,
    },
    /// Stock listing
    Inventory,
    /// Sale history, newest first
    Sales,
    /// Build a cart and check it out
    Sell {
        /// Cart line as <productId>:<qty>; repeatable
        #[arg(long = "line", required = true)]
        lines: Vec<String>,
        /// Tax percentage (defaults to the register config)
        #[arg(long)]
        tax: Option<f64>,
        /// Discount percentage (defaults to the register config)
        #[arg(long)]
        discount: Option<f64>,
    },
    /// Tabular extracts
    Export {
        #[command(subcommand)]
        target: ExportTarget,
    },
    /// Replace the document with the starter document
    Reset {
        /// Confirm discarding all data
        #[arg(long)]
        force: bool,
    },
}

#[derive(Subcommand, Debug)]
enum ProductAction {
    /// List products, optionally filtered by name
    List {
        #[arg(long)]
        search: Option<String>,
    },
    /// Add a product
    Add {
        #[command(flatten)]
        fields: ProductArgs,
    },
    /// Edit a product; omitted fields keep their stored values
    Edit {
        id: ProductId,
        #[command(flatten)]
        fields: ProductArgs,
    },
    /// Delete a product
    Delete { id: ProductId },
}

#[derive(Args, Debug)]
struct ProductArgs {
    #[arg(long)]
    name: Option<String>,

    #[arg(long)]
    category: Option<String>,

    #[arg(long)]
    sku: Option<String>,

    #[arg(long)]
    cost: Option<f64>,

    #[arg(long)]
    price: Option<f64>,

    #[arg(long)]
    qty: Option<u32>,

    /// Image file, stored as a base64 payload
    #[arg(long)]
    image: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
enum ExportTarget {
    /// Product extract: id,name,category,sku,cost,price,qty
    Products {
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// Sale extract: saleId,date,total,items
    Sales {
        #[arg(long)]
        out: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    // Views print to stdout; diagnostics stay on stderr.
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "till=info,till_kernel=warn".into());
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    run(Cli::parse())
}

fn run(cli: Cli) -> Result<()> {
    let config = load_config(cli.config.as_deref())?;
    let mut store = JsonFileStore::new(&cli.store);

    // Reset never reads the old document.
    if let Command::Reset { force } = cli.command {
        if !force {
            bail!("reset discards all data; pass --force to confirm");
        }
        store.save(&Ledger::starter(&config.store_name))?;
        println!("store reset");
        return Ok(());
    }

    // ----------------------------
    // Load the document
    // ----------------------------
    let mut ledger = match store.load(Ledger::starter(&config.store_name))? {
        LoadOutcome::Loaded(ledger) => ledger,
        LoadOutcome::Fresh(ledger) => {
            tracing::info!(path = %cli.store.display(), "no document yet; starting fresh");
            ledger
        }
        LoadOutcome::Defaulted { ledger, reason } => {
            tracing::warn!(%reason, "document was unreadable; starter substituted");
            ledger
        }
    };

    match cli.command {
        Command::Dashboard => {
            views::dashboard(&report::summarize(&ledger), &config);
        }
        Command::Products { action } => match action {
            ProductAction::List { search } => {
                let products: Vec<&Product> = match &search {
                    Some(query) => ledger.search_products(query),
                    None => ledger.products().iter().collect(),
                };
                views::product_list(&products, &config);
            }
            ProductAction::Add { fields } => {
                let id = ledger.add_product(new_product_fields(fields)?);
                store.save(&ledger)?;
                println!("added {id}");
            }
            ProductAction::Edit { id, fields } => {
                let Some(existing) = ledger.product(id) else {
                    bail!("no product {id}");
                };
                let fields = merged_product_fields(existing, fields)?;
                ledger.edit_product(id, fields);
                store.save(&ledger)?;
                println!("updated {id}");
            }
            ProductAction::Delete { id } => {
                if ledger.delete_product(id) {
                    store.save(&ledger)?;
                    println!("deleted {id}");
                } else {
                    println!("no product {id}");
                }
            }
        },
        Command::Inventory => {
            views::inventory(&ledger, &config);
        }
        Command::Sales => {
            views::sales(&ledger, &config);
        }
        Command::Sell { lines, tax, discount } => {
            let mut cart = Cart::new();
            for entry in &lines {
                let (id, qty) = parse_cart_line(entry)?;
                let Some(product) = ledger.product(id) else {
                    bail!("no product {id}");
                };
                if qty > product.qty {
                    println!(
                        "warning: {} has {} in stock, selling {}",
                        product.name, product.qty, qty
                    );
                }
                let index = cart.add_line(product);
                // Repeated lines for one product accumulate.
                let merged = (cart.lines()[index].qty - 1).saturating_add(qty);
                cart.set_line_quantity(index, merged);
            }

            let tax = tax.unwrap_or(config.tax_pct);
            let discount = discount.unwrap_or(config.discount_pct);
            let outcome = checkout(&cart, tax, discount, &mut ledger, Utc::now())?;
            cart.clear();
            store.save(&ledger)?;

            print!("{}", report::receipt(&outcome, ledger.store_name(), &config.currency));
        }
        Command::Export { target } => {
            let (csv, out) = match target {
                ExportTarget::Products { out } => (export::products_csv(&ledger)?, out),
                ExportTarget::Sales { out } => (export::sales_csv(&ledger)?, out),
            };
            match out {
                Some(path) => {
                    fs::write(&path, csv)
                        .with_context(|| format!("writing {}", path.display()))?;
                    println!("wrote {}", path.display());
                }
                None => print!("{csv}"),
            }
        }
        Command::Reset { .. } => {}
    }

    Ok(())
}

fn load_config(path: Option<&Path>) -> Result<RegisterConfig> {
    match path {
        Some(path) => {
            let raw = fs::read_to_string(path)
                .with_context(|| format!("reading {}", path.display()))?;
            Ok(serde_json::from_str(&raw)?)
        }
        None => Ok(RegisterConfig::default_register()),
    }
}

fn parse_cart_line(entry: &str) -> Result<(ProductId, u32)> {
    let Some((id, qty)) = entry.rsplit_once(':') else {
        bail!("line must be <productId>:<qty>, got `{entry}`");
    };
    let id: ProductId = id.parse().with_context(|| format!("bad product id `{id}`"))?;
    let qty: u32 = qty.parse().with_context(|| format!("bad quantity `{qty}`"))?;
    if qty == 0 {
        bail!("quantity must be at least 1");
    }
    Ok((id, qty))
}

fn new_product_fields(args: ProductArgs) -> Result<ProductFields> {
    let Some(name) = args.name else {
        bail!("--name is required when adding a product");
    };
    Ok(ProductFields {
        name,
        category: args.category.unwrap_or_default(),
        sku: args.sku.unwrap_or_default(),
        cost: args.cost.unwrap_or_default(),
        price: args.price.unwrap_or_default(),
        qty: args.qty.unwrap_or_default(),
        image: read_image(args.image.as_deref())?,
    })
}

// The edit-form analog: start from the stored record and overlay what
// was supplied. In particular the stored image survives an edit that
// does not mention one.
fn merged_product_fields(existing: &Product, args: ProductArgs) -> Result<ProductFields> {
    Ok(ProductFields {
        name: args.name.unwrap_or_else(|| existing.name.clone()),
        category: args.category.unwrap_or_else(|| existing.category.clone()),
        sku: args.sku.unwrap_or_else(|| existing.sku.clone()),
        cost: args.cost.unwrap_or(existing.cost),
        price: args.price.unwrap_or(existing.price),
        qty: args.qty.unwrap_or(existing.qty),
        image: match read_image(args.image.as_deref())? {
            Some(payload) => Some(payload),
            None => existing.image.clone(),
        },
    })
}

fn read_image(path: Option<&Path>) -> Result<Option<String>> {
    let Some(path) = path else {
        return Ok(None);
    };
    let bytes = fs::read(path).with_context(|| format!("reading {}", path.display()))?;
    Ok(Some(BASE64.encode(bytes)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cart_line_syntax_parses() {
        let id = ProductId::generate();
        let (parsed, qty) = parse_cart_line(&format!("{id}:3")).unwrap();
        assert_eq!(parsed, id);
        assert_eq!(qty, 3);
    }

    #[test]
    fn cart_line_rejects_zero_and_garbage() {
        let id = ProductId::generate();
        assert!(parse_cart_line(&format!("{id}:0")).is_err());
        assert!(parse_cart_line("no-colon").is_err());
        assert!(parse_cart_line("not-a-uuid:2").is_err());
    }

    #[test]
    fn edit_merge_keeps_the_stored_image() {
        let mut ledger = Ledger::new("Test");
        let id = ledger.add_product(ProductFields {
            name: "Espresso".into(),
            price: 120.0,
            image: Some("payload".into()),
            ..ProductFields::default()
        });

        let args = ProductArgs {
            name: None,
            category: None,
            sku: None,
            cost: None,
            price: Some(140.0),
            qty: None,
            image: None,
        };
        let fields = merged_product_fields(ledger.product(id).unwrap(), args).unwrap();
        ledger.edit_product(id, fields);

        let product = ledger.product(id).unwrap();
        assert_eq!(product.price, 140.0);
        assert_eq!(product.name, "Espresso");
        assert_eq!(product.image.as_deref(), Some("payload"));
    }
}
