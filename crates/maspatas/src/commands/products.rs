//! Product command handlers.

use maspatas_core::{Dashboard, EntityKind, Product};
use tabled::Tabled;

use crate::cli::{GlobalOpts, ProductsArgs, ProductsCommand};
use crate::error::CliError;
use crate::output;

use super::util;

// ── Table row ───────────────────────────────────────────────────────

#[derive(Tabled)]
struct ProductRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "SKU")]
    sku: String,
    #[tabled(rename = "Price")]
    price: String,
}

impl From<&Product> for ProductRow {
    fn from(p: &Product) -> Self {
        Self {
            id: p.id.clone(),
            name: p.name.clone(),
            sku: p.sku.clone(),
            price: format!("{} {}", p.price_amount, p.currency),
        }
    }
}

fn detail(p: &Product) -> String {
    output::detail_lines(&[
        ("ID", p.id.clone()),
        ("Name", p.name.clone()),
        ("SKU", p.sku.clone()),
        ("Price", p.price_amount.clone()),
        ("Currency", p.currency.clone()),
    ])
}

// ── Handler ─────────────────────────────────────────────────────────

pub async fn handle(
    dashboard: &Dashboard,
    args: ProductsArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match args.command {
        ProductsCommand::List => {
            let products = dashboard.list_products().await?;
            let out = output::render_list(
                global.output,
                &products,
                |p| ProductRow::from(p),
                |p| p.id.clone(),
            )?;
            output::print_output(&out, global.quiet);
            Ok(())
        }

        ProductsCommand::Get { product } => {
            let found = dashboard
                .get_product(&product)
                .await
                .map_err(|e| CliError::from(e).with_list_command("products list"))?;
            let out = output::render_single(global.output, &found, detail, |p| p.id.clone())?;
            output::print_output(&out, global.quiet);
            Ok(())
        }

        ProductsCommand::Create {
            product_id,
            name,
            sku,
            price,
            currency,
            stock,
        } => {
            dashboard.edit_product(|d| {
                d.product_id = product_id;
                d.name = name;
                d.sku = sku;
                d.price_amount = price;
                d.currency = currency;
                d.initial_stock = stock;
            });
            util::submit_draft(dashboard, EntityKind::Product, "id", global).await
        }
    }
}
