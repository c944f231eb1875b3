//! Inventory command handlers.

use maspatas_core::{Dashboard, InventoryItem};
use tabled::Tabled;

use crate::cli::{GlobalOpts, InventoryArgs, InventoryCommand};
use crate::error::CliError;
use crate::output;

#[derive(Tabled)]
struct StockRow {
    #[tabled(rename = "Product")]
    product_id: String,
    #[tabled(rename = "Stock")]
    stock: i64,
}

impl From<&InventoryItem> for StockRow {
    fn from(item: &InventoryItem) -> Self {
        Self {
            product_id: item.product_id.clone(),
            stock: item.stock,
        }
    }
}

pub async fn handle(
    dashboard: &Dashboard,
    args: InventoryArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match args.command {
        InventoryCommand::List => {
            let items = dashboard.list_inventory().await?;
            let out = output::render_list(
                global.output,
                &items,
                |i| StockRow::from(i),
                |i| format!("{}\t{}", i.product_id, i.stock),
            )?;
            output::print_output(&out, global.quiet);
            Ok(())
        }
    }
}
