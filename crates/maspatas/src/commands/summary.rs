//! `summary`: load every collection once and print the derived totals.

use serde::Serialize;

use maspatas_core::{Dashboard, Totals};

use crate::cli::GlobalOpts;
use crate::error::CliError;
use crate::output;

use super::util;

#[derive(Debug, Serialize)]
struct SummaryView {
    products: usize,
    clients: usize,
    sales: usize,
    total_stock: i64,
    /// Exact decimal text; the table view rounds to cents.
    total_revenue: String,
    #[serde(skip_serializing_if = "is_zero")]
    skipped_amounts: usize,
    refreshed_at: Option<String>,
    #[serde(skip)]
    revenue_display: String,
}

#[allow(clippy::trivially_copy_pass_by_ref)]
fn is_zero(n: &usize) -> bool {
    *n == 0
}

impl SummaryView {
    fn new(totals: Totals, sales: usize, refreshed_at: Option<String>) -> Self {
        Self {
            products: totals.products,
            clients: totals.clients,
            sales,
            total_stock: totals.total_stock,
            total_revenue: totals.total_revenue.normalize().to_string(),
            skipped_amounts: totals.skipped_amounts,
            refreshed_at,
            revenue_display: totals.revenue_display(),
        }
    }
}

fn detail(v: &SummaryView) -> String {
    let mut fields = vec![
        ("Products", v.products.to_string()),
        ("Clients", v.clients.to_string()),
        ("Sales", v.sales.to_string()),
        ("Total stock", v.total_stock.to_string()),
        ("Revenue", v.revenue_display.clone()),
    ];
    if v.skipped_amounts > 0 {
        fields.push(("Unreadable", format!("{} sale amount(s)", v.skipped_amounts)));
    }
    output::detail_lines(&fields)
}

pub async fn handle(dashboard: &Dashboard, global: &GlobalOpts) -> Result<(), CliError> {
    util::with_spinner(global, "Loading", dashboard.load_all()).await?;

    let snapshot = dashboard.snapshot();
    let view = SummaryView::new(
        dashboard.totals(),
        snapshot.sales.len(),
        snapshot.refreshed_at.map(|t| t.to_rfc3339()),
    );
    let out = output::render_single(global.output, &view, detail, |v| {
        v.revenue_display.clone()
    })?;
    output::print_output(&out, global.quiet);
    Ok(())
}

#[cfg(test)]
mod tests {
    use maspatas_core::Decimal;

    use super::*;

    #[test]
    fn table_rounds_revenue_but_json_keeps_it_exact() {
        let totals = Totals {
            products: 1,
            clients: 1,
            total_stock: 23,
            total_revenue: Decimal::new(19995, 3),
            skipped_amounts: 0,
        };
        let view = SummaryView::new(totals, 2, None);

        let table = detail(&view);
        assert!(table.contains("20.00"), "{table}");
        assert!(table.contains("23"));
        assert!(!table.contains("Unreadable"));

        let json = serde_json::to_value(&view).unwrap_or_default();
        assert_eq!(json["total_revenue"], "19.995");
        assert!(json.get("skipped_amounts").is_none());
        assert!(json.get("revenue_display").is_none());
    }
}
