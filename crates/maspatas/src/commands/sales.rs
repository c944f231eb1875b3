//! Sale command handlers.

use maspatas_core::{Dashboard, EntityKind, Sale, SaleDraft, SaleLine};
use tabled::{Table, Tabled, settings::Style};

use crate::cli::{GlobalOpts, SaleLineArg, SalesArgs, SalesCommand};
use crate::error::CliError;
use crate::output;

use super::util;

// ── Table rows ──────────────────────────────────────────────────────

#[derive(Tabled)]
struct SaleRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Client")]
    client: String,
    #[tabled(rename = "Total")]
    total: String,
    #[tabled(rename = "Created")]
    created: String,
}

impl From<&Sale> for SaleRow {
    fn from(s: &Sale) -> Self {
        Self {
            id: s.sale_id.clone(),
            client: s.client_id.clone(),
            total: format!("{} {}", s.total_amount, s.currency),
            created: s.created_at.clone().unwrap_or_default(),
        }
    }
}

#[derive(Tabled)]
struct LineRow {
    #[tabled(rename = "Product")]
    product: String,
    #[tabled(rename = "Qty")]
    quantity: u32,
    #[tabled(rename = "Unit price")]
    unit_price: String,
    #[tabled(rename = "Subtotal")]
    subtotal: String,
}

impl From<&SaleLine> for LineRow {
    fn from(l: &SaleLine) -> Self {
        Self {
            product: l.product_id.clone(),
            quantity: l.quantity,
            unit_price: l.unit_price.clone(),
            subtotal: l.subtotal.clone(),
        }
    }
}

fn detail(s: &Sale) -> String {
    let mut text = output::detail_lines(&[
        ("ID", s.sale_id.clone()),
        ("Client", s.client_id.clone()),
        ("Created", s.created_at.clone().unwrap_or_else(|| "-".into())),
        ("Total", format!("{} {}", s.total_amount, s.currency)),
    ]);
    if !s.lines.is_empty() {
        let rows: Vec<LineRow> = s.lines.iter().map(LineRow::from).collect();
        text.push_str("\n\n");
        text.push_str(&Table::new(rows).with(Style::rounded()).to_string());
    }
    text
}

// ── Handler ─────────────────────────────────────────────────────────

pub async fn handle(
    dashboard: &Dashboard,
    args: SalesArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match args.command {
        SalesCommand::List => {
            let sales = dashboard.list_sales().await?;
            let out = output::render_list(
                global.output,
                &sales,
                |s| SaleRow::from(s),
                |s| s.sale_id.clone(),
            )?;
            output::print_output(&out, global.quiet);
            Ok(())
        }

        SalesCommand::Get { sale } => {
            let found = dashboard
                .get_sale(&sale)
                .await
                .map_err(|e| CliError::from(e).with_list_command("sales list"))?;
            let out =
                output::render_single(global.output, &found, detail, |s| s.sale_id.clone())?;
            output::print_output(&out, global.quiet);
            Ok(())
        }

        SalesCommand::Create {
            sale_id,
            client,
            lines,
        } => {
            dashboard.edit_sale(|d| {
                d.sale_id = sale_id;
                d.client_id = client;
                fill_lines(d, &lines);
            });
            util::submit_draft(dashboard, EntityKind::Sale, "sale_id", global).await
        }
    }
}

/// Copy `--line` values into the draft, reusing its initial empty line.
fn fill_lines(draft: &mut SaleDraft, lines: &[SaleLineArg]) {
    for (i, line) in lines.iter().enumerate() {
        let index = if i < draft.lines().len() {
            i
        } else {
            draft.push_line()
        };
        draft.update_line(index, |l| {
            l.product_id.clone_from(&line.product_id);
            l.quantity.clone_from(&line.quantity);
        });
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn line_arguments_fill_the_draft_in_order() {
        let mut draft = SaleDraft::default();
        draft.sale_id = "S1".into();
        draft.client_id = "C1".into();
        fill_lines(
            &mut draft,
            &[
                SaleLineArg {
                    product_id: "P1".into(),
                    quantity: "2".into(),
                },
                SaleLineArg {
                    product_id: "P2".into(),
                    quantity: "1".into(),
                },
            ],
        );

        let request = draft.coerce().unwrap();
        let lines: Vec<(&str, u32)> = request
            .lines
            .iter()
            .map(|l| (l.product_id.as_str(), l.quantity))
            .collect();
        assert_eq!(lines, vec![("P1", 2), ("P2", 1)]);
    }

    #[test]
    fn detail_lists_line_items() {
        let sale = Sale {
            sale_id: "S1".into(),
            client_id: "C1".into(),
            created_at: None,
            total_amount: "19.98".into(),
            currency: "USD".into(),
            lines: vec![SaleLine {
                product_id: "P1".into(),
                quantity: 2,
                unit_price: "9.99".into(),
                subtotal: "19.98".into(),
            }],
        };
        let text = detail(&sale);
        assert!(text.contains("19.98 USD"));
        assert!(text.contains("Unit price"));
        assert!(text.contains("P1"));
    }
}
