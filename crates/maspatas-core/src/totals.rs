// ── View-state aggregates ──
//
// Derived figures for the dashboard header. Recomputed from a snapshot on
// every replacement; pure, and never fails.

use maspatas_api::{InventoryItem, Sale};
use rust_decimal::{Decimal, RoundingStrategy};
use serde::Serialize;

use crate::draft::parse_decimal;
use crate::store::Snapshot;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Totals {
    pub products: usize,
    pub clients: usize,
    pub total_stock: i64,
    /// Exact sum; round only for display.
    pub total_revenue: Decimal,
    /// Sales whose `total_amount` was not a decimal and counted as zero.
    pub skipped_amounts: usize,
}

impl Totals {
    pub fn compute(snapshot: &Snapshot) -> Self {
        let (total_revenue, skipped_amounts) = total_revenue(&snapshot.sales);
        Self {
            products: snapshot.products.len(),
            clients: snapshot.clients.len(),
            total_stock: total_stock(&snapshot.inventory),
            total_revenue,
            skipped_amounts,
        }
    }

    /// Revenue with two fraction digits.
    pub fn revenue_display(&self) -> String {
        format_amount(self.total_revenue)
    }
}

pub fn total_stock(items: &[InventoryItem]) -> i64 {
    items
        .iter()
        .fold(0_i64, |acc, item| acc.saturating_add(item.stock))
}

/// Exact decimal sum of `total_amount`, plus the number of amounts that
/// could not be parsed.
pub fn total_revenue(sales: &[Sale]) -> (Decimal, usize) {
    sales
        .iter()
        .fold((Decimal::ZERO, 0), |(sum, skipped), sale| {
            match parse_decimal(&sale.total_amount) {
                Some(amount) => (sum.saturating_add(amount), skipped),
                None => (sum, skipped + 1),
            }
        })
}

/// Round half away from zero to two digits and always print both.
pub fn format_amount(amount: Decimal) -> String {
    let mut rounded = amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    rounded.rescale(2);
    rounded.to_string()
}
