//! Products screen: catalog table with stock, plus the new-product form.

use std::sync::Arc;

use color_eyre::eyre::Result;
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::Style;
use ratatui::widgets::{Cell, Row, Table, TableState};

use maspatas_core::{Drafts, EntityKind, Snapshot};

use crate::action::Action;
use crate::component::Component;
use crate::screens::stock_of;
use crate::theme;
use crate::widgets::{self, draft_form::DraftForm};

pub struct ProductsScreen {
    focused: bool,
    busy: bool,
    snapshot: Arc<Snapshot>,
    drafts: Drafts,
    table_state: TableState,
    form: DraftForm,
}

impl ProductsScreen {
    pub fn new() -> Self {
        Self {
            focused: false,
            busy: false,
            snapshot: Arc::default(),
            drafts: Drafts::default(),
            table_state: TableState::default(),
            form: DraftForm::new(EntityKind::Product),
        }
    }

    fn render_table(&self, frame: &mut Frame, area: Rect) {
        let block = widgets::panel(
            format!("Products ({})", self.snapshot.products.len()),
            self.focused && !self.form.is_editing(),
        );
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let header = Row::new(
            ["ID", "Name", "SKU", "Price", "Stock"]
                .map(|h| Cell::from(h).style(theme::table_header())),
        );

        let rows: Vec<Row> = self
            .snapshot
            .products
            .iter()
            .map(|p| {
                let stock = stock_of(&self.snapshot, &p.id);
                let stock_style = match stock {
                    Some(s) if s <= 0 => Style::default().fg(theme::ERROR_RED),
                    Some(_) => Style::default().fg(theme::SUCCESS_GREEN),
                    None => Style::default().fg(theme::BORDER_GRAY),
                };
                Row::new(vec![
                    Cell::from(p.id.clone()).style(Style::default().fg(theme::MINT)),
                    Cell::from(p.name.clone()),
                    Cell::from(p.sku.clone()).style(Style::default().fg(theme::ROSE)),
                    Cell::from(format!("{} {}", p.price_amount, p.currency)),
                    Cell::from(stock.map_or_else(|| "─".into(), |s| s.to_string()))
                        .style(stock_style),
                ])
                .style(theme::table_row())
            })
            .collect();

        let widths = [
            Constraint::Length(10),
            Constraint::Fill(2),
            Constraint::Fill(1),
            Constraint::Length(14),
            Constraint::Length(7),
        ];
        let table = Table::new(rows, widths)
            .header(header)
            .row_highlight_style(theme::table_selected());

        let mut state = self.table_state;
        frame.render_stateful_widget(table, inner, &mut state);
    }
}

impl Component for ProductsScreen {
    fn handle_key_event(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        if self.form.is_editing() {
            return Ok(self.form.handle_key(key, &self.drafts));
        }
        if widgets::move_selection(&mut self.table_state, self.snapshot.products.len(), key.code) {
            return Ok(None);
        }
        Ok(match key.code {
            KeyCode::Char('e' | 'n') => {
                self.form.begin_editing();
                None
            }
            KeyCode::Char('x') => Some(Action::ResetDraft(EntityKind::Product)),
            _ => None,
        })
    }

    fn update(&mut self, action: &Action) -> Result<Option<Action>> {
        match action {
            Action::SnapshotUpdated(snapshot) => {
                self.snapshot = Arc::clone(snapshot);
                widgets::clamp_selection(&mut self.table_state, self.snapshot.products.len());
            }
            Action::DraftsUpdated(drafts) => self.drafts = drafts.clone(),
            Action::BusyChanged(busy) => self.busy = *busy,
            _ => {}
        }
        Ok(None)
    }

    fn render(&self, frame: &mut Frame, area: Rect) {
        let cols = Layout::horizontal([Constraint::Min(40), Constraint::Length(46)]).split(area);
        self.render_table(frame, cols[0]);

        self.form
            .render(frame, cols[1], &self.drafts, self.busy, self.focused);
    }

    fn captures_input(&self) -> bool {
        self.form.is_editing()
    }

    fn set_focused(&mut self, focused: bool) {
        self.focused = focused;
    }

    fn id(&self) -> &'static str {
        "products"
    }
}
