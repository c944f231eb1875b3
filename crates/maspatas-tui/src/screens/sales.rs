//! Sales screen: sales table, line items of the selected sale, and the
//! new-sale form with its growable line list.

use std::sync::Arc;

use color_eyre::eyre::Result;
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::Style;
use ratatui::widgets::{Cell, Row, Table, TableState};

use maspatas_core::{Drafts, EntityKind, Sale, Snapshot};

use crate::action::Action;
use crate::component::Component;
use crate::screens::{client_name, format_created, product_name};
use crate::theme;
use crate::widgets::{self, draft_form::DraftForm};

pub struct SalesScreen {
    focused: bool,
    busy: bool,
    snapshot: Arc<Snapshot>,
    drafts: Drafts,
    table_state: TableState,
    form: DraftForm,
}

impl SalesScreen {
    pub fn new() -> Self {
        Self {
            focused: false,
            busy: false,
            snapshot: Arc::default(),
            drafts: Drafts::default(),
            table_state: TableState::default(),
            form: DraftForm::new(EntityKind::Sale),
        }
    }

    fn selected_sale(&self) -> Option<&Sale> {
        self.table_state
            .selected()
            .and_then(|i| self.snapshot.sales.get(i))
    }

    fn render_sales(&self, frame: &mut Frame, area: Rect) {
        let block = widgets::panel(
            format!("Sales ({})", self.snapshot.sales.len()),
            self.focused && !self.form.is_editing(),
        );
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let header = Row::new(
            ["Sale", "Client", "Created", "Lines", "Total"]
                .map(|h| Cell::from(h).style(theme::table_header())),
        );
        let rows: Vec<Row> = self
            .snapshot
            .sales
            .iter()
            .map(|s| {
                Row::new(vec![
                    Cell::from(s.sale_id.clone()).style(Style::default().fg(theme::MINT)),
                    Cell::from(client_name(&self.snapshot, &s.client_id).to_owned()),
                    Cell::from(format_created(s.created_at.as_deref())),
                    Cell::from(s.lines.len().to_string()),
                    Cell::from(format!("{} {}", s.total_amount, s.currency))
                        .style(Style::default().fg(theme::AMBER)),
                ])
                .style(theme::table_row())
            })
            .collect();

        let widths = [
            Constraint::Length(10),
            Constraint::Fill(2),
            Constraint::Length(17),
            Constraint::Length(6),
            Constraint::Length(14),
        ];
        let table = Table::new(rows, widths)
            .header(header)
            .row_highlight_style(theme::table_selected());

        let mut state = self.table_state;
        frame.render_stateful_widget(table, inner, &mut state);
    }

    fn render_lines(&self, frame: &mut Frame, area: Rect) {
        let title = self
            .selected_sale()
            .map_or_else(|| "Lines".to_owned(), |s| format!("Lines of {}", s.sale_id));
        let block = widgets::panel(title, false);
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let Some(sale) = self.selected_sale() else {
            return;
        };

        let header = Row::new(
            ["Product", "Qty", "Unit price", "Subtotal"]
                .map(|h| Cell::from(h).style(theme::table_header())),
        );
        let rows: Vec<Row> = sale
            .lines
            .iter()
            .map(|l| {
                Row::new(vec![
                    Cell::from(product_name(&self.snapshot, &l.product_id).to_owned()),
                    Cell::from(l.quantity.to_string()),
                    Cell::from(l.unit_price.clone()),
                    Cell::from(l.subtotal.clone()).style(Style::default().fg(theme::AMBER)),
                ])
                .style(theme::table_row())
            })
            .collect();

        let widths = [
            Constraint::Fill(2),
            Constraint::Length(5),
            Constraint::Length(12),
            Constraint::Length(12),
        ];
        frame.render_widget(Table::new(rows, widths).header(header), inner);
    }
}

impl Component for SalesScreen {
    fn handle_key_event(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        if self.form.is_editing() {
            return Ok(self.form.handle_key(key, &self.drafts));
        }
        if widgets::move_selection(&mut self.table_state, self.snapshot.sales.len(), key.code) {
            return Ok(None);
        }
        Ok(match key.code {
            KeyCode::Char('e' | 'n') => {
                self.form.begin_editing();
                None
            }
            KeyCode::Char('x') => Some(Action::ResetDraft(EntityKind::Sale)),
            _ => None,
        })
    }

    fn update(&mut self, action: &Action) -> Result<Option<Action>> {
        match action {
            Action::SnapshotUpdated(snapshot) => {
                self.snapshot = Arc::clone(snapshot);
                widgets::clamp_selection(&mut self.table_state, self.snapshot.sales.len());
            }
            Action::DraftsUpdated(drafts) => self.drafts = drafts.clone(),
            Action::BusyChanged(busy) => self.busy = *busy,
            _ => {}
        }
        Ok(None)
    }

    fn render(&self, frame: &mut Frame, area: Rect) {
        let cols = Layout::horizontal([Constraint::Min(40), Constraint::Length(46)]).split(area);
        let left = Layout::vertical([Constraint::Percentage(60), Constraint::Percentage(40)])
            .split(cols[0]);

        self.render_sales(frame, left[0]);
        self.render_lines(frame, left[1]);
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
        "sales"
    }
}
