//! Clients screen: client list plus the new-client form.

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
use crate::theme;
use crate::widgets::{self, draft_form::DraftForm};

pub struct ClientsScreen {
    focused: bool,
    busy: bool,
    snapshot: Arc<Snapshot>,
    drafts: Drafts,
    table_state: TableState,
    form: DraftForm,
}

impl ClientsScreen {
    pub fn new() -> Self {
        Self {
            focused: false,
            busy: false,
            snapshot: Arc::default(),
            drafts: Drafts::default(),
            table_state: TableState::default(),
            form: DraftForm::new(EntityKind::Client),
        }
    }

    /// Number of sales recorded for a client.
    fn sales_count(&self, client_id: &str) -> usize {
        self.snapshot
            .sales
            .iter()
            .filter(|s| s.client_id == client_id)
            .count()
    }
}

impl Component for ClientsScreen {
    fn handle_key_event(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        if self.form.is_editing() {
            return Ok(self.form.handle_key(key, &self.drafts));
        }
        if widgets::move_selection(&mut self.table_state, self.snapshot.clients.len(), key.code) {
            return Ok(None);
        }
        Ok(match key.code {
            KeyCode::Char('e' | 'n') => {
                self.form.begin_editing();
                None
            }
            KeyCode::Char('x') => Some(Action::ResetDraft(EntityKind::Client)),
            _ => None,
        })
    }

    fn update(&mut self, action: &Action) -> Result<Option<Action>> {
        match action {
            Action::SnapshotUpdated(snapshot) => {
                self.snapshot = Arc::clone(snapshot);
                widgets::clamp_selection(&mut self.table_state, self.snapshot.clients.len());
            }
            Action::DraftsUpdated(drafts) => self.drafts = drafts.clone(),
            Action::BusyChanged(busy) => self.busy = *busy,
            _ => {}
        }
        Ok(None)
    }

    fn render(&self, frame: &mut Frame, area: Rect) {
        let cols = Layout::horizontal([Constraint::Min(40), Constraint::Length(46)]).split(area);

        let block = widgets::panel(
            format!("Clients ({})", self.snapshot.clients.len()),
            self.focused && !self.form.is_editing(),
        );
        let inner = block.inner(cols[0]);
        frame.render_widget(block, cols[0]);

        let header = Row::new(
            ["ID", "Full name", "Email", "Sales"].map(|h| Cell::from(h).style(theme::table_header())),
        );
        let rows: Vec<Row> = self
            .snapshot
            .clients
            .iter()
            .map(|c| {
                Row::new(vec![
                    Cell::from(c.id.clone()).style(Style::default().fg(theme::MINT)),
                    Cell::from(c.full_name.clone()),
                    Cell::from(c.email.clone()).style(Style::default().fg(theme::ROSE)),
                    Cell::from(self.sales_count(&c.id).to_string()),
                ])
                .style(theme::table_row())
            })
            .collect();

        let widths = [
            Constraint::Length(10),
            Constraint::Fill(2),
            Constraint::Fill(2),
            Constraint::Length(6),
        ];
        let table = Table::new(rows, widths)
            .header(header)
            .row_highlight_style(theme::table_selected());

        let mut state = self.table_state;
        frame.render_stateful_widget(table, inner, &mut state);

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
        "clients"
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use crossterm::event::KeyModifiers;
    use maspatas_core::{Client, Sale};
    use pretty_assertions::assert_eq;

    use super::*;

    fn sale(id: &str, client_id: &str) -> Sale {
        Sale {
            sale_id: id.into(),
            client_id: client_id.into(),
            created_at: None,
            total_amount: "1.00".into(),
            currency: "USD".into(),
            lines: Vec::new(),
        }
    }

    #[test]
    fn counts_sales_per_client() {
        let mut screen = ClientsScreen::new();
        let snapshot = Snapshot {
            clients: vec![Client {
                id: "C-1".into(),
                full_name: "Ana Ruiz".into(),
                email: "ana@example.com".into(),
            }],
            sales: vec![sale("S-1", "C-1"), sale("S-2", "C-1"), sale("S-3", "C-2")],
            ..Snapshot::default()
        };
        screen
            .update(&Action::SnapshotUpdated(Arc::new(snapshot)))
            .unwrap();
        assert_eq!(screen.sales_count("C-1"), 2);
        assert_eq!(screen.sales_count("C-9"), 0);
    }

    #[test]
    fn drafts_updates_feed_the_form() {
        let mut screen = ClientsScreen::new();
        let mut drafts = Drafts::default();
        drafts.client.full_name = "Ana".into();
        screen.update(&Action::DraftsUpdated(drafts)).unwrap();

        screen
            .handle_key_event(KeyEvent::new(KeyCode::Char('e'), KeyModifiers::NONE))
            .unwrap();
        screen
            .handle_key_event(KeyEvent::new(KeyCode::Tab, KeyModifiers::NONE))
            .unwrap();
        let action = screen
            .handle_key_event(KeyEvent::new(KeyCode::Backspace, KeyModifiers::NONE))
            .unwrap();
        assert!(matches!(
            action,
            Some(Action::EditDraft(crate::form::DraftField::FullName, ref v)) if v == "An"
        ));
    }
}
