//! Dashboard screen: summary cards, session panel, inventory and the
//! latest sales.
//!
//! The session panel doubles as the login form. The password only lives
//! here until it is handed to the login action, and is wiped right after.

use std::sync::Arc;

use chrono::Local;
use color_eyre::eyre::Result;
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Layout, Rect};
use ratatui::style::Style;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Cell, Paragraph, Row, Table, TableState};
use secrecy::SecretString;

use maspatas_core::{Snapshot, Totals};

use crate::action::Action;
use crate::component::Component;
use crate::form::TextEdit;
use crate::screens::{client_name, format_created, product_name};
use crate::theme;
use crate::widgets;

const RECENT_SALES: usize = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LoginField {
    Username,
    Password,
}

pub struct DashboardScreen {
    focused: bool,
    busy: bool,
    authenticated: bool,
    snapshot: Arc<Snapshot>,
    totals: Totals,
    inventory_state: TableState,
    // Login form
    editing: bool,
    active_field: LoginField,
    username: String,
    password: String,
}

impl DashboardScreen {
    pub fn new(username: String) -> Self {
        Self {
            focused: false,
            busy: false,
            authenticated: false,
            snapshot: Arc::default(),
            totals: Totals::default(),
            inventory_state: TableState::default(),
            editing: false,
            active_field: LoginField::Username,
            username,
            password: String::new(),
        }
    }

    fn stop_editing(&mut self) {
        self.editing = false;
        self.password.clear();
    }

    fn handle_login_key(&mut self, key: KeyEvent) -> Option<Action> {
        match key.code {
            KeyCode::Esc => {
                self.stop_editing();
                None
            }
            KeyCode::Tab | KeyCode::BackTab | KeyCode::Up | KeyCode::Down => {
                self.active_field = match self.active_field {
                    LoginField::Username => LoginField::Password,
                    LoginField::Password => LoginField::Username,
                };
                None
            }
            KeyCode::Enter => {
                let action = Action::Login {
                    username: self.username.trim().to_owned(),
                    password: Arc::new(SecretString::from(std::mem::take(&mut self.password))),
                };
                self.stop_editing();
                Some(action)
            }
            _ => {
                if let Some(edit) = TextEdit::from_key(&key) {
                    let field = match self.active_field {
                        LoginField::Username => &mut self.username,
                        LoginField::Password => &mut self.password,
                    };
                    *field = edit.apply(field);
                }
                None
            }
        }
    }

    // ── Rendering ────────────────────────────────────────────────────

    fn render_cards(&self, frame: &mut Frame, area: Rect) {
        let cards = Layout::horizontal([Constraint::Ratio(1, 4); 4]).split(area);

        let revenue_note = if self.totals.skipped_amounts > 0 {
            format!("{} amount(s) unreadable", self.totals.skipped_amounts)
        } else {
            "across all sales".to_owned()
        };

        let specs = [
            ("Products", self.totals.products.to_string(), "in catalog".to_owned()),
            ("Clients", self.totals.clients.to_string(), "registered".to_owned()),
            ("Total stock", self.totals.total_stock.to_string(), "units on hand".to_owned()),
            ("Total revenue", self.totals.revenue_display(), revenue_note),
        ];

        for ((title, value, caption), area) in specs.into_iter().zip(cards.iter()) {
            let block = widgets::panel(title, false);
            let inner = block.inner(*area);
            frame.render_widget(block, *area);
            let text = vec![
                Line::from(Span::styled(value, theme::metric_value())),
                Line::from(Span::styled(caption, theme::key_hint())),
            ];
            frame.render_widget(Paragraph::new(text).alignment(Alignment::Center), inner);
        }
    }

    fn render_session(&self, frame: &mut Frame, area: Rect) {
        let block = widgets::panel("Session", self.focused && self.editing);
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let mut lines = Vec::new();
        if self.authenticated {
            lines.push(Line::from(Span::styled(
                "  ● signed in",
                Style::default().fg(theme::SUCCESS_GREEN),
            )));
            lines.push(Line::from(""));
            lines.push(widgets::key_hints(&[("o", "log out", true)]));
        } else {
            lines.push(Line::from(Span::styled(
                "  ○ signed out",
                Style::default().fg(theme::BORDER_GRAY),
            )));
            lines.push(Line::from(""));
            lines.push(widgets::field_line(
                "Username",
                &self.username,
                8,
                self.editing && self.active_field == LoginField::Username,
                self.editing,
                false,
            ));
            lines.push(widgets::field_line(
                "Password",
                &self.password,
                8,
                self.editing && self.active_field == LoginField::Password,
                self.editing,
                true,
            ));
            lines.push(Line::from(""));
            lines.push(if self.editing {
                widgets::key_hints(&[
                    ("Tab", "switch", true),
                    ("Enter", "sign in", !self.busy),
                    ("Esc", "cancel", true),
                ])
            } else {
                widgets::key_hints(&[("l", "log in", !self.busy)])
            });
        }

        if let Some(at) = self.snapshot.refreshed_at {
            lines.push(Line::from(""));
            lines.push(Line::from(Span::styled(
                format!("  refreshed {}", at.with_timezone(&Local).format("%H:%M:%S")),
                theme::key_hint(),
            )));
        }

        frame.render_widget(Paragraph::new(lines), inner);
    }

    fn render_inventory(&self, frame: &mut Frame, area: Rect) {
        let block = widgets::panel(
            format!("Inventory ({})", self.snapshot.inventory.len()),
            self.focused && !self.editing,
        );
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let header = Row::new(
            ["Product", "Name", "Stock"].map(|h| Cell::from(h).style(theme::table_header())),
        );
        let rows: Vec<Row> = self
            .snapshot
            .inventory
            .iter()
            .map(|item| {
                let stock_color = if item.stock <= 0 {
                    theme::ERROR_RED
                } else {
                    theme::SUCCESS_GREEN
                };
                Row::new(vec![
                    Cell::from(item.product_id.clone()).style(Style::default().fg(theme::MINT)),
                    Cell::from(product_name(&self.snapshot, &item.product_id).to_owned()),
                    Cell::from(item.stock.to_string()).style(Style::default().fg(stock_color)),
                ])
                .style(theme::table_row())
            })
            .collect();

        let widths = [Constraint::Length(10), Constraint::Fill(1), Constraint::Length(7)];
        let table = Table::new(rows, widths)
            .header(header)
            .row_highlight_style(theme::table_selected());

        let mut state = self.inventory_state;
        frame.render_stateful_widget(table, inner, &mut state);
    }

    fn render_recent_sales(&self, frame: &mut Frame, area: Rect) {
        let block = widgets::panel("Latest sales", false);
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let header = Row::new(
            ["Sale", "Client", "Created", "Total"].map(|h| Cell::from(h).style(theme::table_header())),
        );
        let rows: Vec<Row> = recent(&self.snapshot.sales, RECENT_SALES)
            .map(|s| {
                Row::new(vec![
                    Cell::from(s.sale_id.clone()).style(Style::default().fg(theme::MINT)),
                    Cell::from(client_name(&self.snapshot, &s.client_id).to_owned()),
                    Cell::from(format_created(s.created_at.as_deref())),
                    Cell::from(format!("{} {}", s.total_amount, s.currency))
                        .style(Style::default().fg(theme::AMBER)),
                ])
                .style(theme::table_row())
            })
            .collect();

        let widths = [
            Constraint::Length(10),
            Constraint::Fill(1),
            Constraint::Length(17),
            Constraint::Length(14),
        ];
        frame.render_widget(Table::new(rows, widths).header(header), inner);
    }
}

/// Last `n` entries, newest first (the backend lists oldest first).
fn recent<T>(items: &[T], n: usize) -> impl Iterator<Item = &T> {
    items.iter().rev().take(n)
}

impl Component for DashboardScreen {
    fn handle_key_event(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        if self.editing {
            return Ok(self.handle_login_key(key));
        }
        if widgets::move_selection(
            &mut self.inventory_state,
            self.snapshot.inventory.len(),
            key.code,
        ) {
            return Ok(None);
        }
        Ok(match key.code {
            KeyCode::Char('l') if !self.authenticated => {
                self.editing = true;
                self.active_field = if self.username.is_empty() {
                    LoginField::Username
                } else {
                    LoginField::Password
                };
                None
            }
            KeyCode::Char('o') if self.authenticated => Some(Action::Logout),
            _ => None,
        })
    }

    fn update(&mut self, action: &Action) -> Result<Option<Action>> {
        match action {
            Action::SnapshotUpdated(snapshot) => {
                self.snapshot = Arc::clone(snapshot);
                widgets::clamp_selection(&mut self.inventory_state, self.snapshot.inventory.len());
            }
            Action::TotalsUpdated(totals) => self.totals = *totals,
            Action::BusyChanged(busy) => self.busy = *busy,
            Action::SessionChanged(authenticated) => {
                self.authenticated = *authenticated;
                if *authenticated {
                    self.stop_editing();
                }
            }
            _ => {}
        }
        Ok(None)
    }

    fn render(&self, frame: &mut Frame, area: Rect) {
        let rows = Layout::vertical([
            Constraint::Length(4),      // cards
            Constraint::Min(8),         // session + inventory
            Constraint::Percentage(40), // latest sales
        ])
        .split(area);

        self.render_cards(frame, rows[0]);

        let middle = Layout::horizontal([Constraint::Length(38), Constraint::Min(30)]).split(rows[1]);
        self.render_session(frame, middle[0]);
        self.render_inventory(frame, middle[1]);

        self.render_recent_sales(frame, rows[2]);
    }

    fn captures_input(&self) -> bool {
        self.editing
    }

    fn set_focused(&mut self, focused: bool) {
        self.focused = focused;
    }

    fn id(&self) -> &'static str {
        "dashboard"
    }
}
