//! The "new entity" panel shown on the products, clients and sales screens.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::Style;
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use maspatas_core::{Drafts, EntityKind};

use crate::action::Action;
use crate::form::{self, DraftField, TextEdit};
use crate::theme;
use crate::widgets;

const LABEL_WIDTH: usize = 13;

/// Cursor position and edit mode for one draft. The text itself lives in
/// the dashboard's drafts.
#[derive(Debug, Clone)]
pub struct DraftForm {
    kind: EntityKind,
    active: DraftField,
    editing: bool,
}

impl DraftForm {
    pub fn new(kind: EntityKind) -> Self {
        let active = DraftField::for_form(kind, &Drafts::default())
            .first()
            .copied()
            .unwrap_or(DraftField::ProductId);
        Self {
            kind,
            active,
            editing: false,
        }
    }

    pub fn is_editing(&self) -> bool {
        self.editing
    }

    pub fn active(&self) -> DraftField {
        self.active
    }

    pub fn begin_editing(&mut self) {
        self.editing = true;
    }

    /// Keys while editing. Returns the action the keystroke produces.
    pub fn handle_key(&mut self, key: KeyEvent, drafts: &Drafts) -> Option<Action> {
        let fields = DraftField::for_form(self.kind, drafts);
        if !fields.contains(&self.active) {
            self.active = form::cycle(&fields, self.active, true);
        }

        match (key.modifiers, key.code) {
            (_, KeyCode::Esc) => {
                self.editing = false;
                None
            }
            (_, KeyCode::Tab | KeyCode::Down) => {
                self.active = form::cycle(&fields, self.active, true);
                None
            }
            (_, KeyCode::BackTab | KeyCode::Up) => {
                self.active = form::cycle(&fields, self.active, false);
                None
            }
            (_, KeyCode::Enter) => Some(Action::Submit(self.kind)),
            (KeyModifiers::CONTROL, KeyCode::Char('n')) if self.kind == EntityKind::Sale => {
                // The new line is appended at the end; focus its product.
                self.active = DraftField::LineProduct(drafts.sale.lines().len());
                Some(Action::AddSaleLine)
            }
            _ => TextEdit::from_key(&key).map(|edit| {
                let value = edit.apply(&self.active.value(drafts));
                Action::EditDraft(self.active, value)
            }),
        }
    }

    pub fn render(&self, frame: &mut Frame, area: Rect, drafts: &Drafts, busy: bool, focused: bool) {
        let title = match self.kind {
            EntityKind::Product => "New product",
            EntityKind::Client => "New client",
            EntityKind::Sale => "New sale",
        };
        let block = widgets::panel(title, focused && self.editing);
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let layout = Layout::vertical([Constraint::Min(1), Constraint::Length(1)]).split(inner);

        let fields = DraftField::for_form(self.kind, drafts);
        let mut lines = Vec::with_capacity(fields.len() + 1);
        let mut active_row = 0;
        for field in &fields {
            if *field == DraftField::LineProduct(0) {
                lines.push(Line::from(Span::styled(
                    "  Lines",
                    Style::default().fg(theme::ROSE),
                )));
            }
            if *field == self.active {
                active_row = lines.len();
            }
            lines.push(widgets::field_line(
                &field.label(),
                &field.value(drafts),
                LABEL_WIDTH,
                *field == self.active,
                self.editing,
                false,
            ));
        }

        // Keep the active row in view when the sale has many lines
        let height = usize::from(layout[0].height.max(1));
        let scroll = u16::try_from(active_row.saturating_sub(height - 1)).unwrap_or(u16::MAX);
        frame.render_widget(Paragraph::new(lines).scroll((scroll, 0)), layout[0]);

        frame.render_widget(Paragraph::new(self.hints(busy)), layout[1]);
    }

    fn hints(&self, busy: bool) -> Line<'static> {
        if !self.editing {
            return widgets::key_hints(&[("e", "edit", true), ("x", "clear", true)]);
        }
        let mut pairs = vec![
            ("Tab", "next", true),
            ("Enter", "submit", !busy),
            ("Esc", "done", true),
        ];
        if self.kind == EntityKind::Sale {
            pairs.insert(1, ("^N", "add line", true));
        }
        widgets::key_hints(&pairs)
    }
}
