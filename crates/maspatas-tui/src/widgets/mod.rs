//! Small rendering helpers shared by the screens.

pub mod draft_form;

use crossterm::event::KeyCode;
use ratatui::style::Style;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Borders, TableState};

use crate::theme;

/// Rounded panel with the focus-dependent border.
pub fn panel(title: impl Into<String>, focused: bool) -> Block<'static> {
    Block::default()
        .title(format!(" {} ", title.into()))
        .title_style(theme::title_style())
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(if focused {
            theme::border_focused()
        } else {
            theme::border_default()
        })
}

/// One `label  value` row of a form. The active row gets a marker, and a
/// cursor block while `editing`.
pub fn field_line(
    label: &str,
    value: &str,
    label_width: usize,
    active: bool,
    editing: bool,
    masked: bool,
) -> Line<'static> {
    let marker = if active { "▸ " } else { "  " };
    let label_style = if active {
        Style::default().fg(theme::PAW_ORANGE)
    } else {
        Style::default().fg(theme::DIM_WHITE)
    };

    let mut shown = if masked {
        "●".repeat(value.chars().count())
    } else {
        value.to_owned()
    };
    if active && editing {
        shown.push('█');
    } else if shown.is_empty() {
        shown.push('─');
    }

    Line::from(vec![
        Span::styled(marker, label_style),
        Span::styled(format!("{label:<label_width$}  "), label_style),
        Span::styled(shown, Style::default().fg(theme::MINT)),
    ])
}

/// `key action  key action` hint line. Pairs whose flag is false render
/// struck through.
pub fn key_hints(pairs: &[(&str, &str, bool)]) -> Line<'static> {
    let mut spans = vec![Span::raw(" ")];
    for (key, action, enabled) in pairs {
        let (key_style, text_style) = if *enabled {
            (theme::key_hint_key(), theme::key_hint())
        } else {
            (theme::key_hint_disabled(), theme::key_hint_disabled())
        };
        spans.push(Span::styled(format!("{key} "), key_style));
        spans.push(Span::styled(format!("{action}  "), text_style));
    }
    Line::from(spans)
}

/// j/k, arrows, g/G over a table of `len` rows. Returns `true` if the key
/// was a movement key.
pub fn move_selection(state: &mut TableState, len: usize, code: KeyCode) -> bool {
    let last = len.saturating_sub(1);
    let current = state.selected().unwrap_or(0);
    let next = match code {
        KeyCode::Char('j') | KeyCode::Down => (current + 1).min(last),
        KeyCode::Char('k') | KeyCode::Up => current.saturating_sub(1),
        KeyCode::Char('g') | KeyCode::Home => 0,
        KeyCode::Char('G') | KeyCode::End => last,
        _ => return false,
    };
    state.select(if len == 0 { None } else { Some(next) });
    true
}

/// Keep the selection inside a table that now has `len` rows.
pub fn clamp_selection(state: &mut TableState, len: usize) {
    match (len, state.selected()) {
        (0, _) => state.select(None),
        (_, None) => state.select(Some(0)),
        (_, Some(i)) if i >= len => state.select(Some(len - 1)),
        _ => {}
    }
}

/// `─` for blanks in table cells.
pub fn or_dash(value: &str) -> String {
    if value.trim().is_empty() {
        "─".into()
    } else {
        value.to_owned()
    }
}
