//! Palette and semantic styles for the TUI.

use ratatui::style::{Color, Modifier, Style};

// ── Palette ───────────────────────────────────────────────────────────

pub const PAW_ORANGE: Color = Color::Rgb(255, 159, 67); // #ff9f43
pub const MINT: Color = Color::Rgb(128, 255, 210); // #80ffd2
pub const ROSE: Color = Color::Rgb(255, 121, 176); // #ff79b0
pub const AMBER: Color = Color::Rgb(245, 214, 110); // #f5d66e
pub const SUCCESS_GREEN: Color = Color::Rgb(80, 250, 123); // #50fa7b
pub const ERROR_RED: Color = Color::Rgb(255, 99, 99); // #ff6363

pub const DIM_WHITE: Color = Color::Rgb(196, 199, 210); // #c4c7d2
pub const BORDER_GRAY: Color = Color::Rgb(104, 112, 150); // #687096
pub const BG_HIGHLIGHT: Color = Color::Rgb(42, 40, 52); // #2a2834
pub const BG_DARK: Color = Color::Rgb(28, 27, 36); // #1c1b24

// ── Semantic styles ───────────────────────────────────────────────────

pub fn title_style() -> Style {
    Style::default().fg(MINT).add_modifier(Modifier::BOLD)
}

pub fn border_focused() -> Style {
    Style::default().fg(PAW_ORANGE)
}

pub fn border_default() -> Style {
    Style::default().fg(BORDER_GRAY)
}

pub fn table_header() -> Style {
    Style::default()
        .fg(MINT)
        .add_modifier(Modifier::BOLD | Modifier::UNDERLINED)
}

pub fn table_row() -> Style {
    Style::default().fg(DIM_WHITE)
}

pub fn table_selected() -> Style {
    Style::default()
        .fg(PAW_ORANGE)
        .bg(BG_HIGHLIGHT)
        .add_modifier(Modifier::BOLD)
}

pub fn tab_active() -> Style {
    Style::default().fg(PAW_ORANGE).add_modifier(Modifier::BOLD)
}

pub fn tab_inactive() -> Style {
    Style::default().fg(DIM_WHITE)
}

/// Big numbers on the summary cards.
pub fn metric_value() -> Style {
    Style::default().fg(MINT).add_modifier(Modifier::BOLD)
}

pub fn key_hint() -> Style {
    Style::default().fg(BORDER_GRAY)
}

pub fn key_hint_key() -> Style {
    Style::default().fg(MINT).add_modifier(Modifier::BOLD)
}

/// Key hints for a trigger that is unavailable right now.
pub fn key_hint_disabled() -> Style {
    Style::default()
        .fg(BORDER_GRAY)
        .add_modifier(Modifier::CROSSED_OUT)
}
