//! Application core: the event loop, screen switching and action dispatch.
//!
//! The app owns the [`Dashboard`]. Screens only emit actions; anything that
//! talks to the backend is spawned from here, and its outcome comes back
//! through the data bridge as state updates.

use std::collections::HashMap;
use std::future::Future;
use std::time::Duration;

use color_eyre::eyre::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::{
    Frame,
    layout::{Constraint, Layout, Rect},
    style::Style,
    text::{Line, Span},
    widgets::{Block, Clear, Paragraph, Tabs},
};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use maspatas_core::{CoreError, Dashboard, Feedback};

use crate::action::Action;
use crate::component::Component;
use crate::data_bridge::spawn_data_bridge;
use crate::event::{Event, EventReader};
use crate::screen::ScreenId;
use crate::screens::create_screens;
use crate::theme;
use crate::tui::Tui;
use crate::widgets;

const SPINNER: [&str; 4] = ["◐", "◓", "◑", "◒"];

pub struct App {
    dashboard: Dashboard,
    active_screen: ScreenId,
    screens: HashMap<ScreenId, Box<dyn Component>>,
    running: bool,
    help_visible: bool,
    /// Mirrors the dashboard's single-flight flag.
    busy: bool,
    authenticated: bool,
    feedback: Feedback,
    spinner_frame: usize,
    action_tx: mpsc::UnboundedSender<Action>,
    action_rx: mpsc::UnboundedReceiver<Action>,
    cancel: CancellationToken,
}

impl App {
    /// `username` pre-fills the login form.
    pub fn new(dashboard: Dashboard, username: String) -> Self {
        let (action_tx, action_rx) = mpsc::unbounded_channel();
        let screens = create_screens(username).into_iter().collect();
        let authenticated = dashboard.is_authenticated();

        Self {
            dashboard,
            active_screen: ScreenId::Dashboard,
            screens,
            running: true,
            help_visible: false,
            busy: false,
            authenticated,
            feedback: Feedback::None,
            spinner_frame: 0,
            action_tx,
            action_rx,
            cancel: CancellationToken::new(),
        }
    }

    fn init_screens(&mut self) -> Result<()> {
        for screen in self.screens.values_mut() {
            screen.init(self.action_tx.clone())?;
        }
        if let Some(screen) = self.screens.get_mut(&self.active_screen) {
            screen.set_focused(true);
        }
        Ok(())
    }

    pub async fn run(&mut self) -> Result<()> {
        let mut tui = Tui::new()?;
        tui.enter()?;
        let (w, h) = tui.size().unwrap_or((80, 24));
        debug!(w, h, "terminal size");
        self.init_screens()?;

        tokio::spawn(spawn_data_bridge(
            self.dashboard.clone(),
            self.action_tx.clone(),
            self.cancel.clone(),
        ));

        // First load of the four collections
        self.action_tx.send(Action::Reload)?;

        let mut events = EventReader::new(
            Duration::from_millis(250), // spinner
            Duration::from_millis(33),  // ~30 FPS
        );

        info!("TUI event loop started");

        while self.running {
            let Some(event) = events.next().await else {
                break;
            };

            match event {
                Event::Key(key) => {
                    if let Some(action) = self.handle_key_event(key)? {
                        self.action_tx.send(action)?;
                    }
                }
                Event::Resize(w, h) => self.action_tx.send(Action::Resize(w, h))?,
                Event::Tick => self.action_tx.send(Action::Tick)?,
                Event::Render => self.action_tx.send(Action::Render)?,
            }

            while let Ok(action) = self.action_rx.try_recv() {
                self.process_action(&action)?;

                if let Action::Render = action {
                    tui.draw(|frame| self.render(frame))?;
                }
            }
        }

        events.stop();
        self.cancel.cancel();
        info!("TUI event loop ended");
        Ok(())
    }

    // ── Input ────────────────────────────────────────────────────────

    fn handle_key_event(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        if key.modifiers == KeyModifiers::CONTROL && key.code == KeyCode::Char('c') {
            return Ok(Some(Action::Quit));
        }

        // A form with the cursor gets every other key
        if let Some(screen) = self.screens.get_mut(&self.active_screen) {
            if screen.captures_input() {
                return screen.handle_key_event(key);
            }
        }

        if self.help_visible {
            return Ok(match key.code {
                KeyCode::Esc | KeyCode::Char('?') => Some(Action::ToggleHelp),
                _ => None,
            });
        }

        match (key.modifiers, key.code) {
            (KeyModifiers::NONE, KeyCode::Char('q')) => return Ok(Some(Action::Quit)),
            (KeyModifiers::NONE, KeyCode::Char('?')) => return Ok(Some(Action::ToggleHelp)),
            (KeyModifiers::NONE, KeyCode::Char('r')) => return Ok(Some(Action::Reload)),
            (KeyModifiers::NONE, KeyCode::Char('c')) => return Ok(Some(Action::DismissFeedback)),
            (KeyModifiers::NONE, KeyCode::Char(c @ '1'..='4')) => {
                let n = u8::try_from(c).unwrap_or(b'0') - b'0';
                if let Some(screen) = ScreenId::from_number(n) {
                    return Ok(Some(Action::SwitchScreen(screen)));
                }
            }
            (KeyModifiers::NONE, KeyCode::Tab) => {
                return Ok(Some(Action::SwitchScreen(self.active_screen.next())));
            }
            (KeyModifiers::SHIFT, KeyCode::BackTab) => {
                return Ok(Some(Action::SwitchScreen(self.active_screen.prev())));
            }
            _ => {}
        }

        if let Some(screen) = self.screens.get_mut(&self.active_screen) {
            return screen.handle_key_event(key);
        }
        Ok(None)
    }

    // ── Dispatch ─────────────────────────────────────────────────────

    fn process_action(&mut self, action: &Action) -> Result<()> {
        if action.is_trigger() && self.busy {
            debug!(?action, "ignored: an operation is in flight");
            return Ok(());
        }

        match action {
            Action::Quit => self.running = false,

            Action::SwitchScreen(target) => {
                if *target != self.active_screen {
                    debug!("switching screen: {} → {}", self.active_screen, target);
                    if let Some(screen) = self.screens.get_mut(&self.active_screen) {
                        screen.set_focused(false);
                    }
                    self.active_screen = *target;
                    if let Some(screen) = self.screens.get_mut(&self.active_screen) {
                        screen.set_focused(true);
                    }
                }
            }

            Action::ToggleHelp => self.help_visible = !self.help_visible,

            Action::Tick => {
                if self.busy {
                    self.spinner_frame = (self.spinner_frame + 1) % SPINNER.len();
                }
            }

            Action::Render | Action::Resize(..) => {}

            // ── Backend work ──
            Action::Reload => {
                let dashboard = self.dashboard.clone();
                spawn_op("reload", async move { dashboard.load_all().await });
            }
            Action::Login { username, password } => {
                let dashboard = self.dashboard.clone();
                let username = username.clone();
                let password = password.clone();
                spawn_op("login", async move { dashboard.login(&username, &password).await });
            }
            Action::Submit(kind) => {
                let dashboard = self.dashboard.clone();
                let kind = *kind;
                spawn_op("submit", async move { dashboard.submit(kind).await.map(drop) });
            }
            Action::Logout => {
                if let Err(e) = self.dashboard.logout() {
                    warn!(error = %e, "logout failed");
                }
            }
            Action::DismissFeedback => self.dashboard.clear_feedback(),

            // ── Drafts: write through, then sync screens before the next key ──
            Action::EditDraft(field, value) => {
                let (field, value) = (*field, value.clone());
                self.dashboard.edit_drafts(|d| {
                    if !field.write(d, value) {
                        debug!(?field, "edit for a missing sale line dropped");
                    }
                });
                self.broadcast(&Action::DraftsUpdated(self.dashboard.drafts()))?;
            }
            Action::AddSaleLine => {
                self.dashboard.edit_sale(|sale| {
                    sale.push_line();
                });
                self.broadcast(&Action::DraftsUpdated(self.dashboard.drafts()))?;
            }
            Action::ResetDraft(kind) => {
                self.dashboard.reset_draft(*kind);
                self.broadcast(&Action::DraftsUpdated(self.dashboard.drafts()))?;
            }

            // ── State from the data bridge ──
            // A bridge copy read before the latest edit would undo keystrokes.
            Action::DraftsUpdated(drafts) if *drafts != self.dashboard.drafts() => {
                debug!("stale drafts from the bridge dropped");
            }
            update if update.is_state_update() => {
                match update {
                    Action::BusyChanged(busy) => self.busy = *busy,
                    Action::SessionChanged(auth) => self.authenticated = *auth,
                    Action::FeedbackChanged(feedback) => self.feedback = feedback.clone(),
                    _ => {}
                }
                self.broadcast(update)?;
            }

            other => {
                if let Some(screen) = self.screens.get_mut(&self.active_screen) {
                    if let Some(follow_up) = screen.update(other)? {
                        self.action_tx.send(follow_up)?;
                    }
                }
            }
        }

        Ok(())
    }

    /// Deliver an action to every screen, visible or not.
    fn broadcast(&mut self, action: &Action) -> Result<()> {
        for screen in self.screens.values_mut() {
            if let Some(follow_up) = screen.update(action)? {
                self.action_tx.send(follow_up)?;
            }
        }
        Ok(())
    }

    // ── Rendering ────────────────────────────────────────────────────

    fn render(&self, frame: &mut Frame) {
        let area = frame.area();

        let layout = Layout::vertical([
            Constraint::Min(1),    // screen
            Constraint::Length(1), // tabs
            Constraint::Length(1), // status
        ])
        .split(area);

        if let Some(screen) = self.screens.get(&self.active_screen) {
            screen.render(frame, layout[0]);
        }
        self.render_tab_bar(frame, layout[1]);
        frame.render_widget(Paragraph::new(self.status_line()), layout[2]);

        if self.help_visible {
            render_help_overlay(frame, area);
        }
    }

    fn render_tab_bar(&self, frame: &mut Frame, area: Rect) {
        let titles: Vec<Line> = ScreenId::ALL
            .iter()
            .map(|&id| {
                let style = if id == self.active_screen {
                    theme::tab_active()
                } else {
                    theme::tab_inactive()
                };
                Line::from(Span::styled(format!(" {} {} ", id.number(), id.label()), style))
            })
            .collect();

        let selected = ScreenId::ALL
            .iter()
            .position(|&s| s == self.active_screen)
            .unwrap_or(0);
        let tabs = Tabs::new(titles)
            .divider(Span::styled(" ", theme::key_hint()))
            .select(selected);

        frame.render_widget(tabs, area);
    }

    /// Busy indicator, session state, then the feedback message.
    fn status_line(&self) -> Line<'static> {
        let busy = if self.busy {
            Span::styled(
                format!("{} working", SPINNER[self.spinner_frame % SPINNER.len()]),
                Style::default().fg(theme::AMBER),
            )
        } else {
            Span::styled("● idle", Style::default().fg(theme::SUCCESS_GREEN))
        };

        let session = if self.authenticated {
            Span::styled("  signed in", Style::default().fg(theme::MINT))
        } else {
            Span::styled("  signed out", Style::default().fg(theme::BORDER_GRAY))
        };

        let mut spans = vec![Span::raw(" "), busy, session, Span::styled(" │ ", theme::key_hint())];
        match &self.feedback {
            Feedback::Success(message) => spans.push(Span::styled(
                message.clone(),
                Style::default().fg(theme::SUCCESS_GREEN),
            )),
            Feedback::Error(message) => spans.push(Span::styled(
                message.clone(),
                Style::default().fg(theme::ERROR_RED),
            )),
            Feedback::None => spans.push(Span::styled("? help  r reload  q quit", theme::key_hint())),
        }
        Line::from(spans)
    }
}

/// Run a dashboard operation in the background. Failures already land in
/// the feedback slot; a rejected trigger only needs a log line.
fn spawn_op<F>(name: &'static str, op: F)
where
    F: Future<Output = Result<(), CoreError>> + Send + 'static,
{
    tokio::spawn(async move {
        match op.await {
            Ok(()) => debug!(op = name, "done"),
            Err(CoreError::Busy) => debug!(op = name, "rejected: busy"),
            Err(e) => debug!(op = name, error = %e, "failed"),
        }
    });
}

fn render_help_overlay(frame: &mut Frame, area: Rect) {
    let width = 56u16.min(area.width.saturating_sub(4));
    let height = 20u16.min(area.height.saturating_sub(4));
    let help_area = Rect::new(
        area.x + (area.width.saturating_sub(width)) / 2,
        area.y + (area.height.saturating_sub(height)) / 2,
        width,
        height,
    );

    frame.render_widget(Clear, help_area);
    frame.render_widget(
        Block::default().style(Style::default().bg(theme::BG_DARK)),
        help_area,
    );

    let block = widgets::panel("Keyboard Shortcuts", true);
    let inner = block.inner(help_area);
    frame.render_widget(block, help_area);

    let section = |title: &'static str| {
        Line::from(Span::styled(format!("  {title}"), Style::default().fg(theme::ROSE)))
    };
    let row = |key: &'static str, text: &'static str| {
        Line::from(vec![
            Span::styled(format!("  {key:<10}"), theme::key_hint_key()),
            Span::styled(text, theme::key_hint()),
        ])
    };

    let help_text = vec![
        Line::from(""),
        section("Navigation"),
        row("1-4", "Jump to screen"),
        row("Tab", "Next screen"),
        row("j/k ↑/↓", "Move in tables"),
        Line::from(""),
        section("Forms"),
        row("e", "Edit the draft (l to log in)"),
        row("Tab/⇧Tab", "Next / previous field"),
        row("Enter", "Submit"),
        row("Ctrl+N", "Add a sale line"),
        row("Esc", "Leave the form"),
        Line::from(""),
        section("Global"),
        row("r", "Reload everything"),
        row("c", "Clear the message"),
        row("q", "Quit"),
        Line::from(""),
        Line::from(Span::styled("  Esc or ? to close", theme::key_hint())),
    ];

    frame.render_widget(Paragraph::new(help_text), inner);
}
