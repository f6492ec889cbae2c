//! Application core: event loop, screen routing and action dispatch.
//!
//! The app owns both screens and is the only place view state changes.
//! Terminal events become actions; background results arrive as
//! `ViewUpdate`s on a separate channel and are applied in the same loop.

use std::time::Duration;

use color_eyre::eyre::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::{
    Frame,
    layout::{Constraint, Layout, Rect},
    style::Style,
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Clear, Paragraph},
};
use tokio::sync::mpsc;
use tracing::{debug, info};

use netsight_core::{
    DashboardSource, DeviceId, UpdateReceiver, UpdateSender, ViewUpdate, update_channel,
};

use crate::action::Action;
use crate::component::Component;
use crate::event::{Event, EventReader, Pacing};
use crate::screen::ScreenId;
use crate::screens::{ConnectionsScreen, StatisticsScreen};
use crate::theme;
use crate::tui::TerminalSession;

/// Top-level application state and event loop.
pub struct App<S: DashboardSource> {
    source: S,
    connections: ConnectionsScreen<S>,
    /// Present exactly while the details screen is shown.
    details: Option<StatisticsScreen<S>>,
    running: bool,
    help_visible: bool,
    action_tx: mpsc::UnboundedSender<Action>,
    action_rx: mpsc::UnboundedReceiver<Action>,
    updates_tx: UpdateSender,
    updates_rx: UpdateReceiver,
}

impl<S: DashboardSource> App<S> {
    pub fn new(source: S, devices_interval: Duration) -> Self {
        let (action_tx, action_rx) = mpsc::unbounded_channel();
        let (updates_tx, updates_rx) = update_channel();
        let connections =
            ConnectionsScreen::new(source.clone(), updates_tx.clone(), devices_interval);

        Self {
            source,
            connections,
            details: None,
            running: true,
            help_visible: false,
            action_tx,
            action_rx,
            updates_tx,
            updates_rx,
        }
    }

    pub fn screen(&self) -> ScreenId {
        self.details
            .as_ref()
            .map_or(ScreenId::Connections, |d| ScreenId::Details(d.device().clone()))
    }

    fn active_mut(&mut self) -> &mut dyn Component {
        match self.details.as_mut() {
            Some(details) => details,
            None => &mut self.connections,
        }
    }

    fn active(&self) -> &dyn Component {
        match self.details.as_ref() {
            Some(details) => details,
            None => &self.connections,
        }
    }

    /// Run the main event loop.
    pub async fn run(&mut self) -> Result<()> {
        let mut terminal = TerminalSession::start()?;
        let mut events = EventReader::spawn(Pacing::default());
        self.connections.mount();

        info!("TUI event loop started");

        while self.running {
            tokio::select! {
                event = events.next() => {
                    let Some(event) = event else { break };
                    self.handle_event(event)?;
                }
                Some(update) = self.updates_rx.recv() => {
                    self.route_update(update);
                }
            }

            while let Ok(action) = self.action_rx.try_recv() {
                self.process_action(&action)?;

                if let Action::Render = action {
                    terminal.draw(|frame| self.render(frame))?;
                }
            }
        }

        if let Some(mut details) = self.details.take() {
            details.unmount();
        }
        self.connections.unmount();
        events.stop();
        terminal.finish()?;
        info!("TUI event loop ended");
        Ok(())
    }

    fn handle_event(&mut self, event: Event) -> Result<()> {
        let action = match event {
            Event::Key(key) => self.handle_key_event(key)?,
            Event::Resize(w, h) => Some(Action::Resize(w, h)),
            Event::Tick => Some(Action::Tick),
            Event::Render => Some(Action::Render),
        };
        if let Some(action) = action {
            self.action_tx.send(action)?;
        }
        Ok(())
    }

    fn route_update(&mut self, update: ViewUpdate) {
        let applied = match update {
            ViewUpdate::Devices(snapshot) => self.connections.apply(snapshot),
            ViewUpdate::Statistics(update) => self
                .details
                .as_mut()
                .is_some_and(|details| details.apply(update)),
        };
        if !applied {
            debug!("discarded update for an inactive view");
        }
    }

    /// Global keys first, then the active screen.
    fn handle_key_event(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        if self.help_visible {
            return match key.code {
                KeyCode::Esc | KeyCode::Char('?') => Ok(Some(Action::ToggleHelp)),
                _ => Ok(None),
            };
        }

        match (key.modifiers, key.code) {
            (KeyModifiers::CONTROL, KeyCode::Char('c'))
            | (KeyModifiers::NONE, KeyCode::Char('q')) => return Ok(Some(Action::Quit)),
            (KeyModifiers::NONE, KeyCode::Char('?')) => return Ok(Some(Action::ToggleHelp)),
            (KeyModifiers::NONE, KeyCode::Esc) if self.screen().is_details() => {
                return Ok(Some(Action::GoBack));
            }
            _ => {}
        }

        self.active_mut().handle_key_event(key)
    }

    fn process_action(&mut self, action: &Action) -> Result<()> {
        match action {
            Action::Quit => self.running = false,
            Action::Resize(w, h) => debug!(width = w, height = h, "terminal resized"),
            Action::ToggleHelp => self.help_visible = !self.help_visible,
            Action::Render => {}
            Action::OpenDetails(device) => self.open_details(device),
            Action::GoBack => self.close_details(),
            Action::Tick
            | Action::SelectOverall
            | Action::SelectDateRange
            | Action::SetBound(..)
            | Action::RefreshStatistics => {
                if let Some(follow_up) = self.active_mut().update(action)? {
                    self.action_tx.send(follow_up)?;
                }
            }
        }
        Ok(())
    }

    fn open_details(&mut self, device: &DeviceId) {
        debug!(%device, "opening details");
        self.connections.unmount();
        let mut details =
            StatisticsScreen::new(device.clone(), self.source.clone(), self.updates_tx.clone());
        details.mount();
        self.details = Some(details);
        info!(screen = %self.screen(), route = %self.screen().route(), "navigated");
    }

    fn close_details(&mut self) {
        if let Some(mut details) = self.details.take() {
            debug!(device = %details.device(), "leaving details");
            details.unmount();
        }
        self.connections.mount();
        info!(screen = %self.screen(), route = %self.screen().route(), "navigated");
    }

    // ── Rendering ────────────────────────────────────────────────────

    fn render(&self, frame: &mut Frame) {
        let area = frame.area();
        let layout = Layout::vertical([
            Constraint::Min(1),    // Screen content
            Constraint::Length(1), // Status bar
        ])
        .split(area);

        self.active().render(frame, layout[0]);
        self.render_status_bar(frame, layout[1]);

        if self.help_visible {
            render_help_overlay(frame, area);
        }
    }

    fn render_status_bar(&self, frame: &mut Frame, area: Rect) {
        let mut spans = vec![
            Span::styled(
                format!(" {} ", self.screen().route()),
                theme::route(),
            ),
            Span::styled("│", theme::key_hint()),
        ];
        for (key, what) in self.active().hints() {
            spans.push(Span::styled(format!(" {key} "), theme::key_hint_key()));
            spans.push(Span::styled(*what, theme::key_hint()));
        }
        if self.details.is_some() {
            spans.push(Span::styled(" Esc ", theme::key_hint_key()));
            spans.push(Span::styled("back", theme::key_hint()));
        }
        spans.push(Span::styled("  ? help  q quit", theme::key_hint()));

        frame.render_widget(Paragraph::new(Line::from(spans)), area);
    }
}

fn render_help_overlay(frame: &mut Frame, area: Rect) {
    let help_width = 52u16.min(area.width.saturating_sub(4));
    let help_height = 16u16.min(area.height.saturating_sub(4));
    let x = (area.width.saturating_sub(help_width)) / 2;
    let y = (area.height.saturating_sub(help_height)) / 2;
    let help_area = Rect::new(area.x + x, area.y + y, help_width, help_height);

    frame.render_widget(Clear, help_area);

    let block = Block::default()
        .title(" Keyboard Shortcuts ")
        .title_style(theme::title_style())
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(theme::border_focused())
        .style(Style::default().bg(theme::BG_DARK));
    let inner = block.inner(help_area);
    frame.render_widget(block, help_area);

    let entry = |key: &'static str, what: &'static str| {
        Line::from(vec![
            Span::styled(format!("  {key:<10}"), theme::key_hint_key()),
            Span::styled(what, theme::key_hint()),
        ])
    };
    let section = |name: &'static str| {
        Line::from(Span::styled(format!("  {name}"), theme::title_style()))
    };

    let help_text = vec![
        section("Connections"),
        entry("j/k ↑/↓", "Move selection"),
        entry("Enter", "Open device statistics"),
        Line::from(""),
        section("Statistics"),
        entry("o", "Overall statistics"),
        entry("d", "Date range statistics"),
        entry("Tab", "Switch date field"),
        entry("0-9 -", "Type a date (yyyy-mm-dd)"),
        entry("r", "Refresh"),
        entry("Esc", "Back to connections"),
        Line::from(""),
        entry("?", "This help"),
        entry("q", "Quit"),
    ];

    frame.render_widget(Paragraph::new(help_text), inner);
}
