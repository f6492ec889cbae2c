//! Connections screen: live device table with a count header.

use std::time::Duration;

use chrono::Utc;
use color_eyre::eyre::Result;
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    Frame,
    layout::{Constraint, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Cell, Paragraph, Row, Table, TableState},
};

use netsight_core::{ConnectionTableView, DashboardSource, DeviceId, DeviceSnapshot, UpdateSender};

use crate::action::Action;
use crate::component::Component;
use crate::theme;
use crate::widgets::status_indicator;

pub struct ConnectionsScreen<S> {
    view: ConnectionTableView<S>,
    table_state: TableState,
    throbber: throbber_widgets_tui::ThrobberState,
}

impl<S: DashboardSource> ConnectionsScreen<S> {
    pub fn new(source: S, updates: UpdateSender, interval: Duration) -> Self {
        Self {
            view: ConnectionTableView::new(source, updates, interval),
            table_state: TableState::default(),
            throbber: throbber_widgets_tui::ThrobberState::default(),
        }
    }

    /// Apply a polled snapshot and keep the selection in range.
    pub fn apply(&mut self, snapshot: DeviceSnapshot) -> bool {
        if !self.view.apply(snapshot) {
            return false;
        }
        let total = self.view.total();
        match self.table_state.selected() {
            _ if total == 0 => self.table_state.select(None),
            None => self.table_state.select(Some(0)),
            Some(i) if i >= total => self.table_state.select(Some(total - 1)),
            Some(_) => {}
        }
        true
    }

    fn selected_device(&self) -> Option<DeviceId> {
        let index = self.table_state.selected()?;
        self.view.rows().get(index).map(|row| row.id.clone())
    }

    fn move_selection(&mut self, delta: isize) {
        let total = self.view.total();
        if total == 0 {
            return;
        }
        let current = self.table_state.selected().unwrap_or(0);
        let next = current.saturating_add_signed(delta).min(total - 1);
        self.table_state.select(Some(next));
    }

    fn render_header(&self, frame: &mut Frame, area: Rect) {
        let counts = if self.view.is_loading() {
            Span::styled("waiting for first snapshot", theme::key_hint())
        } else {
            Span::styled(
                format!(
                    "{} devices · {} connected",
                    self.view.total(),
                    self.view.connected_count()
                ),
                theme::device_id(),
            )
        };

        let age = self.view.last_updated().map_or_else(String::new, |at| {
            let elapsed = (Utc::now() - at).to_std().unwrap_or_default();
            format!("  updated {} ago", format_age(elapsed))
        });

        let line = Line::from(vec![
            Span::styled(" Devices: ", theme::table_row()),
            counts,
            Span::styled(age, theme::key_hint()),
        ]);
        frame.render_widget(Paragraph::new(line), area);
    }
}

/// Refresh age rounded to whole seconds, e.g. `3s` or `1m 5s`.
pub fn format_age(elapsed: Duration) -> String {
    humantime::format_duration(Duration::from_secs(elapsed.as_secs())).to_string()
}

impl<S: DashboardSource> Component for ConnectionsScreen<S> {
    fn mount(&mut self) {
        self.view.mount();
    }

    fn unmount(&mut self) {
        self.view.unmount();
    }

    fn handle_key_event(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        match key.code {
            KeyCode::Char('j') | KeyCode::Down => self.move_selection(1),
            KeyCode::Char('k') | KeyCode::Up => self.move_selection(-1),
            KeyCode::Char('g') | KeyCode::Home => self.table_state.select(Some(0)),
            KeyCode::Char('G') | KeyCode::End => {
                self.move_selection(isize::MAX);
            }
            KeyCode::Enter => {
                return Ok(self.selected_device().map(Action::OpenDetails));
            }
            _ => {}
        }
        Ok(None)
    }

    fn update(&mut self, action: &Action) -> Result<Option<Action>> {
        if let Action::Tick = action {
            self.throbber.calc_next();
        }
        Ok(None)
    }

    fn render(&self, frame: &mut Frame, area: Rect) {
        let block = Block::default()
            .title(" Connection Table ")
            .title_style(theme::title_style())
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(theme::border_focused());
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let layout = Layout::vertical([Constraint::Length(1), Constraint::Min(1)]).split(inner);
        self.render_header(frame, layout[0]);

        if self.view.is_loading() {
            let throbber = status_indicator::loading(" Loading devices...");
            frame.render_stateful_widget(throbber, layout[1], &mut self.throbber.clone());
            return;
        }

        let header = Row::new(vec![
            Cell::from("Device").style(theme::table_header()),
            Cell::from("IP Address").style(theme::table_header()),
            Cell::from("Status").style(theme::table_header()),
        ]);

        let rows: Vec<Row> = self
            .view
            .rows()
            .into_iter()
            .map(|row| {
                Row::new(vec![
                    Cell::from(row.id.to_string()).style(theme::device_id()),
                    Cell::from(row.address.unwrap_or("─").to_owned())
                        .style(theme::address()),
                    Cell::from(status_indicator::status_span(row.connected)),
                ])
                .style(theme::table_row())
            })
            .collect();

        let widths = [
            Constraint::Length(20),
            Constraint::Length(40),
            Constraint::Min(14),
        ];

        let table = Table::new(rows, widths)
            .header(header)
            .row_highlight_style(theme::table_selected())
            .highlight_symbol("▸");

        let mut state = self.table_state;
        frame.render_stateful_widget(table, layout[1], &mut state);
    }

    fn hints(&self) -> &'static [(&'static str, &'static str)] {
        &[("j/k", "move"), ("Enter", "details")]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn age_is_rounded_to_seconds() {
        assert_eq!(format_age(Duration::from_millis(3400)), "3s");
        assert_eq!(format_age(Duration::from_secs(65)), "1m 5s");
        assert_eq!(format_age(Duration::ZERO), "0s");
    }
}
