//! Details screen: per-device statistics with overall / date-range scope.

use chrono::NaiveDate;
use color_eyre::eyre::Result;
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    Frame,
    layout::{Constraint, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Paragraph},
};
use tui_input::{Input, InputRequest};

use netsight_core::{
    DashboardSource, DeviceId, QueryMode, QueryPhase, StatisticsUpdate, StatisticsView,
    UpdateSender,
};

use crate::action::{Action, Bound};
use crate::component::Component;
use crate::theme;
use crate::widgets::metric_chart::{self, TerminalCharts};
use crate::widgets::status_indicator;

const DATE_FORMAT: &str = "%Y-%m-%d";
const DATE_WIDTH: u16 = 10;

/// Contents of a date entry field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateField {
    Empty,
    /// Still being typed, or not a real calendar day.
    Incomplete,
    Date(NaiveDate),
}

pub fn parse_date_field(text: &str) -> DateField {
    let text = text.trim();
    if text.is_empty() {
        return DateField::Empty;
    }
    if text.len() != usize::from(DATE_WIDTH) {
        return DateField::Incomplete;
    }
    NaiveDate::parse_from_str(text, DATE_FORMAT).map_or(DateField::Incomplete, DateField::Date)
}

pub struct StatisticsScreen<S> {
    view: StatisticsView<S, TerminalCharts>,
    start: Input,
    end: Input,
    focus: Bound,
    scroll: usize,
    throbber: throbber_widgets_tui::ThrobberState,
}

impl<S: DashboardSource> StatisticsScreen<S> {
    pub fn new(device: DeviceId, source: S, updates: UpdateSender) -> Self {
        Self {
            view: StatisticsView::new(device, source, updates, TerminalCharts::default()),
            start: Input::default(),
            end: Input::default(),
            focus: Bound::Start,
            scroll: 0,
            throbber: throbber_widgets_tui::ThrobberState::default(),
        }
    }

    pub fn device(&self) -> &DeviceId {
        self.view.device()
    }

    pub fn apply(&mut self, update: StatisticsUpdate) -> bool {
        let applied = self.view.apply(update);
        if applied {
            self.scroll = self.scroll.min(self.view.charts().len().saturating_sub(1));
        }
        applied
    }

    fn field_mut(&mut self, bound: Bound) -> &mut Input {
        match bound {
            Bound::Start => &mut self.start,
            Bound::End => &mut self.end,
        }
    }

    fn field(&self, bound: Bound) -> &Input {
        match bound {
            Bound::Start => &self.start,
            Bound::End => &self.end,
        }
    }

    /// Edit the focused field; emit a bound change once it holds a whole
    /// date or nothing at all. Breaking a whole date clears the bound.
    fn edit(&mut self, request: InputRequest) -> Option<Action> {
        let focus = self.focus;
        let input = self.field_mut(focus);
        let before = parse_date_field(input.value());
        if !input.handle(request)?.value {
            return None;
        }
        match (before, parse_date_field(input.value())) {
            (_, DateField::Empty) | (DateField::Date(_), DateField::Incomplete) => {
                Some(Action::SetBound(focus, None))
            }
            (_, DateField::Date(day)) => Some(Action::SetBound(focus, Some(day))),
            (_, DateField::Incomplete) => None,
        }
    }

    fn render_mode_bar(&self, frame: &mut Frame, area: Rect) {
        let toggle = |key: &'static str, mode: QueryMode| {
            let style = if self.view.mode() == mode {
                theme::mode_active()
            } else {
                theme::mode_inactive()
            };
            [
                Span::styled(format!(" {key} "), theme::key_hint_key()),
                Span::styled(format!("{mode}  "), style),
            ]
        };

        let mut spans = vec![Span::styled(
            format!(" {} ", self.view.device()),
            theme::device_id(),
        )];
        spans.push(Span::styled("│", theme::key_hint()));
        spans.extend(toggle("o", QueryMode::Overall));
        spans.extend(toggle("d", QueryMode::DateRange));
        frame.render_widget(Paragraph::new(Line::from(spans)), area);
    }

    fn render_date_fields(&self, frame: &mut Frame, area: Rect) {
        if self.view.mode() != QueryMode::DateRange {
            return;
        }

        let cols = Layout::horizontal([
            Constraint::Length(7),
            Constraint::Length(DATE_WIDTH + 2),
            Constraint::Length(6),
            Constraint::Length(DATE_WIDTH + 2),
            Constraint::Min(0),
        ])
        .split(area);

        frame.render_widget(Paragraph::new(Span::styled(" From ", theme::key_hint())), cols[0]);
        frame.render_widget(Paragraph::new(Span::styled("  To ", theme::key_hint())), cols[2]);

        for (bound, col) in [(Bound::Start, cols[1]), (Bound::End, cols[3])] {
            let focused = bound == self.focus;
            let input = self.field(bound);
            let style = match parse_date_field(input.value()) {
                DateField::Incomplete => theme::date_incomplete(),
                _ if focused => theme::date_focused(),
                _ => theme::table_row(),
            };
            let text = if input.value().is_empty() && !focused {
                Span::styled("yyyy-mm-dd", theme::key_hint())
            } else {
                Span::styled(input.value().to_owned(), style)
            };
            frame.render_widget(Paragraph::new(Line::from(vec![Span::raw("["), text, Span::raw("]")])), col);

            if focused {
                let offset = u16::try_from(input.visual_cursor()).unwrap_or(DATE_WIDTH);
                frame.set_cursor_position((col.x + 1 + offset.min(DATE_WIDTH), col.y));
            }
        }

        let phase = match self.view.phase() {
            QueryPhase::Partial => Span::styled("  enter both dates", theme::key_hint()),
            _ => Span::raw(""),
        };
        frame.render_widget(Paragraph::new(phase), cols[4]);
    }

    fn render_charts(&self, frame: &mut Frame, area: Rect) {
        if self.view.is_loading() {
            let label = if self.view.phase() == QueryPhase::Partial {
                " Waiting for a complete date range"
            } else {
                " Loading statistics..."
            };
            let throbber = status_indicator::loading(label);
            frame.render_stateful_widget(throbber, area, &mut self.throbber.clone());
            return;
        }

        let mut y = area.y;
        let bottom = area.y + area.height;
        for (index, (_, surface)) in self.view.charts().handles().enumerate().skip(self.scroll) {
            if y >= bottom {
                break;
            }
            let height = surface.height().min(bottom - y);
            let chart_area = Rect::new(area.x, y, area.width, height);
            metric_chart::render_chart(frame, chart_area, surface, index);
            y += height;
        }
    }

    fn render_status(&self, frame: &mut Frame, area: Rect) {
        let line = if let Some(err) = self.view.last_error() {
            Line::from(Span::styled(format!(" ✗ {err}"), theme::error_line()))
        } else if self.view.is_fetching() {
            Line::from(Span::styled(" fetching…", theme::key_hint()))
        } else {
            let count = self.view.charts().len();
            Line::from(Span::styled(format!(" {count} metrics"), theme::key_hint()))
        };
        frame.render_widget(Paragraph::new(line), area);
    }
}

impl<S: DashboardSource> Component for StatisticsScreen<S> {
    fn mount(&mut self) {
        self.view.mount();
    }

    fn unmount(&mut self) {
        self.view.unmount();
    }

    fn handle_key_event(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        let editing = self.view.mode() == QueryMode::DateRange;
        let action = match key.code {
            KeyCode::Char('o') => Some(Action::SelectOverall),
            KeyCode::Char('d') => Some(Action::SelectDateRange),
            KeyCode::Char('r') => Some(Action::RefreshStatistics),
            KeyCode::Char('j') | KeyCode::Down => {
                let last = self.view.charts().len().saturating_sub(1);
                self.scroll = (self.scroll + 1).min(last);
                None
            }
            KeyCode::Char('k') | KeyCode::Up => {
                self.scroll = self.scroll.saturating_sub(1);
                None
            }
            KeyCode::Tab | KeyCode::BackTab if editing => {
                self.focus = self.focus.other();
                None
            }
            KeyCode::Char(c @ ('0'..='9' | '-')) if editing => {
                self.edit(InputRequest::InsertChar(c))
            }
            KeyCode::Backspace if editing => self.edit(InputRequest::DeletePrevChar),
            KeyCode::Delete if editing => self.edit(InputRequest::DeleteNextChar),
            KeyCode::Left if editing => self.edit(InputRequest::GoToPrevChar),
            KeyCode::Right if editing => self.edit(InputRequest::GoToNextChar),
            _ => None,
        };
        Ok(action)
    }

    fn update(&mut self, action: &Action) -> Result<Option<Action>> {
        match action {
            Action::SelectOverall => self.view.select_overall(),
            Action::SelectDateRange => self.view.select_date_range(),
            Action::SetBound(Bound::Start, day) => self.view.set_start(*day),
            Action::SetBound(Bound::End, day) => self.view.set_end(*day),
            Action::RefreshStatistics => self.view.refresh(),
            Action::Tick => self.throbber.calc_next(),
            _ => {}
        }
        Ok(None)
    }

    fn render(&self, frame: &mut Frame, area: Rect) {
        let block = Block::default()
            .title(" Device Statistics ")
            .title_style(theme::title_style())
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(theme::border_focused());
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let layout = Layout::vertical([
            Constraint::Length(1), // mode toggles
            Constraint::Length(1), // date fields
            Constraint::Length(1), // status
            Constraint::Min(1),    // charts
        ])
        .split(inner);

        self.render_mode_bar(frame, layout[0]);
        self.render_date_fields(frame, layout[1]);
        self.render_status(frame, layout[2]);
        self.render_charts(frame, layout[3]);
    }

    fn hints(&self) -> &'static [(&'static str, &'static str)] {
        if self.view.mode() == QueryMode::DateRange {
            &[("Tab", "field"), ("0-9 -", "date"), ("j/k", "scroll"), ("r", "refresh")]
        } else {
            &[("o/d", "mode"), ("j/k", "scroll"), ("r", "refresh")]
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crossterm::event::KeyModifiers;
    use netsight_core::{
        CoreError, DeviceSnapshot, MetricsPayload, StatsQuery, update_channel,
    };
    use pretty_assertions::assert_eq;

    #[derive(Clone)]
    struct EmptySource;

    impl DashboardSource for EmptySource {
        async fn devices(&self) -> Result<DeviceSnapshot, CoreError> {
            Ok(DeviceSnapshot::default())
        }

        async fn statistics(
            &self,
            _device: &DeviceId,
            _query: &StatsQuery,
        ) -> Result<MetricsPayload, CoreError> {
            Ok(MetricsPayload::default())
        }
    }

    fn date_range_screen() -> StatisticsScreen<EmptySource> {
        let (updates, _rx) = update_channel();
        let mut screen = StatisticsScreen::new(DeviceId::from("dev-1"), EmptySource, updates);
        screen.update(&Action::SelectDateRange).unwrap();
        screen
    }

    fn press(screen: &mut StatisticsScreen<EmptySource>, code: KeyCode) -> Option<Action> {
        screen
            .handle_key_event(KeyEvent::new(code, KeyModifiers::NONE))
            .unwrap()
    }

    fn type_text(screen: &mut StatisticsScreen<EmptySource>, text: &str) -> Vec<Action> {
        text.chars()
            .filter_map(|c| press(screen, KeyCode::Char(c)))
            .collect()
    }

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[tokio::test]
    async fn typing_a_whole_date_sets_the_bound_once() {
        let mut screen = date_range_screen();
        let actions = type_text(&mut screen, "2024-01-01");
        assert_eq!(
            actions,
            vec![Action::SetBound(Bound::Start, Some(day(2024, 1, 1)))]
        );
    }

    #[tokio::test]
    async fn breaking_a_whole_date_clears_the_bound() {
        let mut screen = date_range_screen();
        type_text(&mut screen, "2024-01-01");

        assert_eq!(
            press(&mut screen, KeyCode::Backspace),
            Some(Action::SetBound(Bound::Start, None))
        );
        // already cleared, still incomplete
        assert_eq!(press(&mut screen, KeyCode::Backspace), None);
    }

    #[tokio::test]
    async fn cursor_moves_do_not_touch_the_bound() {
        let mut screen = date_range_screen();
        type_text(&mut screen, "2024-01-01");
        assert_eq!(press(&mut screen, KeyCode::Left), None);
        assert_eq!(press(&mut screen, KeyCode::Right), None);
    }

    #[tokio::test]
    async fn edits_follow_the_focused_field() {
        let mut screen = date_range_screen();
        assert_eq!(press(&mut screen, KeyCode::Tab), None);
        let actions = type_text(&mut screen, "2024-02-29");
        assert_eq!(
            actions,
            vec![Action::SetBound(Bound::End, Some(day(2024, 2, 29)))]
        );
    }

    #[tokio::test]
    async fn digits_are_ignored_outside_date_range_mode() {
        let (updates, _rx) = update_channel();
        let mut screen = StatisticsScreen::new(DeviceId::from("dev-1"), EmptySource, updates);
        assert!(type_text(&mut screen, "2024-01-01").is_empty());
    }

    #[test]
    fn date_field_states() {
        assert_eq!(parse_date_field(""), DateField::Empty);
        assert_eq!(parse_date_field("   "), DateField::Empty);
        assert_eq!(parse_date_field("2024-01"), DateField::Incomplete);
        assert_eq!(parse_date_field("2024-02-30"), DateField::Incomplete);
        assert_eq!(
            parse_date_field("2024-01-31"),
            DateField::Date(NaiveDate::from_ymd_opt(2024, 1, 31).unwrap_or_default())
        );
    }

    #[test]
    fn single_digit_months_are_not_dates_yet() {
        assert_eq!(parse_date_field("2024-1-310"), DateField::Incomplete);
    }
}
