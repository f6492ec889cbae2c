//! Terminal chart surfaces.
//!
//! [`TerminalCharts`] is the chart backend the statistics screen hands to the
//! lifecycle manager: `create` pre-computes everything a frame needs to draw
//! a metric, so rendering is a plain walk over the live handles.

use ratatui::{
    Frame,
    layout::{Direction, Rect},
    style::Style,
    text::Line,
    widgets::{Bar, BarChart, BarGroup, Block, BorderType, Borders},
};
use tracing::trace;

use netsight_core::{ChartBackend, ChartShape, ChartSpec};

use crate::theme;

/// Bar lengths are integers, so values are scaled to keep two decimals.
const SCALE: f64 = 100.0;

/// Longest bar, in ticks. The bar chart multiplies lengths by its width in
/// eighths of a cell, so lengths stay well below `u64::MAX / (u16::MAX * 8)`.
pub const MAX_TICKS: u64 = 1 << 32;

/// One pre-computed bar.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SurfaceBar {
    pub label: String,
    /// Scaled, non-negative bar length.
    pub length: u64,
    /// Literal value drawn next to the bar.
    pub text: String,
}

/// Drawing resources for one metric.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChartSurface {
    pub title: String,
    pub kind: &'static str,
    pub shape: ChartShape,
    pub bars: Vec<SurfaceBar>,
}

impl ChartSurface {
    /// Rows needed to draw this chart, borders included.
    pub fn height(&self) -> u16 {
        u16::try_from(self.bars.len())
            .unwrap_or(u16::MAX)
            .saturating_add(2)
    }
}

/// Bar lengths for one chart. Negative and non-finite values draw as empty
/// bars. When the largest bar exceeds [`MAX_TICKS`] the whole chart is scaled
/// down together, so relative lengths survive; the literal text still shows
/// the real value.
#[allow(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::cast_precision_loss,
    clippy::as_conversions
)]
pub fn bar_lengths(values: &[f64]) -> Vec<u64> {
    let limit = MAX_TICKS as f64;
    let scaled: Vec<f64> = values
        .iter()
        .map(|&v| if v.is_finite() && v > 0.0 { v * SCALE } else { 0.0 })
        .collect();
    let longest = scaled.iter().copied().fold(0.0, f64::max);
    let factor = if longest > limit { limit / longest } else { 1.0 };

    scaled
        .into_iter()
        .map(|v| (v * factor).round().min(limit) as u64)
        .collect()
}

/// Chart backend for the terminal.
#[derive(Debug, Default)]
pub struct TerminalCharts {
    created: u64,
    destroyed: u64,
}

impl TerminalCharts {
    /// Surfaces currently alive.
    pub fn live(&self) -> u64 {
        self.created - self.destroyed
    }
}

impl ChartBackend for TerminalCharts {
    type Handle = ChartSurface;

    fn create(&mut self, spec: &ChartSpec) -> ChartSurface {
        self.created += 1;
        let values: Vec<f64> = spec.bars.iter().map(|bar| bar.value).collect();
        ChartSurface {
            title: spec.key.clone(),
            kind: spec.kind(),
            shape: spec.shape,
            bars: spec
                .bars
                .iter()
                .zip(bar_lengths(&values))
                .map(|(bar, length)| SurfaceBar {
                    label: bar.label.clone(),
                    length,
                    text: bar.display_value(),
                })
                .collect(),
        }
    }

    fn destroy(&mut self, handle: ChartSurface) {
        self.destroyed += 1;
        trace!(chart = %handle.title, "chart surface released");
    }
}

/// Draw one surface as a horizontal bar chart.
pub fn render_chart(frame: &mut Frame, area: Rect, surface: &ChartSurface, color_index: usize) {
    let color = theme::chart_color(color_index);
    let title = match surface.shape {
        ChartShape::Distribution => format!(" {} ", surface.title),
        ChartShape::SingleValue => format!(" {} (value) ", surface.title),
    };
    let block = Block::default()
        .title(title)
        .title_style(theme::title_style())
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(theme::border_default());

    let bars: Vec<Bar> = surface
        .bars
        .iter()
        .map(|b| {
            Bar::default()
                .value(b.length)
                .label(Line::from(b.label.clone()))
                .text_value(b.text.clone())
                .style(Style::default().fg(color))
                .value_style(Style::default().fg(theme::BG_DARK).bg(color))
        })
        .collect();

    let chart = BarChart::default()
        .block(block)
        .direction(Direction::Horizontal)
        .bar_width(1)
        .bar_gap(0)
        .label_style(theme::table_row())
        .data(BarGroup::default().bars(&bars));

    frame.render_widget(chart, area);
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use netsight_core::{BarSpec, ChartLifecycleManager};
    use pretty_assertions::assert_eq;
    use ratatui::{Terminal, backend::TestBackend};

    fn spec(key: &str, values: &[(&str, f64)]) -> ChartSpec {
        ChartSpec {
            key: key.into(),
            shape: if values.len() == 1 && values[0].0 == key {
                ChartShape::SingleValue
            } else {
                ChartShape::Distribution
            },
            bars: values
                .iter()
                .map(|&(label, value)| BarSpec {
                    label: label.into(),
                    value,
                })
                .collect(),
        }
    }

    #[test]
    fn surfaces_keep_literal_text_and_scaled_lengths() {
        let mut backend = TerminalCharts::default();
        let surface = backend.create(&spec("rat", &[("LTE", 61.5), ("3G", 0.25), ("2G", -1.0)]));

        assert_eq!(surface.kind, "bar");
        assert_eq!(
            surface.bars,
            vec![
                SurfaceBar { label: "LTE".into(), length: 6150, text: "61.5".into() },
                SurfaceBar { label: "3G".into(), length: 25, text: "0.25".into() },
                SurfaceBar { label: "2G".into(), length: 0, text: "-1".into() },
            ]
        );
        assert_eq!(surface.height(), 5);
    }

    #[test]
    fn non_finite_values_draw_empty() {
        assert_eq!(bar_lengths(&[f64::NAN, f64::INFINITY, 3.0]), vec![0, 0, 300]);
    }

    #[test]
    fn huge_values_are_scaled_together() {
        let lengths = bar_lengths(&[1e15, 5e14, 0.0]);
        assert_eq!(lengths[0], MAX_TICKS);
        assert!(lengths[1].abs_diff(MAX_TICKS / 2) <= 1);
        assert_eq!(lengths[2], 0);
    }

    #[test]
    fn huge_single_value_renders_with_literal_text() {
        let mut backend = TerminalCharts::default();
        let surface = backend.create(&spec("bytes", &[("bytes", 1e15)]));
        assert_eq!(surface.bars[0].length, MAX_TICKS);
        assert_eq!(surface.bars[0].text, "1000000000000000");

        let mut terminal = Terminal::new(TestBackend::new(80, 10)).unwrap();
        terminal
            .draw(|frame| render_chart(frame, frame.area(), &surface, 0))
            .unwrap();

        let drawn: String = terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|cell| cell.symbol())
            .collect();
        assert!(drawn.contains("bytes"));
    }

    #[test]
    fn lifecycle_manager_releases_terminal_surfaces() {
        let mut charts = ChartLifecycleManager::new(TerminalCharts::default());
        charts.reconcile(&[spec("a", &[("a", 1.0)]), spec("b", &[("x", 2.0)])]);
        charts.reconcile(&[spec("b", &[("x", 3.0)])]);
        assert_eq!(charts.backend().live(), 1);

        charts.teardown();
        assert_eq!(charts.backend().live(), 0);
    }
}
