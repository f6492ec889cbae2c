//! Small status glyphs: link state dots and the loading spinner.

use ratatui::text::Span;
use throbber_widgets_tui::Throbber;

use crate::theme;

/// ● connected, ○ disconnected.
pub fn status_char(connected: bool) -> &'static str {
    if connected { "●" } else { "○" }
}

/// Dot plus a word, for table cells.
pub fn status_span(connected: bool) -> Span<'static> {
    let label = if connected { "connected" } else { "disconnected" };
    Span::styled(
        format!("{} {label}", status_char(connected)),
        theme::link_state(connected),
    )
}

/// Spinner shown while a view has nothing to display yet.
pub fn loading(label: &'static str) -> Throbber<'static> {
    let (text, glyph) = theme::throbber();
    Throbber::default()
        .label(label)
        .style(text)
        .throbber_style(glyph)
}
