//! Palette and semantic styling for the dashboard.

use ratatui::style::{Color, Modifier, Style};

// ── Palette ───────────────────────────────────────────────────────────

pub const ELECTRIC_PURPLE: Color = Color::Rgb(225, 53, 255); // #e135ff
pub const NEON_CYAN: Color = Color::Rgb(128, 255, 234); // #80ffea
pub const CORAL: Color = Color::Rgb(255, 106, 193); // #ff6ac1
pub const ELECTRIC_YELLOW: Color = Color::Rgb(241, 250, 140); // #f1fa8c
pub const SUCCESS_GREEN: Color = Color::Rgb(80, 250, 123); // #50fa7b
pub const ERROR_RED: Color = Color::Rgb(255, 99, 99); // #ff6363
pub const DIM_WHITE: Color = Color::Rgb(189, 193, 207); // #bdc1cf
pub const BORDER_GRAY: Color = Color::Rgb(98, 114, 164); // #6272a4
pub const BG_HIGHLIGHT: Color = Color::Rgb(40, 42, 54); // #282a36
pub const BG_DARK: Color = Color::Rgb(30, 31, 41); // #1e1f29

/// Metric charts cycle through these in display order.
const CHART_COLORS: [Color; 5] = [NEON_CYAN, CORAL, ELECTRIC_PURPLE, SUCCESS_GREEN, ELECTRIC_YELLOW];

pub fn chart_color(index: usize) -> Color {
    CHART_COLORS[index % CHART_COLORS.len()]
}

// ── Panels ────────────────────────────────────────────────────────────

pub fn title_style() -> Style {
    Style::default().fg(NEON_CYAN).add_modifier(Modifier::BOLD)
}

pub fn border_focused() -> Style {
    Style::default().fg(ELECTRIC_PURPLE)
}

/// Chart frames.
pub fn border_default() -> Style {
    Style::default().fg(BORDER_GRAY)
}

// ── Connection table ──────────────────────────────────────────────────

pub fn table_header() -> Style {
    Style::default()
        .fg(NEON_CYAN)
        .add_modifier(Modifier::BOLD | Modifier::UNDERLINED)
}

pub fn table_row() -> Style {
    Style::default().fg(DIM_WHITE)
}

pub fn table_selected() -> Style {
    Style::default()
        .fg(ELECTRIC_PURPLE)
        .bg(BG_HIGHLIGHT)
        .add_modifier(Modifier::BOLD)
}

/// Device identifiers, in the table and the statistics header.
pub fn device_id() -> Style {
    Style::default().fg(NEON_CYAN)
}

pub fn address() -> Style {
    Style::default().fg(CORAL)
}

pub fn link_state(connected: bool) -> Style {
    Style::default().fg(if connected { SUCCESS_GREEN } else { ERROR_RED })
}

// ── Statistics controls ───────────────────────────────────────────────

pub fn mode_active() -> Style {
    Style::default()
        .fg(ELECTRIC_PURPLE)
        .add_modifier(Modifier::BOLD)
}

pub fn mode_inactive() -> Style {
    Style::default().fg(DIM_WHITE)
}

/// Date field that does not hold a calendar day yet.
pub fn date_incomplete() -> Style {
    Style::default().fg(ELECTRIC_YELLOW)
}

pub fn date_focused() -> Style {
    Style::default().fg(ELECTRIC_PURPLE)
}

/// Non-blocking fetch error.
pub fn error_line() -> Style {
    Style::default().fg(ERROR_RED)
}

// ── Status bar ────────────────────────────────────────────────────────

pub fn route() -> Style {
    Style::default().fg(ELECTRIC_PURPLE)
}

pub fn key_hint() -> Style {
    Style::default().fg(BORDER_GRAY)
}

pub fn key_hint_key() -> Style {
    Style::default().fg(NEON_CYAN).add_modifier(Modifier::BOLD)
}

/// Loading indicator: label and spinner glyph.
pub fn throbber() -> (Style, Style) {
    (
        Style::default().fg(NEON_CYAN),
        Style::default().fg(ELECTRIC_PURPLE),
    )
}
