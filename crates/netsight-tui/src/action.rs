//! All possible UI actions. Actions are the sole mechanism for state mutation.

use chrono::NaiveDate;

use netsight_core::DeviceId;

/// Which bound of the date range an edit targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Bound {
    #[default]
    Start,
    End,
}

impl Bound {
    pub fn other(self) -> Self {
        match self {
            Self::Start => Self::End,
            Self::End => Self::Start,
        }
    }
}

/// Every state transition in the TUI is expressed as an Action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    // ── Lifecycle ──────────────────────────────────────────────────
    Quit,
    Tick,
    Render,
    Resize(u16, u16),

    // ── Navigation ────────────────────────────────────────────────
    OpenDetails(DeviceId),
    GoBack,
    ToggleHelp,

    // ── Statistics query ──────────────────────────────────────────
    SelectOverall,
    SelectDateRange,
    SetBound(Bound, Option<NaiveDate>),
    RefreshStatistics,
}
