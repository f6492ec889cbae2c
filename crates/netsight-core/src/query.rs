// ── Statistics query mode ──
//
// Overall vs. date-range scope for the statistics view, modelled as a small
// state machine. Each operation returns the effect the view must carry out
// instead of performing it.

use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter};

/// Which scope the statistics view queries.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Display, EnumIter, Serialize, Deserialize,
)]
pub enum QueryMode {
    #[default]
    #[strum(to_string = "Overall")]
    Overall,
    #[strum(to_string = "Date range")]
    DateRange,
}

/// Partially or fully entered date bounds. Both ends are inclusive days.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DateRange {
    pub start: Option<NaiveDate>,
    pub end: Option<NaiveDate>,
}

impl DateRange {
    /// Both bounds, if both are set.
    pub fn complete(&self) -> Option<(NaiveDate, NaiveDate)> {
        self.start.zip(self.end)
    }

    pub fn is_complete(&self) -> bool {
        self.complete().is_some()
    }
}

/// A fetch the statistics view should issue.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatsQuery {
    Overall,
    Range { start: NaiveDate, end: NaiveDate },
}

impl fmt::Display for StatsQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Overall => f.write_str("overall"),
            Self::Range { start, end } => write!(f, "{start}..={end}"),
        }
    }
}

/// Effect of a controller operation.
#[must_use]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Transition {
    /// Drop the displayed metrics (and their charts) before anything else.
    pub clear_metrics: bool,
    /// Issue this query.
    pub fetch: Option<StatsQuery>,
}

impl Transition {
    pub const NONE: Self = Self {
        clear_metrics: false,
        fetch: None,
    };

    pub fn is_noop(&self) -> bool {
        *self == Self::NONE
    }
}

/// Observable state of the controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum QueryPhase {
    Overall,
    #[strum(to_string = "date range (partial)")]
    Partial,
    #[strum(to_string = "date range")]
    Complete,
}

/// Tracks query mode and date bounds; decides when a fetch is warranted.
#[derive(Debug, Clone, Default)]
pub struct QueryModeController {
    mode: QueryMode,
    range: DateRange,
}

impl QueryModeController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn mode(&self) -> QueryMode {
        self.mode
    }

    pub fn range(&self) -> DateRange {
        self.range
    }

    pub fn phase(&self) -> QueryPhase {
        match self.mode {
            QueryMode::Overall => QueryPhase::Overall,
            QueryMode::DateRange if self.range.is_complete() => QueryPhase::Complete,
            QueryMode::DateRange => QueryPhase::Partial,
        }
    }

    /// The query the current state calls for, if any.
    pub fn current_query(&self) -> Option<StatsQuery> {
        match self.mode {
            QueryMode::Overall => Some(StatsQuery::Overall),
            QueryMode::DateRange => self
                .range
                .complete()
                .map(|(start, end)| StatsQuery::Range { start, end }),
        }
    }

    /// Mount-time effect.
    pub fn initial(&self) -> Transition {
        Transition {
            clear_metrics: false,
            fetch: self.current_query(),
        }
    }

    pub fn select_overall(&mut self) -> Transition {
        self.select(QueryMode::Overall)
    }

    /// Enter range mode. Fetches only if both bounds are already known.
    pub fn select_date_range(&mut self) -> Transition {
        self.select(QueryMode::DateRange)
    }

    pub fn set_start(&mut self, start: Option<NaiveDate>) -> Transition {
        if self.range.start == start {
            return Transition::NONE;
        }
        self.range.start = start;
        self.bound_changed()
    }

    pub fn set_end(&mut self, end: Option<NaiveDate>) -> Transition {
        if self.range.end == end {
            return Transition::NONE;
        }
        self.range.end = end;
        self.bound_changed()
    }

    fn select(&mut self, mode: QueryMode) -> Transition {
        if self.mode == mode {
            return Transition::NONE;
        }
        self.mode = mode;
        Transition {
            clear_metrics: true,
            fetch: self.current_query(),
        }
    }

    fn bound_changed(&self) -> Transition {
        match self.mode {
            QueryMode::Overall => Transition::NONE,
            QueryMode::DateRange => Transition {
                clear_metrics: false,
                fetch: self.current_query(),
            },
        }
    }
}
