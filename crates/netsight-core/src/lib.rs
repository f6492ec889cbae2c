//! Data-refresh and chart-lifecycle layer between `netsight-api` and the
//! terminal UI.
//!
//! - **[`PollingLoop`]**: recurring fetch on a fixed interval, stopped through
//!   its [`CancelHandle`]. Drives the connection table.
//!
//! - **[`QueryModeController`]**: overall vs. date-range state machine whose
//!   operations return a declared [`Transition`] (clear and/or fetch).
//!
//! - **[`MetricRenderer`]** / **[`ChartLifecycleManager`]**: classify a
//!   [`MetricsPayload`] into chart specs and keep an owned, keyed set of chart
//!   handles matching the latest payload. Drawing is delegated to a
//!   [`ChartBackend`].
//!
//! - **Views** ([`view`]): [`ConnectionTableView`] and [`StatisticsView`]
//!   compose the above. Background tasks report through [`ViewUpdate`]
//!   messages; the owner of the views applies them.
//!
//! - **[`DashboardSource`]**: the seam between views and the HTTP API.

pub mod charts;
pub mod config;
pub mod convert;
pub mod error;
pub mod model;
pub mod polling;
pub mod query;
pub mod render;
pub mod source;
pub mod view;

// ── Primary re-exports ──────────────────────────────────────────────
pub use charts::{ChartBackend, ChartLifecycleManager};
pub use config::{DEFAULT_DEVICES_INTERVAL, DashboardConfig, TlsVerification};
pub use error::CoreError;
pub use polling::{CancelHandle, PollingLoop};
pub use query::{DateRange, QueryMode, QueryModeController, QueryPhase, StatsQuery, Transition};
pub use render::{BarSpec, ChartShape, ChartSpec, MetricRenderer};
pub use source::{DashboardSource, HttpSource};
pub use view::{
    ConnectionTableView, StatisticsUpdate, StatisticsView, UpdateReceiver, UpdateSender,
    ViewUpdate, update_channel,
};

pub use model::{DeviceId, DeviceRow, DeviceSnapshot, MetricValue, MetricsPayload};
