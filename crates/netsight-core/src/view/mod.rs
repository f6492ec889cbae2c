// ── Views ──
//
// The two screens' state machines. Background tasks never touch view state;
// they send a `ViewUpdate` to whoever owns the views, which applies it.

pub mod connections;
pub mod statistics;

pub use connections::ConnectionTableView;
pub use statistics::StatisticsView;

use tokio::sync::mpsc;

use crate::error::CoreError;
use crate::model::{DeviceId, DeviceSnapshot, MetricsPayload};

/// Result delivered by a background fetch.
#[derive(Debug)]
pub enum ViewUpdate {
    Devices(DeviceSnapshot),
    Statistics(StatisticsUpdate),
}

/// Outcome of one statistics request, tagged with the request generation.
#[derive(Debug)]
pub struct StatisticsUpdate {
    pub device: DeviceId,
    pub generation: u64,
    pub result: Result<MetricsPayload, CoreError>,
}

pub type UpdateSender = mpsc::UnboundedSender<ViewUpdate>;
pub type UpdateReceiver = mpsc::UnboundedReceiver<ViewUpdate>;

/// Channel carrying background results to the UI loop.
pub fn update_channel() -> (UpdateSender, UpdateReceiver) {
    mpsc::unbounded_channel()
}

#[cfg(test)]
pub(crate) mod testing {
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::{Arc, Mutex};
    use std::time::Duration;

    use crate::error::CoreError;
    use crate::model::{DeviceId, DeviceSnapshot, MetricValue, MetricsPayload};
    use crate::query::StatsQuery;
    use crate::source::DashboardSource;

    /// Scripted source: fixed responses after a simulated network delay.
    #[derive(Debug, Clone, Default)]
    pub struct FakeSource {
        pub delay: Duration,
        pub snapshot: DeviceSnapshot,
        pub fail: Arc<AtomicBool>,
        pub device_calls: Arc<Mutex<usize>>,
        pub stats_calls: Arc<Mutex<Vec<(DeviceId, StatsQuery)>>>,
    }

    impl FakeSource {
        pub fn with_delay(delay: Duration) -> Self {
            Self {
                delay,
                ..Self::default()
            }
        }

        pub fn stats_calls(&self) -> Vec<(DeviceId, StatsQuery)> {
            self.stats_calls
                .lock()
                .map(|c| c.clone())
                .unwrap_or_default()
        }

        pub fn device_calls(&self) -> usize {
            self.device_calls.lock().map(|c| *c).unwrap_or_default()
        }

        pub fn set_failing(&self, fail: bool) {
            self.fail.store(fail, Ordering::SeqCst);
        }

        /// Payload whose single metric name records which query produced it.
        pub fn payload_for(query: &StatsQuery) -> MetricsPayload {
            let name = match query {
                StatsQuery::Overall => "overall".to_owned(),
                StatsQuery::Range { start, .. } => format!("from {start}"),
            };
            std::iter::once((name, MetricValue::Scalar(1.0))).collect()
        }
    }

    impl DashboardSource for FakeSource {
        async fn devices(&self) -> Result<DeviceSnapshot, CoreError> {
            if let Ok(mut calls) = self.device_calls.lock() {
                *calls += 1;
            }
            tokio::time::sleep(self.delay).await;
            if self.fail.load(Ordering::SeqCst) {
                return Err(CoreError::Timeout);
            }
            Ok(self.snapshot.clone())
        }

        async fn statistics(
            &self,
            device: &DeviceId,
            query: &StatsQuery,
        ) -> Result<MetricsPayload, CoreError> {
            if let Ok(mut calls) = self.stats_calls.lock() {
                calls.push((device.clone(), *query));
            }
            tokio::time::sleep(self.delay).await;
            if self.fail.load(Ordering::SeqCst) {
                return Err(CoreError::Api {
                    message: "HTTP 500".into(),
                    status: Some(500),
                });
            }
            Ok(Self::payload_for(query))
        }
    }
}
