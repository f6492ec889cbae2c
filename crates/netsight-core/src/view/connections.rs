// ── Connection table ──
//
// Keeps the device table in step with `GET /devices` through a polling loop.
// Each snapshot replaces the previous one wholesale.

use std::time::Duration;

use chrono::{DateTime, Utc};
use tracing::debug;

use crate::error::CoreError;
use crate::model::{DeviceRow, DeviceSnapshot};
use crate::polling::{CancelHandle, PollingLoop};
use crate::source::DashboardSource;
use crate::view::{UpdateSender, ViewUpdate};

pub struct ConnectionTableView<S> {
    source: S,
    updates: UpdateSender,
    interval: Duration,
    snapshot: Option<DeviceSnapshot>,
    last_updated: Option<DateTime<Utc>>,
    poller: Option<CancelHandle>,
}

impl<S: DashboardSource> ConnectionTableView<S> {
    pub fn new(source: S, updates: UpdateSender, interval: Duration) -> Self {
        Self {
            source,
            updates,
            interval,
            snapshot: None,
            last_updated: None,
            poller: None,
        }
    }

    /// Start polling. Mounting twice is a no-op.
    pub fn mount(&mut self) {
        if self.poller.is_some() {
            return;
        }

        let source = self.source.clone();
        let updates = self.updates.clone();
        let poller = PollingLoop::new(self.interval)
            .named("devices")
            .start(move |token| {
                let source = source.clone();
                let updates = updates.clone();
                async move {
                    let snapshot = source.devices().await?;
                    if token.is_cancelled() {
                        debug!("dropping device snapshot after unmount");
                    } else {
                        let _ = updates.send(ViewUpdate::Devices(snapshot));
                    }
                    Ok::<(), CoreError>(())
                }
            });

        self.poller = Some(poller);
    }

    /// Replace the table contents. Returns `false` if the view is unmounted.
    pub fn apply(&mut self, snapshot: DeviceSnapshot) -> bool {
        if !self.is_mounted() {
            return false;
        }
        self.snapshot = Some(snapshot);
        self.last_updated = Some(Utc::now());
        true
    }

    /// Stop polling. Results still in flight are discarded.
    pub fn unmount(&mut self) {
        if let Some(poller) = self.poller.take() {
            poller.cancel();
        }
    }

    pub fn is_mounted(&self) -> bool {
        self.poller.is_some()
    }

    /// No snapshot has arrived yet.
    pub fn is_loading(&self) -> bool {
        self.snapshot.is_none()
    }

    pub fn snapshot(&self) -> Option<&DeviceSnapshot> {
        self.snapshot.as_ref()
    }

    pub fn rows(&self) -> Vec<DeviceRow<'_>> {
        self.snapshot
            .as_ref()
            .map(|s| s.rows().collect())
            .unwrap_or_default()
    }

    pub fn total(&self) -> usize {
        self.snapshot.as_ref().map_or(0, DeviceSnapshot::total)
    }

    pub fn connected_count(&self) -> usize {
        self.snapshot
            .as_ref()
            .map_or(0, DeviceSnapshot::connected_count)
    }

    pub fn last_updated(&self) -> Option<DateTime<Utc>> {
        self.last_updated
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }
}
