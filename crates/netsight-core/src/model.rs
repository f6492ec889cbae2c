// ── Domain model ──
//
// Types the views and the terminal UI work with. Metric payload types are
// re-exported from netsight-api, where their shape is decided.

use std::fmt;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

pub use netsight_api::{MetricValue, MetricsPayload};

/// Opaque device identity (the device's MAC address).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DeviceId(String);

impl DeviceId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DeviceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for DeviceId {
    fn from(s: &str) -> Self {
        Self(s.to_owned())
    }
}

impl From<String> for DeviceId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

/// One full poll result. Replaces the previous snapshot wholesale.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeviceSnapshot {
    /// Connection state per device, in server order.
    pub connected: IndexMap<DeviceId, bool>,
    /// Last known address per device. May lack entries present in `connected`.
    pub addresses: IndexMap<DeviceId, String>,
}

/// A table row derived from a [`DeviceSnapshot`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeviceRow<'a> {
    pub id: &'a DeviceId,
    pub address: Option<&'a str>,
    pub connected: bool,
}

impl DeviceSnapshot {
    /// Number of known devices.
    pub fn total(&self) -> usize {
        self.connected.len()
    }

    /// Number of devices currently connected.
    pub fn connected_count(&self) -> usize {
        self.connected.values().filter(|&&up| up).count()
    }

    pub fn address(&self, id: &DeviceId) -> Option<&str> {
        self.addresses.get(id).map(String::as_str)
    }

    /// Rows in `connected` order; a missing address is rendered absent.
    pub fn rows(&self) -> impl Iterator<Item = DeviceRow<'_>> {
        self.connected.iter().map(|(id, &connected)| DeviceRow {
            id,
            address: self.address(id),
            connected,
        })
    }

    pub fn is_empty(&self) -> bool {
        self.connected.is_empty()
    }
}
