// ── Data source seam ──
//
// The views never talk to reqwest directly. They are generic over a
// `DashboardSource`, which the binary fills with `HttpSource` and tests fill
// with scripted fakes.

use std::future::Future;

use tracing::debug;

use netsight_api::ApiClient;

use crate::config::DashboardConfig;
use crate::error::CoreError;
use crate::model::{DeviceId, DeviceSnapshot, MetricsPayload};
use crate::query::StatsQuery;

/// Where snapshots and statistics come from.
///
/// Futures must be `Send`: every call runs inside a spawned task.
pub trait DashboardSource: Clone + Send + Sync + 'static {
    /// One full device list snapshot.
    fn devices(&self) -> impl Future<Output = Result<DeviceSnapshot, CoreError>> + Send;

    /// Metrics for one device under the given query scope.
    fn statistics(
        &self,
        device: &DeviceId,
        query: &StatsQuery,
    ) -> impl Future<Output = Result<MetricsPayload, CoreError>> + Send;
}

/// `DashboardSource` backed by the analyzer HTTP API.
#[derive(Debug, Clone)]
pub struct HttpSource {
    client: ApiClient,
}

impl HttpSource {
    pub fn new(config: &DashboardConfig) -> Result<Self, CoreError> {
        let client = ApiClient::new(config.url.clone(), &config.transport())?;
        Ok(Self { client })
    }
}

impl DashboardSource for HttpSource {
    async fn devices(&self) -> Result<DeviceSnapshot, CoreError> {
        let resp = self.client.list_devices().await?;
        let snapshot = DeviceSnapshot::from(resp);
        debug!(
            devices = snapshot.total(),
            connected = snapshot.connected_count(),
            "device snapshot fetched"
        );
        Ok(snapshot)
    }

    async fn statistics(
        &self,
        device: &DeviceId,
        query: &StatsQuery,
    ) -> Result<MetricsPayload, CoreError> {
        let payload = match *query {
            StatsQuery::Overall => self.client.statistics(device.as_str()).await?,
            StatsQuery::Range { start, end } => {
                self.client
                    .statistics_by_date(device.as_str(), start, end)
                    .await?
            }
        };
        debug!(%device, %query, metrics = payload.len(), "statistics fetched");
        Ok(payload)
    }
}
