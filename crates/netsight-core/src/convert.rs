// ── API-to-domain type conversions ──
//
// Bridges raw `netsight_api` response types into canonical domain types.

use netsight_api::DevicesResponse;

use crate::model::{DeviceId, DeviceSnapshot};

impl From<DevicesResponse> for DeviceSnapshot {
    fn from(resp: DevicesResponse) -> Self {
        Self {
            connected: resp
                .connected_devices
                .into_iter()
                .map(|(mac, up)| (DeviceId::from(mac), up))
                .collect(),
            // A null address is the same as a missing one.
            addresses: resp
                .devices_ip
                .into_iter()
                .filter_map(|(mac, ip)| ip.map(|ip| (DeviceId::from(mac), ip)))
                .collect(),
        }
    }
}
