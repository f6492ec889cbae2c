// Wire types for the analyzer API.
//
// Response shapes are decided here, once: metric values become an explicit
// `MetricValue` variant and missing collections become empty maps, so nothing
// downstream has to inspect raw JSON.

use chrono::{NaiveDate, NaiveTime};
use indexmap::IndexMap;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use tracing::debug;

/// Timestamp layout expected by `POST /statisticsDate`.
pub const DATE_TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.3f";

/// Serialize a calendar day as its inclusive start, e.g. `2024-01-01 00:00:00.000`.
pub fn day_start_timestamp(date: NaiveDate) -> String {
    date.and_time(NaiveTime::MIN)
        .format(DATE_TIME_FORMAT)
        .to_string()
}

// ── Devices ─────────────────────────────────────────────────────────

/// Response of `GET /devices`.
///
/// Both maps are keyed by MAC address. A missing or `null` collection
/// decodes as empty.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DevicesResponse {
    #[serde(default, deserialize_with = "empty_if_null")]
    pub connected_devices: IndexMap<String, bool>,
    #[serde(default, deserialize_with = "empty_if_null")]
    pub devices_ip: IndexMap<String, Option<String>>,
}

fn empty_if_null<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Option::<T>::deserialize(deserializer).map(Option::unwrap_or_default)
}

// ── Statistics requests ─────────────────────────────────────────────

/// Body of `POST /statistics`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatisticsRequest<'a> {
    pub mac_address: &'a str,
}

/// Body of `POST /statisticsDate`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatisticsDateRequest<'a> {
    pub mac_address: &'a str,
    pub start_date: String,
    pub end_date: String,
}

impl<'a> StatisticsDateRequest<'a> {
    /// Build a ranged request; both bounds are sent as day-start timestamps.
    pub fn new(mac_address: &'a str, start: NaiveDate, end: NaiveDate) -> Self {
        Self {
            mac_address,
            start_date: day_start_timestamp(start),
            end_date: day_start_timestamp(end),
        }
    }
}

// ── Metrics ─────────────────────────────────────────────────────────

/// A single metric: either one number or a category -> count mapping.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum MetricValue {
    Scalar(f64),
    Distribution(IndexMap<String, f64>),
}

impl MetricValue {
    /// Decide the shape of a raw JSON value.
    ///
    /// Numbers become scalars, objects become distributions (non-numeric
    /// inner entries are dropped). Anything else is unsupported.
    pub fn from_json(value: &Value) -> Option<Self> {
        match value {
            Value::Number(n) => n.as_f64().map(Self::Scalar),
            Value::Object(map) => {
                let mut buckets = IndexMap::with_capacity(map.len());
                for (category, count) in map {
                    match count.as_f64() {
                        Some(count) => {
                            buckets.insert(category.clone(), count);
                        }
                        None => debug!(%category, "skipping non-numeric distribution bucket"),
                    }
                }
                Some(Self::Distribution(buckets))
            }
            _ => None,
        }
    }

    pub fn is_distribution(&self) -> bool {
        matches!(self, Self::Distribution(_))
    }
}

/// Ordered metric name -> value mapping returned by both statistics queries.
///
/// Key order is the order the server emitted; it drives screen layout.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct MetricsPayload(IndexMap<String, MetricValue>);

impl MetricsPayload {
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn get(&self, name: &str) -> Option<&MetricValue> {
        self.0.get(name)
    }

    /// Iterate metrics in payload order.
    pub fn iter(&self) -> indexmap::map::Iter<'_, String, MetricValue> {
        self.0.iter()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }
}

impl FromIterator<(String, MetricValue)> for MetricsPayload {
    fn from_iter<I: IntoIterator<Item = (String, MetricValue)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl<'a> IntoIterator for &'a MetricsPayload {
    type Item = (&'a String, &'a MetricValue);
    type IntoIter = indexmap::map::Iter<'a, String, MetricValue>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl<'de> Deserialize<'de> for MetricsPayload {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = IndexMap::<String, Value>::deserialize(deserializer)?;
        let mut metrics = IndexMap::with_capacity(raw.len());
        for (name, value) in raw {
            match MetricValue::from_json(&value) {
                Some(metric) => {
                    metrics.insert(name, metric);
                }
                None => debug!(metric = %name, "skipping unsupported metric value"),
            }
        }
        Ok(Self(metrics))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn day_start_uses_millisecond_layout() {
        let date = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        assert_eq!(day_start_timestamp(date), "2024-01-01 00:00:00.000");
    }

    #[test]
    fn date_request_serializes_camel_case() {
        let start = NaiveDate::from_ymd_opt(2024, 3, 9).unwrap();
        let end = NaiveDate::from_ymd_opt(2024, 3, 15).unwrap();
        let body = serde_json::to_value(StatisticsDateRequest::new("aa:bb", start, end)).unwrap();
        assert_eq!(
            body,
            json!({
                "macAddress": "aa:bb",
                "startDate": "2024-03-09 00:00:00.000",
                "endDate": "2024-03-15 00:00:00.000",
            })
        );
    }

    #[test]
    fn metrics_keep_server_order_and_shape() {
        let payload: MetricsPayload = serde_json::from_value(json!({
            "zeta": 1.5,
            "alpha": { "LTE": 60.0, "3G": 40.0 },
            "mid": -85,
        }))
        .unwrap();

        assert_eq!(payload.names().collect::<Vec<_>>(), ["zeta", "alpha", "mid"]);
        assert_eq!(payload.get("zeta"), Some(&MetricValue::Scalar(1.5)));
        assert_eq!(payload.get("mid"), Some(&MetricValue::Scalar(-85.0)));

        let Some(MetricValue::Distribution(buckets)) = payload.get("alpha") else {
            panic!("alpha should be a distribution");
        };
        assert_eq!(buckets.keys().collect::<Vec<_>>(), ["LTE", "3G"]);
    }

    #[test]
    fn unsupported_metric_values_are_skipped() {
        let payload: MetricsPayload = serde_json::from_value(json!({
            "ok": 2,
            "text": "n/a",
            "missing": null,
            "mixed": { "a": 1, "b": "x" },
        }))
        .unwrap();

        assert_eq!(payload.names().collect::<Vec<_>>(), ["ok", "mixed"]);
        let Some(MetricValue::Distribution(buckets)) = payload.get("mixed") else {
            panic!("mixed should be a distribution");
        };
        assert_eq!(buckets.len(), 1);
        assert_eq!(buckets.get("a"), Some(&1.0));
    }

    #[test]
    fn devices_response_tolerates_missing_and_null_maps() {
        let resp: DevicesResponse =
            serde_json::from_value(json!({ "connected_devices": { "aa": true }, "devices_ip": null }))
                .unwrap();
        assert_eq!(resp.connected_devices.len(), 1);
        assert!(resp.devices_ip.is_empty());

        let empty: DevicesResponse = serde_json::from_value(json!({})).unwrap();
        assert_eq!(empty, DevicesResponse::default());
    }
}
