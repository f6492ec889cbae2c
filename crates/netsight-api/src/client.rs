// Analyzer API HTTP client
//
// Wraps `reqwest::Client` with URL construction, status mapping and body
// decoding. The three endpoint methods are thin: all transport mechanics
// live in the request helpers below them.

use chrono::NaiveDate;
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::debug;
use url::Url;

use crate::error::Error;
use crate::transport::TransportConfig;
use crate::types::{DevicesResponse, MetricsPayload, StatisticsDateRequest, StatisticsRequest};

/// HTTP client for the network analyzer server.
///
/// Cheap to clone: the underlying `reqwest::Client` is reference-counted.
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: Url,
}

impl ApiClient {
    /// Create a new client from a `TransportConfig`.
    ///
    /// `base_url` is the server root (e.g. `http://127.0.0.1:8000`); endpoint
    /// paths are appended to it.
    pub fn new(base_url: Url, transport: &TransportConfig) -> Result<Self, Error> {
        let http = transport.build_client()?;
        Ok(Self { http, base_url })
    }

    /// Create a client with a pre-built `reqwest::Client`.
    pub fn from_reqwest(base_url: &str, http: reqwest::Client) -> Result<Self, Error> {
        let base_url = Url::parse(base_url)?;
        Ok(Self { http, base_url })
    }

    /// The server base URL.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    // ── Endpoints ────────────────────────────────────────────────────

    /// `GET /devices`: connection state and address of every known device.
    pub async fn list_devices(&self) -> Result<DevicesResponse, Error> {
        let url = self.endpoint("devices")?;
        self.get(url).await
    }

    /// `POST /statistics`: metrics over the device's whole history.
    pub async fn statistics(&self, mac_address: &str) -> Result<MetricsPayload, Error> {
        let url = self.endpoint("statistics")?;
        self.post(url, &StatisticsRequest { mac_address }).await
    }

    /// `POST /statisticsDate`: metrics between two days, both sent as
    /// day-start timestamps.
    pub async fn statistics_by_date(
        &self,
        mac_address: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<MetricsPayload, Error> {
        let url = self.endpoint("statisticsDate")?;
        self.post(url, &StatisticsDateRequest::new(mac_address, start, end))
            .await
    }

    // ── URL builders ─────────────────────────────────────────────────

    /// Build `{base}/{path}`, keeping any path prefix of the base URL.
    fn endpoint(&self, path: &str) -> Result<Url, Error> {
        let full = format!("{}/{}", self.base_url.as_str().trim_end_matches('/'), path);
        Ok(Url::parse(&full)?)
    }

    // ── Request helpers ──────────────────────────────────────────────

    async fn get<T: DeserializeOwned>(&self, url: Url) -> Result<T, Error> {
        debug!("GET {}", url);

        let resp = self.http.get(url).send().await.map_err(Error::Transport)?;

        Self::parse_json(resp).await
    }

    async fn post<T: DeserializeOwned>(&self, url: Url, body: &impl Serialize) -> Result<T, Error> {
        debug!("POST {}", url);

        let resp = self
            .http
            .post(url)
            .json(body)
            .send()
            .await
            .map_err(Error::Transport)?;

        Self::parse_json(resp).await
    }

    /// Map non-success statuses to `Error::Api`, then decode the body.
    async fn parse_json<T: DeserializeOwned>(resp: reqwest::Response) -> Result<T, Error> {
        let status = resp.status();
        let body = resp.text().await.map_err(Error::Transport)?;

        if !status.is_success() {
            return Err(Error::Api {
                status: status.as_u16(),
                body,
            });
        }

        serde_json::from_str(&body).map_err(|e| Error::Deserialization {
            message: e.to_string(),
            body,
        })
    }
}
