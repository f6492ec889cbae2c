// netsight-api: Async Rust client for the network analyzer HTTP API

pub mod client;
pub mod error;
pub mod transport;
pub mod types;

pub use client::ApiClient;
pub use error::Error;
pub use transport::{TlsMode, TransportConfig};
pub use types::{DevicesResponse, MetricValue, MetricsPayload, day_start_timestamp};
