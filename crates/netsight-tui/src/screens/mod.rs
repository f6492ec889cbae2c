//! Screen implementations. Each screen is a top-level Component.

pub mod connections;
pub mod statistics;

pub use connections::ConnectionsScreen;
pub use statistics::StatisticsScreen;
