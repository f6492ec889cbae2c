//! Screen identifiers and their routes.

use std::fmt;

use netsight_core::DeviceId;

/// The two dashboard screens.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub enum ScreenId {
    /// Connection table, route `/`.
    #[default]
    Connections,
    /// Per-device statistics, route `/details/:deviceId`.
    Details(DeviceId),
}

impl ScreenId {
    /// Route path shown in the header.
    pub fn route(&self) -> String {
        match self {
            Self::Connections => "/".into(),
            Self::Details(id) => format!("/details/{id}"),
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Connections => "Connections",
            Self::Details(_) => "Details",
        }
    }

    pub fn is_details(&self) -> bool {
        matches!(self, Self::Details(_))
    }
}

impl fmt::Display for ScreenId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn routes_match_page_paths() {
        assert_eq!(ScreenId::Connections.route(), "/");
        assert_eq!(
            ScreenId::Details(DeviceId::from("aa:bb:cc:dd:ee:ff")).route(),
            "/details/aa:bb:cc:dd:ee:ff"
        );
    }
}
