//! WebSocket endpoint of the device.

use std::fmt;

use crate::error::PanelError;

/// The fixed `ws://<host>/ws` URL the panel dials.
///
/// Only the host varies; scheme and path are fixed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoint {
    host: String,
    url: String,
}

impl Endpoint {
    /// Path served by the device's WebSocket handler.
    pub const PATH: &'static str = "/ws";

    /// Builds the endpoint for `host`, which may carry a `:port` suffix.
    ///
    /// # Errors
    ///
    /// Returns [`PanelError::InvalidHost`] if `host` is empty or contains
    /// whitespace, a path separator, or a scheme.
    pub fn from_host(host: &str) -> Result<Self, PanelError> {
        let host = host.trim();
        let invalid = host.is_empty()
            || host.contains("://")
            || host.chars().any(|c| c.is_whitespace() || matches!(c, '/' | '?' | '#'));
        if invalid {
            return Err(PanelError::InvalidHost(host.to_string()));
        }
        Ok(Self {
            host: host.to_string(),
            url: format!("ws://{host}{}", Self::PATH),
        })
    }

    /// Host (and optional port) the endpoint was derived from.
    #[must_use]
    pub fn host(&self) -> &str {
        &self.host
    }

    /// Full WebSocket URL.
    #[must_use]
    pub fn url(&self) -> &str {
        &self.url
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.url)
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    #[test]
    fn derives_url_from_host() {
        let Ok(endpoint) = Endpoint::from_host("192.168.4.1") else {
            panic!("valid host rejected");
        };
        assert_eq!(endpoint.url(), "ws://192.168.4.1/ws");
        assert_eq!(endpoint.host(), "192.168.4.1");
        assert_eq!(endpoint.to_string(), "ws://192.168.4.1/ws");
    }

    #[test]
    fn keeps_port() {
        let Ok(endpoint) = Endpoint::from_host(" localhost:9001 ") else {
            panic!("host with port rejected");
        };
        assert_eq!(endpoint.url(), "ws://localhost:9001/ws");
    }

    #[test]
    fn rejects_malformed_hosts() {
        for host in ["", "   ", "ws://esp32", "esp32/ws", "esp 32", "esp32?x=1"] {
            assert!(
                matches!(Endpoint::from_host(host), Err(PanelError::InvalidHost(_))),
                "accepted {host:?}"
            );
        }
    }
}
