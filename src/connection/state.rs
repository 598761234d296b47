//! Connection state tag.

use std::fmt;

use serde::Serialize;

/// Lifecycle of the single device connection.
///
/// `Closed -> Connecting -> Open -> Closed`, or `Connecting -> Closed` when
/// an attempt fails. A new attempt may only start from `Closed`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ConnectionState {
    /// An attempt is in flight.
    Connecting,
    /// The link is up and frames may be sent.
    Open,
    /// No link; the next attempt is pending.
    #[default]
    Closed,
}

impl ConnectionState {
    /// Returns `true` if frames may be sent.
    #[must_use]
    pub const fn is_open(self) -> bool {
        matches!(self, Self::Open)
    }
}

impl fmt::Display for ConnectionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Connecting => "connecting",
            Self::Open => "open",
            Self::Closed => "closed",
        })
    }
}
