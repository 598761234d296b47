//! Panel error types.
//!
//! [`PanelError`] is the central error type for the panel. The connection
//! layer never lets these escape its supervisor loop; they are logged and
//! the connection is retried.

use tokio_tungstenite::tungstenite;

/// Client-side error enum.
#[derive(Debug, thiserror::Error)]
pub enum PanelError {
    /// The configured device host cannot form a WebSocket endpoint.
    #[error("invalid device host: {0:?}")]
    InvalidHost(String),

    /// A configuration value was present but unusable.
    #[error("invalid configuration: {0}")]
    Config(String),

    /// An input line did not parse as a panel command.
    #[error("invalid command: {0}")]
    InvalidCommand(String),

    /// A connection attempt to the device failed.
    #[error("connection to {endpoint} failed: {reason}")]
    Connect {
        /// Endpoint that was dialled.
        endpoint: String,
        /// Human-readable failure reason.
        reason: String,
    },

    /// Error raised by the WebSocket transport.
    #[error("websocket error: {0}")]
    Transport(Box<tungstenite::Error>),
}

impl From<tungstenite::Error> for PanelError {
    fn from(err: tungstenite::Error) -> Self {
        Self::Transport(Box::new(err))
    }
}
