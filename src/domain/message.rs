//! Text frames exchanged with the device.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::Serialize;

use super::Rgb;

/// Frames the panel sends to the device.
///
/// The wire form is the [`fmt::Display`] output: `toggle` or
/// `RGB:{r},{g},{b}` in plain decimal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutboundMessage {
    /// Explicit user action with no arguments.
    Toggle,
    /// Current channel values.
    Rgb(Rgb),
}

impl fmt::Display for OutboundMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Toggle => f.write_str("toggle"),
            Self::Rgb(rgb) => write!(f, "RGB:{},{},{}", rgb.red, rgb.green, rgb.blue),
        }
    }
}

/// The latest reading received from the device.
///
/// The text is opaque and kept exactly as it arrived.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Reading {
    /// Raw payload of the last inbound frame.
    pub text: String,
    /// When the frame was received; `None` before the first one.
    pub received_at: Option<DateTime<Utc>>,
}

impl Reading {
    /// Stamps `text` with the current time.
    #[must_use]
    pub fn now(text: String) -> Self {
        Self {
            text,
            received_at: Some(Utc::now()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rgb_frame_has_no_padding() {
        let msg = OutboundMessage::Rgb(Rgb::new(10, 20, 30));
        assert_eq!(msg.to_string(), "RGB:10,20,30");

        let msg = OutboundMessage::Rgb(Rgb::new(0, 5, 255));
        assert_eq!(msg.to_string(), "RGB:0,5,255");
    }

    #[test]
    fn toggle_frame_is_literal() {
        assert_eq!(OutboundMessage::Toggle.to_string(), "toggle");
    }

    #[test]
    fn reading_keeps_text_verbatim() {
        let reading = Reading::now(" 42cm <b>\n".to_string());
        assert_eq!(reading.text, " 42cm <b>\n");
        assert!(reading.received_at.is_some());
    }
}
