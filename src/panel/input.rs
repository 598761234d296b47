//! Parsing of user input lines into panel commands.
//!
//! Accepted forms:
//!
//! ```text
//! red 120        r 120        green=30
//! rgb 10 20 30
//! toggle
//! status
//! ```

use std::str::FromStr;

use crate::domain::Channel;
use crate::error::PanelError;

/// A single user action on the panel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PanelCommand {
    /// Input events moving one or more sliders.
    Slide(Vec<(Channel, u8)>),
    /// Press of the toggle control.
    Toggle,
    /// Request for a JSON snapshot of the panel.
    Status,
}

impl FromStr for PanelCommand {
    type Err = PanelError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let normalized = line.replace('=', " ");
        let mut words = normalized.split_whitespace();
        let Some(head) = words.next() else {
            return Err(PanelError::InvalidCommand("empty line".to_string()));
        };
        let args: Vec<&str> = words.collect();

        match (head.to_ascii_lowercase().as_str(), args.as_slice()) {
            ("toggle", []) => Ok(Self::Toggle),
            ("status", []) => Ok(Self::Status),
            ("rgb", [r, g, b]) => Ok(Self::Slide(vec![
                (Channel::Red, parse_value(r)?),
                (Channel::Green, parse_value(g)?),
                (Channel::Blue, parse_value(b)?),
            ])),
            (name, [value]) => {
                let channel = name.parse::<Channel>()?;
                Ok(Self::Slide(vec![(channel, parse_value(value)?)]))
            }
            _ => Err(PanelError::InvalidCommand(format!(
                "unrecognised input {:?}",
                line.trim()
            ))),
        }
    }
}

/// Parses a slider position; the 0–255 range is the control's own range.
fn parse_value(raw: &str) -> Result<u8, PanelError> {
    raw.parse::<u8>().map_err(|_| {
        PanelError::InvalidCommand(format!("slider value {raw:?} is not in 0-255"))
    })
}
