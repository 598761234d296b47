//! Color channels and their slider/readout pairs.

use std::fmt;
use std::str::FromStr;

use serde::Serialize;

use super::Rgb;
use crate::error::PanelError;

/// One of the three color components driven by the panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Channel {
    /// Red component.
    Red,
    /// Green component.
    Green,
    /// Blue component.
    Blue,
}

impl Channel {
    /// All channels in transmission order.
    pub const ALL: [Self; 3] = [Self::Red, Self::Green, Self::Blue];

    /// Display label shown next to the slider.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Red => "Red",
            Self::Green => "Green",
            Self::Blue => "Blue",
        }
    }
}

impl fmt::Display for Channel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Channel {
    type Err = PanelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "r" | "red" => Ok(Self::Red),
            "g" | "green" => Ok(Self::Green),
            "b" | "blue" => Ok(Self::Blue),
            _ => Err(PanelError::InvalidCommand(format!("unknown channel {s:?}"))),
        }
    }
}

/// A channel's input control paired with its numeric readout.
///
/// The slider is what the user manipulates; the readout is what is shown
/// beside it. They only diverge between a programmatic slider change and
/// the next sync.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ChannelSpec {
    /// Which component this pair controls.
    pub channel: Channel,
    /// Current slider position.
    pub slider: u8,
    /// Value currently shown in the readout.
    pub readout: u8,
}

impl ChannelSpec {
    /// Creates a pair with slider and readout both at `value`.
    #[must_use]
    pub const fn new(channel: Channel, value: u8) -> Self {
        Self {
            channel,
            slider: value,
            readout: value,
        }
    }

    /// Copies the slider value into the readout.
    pub fn sync(&mut self) {
        self.readout = self.slider;
    }

    /// Returns `true` if the readout shows the slider's value.
    #[must_use]
    pub const fn is_synced(&self) -> bool {
        self.slider == self.readout
    }
}

/// The fixed red, green and blue set of channel pairs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Channels {
    /// Red pair.
    pub red: ChannelSpec,
    /// Green pair.
    pub green: ChannelSpec,
    /// Blue pair.
    pub blue: ChannelSpec,
}

impl Channels {
    /// Creates the three pairs at the given default positions.
    #[must_use]
    pub const fn new(initial: Rgb) -> Self {
        Self {
            red: ChannelSpec::new(Channel::Red, initial.red),
            green: ChannelSpec::new(Channel::Green, initial.green),
            blue: ChannelSpec::new(Channel::Blue, initial.blue),
        }
    }

    /// Returns the pair for `channel`.
    #[must_use]
    pub const fn get(&self, channel: Channel) -> &ChannelSpec {
        match channel {
            Channel::Red => &self.red,
            Channel::Green => &self.green,
            Channel::Blue => &self.blue,
        }
    }

    /// Returns the pair for `channel` mutably.
    pub fn get_mut(&mut self, channel: Channel) -> &mut ChannelSpec {
        match channel {
            Channel::Red => &mut self.red,
            Channel::Green => &mut self.green,
            Channel::Blue => &mut self.blue,
        }
    }

    /// Iterates over the pairs in transmission order.
    pub fn iter(&self) -> impl Iterator<Item = &ChannelSpec> {
        [&self.red, &self.green, &self.blue].into_iter()
    }

    /// Copies every slider into its readout.
    pub fn sync_all(&mut self) {
        for channel in Channel::ALL {
            self.get_mut(channel).sync();
        }
    }

    /// Current slider positions as a color triple.
    #[must_use]
    pub const fn sliders(&self) -> Rgb {
        Rgb::new(self.red.slider, self.green.slider, self.blue.slider)
    }
}
