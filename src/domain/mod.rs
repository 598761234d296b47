//! Domain layer: channels, colors, and the frames exchanged with the device.

pub mod channel;
pub mod color;
pub mod message;

pub use channel::{Channel, ChannelSpec, Channels};
pub use color::Rgb;
pub use message::{OutboundMessage, Reading};
