//! Panel layer: channel controls, display surfaces, and user input.

pub mod control;
pub mod input;
pub mod view;

pub use control::{ControlPanel, PanelSnapshot};
pub use input::PanelCommand;
pub use view::PanelView;
