//! Display surfaces of the panel: the reading text and the color preview.
//!
//! [`PanelView`] is cheap to clone and shared between the connection
//! manager (which writes readings) and the control panel (which writes the
//! preview). Renderers subscribe through `tokio::sync::watch`.

use std::sync::Arc;

use tokio::sync::watch;

use crate::domain::{Reading, Rgb};

#[derive(Debug)]
struct Surfaces {
    reading: watch::Sender<Reading>,
    preview: watch::Sender<Rgb>,
}

/// Shared handle to the panel's display surfaces.
#[derive(Debug, Clone)]
pub struct PanelView {
    surfaces: Arc<Surfaces>,
}

impl PanelView {
    /// Creates a view with an empty reading and a black preview.
    #[must_use]
    pub fn new() -> Self {
        let (reading, _) = watch::channel(Reading::default());
        let (preview, _) = watch::channel(Rgb::default());
        Self {
            surfaces: Arc::new(Surfaces { reading, preview }),
        }
    }

    /// Replaces the reading display content with `text`, untouched.
    pub fn show_reading(&self, text: String) {
        self.surfaces.reading.send_replace(Reading::now(text));
    }

    /// Applies `color` to the preview surface. Subscribers are only woken
    /// when the color actually changes.
    pub fn show_preview(&self, color: Rgb) {
        self.surfaces.preview.send_if_modified(|current| {
            if *current == color {
                false
            } else {
                *current = color;
                true
            }
        });
    }

    /// Latest reading.
    #[must_use]
    pub fn reading(&self) -> Reading {
        self.surfaces.reading.borrow().clone()
    }

    /// Color currently on the preview surface.
    #[must_use]
    pub fn preview(&self) -> Rgb {
        *self.surfaces.preview.borrow()
    }

    /// Subscribes to reading updates.
    #[must_use]
    pub fn subscribe_reading(&self) -> watch::Receiver<Reading> {
        self.surfaces.reading.subscribe()
    }

    /// Subscribes to preview updates.
    #[must_use]
    pub fn subscribe_preview(&self) -> watch::Receiver<Rgb> {
        self.surfaces.preview.subscribe()
    }
}

impl Default for PanelView {
    fn default() -> Self {
        Self::new()
    }
}
