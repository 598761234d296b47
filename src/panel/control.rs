//! Control panel: three channels, the preview, and the periodic sync tick.
//!
//! Slider values reach the readouts by two paths: an input event copies
//! its value immediately, and every tick re-copies all three before
//! anything is transmitted. The tick is what decides what the device sees.

use std::time::Duration;

use serde::Serialize;
use tokio::sync::mpsc;
use tokio::time::{Instant, MissedTickBehavior};

use super::{PanelCommand, PanelView};
use crate::connection::{ConnectionManager, ConnectionState};
use crate::domain::{Channel, ChannelSpec, Channels, OutboundMessage, Reading, Rgb};

/// Serializable view of the whole panel, printed by the `status` command.
#[derive(Debug, Clone, Serialize)]
pub struct PanelSnapshot {
    /// Connection state at the time of the snapshot.
    pub connection: ConnectionState,
    /// Endpoint URL being dialled.
    pub endpoint: String,
    /// Latest device reading.
    pub reading: Reading,
    /// CSS color on the preview surface.
    pub preview: String,
    /// Slider/readout pairs.
    pub channels: Channels,
}

/// Owner of the three channel pairs.
#[derive(Debug)]
pub struct ControlPanel {
    channels: Channels,
    view: PanelView,
    connection: ConnectionManager,
}

impl ControlPanel {
    /// Creates the panel with sliders at `initial`.
    #[must_use]
    pub fn new(initial: Rgb, view: PanelView, connection: ConnectionManager) -> Self {
        Self {
            channels: Channels::new(initial),
            view,
            connection,
        }
    }

    /// Current slider/readout pairs.
    #[must_use]
    pub fn channels(&self) -> &Channels {
        &self.channels
    }

    /// Pair for a single channel.
    #[must_use]
    pub fn channel(&self, channel: Channel) -> &ChannelSpec {
        self.channels.get(channel)
    }

    /// Handles an input event on `channel`: moves the slider and shows the
    /// new value in the readout straight away.
    pub fn on_input(&mut self, channel: Channel, value: u8) {
        let spec = self.channels.get_mut(channel);
        spec.slider = value;
        spec.sync();
        tracing::debug!(%channel, value, "slider input");
    }

    /// Moves a slider without an input event. The readout catches up on
    /// the next tick.
    pub fn set_slider(&mut self, channel: Channel, value: u8) {
        self.channels.get_mut(channel).slider = value;
    }

    /// One sync/transmit step.
    ///
    /// Re-copies every slider into its readout, applies the preview color,
    /// then sends `RGB:{r},{g},{b}`. A message that cannot be sent is
    /// dropped; the next tick sends whatever is current then.
    ///
    /// Returns `true` if the message reached the transport.
    pub async fn tick(&mut self) -> bool {
        self.channels.sync_all();

        let color = self.channels.sliders();
        self.view.show_preview(color);

        let message = OutboundMessage::Rgb(color).to_string();
        let sent = self.connection.send(message.as_str()).await;
        if sent {
            tracing::debug!(%message, "sent to device");
        }
        sent
    }

    /// Sends the `toggle` action.
    ///
    /// Returns `true` if the message reached the transport.
    pub async fn toggle(&self) -> bool {
        let sent = self
            .connection
            .send(OutboundMessage::Toggle.to_string())
            .await;
        if !sent {
            tracing::warn!("toggle dropped; device not connected");
        }
        sent
    }

    /// Captures the current panel state.
    #[must_use]
    pub fn snapshot(&self) -> PanelSnapshot {
        PanelSnapshot {
            connection: self.connection.state(),
            endpoint: self.connection.endpoint().url().to_string(),
            reading: self.view.reading(),
            preview: self.view.preview().to_string(),
            channels: self.channels,
        }
    }

    /// Applies one user command.
    ///
    /// Returns a snapshot for [`PanelCommand::Status`].
    pub async fn handle(&mut self, command: PanelCommand) -> Option<PanelSnapshot> {
        match command {
            PanelCommand::Slide(moves) => {
                for (channel, value) in moves {
                    self.on_input(channel, value);
                }
                None
            }
            PanelCommand::Toggle => {
                self.toggle().await;
                None
            }
            PanelCommand::Status => Some(self.snapshot()),
        }
    }

    /// Runs the panel: one immediate tick, then a tick every `period` while
    /// applying commands as they arrive.
    ///
    /// Snapshots requested by `status` are pushed to `snapshots`. The tick
    /// keeps running after `commands` is closed; this future only ends
    /// when it is dropped.
    pub async fn run(
        mut self,
        period: Duration,
        mut commands: mpsc::Receiver<PanelCommand>,
        snapshots: mpsc::UnboundedSender<PanelSnapshot>,
    ) {
        self.tick().await;

        let mut ticker = tokio::time::interval_at(Instant::now() + period, period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        let mut commands_open = true;

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    self.tick().await;
                }
                command = commands.recv(), if commands_open => {
                    match command {
                        Some(command) => {
                            if let Some(snapshot) = self.handle(command).await
                                && snapshots.send(snapshot).is_err()
                            {
                                tracing::debug!("status renderer gone; snapshot dropped");
                            }
                        }
                        None => {
                            tracing::debug!("input closed; panel keeps ticking");
                            commands_open = false;
                        }
                    }
                }
            }
        }
    }
}
