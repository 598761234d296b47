//! Scripted in-memory connector for unit tests.

use std::collections::VecDeque;
use std::sync::Arc;

use futures_util::future::BoxFuture;
use tokio::sync::{Mutex, mpsc};
use tokio::time::Instant;

use super::transport::{Connector, Link};
use super::Endpoint;
use crate::error::PanelError;

/// What the next connection attempt does.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Outcome {
    Accept,
    Refuse,
}

/// Device end of an accepted mock link.
///
/// Dropping it closes the link from the device side.
#[derive(Debug)]
pub(crate) struct DeviceEnd {
    /// Frames the panel sent.
    pub received: mpsc::UnboundedReceiver<String>,
    /// Frames to deliver to the panel.
    pub push: mpsc::UnboundedSender<String>,
}

/// Connector that follows a script, then accepts every later attempt.
#[derive(Debug)]
pub(crate) struct MockConnector {
    script: Mutex<VecDeque<Outcome>>,
    attempts: Mutex<Vec<Instant>>,
    devices: mpsc::UnboundedSender<DeviceEnd>,
}

impl MockConnector {
    pub(crate) fn new(script: Vec<Outcome>) -> (Arc<Self>, mpsc::UnboundedReceiver<DeviceEnd>) {
        let (devices, devices_rx) = mpsc::unbounded_channel();
        let connector = Self {
            script: Mutex::new(script.into()),
            attempts: Mutex::new(Vec::new()),
            devices,
        };
        (Arc::new(connector), devices_rx)
    }

    /// Instants at which each attempt started.
    pub(crate) async fn attempts(&self) -> Vec<Instant> {
        self.attempts.lock().await.clone()
    }
}

impl Connector for MockConnector {
    fn connect<'a>(&'a self, endpoint: &'a Endpoint) -> BoxFuture<'a, Result<Link, PanelError>> {
        Box::pin(async move {
            self.attempts.lock().await.push(Instant::now());
            let outcome = self
                .script
                .lock()
                .await
                .pop_front()
                .unwrap_or(Outcome::Accept);

            if outcome == Outcome::Refuse {
                return Err(PanelError::Connect {
                    endpoint: endpoint.url().to_string(),
                    reason: "connection refused".to_string(),
                });
            }

            let (outbound, received) = mpsc::unbounded_channel();
            let (push, inbound) = mpsc::unbounded_channel();
            let _ = self.devices.send(DeviceEnd { received, push });
            Ok(Link { outbound, inbound })
        })
    }
}
