//! Connection manager: owns the single device link and its retry loop.
//!
//! [`ConnectionManager`] is the only component that touches the transport.
//! The rest of the panel sees two operations: [`ConnectionManager::send`]
//! and the readings it writes into the [`PanelView`].

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use tokio::sync::{RwLock, mpsc, watch};

use super::transport::{Connector, Link};
use super::{ConnectionState, Endpoint};
use crate::error::PanelError;
use crate::panel::PanelView;

/// An open link, returned by a successful [`ConnectionManager::connect`].
///
/// Pass it to [`ConnectionManager::serve`] to dispatch inbound frames until
/// the link closes. Dropping a session runs the close handling, so the
/// manager is back to `Closed` whether or not it was served.
#[derive(Debug)]
pub struct Session {
    manager: ConnectionManager,
    inbound: mpsc::UnboundedReceiver<String>,
}

impl Drop for Session {
    fn drop(&mut self) {
        self.manager.on_close();
    }
}

#[derive(Debug)]
struct Inner {
    endpoint: Endpoint,
    reconnect_delay: Duration,
    connector: Arc<dyn Connector>,
    view: PanelView,
    state: watch::Sender<ConnectionState>,
    handle: RwLock<Option<mpsc::UnboundedSender<String>>>,
    attempts: AtomicU64,
}

/// Owner of the device connection.
///
/// Cloning yields another handle to the same connection.
///
/// # Lifecycle
///
/// [`run`](Self::run) loops forever: connect, serve until close, wait the
/// reconnect delay, repeat. Every failure takes the same path; there is no
/// retry cap and no backoff.
#[derive(Debug, Clone)]
pub struct ConnectionManager {
    inner: Arc<Inner>,
}

impl ConnectionManager {
    /// Creates a manager in the `Closed` state. Nothing is dialled until
    /// [`connect`](Self::connect) or [`run`](Self::run) is called.
    #[must_use]
    pub fn new(
        endpoint: Endpoint,
        reconnect_delay: Duration,
        connector: Arc<dyn Connector>,
        view: PanelView,
    ) -> Self {
        let (state, _) = watch::channel(ConnectionState::Closed);
        Self {
            inner: Arc::new(Inner {
                endpoint,
                reconnect_delay,
                connector,
                view,
                state,
                handle: RwLock::new(None),
                attempts: AtomicU64::new(0),
            }),
        }
    }

    /// Endpoint this manager dials.
    #[must_use]
    pub fn endpoint(&self) -> &Endpoint {
        &self.inner.endpoint
    }

    /// Current connection state.
    #[must_use]
    pub fn state(&self) -> ConnectionState {
        *self.inner.state.borrow()
    }

    /// Subscribes to state transitions.
    #[must_use]
    pub fn subscribe_state(&self) -> watch::Receiver<ConnectionState> {
        self.inner.state.subscribe()
    }

    /// Number of connection attempts started so far.
    #[must_use]
    pub fn attempts(&self) -> u64 {
        self.inner.attempts.load(Ordering::Relaxed)
    }

    /// Opens a connection to the endpoint.
    ///
    /// A no-op returning `Ok(None)` unless the state is `Closed`, so an
    /// attempt can never overlap a live or pending one.
    ///
    /// # Errors
    ///
    /// Returns the connector's error if the attempt fails; the state is
    /// back to `Closed` in that case.
    pub async fn connect(&self) -> Result<Option<Session>, PanelError> {
        let started = self.inner.state.send_if_modified(|state| {
            if *state == ConnectionState::Closed {
                *state = ConnectionState::Connecting;
                true
            } else {
                false
            }
        });
        if !started {
            tracing::debug!(state = %self.state(), "connect ignored while connection is active");
            return Ok(None);
        }

        let attempt = self.inner.attempts.fetch_add(1, Ordering::Relaxed) + 1;
        tracing::info!(endpoint = %self.inner.endpoint, attempt, "trying to open a websocket connection");

        match self.inner.connector.connect(&self.inner.endpoint).await {
            Ok(link) => Ok(Some(self.on_open(link).await)),
            Err(err) => {
                self.inner.state.send_replace(ConnectionState::Closed);
                Err(err)
            }
        }
    }

    /// Dispatches inbound frames of `session` until the link closes, then
    /// runs the close handling.
    pub async fn serve(&self, mut session: Session) {
        while let Some(text) = session.inbound.recv().await {
            self.on_message(text);
        }
    }

    /// Runs the connect/retry loop for the lifetime of the process.
    pub async fn run(&self) {
        loop {
            match self.connect().await {
                Ok(Some(session)) => self.serve(session).await,
                Ok(None) => {}
                Err(err) => {
                    tracing::warn!(error = %err, "connection attempt failed");
                }
            }
            tracing::debug!(
                delay_ms = u64::try_from(self.inner.reconnect_delay.as_millis()).unwrap_or(u64::MAX),
                "scheduling reconnect"
            );
            tokio::time::sleep(self.inner.reconnect_delay).await;
        }
    }

    /// Writes an inbound payload into the reading display, untouched.
    pub fn on_message(&self, text: String) {
        tracing::debug!(payload = %text, "reading received");
        self.inner.view.show_reading(text);
    }

    /// Sends `text` if the connection is open.
    ///
    /// Returns `true` if the frame was handed to the transport. When the
    /// connection is not open the frame is dropped, never queued.
    pub async fn send(&self, text: impl Into<String>) -> bool {
        let text = text.into();
        let handle = self.inner.handle.read().await;
        match handle.as_ref() {
            Some(tx) if self.state().is_open() => {
                if tx.send(text).is_ok() {
                    true
                } else {
                    tracing::debug!("transport gone; message not sent");
                    false
                }
            }
            _ => {
                tracing::debug!(message = %text, "websocket not connected; message not sent");
                false
            }
        }
    }

    async fn on_open(&self, link: Link) -> Session {
        *self.inner.handle.write().await = Some(link.outbound);
        self.inner.state.send_replace(ConnectionState::Open);
        tracing::info!(endpoint = %self.inner.endpoint, "connection opened");
        Session {
            manager: self.clone(),
            inbound: link.inbound,
        }
    }

    fn on_close(&self) {
        // State first: `send` refuses to use a handle unless the state is open.
        self.inner.state.send_replace(ConnectionState::Closed);
        match self.inner.handle.try_write() {
            Ok(mut handle) => {
                handle.take();
            }
            Err(_) => {
                tracing::debug!("handle busy at close; it is replaced on the next open");
            }
        }
        tracing::info!(endpoint = %self.inner.endpoint, "connection closed");
    }
}
