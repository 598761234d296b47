//! Transport seam between the connection manager and the socket.
//!
//! A [`Connector`] dials an [`Endpoint`] and hands back a [`Link`]: a pair
//! of text-frame channels. The inbound side ends when the socket closes,
//! for any reason.

use std::fmt;

use futures_util::future::BoxFuture;
use futures_util::{SinkExt, StreamExt};
use tokio::net::TcpStream;
use tokio::sync::mpsc;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream};

use super::Endpoint;
use crate::error::PanelError;

/// An established connection, seen as two text channels.
#[derive(Debug)]
pub struct Link {
    /// Frames to write to the device.
    pub outbound: mpsc::UnboundedSender<String>,
    /// Frames read from the device. Yields `None` once the socket is gone.
    pub inbound: mpsc::UnboundedReceiver<String>,
}

/// Opens links to the device.
pub trait Connector: Send + Sync + fmt::Debug {
    /// Dials `endpoint`.
    ///
    /// # Errors
    ///
    /// Returns a [`PanelError`] if the connection cannot be established.
    fn connect<'a>(&'a self, endpoint: &'a Endpoint) -> BoxFuture<'a, Result<Link, PanelError>>;
}

/// Production connector backed by `tokio-tungstenite`.
#[derive(Debug, Clone, Copy, Default)]
pub struct WsConnector;

impl Connector for WsConnector {
    fn connect<'a>(&'a self, endpoint: &'a Endpoint) -> BoxFuture<'a, Result<Link, PanelError>> {
        Box::pin(async move {
            let (socket, _response) = tokio_tungstenite::connect_async(endpoint.url()).await?;
            let (outbound, outbound_rx) = mpsc::unbounded_channel();
            let (inbound_tx, inbound) = mpsc::unbounded_channel();
            tokio::spawn(run_pump(socket, outbound_rx, inbound_tx));
            Ok(Link { outbound, inbound })
        })
    }
}

/// Bridges a WebSocket to a [`Link`] until either side goes away.
///
/// Text frames are forwarded verbatim; binary, ping and pong frames are
/// ignored.
async fn run_pump(
    socket: WebSocketStream<MaybeTlsStream<TcpStream>>,
    mut outbound: mpsc::UnboundedReceiver<String>,
    inbound: mpsc::UnboundedSender<String>,
) {
    let (mut ws_tx, mut ws_rx) = socket.split();

    loop {
        tokio::select! {
            // Frame from the device
            frame = ws_rx.next() => {
                match frame {
                    Some(Ok(Message::Text(text))) => {
                        if inbound.send(text.as_str().to_owned()).is_err() {
                            break;
                        }
                    }
                    Some(Ok(Message::Close(_))) | None => break,
                    Some(Err(err)) => {
                        tracing::warn!(error = %err, "websocket read failed");
                        break;
                    }
                    _ => {}
                }
            }
            // Frame from the panel
            text = outbound.recv() => {
                let Some(text) = text else {
                    break;
                };
                if let Err(err) = ws_tx.send(Message::text(text)).await {
                    tracing::warn!(error = %err, "websocket write failed");
                    break;
                }
            }
        }
    }

    if let Err(err) = ws_tx.close().await {
        tracing::debug!(error = %err, "websocket close failed");
    }
    tracing::debug!("websocket pump stopped");
}
