//! End-to-end tests against a fake device speaking real WebSocket.

#![allow(clippy::panic)]

use std::sync::Arc;
use std::time::Duration;

use futures_util::{SinkExt, StreamExt};
use tokio::net::{TcpListener, TcpStream};
use tokio::time::timeout;
use tokio_tungstenite::WebSocketStream;
use tokio_tungstenite::tungstenite::Message;

use esp_rgb_panel::connection::{ConnectionManager, ConnectionState, Endpoint, WsConnector};
use esp_rgb_panel::domain::{Channel, Rgb};
use esp_rgb_panel::panel::{ControlPanel, PanelView};

const WAIT: Duration = Duration::from_secs(5);

async fn bind_device() -> (TcpListener, Endpoint) {
    let Ok(listener) = TcpListener::bind("127.0.0.1:0").await else {
        panic!("bind failed");
    };
    let Ok(addr) = listener.local_addr() else {
        panic!("no local addr");
    };
    let Ok(endpoint) = Endpoint::from_host(&addr.to_string()) else {
        panic!("endpoint");
    };
    (listener, endpoint)
}

async fn accept(listener: &TcpListener) -> WebSocketStream<TcpStream> {
    let Ok(Ok((stream, _))) = timeout(WAIT, listener.accept()).await else {
        panic!("panel never dialled");
    };
    let Ok(ws) = tokio_tungstenite::accept_async(stream).await else {
        panic!("handshake failed");
    };
    ws
}

async fn next_text(ws: &mut WebSocketStream<TcpStream>) -> String {
    loop {
        match timeout(WAIT, ws.next()).await {
            Ok(Some(Ok(Message::Text(text)))) => return text.as_str().to_owned(),
            Ok(Some(Ok(_))) => {}
            other => panic!("expected text frame, got {other:?}"),
        }
    }
}

fn manager(endpoint: Endpoint, delay: Duration, view: &PanelView) -> ConnectionManager {
    ConnectionManager::new(endpoint, delay, Arc::new(WsConnector), view.clone())
}

#[tokio::test]
async fn reading_is_rendered_and_rgb_reaches_device() {
    let (listener, endpoint) = bind_device().await;
    let view = PanelView::new();
    let connection = manager(endpoint, Duration::from_millis(50), &view);
    let runner = connection.clone();
    tokio::spawn(async move { runner.run().await });

    let mut device = accept(&listener).await;
    let mut states = connection.subscribe_state();
    if timeout(WAIT, states.wait_for(|s| s.is_open())).await.is_err() {
        panic!("connection never opened");
    }

    if device.send(Message::text("42cm")).await.is_err() {
        panic!("device send failed");
    }
    let mut readings = view.subscribe_reading();
    if timeout(WAIT, readings.wait_for(|r| r.text == "42cm"))
        .await
        .is_err()
    {
        panic!("reading never rendered");
    }
    assert_eq!(view.reading().text, "42cm");

    let mut panel = ControlPanel::new(Rgb::default(), view.clone(), connection.clone());
    panel.set_slider(Channel::Red, 10);
    panel.set_slider(Channel::Green, 20);
    panel.set_slider(Channel::Blue, 30);
    assert!(panel.tick().await);
    assert_eq!(next_text(&mut device).await, "RGB:10,20,30");

    assert!(panel.toggle().await);
    assert_eq!(next_text(&mut device).await, "toggle");
}

#[tokio::test]
async fn non_text_frames_are_ignored() {
    let (listener, endpoint) = bind_device().await;
    let view = PanelView::new();
    let connection = manager(endpoint, Duration::from_millis(50), &view);
    let runner = connection.clone();
    tokio::spawn(async move { runner.run().await });

    let mut device = accept(&listener).await;
    let mut states = connection.subscribe_state();
    if timeout(WAIT, states.wait_for(|s| s.is_open())).await.is_err() {
        panic!("connection never opened");
    }

    for frame in [
        Message::binary(vec![0x34, 0x32]),
        Message::Ping(vec![1, 2, 3].into()),
        Message::text("42cm"),
    ] {
        if device.send(frame).await.is_err() {
            panic!("device send failed");
        }
    }

    let mut readings = view.subscribe_reading();
    if timeout(WAIT, readings.wait_for(|r| !r.text.is_empty()))
        .await
        .is_err()
    {
        panic!("reading never rendered");
    }
    assert_eq!(view.reading().text, "42cm");
    assert_eq!(connection.state(), ConnectionState::Open);
    assert_eq!(connection.attempts(), 1);
}

#[tokio::test]
async fn reconnects_after_device_closes() {
    let (listener, endpoint) = bind_device().await;
    let view = PanelView::new();
    let delay = Duration::from_millis(200);
    let connection = manager(endpoint, delay, &view);
    let runner = connection.clone();
    tokio::spawn(async move { runner.run().await });

    let mut states = connection.subscribe_state();
    let mut closed_at = None;
    for round in 1..=3 {
        let mut device = accept(&listener).await;
        if let Some(closed_at) = closed_at {
            assert!(
                tokio::time::Instant::now() - closed_at >= delay,
                "round {round}: reconnected early"
            );
        }
        if timeout(WAIT, states.wait_for(|s| s.is_open())).await.is_err() {
            panic!("round {round}: never opened");
        }

        closed_at = Some(tokio::time::Instant::now());
        if device.close(None).await.is_err() {
            panic!("round {round}: close failed");
        }
        if timeout(WAIT, states.wait_for(|s| *s == ConnectionState::Closed))
            .await
            .is_err()
        {
            panic!("round {round}: close not observed");
        }

        let mut panel = ControlPanel::new(Rgb::new(1, 1, 1), view.clone(), connection.clone());
        assert!(!panel.tick().await, "round {round}: sent while closed");
    }
    assert!(connection.attempts() >= 3);
}
