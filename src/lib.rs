//! # esp-rgb-panel
//!
//! WebSocket control panel for an ESP32 RGB light.
//!
//! The panel keeps one connection to `ws://<device>/ws`, shows whatever
//! text reading the device pushes, and streams the three RGB slider values
//! back every tick as `RGB:{r},{g},{b}`.
//!
//! ## Architecture
//!
//! ```text
//! stdin (PanelCommand)
//!     │
//!     ├── ControlPanel (panel/) ── tick every 100ms
//!     │       │
//!     │       └── PanelView ◄── readings
//!     │                          │
//!     └── ConnectionManager (connection/) ── reconnect after 2000ms
//!             │
//!             └── WsConnector (tokio-tungstenite)
//! ```

pub mod config;
pub mod connection;
pub mod domain;
pub mod error;
pub mod panel;
