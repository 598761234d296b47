//! esp-rgb-panel entry point.
//!
//! Connects to the device, reads panel commands from stdin, and prints
//! readings and status snapshots to stdout. Logs go to stderr.

use std::sync::Arc;

use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::{mpsc, watch};
use tracing_subscriber::EnvFilter;

use esp_rgb_panel::config::{LogFormat, PanelConfig};
use esp_rgb_panel::connection::{ConnectionManager, WsConnector};
use esp_rgb_panel::domain::{Reading, Rgb};
use esp_rgb_panel::panel::{ControlPanel, PanelCommand, PanelSnapshot, PanelView};

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    // Load configuration
    let config = PanelConfig::from_env()?;

    // Initialize tracing
    init_tracing(config.log_format);
    tracing::info!(endpoint = %config.endpoint, "starting esp-rgb-panel");

    // Build connection and panel
    let view = PanelView::new();
    let connection = ConnectionManager::new(
        config.endpoint.clone(),
        config.reconnect_delay,
        Arc::new(WsConnector),
        view.clone(),
    );
    let panel = ControlPanel::new(config.initial, view.clone(), connection.clone());

    let (commands_tx, commands) = mpsc::channel(32);
    let (snapshots_tx, snapshots) = mpsc::unbounded_channel();

    tokio::spawn(async move { connection.run().await });
    tokio::spawn(read_commands(commands_tx));
    tokio::spawn(render(
        view.subscribe_reading(),
        view.subscribe_preview(),
        snapshots,
    ));

    tokio::select! {
        () = panel.run(config.tick_interval, commands, snapshots_tx) => {}
        result = tokio::signal::ctrl_c() => {
            result?;
            tracing::info!("shutting down");
        }
    }

    Ok(())
}

fn init_tracing(format: LogFormat) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);
    match format {
        LogFormat::Text => builder.init(),
        LogFormat::Json => builder.json().init(),
    }
}

/// Forwards parsed stdin lines to the panel until stdin closes.
async fn read_commands(commands: mpsc::Sender<PanelCommand>) {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        let line = match lines.next_line().await {
            Ok(Some(line)) => line,
            Ok(None) => break,
            Err(err) => {
                tracing::warn!(error = %err, "failed to read input");
                break;
            }
        };
        if line.trim().is_empty() {
            continue;
        }
        match line.parse::<PanelCommand>() {
            Ok(command) => {
                if commands.send(command).await.is_err() {
                    break;
                }
            }
            Err(err) => tracing::warn!(error = %err, "ignoring input"),
        }
    }
    tracing::debug!("stdin closed");
}

/// Prints readings, preview changes and status snapshots to stdout.
async fn render(
    mut readings: watch::Receiver<Reading>,
    mut preview: watch::Receiver<Rgb>,
    mut snapshots: mpsc::UnboundedReceiver<PanelSnapshot>,
) {
    loop {
        tokio::select! {
            changed = readings.changed() => {
                if changed.is_err() {
                    break;
                }
                println!("reading: {}", readings.borrow_and_update().text);
            }
            changed = preview.changed() => {
                if changed.is_err() {
                    break;
                }
                println!("preview: {}", *preview.borrow_and_update());
            }
            snapshot = snapshots.recv() => {
                let Some(snapshot) = snapshot else {
                    break;
                };
                match serde_json::to_string_pretty(&snapshot) {
                    Ok(json) => println!("{json}"),
                    Err(err) => tracing::warn!(error = %err, "failed to render status"),
                }
            }
        }
    }
}
