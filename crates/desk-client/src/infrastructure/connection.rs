//! WebSocket connection to the desk backend.
//!
//! One Tokio task owns the socket for the whole session:
//!
//! 1. Dials the endpoint with `tokio_tungstenite::connect_async`.
//! 2. Reports `Inbound::Opened` to the event loop.
//! 3. Forwards every text frame as `Inbound::Text`.
//! 4. Encodes every queued [`Command`] and writes it as a text frame.
//! 5. Reports `Inbound::Closed` exactly once when anything goes wrong or
//!    the backend hangs up.
//!
//! There is no retry: a refused or dropped connection stays closed.

use anyhow::Context;
use futures_util::{SinkExt, StreamExt};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio_tungstenite::{connect_async, tungstenite::Message as WsMessage};
use tracing::{debug, error, info, warn};

use desk_core::{encode_command, Command};

use crate::application::controller::{CommandSink, SinkError};
use crate::application::event_loop::Inbound;

/// [`CommandSink`] that queues commands for the connection task.
///
/// The channel is unbounded so `send` never blocks the event loop; the
/// press-and-hold rate (one frame per 100 ms) keeps it short in practice.
#[derive(Debug, Clone)]
pub struct CommandSender {
    tx: mpsc::UnboundedSender<Command>,
}

impl CommandSink for CommandSender {
    fn send(&self, cmd: Command) -> Result<(), SinkError> {
        self.tx.send(cmd).map_err(|_| SinkError::Closed)
    }
}

/// Spawns the connection task.
///
/// Returns the sender for outbound commands and the task handle.  The task
/// ends after it has sent `Inbound::Closed`, or once both the backend and
/// the command sender are gone.
pub fn spawn_connection(
    endpoint: String,
    inbound_tx: mpsc::Sender<Inbound>,
) -> (CommandSender, JoinHandle<()>) {
    let (tx, rx) = mpsc::unbounded_channel();

    let handle = tokio::spawn(async move {
        let reason = match run_connection(&endpoint, &inbound_tx, rx).await {
            Ok(()) => "closed by backend".to_string(),
            Err(e) => format!("{e:#}"),
        };
        // The loop may already be gone during shutdown.
        let _ = inbound_tx.send(Inbound::Closed { reason }).await;
    });

    (CommandSender { tx }, handle)
}

async fn run_connection(
    endpoint: &str,
    inbound_tx: &mpsc::Sender<Inbound>,
    mut outbound_rx: mpsc::UnboundedReceiver<Command>,
) -> anyhow::Result<()> {
    let (ws_stream, _response) = connect_async(endpoint)
        .await
        .with_context(|| format!("failed to connect to desk backend at {endpoint}"))?;

    info!("connected to desk backend at {endpoint}");
    if inbound_tx.send(Inbound::Opened).await.is_err() {
        return Ok(());
    }

    let (mut ws_tx, mut ws_rx) = ws_stream.split();

    loop {
        tokio::select! {
            frame = ws_rx.next() => match frame {
                Some(Ok(WsMessage::Text(text))) => {
                    if inbound_tx.send(Inbound::Text(text)).await.is_err() {
                        debug!("event loop gone; closing connection");
                        break;
                    }
                }
                Some(Ok(WsMessage::Binary(data))) => {
                    // The desk protocol is JSON-only.
                    warn!("unexpected binary frame ({} bytes) ignored", data.len());
                }
                Some(Ok(WsMessage::Ping(_) | WsMessage::Pong(_))) => {
                    // tungstenite queues the pong reply itself.
                    debug!("WebSocket ping/pong");
                }
                Some(Ok(WsMessage::Close(frame))) => {
                    debug!("backend sent Close: {frame:?}");
                    return Ok(());
                }
                Some(Ok(WsMessage::Frame(_))) => {
                    debug!("raw frame ignored");
                }
                Some(Err(e)) => {
                    return Err(e).context("WebSocket read failed");
                }
                None => return Ok(()),
            },
            cmd = outbound_rx.recv() => match cmd {
                Some(cmd) => {
                    let text = match encode_command(&cmd) {
                        Ok(text) => text,
                        Err(e) => {
                            error!("dropping {}: {e}", cmd.name());
                            continue;
                        }
                    };
                    ws_tx
                        .send(WsMessage::Text(text))
                        .await
                        .with_context(|| format!("failed to send {}", cmd.name()))?;
                }
                None => {
                    debug!("command sender dropped; closing connection");
                    break;
                }
            },
        }
    }

    // Best effort: the backend may already be gone.
    let _ = ws_tx.send(WsMessage::Close(None)).await;
    Ok(())
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_command_sender_queues_commands() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let sender = CommandSender { tx };

        sender.send(Command::MoveUp).unwrap();

        assert_eq!(rx.recv().await, Some(Command::MoveUp));
    }

    #[tokio::test]
    async fn test_command_sender_reports_closed_writer() {
        let (tx, rx) = mpsc::unbounded_channel();
        let sender = CommandSender { tx };
        drop(rx);

        assert_eq!(sender.send(Command::Sit), Err(SinkError::Closed));
    }

    #[tokio::test]
    async fn test_refused_connection_reports_closed() {
        // Arrange: bind and immediately drop a listener to get a free port
        // nobody is listening on.
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);
        let (inbound_tx, mut inbound_rx) = mpsc::channel(4);

        // Act
        let (_sender, handle) = spawn_connection(format!("ws://{addr}/websocket"), inbound_tx);
        handle.await.unwrap();

        // Assert: never opened, closed exactly once
        match inbound_rx.recv().await {
            Some(Inbound::Closed { reason }) => {
                assert!(reason.contains("failed to connect"), "reason: {reason}")
            }
            other => panic!("expected Closed, got {other:?}"),
        }
        assert_eq!(inbound_rx.recv().await, None);
    }
}
