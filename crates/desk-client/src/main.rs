//! Desk remote control: entry point.
//!
//! Connects to the desk backend over WebSocket, mirrors the desk's height
//! and presets on stdout, and turns typed commands into desk commands.
//!
//! # Usage
//!
//! ```text
//! desk-remote [OPTIONS]
//!
//! Options:
//!   --url <URL>                  Backend WebSocket URL [default: ws://localhost:8080/websocket]
//!   --repeat-interval-ms <MS>    Press-and-hold repeat period [default: 100]
//!   --max-height <HEIGHT>        Height shown as 100 % [default: 650]
//!   --output <text|json>         Status output format [default: text]
//! ```
//!
//! # Environment variable overrides
//!
//! | Variable                  | Default                         |
//! |---------------------------|---------------------------------|
//! | `DESK_URL`                | `ws://localhost:8080/websocket` |
//! | `DESK_REPEAT_INTERVAL_MS` | `100`                           |
//! | `DESK_MAX_HEIGHT`         | `650`                           |
//!
//! Log verbosity follows `RUST_LOG` (default `info`).  Logs go to stderr so
//! they never interleave with the status output on stdout.
//!
//! # Task layout
//!
//! ```text
//! stdin thread ──Intent──▶ ┐
//! Ctrl+C task  ──Quit────▶ ├──▶ EventLoop (DeskController)
//! connection   ──Inbound─▶ ┘          │
//!      ▲                              │ Command
//!      └──────────────────────────────┘
//! ```

use std::sync::Arc;
use std::time::Duration;

use anyhow::{ensure, Context};
use clap::Parser;
use tokio::sync::mpsc;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;
use url::Url;

use desk_client::application::{DeskController, EventLoop, Intent, HELP};
use desk_client::domain::{ClientConfig, DEFAULT_ENDPOINT};
use desk_client::infrastructure::{read_intents, spawn_connection, OutputFormat, TerminalRenderer};

// ── CLI argument definitions ──────────────────────────────────────────────────

/// Terminal remote control for a height-adjustable desk.
#[derive(Debug, Parser)]
#[command(
    name = "desk-remote",
    about = "Terminal remote control for a height-adjustable desk",
    version
)]
struct Cli {
    /// WebSocket URL of the desk backend.
    #[arg(long, default_value = DEFAULT_ENDPOINT, env = "DESK_URL")]
    url: String,

    /// Period in milliseconds at which a held up/down button repeats.
    #[arg(
        long,
        default_value_t = 100,
        env = "DESK_REPEAT_INTERVAL_MS",
        value_parser = clap::value_parser!(u64).range(1..)
    )]
    repeat_interval_ms: u64,

    /// Height shown as 100 % in the status line.
    #[arg(long, default_value_t = 650.0, env = "DESK_MAX_HEIGHT")]
    max_height: f64,

    /// Status output format.
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    output: OutputFormat,
}

impl Cli {
    /// Converts the parsed CLI arguments into a [`ClientConfig`].
    ///
    /// # Errors
    ///
    /// Returns an error if `--url` is not a `ws://` or `wss://` URL with a
    /// host, or if `--max-height` is not a positive finite number.
    fn into_client_config(self) -> anyhow::Result<ClientConfig> {
        let url = Url::parse(&self.url)
            .with_context(|| format!("invalid backend URL '{}'", self.url))?;
        ensure!(
            matches!(url.scheme(), "ws" | "wss"),
            "invalid backend URL '{}': expected ws:// or wss://",
            self.url
        );
        ensure!(
            url.host_str().is_some(),
            "invalid backend URL '{}': missing host",
            self.url
        );

        ensure!(
            self.max_height.is_finite() && self.max_height > 0.0,
            "invalid max height {}: must be a positive number",
            self.max_height
        );

        Ok(ClientConfig {
            endpoint: self.url,
            repeat_interval: Duration::from_millis(self.repeat_interval_ms),
            max_height: self.max_height,
        })
    }
}

// ── Entry point ───────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // ── Logging setup ─────────────────────────────────────────────────────────
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let output = cli.output;
    let config = cli.into_client_config()?;

    info!("desk remote starting, backend={}", config.endpoint);

    let (inbound_tx, inbound_rx) = mpsc::channel(64);
    let (intents_tx, intents_rx) = mpsc::channel(16);

    // ── Connection ────────────────────────────────────────────────────────────
    let (sender, connection_task) = spawn_connection(config.endpoint.clone(), inbound_tx);

    let controller = DeskController::new(
        Arc::new(sender),
        Arc::new(TerminalRenderer::new(output)),
        config.max_height,
    );

    if output == OutputFormat::Text {
        println!("{HELP}");
    }

    // ── Terminal input ────────────────────────────────────────────────────────
    //
    // A plain thread, not a Tokio task: the blocking stdin read cannot be
    // cancelled and must not hold up runtime shutdown.
    let stdin_tx = intents_tx.clone();
    std::thread::spawn(move || {
        let stdin = std::io::stdin().lock();
        if let Err(e) = read_intents(stdin, &stdin_tx) {
            error!("failed to read stdin: {e}");
        }
        // End of input ends the session.
        let _ = stdin_tx.blocking_send(Intent::Quit);
    });

    // ── Graceful shutdown on Ctrl+C ───────────────────────────────────────────
    tokio::spawn(async move {
        match tokio::signal::ctrl_c().await {
            Ok(()) => {
                info!("received Ctrl+C, shutting down");
                let _ = intents_tx.send(Intent::Quit).await;
            }
            Err(e) => error!("failed to listen for Ctrl+C signal: {e}"),
        }
    });

    // ── Main loop ─────────────────────────────────────────────────────────────
    let controller = EventLoop::new(controller, config.repeat_interval)
        .run(inbound_rx, intents_rx)
        .await;

    // Dropping the controller drops the command sender, which lets the
    // connection task send a Close frame and finish.
    drop(controller);
    if tokio::time::timeout(Duration::from_secs(1), connection_task)
        .await
        .is_err()
    {
        info!("backend did not acknowledge close in time");
    }

    info!("desk remote stopped");
    Ok(())
}

// ── Tests ─────────────────────────────────────────────────────────────────────
