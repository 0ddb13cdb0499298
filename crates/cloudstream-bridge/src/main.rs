//! CloudStream bridge — entry point.
//!
//! This binary accepts WebSocket connections from browser-hosted launcher
//! UIs and dispatches their JSON command requests against the cloud
//! streaming runtime SDK. It is a thin translation layer: one command in,
//! one SDK call, one JSON response out, plus four asynchronous event push
//! channels (stream status, network status, client info, messages).
//!
//! # Usage
//!
//! ```text
//! cloudstream-bridge [OPTIONS]
//!
//! Options:
//!   --ws-port <PORT>                  WebSocket listener port [default: 24810]
//!   --ws-bind <ADDR>                  Bind address [default: 0.0.0.0]
//!   --override-uri <URI>              Value reported by getOverrideUri
//!   --open-url <URL>                  URL opened on the client device
//!   --additional-title <ID>           Extra supported title (repeatable)
//!   --network-status-interval <MS>    Network telemetry poll cadence
//!   --sdk-data-file <PATH>            SDK runtime data file location
//! ```
//!
//! # Environment variable overrides
//!
//! CLI args take precedence when both are present.
//!
//! | Variable                      | Default           |
//! |-------------------------------|-------------------|
//! | `CSB_WS_PORT`                 | `24810`           |
//! | `CSB_WS_BIND`                 | `0.0.0.0`         |
//! | `CSB_OVERRIDE_URI`            | (empty)           |
//! | `CSB_OPEN_URL`                | welcome page URL  |
//! | `CSB_ADDITIONAL_TITLES`       | (empty)           |
//! | `CSB_NETWORK_STATUS_INTERVAL` | `5000`            |
//! | `CSB_SDK_DATA_FILE`           | platform default  |

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc,
};

use anyhow::Context;
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use cloudstream_bridge::application::{CallbackSlots, DispatchContext};
use cloudstream_bridge::domain::config::{default_sdk_data_file, BridgeConfig};
use cloudstream_bridge::infrastructure::{bind_listener, run_server};
use cloudstream_bridge::infrastructure::sdk_data::log_sdk_data_file;
use cloudstream_core::sim::SimulatedRuntime;
use cloudstream_core::StreamRuntime;

// ── CLI argument definitions ──────────────────────────────────────────────────

/// CloudStream WebSocket bridge.
///
/// Accepts WebSocket connections from browser launcher UIs and dispatches
/// their JSON commands against the cloud streaming runtime.
#[derive(Debug, Parser)]
#[command(
    name = "cloudstream-bridge",
    about = "WebSocket bridge between browser launcher UIs and the cloud streaming runtime",
    version
)]
struct Cli {
    /// TCP port for the WebSocket server to listen on.
    ///
    /// Browser UIs connect to this port via WebSocket (ws://host:PORT).
    /// The `getTcpPort` command reports the port actually bound.
    #[arg(long, default_value_t = 24810, env = "CSB_WS_PORT")]
    ws_port: u16,

    /// IP address to bind the WebSocket server to.
    ///
    /// Use `0.0.0.0` to accept connections from any interface, or
    /// `127.0.0.1` to accept only local UIs.
    #[arg(long, default_value = "0.0.0.0", env = "CSB_WS_BIND")]
    ws_bind: String,

    /// URI reported by the `getOverrideUri` command.
    #[arg(long, default_value = "", env = "CSB_OVERRIDE_URI")]
    override_uri: String,

    /// URL the `openUrlOnClient` command asks the client device to open.
    #[arg(
        long,
        default_value = "https://cloudstream.example.com/welcome",
        env = "CSB_OPEN_URL"
    )]
    open_url: String,

    /// Extra title id reported by `getAdditionalSupportedTitles`.
    /// Repeat the flag for multiple titles.
    #[arg(long = "additional-title", env = "CSB_ADDITIONAL_TITLES", value_delimiter = ',')]
    additional_titles: Vec<String>,

    /// Poll cadence for the network status callback, in milliseconds.
    #[arg(long, default_value_t = 5000, env = "CSB_NETWORK_STATUS_INTERVAL")]
    network_status_interval: u32,

    /// Location of the vendor SDK runtime data file logged after a full
    /// in-cloud init. Defaults to the platform's vendor layout.
    #[arg(long, env = "CSB_SDK_DATA_FILE")]
    sdk_data_file: Option<PathBuf>,
}

impl Cli {
    /// Converts the parsed CLI arguments into a [`BridgeConfig`].
    ///
    /// # Errors
    ///
    /// Returns an error if `--ws-bind` is not a valid IP address.
    fn into_bridge_config(self) -> anyhow::Result<BridgeConfig> {
        let ws_bind_addr: SocketAddr = format!("{}:{}", self.ws_bind, self.ws_port)
            .parse()
            .with_context(|| {
                format!("invalid WebSocket bind address: '{}:{}'", self.ws_bind, self.ws_port)
            })?;

        Ok(BridgeConfig {
            ws_bind_addr,
            override_uri: self.override_uri,
            open_url: self.open_url,
            additional_titles: self.additional_titles,
            network_status_interval_ms: self.network_status_interval,
            sdk_data_file: Some(self.sdk_data_file.unwrap_or_else(default_sdk_data_file)),
        })
    }
}

// ── Entry point ───────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // RUST_LOG controls verbosity; absent or invalid falls back to info.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    let config = Arc::new(cli.into_bridge_config()?);

    info!("cloudstream bridge starting — ws={}", config.ws_bind_addr);

    // Bind before building the dispatch context: getTcpPort reports the
    // port the listener actually got.
    let listener = bind_listener(config.ws_bind_addr).await?;
    let active_port = listener
        .local_addr()
        .context("listener has no local address")?
        .port();

    // The deterministic off-seat runtime stands in wherever the vendor
    // library is not linked; the dispatcher never knows the difference.
    let runtime: Arc<dyn StreamRuntime> = Arc::new(SimulatedRuntime::new());

    let on_cloud_init = config.sdk_data_file.clone().map(|path| {
        Box::new(move || log_sdk_data_file(&path)) as Box<dyn Fn() + Send + Sync>
    });

    let ctx = Arc::new(DispatchContext {
        runtime,
        slots: Arc::new(CallbackSlots::new()),
        config: Arc::clone(&config),
        active_port,
        on_cloud_init,
    });

    // Ctrl+C clears the flag; the accept loop checks it every 200 ms and
    // exits cleanly.
    let running = Arc::new(AtomicBool::new(true));
    let running_clone = Arc::clone(&running);
    tokio::spawn(async move {
        match tokio::signal::ctrl_c().await {
            Ok(()) => {
                info!("received Ctrl+C — initiating graceful shutdown");
                running_clone.store(false, Ordering::Relaxed);
            }
            Err(e) => {
                tracing::error!("failed to listen for Ctrl+C signal: {e}");
            }
        }
    });

    run_server(listener, ctx, running).await?;

    info!("cloudstream bridge stopped");
    Ok(())
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_defaults_produce_correct_ws_port() {
        let cli = Cli::parse_from(["cloudstream-bridge"]);
        assert_eq!(cli.ws_port, 24810);
    }

    #[test]
    fn test_cli_defaults_have_empty_override_uri() {
        let cli = Cli::parse_from(["cloudstream-bridge"]);
        assert!(cli.override_uri.is_empty());
    }

    #[test]
    fn test_cli_defaults_produce_correct_network_interval() {
        let cli = Cli::parse_from(["cloudstream-bridge"]);
        assert_eq!(cli.network_status_interval, 5000);
    }

    #[test]
    fn test_cli_ws_port_override() {
        let cli = Cli::parse_from(["cloudstream-bridge", "--ws-port", "9999"]);
        assert_eq!(cli.ws_port, 9999);
    }

    #[test]
    fn test_cli_additional_titles_are_repeatable() {
        let cli = Cli::parse_from([
            "cloudstream-bridge",
            "--additional-title",
            "2001",
            "--additional-title",
            "2002",
        ]);
        assert_eq!(cli.additional_titles, ["2001", "2002"]);
    }

    #[test]
    fn test_into_bridge_config_default_ws_port() {
        let cli = Cli::parse_from(["cloudstream-bridge"]);
        let config = cli.into_bridge_config().unwrap();
        assert_eq!(config.ws_bind_addr.port(), 24810);
    }

    #[test]
    fn test_into_bridge_config_custom_bind_and_port() {
        let cli = Cli::parse_from([
            "cloudstream-bridge",
            "--ws-bind",
            "127.0.0.1",
            "--ws-port",
            "8080",
        ]);
        let config = cli.into_bridge_config().unwrap();
        assert_eq!(config.ws_bind_addr.to_string(), "127.0.0.1:8080");
    }

    #[test]
    fn test_into_bridge_config_fills_sdk_data_file_default() {
        let cli = Cli::parse_from(["cloudstream-bridge"]);
        let config = cli.into_bridge_config().unwrap();
        assert!(config.sdk_data_file.is_some());
    }

    #[test]
    fn test_into_bridge_config_invalid_ws_bind_returns_error() {
        let cli = Cli {
            ws_port: 24810,
            ws_bind: "not.an.ip".to_string(),
            override_uri: String::new(),
            open_url: String::new(),
            additional_titles: Vec::new(),
            network_status_interval: 5000,
            sdk_data_file: None,
        };

        let result = cli.into_bridge_config();

        assert!(result.is_err());
    }
}
