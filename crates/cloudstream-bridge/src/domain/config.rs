//! Bridge configuration.
//!
//! [`BridgeConfig`] is the single source of truth for all runtime settings.
//! It is populated from CLI arguments (with env-var overrides) in `main.rs`
//! and carries sensible defaults for local development and tests. Keeping it
//! a plain struct — no global state, no environment reads in here — lets
//! tests construct exactly the configuration they need.

use std::net::{Ipv4Addr, SocketAddr};
use std::path::PathBuf;

/// All runtime configuration for the bridge.
///
/// Build once at startup, wrap in an `Arc`, share across session tasks.
#[derive(Debug, Clone)]
pub struct BridgeConfig {
    /// Address and port the WebSocket server binds to.
    ///
    /// `0.0.0.0` accepts connections from any interface; use `127.0.0.1` to
    /// restrict to local UIs.
    pub ws_bind_addr: SocketAddr,

    /// Value reported by the `getOverrideUri` command. Empty when the
    /// launcher was started without `--override-uri`.
    pub override_uri: String,

    /// URL passed to the SDK by the `openUrlOnClient` command.
    pub open_url: String,

    /// Extra title ids reported by `getAdditionalSupportedTitles` on top of
    /// whatever the seat offers.
    pub additional_titles: Vec<String>,

    /// Poll cadence requested when registering the network status callback,
    /// in milliseconds.
    pub network_status_interval_ms: u32,

    /// Path of the vendor SDK data file logged after a full in-cloud init.
    /// `None` disables the diagnostic.
    pub sdk_data_file: Option<PathBuf>,
}

impl Default for BridgeConfig {
    fn default() -> Self {
        Self {
            ws_bind_addr: SocketAddr::from((Ipv4Addr::UNSPECIFIED, 24810)),
            override_uri: String::new(),
            open_url: "https://cloudstream.example.com/welcome".to_string(),
            additional_titles: Vec::new(),
            network_status_interval_ms: 5_000,
            sdk_data_file: Some(default_sdk_data_file()),
        }
    }
}

/// Platform-default location of the vendor SDK data file.
#[cfg(windows)]
pub fn default_sdk_data_file() -> PathBuf {
    let program_data =
        std::env::var_os("PROGRAMDATA").unwrap_or_else(|| "C:\\ProgramData".into());
    PathBuf::from(program_data).join("CloudStream\\RuntimeSdk\\SdkRuntimeData.json")
}

/// Platform-default location of the vendor SDK data file.
#[cfg(not(windows))]
pub fn default_sdk_data_file() -> PathBuf {
    PathBuf::from("/var/opt/cloudstream/runtime-sdk/SdkRuntimeData.json")
}

// ── Tests ─────────────────────────────────────────────────────────────────────
