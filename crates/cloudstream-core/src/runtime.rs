//! The `StreamRuntime` trait: the vendor SDK surface as a seam.
//!
//! The vendor cloud-streaming runtime is a closed library with a fixed call
//! contract. This module expresses that contract as a trait so the bridge's
//! dispatcher can be written and tested against it without linking the
//! vendor library. In-tree implementations are [`crate::mock`] (recording
//! test double) and [`crate::sim`] (deterministic off-seat runtime).
//!
//! # Threading
//!
//! All methods are synchronous — the vendor contract is a plain C call
//! surface. The four `register_*_callback` methods store a closure that the
//! runtime invokes later on an SDK-owned thread of unspecified identity, so
//! callbacks must be `Send + Sync` and must not assume any particular
//! executor context.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::status::{CloudAssurance, InitMode, SdkStatus, StreamStatus};

// ── Error type ────────────────────────────────────────────────────────────────

/// A vendor SDK call returned a non-success status code.
///
/// This is never fatal to the bridge: the dispatcher logs the code,
/// stringifies it into the `errorMessage` response field, and reports call
/// completion normally.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("sdk call failed: {status}")]
pub struct SdkError {
    /// The vendor status code behind the failure.
    pub status: SdkStatus,
}

impl SdkError {
    pub fn new(status: SdkStatus) -> Self {
        Self { status }
    }
}

impl From<SdkStatus> for SdkError {
    fn from(status: SdkStatus) -> Self {
        Self { status }
    }
}

/// Result of a vendor SDK call.
pub type SdkResult<T> = Result<T, SdkError>;

// ── SDK data types ────────────────────────────────────────────────────────────

/// UI display language passed to `initialize`.
///
/// The vendor enumerates dozens of locales; the bridge only ever requests
/// the default, so the surface stays minimal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[non_exhaustive]
pub enum DisplayLanguage {
    /// Let the runtime pick the language from the client environment.
    #[default]
    Default,
}

/// Pixel dimensions of the client display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientResolution {
    pub width: u32,
    pub height: u32,
}

/// Snapshot of client telemetry returned by `client_info`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientInfo {
    /// Version of the client-info structure the runtime filled in.
    pub api_version: u32,
    /// ISO 3166-1 alpha-2 country code of the client.
    pub country: String,
    /// Client's IPv4 address as a dotted-quad string.
    pub ip_v4: String,
    /// BCP-47 locale string, e.g. `en-US`.
    pub locale: String,
    /// Vendor-defined client OS identifier.
    pub os_type: i32,
    /// Average round-trip-delay latency to the client, in milliseconds.
    pub rtd_average_latency_ms: u32,
    /// Client display resolution.
    pub resolution: ClientResolution,
}

/// Snapshot of the active streaming session returned by `session_info`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionInfo {
    /// Maximum allowed session length in seconds.
    pub max_duration_sec: u32,
    /// Seconds remaining before the session is force-ended.
    pub time_remaining_sec: u32,
    /// Vendor-assigned session identifier.
    pub session_id: String,
    /// Whether RTX features are enabled for this session.
    pub rtx_enabled: bool,
}

/// Display safe-zone rectangle pushed through the client-info callback.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SafeZone {
    pub left: f64,
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
    /// `true` when the edges are normalized to `[0, 1]` rather than pixels.
    pub normalized: bool,
}

/// One on-seat client telemetry change delivered via the client-info
/// callback.
#[derive(Debug, Clone, PartialEq)]
#[non_exhaustive]
pub enum ClientInfoUpdate {
    /// The client OS identifier changed.
    Os(i32),
    /// The client's IPv4 address changed.
    Ip(String),
    /// The client display resolution changed.
    Resolution(ClientResolution),
    /// The display safe zone changed.
    SafeZone(SafeZone),
}

/// One network telemetry change delivered via the network-status callback.
///
/// The vendor may add further update kinds; the bridge forwards only the
/// RTD-average-latency updates it understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum NetworkStatusUpdate {
    /// New average round-trip-delay latency, in milliseconds.
    RtdAverageLatency { latency_ms: u32 },
}

/// Parameters for starting a streaming session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StartStreamInput {
    /// Vendor catalog identifier of the title to launch.
    pub title_id: u32,
    /// Partner IDM token consumed by the launcher running on the seat.
    pub partner_secure_data: String,
    /// Free-form partner data echoed back to the seat-side launcher.
    pub partner_data: String,
}

/// Result of a successful `start_stream` call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StartStreamResponse {
    /// Whether the streaming client had to be downloaded and installed.
    pub downloaded: bool,
}

/// Challenge nonce passed to the validated cloud check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CloudCheckChallenge {
    /// At least [`crate::attestation::MIN_NONCE_SIZE`] bytes of entropy.
    pub nonce: Vec<u8>,
}

/// Result of a cloud check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CloudCheckOutcome {
    /// Whether the process is running inside the cloud environment.
    pub is_cloud_environment: bool,
    /// Attestation blob covering the challenge nonce. `None` when no
    /// challenge was supplied or the environment cannot attest.
    pub attestation_data: Option<String>,
}

// ── Callback signatures ───────────────────────────────────────────────────────

/// Invoked on stream lifecycle transitions.
pub type StreamStatusCallback = Box<dyn Fn(StreamStatus) + Send + Sync>;
/// Invoked on network telemetry updates.
pub type NetworkStatusCallback = Box<dyn Fn(&NetworkStatusUpdate) + Send + Sync>;
/// Invoked on client telemetry updates.
pub type ClientInfoCallback = Box<dyn Fn(&ClientInfoUpdate) + Send + Sync>;
/// Invoked when the seat-side launcher sends a message to this process.
pub type MessageCallback = Box<dyn Fn(&str) + Send + Sync>;

// ── The runtime trait ─────────────────────────────────────────────────────────

/// The vendor cloud-streaming runtime surface, one method per SDK entry
/// point the bridge dispatches to.
///
/// Registration methods overwrite any previously registered callback of the
/// same category — the runtime holds exactly one callback per category.
pub trait StreamRuntime: Send + Sync {
    /// Initializes the runtime. Must be called once before any other entry
    /// point. Returns which mode the runtime came up in.
    fn initialize(&self, language: DisplayLanguage) -> SdkResult<InitMode>;

    /// Shuts the runtime down. No other entry point may be called after.
    fn shutdown(&self) -> SdkResult<()>;

    /// Fast, unauthenticated check for the cloud environment.
    fn is_running_in_cloud(&self) -> SdkResult<bool>;

    /// Authenticated in-cloud check. Succeeds only for processes registered
    /// with the vendor; reports a confidence level.
    fn is_running_in_cloud_secure(&self) -> SdkResult<CloudAssurance>;

    /// Cloud environment check, optionally attested against a caller
    /// supplied challenge nonce.
    fn cloud_check(&self, challenge: Option<&CloudCheckChallenge>) -> SdkResult<CloudCheckOutcome>;

    /// Whether the given title can be streamed from this seat right now.
    fn is_title_available(&self, app_id: &str) -> SdkResult<bool>;

    /// All titles currently streamable from this seat, as a comma-separated
    /// application-id string (the vendor wire form).
    fn available_titles(&self) -> SdkResult<String>;

    /// Starts a streaming session for the given title.
    fn start_stream(&self, input: &StartStreamInput) -> SdkResult<StartStreamResponse>;

    /// Stops the active streaming session.
    fn stop_stream(&self) -> SdkResult<()>;

    /// Sends an application message to the peer side of the stream.
    fn send_message(&self, message: &str) -> SdkResult<()>;

    /// The client's current IPv4 address (seat-only).
    fn client_ipv4(&self) -> SdkResult<String>;

    /// The client's ISO country code (seat-only).
    fn client_country_code(&self) -> SdkResult<String>;

    /// The client's language code (seat-only).
    fn client_language_code(&self) -> SdkResult<String>;

    /// The partner secure data supplied at stream start (seat-only).
    fn partner_secure_data(&self) -> SdkResult<String>;

    /// The partner data supplied at stream start (seat-only).
    fn partner_data(&self) -> SdkResult<String>;

    /// Current client telemetry snapshot (seat-only).
    fn client_info(&self) -> SdkResult<ClientInfo>;

    /// Current session snapshot (seat-only).
    fn session_info(&self) -> SdkResult<SessionInfo>;

    /// Asks the client device to open the given URL in its local browser.
    fn open_url_on_client(&self, url: &str) -> SdkResult<()>;

    /// Registers the stream status callback, replacing any previous one.
    fn register_stream_status_callback(&self, cb: StreamStatusCallback) -> SdkResult<()>;

    /// Registers the network status callback, replacing any previous one.
    /// `update_interval_ms` asks the runtime to poll at that cadence.
    fn register_network_status_callback(
        &self,
        cb: NetworkStatusCallback,
        update_interval_ms: u32,
    ) -> SdkResult<()>;

    /// Registers the client-info callback, replacing any previous one.
    fn register_client_info_callback(&self, cb: ClientInfoCallback) -> SdkResult<()>;

    /// Registers the message callback, replacing any previous one.
    fn register_message_callback(&self, cb: MessageCallback) -> SdkResult<()>;
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sdk_error_carries_status() {
        let err = SdkError::new(SdkStatus::NotRunningInCloud);
        assert_eq!(err.status, SdkStatus::NotRunningInCloud);
    }

    #[test]
    fn test_sdk_error_display_embeds_status_string() {
        let err = SdkError::from(SdkStatus::TimedOut);
        assert_eq!(err.to_string(), "sdk call failed: TimedOut");
    }

    #[test]
    fn test_display_language_defaults_to_default() {
        assert_eq!(DisplayLanguage::default(), DisplayLanguage::Default);
    }

    #[test]
    fn test_client_info_serializes_resolution_fields() {
        // The bridge flattens this struct into the getClientInfo response;
        // the field set must stay intact under serde.
        let info = ClientInfo {
            api_version: 2,
            country: "US".to_string(),
            ip_v4: "10.0.0.1".to_string(),
            locale: "en-US".to_string(),
            os_type: 1,
            rtd_average_latency_ms: 18,
            resolution: ClientResolution { width: 2560, height: 1440 },
        };
        let json = serde_json::to_value(&info).unwrap();
        assert_eq!(json["resolution"]["width"], 2560);
        assert_eq!(json["country"], "US");
    }
}
