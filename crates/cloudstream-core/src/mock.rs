//! Recording mock of [`StreamRuntime`] for unit and integration tests.
//!
//! A vendor-backed runtime needs a live cloud seat to exercise, and its
//! effects (launching streams, opening URLs on the client device) cannot be
//! observed from test code. `MockStreamRuntime` replaces every vendor call
//! with in-memory recording: each invocation is pushed into a
//! `Mutex<Vec<...>>` field so assertions can inspect exactly what the
//! dispatcher asked for and in what order.
//!
//! Scripted results live in public `Mutex` fields too, so a test can share
//! the mock through an `Arc` and still adjust answers mid-test:
//!
//! ```
//! use cloudstream_core::mock::MockStreamRuntime;
//! use cloudstream_core::{SdkStatus, StreamRuntime};
//!
//! let mock = MockStreamRuntime::new();
//! *mock.failure.lock().unwrap() = Some(SdkStatus::TimedOut);
//! assert!(mock.is_running_in_cloud().is_err());
//! ```
//!
//! The four `register_*` methods store the callback so tests can fire SDK
//! events through `emit_*` and observe the bridge's async push path.

use std::sync::Mutex;

use crate::runtime::{
    ClientInfo, ClientInfoCallback, ClientInfoUpdate, ClientResolution, CloudCheckChallenge,
    CloudCheckOutcome, DisplayLanguage, MessageCallback, NetworkStatusCallback,
    NetworkStatusUpdate, SdkError, SdkResult, SessionInfo, StartStreamInput,
    StartStreamResponse, StreamRuntime, StreamStatusCallback,
};
use crate::status::{CloudAssurance, InitMode, SdkStatus, StreamStatus};
use crate::attestation;

/// A mock runtime that records all calls and returns scripted values.
pub struct MockStreamRuntime {
    // ── Failure injection ────────────────────────────────────────────────
    /// When `Some`, every fallible call returns this status as an error.
    /// Clear it (set `None`) to restore the scripted success answers.
    pub failure: Mutex<Option<SdkStatus>>,

    // ── Scripted answers ─────────────────────────────────────────────────
    pub init_mode: Mutex<InitMode>,
    pub in_cloud: Mutex<bool>,
    pub assurance: Mutex<CloudAssurance>,
    pub title_available: Mutex<bool>,
    pub titles: Mutex<String>,
    pub start_response: Mutex<StartStreamResponse>,
    pub client_ip: Mutex<String>,
    pub country_code: Mutex<String>,
    pub language_code: Mutex<String>,
    pub partner_secure: Mutex<String>,
    pub partner: Mutex<String>,
    pub info: Mutex<ClientInfo>,
    pub session: Mutex<SessionInfo>,

    // ── Call records ─────────────────────────────────────────────────────
    /// Languages passed to `initialize`, in call order.
    pub init_calls: Mutex<Vec<DisplayLanguage>>,
    /// Number of `shutdown` calls.
    pub shutdown_calls: Mutex<usize>,
    /// Challenge nonces passed to `cloud_check` (`None` = no challenge).
    pub cloud_checks: Mutex<Vec<Option<Vec<u8>>>>,
    /// App ids passed to `is_title_available`.
    pub title_queries: Mutex<Vec<String>>,
    /// Inputs passed to `start_stream`.
    pub stream_starts: Mutex<Vec<StartStreamInput>>,
    /// Number of `stop_stream` calls.
    pub stream_stops: Mutex<usize>,
    /// Messages passed to `send_message`.
    pub sent_messages: Mutex<Vec<String>>,
    /// URLs passed to `open_url_on_client`.
    pub opened_urls: Mutex<Vec<String>>,
    /// Update intervals passed to `register_network_status_callback`.
    pub network_intervals: Mutex<Vec<u32>>,

    // ── Stored callbacks ─────────────────────────────────────────────────
    stream_status_cb: Mutex<Option<StreamStatusCallback>>,
    network_status_cb: Mutex<Option<NetworkStatusCallback>>,
    client_info_cb: Mutex<Option<ClientInfoCallback>>,
    message_cb: Mutex<Option<MessageCallback>>,
}

impl Default for MockStreamRuntime {
    fn default() -> Self {
        Self {
            failure: Mutex::new(None),
            init_mode: Mutex::new(InitMode::Full),
            in_cloud: Mutex::new(true),
            assurance: Mutex::new(CloudAssurance::Max),
            title_available: Mutex::new(true),
            titles: Mutex::new("1001,1002,1003".to_string()),
            start_response: Mutex::new(StartStreamResponse { downloaded: false }),
            client_ip: Mutex::new("203.0.113.7".to_string()),
            country_code: Mutex::new("US".to_string()),
            language_code: Mutex::new("en-US".to_string()),
            partner_secure: Mutex::new("secure-token".to_string()),
            partner: Mutex::new("partner-blob".to_string()),
            info: Mutex::new(ClientInfo {
                api_version: 2,
                country: "US".to_string(),
                ip_v4: "203.0.113.7".to_string(),
                locale: "en-US".to_string(),
                os_type: 1,
                rtd_average_latency_ms: 18,
                resolution: ClientResolution { width: 1920, height: 1080 },
            }),
            session: Mutex::new(SessionInfo {
                max_duration_sec: 3600,
                time_remaining_sec: 1800,
                session_id: "session-0001".to_string(),
                rtx_enabled: true,
            }),
            init_calls: Mutex::new(Vec::new()),
            shutdown_calls: Mutex::new(0),
            cloud_checks: Mutex::new(Vec::new()),
            title_queries: Mutex::new(Vec::new()),
            stream_starts: Mutex::new(Vec::new()),
            stream_stops: Mutex::new(0),
            sent_messages: Mutex::new(Vec::new()),
            opened_urls: Mutex::new(Vec::new()),
            network_intervals: Mutex::new(Vec::new()),
            stream_status_cb: Mutex::new(None),
            network_status_cb: Mutex::new(None),
            client_info_cb: Mutex::new(None),
            message_cb: Mutex::new(None),
        }
    }
}

impl MockStreamRuntime {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the injected failure, if any.
    fn fail(&self) -> Option<SdkError> {
        self.failure.lock().unwrap().map(SdkError::new)
    }

    // ── Event firing (test-side SDK thread stand-in) ─────────────────────

    /// Fires the registered stream status callback, if any.
    pub fn emit_stream_status(&self, status: StreamStatus) {
        if let Some(cb) = self.stream_status_cb.lock().unwrap().as_ref() {
            cb(status);
        }
    }

    /// Fires the registered network status callback, if any.
    pub fn emit_network_update(&self, update: &NetworkStatusUpdate) {
        if let Some(cb) = self.network_status_cb.lock().unwrap().as_ref() {
            cb(update);
        }
    }

    /// Fires the registered client-info callback, if any.
    pub fn emit_client_info_update(&self, update: &ClientInfoUpdate) {
        if let Some(cb) = self.client_info_cb.lock().unwrap().as_ref() {
            cb(update);
        }
    }

    /// Fires the registered message callback, if any.
    pub fn emit_message(&self, message: &str) {
        if let Some(cb) = self.message_cb.lock().unwrap().as_ref() {
            cb(message);
        }
    }

    /// `true` when a message callback has been registered.
    pub fn has_message_callback(&self) -> bool {
        self.message_cb.lock().unwrap().is_some()
    }
}

impl StreamRuntime for MockStreamRuntime {
    fn initialize(&self, language: DisplayLanguage) -> SdkResult<InitMode> {
        self.init_calls.lock().unwrap().push(language);
        if let Some(e) = self.fail() {
            return Err(e);
        }
        Ok(*self.init_mode.lock().unwrap())
    }

    fn shutdown(&self) -> SdkResult<()> {
        *self.shutdown_calls.lock().unwrap() += 1;
        if let Some(e) = self.fail() {
            return Err(e);
        }
        Ok(())
    }

    fn is_running_in_cloud(&self) -> SdkResult<bool> {
        if let Some(e) = self.fail() {
            return Err(e);
        }
        Ok(*self.in_cloud.lock().unwrap())
    }

    fn is_running_in_cloud_secure(&self) -> SdkResult<CloudAssurance> {
        if let Some(e) = self.fail() {
            return Err(e);
        }
        Ok(*self.assurance.lock().unwrap())
    }

    fn cloud_check(&self, challenge: Option<&CloudCheckChallenge>) -> SdkResult<CloudCheckOutcome> {
        self.cloud_checks
            .lock()
            .unwrap()
            .push(challenge.map(|c| c.nonce.clone()));
        if let Some(e) = self.fail() {
            return Err(e);
        }
        let is_cloud = *self.in_cloud.lock().unwrap();
        // A challenged check on a cloud seat yields an attestation blob
        // covering the caller's nonce.
        let attestation_data = match challenge {
            Some(c) if is_cloud => Some(attestation::attestation_data_for(&c.nonce)),
            _ => None,
        };
        Ok(CloudCheckOutcome { is_cloud_environment: is_cloud, attestation_data })
    }

    fn is_title_available(&self, app_id: &str) -> SdkResult<bool> {
        self.title_queries.lock().unwrap().push(app_id.to_string());
        if let Some(e) = self.fail() {
            return Err(e);
        }
        Ok(*self.title_available.lock().unwrap())
    }

    fn available_titles(&self) -> SdkResult<String> {
        if let Some(e) = self.fail() {
            return Err(e);
        }
        Ok(self.titles.lock().unwrap().clone())
    }

    fn start_stream(&self, input: &StartStreamInput) -> SdkResult<StartStreamResponse> {
        self.stream_starts.lock().unwrap().push(input.clone());
        if let Some(e) = self.fail() {
            return Err(e);
        }
        Ok(*self.start_response.lock().unwrap())
    }

    fn stop_stream(&self) -> SdkResult<()> {
        *self.stream_stops.lock().unwrap() += 1;
        if let Some(e) = self.fail() {
            return Err(e);
        }
        Ok(())
    }

    fn send_message(&self, message: &str) -> SdkResult<()> {
        self.sent_messages.lock().unwrap().push(message.to_string());
        if let Some(e) = self.fail() {
            return Err(e);
        }
        Ok(())
    }

    fn client_ipv4(&self) -> SdkResult<String> {
        if let Some(e) = self.fail() {
            return Err(e);
        }
        Ok(self.client_ip.lock().unwrap().clone())
    }

    fn client_country_code(&self) -> SdkResult<String> {
        if let Some(e) = self.fail() {
            return Err(e);
        }
        Ok(self.country_code.lock().unwrap().clone())
    }

    fn client_language_code(&self) -> SdkResult<String> {
        if let Some(e) = self.fail() {
            return Err(e);
        }
        Ok(self.language_code.lock().unwrap().clone())
    }

    fn partner_secure_data(&self) -> SdkResult<String> {
        if let Some(e) = self.fail() {
            return Err(e);
        }
        Ok(self.partner_secure.lock().unwrap().clone())
    }

    fn partner_data(&self) -> SdkResult<String> {
        if let Some(e) = self.fail() {
            return Err(e);
        }
        Ok(self.partner.lock().unwrap().clone())
    }

    fn client_info(&self) -> SdkResult<ClientInfo> {
        if let Some(e) = self.fail() {
            return Err(e);
        }
        Ok(self.info.lock().unwrap().clone())
    }

    fn session_info(&self) -> SdkResult<SessionInfo> {
        if let Some(e) = self.fail() {
            return Err(e);
        }
        Ok(self.session.lock().unwrap().clone())
    }

    fn open_url_on_client(&self, url: &str) -> SdkResult<()> {
        self.opened_urls.lock().unwrap().push(url.to_string());
        if let Some(e) = self.fail() {
            return Err(e);
        }
        Ok(())
    }

    fn register_stream_status_callback(&self, cb: StreamStatusCallback) -> SdkResult<()> {
        if let Some(e) = self.fail() {
            return Err(e);
        }
        *self.stream_status_cb.lock().unwrap() = Some(cb);
        Ok(())
    }

    fn register_network_status_callback(
        &self,
        cb: NetworkStatusCallback,
        update_interval_ms: u32,
    ) -> SdkResult<()> {
        self.network_intervals.lock().unwrap().push(update_interval_ms);
        if let Some(e) = self.fail() {
            return Err(e);
        }
        *self.network_status_cb.lock().unwrap() = Some(cb);
        Ok(())
    }

    fn register_client_info_callback(&self, cb: ClientInfoCallback) -> SdkResult<()> {
        if let Some(e) = self.fail() {
            return Err(e);
        }
        *self.client_info_cb.lock().unwrap() = Some(cb);
        Ok(())
    }

    fn register_message_callback(&self, cb: MessageCallback) -> SdkResult<()> {
        if let Some(e) = self.fail() {
            return Err(e);
        }
        *self.message_cb.lock().unwrap() = Some(cb);
        Ok(())
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
