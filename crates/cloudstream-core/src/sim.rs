//! Deterministic off-seat runtime for local runs.
//!
//! `SimulatedRuntime` implements [`StreamRuntime`] the way the vendor
//! library behaves on a developer machine outside the cloud environment:
//! client-only initialization, negative cloud checks, and
//! `NotRunningInCloud` failures for every seat-only query. Stream start and
//! stop drive the registered stream-status callback through a plausible
//! lifecycle so the UI's push path can be exercised end to end without a
//! cloud seat.
//!
//! A vendor-backed runtime replaces this implementation in deployments that
//! link the real library; nothing else in the bridge changes.

use std::sync::Mutex;

use tracing::debug;

use crate::runtime::{
    ClientInfo, ClientInfoCallback, CloudCheckChallenge, CloudCheckOutcome, DisplayLanguage,
    MessageCallback, NetworkStatusCallback, SdkError, SdkResult, SessionInfo, StartStreamInput,
    StartStreamResponse, StreamRuntime, StreamStatusCallback,
};
use crate::status::{CloudAssurance, InitMode, SdkStatus, StreamStatus};

/// Off-seat stand-in for the vendor runtime.
#[derive(Default)]
pub struct SimulatedRuntime {
    initialized: Mutex<bool>,
    stream_status_cb: Mutex<Option<StreamStatusCallback>>,
    network_status_cb: Mutex<Option<NetworkStatusCallback>>,
    client_info_cb: Mutex<Option<ClientInfoCallback>>,
    message_cb: Mutex<Option<MessageCallback>>,
}

impl SimulatedRuntime {
    pub fn new() -> Self {
        Self::default()
    }

    /// Guard shared by every post-init entry point.
    fn ensure_initialized(&self) -> SdkResult<()> {
        if *self.initialized.lock().unwrap() {
            Ok(())
        } else {
            Err(SdkError::new(SdkStatus::ApiNotInitialized))
        }
    }

    /// Runs the registered stream-status callback through `states`.
    fn push_stream_states(&self, states: &[StreamStatus]) {
        if let Some(cb) = self.stream_status_cb.lock().unwrap().as_ref() {
            for &state in states {
                cb(state);
            }
        }
    }
}

impl StreamRuntime for SimulatedRuntime {
    fn initialize(&self, _language: DisplayLanguage) -> SdkResult<InitMode> {
        *self.initialized.lock().unwrap() = true;
        debug!("simulated runtime initialized (client-only)");
        // Off-seat the vendor library comes up client-only.
        Ok(InitMode::ClientOnly)
    }

    fn shutdown(&self) -> SdkResult<()> {
        self.ensure_initialized()?;
        *self.initialized.lock().unwrap() = false;
        // The vendor drops all registered callbacks at shutdown.
        self.stream_status_cb.lock().unwrap().take();
        self.network_status_cb.lock().unwrap().take();
        self.client_info_cb.lock().unwrap().take();
        self.message_cb.lock().unwrap().take();
        debug!("simulated runtime shut down");
        Ok(())
    }

    fn is_running_in_cloud(&self) -> SdkResult<bool> {
        self.ensure_initialized()?;
        Ok(false)
    }

    fn is_running_in_cloud_secure(&self) -> SdkResult<CloudAssurance> {
        self.ensure_initialized()?;
        Ok(CloudAssurance::NotCloud)
    }

    fn cloud_check(&self, _challenge: Option<&CloudCheckChallenge>) -> SdkResult<CloudCheckOutcome> {
        self.ensure_initialized()?;
        // No seat, no attestation — regardless of the challenge.
        Ok(CloudCheckOutcome { is_cloud_environment: false, attestation_data: None })
    }

    fn is_title_available(&self, _app_id: &str) -> SdkResult<bool> {
        self.ensure_initialized()?;
        Err(SdkError::new(SdkStatus::NotRunningInCloud))
    }

    fn available_titles(&self) -> SdkResult<String> {
        self.ensure_initialized()?;
        Err(SdkError::new(SdkStatus::NotRunningInCloud))
    }

    fn start_stream(&self, _input: &StartStreamInput) -> SdkResult<StartStreamResponse> {
        self.ensure_initialized()?;
        // Off-seat start launches the local streaming client; surface the
        // lifecycle through the status callback like the vendor does.
        self.push_stream_states(&[
            StreamStatus::Init,
            StreamStatus::Authenticating,
            StreamStatus::LaunchingGame,
            StreamStatus::StreamStarted,
        ]);
        Ok(StartStreamResponse { downloaded: true })
    }

    fn stop_stream(&self) -> SdkResult<()> {
        self.ensure_initialized()?;
        self.push_stream_states(&[StreamStatus::StreamStopped]);
        Ok(())
    }

    fn send_message(&self, message: &str) -> SdkResult<()> {
        self.ensure_initialized()?;
        // There is no peer off-seat; loop the message back so the UI's
        // message push path stays observable.
        if let Some(cb) = self.message_cb.lock().unwrap().as_ref() {
            cb(message);
        }
        Ok(())
    }

    fn client_ipv4(&self) -> SdkResult<String> {
        self.ensure_initialized()?;
        Err(SdkError::new(SdkStatus::NotRunningInCloud))
    }

    fn client_country_code(&self) -> SdkResult<String> {
        self.ensure_initialized()?;
        Err(SdkError::new(SdkStatus::NotRunningInCloud))
    }

    fn client_language_code(&self) -> SdkResult<String> {
        self.ensure_initialized()?;
        Err(SdkError::new(SdkStatus::NotRunningInCloud))
    }

    fn partner_secure_data(&self) -> SdkResult<String> {
        self.ensure_initialized()?;
        Err(SdkError::new(SdkStatus::NotRunningInCloud))
    }

    fn partner_data(&self) -> SdkResult<String> {
        self.ensure_initialized()?;
        Err(SdkError::new(SdkStatus::NotRunningInCloud))
    }

    fn client_info(&self) -> SdkResult<ClientInfo> {
        self.ensure_initialized()?;
        Err(SdkError::new(SdkStatus::NotRunningInCloud))
    }

    fn session_info(&self) -> SdkResult<SessionInfo> {
        self.ensure_initialized()?;
        Err(SdkError::new(SdkStatus::NotRunningInCloud))
    }

    fn open_url_on_client(&self, _url: &str) -> SdkResult<()> {
        self.ensure_initialized()?;
        Err(SdkError::new(SdkStatus::CallWrongEnvironment))
    }

    fn register_stream_status_callback(&self, cb: StreamStatusCallback) -> SdkResult<()> {
        self.ensure_initialized()?;
        *self.stream_status_cb.lock().unwrap() = Some(cb);
        Ok(())
    }

    fn register_network_status_callback(
        &self,
        cb: NetworkStatusCallback,
        _update_interval_ms: u32,
    ) -> SdkResult<()> {
        self.ensure_initialized()?;
        *self.network_status_cb.lock().unwrap() = Some(cb);
        Ok(())
    }

    fn register_client_info_callback(&self, cb: ClientInfoCallback) -> SdkResult<()> {
        self.ensure_initialized()?;
        *self.client_info_cb.lock().unwrap() = Some(cb);
        Ok(())
    }

    fn register_message_callback(&self, cb: MessageCallback) -> SdkResult<()> {
        self.ensure_initialized()?;
        *self.message_cb.lock().unwrap() = Some(cb);
        Ok(())
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[test]
    fn test_calls_before_init_fail_with_api_not_initialized() {
        let sim = SimulatedRuntime::new();
        let err = sim.is_running_in_cloud().unwrap_err();
        assert_eq!(err.status, SdkStatus::ApiNotInitialized);
    }

    #[test]
    fn test_initialize_reports_client_only_mode() {
        let sim = SimulatedRuntime::new();
        assert_eq!(sim.initialize(DisplayLanguage::Default).unwrap(), InitMode::ClientOnly);
    }

    #[test]
    fn test_shutdown_makes_runtime_uninitialized_again() {
        let sim = SimulatedRuntime::new();
        sim.initialize(DisplayLanguage::Default).unwrap();
        sim.shutdown().unwrap();
        assert_eq!(
            sim.is_running_in_cloud().unwrap_err().status,
            SdkStatus::ApiNotInitialized
        );
    }

    #[test]
    fn test_off_seat_cloud_checks_are_negative() {
        let sim = SimulatedRuntime::new();
        sim.initialize(DisplayLanguage::Default).unwrap();

        assert!(!sim.is_running_in_cloud().unwrap());
        assert_eq!(sim.is_running_in_cloud_secure().unwrap(), CloudAssurance::NotCloud);
        let outcome = sim.cloud_check(None).unwrap();
        assert!(!outcome.is_cloud_environment);
        assert!(outcome.attestation_data.is_none());
    }

    #[test]
    fn test_seat_only_queries_fail_with_not_running_in_cloud() {
        let sim = SimulatedRuntime::new();
        sim.initialize(DisplayLanguage::Default).unwrap();

        assert_eq!(sim.client_ipv4().unwrap_err().status, SdkStatus::NotRunningInCloud);
        assert_eq!(sim.session_info().unwrap_err().status, SdkStatus::NotRunningInCloud);
        assert_eq!(sim.available_titles().unwrap_err().status, SdkStatus::NotRunningInCloud);
    }

    #[test]
    fn test_start_stream_drives_status_callback_through_lifecycle() {
        // Arrange
        let sim = SimulatedRuntime::new();
        sim.initialize(DisplayLanguage::Default).unwrap();
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        sim.register_stream_status_callback(Box::new(move |s| {
            sink.lock().unwrap().push(s);
        }))
        .unwrap();

        // Act
        let input = StartStreamInput {
            title_id: 1001,
            partner_secure_data: String::new(),
            partner_data: String::new(),
        };
        let resp = sim.start_stream(&input).unwrap();

        // Assert
        assert!(resp.downloaded);
        let states = seen.lock().unwrap();
        assert_eq!(states.first(), Some(&StreamStatus::Init));
        assert_eq!(states.last(), Some(&StreamStatus::StreamStarted));
    }

    #[test]
    fn test_send_message_loops_back_to_message_callback() {
        let sim = SimulatedRuntime::new();
        sim.initialize(DisplayLanguage::Default).unwrap();
        let seen = Arc::new(Mutex::new(Vec::<String>::new()));
        let sink = Arc::clone(&seen);
        sim.register_message_callback(Box::new(move |m| {
            sink.lock().unwrap().push(m.to_string());
        }))
        .unwrap();

        sim.send_message("ping").unwrap();

        assert_eq!(seen.lock().unwrap().as_slice(), ["ping"]);
    }
}
