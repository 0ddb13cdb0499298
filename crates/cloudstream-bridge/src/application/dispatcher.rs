//! The command dispatcher.
//!
//! One raw JSON request in, at most one SDK call, at most one JSON response
//! out. Every handler follows the same shape: extract required fields,
//! invoke one [`StreamRuntime`] method, fold the typed result plus a
//! stringified status code into the response object.
//!
//! Failure policy: a non-success SDK status is never fatal. It is logged at
//! error level, stringified into the `errorMessage` field, and the call
//! still completes normally toward the UI. A known command with a missing
//! required field answers with a fixed error string and never reaches the
//! SDK. An unknown command produces no response at all — the request may
//! belong to a different handler in the host application — and `dispatch`
//! reports it unhandled.

use std::sync::Arc;

use cloudstream_core::attestation;
use cloudstream_core::runtime::{
    CloudCheckChallenge, DisplayLanguage, SdkResult, StartStreamInput,
};
use cloudstream_core::{InitMode, SdkStatus, StreamRuntime};
use serde_json::{json, Value};
use tracing::{error, info, warn};

use crate::application::events::{CallbackSlots, Responder};
use crate::domain::commands::{CommandKind, CommandRequest, RequestError, MISSING_FIELD_ERROR};
use crate::domain::config::BridgeConfig;

/// Partner data forwarded with every stream launch.
const PARTNER_DATA: &str = "This is example custom data";

/// Everything a dispatch call needs, shared across all sessions.
pub struct DispatchContext {
    pub runtime: Arc<dyn StreamRuntime>,
    pub slots: Arc<CallbackSlots>,
    pub config: Arc<BridgeConfig>,
    /// Port the WebSocket listener actually bound, reported by `getTcpPort`.
    pub active_port: u16,
    /// Invoked after a full (in-cloud) initialization, before the response
    /// is sent. The binary wires SDK data-file diagnostics in here.
    pub on_cloud_init: Option<Box<dyn Fn() + Send + Sync>>,
}

/// Dispatches one raw request frame. Returns `true` when the frame named a
/// known command (whether or not the SDK call succeeded), `false` when it
/// could not be parsed or named an unknown command.
pub fn dispatch(ctx: &DispatchContext, raw: &str, responder: &Responder) -> bool {
    let request = match CommandRequest::parse(raw) {
        Ok(request) => request,
        Err(RequestError::UnknownCommand(name)) => {
            error!(command = %name, "no handler for command");
            return false;
        }
        Err(err) => {
            warn!(%err, "discarding malformed request frame");
            return false;
        }
    };

    let response = match request.kind {
        CommandKind::Init => Some(handle_init(ctx)),
        CommandKind::Shutdown => Some(handle_shutdown(ctx)),
        CommandKind::IsRunningInCloud => Some(handle_is_running_in_cloud(ctx)),
        CommandKind::IsRunningInCloudSecure => Some(handle_is_running_in_cloud_secure(ctx)),
        CommandKind::CloudCheckWithValidation => Some(handle_cloud_check(ctx, true)),
        CommandKind::CloudCheckNoValidation => Some(handle_cloud_check(ctx, false)),
        CommandKind::IsTitleAvailable => Some(handle_is_title_available(ctx, &request)),
        CommandKind::GetAvailableTitles => Some(handle_available_titles(ctx)),
        CommandKind::StreamAction => Some(handle_stream_action(ctx, &request)),
        CommandKind::SendMessage => Some(handle_send_message(ctx, &request)),
        CommandKind::GetClientIp => Some(handle_client_ip(ctx)),
        CommandKind::GetClientCountryCode => Some(handle_client_country_code(ctx)),
        CommandKind::GetClientLanguageCode => Some(handle_client_language_code(ctx)),
        CommandKind::GetPartnerSecureData => Some(handle_partner_secure_data(ctx)),
        CommandKind::GetPartnerData => Some(handle_partner_data(ctx)),
        CommandKind::GetTcpPort => Some(json!({ "port": ctx.active_port.to_string() })),
        CommandKind::GetClientInfo => Some(handle_client_info(ctx)),
        CommandKind::GetSessionInfo => Some(handle_session_info(ctx)),
        CommandKind::GetOverrideUri => {
            Some(json!({ "overrideURI": ctx.config.override_uri }))
        }
        CommandKind::GetAdditionalSupportedTitles => {
            Some(json!({ "titles": ctx.config.additional_titles }))
        }
        CommandKind::OpenUrlOnClient => Some(handle_open_url(ctx)),
        CommandKind::RegisterStreamStatusCallback => {
            register_stream_status(ctx, responder);
            None
        }
        CommandKind::RegisterNetworkStatusCallback => {
            register_network_status(ctx, responder);
            None
        }
        CommandKind::RegisterClientInfoCallback => {
            register_client_info(ctx, responder);
            None
        }
        CommandKind::RegisterMessageCallback => {
            register_message(ctx, responder);
            None
        }
    };

    if let Some(response) = response {
        if !responder.send(&response) {
            warn!(command = request.kind.name(), "session closed before response");
        }
    }
    true
}

// ── Helpers ───────────────────────────────────────────────────────────────────

/// Stable status string for the `errorMessage` field.
fn status_str<T>(result: &SdkResult<T>) -> &'static str {
    match result {
        Ok(_) => SdkStatus::Success.as_str(),
        Err(err) => err.status.as_str(),
    }
}

fn log_failure<T>(kind: CommandKind, result: &SdkResult<T>) {
    if let Err(err) = result {
        error!(command = kind.name(), status = err.status.as_str(), "sdk call failed");
    }
}

/// Fixed answer for a known command whose required field is absent or
/// mistyped. The SDK is never invoked on this path.
fn missing_field_response(kind: CommandKind, field: &str) -> Value {
    warn!(command = kind.name(), field, "required field missing");
    json!({ "errorMessage": MISSING_FIELD_ERROR })
}

// ── Command handlers ──────────────────────────────────────────────────────────

fn handle_init(ctx: &DispatchContext) -> Value {
    let result = ctx.runtime.initialize(DisplayLanguage::Default);
    log_failure(CommandKind::Init, &result);
    match result {
        Ok(mode) => {
            info!(mode = ?mode, "runtime initialized");
            if mode == InitMode::Full {
                if let Some(hook) = &ctx.on_cloud_init {
                    hook();
                }
            }
            // Client-only initialization still counts as success; the mode
            // is surfaced through the status string.
            json!({ "success": true, "errorMessage": mode.status().as_str() })
        }
        Err(err) => json!({ "success": false, "errorMessage": err.status.as_str() }),
    }
}

fn handle_shutdown(ctx: &DispatchContext) -> Value {
    let result = ctx.runtime.shutdown();
    log_failure(CommandKind::Shutdown, &result);
    json!({ "success": result.is_ok(), "errorMessage": status_str(&result) })
}

fn handle_is_running_in_cloud(ctx: &DispatchContext) -> Value {
    let result = ctx.runtime.is_running_in_cloud();
    log_failure(CommandKind::IsRunningInCloud, &result);
    json!({
        "enabled": *result.as_ref().unwrap_or(&false),
        "errorMessage": status_str(&result),
    })
}

fn handle_is_running_in_cloud_secure(ctx: &DispatchContext) -> Value {
    let result = ctx.runtime.is_running_in_cloud_secure();
    log_failure(CommandKind::IsRunningInCloudSecure, &result);
    let assurance = match &result {
        Ok(level) => level.as_i32(),
        Err(_) => 0,
    };
    json!({ "assurance": assurance, "errorMessage": status_str(&result) })
}

fn handle_cloud_check(ctx: &DispatchContext, validate: bool) -> Value {
    let challenge = validate.then(|| CloudCheckChallenge {
        nonce: attestation::generate_nonce().to_vec(),
    });
    let result = ctx.runtime.cloud_check(challenge.as_ref());
    let kind = if validate {
        CommandKind::CloudCheckWithValidation
    } else {
        CommandKind::CloudCheckNoValidation
    };
    log_failure(kind, &result);

    if let (Ok(outcome), Some(challenge)) = (&result, &challenge) {
        match &outcome.attestation_data {
            Some(blob) if attestation::verify_attestation_data(blob, &challenge.nonce) => {
                info!("cloud check attestation validated");
            }
            Some(_) => warn!("cloud check attestation does not cover the challenge nonce"),
            None => {
                if outcome.is_cloud_environment {
                    warn!("cloud seat answered the challenge without attestation data");
                }
            }
        }
    }

    json!({
        "isCloudEnvironment": result.as_ref().map(|o| o.is_cloud_environment).unwrap_or(false),
        "errorMessage": status_str(&result),
    })
}

fn handle_is_title_available(ctx: &DispatchContext, request: &CommandRequest) -> Value {
    let Some(app_id) = request.str_field("appId") else {
        return missing_field_response(CommandKind::IsTitleAvailable, "appId");
    };
    let result = ctx.runtime.is_title_available(app_id);
    log_failure(CommandKind::IsTitleAvailable, &result);
    json!({
        "available": *result.as_ref().unwrap_or(&false),
        "errorMessage": status_str(&result),
    })
}

fn handle_available_titles(ctx: &DispatchContext) -> Value {
    let result = ctx.runtime.available_titles();
    log_failure(CommandKind::GetAvailableTitles, &result);
    match &result {
        Ok(titles) => json!({ "titles": titles, "errorMessage": status_str(&result) }),
        Err(_) => json!({ "titles": "", "errorMessage": status_str(&result) }),
    }
}

fn handle_stream_action(ctx: &DispatchContext, request: &CommandRequest) -> Value {
    let Some(launch) = request.bool_field("launchStream") else {
        return missing_field_response(CommandKind::StreamAction, "launchStream");
    };

    if launch {
        let Some(title_id) = request.u32_field("gfnTitleId") else {
            return missing_field_response(CommandKind::StreamAction, "gfnTitleId");
        };
        let input = StartStreamInput {
            title_id,
            partner_secure_data: request.str_field("launcherToken").unwrap_or("").to_string(),
            partner_data: PARTNER_DATA.to_string(),
        };
        let result = ctx.runtime.start_stream(&input);
        log_failure(CommandKind::StreamAction, &result);
        let mut error_message = format!("StartStream = {}", status_str(&result));
        if let Ok(response) = &result {
            let installed = if response.downloaded { "Yes" } else { "Not needed" };
            error_message.push_str(&format!(", client downloaded & installed = {installed}"));
        }
        json!({ "actionSuccess": result.is_ok(), "errorMessage": error_message })
    } else {
        let result = ctx.runtime.stop_stream();
        log_failure(CommandKind::StreamAction, &result);
        json!({
            "actionSuccess": result.is_ok(),
            "errorMessage": format!("StopStream = {}", status_str(&result)),
        })
    }
}

fn handle_send_message(ctx: &DispatchContext, request: &CommandRequest) -> Value {
    let Some(message) = request.str_field("message") else {
        return missing_field_response(CommandKind::SendMessage, "message");
    };
    let result = ctx.runtime.send_message(message);
    log_failure(CommandKind::SendMessage, &result);
    json!({ "actionSuccess": result.is_ok(), "errorMessage": status_str(&result) })
}

fn handle_client_ip(ctx: &DispatchContext) -> Value {
    let result = ctx.runtime.client_ipv4();
    log_failure(CommandKind::GetClientIp, &result);
    // The payload field is always present; failure leaves it empty.
    json!({
        "clientIp": result.as_deref().unwrap_or(""),
        "errorMessage": status_str(&result),
    })
}

fn handle_client_country_code(ctx: &DispatchContext) -> Value {
    let result = ctx.runtime.client_country_code();
    log_failure(CommandKind::GetClientCountryCode, &result);
    json!({
        "clientCountryCode": result.as_deref().unwrap_or(""),
        "errorMessage": status_str(&result),
    })
}

fn handle_client_language_code(ctx: &DispatchContext) -> Value {
    let result = ctx.runtime.client_language_code();
    log_failure(CommandKind::GetClientLanguageCode, &result);
    // Asymmetric contract: empty errorMessage on success, empty code on
    // failure.
    match &result {
        Ok(code) => json!({ "clientLanguageCode": code, "errorMessage": "" }),
        Err(_) => json!({ "clientLanguageCode": "", "errorMessage": status_str(&result) }),
    }
}

fn handle_partner_secure_data(ctx: &DispatchContext) -> Value {
    let result = ctx.runtime.partner_secure_data();
    log_failure(CommandKind::GetPartnerSecureData, &result);
    json!({
        "partnerSecureData": result.as_deref().unwrap_or(""),
        "errorMessage": status_str(&result),
    })
}

fn handle_partner_data(ctx: &DispatchContext) -> Value {
    let result = ctx.runtime.partner_data();
    log_failure(CommandKind::GetPartnerData, &result);
    json!({
        "partnerData": result.as_deref().unwrap_or(""),
        "errorMessage": status_str(&result),
    })
}

fn handle_client_info(ctx: &DispatchContext) -> Value {
    let result = ctx.runtime.client_info();
    log_failure(CommandKind::GetClientInfo, &result);
    match &result {
        Ok(info) => json!({
            "apiVersion": info.api_version,
            "country": info.country,
            "ipV4": info.ip_v4,
            "locale": info.locale,
            "osType": info.os_type,
            "rtdLatencyMs": info.rtd_average_latency_ms,
            "clientResolutionWidth": info.resolution.width,
            "clientResolutionHeight": info.resolution.height,
            "errorMessage": status_str(&result),
        }),
        Err(_) => json!({ "clientInfo": "", "errorMessage": status_str(&result) }),
    }
}

fn handle_session_info(ctx: &DispatchContext) -> Value {
    let result = ctx.runtime.session_info();
    log_failure(CommandKind::GetSessionInfo, &result);
    match &result {
        Ok(session) => json!({
            "sessionMaxDurationSec": session.max_duration_sec,
            "sessionTimeRemainingSec": session.time_remaining_sec,
            "sessionID": session.session_id,
            "sessionRTXEnabled": session.rtx_enabled,
            "errorMessage": status_str(&result),
        }),
        Err(_) => json!({ "sessionInfo": "", "errorMessage": status_str(&result) }),
    }
}

fn handle_open_url(ctx: &DispatchContext) -> Value {
    let result = ctx.runtime.open_url_on_client(&ctx.config.open_url);
    log_failure(CommandKind::OpenUrlOnClient, &result);
    json!({ "status": status_str(&result) })
}

// ── Callback registrations ────────────────────────────────────────────────────
//
// Each registration overwrites the process-wide slot for its category with
// this session's responder, then (re-)registers the SDK callback that pushes
// through the slot. Registrations produce no immediate response.

fn register_stream_status(ctx: &DispatchContext, responder: &Responder) {
    ctx.slots.set_stream_status(responder.clone());
    let slots = Arc::clone(&ctx.slots);
    let result = ctx
        .runtime
        .register_stream_status_callback(Box::new(move |status| {
            slots.push_stream_status(status);
        }));
    log_failure(CommandKind::RegisterStreamStatusCallback, &result);
}

fn register_network_status(ctx: &DispatchContext, responder: &Responder) {
    ctx.slots.set_network_status(responder.clone());
    let slots = Arc::clone(&ctx.slots);
    let result = ctx.runtime.register_network_status_callback(
        Box::new(move |update| {
            slots.push_network_update(update);
        }),
        ctx.config.network_status_interval_ms,
    );
    log_failure(CommandKind::RegisterNetworkStatusCallback, &result);
}

fn register_client_info(ctx: &DispatchContext, responder: &Responder) {
    ctx.slots.set_client_info(responder.clone());
    let slots = Arc::clone(&ctx.slots);
    let result = ctx
        .runtime
        .register_client_info_callback(Box::new(move |update| {
            slots.push_client_info_update(update);
        }));
    log_failure(CommandKind::RegisterClientInfoCallback, &result);
}

fn register_message(ctx: &DispatchContext, responder: &Responder) {
    ctx.slots.set_message(responder.clone());
    let slots = Arc::clone(&ctx.slots);
    let result = ctx
        .runtime
        .register_message_callback(Box::new(move |message| {
            slots.push_message(message);
        }));
    log_failure(CommandKind::RegisterMessageCallback, &result);
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use cloudstream_core::mock::MockStreamRuntime;
    use cloudstream_core::StreamStatus;
    use tokio::sync::mpsc;

    fn context(mock: &Arc<MockStreamRuntime>) -> DispatchContext {
        DispatchContext {
            runtime: Arc::clone(mock) as Arc<dyn StreamRuntime>,
            slots: Arc::new(CallbackSlots::new()),
            config: Arc::new(BridgeConfig::default()),
            active_port: 24810,
            on_cloud_init: None,
        }
    }

    /// Dispatches one frame and drains every queued response.
    fn run(ctx: &DispatchContext, raw: &str) -> (bool, Vec<Value>) {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let responder = Responder::new(tx);
        let handled = dispatch(ctx, raw, &responder);
        let mut frames = Vec::new();
        while let Ok(frame) = rx.try_recv() {
            frames.push(serde_json::from_str(&frame).expect("responses are valid JSON"));
        }
        (handled, frames)
    }

    #[test]
    fn test_unknown_command_is_unhandled_and_silent() {
        let mock = Arc::new(MockStreamRuntime::new());
        let ctx = context(&mock);

        let (handled, frames) = run(&ctx, r#"{"command":"rebootSeat"}"#);

        assert!(!handled);
        assert!(frames.is_empty());
    }

    #[test]
    fn test_malformed_json_is_unhandled_and_silent() {
        let mock = Arc::new(MockStreamRuntime::new());
        let ctx = context(&mock);

        let (handled, frames) = run(&ctx, "{broken");

        assert!(!handled);
        assert!(frames.is_empty());
    }

    #[test]
    fn test_init_reports_success_with_status_string() {
        let mock = Arc::new(MockStreamRuntime::new());
        let ctx = context(&mock);

        let (handled, frames) = run(&ctx, r#"{"command":"init"}"#);

        assert!(handled);
        assert_eq!(frames[0], json!({ "success": true, "errorMessage": "Success" }));
    }

    #[test]
    fn test_client_only_init_still_counts_as_success() {
        let mock = Arc::new(MockStreamRuntime::new());
        *mock.init_mode.lock().unwrap() = InitMode::ClientOnly;
        let ctx = context(&mock);

        let (_, frames) = run(&ctx, r#"{"command":"init"}"#);

        assert_eq!(
            frames[0],
            json!({ "success": true, "errorMessage": "InitSuccessClientOnly" })
        );
    }

    #[test]
    fn test_full_init_fires_cloud_init_hook() {
        // Arrange
        let mock = Arc::new(MockStreamRuntime::new());
        let fired = Arc::new(std::sync::Mutex::new(0usize));
        let counter = Arc::clone(&fired);
        let mut ctx = context(&mock);
        ctx.on_cloud_init = Some(Box::new(move || {
            *counter.lock().unwrap() += 1;
        }));

        // Act
        run(&ctx, r#"{"command":"init"}"#);

        // Assert
        assert_eq!(*fired.lock().unwrap(), 1);
    }

    #[test]
    fn test_client_only_init_does_not_fire_cloud_init_hook() {
        let mock = Arc::new(MockStreamRuntime::new());
        *mock.init_mode.lock().unwrap() = InitMode::ClientOnly;
        let fired = Arc::new(std::sync::Mutex::new(0usize));
        let counter = Arc::clone(&fired);
        let mut ctx = context(&mock);
        ctx.on_cloud_init = Some(Box::new(move || {
            *counter.lock().unwrap() += 1;
        }));

        run(&ctx, r#"{"command":"init"}"#);

        assert_eq!(*fired.lock().unwrap(), 0);
    }

    #[test]
    fn test_sdk_failure_is_reported_not_fatal() {
        let mock = Arc::new(MockStreamRuntime::new());
        *mock.failure.lock().unwrap() = Some(SdkStatus::TimedOut);
        let ctx = context(&mock);

        let (handled, frames) = run(&ctx, r#"{"command":"isRunningInCloud"}"#);

        assert!(handled);
        assert_eq!(frames[0], json!({ "enabled": false, "errorMessage": "TimedOut" }));
    }

    #[test]
    fn test_secure_check_reports_assurance_level_as_int() {
        let mock = Arc::new(MockStreamRuntime::new());
        let ctx = context(&mock);

        let (_, frames) = run(&ctx, r#"{"command":"isRunningInCloudSecure"}"#);

        assert_eq!(frames[0], json!({ "assurance": 3, "errorMessage": "Success" }));
    }

    #[test]
    fn test_validated_cloud_check_passes_a_challenge_nonce() {
        // Arrange
        let mock = Arc::new(MockStreamRuntime::new());
        let ctx = context(&mock);

        // Act
        let (_, frames) = run(&ctx, r#"{"command":"cloudCheckWithValidation"}"#);

        // Assert
        assert_eq!(frames[0]["isCloudEnvironment"], true);
        let checks = mock.cloud_checks.lock().unwrap();
        let nonce = checks[0].as_ref().expect("validated check must carry a challenge");
        assert_eq!(nonce.len(), attestation::MIN_NONCE_SIZE);
    }

    #[test]
    fn test_unvalidated_cloud_check_passes_no_challenge() {
        let mock = Arc::new(MockStreamRuntime::new());
        let ctx = context(&mock);

        let (_, frames) = run(&ctx, r#"{"command":"cloudCheckNoValidation"}"#);

        assert_eq!(frames[0]["isCloudEnvironment"], true);
        assert_eq!(mock.cloud_checks.lock().unwrap()[0], None);
    }

    #[test]
    fn test_is_title_available_forwards_app_id() {
        let mock = Arc::new(MockStreamRuntime::new());
        let ctx = context(&mock);

        let (_, frames) = run(&ctx, r#"{"command":"isTitleAvailable","appId":"1007"}"#);

        assert_eq!(frames[0], json!({ "available": true, "errorMessage": "Success" }));
        assert_eq!(mock.title_queries.lock().unwrap().as_slice(), ["1007"]);
    }

    #[test]
    fn test_missing_app_id_short_circuits_before_the_sdk() {
        let mock = Arc::new(MockStreamRuntime::new());
        let ctx = context(&mock);

        let (handled, frames) = run(&ctx, r#"{"command":"isTitleAvailable"}"#);

        assert!(handled);
        assert_eq!(frames[0], json!({ "errorMessage": MISSING_FIELD_ERROR }));
        assert!(mock.title_queries.lock().unwrap().is_empty());
    }

    #[test]
    fn test_available_titles_failure_returns_empty_titles() {
        let mock = Arc::new(MockStreamRuntime::new());
        *mock.failure.lock().unwrap() = Some(SdkStatus::NotRunningInCloud);
        let ctx = context(&mock);

        let (_, frames) = run(&ctx, r#"{"command":"getAvailableTitles"}"#);

        assert_eq!(frames[0], json!({ "titles": "", "errorMessage": "NotRunningInCloud" }));
    }

    #[test]
    fn test_stream_launch_forwards_title_and_token() {
        // Arrange
        let mock = Arc::new(MockStreamRuntime::new());
        let ctx = context(&mock);

        // Act
        let (_, frames) = run(
            &ctx,
            r#"{"command":"streamAction","launchStream":true,"gfnTitleId":1001,"launcherToken":"tok-9"}"#,
        );

        // Assert
        assert_eq!(frames[0]["actionSuccess"], true);
        assert_eq!(
            frames[0]["errorMessage"],
            "StartStream = Success, client downloaded & installed = Not needed"
        );
        let starts = mock.stream_starts.lock().unwrap();
        assert_eq!(starts[0].title_id, 1001);
        assert_eq!(starts[0].partner_secure_data, "tok-9");
        assert_eq!(starts[0].partner_data, PARTNER_DATA);
    }

    #[test]
    fn test_stream_launch_reports_client_download() {
        let mock = Arc::new(MockStreamRuntime::new());
        mock.start_response.lock().unwrap().downloaded = true;
        let ctx = context(&mock);

        let (_, frames) = run(
            &ctx,
            r#"{"command":"streamAction","launchStream":true,"gfnTitleId":1001}"#,
        );

        assert_eq!(
            frames[0]["errorMessage"],
            "StartStream = Success, client downloaded & installed = Yes"
        );
    }

    #[test]
    fn test_stream_launch_without_title_short_circuits() {
        let mock = Arc::new(MockStreamRuntime::new());
        let ctx = context(&mock);

        let (_, frames) = run(&ctx, r#"{"command":"streamAction","launchStream":true}"#);

        assert_eq!(frames[0], json!({ "errorMessage": MISSING_FIELD_ERROR }));
        assert!(mock.stream_starts.lock().unwrap().is_empty());
    }

    #[test]
    fn test_stream_stop_calls_stop_stream() {
        let mock = Arc::new(MockStreamRuntime::new());
        let ctx = context(&mock);

        let (_, frames) = run(&ctx, r#"{"command":"streamAction","launchStream":false}"#);

        assert_eq!(
            frames[0],
            json!({ "actionSuccess": true, "errorMessage": "StopStream = Success" })
        );
        assert_eq!(*mock.stream_stops.lock().unwrap(), 1);
    }

    #[test]
    fn test_send_message_requires_message_field() {
        let mock = Arc::new(MockStreamRuntime::new());
        let ctx = context(&mock);

        let (_, frames) = run(&ctx, r#"{"command":"sendMessage"}"#);

        assert_eq!(frames[0], json!({ "errorMessage": MISSING_FIELD_ERROR }));
        assert!(mock.sent_messages.lock().unwrap().is_empty());
    }

    #[test]
    fn test_send_message_forwards_payload() {
        let mock = Arc::new(MockStreamRuntime::new());
        let ctx = context(&mock);

        let (_, frames) = run(&ctx, r#"{"command":"sendMessage","message":"hi seat"}"#);

        assert_eq!(frames[0], json!({ "actionSuccess": true, "errorMessage": "Success" }));
        assert_eq!(mock.sent_messages.lock().unwrap().as_slice(), ["hi seat"]);
    }

    #[test]
    fn test_language_code_success_has_empty_error_message() {
        let mock = Arc::new(MockStreamRuntime::new());
        let ctx = context(&mock);

        let (_, frames) = run(&ctx, r#"{"command":"getClientLanguageCode"}"#);

        assert_eq!(
            frames[0],
            json!({ "clientLanguageCode": "en-US", "errorMessage": "" })
        );
    }

    #[test]
    fn test_language_code_failure_has_empty_code() {
        let mock = Arc::new(MockStreamRuntime::new());
        *mock.failure.lock().unwrap() = Some(SdkStatus::NotRunningInCloud);
        let ctx = context(&mock);

        let (_, frames) = run(&ctx, r#"{"command":"getClientLanguageCode"}"#);

        assert_eq!(
            frames[0],
            json!({ "clientLanguageCode": "", "errorMessage": "NotRunningInCloud" })
        );
    }

    #[test]
    fn test_tcp_port_reports_active_listener_port_as_string() {
        let mock = Arc::new(MockStreamRuntime::new());
        let mut ctx = context(&mock);
        ctx.active_port = 4321;

        let (_, frames) = run(&ctx, r#"{"command":"getTcpPort"}"#);

        assert_eq!(frames[0], json!({ "port": "4321" }));
    }

    #[test]
    fn test_client_info_flattens_snapshot_fields() {
        let mock = Arc::new(MockStreamRuntime::new());
        let ctx = context(&mock);

        let (_, frames) = run(&ctx, r#"{"command":"getClientInfo"}"#);

        assert_eq!(frames[0]["ipV4"], "203.0.113.7");
        assert_eq!(frames[0]["clientResolutionWidth"], 1920);
        assert_eq!(frames[0]["clientResolutionHeight"], 1080);
        assert_eq!(frames[0]["errorMessage"], "Success");
    }

    #[test]
    fn test_client_info_failure_blanks_the_payload() {
        let mock = Arc::new(MockStreamRuntime::new());
        *mock.failure.lock().unwrap() = Some(SdkStatus::NoData);
        let ctx = context(&mock);

        let (_, frames) = run(&ctx, r#"{"command":"getClientInfo"}"#);

        assert_eq!(frames[0], json!({ "clientInfo": "", "errorMessage": "NoData" }));
    }

    #[test]
    fn test_session_info_reports_rtx_flag_as_bool() {
        let mock = Arc::new(MockStreamRuntime::new());
        let ctx = context(&mock);

        let (_, frames) = run(&ctx, r#"{"command":"getSessionInfo"}"#);

        assert_eq!(frames[0]["sessionID"], "session-0001");
        assert_eq!(frames[0]["sessionRTXEnabled"], true);
        assert_eq!(frames[0]["sessionMaxDurationSec"], 3600);
    }

    #[test]
    fn test_override_uri_comes_from_config() {
        let mock = Arc::new(MockStreamRuntime::new());
        let mut ctx = context(&mock);
        ctx.config = Arc::new(BridgeConfig {
            override_uri: "https://staging.example.com".to_string(),
            ..BridgeConfig::default()
        });

        let (_, frames) = run(&ctx, r#"{"command":"getOverrideUri"}"#);

        assert_eq!(frames[0], json!({ "overrideURI": "https://staging.example.com" }));
    }

    #[test]
    fn test_additional_titles_come_from_config_as_list() {
        let mock = Arc::new(MockStreamRuntime::new());
        let mut ctx = context(&mock);
        ctx.config = Arc::new(BridgeConfig {
            additional_titles: vec!["2001".to_string(), "2002".to_string()],
            ..BridgeConfig::default()
        });

        let (_, frames) = run(&ctx, r#"{"command":"getAdditionalSupportedTitles"}"#);

        assert_eq!(frames[0], json!({ "titles": ["2001", "2002"] }));
    }

    #[test]
    fn test_open_url_uses_configured_client_url() {
        let mock = Arc::new(MockStreamRuntime::new());
        let ctx = context(&mock);

        let (_, frames) = run(&ctx, r#"{"command":"openUrlOnClient"}"#);

        assert_eq!(frames[0], json!({ "status": "Success" }));
        assert_eq!(
            mock.opened_urls.lock().unwrap().as_slice(),
            [ctx.config.open_url.clone()]
        );
    }

    #[test]
    fn test_registration_produces_no_immediate_response() {
        let mock = Arc::new(MockStreamRuntime::new());
        let ctx = context(&mock);

        let (handled, frames) = run(&ctx, r#"{"command":"registerMessageCallback"}"#);

        assert!(handled);
        assert!(frames.is_empty());
        assert!(mock.has_message_callback());
    }

    #[test]
    fn test_registered_stream_status_events_reach_the_session() {
        // Arrange
        let mock = Arc::new(MockStreamRuntime::new());
        let ctx = context(&mock);
        let (tx, mut rx) = mpsc::unbounded_channel();
        let responder = Responder::new(tx);
        dispatch(&ctx, r#"{"command":"registerStreamStatusCallback"}"#, &responder);

        // Act: the SDK fires on its own thread; the mock stands in for it.
        mock.emit_stream_status(StreamStatus::InQueue);

        // Assert
        let frame = rx.try_recv().expect("event push delivered");
        assert_eq!(frame, json!({ "status": "InQueue" }).to_string());
    }

    #[test]
    fn test_network_registration_uses_configured_interval() {
        let mock = Arc::new(MockStreamRuntime::new());
        let ctx = context(&mock);
        let (tx, _rx) = mpsc::unbounded_channel();

        dispatch(&ctx, r#"{"command":"registerNetworkStatusCallback"}"#, &Responder::new(tx));

        assert_eq!(mock.network_intervals.lock().unwrap().as_slice(), [5000]);
    }
}
