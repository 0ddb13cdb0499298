//! Command vocabulary spoken by the browser UI.
//!
//! Every request is a JSON object with a `"command"` string field naming one
//! of the bridge operations, plus optional command-specific fields. Parsing
//! happens in two stages so the dispatcher can distinguish "I have never
//! heard of this command" (no response at all, the request may belong to a
//! different handler) from "I know this command but the arguments are bad"
//! (fixed error-string response, the SDK is never invoked).

use serde_json::{Map, Value};
use thiserror::Error;

/// Error string returned when a known command is missing a required field.
pub const MISSING_FIELD_ERROR: &str = "Bad arguments to bridge command";

/// Why a raw request could not be turned into a [`CommandRequest`].
#[derive(Debug, Error)]
pub enum RequestError {
    #[error("request is not valid JSON: {0}")]
    InvalidJson(#[from] serde_json::Error),

    #[error("request is not a JSON object")]
    NotAnObject,

    #[error("request has no string \"command\" field")]
    MissingCommand,

    /// Not an error for the bridge as a whole: another handler in the host
    /// application may own this command name.
    #[error("unknown command {0:?}")]
    UnknownCommand(String),
}

/// One bridge operation, keyed by its wire name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CommandKind {
    Init,
    Shutdown,
    IsRunningInCloud,
    IsRunningInCloudSecure,
    CloudCheckWithValidation,
    CloudCheckNoValidation,
    IsTitleAvailable,
    GetAvailableTitles,
    StreamAction,
    SendMessage,
    RegisterMessageCallback,
    GetClientIp,
    GetClientCountryCode,
    GetClientLanguageCode,
    RegisterStreamStatusCallback,
    GetPartnerSecureData,
    GetPartnerData,
    GetTcpPort,
    GetClientInfo,
    RegisterClientInfoCallback,
    RegisterNetworkStatusCallback,
    GetOverrideUri,
    GetSessionInfo,
    GetAdditionalSupportedTitles,
    OpenUrlOnClient,
}

impl CommandKind {
    /// All commands, in wire-protocol documentation order.
    pub const ALL: [CommandKind; 25] = [
        CommandKind::Init,
        CommandKind::Shutdown,
        CommandKind::IsRunningInCloud,
        CommandKind::IsRunningInCloudSecure,
        CommandKind::CloudCheckWithValidation,
        CommandKind::CloudCheckNoValidation,
        CommandKind::IsTitleAvailable,
        CommandKind::GetAvailableTitles,
        CommandKind::StreamAction,
        CommandKind::SendMessage,
        CommandKind::RegisterMessageCallback,
        CommandKind::GetClientIp,
        CommandKind::GetClientCountryCode,
        CommandKind::GetClientLanguageCode,
        CommandKind::RegisterStreamStatusCallback,
        CommandKind::GetPartnerSecureData,
        CommandKind::GetPartnerData,
        CommandKind::GetTcpPort,
        CommandKind::GetClientInfo,
        CommandKind::RegisterClientInfoCallback,
        CommandKind::RegisterNetworkStatusCallback,
        CommandKind::GetOverrideUri,
        CommandKind::GetSessionInfo,
        CommandKind::GetAdditionalSupportedTitles,
        CommandKind::OpenUrlOnClient,
    ];

    /// Wire name as it appears in the `"command"` field.
    pub fn name(self) -> &'static str {
        match self {
            CommandKind::Init => "init",
            CommandKind::Shutdown => "shutdown",
            CommandKind::IsRunningInCloud => "isRunningInCloud",
            CommandKind::IsRunningInCloudSecure => "isRunningInCloudSecure",
            CommandKind::CloudCheckWithValidation => "cloudCheckWithValidation",
            CommandKind::CloudCheckNoValidation => "cloudCheckNoValidation",
            CommandKind::IsTitleAvailable => "isTitleAvailable",
            CommandKind::GetAvailableTitles => "getAvailableTitles",
            CommandKind::StreamAction => "streamAction",
            CommandKind::SendMessage => "sendMessage",
            CommandKind::RegisterMessageCallback => "registerMessageCallback",
            CommandKind::GetClientIp => "getClientIp",
            CommandKind::GetClientCountryCode => "getClientCountryCode",
            CommandKind::GetClientLanguageCode => "getClientLanguageCode",
            CommandKind::RegisterStreamStatusCallback => "registerStreamStatusCallback",
            CommandKind::GetPartnerSecureData => "getPartnerSecureData",
            CommandKind::GetPartnerData => "getPartnerData",
            CommandKind::GetTcpPort => "getTcpPort",
            CommandKind::GetClientInfo => "getClientInfo",
            CommandKind::RegisterClientInfoCallback => "registerClientInfoCallback",
            CommandKind::RegisterNetworkStatusCallback => "registerNetworkStatusCallback",
            CommandKind::GetOverrideUri => "getOverrideUri",
            CommandKind::GetSessionInfo => "getSessionInfo",
            CommandKind::GetAdditionalSupportedTitles => "getAdditionalSupportedTitles",
            CommandKind::OpenUrlOnClient => "openUrlOnClient",
        }
    }

    /// Looks up a wire name. `None` means the command belongs to someone
    /// else — the caller must stay silent rather than answer with an error.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|kind| kind.name() == name)
    }
}

/// A parsed bridge request: a known command plus its raw parameter map.
///
/// Parameter extraction stays lazy on purpose. Which fields are required —
/// and what happens when one is missing — is per-command dispatcher logic,
/// not a parsing concern.
#[derive(Debug, Clone)]
pub struct CommandRequest {
    pub kind: CommandKind,
    pub params: Map<String, Value>,
}

impl CommandRequest {
    /// Parses one raw request frame.
    pub fn parse(raw: &str) -> Result<Self, RequestError> {
        let value: Value = serde_json::from_str(raw)?;
        let Value::Object(mut object) = value else {
            return Err(RequestError::NotAnObject);
        };
        let command = match object.remove("command") {
            Some(Value::String(name)) => name,
            _ => return Err(RequestError::MissingCommand),
        };
        let kind =
            CommandKind::from_name(&command).ok_or(RequestError::UnknownCommand(command))?;
        Ok(Self { kind, params: object })
    }

    /// Required string field. `None` when absent or not a string.
    pub fn str_field(&self, name: &str) -> Option<&str> {
        self.params.get(name).and_then(Value::as_str)
    }

    /// Required boolean field. `None` when absent or not a boolean.
    pub fn bool_field(&self, name: &str) -> Option<bool> {
        self.params.get(name).and_then(Value::as_bool)
    }

    /// Required unsigned integer field. `None` when absent, negative, or
    /// out of `u32` range.
    pub fn u32_field(&self, name: &str) -> Option<u32> {
        self.params
            .get(name)
            .and_then(Value::as_u64)
            .and_then(|n| u32::try_from(n).ok())
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
