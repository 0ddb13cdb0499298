//! Vendor status codes and stream lifecycle states.
//!
//! Every SDK entry point returns one of the vendor-defined [`SdkStatus`]
//! codes. The bridge never treats a non-success code as fatal: it logs the
//! code, stringifies it with [`SdkStatus::as_str`], and embeds it in the
//! `errorMessage` field of the JSON response. The string forms are part of
//! the UI-facing contract and must stay stable.

use serde::{Deserialize, Serialize};

// ── SDK status codes ──────────────────────────────────────────────────────────

/// Status code returned by every vendor SDK call.
///
/// The discriminant values mirror the vendor's C header so a vendor-backed
/// [`crate::runtime::StreamRuntime`] implementation can cast the raw return
/// code directly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(i32)]
pub enum SdkStatus {
    /// The call completed successfully.
    Success = 0,
    /// Initialization succeeded, but only client-side (off-seat) entry
    /// points are available. Treated as success by `init`.
    InitSuccessClientOnly = 1,
    /// SDK initialization failed outright.
    InitFailure = -1,
    /// The vendor runtime library could not be located or loaded.
    SdkLibraryNotFound = -2,
    /// A required parameter was null, empty, or out of range.
    InvalidParameter = -3,
    /// An internal vendor error with no more specific code.
    InternalError = -4,
    /// The entry point is not supported in this environment.
    UnsupportedApiCall = -5,
    /// The supplied authentication token was rejected.
    InvalidToken = -6,
    /// The call did not complete within the vendor's deadline.
    TimedOut = -7,
    /// A seat-only entry point was called outside the cloud environment.
    NotRunningInCloud = -8,
    /// The call is valid only in the opposite environment (seat vs client).
    CallWrongEnvironment = -9,
    /// A backing web API call failed inside the vendor runtime.
    WebApiFailed = -10,
    /// The streaming session failed to start or aborted.
    StreamFailure = -11,
    /// Stopping the streaming session failed.
    StreamStopFailure = -12,
    /// An entry point was called before `initialize`.
    ApiNotInitialized = -13,
    /// The vendor runtime refused the call due to rate limiting.
    Throttled = -14,
    /// The operation was canceled (usually by the user).
    Canceled = -15,
    /// The query completed but there is no data to return.
    NoData = -16,
}

impl SdkStatus {
    /// Stable string form embedded verbatim in `errorMessage` fields.
    pub fn as_str(self) -> &'static str {
        match self {
            SdkStatus::Success => "Success",
            SdkStatus::InitSuccessClientOnly => "InitSuccessClientOnly",
            SdkStatus::InitFailure => "InitFailure",
            SdkStatus::SdkLibraryNotFound => "SdkLibraryNotFound",
            SdkStatus::InvalidParameter => "InvalidParameter",
            SdkStatus::InternalError => "InternalError",
            SdkStatus::UnsupportedApiCall => "UnsupportedApiCall",
            SdkStatus::InvalidToken => "InvalidToken",
            SdkStatus::TimedOut => "TimedOut",
            SdkStatus::NotRunningInCloud => "NotRunningInCloud",
            SdkStatus::CallWrongEnvironment => "CallWrongEnvironment",
            SdkStatus::WebApiFailed => "WebApiFailed",
            SdkStatus::StreamFailure => "StreamFailure",
            SdkStatus::StreamStopFailure => "StreamStopFailure",
            SdkStatus::ApiNotInitialized => "ApiNotInitialized",
            SdkStatus::Throttled => "Throttled",
            SdkStatus::Canceled => "Canceled",
            SdkStatus::NoData => "NoData",
        }
    }

    /// `true` for the two codes `init` reports as overall success.
    pub fn is_init_success(self) -> bool {
        matches!(self, SdkStatus::Success | SdkStatus::InitSuccessClientOnly)
    }
}

impl std::fmt::Display for SdkStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ── Initialization mode ───────────────────────────────────────────────────────

/// How the SDK initialized.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InitMode {
    /// Full initialization — running on a cloud seat, all entry points live.
    Full,
    /// Client-only initialization — off-seat; seat-only queries will fail
    /// with [`SdkStatus::NotRunningInCloud`].
    ClientOnly,
}

impl InitMode {
    /// The status code the vendor reports for this mode.
    pub fn status(self) -> SdkStatus {
        match self {
            InitMode::Full => SdkStatus::Success,
            InitMode::ClientOnly => SdkStatus::InitSuccessClientOnly,
        }
    }
}

// ── Stream lifecycle states ───────────────────────────────────────────────────

/// Streaming session lifecycle state delivered through the stream status
/// callback.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StreamStatus {
    Init,
    NetworkTest,
    Authenticating,
    InQueue,
    LaunchingGame,
    StreamStarted,
    StreamFailure,
    StreamStopped,
    GameLaunched,
    GameLaunchFailed,
    /// A state this bridge version does not recognize.
    Unknown,
}

impl StreamStatus {
    /// Stable string form pushed to the UI in the `status` field.
    pub fn as_str(self) -> &'static str {
        match self {
            StreamStatus::Init => "Init",
            StreamStatus::NetworkTest => "NetworkTest",
            StreamStatus::Authenticating => "Authenticating",
            StreamStatus::InQueue => "InQueue",
            StreamStatus::LaunchingGame => "LaunchingGame",
            StreamStatus::StreamStarted => "StreamStarted",
            StreamStatus::StreamFailure => "StreamFailure",
            StreamStatus::StreamStopped => "StreamStopped",
            StreamStatus::GameLaunched => "GameLaunched",
            StreamStatus::GameLaunchFailed => "GameLaunchFailed",
            StreamStatus::Unknown => "Unknown",
        }
    }
}

impl std::fmt::Display for StreamStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ── Cloud assurance ───────────────────────────────────────────────────────────

/// Confidence level reported by the secure in-cloud check.
///
/// Serialized as its integer discriminant in the `assurance` response field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
#[repr(i32)]
pub enum CloudAssurance {
    /// Not running in the cloud environment.
    NotCloud = 0,
    /// In-cloud per unauthenticated heuristics only.
    Low = 1,
    /// In-cloud per signed environment data.
    Mid = 2,
    /// In-cloud with full attestation of the calling process.
    Max = 3,
}

impl CloudAssurance {
    /// Integer form written to the `assurance` response field.
    pub fn as_i32(self) -> i32 {
        self as i32
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
