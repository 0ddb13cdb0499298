//! Domain layer for cloudstream-bridge.
//!
//! Pure types only: the command vocabulary spoken by the browser UI and the
//! bridge configuration. Nothing here performs I/O, spawns tasks, or touches
//! the SDK — that keeps the vocabulary testable in isolation and portable
//! across transports.

pub mod commands;
pub mod config;

pub use commands::{CommandKind, CommandRequest, RequestError, MISSING_FIELD_ERROR};
pub use config::BridgeConfig;
