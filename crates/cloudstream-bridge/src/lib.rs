//! cloudstream-bridge library crate.
//!
//! This crate bridges a browser-hosted launcher UI to the vendor
//! cloud-streaming runtime: JSON command requests arrive over WebSocket,
//! are dispatched to one [`cloudstream_core::StreamRuntime`] call each, and
//! the typed result is marshalled back into a JSON response delivered
//! asynchronously on the same session.
//!
//! # Architecture
//!
//! ```text
//! Browser UI (JSON over WebSocket)
//!         ↕
//! [cloudstream-bridge]
//!   ├── domain/           Pure types: command vocabulary, BridgeConfig
//!   ├── application/      Dispatcher + event push / registration slots
//!   └── infrastructure/
//!         ├── ws_server/  WebSocket accept loop (tokio-tungstenite)
//!         └── sdk_data/   Vendor SDK data-file diagnostics
//!         ↕
//! cloudstream-core (StreamRuntime trait → vendor SDK)
//! ```
//!
//! # Layer rules
//!
//! - `domain` has no I/O and no async.
//! - `application` depends on `domain` and `cloudstream-core` only.
//! - `infrastructure` owns `tokio` and `tungstenite`.

/// Domain layer: command vocabulary and configuration.
pub mod domain;

/// Application layer: command dispatch and event pushes.
pub mod application;

/// Infrastructure layer: WebSocket server and SDK data-file diagnostics.
pub mod infrastructure;
