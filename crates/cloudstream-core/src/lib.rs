//! cloudstream-core: the streaming-SDK boundary.
//!
//! This crate defines everything the bridge needs to talk to the vendor
//! cloud-streaming runtime without depending on the vendor library itself:
//!
//! ```text
//! [cloudstream-core]
//!   ├── status/       SdkStatus codes, StreamStatus lifecycle states
//!   ├── runtime/      The StreamRuntime trait + typed SDK data
//!   ├── attestation/  Cloud-check nonce generation and verification
//!   ├── mock/         Recording test double for StreamRuntime
//!   └── sim/          Deterministic off-seat runtime for local runs
//! ```
//!
//! The vendor SDK is an opaque external dependency with a fixed call
//! contract. [`runtime::StreamRuntime`] is that contract expressed as a
//! trait: one method per SDK entry point the bridge dispatches to, plus the
//! four event-callback registrations. A vendor-backed implementation lives
//! behind this trait in deployments that link the real library; everything
//! in this workspace is written against the trait only.

pub mod attestation;
pub mod mock;
pub mod runtime;
pub mod sim;
pub mod status;

pub use runtime::{SdkError, SdkResult, StreamRuntime};
pub use status::{CloudAssurance, InitMode, SdkStatus, StreamStatus};
