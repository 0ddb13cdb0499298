//! Infrastructure layer: the WebSocket transport and host diagnostics.
//!
//! Everything that touches sockets, files, or the tokio runtime lives here,
//! behind the application layer's `dispatch` entry point.

pub mod sdk_data;
pub mod ws_server;

pub use ws_server::{bind_listener, run_server};
