//! Asynchronous event pushes from the SDK to the browser UI.
//!
//! The SDK invokes registered callbacks on threads it owns; the UI receives
//! frames through a per-session outbound channel. [`Responder`] is the
//! session end of that channel, and [`CallbackSlots`] holds one process-wide
//! responder per event category. Each `registerXxxCallback` command
//! overwrites its category's slot with the requesting session's responder —
//! the latest registrant wins, exactly one receiver per category.
//!
//! The JSON shape of each push is fixed by the UI contract and built by the
//! pure `*_event` functions so it can be asserted on without any channel
//! plumbing.

use std::sync::Mutex;

use cloudstream_core::runtime::{ClientInfoUpdate, NetworkStatusUpdate};
use cloudstream_core::StreamStatus;
use serde_json::{json, Value};
use tokio::sync::mpsc;
use tracing::debug;

// ── Responder ─────────────────────────────────────────────────────────────────

/// Handle for delivering JSON frames to one browser session.
///
/// Cloning is cheap; all clones feed the same session. Sending never blocks
/// — the session task pumps the channel into the WebSocket sink.
#[derive(Clone)]
pub struct Responder {
    tx: mpsc::UnboundedSender<String>,
}

impl Responder {
    pub fn new(tx: mpsc::UnboundedSender<String>) -> Self {
        Self { tx }
    }

    /// Serializes and queues one frame. Returns `false` when the session has
    /// gone away; callers drop the frame silently in that case.
    pub fn send(&self, payload: &Value) -> bool {
        self.tx.send(payload.to_string()).is_ok()
    }
}

// ── Registration slots ────────────────────────────────────────────────────────

/// Process-wide registration slots, one per subscribable event category.
///
/// SDK callbacks fire on SDK-owned threads, so every slot sits behind a
/// `Mutex`. Pushing through a slot whose session has disconnected is a no-op.
#[derive(Default)]
pub struct CallbackSlots {
    stream_status: Mutex<Option<Responder>>,
    network_status: Mutex<Option<Responder>>,
    client_info: Mutex<Option<Responder>>,
    message: Mutex<Option<Responder>>,
}

impl CallbackSlots {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_stream_status(&self, responder: Responder) {
        *self.stream_status.lock().unwrap() = Some(responder);
    }

    pub fn set_network_status(&self, responder: Responder) {
        *self.network_status.lock().unwrap() = Some(responder);
    }

    pub fn set_client_info(&self, responder: Responder) {
        *self.client_info.lock().unwrap() = Some(responder);
    }

    pub fn set_message(&self, responder: Responder) {
        *self.message.lock().unwrap() = Some(responder);
    }

    /// Returns `true` when the event reached a live session.
    pub fn push_stream_status(&self, status: StreamStatus) -> bool {
        self.push(&self.stream_status, stream_status_event(status))
    }

    pub fn push_network_update(&self, update: &NetworkStatusUpdate) -> bool {
        match network_status_event(update) {
            Some(event) => self.push(&self.network_status, event),
            None => false,
        }
    }

    pub fn push_client_info_update(&self, update: &ClientInfoUpdate) -> bool {
        match client_info_event(update) {
            Some(event) => self.push(&self.client_info, event),
            None => false,
        }
    }

    pub fn push_message(&self, message: &str) -> bool {
        self.push(&self.message, message_event(message))
    }

    fn push(&self, slot: &Mutex<Option<Responder>>, event: Value) -> bool {
        match slot.lock().unwrap().as_ref() {
            Some(responder) => {
                let delivered = responder.send(&event);
                if !delivered {
                    debug!(?event, "dropping event push, session closed");
                }
                delivered
            }
            None => false,
        }
    }
}

// ── Event payload builders ────────────────────────────────────────────────────

/// Stream lifecycle transition push.
pub fn stream_status_event(status: StreamStatus) -> Value {
    json!({ "status": status.as_str() })
}

/// Network telemetry push. `None` for update kinds the UI contract does not
/// carry.
pub fn network_status_event(update: &NetworkStatusUpdate) -> Option<Value> {
    match update {
        NetworkStatusUpdate::RtdAverageLatency { latency_ms } => {
            Some(json!({ "rtd": latency_ms }))
        }
        _ => None,
    }
}

/// Client telemetry push. Key names are fixed by the UI contract.
pub fn client_info_event(update: &ClientInfoUpdate) -> Option<Value> {
    match update {
        ClientInfoUpdate::Os(os_type) => Some(json!({ "os": os_type })),
        ClientInfoUpdate::Ip(ip) => Some(json!({ "IP Changed": ip })),
        ClientInfoUpdate::Resolution(res) => Some(json!({
            "clientResolutionWidth": res.width,
            "clientResolutionHeight": res.height,
        })),
        ClientInfoUpdate::SafeZone(zone) => Some(json!({
            "SafeZone.left": zone.left,
            "SafeZone.top": zone.top,
            "SafeZone.right": zone.right,
            "SafeZone.bottom": zone.bottom,
            "SafeZone.normalized": zone.normalized,
        })),
        _ => None,
    }
}

/// Seat-to-UI application message push.
pub fn message_event(message: &str) -> Value {
    json!({ "message": message })
}

// ── Tests ─────────────────────────────────────────────────────────────────────
