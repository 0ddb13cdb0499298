//! WebSocket server: accept loop and per-session task management.
//!
//! This module is responsible for:
//!
//! 1. Binding a TCP listener on the configured address.
//! 2. Accepting incoming TCP connections from browser UIs.
//! 3. Upgrading each connection to a WebSocket session.
//! 4. Running two concurrent halves per session:
//!    - **Inbound**: reads text frames from the WebSocket and hands each one
//!      to the command dispatcher. Vendor SDK calls are synchronous, so each
//!      dispatch runs under `spawn_blocking` to keep the async workers free.
//!    - **Outbound**: pumps queued response frames and SDK event pushes from
//!      the session's channel into the WebSocket sink.
//! 5. Gracefully shutting down when the `running` flag is cleared.
//!
//! # Scalability
//!
//! Each browser session runs in its own Tokio task. The accept loop never
//! blocks: it accepts a connection and immediately spawns a task for it
//! before accepting the next one. Responses and event pushes share one
//! unbounded channel per session, so SDK callbacks firing on SDK-owned
//! threads never wait on socket I/O.

use std::net::SocketAddr;
use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc,
};
use std::time::Duration;

use anyhow::Context;
use futures_util::{SinkExt, StreamExt};
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::mpsc;
use tokio::time::timeout;
use tokio_tungstenite::{
    accept_async,
    tungstenite::{Error as WsError, Message as WsMessage},
};
use tracing::{debug, error, info, warn};

use crate::application::{dispatch, DispatchContext, Responder};

// ── Public API ────────────────────────────────────────────────────────────────

/// Binds the WebSocket TCP listener.
///
/// Binding is separate from [`run_server`] so the caller can read the
/// actually bound port (the `getTcpPort` command reports it) before building
/// the dispatch context.
///
/// # Errors
///
/// Returns an error if the listener cannot be bound (e.g., the port is
/// already in use or the process lacks permission to bind).
pub async fn bind_listener(addr: SocketAddr) -> anyhow::Result<TcpListener> {
    TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind WebSocket listener on {addr}"))
}

/// Runs the main WebSocket accept loop until `running` is set to `false`.
///
/// Each accepted connection is handed off to a dedicated Tokio task so that
/// one slow browser never blocks others.
pub async fn run_server(
    listener: TcpListener,
    ctx: Arc<DispatchContext>,
    running: Arc<AtomicBool>,
) -> anyhow::Result<()> {
    let local_addr = listener.local_addr().context("listener has no local address")?;
    info!("cloudstream bridge listening on {local_addr}");

    loop {
        if !running.load(Ordering::Relaxed) {
            info!("shutdown flag set; stopping accept loop");
            break;
        }

        // Short timeout on accept() so the loop can periodically re-check
        // the running flag even when no browsers are connecting.
        let accept_result = timeout(Duration::from_millis(200), listener.accept()).await;

        match accept_result {
            Ok(Ok((stream, peer_addr))) => {
                info!("new browser connection from {peer_addr}");
                let ctx = Arc::clone(&ctx);
                tokio::spawn(async move {
                    handle_browser_session(stream, peer_addr, ctx).await;
                });
            }
            Ok(Err(e)) => {
                // Transient accept error (e.g., out of file descriptors).
                // Log it and keep serving existing sessions.
                error!("accept error: {e}");
            }
            Err(_) => {
                // Timeout, no new connection in the last 200 ms.
            }
        }
    }

    Ok(())
}

// ── Per-session handler ───────────────────────────────────────────────────────

/// Top-level handler for a single browser WebSocket session.
///
/// Wraps [`run_session`] and logs the outcome; this is the entry point for
/// each per-session task spawned by [`run_server`].
async fn handle_browser_session(
    raw_stream: TcpStream,
    peer_addr: SocketAddr,
    ctx: Arc<DispatchContext>,
) {
    match run_session(raw_stream, peer_addr, ctx).await {
        Ok(()) => info!("session {peer_addr} closed normally"),
        Err(e) => warn!("session {peer_addr} closed with error: {e:#}"),
    }
}

/// Runs the complete lifecycle of a single browser WebSocket session.
///
/// 1. Completes the WebSocket upgrade handshake.
/// 2. Creates the session's outbound channel; its sender becomes the
///    [`Responder`] that command responses and event pushes flow through.
/// 3. Runs the inbound dispatch loop and the outbound pump concurrently;
///    the session ends when either side finishes.
async fn run_session(
    raw_stream: TcpStream,
    peer_addr: SocketAddr,
    ctx: Arc<DispatchContext>,
) -> anyhow::Result<()> {
    let ws_stream = accept_async(raw_stream)
        .await
        .with_context(|| format!("WebSocket handshake failed with {peer_addr}"))?;

    info!("WebSocket session established: {peer_addr}");

    let (mut ws_tx, mut ws_rx) = ws_stream.split();

    // All frames toward this browser funnel through one unbounded channel:
    // command responses from dispatch and event pushes from SDK threads.
    let (out_tx, mut out_rx) = mpsc::unbounded_channel::<String>();
    let responder = Responder::new(out_tx);

    let session_id = peer_addr.to_string();

    // ── Outbound pump ─────────────────────────────────────────────────────────
    let session_id_out = session_id.clone();
    let mut outbound_task = tokio::spawn(async move {
        while let Some(frame) = out_rx.recv().await {
            if ws_tx.send(WsMessage::Text(frame)).await.is_err() {
                debug!("session {session_id_out}: WebSocket send failed (browser disconnected)");
                break;
            }
        }
    });

    // ── Inbound dispatch loop ─────────────────────────────────────────────────
    let session_id_in = session_id.clone();
    let mut inbound_task = tokio::spawn(async move {
        loop {
            let ws_msg = match ws_rx.next().await {
                Some(Ok(msg)) => msg,
                Some(Err(WsError::ConnectionClosed | WsError::Protocol(_))) => {
                    debug!("session {session_id_in}: browser WebSocket closed normally");
                    break;
                }
                Some(Err(e)) => {
                    warn!("session {session_id_in}: browser WebSocket error: {e}");
                    break;
                }
                None => {
                    debug!("session {session_id_in}: browser stream ended");
                    break;
                }
            };

            match ws_msg {
                WsMessage::Text(raw) => {
                    // The vendor call contract is synchronous; run dispatch
                    // on the blocking pool so SDK stalls never starve the
                    // async workers.
                    let ctx = Arc::clone(&ctx);
                    let responder = responder.clone();
                    let joined =
                        tokio::task::spawn_blocking(move || dispatch(&ctx, &raw, &responder))
                            .await;
                    match joined {
                        Ok(handled) => {
                            if !handled {
                                debug!("session {session_id_in}: frame left unhandled");
                            }
                        }
                        Err(e) => {
                            error!("session {session_id_in}: dispatch task panicked: {e}");
                            break;
                        }
                    }
                }

                WsMessage::Binary(_) => {
                    // The browser-facing protocol is JSON text only.
                    warn!("session {session_id_in}: unexpected binary WebSocket frame (ignored)");
                }

                WsMessage::Ping(data) => {
                    // tokio-tungstenite answers the Pong automatically.
                    debug!("session {session_id_in}: WebSocket ping ({} bytes)", data.len());
                }

                WsMessage::Pong(_) => {
                    debug!("session {session_id_in}: WebSocket pong received");
                }

                WsMessage::Close(_) => {
                    debug!("session {session_id_in}: WebSocket Close frame received");
                    break;
                }

                WsMessage::Frame(_) => {
                    debug!("session {session_id_in}: raw frame (ignored)");
                }
            }
        }
    });

    // The session is over when either half finishes. The other half must be
    // aborted explicitly — dropping a JoinHandle only detaches the task — so
    // the outbound receiver drops and later event pushes see a closed session.
    tokio::select! {
        _ = &mut outbound_task => {
            debug!("session {session_id}: outbound pump ended");
            inbound_task.abort();
        }
        _ = &mut inbound_task => {
            debug!("session {session_id}: inbound loop ended");
            outbound_task.abort();
        }
    }

    Ok(())
}

// ── Tests ─────────────────────────────────────────────────────────────────────
