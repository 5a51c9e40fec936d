//! The UDP request/retry/timeout state machine. Sans-I/O in spirit: this function owns only the
//! send/wait/retry loop; wire framing and USM live in the caller's
//! `validate` closure.

use crate::config::RequestConfig;
use crate::socket::AsyncSocket;
use snmp_core::{Result, SnmpError};
use std::net::SocketAddr;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::Notify;

/// Cooperative cancellation handle. Closing it aborts any in-flight
/// send/receive for requests sharing this handle with a terminated
/// `SocketTerminated` error.
#[derive(Clone)]
pub struct Cancellation {
    closed: Arc<AtomicBool>,
    notify: Arc<Notify>,
}

impl Cancellation {
    pub fn new() -> Self {
        Self { closed: Arc::new(AtomicBool::new(false)), notify: Arc::new(Notify::new()) }
    }

    pub fn close(&self) {
        self.closed.store(true, Ordering::SeqCst);
        self.notify.notify_waiters();
    }

    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::SeqCst)
    }

    async fn wait_for_close(&self) {
        if self.is_closed() {
            return;
        }
        self.notify.notified().await;
    }
}

impl Default for Cancellation {
    fn default() -> Self {
        Self::new()
    }
}

/// Result of inspecting one received datagram against the outstanding
/// request.
pub enum Acceptance {
    /// Accept this datagram as the reply; stop waiting.
    Accept,
    /// Ignore silently and keep waiting for the real reply (wrong
    /// request-id, wrong source, stale reply —"Ordering").
    Drop,
}

/// Send `request` and wait for a reply, retrying on timeout up to
/// `config.max_attempts()` total attempts.
///
/// `validate` inspects each accepted-source datagram and returns whether
/// to accept it, drop it and keep waiting, or fail the whole request
/// outright (a malformed or authentication-rejected datagram is not
/// necessarily silently dropped —"decoding and USM errors are
/// fatal", so `validate` signals that via `Err`).
pub async fn request_reply<F>(
    socket: &AsyncSocket,
    request: &[u8],
    config: &RequestConfig,
    cancel: &Cancellation,
    mut validate: F,
) -> Result<Vec<u8>>
where
    F: FnMut(&[u8], SocketAddr) -> Result<Acceptance>,
{
    let mut attempt = 0u32;
    loop {
        if cancel.is_closed() {
            return Err(SnmpError::SocketTerminated);
        }
        socket.send(request).await.map_err(map_io_err)?;
        let deadline = tokio::time::Instant::now() + config.timeout();

        let outcome = 'wait: loop {
            let mut buf = [0u8; 65_536];
            tokio::select! {
                _ = cancel.wait_for_close() => break 'wait Err(SnmpError::SocketTerminated),
                res = tokio::time::timeout_at(deadline, socket.recv(&mut buf)) => {
                    match res {
                        Err(_elapsed) => break 'wait Ok(None),
                        Ok(Err(io_err)) => break 'wait Err(map_io_err(io_err)),
                        Ok(Ok((n, src))) => {
                            if config.check_source_address && src != socket.peer() {
                                continue;
                            }
                            match validate(&buf[..n], src) {
                                Ok(Acceptance::Accept) => break 'wait Ok(Some(buf[..n].to_vec())),
                                Ok(Acceptance::Drop) => continue,
                                Err(e) => break 'wait Err(e),
                            }
                        }
                    }
                }
            }
        };

        match outcome {
            Ok(Some(bytes)) => return Ok(bytes),
            Err(e) => return Err(e),
            Ok(None) => {
                attempt += 1;
                if attempt >= config.max_attempts() {
                    tracing::warn!("SNMP request to {} timed out after {} attempts", socket.peer(), attempt);
                    return Err(SnmpError::RequestTimedOut { attempts: attempt });
                }
                tracing::debug!("SNMP retry {} to {} after timeout", attempt, socket.peer());
            }
        }
    }
}

fn map_io_err(err: std::io::Error) -> SnmpError {
    match err.kind() {
        std::io::ErrorKind::ConnectionRefused => SnmpError::ConnectionRefused(err.to_string()),
        _ => SnmpError::Io(err),
    }
}
