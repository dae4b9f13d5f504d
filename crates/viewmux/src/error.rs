//! Error types for viewmux.
//!
//! Routing itself is infallible: an unhandled single-responder message is
//! reported as non-conformance (the surface falls back to its default), and a
//! stale listener is silently skipped. What remains is the explicit
//! re-installation operation and the per-responder failures captured while a
//! broadcast continues past them.

use thiserror::Error;

use crate::message::DelegateMessage;

/// Errors from explicit proxy operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ProxyError {
    /// The observed surface has been dropped.
    #[error("the observed surface is no longer alive")]
    SurfaceGone,
}

/// One isolated responder failure captured during a broadcast pass.
///
/// A failing responder never suppresses delivery to the responders after it;
/// the failure is logged, recorded, and available from
/// [`DelegateProxy::take_broadcast_failures`](crate::DelegateProxy::take_broadcast_failures)
/// once the pass completes.
#[derive(Debug, Clone, Error)]
#[error("responder panicked while handling {message}: {detail}")]
pub struct BroadcastFailure {
    /// The notification being delivered when the responder failed.
    pub message: DelegateMessage,
    /// Text form of the panic payload.
    pub detail: String,
}
