//! Cancellation: a shared abort token checked by the transport while bytes are
//! flowing. The caller (e.g. a Ctrl-C handler) sets it; the running transfer
//! stops with [`TransportError::Aborted`](crate::transport::TransportError::Aborted)
//! and every lock taken for it is released on the way out.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Cloneable abort flag. All clones observe the same state.
#[derive(Debug, Clone, Default)]
pub struct AbortToken(Arc<AtomicBool>);

impl AbortToken {
    pub fn new() -> Self {
        Self::default()
    }

    /// Request abort. Idempotent.
    pub fn abort(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    pub fn is_aborted(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}
