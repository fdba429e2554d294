//! Out-of-band flush requests.
//!
//! Requesting a flush only touches atomics, so both [`request_flush`] and
//! [`FlushHandle::request`] may be called from a signal handler or from any
//! other thread. The buffers act on the request at their next record or
//! [`TraceBuffer::poll_flush_request`](crate::TraceBuffer::poll_flush_request).

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;

static FLUSH_REQUESTS: AtomicUsize = AtomicUsize::new(0);

/// Asks every buffer in the process to flush.
pub fn request_flush() {
    FLUSH_REQUESTS.fetch_add(1, Ordering::Release);
}

#[inline]
pub(crate) fn flush_requests() -> usize {
    FLUSH_REQUESTS.load(Ordering::Acquire)
}

/// Requests a flush of one particular buffer.
#[derive(Clone, Debug, Default)]
pub struct FlushHandle {
    requested: Arc<AtomicBool>,
}

impl FlushHandle {
    pub(crate) fn new() -> FlushHandle {
        FlushHandle::default()
    }

    pub fn request(&self) {
        self.requested.store(true, Ordering::Release);
    }

    /// Returns whether a flush was requested and clears the request.
    #[inline]
    pub(crate) fn take(&self) -> bool {
        self.requested.swap(false, Ordering::AcqRel)
    }
}
