//! The current producer.
//!
//! Instead of passing a [`TraceBuffer`] around, an application can install
//! one as the *current* buffer and trace through the free functions of this
//! module. Without the `threaded` feature a single buffer is shared by the
//! whole process behind a mutex. With it, every thread has its own slot, so
//! every thread writes its own trace file and no locking happens at all; the
//! buffer of a thread is closed (STOP record and flush) when the thread exits.
//!
//! Tracing through this module never fails: errors are logged and the call
//! has no effect. Calls made before [`init`] are ignored.

use crate::buffer::TraceBuffer;
use crate::clock::Clock;
use crate::codec::{EncodeError, FieldValue};
use crate::config::BufferConfig;
use crate::protocol::EventCodec;

#[cfg(feature = "threaded")]
mod slot {
    use crate::buffer::TraceBuffer;
    use std::cell::RefCell;

    thread_local! {
        static CURRENT: RefCell<Option<TraceBuffer>> = RefCell::new(None);
    }

    /// `None` if the slot is already borrowed further up the stack or the
    /// thread is shutting down.
    pub(super) fn with_slot<R>(f: impl FnOnce(&mut Option<TraceBuffer>) -> R) -> Option<R> {
        CURRENT
            .try_with(|slot| slot.try_borrow_mut().ok().map(|mut slot| f(&mut slot)))
            .ok()
            .flatten()
    }
}

#[cfg(not(feature = "threaded"))]
mod slot {
    use crate::buffer::TraceBuffer;
    use parking_lot::{const_mutex, Mutex};

    static CURRENT: Mutex<Option<TraceBuffer>> = const_mutex(None);

    pub(super) fn with_slot<R>(f: impl FnOnce(&mut Option<TraceBuffer>) -> R) -> Option<R> {
        Some(f(&mut CURRENT.lock()))
    }
}

/// Creates the trace file of producer `(id1, id2)` with the default clock
/// and the configuration from the environment, and makes it current.
pub fn init(id1: u64, id2: u64) {
    init_with(id1, id2, Clock::default(), &BufferConfig::from_env());
}

pub fn init_with(id1: u64, id2: u64, clock: Clock, config: &BufferConfig) {
    match TraceBuffer::create(id1, id2, clock, config) {
        Ok(buffer) => close_logged(install(buffer)),
        Err(err) => error!("[rastro] {}", err),
    }
}

/// Makes `buffer` current, returning the buffer it replaces.
pub fn install(buffer: TraceBuffer) -> Option<TraceBuffer> {
    with_slot(move |slot| slot.replace(buffer)).flatten()
}

/// Removes the current buffer without closing it.
pub fn take() -> Option<TraceBuffer> {
    with_slot(|slot| slot.take()).flatten()
}

/// Runs `f` with the current buffer. Returns `None` if there is none.
///
/// `f` must not trace through this module itself: with `threaded` the
/// nested call is ignored, without it the call deadlocks.
pub fn with_current<F, R>(f: F) -> Option<R>
where
    F: FnOnce(&mut TraceBuffer) -> R,
{
    with_slot(|slot| slot.as_mut().map(f)).flatten()
}

/// Runs an encoder against the current buffer, logging its error.
#[inline]
pub fn emit<F>(f: F)
where
    F: FnOnce(&mut TraceBuffer) -> Result<(), EncodeError>,
{
    if let Some(Err(err)) = with_current(f) {
        error!("[rastro] event dropped: {}", err);
    }
}

pub fn event(type_id: u16) {
    emit(|buffer| buffer.event(type_id))
}

pub fn record(type_id: u16, codec: &EventCodec, values: &[FieldValue<'_>]) {
    emit(|buffer| buffer.record(type_id, codec, values))
}

pub fn flush() {
    if let Some(Err(err)) = with_current(|buffer| buffer.flush()) {
        error!("[rastro] {}", err);
    }
}

/// Closes the current buffer: STOP record, flush, and file close.
pub fn finalize() {
    close_logged(take());
}

fn with_slot<R>(f: impl FnOnce(&mut Option<TraceBuffer>) -> R) -> Option<R> {
    slot::with_slot(f)
}

fn close_logged(buffer: Option<TraceBuffer>) {
    if let Some(Err(err)) = buffer.map(TraceBuffer::close) {
        error!("[rastro] closing trace buffer: {}", err);
    }
}
