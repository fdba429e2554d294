//! Helpers shared by the tests of `rastro` and `rastro_read`.

use crate::buffer::BackingStorage;
use crate::clock::Clock;
use parking_lot::Mutex;
use std::io::{self, Write};
use std::path::PathBuf;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// Moves the time of a clock created by [`manual_clock`].
#[derive(Clone, Debug)]
pub struct ClockHandle {
    ticks: Arc<AtomicU64>,
}

impl ClockHandle {
    pub fn set(&self, ticks: u64) {
        self.ticks.store(ticks, Ordering::SeqCst);
    }

    pub fn advance(&self, ticks: u64) {
        self.ticks.fetch_add(ticks, Ordering::SeqCst);
    }

    pub fn get(&self) -> u64 {
        self.ticks.load(Ordering::SeqCst)
    }
}

/// A clock that stands still at `start` until moved through the handle.
pub fn manual_clock(resolution: u64, start: u64) -> (Clock, ClockHandle) {
    let ticks = Arc::new(AtomicU64::new(start));
    let source = ticks.clone();
    let clock = Clock::custom(move || source.load(Ordering::SeqCst), resolution);
    (clock, ClockHandle { ticks })
}

#[derive(Debug, Default)]
struct SharedStorageInner {
    bytes: Vec<u8>,
    max_write: Option<usize>,
    limit: Option<usize>,
    write_calls: usize,
}

/// In-memory storage that stays readable while a buffer owns a clone of it.
///
/// `with_max_write` makes every write call accept at most that many bytes;
/// `with_limit` stops accepting bytes once the total reaches the limit, so
/// that writes return `Ok(0)`.
#[derive(Clone, Debug, Default)]
pub struct SharedStorage {
    inner: Arc<Mutex<SharedStorageInner>>,
}

impl SharedStorage {
    pub fn new() -> SharedStorage {
        SharedStorage::default()
    }

    pub fn with_max_write(self, max_write: usize) -> SharedStorage {
        self.inner.lock().max_write = Some(max_write);
        self
    }

    pub fn with_limit(self, limit: usize) -> SharedStorage {
        self.inner.lock().limit = Some(limit);
        self
    }

    pub fn remove_limit(&self) {
        self.inner.lock().limit = None;
    }

    pub fn bytes(&self) -> Vec<u8> {
        self.inner.lock().bytes.clone()
    }

    pub fn write_calls(&self) -> usize {
        self.inner.lock().write_calls
    }
}

impl Write for SharedStorage {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let mut inner = self.inner.lock();
        inner.write_calls += 1;

        let mut n = buf.len();
        if let Some(max_write) = inner.max_write {
            n = n.min(max_write);
        }
        if let Some(limit) = inner.limit {
            n = n.min(limit.saturating_sub(inner.bytes.len()));
        }

        inner.bytes.extend_from_slice(&buf[..n]);
        Ok(n)
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl BackingStorage for SharedStorage {
    fn drain_bytes(&mut self) -> Option<Vec<u8>> {
        Some(std::mem::take(&mut self.inner.lock().bytes))
    }
}

/// An empty directory `test-tmp/<name>` for the files of one test.
pub fn test_dir(name: &str) -> PathBuf {
    let mut path = PathBuf::new();
    path.push("test-tmp");
    path.push(name);

    let _ = std::fs::remove_dir_all(&path);
    std::fs::create_dir_all(&path).unwrap();
    path
}
