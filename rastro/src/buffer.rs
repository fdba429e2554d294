use crate::clock::Clock;
use crate::codec::{self, Arena, ArenaOverflow, EncodeError, FieldValue, TimeBlock, MAX_EVENT_SIZE};
use crate::config::BufferConfig;
use crate::header::{EVENT_INIT, EVENT_STOP, INIT_TAG, MAX_EVENT_TYPE};
use crate::protocol::EventCodec;
use crate::trigger::{self, FlushHandle};
use std::fmt::Debug;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

/// The `BackingStorage` is what the buffered records get flushed to.
pub trait BackingStorage: Write + Send + Debug {
    /// Everything written so far, for storages that keep it in memory.
    fn drain_bytes(&mut self) -> Option<Vec<u8>>;
}

impl BackingStorage for fs::File {
    fn drain_bytes(&mut self) -> Option<Vec<u8>> {
        None
    }
}

impl BackingStorage for Vec<u8> {
    fn drain_bytes(&mut self) -> Option<Vec<u8>> {
        Some(std::mem::take(self))
    }
}

#[derive(Debug, thiserror::Error)]
pub enum TraceError {
    #[error("cannot open file {}: {source}", path.display())]
    Create {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("error writing rastro file: {written} of {expected} bytes written")]
    ShortWrite {
        written: usize,
        expected: usize,
        #[source]
        source: Option<io::Error>,
    },

    #[error(transparent)]
    Encode(#[from] EncodeError),

    #[error(transparent)]
    Io(#[from] io::Error),
}

#[derive(Clone, Copy, Default, Debug, PartialEq, Eq)]
pub struct BufferStats {
    pub records: u64,
    pub records_dropped: u64,
    pub flushes: u64,
    pub bytes_written: u64,
    pub bytes_dropped: u64,
}

/// Name of the trace file of producer `(id1, id2)`.
pub fn trace_file_name(id1: u64, id2: u64) -> String {
    format!("rastro-{}-{}.rst", id1, id2)
}

/// The write buffer of one producer.
///
/// A `TraceBuffer` is owned by exactly one producer at a time; concurrency
/// comes from giving every thread its own buffer. Records are encoded
/// straight into a fixed-capacity arena which is flushed to the backing
/// storage when it gets close to full, on request, and on close.
#[derive(Debug)]
pub struct TraceBuffer {
    arena: Arena,
    storage: Box<dyn BackingStorage>,
    clock: Clock,
    /// Reference second of the records in the stream. `None` until the
    /// first record, and after bytes were lost in a failed flush.
    t0: Option<u64>,
    id1: u64,
    id2: u64,
    path: Option<PathBuf>,
    flush_handle: FlushHandle,
    seen_flush_requests: usize,
    overflow_warned: bool,
    stats: BufferStats,
    closed: bool,
}

impl TraceBuffer {
    /// Creates the trace file `rastro-<id1>-<id2>.rst` in the configured
    /// directory and writes its INIT record.
    pub fn create(
        id1: u64,
        id2: u64,
        clock: Clock,
        config: &BufferConfig,
    ) -> Result<TraceBuffer, TraceError> {
        let path = config.directory.join(trace_file_name(id1, id2));
        let file = create_file(&path).map_err(|source| TraceError::Create {
            path: path.clone(),
            source,
        })?;

        let mut buffer = TraceBuffer::new(Box::new(file), id1, id2, clock, config.capacity);
        buffer.path = Some(path);
        buffer.write_init(&config.hostname);
        Ok(buffer)
    }

    pub fn new_in_memory(id1: u64, id2: u64, clock: Clock, config: &BufferConfig) -> TraceBuffer {
        TraceBuffer::with_storage(Box::new(Vec::new()), id1, id2, clock, config)
    }

    pub fn with_storage(
        storage: Box<dyn BackingStorage>,
        id1: u64,
        id2: u64,
        clock: Clock,
        config: &BufferConfig,
    ) -> TraceBuffer {
        let mut buffer = TraceBuffer::new(storage, id1, id2, clock, config.capacity);
        buffer.write_init(&config.hostname);
        buffer
    }

    fn new(
        storage: Box<dyn BackingStorage>,
        id1: u64,
        id2: u64,
        clock: Clock,
        capacity: usize,
    ) -> TraceBuffer {
        TraceBuffer {
            arena: Arena::with_capacity(capacity),
            storage,
            clock,
            t0: None,
            id1,
            id2,
            path: None,
            flush_handle: FlushHandle::new(),
            seen_flush_requests: trigger::flush_requests(),
            overflow_warned: false,
            stats: BufferStats::default(),
            closed: false,
        }
    }

    fn write_init(&mut self, hostname: &str) {
        let (id1, id2) = (self.id1, self.id2);
        let result = self.append(EVENT_INIT, &INIT_TAG, |arena| {
            arena.put_u64(id1)?;
            arena.put_u64(id2)?;
            arena.put_str(hostname)
        });
        if let Err(err) = result {
            error!("[rastro] cannot write INIT record: {}", err);
        }
    }

    pub fn id1(&self) -> u64 {
        self.id1
    }

    pub fn id2(&self) -> u64 {
        self.id2
    }

    /// Path of the trace file, for file-backed buffers.
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    pub fn clock(&self) -> &Clock {
        &self.clock
    }

    pub fn capacity(&self) -> usize {
        self.arena.capacity()
    }

    /// Number of bytes waiting to be flushed.
    pub fn used(&self) -> usize {
        self.arena.len()
    }

    pub fn stats(&self) -> BufferStats {
        self.stats
    }

    /// A handle that requests a flush of this buffer from anywhere.
    pub fn flush_handle(&self) -> FlushHandle {
        self.flush_handle.clone()
    }

    /// Records an event that carries nothing but its type.
    pub fn event(&mut self, type_id: u16) -> Result<(), EncodeError> {
        check_type(type_id)?;
        self.append(type_id, &[], |_| Ok(()))
    }

    /// Records an event through the table-driven codec of its signature.
    pub fn record(
        &mut self,
        type_id: u16,
        codec: &EventCodec,
        values: &[FieldValue<'_>],
    ) -> Result<(), EncodeError> {
        check_type(type_id)?;
        codec::check_values(codec.signature(), values)?;
        self.append(type_id, codec.tag().words(), |arena| {
            values.iter().try_for_each(|value| value.put(arena))
        })
    }

    /// Records an event whose fields are written by `write_fields`.
    ///
    /// This is the entry point of generated encoders: `tag` must be the
    /// signature tag of exactly the fields `write_fields` puts into the
    /// arena, in order.
    #[inline]
    pub fn record_with<F>(&mut self, type_id: u16, tag: &[u32], write_fields: F) -> Result<(), EncodeError>
    where
        F: Fn(&mut Arena) -> Result<(), ArenaOverflow>,
    {
        check_type(type_id)?;
        self.append(type_id, tag, write_fields)
    }

    fn append<F>(&mut self, type_id: u16, tag: &[u32], write_fields: F) -> Result<(), EncodeError>
    where
        F: Fn(&mut Arena) -> Result<(), ArenaOverflow>,
    {
        self.poll_flush_request();

        let time = TimeBlock::new(self.clock.timestamp(), self.clock.resolution(), self.t0);

        // After every record at least `MAX_EVENT_SIZE` bytes are free or the
        // arena is empty, so a record only fails here if it is larger than
        // the whole arena.
        let result = codec::encode_record_with(&mut self.arena, type_id, tag, &time, write_fields);
        if let Err(err) = result {
            self.stats.records_dropped += 1;
            return Err(err);
        }

        if let Some(resync) = time.resync {
            self.t0 = Some(resync.seconds);
        }
        self.stats.records += 1;

        if self.arena.len() > self.arena.capacity().saturating_sub(MAX_EVENT_SIZE) {
            if !self.overflow_warned {
                really_warn!(
                    "buffer size exceeded, flushing to disk. Consider using a larger \
                     buffer size, defined by the environment variable RST_BUFFER_SIZE"
                );
                self.overflow_warned = true;
            }
            self.flush_logged();
        }

        Ok(())
    }

    /// Flushes if a flush was requested through [`trigger::request_flush`]
    /// or this buffer's [`FlushHandle`] since the last check. Returns whether
    /// a request was pending.
    pub fn poll_flush_request(&mut self) -> bool {
        let requests = trigger::flush_requests();
        let global = requests != self.seen_flush_requests;
        self.seen_flush_requests = requests;

        let requested = self.flush_handle.take() | global;
        if requested && !self.arena.is_empty() {
            self.flush_logged();
        }
        requested
    }

    fn flush_logged(&mut self) {
        if let Err(err) = self.flush() {
            error!("[rastro] {}", err);
        }
    }

    /// Writes the buffered bytes to the backing storage and empties the
    /// buffer.
    ///
    /// Partial writes are retried until everything is written. If the
    /// storage stops making progress the remaining bytes are dropped and
    /// reported; the buffer is empty afterwards in every case.
    pub fn flush(&mut self) -> Result<(), TraceError> {
        let expected = self.arena.len();
        let mut written = 0;
        let mut failure = None;

        while written < expected {
            match self.storage.write(&self.arena.as_bytes()[written..]) {
                Ok(0) => break,
                Ok(n) => written += n,
                Err(err) if err.kind() == io::ErrorKind::Interrupted => continue,
                Err(err) => {
                    failure = Some(err);
                    break;
                }
            }
        }

        self.arena.clear();
        self.stats.flushes += 1;
        self.stats.bytes_written += written as u64;

        if written < expected {
            self.stats.bytes_dropped += (expected - written) as u64;
            // The dropped bytes may hold the last resync block.
            self.t0 = None;
            return Err(TraceError::ShortWrite {
                written,
                expected,
                source: failure,
            });
        }

        Ok(())
    }

    /// Appends the STOP record, flushes, and closes the backing storage.
    pub fn close(mut self) -> Result<(), TraceError> {
        self.finish()
    }

    /// Closes an in-memory buffer and returns everything it wrote. This is
    /// meant for tests; file-backed buffers return `None`.
    pub fn into_bytes(mut self) -> Option<Vec<u8>> {
        if let Err(err) = self.finish() {
            error!("[rastro] {}", err);
        }
        self.storage.drain_bytes()
    }

    fn finish(&mut self) -> Result<(), TraceError> {
        if self.closed {
            return Ok(());
        }
        self.closed = true;

        self.append(EVENT_STOP, &[], |_| Ok(()))?;
        self.flush()?;
        self.storage.flush()?;
        Ok(())
    }
}

impl Drop for TraceBuffer {
    fn drop(&mut self) {
        if let Err(err) = self.finish() {
            error!("[rastro] {}", err);
        }
    }
}

fn check_type(type_id: u16) -> Result<(), EncodeError> {
    if type_id > MAX_EVENT_TYPE {
        return Err(EncodeError::TypeIdOutOfRange(type_id));
    }
    Ok(())
}

fn create_file(path: &Path) -> io::Result<fs::File> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::File::create(path)
}

// Make sure that `TraceBuffer` can be moved to the thread that owns it.
fn _assert_bounds() {
    fn assert_send<S: Send + 'static>() {}
    assert_send::<TraceBuffer>();
}
