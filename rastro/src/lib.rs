//! This crate provides a library for lightweight, timestamped event tracing.
//!
//! Every producer (a thread, or any caller that owns a [`TraceBuffer`])
//! writes its events into a fixed-capacity in-memory buffer, which is
//! flushed to the producer's own trace file, `rastro-<id1>-<id2>.rst`.
//! Events have an application-chosen type id and a list of typed fields
//! described by a [`Signature`]; the header of every record identifies its
//! signature, so the files can be decoded without further context. Reading
//! them back is done with the `rastro_read` crate.
//!
//! # Writing events
//!
//! ```no_run
//! use rastro::{BufferConfig, Clock, ProtocolTable, TraceBuffer};
//!
//! let table = ProtocolTable::from_letters(&["wls"]).unwrap();
//! let codec = table.get_letters("wls").unwrap();
//!
//! let mut buffer = TraceBuffer::create(1, 0, Clock::default(), &BufferConfig::from_env()).unwrap();
//! buffer.event(10).unwrap();
//! buffer.record(11, codec, &[3u16.into(), 42u64.into(), "hello".into()]).unwrap();
//! buffer.close().unwrap();
//! ```
//!
//! Instead of the table-driven [`TraceBuffer::record`], applications usually
//! trace through encoders generated for their signatures by
//! [`generate::generate_module`] (or the `rastro_generate` tool), and may
//! use the [`current`] module instead of passing buffers around.

#[macro_use]
extern crate log;

// This is semantically `warn!` but uses `error!` because that's the only log
// level enabled by default.
macro_rules! really_warn {
    ($msg:literal $($rest:tt)*) => {
        error!(concat!("[WARNING] ", $msg) $($rest)*)
    }
}

mod buffer;
mod codec;
mod config;
mod header;
mod protocol;
mod signature;

pub mod clock;
pub mod current;
pub mod generate;
pub mod testing_common;
pub mod trigger;

pub use crate::buffer::{trace_file_name, BackingStorage, BufferStats, TraceBuffer, TraceError};
pub use crate::clock::Clock;
pub use crate::codec::{
    align4, decode_record, encode_record, encode_record_with, Arena, ArenaOverflow, ByteReader,
    DecodeError, EncodeError, FieldValue, Record, Resync, TimeBlock, MAX_EVENT_SIZE,
    RESYNC_INTERVAL,
};
pub use crate::config::{parse_capacity, BufferConfig, BUFFER_SIZE_ENV, DEFAULT_BUFFER_SIZE};
pub use crate::header::{
    header_words_len, Header, SignatureTag, EVENT_INIT, EVENT_STOP, EVENT_TYPE_MASK,
    MAX_EVENT_TYPE,
};
pub use crate::protocol::{compile, EventCodec, ProtocolError, ProtocolTable};
pub use crate::signature::{truncate_str, FieldType, Signature, MAX_FIELDS_PER_TYPE, MAX_STRLEN};
pub use crate::trigger::{request_flush, FlushHandle};
