//! Reading rastro trace files.
//!
//! A [`TraceFile`] decodes the records of one file into [`Event`]s, applying
//! the clock correction of its producer. A [`Rastro`] session merges several
//! files into a single stream ordered by corrected time:
//!
//! ```no_run
//! use rastro_read::{Rastro, SyncDescription};
//! use std::path::Path;
//!
//! let sync = SyncDescription::from_path(Path::new("sync.txt")).unwrap();
//! let mut session = Rastro::with_sync(sync);
//! session.open_file(Path::new("rastro-0-1.rst")).unwrap();
//! session.open_file(Path::new("rastro-1-1.rst")).unwrap();
//!
//! while let Some(event) = session.next_global_event().unwrap() {
//!     println!("{}", event);
//! }
//! ```

#[macro_use]
extern crate log;

mod error;
mod event;
mod file;
mod session;
mod sync;

pub use crate::error::ReadError;
pub use crate::event::Event;
pub use crate::file::{TraceFile, TraceMetadata};
pub use crate::session::Rastro;
pub use crate::sync::{SyncDescription, SyncTime};
