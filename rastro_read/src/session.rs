use crate::error::ReadError;
use crate::event::Event;
use crate::file::TraceFile;
use crate::sync::SyncDescription;
use std::mem;
use std::path::Path;

/// Time-ordered replay of several trace files.
///
/// Every file with events left is *active* and holds its next event, already
/// decoded, as the sort key. [`Rastro::next_global_event`] returns the
/// pending event with the smallest corrected time, compared exactly in clock
/// ticks, ties going to the file added first, and decodes the next event of that file. A file whose
/// stream has ended is *drained* and never becomes active again.
#[derive(Debug, Default)]
pub struct Rastro {
    files: Vec<TraceFile>,
    /// Indices into `files`, in insertion order.
    active: Vec<usize>,
    drained: Vec<usize>,
    sync: Option<SyncDescription>,
    current: Event,
    /// Error hit while decoding ahead, returned by the next call.
    deferred_error: Option<ReadError>,
}

impl Rastro {
    pub fn new() -> Rastro {
        Rastro::default()
    }

    /// A session whose files get their clock correction from `sync`.
    pub fn with_sync(sync: SyncDescription) -> Rastro {
        Rastro {
            sync: Some(sync),
            ..Rastro::default()
        }
    }

    /// Opens the trace file at `path` and adds it. Returns its file id.
    pub fn open_file(&mut self, path: &Path) -> Result<usize, ReadError> {
        let file = TraceFile::open(path, self.sync.as_ref())?;
        self.add_file(file)
    }

    /// Adds a file and decodes its first event. Returns its file id.
    pub fn add_file(&mut self, mut file: TraceFile) -> Result<usize, ReadError> {
        let file_id = self.files.len();
        file.set_file_id(file_id);
        let has_event = file.decode_next()?.is_some();

        self.files.push(file);
        if has_event {
            self.active.push(file_id);
        } else {
            self.drained.push(file_id);
        }
        Ok(file_id)
    }

    /// The next event of all files in corrected time order, `None` once every
    /// file is drained. The event is valid until the next call.
    pub fn next_global_event(&mut self) -> Result<Option<&Event>, ReadError> {
        if let Some(err) = self.deferred_error.take() {
            return Err(err);
        }

        // `active` is in insertion order and `min_by` keeps the first of
        // equal elements, so ties go to the earlier file.
        let next = self
            .active
            .iter()
            .copied()
            .enumerate()
            .min_by(|&(_, a), &(_, b)| self.files[a].event().cmp_time(self.files[b].event()));

        let (slot, file_id) = match next {
            Some(next) => next,
            None => return Ok(None),
        };

        let file = &mut self.files[file_id];
        mem::swap(&mut self.current, file.event_mut());

        match file.decode_next() {
            Ok(Some(_)) => {}
            Ok(None) => self.drain(slot, file_id),
            Err(err) => {
                self.drain(slot, file_id);
                self.deferred_error = Some(err);
            }
        }

        Ok(Some(&self.current))
    }

    fn drain(&mut self, slot: usize, file_id: usize) {
        self.active.remove(slot);
        self.drained.push(file_id);
    }

    pub fn files(&self) -> &[TraceFile] {
        &self.files
    }

    pub fn active_files(&self) -> impl Iterator<Item = &TraceFile> + '_ {
        self.active.iter().map(move |&i| &self.files[i])
    }

    pub fn drained_files(&self) -> impl Iterator<Item = &TraceFile> + '_ {
        self.drained.iter().map(move |&i| &self.files[i])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sync::SyncTime;
    use rastro::testing_common::manual_clock;
    use rastro::{BufferConfig, TraceBuffer};

    /// A trace of a clock with one tick per second, with one event per
    /// `(local time, type id)`.
    fn trace(hostname: &str, id1: u64, events: &[(u64, u16)]) -> Vec<u8> {
        trace_with(hostname, (id1, 0), 1, events)
    }

    fn trace_with(hostname: &str, (id1, id2): (u64, u64), resolution: u64, events: &[(u64, u16)]) -> Vec<u8> {
        let (clock, time) = manual_clock(resolution, 0);
        let config = BufferConfig::default().with_hostname(hostname);
        let mut buffer = TraceBuffer::new_in_memory(id1, id2, clock, &config);
        for &(local, type_id) in events {
            time.set(local);
            buffer.event(type_id).unwrap();
        }
        buffer.into_bytes().unwrap()
    }

    fn replay(session: &mut Rastro) -> Vec<(u16, usize, f64)> {
        let mut order = Vec::new();
        while let Some(event) = session.next_global_event().unwrap() {
            order.push((event.type_id, event.file_id, event.timestamp));
        }
        order
    }

    #[test]
    fn multiplexed_replay_follows_corrected_time() {
        let a = trace("a", 1, &[(10, 1), (30, 2), (50, 3)]);
        let b = trace("b", 2, &[(5, 11), (25, 12)]);

        let mut sync = SyncDescription::new();
        sync.insert(
            "b",
            SyncTime {
                a: 2.0,
                loc0: 0,
                ref0: 100,
            },
        );

        let mut session = Rastro::with_sync(sync.clone());
        session
            .add_file(TraceFile::from_bytes("a", a, Some(&sync)).unwrap())
            .unwrap();
        session
            .add_file(TraceFile::from_bytes("b", b, Some(&sync)).unwrap())
            .unwrap();
        assert_eq!(session.active_files().count(), 2);

        assert_eq!(
            replay(&mut session),
            vec![
                (1, 0, 10.0),
                (2, 0, 30.0),
                (3, 0, 50.0),
                (11, 1, 110.0),
                (12, 1, 150.0),
            ]
        );
        assert_eq!(session.active_files().count(), 0);
        assert_eq!(session.drained_files().count(), 2);
        assert!(session.next_global_event().unwrap().is_none());
    }

    #[test]
    fn interleaving_and_ties() {
        let a = trace("a", 1, &[(1, 1), (4, 2), (6, 3)]);
        let b = trace("b", 2, &[(1, 11), (2, 12), (6, 13), (9, 14)]);

        let mut session = Rastro::new();
        session.add_file(TraceFile::from_bytes("a", a, None).unwrap()).unwrap();
        session.add_file(TraceFile::from_bytes("b", b, None).unwrap()).unwrap();

        let types: Vec<u16> = replay(&mut session).iter().map(|e| e.0).collect();
        assert_eq!(types, vec![1, 11, 12, 2, 3, 13, 14]);
    }

    #[test]
    fn replayed_events_keep_their_origin() {
        let a = trace_with("a", (10, 11), 1, &[(1, 1), (3, 2), (5, 3)]);
        let b = trace_with("b", (20, 21), 1, &[(2, 11), (4, 12), (6, 13)]);

        let mut session = Rastro::new();
        session.add_file(TraceFile::from_bytes("a", a, None).unwrap()).unwrap();
        session.add_file(TraceFile::from_bytes("b", b, None).unwrap()).unwrap();

        let mut origins = Vec::new();
        while let Some(event) = session.next_global_event().unwrap() {
            origins.push((event.type_id, event.file_id, event.id1, event.id2));
        }
        assert_eq!(
            origins,
            vec![
                (1, 0, 10, 11),
                (11, 1, 20, 21),
                (2, 0, 10, 11),
                (12, 1, 20, 21),
                (3, 0, 10, 11),
                (13, 1, 20, 21),
            ]
        );
    }

    #[test]
    fn nanosecond_clocks_are_ordered_exactly() {
        let epoch = 1_700_000_000_000_000_000;
        let a = trace_with("a", (1, 0), 1_000_000_000, &[(epoch + 100, 1), (epoch + 300, 3)]);
        let b = trace_with("b", (2, 0), 1_000_000_000, &[(epoch, 2), (epoch + 200, 4)]);

        let mut session = Rastro::new();
        session.add_file(TraceFile::from_bytes("a", a, None).unwrap()).unwrap();
        session.add_file(TraceFile::from_bytes("b", b, None).unwrap()).unwrap();

        let types: Vec<u16> = replay(&mut session).iter().map(|e| e.0).collect();
        assert_eq!(types, vec![2, 1, 4, 3]);
    }

    #[test]
    fn empty_file_is_drained_at_once() {
        let empty = trace("a", 1, &[]);
        let mut session = Rastro::new();
        session.add_file(TraceFile::from_bytes("a", empty, None).unwrap()).unwrap();

        assert_eq!(session.active_files().count(), 0);
        assert_eq!(session.drained_files().count(), 1);
        assert!(session.next_global_event().unwrap().is_none());
    }

    #[test]
    fn decode_error_is_reported_after_the_pending_event() {
        let mut bytes = trace("a", 1, &[(1, 1), (2, 2)]);
        // INIT of host "a" is 48 bytes and every following event 12; corrupt
        // the first field code of the second event.
        bytes[48 + 12 + 1] |= 0x90;

        let mut session = Rastro::new();
        session.add_file(TraceFile::from_bytes("a", bytes, None).unwrap()).unwrap();

        assert_eq!(session.next_global_event().unwrap().unwrap().type_id, 1);
        assert!(session.next_global_event().is_err());
        assert!(session.next_global_event().unwrap().is_none());
    }
}
