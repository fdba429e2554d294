use crate::error::ReadError;
use crate::event::Event;
use crate::sync::{SyncDescription, SyncTime};
use rastro::{
    decode_record, DecodeError, FieldValue, ProtocolTable, EVENT_INIT, EVENT_STOP,
};
use serde::Serialize;
use std::fs;
use std::path::Path;

/// What the INIT record of a trace file says about its producer.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct TraceMetadata {
    pub id1: u64,
    pub id2: u64,
    pub hostname: String,
}

/// A trace file being decoded, one event at a time.
#[derive(Debug)]
pub struct TraceFile {
    name: String,
    /// Position in the owning session, copied into every event.
    file_id: usize,
    data: Vec<u8>,
    pos: usize,
    metadata: TraceMetadata,
    sync_time: SyncTime,
    protocol: Option<ProtocolTable>,
    t0: Option<u64>,
    resolution: u64,
    event: Event,
    finished: bool,
}

impl TraceFile {
    /// Reads the trace file at `path`. Its clock correction is looked up by
    /// host name in `sync`.
    pub fn open(path: &Path, sync: Option<&SyncDescription>) -> Result<TraceFile, ReadError> {
        let data = fs::read(path).map_err(|source| ReadError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        TraceFile::from_bytes(path.display().to_string(), data, sync)
    }

    /// Decodes a trace held in memory. `name` is used in error messages.
    pub fn from_bytes(
        name: impl Into<String>,
        data: Vec<u8>,
        sync: Option<&SyncDescription>,
    ) -> Result<TraceFile, ReadError> {
        let mut file = TraceFile {
            name: name.into(),
            file_id: 0,
            data,
            pos: 0,
            metadata: TraceMetadata {
                id1: 0,
                id2: 0,
                hostname: String::new(),
            },
            sync_time: SyncTime::IDENTITY,
            protocol: None,
            t0: None,
            resolution: 1,
            event: Event::default(),
            finished: false,
        };

        file.read_init()?;
        if let Some(sync) = sync {
            file.sync_time = sync.lookup(&file.metadata.hostname);
        }
        Ok(file)
    }

    /// Only accept records whose signature is part of `protocol`; others
    /// are reported as [`DecodeError::UnknownSignature`].
    pub fn with_protocol(mut self, protocol: ProtocolTable) -> TraceFile {
        self.protocol = Some(protocol);
        self
    }

    /// Overrides the clock correction selected from the sync description.
    pub fn with_sync_time(mut self, sync_time: SyncTime) -> TraceFile {
        self.sync_time = sync_time;
        self
    }

    fn read_init(&mut self) -> Result<(), ReadError> {
        let missing_init = || ReadError::MissingInit {
            file: self.name.clone(),
        };

        let (record, next) = decode_record(&self.data, 0).map_err(|_| missing_init())?;
        let metadata = match (record.type_id, record.values.as_slice()) {
            (
                EVENT_INIT,
                [FieldValue::Uint64(id1), FieldValue::Uint64(id2), FieldValue::String(hostname)],
            ) => TraceMetadata {
                id1: *id1,
                id2: *id2,
                hostname: hostname.to_string(),
            },
            _ => return Err(missing_init()),
        };

        let resync = record.time.resync;
        self.metadata = metadata;
        self.pos = next;
        if let Some(resync) = resync {
            self.t0 = Some(resync.seconds);
            self.resolution = resync.resolution;
        }
        Ok(())
    }

    /// Decodes the next event. Returns `None` at the STOP record, at the end of
    /// the data, and at a record that is cut short, as left behind by a
    /// producer that died while flushing.
    pub fn decode_next(&mut self) -> Result<Option<&Event>, ReadError> {
        loop {
            if self.finished || self.pos >= self.data.len() {
                self.finished = true;
                return Ok(None);
            }

            let offset = self.pos;
            let decoded = match &self.protocol {
                Some(protocol) => protocol.decode(&self.data, offset),
                None => decode_record(&self.data, offset),
            };
            let (record, next) = match decoded {
                Ok(decoded) => decoded,
                Err(DecodeError::Truncated { offset }) => {
                    debug!(
                        "{}: record at offset {} is truncated, treating it as end of stream",
                        self.name, offset
                    );
                    self.finished = true;
                    return Ok(None);
                }
                Err(source) => {
                    return Err(ReadError::Decode {
                        file: self.name.clone(),
                        source,
                    })
                }
            };
            self.pos = next;

            if let Some(resync) = record.time.resync {
                self.t0 = Some(resync.seconds);
                self.resolution = resync.resolution;
            }
            let t0 = self.t0.ok_or_else(|| ReadError::MissingTimeReference {
                file: self.name.clone(),
                offset,
            })?;
            let local_time = t0
                .checked_mul(self.resolution)
                .and_then(|ticks| ticks.checked_add(record.time.delta))
                .ok_or_else(|| ReadError::TimeOverflow {
                    file: self.name.clone(),
                    offset,
                })?;

            match record.type_id {
                // A repeated INIT carries nothing the reader needs.
                EVENT_INIT => continue,
                EVENT_STOP => {
                    self.finished = true;
                    return Ok(None);
                }
                _ => {}
            }

            let event = &mut self.event;
            event.fill_from(&record);
            event.file_id = self.file_id;
            event.id1 = self.metadata.id1;
            event.id2 = self.metadata.id2;
            event.local_time = local_time;
            event.resolution = self.resolution;
            event.global_time = self.sync_time.apply_ticks(local_time);
            event.timestamp = event.global_time as f64 / self.resolution as f64;
            return Ok(Some(&self.event));
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn metadata(&self) -> &TraceMetadata {
        &self.metadata
    }

    pub fn sync_time(&self) -> SyncTime {
        self.sync_time
    }

    /// Whether the end of the stream was reached.
    pub fn is_finished(&self) -> bool {
        self.finished
    }

    /// The event returned by the last successful `decode_next`.
    pub fn event(&self) -> &Event {
        &self.event
    }

    pub fn file_id(&self) -> usize {
        self.file_id
    }

    pub(crate) fn set_file_id(&mut self, file_id: usize) {
        self.file_id = file_id;
        self.event.file_id = file_id;
    }

    pub(crate) fn event_mut(&mut self) -> &mut Event {
        &mut self.event
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rastro::testing_common::manual_clock;
    use rastro::{BufferConfig, TraceBuffer};

    fn trace(build: impl FnOnce(&mut TraceBuffer)) -> Vec<u8> {
        let (clock, _) = manual_clock(1_000, 5_000);
        let config = BufferConfig::default().with_hostname("node-1");
        let mut buffer = TraceBuffer::new_in_memory(4, 2, clock, &config);
        build(&mut buffer);
        buffer.into_bytes().unwrap()
    }

    #[test]
    fn init_is_consumed_and_stop_ends_the_stream() {
        let bytes = trace(|buffer| {
            buffer.event(1).unwrap();
            buffer.event(2).unwrap();
        });

        let mut file = TraceFile::from_bytes("test", bytes, None).unwrap();
        assert_eq!(
            file.metadata(),
            &TraceMetadata {
                id1: 4,
                id2: 2,
                hostname: "node-1".to_string()
            }
        );

        let event = file.decode_next().unwrap().unwrap();
        assert_eq!((event.type_id, event.id1, event.id2), (1, 4, 2));
        assert_eq!(event.local_time, 5_000);
        assert_eq!(event.resolution, 1_000);
        assert_eq!(event.timestamp, 5.0);

        assert_eq!(file.decode_next().unwrap().unwrap().type_id, 2);
        assert!(file.decode_next().unwrap().is_none());
        assert!(file.is_finished());
        assert!(file.decode_next().unwrap().is_none());
    }

    #[test]
    fn missing_init_is_an_error() {
        assert!(matches!(
            TraceFile::from_bytes("empty", Vec::new(), None),
            Err(ReadError::MissingInit { .. })
        ));

        let bytes = trace(|buffer| buffer.event(1).unwrap());
        // Skip the INIT record (4 header + 16 resync + 8 delta + 16 ids + 8 "node-1").
        let without_init = bytes[52..].to_vec();
        assert!(matches!(
            TraceFile::from_bytes("headless", without_init, None),
            Err(ReadError::MissingInit { .. })
        ));
    }

    #[test]
    fn sync_is_selected_by_hostname() {
        let bytes = trace(|buffer| buffer.event(1).unwrap());
        let sync = SyncDescription::parse("node-0 3 0 0\nnode-1 2 1000 0\n").unwrap();

        let mut file = TraceFile::from_bytes("test", bytes, Some(&sync)).unwrap();
        assert_eq!(file.sync_time().a, 2.0);
        let event = file.decode_next().unwrap().unwrap();
        // (5000 - 1000) * 2 ticks of a millisecond clock.
        assert_eq!(event.timestamp, 8.0);
    }

    #[test]
    fn every_event_carries_the_producer_ids() {
        let bytes = trace(|buffer| {
            buffer.event(1).unwrap();
            buffer.event(2).unwrap();
        });
        let mut file = TraceFile::from_bytes("test", bytes, None).unwrap();
        file.set_file_id(3);

        // A replaced event, as left behind by a session swap.
        *file.event_mut() = Event::default();
        let event = file.decode_next().unwrap().unwrap();
        assert_eq!((event.type_id, event.file_id, event.id1, event.id2), (1, 3, 4, 2));

        *file.event_mut() = Event::default();
        let event = file.decode_next().unwrap().unwrap();
        assert_eq!((event.type_id, event.file_id, event.id1, event.id2), (2, 3, 4, 2));
    }

    #[test]
    fn corrupt_time_reference_is_an_error() {
        let mut bytes = trace(|buffer| buffer.event(1).unwrap());
        // Resync seconds of the INIT record follow its header word.
        bytes[4..12].copy_from_slice(&u64::MAX.to_le_bytes());

        let mut file = TraceFile::from_bytes("test", bytes, None).unwrap();
        assert!(matches!(
            file.decode_next(),
            Err(ReadError::TimeOverflow { offset: 52, .. })
        ));
    }

    #[test]
    fn unknown_field_code_is_a_hard_error() {
        let mut bytes = trace(|buffer| buffer.event(1).unwrap());
        // Put an undefined code into the first field slot (bits 12-15) of the
        // second record's header.
        bytes[53] |= 0x90;
        let mut file = TraceFile::from_bytes("test", bytes, None).unwrap();
        assert!(matches!(
            file.decode_next(),
            Err(ReadError::Decode {
                source: DecodeError::UnknownFieldCode { code: 9, .. },
                ..
            })
        ));
    }

    #[test]
    fn strict_mode_rejects_unknown_signatures() {
        let table = ProtocolTable::from_letters(&["i", "d"]).unwrap();
        let bytes = trace(|buffer| {
            buffer
                .record(1, table.get_letters("i").unwrap(), &[5u32.into()])
                .unwrap();
            buffer
                .record(2, table.get_letters("d").unwrap(), &[0.5f64.into()])
                .unwrap();
        });

        let consumer = ProtocolTable::from_letters(&["i"]).unwrap();
        let mut file = TraceFile::from_bytes("test", bytes, None)
            .unwrap()
            .with_protocol(consumer);
        assert_eq!(file.decode_next().unwrap().unwrap().v_uint32, vec![5]);
        assert!(matches!(
            file.decode_next(),
            Err(ReadError::Decode {
                source: DecodeError::UnknownSignature { .. },
                ..
            })
        ));
    }
}
