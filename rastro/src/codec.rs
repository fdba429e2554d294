//! The record layout shared by writers and readers.
//!
//! A record is laid out as
//!
//! ```text
//! header words (u32, see `header`)
//! [resync block: reference seconds (u64), resolution (u64)]
//! delta time (u64)
//! fields, in signature order
//! padding up to the next multiple of 4
//! ```
//!
//! Scalars are little-endian and written without padding. Strings are
//! NUL-terminated and followed by padding up to the next multiple of 4, so
//! the field after a string always starts 4-aligned.

use crate::header::{self, header_words_len, SignatureTag, EVENT_TYPE_MASK};
use crate::signature::{truncate_str, FieldType, Signature, MAX_FIELDS_PER_TYPE, MAX_STRLEN};
use memchr::memchr;
use smallvec::SmallVec;
use std::borrow::Cow;

/// Elapsed seconds after which a record carries a new reference time.
pub const RESYNC_INTERVAL: u64 = 3600;

const MAX_FIELDS: usize = MAX_FIELDS_PER_TYPE * FieldType::ALL.len();

/// Upper bound for the encoded size of any single record.
pub const MAX_EVENT_SIZE: usize = 4 * header_words_len(MAX_FIELDS)
    + 16
    + 8
    + MAX_FIELDS_PER_TYPE * (1 + 2 + 4 + 8 + 4 + 8)
    + MAX_FIELDS_PER_TYPE * (MAX_STRLEN + 3)
    + 3;

#[inline]
pub fn align4(offset: usize) -> usize {
    (offset + 3) & !3
}

#[derive(Clone, Copy, Eq, PartialEq, Debug, thiserror::Error)]
#[error("record does not fit: {needed} bytes needed, {available} available")]
pub struct ArenaOverflow {
    pub needed: usize,
    pub available: usize,
}

#[derive(Clone, Eq, PartialEq, Debug, thiserror::Error)]
pub enum EncodeError {
    #[error(transparent)]
    Overflow(#[from] ArenaOverflow),

    #[error("signature `{signature}` expects {expected} fields, got {found}")]
    FieldCount {
        signature: String,
        expected: usize,
        found: usize,
    },

    #[error("field {position} of signature `{signature}` is {expected:?}, got {found:?}")]
    FieldMismatch {
        signature: String,
        position: usize,
        expected: FieldType,
        found: FieldType,
    },

    #[error("event type {0:#x} is out of range")]
    TypeIdOutOfRange(u16),
}

#[derive(Clone, Eq, PartialEq, Debug, thiserror::Error)]
pub enum DecodeError {
    #[error("record at offset {offset} is truncated")]
    Truncated { offset: usize },

    #[error("no record header at offset {offset} (found {word:#010x})")]
    MissingMarker { offset: usize, word: u32 },

    #[error("unknown field type code {code} in header at offset {offset}")]
    UnknownFieldCode { offset: usize, code: u8 },

    #[error("signature `{signature}` of record at offset {offset} is not part of the protocol")]
    UnknownSignature { offset: usize, signature: String },
}

/// A fixed-capacity byte arena with a write cursor.
///
/// All `put_*` operations are bounds-checked and leave the arena unchanged
/// when the value does not fit.
#[derive(Debug)]
pub struct Arena {
    bytes: Box<[u8]>,
    pos: usize,
}

impl Arena {
    pub fn with_capacity(capacity: usize) -> Arena {
        Arena {
            bytes: vec![0; capacity].into_boxed_slice(),
            pos: 0,
        }
    }

    pub fn capacity(&self) -> usize {
        self.bytes.len()
    }

    pub fn len(&self) -> usize {
        self.pos
    }

    pub fn is_empty(&self) -> bool {
        self.pos == 0
    }

    pub fn remaining(&self) -> usize {
        self.bytes.len() - self.pos
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes[..self.pos]
    }

    pub fn clear(&mut self) {
        self.pos = 0;
    }

    pub(crate) fn truncate(&mut self, len: usize) {
        if len < self.pos {
            self.pos = len;
        }
    }

    #[inline]
    pub fn put_bytes(&mut self, bytes: &[u8]) -> Result<(), ArenaOverflow> {
        let end = self.reserve(bytes.len())?;
        self.bytes[self.pos..end].copy_from_slice(bytes);
        self.pos = end;
        Ok(())
    }

    #[inline]
    fn reserve(&self, num_bytes: usize) -> Result<usize, ArenaOverflow> {
        match self.pos.checked_add(num_bytes) {
            Some(end) if end <= self.bytes.len() => Ok(end),
            _ => Err(ArenaOverflow {
                needed: num_bytes,
                available: self.remaining(),
            }),
        }
    }

    #[inline]
    pub fn put_u8(&mut self, value: u8) -> Result<(), ArenaOverflow> {
        self.put_bytes(&[value])
    }

    #[inline]
    pub fn put_u16(&mut self, value: u16) -> Result<(), ArenaOverflow> {
        self.put_bytes(&value.to_le_bytes())
    }

    #[inline]
    pub fn put_u32(&mut self, value: u32) -> Result<(), ArenaOverflow> {
        self.put_bytes(&value.to_le_bytes())
    }

    #[inline]
    pub fn put_u64(&mut self, value: u64) -> Result<(), ArenaOverflow> {
        self.put_bytes(&value.to_le_bytes())
    }

    #[inline]
    pub fn put_f32(&mut self, value: f32) -> Result<(), ArenaOverflow> {
        self.put_bytes(&value.to_le_bytes())
    }

    #[inline]
    pub fn put_f64(&mut self, value: f64) -> Result<(), ArenaOverflow> {
        self.put_bytes(&value.to_le_bytes())
    }

    /// Writes `s` (truncated to fit a string field) with its NUL terminator
    /// and aligns the cursor.
    pub fn put_str(&mut self, s: &str) -> Result<(), ArenaOverflow> {
        let full_len = s.len();
        let s = truncate_str(s);
        if s.len() != full_len {
            debug!("string field of {} bytes truncated to {}", full_len, s.len());
        }
        let end = align4(self.pos + s.len() + 1);
        self.reserve(end - self.pos)?;

        self.bytes[self.pos..self.pos + s.len()].copy_from_slice(s.as_bytes());
        for byte in &mut self.bytes[self.pos + s.len()..end] {
            *byte = 0;
        }
        self.pos = end;
        Ok(())
    }

    /// Zero-pads up to the next multiple of 4.
    pub fn align(&mut self) -> Result<(), ArenaOverflow> {
        let end = align4(self.pos);
        self.reserve(end - self.pos)?;
        for byte in &mut self.bytes[self.pos..end] {
            *byte = 0;
        }
        self.pos = end;
        Ok(())
    }
}

/// A cursor over encoded bytes. Running out of bytes is reported as
/// `DecodeError::Truncated` for the record being read.
pub struct ByteReader<'a> {
    data: &'a [u8],
    pos: usize,
    record_start: usize,
}

impl<'a> ByteReader<'a> {
    pub fn new(data: &'a [u8], pos: usize) -> ByteReader<'a> {
        ByteReader {
            data,
            pos,
            record_start: pos,
        }
    }

    pub fn position(&self) -> usize {
        self.pos
    }

    fn take(&mut self, n: usize) -> Result<&'a [u8], DecodeError> {
        let end = self
            .pos
            .checked_add(n)
            .filter(|&end| end <= self.data.len())
            .ok_or(DecodeError::Truncated {
                offset: self.record_start,
            })?;
        let bytes = &self.data[self.pos..end];
        self.pos = end;
        Ok(bytes)
    }

    fn array<const N: usize>(&mut self) -> Result<[u8; N], DecodeError> {
        let mut array = [0; N];
        array.copy_from_slice(self.take(N)?);
        Ok(array)
    }

    pub fn u8(&mut self) -> Result<u8, DecodeError> {
        Ok(self.take(1)?[0])
    }

    pub fn u16(&mut self) -> Result<u16, DecodeError> {
        self.array().map(u16::from_le_bytes)
    }

    pub fn u32(&mut self) -> Result<u32, DecodeError> {
        self.array().map(u32::from_le_bytes)
    }

    pub fn u64(&mut self) -> Result<u64, DecodeError> {
        self.array().map(u64::from_le_bytes)
    }

    pub fn f32(&mut self) -> Result<f32, DecodeError> {
        self.array().map(f32::from_le_bytes)
    }

    pub fn f64(&mut self) -> Result<f64, DecodeError> {
        self.array().map(f64::from_le_bytes)
    }

    /// Reads a NUL-terminated string and skips the alignment padding after it.
    pub fn str(&mut self) -> Result<Cow<'a, str>, DecodeError> {
        let rest = &self.data[self.pos.min(self.data.len())..];
        let len = memchr(0, rest).ok_or(DecodeError::Truncated {
            offset: self.record_start,
        })?;
        let bytes = self.take(len)?;
        let padded_end = align4(self.pos + 1);
        self.take(padded_end - self.pos)?;
        Ok(String::from_utf8_lossy(bytes))
    }

    /// Skips the padding at the end of a record. The fill bytes may be cut
    /// off at the very end of the data.
    fn align_record(&mut self) {
        self.pos = align4(self.pos).min(self.data.len().max(self.pos));
    }
}

/// One field value, borrowed or owned.
#[derive(Clone, PartialEq, Debug)]
pub enum FieldValue<'a> {
    Uint8(u8),
    Uint16(u16),
    Uint32(u32),
    Uint64(u64),
    Float(f32),
    Double(f64),
    String(Cow<'a, str>),
}

impl<'a> FieldValue<'a> {
    pub fn field_type(&self) -> FieldType {
        match self {
            FieldValue::Uint8(_) => FieldType::Uint8,
            FieldValue::Uint16(_) => FieldType::Uint16,
            FieldValue::Uint32(_) => FieldType::Uint32,
            FieldValue::Uint64(_) => FieldType::Uint64,
            FieldValue::Float(_) => FieldType::Float,
            FieldValue::Double(_) => FieldType::Double,
            FieldValue::String(_) => FieldType::String,
        }
    }

    pub fn into_owned(self) -> FieldValue<'static> {
        match self {
            FieldValue::Uint8(v) => FieldValue::Uint8(v),
            FieldValue::Uint16(v) => FieldValue::Uint16(v),
            FieldValue::Uint32(v) => FieldValue::Uint32(v),
            FieldValue::Uint64(v) => FieldValue::Uint64(v),
            FieldValue::Float(v) => FieldValue::Float(v),
            FieldValue::Double(v) => FieldValue::Double(v),
            FieldValue::String(s) => FieldValue::String(Cow::Owned(s.into_owned())),
        }
    }

    pub(crate) fn put(&self, arena: &mut Arena) -> Result<(), ArenaOverflow> {
        match *self {
            FieldValue::Uint8(v) => arena.put_u8(v),
            FieldValue::Uint16(v) => arena.put_u16(v),
            FieldValue::Uint32(v) => arena.put_u32(v),
            FieldValue::Uint64(v) => arena.put_u64(v),
            FieldValue::Float(v) => arena.put_f32(v),
            FieldValue::Double(v) => arena.put_f64(v),
            FieldValue::String(ref s) => arena.put_str(s),
        }
    }

    pub(crate) fn read(
        reader: &mut ByteReader<'a>,
        field_type: FieldType,
    ) -> Result<FieldValue<'a>, DecodeError> {
        Ok(match field_type {
            FieldType::Uint8 => FieldValue::Uint8(reader.u8()?),
            FieldType::Uint16 => FieldValue::Uint16(reader.u16()?),
            FieldType::Uint32 => FieldValue::Uint32(reader.u32()?),
            FieldType::Uint64 => FieldValue::Uint64(reader.u64()?),
            FieldType::Float => FieldValue::Float(reader.f32()?),
            FieldType::Double => FieldValue::Double(reader.f64()?),
            FieldType::String => FieldValue::String(reader.str()?),
        })
    }
}

macro_rules! impl_from_scalar {
    ($($ty:ty => $variant:ident),*) => {
        $(
            impl From<$ty> for FieldValue<'_> {
                fn from(value: $ty) -> Self {
                    FieldValue::$variant(value)
                }
            }
        )*
    };
}

impl_from_scalar!(u8 => Uint8, u16 => Uint16, u32 => Uint32, u64 => Uint64, f32 => Float, f64 => Double);

impl<'a> From<&'a str> for FieldValue<'a> {
    fn from(value: &'a str) -> Self {
        FieldValue::String(Cow::Borrowed(value))
    }
}

impl From<String> for FieldValue<'static> {
    fn from(value: String) -> Self {
        FieldValue::String(Cow::Owned(value))
    }
}

/// A new reference time, embedded in a record.
#[derive(Clone, Copy, Eq, PartialEq, Debug)]
pub struct Resync {
    pub seconds: u64,
    pub resolution: u64,
}

/// The time information of a record.
#[derive(Clone, Copy, Eq, PartialEq, Debug)]
pub struct TimeBlock {
    pub resync: Option<Resync>,
    /// Ticks since the reference second.
    pub delta: u64,
}

impl TimeBlock {
    /// Computes the time block of `timestamp` relative to the reference
    /// second `t0`. A resync block is produced when there is no reference
    /// yet, when the clock went backwards, or when more than
    /// `RESYNC_INTERVAL` seconds have elapsed.
    pub fn new(timestamp: u64, resolution: u64, t0: Option<u64>) -> TimeBlock {
        let resolution = resolution.max(1);
        let seconds = timestamp / resolution;
        let precision = timestamp - seconds * resolution;

        match t0
            .and_then(|t0| seconds.checked_sub(t0))
            .filter(|&elapsed| elapsed <= RESYNC_INTERVAL)
        {
            Some(elapsed) => TimeBlock {
                resync: None,
                delta: elapsed * resolution + precision,
            },
            None => TimeBlock {
                resync: Some(Resync {
                    seconds,
                    resolution,
                }),
                delta: precision,
            },
        }
    }
}

/// A decoded record, borrowing its strings from the encoded data.
#[derive(Clone, PartialEq, Debug)]
pub struct Record<'a> {
    pub type_id: u16,
    pub signature: Signature,
    pub time: TimeBlock,
    pub values: SmallVec<[FieldValue<'a>; 8]>,
}

/// Encodes a record after checking `values` against `signature`. On error
/// nothing is left in the arena.
pub fn encode_record(
    arena: &mut Arena,
    type_id: u16,
    signature: &Signature,
    time: &TimeBlock,
    values: &[FieldValue<'_>],
) -> Result<(), EncodeError> {
    check_values(signature, values)?;

    let tag = SignatureTag::of(signature);
    encode_record_with(arena, type_id, tag.words(), time, |arena| {
        values.iter().try_for_each(|value| value.put(arena))
    })
}

/// Encodes a record whose fields are written by `write_fields`, which must
/// write exactly the fields described by `tag`. On error nothing is left in
/// the arena.
pub fn encode_record_with<F>(
    arena: &mut Arena,
    type_id: u16,
    tag: &[u32],
    time: &TimeBlock,
    write_fields: F,
) -> Result<(), EncodeError>
where
    F: FnOnce(&mut Arena) -> Result<(), ArenaOverflow>,
{
    if type_id > EVENT_TYPE_MASK {
        return Err(EncodeError::TypeIdOutOfRange(type_id));
    }

    let start = arena.len();
    let result = write_record(arena, type_id, tag, time, write_fields);
    if result.is_err() {
        arena.truncate(start);
    }
    result.map_err(EncodeError::from)
}

fn write_record<F>(
    arena: &mut Arena,
    type_id: u16,
    tag: &[u32],
    time: &TimeBlock,
    write_fields: F,
) -> Result<(), ArenaOverflow>
where
    F: FnOnce(&mut Arena) -> Result<(), ArenaOverflow>,
{
    header::write_header(arena, type_id, time.resync.is_some(), tag)?;
    if let Some(resync) = time.resync {
        arena.put_u64(resync.seconds)?;
        arena.put_u64(resync.resolution)?;
    }
    arena.put_u64(time.delta)?;
    write_fields(arena)?;
    arena.align()
}

pub(crate) fn check_values(signature: &Signature, values: &[FieldValue<'_>]) -> Result<(), EncodeError> {
    if signature.len() != values.len() {
        return Err(EncodeError::FieldCount {
            signature: signature.letters(),
            expected: signature.len(),
            found: values.len(),
        });
    }

    for (position, (&expected, value)) in signature.fields().iter().zip(values).enumerate() {
        if value.field_type() != expected {
            return Err(EncodeError::FieldMismatch {
                signature: signature.letters(),
                position,
                expected,
                found: value.field_type(),
            });
        }
    }

    Ok(())
}

/// Decodes the record starting at `pos`, returning it together with the
/// position of the next record.
pub fn decode_record(data: &[u8], pos: usize) -> Result<(Record<'_>, usize), DecodeError> {
    let mut reader = ByteReader::new(data, pos);
    let header = header::read_header(&mut reader)?;

    let resync = if header.resync {
        Some(Resync {
            seconds: reader.u64()?,
            resolution: reader.u64()?,
        })
    } else {
        None
    };
    let delta = reader.u64()?;

    let values = header
        .signature
        .fields()
        .iter()
        .map(|&field_type| FieldValue::read(&mut reader, field_type))
        .collect::<Result<SmallVec<_>, _>>()?;

    reader.align_record();

    Ok((
        Record {
            type_id: header.type_id,
            signature: header.signature,
            time: TimeBlock { resync, delta },
            values,
        },
        reader.position(),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECOND: u64 = 1_000_000_000;

    fn owned(values: &[FieldValue<'_>]) -> Vec<FieldValue<'static>> {
        values.iter().cloned().map(FieldValue::into_owned).collect()
    }

    fn round_trip(letters: &str, values: &[FieldValue<'_>]) -> Vec<FieldValue<'static>> {
        let signature = Signature::parse(letters).unwrap();
        let time = TimeBlock::new(5 * SECOND + 17, SECOND, None);

        let mut arena = Arena::with_capacity(MAX_EVENT_SIZE);
        encode_record(&mut arena, 7, &signature, &time, values).unwrap();
        assert_eq!(arena.len() % 4, 0);

        let (record, next) = decode_record(arena.as_bytes(), 0).unwrap();
        assert_eq!(next, arena.len());
        assert_eq!(record.type_id, 7);
        assert_eq!(record.signature, signature);
        assert_eq!(record.time, time);
        record.values.into_iter().map(FieldValue::into_owned).collect()
    }

    #[test]
    fn boundary_values() {
        let values: Vec<FieldValue<'_>> = vec![
            0u8.into(),
            u8::MAX.into(),
            0u16.into(),
            u16::MAX.into(),
            0u32.into(),
            u32::MAX.into(),
            0u64.into(),
            u64::MAX.into(),
            f32::MAX.into(),
            f64::MIN_POSITIVE.into(),
            "".into(),
        ];
        assert_eq!(round_trip("ccwwiillfds", &values), owned(&values));
    }

    #[test]
    fn max_length_string() {
        let longest = "y".repeat(MAX_STRLEN - 1);
        let values: Vec<FieldValue<'_>> = vec![longest.as_str().into(), 3u16.into()];
        assert_eq!(round_trip("sw", &values), owned(&values));

        // Longer strings are cut to the maximum length.
        let too_long = "y".repeat(MAX_STRLEN * 2);
        let decoded = round_trip("s", &[too_long.as_str().into()]);
        assert_eq!(decoded, vec![FieldValue::from(longest.clone())]);
    }

    #[test]
    fn field_after_string_is_aligned() {
        let signature = Signature::parse("sisccsdsl").unwrap();
        let time = TimeBlock::new(1, 1, None);
        let mut arena = Arena::with_capacity(MAX_EVENT_SIZE);

        arena.put_u8(0).unwrap();
        arena.align().unwrap();
        let start = arena.len();

        let values: Vec<FieldValue<'_>> = vec![
            "a".into(),
            1u32.into(),
            "bcd".into(),
            2u8.into(),
            3u8.into(),
            "efghi".into(),
            4.5f64.into(),
            "".into(),
            6u64.into(),
        ];
        encode_record(&mut arena, 1, &signature, &time, &values).unwrap();

        // header words + resync (16) + delta (8)
        let mut offset = start + 4 * header_words_len(signature.len()) + 16 + 8;
        let bytes = arena.as_bytes();
        let mut after_string = false;
        for value in &values {
            if after_string {
                assert_eq!(offset % 4, 0, "field {:?} at offset {}", value, offset);
            }
            match value {
                FieldValue::String(s) => {
                    assert_eq!(&bytes[offset..offset + s.len()], s.as_bytes());
                    assert_eq!(bytes[offset + s.len()], 0);
                    offset = align4(offset + s.len() + 1);
                    after_string = true;
                }
                other => {
                    offset += other.field_type().fixed_size().unwrap();
                    after_string = false;
                }
            }
        }
        assert_eq!(align4(offset), arena.len());
    }

    #[test]
    fn mismatched_values_are_rejected() {
        let signature = Signature::parse("ls").unwrap();
        let time = TimeBlock::new(0, 1, None);
        let mut arena = Arena::with_capacity(256);

        let err = encode_record(&mut arena, 1, &signature, &time, &[1u64.into()]).unwrap_err();
        assert!(matches!(err, EncodeError::FieldCount { expected: 2, found: 1, .. }));

        let err =
            encode_record(&mut arena, 1, &signature, &time, &[1u64.into(), 2u8.into()])
                .unwrap_err();
        assert!(matches!(
            err,
            EncodeError::FieldMismatch {
                position: 1,
                expected: FieldType::String,
                found: FieldType::Uint8,
                ..
            }
        ));
        assert!(arena.is_empty());
    }

    #[test]
    fn overflow_leaves_arena_untouched() {
        let signature = Signature::parse("ll").unwrap();
        let time = TimeBlock::new(0, 1, None);
        let mut arena = Arena::with_capacity(40);

        encode_record(&mut arena, 1, &Signature::empty(), &time, &[]).unwrap();
        let used = arena.len();
        assert_eq!(used, 4 + 16 + 8);

        let err = encode_record(&mut arena, 1, &signature, &time, &[1u64.into(), 2u64.into()])
            .unwrap_err();
        assert!(matches!(err, EncodeError::Overflow(_)));
        assert_eq!(arena.len(), used);
    }

    #[test]
    fn time_block() {
        // First record always carries a reference.
        let time = TimeBlock::new(10 * SECOND + 5, SECOND, None);
        assert_eq!(
            time,
            TimeBlock {
                resync: Some(Resync {
                    seconds: 10,
                    resolution: SECOND,
                }),
                delta: 5,
            }
        );

        let time = TimeBlock::new(3610 * SECOND + 5, SECOND, Some(10));
        assert_eq!(time.resync, None);
        assert_eq!(time.delta, 3600 * SECOND + 5);

        let time = TimeBlock::new(3611 * SECOND, SECOND, Some(10));
        assert_eq!(time.resync.map(|r| r.seconds), Some(3611));
        assert_eq!(time.delta, 0);

        // Clock going backwards.
        let time = TimeBlock::new(5 * SECOND, SECOND, Some(10));
        assert_eq!(time.resync.map(|r| r.seconds), Some(5));
    }

    #[test]
    fn truncated_record() {
        let signature = Signature::parse("lls").unwrap();
        let time = TimeBlock::new(0, 1, None);
        let mut arena = Arena::with_capacity(256);
        let values: Vec<FieldValue<'_>> = vec![1u64.into(), 2u64.into(), "host".into()];
        encode_record(&mut arena, 3, &signature, &time, &values).unwrap();

        let bytes = arena.as_bytes();
        for len in 0..bytes.len() - 3 {
            assert_eq!(
                decode_record(&bytes[..len], 0).unwrap_err(),
                DecodeError::Truncated { offset: 0 },
                "length {}",
                len
            );
        }
    }

    #[test]
    fn max_event_size_is_an_upper_bound() {
        let letters: String = FieldType::ALL
            .iter()
            .map(|t| t.letter().to_string().repeat(MAX_FIELDS_PER_TYPE))
            .collect();
        let signature = Signature::parse(&letters).unwrap();
        let long = "z".repeat(MAX_STRLEN);
        let values: Vec<FieldValue<'_>> = signature
            .fields()
            .iter()
            .map(|t| match t {
                FieldType::Uint8 => FieldValue::Uint8(1),
                FieldType::Uint16 => FieldValue::Uint16(1),
                FieldType::Uint32 => FieldValue::Uint32(1),
                FieldType::Uint64 => FieldValue::Uint64(1),
                FieldType::Float => FieldValue::Float(1.0),
                FieldType::Double => FieldValue::Double(1.0),
                FieldType::String => FieldValue::from(long.as_str()),
            })
            .collect();

        let mut arena = Arena::with_capacity(MAX_EVENT_SIZE);
        let time = TimeBlock::new(0, 1, None);
        encode_record(&mut arena, 1, &signature, &time, &values).unwrap();
        assert!(arena.len() <= MAX_EVENT_SIZE);
    }
}
