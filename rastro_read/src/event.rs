use rastro::{FieldType, FieldValue, Record, Signature};
use serde::{Serialize, Serializer};
use std::borrow::Cow;
use std::cmp::Ordering;
use std::fmt;

/// A decoded event.
///
/// The field values are kept in one array per field type, in signature
/// order within each type; [`Event::values`] yields them in declared
/// order. A `TraceFile` reuses its event for every decode, so references to
/// it are only valid until the next call on that file.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct Event {
    pub type_id: u16,
    /// Position of the originating file in its session.
    pub file_id: usize,
    pub id1: u64,
    pub id2: u64,
    /// Time on the producer's clock, in ticks.
    pub local_time: u64,
    /// Ticks per second of the producer's clock.
    pub resolution: u64,
    /// Corrected time in ticks of `resolution`.
    #[serde(skip)]
    pub global_time: i128,
    /// Corrected time in seconds.
    pub timestamp: f64,
    #[serde(serialize_with = "serialize_signature")]
    pub signature: Signature,
    pub v_uint8: Vec<u8>,
    pub v_uint16: Vec<u16>,
    pub v_uint32: Vec<u32>,
    pub v_uint64: Vec<u64>,
    pub v_float: Vec<f32>,
    pub v_double: Vec<f64>,
    pub v_string: Vec<String>,
}

fn serialize_signature<S: Serializer>(signature: &Signature, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&signature.letters())
}

impl Event {
    pub(crate) fn clear_values(&mut self) {
        self.v_uint8.clear();
        self.v_uint16.clear();
        self.v_uint32.clear();
        self.v_uint64.clear();
        self.v_float.clear();
        self.v_double.clear();
        self.v_string.clear();
    }

    /// Copies type, signature and values of `record`.
    pub(crate) fn fill_from(&mut self, record: &Record<'_>) {
        self.clear_values();
        self.type_id = record.type_id;
        self.signature.clone_from(&record.signature);

        for value in &record.values {
            match value {
                FieldValue::Uint8(v) => self.v_uint8.push(*v),
                FieldValue::Uint16(v) => self.v_uint16.push(*v),
                FieldValue::Uint32(v) => self.v_uint32.push(*v),
                FieldValue::Uint64(v) => self.v_uint64.push(*v),
                FieldValue::Float(v) => self.v_float.push(*v),
                FieldValue::Double(v) => self.v_double.push(*v),
                FieldValue::String(v) => self.v_string.push(v.to_string()),
            }
        }
    }

    /// Number of fields of `field_type`.
    pub fn count(&self, field_type: FieldType) -> usize {
        match field_type {
            FieldType::Uint8 => self.v_uint8.len(),
            FieldType::Uint16 => self.v_uint16.len(),
            FieldType::Uint32 => self.v_uint32.len(),
            FieldType::Uint64 => self.v_uint64.len(),
            FieldType::Float => self.v_float.len(),
            FieldType::Double => self.v_double.len(),
            FieldType::String => self.v_string.len(),
        }
    }

    /// Orders by corrected time. Exact across files of different
    /// resolutions, falling back to `timestamp` only when the cross products
    /// leave `i128`.
    pub fn cmp_time(&self, other: &Event) -> Ordering {
        let lhs = self.global_time.checked_mul(other.resolution as i128);
        let rhs = other.global_time.checked_mul(self.resolution as i128);
        match (lhs, rhs) {
            (Some(lhs), Some(rhs)) => lhs.cmp(&rhs),
            _ => self.timestamp.total_cmp(&other.timestamp),
        }
    }

    /// The field values in signature order.
    pub fn values(&self) -> impl Iterator<Item = FieldValue<'_>> + '_ {
        let mut seen = [0usize; 7];
        self.signature.fields().iter().filter_map(move |&field_type| {
            let slot = FieldType::ALL.iter().position(|&t| t == field_type)?;
            let i = seen[slot];
            seen[slot] += 1;
            Some(match field_type {
                FieldType::Uint8 => FieldValue::Uint8(*self.v_uint8.get(i)?),
                FieldType::Uint16 => FieldValue::Uint16(*self.v_uint16.get(i)?),
                FieldType::Uint32 => FieldValue::Uint32(*self.v_uint32.get(i)?),
                FieldType::Uint64 => FieldValue::Uint64(*self.v_uint64.get(i)?),
                FieldType::Float => FieldValue::Float(*self.v_float.get(i)?),
                FieldType::Double => FieldValue::Double(*self.v_double.get(i)?),
                FieldType::String => FieldValue::String(Cow::Borrowed(self.v_string.get(i)?.as_str())),
            })
        })
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "type: {} ts: {:.9} (id1={}, id2={})",
            self.type_id, self.timestamp, self.id1, self.id2
        )?;
        for value in self.values() {
            match value {
                FieldValue::Uint8(v) => write!(f, " c={}", v)?,
                FieldValue::Uint16(v) => write!(f, " w={}", v)?,
                FieldValue::Uint32(v) => write!(f, " i={}", v)?,
                FieldValue::Uint64(v) => write!(f, " l={}", v)?,
                FieldValue::Float(v) => write!(f, " f={}", v)?,
                FieldValue::Double(v) => write!(f, " d={}", v)?,
                FieldValue::String(v) => write!(f, " s={:?}", v)?,
            }
        }
        Ok(())
    }
}
