use crate::ProtocolError;
use smallvec::SmallVec;
use std::fmt;

/// Maximum number of fields of a single type in one signature.
pub const MAX_FIELDS_PER_TYPE: usize = 15;

/// Maximum length of a string field in bytes, including the terminating NUL.
pub const MAX_STRLEN: usize = 100;

/// The type of a single event field.
#[derive(Clone, Copy, Eq, PartialEq, Hash, PartialOrd, Ord, Debug)]
pub enum FieldType {
    Uint8,
    Uint16,
    Uint32,
    Uint64,
    Float,
    Double,
    String,
}

impl FieldType {
    pub const ALL: [FieldType; 7] = [
        FieldType::Uint8,
        FieldType::Uint16,
        FieldType::Uint32,
        FieldType::Uint64,
        FieldType::Float,
        FieldType::Double,
        FieldType::String,
    ];

    /// The letter used for this type in signature strings and generated names.
    pub fn letter(self) -> char {
        match self {
            FieldType::Uint8 => 'c',
            FieldType::Uint16 => 'w',
            FieldType::Uint32 => 'i',
            FieldType::Uint64 => 'l',
            FieldType::Float => 'f',
            FieldType::Double => 'd',
            FieldType::String => 's',
        }
    }

    pub fn from_letter(letter: char) -> Option<FieldType> {
        FieldType::ALL.iter().copied().find(|t| t.letter() == letter)
    }

    /// The 4-bit code identifying this type in a header word. Zero is the
    /// field list terminator.
    pub(crate) fn code(self) -> u32 {
        match self {
            FieldType::String => 1,
            FieldType::Uint8 => 2,
            FieldType::Uint16 => 3,
            FieldType::Uint64 => 4,
            FieldType::Uint32 => 5,
            FieldType::Float => 6,
            FieldType::Double => 7,
        }
    }

    pub(crate) fn from_code(code: u32) -> Option<FieldType> {
        FieldType::ALL.iter().copied().find(|t| t.code() == code)
    }

    /// Encoded size of a fixed-width field, `None` for strings.
    pub fn fixed_size(self) -> Option<usize> {
        match self {
            FieldType::Uint8 => Some(1),
            FieldType::Uint16 => Some(2),
            FieldType::Uint32 | FieldType::Float => Some(4),
            FieldType::Uint64 | FieldType::Double => Some(8),
            FieldType::String => None,
        }
    }

    pub(crate) fn index(self) -> usize {
        self as usize
    }
}

/// An ordered list of field types. Two signatures are the same event shape
/// exactly when their field lists are equal.
#[derive(Clone, Eq, PartialEq, Hash, PartialOrd, Ord, Default)]
pub struct Signature {
    fields: SmallVec<[FieldType; 8]>,
}

impl Signature {
    /// The signature of events that carry nothing but their type.
    pub fn empty() -> Signature {
        Signature {
            fields: SmallVec::new(),
        }
    }

    pub fn new(fields: &[FieldType]) -> Result<Signature, ProtocolError> {
        let signature = Signature {
            fields: fields.iter().copied().collect(),
        };

        let counts = signature.counts();
        for field_type in FieldType::ALL {
            let count = counts[field_type.index()];
            if count > MAX_FIELDS_PER_TYPE {
                return Err(ProtocolError::TooManyFields {
                    signature: signature.letters(),
                    field_type,
                    count,
                });
            }
        }

        Ok(signature)
    }

    /// Parses a signature from its letters, e.g. `"lls"`.
    pub fn parse(letters: &str) -> Result<Signature, ProtocolError> {
        let fields = letters
            .chars()
            .map(|letter| {
                FieldType::from_letter(letter).ok_or_else(|| ProtocolError::UnknownLetter {
                    signature: letters.to_string(),
                    letter,
                })
            })
            .collect::<Result<SmallVec<[FieldType; 8]>, _>>()?;

        Signature::new(&fields)
    }

    pub fn fields(&self) -> &[FieldType] {
        &self.fields
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn letters(&self) -> String {
        self.fields.iter().map(|t| t.letter()).collect()
    }

    /// Number of fields per type, indexed in `FieldType::ALL` order.
    pub fn counts(&self) -> [usize; 7] {
        let mut counts = [0; 7];
        for field_type in &self.fields {
            counts[field_type.index()] += 1;
        }
        counts
    }

    pub(crate) fn from_fields_unchecked(fields: SmallVec<[FieldType; 8]>) -> Signature {
        Signature { fields }
    }
}

impl fmt::Debug for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Signature({:?})", self.letters())
    }
}

impl fmt::Display for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.letters())
    }
}

/// Truncates `s` so that it fits in a string field: at most
/// `MAX_STRLEN - 1` bytes, cut at a character boundary, and ending at the
/// first interior NUL.
pub fn truncate_str(s: &str) -> &str {
    let s = match s.bytes().position(|b| b == 0) {
        Some(nul) => &s[..nul],
        None => s,
    };

    if s.len() < MAX_STRLEN {
        return s;
    }

    let mut end = MAX_STRLEN - 1;
    while !s.is_char_boundary(end) {
        end -= 1;
    }
    &s[..end]
}
