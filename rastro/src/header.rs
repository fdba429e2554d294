//! Header words.
//!
//! Every record starts with one or more `u32` header words. The first word
//! packs the event type, a record marker, the resync flag and the codes of
//! the first four fields:
//!
//! | bits  | content                                   |
//! |-------|-------------------------------------------|
//! | 18-31 | event type (14 bits)                      |
//! | 17    | record marker, always set                 |
//! | 16    | resync block follows the header           |
//! | 0-15  | field codes 0..4, first field highest     |
//!
//! A zero code ends the field list. If all four codes of the first word are
//! in use, continuation words with eight codes each follow, until a word
//! that has room for the terminating zero. The header words therefore
//! identify the exact signature of the record without any other context.

use crate::codec::{Arena, ArenaOverflow, ByteReader, DecodeError};
use crate::signature::{FieldType, Signature};
use smallvec::{smallvec, SmallVec};

pub const EVENT_TYPE_MASK: u16 = 0x3fff;

/// Type of the record that opens every trace file.
pub const EVENT_INIT: u16 = 0x3fff;

/// Type of the record that closes a trace file.
pub const EVENT_STOP: u16 = 0x3ffe;

/// Largest event type available to applications.
pub const MAX_EVENT_TYPE: u16 = 0x3ffd;

const TYPE_SHIFT: u32 = 18;
pub(crate) const RECORD_MARK: u32 = 0x2_0000;
pub(crate) const TIME_SET: u32 = 0x1_0000;

/// Signature tag of the INIT record, `lls`: id1, id2 and host name.
pub(crate) const INIT_TAG: [u32; 1] = [RECORD_MARK | 0x4410];

const FIRST_WORD_CODES: usize = 4;
const WORD_CODES: usize = 8;
const CODE_BITS: usize = 4;
const CODE_MASK: u32 = 0xf;

/// Number of header words used by a signature with `num_fields` fields.
pub const fn header_words_len(num_fields: usize) -> usize {
    if num_fields < FIRST_WORD_CODES {
        1
    } else {
        2 + (num_fields - FIRST_WORD_CODES) / WORD_CODES
    }
}

/// The header words of a signature, with type and resync bits cleared.
///
/// The tag only depends on the signature itself, and distinct signatures
/// always have distinct tags.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub struct SignatureTag {
    words: SmallVec<[u32; 2]>,
}

impl SignatureTag {
    pub fn of(signature: &Signature) -> SignatureTag {
        let mut words: SmallVec<[u32; 2]> = smallvec![RECORD_MARK];
        let mut capacity = FIRST_WORD_CODES;
        let mut slot = 0;

        for field_type in signature.fields() {
            if slot == capacity {
                words.push(0);
                capacity = WORD_CODES;
                slot = 0;
            }
            let shift = (capacity - 1 - slot) * CODE_BITS;
            if let Some(word) = words.last_mut() {
                *word |= field_type.code() << shift;
            }
            slot += 1;
        }

        // The terminating zero code needs a slot of its own.
        if slot == capacity {
            words.push(0);
        }

        SignatureTag { words }
    }

    pub fn words(&self) -> &[u32] {
        &self.words
    }
}

/// A decoded header.
#[derive(Clone, Eq, PartialEq, Debug)]
pub struct Header {
    pub type_id: u16,
    pub resync: bool,
    pub signature: Signature,
}

pub(crate) fn write_header(
    arena: &mut Arena,
    type_id: u16,
    resync: bool,
    tag: &[u32],
) -> Result<(), ArenaOverflow> {
    let (first, rest) = match tag.split_first() {
        Some(split) => split,
        None => (&RECORD_MARK, &[][..]),
    };

    let mut word = first | RECORD_MARK | (u32::from(type_id & EVENT_TYPE_MASK) << TYPE_SHIFT);
    if resync {
        word |= TIME_SET;
    }
    arena.put_u32(word)?;

    for &word in rest {
        arena.put_u32(word)?;
    }

    Ok(())
}

pub(crate) fn read_header(reader: &mut ByteReader<'_>) -> Result<Header, DecodeError> {
    let offset = reader.position();
    let first = reader.u32()?;

    if first & RECORD_MARK == 0 {
        return Err(DecodeError::MissingMarker {
            offset,
            word: first,
        });
    }

    let type_id = (first >> TYPE_SHIFT) as u16 & EVENT_TYPE_MASK;
    let resync = first & TIME_SET != 0;

    let mut fields: SmallVec<[FieldType; 8]> = SmallVec::new();
    let mut word = first;
    let mut capacity = FIRST_WORD_CODES;

    'words: loop {
        for slot in 0..capacity {
            let shift = (capacity - 1 - slot) * CODE_BITS;
            let code = (word >> shift) & CODE_MASK;
            if code == 0 {
                break 'words;
            }
            match FieldType::from_code(code) {
                Some(field_type) => fields.push(field_type),
                None => {
                    return Err(DecodeError::UnknownFieldCode {
                        offset,
                        code: code as u8,
                    })
                }
            }
        }
        word = reader.u32()?;
        capacity = WORD_CODES;
    }

    Ok(Header {
        type_id,
        resync,
        signature: Signature::from_fields_unchecked(fields),
    })
}
