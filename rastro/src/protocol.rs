//! Compiling signatures into event codecs.
//!
//! A [`ProtocolTable`] is what producers and consumers agree on. It maps
//! every signature an application uses to an [`EventCodec`], which knows the
//! header tag of the signature and can encode and decode its records
//! without any per-signature generated code. The generated encoders of
//! [`generate`](crate::generate) are a faster path to the same bytes.
//!
//! Tags are computed from the signature alone (see [`SignatureTag`]), so two
//! tables compiled from different lists still agree on every signature they
//! have in common.

use crate::codec::{self, Arena, DecodeError, EncodeError, FieldValue, Record, TimeBlock};
use crate::header::SignatureTag;
use crate::signature::{FieldType, Signature, MAX_FIELDS_PER_TYPE};
use rustc_hash::FxHashMap;

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ProtocolError {
    #[error(
        "signature {signature:?} has {count} fields of type {field_type:?}, \
         at most {} are supported",
        MAX_FIELDS_PER_TYPE
    )]
    TooManyFields {
        signature: String,
        field_type: FieldType,
        count: usize,
    },

    #[error("unknown type letter {letter:?} in signature {signature:?}")]
    UnknownLetter { signature: String, letter: char },

    #[error("signature {signature:?} is requested more than once")]
    DuplicateSignature { signature: String },
}

/// Signatures every table contains: type-only events (also used for STOP)
/// and the INIT record.
const BUILTIN_SIGNATURES: [&str; 2] = ["", "lls"];

/// The codec of one signature.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EventCodec {
    signature: Signature,
    tag: SignatureTag,
}

impl EventCodec {
    pub fn new(signature: Signature) -> EventCodec {
        let tag = SignatureTag::of(&signature);
        EventCodec { signature, tag }
    }

    pub fn signature(&self) -> &Signature {
        &self.signature
    }

    pub fn tag(&self) -> &SignatureTag {
        &self.tag
    }

    /// The ordered field types, for generic decoders.
    pub fn descriptor(&self) -> &[FieldType] {
        self.signature.fields()
    }

    /// Name of the generated encoder, `event_<letters>`. Type-only events
    /// have no generated encoder and use
    /// [`TraceBuffer::event`](crate::TraceBuffer::event).
    pub fn function_name(&self) -> String {
        if self.signature.is_empty() {
            "event".to_string()
        } else {
            format!("event_{}", self.signature.letters())
        }
    }

    pub fn encode(
        &self,
        arena: &mut Arena,
        type_id: u16,
        time: &TimeBlock,
        values: &[FieldValue<'_>],
    ) -> Result<(), EncodeError> {
        codec::check_values(&self.signature, values)?;
        codec::encode_record_with(arena, type_id, self.tag.words(), time, |arena| {
            values.iter().try_for_each(|value| value.put(arena))
        })
    }

    /// Decodes the record at `pos`, which must have been written with this
    /// codec's signature.
    pub fn decode<'a>(&self, data: &'a [u8], pos: usize) -> Result<(Record<'a>, usize), DecodeError> {
        let (record, next) = codec::decode_record(data, pos)?;
        if record.signature != self.signature {
            return Err(DecodeError::UnknownSignature {
                offset: pos,
                signature: record.signature.letters(),
            });
        }
        Ok((record, next))
    }
}

/// Compiles `signatures` into a table. Equivalent to
/// [`ProtocolTable::compile`].
pub fn compile(signatures: &[Signature]) -> Result<ProtocolTable, ProtocolError> {
    ProtocolTable::compile(signatures)
}

#[derive(Clone, Debug)]
pub struct ProtocolTable {
    codecs: Vec<EventCodec>,
    index: FxHashMap<SignatureTag, usize>,
}

impl ProtocolTable {
    /// Compiles the built-in signatures followed by `signatures`, in order.
    ///
    /// Listing a built-in signature is allowed, listing any other signature
    /// twice is an error.
    pub fn compile(signatures: &[Signature]) -> Result<ProtocolTable, ProtocolError> {
        let mut table = ProtocolTable {
            codecs: Vec::with_capacity(BUILTIN_SIGNATURES.len() + signatures.len()),
            index: FxHashMap::default(),
        };

        for letters in BUILTIN_SIGNATURES {
            table.insert(Signature::parse(letters)?);
        }
        let builtins = table.codecs.len();

        for signature in signatures {
            match table.index.get(&SignatureTag::of(signature)) {
                Some(&i) if i < builtins => {}
                Some(_) => {
                    return Err(ProtocolError::DuplicateSignature {
                        signature: signature.letters(),
                    })
                }
                None => table.insert(signature.clone()),
            }
        }

        Ok(table)
    }

    /// The table of the built-in signatures only.
    pub fn builtin() -> ProtocolTable {
        let codecs: Vec<_> = BUILTIN_SIGNATURES
            .iter()
            .filter_map(|letters| Signature::parse(letters).ok())
            .map(EventCodec::new)
            .collect();
        let index = codecs
            .iter()
            .enumerate()
            .map(|(i, codec)| (codec.tag.clone(), i))
            .collect();
        ProtocolTable { codecs, index }
    }

    /// Compiles signatures given as letter strings, e.g. `&["wls", "ii"]`.
    pub fn from_letters<S: AsRef<str>>(letters: &[S]) -> Result<ProtocolTable, ProtocolError> {
        let signatures = letters
            .iter()
            .map(|letters| Signature::parse(letters.as_ref()))
            .collect::<Result<Vec<_>, _>>()?;
        ProtocolTable::compile(&signatures)
    }

    fn insert(&mut self, signature: Signature) {
        let codec = EventCodec::new(signature);
        self.index.insert(codec.tag.clone(), self.codecs.len());
        self.codecs.push(codec);
    }

    pub fn get(&self, signature: &Signature) -> Option<&EventCodec> {
        self.get_tag(&SignatureTag::of(signature))
    }

    pub fn get_letters(&self, letters: &str) -> Option<&EventCodec> {
        let signature = Signature::parse(letters).ok()?;
        self.get(&signature)
    }

    pub fn get_tag(&self, tag: &SignatureTag) -> Option<&EventCodec> {
        self.index.get(tag).map(|&i| &self.codecs[i])
    }

    pub fn contains(&self, signature: &Signature) -> bool {
        self.get(signature).is_some()
    }

    /// All codecs, built-ins first, then in compilation order.
    pub fn codecs(&self) -> &[EventCodec] {
        &self.codecs
    }

    pub fn len(&self) -> usize {
        self.codecs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.codecs.is_empty()
    }

    /// Decodes the record at `pos`, failing with
    /// [`DecodeError::UnknownSignature`] if its signature is not part of
    /// this table.
    pub fn decode<'a>(&self, data: &'a [u8], pos: usize) -> Result<(Record<'a>, usize), DecodeError> {
        let (record, next) = codec::decode_record(data, pos)?;
        if !self.contains(&record.signature) {
            return Err(DecodeError::UnknownSignature {
                offset: pos,
                signature: record.signature.letters(),
            });
        }
        Ok((record, next))
    }
}
