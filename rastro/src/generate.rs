//! Rust source generation for a [`ProtocolTable`].
//!
//! The generated module has one encoder per signature, named after its
//! letters, which writes the fields straight into the arena of a
//! [`TraceBuffer`](crate::TraceBuffer) without going through
//! [`FieldValue`](crate::FieldValue)s:
//!
//! ```text
//! pub const EVENT_WLS_TAG: &[u32] = &[0x00023410];
//! pub fn event_wls(buffer: &mut TraceBuffer, type_id: u16, w0: u16, l0: u64, s0: &str) -> Result<(), EncodeError>
//! pub fn current_event_wls(type_id: u16, w0: u16, l0: u64, s0: &str)
//! ```
//!
//! Parameters are named by type letter and position among the fields of the
//! same type. Type-only events have no generated encoder, they are recorded
//! with `TraceBuffer::event` and `current::event`. The module also contains
//! the signature list and a `protocol()` function building the matching
//! table for decoders.

use crate::protocol::{EventCodec, ProtocolTable};
use crate::signature::FieldType;

pub fn generate_module(table: &ProtocolTable) -> String {
    let signatures: Vec<String> = table
        .codecs()
        .iter()
        .map(|codec| format!("{:?}", codec.signature().letters()))
        .collect();

    let mut out = String::new();
    out.push_str(&format!(
        "// Generated by rastro_generate for the signatures {}.\n\
         // Do not edit by hand.\n\n",
        signatures.join(", ")
    ));
    out.push_str("use rastro::{current, EncodeError, ProtocolError, ProtocolTable, TraceBuffer};\n\n");
    out.push_str(&format!(
        "/// Signatures this module was generated from.\n\
         pub const SIGNATURES: &[&str] = &[{}];\n\n",
        signatures.join(", ")
    ));
    out.push_str(
        "/// The table matching the encoders of this module, for decoders.\n\
         pub fn protocol() -> Result<ProtocolTable, ProtocolError> {\n    \
         ProtocolTable::from_letters(SIGNATURES)\n\
         }\n",
    );

    for codec in table.codecs() {
        if !codec.signature().is_empty() {
            out.push('\n');
            out.push_str(&generate_encoder(codec));
        }
    }

    out
}

fn rust_type(field_type: FieldType) -> &'static str {
    match field_type {
        FieldType::Uint8 => "u8",
        FieldType::Uint16 => "u16",
        FieldType::Uint32 => "u32",
        FieldType::Uint64 => "u64",
        FieldType::Float => "f32",
        FieldType::Double => "f64",
        FieldType::String => "&str",
    }
}

fn put_method(field_type: FieldType) -> &'static str {
    match field_type {
        FieldType::Uint8 => "put_u8",
        FieldType::Uint16 => "put_u16",
        FieldType::Uint32 => "put_u32",
        FieldType::Uint64 => "put_u64",
        FieldType::Float => "put_f32",
        FieldType::Double => "put_f64",
        FieldType::String => "put_str",
    }
}

/// Parameter names in field order: `l0, l1, s0` for `lls`.
fn parameter_names(codec: &EventCodec) -> Vec<String> {
    let mut seen = [0usize; 7];
    codec
        .descriptor()
        .iter()
        .map(|&field_type| {
            let n = &mut seen[field_type.index()];
            let name = format!("{}{}", field_type.letter(), n);
            *n += 1;
            name
        })
        .collect()
}

fn generate_encoder(codec: &EventCodec) -> String {
    let letters = codec.signature().letters();
    let name = codec.function_name();
    let tag_name = format!("EVENT_{}_TAG", letters.to_uppercase());
    let names = parameter_names(codec);

    let tag_words: Vec<String> = codec
        .tag()
        .words()
        .iter()
        .map(|word| format!("{:#010x}", word))
        .collect();

    let params: Vec<String> = names
        .iter()
        .zip(codec.descriptor())
        .map(|(name, &field_type)| format!("{}: {}", name, rust_type(field_type)))
        .collect();
    let params = params.join(", ");
    let args = names.join(", ");

    let mut out = String::new();
    out.push_str(&format!(
        "/// Header words of signature `{}`.\n\
         pub const {}: &[u32] = &[{}];\n\n",
        letters,
        tag_name,
        tag_words.join(", ")
    ));

    out.push_str(&format!(
        "/// Records an event with fields `{}`.\n\
         #[inline]\n\
         pub fn {}(buffer: &mut TraceBuffer, type_id: u16, {}) -> Result<(), EncodeError> {{\n    \
         buffer.record_with(type_id, {}, |arena| {{\n",
        letters, name, params, tag_name
    ));
    for (name, &field_type) in names.iter().zip(codec.descriptor()) {
        out.push_str(&format!("        arena.{}({})?;\n", put_method(field_type), name));
    }
    out.push_str("        Ok(())\n    })\n}\n\n");

    out.push_str(&format!(
        "/// Records an event with fields `{}` in the current buffer.\n\
         #[inline]\n\
         pub fn current_{}(type_id: u16, {}) {{\n    \
         current::emit(|buffer| {}(buffer, type_id, {}))\n\
         }}\n",
        letters, name, params, name, args
    ));

    out
}
