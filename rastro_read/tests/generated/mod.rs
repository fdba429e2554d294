// Generated by rastro_generate for the signatures "", "lls", "wls", "dfi".
// Do not edit by hand.

use rastro::{current, EncodeError, ProtocolError, ProtocolTable, TraceBuffer};

/// Signatures this module was generated from.
pub const SIGNATURES: &[&str] = &["", "lls", "wls", "dfi"];

/// The table matching the encoders of this module, for decoders.
pub fn protocol() -> Result<ProtocolTable, ProtocolError> {
    ProtocolTable::from_letters(SIGNATURES)
}

/// Header words of signature `lls`.
pub const EVENT_LLS_TAG: &[u32] = &[0x00024410];

/// Records an event with fields `lls`.
#[inline]
pub fn event_lls(buffer: &mut TraceBuffer, type_id: u16, l0: u64, l1: u64, s0: &str) -> Result<(), EncodeError> {
    buffer.record_with(type_id, EVENT_LLS_TAG, |arena| {
        arena.put_u64(l0)?;
        arena.put_u64(l1)?;
        arena.put_str(s0)?;
        Ok(())
    })
}

/// Records an event with fields `lls` in the current buffer.
#[inline]
pub fn current_event_lls(type_id: u16, l0: u64, l1: u64, s0: &str) {
    current::emit(|buffer| event_lls(buffer, type_id, l0, l1, s0))
}

/// Header words of signature `wls`.
pub const EVENT_WLS_TAG: &[u32] = &[0x00023410];

/// Records an event with fields `wls`.
#[inline]
pub fn event_wls(buffer: &mut TraceBuffer, type_id: u16, w0: u16, l0: u64, s0: &str) -> Result<(), EncodeError> {
    buffer.record_with(type_id, EVENT_WLS_TAG, |arena| {
        arena.put_u16(w0)?;
        arena.put_u64(l0)?;
        arena.put_str(s0)?;
        Ok(())
    })
}

/// Records an event with fields `wls` in the current buffer.
#[inline]
pub fn current_event_wls(type_id: u16, w0: u16, l0: u64, s0: &str) {
    current::emit(|buffer| event_wls(buffer, type_id, w0, l0, s0))
}

/// Header words of signature `dfi`.
pub const EVENT_DFI_TAG: &[u32] = &[0x00027650];

/// Records an event with fields `dfi`.
#[inline]
pub fn event_dfi(buffer: &mut TraceBuffer, type_id: u16, d0: f64, f0: f32, i0: u32) -> Result<(), EncodeError> {
    buffer.record_with(type_id, EVENT_DFI_TAG, |arena| {
        arena.put_f64(d0)?;
        arena.put_f32(f0)?;
        arena.put_u32(i0)?;
        Ok(())
    })
}

/// Records an event with fields `dfi` in the current buffer.
#[inline]
pub fn current_event_dfi(type_id: u16, d0: f64, f0: f32, i0: u32) {
    current::emit(|buffer| event_dfi(buffer, type_id, d0, f0, i0))
}
