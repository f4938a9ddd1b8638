//! Buffer sizing and UTF-16 conversion shared by the text, annotation and
//! link readers.
//!
//! PDFium string accessors follow one contract: called with a null buffer
//! they return the required size, called again with a buffer of that size
//! they fill it, always including a NUL terminator.

use crate::error::Result;

/// Run the two-call sizing pattern.
///
/// `call` receives an empty slice for the probe (null/0 on the C side) and a
/// slice of exactly the probed length for the fill. A probe result at or
/// below `terminator_len` (zero and negative included) means "empty" and no
/// buffer is allocated. The returned buffer still contains the terminator and
/// is cut to what the fill call reported writing.
pub(crate) fn read_sized<T, F>(terminator_len: usize, mut call: F) -> Result<Vec<T>>
where
    T: Copy + Default,
    F: FnMut(&mut [T]) -> Result<i64>,
{
    let required = call(&mut [])?;
    let len = match usize::try_from(required) {
        Ok(len) if len > terminator_len => len,
        _ => return Ok(Vec::new()),
    };

    let mut buffer = vec![T::default(); len];
    let written = call(&mut buffer)?;
    let written = usize::try_from(written).unwrap_or(0).min(len);
    if written <= terminator_len {
        return Ok(Vec::new());
    }
    buffer.truncate(written);
    Ok(buffer)
}

/// Decode a UTF-16LE byte buffer that ends in a two-byte terminator.
///
/// The buffer is read as `byte_count / 2 - 1` code units, so the terminator
/// (and a stray odd byte) never reaches the string.
pub(crate) fn decode_utf16le(bytes: &[u8], context: &str) -> String {
    let unit_count = (bytes.len() / 2).saturating_sub(1);
    if bytes.len() % 2 != 0 {
        log::warn!(
            "UTF-16 buffer size is odd ({} bytes) in {context}, rounding down",
            bytes.len()
        );
    }
    let units: Vec<u16> = bytes
        .chunks_exact(2)
        .take(unit_count)
        .map(|pair| u16::from_le_bytes([pair[0], pair[1]]))
        .collect();
    utf16_to_string(&units, context)
}

/// Decode a UTF-16 unit buffer that ends in a one-unit terminator.
pub(crate) fn decode_utf16(units: &[u16], context: &str) -> String {
    let len = units.len().saturating_sub(1);
    utf16_to_string(&units[..len], context)
}

/// Encode `text` as NUL-terminated UTF-16 for `FPDF_WIDESTRING` parameters.
pub(crate) fn encode_utf16z(text: &str) -> Vec<u16> {
    text.encode_utf16().chain(std::iter::once(0)).collect()
}

fn utf16_to_string(units: &[u16], context: &str) -> String {
    match String::from_utf16(units) {
        Ok(s) => s,
        Err(e) => {
            log::warn!("Invalid UTF-16 sequence in {context}: {e} - using lossy conversion");
            String::from_utf16_lossy(units)
        }
    }
}
