//! UTF-8 scanning over raw byte slices.
//!
//! The grammar encoders classify whole codepoints against the Turtle
//! character classes, so multi-byte sequences are decoded explicitly with
//! byte-accurate offsets rather than through `str::chars`.

use crate::error::{RdfError, Result};

/// Number of bytes in the UTF-8 sequence starting with `lead` (1..=4).
pub fn sequence_length(lead: u8) -> Result<usize> {
    if lead & 0x80 == 0 {
        Ok(1)
    } else if lead & 0xE0 == 0xC0 {
        Ok(2)
    } else if lead & 0xF0 == 0xE0 {
        Ok(3)
    } else if lead & 0xF8 == 0xF0 {
        Ok(4)
    } else {
        Err(RdfError::InvalidUtf8(lead))
    }
}

/// Decode the codepoint at the start of `bytes`.
///
/// Returns the codepoint and the number of bytes consumed.
pub fn decode(bytes: &[u8]) -> Result<(u32, usize)> {
    let lead = *bytes.first().ok_or(RdfError::InvalidUtf8(0))?;
    let len = sequence_length(lead)?;
    if bytes.len() < len {
        return Err(RdfError::InvalidUtf8(lead));
    }
    let cp = match len {
        1 => u32::from(lead),
        2 => (u32::from(lead & 0x1F) << 6) | continuation(bytes[1])?,
        3 => {
            (u32::from(lead & 0x0F) << 12) | (continuation(bytes[1])? << 6) | continuation(bytes[2])?
        }
        _ => {
            (u32::from(lead & 0x07) << 18)
                | (continuation(bytes[1])? << 12)
                | (continuation(bytes[2])? << 6)
                | continuation(bytes[3])?
        }
    };
    Ok((cp, len))
}

fn continuation(b: u8) -> Result<u32> {
    if b & 0xC0 == 0x80 {
        Ok(u32::from(b & 0x3F))
    } else {
        Err(RdfError::InvalidUtf8(b))
    }
}
