//! Grammar encoders for the N-Triples / Turtle productions.
//!
//! Each encoder takes a string view and returns the escaped textual form
//! mandated by the W3C grammars: IRIREF, PN_PREFIX, PN_LOCAL,
//! STRING_LITERAL_QUOTE, PERCENT, UCHAR.
//!
//! Escaping policy for user-supplied data: wherever the grammar admits a
//! PLX (`%HH` or `\x`) the encoders substitute it instead of failing, so
//! `encode_pn_local` and the IRIREF encoders are total. PN_PREFIX has no
//! escape production, so labels outside its character classes are rejected
//! with [`RdfError::InvalidPnPrefix`].

use crate::chars;
use crate::error::{RdfError, Result};
use crate::utf8;
use std::fmt::Write as _;

/// UCHAR numeric escape for a codepoint.
///
/// `\uXXXX` for codepoints in the BMP, `\U00XXXXXX` above it.
pub fn uchar(cp: u32) -> String {
    if cp > 0xFFFF {
        format!("\\U{cp:08x}")
    } else {
        format!("\\u{cp:04x}")
    }
}

/// PERCENT escape for a codepoint: `%HH` per byte of its UTF-8 encoding,
/// most-significant byte first.
pub fn percent(cp: u32) -> String {
    let mut out = String::new();
    match char::from_u32(cp) {
        Some(c) => {
            let mut buf = [0u8; 4];
            for b in c.encode_utf8(&mut buf).as_bytes() {
                let _ = write!(out, "%{b:02X}");
            }
        }
        // Not a scalar value (lone surrogate); escape the raw byte view.
        None => {
            let _ = write!(out, "%{:02X}", cp & 0xFF);
        }
    }
    out
}

fn push_percent_byte(out: &mut String, b: u8) {
    let _ = write!(out, "%{b:02X}");
}

/// Escape one IRIREF component with UCHAR escapes (NT and TTL output).
///
/// ```text
/// IRIREF ::= '<' ([^#x00-#x20<>"{}|^`\] | UCHAR)* '>'
/// ```
pub fn encode_iriref(s: &str) -> String {
    let bytes = s.as_bytes();
    let mut out = String::with_capacity(bytes.len() + 8);
    let mut pos = 0;
    while pos < bytes.len() {
        let b = bytes[pos];
        if b < 0x80 {
            if chars::is_iriref_forbidden(b) {
                out.push_str(&uchar(u32::from(b)));
            } else {
                out.push(b as char);
            }
            pos += 1;
        } else {
            match utf8::decode(&bytes[pos..]) {
                Ok((_, len)) => {
                    out.push_str(&s[pos..pos + len]);
                    pos += len;
                }
                // Unreachable on &str input; escape the byte rather than drop it.
                Err(_) => {
                    out.push_str(&uchar(u32::from(b)));
                    pos += 1;
                }
            }
        }
    }
    out
}

/// Escape one IRIREF component with PERCENT escapes (QLever dialect).
pub fn encode_iriref_pct(s: &str) -> String {
    let bytes = s.as_bytes();
    let mut out = String::with_capacity(bytes.len() + 8);
    let mut pos = 0;
    while pos < bytes.len() {
        let b = bytes[pos];
        if b < 0x80 {
            if chars::is_iriref_forbidden(b) {
                push_percent_byte(&mut out, b);
            } else {
                out.push(b as char);
            }
            pos += 1;
        } else {
            match utf8::decode(&bytes[pos..]) {
                Ok((_, len)) => {
                    out.push_str(&s[pos..pos + len]);
                    pos += len;
                }
                Err(_) => {
                    push_percent_byte(&mut out, b);
                    pos += 1;
                }
            }
        }
    }
    out
}

/// Validate and encode a PN_PREFIX (the label side of a PrefixedName).
///
/// ```text
/// PN_PREFIX ::= PN_CHARS_BASE ((PN_CHARS | '.')* PN_CHARS)?
/// ```
pub fn encode_pn_prefix(s: &str) -> Result<String> {
    let bytes = s.as_bytes();
    let mut out = String::with_capacity(bytes.len());
    let mut pos = 0;
    while pos < bytes.len() {
        let b = bytes[pos];
        if b.is_ascii_alphabetic() {
            out.push(b as char);
            pos += 1;
            continue;
        }
        if pos > 0 {
            if b.is_ascii_digit() || b == b'_' || b == b'-' {
                out.push(b as char);
                pos += 1;
                continue;
            }
            if b == b'.' && pos < bytes.len() - 1 {
                out.push('.');
                pos += 1;
                continue;
            }
        }
        if b < 0x80 {
            return Err(RdfError::InvalidPnPrefix {
                codepoint: u32::from(b),
                input: s.to_string(),
            });
        }
        let (cp, len) = utf8::decode(&bytes[pos..])?;
        if chars::is_pn_chars_base(cp) || (pos > 0 && chars::is_pn_chars_extra(cp)) {
            out.push_str(&s[pos..pos + len]);
            pos += len;
        } else {
            return Err(RdfError::InvalidPnPrefix {
                codepoint: cp,
                input: s.to_string(),
            });
        }
    }
    Ok(out)
}

/// Encode a PN_LOCAL (the local side of a PrefixedName).
///
/// ```text
/// PN_LOCAL ::= (PN_CHARS_U | ':' | [0-9] | PLX)
///              ((PN_CHARS | '.' | ':' | PLX)* (PN_CHARS | ':' | PLX))?
/// ```
///
/// Total: characters in PN_LOCAL_ESC are backslash-escaped, everything else
/// outside the character classes (including whole multi-byte sequences and
/// positionally-forbidden `-` / `.`) is percent-encoded.
pub fn encode_pn_local(s: &str) -> String {
    let bytes = s.as_bytes();
    let mut out = String::with_capacity(bytes.len() + 8);
    let mut pos = 0;
    while pos < bytes.len() {
        let b = bytes[pos];
        if b == b':' || b == b'_' || b.is_ascii_alphanumeric() {
            out.push(b as char);
            pos += 1;
            continue;
        }
        // First and last char is never an unescaped '.'
        if b == b'.' && pos > 0 && pos < bytes.len() - 1 {
            out.push('.');
            pos += 1;
            continue;
        }
        // First char is never an unescaped '-'
        if b == b'-' && pos > 0 {
            out.push('-');
            pos += 1;
            continue;
        }
        if chars::is_pn_local_esc(b) {
            out.push('\\');
            out.push(b as char);
            pos += 1;
            continue;
        }
        if b < 0x80 {
            push_percent_byte(&mut out, b);
            pos += 1;
            continue;
        }
        match utf8::decode(&bytes[pos..]) {
            Ok((cp, len)) => {
                if chars::is_pn_chars_base(cp) || (pos > 0 && chars::is_pn_chars_extra(cp)) {
                    out.push_str(&s[pos..pos + len]);
                } else {
                    for k in 0..len {
                        push_percent_byte(&mut out, bytes[pos + k]);
                    }
                }
                pos += len;
            }
            Err(_) => {
                push_percent_byte(&mut out, b);
                pos += 1;
            }
        }
    }
    out
}

/// Quote and escape a literal per STRING_LITERAL_QUOTE.
///
/// Only `"`, `\`, LF and CR are escaped; all other bytes pass through.
pub fn string_literal_quote(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 2);
    out.push('"');
    for c in s.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            _ => out.push(c),
        }
    }
    out.push('"');
    out
}

/// Validate a language tag and return the `@tag` suffix form.
///
/// ```text
/// LANGTAG ::= '@' [a-zA-Z]+ ('-' [a-zA-Z0-9]+)*
/// ```
pub fn lang_tag(s: &str) -> Result<String> {
    let mut segments = s.split('-');
    let first = segments.next().unwrap_or("");
    if first.is_empty() || !first.bytes().all(|b| b.is_ascii_alphabetic()) {
        return Err(RdfError::InvalidLangTag(s.to_string()));
    }
    for segment in segments {
        if segment.is_empty() || !segment.bytes().all(|b| b.is_ascii_alphanumeric()) {
            return Err(RdfError::InvalidLangTag(s.to_string()));
        }
    }
    Ok(format!("@{s}"))
}
