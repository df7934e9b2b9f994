//! Text decoding for string operands.
//!
//! Literal strings pass through an escape-sequence parser; only octal
//! escapes resolve through the font's decode table, ordinary bytes pass
//! through as text (PDF 7.3.4.2, Table 3). Hexadecimal strings decode in
//! fixed-width chunks whose width depends on whether the font carries a
//! ToUnicode map.

use artboard_core::{Warning, WarningCode};

use crate::font::Font;
use crate::record;

/// Decode a literal string's raw bytes against a font.
///
/// Recognizes `\n \r \t \b \f \( \) \\`, the line-continuation escape
/// (a reverse solidus directly before CR, LF, or CRLF produces no
/// character), and greedy 1–3 digit octal escapes resolved through the
/// font's decode table. An unknown escape records a warning and passes the
/// escaped byte through.
pub fn decode_literal(font: &Font, bytes: &[u8], warnings: &mut Vec<Warning>) -> String {
    let mut out = String::new();
    let mut run_start = 0;
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] != b'\\' {
            i += 1;
            continue;
        }
        out.push_str(&String::from_utf8_lossy(&bytes[run_start..i]));
        i += 1;
        let Some(&escaped) = bytes.get(i) else {
            record(
                warnings,
                Warning::with_code(
                    WarningCode::DecodeFallback,
                    "literal string ends in a bare reverse solidus",
                ),
            );
            run_start = i;
            break;
        };
        match escaped {
            b'n' => out.push('\n'),
            b'r' => out.push('\r'),
            b't' => out.push('\t'),
            b'b' => out.push('\u{08}'),
            b'f' => out.push('\u{0C}'),
            b'(' => out.push('('),
            b')' => out.push(')'),
            b'\\' => out.push('\\'),
            // Line continuation: no character. CRLF counts as one EOL.
            b'\r' => {
                if bytes.get(i + 1) == Some(&b'\n') {
                    i += 1;
                }
            }
            b'\n' => {}
            b'0'..=b'7' => {
                let mut value = 0u32;
                let mut digits = 0;
                while digits < 3 && bytes.get(i).is_some_and(|b| (b'0'..=b'7').contains(b)) {
                    value = value * 8 + u32::from(bytes[i] - b'0');
                    i += 1;
                    digits += 1;
                }
                out.push_str(&font.decode_code(value));
                run_start = i;
                continue;
            }
            other => {
                record(
                    warnings,
                    Warning::with_code(
                        WarningCode::DecodeFallback,
                        format!("unknown escape sequence '\\{}'", other as char),
                    ),
                );
                out.push(other as char);
            }
        }
        i += 1;
        run_start = i;
    }
    out.push_str(&String::from_utf8_lossy(&bytes[run_start..]));
    out
}

/// Decode a hexadecimal string's digits against a font.
///
/// Codes are 2 hex digits (one byte) without a ToUnicode map, 4 hex digits
/// (two bytes) with one; a trailing short chunk is zero-padded. Each code
/// resolves through the font's decode table.
pub fn decode_hex(font: &Font, hex: &str, warnings: &mut Vec<Warning>) -> String {
    let width = if font.to_unicode.is_some() { 4 } else { 2 };
    let mut out = String::new();
    for chunk in hex.as_bytes().chunks(width) {
        let mut padded = [b'0'; 4];
        padded[..chunk.len()].copy_from_slice(chunk);
        let code = std::str::from_utf8(&padded[..width])
            .ok()
            .and_then(|text| u32::from_str_radix(text, 16).ok());
        match code {
            Some(code) => out.push_str(&font.decode_code(code)),
            None => record(
                warnings,
                Warning::with_code(
                    WarningCode::DecodeFallback,
                    format!(
                        "skipping non-hexadecimal chunk '{}'",
                        String::from_utf8_lossy(chunk)
                    ),
                ),
            ),
        }
    }
    out
}
