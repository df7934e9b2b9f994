//! ToUnicode CMap parsing.
//!
//! CMap streams reuse the generic operator parser with their own keyword
//! set. Only `endbfchar` pairs are resolved into code → string entries;
//! `endbfrange` is recognized but intentionally left unimplemented and is
//! skipped with a warning.

use std::collections::HashMap;

use artboard_core::{Warning, WarningCode};

use crate::error::ParseError;
use crate::operand::Operand;
use crate::operator::{Args, OperatorSet, parse_operators};

/// A CMap-stream operator.
#[derive(Debug, Clone, PartialEq)]
pub enum CMapOp {
    /// `begincodespacerange`
    BeginCodespaceRange,
    /// `endcodespacerange` with the accumulated range bounds.
    EndCodespaceRange(Vec<Operand>),
    /// `beginbfrange`
    BeginBfRange,
    /// `endbfrange` with the accumulated range triples.
    EndBfRange(Vec<Operand>),
    /// `beginbfchar`
    BeginBfChar,
    /// `endbfchar` with the accumulated code/value pairs.
    EndBfChar(Vec<Operand>),
}

impl OperatorSet for CMapOp {
    const KEYWORDS: &'static [&'static str] = &[
        "begincodespacerange",
        "endcodespacerange",
        "beginbfrange",
        "endbfrange",
        "beginbfchar",
        "endbfchar",
    ];

    fn construct(keyword: &str, args: Args<'_, '_>) -> Result<Self, ParseError> {
        // The begin* keywords discard what precedes them, so the PostScript
        // boilerplate around CMap sections is never operand-parsed.
        Ok(match keyword {
            "begincodespacerange" => CMapOp::BeginCodespaceRange,
            "endcodespacerange" => CMapOp::EndCodespaceRange(args.parse()?),
            "beginbfrange" => CMapOp::BeginBfRange,
            "endbfrange" => CMapOp::EndBfRange(args.parse()?),
            "beginbfchar" => CMapOp::BeginBfChar,
            "endbfchar" => CMapOp::EndBfChar(args.parse()?),
            other => {
                return Err(ParseError::Structural(format!(
                    "keyword '{other}' is not in the CMap operator set"
                )));
            }
        })
    }
}

/// Parse a ToUnicode CMap stream into its code → string map.
pub fn parse_to_unicode(
    data: &[u8],
    warnings: &mut Vec<Warning>,
) -> Result<HashMap<u32, String>, ParseError> {
    let mut map = HashMap::new();
    for op in parse_operators::<CMapOp>(data)? {
        match op {
            CMapOp::EndBfChar(operands) => parse_bfchar(&operands, &mut map)?,
            CMapOp::EndBfRange(_) => {
                crate::record(
                    warnings,
                    Warning::with_code(
                        WarningCode::UnsupportedFeature,
                        "bfrange is currently not supported",
                    ),
                );
            }
            CMapOp::BeginCodespaceRange
            | CMapOp::EndCodespaceRange(_)
            | CMapOp::BeginBfRange
            | CMapOp::BeginBfChar => {}
        }
    }
    Ok(map)
}

/// Resolve `endbfchar` operands: alternating hex code and hex UTF-16BE value.
fn parse_bfchar(
    operands: &[Operand],
    map: &mut HashMap<u32, String>,
) -> Result<(), ParseError> {
    let mut key: Option<u32> = None;
    for operand in operands {
        let Operand::HexString(hex) = operand else {
            return Err(ParseError::Assertion(format!(
                "non-hexadecimal operand {operand:?} in bfchar"
            )));
        };
        match key.take() {
            Some(code) => {
                map.insert(code, decode_utf16be_hex(hex)?);
            }
            None => {
                key = Some(u32::from_str_radix(hex, 16).map_err(|_| {
                    ParseError::Assertion(format!("bfchar code '{hex}' is not hexadecimal"))
                })?);
            }
        }
    }
    Ok(())
}

/// Decode a hex digit string as UTF-16BE bytes, two digits per byte. A
/// trailing lone digit is dropped.
fn decode_utf16be_hex(hex: &str) -> Result<String, ParseError> {
    let digits = hex.as_bytes();
    let mut bytes = Vec::with_capacity(digits.len() / 2);
    for pair in digits.chunks_exact(2) {
        let text = std::str::from_utf8(pair)
            .map_err(|_| ParseError::Assertion(format!("bfchar value '{hex}' is not ASCII")))?;
        bytes.push(u8::from_str_radix(text, 16).map_err(|_| {
            ParseError::Assertion(format!("bfchar value '{hex}' is not hexadecimal"))
        })?);
    }
    let (decoded, _, _) = encoding_rs::UTF_16BE.decode(&bytes);
    Ok(decoded.into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(data: &[u8]) -> (HashMap<u32, String>, Vec<Warning>) {
        let mut warnings = Vec::new();
        let map = parse_to_unicode(data, &mut warnings).unwrap();
        (map, warnings)
    }

    #[test]
    fn bfchar_pairs_resolve() {
        let (map, warnings) = parse(
            b"2 beginbfchar\n<0041> <0041>\n<0042> <0062>\nendbfchar\n",
        );
        assert_eq!(map.get(&0x41).map(String::as_str), Some("A"));
        assert_eq!(map.get(&0x42).map(String::as_str), Some("b"));
        assert!(warnings.is_empty());
    }

    #[test]
    fn bfchar_value_may_be_multi_unit() {
        // fi ligature expands to "fi".
        let (map, _) = parse(b"beginbfchar <FB01> <00660069> endbfchar");
        assert_eq!(map.get(&0xFB01).map(String::as_str), Some("fi"));
    }

    #[test]
    fn bfchar_surrogate_pair_decodes() {
        let (map, _) = parse(b"beginbfchar <01> <D83DDE00> endbfchar");
        assert_eq!(map.get(&0x01).map(String::as_str), Some("\u{1F600}"));
    }

    #[test]
    fn bfrange_is_skipped_with_a_warning() {
        let (map, warnings) = parse(
            b"1 beginbfrange\n<0000> <00FF> <0041>\nendbfrange\n\
              1 beginbfchar\n<01> <0031>\nendbfchar\n",
        );
        assert!(map.get(&0x00).is_none());
        assert_eq!(map.get(&0x01).map(String::as_str), Some("1"));
        assert_eq!(warnings.len(), 1);
        assert_eq!(warnings[0].code, WarningCode::UnsupportedFeature);
    }

    #[test]
    fn codespacerange_is_ignored() {
        let (map, warnings) =
            parse(b"1 begincodespacerange\n<0000> <FFFF>\nendcodespacerange\n");
        assert!(map.is_empty());
        assert!(warnings.is_empty());
    }

    #[test]
    fn full_cmap_boilerplate_parses() {
        let data = b"/CIDInit /ProcSet findresource begin\n\
            12 dict begin\n\
            begincmap\n\
            1 begincodespacerange\n<0000> <FFFF>\nendcodespacerange\n\
            2 beginbfchar\n<0041> <0041>\n<0042> <0042>\nendbfchar\n\
            endcmap\nend\nend\n";
        // The boilerplate before each section attaches to a begin* keyword,
        // which discards its operand slice unparsed.
        let mut warnings = Vec::new();
        let map = parse_to_unicode(data, &mut warnings).unwrap();
        assert_eq!(map.get(&0x41).map(String::as_str), Some("A"));
        assert_eq!(map.get(&0x42).map(String::as_str), Some("B"));
    }

    #[test]
    fn non_hex_bfchar_operand_is_an_assertion() {
        let result = parse_to_unicode(b"beginbfchar (x) endbfchar", &mut Vec::new());
        assert!(matches!(result, Err(ParseError::Assertion(_))));
    }
}
