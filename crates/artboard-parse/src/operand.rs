//! Operand parser: filtered tokens → typed operand trees.
//!
//! Consumes the delimiter/range/literal-string tokens accumulated before an
//! operator keyword and produces [`Operand`] values. Array, dictionary, hex
//! string, and name modes are tracked across a recursive descent; structural
//! violations abort the parse.

use crate::error::ParseError;
use crate::lexer::Delimiter;

/// A token of interest to the operand parser. Whitespace and comments have
/// already been filtered out.
#[derive(Debug, Clone, PartialEq)]
pub enum ArgToken<'a> {
    /// A delimiter.
    Delimiter(Delimiter),
    /// A range of ordinary bytes.
    Range {
        /// The bytes of the run.
        bytes: &'a [u8],
        /// 1-based line number, for diagnostics.
        line: u32,
    },
    /// A literal string's inner bytes, escapes undecoded.
    LiteralString(&'a [u8]),
}

/// A typed content-stream operand.
#[derive(Debug, Clone, PartialEq)]
pub enum Operand {
    /// A number. PDF numbers are all parsed as `f64`.
    Number(f64),
    /// A name, without the leading `/`.
    Name(String),
    /// A literal string's raw bytes, escapes undecoded.
    LiteralString(Vec<u8>),
    /// A hexadecimal string's digits, undecoded.
    HexString(String),
    /// An array of operands.
    Array(Vec<Operand>),
    /// A dictionary with insertion-ordered keys.
    Dict(Vec<(String, Operand)>),
}

/// Parse a flat token sequence into operands.
pub fn parse_operands(tokens: &[ArgToken<'_>]) -> Result<Vec<Operand>, ParseError> {
    let mut cursor = Cursor { tokens, pos: 0 };
    collect(&mut cursor, Context::TopLevel)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Context {
    TopLevel,
    Array,
    Dict,
}

struct Cursor<'t, 'a> {
    tokens: &'t [ArgToken<'a>],
    pos: usize,
}

impl<'t, 'a> Cursor<'t, 'a> {
    fn next(&mut self) -> Option<&'t ArgToken<'a>> {
        let token = self.tokens.get(self.pos)?;
        self.pos += 1;
        Some(token)
    }
}

fn collect(cursor: &mut Cursor<'_, '_>, context: Context) -> Result<Vec<Operand>, ParseError> {
    let mut out = Vec::new();
    let mut in_hex = false;
    let mut in_name = false;

    while let Some(token) = cursor.next() {
        match token {
            ArgToken::Delimiter(Delimiter::ArrayOpen) => {
                out.push(Operand::Array(collect(cursor, Context::Array)?));
            }
            ArgToken::Delimiter(Delimiter::ArrayClose) => {
                if context != Context::Array {
                    return Err(ParseError::Structural(
                        "array finished before starting".to_string(),
                    ));
                }
                return Ok(out);
            }
            ArgToken::Delimiter(Delimiter::DictOpen) => {
                out.push(Operand::Dict(into_dict(collect(cursor, Context::Dict)?)?));
            }
            ArgToken::Delimiter(Delimiter::DictClose) => {
                if context != Context::Dict {
                    return Err(ParseError::Structural(
                        "dict finished before starting".to_string(),
                    ));
                }
                return Ok(out);
            }
            ArgToken::Delimiter(Delimiter::HexOpen) => {
                if in_hex {
                    return Err(ParseError::Structural(
                        "recursive hexadecimal string".to_string(),
                    ));
                }
                in_hex = true;
            }
            ArgToken::Delimiter(Delimiter::HexClose) => {
                if !in_hex {
                    return Err(ParseError::Structural(
                        "hexadecimal string finished before starting".to_string(),
                    ));
                }
                in_hex = false;
            }
            ArgToken::Delimiter(Delimiter::NameStart) => in_name = true,
            ArgToken::Delimiter(d) => {
                return Err(ParseError::Structural(format!(
                    "leftover delimiter {:?}",
                    String::from_utf8_lossy(d.as_bytes())
                )));
            }
            ArgToken::Range { bytes, line } => {
                if in_hex {
                    out.push(Operand::HexString(
                        String::from_utf8_lossy(bytes).into_owned(),
                    ));
                } else if in_name {
                    in_name = false;
                    out.push(Operand::Name(decode_name(bytes)));
                } else {
                    out.push(Operand::Number(parse_number(bytes, *line)?));
                }
            }
            ArgToken::LiteralString(bytes) => {
                out.push(Operand::LiteralString(bytes.to_vec()));
            }
        }
    }

    Ok(out)
}

/// Interleave a flat operand list into dictionary key/value pairs.
fn into_dict(values: Vec<Operand>) -> Result<Vec<(String, Operand)>, ParseError> {
    let mut entries = Vec::with_capacity(values.len() / 2);
    let mut values = values.into_iter();
    while let Some(key) = values.next() {
        let Operand::Name(key) = key else {
            return Err(ParseError::Structural(format!(
                "dict key is not a Name: {key:?}"
            )));
        };
        let Some(value) = values.next() else {
            return Err(ParseError::Structural(format!(
                "dict key '{key}' has no value"
            )));
        };
        entries.push((key, value));
    }
    Ok(entries)
}

/// Decode a name's bytes, resolving `#XX` hex escapes.
fn decode_name(bytes: &[u8]) -> String {
    let mut decoded = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'#' && i + 2 < bytes.len() {
            if let (Some(hi), Some(lo)) = (hex_digit(bytes[i + 1]), hex_digit(bytes[i + 2])) {
                decoded.push((hi << 4) | lo);
                i += 3;
                continue;
            }
        }
        decoded.push(bytes[i]);
        i += 1;
    }
    String::from_utf8_lossy(&decoded).into_owned()
}

fn hex_digit(b: u8) -> Option<u8> {
    match b {
        b'0'..=b'9' => Some(b - b'0'),
        b'a'..=b'f' => Some(b - b'a' + 10),
        b'A'..=b'F' => Some(b - b'A' + 10),
        _ => None,
    }
}

fn parse_number(bytes: &[u8], line: u32) -> Result<f64, ParseError> {
    let text = std::str::from_utf8(bytes)
        .map_err(|_| ParseError::Structural(format!("non-UTF-8 number token on line {line}")))?;
    text.parse().map_err(|_| {
        ParseError::Structural(format!("unparseable number '{text}' on line {line}"))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexer::{Lexer, Token};

    /// Lex and filter down to operand-parser input, the way the operator
    /// parser does.
    fn args(data: &[u8]) -> Vec<ArgToken<'_>> {
        Lexer::new(data)
            .filter_map(|t| match t {
                Token::Whitespace { .. } | Token::Comment { .. } => None,
                Token::Delimiter(d) => Some(ArgToken::Delimiter(d)),
                Token::Range { bytes, line, .. } => Some(ArgToken::Range { bytes, line }),
                Token::LiteralString { bytes, .. } => Some(ArgToken::LiteralString(bytes)),
            })
            .collect()
    }

    fn parse(data: &[u8]) -> Result<Vec<Operand>, ParseError> {
        parse_operands(&args(data))
    }

    #[test]
    fn numbers_parse_as_f64() {
        assert_eq!(
            parse(b"42 -7 3.14 .5 -.002").unwrap(),
            vec![
                Operand::Number(42.0),
                Operand::Number(-7.0),
                Operand::Number(3.14),
                Operand::Number(0.5),
                Operand::Number(-0.002),
            ]
        );
    }

    #[test]
    fn unparseable_number_is_structural() {
        assert!(matches!(parse(b"12..3"), Err(ParseError::Structural(_))));
    }

    #[test]
    fn names_follow_solidus() {
        assert_eq!(
            parse(b"/F1 /DeviceRGB").unwrap(),
            vec![
                Operand::Name("F1".to_string()),
                Operand::Name("DeviceRGB".to_string()),
            ]
        );
    }

    #[test]
    fn name_hex_escapes_decode() {
        assert_eq!(parse(b"/F#231").unwrap(), vec![Operand::Name("F#1".to_string())]);
    }

    #[test]
    fn literal_string_bytes_pass_through() {
        assert_eq!(
            parse(b"(he(ll)o)").unwrap(),
            vec![Operand::LiteralString(b"he(ll)o".to_vec())]
        );
    }

    #[test]
    fn hex_string_keeps_digits() {
        assert_eq!(
            parse(b"<48656C6C6F>").unwrap(),
            vec![Operand::HexString("48656C6C6F".to_string())]
        );
    }

    #[test]
    fn hex_string_split_by_whitespace_yields_pieces() {
        assert_eq!(
            parse(b"<48 65>").unwrap(),
            vec![
                Operand::HexString("48".to_string()),
                Operand::HexString("65".to_string()),
            ]
        );
    }

    #[test]
    fn nested_hex_string_is_structural() {
        let tokens = vec![
            ArgToken::Delimiter(Delimiter::HexOpen),
            ArgToken::Delimiter(Delimiter::HexOpen),
        ];
        assert!(matches!(
            parse_operands(&tokens),
            Err(ParseError::Structural(_))
        ));
    }

    #[test]
    fn arrays_nest() {
        assert_eq!(
            parse(b"[1 [2 3] /N]").unwrap(),
            vec![Operand::Array(vec![
                Operand::Number(1.0),
                Operand::Array(vec![Operand::Number(2.0), Operand::Number(3.0)]),
                Operand::Name("N".to_string()),
            ])]
        );
    }

    #[test]
    fn dict_interleaves_pairs_in_order() {
        assert_eq!(
            parse(b"<< /B 1 /A 2 >>").unwrap(),
            vec![Operand::Dict(vec![
                ("B".to_string(), Operand::Number(1.0)),
                ("A".to_string(), Operand::Number(2.0)),
            ])]
        );
    }

    #[test]
    fn dict_nests() {
        assert_eq!(
            parse(b"<< /Outer << /Inner 42 >> >>").unwrap(),
            vec![Operand::Dict(vec![(
                "Outer".to_string(),
                Operand::Dict(vec![("Inner".to_string(), Operand::Number(42.0))]),
            )])]
        );
    }

    #[test]
    fn dict_key_must_be_name() {
        assert!(matches!(
            parse(b"<< 1 2 >>"),
            Err(ParseError::Structural(_))
        ));
    }

    #[test]
    fn unmatched_array_close_is_structural() {
        assert!(matches!(parse(b"]"), Err(ParseError::Structural(_))));
    }

    #[test]
    fn unmatched_dict_close_is_structural() {
        assert!(matches!(parse(b">>"), Err(ParseError::Structural(_))));
    }

    #[test]
    fn mixed_array_of_strings_and_kerns() {
        assert_eq!(
            parse(b"[(H) -20 (ello)]").unwrap(),
            vec![Operand::Array(vec![
                Operand::LiteralString(b"H".to_vec()),
                Operand::Number(-20.0),
                Operand::LiteralString(b"ello".to_vec()),
            ])]
        );
    }

    #[test]
    fn empty_input_is_empty() {
        assert!(parse(b"").unwrap().is_empty());
    }
}
