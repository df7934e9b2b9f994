//! Generic operator parser.
//!
//! Buffers the token stream and yields one typed operator per recognized
//! keyword, pairing it with every operand token accumulated since the
//! previous keyword. The keyword set is supplied by an [`OperatorSet`]
//! implementation, so the same machinery parses both content streams and
//! embedded CMap streams.
//!
//! Operand slices are handed to constructors unparsed: a constructor that
//! ignores its operands (`q`, `beginbfchar`) never pays for — or trips
//! over — tokens it does not use. CMap streams rely on this: the
//! PostScript boilerplate between their sections never survives operand
//! parsing, but it always precedes a keyword that discards it.

use crate::error::ParseError;
use crate::lexer::{Lexer, Token};
use crate::operand::{ArgToken, Operand, parse_operands};

/// The unparsed operand tokens accumulated before a keyword.
///
/// Call [`Args::parse`] to run the operand parser over exactly this slice.
pub struct Args<'t, 'a> {
    tokens: &'t [ArgToken<'a>],
}

impl Args<'_, '_> {
    /// Parse the slice into typed operands.
    pub fn parse(&self) -> Result<Vec<Operand>, ParseError> {
        parse_operands(self.tokens)
    }

    /// True when no operand tokens preceded the keyword.
    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }
}

/// A closed keyword set with a constructor from keyword + operand tokens
/// into a strongly-typed operator value.
pub trait OperatorSet: Sized {
    /// Every keyword this set recognizes.
    const KEYWORDS: &'static [&'static str];

    /// Build the typed operator for `keyword`. `keyword` is guaranteed to
    /// be in [`Self::KEYWORDS`].
    fn construct(keyword: &str, args: Args<'_, '_>) -> Result<Self, ParseError>;
}

/// Candidate keywords indexed by byte length, so each range token is
/// compared only against keywords of its own length.
struct KeywordLookup {
    by_len: Vec<Vec<&'static str>>,
}

impl KeywordLookup {
    fn new(keywords: &[&'static str]) -> Self {
        let max = keywords.iter().map(|k| k.len()).max().unwrap_or(0);
        let mut by_len = vec![Vec::new(); max + 1];
        for &keyword in keywords {
            by_len[keyword.len()].push(keyword);
        }
        Self { by_len }
    }

    fn matches(&self, bytes: &[u8]) -> Option<&'static str> {
        self.by_len
            .get(bytes.len())?
            .iter()
            .copied()
            .find(|k| k.as_bytes() == bytes)
    }
}

/// Parse a byte buffer into the typed operators of set `S`.
///
/// Operand tokens trailing the final keyword are discarded: operands only
/// have meaning as arguments to the keyword that follows them.
pub fn parse_operators<S: OperatorSet>(data: &[u8]) -> Result<Vec<S>, ParseError> {
    let lookup = KeywordLookup::new(S::KEYWORDS);
    let mut pending: Vec<ArgToken<'_>> = Vec::new();
    let mut out = Vec::new();

    for token in Lexer::new(data) {
        match token {
            Token::Whitespace { .. } | Token::Comment { .. } => {}
            Token::Range { bytes, line, .. } => {
                if let Some(keyword) = lookup.matches(bytes) {
                    out.push(S::construct(keyword, Args { tokens: &pending })?);
                    pending.clear();
                } else {
                    pending.push(ArgToken::Range { bytes, line });
                }
            }
            Token::Delimiter(d) => pending.push(ArgToken::Delimiter(d)),
            Token::LiteralString { bytes, .. } => pending.push(ArgToken::LiteralString(bytes)),
        }
    }

    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, PartialEq)]
    enum TestOp {
        Alpha(Vec<Operand>),
        Beta(Vec<Operand>),
        Discard,
    }

    impl OperatorSet for TestOp {
        const KEYWORDS: &'static [&'static str] = &["a", "bb", "discard"];

        fn construct(keyword: &str, args: Args<'_, '_>) -> Result<Self, ParseError> {
            Ok(match keyword {
                "a" => TestOp::Alpha(args.parse()?),
                "bb" => TestOp::Beta(args.parse()?),
                _ => TestOp::Discard,
            })
        }
    }

    #[test]
    fn operands_attach_to_the_following_keyword() {
        let ops: Vec<TestOp> = parse_operators(b"1 2 a /N bb").unwrap();
        assert_eq!(
            ops,
            vec![
                TestOp::Alpha(vec![Operand::Number(1.0), Operand::Number(2.0)]),
                TestOp::Beta(vec![Operand::Name("N".to_string())]),
            ]
        );
    }

    #[test]
    fn keyword_requires_exact_byte_match_of_same_length() {
        // "ab" has the length of "bb" but matches no keyword, so it must
        // parse as an operand — which fails as a number.
        let result: Result<Vec<TestOp>, _> = parse_operators(b"ab a");
        assert!(matches!(result, Err(ParseError::Structural(_))));
    }

    #[test]
    fn zero_operand_keywords_work() {
        let ops: Vec<TestOp> = parse_operators(b"a a").unwrap();
        assert_eq!(ops, vec![TestOp::Alpha(vec![]), TestOp::Alpha(vec![])]);
    }

    #[test]
    fn discarding_constructors_never_parse_their_slice() {
        // "junk" is unparseable as an operand, but `discard` ignores it.
        let ops: Vec<TestOp> = parse_operators(b"junk discard a").unwrap();
        assert_eq!(ops, vec![TestOp::Discard, TestOp::Alpha(vec![])]);
    }

    #[test]
    fn trailing_operands_are_discarded() {
        let ops: Vec<TestOp> = parse_operators(b"a 1 2").unwrap();
        assert_eq!(ops, vec![TestOp::Alpha(vec![])]);
    }

    #[test]
    fn comments_and_whitespace_are_invisible() {
        let ops: Vec<TestOp> = parse_operators(b"% intro\n1 % mid\n a").unwrap();
        assert_eq!(ops, vec![TestOp::Alpha(vec![Operand::Number(1.0)])]);
    }
}
