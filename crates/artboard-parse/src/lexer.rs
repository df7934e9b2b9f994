//! Byte-level lexer for content and CMap streams.
//!
//! A single forward pass over an immutable byte buffer, yielding whitespace,
//! delimiter, range, literal-string, and comment tokens. Range-like tokens
//! record their byte offsets (end-exclusive) and the 1-based line number at
//! which they start, for diagnostics. Escape sequences inside literal strings
//! are left undecoded here; the operand and text layers deal with them.

/// PDF lexical conventions, 7.2.
const fn is_whitespace(b: u8) -> bool {
    matches!(b, 0x00 | 0x09 | 0x0C | 0x20)
}

const fn is_eol(b: u8) -> bool {
    matches!(b, b'\r' | b'\n')
}

const fn is_delimiter(b: u8) -> bool {
    matches!(
        b,
        b'(' | b')' | b'<' | b'>' | b'[' | b']' | b'{' | b'}' | b'/' | b'%'
    )
}

/// A delimiter with syntactic meaning of its own.
///
/// `(` and `%` never surface here: they open literal strings and comments,
/// which the lexer consumes whole.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Delimiter {
    /// `[`
    ArrayOpen,
    /// `]`
    ArrayClose,
    /// `<<`
    DictOpen,
    /// `>>`
    DictClose,
    /// `<`
    HexOpen,
    /// `>`
    HexClose,
    /// `/`
    NameStart,
    /// `{`
    ProcOpen,
    /// `}`
    ProcClose,
    /// A stray `)` with no opener.
    StringClose,
}

impl Delimiter {
    /// The source bytes this delimiter was lexed from.
    pub fn as_bytes(&self) -> &'static [u8] {
        match self {
            Delimiter::ArrayOpen => b"[",
            Delimiter::ArrayClose => b"]",
            Delimiter::DictOpen => b"<<",
            Delimiter::DictClose => b">>",
            Delimiter::HexOpen => b"<",
            Delimiter::HexClose => b">",
            Delimiter::NameStart => b"/",
            Delimiter::ProcOpen => b"{",
            Delimiter::ProcClose => b"}",
            Delimiter::StringClose => b")",
        }
    }
}

/// A lexed token.
#[derive(Debug, Clone, PartialEq)]
pub enum Token<'a> {
    /// A run of whitespace; one EOL marker (CR, LF, or CRLF) per token when
    /// `is_eol` is set.
    Whitespace {
        /// True when this token is an end-of-line marker.
        is_eol: bool,
    },
    /// A delimiter character (or two-character `<<`/`>>`).
    Delimiter(Delimiter),
    /// A run of bytes with no special meaning on its own — a number, a
    /// keyword, or the body of a name.
    Range {
        /// The bytes of the run.
        bytes: &'a [u8],
        /// Byte offset of the first byte.
        start: usize,
        /// Byte offset one past the last byte.
        end: usize,
        /// 1-based line number at token start.
        line: u32,
    },
    /// A `(`-delimited literal string. `bytes` holds the inner bytes with
    /// the enclosing parentheses stripped and escapes left intact; the
    /// offsets span the full delimited form.
    LiteralString {
        /// The inner bytes, escapes undecoded.
        bytes: &'a [u8],
        /// Byte offset of the opening parenthesis.
        start: usize,
        /// Byte offset one past the closing parenthesis.
        end: usize,
        /// 1-based line number at token start.
        line: u32,
    },
    /// A `%` comment extending to (not including) the next EOL.
    Comment {
        /// The comment bytes including the leading `%`.
        bytes: &'a [u8],
        /// Byte offset of the `%`.
        start: usize,
        /// Byte offset one past the last comment byte.
        end: usize,
        /// 1-based line number at token start.
        line: u32,
    },
}

/// A lazy, single-pass lexer over a byte buffer.
///
/// Not restartable: it is an [`Iterator`] consumed once, front to back.
pub struct Lexer<'a> {
    data: &'a [u8],
    pos: usize,
    line: u32,
}

impl<'a> Lexer<'a> {
    /// Create a lexer over `data`.
    pub fn new(data: &'a [u8]) -> Self {
        Self {
            data,
            pos: 0,
            line: 1,
        }
    }

    fn peek(&self) -> Option<u8> {
        self.data.get(self.pos).copied()
    }

    fn eol(&mut self) -> Token<'a> {
        let b = self.data[self.pos];
        self.pos += 1;
        // CR immediately followed by LF is one EOL marker.
        if b == b'\r' && self.peek() == Some(b'\n') {
            self.pos += 1;
        }
        self.line += 1;
        Token::Whitespace { is_eol: true }
    }

    fn whitespace(&mut self) -> Token<'a> {
        while self.peek().is_some_and(is_whitespace) {
            self.pos += 1;
        }
        Token::Whitespace { is_eol: false }
    }

    fn comment(&mut self) -> Token<'a> {
        let start = self.pos;
        let line = self.line;
        while self.peek().is_some_and(|b| !is_eol(b)) {
            self.pos += 1;
        }
        let end = self.pos;
        Token::Comment {
            bytes: &self.data[start..end],
            start,
            end,
            line,
        }
    }

    fn literal_string(&mut self) -> Token<'a> {
        let start = self.pos;
        let line = self.line;
        let mut depth = 1u32;
        self.pos += 1; // opening '('
        while depth > 0 {
            let Some(b) = self.peek() else { break };
            match b {
                // A reverse solidus escapes the following byte; it is
                // skipped here and decoded by the operand/text layer. A
                // trailing solidus with nothing after it escapes nothing.
                b'\\' => {
                    if self.pos + 1 < self.data.len() {
                        self.pos += 1;
                    }
                }
                b'(' => depth += 1,
                b')' => depth -= 1,
                b'\r' | b'\n' => self.line += 1,
                _ => {}
            }
            self.pos += 1;
        }
        let end = self.pos;
        // Strip the enclosing parentheses; an unterminated string keeps
        // everything after the opener.
        let inner_end = if depth == 0 { end - 1 } else { end };
        Token::LiteralString {
            bytes: &self.data[(start + 1).min(inner_end)..inner_end],
            start,
            end,
            line,
        }
    }

    fn delimiter(&mut self, b: u8) -> Token<'a> {
        self.pos += 1;
        let delimiter = match b {
            b'<' if self.peek() == Some(b'<') => {
                self.pos += 1;
                Delimiter::DictOpen
            }
            b'>' if self.peek() == Some(b'>') => {
                self.pos += 1;
                Delimiter::DictClose
            }
            b'<' => Delimiter::HexOpen,
            b'>' => Delimiter::HexClose,
            b'[' => Delimiter::ArrayOpen,
            b']' => Delimiter::ArrayClose,
            b'{' => Delimiter::ProcOpen,
            b'}' => Delimiter::ProcClose,
            b'/' => Delimiter::NameStart,
            _ => Delimiter::StringClose, // ')'
        };
        Token::Delimiter(delimiter)
    }

    fn range(&mut self) -> Token<'a> {
        let start = self.pos;
        let line = self.line;
        while self
            .peek()
            .is_some_and(|b| !is_whitespace(b) && !is_eol(b) && !is_delimiter(b))
        {
            self.pos += 1;
        }
        let end = self.pos;
        Token::Range {
            bytes: &self.data[start..end],
            start,
            end,
            line,
        }
    }
}

impl<'a> Iterator for Lexer<'a> {
    type Item = Token<'a>;

    fn next(&mut self) -> Option<Token<'a>> {
        let b = self.peek()?;
        Some(if is_whitespace(b) {
            self.whitespace()
        } else if is_eol(b) {
            self.eol()
        } else if b == b'%' {
            self.comment()
        } else if b == b'(' {
            self.literal_string()
        } else if is_delimiter(b) {
            self.delimiter(b)
        } else {
            self.range()
        })
    }
}
