//! Low-level source scanning.
//!
//! The [`Scanner`] is a byte cursor over source text. It knows just enough
//! lexical structure to never mistake punctuation inside a string literal or
//! comment for real syntax: every higher-level parser in this crate composes
//! [`Scanner::skip_trivia`], [`Scanner::skip_string`] and
//! [`Scanner::skip_comment`] instead of inspecting bytes directly.
//!
//! Unlike a token-stream lexer, the scanner is seekable: the file transformer
//! jumps the cursor past an entire parsed definition with
//! [`Scanner::set_pos`].

/// Check if a byte can start an identifier.
#[inline]
pub fn is_ident_start(b: u8) -> bool {
    b.is_ascii_alphabetic() || b == b'_'
}

/// Check if a byte can continue an identifier.
#[inline]
pub fn is_ident_char(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'_'
}

/// Check if a byte can appear in a (possibly qualified) type token.
///
/// Type tokens extend identifiers with `.` and `:` so that qualified names
/// like `outer.Inner` or `ns::Name` are consumed as a single token.
#[inline]
pub fn is_type_char(b: u8) -> bool {
    is_ident_char(b) || b == b'.' || b == b':'
}

/// A seekable byte cursor over source text.
pub struct Scanner<'src> {
    text: &'src str,
    pos: usize,
}

impl<'src> Scanner<'src> {
    /// Create a scanner at the start of the source.
    pub fn new(text: &'src str) -> Self {
        Self { text, pos: 0 }
    }

    /// Create a scanner positioned at `pos`.
    pub fn at(text: &'src str, pos: usize) -> Self {
        Self { text, pos }
    }

    /// Current byte offset.
    #[inline]
    pub fn pos(&self) -> usize {
        self.pos
    }

    /// Move the cursor to an absolute byte offset.
    #[inline]
    pub fn set_pos(&mut self, pos: usize) {
        self.pos = pos.min(self.text.len());
    }

    /// Check if the cursor has reached the end of input.
    #[inline]
    pub fn is_eof(&self) -> bool {
        self.pos >= self.text.len()
    }

    /// Peek at the current byte without consuming it.
    #[inline]
    pub fn peek(&self) -> Option<u8> {
        self.text.as_bytes().get(self.pos).copied()
    }

    /// Peek at the byte `n` positions ahead (0 = current).
    #[inline]
    pub fn peek_at(&self, n: usize) -> Option<u8> {
        self.text.as_bytes().get(self.pos + n).copied()
    }

    /// Consume one byte.
    #[inline]
    pub fn advance(&mut self) {
        if self.pos < self.text.len() {
            self.pos += 1;
        }
    }

    /// Consume `n` bytes, clamped to the end of input.
    #[inline]
    pub fn advance_by(&mut self, n: usize) {
        self.pos = (self.pos + n).min(self.text.len());
    }

    /// Consume one full character and return it.
    ///
    /// The byte-oriented `advance` is correct everywhere the scanner
    /// dispatches on ASCII structure; this is the escape hatch for copying
    /// arbitrary text through unchanged.
    pub fn advance_char(&mut self) -> Option<char> {
        let ch = self.text[self.pos..].chars().next()?;
        self.pos += ch.len_utf8();
        Some(ch)
    }

    /// Test whether `word` appears at the cursor as a whole word.
    ///
    /// Both neighbors, when present, must be non-identifier bytes.
    pub fn match_keyword(&self, word: &str) -> bool {
        let bytes = self.text.as_bytes();
        let end = self.pos + word.len();
        if end > bytes.len() {
            return false;
        }
        if self.pos > 0 && is_ident_char(bytes[self.pos - 1]) {
            return false;
        }
        if end < bytes.len() && is_ident_char(bytes[end]) {
            return false;
        }
        &bytes[self.pos..end] == word.as_bytes()
    }

    /// Advance past any run of whitespace and comments.
    pub fn skip_trivia(&mut self) {
        while let Some(c) = self.peek() {
            if c.is_ascii_whitespace() {
                self.advance();
                continue;
            }
            if c == b'/' && self.skip_comment() {
                continue;
            }
            break;
        }
    }

    /// If the cursor sits on `//` or `/*`, advance past the comment.
    ///
    /// Line comments stop before the terminating newline; block comments do
    /// not nest and an unterminated one consumes the rest of the input.
    /// Returns whether a comment was consumed.
    pub fn skip_comment(&mut self) -> bool {
        match (self.peek(), self.peek_at(1)) {
            (Some(b'/'), Some(b'/')) => {
                self.advance_by(2);
                while let Some(c) = self.peek() {
                    if c == b'\n' {
                        break;
                    }
                    self.advance();
                }
                true
            }
            (Some(b'/'), Some(b'*')) => {
                self.advance_by(2);
                while self.peek_at(1).is_some() {
                    if self.peek() == Some(b'*') && self.peek_at(1) == Some(b'/') {
                        break;
                    }
                    self.advance();
                }
                self.advance_by(2);
                true
            }
            _ => false,
        }
    }

    /// Advance past a string literal, cursor on the opening delimiter.
    ///
    /// `\x` is a two-byte escape regardless of what `x` is. An unterminated
    /// literal consumes the rest of the input.
    pub fn skip_string(&mut self, delimiter: u8) {
        self.advance();
        while let Some(c) = self.peek() {
            if c == b'\\' {
                self.advance_by(2);
                continue;
            }
            self.advance();
            if c == delimiter {
                break;
            }
        }
    }
}
