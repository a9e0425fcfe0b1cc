//! Module `scanner` implements a one‑pass, streaming lexer for KPL source text.
//!
//! It transforms a `&str` into a sequence of `Token<'a>`s, skipping whitespace
//! and `(* … *)` comments, and emitting exactly one `EOF` token at the end.
//! Designed as a `FusedIterator`, it doubles as the parser's token source.
//!
//! # Public API
//!
//! - `Scanner::new(src: &'a str) -> Scanner<'a>`
//!   Create a new lexer over the input text.
//!
//! - `impl Iterator for Scanner<'a>`
//!   Yields `Result<Token<'a>, KplError>` on each `.next()`.  Lexical errors carry
//!   line and column; scanning resumes after the offending character.
//!
//! # Token Recognition (`scan_token`)
//!
//! - Single‑character tokens: `;`, `.`, `,`, `=`, `+`, `-`, `*`, `/`, `(`, `)`, `[`, `]`.
//! - Two‑character operators: `:=`, `<=`, `<>`, `>=`.
//! - Character literals: exactly one printable ASCII character between quotes.
//! - Numeric literals: unsigned digit sequences.
//! - Identifiers/keywords: keywords are case‑insensitive and resolved via a
//!   perfect‑hash `KEYWORDS` map.
//! - Comments are skipped in bulk with `memchr`, tracking newlines they span.
//!
//! Columns are 1‑based byte offsets from the start of the line.

use crate::error::{KplError, Result};
use crate::token::{Token, TokenType};
use log::{info, trace};
use memchr::{memchr, memchr_iter, memrchr};
use phf::phf_map;
use std::iter::FusedIterator;

// ─────────────────────────────────────────────────────────────────────────────
// Static keyword map (compile‑time perfect hash, lower‑case keys)
// ─────────────────────────────────────────────────────────────────────────────

static KEYWORDS: phf::Map<&'static [u8], TokenType> = phf_map! {
    b"program"   => TokenType::PROGRAM,
    b"const"     => TokenType::CONST,
    b"type"      => TokenType::TYPE,
    b"var"       => TokenType::VAR,
    b"function"  => TokenType::FUNCTION,
    b"procedure" => TokenType::PROCEDURE,
    b"begin"     => TokenType::BEGIN,
    b"end"       => TokenType::END,
    b"call"      => TokenType::CALL,
    b"if"        => TokenType::IF,
    b"then"      => TokenType::THEN,
    b"else"      => TokenType::ELSE,
    b"while"     => TokenType::WHILE,
    b"do"        => TokenType::DO,
    b"for"       => TokenType::FOR,
    b"to"        => TokenType::TO,
    b"array"     => TokenType::ARRAY,
    b"of"        => TokenType::OF,
    b"integer"   => TokenType::INTEGER,
    b"char"      => TokenType::CHAR,
};

/// Length of the longest keyword (`procedure`).
const MAX_KEYWORD_LEN: usize = 9;

/// A single pass **scanner / lexer** that converts KPL source text into a
/// sequence of [`Token`]s.  The lifetime `'a` ties every emitted token’s
/// `lexeme` slice back to the original source.
pub struct Scanner<'a> {
    src: &'a str,               // entire source text
    start: usize,               // index of the *first* byte of the current lexeme
    curr: usize,                // index *one past* the last byte examined
    line: usize,                // 1‑based line counter (\n increments)
    line_start: usize,          // index of the first byte of the current line
    token_line: usize,          // line on which the current lexeme starts
    token_column: usize,        // column at which the current lexeme starts
    pending: Option<TokenType>, // recognised token kind waiting to be emitted
}

impl<'a> Scanner<'a> {
    /// Create a new lexer over `src`.
    #[inline]
    pub fn new(src: &'a str) -> Self {
        info!("Scanner created over {} bytes", src.len());

        Self {
            src,
            start: 0,
            curr: 0,
            line: 1,
            line_start: 0,
            token_line: 1,
            token_column: 1,
            pending: None,
        }
    }

    // ───────────────────────────── primitive helpers ────────────────────────

    #[inline(always)]
    fn bytes(&self) -> &'a [u8] {
        self.src.as_bytes()
    }

    #[inline(always)]
    fn is_at_end(&self) -> bool {
        self.curr >= self.src.len()
    }

    /// Advance one byte and return it.  Callers guard with [`is_at_end`].
    #[inline(always)]
    fn advance(&mut self) -> u8 {
        let b = self.bytes()[self.curr];
        self.curr += 1;
        b
    }

    /// Peek at the current byte without consuming it.  Returns `0` past EOF.
    #[inline(always)]
    fn peek(&self) -> u8 {
        self.bytes().get(self.curr).copied().unwrap_or(0)
    }

    /// Conditionally consume a byte **iff** it matches `expected`.
    #[inline(always)]
    fn match_byte(&mut self, expected: u8) -> bool {
        if !self.is_at_end() && self.peek() == expected {
            self.advance();
            true
        } else {
            false
        }
    }

    #[inline(always)]
    fn newline(&mut self) {
        self.line += 1;
        self.line_start = self.curr;
    }

    fn error<S: Into<String>>(&self, msg: S) -> KplError {
        KplError::lex(self.token_line, self.token_column, msg)
    }

    // ───────────────────────────── core lexing ─────────────────────────────

    /// Scan a *single* token starting at `self.curr`.  If the lexeme produces an
    /// actual token the kind is stored in `self.pending`.  Whitespace and
    /// comments are skipped by returning `Ok(())` with `pending = None`.
    fn scan_token(&mut self) -> Result<()> {
        let b = self.advance();

        let tt = match b {
            // ── single‑character punctuators ──────────────────────────────
            b';' => TokenType::SEMICOLON,
            b'.' => TokenType::PERIOD,
            b',' => TokenType::COMMA,
            b'=' => TokenType::EQUAL,
            b'+' => TokenType::PLUS,
            b'-' => TokenType::MINUS,
            b'*' => TokenType::STAR,
            b'/' => TokenType::SLASH,
            b')' => TokenType::RIGHT_PAREN,
            b'[' => TokenType::LEFT_BRACKET,
            b']' => TokenType::RIGHT_BRACKET,

            // ── two‑character operators (:=, <=, <>, >=) ─────────────────
            b':' => {
                if self.match_byte(b'=') {
                    TokenType::ASSIGN
                } else {
                    TokenType::COLON
                }
            }

            b'<' => {
                if self.match_byte(b'=') {
                    TokenType::LESS_EQUAL
                } else if self.match_byte(b'>') {
                    TokenType::NOT_EQUAL
                } else {
                    TokenType::LESS
                }
            }

            b'>' => {
                if self.match_byte(b'=') {
                    TokenType::GREATER_EQUAL
                } else {
                    TokenType::GREATER
                }
            }

            // ── '(' or the start of a (* … *) comment ───────────────────
            b'(' => {
                if self.match_byte(b'*') {
                    return self.skip_comment();
                }

                TokenType::LEFT_PAREN
            }

            // ── whitespace / newline ─────────────────────────────────────
            b' ' | b'\r' | b'\t' => return Ok(()),

            b'\n' => {
                self.newline();

                return Ok(());
            }

            b'\'' => return self.parse_char(),

            b'0'..=b'9' => {
                self.parse_number();

                return Ok(());
            }

            b'a'..=b'z' | b'A'..=b'Z' => {
                self.parse_identifier();

                return Ok(());
            }

            // ── unexpected character ─────────────────────────────────────
            _ => {
                let c: char = self.src[self.start..].chars().next().unwrap_or('\u{FFFD}');
                self.curr = self.start + c.len_utf8(); // resume on a char boundary

                return Err(self.error(format!("Invalid symbol: {}", c)));
            }
        };

        self.pending = Some(tt);

        Ok(())
    }

    /// Skip a `(* … *)` comment.  `self.curr` points just past the opening `(*`.
    fn skip_comment(&mut self) -> Result<()> {
        loop {
            let rest: &[u8] = &self.bytes()[self.curr..];

            let Some(star) = memchr(b'*', rest) else {
                self.consume_span(rest.len());

                return Err(self.error("End of file reached inside a comment"));
            };

            if rest.get(star + 1) == Some(&b')') {
                self.consume_span(star + 2);

                return Ok(());
            }

            self.consume_span(star + 1);
        }
    }

    /// Move `curr` forward by `len` bytes, keeping line bookkeeping in sync.
    fn consume_span(&mut self, len: usize) {
        let span: &[u8] = &self.bytes()[self.curr..self.curr + len];

        self.line += memchr_iter(b'\n', span).count();

        if let Some(last) = memrchr(b'\n', span) {
            self.line_start = self.curr + last + 1;
        }

        self.curr += len;
    }

    /// Parse a quoted character literal `'c'`.
    fn parse_char(&mut self) -> Result<()> {
        let c: u8 = self.peek();

        if !(b' '..=b'~').contains(&c) {
            return Err(self.error("Invalid character constant"));
        }

        self.advance();

        if !self.match_byte(b'\'') {
            return Err(self.error("Invalid character constant"));
        }

        self.pending = Some(TokenType::CHAR_LITERAL);

        Ok(())
    }

    /// Parse an unsigned integer literal.
    fn parse_number(&mut self) {
        while self.peek().is_ascii_digit() {
            self.advance();
        }

        self.pending = Some(TokenType::NUMBER);
    }

    /// Parse an identifier and decide if it is a **keyword** or a generic
    /// `IDENTIFIER` token.
    fn parse_identifier(&mut self) {
        while {
            let c: u8 = self.peek();
            c.is_ascii_alphanumeric() || c == b'_'
        } {
            self.advance();
        }

        let lexeme: &[u8] = &self.bytes()[self.start..self.curr];

        // Fold case on the stack; nothing longer than a keyword can be one.
        let tt: TokenType = if lexeme.len() <= MAX_KEYWORD_LEN {
            let mut buf = [0u8; MAX_KEYWORD_LEN];
            let folded: &mut [u8] = &mut buf[..lexeme.len()];

            folded.copy_from_slice(lexeme);
            folded.make_ascii_lowercase();

            KEYWORDS
                .get(&*folded)
                .copied()
                .unwrap_or(TokenType::IDENTIFIER)
        } else {
            TokenType::IDENTIFIER
        };

        self.pending = Some(tt);
    }
}

// ───────────────────────── Iterator implementation ─────────────────────────

impl<'a> Iterator for Scanner<'a> {
    type Item = Result<Token<'a>>;

    fn next(&mut self) -> Option<Self::Item> {
        while self.curr <= self.src.len() {
            self.start = self.curr;
            self.token_line = self.line;
            self.token_column = self.curr - self.line_start + 1;

            // Emit exactly one EOF then terminate.
            if self.curr == self.src.len() {
                self.curr += 1;

                return Some(Ok(Token::new(
                    TokenType::EOF,
                    "",
                    self.token_line,
                    self.token_column,
                )));
            }

            self.pending = None;

            if let Err(e) = self.scan_token() {
                return Some(Err(e));
            }

            if let Some(tt) = self.pending.take() {
                let lexeme: &'a str = &self.src[self.start..self.curr];

                trace!(
                    "Scanned token ({:?}) at {}:{}",
                    tt,
                    self.token_line,
                    self.token_column
                );

                return Some(Ok(Token::new(
                    tt,
                    lexeme,
                    self.token_line,
                    self.token_column,
                )));
            }
            // Otherwise it was whitespace / comment → continue loop.
        }

        None // already yielded EOF
    }
}

impl<'a> FusedIterator for Scanner<'a> {}
