use log::trace;
use serde::Serialize;
use std::fmt;

/// The different kinds of tokens recognized by the KPL scanner.
///
/// Variants carry no data: the lexeme text lives on [`Token`], so two
/// `TokenType`s compare equal exactly when they are the same variant.
/// `EOF` marks the end of input.
#[allow(non_camel_case_types)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum TokenType {
    // ── reserved words ──────────────────────────────────────────────
    PROGRAM,
    CONST,
    TYPE,
    VAR,
    FUNCTION,
    PROCEDURE,
    BEGIN,
    END,
    CALL,
    IF,
    THEN,
    ELSE,
    WHILE,
    DO,
    FOR,
    TO,
    ARRAY,
    OF,
    INTEGER,
    CHAR,

    // ── literals ────────────────────────────────────────────────────
    /// A user‑defined identifier
    IDENTIFIER,

    /// An unsigned integer literal
    NUMBER,

    /// A quoted character literal such as `'a'`
    CHAR_LITERAL,

    // ── punctuation / operators ─────────────────────────────────────
    /// ';'
    SEMICOLON,

    /// '.'
    PERIOD,

    /// ','
    COMMA,

    /// ':'
    COLON,

    /// ':='
    ASSIGN,

    /// '='
    EQUAL,

    /// '<>'
    NOT_EQUAL,

    /// '<'
    LESS,

    /// '<='
    LESS_EQUAL,

    /// '>'
    GREATER,

    /// '>='
    GREATER_EQUAL,

    /// '+'
    PLUS,

    /// '-'
    MINUS,

    /// '*'
    STAR,

    /// '/'
    SLASH,

    /// '('
    LEFT_PAREN,

    /// ')'
    RIGHT_PAREN,

    /// '['
    LEFT_BRACKET,

    /// ']'
    RIGHT_BRACKET,

    /// End‑of‑file marker
    EOF,
}

impl TokenType {
    /// Human‑readable spelling used in diagnostics, e.g. `';'` or `keyword 'begin'`.
    pub fn describe(self) -> &'static str {
        match self {
            TokenType::PROGRAM => "keyword 'program'",
            TokenType::CONST => "keyword 'const'",
            TokenType::TYPE => "keyword 'type'",
            TokenType::VAR => "keyword 'var'",
            TokenType::FUNCTION => "keyword 'function'",
            TokenType::PROCEDURE => "keyword 'procedure'",
            TokenType::BEGIN => "keyword 'begin'",
            TokenType::END => "keyword 'end'",
            TokenType::CALL => "keyword 'call'",
            TokenType::IF => "keyword 'if'",
            TokenType::THEN => "keyword 'then'",
            TokenType::ELSE => "keyword 'else'",
            TokenType::WHILE => "keyword 'while'",
            TokenType::DO => "keyword 'do'",
            TokenType::FOR => "keyword 'for'",
            TokenType::TO => "keyword 'to'",
            TokenType::ARRAY => "keyword 'array'",
            TokenType::OF => "keyword 'of'",
            TokenType::INTEGER => "keyword 'integer'",
            TokenType::CHAR => "keyword 'char'",
            TokenType::IDENTIFIER => "an identifier",
            TokenType::NUMBER => "a number",
            TokenType::CHAR_LITERAL => "a character constant",
            TokenType::SEMICOLON => "';'",
            TokenType::PERIOD => "'.'",
            TokenType::COMMA => "','",
            TokenType::COLON => "':'",
            TokenType::ASSIGN => "':='",
            TokenType::EQUAL => "'='",
            TokenType::NOT_EQUAL => "'<>'",
            TokenType::LESS => "'<'",
            TokenType::LESS_EQUAL => "'<='",
            TokenType::GREATER => "'>'",
            TokenType::GREATER_EQUAL => "'>='",
            TokenType::PLUS => "'+'",
            TokenType::MINUS => "'-'",
            TokenType::STAR => "'*'",
            TokenType::SLASH => "'/'",
            TokenType::LEFT_PAREN => "'('",
            TokenType::RIGHT_PAREN => "')'",
            TokenType::LEFT_BRACKET => "'['",
            TokenType::RIGHT_BRACKET => "']'",
            TokenType::EOF => "end of file",
        }
    }

    /// Can a statement begin with this token?
    #[inline]
    pub fn starts_statement(self) -> bool {
        matches!(
            self,
            TokenType::IDENTIFIER
                | TokenType::CALL
                | TokenType::BEGIN
                | TokenType::IF
                | TokenType::WHILE
                | TokenType::FOR
        )
    }

    /// Tokens that may legally follow an empty statement.
    #[inline]
    pub fn follows_statement(self) -> bool {
        matches!(self, TokenType::SEMICOLON | TokenType::END | TokenType::ELSE)
    }

    /// One of the six relational operators accepted by a condition.
    #[inline]
    pub fn is_comparator(self) -> bool {
        matches!(
            self,
            TokenType::EQUAL
                | TokenType::NOT_EQUAL
                | TokenType::LESS
                | TokenType::LESS_EQUAL
                | TokenType::GREATER
                | TokenType::GREATER_EQUAL
        )
    }

    /// `+` or `-`, in either sign or additive position.
    #[inline]
    pub fn is_additive(self) -> bool {
        matches!(self, TokenType::PLUS | TokenType::MINUS)
    }

    #[inline]
    pub fn is_multiplicative(self) -> bool {
        matches!(self, TokenType::STAR | TokenType::SLASH)
    }
}

/// A scanned token, including its type, the original lexeme,
/// and the position where it starts.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
pub struct Token<'a> {
    /// The category of this token.
    pub token_type: TokenType,

    /// The exact substring from the source that produced this token.
    pub lexeme: &'a str,

    /// 1‑based line number in the source.
    pub line: usize,

    /// 1‑based column (byte offset within the line).
    pub column: usize,
}

impl<'a> Token<'a> {
    /// Create a new Token with the given type, lexeme and position.
    pub fn new(token_type: TokenType, lexeme: &'a str, line: usize, column: usize) -> Self {
        trace!(
            "Creating new token: type={:?}, lexeme={}, line={}, column={}",
            token_type,
            lexeme,
            line,
            column
        );

        Self {
            token_type,
            lexeme,
            line,
            column,
        }
    }
}

impl<'a> fmt::Display for Token<'a> {
    /// `LINE-COLUMN:KIND lexeme`, one token per line in `tokenize` output.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}-{}:{:?} {}",
            self.line, self.column, self.token_type, self.lexeme
        )
    }
}
