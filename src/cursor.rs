//! One‑token lookahead window over a [`TokenSource`].
//!
//! The cursor owns exactly two tokens: `current`, the most recently consumed
//! token (absent until the first consumption), and `lookahead`, the next
//! unconsumed token and the sole basis of every grammar decision.  Once the
//! lookahead is `EOF` the source is never asked for another token.

use crate::error::{Diagnostic, KplError, Result};
use crate::token::{Token, TokenType};

use log::{debug, trace};

/// Anything that can hand out tokens one at a time.
///
/// Every `Iterator<Item = Result<Token>>` is a token source, which covers the
/// [`Scanner`](crate::scanner::Scanner) as well as pre‑built token vectors.
pub trait TokenSource<'a> {
    /// Produce the next token, or the lexical error that prevented it.
    fn next_token(&mut self) -> Result<Token<'a>>;
}

impl<'a, I> TokenSource<'a> for I
where
    I: Iterator<Item = Result<Token<'a>>>,
{
    fn next_token(&mut self) -> Result<Token<'a>> {
        self.next().unwrap_or(Err(KplError::Exhausted))
    }
}

pub struct Cursor<'a, S> {
    source: S,
    current: Option<Token<'a>>,
    lookahead: Token<'a>,
}

impl<'a, S: TokenSource<'a>> Cursor<'a, S> {
    /// Prime the window with the first lookahead token.
    pub fn new(mut source: S) -> Result<Self> {
        let lookahead: Token<'a> = source.next_token()?;

        debug!("Cursor primed with {:?}", lookahead.token_type);

        Ok(Self {
            source,
            current: None,
            lookahead,
        })
    }

    /// The next unconsumed token.
    #[inline(always)]
    pub fn peek(&self) -> &Token<'a> {
        &self.lookahead
    }

    /// The most recently consumed token.
    #[inline(always)]
    pub fn current(&self) -> Option<&Token<'a>> {
        self.current.as_ref()
    }

    #[inline(always)]
    pub fn check(&self, token_type: TokenType) -> bool {
        self.lookahead.token_type == token_type
    }

    /// Promote the lookahead to current and pull a fresh lookahead.
    pub fn advance(&mut self) -> Result<()> {
        let next: Token<'a> = if self.check(TokenType::EOF) {
            self.lookahead
        } else {
            self.source.next_token()?
        };

        self.current = Some(std::mem::replace(&mut self.lookahead, next));

        Ok(())
    }

    /// Consume the lookahead if it is a `token_type`, otherwise fail with a
    /// missing-token diagnostic located at the lookahead.
    pub fn expect(&mut self, token_type: TokenType) -> Result<Token<'a>> {
        if !self.check(token_type) {
            return Err(Diagnostic::missing(token_type, &self.lookahead).into());
        }

        let consumed: Token<'a> = self.lookahead;

        match self.current() {
            Some(previous) => trace!("Consumed {} after {:?}", consumed, previous.lexeme),
            None => trace!("Consumed {} (first token)", consumed),
        }

        self.advance()?;

        Ok(consumed)
    }
}
