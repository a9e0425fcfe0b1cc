#[cfg(test)]
mod cursor_tests {
    use kplc::config::ParserConfig;
    use kplc::cursor::{Cursor, TokenSource};
    use kplc::error::{ErrorCategory, KplError, Result};
    use kplc::parser::Parser;
    use kplc::token::{Token, TokenType};

    /// Hands out a fixed token list and counts every request.
    struct Counting<'a> {
        tokens: Vec<Token<'a>>,
        pulls: usize,
    }

    impl<'a> TokenSource<'a> for Counting<'a> {
        fn next_token(&mut self) -> Result<Token<'a>> {
            let token = self.tokens.get(self.pulls).copied();
            self.pulls += 1;

            token.ok_or(KplError::Exhausted)
        }
    }

    fn tokens(kinds: &[(TokenType, &'static str)]) -> Vec<Token<'static>> {
        kinds
            .iter()
            .enumerate()
            .map(|(i, (tt, lexeme))| Token::new(*tt, *lexeme, 1, i + 1))
            .collect()
    }

    #[test]
    fn test_primes_one_lookahead_and_no_current() {
        let source = Counting {
            tokens: tokens(&[(TokenType::BEGIN, "begin"), (TokenType::EOF, "")]),
            pulls: 0,
        };
        let cursor = Cursor::new(source).unwrap();

        assert!(cursor.current().is_none());
        assert_eq!(cursor.peek().token_type, TokenType::BEGIN);
    }

    #[test]
    fn test_expect_returns_consumed_token_and_shifts_window() {
        let source = tokens(&[
            (TokenType::IDENTIFIER, "x"),
            (TokenType::ASSIGN, ":="),
            (TokenType::EOF, ""),
        ]);
        let mut cursor = Cursor::new(source.into_iter().map(Ok::<_, KplError>)).unwrap();

        let consumed = cursor.expect(TokenType::IDENTIFIER).unwrap();

        assert_eq!(consumed.lexeme, "x");
        assert_eq!(cursor.current().map(|t| t.lexeme), Some("x"));
        assert!(cursor.check(TokenType::ASSIGN));
    }

    #[test]
    fn test_expect_mismatch_leaves_window_untouched() {
        let source = tokens(&[(TokenType::BEGIN, "begin"), (TokenType::EOF, "")]);
        let mut cursor = Cursor::new(source.into_iter().map(Ok::<_, KplError>)).unwrap();

        let err = cursor.expect(TokenType::SEMICOLON).unwrap_err();
        let diagnostic = err.diagnostic().expect("syntax error");

        assert_eq!(diagnostic.category, ErrorCategory::MissingToken);
        assert_eq!(diagnostic.expected, Some(TokenType::SEMICOLON));
        assert_eq!(diagnostic.column, 1);
        assert!(cursor.check(TokenType::BEGIN));
    }

    #[test]
    fn test_never_pulls_past_eof() {
        let mut cursor = Cursor::new(Counting {
            tokens: tokens(&[(TokenType::END, "end"), (TokenType::EOF, "")]),
            pulls: 0,
        })
        .unwrap();

        cursor.expect(TokenType::END).unwrap();
        cursor.expect(TokenType::EOF).unwrap();
        cursor.advance().unwrap();

        assert!(cursor.check(TokenType::EOF));
        assert_eq!(cursor.current().map(|t| t.token_type), Some(TokenType::EOF));
    }

    #[test]
    fn test_parser_accepts_prebuilt_tokens() {
        let source = tokens(&[
            (TokenType::PROGRAM, "program"),
            (TokenType::IDENTIFIER, "p"),
            (TokenType::SEMICOLON, ";"),
            (TokenType::BEGIN, "begin"),
            (TokenType::END, "end"),
            (TokenType::PERIOD, "."),
            (TokenType::EOF, ""),
        ]);

        let parser =
            Parser::new(source.into_iter().map(Ok::<_, KplError>), ParserConfig::default())
                .unwrap();

        assert!(parser.parse().is_ok());
    }

    #[test]
    fn test_source_without_eof_is_exhausted() {
        let source = tokens(&[(TokenType::PROGRAM, "program"), (TokenType::IDENTIFIER, "p")]);
        let parser =
            Parser::new(source.into_iter().map(Ok::<_, KplError>), ParserConfig::default())
                .unwrap();

        let err = parser.parse().unwrap_err();

        assert!(matches!(err, KplError::Exhausted));
        assert_eq!(err.category(), "token_stream");
    }

    #[test]
    fn test_lexical_failure_while_priming() {
        let source: Vec<Result<Token>> = vec![Err(KplError::lex(1, 1, "Invalid symbol: #"))];

        assert!(matches!(
            Parser::new(source.into_iter(), ParserConfig::default()),
            Err(KplError::Lex { .. })
        ));
    }
}
