#[cfg(test)]
mod scanner_tests {
    use kplc::error::KplError;
    use kplc::scanner::*;
    use kplc::token::*;

    fn assert_token_sequence(source: &str, expected: &[(TokenType, &str)]) {
        let scanner = Scanner::new(source);
        let tokens: Vec<_> = scanner.filter_map(Result::ok).collect();

        assert_eq!(tokens.len(), expected.len());

        for (actual, (expected_type, expected_lexeme)) in tokens.iter().zip(expected.iter()) {
            assert_eq!(actual.token_type, *expected_type);
            assert_eq!(actual.lexeme, *expected_lexeme);
        }
    }

    #[test]
    fn test_scanner_01_symbols() {
        assert_token_sequence(
            ":= : = <> < <= > >= + - * / ( ) [ ] ; . ,",
            &[
                (TokenType::ASSIGN, ":="),
                (TokenType::COLON, ":"),
                (TokenType::EQUAL, "="),
                (TokenType::NOT_EQUAL, "<>"),
                (TokenType::LESS, "<"),
                (TokenType::LESS_EQUAL, "<="),
                (TokenType::GREATER, ">"),
                (TokenType::GREATER_EQUAL, ">="),
                (TokenType::PLUS, "+"),
                (TokenType::MINUS, "-"),
                (TokenType::STAR, "*"),
                (TokenType::SLASH, "/"),
                (TokenType::LEFT_PAREN, "("),
                (TokenType::RIGHT_PAREN, ")"),
                (TokenType::LEFT_BRACKET, "["),
                (TokenType::RIGHT_BRACKET, "]"),
                (TokenType::SEMICOLON, ";"),
                (TokenType::PERIOD, "."),
                (TokenType::COMMA, ","),
                (TokenType::EOF, ""),
            ],
        );
    }

    #[test]
    fn test_scanner_02_keywords_and_literals() {
        assert_token_sequence(
            "Program VAR whilex x1_y 042 'z'",
            &[
                (TokenType::PROGRAM, "Program"),
                (TokenType::VAR, "VAR"),
                (TokenType::IDENTIFIER, "whilex"),
                (TokenType::IDENTIFIER, "x1_y"),
                (TokenType::NUMBER, "042"),
                (TokenType::CHAR_LITERAL, "'z'"),
                (TokenType::EOF, ""),
            ],
        );
    }

    #[test]
    fn test_keyword_case_folding_is_length_bounded() {
        assert_token_sequence(
            "PROCEDURE procedurex Function functional_thing",
            &[
                (TokenType::PROCEDURE, "PROCEDURE"),
                (TokenType::IDENTIFIER, "procedurex"),
                (TokenType::FUNCTION, "Function"),
                (TokenType::IDENTIFIER, "functional_thing"),
                (TokenType::EOF, ""),
            ],
        );
    }

    #[test]
    fn test_positions_across_comments() {
        let source = "x := 10;\n  (* multi\nline *) y";
        let tokens: Vec<Token> = Scanner::new(source).filter_map(Result::ok).collect();

        let positions: Vec<(TokenType, usize, usize)> = tokens
            .iter()
            .map(|t| (t.token_type, t.line, t.column))
            .collect();

        assert_eq!(
            positions,
            vec![
                (TokenType::IDENTIFIER, 1, 1),
                (TokenType::ASSIGN, 1, 3),
                (TokenType::NUMBER, 1, 6),
                (TokenType::SEMICOLON, 1, 8),
                (TokenType::IDENTIFIER, 3, 9),
                (TokenType::EOF, 3, 10),
            ]
        );
    }

    #[test]
    fn test_comment_star_without_paren_does_not_close() {
        assert_token_sequence(
            "(* a * b ** *) end",
            &[(TokenType::END, "end"), (TokenType::EOF, "")],
        );
    }

    #[test]
    fn test_unexpected_chars_token_sequence() {
        let results: Vec<_> = Scanner::new(",.$(#").collect();

        // COMMA, PERIOD, error, LEFT_PAREN, error, EOF
        assert_eq!(results.len(), 6, "Expected 6 items in result");

        let kinds: Vec<Option<TokenType>> = results
            .iter()
            .map(|r| r.as_ref().ok().map(|t| t.token_type))
            .collect();

        assert_eq!(
            kinds,
            vec![
                Some(TokenType::COMMA),
                Some(TokenType::PERIOD),
                None,
                Some(TokenType::LEFT_PAREN),
                None,
                Some(TokenType::EOF),
            ]
        );

        for err in results.iter().filter_map(|r| r.as_ref().err()) {
            assert!(
                err.to_string().contains("Invalid symbol"),
                "Error message should contain 'Invalid symbol', got: {}",
                err
            );
        }

        match &results[2] {
            Err(KplError::Lex { line, column, .. }) => assert_eq!((*line, *column), (1, 3)),
            other => panic!("Expected a lexical error, got: {:?}", other),
        }
    }

    #[test]
    fn test_non_ascii_symbol_is_skipped_whole() {
        let results: Vec<_> = Scanner::new("é;").collect();

        assert_eq!(results.len(), 3);
        assert!(results[0].is_err());
        assert_eq!(
            results[1].as_ref().map(|t| t.token_type).ok(),
            Some(TokenType::SEMICOLON)
        );
    }

    #[test]
    fn test_unterminated_comment() {
        let results: Vec<_> = Scanner::new("x (* never\nclosed").collect();

        assert_eq!(results.len(), 3);

        match &results[1] {
            Err(KplError::Lex {
                message,
                line,
                column,
            }) => {
                assert!(message.contains("comment"));
                assert_eq!((*line, *column), (1, 3));
            }
            other => panic!("Expected a lexical error, got: {:?}", other),
        }

        assert_eq!(
            results[2].as_ref().map(|t| (t.token_type, t.line)).ok(),
            Some((TokenType::EOF, 2))
        );
    }

    #[test]
    fn test_malformed_char_literal() {
        let results: Vec<_> = Scanner::new("'a' 'b").collect();

        assert_eq!(
            results[0].as_ref().map(|t| t.token_type).ok(),
            Some(TokenType::CHAR_LITERAL)
        );

        match &results[1] {
            Err(KplError::Lex { message, column, .. }) => {
                assert!(message.contains("character constant"));
                assert_eq!(*column, 5);
            }
            other => panic!("Expected a lexical error, got: {:?}", other),
        }
    }

    #[test]
    fn test_exactly_one_eof() {
        let mut scanner = Scanner::new("end");

        assert!(matches!(scanner.next(), Some(Ok(t)) if t.token_type == TokenType::END));
        assert!(matches!(scanner.next(), Some(Ok(t)) if t.token_type == TokenType::EOF));
        assert!(scanner.next().is_none());
        assert!(scanner.next().is_none());
    }
}
