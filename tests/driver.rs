#[cfg(test)]
mod driver_tests {
    use std::io::Write;
    use std::path::Path;

    use kplc::config::ParserConfig;
    use kplc::error::{ErrorCategory, KplError};
    use kplc::parse_file;
    use tempfile::NamedTempFile;

    fn source_file(contents: &[u8]) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(contents).unwrap();
        file.flush().unwrap();
        file
    }

    #[test]
    fn test_accepts_program_from_file() {
        let file = source_file(b"program demo;\nvar x : integer;\nbegin\n  x := 1\nend.\n");

        assert!(parse_file(file.path(), ParserConfig::default()).is_ok());
    }

    #[test]
    fn test_reports_syntax_error_from_file() {
        let file = source_file(b"program demo\nbegin end.\n");

        match parse_file(file.path(), ParserConfig::default()) {
            Err(KplError::Syntax(d)) => {
                assert_eq!(d.category, ErrorCategory::MissingToken);
                assert_eq!((d.line, d.column), (2, 1));
            }
            other => panic!("Expected a syntax error, got: {:?}", other),
        }
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let result = parse_file(
            Path::new("definitely/not/here.kpl"),
            ParserConfig::default(),
        );

        match result {
            Err(e @ KplError::Io(_)) => assert_eq!(e.category(), "io"),
            other => panic!("Expected an I/O error, got: {:?}", other),
        }
    }

    #[test]
    fn test_invalid_utf8_is_rejected_before_scanning() {
        let file = source_file(&[b'p', 0xff, 0xfe]);

        match parse_file(file.path(), ParserConfig::default()) {
            Err(e @ KplError::Utf8(_)) => assert_eq!(e.category(), "encoding"),
            other => panic!("Expected a UTF-8 error, got: {:?}", other),
        }
    }
}
