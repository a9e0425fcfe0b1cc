//! Entry points that tie a source stream, the scanner and the parser together.

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use log::info;

use crate::config::ParserConfig;
use crate::error::Result;
use crate::parser::Parser;
use crate::scanner::Scanner;

/// Read a source file into memory.  The handle is closed before this returns.
pub fn read_source(path: &Path) -> Result<String> {
    info!("Reading file: {:?}", path);

    let file = File::open(path)?;
    let mut reader = BufReader::new(file);
    let mut buf = Vec::new();

    let bytes = reader.read_to_end(&mut buf)?;

    info!("Read {} bytes from {:?}", bytes, path);

    Ok(String::from_utf8(buf)?)
}

/// Check in-memory KPL text.
pub fn parse_source(src: &str, config: ParserConfig) -> Result<()> {
    Parser::new(Scanner::new(src), config)?.parse()
}

/// Check a KPL source file.  I/O failures surface before any token is read.
pub fn parse_file(path: &Path, config: ParserConfig) -> Result<()> {
    let src: String = read_source(path)?;

    parse_source(&src, config)
}
