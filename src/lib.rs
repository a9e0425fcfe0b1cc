pub mod config;
pub mod cursor;
pub mod driver;
pub mod error;
pub mod parser;
pub mod scanner;
pub mod token;

pub use driver::{parse_file, parse_source};
