use std::fs::File;
use std::io::Write;
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser as ClapParser;
use clap::{Subcommand, ValueEnum};
use env_logger::{Builder, Env};
use log::{debug, info};
use serde_json::json;

use kplc::config::{ParserConfig, SeparatorPolicy};
use kplc::driver::read_source;
use kplc::error::KplError;
use kplc::parser::Parser;
use kplc::scanner::Scanner;

/// Exit status for lexical and syntax errors.
const EXIT_DATA_ERR: u8 = 65;

/// Exit status when the source cannot be read.
const EXIT_IO_ERR: u8 = 74;

#[derive(ClapParser, Debug)]
#[command(version, about = "KPL syntax checker", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    commands: Commands,

    /// Enable logging to kplc.log
    #[arg(long, global = true)]
    log: bool,

    /// Trace rule entry/exit and every consumed token on stderr
    #[arg(long, global = true, conflicts_with = "log")]
    trace: bool,

    /// Reject two statements that are not separated by ';'
    #[arg(long, global = true)]
    strict_separators: bool,

    /// Output format for tokens and diagnostics
    #[arg(long, global = true, value_enum, default_value_t = Format::Text)]
    format: Format,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Tokenizes a KPL source file, printing each token
    Tokenize { filename: PathBuf },

    /// Checks that a KPL source file is a syntactically valid program
    Parse { filename: PathBuf },
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
enum Format {
    Text,
    Json,
}

fn init_logger(args: &Cli) -> Result<()> {
    if args.log {
        let log_file = File::create("kplc.log").context("Failed to create kplc.log")?;

        Builder::new()
            .format(|buf, record| {
                // Strip 'kplc::' from module path
                let module = record.module_path().unwrap_or("<unnamed>");
                let module = module.strip_prefix("kplc::").unwrap_or(module);

                writeln!(
                    buf,
                    "[{}:{}] - {}",
                    module,
                    record.line().unwrap_or(0),
                    record.args()
                )
            })
            .target(env_logger::Target::Pipe(Box::new(log_file)))
            .filter(None, log::LevelFilter::Debug) // Default to Debug, override with RUST_LOG
            .parse_default_env()
            .init();

        info!("Logger initialized, writing to kplc.log");
    } else if args.trace {
        Builder::new().filter_level(log::LevelFilter::Trace).init();
    } else {
        Builder::from_env(Env::default().default_filter_or("off")).init();
    }

    Ok(())
}

/// Print `err` in the requested format and pick the matching exit status.
fn report(err: &KplError, format: Format) -> ExitCode {
    debug!("Check failed: {:?}", err);

    match format {
        Format::Text => eprintln!("{}", err),
        Format::Json => {
            let event = match err {
                KplError::Syntax(diagnostic) => json!(diagnostic),
                KplError::Lex {
                    message,
                    line,
                    column,
                } => json!({
                    "category": "lexical",
                    "message": message,
                    "line": line,
                    "column": column,
                }),
                other => json!({ "category": other.category(), "message": other.to_string() }),
            };

            println!("{}", event);
        }
    }

    match err {
        KplError::Io(_) => ExitCode::from(EXIT_IO_ERR),
        _ => ExitCode::from(EXIT_DATA_ERR),
    }
}

fn tokenize(src: &str, format: Format) -> Result<ExitCode> {
    let mut status = ExitCode::SUCCESS;

    for token in Scanner::new(src) {
        match token {
            Ok(token) => match format {
                Format::Text => println!("{}", token),
                Format::Json => println!("{}", serde_json::to_string(&token)?),
            },

            Err(e) => status = report(&e, format),
        }
    }

    Ok(status)
}

fn check(src: &str, config: ParserConfig, format: Format) -> ExitCode {
    match Parser::new(Scanner::new(src), config).and_then(Parser::parse) {
        Ok(()) => {
            match format {
                Format::Text => println!("Program accepted"),
                Format::Json => println!("{}", json!({ "accepted": true })),
            }

            ExitCode::SUCCESS
        }

        Err(e) => report(&e, format),
    }
}

fn main() -> Result<ExitCode> {
    let args: Cli = Cli::parse();

    init_logger(&args)?;

    info!("CLI arguments: {:?}", args);

    let config = ParserConfig::default().with_separators(if args.strict_separators {
        SeparatorPolicy::Required
    } else {
        SeparatorPolicy::Optional
    });

    let filename = match &args.commands {
        Commands::Tokenize { filename } | Commands::Parse { filename } => filename,
    };

    let src = match read_source(filename) {
        Ok(src) => src,
        Err(e) => return Ok(report(&e, args.format)),
    };

    let status = match args.commands {
        Commands::Tokenize { .. } => tokenize(&src, args.format)?,
        Commands::Parse { .. } => check(&src, config, args.format),
    };

    Ok(status)
}
