//! sage front end driver.
//!
//! Tokenizes and parses one `.sage` source file, reporting every diagnostic.
//!
//! # Examples
//!
//! ```text
//! sagec main.sage
//! sagec main.sage --tree
//! sagec main.sage --tokens
//! RUST_LOG=debug sagec main.sage
//! ```

use std::{fs::read_to_string, path::PathBuf, process, time::Instant};

use clap::Parser;
use lazy_static::lazy_static;
use log::{info, LevelFilter};
use regex::Regex;

use sagec::{display_error, lexer::lexer::dump_tokens, parser::parser::parse};

lazy_static! {
    static ref EXTENSION_PATTERN: Regex = Regex::new(r"\.([^./\\]+)$").unwrap();
}

#[derive(Parser)]
#[command(name = "sagec")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Tokenizer and parser for the sage language", long_about = None)]
struct Cli {
    /// Source file to parse, must end in .sage
    file: PathBuf,

    /// Print every token with its index instead of parsing
    #[arg(long)]
    tokens: bool,

    /// Print the parse tree after a successful parse
    #[arg(long)]
    tree: bool,

    /// Log parser progress to stderr
    #[arg(short, long)]
    verbose: bool,
}

fn main() {
    let cli = Cli::parse();

    let mut logger = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn"));
    if cli.verbose {
        logger.filter_level(LevelFilter::Debug);
    }
    logger.init();

    let file_name = cli
        .file
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default();

    if let Err(message) = check_extension(&file_name) {
        eprintln!("{}", message);
        process::exit(1);
    }

    let source = match read_to_string(&cli.file) {
        Ok(source) => source,
        Err(error) => {
            eprintln!("failed to read {}: {}", cli.file.display(), error);
            process::exit(1);
        }
    };

    if cli.tokens {
        for line in dump_tokens(source, Some(file_name)) {
            println!("{}", line);
        }
        return;
    }

    let start = Instant::now();
    let parsed = parse(source.clone(), Some(file_name));
    info!("Parsed in {:?}", start.elapsed());

    match parsed {
        Ok(program) => {
            if cli.tree {
                print!("{}", program.show_tree());
            }
        }
        Err(errors) => {
            for error in &errors {
                display_error(error, &source, &cli.file);
            }
            eprintln!("{} error(s) found", errors.len());
            process::exit(1);
        }
    }
}

/// Only `.sage` files are accepted.
fn check_extension(file_name: &str) -> Result<(), &'static str> {
    match EXTENSION_PATTERN.captures(file_name) {
        None => Err("cannot target files that have no file extension."),
        Some(captures) if &captures[1] != "sage" => Err("cannot target non sage source files."),
        Some(_) => Ok(()),
    }
}
