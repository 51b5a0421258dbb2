//! Command-line interface for the `sooc` binary
//!
//! The flags are the whole configuration surface; logging is additionally
//! controlled through `RUST_LOG`.

use clap::{Args, Parser, Subcommand, ValueEnum};
use log::LevelFilter;
use std::fs;
use std::io;
use std::path::Path;

#[derive(Debug, Parser)]
#[command(name = "sooc", author, version, about = "Front-end for the Soo object language")]
pub struct Cli {
    /// Log at debug level unless RUST_LOG says otherwise
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Print the token stream
    Tokenize {
        /// Source file, or literal source text when no such file exists
        input: String,
    },
    /// Parse and print the syntax tree
    Parse(TreeArgs),
    /// Parse, fold constants and print the resulting tree
    Fold(TreeArgs),
}

#[derive(Debug, Args)]
pub struct TreeArgs {
    /// Source file, or literal source text when no such file exists
    pub input: String,

    /// Treat the input as a single expression instead of a program
    #[arg(long)]
    pub expr: bool,

    /// Output format
    #[arg(long, value_enum, default_value_t = Emit::Ast)]
    pub emit: Emit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Emit {
    /// Debug dump of the tree
    Ast,
    /// Pretty-printed source
    Source,
}

impl Cli {
    pub fn log_level(&self) -> LevelFilter {
        if self.verbose {
            LevelFilter::Debug
        } else {
            LevelFilter::Warn
        }
    }
}

/// Read `input` as a file path, falling back to the text itself
pub fn read_input(input: &str) -> io::Result<String> {
    let path = Path::new(input);
    if path.is_file() {
        log::info!("reading {}", path.display());
        fs::read_to_string(path)
    } else {
        Ok(input.to_string())
    }
}
