use std::path::PathBuf;

use anyhow::Result;
use clap::{Args, Parser, Subcommand};

use crate::{io_utils, load::LoadOptions, schema::InferOptions};

#[derive(Debug, Parser)]
#[command(
    author,
    version,
    about = "Clean CSV files and record reproducible code for every edit",
    long_about = None
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Show row/column counts, missing values, duplicates and column classes
    Summary(SummaryArgs),
    /// Preview the first few rows of a file as a table
    Preview(PreviewArgs),
    /// Apply cleaning operations and write the edited table
    Edit(EditArgs),
}

#[derive(Debug, Args)]
pub struct LoadArgs {
    /// Input CSV file (`-` for stdin)
    #[arg(short = 'i', long = "input")]
    pub input: PathBuf,
    /// CSV delimiter character (supports ',', 'tab', ';', '|')
    #[arg(long, value_parser = parse_delimiter)]
    pub delimiter: Option<u8>,
    /// Character encoding of the input file (defaults to utf-8)
    #[arg(long = "input-encoding")]
    pub input_encoding: Option<String>,
    /// Recognise date and datetime columns instead of loading them as text
    #[arg(long = "parse-dates")]
    pub parse_dates: bool,
}

impl LoadArgs {
    pub fn to_options(&self) -> Result<LoadOptions> {
        Ok(LoadOptions {
            delimiter: self.delimiter,
            encoding: io_utils::resolve_encoding(self.input_encoding.as_deref())?,
            infer: InferOptions {
                parse_dates: self.parse_dates,
            },
        })
    }
}

#[derive(Debug, Args)]
pub struct SummaryArgs {
    #[command(flatten)]
    pub load: LoadArgs,
    /// Emit the summary as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Debug, Args)]
pub struct PreviewArgs {
    #[command(flatten)]
    pub load: LoadArgs,
    /// Number of rows to display
    #[arg(long, default_value_t = 10)]
    pub rows: usize,
}

#[derive(Debug, Args)]
pub struct EditArgs {
    #[command(flatten)]
    pub load: LoadArgs,
    /// Output CSV file (stdout if omitted)
    #[arg(short = 'o', long = "output")]
    pub output: Option<PathBuf>,
    /// YAML or JSON edit plan applied before any flag operations
    #[arg(short = 'p', long = "plan")]
    pub plan: Option<PathBuf>,
    /// Fill missing values: `column=method` or `column=custom:value`
    /// (methods: ffill, bfill, mean, median, mode, custom)
    #[arg(long = "fill", action = clap::ArgAction::Append)]
    pub fills: Vec<String>,
    /// Rename a column: `old=new`
    #[arg(long = "rename", action = clap::ArgAction::Append)]
    pub renames: Vec<String>,
    /// Drop this comma-separated list of columns
    #[arg(long = "drop", value_delimiter = ',', action = clap::ArgAction::Append)]
    pub drops: Vec<String>,
    /// Remove rows that repeat an earlier row
    #[arg(long = "drop-duplicates")]
    pub drop_duplicates: bool,
    /// Overwrite a cell directly: `row:column=value` (0-based row)
    #[arg(long = "set", action = clap::ArgAction::Append)]
    pub cell_edits: Vec<String>,
    /// Write the mutation history as JSON to this path
    #[arg(long = "history-json")]
    pub history_json: Option<PathBuf>,
    /// Delimiter to use for output (defaults to input delimiter)
    #[arg(long = "output-delimiter", value_parser = parse_delimiter)]
    pub output_delimiter: Option<u8>,
    /// Character encoding for the output file/stdout (defaults to utf-8)
    #[arg(long = "output-encoding")]
    pub output_encoding: Option<String>,
}

pub fn parse_delimiter(value: &str) -> Result<u8, String> {
    match value {
        "tab" | "\t" | "\\t" => Ok(b'\t'),
        "comma" | "," => Ok(b','),
        "|" | "pipe" => Ok(b'|'),
        ";" | "semicolon" => Ok(b';'),
        other => {
            let mut chars = other.chars();
            let first = chars
                .next()
                .ok_or_else(|| "Delimiter cannot be empty".to_string())?;
            if chars.next().is_some() {
                return Err("Delimiter must be a single character".to_string());
            }
            if !first.is_ascii() {
                return Err("Delimiter must be ASCII".to_string());
            }
            Ok(first as u8)
        }
    }
}
