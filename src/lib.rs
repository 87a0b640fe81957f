pub mod classify;
pub mod cli;
pub mod data;
pub mod edit;
pub mod error;
pub mod frame;
pub mod io_utils;
pub mod load;
pub mod mutation;
pub mod plan;
pub mod preview;
pub mod schema;
pub mod session;
pub mod summary;
pub mod table;
pub mod transcript;

use std::{env, sync::OnceLock};

use anyhow::Result;
use clap::Parser;
use log::LevelFilter;

use crate::cli::{Cli, Commands};

pub use crate::{
    classify::{ColumnClassification, classify},
    error::{EditError, ErrorKind},
    frame::{Column, Frame},
    mutation::{FillMethod, FillStrategy, MutationEngine, MutationRecord},
    session::{CellPatch, EditorSession},
};

static LOGGER: OnceLock<()> = OnceLock::new();

fn init_logging() {
    LOGGER.get_or_init(|| {
        let mut builder = env_logger::Builder::from_env(env_logger::Env::default());
        if env::var("RUST_LOG").is_err() {
            builder.filter_module("csv_scrub", LevelFilter::Info);
        }
        let _ = builder.format_timestamp_millis().try_init();
    });
}

pub fn run() -> Result<()> {
    init_logging();
    let cli = Cli::parse();
    match cli.command {
        Commands::Summary(args) => summary::execute(&args),
        Commands::Preview(args) => preview::execute(&args),
        Commands::Edit(args) => edit::execute(&args),
    }
}

pub(crate) fn printable_delimiter(delimiter: u8) -> String {
    match delimiter {
        b',' => ",".to_string(),
        b'\t' => "\\t".to_string(),
        other => (other as char).to_string(),
    }
}
