//! Reading delimited files into a [`Frame`] and writing them back out.

use std::path::Path;

use anyhow::{Context, Result, anyhow};
use encoding_rs::{Encoding, UTF_8};
use itertools::Itertools;
use log::{debug, info};

use crate::{
    data::parse_typed_value,
    frame::{Column, Frame},
    io_utils,
    schema::{InferOptions, infer_column_types},
};

#[derive(Debug, Clone, Copy)]
pub struct LoadOptions {
    pub delimiter: Option<u8>,
    pub encoding: &'static Encoding,
    pub infer: InferOptions,
}

impl Default for LoadOptions {
    fn default() -> Self {
        Self {
            delimiter: None,
            encoding: UTF_8,
            infer: InferOptions::default(),
        }
    }
}

/// Display name for a loaded file: its file name, or `stdin` for `-`.
pub fn source_name(path: &Path) -> String {
    if io_utils::is_dash(path) {
        return "stdin".to_string();
    }
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

pub fn read_frame(path: &Path, options: &LoadOptions) -> Result<Frame> {
    let delimiter = io_utils::resolve_input_delimiter(path, options.delimiter);
    debug!(
        "Reading {:?} with delimiter '{}' and encoding {}",
        path,
        crate::printable_delimiter(delimiter),
        options.encoding.name()
    );
    let mut reader = io_utils::open_csv_reader_from_path(path, delimiter)?;
    let headers = io_utils::reader_headers(&mut reader, options.encoding)?;
    let mut rows = Vec::new();
    for (idx, record) in reader.byte_records().enumerate() {
        let record = record.with_context(|| format!("Reading row {}", idx + 2))?;
        rows.push(io_utils::decode_record(&record, options.encoding)?);
    }
    let frame = frame_from_records(headers, &rows, options.infer)
        .with_context(|| format!("Building table from {path:?}"))?;
    info!(
        "Read {} row(s) and {} column(s) from {:?}",
        frame.row_count(),
        frame.column_count(),
        path
    );
    Ok(frame)
}

/// Types each column from its raw values and parses every cell. Column
/// names must be unique.
pub fn frame_from_records(
    headers: Vec<String>,
    rows: &[Vec<String>],
    options: InferOptions,
) -> Result<Frame> {
    if let Some(name) = headers.iter().duplicates().next() {
        return Err(anyhow!("Column '{name}' appears more than once in the header"));
    }
    let types = infer_column_types(headers.len(), rows, options);
    let mut columns = Vec::with_capacity(headers.len());
    for (idx, (name, datatype)) in headers.into_iter().zip(types).enumerate() {
        let cells = rows
            .iter()
            .enumerate()
            .map(|(row_idx, row)| {
                let raw = row.get(idx).map(String::as_str).unwrap_or("");
                parse_typed_value(raw, &datatype)
                    .with_context(|| format!("Column '{name}', row {}", row_idx + 2))
            })
            .collect::<Result<Vec<_>>>()?;
        debug!("Column '{name}' typed as {datatype}");
        columns.push(Column::new(name, datatype, cells));
    }
    Frame::new(columns).ok_or_else(|| anyhow!("Columns have differing lengths"))
}

/// Writes the table as delimited text; missing cells become empty fields.
pub fn write_frame(
    frame: &Frame,
    path: Option<&Path>,
    delimiter: u8,
    encoding: &'static Encoding,
) -> Result<()> {
    let headers = frame
        .column_names()
        .into_iter()
        .map(str::to_string)
        .collect::<Vec<_>>();
    io_utils::write_delimited(path, delimiter, encoding, &headers, frame.display_rows(None, ""))?;
    info!(
        "Wrote {} row(s) to {}",
        frame.row_count(),
        path.map(|p| p.display().to_string())
            .unwrap_or_else(|| "stdout".to_string())
    );
    Ok(())
}
