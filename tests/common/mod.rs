#![allow(dead_code)]

use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};

use csv_scrub::{Column, Frame, data::Value, schema::ColumnType};
use tempfile::{TempDir, tempdir};

/// Scratch directory helper that cleans up files automatically on drop.
pub struct TestWorkspace {
    temp_dir: TempDir,
}

impl TestWorkspace {
    pub fn new() -> Self {
        Self {
            temp_dir: tempdir().expect("temp dir"),
        }
    }

    pub fn path(&self) -> &Path {
        self.temp_dir.path()
    }

    /// Writes `contents` into a file under the workspace and returns the path.
    pub fn write(&self, name: &str, contents: &str) -> PathBuf {
        let path = self.temp_dir.path().join(name);
        let mut file = File::create(&path).expect("create temp file");
        file.write_all(contents.as_bytes())
            .expect("write temp file contents");
        path
    }
}

pub fn int(value: i64) -> Option<Value> {
    Some(Value::Integer(value))
}

pub fn float(value: f64) -> Option<Value> {
    Some(Value::Float(value))
}

pub fn text(value: &str) -> Option<Value> {
    Some(Value::Text(value.to_string()))
}

pub fn int_column(name: &str, cells: &[Option<i64>]) -> Column {
    Column::new(
        name,
        ColumnType::Integer,
        cells.iter().map(|c| c.map(Value::Integer)).collect(),
    )
}

pub fn text_column(name: &str, cells: &[Option<&str>]) -> Column {
    Column::new(
        name,
        ColumnType::Text,
        cells
            .iter()
            .map(|c| c.map(|s| Value::Text(s.to_string())))
            .collect(),
    )
}

pub fn frame(columns: Vec<Column>) -> Frame {
    Frame::new(columns).expect("columns share a length")
}

/// `n` (integer, with a gap) and `city` (text, with a gap).
pub fn people() -> Frame {
    frame(vec![
        int_column("n", &[Some(1), Some(2), None, Some(4)]),
        text_column("city", &[Some("a"), Some("b"), Some("a"), None]),
    ])
}
