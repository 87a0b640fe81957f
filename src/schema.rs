//! Column type tags and type inference for loaded tables.
//!
//! Every column in a [`Frame`](crate::frame::Frame) carries a declared
//! [`ColumnType`]. Classification and fill-strategy legality are decided from
//! that tag, never from the runtime shape of individual cells.

use std::fmt;

use anyhow::anyhow;
use serde::{Deserialize, Serialize};

use crate::data::{is_missing_token, parse_boolean, parse_naive_date, parse_naive_datetime};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ColumnType {
    Integer,
    Float,
    Text,
    Boolean,
    Date,
    DateTime,
}

impl ColumnType {
    pub fn is_numeric(&self) -> bool {
        matches!(self, ColumnType::Integer | ColumnType::Float)
    }

    pub fn is_categorical(&self) -> bool {
        matches!(self, ColumnType::Text)
    }

    pub fn describe(&self) -> &'static str {
        match self {
            ColumnType::Integer => "Integer",
            ColumnType::Float => "Float",
            ColumnType::Text => "Text",
            ColumnType::Boolean => "Boolean",
            ColumnType::Date => "Date",
            ColumnType::DateTime => "DateTime",
        }
    }

    pub fn variants() -> &'static [&'static str] {
        &["Integer", "Float", "Text", "Boolean", "Date", "DateTime"]
    }
}

impl fmt::Display for ColumnType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.describe())
    }
}

impl std::str::FromStr for ColumnType {
    type Err = anyhow::Error;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let normalized = value.trim().to_ascii_lowercase();
        match normalized.as_str() {
            "integer" | "int" => Ok(ColumnType::Integer),
            "float" | "double" => Ok(ColumnType::Float),
            "text" | "string" | "object" => Ok(ColumnType::Text),
            "boolean" | "bool" => Ok(ColumnType::Boolean),
            "date" => Ok(ColumnType::Date),
            "datetime" | "date-time" | "timestamp" => Ok(ColumnType::DateTime),
            _ => Err(anyhow!(
                "Unknown column type '{value}'. Supported types: {}",
                ColumnType::variants().join(", ")
            )),
        }
    }
}

/// Options controlling how raw columns are typed.
#[derive(Debug, Clone, Copy, Default)]
pub struct InferOptions {
    /// Recognise date and datetime columns. Off by default so dates load
    /// as text, the way a plain CSV read leaves them.
    pub parse_dates: bool,
}

#[derive(Debug, Clone, Default)]
struct TypeCandidate {
    non_missing: usize,
    integer_matches: usize,
    float_matches: usize,
    boolean_matches: usize,
    date_matches: usize,
    datetime_matches: usize,
}

impl TypeCandidate {
    fn update(&mut self, value: &str, options: InferOptions) {
        if is_missing_token(value) {
            return;
        }
        let trimmed = value.trim();
        self.non_missing += 1;

        if trimmed.parse::<i64>().is_ok() {
            self.integer_matches += 1;
        }
        if trimmed.parse::<f64>().is_ok() {
            self.float_matches += 1;
        }
        if parse_boolean(trimmed).is_some() {
            self.boolean_matches += 1;
        }
        if options.parse_dates {
            if parse_naive_date(trimmed).is_ok() {
                self.date_matches += 1;
            } else if parse_naive_datetime(trimmed).is_ok() {
                self.datetime_matches += 1;
            }
        }
    }

    // A type wins only when every non-missing value parses as that type.
    fn decide(&self) -> ColumnType {
        let all = |count: usize| self.non_missing > 0 && count == self.non_missing;
        if self.non_missing == 0 {
            ColumnType::Text
        } else if all(self.integer_matches) {
            ColumnType::Integer
        } else if all(self.float_matches) {
            ColumnType::Float
        } else if all(self.boolean_matches) {
            ColumnType::Boolean
        } else if all(self.date_matches) {
            ColumnType::Date
        } else if all(self.datetime_matches) {
            ColumnType::DateTime
        } else {
            ColumnType::Text
        }
    }
}

/// Infers the type of a single column from its raw text cells.
pub fn infer_column_type<'a, I>(values: I, options: InferOptions) -> ColumnType
where
    I: IntoIterator<Item = &'a str>,
{
    let mut candidate = TypeCandidate::default();
    for value in values {
        candidate.update(value, options);
    }
    candidate.decide()
}

/// Infers a type per column for a row-major block of raw records.
pub fn infer_column_types(
    column_count: usize,
    rows: &[Vec<String>],
    options: InferOptions,
) -> Vec<ColumnType> {
    let mut candidates = vec![TypeCandidate::default(); column_count];
    for row in rows {
        for (idx, candidate) in candidates.iter_mut().enumerate() {
            let raw = row.get(idx).map(String::as_str).unwrap_or("");
            candidate.update(raw, options);
        }
    }
    candidates.iter().map(TypeCandidate::decide).collect()
}
