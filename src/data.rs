use std::fmt;

use anyhow::{Context, Result, anyhow, bail};
use chrono::{NaiveDate, NaiveDateTime};
use serde::Serialize;

use crate::schema::ColumnType;

/// A single non-missing cell. Missing cells are represented as `None`
/// wherever a cell is stored (`Option<Value>`).
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(untagged)]
pub enum Value {
    Integer(i64),
    Float(f64),
    Text(String),
    Boolean(bool),
    Date(NaiveDate),
    DateTime(NaiveDateTime),
}

impl Eq for Value {}

impl Value {
    pub fn as_display(&self) -> String {
        match self {
            Value::Integer(i) => i.to_string(),
            Value::Float(f) => format_float(*f),
            Value::Text(s) => s.clone(),
            Value::Boolean(b) => (if *b { "True" } else { "False" }).to_string(),
            Value::Date(d) => d.format("%Y-%m-%d").to_string(),
            Value::DateTime(dt) => dt.format("%Y-%m-%d %H:%M:%S").to_string(),
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Integer(i) => Some(*i as f64),
            Value::Float(f) => Some(*f),
            _ => None,
        }
    }

    /// Equality key used when counting values or comparing rows. Variants
    /// stay distinct so `1` and `"1"` never match; `-0.0` matches `0.0` and
    /// every NaN matches every other NaN.
    pub fn identity(&self) -> ValueKey<'_> {
        match self {
            Value::Integer(i) => ValueKey::Integer(*i),
            Value::Float(f) => ValueKey::Float(float_bits(*f)),
            Value::Text(s) => ValueKey::Text(s),
            Value::Boolean(b) => ValueKey::Boolean(*b),
            Value::Date(d) => ValueKey::Date(*d),
            Value::DateTime(dt) => ValueKey::DateTime(*dt),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueKey<'a> {
    Integer(i64),
    Float(u64),
    Text(&'a str),
    Boolean(bool),
    Date(NaiveDate),
    DateTime(NaiveDateTime),
}

fn float_bits(value: f64) -> u64 {
    if value == 0.0 {
        0.0f64.to_bits()
    } else if value.is_nan() {
        f64::NAN.to_bits()
    } else {
        value.to_bits()
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_display())
    }
}

fn format_float(value: f64) -> String {
    if value.is_finite() && value.fract() == 0.0 {
        format!("{value:.1}")
    } else {
        value.to_string()
    }
}

/// Rounds half away from zero to `places` decimal places.
pub fn round_to(value: f64, places: i32) -> f64 {
    let factor = 10f64.powi(places);
    (value * factor).round() / factor
}

/// Tokens that denote a missing cell when reading delimited text.
pub fn is_missing_token(value: &str) -> bool {
    matches!(
        value.trim(),
        "" | "NA"
            | "N/A"
            | "n/a"
            | "NaN"
            | "nan"
            | "-NaN"
            | "-nan"
            | "null"
            | "NULL"
            | "None"
            | "#N/A"
            | "#NA"
            | "<NA>"
    )
}

pub fn parse_boolean(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "true" => Some(true),
        "false" => Some(false),
        _ => None,
    }
}

pub fn parse_naive_date(value: &str) -> Result<NaiveDate> {
    const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%Y/%m/%d", "%d/%m/%Y", "%m/%d/%Y", "%d-%m-%Y"];
    for fmt in DATE_FORMATS {
        if let Ok(parsed) = NaiveDate::parse_from_str(value.trim(), fmt) {
            return Ok(parsed);
        }
    }
    Err(anyhow!("Failed to parse '{value}' as date"))
}

pub fn parse_naive_datetime(value: &str) -> Result<NaiveDateTime> {
    const DATETIME_FORMATS: &[&str] = &[
        "%Y-%m-%d %H:%M:%S",
        "%Y-%m-%dT%H:%M:%S",
        "%Y-%m-%d %H:%M",
        "%Y-%m-%dT%H:%M",
        "%d/%m/%Y %H:%M:%S",
        "%m/%d/%Y %H:%M:%S",
    ];
    for fmt in DATETIME_FORMATS {
        if let Ok(parsed) = NaiveDateTime::parse_from_str(value.trim(), fmt) {
            return Ok(parsed);
        }
    }
    Err(anyhow!("Failed to parse '{value}' as datetime"))
}

/// Parses raw text into a cell of the given column type. Missing tokens
/// produce `Ok(None)`.
pub fn parse_typed_value(value: &str, ty: &ColumnType) -> Result<Option<Value>> {
    if is_missing_token(value) {
        return Ok(None);
    }
    let trimmed = value.trim();
    let parsed = match ty {
        ColumnType::Text => Value::Text(value.to_string()),
        ColumnType::Integer => {
            let parsed: i64 = trimmed
                .parse()
                .with_context(|| format!("Failed to parse '{value}' as integer"))?;
            Value::Integer(parsed)
        }
        ColumnType::Float => {
            let parsed: f64 = trimmed
                .parse()
                .with_context(|| format!("Failed to parse '{value}' as float"))?;
            Value::Float(parsed)
        }
        ColumnType::Boolean => match parse_boolean(trimmed) {
            Some(b) => Value::Boolean(b),
            None => bail!("Failed to parse '{value}' as boolean"),
        },
        ColumnType::Date => Value::Date(parse_naive_date(trimmed)?),
        ColumnType::DateTime => Value::DateTime(parse_naive_datetime(trimmed)?),
    };
    Ok(Some(parsed))
}

/// Best-effort conversion used for raw grid edits: tries the column type
/// first and keeps the text verbatim when it does not fit.
pub fn coerce_raw_value(value: &str, ty: &ColumnType) -> Option<Value> {
    match parse_typed_value(value, ty) {
        Ok(parsed) => parsed,
        Err(_) => Some(Value::Text(value.to_string())),
    }
}
