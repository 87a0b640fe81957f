//! Human-readable transcripts for applied mutations.
//!
//! Each transcript has a one-line summary and a pandas snippet that
//! reproduces the edit on a DataFrame named `df`. Output depends only on the
//! operation arguments and computed values, never on table rendering.

use itertools::Itertools;
use serde::Serialize;

use crate::{
    data::Value,
    mutation::{FillMethod, FillStrategy},
};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Transcript {
    pub summary: String,
    pub code: String,
}

/// Python string literal with single quotes.
pub fn py_str(value: &str) -> String {
    let mut out = String::with_capacity(value.len() + 2);
    out.push('\'');
    for ch in value.chars() {
        match ch {
            '\\' => out.push_str("\\\\"),
            '\'' => out.push_str("\\'"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            other => out.push(other),
        }
    }
    out.push('\'');
    out
}

pub fn py_literal(value: &Value) -> String {
    match value {
        Value::Integer(i) => i.to_string(),
        Value::Float(f) if f.is_nan() => "float('nan')".to_string(),
        Value::Float(f) if f.is_infinite() && *f > 0.0 => "float('inf')".to_string(),
        Value::Float(f) if f.is_infinite() => "float('-inf')".to_string(),
        Value::Float(_) | Value::Boolean(_) => value.as_display(),
        Value::Text(s) => py_str(s),
        Value::Date(_) | Value::DateTime(_) => {
            format!("pd.Timestamp({})", py_str(&value.as_display()))
        }
    }
}

fn column_ref(column: &str) -> String {
    format!("df[{}]", py_str(column))
}

pub fn fill_missing(column: &str, strategy: &FillStrategy, value: Option<&Value>) -> Transcript {
    let method = strategy.method();
    let summary = match value {
        Some(value) => format!(
            "Missing values filled in '{column}' using {method} = {}",
            value.as_display()
        ),
        None => format!("Missing values filled in '{column}' using {method}"),
    };
    let target = column_ref(column);
    let fillna = |name: &str| format!("df.fillna({{{}: {name}}}, inplace=True)", py_str(column));
    let code = match (method, value) {
        (FillMethod::ForwardFill, _) => format!("{target} = {target}.ffill()"),
        (FillMethod::BackwardFill, _) => format!("{target} = {target}.bfill()"),
        (FillMethod::Custom, Some(value)) => {
            let literal = py_literal(value);
            format!(
                "# Using custom value = {literal} to fill missing values\n{}",
                fillna(&literal)
            )
        }
        (FillMethod::Mean, Some(value)) => format!(
            "mean = round({target}.mean(), 2)  # {}\n{}",
            py_literal(value),
            fillna("mean")
        ),
        (FillMethod::Median, Some(value)) => format!(
            "median = {target}.median()  # {}\n{}",
            py_literal(value),
            fillna("median")
        ),
        (FillMethod::Mode, Some(value)) => format!(
            "mode = {target}.value_counts(sort=False).idxmax()  # {}\n{}",
            py_literal(value),
            fillna("mode")
        ),
        (method, None) => format!("# {method} produced no fill value for {}", py_str(column)),
    };
    Transcript { summary, code }
}

pub fn rename_column(old_name: &str, new_name: &str) -> Transcript {
    Transcript {
        summary: format!("Column '{old_name}' renamed to '{new_name}'"),
        code: format!(
            "df.rename(columns={{{}: {}}}, inplace=True)",
            py_str(old_name),
            py_str(new_name)
        ),
    }
}

pub fn drop_columns(columns: &[String]) -> Transcript {
    let quoted = columns.iter().map(|c| format!("'{c}'")).join(", ");
    let literals = columns.iter().map(|c| py_str(c)).join(", ");
    Transcript {
        summary: format!("Dropped column(s) {quoted}"),
        code: format!("df.drop(columns=[{literals}], inplace=True)"),
    }
}

pub fn drop_duplicate_rows(removed: usize) -> Transcript {
    let summary = if removed == 0 {
        "No duplicate rows found".to_string()
    } else {
        format!("Dropped {removed} duplicate row(s)")
    };
    Transcript {
        summary,
        code: "df.drop_duplicates(inplace=True)".to_string(),
    }
}
