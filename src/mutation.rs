//! The four table mutations and their transcripts.
//!
//! [`MutationEngine`] borrows a [`Frame`] mutably and applies one operation
//! at a time. Each operation validates fully and computes any fill value
//! before touching the frame, so a returned error always means the frame
//! is unchanged.

use std::{
    collections::{HashMap, HashSet},
    fmt,
    str::FromStr,
};

use anyhow::anyhow;
use log::{debug, info};
use serde::{Deserialize, Serialize};

use crate::{
    data::{Value, ValueKey, parse_typed_value, round_to},
    error::{EditError, EditResult},
    frame::{Column, Frame},
    schema::ColumnType,
    transcript::{self, Transcript},
};

/// Fill method without its argument, as offered for selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FillMethod {
    Custom,
    #[serde(alias = "ffill")]
    ForwardFill,
    #[serde(alias = "bfill")]
    BackwardFill,
    Mean,
    Median,
    Mode,
}

impl FillMethod {
    pub fn label(&self) -> &'static str {
        match self {
            FillMethod::Custom => "Custom",
            FillMethod::ForwardFill => "Forward Fill",
            FillMethod::BackwardFill => "Backward Fill",
            FillMethod::Mean => "Mean",
            FillMethod::Median => "Median",
            FillMethod::Mode => "Mode",
        }
    }

    pub fn requires_numeric(&self) -> bool {
        matches!(self, FillMethod::Mean | FillMethod::Median)
    }
}

impl fmt::Display for FillMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for FillMethod {
    type Err = anyhow::Error;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let normalized = value.trim().to_ascii_lowercase().replace(['_', ' '], "-");
        match normalized.as_str() {
            "custom" => Ok(FillMethod::Custom),
            "ffill" | "forward-fill" | "forward" => Ok(FillMethod::ForwardFill),
            "bfill" | "backward-fill" | "backward" => Ok(FillMethod::BackwardFill),
            "mean" => Ok(FillMethod::Mean),
            "median" => Ok(FillMethod::Median),
            "mode" => Ok(FillMethod::Mode),
            _ => Err(anyhow!(
                "Unknown fill method '{value}'. \
                 Expected one of: custom, ffill, bfill, mean, median, mode"
            )),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum FillStrategy {
    ForwardFill,
    BackwardFill,
    Mean,
    Median,
    Mode,
    Custom(String),
}

impl FillStrategy {
    /// Combines a selected method with an optional custom value. Returns
    /// `None` when `Custom` is chosen without a value, meaning the fill
    /// cannot be offered yet.
    pub fn select(method: FillMethod, custom: Option<&str>) -> Option<Self> {
        Some(match method {
            FillMethod::ForwardFill => FillStrategy::ForwardFill,
            FillMethod::BackwardFill => FillStrategy::BackwardFill,
            FillMethod::Mean => FillStrategy::Mean,
            FillMethod::Median => FillStrategy::Median,
            FillMethod::Mode => FillStrategy::Mode,
            FillMethod::Custom => match custom {
                Some(value) if !value.is_empty() => FillStrategy::Custom(value.to_string()),
                _ => return None,
            },
        })
    }

    pub fn method(&self) -> FillMethod {
        match self {
            FillStrategy::ForwardFill => FillMethod::ForwardFill,
            FillStrategy::BackwardFill => FillMethod::BackwardFill,
            FillStrategy::Mean => FillMethod::Mean,
            FillStrategy::Median => FillMethod::Median,
            FillStrategy::Mode => FillMethod::Mode,
            FillStrategy::Custom(_) => FillMethod::Custom,
        }
    }
}

impl FromStr for FillStrategy {
    type Err = anyhow::Error;

    /// Accepts `mean`, `ffill`, ... or `custom:<value>`.
    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let (method, custom) = match value.split_once(':') {
            Some((method, custom)) => (method, Some(custom)),
            None => (value, None),
        };
        let method = FillMethod::from_str(method)?;
        if method != FillMethod::Custom && custom.is_some() {
            return Err(anyhow!("Fill method '{method}' does not take a value"));
        }
        FillStrategy::select(method, custom)
            .ok_or_else(|| anyhow!("Custom fill requires a value, e.g. 'custom:0'"))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Operation {
    FillMissing { column: String, method: FillMethod },
    RenameColumn { from: String, to: String },
    DropColumns { columns: Vec<String> },
    DropDuplicateRows,
}

/// Transcript of one applied operation. Immutable once created.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MutationRecord {
    pub operation: Operation,
    #[serde(flatten)]
    pub transcript: Transcript,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fill_value: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub removed_rows: Option<usize>,
}

impl MutationRecord {
    pub fn summary(&self) -> &str {
        &self.transcript.summary
    }

    pub fn code(&self) -> &str {
        &self.transcript.code
    }

    /// `false` only for a duplicate-row drop that found nothing to remove.
    pub fn changed_table(&self) -> bool {
        self.removed_rows != Some(0)
    }
}

enum FillPlan {
    Propagate { forward: bool },
    Scalar(Value),
}

pub struct MutationEngine<'a> {
    frame: &'a mut Frame,
}

impl<'a> MutationEngine<'a> {
    pub fn new(frame: &'a mut Frame) -> Self {
        Self { frame }
    }

    pub fn fill_missing(
        &mut self,
        column: &str,
        strategy: &FillStrategy,
    ) -> EditResult<MutationRecord> {
        let method = strategy.method();
        debug!("Filling missing values in '{column}' using {method}");
        let target = self
            .frame
            .column(column)
            .ok_or_else(|| EditError::ColumnNotFound(column.to_string()))?;
        if !target.has_missing() {
            return Err(EditError::EmptyOperand(format!(
                "Column '{column}' has no missing values to fill"
            )));
        }
        if method.requires_numeric() && !target.datatype.is_numeric() {
            return Err(EditError::illegal(
                column,
                method,
                format!("requires a numeric column, found {}", target.datatype),
            ));
        }

        let plan = match strategy {
            FillStrategy::ForwardFill => FillPlan::Propagate { forward: true },
            FillStrategy::BackwardFill => FillPlan::Propagate { forward: false },
            FillStrategy::Mean => FillPlan::Scalar(Value::Float(round_to(
                mean(target).ok_or_else(|| no_values(column))?,
                2,
            ))),
            FillStrategy::Median => {
                FillPlan::Scalar(Value::Float(median(target).ok_or_else(|| no_values(column))?))
            }
            FillStrategy::Mode => FillPlan::Scalar(mode(target).ok_or_else(|| no_values(column))?),
            FillStrategy::Custom(raw) => FillPlan::Scalar(custom_value(target, raw)?),
        };

        let target = self
            .frame
            .column_mut(column)
            .ok_or_else(|| EditError::ColumnNotFound(column.to_string()))?;
        let before = target.missing_count();
        let fill_value = match plan {
            FillPlan::Propagate { forward } => {
                propagate(&mut target.cells, forward);
                None
            }
            FillPlan::Scalar(value) => {
                fill_scalar(target, &value);
                Some(value)
            }
        };
        info!(
            "Filled {} missing cell(s) in '{}' using {}",
            before - target.missing_count(),
            column,
            method
        );

        Ok(MutationRecord {
            operation: Operation::FillMissing {
                column: column.to_string(),
                method,
            },
            transcript: transcript::fill_missing(column, strategy, fill_value.as_ref()),
            fill_value,
            removed_rows: None,
        })
    }

    pub fn rename_column(&mut self, old_name: &str, new_name: &str) -> EditResult<MutationRecord> {
        debug!("Renaming column '{old_name}' to '{new_name}'");
        if self.frame.column_index(old_name).is_none() {
            return Err(EditError::ColumnNotFound(old_name.to_string()));
        }
        if new_name.trim().is_empty() {
            return Err(EditError::EmptyOperand(format!(
                "A new name is required to rename column '{old_name}'"
            )));
        }
        if new_name != old_name && self.frame.column_index(new_name).is_some() {
            return Err(EditError::NameCollision {
                from: old_name.to_string(),
                to: new_name.to_string(),
            });
        }
        if let Some(column) = self.frame.column_mut(old_name) {
            column.name = new_name.to_string();
        }
        info!("Renamed column '{old_name}' to '{new_name}'");
        Ok(MutationRecord {
            operation: Operation::RenameColumn {
                from: old_name.to_string(),
                to: new_name.to_string(),
            },
            transcript: transcript::rename_column(old_name, new_name),
            fill_value: None,
            removed_rows: None,
        })
    }

    pub fn drop_columns<S: AsRef<str>>(&mut self, names: &[S]) -> EditResult<MutationRecord> {
        let mut requested: Vec<String> = Vec::with_capacity(names.len());
        for name in names.iter().map(AsRef::as_ref) {
            if !requested.iter().any(|r| r == name) {
                requested.push(name.to_string());
            }
        }
        debug!("Dropping columns {requested:?}");
        if requested.is_empty() {
            return Err(EditError::EmptyOperand(
                "At least one column must be selected to drop".to_string(),
            ));
        }
        if let Some(missing) = requested
            .iter()
            .find(|name| self.frame.column_index(name).is_none())
        {
            return Err(EditError::ColumnNotFound(missing.clone()));
        }

        let doomed: HashSet<&str> = requested.iter().map(String::as_str).collect();
        self.frame
            .columns_mut()
            .retain(|column| !doomed.contains(column.name.as_str()));
        info!(
            "Dropped {} column(s); {} remain",
            requested.len(),
            self.frame.column_count()
        );
        Ok(MutationRecord {
            transcript: transcript::drop_columns(&requested),
            operation: Operation::DropColumns { columns: requested },
            fill_value: None,
            removed_rows: None,
        })
    }

    pub fn drop_duplicate_rows(&mut self) -> EditResult<MutationRecord> {
        let mask = self.frame.duplicate_mask();
        let removed = mask.iter().filter(|dup| **dup).count();
        if removed > 0 {
            let keep: Vec<bool> = mask.iter().map(|dup| !dup).collect();
            self.frame.retain_rows(&keep);
            info!("Dropped {removed} duplicate row(s)");
        } else {
            info!("No duplicate rows found");
        }
        Ok(MutationRecord {
            operation: Operation::DropDuplicateRows,
            transcript: transcript::drop_duplicate_rows(removed),
            fill_value: None,
            removed_rows: Some(removed),
        })
    }
}

fn no_values(column: &str) -> EditError {
    EditError::computation(column, "column has no non-missing values")
}

fn mean(column: &Column) -> Option<f64> {
    let values: Vec<f64> = column.non_missing().filter_map(Value::as_f64).collect();
    if values.is_empty() {
        return None;
    }
    Some(values.iter().sum::<f64>() / values.len() as f64)
}

fn median(column: &Column) -> Option<f64> {
    let mut values: Vec<f64> = column.non_missing().filter_map(Value::as_f64).collect();
    if values.is_empty() {
        return None;
    }
    values.sort_by(|a, b| a.total_cmp(b));
    let mid = values.len() / 2;
    if values.len() % 2 == 0 {
        Some((values[mid - 1] + values[mid]) / 2.0)
    } else {
        Some(values[mid])
    }
}

// Most frequent value; ties go to the value seen first.
fn mode(column: &Column) -> Option<Value> {
    let mut order: Vec<(&Value, usize)> = Vec::new();
    let mut slots: HashMap<ValueKey<'_>, usize> = HashMap::new();
    for value in column.non_missing() {
        let key = value.identity();
        match slots.get(&key) {
            Some(&slot) => order[slot].1 += 1,
            None => {
                slots.insert(key, order.len());
                order.push((value, 1));
            }
        }
    }
    let mut best: Option<(&Value, usize)> = None;
    for (value, count) in order {
        if best.is_none_or(|(_, top)| count > top) {
            best = Some((value, count));
        }
    }
    best.map(|(value, _)| value.clone())
}

fn custom_value(column: &Column, raw: &str) -> EditResult<Value> {
    if raw.is_empty() {
        return Err(EditError::illegal(
            &column.name,
            FillMethod::Custom,
            "a custom value is required",
        ));
    }
    match parse_typed_value(raw, &column.datatype) {
        Ok(Some(value)) => Ok(value),
        Ok(None) => Err(EditError::illegal(
            &column.name,
            FillMethod::Custom,
            format!("'{raw}' denotes a missing value"),
        )),
        Err(_) => Err(EditError::illegal(
            &column.name,
            FillMethod::Custom,
            format!("'{raw}' is not a valid {} value", column.datatype),
        )),
    }
}

fn propagate(cells: &mut [Option<Value>], forward: bool) {
    let mut carry: Option<Value> = None;
    let mut visit = |cell: &mut Option<Value>| {
        if cell.is_some() {
            carry = cell.clone();
        } else {
            *cell = carry.clone();
        }
    };
    if forward {
        cells.iter_mut().for_each(&mut visit);
    } else {
        cells.iter_mut().rev().for_each(&mut visit);
    }
}

fn fill_scalar(column: &mut Column, value: &Value) {
    let stored = match (column.datatype, value) {
        (ColumnType::Integer, Value::Float(f)) if f.fract() == 0.0 => Value::Integer(*f as i64),
        (ColumnType::Integer, Value::Float(_)) => {
            widen_to_float(column);
            value.clone()
        }
        (ColumnType::Float, Value::Integer(i)) => Value::Float(*i as f64),
        _ => value.clone(),
    };
    for cell in column.cells.iter_mut().filter(|cell| cell.is_none()) {
        *cell = Some(stored.clone());
    }
}

fn widen_to_float(column: &mut Column) {
    column.datatype = ColumnType::Float;
    for cell in column.cells.iter_mut().flatten() {
        if let Value::Integer(i) = cell {
            *cell = Value::Float(*i as f64);
        }
    }
}
