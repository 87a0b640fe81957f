//! Numeric / categorical partition of a table's columns.
//!
//! Classification is recomputed on demand from each column's declared
//! [`ColumnType`](crate::schema::ColumnType). Boolean and temporal columns
//! belong to neither list.

use serde::Serialize;

use crate::{
    error::{EditError, EditResult},
    frame::Frame,
    mutation::FillMethod,
};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ColumnClassification {
    pub numeric: Vec<String>,
    pub categorical: Vec<String>,
}

impl ColumnClassification {
    pub fn is_numeric(&self, column: &str) -> bool {
        self.numeric.iter().any(|c| c == column)
    }

    pub fn is_categorical(&self, column: &str) -> bool {
        self.categorical.iter().any(|c| c == column)
    }
}

pub fn classify(frame: &Frame) -> ColumnClassification {
    let mut classification = ColumnClassification::default();
    for column in frame.columns() {
        if column.datatype.is_numeric() {
            classification.numeric.push(column.name.clone());
        } else if column.datatype.is_categorical() {
            classification.categorical.push(column.name.clone());
        }
    }
    classification
}

/// Fill methods a caller may offer for `column`. Mean and Median appear
/// only for numeric columns.
pub fn allowed_strategies(frame: &Frame, column: &str) -> EditResult<Vec<FillMethod>> {
    let column = frame
        .column(column)
        .ok_or_else(|| EditError::ColumnNotFound(column.to_string()))?;
    let mut methods = vec![
        FillMethod::Custom,
        FillMethod::ForwardFill,
        FillMethod::BackwardFill,
    ];
    if column.datatype.is_numeric() {
        methods.extend([FillMethod::Mean, FillMethod::Median]);
    }
    methods.push(FillMethod::Mode);
    Ok(methods)
}
