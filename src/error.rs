//! Recoverable failures raised by the editing engine.
//!
//! Every failure leaves the table and the session history untouched. The
//! message names the precondition that failed so it can be shown to the
//! user as-is.

use std::fmt;

use serde::Serialize;
use thiserror::Error;

/// Coarse classification of an [`EditError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ErrorKind {
    InvalidColumn,
    InvalidRow,
    IllegalStrategy,
    EmptyOperand,
    ComputationFailure,
    NotLoaded,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            ErrorKind::InvalidColumn => "invalid column",
            ErrorKind::InvalidRow => "invalid row",
            ErrorKind::IllegalStrategy => "illegal strategy",
            ErrorKind::EmptyOperand => "empty operand",
            ErrorKind::ComputationFailure => "computation failure",
            ErrorKind::NotLoaded => "no table loaded",
        };
        f.write_str(label)
    }
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum EditError {
    #[error("Column '{0}' not found in table")]
    ColumnNotFound(String),

    #[error("Cannot rename '{from}' to '{to}': a column named '{to}' already exists")]
    NameCollision { from: String, to: String },

    #[error("Row {row} is out of range (table has {rows} row(s))")]
    RowOutOfRange { row: usize, rows: usize },

    #[error("Strategy '{strategy}' cannot be applied to column '{column}': {reason}")]
    IllegalStrategy {
        column: String,
        strategy: String,
        reason: String,
    },

    #[error("{0}")]
    EmptyOperand(String),

    #[error("Could not compute fill value for column '{column}': {reason}")]
    ComputationFailure { column: String, reason: String },

    #[error("No table loaded in the editing session")]
    NotLoaded,
}

impl EditError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            EditError::ColumnNotFound(_) | EditError::NameCollision { .. } => {
                ErrorKind::InvalidColumn
            }
            EditError::RowOutOfRange { .. } => ErrorKind::InvalidRow,
            EditError::IllegalStrategy { .. } => ErrorKind::IllegalStrategy,
            EditError::EmptyOperand(_) => ErrorKind::EmptyOperand,
            EditError::ComputationFailure { .. } => ErrorKind::ComputationFailure,
            EditError::NotLoaded => ErrorKind::NotLoaded,
        }
    }

    pub(crate) fn illegal(
        column: &str,
        strategy: impl ToString,
        reason: impl Into<String>,
    ) -> Self {
        EditError::IllegalStrategy {
            column: column.to_string(),
            strategy: strategy.to_string(),
            reason: reason.into(),
        }
    }

    pub(crate) fn computation(column: &str, reason: impl Into<String>) -> Self {
        EditError::ComputationFailure {
            column: column.to_string(),
            reason: reason.into(),
        }
    }
}

pub type EditResult<T> = Result<T, EditError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn collision_is_reported_as_invalid_column() {
        let err = EditError::NameCollision {
            from: "a".into(),
            to: "b".into(),
        };
        assert_eq!(err.kind(), ErrorKind::InvalidColumn);
        assert!(err.to_string().contains("'b' already exists"));
    }

    #[test]
    fn messages_name_the_failed_precondition() {
        let err = EditError::illegal("city", "Mean", "column is not numeric");
        assert_eq!(
            err.to_string(),
            "Strategy 'Mean' cannot be applied to column 'city': column is not numeric"
        );
        assert_eq!(err.kind(), ErrorKind::IllegalStrategy);
    }
}
