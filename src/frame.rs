//! The in-memory table being edited.
//!
//! A [`Frame`] is an ordered list of named, typed columns of equal length.
//! Cells are `Option<Value>`; `None` marks a missing cell.

use std::collections::HashSet;

use serde::Serialize;

use crate::{
    data::{Value, ValueKey},
    schema::ColumnType,
};

pub type Cell = Option<Value>;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Column {
    pub name: String,
    pub datatype: ColumnType,
    pub cells: Vec<Cell>,
}

impl Column {
    pub fn new(name: impl Into<String>, datatype: ColumnType, cells: Vec<Cell>) -> Self {
        Self {
            name: name.into(),
            datatype,
            cells,
        }
    }

    pub fn missing_count(&self) -> usize {
        self.cells.iter().filter(|cell| cell.is_none()).count()
    }

    pub fn has_missing(&self) -> bool {
        self.cells.iter().any(Option::is_none)
    }

    pub fn non_missing(&self) -> impl Iterator<Item = &Value> {
        self.cells.iter().flatten()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Frame {
    columns: Vec<Column>,
    row_count: usize,
}

impl Frame {
    /// Builds a frame from columns. Returns `None` when the columns do not
    /// all have the same length.
    pub fn new(columns: Vec<Column>) -> Option<Self> {
        let row_count = columns.first().map(|c| c.cells.len()).unwrap_or(0);
        if columns.iter().any(|c| c.cells.len() != row_count) {
            return None;
        }
        Some(Self { columns, row_count })
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn column_names(&self) -> Vec<&str> {
        self.columns.iter().map(|c| c.name.as_str()).collect()
    }

    pub fn row_count(&self) -> usize {
        self.row_count
    }

    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c.name == name)
    }

    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name == name)
    }

    pub(crate) fn column_mut(&mut self, name: &str) -> Option<&mut Column> {
        self.columns.iter_mut().find(|c| c.name == name)
    }

    pub(crate) fn columns_mut(&mut self) -> &mut Vec<Column> {
        &mut self.columns
    }

    pub fn cell(&self, row: usize, column: &str) -> Option<&Cell> {
        self.column(column).and_then(|c| c.cells.get(row))
    }

    pub fn row(&self, row: usize) -> Option<Vec<&Cell>> {
        if row >= self.row_count {
            return None;
        }
        Some(self.columns.iter().map(|c| &c.cells[row]).collect())
    }

    /// Column names that hold at least one missing cell, in table order.
    pub fn columns_with_missing(&self) -> Vec<&str> {
        self.columns
            .iter()
            .filter(|c| c.has_missing())
            .map(|c| c.name.as_str())
            .collect()
    }

    // Missing cells key as `None`, so two missing cells compare equal.
    fn row_key(&self, row: usize) -> Vec<Option<ValueKey<'_>>> {
        self.columns
            .iter()
            .map(|c| c.cells[row].as_ref().map(Value::identity))
            .collect()
    }

    /// One flag per row: `true` when the row repeats an earlier row.
    pub fn duplicate_mask(&self) -> Vec<bool> {
        let mut seen = HashSet::with_capacity(self.row_count);
        (0..self.row_count)
            .map(|row| !seen.insert(self.row_key(row)))
            .collect()
    }

    pub fn duplicate_count(&self) -> usize {
        self.duplicate_mask().into_iter().filter(|dup| *dup).count()
    }

    /// Keeps rows whose flag in `keep` is `true`, preserving order. Rows
    /// past the end of `keep` are kept.
    pub(crate) fn retain_rows(&mut self, keep: &[bool]) {
        let flag = |row: usize| keep.get(row).copied().unwrap_or(true);
        for column in &mut self.columns {
            let mut row = 0;
            column.cells.retain(|_| {
                row += 1;
                flag(row - 1)
            });
        }
        self.row_count = (0..self.row_count).filter(|row| flag(*row)).count();
    }

    /// Rows rendered as display strings, missing cells as `missing`.
    pub fn display_rows(&self, limit: Option<usize>, missing: &str) -> Vec<Vec<String>> {
        let take = limit.unwrap_or(self.row_count).min(self.row_count);
        (0..take)
            .map(|row| {
                self.columns
                    .iter()
                    .map(|c| match &c.cells[row] {
                        Some(value) => value.as_display(),
                        None => missing.to_string(),
                    })
                    .collect()
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Frame {
        Frame::new(vec![
            Column::new(
                "id",
                ColumnType::Integer,
                vec![Some(Value::Integer(1)), Some(Value::Integer(2)), Some(Value::Integer(1))],
            ),
            Column::new(
                "name",
                ColumnType::Text,
                vec![Some(Value::Text("a".into())), None, Some(Value::Text("a".into()))],
            ),
        ])
        .unwrap()
    }

    #[test]
    fn new_rejects_ragged_columns() {
        let ragged = Frame::new(vec![
            Column::new("a", ColumnType::Integer, vec![None]),
            Column::new("b", ColumnType::Integer, vec![None, None]),
        ]);
        assert!(ragged.is_none());
    }

    #[test]
    fn duplicate_mask_flags_later_repeats() {
        let frame = sample();
        assert_eq!(frame.duplicate_mask(), vec![false, false, true]);
        assert_eq!(frame.duplicate_count(), 1);
    }

    #[test]
    fn missing_cells_compare_equal_for_duplicates() {
        let frame =
            Frame::new(vec![Column::new("x", ColumnType::Float, vec![None, None])]).unwrap();
        assert_eq!(frame.duplicate_count(), 1);
    }

    #[test]
    fn separator_characters_in_text_do_not_merge_rows() {
        let frame = Frame::new(vec![
            Column::new(
                "a",
                ColumnType::Text,
                vec![
                    Some(Value::Text("a\u{1f}s:b".into())),
                    Some(Value::Text("a".into())),
                ],
            ),
            Column::new(
                "b",
                ColumnType::Text,
                vec![
                    Some(Value::Text("c".into())),
                    Some(Value::Text("b\u{1f}s:c".into())),
                ],
            ),
        ])
        .unwrap();
        assert_eq!(frame.duplicate_mask(), vec![false, false]);
    }

    #[test]
    fn signed_zero_rows_are_duplicates() {
        let frame = Frame::new(vec![Column::new(
            "x",
            ColumnType::Float,
            vec![Some(Value::Float(0.0)), Some(Value::Float(-0.0))],
        )])
        .unwrap();
        assert_eq!(frame.duplicate_count(), 1);
    }

    #[test]
    fn retain_rows_tracks_row_count_without_columns() {
        let mut frame = Frame {
            columns: Vec::new(),
            row_count: 3,
        };
        frame.retain_rows(&[true, false, false]);
        assert_eq!(frame.row_count(), 1);
    }

    #[test]
    fn retain_rows_keeps_order() {
        let mut frame = sample();
        frame.retain_rows(&[true, false, true]);
        assert_eq!(frame.row_count(), 2);
        assert_eq!(frame.cell(1, "id"), Some(&Some(Value::Integer(1))));
    }

    #[test]
    fn columns_with_missing_preserves_order() {
        assert_eq!(sample().columns_with_missing(), vec!["name"]);
    }
}
