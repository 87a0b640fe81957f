//! Editing session: one working table, its source name and the history of
//! applied mutations.

use std::collections::BTreeMap;

use log::{debug, info, warn};

use crate::{
    classify::{self, ColumnClassification},
    data::{Value, coerce_raw_value},
    error::{EditError, EditResult},
    frame::Frame,
    mutation::{FillMethod, FillStrategy, MutationEngine, MutationRecord},
    summary::DataSummary,
};

/// Sparse set of cell overwrites keyed by row, then column name, as
/// collected by a grid editor.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CellPatch {
    edits: BTreeMap<usize, BTreeMap<String, Option<Value>>>,
}

impl CellPatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(
        &mut self,
        row: usize,
        column: impl Into<String>,
        value: Option<Value>,
    ) -> &mut Self {
        self.edits.entry(row).or_default().insert(column.into(), value);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.edits.is_empty()
    }

    pub fn len(&self) -> usize {
        self.edits.values().map(BTreeMap::len).sum()
    }

    pub fn iter(&self) -> impl Iterator<Item = (usize, &str, &Option<Value>)> {
        self.edits.iter().flat_map(|(row, cells)| {
            cells
                .iter()
                .map(move |(column, value)| (*row, column.as_str(), value))
        })
    }
}

#[derive(Debug)]
struct Loaded {
    frame: Frame,
    source_name: String,
    history: Vec<MutationRecord>,
}

/// `Empty` until [`EditorSession::load`] installs a table; every later load
/// replaces the table and discards its history.
#[derive(Debug, Default)]
pub struct EditorSession {
    state: Option<Loaded>,
}

impl EditorSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// Installs `frame` as the working table. Replacing an existing table
    /// drops its history; callers confirm that with the user beforehand.
    pub fn load(&mut self, frame: Frame, source_name: impl Into<String>) {
        let source_name = source_name.into();
        if let Some(previous) = &self.state {
            warn!(
                "Replacing '{}' ({} recorded edit(s)) with '{}'",
                previous.source_name,
                previous.history.len(),
                source_name
            );
        }
        info!(
            "Loaded '{}' with {} row(s) and {} column(s)",
            source_name,
            frame.row_count(),
            frame.column_count()
        );
        self.state = Some(Loaded {
            frame,
            source_name,
            history: Vec::new(),
        });
    }

    pub fn is_loaded(&self) -> bool {
        self.state.is_some()
    }

    fn loaded(&self) -> EditResult<&Loaded> {
        self.state.as_ref().ok_or(EditError::NotLoaded)
    }

    fn loaded_mut(&mut self) -> EditResult<&mut Loaded> {
        self.state.as_mut().ok_or(EditError::NotLoaded)
    }

    pub fn frame(&self) -> EditResult<&Frame> {
        self.loaded().map(|s| &s.frame)
    }

    pub fn source_name(&self) -> EditResult<&str> {
        self.loaded().map(|s| s.source_name.as_str())
    }

    /// Applied mutations in order. Empty before a table is loaded.
    pub fn history(&self) -> &[MutationRecord] {
        self.state
            .as_ref()
            .map(|s| s.history.as_slice())
            .unwrap_or_default()
    }

    /// Hands the table back, ending the session.
    pub fn close(&mut self) -> Option<(Frame, String)> {
        self.state.take().map(|s| (s.frame, s.source_name))
    }

    pub fn classify(&self) -> EditResult<ColumnClassification> {
        self.frame().map(classify::classify)
    }

    pub fn allowed_strategies(&self, column: &str) -> EditResult<Vec<FillMethod>> {
        classify::allowed_strategies(self.frame()?, column)
    }

    pub fn summary(&self) -> EditResult<DataSummary> {
        self.frame().map(DataSummary::from_frame)
    }

    fn record(
        &mut self,
        apply: impl FnOnce(&mut MutationEngine<'_>) -> EditResult<MutationRecord>,
    ) -> EditResult<MutationRecord> {
        let loaded = self.loaded_mut()?;
        let record = apply(&mut MutationEngine::new(&mut loaded.frame))?;
        if record.changed_table() {
            loaded.history.push(record.clone());
        }
        Ok(record)
    }

    pub fn fill_missing(
        &mut self,
        column: &str,
        strategy: &FillStrategy,
    ) -> EditResult<MutationRecord> {
        self.record(|engine| engine.fill_missing(column, strategy))
    }

    pub fn rename_column(&mut self, old_name: &str, new_name: &str) -> EditResult<MutationRecord> {
        self.record(|engine| engine.rename_column(old_name, new_name))
    }

    pub fn drop_columns<S: AsRef<str>>(&mut self, names: &[S]) -> EditResult<MutationRecord> {
        self.record(|engine| engine.drop_columns(names))
    }

    pub fn drop_duplicate_rows(&mut self) -> EditResult<MutationRecord> {
        self.record(|engine| engine.drop_duplicate_rows())
    }

    /// Overwrites cells directly, without type checks or a transcript.
    /// The whole patch is rejected if any entry addresses an unknown
    /// column or a row past the end of the table.
    pub fn apply_cell_edits(&mut self, patch: &CellPatch) -> EditResult<usize> {
        let loaded = self.loaded_mut()?;
        let rows = loaded.frame.row_count();
        for (row, column, _) in patch.iter() {
            if loaded.frame.column_index(column).is_none() {
                return Err(EditError::ColumnNotFound(column.to_string()));
            }
            if row >= rows {
                return Err(EditError::RowOutOfRange { row, rows });
            }
        }
        let mut applied = 0usize;
        for (row, column, value) in patch.iter() {
            if let Some(target) = loaded.frame.column_mut(column) {
                target.cells[row] = value.clone();
                applied += 1;
            }
        }
        debug!("Applied {applied} cell edit(s) to '{}'", loaded.source_name);
        Ok(applied)
    }

    /// Builds a patch entry from raw grid text, parsed against the
    /// column's current type where possible.
    pub fn raw_cell_value(&self, column: &str, raw: &str) -> EditResult<Option<Value>> {
        let frame = self.frame()?;
        let target = frame
            .column(column)
            .ok_or_else(|| EditError::ColumnNotFound(column.to_string()))?;
        Ok(coerce_raw_value(raw, &target.datatype))
    }
}
