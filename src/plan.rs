//! Edit plans: an ordered list of operations read from YAML or JSON.
//!
//! ```yaml
//! steps:
//!   - fill_missing: { column: age, strategy: mean }
//!   - fill_missing: { column: city, strategy: custom, value: unknown }
//!   - rename_column: { from: dob, to: birth_date }
//!   - drop_columns: { columns: [notes] }
//!   - drop_duplicate_rows
//!   - set_cell: { row: 0, column: city, value: Paris }
//! ```

use std::{fs, path::Path};

use anyhow::{Context, Result, anyhow};
use log::{debug, warn};
use serde::Deserialize;

use crate::{
    mutation::{FillMethod, FillStrategy, MutationRecord},
    session::{CellPatch, EditorSession},
};

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlanStep {
    FillMissing {
        column: String,
        strategy: FillMethod,
        #[serde(default)]
        value: Option<String>,
    },
    RenameColumn {
        from: String,
        to: String,
    },
    DropColumns {
        columns: Vec<String>,
    },
    DropDuplicateRows,
    SetCell {
        row: usize,
        column: String,
        #[serde(default)]
        value: Option<String>,
    },
}

impl PlanStep {
    pub fn name(&self) -> &'static str {
        match self {
            PlanStep::FillMissing { .. } => "fill_missing",
            PlanStep::RenameColumn { .. } => "rename_column",
            PlanStep::DropColumns { .. } => "drop_columns",
            PlanStep::DropDuplicateRows => "drop_duplicate_rows",
            PlanStep::SetCell { .. } => "set_cell",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum StepOutcome {
    Applied(MutationRecord),
    CellsEdited(usize),
    Skipped(String),
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct EditPlan {
    #[serde(default)]
    pub steps: Vec<PlanStep>,
}

impl EditPlan {
    pub fn load(path: &Path) -> Result<Self> {
        let text =
            fs::read_to_string(path).with_context(|| format!("Reading edit plan {path:?}"))?;
        let is_json = path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
        let plan = if is_json {
            Self::from_json_str(&text)
        } else {
            Self::from_yaml_str(&text)
        };
        plan.with_context(|| format!("Parsing edit plan {path:?}"))
    }

    pub fn from_yaml_str(text: &str) -> Result<Self> {
        Ok(serde_yaml::from_str(text)?)
    }

    pub fn from_json_str(text: &str) -> Result<Self> {
        Ok(serde_json::from_str(text)?)
    }

    /// Runs each step against `session` in order. Stops at the first
    /// failing step; earlier steps stay applied.
    pub fn apply(&self, session: &mut EditorSession) -> Result<Vec<StepOutcome>> {
        let mut outcomes = Vec::with_capacity(self.steps.len());
        for (idx, step) in self.steps.iter().enumerate() {
            debug!("Plan step {}: {}", idx + 1, step.name());
            let outcome = apply_step(session, step)
                .with_context(|| format!("Plan step {} ({})", idx + 1, step.name()))?;
            outcomes.push(outcome);
        }
        Ok(outcomes)
    }
}

fn apply_step(session: &mut EditorSession, step: &PlanStep) -> Result<StepOutcome> {
    let outcome = match step {
        PlanStep::FillMissing {
            column,
            strategy,
            value,
        } => match FillStrategy::select(*strategy, value.as_deref()) {
            Some(strategy) => StepOutcome::Applied(session.fill_missing(column, &strategy)?),
            None => {
                let reason = format!("custom fill for '{column}' has no value");
                warn!("Skipping step: {reason}");
                StepOutcome::Skipped(reason)
            }
        },
        PlanStep::RenameColumn { from, to } => {
            StepOutcome::Applied(session.rename_column(from, to)?)
        }
        PlanStep::DropColumns { columns } => StepOutcome::Applied(session.drop_columns(columns)?),
        PlanStep::DropDuplicateRows => StepOutcome::Applied(session.drop_duplicate_rows()?),
        PlanStep::SetCell { row, column, value } => {
            let cell = match value {
                Some(raw) => session.raw_cell_value(column, raw)?,
                None => None,
            };
            let mut patch = CellPatch::new();
            patch.set(*row, column.clone(), cell);
            StepOutcome::CellsEdited(session.apply_cell_edits(&patch)?)
        }
    };
    Ok(outcome)
}

/// Parses `row:column=value` (value may be empty to clear the cell).
pub fn parse_cell_assignment(assignment: &str) -> Result<PlanStep> {
    let (target, value) = assignment
        .split_once('=')
        .ok_or_else(|| anyhow!("Cell edit '{assignment}' must look like row:column=value"))?;
    let (row, column) = target
        .split_once(':')
        .ok_or_else(|| anyhow!("Cell edit '{assignment}' must look like row:column=value"))?;
    let row = row
        .trim()
        .parse::<usize>()
        .with_context(|| format!("Invalid row index in cell edit '{assignment}'"))?;
    let column = column.trim();
    if column.is_empty() {
        return Err(anyhow!("Cell edit '{assignment}' is missing a column name"));
    }
    Ok(PlanStep::SetCell {
        row,
        column: column.to_string(),
        value: Some(value.to_string()),
    })
}
