//! `edit` command: load a table, run the requested operations through an
//! [`EditorSession`], print each transcript and write the result.
//!
//! Operations run in this order: plan steps, `--set`, `--fill`, `--rename`,
//! `--drop`, `--drop-duplicates`.

use std::{fs, io::Write, str::FromStr};

use anyhow::{Context, Result, anyhow};
use log::info;

use crate::{
    cli::EditArgs,
    io_utils, load,
    mutation::{FillStrategy, MutationRecord},
    plan::{EditPlan, PlanStep, StepOutcome, parse_cell_assignment},
    session::EditorSession,
};

pub fn execute(args: &EditArgs) -> Result<()> {
    let options = args.load.to_options()?;
    let input_delimiter = io_utils::resolve_input_delimiter(&args.load.input, options.delimiter);
    let output_path = args.output.as_deref();
    let output_delimiter =
        io_utils::resolve_output_delimiter(output_path, args.output_delimiter, input_delimiter);
    let output_encoding = io_utils::resolve_encoding(args.output_encoding.as_deref())?;
    let writing_to_stdout = output_path.is_none_or(io_utils::is_dash);

    let plan = build_plan(args)?;
    let frame = load::read_frame(&args.load.input, &options)
        .with_context(|| format!("Loading {:?}", args.load.input))?;
    let mut session = EditorSession::new();
    session.load(frame, load::source_name(&args.load.input));

    let outcomes = plan.apply(&mut session)?;

    let mut report: Box<dyn Write> = if writing_to_stdout {
        Box::new(std::io::stderr())
    } else {
        Box::new(std::io::stdout())
    };
    let mut applied = 0usize;
    for outcome in &outcomes {
        match outcome {
            StepOutcome::Applied(record) => {
                applied += 1;
                write_record(&mut report, applied, record)?;
            }
            StepOutcome::CellsEdited(count) => {
                writeln!(report, "Edited {count} cell(s) directly (no code generated)")?;
            }
            StepOutcome::Skipped(reason) => writeln!(report, "Skipped: {reason}")?,
        }
    }
    report.flush()?;

    let frame = session.frame()?;
    load::write_frame(frame, output_path, output_delimiter, output_encoding)?;

    if let Some(path) = &args.history_json {
        let json = serde_json::to_string_pretty(session.history())?;
        fs::write(path, json).with_context(|| format!("Writing history to {path:?}"))?;
        info!("Wrote {} history record(s) to {:?}", session.history().len(), path);
    }
    info!(
        "Applied {} operation(s) to '{}'",
        session.history().len(),
        session.source_name()?
    );
    Ok(())
}

fn write_record(out: &mut dyn Write, index: usize, record: &MutationRecord) -> Result<()> {
    writeln!(out, "[{index}] {}", record.summary())?;
    for line in record.code().lines() {
        writeln!(out, "    {line}")?;
    }
    Ok(())
}

/// Combines the plan file (if any) with the flag operations.
fn build_plan(args: &EditArgs) -> Result<EditPlan> {
    let mut plan = match &args.plan {
        Some(path) => EditPlan::load(path)?,
        None => EditPlan::default(),
    };

    for raw in &args.cell_edits {
        plan.steps.push(parse_cell_assignment(raw)?);
    }
    for raw in &args.fills {
        let (column, strategy) = raw
            .split_once('=')
            .ok_or_else(|| anyhow!("Fill '{raw}' must look like column=method"))?;
        let strategy = FillStrategy::from_str(strategy.trim())
            .with_context(|| format!("Parsing fill '{raw}'"))?;
        let value = match &strategy {
            FillStrategy::Custom(value) => Some(value.clone()),
            _ => None,
        };
        plan.steps.push(PlanStep::FillMissing {
            column: column.trim().to_string(),
            strategy: strategy.method(),
            value,
        });
    }
    for raw in &args.renames {
        let (from, to) = raw
            .split_once('=')
            .ok_or_else(|| anyhow!("Rename '{raw}' must look like old=new"))?;
        plan.steps.push(PlanStep::RenameColumn {
            from: from.trim().to_string(),
            to: to.trim().to_string(),
        });
    }
    let drops = args
        .drops
        .iter()
        .map(|c| c.trim())
        .filter(|c| !c.is_empty())
        .map(str::to_string)
        .collect::<Vec<_>>();
    if !drops.is_empty() {
        plan.steps.push(PlanStep::DropColumns { columns: drops });
    }
    if args.drop_duplicates {
        plan.steps.push(PlanStep::DropDuplicateRows);
    }
    Ok(plan)
}
