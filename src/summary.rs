//! Short description of a table: size, missing values and duplicates.

use anyhow::{Context, Result};
use log::info;
use serde::Serialize;

use crate::{classify, cli::SummaryArgs, frame::Frame, load, table};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MissingColumn {
    pub name: String,
    pub missing: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DataSummary {
    pub rows: usize,
    pub columns: usize,
    pub columns_with_missing: Vec<MissingColumn>,
    pub duplicate_rows: usize,
}

impl DataSummary {
    pub fn from_frame(frame: &Frame) -> Self {
        let columns_with_missing = frame
            .columns()
            .iter()
            .filter(|c| c.has_missing())
            .map(|c| MissingColumn {
                name: c.name.clone(),
                missing: c.missing_count(),
            })
            .collect();
        Self {
            rows: frame.row_count(),
            columns: frame.column_count(),
            columns_with_missing,
            duplicate_rows: frame.duplicate_count(),
        }
    }

    pub fn render(&self) -> String {
        let mut out = format!("Rows: {}, Columns: {}\n", self.rows, self.columns);
        if self.columns_with_missing.is_empty() {
            out.push_str("No columns with missing values\n");
        } else {
            let rows = self
                .columns_with_missing
                .iter()
                .map(|c| vec![c.name.clone(), c.missing.to_string()])
                .collect::<Vec<_>>();
            out.push_str("Columns with missing values:\n");
            out.push_str(&table::render_table(
                &["column".to_string(), "missing".to_string()],
                &rows,
            ));
        }
        out.push_str(&format!("Total Duplicate Rows: {}\n", self.duplicate_rows));
        out
    }
}

pub fn execute(args: &SummaryArgs) -> Result<()> {
    let options = args.load.to_options()?;
    let frame = load::read_frame(&args.load.input, &options)
        .with_context(|| format!("Loading {:?}", args.load.input))?;
    let summary = DataSummary::from_frame(&frame);

    if args.json {
        let classes = classify::classify(&frame);
        let payload = serde_json::json!({
            "summary": summary,
            "numeric": classes.numeric,
            "categorical": classes.categorical,
        });
        println!("{}", serde_json::to_string_pretty(&payload)?);
    } else {
        print!("{}", summary.render());
        let headers = vec!["column".to_string(), "type".to_string(), "class".to_string()];
        let classes = classify::classify(&frame);
        let rows = frame
            .columns()
            .iter()
            .map(|c| {
                let class = if classes.is_numeric(&c.name) {
                    "numeric"
                } else if classes.is_categorical(&c.name) {
                    "categorical"
                } else {
                    "-"
                };
                vec![c.name.clone(), c.datatype.to_string(), class.to_string()]
            })
            .collect::<Vec<_>>();
        table::print_table(&headers, &rows);
    }
    info!(
        "Summarised {} row(s) across {} column(s) from {:?}",
        summary.rows, summary.columns, args.load.input
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{data::Value, frame::Column, schema::ColumnType};

    #[test]
    fn summary_counts_missing_and_duplicates() {
        let frame = Frame::new(vec![
            Column::new(
                "a",
                ColumnType::Integer,
                vec![Some(Value::Integer(1)), None, Some(Value::Integer(1))],
            ),
            Column::new(
                "b",
                ColumnType::Text,
                vec![Some(Value::Text("x".into())), None, Some(Value::Text("x".into()))],
            ),
        ])
        .unwrap();
        let summary = DataSummary::from_frame(&frame);
        assert_eq!(summary.rows, 3);
        assert_eq!(summary.duplicate_rows, 1);
        assert_eq!(summary.columns_with_missing.len(), 2);
        let rendered = summary.render();
        assert!(rendered.starts_with("Rows: 3, Columns: 2\n"));
        assert!(rendered.contains("Total Duplicate Rows: 1"));
    }
}
