//! Plain-text grid rendering for terminal previews.

use std::fmt::Write as _;

use crate::frame::Frame;

/// Marker shown for missing cells in previews.
pub const MISSING_MARKER: &str = "<NA>";

const MAX_CELL_WIDTH: usize = 40;

pub fn render_table(headers: &[String], rows: &[Vec<String>]) -> String {
    let cleaned_headers: Vec<String> = headers.iter().map(|h| clean_cell(h)).collect();
    let cleaned_rows: Vec<Vec<String>> = rows
        .iter()
        .map(|row| row.iter().take(headers.len()).map(|c| clean_cell(c)).collect())
        .collect();

    let mut widths: Vec<usize> = cleaned_headers.iter().map(|h| width(h).max(3)).collect();
    for row in &cleaned_rows {
        for (idx, cell) in row.iter().enumerate() {
            widths[idx] = widths[idx].max(width(cell));
        }
    }

    let mut output = String::new();
    let _ = writeln!(output, "{}", join_padded(&cleaned_headers, &widths));
    let rule: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
    let _ = writeln!(output, "{}", join_padded(&rule, &widths));
    for row in &cleaned_rows {
        let _ = writeln!(output, "{}", join_padded(row, &widths));
    }
    output
}

pub fn print_table(headers: &[String], rows: &[Vec<String>]) {
    print!("{}", render_table(headers, rows));
}

/// Renders the first `limit` rows of a frame with a leading row index.
pub fn render_frame(frame: &Frame, limit: usize) -> String {
    let mut headers = vec![String::new()];
    headers.extend(frame.column_names().into_iter().map(str::to_string));
    let rows: Vec<Vec<String>> = frame
        .display_rows(Some(limit), MISSING_MARKER)
        .into_iter()
        .enumerate()
        .map(|(idx, cells)| {
            let mut row = Vec::with_capacity(cells.len() + 1);
            row.push(idx.to_string());
            row.extend(cells);
            row
        })
        .collect();
    render_table(&headers, &rows)
}

fn join_padded(cells: &[String], widths: &[usize]) -> String {
    let mut line = cells
        .iter()
        .zip(widths)
        .map(|(cell, w)| format!("{cell}{}", " ".repeat(w.saturating_sub(width(cell)))))
        .collect::<Vec<_>>()
        .join("  ");
    line.truncate(line.trim_end().len());
    line
}

fn width(value: &str) -> usize {
    value.chars().count()
}

// Flattens control characters and shortens very long values.
fn clean_cell(value: &str) -> String {
    let flat: String = value
        .chars()
        .map(|ch| if ch.is_control() { ' ' } else { ch })
        .collect();
    if width(&flat) > MAX_CELL_WIDTH {
        let mut short: String = flat.chars().take(MAX_CELL_WIDTH - 1).collect();
        short.push('…');
        short
    } else {
        flat
    }
}
