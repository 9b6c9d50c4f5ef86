//! Table rendering for CLI outputs. Widths are measured in terminal columns,
//! so CJK names and labels line up.

use crate::models::table::TableData;
use crate::utils::colors::colorize_cell;
use unicode_width::UnicodeWidthStr;

fn pad(s: &str, width: usize) -> String {
    let w = UnicodeWidthStr::width(s);
    format!("{}{}", s, " ".repeat(width.saturating_sub(w)))
}

/// Column widths: the widest of header and cells.
pub fn column_widths(table: &TableData) -> Vec<usize> {
    let mut widths: Vec<usize> = table
        .headers
        .iter()
        .map(|h| UnicodeWidthStr::width(h.as_str()))
        .collect();

    for row in &table.rows {
        for (i, cell) in row.iter().enumerate() {
            if let Some(w) = widths.get_mut(i) {
                *w = (*w).max(UnicodeWidthStr::width(cell.as_str()));
            }
        }
    }
    widths
}

/// Plain rendering, one line per row.
pub fn render(table: &TableData) -> String {
    render_with(table, |s| s.to_string())
}

/// Rendering with empty cells and zero counts greyed out.
pub fn render_colored(table: &TableData) -> String {
    render_with(table, colorize_cell)
}

fn render_with<F: Fn(&str) -> String>(table: &TableData, paint: F) -> String {
    let widths = column_widths(table);
    let mut out = String::new();

    // Header
    for (h, w) in table.headers.iter().zip(&widths) {
        out.push_str(&pad(h, *w));
        out.push(' ');
    }
    out.push('\n');

    for w in &widths {
        out.push_str(&"-".repeat(*w));
        out.push(' ');
    }
    out.push('\n');

    // Rows
    for row in &table.rows {
        for (cell, w) in row.iter().zip(&widths) {
            // pad on the raw text, color afterwards
            let padded = pad(cell, *w);
            let trailing = padded.len() - cell.len();
            out.push_str(&paint(cell));
            out.push_str(&" ".repeat(trailing));
            out.push(' ');
        }
        out.push('\n');
    }

    out
}
