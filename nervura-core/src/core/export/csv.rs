//! CSV serializer (RFC 4180).
//!
//! Header row in [`COLUMNS`] order, `\r\n` line endings. Text cells are
//! always quoted with internal quotes doubled; numeric cells are written
//! unquoted; absent values render as the empty string.

use super::row::{flatten, Cell, COLUMNS};
use crate::Record;

pub fn render(records: &[Record]) -> String {
    let mut out = String::new();
    out.push_str(&COLUMNS.join(","));
    out.push_str("\r\n");
    for record in records {
        let cells: Vec<String> = flatten(record).iter().map(cell_field).collect();
        out.push_str(&cells.join(","));
        out.push_str("\r\n");
    }
    out
}

fn cell_field(cell: &Cell) -> String {
    match cell {
        Cell::Text(text) => format!("\"{}\"", text.replace('"', "\"\"")),
        Cell::Number(n) => n.to_string(),
        Cell::Empty => String::new(),
    }
}
