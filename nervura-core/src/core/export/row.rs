//! The flattened row shape shared by the CSV and XLSX serializers.

use crate::Record;

/// Column order for tabular exports. This order is a documented contract;
/// append new columns at the end rather than reordering.
pub const COLUMNS: [&str; 13] = [
    "id",
    "commonName",
    "scientificName",
    "family",
    "lifeForm",
    "lat",
    "lng",
    "girthCm",
    "heightM",
    "photoCount",
    "createdAt",
    "updatedAt",
    "notes",
];

/// One tabular cell value.
///
/// Text and numbers are kept apart so each serializer can apply its own
/// quoting rules (CSV quotes text but never numbers; XLSX emits inline
/// strings vs. numeric cells).
#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    Text(String),
    Number(f64),
    Empty,
}

impl Cell {
    fn text(value: &Option<String>) -> Cell {
        match value {
            Some(v) => Cell::Text(v.clone()),
            None => Cell::Empty,
        }
    }

    fn number(value: Option<f64>) -> Cell {
        match value {
            Some(v) => Cell::Number(v),
            None => Cell::Empty,
        }
    }
}

/// Flattens one record into the [`COLUMNS`] shape.
pub fn flatten(record: &Record) -> Vec<Cell> {
    vec![
        Cell::Text(record.id.clone()),
        Cell::text(&record.common_name),
        Cell::text(&record.scientific_name),
        Cell::text(&record.family),
        match record.morphology.life_form {
            Some(life) => Cell::Text(life.as_str().to_string()),
            None => Cell::Empty,
        },
        Cell::number(record.position.map(|p| p.lat)),
        Cell::number(record.position.map(|p| p.lng)),
        Cell::number(record.morphology.girth_cm),
        Cell::number(record.morphology.height_m),
        Cell::Number(record.photos.len() as f64),
        Cell::Text(record.created_at.to_rfc3339()),
        Cell::Text(record.updated_at.to_rfc3339()),
        Cell::text(&record.morphology.notes),
    ]
}
