//! Export serializers.
//!
//! Each format is a pure function from a filtered scope to one artifact; the
//! store is never touched. Dispatch is an exhaustive match over
//! [`ExportFormat`], so adding a format is a compile-time-checked change.
//! With a fixed [`ExportContext`] the same scope always serializes to the
//! same bytes.

mod csv;
mod geojson;
mod gpx;
mod json;
mod kml;
mod row;
mod xlsx;

pub use row::{Cell, COLUMNS};

use crate::{Analysis, NervuraError, Record, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// The closed set of supported export formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    Csv,
    Json,
    GeoJson,
    Gpx,
    Kml,
    Xlsx,
}

impl ExportFormat {
    /// Every supported format, in menu order.
    pub const ALL: [ExportFormat; 6] = [
        Self::Xlsx,
        Self::Csv,
        Self::Json,
        Self::GeoJson,
        Self::Gpx,
        Self::Kml,
    ];

    #[must_use]
    pub fn extension(&self) -> &'static str {
        match self {
            Self::Csv => "csv",
            Self::Json => "json",
            Self::GeoJson => "geojson",
            Self::Gpx => "gpx",
            Self::Kml => "kml",
            Self::Xlsx => "xlsx",
        }
    }

    #[must_use]
    pub fn mime(&self) -> &'static str {
        match self {
            Self::Csv => "text/csv",
            Self::Json => "application/json",
            Self::GeoJson => "application/geo+json",
            Self::Gpx => "application/gpx+xml",
            Self::Kml => "application/vnd.google-earth.kml+xml",
            Self::Xlsx => "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet",
        }
    }
}

/// Everything an export run needs besides the scope itself.
///
/// The export timestamp is injected rather than read from the wall clock so
/// that callers (and tests) get reproducible artifacts.
#[derive(Debug, Clone)]
pub struct ExportContext {
    pub app_name: String,
    pub exported_at: DateTime<Utc>,
}

impl ExportContext {
    /// Context stamped with the current time.
    #[must_use]
    pub fn new(app_name: impl Into<String>) -> Self {
        Self::at(app_name, Utc::now())
    }

    /// Context with an explicit timestamp.
    #[must_use]
    pub fn at(app_name: impl Into<String>, exported_at: DateTime<Utc>) -> Self {
        Self { app_name: app_name.into(), exported_at }
    }
}

/// One finished export artifact, ready for the platform delivery mechanism
/// (file write + share sheet, or a browser download).
#[derive(Debug, Clone)]
pub struct Artifact {
    pub filename: String,
    pub mime: &'static str,
    pub bytes: Vec<u8>,
}

/// Serializes `scope` into one artifact of the requested format.
///
/// `analysis` is embedded in the JSON envelope when given and ignored by the
/// other formats.
///
/// # Errors
///
/// Returns [`NervuraError::EmptyScope`] when `scope` is empty — the caller
/// shows a "nothing to export" notice and no artifact is produced. XLSX
/// packaging failures surface as [`NervuraError::Zip`] / [`NervuraError::Io`].
pub fn export(
    format: ExportFormat,
    scope: &[Record],
    analysis: Option<&Analysis>,
    ctx: &ExportContext,
) -> Result<Artifact> {
    if scope.is_empty() {
        return Err(NervuraError::EmptyScope);
    }

    let bytes = match format {
        ExportFormat::Csv => csv::render(scope).into_bytes(),
        ExportFormat::Json => json::render(scope, analysis, ctx)?.into_bytes(),
        ExportFormat::GeoJson => geojson::render(scope)?.into_bytes(),
        ExportFormat::Gpx => gpx::render(scope, ctx).into_bytes(),
        ExportFormat::Kml => kml::render(scope, ctx).into_bytes(),
        ExportFormat::Xlsx => xlsx::render(scope)?,
    };

    Ok(Artifact {
        filename: format!(
            "registros_{}.{}",
            ctx.exported_at.format("%Y-%m-%d_%H%M%S"),
            format.extension()
        ),
        mime: format.mime(),
        bytes,
    })
}

/// Escapes `&`, `<` and `>` for XML text content. Deliberately minimal: the
/// GPX/KML contract passes every other character through verbatim, so quotes
/// in names survive untouched.
pub(crate) fn escape_xml(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            _ => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::RecordDraft;

    fn ctx() -> ExportContext {
        ExportContext::at("NervuraColetora", "2024-06-01T15:30:00Z".parse().unwrap())
    }

    #[test]
    fn test_empty_scope_produces_no_artifact() {
        for format in ExportFormat::ALL {
            let result = export(format, &[], None, &ctx());
            assert!(matches!(result, Err(NervuraError::EmptyScope)));
        }
    }

    #[test]
    fn test_filenames_are_timestamp_stamped() {
        let scope = vec![RecordDraft {
            id: Some("r1".to_string()),
            ..Default::default()
        }
        .assemble(ctx().exported_at)];
        let artifact = export(ExportFormat::Csv, &scope, None, &ctx()).unwrap();
        assert_eq!(artifact.filename, "registros_2024-06-01_153000.csv");
        assert_eq!(artifact.mime, "text/csv");
    }

    #[test]
    fn test_frozen_clock_yields_identical_bytes() {
        let scope = vec![RecordDraft {
            id: Some("r1".to_string()),
            common_name: Some("Ipê".to_string()),
            ..Default::default()
        }
        .assemble(ctx().exported_at)];
        for format in ExportFormat::ALL {
            let a = export(format, &scope, None, &ctx()).unwrap();
            let b = export(format, &scope, None, &ctx()).unwrap();
            assert_eq!(a.bytes, b.bytes, "{format:?} export must be deterministic");
        }
    }

    #[test]
    fn test_escape_xml_is_minimal_by_contract() {
        assert_eq!(escape_xml("a & b <c>"), "a &amp; b &lt;c&gt;");
        assert_eq!(escape_xml("Pé-de-\"anjo\""), "Pé-de-\"anjo\"");
    }
}
