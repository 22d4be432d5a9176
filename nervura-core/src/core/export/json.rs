//! JSON serializer: a pretty-printed envelope around the verbatim records.

use crate::{Analysis, Record, Result};
use super::ExportContext;
use chrono::{DateTime, Utc};
use serde::Serialize;

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct Envelope<'a> {
    app: &'a str,
    exported_at: DateTime<Utc>,
    record_count: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    analysis: Option<&'a Analysis>,
    records: &'a [Record],
}

pub fn render(records: &[Record], analysis: Option<&Analysis>, ctx: &ExportContext) -> Result<String> {
    let envelope = Envelope {
        app: &ctx.app_name,
        exported_at: ctx.exported_at,
        record_count: records.len(),
        analysis,
        records,
    };
    // serde_json pretty-printing is 2-space indented.
    Ok(serde_json::to_string_pretty(&envelope)?)
}
