//! GPX 1.1 serializer.
//!
//! One `<wpt>` per positioned record; the waypoint name goes through the
//! minimal escaper from the parent module and `<time>` is the record's
//! `created_at`.

use super::{escape_xml, ExportContext};
use crate::Record;

pub fn render(records: &[Record], ctx: &ExportContext) -> String {
    let mut out = String::from("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n");
    out.push_str(&format!(
        "<gpx version=\"1.1\" creator=\"{}\" xmlns=\"http://www.topografix.com/GPX/1/1\">\n",
        escape_xml(&ctx.app_name)
    ));
    for record in records {
        let Some(position) = record.position else { continue };
        out.push_str(&format!(
            "  <wpt lat=\"{}\" lon=\"{}\">\n    <name>{}</name>\n    <time>{}</time>\n  </wpt>\n",
            position.lat,
            position.lng,
            escape_xml(record.title()),
            record.created_at.to_rfc3339(),
        ));
    }
    out.push_str("</gpx>\n");
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{LatLng, RecordDraft};
    use chrono::{DateTime, Utc};

    fn ts() -> DateTime<Utc> {
        "2024-06-01T15:30:00Z".parse().unwrap()
    }

    fn ctx() -> ExportContext {
        ExportContext::at("NervuraColetora", ts())
    }

    #[test]
    fn test_waypoint_attributes_and_time() {
        let scope = vec![RecordDraft {
            id: Some("r1".to_string()),
            common_name: Some("Ipê".to_string()),
            position: Some(LatLng { lat: -22.7, lng: -43.6 }),
            created_at: Some(ts()),
            ..Default::default()
        }
        .assemble(ts())];

        let gpx = render(&scope, &ctx());
        assert!(gpx.contains("<wpt lat=\"-22.7\" lon=\"-43.6\">"));
        assert!(gpx.contains("<name>Ipê</name>"));
        assert!(gpx.contains("<time>2024-06-01T15:30:00+00:00</time>"));
        assert!(gpx.contains("creator=\"NervuraColetora\""));
    }

    #[test]
    fn test_name_escaping_is_minimal() {
        let scope = vec![RecordDraft {
            id: Some("r1".to_string()),
            common_name: Some("Pau & \"ferro\" <novo>".to_string()),
            position: Some(LatLng { lat: -22.7, lng: -43.6 }),
            ..Default::default()
        }
        .assemble(ts())];

        let gpx = render(&scope, &ctx());
        assert!(gpx.contains("<name>Pau &amp; \"ferro\" &lt;novo&gt;</name>"));
    }

    #[test]
    fn test_positionless_records_skipped() {
        let scope = vec![RecordDraft { id: Some("r1".to_string()), ..Default::default() }.assemble(ts())];
        let gpx = render(&scope, &ctx());
        assert!(!gpx.contains("<wpt"));
        assert!(gpx.ends_with("</gpx>\n"));
    }
}
