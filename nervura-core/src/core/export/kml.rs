//! KML 2.2 serializer.
//!
//! One `<Placemark>` per positioned record; coordinates are written
//! `lng,lat,0` (KML axis order with a zero altitude), names go through the
//! same minimal escaper as GPX.

use super::{escape_xml, ExportContext};
use crate::Record;

pub fn render(records: &[Record], ctx: &ExportContext) -> String {
    let mut out = String::from("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n");
    out.push_str("<kml xmlns=\"http://www.opengis.net/kml/2.2\">\n");
    out.push_str(&format!("  <Document>\n    <name>{}</name>\n", escape_xml(&ctx.app_name)));
    for record in records {
        let Some(position) = record.position else { continue };
        out.push_str("    <Placemark>\n");
        out.push_str(&format!("      <name>{}</name>\n", escape_xml(record.title())));
        if let Some(scientific) = &record.scientific_name {
            out.push_str(&format!(
                "      <description>{}</description>\n",
                escape_xml(scientific)
            ));
        }
        out.push_str(&format!(
            "      <Point>\n        <coordinates>{},{},0</coordinates>\n      </Point>\n",
            position.lng, position.lat
        ));
        out.push_str("    </Placemark>\n");
    }
    out.push_str("  </Document>\n</kml>\n");
    out
}
