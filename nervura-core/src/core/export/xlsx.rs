//! XLSX serializer.
//!
//! Builds a minimal but spec-conformant OPC package (a zip archive of XML
//! parts) with one worksheet holding the same flattened rows as the CSV
//! export. Strings are written as inline strings so no shared-string table
//! is needed.

use super::escape_xml;
use super::row::{flatten, Cell, COLUMNS};
use crate::{Record, Result};
use std::io::{Cursor, Write};
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

const CONTENT_TYPES: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types"><Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/><Default Extension="xml" ContentType="application/xml"/><Override PartName="/xl/workbook.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.sheet.main+xml"/><Override PartName="/xl/worksheets/sheet1.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.worksheet+xml"/></Types>"#;

const ROOT_RELS: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships"><Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument" Target="xl/workbook.xml"/></Relationships>"#;

const WORKBOOK: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<workbook xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main" xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships"><sheets><sheet name="Registros" sheetId="1" r:id="rId1"/></sheets></workbook>"#;

const WORKBOOK_RELS: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships"><Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/worksheet" Target="worksheets/sheet1.xml"/></Relationships>"#;

pub fn render(records: &[Record]) -> Result<Vec<u8>> {
    let mut archive = ZipWriter::new(Cursor::new(Vec::new()));
    let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);

    archive.start_file("[Content_Types].xml", options)?;
    archive.write_all(CONTENT_TYPES.as_bytes())?;
    archive.start_file("_rels/.rels", options)?;
    archive.write_all(ROOT_RELS.as_bytes())?;
    archive.start_file("xl/workbook.xml", options)?;
    archive.write_all(WORKBOOK.as_bytes())?;
    archive.start_file("xl/_rels/workbook.xml.rels", options)?;
    archive.write_all(WORKBOOK_RELS.as_bytes())?;
    archive.start_file("xl/worksheets/sheet1.xml", options)?;
    archive.write_all(worksheet(records).as_bytes())?;

    Ok(archive.finish()?.into_inner())
}

fn worksheet(records: &[Record]) -> String {
    let mut out = String::from(
        "<?xml version=\"1.0\" encoding=\"UTF-8\" standalone=\"yes\"?>\n<worksheet xmlns=\"http://schemas.openxmlformats.org/spreadsheetml/2006/main\"><sheetData>",
    );

    let header: Vec<Cell> = COLUMNS.iter().map(|c| Cell::Text((*c).to_string())).collect();
    push_row(&mut out, 1, &header);
    for (i, record) in records.iter().enumerate() {
        push_row(&mut out, i + 2, &flatten(record));
    }

    out.push_str("</sheetData></worksheet>");
    out
}

fn push_row(out: &mut String, row_number: usize, cells: &[Cell]) {
    out.push_str(&format!("<row r=\"{row_number}\">"));
    for (col, cell) in cells.iter().enumerate() {
        let reference = format!("{}{}", column_letters(col), row_number);
        match cell {
            Cell::Text(text) => out.push_str(&format!(
                "<c r=\"{reference}\" t=\"inlineStr\"><is><t>{}</t></is></c>",
                escape_xml(text)
            )),
            Cell::Number(n) => out.push_str(&format!("<c r=\"{reference}\"><v>{n}</v></c>")),
            Cell::Empty => out.push_str(&format!("<c r=\"{reference}\"/>")),
        }
    }
    out.push_str("</row>");
}

/// 0-based column index → spreadsheet letters (0 → A, 25 → Z, 26 → AA).
fn column_letters(mut index: usize) -> String {
    let mut letters = Vec::new();
    loop {
        letters.push(b'A' + (index % 26) as u8);
        if index < 26 {
            break;
        }
        index = index / 26 - 1;
    }
    letters.reverse();
    String::from_utf8(letters).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{LatLng, RecordDraft};
    use std::io::Read;

    #[test]
    fn test_column_letters() {
        assert_eq!(column_letters(0), "A");
        assert_eq!(column_letters(12), "M");
        assert_eq!(column_letters(25), "Z");
        assert_eq!(column_letters(26), "AA");
        assert_eq!(column_letters(27), "AB");
    }

    #[test]
    fn test_package_contains_the_five_opc_parts() {
        let scope = vec![RecordDraft { id: Some("r1".to_string()), ..Default::default() }
            .assemble("2024-06-01T15:30:00Z".parse().unwrap())];
        let bytes = render(&scope).unwrap();

        let mut zip = zip::ZipArchive::new(Cursor::new(bytes)).unwrap();
        let names: Vec<String> = (0..zip.len())
            .map(|i| zip.by_index(i).unwrap().name().to_string())
            .collect();
        assert_eq!(
            names,
            vec![
                "[Content_Types].xml",
                "_rels/.rels",
                "xl/workbook.xml",
                "xl/_rels/workbook.xml.rels",
                "xl/worksheets/sheet1.xml",
            ]
        );
    }

    #[test]
    fn test_worksheet_rows_match_csv_shape() {
        let scope = vec![RecordDraft {
            id: Some("r1".to_string()),
            common_name: Some("Ipê & Cia".to_string()),
            position: Some(LatLng { lat: -22.7, lng: -43.6 }),
            ..Default::default()
        }
        .assemble("2024-06-01T15:30:00Z".parse().unwrap())];
        let bytes = render(&scope).unwrap();

        let mut zip = zip::ZipArchive::new(Cursor::new(bytes)).unwrap();
        let mut sheet = String::new();
        zip.by_name("xl/worksheets/sheet1.xml")
            .unwrap()
            .read_to_string(&mut sheet)
            .unwrap();

        // Header row then one data row.
        assert!(sheet.contains("<row r=\"1\"><c r=\"A1\" t=\"inlineStr\"><is><t>id</t></is></c>"));
        assert!(sheet.contains("<c r=\"A2\" t=\"inlineStr\"><is><t>r1</t></is></c>"));
        assert!(sheet.contains("<is><t>Ipê &amp; Cia</t></is>"));
        assert!(sheet.contains("<c r=\"F2\"><v>-22.7</v></c>"));
        // Absent scientificName renders as an empty cell.
        assert!(sheet.contains("<c r=\"C2\"/>"));
    }
}
