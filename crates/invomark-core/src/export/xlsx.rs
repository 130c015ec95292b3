//! Minimal SpreadsheetML writer.
//!
//! Produces a workbook with two sheets: the record table and the EUR pivot.
//! Text goes through the shared string table, numbers are written as-is.

use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;
use rust_decimal::Decimal;
use std::collections::HashMap;
use std::fmt::Display;
use std::io::{Seek, Write};
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

use crate::error::InvomarkError;
use crate::export::pivot::pivot_by_date;
use crate::model::InvoiceRecord;

pub const PIVOT_TITLE: &str = "Pivot Table - Sum of Values in EUR";
/// 0-based row where the pivot header is written.
const PIVOT_HEADER_ROW: usize = 2;

const NS_MAIN: &str = "http://schemas.openxmlformats.org/spreadsheetml/2006/main";
const NS_REL: &str = "http://schemas.openxmlformats.org/officeDocument/2006/relationships";
const NS_PKG_REL: &str = "http://schemas.openxmlformats.org/package/2006/relationships";
const NS_CONTENT_TYPES: &str = "http://schemas.openxmlformats.org/package/2006/content-types";
const REL_OFFICE_DOC: &str =
    "http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument";
const REL_WORKSHEET: &str =
    "http://schemas.openxmlformats.org/officeDocument/2006/relationships/worksheet";
const REL_STYLES: &str =
    "http://schemas.openxmlformats.org/officeDocument/2006/relationships/styles";
const REL_SHARED_STRINGS: &str =
    "http://schemas.openxmlformats.org/officeDocument/2006/relationships/sharedStrings";
const CT_WORKBOOK: &str =
    "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet.main+xml";
const CT_WORKSHEET: &str =
    "application/vnd.openxmlformats-officedocument.spreadsheetml.worksheet+xml";
const CT_STYLES: &str = "application/vnd.openxmlformats-officedocument.spreadsheetml.styles+xml";
const CT_SHARED_STRINGS: &str =
    "application/vnd.openxmlformats-officedocument.spreadsheetml.sharedStrings+xml";

#[derive(Debug, Clone, PartialEq)]
enum Cell {
    Text(String),
    Number(Decimal),
    Empty,
}

#[derive(Debug, Default)]
struct Sheet {
    name: &'static str,
    rows: Vec<Vec<Cell>>,
    /// Inclusive cell range, e.g. `A3:D5`.
    auto_filter: Option<String>,
}

#[derive(Debug, Default)]
struct SharedStrings {
    lookup: HashMap<String, usize>,
    strings: Vec<String>,
    references: usize,
}

impl SharedStrings {
    fn intern(&mut self, s: &str) -> usize {
        self.references += 1;
        if let Some(&i) = self.lookup.get(s) {
            return i;
        }
        let i = self.strings.len();
        self.strings.push(s.to_string());
        self.lookup.insert(s.to_string(), i);
        i
    }
}

/// Write `records` and their pivot as an `.xlsx` workbook.
pub fn write_xlsx<W: Write + Seek>(records: &[InvoiceRecord], out: W) -> Result<(), InvomarkError> {
    let sheets = [records_sheet(records), pivot_sheet(records)];

    let mut strings = SharedStrings::default();
    let mut sheet_parts = Vec::with_capacity(sheets.len());
    for sheet in &sheets {
        sheet_parts.push(sheet_xml(sheet, &mut strings)?);
    }

    let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);
    let mut zip = ZipWriter::new(out);

    let parts = [
        ("[Content_Types].xml", content_types_xml(sheets.len())?),
        ("_rels/.rels", root_rels_xml()?),
        ("xl/workbook.xml", workbook_xml(&sheets)?),
        ("xl/_rels/workbook.xml.rels", workbook_rels_xml(sheets.len())?),
        ("xl/styles.xml", styles_xml()?),
        ("xl/sharedStrings.xml", shared_strings_xml(&strings)?),
    ];
    for (name, bytes) in parts {
        zip.start_file(name, options)?;
        zip.write_all(&bytes)?;
    }
    for (i, bytes) in sheet_parts.iter().enumerate() {
        zip.start_file(format!("xl/worksheets/sheet{}.xml", i + 1), options)?;
        zip.write_all(bytes)?;
    }
    zip.finish()?;
    Ok(())
}

fn records_sheet(records: &[InvoiceRecord]) -> Sheet {
    let mut rows = vec![InvoiceRecord::COLUMNS
        .iter()
        .map(|c| Cell::Text(c.to_string()))
        .collect()];
    for r in records {
        rows.push(vec![
            Cell::Text(r.file_name.clone()),
            Cell::Text(r.date.to_string()),
            Cell::Text(r.original_value.to_string()),
            r.value_in_eur.map(Cell::Number).unwrap_or(Cell::Empty),
        ]);
    }
    Sheet {
        name: "Sheet1",
        rows,
        auto_filter: None,
    }
}

fn pivot_sheet(records: &[InvoiceRecord]) -> Sheet {
    let pivot = pivot_by_date(records);

    let mut rows = vec![vec![Cell::Text(PIVOT_TITLE.to_string())]];
    rows.resize_with(PIVOT_HEADER_ROW, Vec::new);

    let mut header = vec![Cell::Text("Date".to_string())];
    header.extend(pivot.file_names.iter().map(|f| Cell::Text(f.clone())));
    header.push(Cell::Text("Total".to_string()));
    let width = header.len();
    rows.push(header);

    for ((date, cells), total) in pivot.dates.iter().zip(&pivot.cells).zip(&pivot.totals) {
        let mut row = vec![Cell::Text(date.clone())];
        row.extend(cells.iter().copied().map(Cell::Number));
        row.push(Cell::Number(*total));
        rows.push(row);
    }

    let auto_filter = format!(
        "A{}:{}{}",
        PIVOT_HEADER_ROW + 1,
        column_name(width - 1),
        rows.len()
    );
    Sheet {
        name: "Sheet2",
        rows,
        auto_filter: Some(auto_filter),
    }
}

/// Spreadsheet column letters for a 0-based index: 0 -> A, 26 -> AA.
fn column_name(mut index: usize) -> String {
    let mut name = Vec::new();
    loop {
        name.push(b'A' + (index % 26) as u8);
        if index < 26 {
            break;
        }
        index = index / 26 - 1;
    }
    name.reverse();
    String::from_utf8_lossy(&name).into_owned()
}

/// Event writer that maps failures into [`InvomarkError`].
struct XmlOut {
    writer: Writer<Vec<u8>>,
}

impl XmlOut {
    fn new() -> Result<Self, InvomarkError> {
        let mut out = XmlOut {
            writer: Writer::new(Vec::new()),
        };
        out.event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), Some("yes"))))?;
        Ok(out)
    }

    fn event(&mut self, event: Event<'_>) -> Result<(), InvomarkError> {
        self.writer.write_event(event).map_err(xml_error)
    }

    fn start(&mut self, name: &str, attrs: &[(&str, &str)]) -> Result<(), InvomarkError> {
        self.event(Event::Start(
            BytesStart::new(name).with_attributes(attrs.iter().copied()),
        ))
    }

    fn empty(&mut self, name: &str, attrs: &[(&str, &str)]) -> Result<(), InvomarkError> {
        self.event(Event::Empty(
            BytesStart::new(name).with_attributes(attrs.iter().copied()),
        ))
    }

    fn end(&mut self, name: &str) -> Result<(), InvomarkError> {
        self.event(Event::End(BytesEnd::new(name)))
    }

    fn text_element(
        &mut self,
        name: &str,
        attrs: &[(&str, &str)],
        text: &str,
    ) -> Result<(), InvomarkError> {
        self.start(name, attrs)?;
        self.event(Event::Text(BytesText::new(text)))?;
        self.end(name)
    }

    fn finish(self) -> Vec<u8> {
        self.writer.into_inner()
    }
}

fn xml_error(e: impl Display) -> InvomarkError {
    InvomarkError::Export(format!("XML write error: {}", e))
}

fn sheet_xml(sheet: &Sheet, strings: &mut SharedStrings) -> Result<Vec<u8>, InvomarkError> {
    let mut x = XmlOut::new()?;
    x.start("worksheet", &[("xmlns", NS_MAIN), ("xmlns:r", NS_REL)])?;
    x.start("sheetData", &[])?;

    for (r, row) in sheet.rows.iter().enumerate() {
        let row_ref = (r + 1).to_string();
        x.start("row", &[("r", row_ref.as_str())])?;
        for (c, cell) in row.iter().enumerate() {
            let cell_ref = format!("{}{}", column_name(c), r + 1);
            match cell {
                Cell::Text(s) => {
                    x.start("c", &[("r", cell_ref.as_str()), ("t", "s")])?;
                    x.text_element("v", &[], &strings.intern(s).to_string())?;
                    x.end("c")?;
                }
                Cell::Number(n) => {
                    x.start("c", &[("r", cell_ref.as_str())])?;
                    x.text_element("v", &[], &n.normalize().to_string())?;
                    x.end("c")?;
                }
                Cell::Empty => {}
            }
        }
        x.end("row")?;
    }

    x.end("sheetData")?;
    if let Some(range) = &sheet.auto_filter {
        x.empty("autoFilter", &[("ref", range.as_str())])?;
    }
    x.end("worksheet")?;
    Ok(x.finish())
}

fn shared_strings_xml(strings: &SharedStrings) -> Result<Vec<u8>, InvomarkError> {
    let count = strings.references.to_string();
    let unique = strings.strings.len().to_string();
    let mut x = XmlOut::new()?;
    x.start(
        "sst",
        &[("xmlns", NS_MAIN), ("count", count.as_str()), ("uniqueCount", unique.as_str())],
    )?;
    for s in &strings.strings {
        x.start("si", &[])?;
        x.text_element("t", &[("xml:space", "preserve")], s)?;
        x.end("si")?;
    }
    x.end("sst")?;
    Ok(x.finish())
}

fn workbook_xml(sheets: &[Sheet]) -> Result<Vec<u8>, InvomarkError> {
    let mut x = XmlOut::new()?;
    x.start("workbook", &[("xmlns", NS_MAIN), ("xmlns:r", NS_REL)])?;
    x.start("sheets", &[])?;
    for (i, sheet) in sheets.iter().enumerate() {
        let id = (i + 1).to_string();
        let rel = format!("rId{}", i + 1);
        x.empty(
            "sheet",
            &[("name", sheet.name), ("sheetId", id.as_str()), ("r:id", rel.as_str())],
        )?;
    }
    x.end("sheets")?;

    let filters: Vec<(usize, String)> = sheets
        .iter()
        .enumerate()
        .filter_map(|(i, s)| {
            s.auto_filter
                .as_ref()
                .map(|range| (i, format!("{}!{}", s.name, absolute_range(range))))
        })
        .collect();
    if !filters.is_empty() {
        x.start("definedNames", &[])?;
        for (i, target) in &filters {
            let sheet_index = i.to_string();
            x.text_element(
                "definedName",
                &[
                    ("name", "_xlnm._FilterDatabase"),
                    ("localSheetId", sheet_index.as_str()),
                    ("hidden", "1"),
                ],
                target,
            )?;
        }
        x.end("definedNames")?;
    }

    x.end("workbook")?;
    Ok(x.finish())
}

/// `A3:D5` -> `$A$3:$D$5`.
fn absolute_range(range: &str) -> String {
    range
        .split(':')
        .map(|cell| {
            let split = cell.find(|c: char| c.is_ascii_digit()).unwrap_or(cell.len());
            format!("${}${}", &cell[..split], &cell[split..])
        })
        .collect::<Vec<_>>()
        .join(":")
}

fn workbook_rels_xml(sheet_count: usize) -> Result<Vec<u8>, InvomarkError> {
    let mut x = XmlOut::new()?;
    x.start("Relationships", &[("xmlns", NS_PKG_REL)])?;
    for i in 1..=sheet_count {
        let id = format!("rId{}", i);
        let target = format!("worksheets/sheet{}.xml", i);
        x.empty(
            "Relationship",
            &[("Id", id.as_str()), ("Type", REL_WORKSHEET), ("Target", target.as_str())],
        )?;
    }
    let styles_id = format!("rId{}", sheet_count + 1);
    x.empty(
        "Relationship",
        &[("Id", styles_id.as_str()), ("Type", REL_STYLES), ("Target", "styles.xml")],
    )?;
    let strings_id = format!("rId{}", sheet_count + 2);
    x.empty(
        "Relationship",
        &[
            ("Id", strings_id.as_str()),
            ("Type", REL_SHARED_STRINGS),
            ("Target", "sharedStrings.xml"),
        ],
    )?;
    x.end("Relationships")?;
    Ok(x.finish())
}

fn root_rels_xml() -> Result<Vec<u8>, InvomarkError> {
    let mut x = XmlOut::new()?;
    x.start("Relationships", &[("xmlns", NS_PKG_REL)])?;
    x.empty(
        "Relationship",
        &[
            ("Id", "rId1"),
            ("Type", REL_OFFICE_DOC),
            ("Target", "xl/workbook.xml"),
        ],
    )?;
    x.end("Relationships")?;
    Ok(x.finish())
}

fn content_types_xml(sheet_count: usize) -> Result<Vec<u8>, InvomarkError> {
    let mut x = XmlOut::new()?;
    x.start("Types", &[("xmlns", NS_CONTENT_TYPES)])?;
    x.empty(
        "Default",
        &[
            ("Extension", "rels"),
            ("ContentType", "application/vnd.openxmlformats-package.relationships+xml"),
        ],
    )?;
    x.empty(
        "Default",
        &[("Extension", "xml"), ("ContentType", "application/xml")],
    )?;
    x.empty(
        "Override",
        &[("PartName", "/xl/workbook.xml"), ("ContentType", CT_WORKBOOK)],
    )?;
    for i in 1..=sheet_count {
        let part = format!("/xl/worksheets/sheet{}.xml", i);
        x.empty("Override", &[("PartName", part.as_str()), ("ContentType", CT_WORKSHEET)])?;
    }
    x.empty(
        "Override",
        &[("PartName", "/xl/styles.xml"), ("ContentType", CT_STYLES)],
    )?;
    x.empty(
        "Override",
        &[
            ("PartName", "/xl/sharedStrings.xml"),
            ("ContentType", CT_SHARED_STRINGS),
        ],
    )?;
    x.end("Types")?;
    Ok(x.finish())
}

fn styles_xml() -> Result<Vec<u8>, InvomarkError> {
    let mut x = XmlOut::new()?;
    x.start("styleSheet", &[("xmlns", NS_MAIN)])?;

    x.start("fonts", &[("count", "1")])?;
    x.start("font", &[])?;
    x.empty("sz", &[("val", "11")])?;
    x.empty("name", &[("val", "Calibri")])?;
    x.end("font")?;
    x.end("fonts")?;

    x.start("fills", &[("count", "1")])?;
    x.start("fill", &[])?;
    x.empty("patternFill", &[("patternType", "none")])?;
    x.end("fill")?;
    x.end("fills")?;

    x.start("borders", &[("count", "1")])?;
    x.empty("border", &[])?;
    x.end("borders")?;

    x.start("cellStyleXfs", &[("count", "1")])?;
    x.empty("xf", &[("numFmtId", "0"), ("fontId", "0"), ("fillId", "0"), ("borderId", "0")])?;
    x.end("cellStyleXfs")?;

    x.start("cellXfs", &[("count", "1")])?;
    x.empty(
        "xf",
        &[
            ("numFmtId", "0"),
            ("fontId", "0"),
            ("fillId", "0"),
            ("borderId", "0"),
            ("xfId", "0"),
        ],
    )?;
    x.end("cellXfs")?;

    x.end("styleSheet")?;
    Ok(x.finish())
}
