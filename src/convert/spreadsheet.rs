//! Spreadsheet extractor.

use std::io::{Cursor, Read};

use calamine::{open_workbook_from_rs, Data, Range, Reader, SheetType, Xlsx};
use chrono::NaiveDateTime;
use quick_xml::events::Event;
use serde::{Deserialize, Serialize};

use crate::detect::{validate_magic, DocumentFormat};
use crate::error::{Error, Result};
use crate::model::{Artifact, Block, SheetBlock};

use super::Extractor;

/// Workbook part holding the sheet list and the saved view.
const WORKBOOK_PART: &str = "xl/workbook.xml";

/// How worksheets are laid out in the artifact.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SheetLayout {
    /// Every worksheet, each introduced by a delimiter and a `META:` line
    #[default]
    MultiSheet,
    /// Only the active worksheet, as bare CSV
    FirstSheet,
}

/// Spreadsheet (`.xlsx`) extractor.
#[derive(Debug, Clone, Default)]
pub struct SpreadsheetExtractor {
    layout: SheetLayout,
}

impl SpreadsheetExtractor {
    /// Create a new spreadsheet extractor.
    pub fn new(layout: SheetLayout) -> Self {
        Self { layout }
    }

    /// Layout used for rendering.
    pub fn layout(&self) -> SheetLayout {
        self.layout
    }
}

impl Extractor for SpreadsheetExtractor {
    fn supported_extensions(&self) -> &[&str] {
        DocumentFormat::Spreadsheet.extensions()
    }

    fn name(&self) -> &str {
        "spreadsheet"
    }

    fn format(&self) -> DocumentFormat {
        DocumentFormat::Spreadsheet
    }

    fn extract_bytes(&self, bytes: &[u8]) -> Result<Artifact> {
        validate_magic(DocumentFormat::Spreadsheet, bytes)?;

        let mut workbook: Xlsx<_> = open_workbook_from_rs(Cursor::new(bytes))
            .map_err(|e| Error::parse(DocumentFormat::Spreadsheet, e))?;

        let names = match self.layout {
            SheetLayout::MultiSheet => worksheet_names(workbook.sheets_metadata()),
            SheetLayout::FirstSheet => {
                let active = active_tab(bytes)?;
                active_worksheet(workbook.sheets_metadata(), active)
                    .into_iter()
                    .collect()
            }
        };

        let mut artifact = Artifact::new(DocumentFormat::Spreadsheet);
        for name in names {
            let range = workbook.worksheet_range(&name).map_err(|e| {
                Error::parse(DocumentFormat::Spreadsheet, format!("sheet {name:?}: {e}"))
            })?;

            let mut sheet = match self.layout {
                SheetLayout::MultiSheet => SheetBlock::titled(name.as_str()),
                SheetLayout::FirstSheet => SheetBlock::new(),
            };
            for row in sheet_rows(&range) {
                sheet.push_row(row);
            }

            log::debug!("Sheet {:?}: {} rows", name, sheet.row_count());
            artifact.push(Block::Sheet(sheet));
        }

        Ok(artifact)
    }
}

/// Names of the worksheets in workbook order. Chartsheets and dialog
/// sheets carry no cells and are skipped.
fn worksheet_names(sheets: &[calamine::Sheet]) -> Vec<String> {
    sheets
        .iter()
        .filter(|sheet| sheet.typ == SheetType::WorkSheet)
        .map(|sheet| sheet.name.clone())
        .collect()
}

/// The worksheet at tab index `active`, falling back to the first worksheet
/// when that tab is missing or is not a worksheet.
fn active_worksheet(sheets: &[calamine::Sheet], active: usize) -> Option<String> {
    match sheets.get(active) {
        Some(sheet) if sheet.typ == SheetType::WorkSheet => Some(sheet.name.clone()),
        _ => worksheet_names(sheets).into_iter().next(),
    }
}

/// Index of the tab selected when the workbook was saved
/// (`bookViews/workbookView@activeTab`, zero when absent).
fn active_tab(bytes: &[u8]) -> Result<usize> {
    let mut archive = zip::ZipArchive::new(Cursor::new(bytes))
        .map_err(|e| Error::parse(DocumentFormat::Spreadsheet, e))?;
    let mut part = archive.by_name(WORKBOOK_PART).map_err(|e| {
        Error::parse(DocumentFormat::Spreadsheet, format!("{WORKBOOK_PART}: {e}"))
    })?;

    let mut xml = String::new();
    part.read_to_string(&mut xml).map_err(|e| {
        Error::parse(DocumentFormat::Spreadsheet, format!("{WORKBOOK_PART}: {e}"))
    })?;
    active_tab_in(&xml)
}

fn active_tab_in(xml: &str) -> Result<usize> {
    let mut reader = quick_xml::Reader::from_str(xml);
    loop {
        let event = reader
            .read_event()
            .map_err(|e| Error::parse(DocumentFormat::Spreadsheet, e))?;

        match event {
            Event::Start(e) | Event::Empty(e) if e.local_name().as_ref() == b"workbookView" => {
                for attr in e.attributes() {
                    let attr = attr.map_err(|e| Error::parse(DocumentFormat::Spreadsheet, e))?;
                    if attr.key.local_name().as_ref() == b"activeTab" {
                        let value = String::from_utf8_lossy(&attr.value);
                        return Ok(value.trim().parse().unwrap_or(0));
                    }
                }
                // Only the first view counts.
                return Ok(0);
            }
            Event::Eof => return Ok(0),
            _ => {}
        }
    }
}

/// Rows of a worksheet anchored at `A1`.
///
/// The used range starts at the first non-empty cell, so leading empty rows
/// and columns are restored as empty fields to keep column positions.
fn sheet_rows(range: &Range<Data>) -> Vec<Vec<String>> {
    let (Some((start_row, start_col)), Some((_, end_col))) = (range.start(), range.end()) else {
        return Vec::new();
    };
    let width = end_col as usize + 1;

    let mut rows = Vec::with_capacity(start_row as usize + range.height());
    for _ in 0..start_row {
        rows.push(vec![String::new(); width]);
    }
    for row in range.rows() {
        let mut fields = Vec::with_capacity(width);
        fields.resize(start_col as usize, String::new());
        fields.extend(row.iter().map(cell_text));
        rows.push(fields);
    }
    rows
}

/// Render a cell value as text.
///
/// Empty cells become empty strings; dates are rendered as
/// `YYYY-MM-DD HH:MM:SS`; booleans as `True`/`False`; numbers use their
/// shortest decimal form.
pub fn cell_text(cell: &Data) -> String {
    match cell {
        Data::Empty => String::new(),
        Data::String(s) => s.clone(),
        Data::Int(i) => i.to_string(),
        Data::Float(f) => f.to_string(),
        Data::Bool(b) => if *b { "True" } else { "False" }.to_string(),
        Data::DateTime(dt) => match dt.as_datetime() {
            Some(value) if !dt.is_duration() => format_datetime(&value),
            _ => dt.as_f64().to_string(),
        },
        Data::DateTimeIso(s) | Data::DurationIso(s) => s.clone(),
        Data::Error(e) => e.to_string(),
    }
}

fn format_datetime(value: &NaiveDateTime) -> String {
    value.format("%Y-%m-%d %H:%M:%S").to_string()
}
