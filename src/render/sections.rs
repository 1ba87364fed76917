//! Reading delimited artifacts back into sections.
//!
//! This is the consumer side of the multi-sheet convention written by
//! [`write_artifact`](super::write_artifact).

use crate::detect::DocumentFormat;
use crate::error::{Error, Result};
use crate::model::SectionMeta;

use super::text::{META_PREFIX, SECTION_DELIMITER};

/// One section of a rendered artifact.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedSection {
    /// Metadata from the `META:` line; `None` for bare CSV
    pub meta: Option<SectionMeta>,

    /// Section content after the metadata line
    pub body: String,
}

impl ParsedSection {
    /// Sheet title from the metadata, if any.
    pub fn title(&self) -> Option<&str> {
        self.meta.as_ref().map(|m| m.sheet_title.as_str())
    }

    /// Parse the body as RFC 4180 CSV.
    pub fn records(&self) -> Result<Vec<Vec<String>>> {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .from_reader(self.body.as_bytes());

        let mut rows = Vec::new();
        for record in reader.records() {
            let record = record.map_err(|e| Error::parse(DocumentFormat::Spreadsheet, e))?;
            rows.push(record.iter().map(String::from).collect());
        }
        Ok(rows)
    }
}

/// Split artifact text into sections.
///
/// Text without any delimiter line is a single section without metadata.
/// Otherwise anything before the first delimiter is ignored and every
/// delimited part must begin with a `META:` line.
pub fn read_sections(text: &str) -> Result<Vec<ParsedSection>> {
    let mut parts: Vec<String> = Vec::new();
    let mut preamble = String::new();

    for line in text.split_inclusive('\n') {
        if line.trim_end_matches(&['\r', '\n'][..]) == SECTION_DELIMITER {
            parts.push(String::new());
            continue;
        }
        match parts.last_mut() {
            Some(part) => part.push_str(line),
            None => preamble.push_str(line),
        }
    }

    if parts.is_empty() {
        return Ok(vec![ParsedSection {
            meta: None,
            body: preamble,
        }]);
    }

    parts
        .into_iter()
        .enumerate()
        .map(|(index, part)| parse_part(index, &part))
        .collect()
}

fn parse_part(index: usize, part: &str) -> Result<ParsedSection> {
    let (first, body) = part.split_once('\n').unwrap_or((part, ""));
    let first = first.trim_end_matches('\r');

    let json = first.strip_prefix(META_PREFIX).ok_or_else(|| {
        Error::parse(
            DocumentFormat::Spreadsheet,
            format!("section {} does not start with a {META_PREFIX} line", index + 1),
        )
    })?;

    let meta: SectionMeta = serde_json::from_str(json).map_err(|e| {
        Error::parse(
            DocumentFormat::Spreadsheet,
            format!("section {} has invalid metadata: {e}", index + 1),
        )
    })?;

    Ok(ParsedSection {
        meta: Some(meta),
        body: body.to_string(),
    })
}
