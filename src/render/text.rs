//! Flat text rendering of extracted artifacts.

use std::io::{self, Write};

use serde::Serialize;
use serde_json::ser::Formatter;

use crate::error::{Error, Result};
use crate::model::{Artifact, Block, SectionMeta, SheetBlock};

/// Line introducing each delimited section: 30 hyphens, `@@`, 30 hyphens.
pub const SECTION_DELIMITER: &str =
    "------------------------------@@------------------------------";

/// Prefix of the metadata line that follows a delimiter.
pub const META_PREFIX: &str = "META:";

/// Separator written after every text block.
const BLOCK_SEPARATOR: &[u8] = b"\n\n";

/// Write an artifact as flat text.
///
/// Text blocks are each followed by a blank line. Sheets with metadata are
/// introduced by [`SECTION_DELIMITER`] and a `META:` line; sheets without
/// metadata are written as bare CSV.
pub fn write_artifact<W: Write>(artifact: &Artifact, mut out: W) -> Result<()> {
    for block in &artifact.blocks {
        match block {
            Block::Text(text) => {
                out.write_all(text.text.as_bytes())?;
                out.write_all(BLOCK_SEPARATOR)?;
            }
            Block::Sheet(sheet) => write_sheet(sheet, &mut out)?,
        }
    }
    out.flush()?;
    Ok(())
}

/// Render an artifact to a string.
pub fn to_text(artifact: &Artifact) -> Result<String> {
    let bytes = to_bytes(artifact)?;
    String::from_utf8(bytes).map_err(|e| Error::Render(e.to_string()))
}

/// Render an artifact to bytes ready for upload.
pub fn to_bytes(artifact: &Artifact) -> Result<Vec<u8>> {
    let mut out = Vec::new();
    write_artifact(artifact, &mut out)?;
    Ok(out)
}

fn write_sheet<W: Write>(sheet: &SheetBlock, out: &mut W) -> Result<()> {
    if let Some(meta) = &sheet.meta {
        out.write_all(SECTION_DELIMITER.as_bytes())?;
        out.write_all(b"\n")?;
        out.write_all(meta_line(meta)?.as_bytes())?;
        out.write_all(b"\n")?;
    }
    write_csv(&sheet.rows, out)
}

/// Write rows as RFC 4180 CSV with CRLF record terminators.
pub fn write_csv<W: Write>(rows: &[Vec<String>], out: &mut W) -> Result<()> {
    let mut writer = csv::WriterBuilder::new()
        .flexible(true)
        .terminator(csv::Terminator::CRLF)
        .from_writer(out);

    for row in rows {
        writer.write_record(row)?;
    }
    writer.flush()?;
    Ok(())
}

/// Format the metadata line, e.g. `META:{"sheetTitle": "Summary"}`.
pub fn meta_line(meta: &SectionMeta) -> Result<String> {
    let mut json = Vec::new();
    let mut serializer = serde_json::Serializer::with_formatter(&mut json, SpacedFormatter);
    meta.serialize(&mut serializer)
        .map_err(|e| Error::Render(e.to_string()))?;
    let json = String::from_utf8(json).map_err(|e| Error::Render(e.to_string()))?;
    Ok(format!("{META_PREFIX}{json}"))
}

/// Single-line JSON with a space after `:` and `,`. Non-ASCII characters
/// are written as `\uXXXX` escapes, using surrogate pairs above U+FFFF.
struct SpacedFormatter;

impl Formatter for SpacedFormatter {
    fn begin_object_key<W>(&mut self, writer: &mut W, first: bool) -> io::Result<()>
    where
        W: ?Sized + Write,
    {
        if first {
            Ok(())
        } else {
            writer.write_all(b", ")
        }
    }

    fn begin_object_value<W>(&mut self, writer: &mut W) -> io::Result<()>
    where
        W: ?Sized + Write,
    {
        writer.write_all(b": ")
    }

    fn write_string_fragment<W>(&mut self, writer: &mut W, fragment: &str) -> io::Result<()>
    where
        W: ?Sized + Write,
    {
        let mut units = [0u16; 2];
        let mut start = 0;
        for (index, ch) in fragment.char_indices() {
            if ch.is_ascii() {
                continue;
            }
            writer.write_all(&fragment.as_bytes()[start..index])?;
            for unit in ch.encode_utf16(&mut units) {
                write!(writer, "\\u{:04x}", unit)?;
            }
            start = index + ch.len_utf8();
        }
        writer.write_all(&fragment.as_bytes()[start..])
    }
}
