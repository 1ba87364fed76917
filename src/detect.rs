//! Document format identification and validation.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// A document family the pipeline knows how to extract.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DocumentFormat {
    /// Word-processing documents (`.doc`, `.docx`)
    Word,
    /// Spreadsheet workbooks (`.xlsx`)
    Spreadsheet,
    /// PDF documents (`.pdf`)
    Pdf,
}

impl DocumentFormat {
    /// All formats, in a stable order.
    pub const ALL: [DocumentFormat; 3] = [
        DocumentFormat::Pdf,
        DocumentFormat::Word,
        DocumentFormat::Spreadsheet,
    ];

    /// File extensions handled for this format, lowercase without the dot.
    pub fn extensions(self) -> &'static [&'static str] {
        match self {
            DocumentFormat::Word => &["doc", "docx"],
            DocumentFormat::Spreadsheet => &["xlsx"],
            DocumentFormat::Pdf => &["pdf"],
        }
    }

    /// Look up the format for an extension (case-insensitive).
    pub fn from_extension(ext: &str) -> Option<Self> {
        let ext = normalize_type_hint(ext);
        Self::ALL
            .into_iter()
            .find(|format| format.extensions().contains(&ext.as_str()))
    }

    /// Short name of the format.
    pub fn name(self) -> &'static str {
        match self {
            DocumentFormat::Word => "word",
            DocumentFormat::Spreadsheet => "spreadsheet",
            DocumentFormat::Pdf => "pdf",
        }
    }
}

impl std::fmt::Display for DocumentFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Normalize a type hint: trim whitespace and a leading dot, lowercase.
pub fn normalize_type_hint(hint: &str) -> String {
    hint.trim().trim_start_matches('.').to_lowercase()
}

/// Derive the type hint from an object key.
///
/// The hint is everything after the final `.`. A key without a dot yields
/// the whole key, which no extractor will claim.
///
/// # Example
/// ```
/// use undoc::detect::type_hint_from_key;
///
/// assert_eq!(type_hint_from_key("reports/Q1.XLSX"), "xlsx");
/// assert_eq!(type_hint_from_key("archive.tar.gz"), "gz");
/// ```
pub fn type_hint_from_key(key: &str) -> String {
    let ext = key.rsplit_once('.').map_or(key, |(_, ext)| ext);
    normalize_type_hint(ext)
}

/// PDF magic bytes: %PDF-
const PDF_MAGIC: &[u8] = b"%PDF-";
const PDF_MAGIC_LEN: usize = 5;
const VERSION_LEN: usize = 3; // e.g., "1.7"

/// Local file header of a zip archive.
const ZIP_MAGIC: &[u8] = b"PK\x03\x04";
/// End-of-central-directory record; an empty archive starts with it.
const ZIP_EMPTY_MAGIC: &[u8] = b"PK\x05\x06";
/// OLE2 compound file header used by legacy `.doc` files.
const OLE_MAGIC: &[u8] = &[0xD0, 0xCF, 0x11, 0xE0, 0xA1, 0xB1, 0x1A, 0xE1];

/// Check that `data` plausibly holds a document of `format`.
///
/// This only inspects the leading bytes; the extractor still performs the
/// full parse.
pub fn validate_magic(format: DocumentFormat, data: &[u8]) -> Result<()> {
    match format {
        DocumentFormat::Pdf => pdf_version(data).map(|_| ()),
        DocumentFormat::Word | DocumentFormat::Spreadsheet => {
            if data.starts_with(ZIP_MAGIC) || data.starts_with(ZIP_EMPTY_MAGIC) {
                Ok(())
            } else if data.starts_with(OLE_MAGIC) {
                Err(Error::parse(
                    format,
                    "legacy binary (OLE) document; only zip-packaged documents are supported",
                ))
            } else {
                Err(Error::parse(format, "not a zip package"))
            }
        }
    }
}

/// Read the PDF version from the file header (e.g. `"1.7"`).
pub fn pdf_version(data: &[u8]) -> Result<String> {
    if data.len() < PDF_MAGIC_LEN + VERSION_LEN || !data.starts_with(PDF_MAGIC) {
        return Err(Error::parse(DocumentFormat::Pdf, "missing %PDF- header"));
    }

    let version_bytes = &data[PDF_MAGIC_LEN..PDF_MAGIC_LEN + VERSION_LEN];
    let version = String::from_utf8_lossy(version_bytes).to_string();

    if !is_valid_version(&version) {
        return Err(Error::parse(
            DocumentFormat::Pdf,
            format!("unsupported PDF version {version:?}"),
        ));
    }

    Ok(version)
}

/// Check if a version string is valid.
fn is_valid_version(version: &str) -> bool {
    let bytes = version.as_bytes();
    bytes.len() == 3 && bytes[0].is_ascii_digit() && bytes[1] == b'.' && bytes[2].is_ascii_digit()
}
