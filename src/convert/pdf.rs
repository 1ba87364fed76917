//! PDF extractor using lopdf.

use lopdf::Document as LopdfDocument;

use crate::detect::{pdf_version, DocumentFormat};
use crate::error::{Error, Result};
use crate::model::{Artifact, Block};

use super::Extractor;

/// PDF extractor.
///
/// Emits one text block per page, in page order. Text is recovered from the
/// page content streams; scanned pages without a text layer yield empty
/// blocks.
#[derive(Debug, Clone, Default)]
pub struct PdfExtractor {
    _private: (),
}

impl PdfExtractor {
    /// Create a new PDF extractor.
    pub fn new() -> Self {
        Self { _private: () }
    }

    fn load(&self, bytes: &[u8]) -> Result<LopdfDocument> {
        let mut doc = LopdfDocument::load_mem(bytes).map_err(|e| match e {
            lopdf::Error::Decryption(_) => Error::Encrypted,
            other => Error::parse(DocumentFormat::Pdf, other),
        })?;

        // Owner-password-only documents open with the empty user password;
        // anything else needs a password we do not have.
        if doc.is_encrypted() {
            doc.decrypt("").map_err(|e| {
                log::warn!("Refusing encrypted PDF ({} bytes): {}", bytes.len(), e);
                Error::Encrypted
            })?;
        }
        Ok(doc)
    }
}

impl Extractor for PdfExtractor {
    fn supported_extensions(&self) -> &[&str] {
        DocumentFormat::Pdf.extensions()
    }

    fn name(&self) -> &str {
        "pdf"
    }

    fn format(&self) -> DocumentFormat {
        DocumentFormat::Pdf
    }

    fn extract_bytes(&self, bytes: &[u8]) -> Result<Artifact> {
        let version = pdf_version(bytes)?;
        let doc = self.load(bytes)?;

        let pages = doc.get_pages();
        log::debug!("PDF {}: {} pages", version, pages.len());

        let mut artifact = Artifact::new(DocumentFormat::Pdf);
        // get_pages is keyed by page number, so iteration follows page order.
        for page_num in pages.keys() {
            let text = doc.extract_text(&[*page_num]).map_err(|e| {
                Error::parse(DocumentFormat::Pdf, format!("page {page_num}: {e}"))
            })?;
            artifact.push(Block::text(text));
        }

        Ok(artifact)
    }
}
