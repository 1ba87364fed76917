//! Extractor registry dispatching documents to per-format extractors.
//!
//! Each extractor turns document bytes into an [`Artifact`]. The registry
//! maps lowercase file extensions to extractors and fails with
//! [`Error::UnsupportedFormat`] for anything it does not know.
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use undoc::convert::{ExtractorRegistry, WordExtractor};
//!
//! fn main() -> undoc::Result<()> {
//!     let mut registry = ExtractorRegistry::new();
//!     registry.register(Arc::new(WordExtractor::new()));
//!
//!     let bytes = std::fs::read("minutes.docx")?;
//!     let artifact = registry.extract(&bytes, "docx")?;
//!     println!("{} paragraphs", artifact.len());
//!     Ok(())
//! }
//! ```

mod pdf;
mod spreadsheet;
mod word;

pub use pdf::PdfExtractor;
pub use spreadsheet::{SheetLayout, SpreadsheetExtractor};
pub use word::WordExtractor;

use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

use crate::detect::{normalize_type_hint, DocumentFormat};
use crate::error::{Error, Result};
use crate::model::Artifact;

/// Trait for per-format extractors.
///
/// Implement this trait to add support for a new document format.
pub trait Extractor: Send + Sync {
    /// Get the supported file extensions for this extractor.
    ///
    /// Extensions should be lowercase without the leading dot (e.g., `["pdf"]`).
    fn supported_extensions(&self) -> &[&str];

    /// Get the name of this extractor.
    fn name(&self) -> &str;

    /// The document family this extractor parses.
    fn format(&self) -> DocumentFormat;

    /// Extract content from document bytes.
    fn extract_bytes(&self, bytes: &[u8]) -> Result<Artifact>;

    /// Extract content from a file.
    fn extract_file(&self, path: &Path) -> Result<Artifact> {
        let bytes = std::fs::read(path)?;
        self.extract_bytes(&bytes)
    }

    /// Check if this extractor supports the given extension.
    fn supports_extension(&self, ext: &str) -> bool {
        let ext = normalize_type_hint(ext);
        self.supported_extensions().iter().any(|e| *e == ext)
    }
}

/// Registry for extractors, keyed by lowercase extension.
pub struct ExtractorRegistry {
    extractors: HashMap<String, Arc<dyn Extractor>>,
    by_name: HashMap<String, Arc<dyn Extractor>>,
}

impl ExtractorRegistry {
    /// Create a new empty registry.
    pub fn new() -> Self {
        Self {
            extractors: HashMap::new(),
            by_name: HashMap::new(),
        }
    }

    /// Create a registry for the given formats.
    ///
    /// Spreadsheets are rendered with `layout`.
    pub fn for_formats(formats: &[DocumentFormat], layout: SheetLayout) -> Self {
        let mut registry = Self::new();
        for format in formats {
            let extractor: Arc<dyn Extractor> = match format {
                DocumentFormat::Pdf => Arc::new(PdfExtractor::new()),
                DocumentFormat::Word => Arc::new(WordExtractor::new()),
                DocumentFormat::Spreadsheet => Arc::new(SpreadsheetExtractor::new(layout)),
            };
            registry.register(extractor);
        }
        registry
    }

    /// Create a registry with every built-in extractor.
    pub fn with_defaults() -> Self {
        Self::for_formats(&DocumentFormat::ALL, SheetLayout::default())
    }

    /// Register an extractor.
    ///
    /// The extractor will be registered for all its supported extensions,
    /// replacing any earlier registration for the same extension.
    pub fn register(&mut self, extractor: Arc<dyn Extractor>) {
        for ext in extractor.supported_extensions() {
            self.extractors
                .insert(ext.to_lowercase(), extractor.clone());
        }
        self.by_name
            .insert(extractor.name().to_lowercase(), extractor);
    }

    /// Get an extractor by type hint.
    pub fn get_by_extension(&self, ext: &str) -> Option<Arc<dyn Extractor>> {
        self.extractors.get(&normalize_type_hint(ext)).cloned()
    }

    /// Get an extractor by name.
    pub fn get_by_name(&self, name: &str) -> Option<Arc<dyn Extractor>> {
        self.by_name.get(&name.to_lowercase()).cloned()
    }

    /// Check if a type hint is supported.
    pub fn supports(&self, ext: &str) -> bool {
        self.extractors.contains_key(&normalize_type_hint(ext))
    }

    /// Get all supported extensions, sorted.
    pub fn supported_extensions(&self) -> Vec<&str> {
        let mut exts: Vec<&str> = self.extractors.keys().map(|s| s.as_str()).collect();
        exts.sort_unstable();
        exts
    }

    /// Extract document bytes using the extractor registered for `type_hint`.
    pub fn extract(&self, bytes: &[u8], type_hint: &str) -> Result<Artifact> {
        let extractor = self
            .get_by_extension(type_hint)
            .ok_or_else(|| Error::UnsupportedFormat(normalize_type_hint(type_hint)))?;

        log::debug!(
            "Dispatching {} bytes with hint {:?} to {} extractor",
            bytes.len(),
            type_hint,
            extractor.name()
        );
        extractor.extract_bytes(bytes)
    }

    /// Extract a file, using its extension as the type hint.
    pub fn extract_file(&self, path: &Path) -> Result<Artifact> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .ok_or_else(|| Error::UnsupportedFormat(String::new()))?;

        let extractor = self
            .get_by_extension(ext)
            .ok_or_else(|| Error::UnsupportedFormat(normalize_type_hint(ext)))?;

        extractor.extract_file(path)
    }
}

impl Default for ExtractorRegistry {
    fn default() -> Self {
        Self::with_defaults()
    }
}
