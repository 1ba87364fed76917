//! # undoc
//!
//! Document-to-text conversion for storage-triggered handlers.
//!
//! Word documents, Excel workbooks and PDFs are flattened into a single
//! text artifact: paragraphs and pages separated by blank lines, worksheets
//! as CSV. Multi-sheet workbooks introduce each sheet with a delimiter line
//! and a `META:` line carrying the sheet title, so consumers can split the
//! artifact back into sections with [`render::read_sections`].
//!
//! ## Quick Start
//!
//! ```no_run
//! fn main() -> undoc::Result<()> {
//!     let bytes = std::fs::read("reports/q1.xlsx")?;
//!     let artifact = undoc::extract(&bytes, "xlsx")?;
//!
//!     for section in undoc::render::read_sections(&String::from_utf8_lossy(&artifact))? {
//!         println!("{:?}: {} rows", section.title(), section.records()?.len());
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Handlers
//!
//! A [`ConversionHandler`] ties a [`Pipeline`] to an [`ObjectStore`]: it
//! downloads the objects named by a [`StorageEvent`], converts them and
//! uploads each artifact under the source key plus a fixed suffix.
//!
//! ```no_run
//! use undoc::{ConversionHandler, HandlerVariant, LocalStore, StorageEvent};
//!
//! let handler = ConversionHandler::new(
//!     HandlerVariant::ContentExtraction.config(),
//!     LocalStore::new("./buckets"),
//! )?;
//! let event = StorageEvent::from_json_file("event.json")?;
//! for outcome in handler.handle_event(&event)? {
//!     println!("{} -> {}", outcome.source, outcome.target);
//! }
//! # Ok::<(), undoc::Error>(())
//! ```

pub mod config;
pub mod convert;
pub mod detect;
pub mod error;
pub mod event;
pub mod handler;
pub mod model;
pub mod pipeline;
pub mod render;
pub mod storage;

// Re-export commonly used types
pub use config::{HandlerConfig, HandlerVariant, EXTRACTED_SUFFIX, MARKDOWN_SUFFIX};
pub use convert::{Extractor, ExtractorRegistry, SheetLayout};
pub use detect::{normalize_type_hint, type_hint_from_key, DocumentFormat};
pub use error::{Error, ErrorKind, Result};
pub use event::StorageEvent;
pub use handler::{ConversionHandler, ConversionOutcome, ErrorReporter, LogReporter, NoopReporter};
pub use model::{Artifact, Block, SectionMeta, SheetBlock, TextBlock};
pub use pipeline::Pipeline;
pub use render::{read_sections, ParsedSection, SECTION_DELIMITER};
pub use storage::{LocalStore, MemoryStore, ObjectLocation, ObjectStore};

use std::path::Path;

/// Extract a document with the default configuration.
///
/// Every format is accepted and workbooks use the multi-sheet layout.
///
/// # Example
///
/// ```no_run
/// let bytes = std::fs::read("minutes.docx").unwrap();
/// let text = undoc::extract(&bytes, "docx").unwrap();
/// ```
pub fn extract(bytes: &[u8], type_hint: &str) -> Result<Vec<u8>> {
    Pipeline::default().extract(bytes, type_hint)
}

/// Extract a file with the default configuration, using its extension as
/// the type hint.
pub fn extract_file<P: AsRef<Path>>(path: P) -> Result<Vec<u8>> {
    let path = path.as_ref();
    let hint = type_hint_from_key(&path.to_string_lossy());
    let bytes = std::fs::read(path)?;
    extract(&bytes, &hint)
}
