//! Handler configuration.
//!
//! A [`HandlerConfig`] declares what a conversion handler can do: which
//! formats it accepts, how spreadsheets are laid out, and which suffix is
//! appended to the source key to name the artifact.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::convert::SheetLayout;
use crate::detect::{normalize_type_hint, DocumentFormat};
use crate::error::{Error, Result};

/// Suffix used by the extraction handlers.
pub const EXTRACTED_SUFFIX: &str = ".extracted";

/// Suffix used by the Markdown handler.
pub const MARKDOWN_SUFFIX: &str = ".md";

/// Capability set of a conversion handler.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct HandlerConfig {
    /// Formats this handler accepts
    pub formats: Vec<DocumentFormat>,

    /// Spreadsheet layout
    pub sheet_layout: SheetLayout,

    /// Suffix appended to the source key to form the artifact key
    pub output_suffix: String,
}

impl HandlerConfig {
    /// Create the default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the accepted formats.
    pub fn with_formats(mut self, formats: impl IntoIterator<Item = DocumentFormat>) -> Self {
        self.formats = formats.into_iter().collect();
        self
    }

    /// Set the spreadsheet layout.
    pub fn with_sheet_layout(mut self, layout: SheetLayout) -> Self {
        self.sheet_layout = layout;
        self
    }

    /// Set the artifact key suffix.
    pub fn with_output_suffix(mut self, suffix: impl Into<String>) -> Self {
        self.output_suffix = suffix.into();
        self
    }

    /// Check whether a type hint is accepted.
    pub fn accepts(&self, type_hint: &str) -> bool {
        DocumentFormat::from_extension(&normalize_type_hint(type_hint))
            .is_some_and(|format| self.formats.contains(&format))
    }

    /// Accepted extensions, sorted.
    pub fn extensions(&self) -> Vec<&'static str> {
        let mut exts: Vec<&'static str> = self
            .formats
            .iter()
            .flat_map(|format| format.extensions().iter().copied())
            .collect();
        exts.sort_unstable();
        exts.dedup();
        exts
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<()> {
        if self.formats.is_empty() {
            return Err(Error::Config("no formats enabled".into()));
        }
        if self.output_suffix.is_empty() {
            return Err(Error::Config("output suffix must not be empty".into()));
        }
        if self.output_suffix.contains('/') {
            return Err(Error::Config(format!(
                "output suffix {:?} must not contain '/'",
                self.output_suffix
            )));
        }
        Ok(())
    }

    /// Parse and validate a JSON configuration.
    ///
    /// Missing fields take their default values.
    ///
    /// # Example
    /// ```
    /// use undoc::HandlerConfig;
    ///
    /// let config = HandlerConfig::from_json_str(
    ///     r#"{"formats": ["pdf", "word"], "outputSuffix": ".md"}"#,
    /// ).unwrap();
    /// assert!(config.accepts("docx"));
    /// assert!(!config.accepts("xlsx"));
    /// ```
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Self =
            serde_json::from_str(json).map_err(|e| Error::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a JSON configuration file.
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }
}

impl Default for HandlerConfig {
    fn default() -> Self {
        Self {
            formats: DocumentFormat::ALL.to_vec(),
            sheet_layout: SheetLayout::MultiSheet,
            output_suffix: EXTRACTED_SUFFIX.to_string(),
        }
    }
}

/// Preset handler configurations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum HandlerVariant {
    /// Word and Excel documents; every sheet, delimited
    ContentExtraction,
    /// PDF, Word and Excel documents; active sheet only
    FullConversion,
    /// PDF and Word documents, written with a `.md` suffix
    Markdown,
}

impl HandlerVariant {
    /// Configuration for this preset.
    pub fn config(self) -> HandlerConfig {
        match self {
            HandlerVariant::ContentExtraction => HandlerConfig::new()
                .with_formats([DocumentFormat::Word, DocumentFormat::Spreadsheet])
                .with_sheet_layout(SheetLayout::MultiSheet),
            HandlerVariant::FullConversion => HandlerConfig::new()
                .with_formats([
                    DocumentFormat::Pdf,
                    DocumentFormat::Word,
                    DocumentFormat::Spreadsheet,
                ])
                .with_sheet_layout(SheetLayout::FirstSheet),
            HandlerVariant::Markdown => HandlerConfig::new()
                .with_formats([DocumentFormat::Pdf, DocumentFormat::Word])
                .with_output_suffix(MARKDOWN_SUFFIX),
        }
    }
}

impl From<HandlerVariant> for HandlerConfig {
    fn from(variant: HandlerVariant) -> Self {
        variant.config()
    }
}
