//! Extraction pipeline: type hint in, flat artifact out.

use crate::config::HandlerConfig;
use crate::convert::ExtractorRegistry;
use crate::error::Result;
use crate::model::Artifact;
use crate::render;

/// A configured extraction pipeline.
///
/// The pipeline owns an [`ExtractorRegistry`] restricted to the formats of
/// its [`HandlerConfig`]; hints outside that set fail with
/// [`Error::UnsupportedFormat`](crate::Error::UnsupportedFormat).
///
/// # Example
///
/// ```no_run
/// use undoc::{HandlerVariant, Pipeline};
///
/// let pipeline = Pipeline::new(HandlerVariant::ContentExtraction.config())?;
/// let bytes = std::fs::read("reports/q1.xlsx")?;
/// let artifact = pipeline.extract(&bytes, "xlsx")?;
/// assert_eq!(pipeline.output_key("reports/q1.xlsx"), "reports/q1.xlsx.extracted");
/// # let _ = artifact;
/// # Ok::<(), undoc::Error>(())
/// ```
pub struct Pipeline {
    config: HandlerConfig,
    registry: ExtractorRegistry,
}

impl Pipeline {
    /// Build a pipeline, validating the configuration.
    pub fn new(config: HandlerConfig) -> Result<Self> {
        config.validate()?;
        let registry = ExtractorRegistry::for_formats(&config.formats, config.sheet_layout);
        Ok(Self { config, registry })
    }

    /// The configuration this pipeline was built from.
    pub fn config(&self) -> &HandlerConfig {
        &self.config
    }

    /// Check whether a type hint is handled.
    pub fn supports(&self, type_hint: &str) -> bool {
        self.registry.supports(type_hint)
    }

    /// Extract the structured artifact without rendering it.
    pub fn extract_artifact(&self, bytes: &[u8], type_hint: &str) -> Result<Artifact> {
        self.registry.extract(bytes, type_hint)
    }

    /// Extract and render the artifact bytes.
    pub fn extract(&self, bytes: &[u8], type_hint: &str) -> Result<Vec<u8>> {
        let artifact = self.extract_artifact(bytes, type_hint)?;
        render::to_bytes(&artifact)
    }

    /// Key under which the artifact for `key` is stored.
    pub fn output_key(&self, key: &str) -> String {
        format!("{}{}", key, self.config.output_suffix)
    }
}

impl Default for Pipeline {
    fn default() -> Self {
        let config = HandlerConfig::default();
        let registry = ExtractorRegistry::for_formats(&config.formats, config.sheet_layout);
        Self { config, registry }
    }
}
