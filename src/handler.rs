//! Storage-triggered conversion handler.
//!
//! A [`ConversionHandler`] downloads each object named by a
//! [`StorageEvent`], runs it through the [`Pipeline`] and uploads the
//! artifact next to the source under `key + suffix`. A conversion either
//! uploads exactly one artifact or uploads nothing and returns the error.

use serde::Serialize;

use crate::config::HandlerConfig;
use crate::detect::DocumentFormat;
use crate::error::{Error, Result};
use crate::event::StorageEvent;
use crate::pipeline::Pipeline;
use crate::render;
use crate::storage::{ObjectLocation, ObjectStore};

/// Receives every conversion failure before it is returned to the caller.
pub trait ErrorReporter: Send + Sync {
    /// Report a failed conversion of `location`.
    fn report(&self, location: &ObjectLocation, error: &Error);
}

/// Reports failures through the `log` facade.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogReporter;

impl ErrorReporter for LogReporter {
    fn report(&self, location: &ObjectLocation, error: &Error) {
        log::error!("Conversion of {} failed ({:?}): {}", location, error.kind(), error);
    }
}

/// Discards failures.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopReporter;

impl ErrorReporter for NoopReporter {
    fn report(&self, _location: &ObjectLocation, _error: &Error) {}
}

/// Result of one successful conversion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConversionOutcome {
    /// Source object
    pub source: ObjectLocation,
    /// Uploaded artifact
    pub target: ObjectLocation,
    /// Format the source was parsed as
    pub format: DocumentFormat,
    /// Size of the uploaded artifact
    pub bytes_written: usize,
}

/// Conversion handler over an object store.
pub struct ConversionHandler<S: ObjectStore> {
    pipeline: Pipeline,
    store: S,
    reporter: Box<dyn ErrorReporter>,
}

impl<S: ObjectStore> ConversionHandler<S> {
    /// Create a handler. Failures are reported through [`LogReporter`].
    pub fn new(config: HandlerConfig, store: S) -> Result<Self> {
        Ok(Self {
            pipeline: Pipeline::new(config)?,
            store,
            reporter: Box::new(LogReporter),
        })
    }

    /// Replace the error reporter.
    pub fn with_reporter(mut self, reporter: Box<dyn ErrorReporter>) -> Self {
        self.reporter = reporter;
        self
    }

    /// The pipeline used for extraction.
    pub fn pipeline(&self) -> &Pipeline {
        &self.pipeline
    }

    /// The underlying store.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Convert one object and upload its artifact.
    pub fn convert_object(&self, location: &ObjectLocation) -> Result<ConversionOutcome> {
        self.try_convert(location).map_err(|err| {
            self.reporter.report(location, &err);
            err
        })
    }

    /// Convert every object named by `event`, in record order.
    ///
    /// Stops at the first failure; objects converted before it keep their
    /// artifacts.
    pub fn handle_event(&self, event: &StorageEvent) -> Result<Vec<ConversionOutcome>> {
        let locations = event.locations()?;
        let mut outcomes = Vec::with_capacity(locations.len());
        for location in &locations {
            outcomes.push(self.convert_object(location)?);
        }
        Ok(outcomes)
    }

    fn try_convert(&self, location: &ObjectLocation) -> Result<ConversionOutcome> {
        let hint = location.type_hint();
        if !self.pipeline.supports(&hint) {
            return Err(Error::UnsupportedFormat(hint));
        }

        log::info!("Converting {} in bucket {}", location.key, location.bucket);
        let source = self.store.get(location)?;
        let artifact = self.pipeline.extract_artifact(&source, &hint)?;
        let bytes = render::to_bytes(&artifact)?;

        let target = location.with_suffix(&self.pipeline.config().output_suffix);
        self.store.put(&target, &bytes)?;
        log::info!("Wrote {} ({} bytes) for {}", target.key, bytes.len(), location);

        Ok(ConversionOutcome {
            source: location.clone(),
            target,
            format: artifact.format,
            bytes_written: bytes.len(),
        })
    }
}
