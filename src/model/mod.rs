//! Extracted content model.
//!
//! Extractors turn parsed documents into an [`Artifact`]: an ordered list of
//! [`Block`]s. The renderer linearizes the artifact into the flat text that
//! gets uploaded.

mod artifact;
mod block;

pub use artifact::Artifact;
pub use block::{Block, SectionMeta, SheetBlock, TextBlock};
