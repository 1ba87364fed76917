//! Artifact-level types.

use serde::{Deserialize, Serialize};

use super::{Block, SheetBlock, TextBlock};
use crate::detect::DocumentFormat;

/// The ordered content extracted from one document.
///
/// Blocks keep source order: paragraphs, pages, sheets and rows are never
/// reordered.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Artifact {
    /// Format the content was extracted from
    pub format: DocumentFormat,

    /// Extracted blocks in document order
    pub blocks: Vec<Block>,
}

impl Artifact {
    /// Create an empty artifact.
    pub fn new(format: DocumentFormat) -> Self {
        Self {
            format,
            blocks: Vec::new(),
        }
    }

    /// Append a block.
    pub fn push(&mut self, block: Block) {
        self.blocks.push(block);
    }

    /// Number of blocks.
    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    /// Check if nothing was extracted.
    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    /// Iterate over text blocks.
    pub fn text_blocks(&self) -> impl Iterator<Item = &TextBlock> {
        self.blocks.iter().filter_map(Block::as_text)
    }

    /// Iterate over sheet blocks.
    pub fn sheets(&self) -> impl Iterator<Item = &SheetBlock> {
        self.blocks.iter().filter_map(Block::as_sheet)
    }

    /// Concatenated text of all text blocks, joined by blank lines.
    pub fn plain_text(&self) -> String {
        self.text_blocks()
            .map(|b| b.text.as_str())
            .collect::<Vec<_>>()
            .join("\n\n")
    }
}
