//! Block-level types produced by extractors.

use serde::{Deserialize, Serialize};

/// One unit of extracted content, in source order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Block {
    /// A paragraph or a page of running text
    Text(TextBlock),
    /// A worksheet of tabular data
    Sheet(SheetBlock),
}

impl Block {
    /// Create a text block.
    pub fn text(text: impl Into<String>) -> Self {
        Block::Text(TextBlock::new(text))
    }

    /// Get the text block, if this is one.
    pub fn as_text(&self) -> Option<&TextBlock> {
        match self {
            Block::Text(t) => Some(t),
            Block::Sheet(_) => None,
        }
    }

    /// Get the sheet block, if this is one.
    pub fn as_sheet(&self) -> Option<&SheetBlock> {
        match self {
            Block::Sheet(s) => Some(s),
            Block::Text(_) => None,
        }
    }
}

/// Running text: one paragraph of a Word document or one PDF page.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextBlock {
    pub text: String,
}

impl TextBlock {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }
}

/// Metadata record written ahead of a delimited section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SectionMeta {
    /// Worksheet name
    pub sheet_title: String,
}

impl SectionMeta {
    pub fn sheet(title: impl Into<String>) -> Self {
        Self {
            sheet_title: title.into(),
        }
    }
}

/// A worksheet's rows, each cell already rendered to text.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SheetBlock {
    /// Section metadata; `None` renders as bare CSV
    pub meta: Option<SectionMeta>,

    /// Rows in sheet order, cells in column order
    pub rows: Vec<Vec<String>>,
}

impl SheetBlock {
    /// Create an empty sheet without metadata.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty sheet with a title record.
    pub fn titled(title: impl Into<String>) -> Self {
        Self {
            meta: Some(SectionMeta::sheet(title)),
            rows: Vec::new(),
        }
    }

    /// Append a row.
    pub fn push_row(&mut self, row: Vec<String>) {
        self.rows.push(row);
    }

    /// Sheet title, if recorded.
    pub fn title(&self) -> Option<&str> {
        self.meta.as_ref().map(|m| m.sheet_title.as_str())
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }
}
