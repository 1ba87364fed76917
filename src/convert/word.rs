//! Word document extractor.
//!
//! Reads the main document part of a zip-packaged Word document and emits
//! one text block per body paragraph. Tables, headers, footers, text boxes
//! and styling are not extracted.

use std::io::{Cursor, Read};

use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;

use crate::detect::{validate_magic, DocumentFormat};
use crate::error::{Error, Result};
use crate::model::{Artifact, Block};

use super::Extractor;

/// Path of the main document part inside the package.
const DOCUMENT_PART: &str = "word/document.xml";

/// Word document extractor.
#[derive(Debug, Clone, Default)]
pub struct WordExtractor {
    _private: (),
}

impl WordExtractor {
    /// Create a new Word extractor.
    pub fn new() -> Self {
        Self { _private: () }
    }
}

impl Extractor for WordExtractor {
    fn supported_extensions(&self) -> &[&str] {
        DocumentFormat::Word.extensions()
    }

    fn name(&self) -> &str {
        "word"
    }

    fn format(&self) -> DocumentFormat {
        DocumentFormat::Word
    }

    fn extract_bytes(&self, bytes: &[u8]) -> Result<Artifact> {
        validate_magic(DocumentFormat::Word, bytes)?;

        let xml = read_document_part(bytes)?;
        let paragraphs = body_paragraphs(&xml)?;
        log::debug!("Extracted {} paragraphs", paragraphs.len());

        let mut artifact = Artifact::new(DocumentFormat::Word);
        for text in paragraphs {
            artifact.push(Block::text(text));
        }
        Ok(artifact)
    }
}

fn read_document_part(bytes: &[u8]) -> Result<String> {
    let mut archive = zip::ZipArchive::new(Cursor::new(bytes))
        .map_err(|e| Error::parse(DocumentFormat::Word, e))?;

    let mut part = archive.by_name(DOCUMENT_PART).map_err(|e| {
        Error::parse(DocumentFormat::Word, format!("{DOCUMENT_PART}: {e}"))
    })?;

    let mut xml = String::new();
    part.read_to_string(&mut xml)
        .map_err(|e| Error::parse(DocumentFormat::Word, format!("{DOCUMENT_PART}: {e}")))?;
    Ok(xml)
}

/// Element kinds that matter for locating body paragraph text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Node {
    Body,
    Paragraph,
    Hyperlink,
    Run,
    Text,
    Other,
}

impl Node {
    fn from_local_name(name: &[u8]) -> Self {
        match name {
            b"body" => Node::Body,
            b"p" => Node::Paragraph,
            b"hyperlink" => Node::Hyperlink,
            b"r" => Node::Run,
            b"t" => Node::Text,
            _ => Node::Other,
        }
    }
}

/// Whether `path` ends in a run that belongs directly to a body paragraph.
fn in_body_run(path: &[Node]) -> bool {
    matches!(
        path,
        [.., Node::Body, Node::Paragraph, Node::Run]
            | [.., Node::Body, Node::Paragraph, Node::Hyperlink, Node::Run]
    )
}

fn is_body_paragraph(path: &[Node]) -> bool {
    matches!(path, [.., Node::Body, Node::Paragraph])
}

/// Collect the plain text of each paragraph that is a direct child of the
/// document body, in document order.
fn body_paragraphs(xml: &str) -> Result<Vec<String>> {
    let mut reader = Reader::from_str(xml);
    let mut stack: Vec<Node> = Vec::new();
    let mut paragraphs = Vec::new();
    let mut current = String::new();

    loop {
        let event = reader
            .read_event()
            .map_err(|e| Error::parse(DocumentFormat::Word, e))?;

        match event {
            Event::Start(e) => {
                stack.push(Node::from_local_name(e.local_name().as_ref()));
                if is_body_paragraph(&stack) {
                    current.clear();
                }
            }
            Event::End(_) => {
                if is_body_paragraph(&stack) {
                    paragraphs.push(std::mem::take(&mut current));
                }
                stack.pop();
            }
            Event::Empty(e) => {
                let node = Node::from_local_name(e.local_name().as_ref());
                if node == Node::Paragraph && matches!(stack.last(), Some(Node::Body)) {
                    paragraphs.push(String::new());
                } else if in_body_run(&stack) {
                    if let Some(text) = run_child_text(&e)? {
                        current.push_str(text);
                    }
                }
            }
            Event::Text(t) => {
                if let Some((Node::Text, parent)) = stack.split_last() {
                    if in_body_run(parent) {
                        let text = t
                            .unescape()
                            .map_err(|e| Error::parse(DocumentFormat::Word, e))?;
                        current.push_str(&text);
                    }
                }
            }
            Event::Eof => break,
            _ => {}
        }
    }

    Ok(paragraphs)
}

/// Text contributed by an empty run child such as `<w:tab/>` or `<w:br/>`.
fn run_child_text(element: &BytesStart<'_>) -> Result<Option<&'static str>> {
    let text = match element.local_name().as_ref() {
        b"tab" | b"ptab" => Some("\t"),
        b"cr" => Some("\n"),
        b"noBreakHyphen" => Some("-"),
        // Only text-wrapping breaks are line breaks; page and column breaks
        // contribute nothing.
        b"br" => match break_type(element)? {
            None => Some("\n"),
            Some(kind) if kind == "textWrapping" => Some("\n"),
            Some(_) => None,
        },
        _ => None,
    };
    Ok(text)
}

fn break_type(element: &BytesStart<'_>) -> Result<Option<String>> {
    for attr in element.attributes() {
        let attr = attr.map_err(|e| Error::parse(DocumentFormat::Word, e))?;
        if attr.key.local_name().as_ref() == b"type" {
            return Ok(Some(String::from_utf8_lossy(&attr.value).into_owned()));
        }
    }
    Ok(None)
}
