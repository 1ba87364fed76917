//! Rendering module for linearizing artifacts into flat text, and for
//! reading delimited artifacts back.

mod sections;
mod text;

pub use sections::{read_sections, ParsedSection};
pub use text::{
    meta_line, to_bytes, to_text, write_artifact, write_csv, META_PREFIX, SECTION_DELIMITER,
};
