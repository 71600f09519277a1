//! RTF 1.x codec for styled notes.
//!
//! The writer emits the subset RichEdit and WordPad produce for this kind of
//! content (font and colour tables, character formatting deltas, paragraph
//! bullets). The reader accepts that subset from any producer and skips the
//! destinations it has no use for.

mod reader;
mod writer;

use thiserror::Error;

pub use reader::decode;
pub use writer::encode;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RtfError {
    #[error("malformed RTF: {0}")]
    Malformed(String),
}

/// RTF's default font size, 12pt.
pub(crate) const DEFAULT_HALF_POINTS: u32 = 24;
