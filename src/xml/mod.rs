//! The serialization boundary.
//!
//! One persisted document per documented type, with a fixed node vocabulary
//! and a fixed element order inside every parent so successive runs produce
//! reproducible diffs. Framework-membership sets cross this boundary as the
//! delimited `FrameworkAlternate` attribute (absent when universal) and
//! exist as proper set types everywhere else.
//!
//! Documentation prose is carried as raw XML fragments: the writer emits it
//! byte for byte and the reader captures it unprocessed, so user markup
//! (`<see cref="..."/>` and friends) survives any number of round trips.

mod reader;
mod writer;

pub use reader::{read_index, read_type};
pub use writer::{write_index, write_type};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum XmlError {
    #[error("xml error: {0}")]
    Xml(#[from] quick_xml::Error),
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),
    #[error("malformed attribute: {0}")]
    Attr(#[from] quick_xml::events::attributes::AttrError),
    #[error("document is not valid utf-8: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),
    #[error("malformed document: {0}")]
    Malformed(String),
}
