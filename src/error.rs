//! Error types for document extraction.

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while turning a single document into cards.
///
/// Every variant is recoverable at the batch level: the caller logs it and
/// moves on to the next document.
#[derive(Error, Debug)]
pub enum ExtractError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("ZIP error: {0}")]
    Zip(#[from] zip::result::ZipError),

    #[error("XML parsing error: {0}")]
    Xml(#[from] quick_xml::Error),

    #[error("Invalid .docx file: {0}")]
    InvalidDocx(String),

    #[error("'{}' has only {found} tables, but index={requested} was requested.", .path.display())]
    TableNotFound {
        path: PathBuf,
        found: usize,
        requested: usize,
    },
}

pub type Result<T> = std::result::Result<T, ExtractError>;
