//! docx-cards: turn .docx title/detail tables into JSON card decks
//!
//! This library reads the table of a Microsoft Word document, renders each
//! row into a `{title, detail}` card with bullet lists and inline image
//! placeholders preserved, extracts the referenced images under stable names
//! and keeps a manifest of everything it has written.

pub mod batch;
pub mod config;
pub mod document;
pub mod error;
pub mod image_extractor;
pub mod manifest;

// Re-export commonly used types
pub use batch::{BatchSummary, run_batch};
pub use config::{Config, Overrides, Settings};
pub use document::{Card, ParsedDocument, TableOptions, load_document};
pub use error::ExtractError;
pub use image_extractor::ImageExtractor;
pub use manifest::{ArtifactKind, Manifest, ManifestEntry};
