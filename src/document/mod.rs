//! Document parsing and data structures module
//!
//! This module provides functionality for reading Microsoft Word (.docx)
//! containers and turning a title/detail table into cards.

pub(crate) mod io;
pub mod loader;
pub mod models;
pub mod parsing;

pub use loader::{ParsedDocument, TableOptions, load_document};
pub use models::*;
