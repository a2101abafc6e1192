//! Document loading and orchestration
//!
//! This module contains the per-document pipeline: validate the container,
//! extract its images, parse the body and turn the requested table into
//! cards.

use log::debug;
use std::path::Path;

use super::io::{DOCUMENT_PART, open_archive, read_part, validate_docx_file};
use super::models::*;
use super::parsing::body::parse_document;
use super::parsing::table::extract_cards;
use crate::error::Result;
use crate::image_extractor::ImageExtractor;

/// Which table to read and how
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TableOptions {
    /// 0-based index among the body-level tables
    pub table_index: usize,
    /// Skip the first row of the table
    pub has_header: bool,
}

impl Default for TableOptions {
    fn default() -> Self {
        Self {
            table_index: 0,
            has_header: true,
        }
    }
}

/// Cards and images produced from one document
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedDocument {
    pub cards: Vec<Card>,
    /// Distinct image filenames written to the output directory, sorted
    pub image_files: Vec<String>,
}

/// Load a document's table as cards, extracting its images into `output_dir`.
///
/// Images are named after `base_name` and extracted before the table is
/// looked up, so a document missing the requested table still leaves its
/// images in `output_dir`.
pub fn load_document(
    file_path: &Path,
    output_dir: &Path,
    base_name: &str,
    options: TableOptions,
) -> Result<ParsedDocument> {
    // Validate file type before attempting to parse
    validate_docx_file(file_path)?;

    let mut extractor = ImageExtractor::new(output_dir, base_name);
    let images = extractor.extract_images_from_docx(file_path)?;
    for image in extractor.extracted_images() {
        debug!(
            "{}: {} -> {} ({})",
            file_path.display(),
            image.relationship_id,
            image.filename,
            image.container_path
        );
    }

    let document_xml = {
        let mut archive = open_archive(file_path)?;
        read_part(&mut archive, DOCUMENT_PART)?
    };
    let document = parse_document(&document_xml)?;
    debug!(
        "{}: {} table(s) in document body",
        file_path.display(),
        document.tables.len()
    );

    let cards = extract_cards(
        &document,
        file_path,
        options.table_index,
        options.has_header,
        &images,
    )?;

    Ok(ParsedDocument {
        cards,
        image_files: extractor.image_files(),
    })
}
