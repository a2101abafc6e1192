//! Table extraction
//!
//! This module walks the rows of one table and turns each title/detail row
//! into a [`Card`].

use std::path::Path;

use super::super::models::*;
use super::list::{render_cell_detail, render_cell_title};
use crate::error::{ExtractError, Result};

/// Extract cards from the table at `table_index`.
///
/// The first row is skipped when `has_header` is set. Rows with fewer than
/// two cells are ignored, and a card is only produced when its title or
/// detail has content.
pub fn extract_cards(
    document: &DocxDocument,
    source: &Path,
    table_index: usize,
    has_header: bool,
    images: &ImageMap,
) -> Result<Vec<Card>> {
    let table = document
        .tables
        .get(table_index)
        .ok_or_else(|| ExtractError::TableNotFound {
            path: source.to_path_buf(),
            found: document.tables.len(),
            requested: table_index,
        })?;

    let start_row = usize::from(has_header);
    let mut cards = Vec::new();

    for row in table.rows.iter().skip(start_row) {
        let [title_cell, detail_cell, ..] = row.cells.as_slice() else {
            continue;
        };

        let title = render_cell_title(title_cell, images);
        let detail = render_cell_detail(detail_cell, images);

        if title.trim().is_empty() && detail.trim().is_empty() {
            continue;
        }

        cards.push(Card { title, detail });
    }

    Ok(cards)
}
