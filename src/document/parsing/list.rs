//! Cell rendering with list structure
//!
//! This module turns a table cell into text. Detail cells keep Word list
//! items as tab-indented bullets; title cells are flattened to one line.

use super::super::models::*;
use super::formatting::render_paragraph;

const BULLET: &str = "• ";

/// Render one list item line: one tab per nesting level, then a bullet
pub(crate) fn bullet_line(level: usize, content: &str) -> String {
    format!("{}{BULLET}{content}", "\t".repeat(level))
}

/// Render a detail cell, one line per non-empty paragraph
pub fn render_cell_detail(cell: &TableCell, images: &ImageMap) -> String {
    let mut lines = Vec::new();

    for para in &cell.paragraphs {
        let content = render_paragraph(para, images);
        if content.is_empty() {
            continue;
        }

        if para.is_list_item() {
            lines.push(bullet_line(para.list_level(), &content));
        } else {
            lines.push(content);
        }
    }

    lines.join("\n")
}

/// Render a title cell: non-empty paragraphs joined by single spaces
pub fn render_cell_title(cell: &TableCell, images: &ImageMap) -> String {
    cell.paragraphs
        .iter()
        .map(|para| render_paragraph(para, images))
        .filter(|content| !content.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
        .trim()
        .to_string()
}
