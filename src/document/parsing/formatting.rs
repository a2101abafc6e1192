//! Paragraph text rendering
//!
//! This module flattens a paragraph's runs into a single string, replacing
//! inline drawings with `[[image:<filename>]]` placeholders.

use super::super::models::*;

/// Placeholder token marking an inline image inside extracted text
pub fn image_placeholder(filename: &str) -> String {
    format!("[[image:{filename}]]")
}

/// Render a paragraph to text with image placeholders, trimmed.
///
/// A run holding drawings contributes only its placeholders; any text in the
/// same run is dropped. Drawings whose relationship id is not in `images`
/// are skipped silently.
pub fn render_paragraph(para: &Paragraph, images: &ImageMap) -> String {
    let mut output = String::new();

    for run in &para.runs {
        if run.has_drawing() {
            for child in &run.children {
                if let RunContent::Drawing { embed: Some(rel_id) } = child {
                    if let Some(filename) = images.get(rel_id) {
                        output.push_str(&image_placeholder(filename));
                    }
                }
            }
            continue;
        }

        output.push_str(&run.text());
    }

    output.trim().to_string()
}
