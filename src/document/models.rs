//! Core data structures for document representation
//!
//! This module defines the types a parsed document is reduced to: the
//! body-level tables with their rows, cells, paragraphs and runs, plus the
//! card records produced from them.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::rc::Rc;

/// Relationship id -> extracted image filename, scoped to one document
pub type ImageMap = HashMap<String, String>;

/// One output record: a title/detail pair taken from a table row
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Card {
    pub title: String,
    pub detail: String,
}

/// The parts of `word/document.xml` the extractor cares about
#[derive(Debug, Clone, Default)]
pub struct DocxDocument {
    pub tables: Vec<Table>,
}

#[derive(Debug, Clone, Default)]
pub struct Table {
    pub rows: Vec<TableRow>,
}

/// A row in grid order. Spanned and vertically merged cells appear once per
/// grid column they cover, sharing the same underlying cell.
#[derive(Debug, Clone, Default)]
pub struct TableRow {
    pub cells: Vec<Rc<TableCell>>,
}

#[derive(Debug, Clone, Default)]
pub struct TableCell {
    pub paragraphs: Vec<Paragraph>,
}

#[derive(Debug, Clone, Default)]
pub struct Paragraph {
    pub runs: Vec<Run>,
    pub numbering: Option<NumberingProperty>,
}

impl Paragraph {
    pub fn is_list_item(&self) -> bool {
        self.numbering.is_some()
    }

    /// Nesting level for list rendering, 0 when the paragraph is not a list
    /// item or its level is missing or malformed
    pub fn list_level(&self) -> usize {
        self.numbering.as_ref().map_or(0, NumberingProperty::level)
    }
}

/// Raw `w:numPr` contents of a paragraph
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NumberingProperty {
    /// Unparsed `w:ilvl/@w:val`
    pub level: Option<String>,
}

impl NumberingProperty {
    pub fn level(&self) -> usize {
        self.level
            .as_deref()
            .and_then(|val| val.trim().parse::<usize>().ok())
            .unwrap_or(0)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Run {
    pub children: Vec<RunContent>,
}

impl Run {
    pub fn has_drawing(&self) -> bool {
        self.children
            .iter()
            .any(|child| matches!(child, RunContent::Drawing { .. }))
    }

    /// Plain text of the run with tabs and breaks already mapped
    pub fn text(&self) -> String {
        self.children
            .iter()
            .filter_map(|child| match child {
                RunContent::Text(text) => Some(text.as_str()),
                RunContent::Drawing { .. } => None,
            })
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunContent {
    Text(String),
    Drawing {
        /// `r:embed` of the first `a:blip` inside the drawing, if any
        embed: Option<String>,
    },
}
