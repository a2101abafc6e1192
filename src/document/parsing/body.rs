//! Body walking for `word/document.xml`
//!
//! This module turns the document part into the table/row/cell/paragraph/run
//! model. Only body-level tables are collected; paragraphs are the direct
//! `w:p` children of a cell and runs the direct `w:r` children of a
//! paragraph, so text boxes and nested tables do not leak into a cell.

use std::rc::Rc;

use super::super::models::*;
use super::xml::{XmlChild, XmlNode, parse_tree};
use crate::error::{ExtractError, Result};

/// Parse the main document part
pub(crate) fn parse_document(xml: &str) -> Result<DocxDocument> {
    let root = parse_tree(xml)?;
    let body = root
        .child("body")
        .ok_or_else(|| ExtractError::InvalidDocx("document has no w:body".to_string()))?;

    let tables = body.children_named("tbl").map(parse_table).collect();
    Ok(DocxDocument { tables })
}

fn parse_table(tbl: &XmlNode) -> Table {
    let mut rows: Vec<TableRow> = Vec::new();

    for tr in tbl.children_named("tr") {
        let mut cells: Vec<Rc<TableCell>> = Vec::new();

        for tc in tr.children_named("tc") {
            let properties = tc.child("tcPr");
            let span = properties
                .and_then(|p| p.child("gridSpan"))
                .and_then(|g| g.attr("val"))
                .and_then(|val| val.trim().parse::<usize>().ok())
                .unwrap_or(1)
                .max(1);
            let continues_merge = properties
                .and_then(|p| p.child("vMerge"))
                .is_some_and(|m| m.attr("val").is_none_or(|val| val == "continue"));

            let grid_col = cells.len();
            let merged_from = if continues_merge {
                rows.last().and_then(|above| above.cells.get(grid_col)).cloned()
            } else {
                None
            };
            let cell = merged_from.unwrap_or_else(|| Rc::new(parse_cell(tc)));

            for _ in 0..span {
                cells.push(Rc::clone(&cell));
            }
        }

        rows.push(TableRow { cells });
    }

    Table { rows }
}

fn parse_cell(tc: &XmlNode) -> TableCell {
    TableCell {
        paragraphs: tc.children_named("p").map(parse_paragraph).collect(),
    }
}

fn parse_paragraph(p: &XmlNode) -> Paragraph {
    let numbering = p
        .child("pPr")
        .and_then(|ppr| ppr.child("numPr"))
        .map(|num_pr| NumberingProperty {
            level: num_pr
                .child("ilvl")
                .and_then(|ilvl| ilvl.attr("val"))
                .map(str::to_string),
        });

    Paragraph {
        runs: p.children_named("r").map(parse_run).collect(),
        numbering,
    }
}

fn parse_run(r: &XmlNode) -> Run {
    let mut children = Vec::new();

    for child in &r.children {
        let XmlChild::Element(node) = child else {
            continue;
        };
        match node.name.as_str() {
            "t" => children.push(RunContent::Text(node.text())),
            "tab" | "ptab" => children.push(RunContent::Text("\t".to_string())),
            "cr" => children.push(RunContent::Text("\n".to_string())),
            "br" => {
                // Page and column breaks carry no text
                if node.attr("type").is_none_or(|kind| kind == "textWrapping") {
                    children.push(RunContent::Text("\n".to_string()));
                }
            }
            "noBreakHyphen" => children.push(RunContent::Text("-".to_string())),
            "drawing" => children.push(drawing(node)),
            _ => {
                // Drawings wrapped in mc:AlternateContent and friends
                let mut nested = Vec::new();
                node.descendants_named("drawing", &mut nested);
                children.extend(nested.into_iter().map(drawing));
            }
        }
    }

    Run { children }
}

fn drawing(node: &XmlNode) -> RunContent {
    RunContent::Drawing {
        embed: node
            .find_descendant("blip")
            .and_then(|blip| blip.attr("embed"))
            .map(str::to_string),
    }
}
