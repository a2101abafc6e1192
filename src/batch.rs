//! Batch conversion of a directory of documents
//!
//! Documents are processed one at a time. A document that fails is logged
//! and skipped; only manifest and output directory problems stop the batch.

use anyhow::{Context, Result};
use log::{info, warn};
use std::fs;
use std::path::{Path, PathBuf};

use crate::config::Settings;
use crate::document::{Card, load_document};
use crate::manifest::{
    ArtifactKind, MANIFEST_FILE_NAME, Manifest, ManifestIndex, timestamp_now, upsert,
};

/// Prefix Word gives its lock files next to an open document
const LOCK_FILE_PREFIX: &str = "~$";

/// Totals for one batch
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BatchSummary {
    pub documents_found: usize,
    pub documents_converted: usize,
    pub documents_failed: usize,
    pub cards: usize,
    pub images: usize,
    /// `None` when there was nothing to convert and the manifest was not written
    pub manifest_path: Option<PathBuf>,
}

/// Convert every document in `settings.docx_dir` and update the manifest
pub fn run_batch(settings: &Settings) -> Result<BatchSummary> {
    fs::create_dir_all(&settings.output_dir).with_context(|| {
        format!(
            "Failed to create output directory {}",
            settings.output_dir.display()
        )
    })?;

    let manifest_path = settings.output_dir.join(MANIFEST_FILE_NAME);
    let (mut manifest, mut index) = Manifest::load(&manifest_path)?;

    let docx_files = discover_documents(&settings.docx_dir)?;
    let mut summary = BatchSummary {
        documents_found: docx_files.len(),
        ..BatchSummary::default()
    };

    if docx_files.is_empty() {
        info!("No .docx files found in {}.", settings.docx_dir.display());
        return Ok(summary);
    }

    for filename in &docx_files {
        info!("Processing {filename} ...");
        match convert_document(settings, filename, &mut index) {
            Ok((card_count, image_count)) => {
                summary.documents_converted += 1;
                summary.cards += card_count;
                summary.images += image_count;
            }
            Err(e) => {
                warn!("Failed to parse '{filename}': {e:#}");
                summary.documents_failed += 1;
            }
        }
    }

    manifest.save(&manifest_path, &index)?;
    summary.manifest_path = Some(manifest_path);
    Ok(summary)
}

/// Names of the .docx files directly inside `dir`, sorted, lock files excluded
pub fn discover_documents(dir: &Path) -> Result<Vec<String>> {
    let entries = fs::read_dir(dir)
        .with_context(|| format!("Failed to read directory {}", dir.display()))?;

    let mut names = Vec::new();
    for entry in entries {
        let entry = entry?;
        let Ok(name) = entry.file_name().into_string() else {
            continue;
        };
        if name.to_lowercase().ends_with(".docx") && !name.starts_with(LOCK_FILE_PREFIX) {
            names.push(name);
        }
    }

    names.sort();
    Ok(names)
}

/// Convert one document, write its JSON and stage its manifest entries
fn convert_document(
    settings: &Settings,
    filename: &str,
    index: &mut ManifestIndex,
) -> Result<(usize, usize)> {
    let input_path = settings.docx_dir.join(filename);
    let base = document_base_name(filename);
    let json_name = format!("{base}.json");
    let json_path = settings.output_dir.join(&json_name);

    let parsed = load_document(&input_path, &settings.output_dir, base, settings.table)?;
    write_cards(&json_path, &parsed.cards)?;
    info!(
        " → {} cards → {}",
        parsed.cards.len(),
        json_path.display()
    );

    let parsed_at = timestamp_now();
    upsert(index, &json_name, ArtifactKind::Json, filename, &parsed_at);
    for image in &parsed.image_files {
        upsert(index, image, ArtifactKind::Image, filename, &parsed_at);
    }

    Ok((parsed.cards.len(), parsed.image_files.len()))
}

/// File name without its final extension, spaces and all
fn document_base_name(filename: &str) -> &str {
    Path::new(filename)
        .file_stem()
        .and_then(|stem| stem.to_str())
        .unwrap_or(filename)
}

/// Write cards as a pretty-printed JSON array
pub fn write_cards(path: &Path, cards: &[Card]) -> Result<()> {
    let content = serde_json::to_string_pretty(cards)?;
    fs::write(path, content).with_context(|| format!("Failed to write {}", path.display()))?;
    Ok(())
}
