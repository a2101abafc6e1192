//! Image extraction from .docx containers
//!
//! Every image relationship of the main document is resolved to a media entry
//! in the container and copied once into the output directory under a
//! deterministic name, `<base>_Image<NN><ext>`. Relationships that share a
//! media entry share the extracted file.

use log::{debug, warn};
use std::collections::{BTreeSet, HashMap};
use std::fs::File;
use std::io::{self, Read, Seek};
use std::path::{Path, PathBuf};
use zip::ZipArchive;
use zip::result::ZipError;

use crate::document::io::{DOCUMENT_RELS_PART, open_archive, read_optional_part};
use crate::document::models::ImageMap;
use crate::document::parsing::relationships::Relationships;
use crate::error::Result;

/// Extension used when the media entry has none
const FALLBACK_EXTENSION: &str = ".bin";

/// One relationship resolved to an extracted file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractedImage {
    pub relationship_id: String,
    pub container_path: String,
    pub filename: String,
    pub extension: String,
}

/// Extracts the images of a single document
#[derive(Debug)]
pub struct ImageExtractor {
    output_dir: PathBuf,
    base_name: String,
    next_index: usize,
    /// Container path -> extracted filename, `None` when the entry is missing
    by_path: HashMap<String, Option<String>>,
    images: Vec<ExtractedImage>,
}

impl ImageExtractor {
    pub fn new(output_dir: impl Into<PathBuf>, base_name: impl Into<String>) -> Self {
        Self {
            output_dir: output_dir.into(),
            base_name: base_name.into(),
            next_index: 1,
            by_path: HashMap::new(),
            images: Vec::new(),
        }
    }

    /// Extract every image referenced by the document at `docx_path`.
    ///
    /// Returns the relationship id -> filename index used to resolve image
    /// placeholders. Relationships whose media entry is missing from the
    /// container are left out of the index.
    pub fn extract_images_from_docx(&mut self, docx_path: &Path) -> Result<ImageMap> {
        let mut archive = open_archive(docx_path)?;
        self.extract_from_archive(&mut archive)
    }

    pub(crate) fn extract_from_archive<R: Read + Seek>(
        &mut self,
        archive: &mut ZipArchive<R>,
    ) -> Result<ImageMap> {
        let Some(rels_xml) = read_optional_part(archive, DOCUMENT_RELS_PART)? else {
            debug!("No {DOCUMENT_RELS_PART} in container, no images to extract");
            return Ok(ImageMap::new());
        };
        let relationships = Relationships::parse(&rels_xml)?;
        debug!("{} document relationship(s)", relationships.len());

        for rel in relationships.images() {
            // Linked images have no entry, but still take a sequence number
            if rel.external {
                debug!("Image {} is linked from {}", rel.id, rel.target);
            }

            let container_path = rel.container_path();
            let filename = match self.by_path.get(&container_path) {
                Some(existing) => existing.clone(),
                None => {
                    let resolved = self.extract_entry(archive, &container_path)?;
                    self.by_path.insert(container_path.clone(), resolved.clone());
                    resolved
                }
            };

            if let Some(filename) = filename {
                self.images.push(ExtractedImage {
                    relationship_id: rel.id.clone(),
                    extension: extension_of(&container_path),
                    container_path,
                    filename,
                });
            }
        }

        Ok(self.image_map())
    }

    /// Copy one media entry out of the container under the next sequence name.
    ///
    /// The sequence number is consumed even when the entry turns out to be
    /// missing, so names stay stable for a given relationship layout.
    fn extract_entry<R: Read + Seek>(
        &mut self,
        archive: &mut ZipArchive<R>,
        container_path: &str,
    ) -> Result<Option<String>> {
        let filename = image_filename(
            &self.base_name,
            self.next_index,
            &extension_of(container_path),
        );
        self.next_index += 1;

        let mut entry = match archive.by_name(container_path) {
            Ok(entry) => entry,
            Err(ZipError::FileNotFound) => {
                warn!("Image {container_path} is missing from the container, skipping");
                return Ok(None);
            }
            Err(e) => {
                warn!("Image {container_path} could not be opened ({e}), skipping");
                return Ok(None);
            }
        };

        let mut output = File::create(self.output_dir.join(&filename))?;
        io::copy(&mut entry, &mut output)?;
        debug!("Extracted {container_path} -> {filename}");

        Ok(Some(filename))
    }

    /// Relationship id -> filename for every resolved relationship
    pub fn image_map(&self) -> ImageMap {
        self.images
            .iter()
            .map(|image| (image.relationship_id.clone(), image.filename.clone()))
            .collect()
    }

    /// Resolved relationships in relationship declaration order
    pub fn extracted_images(&self) -> &[ExtractedImage] {
        &self.images
    }

    /// Distinct filenames written for this document, sorted
    pub fn image_files(&self) -> Vec<String> {
        self.images
            .iter()
            .map(|image| image.filename.clone())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }
}

/// `<base>_Image<NN><ext>` with a two-digit, 1-based sequence number
pub fn image_filename(base_name: &str, index: usize, extension: &str) -> String {
    format!("{base_name}_Image{index:02}{extension}")
}

/// Extension of a container path including the dot, `.bin` if it has none
fn extension_of(container_path: &str) -> String {
    Path::new(container_path)
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| format!(".{ext}"))
        .unwrap_or_else(|| FALLBACK_EXTENSION.to_string())
}
