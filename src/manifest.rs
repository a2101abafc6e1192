//! Incremental manifest of generated artifacts
//!
//! `manifest.json` lists every JSON and image file ever written into an
//! output directory, keyed by filename. Each batch loads it, updates the
//! entries for the files it produced and writes it back whole; entries from
//! earlier batches are carried over untouched, key order and values included.

use anyhow::{Context, Result, bail};
use chrono::{SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::fs;
use std::io::Write;
use std::path::Path;
use tempfile::NamedTempFile;

pub const MANIFEST_FILE_NAME: &str = "manifest.json";

/// One file record, kept as the JSON object found on disk
pub type ManifestEntry = Map<String, Value>;

/// Entries keyed by output filename, kept sorted by filename
pub type ManifestIndex = BTreeMap<String, ManifestEntry>;

/// The whole manifest document.
///
/// Only `generated_at` and `files` are managed; other top-level keys are
/// written back where they were found.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Manifest {
    document: Map<String, Value>,
}

/// What kind of artifact a manifest entry records
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArtifactKind {
    Json,
    Image,
}

impl ArtifactKind {
    pub fn as_str(self) -> &'static str {
        match self {
            ArtifactKind::Json => "json",
            ArtifactKind::Image => "image",
        }
    }
}

impl Default for Manifest {
    fn default() -> Self {
        let mut document = Map::new();
        document.insert("generated_at".to_string(), Value::Null);
        document.insert("files".to_string(), Value::Array(Vec::new()));
        Manifest { document }
    }
}

impl Manifest {
    /// Load the manifest at `path` together with its index.
    ///
    /// A missing file yields an empty manifest. A file that exists but cannot
    /// be read or parsed is an error. Entries without a path are not indexed.
    pub fn load(path: &Path) -> Result<(Manifest, ManifestIndex)> {
        if !path.exists() {
            return Ok((Manifest::default(), ManifestIndex::new()));
        }

        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read manifest {}", path.display()))?;
        let manifest: Manifest = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse manifest {}", path.display()))?;
        let index = manifest
            .build_index()
            .with_context(|| format!("Invalid manifest {}", path.display()))?;

        Ok((manifest, index))
    }

    fn build_index(&self) -> Result<ManifestIndex> {
        let files = match self.document.get("files") {
            None | Some(Value::Null) => return Ok(ManifestIndex::new()),
            Some(Value::Array(files)) => files,
            Some(_) => bail!("\"files\" is not a list"),
        };

        let mut index = ManifestIndex::new();
        for (position, file) in files.iter().enumerate() {
            let Value::Object(entry) = file else {
                bail!("file entry {position} is not an object");
            };
            let path = entry.get("path").and_then(Value::as_str);
            if let Some(path) = path.filter(|path| !path.is_empty()) {
                index.insert(path.to_string(), entry.clone());
            }
        }
        Ok(index)
    }

    /// When the manifest was last written, if it ever was
    pub fn generated_at(&self) -> Option<&str> {
        self.document.get("generated_at").and_then(Value::as_str)
    }

    /// File records as they appear in the document
    pub fn files(&self) -> &[Value] {
        self.document
            .get("files")
            .and_then(Value::as_array)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// Stamp `generated_at`, replace the file list with the sorted index and
    /// write the whole manifest to `path`.
    ///
    /// The file is written next to its destination and renamed into place, so
    /// a failed save leaves the previous manifest intact.
    pub fn save(&mut self, path: &Path, index: &ManifestIndex) -> Result<()> {
        self.document
            .insert("generated_at".to_string(), Value::String(timestamp_now()));
        self.document.insert(
            "files".to_string(),
            Value::Array(index.values().cloned().map(Value::Object).collect()),
        );

        let content = serde_json::to_string_pretty(self)?;
        let dir = path
            .parent()
            .filter(|parent| !parent.as_os_str().is_empty())
            .unwrap_or(Path::new("."));

        let mut file = NamedTempFile::new_in(dir)
            .with_context(|| format!("Failed to create temporary manifest in {}", dir.display()))?;
        file.write_all(content.as_bytes())?;
        // Temporary files are created owner-only; the manifest is shared output
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            file.as_file()
                .set_permissions(fs::Permissions::from_mode(0o644))?;
        }
        file.persist(path)
            .with_context(|| format!("Failed to write manifest {}", path.display()))?;

        Ok(())
    }
}

/// Record a file produced by the current run.
///
/// `type`, `source_docx` and `parsed_at` are always overwritten in place;
/// anything else already stored for the file is kept.
pub fn upsert(
    index: &mut ManifestIndex,
    path: &str,
    kind: ArtifactKind,
    source_docx: &str,
    parsed_at: &str,
) {
    let entry = index.entry(path.to_string()).or_insert_with(|| {
        let mut entry = ManifestEntry::new();
        entry.insert("path".to_string(), Value::from(path));
        entry
    });
    entry.insert("type".to_string(), Value::from(kind.as_str()));
    entry.insert("source_docx".to_string(), Value::from(source_docx));
    entry.insert("parsed_at".to_string(), Value::from(parsed_at));
}

/// Current UTC time as ISO-8601 with microseconds and a `+00:00` offset
pub fn timestamp_now() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Micros, false)
}

#[cfg(test)]
mod tests {
    use super::*;

    const EXISTING: &str = r#"{
  "generated_at": "2025-01-01T00:00:00+00:00",
  "owner": "deck-sync",
  "files": [
    {"path": "Old.json", "type": "json", "source_docx": "Old.docx", "parsed_at": "2025-01-01T00:00:00+00:00", "checksum": "abc"},
    {"path": "Cats_Image01.png", "type": "image", "source_docx": "Cats.docx", "parsed_at": "2025-01-01T00:00:00+00:00", "reviewed": true},
    {"type": "json"}
  ]
}"#;

    #[test]
    fn test_missing_manifest_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let (manifest, index) = Manifest::load(&dir.path().join(MANIFEST_FILE_NAME)).unwrap();
        assert_eq!(manifest.generated_at(), None);
        assert!(manifest.files().is_empty());
        assert!(index.is_empty());
    }

    #[test]
    fn test_malformed_manifest_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(MANIFEST_FILE_NAME);
        fs::write(&path, "{ not json").unwrap();
        assert!(Manifest::load(&path).is_err());

        fs::write(&path, "").unwrap();
        assert!(Manifest::load(&path).is_err());
    }

    #[test]
    fn test_load_indexes_entries_with_paths() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(MANIFEST_FILE_NAME);
        fs::write(&path, EXISTING).unwrap();

        let (manifest, index) = Manifest::load(&path).unwrap();
        assert_eq!(manifest.generated_at(), Some("2025-01-01T00:00:00+00:00"));
        assert_eq!(manifest.files().len(), 3);
        assert_eq!(index.len(), 2);
        assert_eq!(index["Old.json"]["type"], "json");
        assert_eq!(index["Old.json"]["checksum"], "abc");
    }

    #[test]
    fn test_upsert_overwrites_tracked_fields_only() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(MANIFEST_FILE_NAME);
        fs::write(&path, EXISTING).unwrap();
        let (_, mut index) = Manifest::load(&path).unwrap();

        upsert(
            &mut index,
            "Cats_Image01.png",
            ArtifactKind::Image,
            "Cats.docx",
            "2026-02-02T00:00:00+00:00",
        );
        upsert(
            &mut index,
            "Cats.json",
            ArtifactKind::Json,
            "Cats.docx",
            "2026-02-02T00:00:00+00:00",
        );

        let image = &index["Cats_Image01.png"];
        assert_eq!(image["parsed_at"], "2026-02-02T00:00:00+00:00");
        assert_eq!(image["reviewed"], true);

        let json = &index["Cats.json"];
        let keys: Vec<&str> = json.keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["path", "type", "source_docx", "parsed_at"]);
        assert_eq!(json["type"], "json");
    }

    #[test]
    fn test_save_sorts_and_keeps_untouched_entries() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(MANIFEST_FILE_NAME);
        fs::write(&path, EXISTING).unwrap();

        let (mut manifest, mut index) = Manifest::load(&path).unwrap();
        upsert(
            &mut index,
            "Birds.json",
            ArtifactKind::Json,
            "Birds.docx",
            "2026-02-02T00:00:00+00:00",
        );
        manifest.save(&path, &index).unwrap();

        let saved: Value = serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        let paths: Vec<&str> = saved["files"]
            .as_array()
            .unwrap()
            .iter()
            .map(|entry| entry["path"].as_str().unwrap())
            .collect();
        assert_eq!(paths, vec!["Birds.json", "Cats_Image01.png", "Old.json"]);

        assert_eq!(saved["owner"], "deck-sync");
        assert_ne!(saved["generated_at"], "2025-01-01T00:00:00+00:00");
        assert_eq!(saved["files"][2]["checksum"], "abc");
        assert_eq!(saved["files"][2]["parsed_at"], "2025-01-01T00:00:00+00:00");
        assert_eq!(saved["files"][0]["type"], "json");
    }

    #[test]
    fn test_foreign_entries_are_written_back_unchanged() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(MANIFEST_FILE_NAME);
        let before = r#"{
  "generated_at": "2024-12-31T23:59:59+00:00",
  "files": [
    {
      "type": "pdf",
      "path": "a.pdf",
      "source_docx": null,
      "parsed_at": 1700000000,
      "pages": [
        1,
        2
      ]
    },
    {
      "path": "b.json",
      "type": "json",
      "source_docx": "b.docx",
      "parsed_at": "2025-01-01T00:00:00+00:00"
    }
  ],
  "owner": "deck-sync"
}"#;
        fs::write(&path, before).unwrap();

        let (mut manifest, index) = Manifest::load(&path).unwrap();
        manifest.save(&path, &index).unwrap();

        let stamp = manifest.generated_at().unwrap().to_string();
        let after = fs::read_to_string(&path).unwrap();
        assert_eq!(after, before.replace("2024-12-31T23:59:59+00:00", &stamp));
    }

    #[test]
    fn test_manifest_with_bad_file_list_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(MANIFEST_FILE_NAME);

        fs::write(&path, r#"{"files": {"path": "a.json"}}"#).unwrap();
        assert!(Manifest::load(&path).is_err());

        fs::write(&path, r#"{"files": ["a.json"]}"#).unwrap();
        assert!(Manifest::load(&path).is_err());

        fs::write(&path, r#"{"note": "no files yet"}"#).unwrap();
        let (_, index) = Manifest::load(&path).unwrap();
        assert!(index.is_empty());
    }

    #[test]
    fn test_timestamp_is_utc_iso8601() {
        let stamp = timestamp_now();
        assert!(stamp.ends_with("+00:00"), "unexpected timestamp {stamp}");
        assert!(chrono::DateTime::parse_from_rfc3339(&stamp).is_ok());
    }
}
