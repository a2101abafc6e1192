//! Container I/O and validation
//!
//! This module opens `.docx` containers, checks they are Word documents and
//! reads XML parts out of them.

use std::fs::File;
use std::io::{Read, Seek};
use std::path::Path;
use zip::ZipArchive;

use crate::error::{ExtractError, Result};

pub(crate) const DOCUMENT_PART: &str = "word/document.xml";
pub(crate) const DOCUMENT_RELS_PART: &str = "word/_rels/document.xml.rels";

/// Validates that the file is a legitimate .docx file
pub(crate) fn validate_docx_file(file_path: &Path) -> Result<()> {
    // Check file extension
    let extension = file_path
        .extension()
        .and_then(|ext| ext.to_str())
        .unwrap_or("");

    if !extension.eq_ignore_ascii_case("docx") {
        return Err(ExtractError::InvalidDocx(format!(
            "expected .docx file, got .{extension} \
            (only Word .docx files are supported, not .doc, .xlsx, .zip, etc.)"
        )));
    }

    // Check ZIP structure contains word/document.xml
    let mut archive = open_archive(file_path)?;

    if archive.by_name(DOCUMENT_PART).is_err() {
        // Check if it might be an Excel file
        if archive.by_name("xl/workbook.xml").is_ok() {
            return Err(ExtractError::InvalidDocx(
                "this appears to be an Excel file (.xlsx), not a Word document".to_string(),
            ));
        }

        return Err(ExtractError::InvalidDocx(format!(
            "missing {DOCUMENT_PART}; the file may be corrupted or is not a Word document"
        )));
    }

    Ok(())
}

pub(crate) fn open_archive(file_path: &Path) -> Result<ZipArchive<File>> {
    let file = File::open(file_path)?;
    Ok(ZipArchive::new(file)?)
}

/// Read a text part, stripping a UTF-8 byte order mark if present
pub(crate) fn read_part<R: Read + Seek>(archive: &mut ZipArchive<R>, name: &str) -> Result<String> {
    let mut part = archive.by_name(name)?;
    let mut bytes = Vec::new();
    part.read_to_end(&mut bytes)?;

    if bytes.starts_with(b"\xEF\xBB\xBF") {
        bytes.drain(..3);
    }
    String::from_utf8(bytes)
        .map_err(|e| ExtractError::InvalidDocx(format!("{name} is not valid UTF-8: {e}")))
}

/// Like [`read_part`] but treats a missing part as absent rather than an error
pub(crate) fn read_optional_part<R: Read + Seek>(
    archive: &mut ZipArchive<R>,
    name: &str,
) -> Result<Option<String>> {
    match read_part(archive, name) {
        Ok(content) => Ok(Some(content)),
        Err(ExtractError::Zip(zip::result::ZipError::FileNotFound)) => Ok(None),
        Err(e) => Err(e),
    }
}
