//! Relationship metadata of the main document part
//!
//! Drawings reference their images through relationship ids (`rId7`); the
//! ids resolve to container paths through `word/_rels/document.xml.rels`.

use quick_xml::Reader;
use quick_xml::events::{BytesStart, Event};

use crate::error::Result;

/// Directory of the main document part inside the container
const CONTENT_ROOT: &str = "word/";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Relationship {
    pub id: String,
    pub rel_type: String,
    pub target: String,
    pub external: bool,
}

impl Relationship {
    pub fn is_image(&self) -> bool {
        self.rel_type.contains("image")
    }

    /// Absolute path of the target inside the container
    pub fn container_path(&self) -> String {
        normalize_target(&self.target)
    }
}

/// Relationships of one document, in the order they are declared
#[derive(Debug, Clone, Default)]
pub struct Relationships {
    entries: Vec<Relationship>,
}

impl Relationships {
    pub fn parse(xml: &str) -> Result<Self> {
        let mut reader = Reader::from_str(xml);
        reader.config_mut().trim_text(true);

        let mut entries = Vec::new();
        loop {
            match reader.read_event()? {
                Event::Start(e) | Event::Empty(e)
                    if e.local_name().as_ref() == b"Relationship" =>
                {
                    if let Some(rel) = parse_relationship(&e)? {
                        entries.push(rel);
                    }
                }
                Event::Eof => break,
                _ => {}
            }
        }

        Ok(Self { entries })
    }

    /// Image relationships in declaration order
    pub fn images(&self) -> impl Iterator<Item = &Relationship> {
        self.entries.iter().filter(|rel| rel.is_image())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

fn parse_relationship(e: &BytesStart) -> Result<Option<Relationship>> {
    let mut id = None;
    let mut rel_type = String::new();
    let mut target = None;
    let mut external = false;

    for attr in e.attributes() {
        let attr = attr.map_err(quick_xml::Error::from)?;
        let value = attr.unescape_value()?.into_owned();
        match attr.key.local_name().as_ref() {
            b"Id" => id = Some(value),
            b"Type" => rel_type = value,
            b"Target" => target = Some(value),
            b"TargetMode" => external = value.eq_ignore_ascii_case("External"),
            _ => {}
        }
    }

    Ok(id.zip(target).map(|(id, target)| Relationship {
        id,
        rel_type,
        target,
        external,
    }))
}

/// Map a relationship target to a path inside the container.
///
/// A leading `/` is dropped and targets outside `word/` are placed under it;
/// `.` and `..` segments are then collapsed.
pub fn normalize_target(target: &str) -> String {
    let target = target.strip_prefix('/').unwrap_or(target);
    let joined = if target.starts_with(CONTENT_ROOT) {
        target.to_string()
    } else {
        format!("{CONTENT_ROOT}{target}")
    };

    let mut segments: Vec<&str> = Vec::new();
    for segment in joined.split('/') {
        match segment {
            "" | "." => {}
            ".." => {
                segments.pop();
            }
            other => segments.push(other),
        }
    }
    segments.join("/")
}
