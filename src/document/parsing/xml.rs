//! Minimal element tree over an OOXML part
//!
//! WordprocessingML questions are structural ("direct `w:p` children of this
//! `w:tc`", "any `w:drawing` below this run"), so parts are loaded into a
//! small tree keyed by local names before being interpreted.

use quick_xml::Reader;
use quick_xml::events::{BytesStart, Event};

use crate::error::{ExtractError, Result};

#[derive(Debug, Clone, Default)]
pub(crate) struct XmlNode {
    /// Local name, namespace prefix dropped
    pub(crate) name: String,
    /// Attributes by local name
    pub(crate) attrs: Vec<(String, String)>,
    pub(crate) children: Vec<XmlChild>,
}

#[derive(Debug, Clone)]
pub(crate) enum XmlChild {
    Element(XmlNode),
    Text(String),
}

impl XmlNode {
    pub(crate) fn attr(&self, name: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    pub(crate) fn elements(&self) -> impl Iterator<Item = &XmlNode> {
        self.children.iter().filter_map(|child| match child {
            XmlChild::Element(node) => Some(node),
            XmlChild::Text(_) => None,
        })
    }

    /// Direct children with the given local name
    pub(crate) fn children_named<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a XmlNode> {
        self.elements().filter(move |node| node.name == name)
    }

    pub(crate) fn child(&self, name: &str) -> Option<&XmlNode> {
        self.elements().find(|node| node.name == name)
    }

    /// All descendants with the given local name, in document order
    pub(crate) fn descendants_named<'a>(&'a self, name: &str, out: &mut Vec<&'a XmlNode>) {
        for node in self.elements() {
            if node.name == name {
                out.push(node);
            }
            node.descendants_named(name, out);
        }
    }

    /// First descendant with the given local name, in document order
    pub(crate) fn find_descendant(&self, name: &str) -> Option<&XmlNode> {
        for node in self.elements() {
            if node.name == name {
                return Some(node);
            }
            if let Some(found) = node.find_descendant(name) {
                return Some(found);
            }
        }
        None
    }

    /// Concatenated direct text content
    pub(crate) fn text(&self) -> String {
        self.children
            .iter()
            .filter_map(|child| match child {
                XmlChild::Text(text) => Some(text.as_str()),
                XmlChild::Element(_) => None,
            })
            .collect()
    }
}

/// Parse a whole part into its root element
pub(crate) fn parse_tree(xml: &str) -> Result<XmlNode> {
    let mut reader = Reader::from_str(xml);
    // Text inside w:t is significant, including surrounding spaces
    reader.config_mut().trim_text(false);

    let mut stack: Vec<XmlNode> = Vec::new();
    let mut root = None;

    loop {
        match reader.read_event()? {
            Event::Start(e) => stack.push(element(&e)?),
            Event::Empty(e) => {
                let node = element(&e)?;
                match stack.last_mut() {
                    Some(parent) => parent.children.push(XmlChild::Element(node)),
                    None => root = Some(node),
                }
            }
            Event::End(_) => {
                let node = stack.pop().ok_or_else(|| {
                    ExtractError::InvalidDocx("unbalanced closing tag".to_string())
                })?;
                match stack.last_mut() {
                    Some(parent) => parent.children.push(XmlChild::Element(node)),
                    None => root = Some(node),
                }
            }
            Event::Text(e) => {
                if let Some(parent) = stack.last_mut() {
                    let text = e.unescape()?;
                    // Layout whitespace between elements carries no content
                    if parent.name == "t" || !text.trim().is_empty() {
                        parent.children.push(XmlChild::Text(text.into_owned()));
                    }
                }
            }
            Event::CData(e) => {
                if let Some(parent) = stack.last_mut() {
                    let text = String::from_utf8_lossy(&e.into_inner()).into_owned();
                    parent.children.push(XmlChild::Text(text));
                }
            }
            Event::Eof => break,
            _ => {}
        }
    }

    if !stack.is_empty() {
        return Err(ExtractError::InvalidDocx(
            "unexpected end of XML part".to_string(),
        ));
    }
    root.ok_or_else(|| ExtractError::InvalidDocx("empty XML part".to_string()))
}

fn element(e: &BytesStart) -> Result<XmlNode> {
    let name = String::from_utf8_lossy(e.local_name().as_ref()).into_owned();
    let mut attrs = Vec::new();
    for attr in e.attributes() {
        let attr = attr.map_err(quick_xml::Error::from)?;
        let key = String::from_utf8_lossy(attr.key.local_name().as_ref()).into_owned();
        attrs.push((key, attr.unescape_value()?.into_owned()));
    }
    Ok(XmlNode {
        name,
        attrs,
        children: Vec::new(),
    })
}
