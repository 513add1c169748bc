//! Bridge between feed XML and [`AttributeNode`] trees.
//!
//! The reader folds elements into nodes the same way the feed is usually
//! consumed: attributes become `@name` keys, the text body goes under
//! `#text`, repeated child elements collapse into a sequence, and an element
//! carrying nothing but text becomes a plain scalar.

use quick_xml::Reader;
use quick_xml::Writer;
use quick_xml::escape::{EscapeError, unescape};
use quick_xml::events::attributes::AttrError;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use std::collections::BTreeMap;
use std::collections::btree_map::Entry;
use thiserror::Error;

use crate::node::{ATTRIBUTE_PREFIX, AttributeNode, TEXT_KEY, attribute_key};

#[derive(Debug, Error)]
pub enum XmlError {
    #[error("Malformed XML: {0}")]
    Syntax(#[from] quick_xml::Error),

    #[error("Malformed attribute: {0}")]
    Attribute(#[from] AttrError),

    #[error("Invalid escape sequence: {0}")]
    Escape(#[from] EscapeError),

    #[error("Failed to write XML: {0}")]
    Io(#[from] std::io::Error),

    #[error("Closing tag without an open element: {0}")]
    Unbalanced(String),

    #[error("Content after the root element: {0}")]
    TrailingContent(String),

    #[error("Document has no root element")]
    Empty,

    #[error("A {0} cannot be written as a document root")]
    InvalidRoot(&'static str),
}

/// An element that is still being read.
struct Frame {
    name: String,
    attributes: Vec<(String, String)>,
    children: Vec<(String, AttributeNode)>,
    text: String,
}

impl Frame {
    fn open(start: &BytesStart<'_>) -> Result<Self, XmlError> {
        let name = String::from_utf8_lossy(start.name().as_ref()).into_owned();
        let mut attributes = Vec::new();
        for attr in start.attributes() {
            let attr = attr?;
            let key = String::from_utf8_lossy(attr.key.as_ref()).into_owned();
            let raw = String::from_utf8_lossy(&attr.value);
            attributes.push((key, unescape(&raw)?.into_owned()));
        }
        Ok(Self {
            name,
            attributes,
            children: Vec::new(),
            text: String::new(),
        })
    }

    fn close(self) -> (String, AttributeNode) {
        let text = self.text.trim();

        if self.attributes.is_empty() && self.children.is_empty() {
            return (self.name, AttributeNode::scalar(text));
        }

        let mut map = BTreeMap::new();
        for (key, value) in self.attributes {
            map.insert(attribute_key(&key), AttributeNode::Scalar(value));
        }
        for (key, node) in self.children {
            match map.entry(key) {
                Entry::Vacant(slot) => {
                    slot.insert(node);
                }
                Entry::Occupied(mut slot) => match slot.get_mut() {
                    AttributeNode::Sequence(items) => items.push(node),
                    existing => {
                        let first = std::mem::replace(existing, AttributeNode::Sequence(Vec::new()));
                        *existing = AttributeNode::Sequence(vec![first, node]);
                    }
                },
            }
        }
        if !text.is_empty() {
            map.insert(TEXT_KEY.to_string(), AttributeNode::scalar(text));
        }

        (self.name, AttributeNode::Mapping(map))
    }
}

/// Parses an XML document into its root element name and node tree.
pub fn parse_document(xml: &str) -> Result<(String, AttributeNode), XmlError> {
    let mut reader = Reader::from_str(xml);
    let mut stack: Vec<Frame> = Vec::new();
    let mut root: Option<(String, AttributeNode)> = None;

    let mut attach = |stack: &mut Vec<Frame>, closed: (String, AttributeNode)| match stack.last_mut() {
        Some(parent) => {
            parent.children.push(closed);
            Ok(())
        }
        None if root.is_none() => {
            root = Some(closed);
            Ok(())
        }
        None => Err(XmlError::TrailingContent(closed.0)),
    };

    loop {
        match reader.read_event()? {
            Event::Start(start) => stack.push(Frame::open(&start)?),
            Event::Empty(start) => {
                let closed = Frame::open(&start)?.close();
                attach(&mut stack, closed)?;
            }
            Event::End(end) => {
                let frame = stack.pop().ok_or_else(|| {
                    XmlError::Unbalanced(String::from_utf8_lossy(end.name().as_ref()).into_owned())
                })?;
                attach(&mut stack, frame.close())?;
            }
            Event::Text(text) => {
                if let Some(frame) = stack.last_mut() {
                    let raw = String::from_utf8_lossy(&text);
                    frame.text.push_str(&unescape(&raw)?);
                }
            }
            Event::GeneralRef(reference) => {
                if let Some(frame) = stack.last_mut() {
                    let name = String::from_utf8_lossy(&reference);
                    let escaped = format!("&{name};");
                    // Unknown entities are kept verbatim.
                    match unescape(&escaped) {
                        Ok(resolved) => frame.text.push_str(&resolved),
                        Err(_) => frame.text.push_str(&escaped),
                    }
                }
            }
            Event::CData(data) => {
                if let Some(frame) = stack.last_mut() {
                    frame.text.push_str(&String::from_utf8_lossy(&data));
                }
            }
            Event::Eof => break,
            _ => {}
        }
    }

    root.ok_or(XmlError::Empty)
}

/// Writes `node` as a document whose root element is `root`.
pub fn write_document(root: &str, node: &AttributeNode) -> Result<String, XmlError> {
    if let AttributeNode::Sequence(_) = node {
        return Err(XmlError::InvalidRoot(node.kind()));
    }

    let mut writer = Writer::new_with_indent(Vec::new(), b' ', 2);
    writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;
    write_element(&mut writer, root, node)?;

    Ok(String::from_utf8_lossy(&writer.into_inner()).into_owned())
}

fn write_element(
    writer: &mut Writer<Vec<u8>>,
    name: &str,
    node: &AttributeNode,
) -> Result<(), XmlError> {
    match node {
        AttributeNode::Sequence(items) => {
            for item in items {
                write_element(writer, name, item)?;
            }
        }
        AttributeNode::Scalar(text) if text.is_empty() => {
            writer.write_event(Event::Empty(BytesStart::new(name)))?;
        }
        AttributeNode::Scalar(text) => {
            writer.write_event(Event::Start(BytesStart::new(name)))?;
            writer.write_event(Event::Text(BytesText::new(text)))?;
            writer.write_event(Event::End(BytesEnd::new(name)))?;
        }
        AttributeNode::Mapping(map) => {
            let mut start = BytesStart::new(name);
            for (key, value) in map {
                if let (Some(attr), Some(text)) = (key.strip_prefix(ATTRIBUTE_PREFIX), value.as_text())
                {
                    start.push_attribute((attr, text));
                }
            }

            let text = map
                .get(TEXT_KEY)
                .and_then(AttributeNode::as_text)
                .filter(|text| !text.is_empty());
            let children: Vec<_> = map
                .iter()
                .filter(|(key, _)| !key.starts_with(ATTRIBUTE_PREFIX) && key.as_str() != TEXT_KEY)
                .collect();

            if text.is_none() && children.is_empty() {
                writer.write_event(Event::Empty(start))?;
                return Ok(());
            }

            writer.write_event(Event::Start(start))?;
            if let Some(text) = text {
                writer.write_event(Event::Text(BytesText::new(text)))?;
            }
            for (key, child) in children {
                write_element(writer, key, child)?;
            }
            writer.write_event(Event::End(BytesEnd::new(name)))?;
        }
    }
    Ok(())
}
