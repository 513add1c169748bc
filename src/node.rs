//! Generic record trees and typed field access over them.
//!
//! Parsed feed records arrive as [`AttributeNode`] trees whose shape is only
//! known at read time. Keys follow the XML convention: attributes carry an
//! `@` prefix, an element's own text body lives under `#text`, and every
//! other key names a child element.
//!
//! Normalizers never touch the raw map directly. They go through [`Fields`],
//! which decides once per field whether it is required or optional and
//! reports failures with the entity and field name attached.

use serde::de::{self, MapAccess, SeqAccess, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use crate::error::{NormalizeError, Result};

/// Prefix that marks a key as an attribute of the element.
pub const ATTRIBUTE_PREFIX: char = '@';

/// Key holding the text body of an element that also has attributes or children.
pub const TEXT_KEY: &str = "#text";

/// Builds the attribute key for `name` (`id` becomes `@id`).
#[must_use]
pub fn attribute_key(name: &str) -> String {
    format!("{ATTRIBUTE_PREFIX}{name}")
}

/// One parsed record, or a piece of one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttributeNode {
    Scalar(String),
    Mapping(BTreeMap<String, AttributeNode>),
    Sequence(Vec<AttributeNode>),
}

impl AttributeNode {
    pub fn scalar(value: impl Into<String>) -> Self {
        Self::Scalar(value.into())
    }

    /// Looks up a key when this node is a mapping.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Self> {
        match self {
            Self::Mapping(map) => map.get(key),
            _ => None,
        }
    }

    /// Text of this node: the scalar itself, or the `#text` entry of a mapping.
    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Scalar(text) => Some(text),
            Self::Mapping(map) => match map.get(TEXT_KEY) {
                Some(Self::Scalar(text)) => Some(text),
                _ => None,
            },
            Self::Sequence(_) => None,
        }
    }

    /// Resolves the single-or-many ambiguity.
    ///
    /// A sequence yields its elements; any other node is treated as a list
    /// holding just itself.
    #[must_use]
    pub fn items(&self) -> &[Self] {
        match self {
            Self::Sequence(items) => items,
            other => std::slice::from_ref(other),
        }
    }

    /// Inverse of [`items`](Self::items): nothing for an empty list, the bare
    /// element for one, a sequence otherwise.
    #[must_use]
    pub fn from_items(mut items: Vec<Self>) -> Option<Self> {
        match items.len() {
            0 => None,
            1 => items.pop(),
            _ => Some(Self::Sequence(items)),
        }
    }

    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Scalar(_) => "scalar",
            Self::Mapping(_) => "mapping",
            Self::Sequence(_) => "sequence",
        }
    }
}

impl From<&str> for AttributeNode {
    fn from(value: &str) -> Self {
        Self::Scalar(value.to_string())
    }
}

impl From<String> for AttributeNode {
    fn from(value: String) -> Self {
        Self::Scalar(value)
    }
}

impl Serialize for AttributeNode {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            Self::Scalar(text) => serializer.serialize_str(text),
            Self::Mapping(map) => map.serialize(serializer),
            Self::Sequence(items) => items.serialize(serializer),
        }
    }
}

struct AttributeNodeVisitor;

impl<'de> Visitor<'de> for AttributeNodeVisitor {
    type Value = AttributeNode;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a scalar, a map or a sequence")
    }

    fn visit_str<E: de::Error>(self, v: &str) -> std::result::Result<Self::Value, E> {
        Ok(AttributeNode::scalar(v))
    }

    fn visit_string<E: de::Error>(self, v: String) -> std::result::Result<Self::Value, E> {
        Ok(AttributeNode::Scalar(v))
    }

    fn visit_bool<E: de::Error>(self, v: bool) -> std::result::Result<Self::Value, E> {
        Ok(AttributeNode::Scalar(v.to_string()))
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> std::result::Result<Self::Value, E> {
        Ok(AttributeNode::Scalar(v.to_string()))
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> std::result::Result<Self::Value, E> {
        Ok(AttributeNode::Scalar(v.to_string()))
    }

    fn visit_f64<E: de::Error>(self, v: f64) -> std::result::Result<Self::Value, E> {
        Ok(AttributeNode::Scalar(v.to_string()))
    }

    fn visit_unit<E: de::Error>(self) -> std::result::Result<Self::Value, E> {
        Ok(AttributeNode::Scalar(String::new()))
    }

    fn visit_seq<A>(self, mut seq: A) -> std::result::Result<Self::Value, A::Error>
    where
        A: SeqAccess<'de>,
    {
        let mut items = Vec::with_capacity(seq.size_hint().unwrap_or(0));
        while let Some(item) = seq.next_element()? {
            items.push(item);
        }
        Ok(AttributeNode::Sequence(items))
    }

    fn visit_map<A>(self, mut access: A) -> std::result::Result<Self::Value, A::Error>
    where
        A: MapAccess<'de>,
    {
        let mut map = BTreeMap::new();
        while let Some((key, value)) = access.next_entry::<String, AttributeNode>()? {
            map.insert(key, value);
        }
        Ok(AttributeNode::Mapping(map))
    }
}

impl<'de> Deserialize<'de> for AttributeNode {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_any(AttributeNodeVisitor)
    }
}

/// Builds a typed value out of one record.
pub trait FromNode: Sized {
    fn from_node(node: &AttributeNode) -> Result<Self>;
}

/// Turns a typed value back into a record using the same key convention
/// that [`FromNode`] reads.
pub trait ToNode {
    fn to_node(&self) -> AttributeNode;
}

impl FromNode for String {
    fn from_node(node: &AttributeNode) -> Result<Self> {
        Fields::new("text", node)?.text()
    }
}

impl ToNode for String {
    fn to_node(&self) -> AttributeNode {
        AttributeNode::Scalar(self.clone())
    }
}

/// Normalizes every element of a single-or-many node.
pub fn collect_items<T: FromNode>(node: &AttributeNode) -> Result<Vec<T>> {
    node.items().iter().map(T::from_node).collect()
}

/// Typed, entity-aware view over one record.
pub struct Fields<'a> {
    entity: &'static str,
    map: Option<&'a BTreeMap<String, AttributeNode>>,
    bare_text: Option<&'a str>,
}

impl<'a> Fields<'a> {
    /// Opens `node` as a record of `entity`.
    ///
    /// A bare scalar is accepted as an element with text and nothing else.
    pub fn new(entity: &'static str, node: &'a AttributeNode) -> Result<Self> {
        match node {
            AttributeNode::Mapping(map) => Ok(Self {
                entity,
                map: Some(map),
                bare_text: None,
            }),
            AttributeNode::Scalar(text) => Ok(Self {
                entity,
                map: None,
                bare_text: Some(text),
            }),
            AttributeNode::Sequence(_) => Err(NormalizeError::ShapeMismatch {
                entity,
                field: String::from("<record>"),
                expected: "a single record",
            }),
        }
    }

    fn missing(&self, key: &str) -> NormalizeError {
        NormalizeError::MissingField {
            entity: self.entity,
            field: key.to_string(),
        }
    }

    fn lookup(&self, key: &str) -> Option<&'a AttributeNode> {
        self.map.and_then(|map| map.get(key))
    }

    fn scalar_at(&self, key: &str) -> Result<Option<&'a str>> {
        let Some(node) = self.lookup(key) else {
            return Ok(None);
        };
        node.as_text()
            .map(Some)
            .ok_or_else(|| NormalizeError::ShapeMismatch {
                entity: self.entity,
                field: key.to_string(),
                expected: "text",
            })
    }

    fn parse<T: FromStr>(&self, key: &str, raw: &str) -> Result<T> {
        raw.trim()
            .parse()
            .map_err(|_| NormalizeError::InvalidValue {
                entity: self.entity,
                field: key.to_string(),
                value: raw.to_string(),
            })
    }

    pub fn attr<T: FromStr>(&self, name: &str) -> Result<T> {
        let key = attribute_key(name);
        let raw = self.scalar_at(&key)?.ok_or_else(|| self.missing(&key))?;
        self.parse(&key, raw)
    }

    pub fn opt_attr<T: FromStr>(&self, name: &str) -> Result<Option<T>> {
        let key = attribute_key(name);
        self.scalar_at(&key)?
            .map(|raw| self.parse(&key, raw))
            .transpose()
    }

    /// The element's own text body.
    pub fn text(&self) -> Result<String> {
        self.opt_text()?.ok_or_else(|| self.missing(TEXT_KEY))
    }

    pub fn opt_text(&self) -> Result<Option<String>> {
        if let Some(text) = self.bare_text {
            return Ok(Some(text.to_string()));
        }
        Ok(self.scalar_at(TEXT_KEY)?.map(str::to_string))
    }

    pub fn child_text(&self, name: &str) -> Result<String> {
        self.opt_child_text(name)?
            .ok_or_else(|| self.missing(name))
    }

    pub fn opt_child_text(&self, name: &str) -> Result<Option<String>> {
        Ok(self.scalar_at(name)?.map(str::to_string))
    }

    pub fn child<T: FromStr>(&self, name: &str) -> Result<T> {
        let raw = self.scalar_at(name)?.ok_or_else(|| self.missing(name))?;
        self.parse(name, raw)
    }

    pub fn opt_child<T: FromStr>(&self, name: &str) -> Result<Option<T>> {
        self.scalar_at(name)?
            .map(|raw| self.parse(name, raw))
            .transpose()
    }

    pub fn node(&self, name: &str) -> Result<&'a AttributeNode> {
        self.lookup(name).ok_or_else(|| self.missing(name))
    }

    #[must_use]
    pub fn opt_node(&self, name: &str) -> Option<&'a AttributeNode> {
        self.lookup(name)
    }

    /// A required nested record.
    pub fn record<T: FromNode>(&self, name: &str) -> Result<T> {
        T::from_node(self.node(name)?)
    }

    /// A child element that appears once or repeatedly; absent means empty.
    pub fn many<T: FromNode>(&self, name: &str) -> Result<Vec<T>> {
        self.lookup(name)
            .map_or_else(|| Ok(Vec::new()), collect_items)
    }

    /// Items wrapped in a container element, e.g. `titles/title`.
    ///
    /// An absent container, an empty container, or a container without any
    /// `item` children all produce an empty list.
    pub fn collection<T: FromNode>(&self, container: &str, item: &str) -> Result<Vec<T>> {
        match self.lookup(container) {
            None => Ok(Vec::new()),
            Some(AttributeNode::Mapping(map)) => {
                map.get(item).map_or_else(|| Ok(Vec::new()), collect_items)
            }
            Some(AttributeNode::Scalar(text)) if text.trim().is_empty() => Ok(Vec::new()),
            Some(_) => Err(NormalizeError::ShapeMismatch {
                entity: self.entity,
                field: container.to_string(),
                expected: "a container record",
            }),
        }
    }
}

/// Accumulates a mapping node field by field.
#[derive(Debug, Default)]
pub struct NodeBuilder {
    map: BTreeMap<String, AttributeNode>,
}

impl NodeBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn attr(mut self, name: &str, value: impl fmt::Display) -> Self {
        self.map
            .insert(attribute_key(name), AttributeNode::Scalar(value.to_string()));
        self
    }

    #[must_use]
    pub fn opt_attr<V: fmt::Display>(self, name: &str, value: Option<V>) -> Self {
        match value {
            Some(value) => self.attr(name, value),
            None => self,
        }
    }

    /// Sets the text body. Empty text is left out, as the XML reader does.
    #[must_use]
    pub fn text(mut self, value: &str) -> Self {
        if !value.is_empty() {
            self.map
                .insert(TEXT_KEY.to_string(), AttributeNode::scalar(value));
        }
        self
    }

    #[must_use]
    pub fn child(mut self, name: &str, node: AttributeNode) -> Self {
        self.map.insert(name.to_string(), node);
        self
    }

    #[must_use]
    pub fn opt_child(self, name: &str, node: Option<AttributeNode>) -> Self {
        match node {
            Some(node) => self.child(name, node),
            None => self,
        }
    }

    #[must_use]
    pub fn child_text(self, name: &str, value: impl fmt::Display) -> Self {
        self.child(name, AttributeNode::Scalar(value.to_string()))
    }

    #[must_use]
    pub fn opt_child_text<V: fmt::Display>(self, name: &str, value: Option<V>) -> Self {
        match value {
            Some(value) => self.child_text(name, value),
            None => self,
        }
    }

    /// Repeated child elements; one item is written bare, none is left out.
    #[must_use]
    pub fn many<T: ToNode>(self, name: &str, items: &[T]) -> Self {
        let node = AttributeNode::from_items(items.iter().map(ToNode::to_node).collect());
        self.opt_child(name, node)
    }

    /// Repeated `item` elements inside a `container` element.
    #[must_use]
    pub fn collection<T: ToNode>(self, container: &str, item: &str, items: &[T]) -> Self {
        if items.is_empty() {
            return self;
        }
        let inner = Self::new().many(item, items).build();
        self.child(container, inner)
    }

    #[must_use]
    pub fn build(self) -> AttributeNode {
        AttributeNode::Mapping(self.map)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, PartialEq)]
    struct Named {
        id: u32,
        name: String,
    }

    impl FromNode for Named {
        fn from_node(node: &AttributeNode) -> Result<Self> {
            let fields = Fields::new("named", node)?;
            Ok(Self {
                id: fields.attr("id")?,
                name: fields.text()?,
            })
        }
    }

    fn named(id: u32, name: &str) -> AttributeNode {
        NodeBuilder::new().attr("id", id).text(name).build()
    }

    #[test]
    fn test_items_wraps_single_record() {
        let single = named(1, "one");
        assert_eq!(single.items().len(), 1);

        let many = AttributeNode::Sequence(vec![named(1, "one"), named(2, "two")]);
        assert_eq!(many.items().len(), 2);
    }

    #[test]
    fn test_single_and_many_extract_same_fields() {
        let single = NodeBuilder::new().child("item", named(7, "seven")).build();
        let many = NodeBuilder::new()
            .child(
                "item",
                AttributeNode::Sequence(vec![named(7, "seven"), named(8, "eight")]),
            )
            .build();

        let single: Vec<Named> = Fields::new("holder", &single).unwrap().many("item").unwrap();
        let many: Vec<Named> = Fields::new("holder", &many).unwrap().many("item").unwrap();

        assert_eq!(single.len(), 1);
        assert_eq!(many.len(), 2);
        assert_eq!(single[0], many[0]);
    }

    #[test]
    fn test_missing_field_names_entity_and_key() {
        let node = NodeBuilder::new().text("nameless").build();
        let err = Named::from_node(&node).unwrap_err();
        match err {
            NormalizeError::MissingField { entity, field } => {
                assert_eq!(entity, "named");
                assert_eq!(field, "@id");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_invalid_value_is_reported() {
        let node = NodeBuilder::new().attr("id", "abc").text("x").build();
        let err = Named::from_node(&node).unwrap_err();
        assert!(matches!(err, NormalizeError::InvalidValue { ref value, .. } if value == "abc"));
    }

    #[test]
    fn test_sequence_where_text_expected_is_shape_mismatch() {
        let node = NodeBuilder::new()
            .attr("id", 1)
            .child(
                TEXT_KEY,
                AttributeNode::Sequence(vec!["a".into(), "b".into()]),
            )
            .build();
        let err = Named::from_node(&node).unwrap_err();
        assert!(matches!(err, NormalizeError::ShapeMismatch { .. }));
    }

    #[test]
    fn test_collection_absent_or_empty_is_empty() {
        let absent = NodeBuilder::new().build();
        let empty = NodeBuilder::new().child_text("items", "").build();
        let no_items = NodeBuilder::new()
            .child("items", NodeBuilder::new().build())
            .build();

        for node in [absent, empty, no_items] {
            let items: Vec<Named> = Fields::new("holder", &node)
                .unwrap()
                .collection("items", "item")
                .unwrap();
            assert!(items.is_empty());
        }
    }

    #[test]
    fn test_builder_writes_single_item_bare() {
        let node = NodeBuilder::new()
            .many("item", &[Wrapper(named(1, "one"))])
            .build();
        assert!(matches!(node.get("item"), Some(AttributeNode::Mapping(_))));

        let node = NodeBuilder::new().many::<Wrapper>("item", &[]).build();
        assert!(node.get("item").is_none());
    }

    struct Wrapper(AttributeNode);

    impl ToNode for Wrapper {
        fn to_node(&self) -> AttributeNode {
            self.0.clone()
        }
    }

    #[test]
    fn test_deserialize_from_json_accepts_numbers() {
        let node: AttributeNode =
            serde_json::from_str(r##"{"@votes": 10, "#text": "7.50", "list": [1, "two"]}"##).unwrap();
        assert_eq!(node.get("@votes"), Some(&AttributeNode::scalar("10")));
        assert_eq!(node.as_text(), Some("7.50"));
        assert_eq!(node.get("list").map(|n| n.items().len()), Some(2));
    }
}
