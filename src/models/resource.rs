use serde::{Deserialize, Serialize};
use std::fmt;
use std::num::ParseIntError;
use std::str::FromStr;

use crate::error::Result;
use crate::node::{AttributeNode, Fields, FromNode, NodeBuilder, ToNode};

/// Resource kinds documented by the feed. Kept as data: the code space is
/// open and unknown kinds must pass through.
pub const KNOWN_RESOURCE_KINDS: &[(u32, &str)] = &[
    (1, "Anime News Network"),
    (2, "MyAnimeList"),
    (4, "Official website"),
    (5, "Funimation"),
    (6, "Wikipedia (English)"),
    (7, "Wikipedia (Japanese)"),
    (8, "Syoboi Calendar"),
    (9, "allcinema"),
    (10, "anison.info"),
    (11, "lain.gr.jp"),
    (23, "Twitter"),
    (28, "Crunchyroll"),
    (32, "Amazon Prime Video"),
];

/// Code identifying which external catalog a resource points at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ResourceKind(u32);

impl ResourceKind {
    pub const ANIME_NEWS_NETWORK: Self = Self(1);
    pub const MY_ANIME_LIST: Self = Self(2);
    pub const OFFICIAL_WEBSITE: Self = Self(4);

    #[must_use]
    pub const fn new(code: u32) -> Self {
        Self(code)
    }

    #[must_use]
    pub const fn code(&self) -> u32 {
        self.0
    }

    /// Display name when the kind is one of [`KNOWN_RESOURCE_KINDS`].
    #[must_use]
    pub fn name(&self) -> Option<&'static str> {
        KNOWN_RESOURCE_KINDS
            .iter()
            .find(|(code, _)| *code == self.0)
            .map(|(_, name)| *name)
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for ResourceKind {
    type Err = ParseIntError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        s.parse().map(Self)
    }
}

impl From<u32> for ResourceKind {
    fn from(code: u32) -> Self {
        Self(code)
    }
}

/// One entry in an external catalog. Either list may repeat or be empty.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ExternalEntity {
    pub identifiers: Vec<String>,
    pub urls: Vec<String>,
}

impl FromNode for ExternalEntity {
    fn from_node(node: &AttributeNode) -> Result<Self> {
        let fields = Fields::new("external entity", node)?;
        Ok(Self {
            identifiers: fields.many("identifier")?,
            urls: fields.many("url")?,
        })
    }
}

impl ToNode for ExternalEntity {
    fn to_node(&self) -> AttributeNode {
        NodeBuilder::new()
            .many("identifier", &self.identifiers)
            .many("url", &self.urls)
            .build()
    }
}

/// External reference of one kind.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Resource {
    pub kind: ResourceKind,
    pub external_entities: Vec<ExternalEntity>,
}

impl FromNode for Resource {
    fn from_node(node: &AttributeNode) -> Result<Self> {
        let fields = Fields::new("resource", node)?;
        let kind: ResourceKind = fields.attr("type")?;
        if kind.name().is_none() {
            tracing::debug!(kind = kind.code(), "Keeping resource of unknown kind");
        }
        Ok(Self {
            kind,
            external_entities: fields.many("externalentity")?,
        })
    }
}

impl ToNode for Resource {
    fn to_node(&self) -> AttributeNode {
        NodeBuilder::new()
            .attr("type", self.kind)
            .many("externalentity", &self.external_entities)
            .build()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ResourceSet(Vec<Resource>);

collection_accessors!(ResourceSet, Resource);

impl ResourceSet {
    #[must_use]
    pub const fn new(resources: Vec<Resource>) -> Self {
        Self(resources)
    }

    /// External entities of the first resource of `kind`.
    ///
    /// Always a list, even when the source held a single bare entity; empty
    /// when no resource of that kind exists.
    #[must_use]
    pub fn from_type(&self, kind: ResourceKind) -> &[ExternalEntity] {
        self.0
            .iter()
            .find(|resource| resource.kind == kind)
            .map(|resource| resource.external_entities.as_slice())
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn resources(json: &str) -> ResourceSet {
        let node: AttributeNode = serde_json::from_str(json).unwrap();
        ResourceSet::new(crate::node::collect_items(&node).unwrap())
    }

    #[test]
    fn test_from_type_wraps_bare_entity() {
        let set = resources(r#"{"@type": "2", "externalentity": {"identifier": "290"}}"#);
        let entities = set.from_type(ResourceKind::new(2));
        assert_eq!(entities.len(), 1);
        assert_eq!(entities[0].identifiers, vec!["290".to_string()]);
    }

    #[test]
    fn test_from_type_keeps_every_candidate() {
        let set = resources(
            r#"[
                {"@type": "1", "externalentity": {"identifier": "13"}},
                {"@type": "2", "externalentity": [{"identifier": "290"}, {"identifier": "291"}]}
            ]"#,
        );
        let ids: Vec<_> = set
            .from_type(ResourceKind::MY_ANIME_LIST)
            .iter()
            .flat_map(|entity| entity.identifiers.iter().map(String::as_str))
            .collect();
        assert_eq!(ids, vec!["290", "291"]);
    }

    #[test]
    fn test_from_type_without_match_is_empty() {
        let set = resources(r#"{"@type": "4", "externalentity": {"url": "http://example.jp/"}}"#);
        assert!(set.from_type(ResourceKind::MY_ANIME_LIST).is_empty());
        assert!(ResourceSet::default().from_type(ResourceKind::new(2)).is_empty());
    }

    #[test]
    fn test_unknown_kind_round_trips() {
        let node: AttributeNode =
            serde_json::from_str(r#"{"@type": "9999", "externalentity": {"identifier": "x"}}"#).unwrap();
        let resource = Resource::from_node(&node).unwrap();
        assert_eq!(resource.kind.code(), 9999);
        assert_eq!(resource.kind.name(), None);
        assert_eq!(resource.to_node(), node);
    }

    #[test]
    fn test_known_kind_names() {
        assert_eq!(ResourceKind::MY_ANIME_LIST.name(), Some("MyAnimeList"));
        assert_eq!(ResourceKind::new(28).name(), Some("Crunchyroll"));
    }
}
