use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::node::{AttributeNode, Fields, FromNode, NodeBuilder, ToNode};

/// A classification label attached to an anime.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tag {
    pub id: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<u32>,
    pub weight: u32,
    pub local_spoiler: bool,
    pub global_spoiler: bool,
    pub verified: bool,
    pub update: String,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub infobox: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub picture_url: Option<String>,
}

impl FromNode for Tag {
    fn from_node(node: &AttributeNode) -> Result<Self> {
        let fields = Fields::new("tag", node)?;
        Ok(Self {
            id: fields.attr("id")?,
            parent_id: fields.opt_attr("parentid")?,
            weight: fields.attr("weight")?,
            local_spoiler: fields.attr("localspoiler")?,
            global_spoiler: fields.attr("globalspoiler")?,
            verified: fields.attr("verified")?,
            update: fields.attr("update")?,
            name: fields.child_text("name")?,
            infobox: fields.opt_attr("infobox")?,
            description: fields.opt_child_text("description")?,
            picture_url: fields.opt_child_text("picurl")?,
        })
    }
}

impl ToNode for Tag {
    fn to_node(&self) -> AttributeNode {
        NodeBuilder::new()
            .attr("id", self.id)
            .opt_attr("parentid", self.parent_id)
            .attr("weight", self.weight)
            .attr("localspoiler", self.local_spoiler)
            .attr("globalspoiler", self.global_spoiler)
            .attr("verified", self.verified)
            .attr("update", &self.update)
            .opt_attr("infobox", self.infobox)
            .child_text("name", &self.name)
            .opt_child_text("description", self.description.as_ref())
            .opt_child_text("picurl", self.picture_url.as_ref())
            .build()
    }
}

/// Tags ordered by ascending weight.
///
/// The sort is stable, so tags of equal weight keep their source order. The
/// order is re-established on every construction path, deserialization
/// included.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "Vec<Tag>", into = "Vec<Tag>")]
pub struct TagSet(Vec<Tag>);

collection_accessors!(TagSet, Tag);

impl TagSet {
    #[must_use]
    pub fn new(mut tags: Vec<Tag>) -> Self {
        tags.sort_by_key(|tag| tag.weight);
        Self(tags)
    }

    /// Tag names in the same weight order as the tags.
    #[must_use]
    pub fn names(&self) -> Vec<&str> {
        self.0.iter().map(|tag| tag.name.as_str()).collect()
    }
}

impl From<Vec<Tag>> for TagSet {
    fn from(tags: Vec<Tag>) -> Self {
        Self::new(tags)
    }
}

impl From<TagSet> for Vec<Tag> {
    fn from(set: TagSet) -> Self {
        set.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tag(id: u32, weight: u32, name: &str) -> Tag {
        Tag {
            id,
            parent_id: None,
            weight,
            local_spoiler: false,
            global_spoiler: false,
            verified: true,
            update: "2018-01-21".to_string(),
            name: name.to_string(),
            infobox: None,
            description: None,
            picture_url: None,
        }
    }

    #[test]
    fn test_sorted_by_weight() {
        let tags = TagSet::new(vec![tag(1, 600, "a"), tag(2, 0, "b"), tag(3, 300, "c")]);
        let weights: Vec<_> = tags.iter().map(|t| t.weight).collect();
        assert!(weights.windows(2).all(|pair| pair[0] <= pair[1]));
        assert_eq!(tags.names(), vec!["b", "c", "a"]);
    }

    #[test]
    fn test_ties_keep_source_order() {
        let tags = TagSet::new(vec![
            tag(1, 200, "first"),
            tag(2, 100, "low"),
            tag(3, 200, "second"),
            tag(4, 200, "third"),
        ]);
        assert_eq!(tags.names(), vec!["low", "first", "second", "third"]);
    }

    #[test]
    fn test_input_order_of_distinct_weights_does_not_matter() {
        let forward = TagSet::new(vec![tag(1, 100, "a"), tag(2, 200, "b"), tag(3, 300, "c")]);
        let backward = TagSet::new(vec![tag(3, 300, "c"), tag(2, 200, "b"), tag(1, 100, "a")]);
        assert_eq!(forward, backward);
    }

    #[test]
    fn test_deserialize_restores_order() {
        let json = serde_json::to_string(&vec![tag(1, 500, "heavy"), tag(2, 1, "light")]).unwrap();
        let tags: TagSet = serde_json::from_str(&json).unwrap();
        assert_eq!(tags.names(), vec!["light", "heavy"]);
    }

    #[test]
    fn test_from_node_optional_attributes() {
        let node: AttributeNode = serde_json::from_str(
            r#"{
                "@id": "36", "@parentid": "2604", "@weight": "300", "@infobox": "true",
                "@localspoiler": "false", "@globalspoiler": "false", "@verified": "true",
                "@update": "2018-01-21", "name": "military", "picurl": "211739.jpg"
            }"#,
        )
        .unwrap();
        let parsed = Tag::from_node(&node).unwrap();
        assert_eq!(parsed.parent_id, Some(2604));
        assert_eq!(parsed.infobox, Some(true));
        assert_eq!(parsed.picture_url.as_deref(), Some("211739.jpg"));
        assert_eq!(parsed.description, None);
        assert_eq!(parsed.to_node(), node);
    }

    #[test]
    fn test_missing_weight_fails() {
        let node: AttributeNode = serde_json::from_str(
            r#"{"@id": "1", "@localspoiler": "false", "@globalspoiler": "false",
                "@verified": "false", "@update": "2020-01-01", "name": "x"}"#,
        )
        .unwrap();
        assert!(Tag::from_node(&node).unwrap_err().is_missing_field());
    }
}
