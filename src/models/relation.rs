use serde::{Deserialize, Serialize};

use crate::domain::AnimeId;
use crate::error::Result;
use crate::node::{AttributeNode, Fields, FromNode, NodeBuilder, ToNode};

/// Edge to another anime, e.g. a sequel or a summary.
///
/// The target is carried as a foreign id only; nothing here resolves it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RelatedLink {
    pub id: AnimeId,
    pub kind: String,
    pub text: String,
}

impl FromNode for RelatedLink {
    fn from_node(node: &AttributeNode) -> Result<Self> {
        let fields = Fields::new("related anime", node)?;
        Ok(Self {
            id: fields.attr("id")?,
            kind: fields.attr("type")?,
            text: fields.text()?,
        })
    }
}

impl ToNode for RelatedLink {
    fn to_node(&self) -> AttributeNode {
        NodeBuilder::new()
            .attr("id", self.id)
            .attr("type", &self.kind)
            .text(&self.text)
            .build()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RelationSet(Vec<RelatedLink>);

collection_accessors!(RelationSet, RelatedLink);

impl RelationSet {
    #[must_use]
    pub const fn new(links: Vec<RelatedLink>) -> Self {
        Self(links)
    }

    /// Links whose relation kind matches `kind`, ignoring ASCII case.
    pub fn of_kind<'a>(&'a self, kind: &'a str) -> impl Iterator<Item = &'a RelatedLink> {
        self.0
            .iter()
            .filter(move |link| link.kind.eq_ignore_ascii_case(kind))
    }
}
