use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::node::{AttributeNode, Fields, FromNode, NodeBuilder, ToNode};

/// A staff credit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Creator {
    pub id: u32,
    pub kind: String,
    pub name: String,
}

impl FromNode for Creator {
    fn from_node(node: &AttributeNode) -> Result<Self> {
        let fields = Fields::new("creator", node)?;
        Ok(Self {
            id: fields.attr("id")?,
            kind: fields.attr("type")?,
            name: fields.text()?,
        })
    }
}

impl ToNode for Creator {
    fn to_node(&self) -> AttributeNode {
        NodeBuilder::new()
            .attr("id", self.id)
            .attr("type", &self.kind)
            .text(&self.name)
            .build()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CreatorSet(Vec<Creator>);

collection_accessors!(CreatorSet, Creator);

impl CreatorSet {
    #[must_use]
    pub const fn new(creators: Vec<Creator>) -> Self {
        Self(creators)
    }
}
