use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::models::{Rating, ResourceSet, TitleSet};
use crate::node::{AttributeNode, Fields, FromNode, NodeBuilder, ToNode};

/// Numbering kind of a regular episode; specials, credits, trailers and the
/// rest use other codes.
pub const REGULAR_EPISODE_KIND: u32 = 1;

/// One installment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Episode {
    pub id: u32,
    pub update: String,
    pub number_kind: u32,
    /// Episode number as printed by the source, e.g. `12` or `S1`.
    pub number: String,
    /// Length in minutes.
    pub length: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub air_date: Option<String>,
    pub rating: Rating,
    pub titles: TitleSet,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    pub resources: ResourceSet,
}

impl Episode {
    #[must_use]
    pub const fn is_regular(&self) -> bool {
        self.number_kind == REGULAR_EPISODE_KIND
    }
}

impl FromNode for Episode {
    fn from_node(node: &AttributeNode) -> Result<Self> {
        let fields = Fields::new("episode", node)?;
        let epno = Fields::new("episode number", fields.node("epno")?)?;

        Ok(Self {
            id: fields.attr("id")?,
            update: fields.attr("update")?,
            number_kind: epno.attr("type")?,
            number: epno.text()?,
            length: fields.child("length")?,
            air_date: fields.opt_child_text("airdate")?,
            rating: Rating::from_optional(fields.opt_node("rating"))?,
            titles: TitleSet::new(fields.many("title")?),
            summary: fields.opt_child_text("summary")?,
            resources: ResourceSet::new(fields.collection("resources", "resource")?),
        })
    }
}

impl ToNode for Episode {
    fn to_node(&self) -> AttributeNode {
        let epno = NodeBuilder::new()
            .attr("type", self.number_kind)
            .text(&self.number)
            .build();

        NodeBuilder::new()
            .attr("id", self.id)
            .attr("update", &self.update)
            .child("epno", epno)
            .child_text("length", self.length)
            .opt_child_text("airdate", self.air_date.as_ref())
            .opt_child("rating", (!self.rating.is_empty()).then(|| self.rating.to_node()))
            .many("title", self.titles.as_slice())
            .opt_child_text("summary", self.summary.as_ref())
            .collection("resources", "resource", self.resources.as_slice())
            .build()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EpisodeSet(Vec<Episode>);

collection_accessors!(EpisodeSet, Episode);

impl EpisodeSet {
    #[must_use]
    pub const fn new(episodes: Vec<Episode>) -> Self {
        Self(episodes)
    }

    pub fn regular(&self) -> impl Iterator<Item = &Episode> {
        self.0.iter().filter(|episode| episode.is_regular())
    }
}
