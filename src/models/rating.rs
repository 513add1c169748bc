//! Aggregate scores.
//!
//! The feed uses two incompatible shapes for a rating:
//!
//! - nested: `<ratings><permanent count="42">8.01</permanent>...</ratings>`
//! - flat: `<rating votes="10">7.50</rating>`
//!
//! They are tried in that order. The nested shape wins only when both its
//! count and its text are present; otherwise nothing from it carries over and
//! the flat shape must supply both keys itself.

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::node::{AttributeNode, Fields, FromNode, NodeBuilder, ToNode};

const NESTED_KEY: &str = "permanent";
const NESTED_COUNT_ATTRS: [&str; 2] = ["NodeLinksCount", "count"];
const FLAT_COUNT_ATTR: &str = "votes";

/// Vote count and score. The score stays text so no precision is lost.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Rating {
    pub count: u32,
    pub value: String,
}

impl Rating {
    /// Normalizes an optional rating field. An absent field, or an empty
    /// element such as `<ratings/>`, is a zero rating.
    pub fn from_optional(node: Option<&AttributeNode>) -> Result<Self> {
        match node {
            None => Ok(Self::default()),
            Some(AttributeNode::Scalar(text)) if text.trim().is_empty() => Ok(Self::default()),
            Some(node) => Self::from_node(node),
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.count == 0 && self.value.is_empty()
    }

    /// `None` when any key of the nested shape is missing.
    fn nested(node: &AttributeNode) -> Result<Option<Self>> {
        let fields = Fields::new("rating", node)?;
        let Some(permanent) = fields.opt_node(NESTED_KEY) else {
            return Ok(None);
        };

        let permanent = Fields::new("permanent rating", permanent)?;
        let Some(value) = permanent.opt_text()? else {
            return Ok(None);
        };
        for attr in NESTED_COUNT_ATTRS {
            if let Some(count) = permanent.opt_attr(attr)? {
                return Ok(Some(Self { count, value }));
            }
        }
        Ok(None)
    }

    fn flat(node: &AttributeNode) -> Result<Self> {
        let fields = Fields::new("rating", node)?;
        Ok(Self {
            count: fields.attr(FLAT_COUNT_ATTR)?,
            value: fields.text()?,
        })
    }
}

impl FromNode for Rating {
    fn from_node(node: &AttributeNode) -> Result<Self> {
        match Self::nested(node)? {
            Some(rating) => Ok(rating),
            None => Self::flat(node),
        }
    }
}

impl ToNode for Rating {
    /// Always written in the flat shape.
    fn to_node(&self) -> AttributeNode {
        NodeBuilder::new()
            .attr(FLAT_COUNT_ATTR, self.count)
            .text(&self.value)
            .build()
    }
}
