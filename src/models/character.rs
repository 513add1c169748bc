use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::models::Rating;
use crate::node::{AttributeNode, Fields, FromNode, NodeBuilder, ToNode};

/// Classification of a character entry (character, mecha, organization, ...).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CharacterTypeRef {
    pub id: u32,
    pub name: String,
}

impl FromNode for CharacterTypeRef {
    fn from_node(node: &AttributeNode) -> Result<Self> {
        let fields = Fields::new("character type", node)?;
        Ok(Self {
            id: fields.attr("id")?,
            name: fields.text()?,
        })
    }
}

impl ToNode for CharacterTypeRef {
    fn to_node(&self) -> AttributeNode {
        NodeBuilder::new()
            .attr("id", self.id)
            .text(&self.name)
            .build()
    }
}

/// A voice-cast credit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VoiceActor {
    pub id: u32,
    pub picture: String,
    pub name: String,
}

impl FromNode for VoiceActor {
    fn from_node(node: &AttributeNode) -> Result<Self> {
        let fields = Fields::new("voice actor", node)?;
        Ok(Self {
            id: fields.attr("id")?,
            picture: fields.attr("picture")?,
            name: fields.text()?,
        })
    }
}

impl ToNode for VoiceActor {
    fn to_node(&self) -> AttributeNode {
        NodeBuilder::new()
            .attr("id", self.id)
            .attr("picture", &self.picture)
            .text(&self.name)
            .build()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Character {
    pub id: u32,
    pub kind: String,
    pub update: String,
    pub rating: Rating,
    pub name: String,
    pub gender: String,
    pub character_type: CharacterTypeRef,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub picture: String,
    pub voice_actors: Vec<VoiceActor>,
}

impl FromNode for Character {
    fn from_node(node: &AttributeNode) -> Result<Self> {
        let fields = Fields::new("character", node)?;
        Ok(Self {
            id: fields.attr("id")?,
            kind: fields.attr("type")?,
            update: fields.attr("update")?,
            rating: Rating::from_optional(fields.opt_node("rating"))?,
            name: fields.child_text("name")?,
            gender: fields.child_text("gender")?,
            character_type: fields.record("charactertype")?,
            description: fields.opt_child_text("description")?,
            picture: fields.child_text("picture")?,
            voice_actors: fields.many("seiyuu")?,
        })
    }
}

impl ToNode for Character {
    fn to_node(&self) -> AttributeNode {
        NodeBuilder::new()
            .attr("id", self.id)
            .attr("type", &self.kind)
            .attr("update", &self.update)
            .opt_child("rating", (!self.rating.is_empty()).then(|| self.rating.to_node()))
            .child_text("name", &self.name)
            .child_text("gender", &self.gender)
            .child("charactertype", self.character_type.to_node())
            .opt_child_text("description", self.description.as_ref())
            .child_text("picture", &self.picture)
            .many("seiyuu", &self.voice_actors)
            .build()
    }
}

/// Role of the leading cast.
pub const MAIN_CHARACTER_ROLE: &str = "main character in";

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CharacterSet(Vec<Character>);

collection_accessors!(CharacterSet, Character);

impl CharacterSet {
    #[must_use]
    pub const fn new(characters: Vec<Character>) -> Self {
        Self(characters)
    }

    /// Characters credited with the given role, e.g. `main character in`.
    pub fn with_role<'a>(&'a self, kind: &'a str) -> impl Iterator<Item = &'a Character> {
        self.0.iter().filter(move |character| character.kind == kind)
    }
}
