use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::domain::AnimeId;
use crate::error::{NormalizeError, Result};
use crate::models::{
    CharacterSet, CreatorSet, EpisodeSet, ExternalEntity, Rating, RelationSet, ResourceKind,
    ResourceSet, TagSet, TitleSet,
};
use crate::node::{AttributeNode, Fields, FromNode, NodeBuilder, ToNode};
use crate::xml;

/// Stand-in returned by [`AnimeRecord::description_text`] when the source
/// has no description.
pub const DESCRIPTION_NOT_AVAILABLE: &str = "Description Not Available";

const ROOT_ELEMENT: &str = "anime";
const ERROR_ELEMENT: &str = "error";

/// The complete, normalized metadata of one title.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnimeRecord {
    pub id: AnimeId,
    pub restricted: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub media_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub episode_count: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub picture_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    pub titles: TitleSet,
    pub relations: RelationSet,
    pub creators: CreatorSet,
    pub rating: Rating,
    pub resources: ResourceSet,
    pub tags: TagSet,
    pub characters: CharacterSet,
    pub episodes: EpisodeSet,
}

impl AnimeRecord {
    /// Parses and normalizes one `<anime>` document.
    ///
    /// An `<error>` document, which the feed sends instead of data when it
    /// refuses a request, is reported as [`NormalizeError::SourceError`].
    pub fn from_xml(xml: &str) -> Result<Self> {
        let (root, node) = xml::parse_document(xml)?;
        match root.as_str() {
            ROOT_ELEMENT => Self::from_node(&node),
            ERROR_ELEMENT => Err(NormalizeError::SourceError(
                node.as_text().unwrap_or_default().to_string(),
            )),
            other => Err(NormalizeError::UnexpectedRoot(other.to_string())),
        }
    }

    pub fn to_xml(&self) -> Result<String> {
        Ok(xml::write_document(ROOT_ELEMENT, &self.to_node())?)
    }

    #[must_use]
    pub fn main_title(&self) -> Option<&str> {
        self.titles.main()
    }

    #[must_use]
    pub fn official_title(&self) -> Option<&str> {
        self.titles.official()
    }

    /// Best label for display: the official title, else the main one.
    #[must_use]
    pub fn display_title(&self) -> Option<&str> {
        self.official_title().or_else(|| self.main_title())
    }

    #[must_use]
    pub fn description_text(&self) -> &str {
        self.description
            .as_deref()
            .unwrap_or(DESCRIPTION_NOT_AVAILABLE)
    }

    /// MyAnimeList entries for this title. The catalog may list more than
    /// one candidate.
    #[must_use]
    pub fn mal_entities(&self) -> &[ExternalEntity] {
        self.resources.from_type(ResourceKind::MY_ANIME_LIST)
    }

    /// Every MyAnimeList identifier, flattened across entries.
    #[must_use]
    pub fn mal_ids(&self) -> Vec<&str> {
        self.mal_entities()
            .iter()
            .flat_map(|entity| entity.identifiers.iter().map(String::as_str))
            .collect()
    }

    #[must_use]
    pub fn tag_names(&self) -> Vec<&str> {
        self.tags.names()
    }
}

impl FromNode for AnimeRecord {
    fn from_node(node: &AttributeNode) -> Result<Self> {
        let fields = Fields::new("anime", node)?;

        let record = Self {
            id: fields.attr("id")?,
            restricted: fields.opt_attr("restricted")?.unwrap_or(false),
            media_type: fields.opt_child_text("type")?,
            episode_count: fields.opt_child("episodecount")?,
            start_date: fields.opt_child_text("startdate")?,
            end_date: fields.opt_child_text("enddate")?,
            description: fields.opt_child_text("description")?,
            picture_url: fields.opt_child_text("picture")?,
            url: fields.opt_child_text("url")?,
            titles: TitleSet::new(fields.collection("titles", "title")?),
            relations: RelationSet::new(fields.collection("relatedanime", "anime")?),
            creators: CreatorSet::new(fields.collection("creators", "name")?),
            rating: Rating::from_optional(fields.opt_node("ratings"))?,
            resources: ResourceSet::new(fields.collection("resources", "resource")?),
            tags: TagSet::new(fields.collection("tags", "tag")?),
            characters: CharacterSet::new(fields.collection("characters", "character")?),
            episodes: EpisodeSet::new(fields.collection("episodes", "episode")?),
        };

        debug!(
            anime_id = %record.id,
            titles = record.titles.len(),
            relations = record.relations.len(),
            tags = record.tags.len(),
            characters = record.characters.len(),
            episodes = record.episodes.len(),
            "Normalized anime record"
        );

        Ok(record)
    }
}

impl ToNode for AnimeRecord {
    fn to_node(&self) -> AttributeNode {
        NodeBuilder::new()
            .attr("id", self.id)
            .attr("restricted", self.restricted)
            .opt_child_text("type", self.media_type.as_ref())
            .opt_child_text("episodecount", self.episode_count)
            .opt_child_text("startdate", self.start_date.as_ref())
            .opt_child_text("enddate", self.end_date.as_ref())
            .collection("titles", "title", self.titles.as_slice())
            .collection("relatedanime", "anime", self.relations.as_slice())
            .opt_child_text("url", self.url.as_ref())
            .collection("creators", "name", self.creators.as_slice())
            .opt_child_text("description", self.description.as_ref())
            .opt_child("ratings", (!self.rating.is_empty()).then(|| self.rating.to_node()))
            .opt_child_text("picture", self.picture_url.as_ref())
            .collection("resources", "resource", self.resources.as_slice())
            .collection("tags", "tag", self.tags.as_slice())
            .collection("characters", "character", self.characters.as_slice())
            .collection("episodes", "episode", self.episodes.as_slice())
            .build()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::TitleKind;

    const MINIMAL: &str = r#"<anime id="1"><type>TV Series</type></anime>"#;

    #[test]
    fn test_absent_sets_default_to_empty() {
        let record = AnimeRecord::from_xml(MINIMAL).unwrap();

        assert_eq!(record.id, AnimeId::new(1));
        assert!(!record.restricted);
        assert_eq!(record.media_type.as_deref(), Some("TV Series"));
        assert!(record.titles.is_empty());
        assert!(record.relations.is_empty());
        assert!(record.creators.is_empty());
        assert!(record.rating.is_empty());
        assert!(record.resources.is_empty());
        assert!(record.tags.is_empty());
        assert!(record.characters.is_empty());
        assert!(record.episodes.is_empty());
        assert_eq!(record.description_text(), DESCRIPTION_NOT_AVAILABLE);
        assert_eq!(record.main_title(), None);
        assert!(record.mal_entities().is_empty());
    }

    #[test]
    fn test_missing_id_fails() {
        let err = AnimeRecord::from_xml("<anime><type>Movie</type></anime>").unwrap_err();
        assert!(err.is_missing_field());
    }

    #[test]
    fn test_error_document() {
        let err = AnimeRecord::from_xml("<error>Banned</error>").unwrap_err();
        assert!(matches!(err, NormalizeError::SourceError(ref reason) if reason == "Banned"));
    }

    #[test]
    fn test_unexpected_root() {
        let err = AnimeRecord::from_xml("<manga id=\"1\"/>").unwrap_err();
        assert!(matches!(err, NormalizeError::UnexpectedRoot(ref root) if root == "manga"));
    }

    #[test]
    fn test_single_title_container() {
        let record = AnimeRecord::from_xml(
            r#"<anime id="7"><titles><title xml:lang="x-jat" type="main">Solo</title></titles></anime>"#,
        )
        .unwrap();
        assert_eq!(record.titles.len(), 1);
        assert_eq!(record.titles.as_slice()[0].kind, TitleKind::Main);
        assert_eq!(record.display_title(), Some("Solo"));
    }

    #[test]
    fn test_bad_nested_record_aborts_whole_record() {
        let xml = r#"<anime id="1"><tags><tag id="1" weight="heavy" localspoiler="false" globalspoiler="false" verified="true" update="2020-01-01"><name>x</name></tag></tags></anime>"#;
        let err = AnimeRecord::from_xml(xml).unwrap_err();
        assert!(matches!(err, NormalizeError::InvalidValue { entity: "tag", .. }));
    }

    #[test]
    fn test_empty_ratings_element_is_zero_rating() {
        let record = AnimeRecord::from_xml(r#"<anime id="1"><ratings/></anime>"#).unwrap();
        assert!(record.rating.is_empty());
    }
}
