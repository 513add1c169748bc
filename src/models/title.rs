use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::convert::Infallible;
use std::str::FromStr;

use crate::error::Result;
use crate::node::{AttributeNode, Fields, FromNode, NodeBuilder, ToNode};

/// Languages consulted, in order, when picking the official title.
pub const OFFICIAL_LANGUAGE_PRIORITY: [&str; 2] = ["en", "ja"];

/// What a title entry is used for.
///
/// Episode titles carry no kind at all, hence [`TitleKind::Unset`]. Kinds the
/// model does not know about are kept verbatim in [`TitleKind::Other`].
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum TitleKind {
    Main,
    Synonym,
    Short,
    Official,
    #[default]
    Unset,
    Other(String),
}

impl TitleKind {
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Main => "main",
            Self::Synonym => "synonym",
            Self::Short => "short",
            Self::Official => "official",
            Self::Unset => "",
            Self::Other(kind) => kind,
        }
    }

    #[must_use]
    pub const fn is_unset(&self) -> bool {
        matches!(self, Self::Unset)
    }
}

impl From<&str> for TitleKind {
    fn from(value: &str) -> Self {
        match value {
            "main" => Self::Main,
            "synonym" => Self::Synonym,
            "short" => Self::Short,
            "official" => Self::Official,
            "" => Self::Unset,
            other => Self::Other(other.to_string()),
        }
    }
}

impl FromStr for TitleKind {
    type Err = Infallible;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Ok(Self::from(s))
    }
}

impl Serialize for TitleKind {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for TitleKind {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let kind = String::deserialize(deserializer)?;
        Ok(Self::from(kind.as_str()))
    }
}

/// One localized name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Title {
    pub language: String,
    #[serde(default, skip_serializing_if = "TitleKind::is_unset")]
    pub kind: TitleKind,
    pub text: String,
}

impl FromNode for Title {
    fn from_node(node: &AttributeNode) -> Result<Self> {
        let fields = Fields::new("title", node)?;
        Ok(Self {
            language: fields.attr("xml:lang")?,
            kind: fields.opt_attr("type")?.unwrap_or_default(),
            text: fields.text()?,
        })
    }
}

impl ToNode for Title {
    fn to_node(&self) -> AttributeNode {
        NodeBuilder::new()
            .attr("xml:lang", &self.language)
            .opt_attr("type", (!self.kind.is_unset()).then(|| self.kind.as_str()))
            .text(&self.text)
            .build()
    }
}

/// Titles of one anime or episode, in source order.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TitleSet(Vec<Title>);

collection_accessors!(TitleSet, Title);

impl TitleSet {
    #[must_use]
    pub const fn new(titles: Vec<Title>) -> Self {
        Self(titles)
    }

    /// Text of the first title of kind `main`.
    ///
    /// There should be exactly one, but nothing guarantees it; `None` is an
    /// ordinary answer.
    #[must_use]
    pub fn main(&self) -> Option<&str> {
        self.0
            .iter()
            .find(|title| title.kind == TitleKind::Main)
            .map(|title| title.text.as_str())
    }

    /// Text of the preferred official title.
    ///
    /// Official titles are tried per language in
    /// [`OFFICIAL_LANGUAGE_PRIORITY`] order; failing that, the first official
    /// title in source order wins.
    #[must_use]
    pub fn official(&self) -> Option<&str> {
        OFFICIAL_LANGUAGE_PRIORITY
            .iter()
            .find_map(|language| self.officials().find(|title| title.language == *language))
            .or_else(|| self.officials().next())
            .map(|title| title.text.as_str())
    }

    fn officials(&self) -> impl Iterator<Item = &Title> {
        self.0
            .iter()
            .filter(|title| title.kind == TitleKind::Official)
    }
}

impl From<Vec<Title>> for TitleSet {
    fn from(titles: Vec<Title>) -> Self {
        Self(titles)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn title(language: &str, kind: TitleKind, text: &str) -> Title {
        Title {
            language: language.to_string(),
            kind,
            text: text.to_string(),
        }
    }

    #[test]
    fn test_official_prefers_english_over_japanese() {
        let titles = TitleSet::new(vec![
            title("ja", TitleKind::Official, "Text A"),
            title("en", TitleKind::Official, "Text B"),
        ]);
        assert_eq!(titles.official(), Some("Text B"));
    }

    #[test]
    fn test_official_falls_back_to_japanese() {
        let titles = TitleSet::new(vec![
            title("fr", TitleKind::Official, "Text F"),
            title("ja", TitleKind::Official, "Text J"),
        ]);
        assert_eq!(titles.official(), Some("Text J"));
    }

    #[test]
    fn test_official_falls_back_to_first_in_source_order() {
        let titles = TitleSet::new(vec![
            title("en", TitleKind::Main, "Main"),
            title("fr", TitleKind::Official, "Text C"),
            title("de", TitleKind::Official, "Text D"),
        ]);
        assert_eq!(titles.official(), Some("Text C"));
    }

    #[test]
    fn test_official_none_without_official_titles() {
        let titles = TitleSet::new(vec![
            title("x-jat", TitleKind::Main, "Main"),
            title("en", TitleKind::Synonym, "Syn"),
        ]);
        assert_eq!(titles.official(), None);
    }

    #[test]
    fn test_main_missing_is_none() {
        let titles = TitleSet::new(vec![title("en", TitleKind::Official, "Only")]);
        assert_eq!(titles.main(), None);
        assert_eq!(TitleSet::default().main(), None);
    }

    #[test]
    fn test_main_takes_first_match() {
        let titles = TitleSet::new(vec![
            title("en", TitleKind::Synonym, "Syn"),
            title("x-jat", TitleKind::Main, "First"),
            title("x-jat", TitleKind::Main, "Second"),
        ]);
        assert_eq!(titles.main(), Some("First"));
    }

    #[test]
    fn test_title_from_node_without_type_is_unset() {
        let node = NodeBuilder::new()
            .attr("xml:lang", "en")
            .text("Invasion")
            .build();
        let parsed = Title::from_node(&node).unwrap();
        assert_eq!(parsed, title("en", TitleKind::Unset, "Invasion"));
    }

    #[test]
    fn test_unknown_kind_is_preserved() {
        let node = NodeBuilder::new()
            .attr("xml:lang", "ja")
            .attr("type", "kana")
            .text("せいかい")
            .build();
        let parsed = Title::from_node(&node).unwrap();
        assert_eq!(parsed.kind, TitleKind::Other("kana".to_string()));
        assert_eq!(parsed.to_node(), node);
    }
}
