//! Typed anime metadata, normalized out of [`AttributeNode`](crate::node::AttributeNode) trees.
//!
//! Every entity is built once from its record and never mutated afterwards.
//! Collections keep source order unless noted otherwise; duplicates pass
//! through untouched.

/// Read-only accessors shared by the ordered collection newtypes.
macro_rules! collection_accessors {
    ($set:ident, $item:ty) => {
        impl $set {
            #[must_use]
            pub fn iter(&self) -> std::slice::Iter<'_, $item> {
                self.0.iter()
            }

            #[must_use]
            pub fn len(&self) -> usize {
                self.0.len()
            }

            #[must_use]
            pub fn is_empty(&self) -> bool {
                self.0.is_empty()
            }

            #[must_use]
            pub fn as_slice(&self) -> &[$item] {
                &self.0
            }
        }

        impl<'a> IntoIterator for &'a $set {
            type Item = &'a $item;
            type IntoIter = std::slice::Iter<'a, $item>;

            fn into_iter(self) -> Self::IntoIter {
                self.0.iter()
            }
        }
    };
}

pub mod anime;
pub mod character;
pub mod creator;
pub mod episode;
pub mod rating;
pub mod relation;
pub mod resource;
pub mod tag;
pub mod title;

pub use anime::{AnimeRecord, DESCRIPTION_NOT_AVAILABLE};
pub use character::{MAIN_CHARACTER_ROLE, Character, CharacterSet, CharacterTypeRef, VoiceActor};
pub use creator::{Creator, CreatorSet};
pub use episode::{Episode, EpisodeSet};
pub use rating::Rating;
pub use relation::{RelatedLink, RelationSet};
pub use resource::{ExternalEntity, KNOWN_RESOURCE_KINDS, Resource, ResourceKind, ResourceSet};
pub use tag::{Tag, TagSet};
pub use title::{OFFICIAL_LANGUAGE_PRIORITY, Title, TitleKind, TitleSet};
