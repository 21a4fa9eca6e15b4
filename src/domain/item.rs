//! Item metadata as returned by the remote catalog.
//!
//! The shapes follow the MangaDex `manga` resource closely so that the
//! gateway can deserialize straight into them.

use std::collections::BTreeMap;

use serde::{Deserialize, Deserializer, Serialize};

/// Locale preferred for every display field
pub const PREFERRED_LOCALE: &str = "en";

/// A locale -> text map (e.g. `{"en": "Berserk", "ja": "ベルセルク"}`)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct LocalizedText(BTreeMap<String, String>);

impl LocalizedText {
    /// Text for a locale, ignoring empty strings
    pub fn get(&self, locale: &str) -> Option<&str> {
        self.0
            .get(locale)
            .map(String::as_str)
            .filter(|text| !text.trim().is_empty())
    }

    /// Text in the preferred locale
    pub fn preferred(&self) -> Option<&str> {
        self.get(PREFERRED_LOCALE)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for LocalizedText {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(locale, text)| (locale.into(), text.into()))
                .collect(),
        )
    }
}

impl<'de> Deserialize<'de> for LocalizedText {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        // The API serializes an empty map as `[]`
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Map(BTreeMap<String, Option<String>>),
            List(#[allow(dead_code)] Vec<serde::de::IgnoredAny>),
        }

        let texts = match Option::<Raw>::deserialize(deserializer)? {
            Some(Raw::Map(map)) => map
                .into_iter()
                .filter_map(|(locale, text)| text.map(|t| (locale, t)))
                .collect(),
            Some(Raw::List(_)) | None => BTreeMap::new(),
        };

        Ok(Self(texts))
    }
}

/// Kind of a relationship entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RelationshipKind {
    CoverArt,
    Author,
    Artist,
    #[serde(other)]
    Other,
}

/// Link from an item to another remote resource
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Relationship {
    pub id: String,

    #[serde(rename = "type")]
    pub kind: RelationshipKind,
}

impl Relationship {
    pub fn new(kind: RelationshipKind, id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            kind,
        }
    }
}

/// Genre tag
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tag {
    #[serde(default)]
    pub id: String,

    #[serde(default)]
    pub attributes: TagAttributes,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TagAttributes {
    #[serde(default)]
    pub name: LocalizedText,
}

impl Tag {
    /// Create a tag with the given localized names
    pub fn named(id: impl Into<String>, name: LocalizedText) -> Self {
        Self {
            id: id.into(),
            attributes: TagAttributes { name },
        }
    }
}

/// Descriptive attributes of an item
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemAttributes {
    #[serde(default)]
    pub title: LocalizedText,

    #[serde(default)]
    pub alt_titles: Vec<LocalizedText>,

    #[serde(default)]
    pub description: LocalizedText,

    #[serde(default)]
    pub tags: Vec<Tag>,

    #[serde(default)]
    pub year: Option<i32>,

    #[serde(default)]
    pub status: Option<String>,
}

/// A catalog item (one manga title)
///
/// Immutable once fetched; every load fetches a fresh record.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemRecord {
    pub id: String,

    #[serde(default)]
    pub attributes: ItemAttributes,

    #[serde(default)]
    pub relationships: Vec<Relationship>,
}

impl ItemRecord {
    /// Create a bare record with no attributes
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            ..Default::default()
        }
    }

    /// Add a relationship
    pub fn with_relationship(mut self, kind: RelationshipKind, id: impl Into<String>) -> Self {
        self.relationships.push(Relationship::new(kind, id));
        self
    }

    /// Set the localized title
    pub fn with_title(mut self, title: LocalizedText) -> Self {
        self.attributes.title = title;
        self
    }

    /// First relationship of the given kind
    pub fn first_relationship(&self, kind: RelationshipKind) -> Option<&Relationship> {
        self.relationships.iter().find(|r| r.kind == kind)
    }

    /// Id of the linked cover art, if any
    pub fn cover_id(&self) -> Option<&str> {
        self.first_relationship(RelationshipKind::CoverArt)
            .map(|r| r.id.as_str())
    }

    /// Id of the first linked author, if any
    pub fn author_id(&self) -> Option<&str> {
        self.first_relationship(RelationshipKind::Author)
            .map(|r| r.id.as_str())
    }
}

/// A cover image file belonging to an item
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CoverAsset {
    pub file_name: String,
}

impl CoverAsset {
    pub fn new(file_name: impl Into<String>) -> Self {
        Self {
            file_name: file_name.into(),
        }
    }

    /// Public URL of this cover for the owning item
    pub fn url(&self, asset_host: &str, item_id: &str) -> String {
        format!(
            "{}/covers/{}/{}",
            asset_host.trim_end_matches('/'),
            item_id,
            self.file_name
        )
    }
}
