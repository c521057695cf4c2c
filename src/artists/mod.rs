use serde::{Deserialize, Serialize};
use std::fmt;

pub mod filter;
pub mod matcher;
pub mod registration;

/// Categories the marketplace knows about. Backend records may carry others.
pub const CATEGORIES: [&str; 12] = [
    "Singer",
    "Band",
    "DJ",
    "Dancer",
    "Magician",
    "Comedian",
    "Painter",
    "Speaker",
    "Musician",
    "Poet",
    "Solo Artist",
    "Other",
];

/// Backend identifiers come either as JSON numbers or as strings
#[derive(Clone, Debug, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(untagged)]
pub enum ArtistId {
    Number(u64),
    Text(String),
}

impl fmt::Display for ArtistId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArtistId::Number(n) => write!(f, "{}", n),
            ArtistId::Text(s) => f.write_str(s),
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Artist {
    /// Identity key, unique within a collection
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<ArtistId>,

    /// Name as displayed on the artist card
    #[serde(default)]
    pub name: String,

    #[serde(default)]
    pub category: Option<String>,

    /// Free text, searched alongside the name
    #[serde(default)]
    pub bio: Option<String>,

    /// Fee band as entered by the artist, e.g. `500-1000` or `$400-600`
    #[serde(default)]
    pub price_range: Option<String>,

    /// City and/or region
    #[serde(default)]
    pub location: Option<String>,

    #[serde(default)]
    pub languages: Vec<String>,

    // Display-only fields below, never consulted when filtering
    #[serde(default)]
    pub image: Option<String>,

    #[serde(default)]
    pub rating: Option<f32>,

    #[serde(default)]
    pub completed_events: Option<u32>,

    #[serde(default)]
    pub verified: Option<bool>,
}

impl Artist {
    pub fn new<S: Into<String>>(id: ArtistId, name: S) -> Self {
        Self {
            id: Some(id),
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn category(&self) -> &str {
        self.category.as_deref().unwrap_or("")
    }

    pub fn bio(&self) -> &str {
        self.bio.as_deref().unwrap_or("")
    }

    pub fn price_range(&self) -> &str {
        self.price_range.as_deref().unwrap_or("")
    }

    pub fn location(&self) -> &str {
        self.location.as_deref().unwrap_or("")
    }
}

impl fmt::Display for Artist {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)?;
        if !self.category().is_empty() {
            write!(f, " [{}]", self.category())?;
        }
        if !self.location().is_empty() {
            write!(f, " - {}", self.location())?;
        }
        if !self.price_range().is_empty() {
            write!(f, " ({})", self.price_range())?;
        }
        if self.verified.unwrap_or(false) {
            f.write_str(" ✓")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deserializes_camel_case_record() {
        let artist: Artist = serde_json::from_str(
            r#"{
                "id": "7",
                "name": "Amy",
                "category": "Singer",
                "priceRange": "500-1000",
                "completedEvents": 42,
                "languages": ["English", "Spanish"],
                "verified": true
            }"#,
        )
        .unwrap();

        assert_eq!(artist.id, Some(ArtistId::Text("7".into())));
        assert_eq!(artist.price_range(), "500-1000");
        assert_eq!(artist.completed_events, Some(42));
        assert_eq!(artist.languages.len(), 2);
    }

    #[test]
    fn missing_fields_read_as_empty() {
        let artist: Artist = serde_json::from_str(r#"{"id": 3, "name": "Bo"}"#).unwrap();

        assert_eq!(artist.id, Some(ArtistId::Number(3)));
        assert_eq!(artist.bio(), "");
        assert_eq!(artist.location(), "");
        assert_eq!(artist.category(), "");
        assert!(artist.languages.is_empty());
    }

    #[test]
    fn display_skips_empty_fields() {
        let mut artist = Artist::new(ArtistId::Number(1), "Amy");
        assert_eq!(artist.to_string(), "Amy");

        artist.category = Some("Singer".into());
        artist.location = Some("New York".into());
        assert_eq!(artist.to_string(), "Amy [Singer] - New York");
    }
}
