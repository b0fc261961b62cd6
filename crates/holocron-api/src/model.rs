//! Wire DTOs for the character dataset plus the small projections the views
//! pass around.

use serde::{Deserialize, Serialize};

/// One character as returned by the list and detail endpoints.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entry {
    pub name: String,
    /// Canonical reference, e.g. `https://swapi.dev/api/people/1/`.
    pub url: String,
    #[serde(default)]
    pub gender: String,
    /// Reference to the planet resource.
    #[serde(default)]
    pub homeworld: String,
    #[serde(default)]
    pub films: Vec<String>,
    #[serde(default)]
    pub starships: Vec<String>,
    #[serde(default)]
    pub height: String,
    #[serde(default)]
    pub hair_color: String,
    #[serde(default)]
    pub eye_color: String,
}

impl Entry {
    /// Identifier taken from the canonical reference.
    pub fn id(&self) -> String {
        id_from_url(&self.url).to_string()
    }

    /// Navigation state for the detail view. `home_planet` is whatever the
    /// caller already resolved for the homeworld reference.
    pub fn forward(&self, home_planet: Option<String>) -> ForwardedEntry {
        ForwardedEntry {
            name: self.name.clone(),
            gender: self.gender.clone(),
            home_planet,
            films: self.films.clone(),
            starships: self.starships.clone(),
            height: self.height.clone(),
            hair_color: self.hair_color.clone(),
            eye_color: self.eye_color.clone(),
        }
    }
}

/// The path segment preceding the trailing slash: `…/people/12/` → `12`.
/// A reference without a trailing slash yields its last segment.
pub fn id_from_url(url: &str) -> &str {
    url.trim_end_matches('/').rsplit('/').next().unwrap_or_default()
}

/// One page of the `people` collection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListPage {
    pub count: u32,
    #[serde(default)]
    pub next: Option<String>,
    #[serde(default)]
    pub previous: Option<String>,
    pub results: Vec<Entry>,
}

/// Semantic role of a reference embedded in an entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReferenceKind {
    Homeworld,
    Film,
    Starship,
}

impl ReferenceKind {
    pub fn label(self) -> &'static str {
        match self {
            Self::Homeworld => "homeworld",
            Self::Film => "films",
            Self::Starship => "starships",
        }
    }
}

/// Any resource fetched by reference. Only the display fields are kept.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReferenceRecord {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
}

impl ReferenceRecord {
    /// Films carry a `title`; planets and starships a `name`.
    pub fn display(&self, kind: ReferenceKind) -> Option<&str> {
        match kind {
            ReferenceKind::Film => self.title.as_deref(),
            ReferenceKind::Homeworld | ReferenceKind::Starship => self.name.as_deref(),
        }
    }
}

/// Fields carried from a card to the detail view so the base entry is never
/// refetched. Direct navigation gets `Default::default()`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ForwardedEntry {
    pub name: String,
    pub gender: String,
    pub home_planet: Option<String>,
    pub films: Vec<String>,
    pub starships: Vec<String>,
    pub height: String,
    pub hair_color: String,
    pub eye_color: String,
}

/// Reduced projection stored in the favourites list.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FavouriteEntry {
    pub id: String,
    pub name: String,
    pub gender: String,
    pub height: String,
    pub home_planet: String,
}

impl FavouriteEntry {
    pub fn from_forwarded(id: &str, fields: &ForwardedEntry) -> Self {
        Self {
            id: id.to_string(),
            name: fields.name.clone(),
            gender: fields.gender.clone(),
            height: fields.height.clone(),
            home_planet: fields.home_planet.clone().unwrap_or_default(),
        }
    }

    /// What the detail view receives when opened from the favourites list.
    pub fn forward(&self) -> ForwardedEntry {
        ForwardedEntry {
            name: self.name.clone(),
            gender: self.gender.clone(),
            home_planet: Some(self.home_planet.clone()).filter(|p| !p.is_empty()),
            height: self.height.clone(),
            ..ForwardedEntry::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const LUKE: &str = r#"{
        "name": "Luke Skywalker",
        "height": "172",
        "hair_color": "blond",
        "eye_color": "blue",
        "gender": "male",
        "homeworld": "https://swapi.dev/api/planets/1/",
        "films": ["https://swapi.dev/api/films/1/", "https://swapi.dev/api/films/2/"],
        "starships": ["https://swapi.dev/api/starships/12/"],
        "url": "https://swapi.dev/api/people/1/"
    }"#;

    #[test]
    fn id_is_segment_before_trailing_slash() {
        assert_eq!(id_from_url("https://swapi.dev/api/people/1/"), "1");
        assert_eq!(id_from_url("https://swapi.dev/api/people/83/"), "83");
        assert_eq!(id_from_url("https://swapi.dev/api/people/83"), "83");
        assert_eq!(id_from_url(""), "");
    }

    #[test]
    fn entry_decodes_and_ignores_unknown_fields() {
        let json = LUKE.replace("\"url\"", "\"mass\": \"77\", \"url\"");
        let entry: Entry = serde_json::from_str(&json).unwrap();
        assert_eq!(entry.id(), "1");
        assert_eq!(entry.films.len(), 2);
        assert_eq!(entry.hair_color, "blond");
    }

    #[test]
    fn entry_without_reference_lists_decodes_empty() {
        let entry: Entry =
            serde_json::from_str(r#"{"name":"R2-D2","url":"https://swapi.dev/api/people/3/"}"#)
                .unwrap();
        assert!(entry.films.is_empty());
        assert!(entry.starships.is_empty());
        assert_eq!(entry.gender, "");
    }

    #[test]
    fn reference_display_picks_field_by_role() {
        let film: ReferenceRecord =
            serde_json::from_str(r#"{"title":"A New Hope","episode_id":4}"#).unwrap();
        assert_eq!(film.display(ReferenceKind::Film), Some("A New Hope"));
        assert_eq!(film.display(ReferenceKind::Starship), None);

        let planet: ReferenceRecord = serde_json::from_str(r#"{"name":"Tatooine"}"#).unwrap();
        assert_eq!(planet.display(ReferenceKind::Homeworld), Some("Tatooine"));
    }

    #[test]
    fn forwarding_carries_known_fields() {
        let entry: Entry = serde_json::from_str(LUKE).unwrap();
        let fwd = entry.forward(Some("Tatooine".into()));
        assert_eq!(fwd.name, "Luke Skywalker");
        assert_eq!(fwd.home_planet.as_deref(), Some("Tatooine"));
        assert_eq!(fwd.starships, vec!["https://swapi.dev/api/starships/12/"]);

        let fav = FavouriteEntry::from_forwarded("1", &fwd);
        assert_eq!(fav.home_planet, "Tatooine");
        assert_eq!(fav.height, "172");

        let back = fav.forward();
        assert!(back.films.is_empty());
        assert_eq!(back.home_planet.as_deref(), Some("Tatooine"));
    }

    #[test]
    fn favourite_from_blank_navigation_state() {
        let fav = FavouriteEntry::from_forwarded("7", &ForwardedEntry::default());
        assert_eq!(fav.id, "7");
        assert_eq!(fav.name, "");
        assert_eq!(fav.home_planet, "");
        assert_eq!(fav.forward().home_planet, None);
    }
}
