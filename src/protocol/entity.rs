use std::fmt;

/// Streaming platforms a link can be converted between.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Platform {
    Apple,
    Spotify,
    Yandex,
    YouTube,
}

impl Platform {
    pub const ALL: [Platform; 4] = [
        Platform::Apple,
        Platform::Spotify,
        Platform::Yandex,
        Platform::YouTube,
    ];

    /// Two-character code used in callback data.
    pub fn code(self) -> &'static str {
        match self {
            Platform::Apple => "ap",
            Platform::Spotify => "sf",
            Platform::Yandex => "ya",
            Platform::YouTube => "yt",
        }
    }

    pub fn from_code(code: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|p| p.code() == code)
    }

    pub fn display_name(self) -> &'static str {
        match self {
            Platform::Apple => "Apple Music",
            Platform::Spotify => "Spotify",
            Platform::Yandex => "Yandex Music",
            Platform::YouTube => "YouTube",
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityType {
    Track,
    Album,
}

impl EntityType {
    pub fn display_name(self) -> &'static str {
        match self {
            EntityType::Track => "Track",
            EntityType::Album => "Album",
        }
    }
}

impl fmt::Display for EntityType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

/// A track or album as a platform describes it.
///
/// Only built from a successful lookup or search, so the id is never empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MusicEntity {
    id: String,
    artist_name: String,
    name: String,
    url: String,
}

impl MusicEntity {
    /// Returns `None` when `id` is empty.
    pub fn new(
        id: impl Into<String>,
        artist_name: impl Into<String>,
        name: impl Into<String>,
        url: impl Into<String>,
    ) -> Option<Self> {
        let id = id.into();
        if id.is_empty() {
            return None;
        }

        Some(Self {
            id,
            artist_name: artist_name.into(),
            name: name.into(),
            url: url.into(),
        })
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn artist_name(&self) -> &str {
        &self.artist_name
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn search_query(&self) -> SearchQuery {
        SearchQuery::new(&self.artist_name, &self.name)
    }
}

/// Artist plus track or album title, as sent to a platform's search.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchQuery {
    pub artist: String,
    pub title: String,
}

impl SearchQuery {
    pub fn new(artist: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            artist: artist.into(),
            title: title.into(),
        }
    }

    /// Free-text form, `"<artist> <title>"`.
    pub fn text(&self) -> String {
        format!("{} {}", self.artist.trim(), self.title.trim())
            .trim()
            .to_string()
    }
}

/// Apple Music storefront, a two-letter lowercase region code.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Storefront(String);

impl Storefront {
    pub fn parse(code: &str) -> Option<Self> {
        (code.len() == 2 && code.bytes().all(|b| b.is_ascii_lowercase()))
            .then(|| Self(code.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Storefront {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Joins a storefront and a raw Apple id into one identifier.
pub const STOREFRONT_SEPARATOR: char = ':';

pub fn join_storefront(storefront: &Storefront, id: &str) -> String {
    format!("{}{}{}", storefront, STOREFRONT_SEPARATOR, id)
}

/// Splits `"<sf>:<id>"`; identifiers without a valid prefix come back whole.
pub fn split_storefront(identifier: &str) -> (Option<Storefront>, &str) {
    match identifier.split_once(STOREFRONT_SEPARATOR) {
        Some((prefix, id)) => match Storefront::parse(prefix) {
            Some(storefront) => (Some(storefront), id),
            None => (None, identifier),
        },
        None => (None, identifier),
    }
}

/// Parsed form of a supported link.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkReference {
    pub platform: Platform,
    pub kind: EntityType,
    pub identifier: String,
}
