use serde_json::Value;

use crate::protocol::{EntityType, MusicEntity};

/// Builds an entity from a track or album object of the Web API.
pub fn build_entity(kind: EntityType, item: &Value) -> Option<MusicEntity> {
    let id = item.get("id")?.as_str()?;
    let name = item
        .get("name")
        .and_then(|v| v.as_str())
        .unwrap_or("Unknown Title");
    let artist = item
        .pointer("/artists/0/name")
        .and_then(|v| v.as_str())
        .unwrap_or("Unknown Artist");

    let url = item
        .pointer("/external_urls/spotify")
        .and_then(|v| v.as_str())
        .map(|s| s.to_string())
        .unwrap_or_else(|| format!("https://open.spotify.com/{}/{}", path_segment(kind), id));

    MusicEntity::new(id, artist, name, url)
}

pub fn path_segment(kind: EntityType) -> &'static str {
    match kind {
        EntityType::Track => "track",
        EntityType::Album => "album",
    }
}

/// Field-filtered search query, e.g. `artist:Земфира track:Хочешь?`.
pub fn search_query(kind: EntityType, artist: &str, title: &str) -> String {
    let mut q = Vec::with_capacity(2);
    if !artist.is_empty() {
        q.push(format!("artist:{}", artist));
    }
    if !title.is_empty() {
        q.push(format!("{}:{}", path_segment(kind), title));
    }
    q.join(" ")
}
