use serde_json::Value;

use crate::protocol::{EntityType, MusicEntity};

const TOPIC_SUFFIX: &str = " - Topic";

pub fn resource_kind(kind: EntityType) -> &'static str {
    match kind {
        EntityType::Track => "youtube#video",
        EntityType::Album => "youtube#playlist",
    }
}

pub fn search_type(kind: EntityType) -> &'static str {
    match kind {
        EntityType::Track => "video",
        EntityType::Album => "playlist",
    }
}

/// Auto-generated artist channels are named "<artist> - Topic".
pub fn clean_channel_title(title: &str) -> &str {
    title.strip_suffix(TOPIC_SUFFIX).unwrap_or(title).trim()
}

pub fn watch_url(kind: EntityType, id: &str) -> String {
    match kind {
        EntityType::Track => format!("https://www.youtube.com/watch?v={}", id),
        EntityType::Album => format!("https://www.youtube.com/playlist?list={}", id),
    }
}

fn build(kind: EntityType, id: &str, snippet: &Value) -> Option<MusicEntity> {
    let title = snippet.get("title").and_then(|v| v.as_str())?;
    let artist = snippet
        .get("channelTitle")
        .and_then(|v| v.as_str())
        .map(clean_channel_title)
        .unwrap_or("Unknown Artist");

    MusicEntity::new(id, artist, title, watch_url(kind, id))
}

/// Builds an entity from a `videos.list` or `playlists.list` item.
pub fn build_resource(kind: EntityType, item: &Value) -> Option<MusicEntity> {
    if item.get("kind").and_then(|v| v.as_str()) != Some(resource_kind(kind)) {
        return None;
    }
    let id = item.get("id")?.as_str()?;
    build(kind, id, item.get("snippet")?)
}

/// Builds an entity from a `search.list` item, whose `id` is an object.
pub fn build_search_result(kind: EntityType, item: &Value) -> Option<MusicEntity> {
    let id = item.get("id")?;
    if id.get("kind").and_then(|v| v.as_str()) != Some(resource_kind(kind)) {
        return None;
    }
    let id = match kind {
        EntityType::Track => id.get("videoId"),
        EntityType::Album => id.get("playlistId"),
    }?
    .as_str()?;
    build(kind, id, item.get("snippet")?)
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_topic_suffix_is_stripped() {
        assert_eq!(clean_channel_title("Massive Attack - Topic"), "Massive Attack");
        assert_eq!(clean_channel_title("MassiveAttackVEVO"), "MassiveAttackVEVO");
    }

    #[test]
    fn test_search_result_kind_must_match() {
        let channel = json!({
            "id": { "kind": "youtube#channel", "channelId": "UC1" },
            "snippet": { "title": "Massive Attack", "channelTitle": "Massive Attack" }
        });
        assert!(build_search_result(EntityType::Track, &channel).is_none());

        let video = json!({
            "id": { "kind": "youtube#video", "videoId": "u7K72X4eo_s" },
            "snippet": { "title": "Teardrop", "channelTitle": "Massive Attack - Topic" }
        });
        let entity = build_search_result(EntityType::Track, &video).unwrap();
        assert_eq!(entity.url(), "https://www.youtube.com/watch?v=u7K72X4eo_s");
        assert_eq!(entity.artist_name(), "Massive Attack");
    }

    #[test]
    fn test_playlist_resource() {
        let item = json!({
            "kind": "youtube#playlist",
            "id": "OLAK5uy_kXy",
            "snippet": { "title": "Album - Mezzanine", "channelTitle": "Massive Attack - Topic" }
        });
        let entity = build_resource(EntityType::Album, &item).unwrap();
        assert_eq!(entity.url(), "https://www.youtube.com/playlist?list=OLAK5uy_kXy");
    }
}
