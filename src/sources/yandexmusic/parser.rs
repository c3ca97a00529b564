use serde_json::Value;

use crate::protocol::{EntityType, MusicEntity};

const WEB_BASE: &str = "https://music.yandex.ru";

/// Numeric ids come back as numbers for tracks and albums alike, strings in a few older payloads.
fn parse_id(value: &Value) -> Option<String> {
    value
        .as_u64()
        .map(|n| n.to_string())
        .or_else(|| value.as_str().map(|s| s.to_string()))
}

fn parse_artist(data: &Value) -> &str {
    data.pointer("/artists/0/name")
        .and_then(|v| v.as_str())
        .unwrap_or("Unknown Artist")
}

pub fn is_available(data: &Value) -> bool {
    data["available"].as_bool().unwrap_or(true)
}

pub fn build_track(data: &Value) -> Option<MusicEntity> {
    if !is_available(data) {
        return None;
    }

    let id = parse_id(&data["id"])?;
    let title = data["title"].as_str()?;
    let url = match data.pointer("/albums/0/id").and_then(parse_id) {
        Some(album_id) => format!("{}/album/{}/track/{}", WEB_BASE, album_id, id),
        None => format!("{}/track/{}", WEB_BASE, id),
    };

    MusicEntity::new(id, parse_artist(data), title, url)
}

pub fn build_album(data: &Value) -> Option<MusicEntity> {
    if !is_available(data) {
        return None;
    }

    let id = parse_id(&data["id"])?;
    let title = data["title"].as_str()?;
    let url = format!("{}/album/{}", WEB_BASE, id);

    MusicEntity::new(id, parse_artist(data), title, url)
}

pub fn build_entity(kind: EntityType, data: &Value) -> Option<MusicEntity> {
    match kind {
        EntityType::Track => build_track(data),
        EntityType::Album => build_album(data),
    }
}

pub fn search_type(kind: EntityType) -> &'static str {
    match kind {
        EntityType::Track => "track",
        EntityType::Album => "album",
    }
}

/// Picks the `best` hit when it has the requested type, else the first available typed result.
pub fn pick_search_result(kind: EntityType, result: &Value) -> Option<MusicEntity> {
    let wanted = search_type(kind);

    if result.pointer("/best/type").and_then(|v| v.as_str()) == Some(wanted) {
        if let Some(entity) = result.pointer("/best/result").and_then(|b| build_entity(kind, b)) {
            return Some(entity);
        }
    }

    result
        .pointer(&format!("/{}s/results", wanted))
        .and_then(|v| v.as_array())?
        .iter()
        .find_map(|item| build_entity(kind, item))
}
