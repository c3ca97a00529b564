use serde_json::Value;

use crate::protocol::MusicEntity;

/// Builds an entity from a catalog resource (`songs` or `albums`).
pub fn build_entity(item: &Value) -> Option<MusicEntity> {
    let attributes = item.get("attributes")?;

    let id = item.get("id")?.as_str()?;
    let name = attributes
        .get("name")
        .and_then(|v| v.as_str())
        .unwrap_or("Unknown Title");
    let artist = attributes
        .get("artistName")
        .and_then(|v| v.as_str())
        .unwrap_or("Unknown Artist");
    let url = attributes
        .get("url")
        .and_then(|v| v.as_str())
        .filter(|s| !s.is_empty())?;

    MusicEntity::new(id, artist, name, url)
}

/// Catalog resource type for an entity kind.
pub fn resource_type(kind: crate::protocol::EntityType) -> &'static str {
    match kind {
        crate::protocol::EntityType::Track => "songs",
        crate::protocol::EntityType::Album => "albums",
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_build_entity_from_song() {
        let item = json!({
            "id": "724466660",
            "type": "songs",
            "attributes": {
                "name": "Teardrop",
                "artistName": "Massive Attack",
                "albumName": "Mezzanine",
                "url": "https://music.apple.com/us/album/teardrop/724466069?i=724466660"
            }
        });

        let entity = build_entity(&item).unwrap();
        assert_eq!(entity.id(), "724466660");
        assert_eq!(entity.artist_name(), "Massive Attack");
        assert_eq!(entity.name(), "Teardrop");
        assert!(entity.url().ends_with("?i=724466660"));
    }

    #[test]
    fn test_build_entity_requires_url() {
        let item = json!({ "id": "1", "attributes": { "name": "x", "artistName": "y" } });
        assert!(build_entity(&item).is_none());
    }
}
