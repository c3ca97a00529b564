pub mod translit;

use tracing::debug;

pub use translit::{normalized_eq, transliterate};

use crate::{
    common::errors::SourceResult,
    protocol::{EntityType, MusicEntity},
    sources::MusicSource,
};

/// Looks `source` up on `target` and keeps the top result only if its artist
/// is the same person.
///
/// Title relevance is left to the platform's own ranking.
pub async fn find_match(
    source: &MusicEntity,
    target: &dyn MusicSource,
    kind: EntityType,
) -> SourceResult<Option<MusicEntity>> {
    let query = source.search_query();

    let Some(candidate) = target.search(kind, &query).await? else {
        debug!(
            "{} search for '{}' returned nothing",
            target.platform(),
            query.text()
        );
        return Ok(None);
    };

    if normalized_eq(candidate.artist_name(), source.artist_name()) {
        Ok(Some(candidate))
    } else {
        debug!(
            "Rejected {} candidate '{} - {}': artist differs from '{}'",
            target.platform(),
            candidate.artist_name(),
            candidate.name(),
            source.artist_name()
        );
        Ok(None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        protocol::{Platform, SearchQuery},
        sources::testing::StubSource,
    };

    fn entity(id: &str, artist: &str, name: &str) -> MusicEntity {
        MusicEntity::new(id, artist, name, format!("https://example.com/{}", id)).unwrap()
    }

    #[tokio::test]
    async fn test_accepts_transliterated_artist() {
        let source = entity("1", "Земфира", "Искала");
        let target = StubSource::new(Platform::Spotify)
            .with_search(EntityType::Track, entity("sp1", "Zemfira", "Iskala"));

        let found = find_match(&source, &target, EntityType::Track).await.unwrap();
        assert_eq!(found.map(|e| e.id().to_string()), Some("sp1".to_string()));
        assert_eq!(
            target.searches(),
            vec![(EntityType::Track, SearchQuery::new("Земфира", "Искала"))]
        );
    }

    #[tokio::test]
    async fn test_rejects_other_artist() {
        let source = entity("1", "Massive Attack", "Teardrop");
        let target = StubSource::new(Platform::YouTube)
            .with_search(EntityType::Track, entity("yt1", "Miley Cyrus", "Teardrop"));

        let found = find_match(&source, &target, EntityType::Track).await.unwrap();
        assert!(found.is_none());
    }

    #[tokio::test]
    async fn test_empty_search_is_none() {
        let source = entity("1", "Massive Attack", "Mezzanine");
        let target = StubSource::new(Platform::Yandex);

        let found = find_match(&source, &target, EntityType::Album).await.unwrap();
        assert!(found.is_none());
    }

    #[tokio::test]
    async fn test_search_error_propagates() {
        let source = entity("1", "Massive Attack", "Mezzanine");
        let target = StubSource::new(Platform::Yandex).failing();

        assert!(find_match(&source, &target, EntityType::Album).await.is_err());
    }
}
