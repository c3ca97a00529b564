use async_trait::async_trait;

use crate::{
    common::errors::SourceResult,
    protocol::{EntityType, MusicEntity, Platform, SearchQuery},
};

/// Capability every streaming platform client provides.
///
/// Lookups and searches return `Ok(None)` when the platform has nothing to
/// offer; `Err` is reserved for transport, status and decoding failures.
#[async_trait]
pub trait MusicSource: Send + Sync {
    fn platform(&self) -> Platform;

    /// Fetches a track by its platform-local identifier.
    async fn get_track(&self, id: &str) -> SourceResult<Option<MusicEntity>>;

    /// Fetches an album by its platform-local identifier.
    async fn get_album(&self, id: &str) -> SourceResult<Option<MusicEntity>>;

    /// Returns the platform's top track for the query.
    async fn search_track(&self, query: &SearchQuery) -> SourceResult<Option<MusicEntity>>;

    /// Returns the platform's top album for the query.
    async fn search_album(&self, query: &SearchQuery) -> SourceResult<Option<MusicEntity>>;

    async fn get(&self, kind: EntityType, id: &str) -> SourceResult<Option<MusicEntity>> {
        match kind {
            EntityType::Track => self.get_track(id).await,
            EntityType::Album => self.get_album(id).await,
        }
    }

    async fn search(
        &self,
        kind: EntityType,
        query: &SearchQuery,
    ) -> SourceResult<Option<MusicEntity>> {
        match kind {
            EntityType::Track => self.search_track(query).await,
            EntityType::Album => self.search_album(query).await,
        }
    }
}

pub type BoxedSource = Box<dyn MusicSource>;
