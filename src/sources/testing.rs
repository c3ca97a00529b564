use std::{collections::HashMap, sync::Mutex};

use async_trait::async_trait;

use super::MusicSource;
use crate::{
    common::errors::{SourceError, SourceResult},
    protocol::{EntityType, MusicEntity, Platform, SearchQuery},
};

/// In-memory source that records the searches it receives.
pub struct StubSource {
    platform: Platform,
    entities: HashMap<(EntityType, String), MusicEntity>,
    results: HashMap<EntityType, MusicEntity>,
    failing: bool,
    searches: Mutex<Vec<(EntityType, SearchQuery)>>,
}

impl StubSource {
    pub fn new(platform: Platform) -> Self {
        Self {
            platform,
            entities: HashMap::new(),
            results: HashMap::new(),
            failing: false,
            searches: Mutex::new(Vec::new()),
        }
    }

    pub fn with_entity(mut self, kind: EntityType, id: &str, entity: MusicEntity) -> Self {
        self.entities.insert((kind, id.to_string()), entity);
        self
    }

    pub fn with_search(mut self, kind: EntityType, entity: MusicEntity) -> Self {
        self.results.insert(kind, entity);
        self
    }

    pub fn failing(mut self) -> Self {
        self.failing = true;
        self
    }

    pub fn searches(&self) -> Vec<(EntityType, SearchQuery)> {
        self.searches.lock().unwrap().clone()
    }

    fn check(&self) -> SourceResult<()> {
        if self.failing {
            return Err(SourceError::Decode {
                url: format!("stub://{}", self.platform.code()),
                reason: "stub failure".to_string(),
            });
        }
        Ok(())
    }

    fn lookup(&self, kind: EntityType, id: &str) -> SourceResult<Option<MusicEntity>> {
        self.check()?;
        Ok(self.entities.get(&(kind, id.to_string())).cloned())
    }

    fn find(&self, kind: EntityType, query: &SearchQuery) -> SourceResult<Option<MusicEntity>> {
        self.searches.lock().unwrap().push((kind, query.clone()));
        self.check()?;
        Ok(self.results.get(&kind).cloned())
    }
}

#[async_trait]
impl MusicSource for StubSource {
    fn platform(&self) -> Platform {
        self.platform
    }

    async fn get_track(&self, id: &str) -> SourceResult<Option<MusicEntity>> {
        self.lookup(EntityType::Track, id)
    }

    async fn get_album(&self, id: &str) -> SourceResult<Option<MusicEntity>> {
        self.lookup(EntityType::Album, id)
    }

    async fn search_track(&self, query: &SearchQuery) -> SourceResult<Option<MusicEntity>> {
        self.find(EntityType::Track, query)
    }

    async fn search_album(&self, query: &SearchQuery) -> SourceResult<Option<MusicEntity>> {
        self.find(EntityType::Album, query)
    }
}
