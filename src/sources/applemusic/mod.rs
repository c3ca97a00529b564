pub mod helpers;
pub mod parser;
pub mod token;

use std::{sync::Arc, time::Duration};

use async_trait::async_trait;
use serde_json::Value;
use token::AppleMusicTokenTracker;
use tracing::debug;

use crate::{
    common::{
        errors::SourceResult,
        http::{HttpClient, unexpected_body},
    },
    configs::AppleMusicConfig,
    protocol::{EntityType, MusicEntity, Platform, SearchQuery, Storefront, split_storefront},
    sources::MusicSource,
};

const SEARCH_LIMIT: usize = 10;

pub struct AppleMusicSource {
    client: reqwest::Client,
    token_tracker: Arc<AppleMusicTokenTracker>,
    api_base: String,
    country_code: String,
}

impl AppleMusicSource {
    pub fn new(
        config: &AppleMusicConfig,
        token_tracker: Arc<AppleMusicTokenTracker>,
        timeout: Duration,
    ) -> Result<Self, String> {
        let country_code = Storefront::parse(&config.country_code)
            .ok_or_else(|| format!("invalid country_code {:?}", config.country_code))?
            .to_string();

        let client = HttpClient::new(timeout).map_err(|e| e.to_string())?;

        Ok(Self {
            client,
            token_tracker,
            api_base: config.api_base.trim_end_matches('/').to_string(),
            country_code,
        })
    }

    /// Splits a possibly storefront-joined identifier.
    fn locate<'a>(&self, identifier: &'a str) -> (String, &'a str) {
        let (storefront, id) = split_storefront(identifier);
        let storefront = storefront
            .map(|s| s.to_string())
            .unwrap_or_else(|| self.country_code.clone());
        (storefront, id)
    }

    async fn lookup(&self, kind: EntityType, identifier: &str) -> SourceResult<Option<MusicEntity>> {
        let (storefront, id) = self.locate(identifier);
        if id.is_empty() {
            return Ok(None);
        }

        let path = format!(
            "/catalog/{}/{}/{}",
            storefront,
            parser::resource_type(kind),
            urlencoding::encode(id)
        );

        let Some(body) = self.api_request(&path).await? else {
            debug!("Apple Music {} {} not found in {}", kind, id, storefront);
            return Ok(None);
        };

        let url = format!("{}{}", self.api_base, path);
        let data = body
            .get("data")
            .and_then(Value::as_array)
            .ok_or_else(|| unexpected_body(&url, "missing `data` array"))?;
        let Some(item) = data.first() else {
            return Ok(None);
        };

        parser::build_entity(item)
            .map(Some)
            .ok_or_else(|| unexpected_body(&url, "catalog resource has no id or url"))
    }

    async fn find(&self, kind: EntityType, query: &SearchQuery) -> SourceResult<Option<MusicEntity>> {
        let term = query.text();
        if term.is_empty() {
            return Ok(None);
        }

        let types = parser::resource_type(kind);
        let path = format!(
            "/catalog/{}/search?term={}&types={}&limit={}",
            self.country_code,
            urlencoding::encode(&term),
            types,
            SEARCH_LIMIT
        );

        let Some(body) = self.api_request(&path).await? else {
            return Ok(None);
        };

        // Types without hits are left out of `results`.
        let results = body
            .get("results")
            .filter(|v| v.is_object())
            .ok_or_else(|| {
                unexpected_body(&format!("{}{}", self.api_base, path), "missing `results` object")
            })?;
        let items = results
            .pointer(&format!("/{}/data", types))
            .and_then(Value::as_array);

        Ok(items.and_then(|items| {
            items
                .iter()
                .filter(|item| item.get("type").and_then(Value::as_str) == Some(types))
                .find_map(parser::build_entity)
        }))
    }
}

#[async_trait]
impl MusicSource for AppleMusicSource {
    fn platform(&self) -> Platform {
        Platform::Apple
    }

    async fn get_track(&self, id: &str) -> SourceResult<Option<MusicEntity>> {
        self.lookup(EntityType::Track, id).await
    }

    async fn get_album(&self, id: &str) -> SourceResult<Option<MusicEntity>> {
        self.lookup(EntityType::Album, id).await
    }

    async fn search_track(&self, query: &SearchQuery) -> SourceResult<Option<MusicEntity>> {
        self.find(EntityType::Track, query).await
    }

    async fn search_album(&self, query: &SearchQuery) -> SourceResult<Option<MusicEntity>> {
        self.find(EntityType::Album, query).await
    }
}
