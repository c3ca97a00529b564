pub mod parser;
pub mod token;

use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value;
use token::SpotifyTokenTracker;
use tracing::debug;

use crate::{
    common::{
        errors::SourceResult,
        http::{HttpClient, read_json, transport_error, unexpected_body},
    },
    configs::SpotifyConfig,
    protocol::{EntityType, MusicEntity, Platform, SearchQuery},
    sources::MusicSource,
};

pub struct SpotifySource {
    client: reqwest::Client,
    token_tracker: SpotifyTokenTracker,
    api_base: String,
    search_limit: usize,
}

impl SpotifySource {
    pub fn new(config: &SpotifyConfig, timeout: Duration) -> Result<Self, String> {
        let client_id = config
            .client_id
            .as_deref()
            .filter(|s| !s.is_empty())
            .ok_or("spotify.client_id is not set")?;
        let client_secret = config
            .client_secret
            .as_deref()
            .filter(|s| !s.is_empty())
            .ok_or("spotify.client_secret is not set")?;

        let client = HttpClient::new(timeout).map_err(|e| e.to_string())?;
        let token_tracker = SpotifyTokenTracker::new(
            client.clone(),
            config.accounts_url.clone(),
            client_id,
            client_secret,
        );

        Ok(Self {
            client,
            token_tracker,
            api_base: config.api_base.trim_end_matches('/').to_string(),
            search_limit: config.search_limit.max(1),
        })
    }

    async fn api_request(&self, path: &str, query: &[(&str, String)]) -> SourceResult<Option<Value>> {
        let token = self.token_tracker.get_token().await?;
        let url = format!("{}{}", self.api_base, path);

        let resp = self
            .client
            .get(&url)
            .bearer_auth(token)
            .query(query)
            .send()
            .await
            .map_err(transport_error(&url))?;

        read_json(resp, &url).await
    }

    async fn lookup(&self, kind: EntityType, id: &str) -> SourceResult<Option<MusicEntity>> {
        let path = format!("/{}s/{}", parser::path_segment(kind), urlencoding::encode(id));
        let Some(body) = self.api_request(&path, &[]).await? else {
            debug!("Spotify {} {} not found", kind, id);
            return Ok(None);
        };
        parser::build_entity(kind, &body).map(Some).ok_or_else(|| {
            unexpected_body(&format!("{}{}", self.api_base, path), "object has no id")
        })
    }

    async fn find(&self, kind: EntityType, query: &SearchQuery) -> SourceResult<Option<MusicEntity>> {
        let q = parser::search_query(kind, query.artist.trim(), query.title.trim());
        if q.is_empty() {
            return Ok(None);
        }

        let segment = parser::path_segment(kind);
        let params = [
            ("q", q),
            ("type", segment.to_string()),
            ("limit", self.search_limit.to_string()),
        ];
        let Some(body) = self.api_request("/search", &params).await? else {
            return Ok(None);
        };

        let items = body
            .pointer(&format!("/{}s/items", segment))
            .and_then(Value::as_array)
            .ok_or_else(|| {
                unexpected_body(
                    &format!("{}/search", self.api_base),
                    format!("missing `{}s.items` array", segment),
                )
            })?;

        Ok(items
            .iter()
            .filter(|item| item.get("type").and_then(Value::as_str).is_none_or(|t| t == segment))
            .find_map(|item| parser::build_entity(kind, item)))
    }
}

#[async_trait]
impl MusicSource for SpotifySource {
    fn platform(&self) -> Platform {
        Platform::Spotify
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
