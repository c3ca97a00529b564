pub mod parser;

use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value;
use tracing::debug;

use crate::{
    common::{
        errors::SourceResult,
        http::{HttpClient, read_json, transport_error, unexpected_body},
    },
    configs::YouTubeConfig,
    protocol::{EntityType, MusicEntity, Platform, SearchQuery},
    sources::MusicSource,
};

/// YouTube Data API v3 client.
pub struct YouTubeSource {
    client: reqwest::Client,
    api_key: String,
    api_base: String,
    search_limit: usize,
}

impl YouTubeSource {
    pub fn new(config: &YouTubeConfig, timeout: Duration) -> Result<Self, String> {
        let api_key = config
            .api_key
            .clone()
            .filter(|s| !s.is_empty())
            .ok_or("YouTube API key is missing")?;

        let client = HttpClient::new(timeout).map_err(|e| e.to_string())?;

        Ok(Self {
            client,
            api_key,
            api_base: config.api_base.trim_end_matches('/').to_string(),
            search_limit: config.search_limit.max(1),
        })
    }

    async fn api_request(&self, endpoint: &str, params: &[(&str, &str)]) -> SourceResult<Option<Value>> {
        let url = format!("{}/{}", self.api_base, endpoint);

        let resp = self
            .client
            .get(&url)
            .query(params)
            .query(&[("key", self.api_key.as_str())])
            .send()
            .await
            .map_err(transport_error(&url))?;

        read_json(resp, &url).await
    }

    fn items<'a>(&self, endpoint: &str, body: &'a Value) -> SourceResult<&'a [Value]> {
        body.get("items")
            .and_then(Value::as_array)
            .map(Vec::as_slice)
            .ok_or_else(|| {
                unexpected_body(&format!("{}/{}", self.api_base, endpoint), "missing `items` array")
            })
    }

    async fn lookup(&self, kind: EntityType, id: &str) -> SourceResult<Option<MusicEntity>> {
        let endpoint = match kind {
            EntityType::Track => "videos",
            EntityType::Album => "playlists",
        };

        let Some(body) = self
            .api_request(endpoint, &[("part", "snippet"), ("id", id)])
            .await?
        else {
            return Ok(None);
        };

        let items = self.items(endpoint, &body)?;
        if items.is_empty() {
            debug!("YouTube {} {} not found", kind, id);
            return Ok(None);
        }

        items
            .iter()
            .find_map(|item| parser::build_resource(kind, item))
            .map(Some)
            .ok_or_else(|| {
                unexpected_body(
                    &format!("{}/{}", self.api_base, endpoint),
                    format!("no usable {} in `items`", parser::resource_kind(kind)),
                )
            })
    }

    async fn find(&self, kind: EntityType, query: &SearchQuery) -> SourceResult<Option<MusicEntity>> {
        let q = query.text();
        if q.is_empty() {
            return Ok(None);
        }

        let limit = self.search_limit.to_string();
        let params = [
            ("part", "snippet"),
            ("type", parser::search_type(kind)),
            ("q", q.as_str()),
            ("maxResults", limit.as_str()),
        ];
        let Some(body) = self.api_request("search", &params).await? else {
            return Ok(None);
        };

        Ok(self
            .items("search", &body)?
            .iter()
            .find_map(|item| parser::build_search_result(kind, item)))
    }
}

#[async_trait]
impl MusicSource for YouTubeSource {
    fn platform(&self) -> Platform {
        Platform::YouTube
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
