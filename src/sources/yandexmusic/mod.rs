pub mod parser;

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{AUTHORIZATION, HeaderMap, HeaderValue, USER_AGENT};
use serde_json::Value;
use tracing::debug;

use crate::{
    common::{
        errors::SourceResult,
        http::{read_json, transport_error, unexpected_body},
    },
    configs::YandexMusicConfig,
    protocol::{EntityType, MusicEntity, Platform, SearchQuery},
    sources::MusicSource,
};

pub struct YandexMusicSource {
    client: reqwest::Client,
    api_base: String,
}

impl YandexMusicSource {
    pub fn new(config: &YandexMusicConfig, timeout: Duration) -> Result<Self, String> {
        let access_token = config
            .access_token
            .as_deref()
            .filter(|s| !s.is_empty())
            .ok_or("Yandex Music access token is missing")?;

        let mut headers = HeaderMap::new();
        headers.insert(USER_AGENT, HeaderValue::from_static("Yandex-Music-API"));
        headers.insert(
            "X-Yandex-Music-Client",
            HeaderValue::from_static("YandexMusicAndroid/24023621"),
        );
        headers.insert(
            AUTHORIZATION,
            HeaderValue::from_str(&format!("OAuth {}", access_token))
                .map_err(|_| "Yandex Music access token is not a valid header value")?,
        );

        let mut client_builder = reqwest::Client::builder()
            .default_headers(headers)
            .gzip(true)
            .timeout(timeout);

        if let Some(url) = config.proxy.as_ref().and_then(|p| p.url.as_ref()) {
            debug!("Configuring proxy for YandexMusicSource: {}", url);
            let mut proxy = reqwest::Proxy::all(url).map_err(|e| e.to_string())?;
            if let Some(p) = &config.proxy {
                if let (Some(username), Some(password)) = (&p.username, &p.password) {
                    proxy = proxy.basic_auth(username, password);
                }
            }
            client_builder = client_builder.proxy(proxy);
        }

        let client = client_builder.build().map_err(|e| e.to_string())?;

        Ok(Self {
            client,
            api_base: config.api_base.trim_end_matches('/').to_string(),
        })
    }

    /// Returns the `result` member of the response envelope.
    async fn api_request(&self, endpoint: &str, params: &[(&str, &str)]) -> SourceResult<Option<Value>> {
        let url = format!("{}{}", self.api_base, endpoint);
        debug!("Yandex Music API request: {}", url);

        let resp = self
            .client
            .get(&url)
            .query(params)
            .send()
            .await
            .map_err(transport_error(&url))?;

        let Some(mut body) = read_json(resp, &url).await? else {
            return Ok(None);
        };
        let result = body
            .get_mut("result")
            .map(Value::take)
            .ok_or_else(|| unexpected_body(&url, "missing `result` member"))?;
        Ok(Some(result).filter(|result| !result.is_null()))
    }

    async fn lookup(&self, kind: EntityType, id: &str) -> SourceResult<Option<MusicEntity>> {
        if id.is_empty() || !id.bytes().all(|b| b.is_ascii_digit()) {
            return Ok(None);
        }

        let endpoint = format!("/{}s/{}", parser::search_type(kind), id);
        let Some(result) = self.api_request(&endpoint, &[]).await? else {
            debug!("Yandex Music {} {} not found", kind, id);
            return Ok(None);
        };

        let url = format!("{}{}", self.api_base, endpoint);

        // `/tracks/{id}` answers with a list, `/albums/{id}` with the album itself.
        let data = match kind {
            EntityType::Track => {
                let list = result
                    .as_array()
                    .ok_or_else(|| unexpected_body(&url, "`result` is not a track list"))?;
                match list.first() {
                    Some(data) => data,
                    None => return Ok(None),
                }
            }
            EntityType::Album => &result,
        };

        if !parser::is_available(data) {
            debug!("Yandex Music {} {} is unavailable", kind, id);
            return Ok(None);
        }
        parser::build_entity(kind, data)
            .map(Some)
            .ok_or_else(|| unexpected_body(&url, format!("{} has no id or title", kind)))
    }

    async fn find(&self, kind: EntityType, query: &SearchQuery) -> SourceResult<Option<MusicEntity>> {
        let text = query.text();
        if text.is_empty() {
            return Ok(None);
        }

        let params = [
            ("text", text.as_str()),
            ("type", parser::search_type(kind)),
            ("page", "0"),
        ];
        let Some(result) = self.api_request("/search", &params).await? else {
            return Ok(None);
        };

        Ok(parser::pick_search_result(kind, &result))
    }
}

#[async_trait]
impl MusicSource for YandexMusicSource {
    fn platform(&self) -> Platform {
        Platform::Yandex
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
