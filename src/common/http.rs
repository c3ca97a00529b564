use std::time::Duration;

use reqwest::{Client, ClientBuilder, Error, Response, StatusCode};
use serde_json::Value;

use crate::common::errors::{SourceError, SourceResult};

const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/134.0.0.0 Safari/537.36";

pub struct HttpClient;

impl HttpClient {
    pub fn default_user_agent() -> String {
        DEFAULT_USER_AGENT.to_string()
    }

    pub fn builder(timeout: Duration) -> ClientBuilder {
        Client::builder()
            .user_agent(Self::default_user_agent())
            .gzip(true)
            .timeout(timeout)
    }

    pub fn new(timeout: Duration) -> Result<Client, Error> {
        Self::builder(timeout).build()
    }
}

/// Reads a JSON body, mapping 404 to `None` and every other non-2xx status to an error.
pub async fn read_json(resp: Response, url: &str) -> SourceResult<Option<Value>> {
    let status = resp.status();
    if status == StatusCode::NOT_FOUND {
        return Ok(None);
    }
    if !status.is_success() {
        return Err(SourceError::Status {
            url: url.to_string(),
            status,
        });
    }

    resp.json::<Value>()
        .await
        .map(Some)
        .map_err(|e| SourceError::Decode {
            url: url.to_string(),
            reason: e.to_string(),
        })
}

/// Wraps a transport error with the URL that produced it.
pub fn transport_error(url: &str) -> impl FnOnce(reqwest::Error) -> SourceError + '_ {
    move |source| SourceError::Http {
        url: url.to_string(),
        source,
    }
}

/// Error for a successful response whose body lacks the expected shape.
pub fn unexpected_body(url: &str, reason: impl Into<String>) -> SourceError {
    SourceError::Decode {
        url: url.to_string(),
        reason: reason.into(),
    }
}
