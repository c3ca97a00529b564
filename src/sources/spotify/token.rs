use std::sync::Arc;

use reqwest::header;
use serde::Deserialize;
use tokio::sync::{Mutex, RwLock};
use tracing::debug;

use crate::common::{
    errors::{SourceError, SourceResult},
    http::transport_error,
    types::{SharedRw, now_ms},
};

#[derive(Clone, Debug)]
pub struct SpotifyToken {
    pub access_token: String,
    pub expiry_ms: u64,
}

#[derive(Deserialize)]
struct TokenResponse {
    access_token: String,
    expires_in: u64,
}

/// Client-credentials token, refreshed shortly before it expires.
pub struct SpotifyTokenTracker {
    client: reqwest::Client,
    accounts_url: String,
    client_id: String,
    client_secret: String,
    token: SharedRw<Option<SpotifyToken>>,
    refresh: Mutex<()>,
}

impl SpotifyTokenTracker {
    pub fn new(
        client: reqwest::Client,
        accounts_url: impl Into<String>,
        client_id: impl Into<String>,
        client_secret: impl Into<String>,
    ) -> Self {
        Self {
            client,
            accounts_url: accounts_url.into(),
            client_id: client_id.into(),
            client_secret: client_secret.into(),
            token: Arc::new(RwLock::new(None)),
            refresh: Mutex::new(()),
        }
    }

    async fn cached(&self) -> Option<String> {
        let token_lock = self.token.read().await;
        token_lock
            .as_ref()
            // Keep 5-second margin before expiry to account for request time
            .filter(|t| t.expiry_ms > now_ms() + 5_000)
            .map(|t| t.access_token.clone())
    }

    pub async fn get_token(&self) -> SourceResult<String> {
        if let Some(token) = self.cached().await {
            return Ok(token);
        }

        let _guard = self.refresh.lock().await;
        if let Some(token) = self.cached().await {
            return Ok(token);
        }
        self.refresh_token().await
    }

    async fn refresh_token(&self) -> SourceResult<String> {
        debug!("Requesting Spotify client-credentials token...");
        let url = self.accounts_url.as_str();

        let resp = self
            .client
            .post(url)
            .basic_auth(&self.client_id, Some(&self.client_secret))
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body("grant_type=client_credentials")
            .send()
            .await
            .map_err(transport_error(url))?;

        let status = resp.status();
        if status == reqwest::StatusCode::BAD_REQUEST || status == reqwest::StatusCode::UNAUTHORIZED {
            return Err(SourceError::Unauthorized("Spotify".to_string()));
        }
        if !status.is_success() {
            return Err(SourceError::Status {
                url: url.to_string(),
                status,
            });
        }

        let body: TokenResponse = resp.json().await.map_err(|e| SourceError::Decode {
            url: url.to_string(),
            reason: e.to_string(),
        })?;

        let expiry_ms = now_ms() + body.expires_in * 1000;
        *self.token.write().await = Some(SpotifyToken {
            access_token: body.access_token.clone(),
            expiry_ms,
        });

        debug!("Successfully refreshed Spotify token. Expiry: {}", expiry_ms);
        Ok(body.access_token)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use axum::{Json, Router, http::HeaderMap, http::StatusCode, response::IntoResponse, routing::post};
    use serde_json::json;

    use super::*;
    use crate::common::testing::serve;

    fn accounts(hits: Arc<AtomicUsize>, expires_in: u64) -> Router {
        Router::new().route(
            "/api/token",
            post(move |headers: HeaderMap, body: String| {
                let hits = hits.clone();
                async move {
                    hits.fetch_add(1, Ordering::SeqCst);
                    // base64("id:secret")
                    let expected = "Basic aWQ6c2VjcmV0";
                    let auth = headers.get("authorization").and_then(|v| v.to_str().ok());
                    if auth != Some(expected) || body != "grant_type=client_credentials" {
                        return (StatusCode::BAD_REQUEST, "invalid_client").into_response();
                    }
                    Json(json!({
                        "access_token": "BQD-token",
                        "token_type": "Bearer",
                        "expires_in": expires_in
                    }))
                    .into_response()
                }
            }),
        )
    }

    #[tokio::test]
    async fn test_token_is_cached_until_expiry() {
        let hits = Arc::new(AtomicUsize::new(0));
        let base = serve(accounts(hits.clone(), 3600)).await;
        let tracker =
            SpotifyTokenTracker::new(reqwest::Client::new(), format!("{}/api/token", base), "id", "secret");

        assert_eq!(tracker.get_token().await.unwrap(), "BQD-token");
        assert_eq!(tracker.get_token().await.unwrap(), "BQD-token");
        assert_eq!(hits.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_short_lived_token_is_refreshed() {
        let hits = Arc::new(AtomicUsize::new(0));
        let base = serve(accounts(hits.clone(), 1)).await;
        let tracker =
            SpotifyTokenTracker::new(reqwest::Client::new(), format!("{}/api/token", base), "id", "secret");

        tracker.get_token().await.unwrap();
        tracker.get_token().await.unwrap();
        assert_eq!(hits.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_rejected_credentials() {
        let hits = Arc::new(AtomicUsize::new(0));
        let base = serve(accounts(hits, 3600)).await;
        let tracker =
            SpotifyTokenTracker::new(reqwest::Client::new(), format!("{}/api/token", base), "id", "wrong");

        assert!(matches!(
            tracker.get_token().await,
            Err(SourceError::Unauthorized(_))
        ));
    }
}
