use reqwest::StatusCode;
use serde_json::Value;
use tracing::warn;

use super::AppleMusicSource;
use crate::common::{
    errors::{SourceError, SourceResult},
    http::{read_json, transport_error},
};

impl AppleMusicSource {
    pub(crate) async fn api_request(&self, path: &str) -> SourceResult<Option<Value>> {
        let url = format!("{}{}", self.api_base, path);

        let token = self.token_tracker.get_token().await?;
        let resp = self.send(&url, &token).await?;

        let resp = if is_rejected(resp.status()) {
            warn!(
                "Apple Music rejected the token ({}), re-acquiring",
                resp.status()
            );
            self.token_tracker.invalidate(&token).await;
            let token = self.token_tracker.get_token().await?;
            let retry = self.send(&url, &token).await?;
            if is_rejected(retry.status()) {
                return Err(SourceError::Unauthorized("Apple Music".to_string()));
            }
            retry
        } else {
            resp
        };

        read_json(resp, &url).await
    }

    async fn send(&self, url: &str, token: &str) -> SourceResult<reqwest::Response> {
        self.client
            .get(url)
            .bearer_auth(token)
            .header("Origin", self.token_tracker.origin())
            .send()
            .await
            .map_err(transport_error(url))
    }
}

fn is_rejected(status: StatusCode) -> bool {
    status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN
}
