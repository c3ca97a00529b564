//! Bearer token for the Apple Music catalog API.
//!
//! Apple issues no public token for the web player's API. The token is baked
//! into the player's index bundle, behind a variable the bundle templates into
//! its `Authorization` header. Scraping takes three steps:
//!
//! 1. fetch the web player page and find the index bundle's `<script src>`,
//! 2. fetch the bundle and find ``Authorization = `Bearer ${VAR}` ``,
//! 3. find the string literal assigned to `VAR` in the same bundle.
//!
//! Bundle filenames and minified names change with every deploy, so only the
//! shapes above are relied on.

use std::{
    sync::{
        Arc, LazyLock,
        atomic::{AtomicU64, Ordering},
    },
    time::Duration,
};

use base64::{Engine, engine::general_purpose::URL_SAFE_NO_PAD};
use regex::Regex;
use serde_json::Value;
use tokio::sync::{Mutex, RwLock};
use tracing::{debug, error, info};

use crate::{
    common::{errors::TokenError, http::HttpClient, types::SharedRw},
    configs::AppleMusicConfig,
};

/// Tokens are considered stale this long before their JWT expiry.
const EXPIRY_MARGIN_MS: u64 = 10_000;

static SCRIPT_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"<script[^>]*\ssrc="(?P<src>[^"]*/assets/index[^"]*\.js)""#)
        .expect("static script pattern")
});

static AUTH_HEADER_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"Authorization["']?\s*[:=]\s*`Bearer \$\{(?P<var>[A-Za-z_$][\w$]*)\}`"#)
        .expect("static auth header pattern")
});

/// Path of the web player's index bundle.
pub fn extract_bundle_path(html: &str) -> Option<&str> {
    SCRIPT_REGEX
        .captures(html)
        .and_then(|caps| caps.name("src"))
        .map(|m| m.as_str())
}

/// Name of the variable interpolated into the `Authorization` header.
pub fn extract_auth_variable(js: &str) -> Option<&str> {
    AUTH_HEADER_REGEX
        .captures(js)
        .and_then(|caps| caps.name("var"))
        .map(|m| m.as_str())
}

/// String literal assigned to `var`.
pub fn extract_token_literal<'a>(js: &'a str, var: &str) -> Option<&'a str> {
    let pattern = format!(
        r#"(?:^|[^\w$.]){}\s*=\s*(?:"(?P<dq>[^"]+)"|'(?P<sq>[^']+)')"#,
        regex::escape(var)
    );
    let regex = Regex::new(&pattern).ok()?;
    let caps = regex.captures(js)?;
    caps.name("dq").or_else(|| caps.name("sq")).map(|m| m.as_str())
}

/// Reads the `exp` claim when the token is a JWT, in milliseconds.
fn parse_jwt_expiry(token: &str) -> Option<u64> {
    let payload = token.split('.').nth(1)?;
    let decoded = URL_SAFE_NO_PAD.decode(payload).ok()?;
    let json: Value = serde_json::from_slice(&decoded).ok()?;
    json.get("exp")
        .and_then(|v| v.as_u64())
        .and_then(|e| e.checked_mul(1000))
}

#[derive(Clone, Debug)]
pub struct AppleMusicToken {
    pub access_token: String,
    pub expiry_ms: Option<u64>,
}

impl AppleMusicToken {
    pub fn new(access_token: String) -> Self {
        let expiry_ms = parse_jwt_expiry(&access_token);
        Self {
            access_token,
            expiry_ms,
        }
    }

    /// Tokens without a readable expiry stay valid until invalidated.
    pub fn is_valid(&self, now_ms: u64) -> bool {
        self.expiry_ms
            .map_or(true, |expiry| expiry > now_ms + EXPIRY_MARGIN_MS)
    }
}

struct AcquireState {
    attempts: u64,
    last_error: Option<TokenError>,
}

/// Process-wide token cache with single-flight acquisition.
///
/// Readers share the cached token. When it is missing, one caller scrapes the
/// web player while the others wait for that attempt and take its outcome.
pub struct AppleMusicTokenTracker {
    client: reqwest::Client,
    web_player_url: String,
    token: SharedRw<Option<AppleMusicToken>>,
    acquire: Mutex<AcquireState>,
    attempts: AtomicU64,
}

impl AppleMusicTokenTracker {
    pub fn new(client: reqwest::Client, web_player_url: impl Into<String>) -> Self {
        Self {
            client,
            web_player_url: web_player_url.into().trim_end_matches('/').to_string(),
            token: Arc::new(RwLock::new(None)),
            acquire: Mutex::new(AcquireState {
                attempts: 0,
                last_error: None,
            }),
            attempts: AtomicU64::new(0),
        }
    }

    pub fn from_config(config: &AppleMusicConfig, timeout: Duration) -> Result<Self, String> {
        let client = HttpClient::new(timeout).map_err(|e| e.to_string())?;
        Ok(Self::new(client, config.web_player_url.clone()))
    }

    /// Origin the catalog API expects alongside the token.
    pub fn origin(&self) -> &str {
        &self.web_player_url
    }

    async fn cached(&self) -> Option<String> {
        let now = crate::common::types::now_ms();
        self.token
            .read()
            .await
            .as_ref()
            .filter(|t| t.is_valid(now))
            .map(|t| t.access_token.clone())
    }

    pub async fn get_token(&self) -> Result<String, TokenError> {
        if let Some(token) = self.cached().await {
            return Ok(token);
        }

        let observed = self.attempts.load(Ordering::Acquire);
        let mut state = self.acquire.lock().await;

        if let Some(token) = self.cached().await {
            return Ok(token);
        }
        // Someone else finished an attempt while we queued; share its failure.
        if state.attempts != observed {
            if let Some(err) = &state.last_error {
                return Err(err.clone());
            }
        }

        let result = self.acquire_token().await;
        state.attempts += 1;
        self.attempts.store(state.attempts, Ordering::Release);

        match result {
            Ok(token) => {
                state.last_error = None;
                let access_token = token.access_token.clone();
                *self.token.write().await = Some(token);
                info!("Successfully acquired Apple Music token");
                Ok(access_token)
            }
            Err(e) => {
                error!("Failed to acquire Apple Music token: {}", e);
                state.last_error = Some(e.clone());
                Err(e)
            }
        }
    }

    /// Drops the cached token if it is still the one that was rejected.
    pub async fn invalidate(&self, rejected: &str) {
        let mut lock = self.token.write().await;
        if lock.as_ref().is_some_and(|t| t.access_token == rejected) {
            debug!("Invalidating rejected Apple Music token");
            *lock = None;
        }
    }

    async fn acquire_token(&self) -> Result<AppleMusicToken, TokenError> {
        info!("Fetching new Apple Music API token...");

        let root_url = self.web_player_url.clone();
        let html = self
            .fetch_text(&root_url)
            .await
            .map_err(|reason| TokenError::RootPage {
                url: root_url.clone(),
                reason,
            })?;

        let bundle_path = extract_bundle_path(&html).ok_or(TokenError::BundlePathNotFound)?;
        let bundle_url = self.absolute_url(bundle_path);
        debug!("Apple Music bundle: {}", bundle_url);

        let js = self
            .fetch_text(&bundle_url)
            .await
            .map_err(|reason| TokenError::Bundle {
                url: bundle_url.clone(),
                reason,
            })?;

        let var = extract_auth_variable(&js).ok_or(TokenError::AuthVariableNotFound)?;
        let literal = extract_token_literal(&js, var)
            .ok_or_else(|| TokenError::TokenLiteralNotFound(var.to_string()))?;

        Ok(AppleMusicToken::new(literal.to_string()))
    }

    fn absolute_url(&self, path: &str) -> String {
        if path.starts_with("http://") || path.starts_with("https://") {
            path.to_string()
        } else if let Some(rest) = path.strip_prefix("//") {
            format!("https://{}", rest)
        } else if path.starts_with('/') {
            format!("{}{}", self.web_player_url, path)
        } else {
            format!("{}/{}", self.web_player_url, path)
        }
    }

    async fn fetch_text(&self, url: &str) -> Result<String, String> {
        let resp = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| e.to_string())?;

        if !resp.status().is_success() {
            return Err(format!("status {}", resp.status()));
        }

        resp.text().await.map_err(|e| e.to_string())
    }

    /// Warms the cache in the background.
    pub fn init(self: Arc<Self>) {
        tokio::spawn(async move {
            let _ = self.get_token().await;
        });
    }
}
