use serde::{Deserialize, Serialize};

/// Which platforms take part in conversions.
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct SourcesConfig {
    #[serde(default = "enabled")]
    pub applemusic: bool,
    #[serde(default = "enabled")]
    pub spotify: bool,
    #[serde(default = "enabled")]
    pub yandexmusic: bool,
    #[serde(default = "enabled")]
    pub youtube: bool,
}

fn enabled() -> bool {
    true
}

impl Default for SourcesConfig {
    fn default() -> Self {
        Self {
            applemusic: true,
            spotify: true,
            yandexmusic: true,
            youtube: true,
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct AppleMusicConfig {
    /// Storefront used when a link carries none.
    #[serde(default = "default_country_code")]
    pub country_code: String,
    /// Storefronts offered after a successful conversion to Apple Music.
    #[serde(default = "default_storefronts")]
    pub storefronts: Vec<String>,
    #[serde(default = "default_web_player_url")]
    pub web_player_url: String,
    #[serde(default = "default_apple_api_base")]
    pub api_base: String,
}

fn default_country_code() -> String {
    "us".to_string()
}

fn default_storefronts() -> Vec<String> {
    ["us", "gb", "de", "ru", "kz", "ua"]
        .iter()
        .map(|s| s.to_string())
        .collect()
}

fn default_web_player_url() -> String {
    "https://music.apple.com".to_string()
}

fn default_apple_api_base() -> String {
    "https://api.music.apple.com/v1".to_string()
}

impl Default for AppleMusicConfig {
    fn default() -> Self {
        Self {
            country_code: default_country_code(),
            storefronts: default_storefronts(),
            web_player_url: default_web_player_url(),
            api_base: default_apple_api_base(),
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct SpotifyConfig {
    pub client_id: Option<String>,
    pub client_secret: Option<String>,
    #[serde(default = "default_spotify_api_base")]
    pub api_base: String,
    #[serde(default = "default_spotify_accounts_url")]
    pub accounts_url: String,
    #[serde(default = "default_search_limit")]
    pub search_limit: usize,
}

fn default_spotify_api_base() -> String {
    "https://api.spotify.com/v1".to_string()
}

fn default_spotify_accounts_url() -> String {
    "https://accounts.spotify.com/api/token".to_string()
}

fn default_search_limit() -> usize {
    5
}

impl Default for SpotifyConfig {
    fn default() -> Self {
        Self {
            client_id: None,
            client_secret: None,
            api_base: default_spotify_api_base(),
            accounts_url: default_spotify_accounts_url(),
            search_limit: default_search_limit(),
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct YandexMusicConfig {
    pub access_token: Option<String>,
    #[serde(default = "default_yandex_api_base")]
    pub api_base: String,
    pub proxy: Option<HttpProxyConfig>,
}

fn default_yandex_api_base() -> String {
    "https://api.music.yandex.net".to_string()
}

impl Default for YandexMusicConfig {
    fn default() -> Self {
        Self {
            access_token: None,
            api_base: default_yandex_api_base(),
            proxy: None,
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone, Default)]
pub struct HttpProxyConfig {
    pub url: Option<String>,
    pub username: Option<String>,
    pub password: Option<String>,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct YouTubeConfig {
    pub api_key: Option<String>,
    #[serde(default = "default_youtube_api_base")]
    pub api_base: String,
    #[serde(default = "default_search_limit")]
    pub search_limit: usize,
}

fn default_youtube_api_base() -> String {
    "https://www.googleapis.com/youtube/v3".to_string()
}

impl Default for YouTubeConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            api_base: default_youtube_api_base(),
            search_limit: default_search_limit(),
        }
    }
}
