use std::sync::Arc;

use super::{
    applemusic::{AppleMusicSource, token::AppleMusicTokenTracker},
    plugin::{BoxedSource, MusicSource},
    spotify::SpotifySource,
    yandexmusic::YandexMusicSource,
    youtube::YouTubeSource,
};
use crate::protocol::Platform;

/// Registry of the platform clients that initialized successfully.
pub struct SourceManager {
    sources: Vec<BoxedSource>,
}

impl SourceManager {
    pub fn new(config: &crate::configs::Config, apple_tokens: Arc<AppleMusicTokenTracker>) -> Self {
        let mut sources: Vec<BoxedSource> = Vec::new();
        let timeout = config.http.timeout();

        macro_rules! register_source {
            ($enabled:expr, $name:literal, $ctor:expr) => {
                if $enabled {
                    match $ctor {
                        Ok(src) => {
                            tracing::info!("Loaded source: {}", $name);
                            sources.push(Box::new(src));
                        }
                        Err(e) => {
                            tracing::error!("{} source failed to initialize: {}", $name, e);
                        }
                    }
                }
            };
        }

        register_source!(
            config.sources.applemusic,
            "Apple Music",
            AppleMusicSource::new(&config.applemusic, apple_tokens, timeout)
        );
        register_source!(
            config.sources.spotify,
            "Spotify",
            SpotifySource::new(&config.spotify, timeout)
        );
        register_source!(
            config.sources.yandexmusic,
            "Yandex Music",
            YandexMusicSource::new(&config.yandexmusic, timeout)
        );
        register_source!(
            config.sources.youtube,
            "YouTube",
            YouTubeSource::new(&config.youtube, timeout)
        );

        Self { sources }
    }

    pub fn from_sources(sources: Vec<BoxedSource>) -> Self {
        Self { sources }
    }

    pub fn get(&self, platform: Platform) -> Option<&dyn MusicSource> {
        self.sources
            .iter()
            .find(|s| s.platform() == platform)
            .map(|s| s.as_ref())
    }

    /// Enabled platforms in canonical order.
    pub fn platforms(&self) -> Vec<Platform> {
        Platform::ALL
            .into_iter()
            .filter(|p| self.get(*p).is_some())
            .collect()
    }

    pub fn source_names(&self) -> Vec<String> {
        self.platforms()
            .into_iter()
            .map(|p| p.display_name().to_string())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sources::testing::StubSource;

    #[test]
    fn test_platforms_follow_canonical_order() {
        let manager = SourceManager::from_sources(vec![
            Box::new(StubSource::new(Platform::YouTube)),
            Box::new(StubSource::new(Platform::Apple)),
        ]);

        assert_eq!(manager.platforms(), vec![Platform::Apple, Platform::YouTube]);
        assert!(manager.get(Platform::Spotify).is_none());
        assert_eq!(manager.source_names(), vec!["Apple Music", "YouTube"]);
    }

    #[test]
    fn test_missing_credentials_skip_sources() {
        let config = crate::configs::Config::default();
        let tracker = Arc::new(AppleMusicTokenTracker::new(
            reqwest::Client::new(),
            config.applemusic.web_player_url.clone(),
        ));
        let manager = SourceManager::new(&config, tracker);
        // Apple Music needs no credentials, the other three do.
        assert_eq!(manager.platforms(), vec![Platform::Apple]);
    }
}
