use regex::{Captures, Regex};

use super::entity::{EntityType, LinkReference, Platform, Storefront, join_storefront};

/// Longest identifier that still fits every callback token shape.
pub const MAX_IDENTIFIER_LEN: usize = 52;

struct LinkPattern {
    platform: Platform,
    kind: EntityType,
    regex: Regex,
}

impl LinkPattern {
    fn new(platform: Platform, kind: EntityType, pattern: &str) -> Self {
        Self {
            platform,
            kind,
            regex: Regex::new(pattern).expect("static link pattern"),
        }
    }

    fn reference(&self, caps: &Captures<'_>) -> Option<LinkReference> {
        let id = caps.name("id")?.as_str();
        let identifier = match caps
            .name("sf")
            .and_then(|m| Storefront::parse(&m.as_str().to_ascii_lowercase()))
        {
            Some(storefront) => join_storefront(&storefront, id),
            None => id.to_string(),
        };

        if identifier.len() > MAX_IDENTIFIER_LEN {
            return None;
        }

        Some(LinkReference {
            platform: self.platform,
            kind: self.kind,
            identifier,
        })
    }
}

/// Finds the first supported track or album link in free text.
pub struct LinkParser {
    // order matters: track shapes precede album shapes of the same platform
    patterns: Vec<LinkPattern>,
}

impl LinkParser {
    pub fn new() -> Self {
        use EntityType::{Album, Track};
        use Platform::{Apple, Spotify, Yandex, YouTube};

        const APPLE: &str = r"https?://(?:geo\.|www\.)?music\.apple\.com/(?:(?P<sf>[a-zA-Z]{2})/)?";
        const YANDEX: &str = r"https?://music\.yandex\.(?:ru|com|kz|by|uz)/";
        const YOUTUBE: &str = r"https?://(?:www\.|m\.|music\.)?youtube\.com/";
        // video ids are exactly 11 characters; `regex` has no lookahead
        const ID_END: &str = r"(?:[^A-Za-z0-9_-]|$)";

        let patterns = vec![
            LinkPattern::new(
                Apple,
                Track,
                &format!(r"{APPLE}album/(?:[^/?#\s]+/)?(?:id)?\d+/?\?(?:[^#\s]*&)?i=(?P<id>\d+)\b"),
            ),
            LinkPattern::new(
                Apple,
                Track,
                &format!(r"{APPLE}song/(?:[^/?#\s]+/)?(?P<id>\d+)\b"),
            ),
            LinkPattern::new(
                Apple,
                Album,
                &format!(r"{APPLE}album/(?:[^/?#\s]+/)?(?:id)?(?P<id>\d+)\b"),
            ),
            LinkPattern::new(
                Spotify,
                Track,
                r"https?://open\.spotify\.com/(?:intl-[a-zA-Z]{2}(?:-[a-zA-Z]{2})?/)?track/(?P<id>[A-Za-z0-9]{22})\b",
            ),
            LinkPattern::new(
                Spotify,
                Album,
                r"https?://open\.spotify\.com/(?:intl-[a-zA-Z]{2}(?:-[a-zA-Z]{2})?/)?album/(?P<id>[A-Za-z0-9]{22})\b",
            ),
            LinkPattern::new(
                Yandex,
                Track,
                &format!(r"{YANDEX}album/\d+/track/(?P<id>\d+)"),
            ),
            LinkPattern::new(Yandex, Track, &format!(r"{YANDEX}track/(?P<id>\d+)")),
            LinkPattern::new(Yandex, Album, &format!(r"{YANDEX}album/(?P<id>\d+)")),
            LinkPattern::new(
                YouTube,
                Track,
                &format!(r"{YOUTUBE}watch\?(?:[^#\s]*&)?v=(?P<id>[A-Za-z0-9_-]{{11}}){ID_END}"),
            ),
            LinkPattern::new(
                YouTube,
                Track,
                &format!(r"https?://youtu\.be/(?P<id>[A-Za-z0-9_-]{{11}}){ID_END}"),
            ),
            LinkPattern::new(
                YouTube,
                Album,
                &format!(r"{YOUTUBE}playlist\?(?:[^#\s]*&)?list=(?P<id>[A-Za-z0-9_-]+)"),
            ),
        ];

        Self { patterns }
    }

    /// Returns the reference for the earliest link in `text`.
    pub fn parse(&self, text: &str) -> Option<LinkReference> {
        self.patterns
            .iter()
            .filter_map(|pattern| {
                let caps = pattern.regex.captures(text)?;
                let start = caps.get(0)?.start();
                pattern.reference(&caps).map(|r| (start, r))
            })
            .min_by_key(|(start, _)| *start)
            .map(|(_, reference)| reference)
    }
}

impl Default for LinkParser {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(text: &str) -> Option<(Platform, EntityType, String)> {
        LinkParser::new()
            .parse(text)
            .map(|r| (r.platform, r.kind, r.identifier))
    }

    #[test]
    fn test_apple_album_track_link_is_a_track() {
        assert_eq!(
            parse("https://music.apple.com/us/album/mezzanine/1440857781?i=1440857786"),
            Some((Platform::Apple, EntityType::Track, "us:1440857786".to_string()))
        );
        assert_eq!(
            parse("https://music.apple.com/gb/album/mezzanine/1440857781?l=en&i=1440857786"),
            Some((Platform::Apple, EntityType::Track, "gb:1440857786".to_string()))
        );
    }

    #[test]
    fn test_apple_song_and_album() {
        assert_eq!(
            parse("https://music.apple.com/ru/song/teardrop/1440857786"),
            Some((Platform::Apple, EntityType::Track, "ru:1440857786".to_string()))
        );
        assert_eq!(
            parse("https://music.apple.com/us/album/mezzanine/1440857781"),
            Some((Platform::Apple, EntityType::Album, "us:1440857781".to_string()))
        );
        assert_eq!(
            parse("https://music.apple.com/album/724466660"),
            Some((Platform::Apple, EntityType::Album, "724466660".to_string()))
        );
    }

    #[test]
    fn test_apple_uppercase_storefront_is_normalized() {
        assert_eq!(
            parse("https://music.apple.com/US/album/x/1440857781"),
            Some((Platform::Apple, EntityType::Album, "us:1440857781".to_string()))
        );
    }

    #[test]
    fn test_spotify() {
        assert_eq!(
            parse("https://open.spotify.com/track/7uv632EkfwYhXoqf8rhYrg?si=abc"),
            Some((
                Platform::Spotify,
                EntityType::Track,
                "7uv632EkfwYhXoqf8rhYrg".to_string()
            ))
        );
        assert_eq!(
            parse("https://open.spotify.com/intl-de/album/49MNmJhZQewjt06rpwp6QR"),
            Some((
                Platform::Spotify,
                EntityType::Album,
                "49MNmJhZQewjt06rpwp6QR".to_string()
            ))
        );
        assert_eq!(parse("https://open.spotify.com/track/tooShort"), None);
        assert_eq!(parse("https://open.spotify.com/playlist/37i9dQZF1DXcBWIGoYBM5M"), None);
    }

    #[test]
    fn test_yandex() {
        assert_eq!(
            parse("https://music.yandex.ru/album/3439593/track/28543473"),
            Some((Platform::Yandex, EntityType::Track, "28543473".to_string()))
        );
        assert_eq!(
            parse("https://music.yandex.com/track/28543473"),
            Some((Platform::Yandex, EntityType::Track, "28543473".to_string()))
        );
        assert_eq!(
            parse("https://music.yandex.kz/album/3439593"),
            Some((Platform::Yandex, EntityType::Album, "3439593".to_string()))
        );
        assert_eq!(parse("https://music.yandex.ru/artist/41052"), None);
    }

    #[test]
    fn test_youtube() {
        assert_eq!(
            parse("https://www.youtube.com/watch?v=u7K72X4eo_s"),
            Some((Platform::YouTube, EntityType::Track, "u7K72X4eo_s".to_string()))
        );
        assert_eq!(
            parse("https://music.youtube.com/watch?feature=share&v=u7K72X4eo_s&list=RDAMVM"),
            Some((Platform::YouTube, EntityType::Track, "u7K72X4eo_s".to_string()))
        );
        assert_eq!(
            parse("https://youtu.be/u7K72X4eo_s"),
            Some((Platform::YouTube, EntityType::Track, "u7K72X4eo_s".to_string()))
        );
        assert_eq!(
            parse("https://music.youtube.com/playlist?list=OLAK5uy_nMr9h2VlS-2PULNz3M3XVXQj_P3C2bqaY"),
            Some((
                Platform::YouTube,
                EntityType::Album,
                "OLAK5uy_nMr9h2VlS-2PULNz3M3XVXQj_P3C2bqaY".to_string()
            ))
        );
        assert_eq!(parse("https://www.youtube.com/watch?v=short"), None);
    }

    #[test]
    fn test_youtube_video_id_must_end_after_eleven_chars() {
        assert_eq!(parse("https://youtu.be/u7K72X4eo_sXYZ"), None);
        assert_eq!(parse("https://www.youtube.com/watch?v=u7K72X4eo_sXYZ"), None);
        assert_eq!(parse("https://www.youtube.com/watch?v=u7K72X4eo_s-"), None);
        assert_eq!(
            parse("see https://youtu.be/u7K72X4eo_s?t=42 later"),
            Some((Platform::YouTube, EntityType::Track, "u7K72X4eo_s".to_string()))
        );
    }

    #[test]
    fn test_youtube_playlist_without_list_param() {
        assert_eq!(parse("https://www.youtube.com/playlist?foo=bar"), None);
        assert_eq!(parse("https://www.youtube.com/playlist?list="), None);
    }

    #[test]
    fn test_apple_unsupported_shapes() {
        assert_eq!(parse("https://music.apple.com/us/artist/massive-attack/1023"), None);
        assert_eq!(parse("https://music.apple.com/us/album/mezzanine/"), None);
        assert_eq!(parse("https://music.apple.com/us/song/"), None);
        assert_eq!(parse("https://music.apple.com/us/song/teardrop/"), None);
        assert_eq!(parse("https://music.apple.com/us/album/mezzanine/1440857781abc"), None);
    }

    #[test]
    fn test_first_link_in_text_wins() {
        let text = "listen: https://music.yandex.ru/track/28543473 or \
                    https://open.spotify.com/track/7uv632EkfwYhXoqf8rhYrg";
        assert_eq!(parse(text).map(|(p, _, _)| p), Some(Platform::Yandex));
    }

    #[test]
    fn test_plain_text_has_no_link() {
        assert_eq!(parse("hello there"), None);
        assert_eq!(parse("https://example.com/track/123"), None);
    }

    #[test]
    fn test_overlong_identifier_is_rejected() {
        let list = "A".repeat(MAX_IDENTIFIER_LEN + 1);
        assert_eq!(
            parse(&format!("https://www.youtube.com/playlist?list={}", list)),
            None
        );
    }
}
