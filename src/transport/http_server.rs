use std::sync::Arc;

use axum::{
    Router, middleware,
    routing::{get, post},
};

use crate::{
    server::AppState,
    transport::{
        middleware::{add_response_headers, check_auth},
        routes::{events, info},
    },
};

const API_V1: &str = "/v1";

pub fn router(state: Arc<AppState>) -> Router {
    let v1_routes = Router::new()
        .route("/events", post(events::handle_event))
        .route("/info", get(info::get_info));

    Router::new()
        .nest(API_V1, v1_routes)
        .route("/version", get(info::get_version))
        .layer(middleware::from_fn_with_state(state.clone(), check_auth))
        .layer(middleware::from_fn(add_response_headers))
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use serde_json::{Value, json};

    use super::*;
    use crate::{
        common::testing::serve,
        configs::Config,
        protocol::{EntityType, MusicEntity, Platform},
        resolver::Resolver,
        sources::{SourceManager, testing::StubSource},
    };

    async fn app() -> String {
        let mut config = Config::default();
        config.server.password = "youshallnotpass".to_string();

        let apple = StubSource::new(Platform::Apple).with_entity(
            EntityType::Album,
            "us:724466069",
            MusicEntity::new(
                "724466069",
                "Massive Attack",
                "Mezzanine",
                "https://music.apple.com/us/album/mezzanine/724466069",
            )
            .unwrap(),
        );
        let sources = Arc::new(SourceManager::from_sources(vec![
            Box::new(apple),
            Box::new(StubSource::new(Platform::YouTube)),
        ]));
        let resolver = Resolver::from_config(sources, &config.applemusic);

        serve(router(Arc::new(AppState { resolver, config }))).await
    }

    #[tokio::test]
    async fn test_requests_without_password_are_rejected() {
        let base = app().await;
        let client = reqwest::Client::new();

        let resp = client.get(format!("{}/version", base)).send().await.unwrap();
        assert_eq!(resp.status(), 401);
        assert_eq!(resp.headers()["linkbridge-api-version"], "1");

        let resp = client
            .get(format!("{}/version", base))
            .header("Authorization", "wrong")
            .send()
            .await
            .unwrap();
        assert_eq!(resp.status(), 401);
        let body: Value = resp.json().await.unwrap();
        assert_eq!(body["error"], "Unauthorized");
        assert_eq!(body["path"], "/version");
    }

    #[tokio::test]
    async fn test_message_event_returns_picker() {
        let base = app().await;
        let resp = reqwest::Client::new()
            .post(format!("{}/v1/events", base))
            .header("Authorization", "youshallnotpass")
            .json(&json!({
                "type": "message",
                "sender": 7,
                "text": "https://music.apple.com/us/album/mezzanine/724466069"
            }))
            .send()
            .await
            .unwrap();
        assert_eq!(resp.status(), 200);

        let replies: Value = resp.json().await.unwrap();
        assert_eq!(
            replies,
            json!([{
                "to": 7,
                "text": "Massive Attack - Mezzanine",
                "replyMarkup": {
                    "kind": "inlineKeyboard",
                    "rows": [[{ "text": "YouTube", "callbackData": "cnval/ap/us:724466069/yt" }]]
                }
            }])
        );
    }

    #[tokio::test]
    async fn test_malformed_event_is_bad_request() {
        let base = app().await;
        let resp = reqwest::Client::new()
            .post(format!("{}/v1/events", base))
            .header("Authorization", "youshallnotpass")
            .json(&json!({ "type": "sticker", "sender": 7 }))
            .send()
            .await
            .unwrap();
        assert_eq!(resp.status(), 400);
        let body: Value = resp.json().await.unwrap();
        assert_eq!(body["path"], "/v1/events");
    }

    #[tokio::test]
    async fn test_info_lists_enabled_sources() {
        let base = app().await;
        let info: Value = reqwest::Client::new()
            .get(format!("{}/v1/info", base))
            .header("Authorization", "youshallnotpass")
            .send()
            .await
            .unwrap()
            .json()
            .await
            .unwrap();

        assert_eq!(info["version"], env!("CARGO_PKG_VERSION"));
        assert_eq!(info["sources"], json!(["Apple Music", "YouTube"]));
        assert_eq!(info["storefronts"][0], "us");
    }
}
