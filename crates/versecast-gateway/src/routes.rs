//! API route handlers for the gateway.

use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Deserialize;
use std::sync::Arc;

use versecast_core::error::VersecastError;
use versecast_core::types::{Passage, PreferenceRequest};

use super::server::AppState;

fn error_response(status: StatusCode, message: impl Into<String>) -> Response {
    let body = serde_json::json!({ "success": false, "error": message.into() });
    (status, Json(body)).into_response()
}

fn status_for(err: &VersecastError) -> StatusCode {
    match err {
        VersecastError::Validation(_) | VersecastError::Json(_) => StatusCode::BAD_REQUEST,
        VersecastError::NotLoaded(_) => StatusCode::SERVICE_UNAVAILABLE,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

/// Health check endpoint.
pub async fn health_check(State(state): State<Arc<AppState>>) -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "status": "ok",
        "service": "versecast-gateway",
        "version": env!("CARGO_PKG_VERSION"),
        "uptime_secs": state.start_time.elapsed().as_secs(),
        "translations": state.library.ids(),
        "subscriptions": state.store.len(),
    }))
}

/// Store a delivery preference.
pub async fn save_subscription(
    State(state): State<Arc<AppState>>,
    Json(body): Json<serde_json::Value>,
) -> Response {
    let request: PreferenceRequest = match serde_json::from_value(body) {
        Ok(r) => r,
        Err(e) => {
            return error_response(StatusCode::BAD_REQUEST, format!("invalid preference: {e}"));
        }
    };

    match state.store.add(request) {
        Ok(pref) => {
            if state.library.entry(&pref.translation).is_none() {
                tracing::warn!(
                    "Preference {} names translation '{}', which is not loaded",
                    pref.id,
                    pref.translation
                );
            }
            Json(serde_json::json!({ "success": true, "id": pref.id })).into_response()
        }
        Err(e) => error_response(status_for(&e), e.to_string()),
    }
}

/// List loaded translations with their sizes.
pub async fn list_translations(State(state): State<Arc<AppState>>) -> Json<serde_json::Value> {
    let translations: Vec<_> = state
        .library
        .entries()
        .iter()
        .map(|e| {
            serde_json::json!({
                "id": e.id,
                "label": e.label,
                "name": e.corpus.name,
                "books": e.corpus.books.len(),
                "verses": e.corpus.verse_count(),
            })
        })
        .collect();
    Json(serde_json::json!({ "translations": translations }))
}

#[derive(Debug, Deserialize)]
pub struct VerseQuery {
    pub translation: Option<String>,
}

/// A random passage from the requested (or default) translation.
pub async fn random_verse(
    State(state): State<Arc<AppState>>,
    Query(query): Query<VerseQuery>,
) -> Response {
    let key = query
        .translation
        .unwrap_or_else(|| state.config.schedule.default_translation.clone());

    if state.library.entry(&key).is_none() {
        return error_response(StatusCode::NOT_FOUND, format!("unknown translation '{key}'"));
    }
    match state.library.select_random(&key) {
        Ok(passage) => Json(passage).into_response(),
        Err(e) => error_response(status_for(&e), e.to_string()),
    }
}

/// Exact `book chapter:verse` lookup.
pub async fn lookup_verse(
    State(state): State<Arc<AppState>>,
    Path((translation, book, chapter, verse)): Path<(String, String, u32, u32)>,
) -> Response {
    let Some(corpus) = state.library.get(&translation) else {
        return error_response(StatusCode::NOT_FOUND, format!("unknown translation '{translation}'"));
    };
    let found = corpus.book(&book).and_then(|b| {
        let c = b.chapter(chapter)?;
        Some(Passage::new(b, c, c.verse(verse)?))
    });
    match found {
        Some(passage) => Json(serde_json::json!({
            "translation": corpus.name,
            "reference": passage.reference,
            "text": passage.text,
        }))
        .into_response(),
        None => error_response(StatusCode::NOT_FOUND, format!("{book} {chapter}:{verse} not found")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::server::router;
    use axum::body::Body;
    use axum::http::Request;
    use tower::ServiceExt;
    use versecast_core::VersecastConfig;
    use versecast_corpus::{CorpusLibrary, parse_text_corpus};
    use versecast_scheduler::PreferenceStore;

    fn test_state() -> Arc<AppState> {
        let mut library = CorpusLibrary::new();
        library.insert(
            "BBE",
            Some("Bible in Basic English (BBE)".into()),
            parse_text_corpus("### Genesis\n[1:1] At the first God made the heaven and the earth.\n", "Bible in Basic English"),
        );
        let mut config = VersecastConfig::default();
        config.schedule.default_translation = "BBE".into();
        Arc::new(AppState::new(config, Arc::new(library), PreferenceStore::new()))
    }

    async fn body_json(response: Response) -> serde_json::Value {
        let bytes = axum::body::to_bytes(response.into_body(), 64 * 1024).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_health_check() {
        let json = health_check(State(test_state())).await.0;
        assert_eq!(json["status"], "ok");
        assert_eq!(json["translations"][0], "BBE");
    }

    #[tokio::test]
    async fn test_save_subscription() {
        let state = test_state();
        let body = serde_json::json!({
            "timeOfDay": "08:00",
            "channel": "push-notification",
            "translation": "BBE",
            "destination": "tok-1"
        });
        let response = save_subscription(State(state.clone()), Json(body)).await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_json(response).await["success"], true);
        assert_eq!(state.store.len(), 1);
    }

    #[tokio::test]
    async fn test_save_subscription_rejects_bad_shape() {
        let state = test_state();
        let bad_time = serde_json::json!({
            "timeOfDay": "8 o'clock",
            "channel": "push-notification",
            "translation": "BBE",
            "destination": "tok-1"
        });
        let response = save_subscription(State(state.clone()), Json(bad_time)).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let missing = serde_json::json!({ "endpoint": "https://push.example/abc" });
        let response = save_subscription(State(state.clone()), Json(missing)).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert!(state.store.is_empty());
    }

    #[tokio::test]
    async fn test_random_verse_default_and_unknown() {
        let state = test_state();
        let response = random_verse(State(state.clone()), Query(VerseQuery { translation: None })).await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_json(response).await["reference"], "Genesis 1:1");

        let response = random_verse(
            State(state),
            Query(VerseQuery { translation: Some("KJV".into()) }),
        )
        .await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_router_lookup_and_translations() {
        let app = router(test_state());

        let response = app
            .clone()
            .oneshot(Request::get("/api/verse/bbe/genesis/1/1").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let json = body_json(response).await;
        assert!(json["text"].as_str().unwrap().starts_with("At the first"));
        assert_eq!(json["reference"], "Genesis 1:1");

        let response = app
            .clone()
            .oneshot(Request::get("/api/verse/BBE/Genesis/2/1").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let response = app
            .oneshot(Request::get("/api/translations").body(Body::empty()).unwrap())
            .await
            .unwrap();
        let json = body_json(response).await;
        assert_eq!(json["translations"][0]["verses"], 1);
    }
}
