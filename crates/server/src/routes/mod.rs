//! Route assembly and shared application state.

pub mod bookmarks;
pub mod users;

use std::sync::Arc;

use axum::Json;
use axum::Router;
use axum::routing::{get, post};
use tower_http::trace::TraceLayer;

use crate::auth::JwtService;
use linkvault_client::MetadataExtractor;
use linkvault_core::Db;

/// Shared state handed to every handler.
pub struct AppState {
    pub db: Db,
    pub extractor: MetadataExtractor,
    pub jwt: JwtService,
}

/// Build the API router.
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/api/auth/register", post(users::register))
        .route("/api/auth/login", post(users::login))
        .route("/api/auth/refresh", post(users::refresh))
        .route("/api/bookmarks", get(bookmarks::list).post(bookmarks::create))
        .route("/api/bookmarks/search", get(bookmarks::search))
        .route("/api/bookmarks/bulk_delete", post(bookmarks::bulk_delete))
        .route("/api/bookmarks/by_tag", get(bookmarks::by_tag))
        .route(
            "/api/bookmarks/{id}",
            get(bookmarks::get_one).put(bookmarks::update).delete(bookmarks::delete),
        )
        .route("/api/bookmarks/{id}/refresh_metadata", post(bookmarks::refresh_metadata))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "status": "ok" }))
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::*;
    use axum::body::Body;
    use axum::http::{Request, Response, header};
    use linkvault_client::FetchConfig;
    use std::time::Duration;
    use tower::ServiceExt;

    /// Router over an in-memory store with a fast-failing fetch client.
    pub async fn test_router() -> (Router, Arc<AppState>) {
        let db = Db::open_in_memory().await.unwrap();
        let extractor = MetadataExtractor::new(FetchConfig {
            timeout: Duration::from_millis(250),
            ..FetchConfig::default()
        })
        .unwrap();
        let state = Arc::new(AppState { db, extractor, jwt: JwtService::new("test-secret-key") });
        (router(state.clone()), state)
    }

    /// Create a user directly and mint an access token for them.
    pub async fn seeded_token(state: &AppState) -> (i64, String) {
        let hash = crate::auth::hash_password("hunter2").unwrap();
        let user = state
            .db
            .create_user("Ada", "ada@example.com", "ada", &hash)
            .await
            .unwrap();
        let token = state.jwt.issue_access(user.id).unwrap();
        (user.id, token)
    }

    pub async fn send(router: &Router, request: Request<Body>) -> Response<Body> {
        router.clone().oneshot(request).await.unwrap()
    }

    pub fn authed(request: axum::http::request::Builder, token: &str) -> axum::http::request::Builder {
        request.header(header::AUTHORIZATION, format!("Bearer {token}"))
    }

    pub async fn body_json(response: Response<Body>) -> serde_json::Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_health() {
        let (router, _) = test_router().await;
        let response = send(&router, Request::get("/health").body(Body::empty()).unwrap()).await;
        assert_eq!(response.status(), axum::http::StatusCode::OK);
        assert_eq!(body_json(response).await["status"], "ok");
    }
}
