//! Bookmark endpoints: CRUD, filtering, search, bulk delete, tag grouping,
//! and on-demand metadata refresh.
//!
//! Every handler extracts `AuthUser` first; all store calls are scoped to
//! that user, so operating on another user's bookmark is structurally
//! impossible rather than merely forbidden.

use std::collections::BTreeMap;
use std::sync::Arc;

use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use serde::Deserialize;

use crate::auth::AuthUser;
use crate::error::ApiResult;
use crate::routes::AppState;
use linkvault_client::fetch::validate;
use linkvault_core::db::{Bookmark, BookmarkFilter, BookmarkUpdate, NewBookmark, Period, Source, query};
use linkvault_core::Error;

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    pub source: Option<String>,
    pub tag: Option<String>,
    pub period: Option<String>,
    pub content_type: Option<String>,
}

pub async fn list(
    State(state): State<Arc<AppState>>, auth: AuthUser, Query(params): Query<ListQuery>,
) -> ApiResult<Json<Vec<Bookmark>>> {
    // An unknown source value is an exact-match filter that can never
    // match, not a request for the unfiltered list.
    let source = match params.source.as_deref() {
        Some(raw) => match Source::parse(raw) {
            Some(source) => Some(source),
            None => return Ok(Json(Vec::new())),
        },
        None => None,
    };

    let filter = BookmarkFilter {
        source,
        tags: params.tag.as_deref().map(query::parse_tag_list).unwrap_or_default(),
        period: params.period.as_deref().and_then(Period::parse),
        content_type: params.content_type,
        q: None,
    };

    let bookmarks = state.db.list_bookmarks(auth.user_id, filter).await?;
    Ok(Json(bookmarks))
}

#[derive(Debug, Deserialize)]
pub struct CreateRequest {
    pub url: String,
    pub title: Option<String>,
    pub description: Option<String>,
    pub source: Option<Source>,
    pub source_id: Option<String>,
    #[serde(default)]
    pub tag_names: Vec<String>,
}

pub async fn create(
    State(state): State<Arc<AppState>>, auth: AuthUser, Json(body): Json<CreateRequest>,
) -> ApiResult<(StatusCode, Json<Bookmark>)> {
    let url = validate(&body.url)
        .map_err(|e| Error::InvalidUrl(e.to_string()))?
        .to_string();

    // Enrichment is best-effort: a degraded result still fills what it can
    // and never blocks the write.
    let meta = state.extractor.extract(&url).await;

    let new = NewBookmark {
        url,
        title: body.title.or(meta.title),
        description: body.description.or(meta.description),
        source: body.source.unwrap_or_default(),
        source_id: body.source_id,
        content_type: meta.content_type.map(|kind| kind.as_str().to_string()),
        preview_image: meta.preview_image,
        favicon: meta.favicon,
        tags: body.tag_names,
    };

    let bookmark = state.db.create_bookmark(auth.user_id, new).await?;
    tracing::info!(user_id = auth.user_id, bookmark_id = bookmark.id, "created bookmark");
    Ok((StatusCode::CREATED, Json(bookmark)))
}

pub async fn get_one(
    State(state): State<Arc<AppState>>, auth: AuthUser, Path(id): Path<i64>,
) -> ApiResult<Json<Bookmark>> {
    let bookmark = state
        .db
        .get_bookmark(auth.user_id, id)
        .await?
        .ok_or_else(|| Error::NotFound(format!("bookmark {id}")))?;
    Ok(Json(bookmark))
}

#[derive(Debug, Default, Deserialize)]
pub struct UpdateRequest {
    pub url: Option<String>,
    pub title: Option<String>,
    pub description: Option<String>,
    pub source: Option<Source>,
    pub source_id: Option<String>,
    pub content_type: Option<String>,
    pub preview_image: Option<String>,
    pub favicon: Option<String>,
    pub tag_names: Option<Vec<String>>,
}

pub async fn update(
    State(state): State<Arc<AppState>>, auth: AuthUser, Path(id): Path<i64>, Json(body): Json<UpdateRequest>,
) -> ApiResult<Json<Bookmark>> {
    let url = match body.url {
        Some(raw) => Some(
            validate(&raw)
                .map_err(|e| Error::InvalidUrl(e.to_string()))?
                .to_string(),
        ),
        None => None,
    };

    let update = BookmarkUpdate {
        url,
        title: body.title,
        description: body.description,
        source: body.source,
        source_id: body.source_id,
        content_type: body.content_type,
        preview_image: body.preview_image,
        favicon: body.favicon,
        tags: body.tag_names,
    };

    let bookmark = state.db.update_bookmark(auth.user_id, id, update).await?;
    Ok(Json(bookmark))
}

pub async fn delete(
    State(state): State<Arc<AppState>>, auth: AuthUser, Path(id): Path<i64>,
) -> ApiResult<StatusCode> {
    state.db.delete_bookmark(auth.user_id, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    pub q: Option<String>,
}

pub async fn search(
    State(state): State<Arc<AppState>>, auth: AuthUser, Query(params): Query<SearchQuery>,
) -> ApiResult<Json<Vec<Bookmark>>> {
    let q = params.q.as_deref().map(str::trim).unwrap_or("");
    if q.is_empty() {
        // "No query" is a client error, distinct from "query with no hits".
        return Err(Error::InvalidInput("No search query provided.".into()).into());
    }

    let filter = BookmarkFilter { q: Some(q.to_string()), ..Default::default() };
    let bookmarks = state.db.list_bookmarks(auth.user_id, filter).await?;
    Ok(Json(bookmarks))
}

#[derive(Debug, Deserialize)]
pub struct BulkDeleteRequest {
    #[serde(default)]
    pub ids: Vec<i64>,
}

pub async fn bulk_delete(
    State(state): State<Arc<AppState>>, auth: AuthUser, Json(body): Json<BulkDeleteRequest>,
) -> ApiResult<Json<serde_json::Value>> {
    if body.ids.is_empty() {
        return Err(Error::InvalidInput("No bookmark ids provided.".into()).into());
    }

    let deleted = state.db.bulk_delete_bookmarks(auth.user_id, body.ids).await?;
    Ok(Json(serde_json::json!({ "deleted": deleted })))
}

pub async fn by_tag(
    State(state): State<Arc<AppState>>, auth: AuthUser,
) -> ApiResult<Json<BTreeMap<String, Vec<Bookmark>>>> {
    let grouped = state.db.bookmarks_by_tag(auth.user_id).await?;
    Ok(Json(grouped))
}

pub async fn refresh_metadata(
    State(state): State<Arc<AppState>>, auth: AuthUser, Path(id): Path<i64>,
) -> ApiResult<Json<Bookmark>> {
    let bookmark = state
        .db
        .get_bookmark(auth.user_id, id)
        .await?
        .ok_or_else(|| Error::NotFound(format!("bookmark {id}")))?;

    let meta = state.extractor.extract(&bookmark.url).await;
    if let Some(error) = &meta.error {
        tracing::warn!(bookmark_id = id, error, "metadata refresh degraded");
    }

    // Overwrite only what the new extraction populated; untouched fields
    // keep their stored values.
    let update = BookmarkUpdate {
        title: meta.title,
        description: meta.description,
        preview_image: meta.preview_image,
        favicon: meta.favicon,
        content_type: meta.content_type.map(|kind| kind.as_str().to_string()),
        ..Default::default()
    };

    let bookmark = state.db.update_bookmark(auth.user_id, id, update).await?;
    Ok(Json(bookmark))
}
