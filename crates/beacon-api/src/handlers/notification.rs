//! Pull API handlers: list, unread count, mark read, delete.

use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use serde::Deserialize;
use uuid::Uuid;

use beacon_core::error::AppError;
use beacon_entity::notification::model::NotificationFilter;
use beacon_entity::NotificationCategory;

use crate::dto::response::{CountResponse, ListResponse, MarkedResponse};
use crate::extractors::AuthUser;
use crate::state::AppState;

const DEFAULT_LIMIT: i64 = 20;
const MAX_LIMIT: i64 = 100;

/// Query parameters for GET /notifications.
#[derive(Debug, Deserialize)]
pub struct ListQuery {
    /// Page size; out-of-range values fall back to the default.
    pub limit: Option<i64>,
    /// Row offset; negative values are treated as zero.
    pub offset: Option<i64>,
    /// Optional category filter.
    #[serde(rename = "type")]
    pub category: Option<NotificationCategory>,
    /// Optional read-state filter.
    pub is_read: Option<bool>,
}

/// GET /notifications
pub async fn list(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(query): Query<ListQuery>,
) -> Result<Json<ListResponse>, AppError> {
    let limit = match query.limit {
        Some(l) if l > 0 && l <= MAX_LIMIT => l,
        _ => DEFAULT_LIMIT,
    };
    let offset = query.offset.unwrap_or(0).max(0);

    let data = state
        .notifications
        .list(NotificationFilter {
            tenant_key: auth.tenant_key,
            user_id: auth.user_id,
            is_read: query.is_read,
            category: query.category,
            limit,
            offset,
        })
        .await?;

    Ok(Json(ListResponse {
        data,
        limit,
        offset,
    }))
}

/// GET /notifications/unread-count
pub async fn unread_count(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<CountResponse>, AppError> {
    let count = state
        .notifications
        .count_unread(&auth.tenant_key, &auth.user_id)
        .await?;
    Ok(Json(CountResponse { count }))
}

/// PATCH /notifications/{id}/read
pub async fn mark_read(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    state
        .notifications
        .mark_read(id, &auth.tenant_key, &auth.user_id)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

/// POST /notifications/read-all
pub async fn mark_all_read(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<MarkedResponse>, AppError> {
    let marked = state
        .notifications
        .mark_all_read(&auth.tenant_key, &auth.user_id)
        .await?;
    Ok(Json(MarkedResponse { marked }))
}

/// DELETE /notifications/{id}
pub async fn delete(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    state
        .notifications
        .delete(id, &auth.tenant_key, &auth.user_id)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}
