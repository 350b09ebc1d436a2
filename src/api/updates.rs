use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use std::sync::Arc;

use crate::db::{ListQuery, Priority, Update, UpdateAdminQuery, UpdateQuery, UpdateRequest, UpdateType};
use crate::AppState;

use super::error::{ApiError, ValidationErrorBuilder};
use super::extract::{JsonBody, RequestContext};
use super::pagination::{paginate, PageParams, Paginated};
use super::validation::{validate_choice, validate_required, validate_text};

fn validate_update_request(req: &UpdateRequest) -> Result<(), ApiError> {
    let mut errors = ValidationErrorBuilder::new();

    errors.check("title", validate_text(&req.title, 200));
    errors.check("content", validate_required(&req.content));
    errors.check("type", validate_choice::<UpdateType>(&req.update_type));
    errors.check("priority", validate_choice::<Priority>(&req.priority));

    errors.finish()
}

fn updates_query() -> ListQuery {
    ListQuery::new("updates", "created_date DESC, id DESC")
}

/// GET /api/updates/?type=&priority=
pub async fn list_updates(
    State(state): State<Arc<AppState>>,
    ctx: RequestContext,
    Query(query): Query<UpdateQuery>,
    Query(page): Query<PageParams>,
) -> Result<Json<Paginated<Update>>, ApiError> {
    let list = updates_query()
        .filter("published = 1")
        .filter_eq("update_type", query.update_type.as_deref())
        .filter_eq("priority", query.priority.as_deref());

    Ok(Json(paginate(&state.db, &list, &page, &ctx).await?))
}

pub async fn get_update(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> Result<Json<Update>, ApiError> {
    Update::get(&state.db, id)
        .await?
        .filter(|u| u.published)
        .map(Json)
        .ok_or_else(|| ApiError::not_found("Update not found"))
}

pub async fn admin_list_updates(
    State(state): State<Arc<AppState>>,
    Query(query): Query<UpdateAdminQuery>,
) -> Result<Json<Vec<Update>>, ApiError> {
    let updates = updates_query()
        .filter_eq("update_type", query.update_type.as_deref())
        .filter_eq("priority", query.priority.as_deref())
        .filter_bool("published", query.published)
        .search(&["title", "content"], query.search.as_deref())
        .fetch(&state.db, None)
        .await?;
    Ok(Json(updates))
}

pub async fn admin_get_update(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> Result<Json<Update>, ApiError> {
    Update::get(&state.db, id)
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::not_found("Update not found"))
}

pub async fn create_update(
    State(state): State<Arc<AppState>>,
    JsonBody(req): JsonBody<UpdateRequest>,
) -> Result<(StatusCode, Json<Update>), ApiError> {
    validate_update_request(&req)?;

    let update = Update::create(&state.db, &req).await?;
    tracing::info!(id = update.id, kind = %update.update_type, "Update created");

    Ok((StatusCode::CREATED, Json(update)))
}

pub async fn update_update(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
    JsonBody(req): JsonBody<UpdateRequest>,
) -> Result<Json<Update>, ApiError> {
    validate_update_request(&req)?;

    Update::update(&state.db, id, &req)
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::not_found("Update not found"))
}

pub async fn delete_update(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> Result<StatusCode, ApiError> {
    if !Update::delete(&state.db, id).await? {
        return Err(ApiError::not_found("Update not found"));
    }
    Ok(StatusCode::NO_CONTENT)
}
