//! About page: the five sections, core values, timeline and the
//! consolidated settings view.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use sqlx::SqlitePool;
use std::sync::Arc;

use crate::db::{
    AboutItemAdminQuery, AboutSection, AboutSectionAdminQuery, AboutSectionKind,
    AboutSectionRequest, AboutSectionResponse, AboutSettingsRequest, AboutSettingsResponse,
    AboutTimelineItem, AboutTimelineItemRequest, AboutValue, AboutValueRequest, ListQuery,
};
use crate::AppState;

use super::error::{ApiError, ValidationErrorBuilder};
use super::extract::{JsonBody, RequestContext};
use super::pagination::{paginate, PageParams, Paginated};
use super::validation::{validate_max_length, validate_required, validate_text};

const VALUES_ORDER: &str = "sort_order ASC, id ASC";
const TIMELINE_ORDER: &str = "sort_order ASC, year ASC, id ASC";

fn validate_section_request(
    kind: AboutSectionKind,
    req: &AboutSectionRequest,
) -> Result<(), ApiError> {
    let mut errors = ValidationErrorBuilder::new();

    if let Some(ref title) = req.title {
        errors.check("title", validate_max_length(title, 200));
    }
    if !kind.is_header() {
        errors.check(
            "content",
            validate_required(req.content.as_deref().unwrap_or_default()),
        );
    }

    errors.finish()
}

fn validate_value_request(req: &AboutValueRequest) -> Result<(), ApiError> {
    let mut errors = ValidationErrorBuilder::new();

    errors.check("icon", validate_max_length(&req.icon, 10));
    errors.check("title", validate_text(&req.title, 100));
    errors.check("description", validate_required(&req.description));

    errors.finish()
}

fn validate_timeline_request(req: &AboutTimelineItemRequest) -> Result<(), ApiError> {
    let mut errors = ValidationErrorBuilder::new();

    errors.check("year", validate_text(&req.year, 10));
    errors.check("title", validate_text(&req.title, 200));
    errors.check("description", validate_required(&req.description));

    errors.finish()
}

// Public

/// GET /api/about-story/ and friends - at most the current section
pub async fn list_section(
    State(state): State<Arc<AppState>>,
    kind: AboutSectionKind,
) -> Result<Json<Vec<AboutSectionResponse>>, ApiError> {
    let current = AboutSection::current(&state.db, kind).await?;
    Ok(Json(current.iter().map(AboutSection::to_response).collect()))
}

/// GET /api/about-values/
pub async fn list_values(
    State(state): State<Arc<AppState>>,
    ctx: RequestContext,
    Query(page): Query<PageParams>,
) -> Result<Json<Paginated<AboutValue>>, ApiError> {
    let list = ListQuery::new("about_values", VALUES_ORDER).filter("is_active = 1");
    Ok(Json(paginate(&state.db, &list, &page, &ctx).await?))
}

/// GET /api/about-timeline-items/
pub async fn list_timeline_items(
    State(state): State<Arc<AppState>>,
    ctx: RequestContext,
    Query(page): Query<PageParams>,
) -> Result<Json<Paginated<AboutTimelineItem>>, ApiError> {
    let list = ListQuery::new("about_timeline_items", TIMELINE_ORDER).filter("is_active = 1");
    Ok(Json(paginate(&state.db, &list, &page, &ctx).await?))
}

// Admin: sections

pub async fn admin_list_sections(
    State(state): State<Arc<AppState>>,
    Path(kind): Path<AboutSectionKind>,
    Query(query): Query<AboutSectionAdminQuery>,
) -> Result<Json<Vec<AboutSectionResponse>>, ApiError> {
    let sections: Vec<AboutSection> =
        ListQuery::new("about_sections", "updated_at DESC, id DESC")
            .filter_eq("kind", Some(kind.as_str()))
            .filter_bool("is_active", query.is_active)
            .search(&["title", "body"], query.search.as_deref())
            .fetch(&state.db, None)
            .await?;

    Ok(Json(sections.iter().map(AboutSection::to_response).collect()))
}

pub async fn admin_get_section(
    State(state): State<Arc<AppState>>,
    Path((kind, id)): Path<(AboutSectionKind, i64)>,
) -> Result<Json<AboutSectionResponse>, ApiError> {
    AboutSection::get(&state.db, kind, id)
        .await?
        .map(|s| Json(s.to_response()))
        .ok_or_else(|| ApiError::not_found("About section not found"))
}

pub async fn create_section(
    State(state): State<Arc<AppState>>,
    Path(kind): Path<AboutSectionKind>,
    JsonBody(req): JsonBody<AboutSectionRequest>,
) -> Result<(StatusCode, Json<AboutSectionResponse>), ApiError> {
    validate_section_request(kind, &req)?;

    let section = AboutSection::create(&state.db, kind, &req).await?;
    tracing::info!(id = section.id, kind = kind.as_str(), "About section created");

    Ok((StatusCode::CREATED, Json(section.to_response())))
}

pub async fn update_section(
    State(state): State<Arc<AppState>>,
    Path((kind, id)): Path<(AboutSectionKind, i64)>,
    JsonBody(req): JsonBody<AboutSectionRequest>,
) -> Result<Json<AboutSectionResponse>, ApiError> {
    validate_section_request(kind, &req)?;

    AboutSection::update(&state.db, kind, id, &req)
        .await?
        .map(|s| Json(s.to_response()))
        .ok_or_else(|| ApiError::not_found("About section not found"))
}

pub async fn delete_section(
    State(state): State<Arc<AppState>>,
    Path((kind, id)): Path<(AboutSectionKind, i64)>,
) -> Result<StatusCode, ApiError> {
    if !AboutSection::delete(&state.db, kind, id).await? {
        return Err(ApiError::not_found("About section not found"));
    }
    Ok(StatusCode::NO_CONTENT)
}

// Admin: values

pub async fn admin_list_values(
    State(state): State<Arc<AppState>>,
    Query(query): Query<AboutItemAdminQuery>,
) -> Result<Json<Vec<AboutValue>>, ApiError> {
    let values = ListQuery::new("about_values", VALUES_ORDER)
        .filter_bool("is_active", query.is_active)
        .search(&["title", "description"], query.search.as_deref())
        .fetch(&state.db, None)
        .await?;
    Ok(Json(values))
}

pub async fn admin_get_value(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> Result<Json<AboutValue>, ApiError> {
    AboutValue::get(&state.db, id)
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::not_found("About value not found"))
}

pub async fn create_value(
    State(state): State<Arc<AppState>>,
    JsonBody(req): JsonBody<AboutValueRequest>,
) -> Result<(StatusCode, Json<AboutValue>), ApiError> {
    validate_value_request(&req)?;
    let value = AboutValue::create(&state.db, &req).await?;
    Ok((StatusCode::CREATED, Json(value)))
}

pub async fn update_value(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
    JsonBody(req): JsonBody<AboutValueRequest>,
) -> Result<Json<AboutValue>, ApiError> {
    validate_value_request(&req)?;

    AboutValue::update(&state.db, id, &req)
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::not_found("About value not found"))
}

pub async fn delete_value(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> Result<StatusCode, ApiError> {
    if !AboutValue::delete(&state.db, id).await? {
        return Err(ApiError::not_found("About value not found"));
    }
    Ok(StatusCode::NO_CONTENT)
}

// Admin: timeline

pub async fn admin_list_timeline_items(
    State(state): State<Arc<AppState>>,
    Query(query): Query<AboutItemAdminQuery>,
) -> Result<Json<Vec<AboutTimelineItem>>, ApiError> {
    let items = ListQuery::new("about_timeline_items", TIMELINE_ORDER)
        .filter_bool("is_active", query.is_active)
        .search(&["year", "title", "description"], query.search.as_deref())
        .fetch(&state.db, None)
        .await?;
    Ok(Json(items))
}

pub async fn admin_get_timeline_item(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> Result<Json<AboutTimelineItem>, ApiError> {
    AboutTimelineItem::get(&state.db, id)
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::not_found("Timeline item not found"))
}

pub async fn create_timeline_item(
    State(state): State<Arc<AppState>>,
    JsonBody(req): JsonBody<AboutTimelineItemRequest>,
) -> Result<(StatusCode, Json<AboutTimelineItem>), ApiError> {
    validate_timeline_request(&req)?;
    let item = AboutTimelineItem::create(&state.db, &req).await?;
    Ok((StatusCode::CREATED, Json(item)))
}

pub async fn update_timeline_item(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
    JsonBody(req): JsonBody<AboutTimelineItemRequest>,
) -> Result<Json<AboutTimelineItem>, ApiError> {
    validate_timeline_request(&req)?;

    AboutTimelineItem::update(&state.db, id, &req)
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::not_found("Timeline item not found"))
}

pub async fn delete_timeline_item(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> Result<StatusCode, ApiError> {
    if !AboutTimelineItem::delete(&state.db, id).await? {
        return Err(ApiError::not_found("Timeline item not found"));
    }
    Ok(StatusCode::NO_CONTENT)
}

// Settings view

/// Section shown by the settings view: current, else latest, else defaults
async fn settings_section(
    db: &SqlitePool,
    kind: AboutSectionKind,
) -> Result<AboutSectionResponse, sqlx::Error> {
    Ok(AboutSection::editable(db, kind)
        .await?
        .map(|s| s.to_response())
        .unwrap_or_else(|| AboutSectionResponse::defaults(kind)))
}

async fn load_settings(db: &SqlitePool) -> Result<AboutSettingsResponse, sqlx::Error> {
    Ok(AboutSettingsResponse {
        story: settings_section(db, AboutSectionKind::Story).await?,
        mission: settings_section(db, AboutSectionKind::Mission).await?,
        vision: settings_section(db, AboutSectionKind::Vision).await?,
        values_header: settings_section(db, AboutSectionKind::Values).await?,
        timeline_header: settings_section(db, AboutSectionKind::Timeline).await?,
        values: AboutValue::list_active(db).await?,
        timeline_items: AboutTimelineItem::list_active(db).await?,
    })
}

/// GET /admin/about-settings/
pub async fn get_settings(
    State(state): State<Arc<AppState>>,
) -> Result<Json<AboutSettingsResponse>, ApiError> {
    Ok(Json(load_settings(&state.db).await?))
}

/// POST /admin/about-settings/ - save one section, return the refreshed view
pub async fn save_settings(
    State(state): State<Arc<AppState>>,
    JsonBody(req): JsonBody<AboutSettingsRequest>,
) -> Result<Json<AboutSettingsResponse>, ApiError> {
    let kind = AboutSectionKind::from_settings_key(&req.section).ok_or_else(|| {
        ApiError::validation_field("section", format!("\"{}\" is not a valid choice.", req.section))
    })?;
    validate_section_request(kind, &req.fields)?;

    let section = AboutSection::save_settings(&state.db, kind, &req.fields).await?;
    tracing::info!(id = section.id, section = %req.section, "About settings saved");

    Ok(Json(load_settings(&state.db).await?))
}
