//! Hero banner and per-page images.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use std::sync::Arc;

use crate::db::{
    HeroImage, HeroImageAdminQuery, HeroImageRequest, HeroImageResponse, ListQuery, PageImage,
    PageImageAdminQuery, PageImageQuery, PageImageRequest, PageImageResponse, SitePage,
};
use crate::content::UploadKind;
use crate::AppState;

use super::error::{ApiError, ValidationErrorBuilder};
use super::extract::{JsonBody, RequestContext};
use super::pagination::Paginated;
use super::validation::{validate_choice, validate_max_length, validate_media_path, validate_text};

fn validate_hero_request(req: &HeroImageRequest) -> Result<(), ApiError> {
    let mut errors = ValidationErrorBuilder::new();

    errors.check("title", validate_text(&req.title, 200));
    errors.check("image", validate_media_path(&req.image, UploadKind::HeroImages));

    errors.finish()
}

fn validate_page_image_request(req: &PageImageRequest) -> Result<(), ApiError> {
    let mut errors = ValidationErrorBuilder::new();

    errors.check("page", validate_choice::<SitePage>(&req.page));
    errors.check("title", validate_text(&req.title, 200));
    errors.check("image", validate_media_path(&req.image, UploadKind::PageImages));
    errors.check("section", validate_max_length(&req.section, 50));

    errors.finish()
}

/// GET /api/hero-images/ - at most the one current hero
pub async fn list_hero_images(
    State(state): State<Arc<AppState>>,
    ctx: RequestContext,
) -> Result<Json<Paginated<HeroImageResponse>>, ApiError> {
    let current = HeroImage::current(&state.db).await?;
    Ok(Json(
        Paginated::single(current).map(|h| h.to_response(&ctx.media)),
    ))
}

pub async fn get_hero_image(
    State(state): State<Arc<AppState>>,
    ctx: RequestContext,
    Path(id): Path<i64>,
) -> Result<Json<HeroImageResponse>, ApiError> {
    HeroImage::get(&state.db, id)
        .await?
        .filter(|h| h.is_active)
        .map(|h| Json(h.to_response(&ctx.media)))
        .ok_or_else(|| ApiError::not_found("Hero image not found"))
}

fn page_image_query(page: Option<&str>, section: Option<&str>) -> ListQuery {
    ListQuery::new("page_images", "page ASC, is_active DESC, created_at DESC, id DESC")
        .filter_eq("page", page)
        .filter_eq("section", section)
}

/// GET /api/page-images/?page=&section=
pub async fn list_page_images(
    State(state): State<Arc<AppState>>,
    ctx: RequestContext,
    Query(query): Query<PageImageQuery>,
) -> Result<Json<Vec<PageImageResponse>>, ApiError> {
    let images: Vec<PageImage> = page_image_query(query.page.as_deref(), query.section.as_deref())
        .filter("is_active = 1")
        .fetch(&state.db, None)
        .await?;

    Ok(Json(
        images.iter().map(|i| i.to_response(&ctx.media)).collect(),
    ))
}

pub async fn get_page_image(
    State(state): State<Arc<AppState>>,
    ctx: RequestContext,
    Path(id): Path<i64>,
) -> Result<Json<PageImageResponse>, ApiError> {
    PageImage::get(&state.db, id)
        .await?
        .filter(|i| i.is_active)
        .map(|i| Json(i.to_response(&ctx.media)))
        .ok_or_else(|| ApiError::not_found("Page image not found"))
}

// Admin

pub async fn admin_list_hero_images(
    State(state): State<Arc<AppState>>,
    ctx: RequestContext,
    Query(query): Query<HeroImageAdminQuery>,
) -> Result<Json<Vec<HeroImageResponse>>, ApiError> {
    let images: Vec<HeroImage> =
        ListQuery::new("hero_images", "is_active DESC, created_at DESC, id DESC")
            .filter_bool("is_active", query.is_active)
            .search(&["title"], query.search.as_deref())
            .fetch(&state.db, None)
            .await?;

    Ok(Json(
        images.iter().map(|h| h.to_response(&ctx.media)).collect(),
    ))
}

pub async fn admin_get_hero_image(
    State(state): State<Arc<AppState>>,
    ctx: RequestContext,
    Path(id): Path<i64>,
) -> Result<Json<HeroImageResponse>, ApiError> {
    HeroImage::get(&state.db, id)
        .await?
        .map(|h| Json(h.to_response(&ctx.media)))
        .ok_or_else(|| ApiError::not_found("Hero image not found"))
}

pub async fn create_hero_image(
    State(state): State<Arc<AppState>>,
    ctx: RequestContext,
    JsonBody(req): JsonBody<HeroImageRequest>,
) -> Result<(StatusCode, Json<HeroImageResponse>), ApiError> {
    validate_hero_request(&req)?;

    let hero = HeroImage::create(&state.db, &req).await?;
    tracing::info!(id = hero.id, image = %hero.image, "Hero image created");

    Ok((StatusCode::CREATED, Json(hero.to_response(&ctx.media))))
}

pub async fn update_hero_image(
    State(state): State<Arc<AppState>>,
    ctx: RequestContext,
    Path(id): Path<i64>,
    JsonBody(req): JsonBody<HeroImageRequest>,
) -> Result<Json<HeroImageResponse>, ApiError> {
    validate_hero_request(&req)?;

    HeroImage::update(&state.db, id, &req)
        .await?
        .map(|h| Json(h.to_response(&ctx.media)))
        .ok_or_else(|| ApiError::not_found("Hero image not found"))
}

pub async fn delete_hero_image(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> Result<StatusCode, ApiError> {
    if !HeroImage::delete(&state.db, id).await? {
        return Err(ApiError::not_found("Hero image not found"));
    }
    Ok(StatusCode::NO_CONTENT)
}

pub async fn admin_list_page_images(
    State(state): State<Arc<AppState>>,
    ctx: RequestContext,
    Query(query): Query<PageImageAdminQuery>,
) -> Result<Json<Vec<PageImageResponse>>, ApiError> {
    let images: Vec<PageImage> = page_image_query(query.page.as_deref(), query.section.as_deref())
        .filter_bool("is_active", query.is_active)
        .search(&["title", "section"], query.search.as_deref())
        .fetch(&state.db, None)
        .await?;

    Ok(Json(
        images.iter().map(|i| i.to_response(&ctx.media)).collect(),
    ))
}

pub async fn admin_get_page_image(
    State(state): State<Arc<AppState>>,
    ctx: RequestContext,
    Path(id): Path<i64>,
) -> Result<Json<PageImageResponse>, ApiError> {
    PageImage::get(&state.db, id)
        .await?
        .map(|i| Json(i.to_response(&ctx.media)))
        .ok_or_else(|| ApiError::not_found("Page image not found"))
}

pub async fn create_page_image(
    State(state): State<Arc<AppState>>,
    ctx: RequestContext,
    JsonBody(req): JsonBody<PageImageRequest>,
) -> Result<(StatusCode, Json<PageImageResponse>), ApiError> {
    validate_page_image_request(&req)?;

    let image = PageImage::create(&state.db, &req).await?;
    tracing::info!(id = image.id, page = %image.page, "Page image created");

    Ok((StatusCode::CREATED, Json(image.to_response(&ctx.media))))
}

pub async fn update_page_image(
    State(state): State<Arc<AppState>>,
    ctx: RequestContext,
    Path(id): Path<i64>,
    JsonBody(req): JsonBody<PageImageRequest>,
) -> Result<Json<PageImageResponse>, ApiError> {
    validate_page_image_request(&req)?;

    PageImage::update(&state.db, id, &req)
        .await?
        .map(|i| Json(i.to_response(&ctx.media)))
        .ok_or_else(|| ApiError::not_found("Page image not found"))
}

pub async fn delete_page_image(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> Result<StatusCode, ApiError> {
    if !PageImage::delete(&state.db, id).await? {
        return Err(ApiError::not_found("Page image not found"));
    }
    Ok(StatusCode::NO_CONTENT)
}
