//! Photo and video gallery of company events.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use std::sync::Arc;

use crate::db::{
    EventType, GalleryAdminQuery, GalleryItem, GalleryItemRequest, GalleryItemResponse,
    GalleryQuery, ListQuery, MediaType,
};
use crate::content::UploadKind;
use crate::AppState;

use super::error::{ApiError, ValidationErrorBuilder};
use super::extract::{JsonBody, RequestContext};
use super::pagination::{paginate, PageParams, Paginated};
use super::validation::{
    validate_choice, validate_optional_date, validate_optional_media_path, validate_text,
    validate_video, validate_video_type,
};

const GALLERY_ORDER: &str = "sort_order ASC, event_date DESC, created_at DESC, id DESC";

fn validate_item_request(req: &GalleryItemRequest) -> Result<(), ApiError> {
    let mut errors = ValidationErrorBuilder::new();

    errors.check("title", validate_text(&req.title, 200));
    errors.check("media_type", validate_choice::<MediaType>(&req.media_type));
    errors.check("event_type", validate_choice::<EventType>(&req.event_type));
    errors.check(
        "image",
        validate_optional_media_path(req.image.as_deref(), UploadKind::GalleryImages),
    );
    errors.check("video_type", validate_video_type(&req.video_type));
    if req.media_type == "video" {
        errors.check("video_url", validate_video(&req.video_url, &req.video_type));
    }
    errors.check(
        "video_file",
        validate_optional_media_path(req.video_file.as_deref(), UploadKind::GalleryVideos),
    );
    errors.check(
        "thumbnail",
        validate_optional_media_path(req.thumbnail.as_deref(), UploadKind::GalleryVideoThumbnails),
    );
    errors.check("event_date", validate_optional_date(req.event_date.as_deref()));

    let has = |v: &Option<String>| v.as_deref().is_some_and(|s| !s.is_empty());
    match req.media_type.as_str() {
        "image" if !has(&req.image) => {
            errors.add("image", "An image is required for image items.");
        }
        "video" if req.video_url.is_empty() && !has(&req.video_file) => {
            errors.add(
                "video_url",
                "Provide a video URL or upload a video file for video items.",
            );
        }
        _ => {}
    }

    errors.finish()
}

fn public_items(query: &GalleryQuery) -> ListQuery {
    let featured = query
        .featured
        .as_deref()
        .is_some_and(|f| f.eq_ignore_ascii_case("true"));

    let list = ListQuery::new("gallery_items", GALLERY_ORDER)
        .filter("is_active = 1")
        .filter_eq("media_type", query.media_type.as_deref())
        .filter_eq("event_type", query.event_type.as_deref());

    if featured {
        list.filter("is_featured = 1")
    } else {
        list
    }
}

/// GET /api/gallery/?media_type=&event_type=&featured=true
pub async fn list_items(
    State(state): State<Arc<AppState>>,
    ctx: RequestContext,
    Query(query): Query<GalleryQuery>,
    Query(page): Query<PageParams>,
) -> Result<Json<Paginated<GalleryItemResponse>>, ApiError> {
    let page: Paginated<GalleryItem> =
        paginate(&state.db, &public_items(&query), &page, &ctx).await?;
    Ok(Json(page.map(|item| item.to_response(&ctx.media))))
}

pub async fn get_item(
    State(state): State<Arc<AppState>>,
    ctx: RequestContext,
    Path(id): Path<i64>,
) -> Result<Json<GalleryItemResponse>, ApiError> {
    GalleryItem::get(&state.db, id)
        .await?
        .filter(|item| item.is_active)
        .map(|item| Json(item.to_response(&ctx.media)))
        .ok_or_else(|| ApiError::not_found("Gallery item not found"))
}

pub async fn admin_list_items(
    State(state): State<Arc<AppState>>,
    ctx: RequestContext,
    Query(query): Query<GalleryAdminQuery>,
) -> Result<Json<Vec<GalleryItemResponse>>, ApiError> {
    let items: Vec<GalleryItem> = ListQuery::new("gallery_items", GALLERY_ORDER)
        .filter_eq("media_type", query.media_type.as_deref())
        .filter_eq("event_type", query.event_type.as_deref())
        .filter_bool("is_featured", query.is_featured)
        .filter_bool("is_active", query.is_active)
        .search(&["title", "description"], query.search.as_deref())
        .fetch(&state.db, None)
        .await?;

    Ok(Json(
        items.iter().map(|item| item.to_response(&ctx.media)).collect(),
    ))
}

pub async fn admin_get_item(
    State(state): State<Arc<AppState>>,
    ctx: RequestContext,
    Path(id): Path<i64>,
) -> Result<Json<GalleryItemResponse>, ApiError> {
    GalleryItem::get(&state.db, id)
        .await?
        .map(|item| Json(item.to_response(&ctx.media)))
        .ok_or_else(|| ApiError::not_found("Gallery item not found"))
}

pub async fn create_item(
    State(state): State<Arc<AppState>>,
    ctx: RequestContext,
    JsonBody(req): JsonBody<GalleryItemRequest>,
) -> Result<(StatusCode, Json<GalleryItemResponse>), ApiError> {
    validate_item_request(&req)?;

    let item = GalleryItem::create(&state.db, &req).await?;
    tracing::info!(id = item.id, media_type = %item.media_type, "Gallery item created");

    Ok((StatusCode::CREATED, Json(item.to_response(&ctx.media))))
}

pub async fn update_item(
    State(state): State<Arc<AppState>>,
    ctx: RequestContext,
    Path(id): Path<i64>,
    JsonBody(req): JsonBody<GalleryItemRequest>,
) -> Result<Json<GalleryItemResponse>, ApiError> {
    validate_item_request(&req)?;

    GalleryItem::update(&state.db, id, &req)
        .await?
        .map(|item| Json(item.to_response(&ctx.media)))
        .ok_or_else(|| ApiError::not_found("Gallery item not found"))
}

pub async fn delete_item(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> Result<StatusCode, ApiError> {
    if !GalleryItem::delete(&state.db, id).await? {
        return Err(ApiError::not_found("Gallery item not found"));
    }
    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::init_in_memory;

    fn image_item(title: &str, featured: bool) -> GalleryItemRequest {
        GalleryItemRequest {
            title: title.to_string(),
            description: String::new(),
            media_type: "image".to_string(),
            event_type: "celebration".to_string(),
            image: Some("gallery/images/party.jpg".to_string()),
            video_type: "youtube".to_string(),
            video_url: String::new(),
            video_file: None,
            thumbnail: None,
            event_date: Some("2024-12-20".to_string()),
            is_featured: featured,
            is_active: true,
            order: 0,
        }
    }

    #[test]
    fn test_item_validation() {
        assert!(validate_item_request(&image_item("Year-end party", false)).is_ok());

        let mut req = image_item("Year-end party", false);
        req.image = None;
        assert!(validate_item_request(&req).is_err());

        let mut req = image_item("Launch video", false);
        req.media_type = "video".to_string();
        req.image = None;
        assert!(validate_item_request(&req).is_err());
        req.video_url = "https://youtu.be/dQw4w9WgXcQ".to_string();
        assert!(validate_item_request(&req).is_ok());

        let mut req = image_item("Stray link", false);
        req.video_url = "not a url".to_string();
        assert!(validate_item_request(&req).is_ok());
        req.media_type = "video".to_string();
        assert!(validate_item_request(&req).is_err());

        let mut req = image_item("Bad date", false);
        req.event_date = Some("20/12/2024".to_string());
        assert!(validate_item_request(&req).is_err());
    }

    #[tokio::test]
    async fn test_featured_filter() {
        let db = init_in_memory().await.unwrap();
        GalleryItem::create(&db, &image_item("Party", true)).await.unwrap();
        GalleryItem::create(&db, &image_item("Workshop", false)).await.unwrap();

        let all = public_items(&GalleryQuery::default());
        assert_eq!(all.count(&db).await.unwrap(), 2);

        let featured = public_items(&GalleryQuery {
            featured: Some("true".to_string()),
            ..Default::default()
        });
        assert_eq!(featured.count(&db).await.unwrap(), 1);

        let videos = public_items(&GalleryQuery {
            media_type: Some("video".to_string()),
            ..Default::default()
        });
        assert_eq!(videos.count(&db).await.unwrap(), 0);
    }
}
