//! Blog posts with their inline images and videos.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use lazy_static::lazy_static;
use regex::Regex;
use sqlx::SqlitePool;
use std::sync::Arc;

use crate::content::{sanitize_html, MediaUrls, UploadKind};
use crate::db::{
    BlogCategory, BlogPost, BlogPostAdminQuery, BlogPostImage, BlogPostImageRequest,
    BlogPostImageResponse, BlogPostQuery, BlogPostRequest, BlogPostResponse, BlogPostVideo,
    BlogPostVideoRequest, BlogPostVideoResponse, ListQuery,
};
use crate::AppState;

use super::error::{ApiError, ValidationErrorBuilder};
use super::extract::{JsonBody, RequestContext};
use super::pagination::{paginate, PageParams, Paginated};
use super::validation::{
    validate_choice, validate_max_length, validate_media_path, validate_optional_media_path,
    validate_required, validate_text, validate_video, validate_video_type,
};

lazy_static! {
    static ref SLUG_REGEX: Regex = Regex::new(r"^[-a-zA-Z0-9_]+$").unwrap();
}

fn validate_slug(slug: &str) -> Result<(), String> {
    if slug.is_empty() {
        return Ok(());
    }
    if !SLUG_REGEX.is_match(slug) {
        return Err(
            "Enter a valid \"slug\" consisting of letters, numbers, underscores or hyphens."
                .to_string(),
        );
    }
    validate_max_length(slug, 200)
}

fn validate_post_request(req: &BlogPostRequest) -> Result<(), ApiError> {
    let mut errors = ValidationErrorBuilder::new();

    errors.check("title", validate_text(&req.title, 200));
    errors.check("slug", validate_slug(req.slug.trim()));
    errors.check("excerpt", validate_max_length(&req.excerpt, 500));
    errors.check("content", validate_required(&req.content));
    errors.check("category", validate_choice::<BlogCategory>(&req.category));
    errors.check("author", validate_text(&req.author, 100));
    errors.check(
        "featured_image",
        validate_optional_media_path(req.featured_image.as_deref(), UploadKind::BlogImages),
    );

    errors.finish()
}

fn validate_image_request(req: &BlogPostImageRequest) -> Result<(), ApiError> {
    let mut errors = ValidationErrorBuilder::new();

    errors.check(
        "image",
        validate_media_path(&req.image, UploadKind::BlogContentImages),
    );
    errors.check("caption", validate_max_length(&req.caption, 300));
    errors.check("alt_text", validate_max_length(&req.alt_text, 200));

    errors.finish()
}

fn validate_video_request(req: &BlogPostVideoRequest) -> Result<(), ApiError> {
    let mut errors = ValidationErrorBuilder::new();

    errors.check("video_type", validate_video_type(&req.video_type));
    errors.check("video_url", validate_video(&req.video_url, &req.video_type));
    errors.check(
        "video_file",
        validate_optional_media_path(req.video_file.as_deref(), UploadKind::BlogVideos),
    );
    errors.check("title", validate_max_length(&req.title, 200));
    errors.check(
        "thumbnail",
        validate_optional_media_path(req.thumbnail.as_deref(), UploadKind::BlogVideoThumbnails),
    );

    errors.finish()
}

/// Staff-authored rich text is cleaned before it is stored
fn sanitize_post(mut req: BlogPostRequest) -> BlogPostRequest {
    req.content = sanitize_html(&req.content);
    req.excerpt = sanitize_html(&req.excerpt);
    req
}

fn published_posts(query: &BlogPostQuery) -> ListQuery {
    let category = query
        .category
        .as_deref()
        .filter(|c| !c.eq_ignore_ascii_case("all"));

    ListQuery::new("blog_posts", "created_date DESC, id DESC")
        .filter("published = 1")
        .filter_eq("category", category)
        .search(&["title", "excerpt"], query.search.as_deref())
}

fn admin_posts(query: &BlogPostAdminQuery) -> ListQuery {
    ListQuery::new("blog_posts", "created_date DESC, id DESC")
        .filter_eq("category", query.category.as_deref())
        .filter_bool("published", query.published)
        .search(
            &["title", "excerpt", "content", "author"],
            query.search.as_deref(),
        )
}

async fn responses(
    db: &SqlitePool,
    posts: Vec<BlogPost>,
    media: &MediaUrls,
) -> Result<Vec<BlogPostResponse>, ApiError> {
    let mut results = Vec::with_capacity(posts.len());
    for post in posts {
        results.push(post.to_response(db, media).await?);
    }
    Ok(results)
}

/// Count the read and render a published post
async fn view_published(
    db: &SqlitePool,
    post: Option<BlogPost>,
    media: &MediaUrls,
) -> Result<Json<BlogPostResponse>, ApiError> {
    let post = post
        .filter(|p| p.published)
        .ok_or_else(|| ApiError::not_found("Blog post not found"))?;

    let post = BlogPost::record_view(db, post.id)
        .await?
        .ok_or_else(|| ApiError::not_found("Blog post not found"))?;

    Ok(Json(post.to_response(db, media).await?))
}

async fn require_post(db: &SqlitePool, id: i64) -> Result<BlogPost, ApiError> {
    BlogPost::get(db, id)
        .await?
        .ok_or_else(|| ApiError::not_found("Blog post not found"))
}

// Public

/// GET /api/blog-posts/?category=&search=
pub async fn list_posts(
    State(state): State<Arc<AppState>>,
    ctx: RequestContext,
    Query(query): Query<BlogPostQuery>,
    Query(page): Query<PageParams>,
) -> Result<Json<Paginated<BlogPostResponse>>, ApiError> {
    let page: Paginated<BlogPost> =
        paginate(&state.db, &published_posts(&query), &page, &ctx).await?;

    let results = responses(&state.db, page.results, &ctx.media).await?;
    Ok(Json(Paginated {
        count: page.count,
        next: page.next,
        previous: page.previous,
        results,
    }))
}

/// GET /api/blog-posts/:id/ - counts a view
pub async fn get_post(
    State(state): State<Arc<AppState>>,
    ctx: RequestContext,
    Path(id): Path<i64>,
) -> Result<Json<BlogPostResponse>, ApiError> {
    let post = BlogPost::get(&state.db, id).await?;
    view_published(&state.db, post, &ctx.media).await
}

/// GET /api/blog-posts/slug/:slug/ - counts a view
pub async fn get_post_by_slug(
    State(state): State<Arc<AppState>>,
    ctx: RequestContext,
    Path(slug): Path<String>,
) -> Result<Json<BlogPostResponse>, ApiError> {
    let post = BlogPost::get_by_slug(&state.db, &slug).await?;
    view_published(&state.db, post, &ctx.media).await
}

// Admin

pub async fn admin_list_posts(
    State(state): State<Arc<AppState>>,
    ctx: RequestContext,
    Query(query): Query<BlogPostAdminQuery>,
) -> Result<Json<Vec<BlogPostResponse>>, ApiError> {
    let posts: Vec<BlogPost> = admin_posts(&query).fetch(&state.db, None).await?;

    Ok(Json(responses(&state.db, posts, &ctx.media).await?))
}

/// Admin reads don't count as views
pub async fn admin_get_post(
    State(state): State<Arc<AppState>>,
    ctx: RequestContext,
    Path(id): Path<i64>,
) -> Result<Json<BlogPostResponse>, ApiError> {
    let post = require_post(&state.db, id).await?;
    Ok(Json(post.to_response(&state.db, &ctx.media).await?))
}

pub async fn create_post(
    State(state): State<Arc<AppState>>,
    ctx: RequestContext,
    JsonBody(req): JsonBody<BlogPostRequest>,
) -> Result<(StatusCode, Json<BlogPostResponse>), ApiError> {
    validate_post_request(&req)?;

    let post = BlogPost::create(&state.db, &sanitize_post(req)).await?;
    tracing::info!(id = post.id, slug = %post.slug, "Blog post created");

    let response = post.to_response(&state.db, &ctx.media).await?;
    Ok((StatusCode::CREATED, Json(response)))
}

pub async fn update_post(
    State(state): State<Arc<AppState>>,
    ctx: RequestContext,
    Path(id): Path<i64>,
    JsonBody(req): JsonBody<BlogPostRequest>,
) -> Result<Json<BlogPostResponse>, ApiError> {
    validate_post_request(&req)?;

    let post = BlogPost::update(&state.db, id, &sanitize_post(req))
        .await?
        .ok_or_else(|| ApiError::not_found("Blog post not found"))?;
    tracing::info!(id = post.id, slug = %post.slug, "Blog post updated");

    Ok(Json(post.to_response(&state.db, &ctx.media).await?))
}

/// Removes the post together with its images and videos
pub async fn delete_post(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> Result<StatusCode, ApiError> {
    if !BlogPost::delete(&state.db, id).await? {
        return Err(ApiError::not_found("Blog post not found"));
    }
    tracing::info!(id, "Blog post deleted");
    Ok(StatusCode::NO_CONTENT)
}

pub async fn list_post_images(
    State(state): State<Arc<AppState>>,
    ctx: RequestContext,
    Path(post_id): Path<i64>,
) -> Result<Json<Vec<BlogPostImageResponse>>, ApiError> {
    require_post(&state.db, post_id).await?;
    let images = BlogPostImage::list_for_post(&state.db, post_id).await?;
    Ok(Json(
        images.iter().map(|i| i.to_response(&ctx.media)).collect(),
    ))
}

pub async fn create_post_image(
    State(state): State<Arc<AppState>>,
    ctx: RequestContext,
    Path(post_id): Path<i64>,
    JsonBody(req): JsonBody<BlogPostImageRequest>,
) -> Result<(StatusCode, Json<BlogPostImageResponse>), ApiError> {
    require_post(&state.db, post_id).await?;
    validate_image_request(&req)?;

    let image = BlogPostImage::create(&state.db, post_id, &req).await?;
    Ok((StatusCode::CREATED, Json(image.to_response(&ctx.media))))
}

pub async fn get_post_image(
    State(state): State<Arc<AppState>>,
    ctx: RequestContext,
    Path((post_id, id)): Path<(i64, i64)>,
) -> Result<Json<BlogPostImageResponse>, ApiError> {
    BlogPostImage::get(&state.db, post_id, id)
        .await?
        .map(|i| Json(i.to_response(&ctx.media)))
        .ok_or_else(|| ApiError::not_found("Blog post image not found"))
}

pub async fn update_post_image(
    State(state): State<Arc<AppState>>,
    ctx: RequestContext,
    Path((post_id, id)): Path<(i64, i64)>,
    JsonBody(req): JsonBody<BlogPostImageRequest>,
) -> Result<Json<BlogPostImageResponse>, ApiError> {
    validate_image_request(&req)?;

    BlogPostImage::update(&state.db, post_id, id, &req)
        .await?
        .map(|i| Json(i.to_response(&ctx.media)))
        .ok_or_else(|| ApiError::not_found("Blog post image not found"))
}

pub async fn delete_post_image(
    State(state): State<Arc<AppState>>,
    Path((post_id, id)): Path<(i64, i64)>,
) -> Result<StatusCode, ApiError> {
    if !BlogPostImage::delete(&state.db, post_id, id).await? {
        return Err(ApiError::not_found("Blog post image not found"));
    }
    Ok(StatusCode::NO_CONTENT)
}

pub async fn list_post_videos(
    State(state): State<Arc<AppState>>,
    ctx: RequestContext,
    Path(post_id): Path<i64>,
) -> Result<Json<Vec<BlogPostVideoResponse>>, ApiError> {
    require_post(&state.db, post_id).await?;
    let videos = BlogPostVideo::list_for_post(&state.db, post_id).await?;
    Ok(Json(
        videos.iter().map(|v| v.to_response(&ctx.media)).collect(),
    ))
}

pub async fn create_post_video(
    State(state): State<Arc<AppState>>,
    ctx: RequestContext,
    Path(post_id): Path<i64>,
    JsonBody(req): JsonBody<BlogPostVideoRequest>,
) -> Result<(StatusCode, Json<BlogPostVideoResponse>), ApiError> {
    require_post(&state.db, post_id).await?;
    validate_video_request(&req)?;

    let video = BlogPostVideo::create(&state.db, post_id, &req).await?;
    Ok((StatusCode::CREATED, Json(video.to_response(&ctx.media))))
}

pub async fn get_post_video(
    State(state): State<Arc<AppState>>,
    ctx: RequestContext,
    Path((post_id, id)): Path<(i64, i64)>,
) -> Result<Json<BlogPostVideoResponse>, ApiError> {
    BlogPostVideo::get(&state.db, post_id, id)
        .await?
        .map(|v| Json(v.to_response(&ctx.media)))
        .ok_or_else(|| ApiError::not_found("Blog post video not found"))
}

pub async fn update_post_video(
    State(state): State<Arc<AppState>>,
    ctx: RequestContext,
    Path((post_id, id)): Path<(i64, i64)>,
    JsonBody(req): JsonBody<BlogPostVideoRequest>,
) -> Result<Json<BlogPostVideoResponse>, ApiError> {
    validate_video_request(&req)?;

    BlogPostVideo::update(&state.db, post_id, id, &req)
        .await?
        .map(|v| Json(v.to_response(&ctx.media)))
        .ok_or_else(|| ApiError::not_found("Blog post video not found"))
}

pub async fn delete_post_video(
    State(state): State<Arc<AppState>>,
    Path((post_id, id)): Path<(i64, i64)>,
) -> Result<StatusCode, ApiError> {
    if !BlogPostVideo::delete(&state.db, post_id, id).await? {
        return Err(ApiError::not_found("Blog post video not found"));
    }
    Ok(StatusCode::NO_CONTENT)
}
