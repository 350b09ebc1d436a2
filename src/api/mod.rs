mod about;
pub mod auth;
mod blog;
mod contact;
mod contact_info;
pub mod error;
pub mod extract;
mod gallery;
mod images;
pub mod metrics;
pub mod pagination;
pub mod rate_limit;
mod services;
mod stats;
mod updates;
mod uploads;
mod validation;

use axum::{
    extract::{DefaultBodyLimit, State},
    http::{header, HeaderValue, Method},
    middleware,
    routing::{get, post, MethodRouter},
    Router,
};
use std::sync::Arc;
use std::time::Duration;
use tower_http::{
    compression::CompressionLayer,
    cors::{AllowOrigin, CorsLayer},
    services::ServeDir,
    trace::TraceLayer,
};

use crate::config::CorsConfig;
use crate::db::AboutSectionKind;
use crate::AppState;

/// Multipart framing allowance on top of the configured file size
const MULTIPART_OVERHEAD: usize = 64 * 1024;

fn section_route(kind: AboutSectionKind) -> MethodRouter<Arc<AppState>> {
    get(move |state: State<Arc<AppState>>| about::list_section(state, kind))
}

pub fn create_router(state: Arc<AppState>) -> Router {
    let require_auth = || middleware::from_fn_with_state(state.clone(), auth::auth_middleware);

    // Public read endpoints
    let public_routes = Router::new()
        .route("/services/", get(services::list_services))
        .route("/services/:id/", get(services::get_service))
        .route("/testimonials/", get(services::list_testimonials))
        .route("/testimonials/:id/", get(services::get_testimonial))
        .route("/hero-images/", get(images::list_hero_images))
        .route("/hero-images/:id/", get(images::get_hero_image))
        .route("/page-images/", get(images::list_page_images))
        .route("/page-images/:id/", get(images::get_page_image))
        .route("/blog-posts/", get(blog::list_posts))
        .route("/blog-posts/:id/", get(blog::get_post))
        .route("/blog-posts/slug/:slug/", get(blog::get_post_by_slug))
        .route("/updates/", get(updates::list_updates))
        .route("/updates/:id/", get(updates::get_update))
        .route("/about-story/", section_route(AboutSectionKind::Story))
        .route("/about-mission/", section_route(AboutSectionKind::Mission))
        .route("/about-vision/", section_route(AboutSectionKind::Vision))
        .route("/about-values-header/", section_route(AboutSectionKind::Values))
        .route("/about-timeline-header/", section_route(AboutSectionKind::Timeline))
        .route("/about-values/", get(about::list_values))
        .route("/about-timeline-items/", get(about::list_timeline_items))
        .route("/contact-information/", get(contact_info::list_contact_information))
        .route("/gallery/", get(gallery::list_items))
        .route("/gallery/:id/", get(gallery::get_item))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            rate_limit::rate_limit_api,
        ));

    // Contact form has its own, tighter quota
    let contact_routes = Router::new()
        .route("/contact/", post(contact::create_message))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            rate_limit::rate_limit_contact,
        ))
        .route(
            "/contact/list/",
            get(contact::list_all_messages).route_layer(require_auth()),
        );

    let auth_routes = Router::new()
        .route("/login", post(auth::login))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            rate_limit::rate_limit_auth,
        ))
        .route("/validate", get(auth::validate))
        .route("/logout", post(auth::logout));

    let upload_limit = usize::try_from(state.config.uploads.max_upload_size)
        .unwrap_or(usize::MAX)
        .saturating_add(MULTIPART_OVERHEAD);

    // Staff CRUD, all behind a token
    let admin_routes = Router::new()
        .route("/stats", get(stats::get_stats))
        // Contact messages
        .route("/contact-messages", get(contact::list_messages))
        .route("/contact-messages/mark", post(contact::mark_messages))
        .route(
            "/contact-messages/:id",
            get(contact::get_message).delete(contact::delete_message),
        )
        // Services
        .route(
            "/services",
            get(services::admin_list_services).post(services::create_service),
        )
        .route(
            "/services/:id",
            get(services::admin_get_service)
                .put(services::update_service)
                .delete(services::delete_service),
        )
        // Testimonials
        .route(
            "/testimonials",
            get(services::admin_list_testimonials).post(services::create_testimonial),
        )
        .route("/testimonials/feature", post(services::feature_testimonials))
        .route(
            "/testimonials/:id",
            get(services::admin_get_testimonial)
                .put(services::update_testimonial)
                .delete(services::delete_testimonial),
        )
        // Images
        .route(
            "/hero-images",
            get(images::admin_list_hero_images).post(images::create_hero_image),
        )
        .route(
            "/hero-images/:id",
            get(images::admin_get_hero_image)
                .put(images::update_hero_image)
                .delete(images::delete_hero_image),
        )
        .route(
            "/page-images",
            get(images::admin_list_page_images).post(images::create_page_image),
        )
        .route(
            "/page-images/:id",
            get(images::admin_get_page_image)
                .put(images::update_page_image)
                .delete(images::delete_page_image),
        )
        // Blog
        .route(
            "/blog-posts",
            get(blog::admin_list_posts).post(blog::create_post),
        )
        .route(
            "/blog-posts/:id",
            get(blog::admin_get_post)
                .put(blog::update_post)
                .delete(blog::delete_post),
        )
        .route(
            "/blog-posts/:id/images",
            get(blog::list_post_images).post(blog::create_post_image),
        )
        .route(
            "/blog-posts/:id/images/:image_id",
            get(blog::get_post_image)
                .put(blog::update_post_image)
                .delete(blog::delete_post_image),
        )
        .route(
            "/blog-posts/:id/videos",
            get(blog::list_post_videos).post(blog::create_post_video),
        )
        .route(
            "/blog-posts/:id/videos/:video_id",
            get(blog::get_post_video)
                .put(blog::update_post_video)
                .delete(blog::delete_post_video),
        )
        // Updates
        .route(
            "/updates",
            get(updates::admin_list_updates).post(updates::create_update),
        )
        .route(
            "/updates/:id",
            get(updates::admin_get_update)
                .put(updates::update_update)
                .delete(updates::delete_update),
        )
        // About
        .route(
            "/about-sections/:kind",
            get(about::admin_list_sections).post(about::create_section),
        )
        .route(
            "/about-sections/:kind/:id",
            get(about::admin_get_section)
                .put(about::update_section)
                .delete(about::delete_section),
        )
        .route(
            "/about-values",
            get(about::admin_list_values).post(about::create_value),
        )
        .route(
            "/about-values/:id",
            get(about::admin_get_value)
                .put(about::update_value)
                .delete(about::delete_value),
        )
        .route(
            "/about-timeline-items",
            get(about::admin_list_timeline_items).post(about::create_timeline_item),
        )
        .route(
            "/about-timeline-items/:id",
            get(about::admin_get_timeline_item)
                .put(about::update_timeline_item)
                .delete(about::delete_timeline_item),
        )
        // Contact information
        .route(
            "/contact-information",
            get(contact_info::admin_list_contact_information)
                .post(contact_info::create_contact_information),
        )
        .route(
            "/contact-information/:id",
            get(contact_info::admin_get_contact_information)
                .put(contact_info::update_contact_information)
                .delete(contact_info::delete_contact_information),
        )
        // Gallery
        .route(
            "/gallery",
            get(gallery::admin_list_items).post(gallery::create_item),
        )
        .route(
            "/gallery/:id",
            get(gallery::admin_get_item)
                .put(gallery::update_item)
                .delete(gallery::delete_item),
        )
        // Uploads
        .route(
            "/uploads/:kind",
            post(uploads::upload_file).layer(DefaultBodyLimit::max(upload_limit)),
        )
        .layer(require_auth());

    Router::new()
        .route("/health", get(health_check))
        .route("/metrics", get(metrics::metrics_endpoint))
        .nest(
            "/api",
            Router::new().merge(public_routes).merge(contact_routes),
        )
        .nest("/admin/api/auth", auth_routes)
        .nest("/admin/api", admin_routes)
        .route(
            "/admin/about-settings/",
            get(about::get_settings)
                .post(about::save_settings)
                .route_layer(require_auth()),
        )
        .nest_service("/media", ServeDir::new(&state.config.uploads.media_dir))
        .layer(middleware::from_fn(metrics::metrics_middleware))
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .layer(build_cors_layer(&state.config.cors))
        .with_state(state)
}

/// CORS from the configured origins; `*` allows any origin.
/// Origins that aren't valid header values are skipped with a warning.
pub fn build_cors_layer(config: &CorsConfig) -> CorsLayer {
    let allow_origin = if config.allowed_origins.iter().any(|o| o == "*") {
        AllowOrigin::any()
    } else {
        let origins: Vec<HeaderValue> = config
            .allowed_origins
            .iter()
            .filter_map(|o| match o.parse() {
                Ok(v) => Some(v),
                Err(e) => {
                    tracing::warn!("Ignoring invalid CORS origin '{}': {}", o, e);
                    None
                }
            })
            .collect();
        AllowOrigin::list(origins)
    };

    CorsLayer::new()
        .allow_origin(allow_origin)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers([
            header::CONTENT_TYPE,
            header::AUTHORIZATION,
            header::HeaderName::from_static("x-api-key"),
        ])
        .max_age(Duration::from_secs(3600))
}

async fn health_check() -> &'static str {
    "OK"
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use http_body_util::BodyExt;
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use crate::config::Config;
    use crate::db::init_in_memory;

    const TOKEN: &str = "test-admin-token";

    async fn test_app_with(config: Config) -> Router {
        let db = init_in_memory().await.unwrap();
        create_router(Arc::new(AppState::new(config, db)))
    }

    async fn test_app() -> Router {
        let mut config = Config::default();
        config.auth.admin_token = TOKEN.to_string();
        test_app_with(config).await
    }

    async fn send(app: &Router, method: &str, uri: &str, body: Option<Value>, auth: bool) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if auth {
            builder = builder.header("Authorization", format!("Bearer {}", TOKEN));
        }
        let request = match body {
            Some(json) => builder
                .header("content-type", "application/json")
                .body(Body::from(json.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, value)
    }

    fn post_body(title: &str) -> Value {
        json!({
            "title": title,
            "content": "<p>Start small, save daily.</p>",
            "category": "Savings Guide",
            "author": "Bencyn Team",
            "published": true
        })
    }

    #[tokio::test]
    async fn test_health() {
        let app = test_app().await;
        let response = app
            .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        assert_eq!(&bytes[..], b"OK");
    }

    #[tokio::test]
    async fn test_contact_missing_field_is_400_with_details() {
        let app = test_app().await;
        let (status, body) = send(
            &app,
            "POST",
            "/api/contact/",
            Some(json!({"name": "Ama", "subject": "Hi", "message": "Hello"})),
            false,
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["code"], "validation_error");
        assert_eq!(body["error"]["details"]["email"][0], "This field is required.");
    }

    #[tokio::test]
    async fn test_contact_submission_and_admin_list() {
        let app = test_app().await;
        let (status, created) = send(
            &app,
            "POST",
            "/api/contact/",
            Some(json!({
                "name": "Kwame",
                "email": "kwame@example.com",
                "subject": "Group susu",
                "message": "<script>x()</script>Tell me more"
            })),
            false,
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(created["is_read"], false);
        assert!(!created["message"].as_str().unwrap().contains("<script>"));

        let (status, _) = send(&app, "GET", "/api/contact/list/", None, false).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);

        let (status, list) = send(&app, "GET", "/api/contact/list/", None, true).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(list.as_array().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_admin_requires_token() {
        let app = test_app().await;
        let (status, body) = send(&app, "GET", "/admin/api/services", None, false).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["error"]["code"], "unauthorized");

        let (status, _) = send(&app, "GET", "/admin/about-settings/", None, false).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);

        let (status, _) = send(&app, "GET", "/admin/api/stats", None, true).await;
        assert_eq!(status, StatusCode::OK);
    }

    #[tokio::test]
    async fn test_blog_slugs_and_views() {
        let app = test_app().await;

        let mut slugs = Vec::new();
        for _ in 0..3 {
            let (status, post) = send(
                &app,
                "POST",
                "/admin/api/blog-posts",
                Some(post_body("Saving for school fees")),
                true,
            )
            .await;
            assert_eq!(status, StatusCode::CREATED);
            slugs.push(post["slug"].as_str().unwrap().to_string());
        }
        assert_eq!(
            slugs,
            vec![
                "saving-for-school-fees",
                "saving-for-school-fees-1",
                "saving-for-school-fees-2"
            ]
        );

        let (_, first) = send(&app, "GET", "/api/blog-posts/slug/saving-for-school-fees/", None, false).await;
        assert_eq!(first["views"], 1);
        let id = first["id"].as_i64().unwrap();
        let (_, second) = send(&app, "GET", &format!("/api/blog-posts/{}/", id), None, false).await;
        assert_eq!(second["views"], 2);

        let (status, page) = send(&app, "GET", "/api/blog-posts/?category=all", None, false).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(page["count"], 3);
    }

    #[tokio::test]
    async fn test_accented_title_slug_survives_update() {
        let app = test_app().await;
        let (status, post) = send(
            &app,
            "POST",
            "/admin/api/blog-posts",
            Some(post_body("Café Susu")),
            true,
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(post["slug"], "cafe-susu");

        let mut body = post_body("Café Susu, revisited");
        body["slug"] = post["slug"].clone();
        let (status, updated) = send(
            &app,
            "PUT",
            &format!("/admin/api/blog-posts/{}", post["id"]),
            Some(body),
            true,
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(updated["slug"], "cafe-susu");
        assert_eq!(updated["title"], "Café Susu, revisited");
    }

    #[tokio::test]
    async fn test_hero_images_return_latest_active_only() {
        let app = test_app().await;
        for title in ["First", "Second"] {
            let (status, _) = send(
                &app,
                "POST",
                "/admin/api/hero-images",
                Some(json!({"title": title, "image": "hero_images/a.jpg"})),
                true,
            )
            .await;
            assert_eq!(status, StatusCode::CREATED);
        }

        let (status, body) = send(
            &app,
            "POST",
            "/admin/api/hero-images",
            Some(json!({"title": "Clip", "image": "gallery_videos/x.mp4"})),
            true,
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"]["details"]["image"][0]
            .as_str()
            .unwrap()
            .contains("\"mp4\" is not allowed"));

        let (status, page) = send(&app, "GET", "/api/hero-images/", None, false).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(page["count"], 1);
        assert_eq!(page["results"][0]["title"], "Second");
        assert_eq!(page["results"][0]["image"], "/media/hero_images/a.jpg");
    }

    #[tokio::test]
    async fn test_pagination_links_and_bounds() {
        let app = test_app().await;
        for i in 0..21 {
            let (status, _) = send(
                &app,
                "POST",
                "/admin/api/services",
                Some(json!({
                    "title": format!("Plan {}", i),
                    "description": "Flexible savings",
                    "service_type": "savings"
                })),
                true,
            )
            .await;
            assert_eq!(status, StatusCode::CREATED);
        }

        let (_, first) = send(&app, "GET", "/api/services/", None, false).await;
        assert_eq!(first["count"], 21);
        assert_eq!(first["results"].as_array().unwrap().len(), 20);
        assert_eq!(first["next"], "/api/services/?page=2");
        assert_eq!(first["previous"], Value::Null);

        let (_, second) = send(&app, "GET", "/api/services/?page=2", None, false).await;
        assert_eq!(second["results"].as_array().unwrap().len(), 1);
        assert_eq!(second["previous"], "/api/services/");

        let (status, body) = send(&app, "GET", "/api/services/?page=3", None, false).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"]["message"], "Invalid page.");
    }

    #[tokio::test]
    async fn test_about_settings_roundtrip() {
        let app = test_app().await;

        let (status, _) = send(
            &app,
            "POST",
            "/admin/about-settings/",
            Some(json!({"section": "history", "content": "x"})),
            true,
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, settings) = send(
            &app,
            "POST",
            "/admin/about-settings/",
            Some(json!({"section": "story", "content": "Founded in Accra."})),
            true,
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(settings["story"]["content"], "Founded in Accra.");
        assert_eq!(settings["mission"]["title"], "Our Mission");

        let (_, story) = send(&app, "GET", "/api/about-story/", None, false).await;
        assert_eq!(story.as_array().unwrap().len(), 1);
        assert_eq!(story[0]["title"], "Our Story");
    }

    #[tokio::test]
    async fn test_malformed_json_is_api_error() {
        let app = test_app().await;
        let request = Request::builder()
            .method("POST")
            .uri("/api/contact/")
            .header("content-type", "application/json")
            .body(Body::from("{not json"))
            .unwrap();
        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_contact_rate_limit() {
        let mut config = Config::default();
        config.rate_limit.contact_requests_per_window = 1;
        let app = test_app_with(config).await;

        let body = json!({"name": "A", "email": "a@example.com", "subject": "S", "message": "M"});
        let (status, _) = send(&app, "POST", "/api/contact/", Some(body.clone()), false).await;
        assert_eq!(status, StatusCode::CREATED);

        let (status, body) = send(&app, "POST", "/api/contact/", Some(body), false).await;
        assert_eq!(status, StatusCode::TOO_MANY_REQUESTS);
        assert_eq!(body["error"]["code"], "too_many_requests");
    }

    #[tokio::test]
    async fn test_upload_writes_file() {
        let media = tempfile::tempdir().unwrap();
        let mut config = Config::default();
        config.auth.admin_token = TOKEN.to_string();
        config.uploads.media_dir = media.path().to_path_buf();
        let app = test_app_with(config).await;

        let boundary = "susuboundary";
        let multipart = |filename: &str| {
            format!(
                "--{b}\r\nContent-Disposition: form-data; name=\"file\"; filename=\"{f}\"\r\n\
                 Content-Type: application/octet-stream\r\n\r\nfakeimagebytes\r\n--{b}--\r\n",
                b = boundary,
                f = filename
            )
        };
        let request = |filename: &str| {
            Request::builder()
                .method("POST")
                .uri("/admin/api/uploads/hero_images")
                .header("Authorization", format!("Bearer {}", TOKEN))
                .header(
                    "content-type",
                    format!("multipart/form-data; boundary={}", boundary),
                )
                .body(Body::from(multipart(filename)))
                .unwrap()
        };

        let response = app.clone().oneshot(request("banner.png")).await.unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let body: Value = serde_json::from_slice(&bytes).unwrap();
        let path = body["path"].as_str().unwrap();
        assert!(path.starts_with("hero_images/") && path.ends_with(".png"));
        assert_eq!(body["content_type"], "image/png");
        tokio_test::assert_ok!(std::fs::metadata(media.path().join(path)));

        let response = app.oneshot(request("script.exe")).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
