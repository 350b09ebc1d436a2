//! Services offered and customer testimonials.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use std::sync::Arc;

use crate::db::{
    BulkUpdateResponse, FeatureTestimonialsRequest, ListQuery, Service, ServiceAdminQuery,
    ServiceRequest, ServiceType, Testimonial, TestimonialAdminQuery, TestimonialRequest,
};
use crate::AppState;

use super::error::{ApiError, ValidationErrorBuilder};
use super::extract::{JsonBody, RequestContext};
use super::pagination::{paginate, PageParams, Paginated};
use super::validation::{
    validate_choice, validate_max_length, validate_rating, validate_required, validate_text,
};

fn validate_service_request(req: &ServiceRequest) -> Result<(), ApiError> {
    let mut errors = ValidationErrorBuilder::new();

    errors.check("title", validate_text(&req.title, 200));
    errors.check("description", validate_required(&req.description));
    errors.check("service_type", validate_choice::<ServiceType>(&req.service_type));
    errors.check("icon", validate_max_length(&req.icon, 10));

    errors.finish()
}

fn validate_testimonial_request(req: &TestimonialRequest) -> Result<(), ApiError> {
    let mut errors = ValidationErrorBuilder::new();

    errors.check("name", validate_text(&req.name, 100));
    errors.check("role", validate_max_length(&req.role, 100));
    errors.check("message", validate_required(&req.message));
    errors.check("rating", validate_rating(req.rating));

    errors.finish()
}

fn public_services() -> ListQuery {
    ListQuery::new("services", "created_at ASC, id ASC").filter("is_active = 1")
}

fn public_testimonials() -> ListQuery {
    ListQuery::new("testimonials", "created_at DESC, id DESC").filter("is_featured = 1")
}

// Public

/// GET /api/services/
pub async fn list_services(
    State(state): State<Arc<AppState>>,
    ctx: RequestContext,
    Query(page): Query<PageParams>,
) -> Result<Json<Paginated<Service>>, ApiError> {
    let services = paginate(&state.db, &public_services(), &page, &ctx).await?;
    Ok(Json(services))
}

pub async fn get_service(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> Result<Json<Service>, ApiError> {
    Service::get(&state.db, id)
        .await?
        .filter(|s| s.is_active)
        .map(Json)
        .ok_or_else(|| ApiError::not_found("Service not found"))
}

/// GET /api/testimonials/ - featured only
pub async fn list_testimonials(
    State(state): State<Arc<AppState>>,
    ctx: RequestContext,
    Query(page): Query<PageParams>,
) -> Result<Json<Paginated<Testimonial>>, ApiError> {
    let testimonials = paginate(&state.db, &public_testimonials(), &page, &ctx).await?;
    Ok(Json(testimonials))
}

pub async fn get_testimonial(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> Result<Json<Testimonial>, ApiError> {
    Testimonial::get(&state.db, id)
        .await?
        .filter(|t| t.is_featured)
        .map(Json)
        .ok_or_else(|| ApiError::not_found("Testimonial not found"))
}

// Admin

pub async fn admin_list_services(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ServiceAdminQuery>,
) -> Result<Json<Vec<Service>>, ApiError> {
    let services = ListQuery::new("services", "created_at ASC, id ASC")
        .filter_eq("service_type", query.service_type.as_deref())
        .filter_bool("is_active", query.is_active)
        .search(&["title", "description"], query.search.as_deref())
        .fetch(&state.db, None)
        .await?;
    Ok(Json(services))
}

pub async fn admin_get_service(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> Result<Json<Service>, ApiError> {
    Service::get(&state.db, id)
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::not_found("Service not found"))
}

pub async fn create_service(
    State(state): State<Arc<AppState>>,
    JsonBody(req): JsonBody<ServiceRequest>,
) -> Result<(StatusCode, Json<Service>), ApiError> {
    validate_service_request(&req)?;

    let service = Service::create(&state.db, &req).await?;
    tracing::info!(id = service.id, title = %service.title, "Service created");

    Ok((StatusCode::CREATED, Json(service)))
}

pub async fn update_service(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
    JsonBody(req): JsonBody<ServiceRequest>,
) -> Result<Json<Service>, ApiError> {
    validate_service_request(&req)?;

    Service::update(&state.db, id, &req)
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::not_found("Service not found"))
}

pub async fn delete_service(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> Result<StatusCode, ApiError> {
    if !Service::delete(&state.db, id).await? {
        return Err(ApiError::not_found("Service not found"));
    }
    tracing::info!(id, "Service deleted");
    Ok(StatusCode::NO_CONTENT)
}

pub async fn admin_list_testimonials(
    State(state): State<Arc<AppState>>,
    Query(query): Query<TestimonialAdminQuery>,
) -> Result<Json<Vec<Testimonial>>, ApiError> {
    let rating = query.rating.map(|r| r.to_string());
    let testimonials = ListQuery::new("testimonials", "created_at DESC, id DESC")
        .filter_eq("rating", rating.as_deref())
        .filter_bool("is_featured", query.is_featured)
        .search(&["name", "role", "message"], query.search.as_deref())
        .fetch(&state.db, None)
        .await?;
    Ok(Json(testimonials))
}

pub async fn admin_get_testimonial(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> Result<Json<Testimonial>, ApiError> {
    Testimonial::get(&state.db, id)
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::not_found("Testimonial not found"))
}

pub async fn create_testimonial(
    State(state): State<Arc<AppState>>,
    JsonBody(req): JsonBody<TestimonialRequest>,
) -> Result<(StatusCode, Json<Testimonial>), ApiError> {
    validate_testimonial_request(&req)?;

    let testimonial = Testimonial::create(&state.db, &req).await?;
    tracing::info!(id = testimonial.id, "Testimonial created");

    Ok((StatusCode::CREATED, Json(testimonial)))
}

pub async fn update_testimonial(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
    JsonBody(req): JsonBody<TestimonialRequest>,
) -> Result<Json<Testimonial>, ApiError> {
    validate_testimonial_request(&req)?;

    Testimonial::update(&state.db, id, &req)
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::not_found("Testimonial not found"))
}

/// POST /admin/api/testimonials/feature - bulk feature/unfeature
pub async fn feature_testimonials(
    State(state): State<Arc<AppState>>,
    JsonBody(req): JsonBody<FeatureTestimonialsRequest>,
) -> Result<Json<BulkUpdateResponse>, ApiError> {
    if req.ids.is_empty() {
        return Err(ApiError::validation_field(
            "ids",
            "Select at least one testimonial.",
        ));
    }

    let updated = Testimonial::set_featured_many(&state.db, &req.ids, req.is_featured).await?;
    tracing::info!(updated, is_featured = req.is_featured, "Testimonials updated");

    Ok(Json(BulkUpdateResponse { updated }))
}

pub async fn delete_testimonial(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> Result<StatusCode, ApiError> {
    if !Testimonial::delete(&state.db, id).await? {
        return Err(ApiError::not_found("Testimonial not found"));
    }
    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::init_in_memory;

    fn service(title: &str, service_type: &str) -> ServiceRequest {
        ServiceRequest {
            title: title.to_string(),
            description: "Daily contributions collected at your door.".to_string(),
            service_type: service_type.to_string(),
            icon: "💰".to_string(),
            is_active: true,
        }
    }

    #[test]
    fn test_service_validation() {
        assert!(validate_service_request(&service("Daily Susu", "susu")).is_ok());
        assert!(validate_service_request(&service("Daily Susu", "crypto")).is_err());
        assert!(validate_service_request(&service("", "susu")).is_err());

        let mut req = service("Daily Susu", "susu");
        req.icon = "x".repeat(11);
        assert!(validate_service_request(&req).is_err());
    }

    #[test]
    fn test_testimonial_rating_bounds() {
        let mut req = TestimonialRequest {
            name: "Kofi".to_string(),
            role: String::new(),
            message: "Reliable and friendly.".to_string(),
            rating: 5,
            is_featured: false,
        };
        assert!(validate_testimonial_request(&req).is_ok());

        req.rating = 0;
        assert!(validate_testimonial_request(&req).is_err());
    }

    #[tokio::test]
    async fn test_public_services_hide_inactive() {
        let db = init_in_memory().await.unwrap();
        Service::create(&db, &service("Daily Susu", "susu")).await.unwrap();
        let mut hidden = service("Old Plan", "savings");
        hidden.is_active = false;
        Service::create(&db, &hidden).await.unwrap();

        let visible: Vec<Service> = public_services().fetch(&db, None).await.unwrap();
        assert_eq!(visible.len(), 1);
        assert_eq!(visible[0].title, "Daily Susu");
    }
}
