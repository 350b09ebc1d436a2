use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use std::sync::Arc;

use crate::db::{
    ContactInformation, ContactInformationAdminQuery, ContactInformationRequest, ListQuery,
};
use crate::AppState;

use super::error::{ApiError, ValidationErrorBuilder};
use super::extract::JsonBody;
use super::validation::{validate_max_length, validate_optional_email, validate_optional_url};

fn validate_contact_info_request(req: &ContactInformationRequest) -> Result<(), ApiError> {
    let mut errors = ValidationErrorBuilder::new();

    errors.check("address_line1", validate_max_length(&req.address_line1, 200));
    errors.check("address_line2", validate_max_length(&req.address_line2, 200));
    errors.check("phone_primary", validate_max_length(&req.phone_primary, 20));
    errors.check("phone_secondary", validate_max_length(&req.phone_secondary, 20));
    errors.check("email_primary", validate_optional_email(&req.email_primary));
    errors.check("email_secondary", validate_optional_email(&req.email_secondary));
    errors.check("hours_weekdays", validate_max_length(&req.hours_weekdays, 100));
    errors.check("hours_weekend", validate_max_length(&req.hours_weekend, 100));

    for (field, value) in [
        ("facebook_url", &req.facebook_url),
        ("twitter_url", &req.twitter_url),
        ("instagram_url", &req.instagram_url),
        ("linkedin_url", &req.linkedin_url),
    ] {
        errors.check(field, validate_optional_url(value));
    }

    errors.finish()
}

/// GET /api/contact-information/ - at most the current record
pub async fn list_contact_information(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<ContactInformation>>, ApiError> {
    let current = ContactInformation::current(&state.db).await?;
    Ok(Json(current.into_iter().collect()))
}

pub async fn admin_list_contact_information(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ContactInformationAdminQuery>,
) -> Result<Json<Vec<ContactInformation>>, ApiError> {
    let records = ListQuery::new("contact_information", "updated_at DESC, id DESC")
        .filter_bool("is_active", query.is_active)
        .search(
            &["address_line1", "phone_primary", "email_primary"],
            query.search.as_deref(),
        )
        .fetch(&state.db, None)
        .await?;
    Ok(Json(records))
}

pub async fn admin_get_contact_information(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> Result<Json<ContactInformation>, ApiError> {
    ContactInformation::get(&state.db, id)
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::not_found("Contact information not found"))
}

pub async fn create_contact_information(
    State(state): State<Arc<AppState>>,
    JsonBody(req): JsonBody<ContactInformationRequest>,
) -> Result<(StatusCode, Json<ContactInformation>), ApiError> {
    validate_contact_info_request(&req)?;

    let record = ContactInformation::create(&state.db, &req).await?;
    tracing::info!(id = record.id, "Contact information created");

    Ok((StatusCode::CREATED, Json(record)))
}

pub async fn update_contact_information(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
    JsonBody(req): JsonBody<ContactInformationRequest>,
) -> Result<Json<ContactInformation>, ApiError> {
    validate_contact_info_request(&req)?;

    ContactInformation::update(&state.db, id, &req)
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::not_found("Contact information not found"))
}

pub async fn delete_contact_information(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> Result<StatusCode, ApiError> {
    if !ContactInformation::delete(&state.db, id).await? {
        return Err(ApiError::not_found("Contact information not found"));
    }
    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_record_is_valid() {
        assert!(validate_contact_info_request(&ContactInformationRequest::default()).is_ok());
    }

    #[test]
    fn test_social_links_must_be_urls() {
        let req = ContactInformationRequest {
            email_primary: "info@example.com".to_string(),
            facebook_url: "facebook.com/susu".to_string(),
            linkedin_url: "https://linkedin.com/company/susu".to_string(),
            ..Default::default()
        };
        let err = validate_contact_info_request(&req).unwrap_err();
        assert_eq!(err.to_string(), "[validation_error] facebook_url: Enter a valid URL.");
    }
}
