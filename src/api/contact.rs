//! Contact form intake and the staff inbox.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use std::sync::Arc;

use crate::content::sanitize_html;
use crate::db::{
    BulkUpdateResponse, ContactMessage, ContactMessageQuery, CreateContactMessageRequest,
    ListQuery, MarkMessagesRequest, NewContactMessage,
};
use crate::AppState;

use super::error::{ApiError, ValidationErrorBuilder};
use super::extract::JsonBody;
use super::metrics::record_contact_message;
use super::validation::{
    validate_email, validate_max_length, validate_required, validate_text, REQUIRED,
};

/// Check the submission and turn it into a storable message
fn validate_create_request(req: CreateContactMessageRequest) -> Result<NewContactMessage, ApiError> {
    let mut errors = ValidationErrorBuilder::new();

    let mut required = |field: &str, value: Option<String>, max: Option<usize>| -> String {
        match value {
            None => {
                errors.add(field, REQUIRED);
                String::new()
            }
            Some(v) => {
                let v = v.trim().to_string();
                match max {
                    Some(max) => errors.check(field, validate_text(&v, max)),
                    None => errors.check(field, validate_required(&v)),
                };
                v
            }
        }
    };

    let name = required("name", req.name, Some(100));
    let email = required("email", req.email, None);
    let subject = required("subject", req.subject, Some(200));
    let message = required("message", req.message, None);

    if !email.is_empty() {
        errors.check("email", validate_email(&email));
    }

    let phone = req
        .phone
        .map(|p| p.trim().to_string())
        .filter(|p| !p.is_empty());
    if let Some(ref p) = phone {
        errors.check("phone", validate_max_length(p, 20));
    }

    errors.finish()?;

    Ok(NewContactMessage {
        name,
        email,
        phone,
        subject: sanitize_html(&subject),
        message: sanitize_html(&message),
    })
}

/// POST /api/contact/
pub async fn create_message(
    State(state): State<Arc<AppState>>,
    JsonBody(req): JsonBody<CreateContactMessageRequest>,
) -> Result<(StatusCode, Json<ContactMessage>), ApiError> {
    let new = validate_create_request(req)?;
    let message = ContactMessage::create(&state.db, &new).await?;

    record_contact_message();
    tracing::info!(id = message.id, email = %message.email, "Contact message received");

    Ok((StatusCode::CREATED, Json(message)))
}

/// GET /api/contact/list/ - every message, newest first
pub async fn list_all_messages(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<ContactMessage>>, ApiError> {
    let messages = ListQuery::new("contact_messages", "created_at DESC, id DESC")
        .fetch(&state.db, None)
        .await?;
    Ok(Json(messages))
}

/// GET /admin/api/contact-messages
pub async fn list_messages(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ContactMessageQuery>,
) -> Result<Json<Vec<ContactMessage>>, ApiError> {
    let messages = ListQuery::new("contact_messages", "created_at DESC, id DESC")
        .filter_bool("is_read", query.is_read)
        .search(
            &["name", "email", "subject", "message"],
            query.search.as_deref(),
        )
        .fetch(&state.db, None)
        .await?;
    Ok(Json(messages))
}

pub async fn get_message(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> Result<Json<ContactMessage>, ApiError> {
    let message = ContactMessage::get(&state.db, id)
        .await?
        .ok_or_else(|| ApiError::not_found("Contact message not found"))?;
    Ok(Json(message))
}

/// POST /admin/api/contact-messages/mark - bulk read/unread
pub async fn mark_messages(
    State(state): State<Arc<AppState>>,
    JsonBody(req): JsonBody<MarkMessagesRequest>,
) -> Result<Json<BulkUpdateResponse>, ApiError> {
    if req.ids.is_empty() {
        return Err(ApiError::validation_field("ids", "Select at least one message."));
    }

    let updated = ContactMessage::mark_many(&state.db, &req.ids, req.is_read).await?;
    tracing::info!(updated, is_read = req.is_read, "Contact messages marked");

    Ok(Json(BulkUpdateResponse { updated }))
}

pub async fn delete_message(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> Result<StatusCode, ApiError> {
    if !ContactMessage::delete(&state.db, id).await? {
        return Err(ApiError::not_found("Contact message not found"));
    }
    Ok(StatusCode::NO_CONTENT)
}
