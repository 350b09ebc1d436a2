//! Media uploads for the admin API.
//!
//! Files are stored under `uploads.media_dir/<kind folder>/<uuid>.<ext>` and the
//! returned `path` is what content records reference.

use axum::{
    extract::{Multipart, Path, State},
    http::StatusCode,
    Json,
};
use serde::Serialize;
use std::sync::Arc;

use crate::content::{upload::storage_path, validate_upload, UploadKind};
use crate::AppState;

use super::error::ApiError;
use super::extract::RequestContext;
use super::metrics::record_upload;

#[derive(Debug, Serialize)]
pub struct UploadResponse {
    /// Path relative to the media root, as stored on records
    pub path: String,
    pub url: String,
    pub size: u64,
    pub content_type: String,
}

/// POST /admin/api/uploads/:kind - multipart field `file`
pub async fn upload_file(
    State(state): State<Arc<AppState>>,
    ctx: RequestContext,
    Path(kind): Path<String>,
    mut multipart: Multipart,
) -> Result<(StatusCode, Json<UploadResponse>), ApiError> {
    let kind: UploadKind = kind
        .parse()
        .map_err(|e: String| ApiError::not_found(e))?;

    while let Some(field) = multipart.next_field().await? {
        if field.name() != Some("file") {
            continue;
        }

        let filename = field.file_name().unwrap_or_default().to_string();
        let data = field.bytes().await?;
        let size = data.len() as u64;

        let extension = validate_upload(kind, &filename, size, state.config.uploads.max_upload_size)?;
        let path = storage_path(kind, &extension);
        let target = state.config.uploads.media_dir.join(&path);

        if let Some(parent) = target.parent() {
            tokio::fs::create_dir_all(parent).await.map_err(|e| {
                tracing::error!("Failed to create {}: {}", parent.display(), e);
                ApiError::internal("Failed to store upload")
            })?;
        }
        tokio::fs::write(&target, &data).await.map_err(|e| {
            tracing::error!("Failed to write {}: {}", target.display(), e);
            ApiError::internal("Failed to store upload")
        })?;

        record_upload(kind.folder());
        tracing::info!(kind = kind.folder(), path = %path, size, "Stored upload");

        return Ok((
            StatusCode::CREATED,
            Json(UploadResponse {
                url: ctx.media.absolute(&path),
                content_type: mime_guess::from_ext(&extension)
                    .first_or_octet_stream()
                    .to_string(),
                path,
                size,
            }),
        ));
    }

    Err(ApiError::validation_field("file", "No file was submitted."))
}
