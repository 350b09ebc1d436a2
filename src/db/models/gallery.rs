//! Photo and video gallery of company events.

use serde::{Deserialize, Serialize};
use sqlx::{FromRow, SqlitePool};

use super::blog::default_video_type;
use super::common::now_timestamp;
use crate::content::{embed_url, video_thumbnail_url, MediaUrls, VideoType};

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct GalleryItem {
    pub id: i64,
    pub title: String,
    pub description: String,
    pub media_type: String,
    pub event_type: String,
    pub image: Option<String>,
    pub video_type: String,
    pub video_url: String,
    pub video_file: Option<String>,
    pub thumbnail: Option<String>,
    pub event_date: Option<String>,
    pub is_featured: bool,
    pub is_active: bool,
    pub sort_order: i64,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct GalleryItemResponse {
    pub id: i64,
    pub title: String,
    pub description: String,
    pub media_type: String,
    pub event_type: String,
    pub event_date: Option<String>,
    pub image: Option<String>,
    pub image_url: Option<String>,
    pub video_type: String,
    pub video_url: String,
    pub video_file: Option<String>,
    pub video_file_url: Option<String>,
    pub thumbnail: Option<String>,
    pub thumbnail_url: Option<String>,
    pub embed_url: String,
    pub is_featured: bool,
    pub is_active: bool,
    pub order: i64,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GalleryItemRequest {
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default = "default_media_type")]
    pub media_type: String,
    #[serde(default = "default_event_type")]
    pub event_type: String,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default = "default_video_type")]
    pub video_type: String,
    #[serde(default)]
    pub video_url: String,
    #[serde(default)]
    pub video_file: Option<String>,
    #[serde(default)]
    pub thumbnail: Option<String>,
    #[serde(default)]
    pub event_date: Option<String>,
    #[serde(default)]
    pub is_featured: bool,
    #[serde(default = "default_true")]
    pub is_active: bool,
    #[serde(default)]
    pub order: i64,
}

fn default_media_type() -> String {
    "image".to_string()
}

fn default_event_type() -> String {
    "other".to_string()
}

fn default_true() -> bool {
    true
}

#[derive(Debug, Deserialize, Default)]
pub struct GalleryQuery {
    pub media_type: Option<String>,
    pub event_type: Option<String>,
    pub featured: Option<String>,
}

#[derive(Debug, Deserialize, Default)]
pub struct GalleryAdminQuery {
    pub media_type: Option<String>,
    pub event_type: Option<String>,
    pub is_featured: Option<bool>,
    pub is_active: Option<bool>,
    pub search: Option<String>,
}

impl GalleryItem {
    fn is_video(&self) -> bool {
        self.media_type == "video"
    }

    fn video_kind(&self) -> VideoType {
        VideoType::from(self.video_type.clone())
    }

    /// Player URL for video items; the stored URL otherwise
    pub fn embed_url(&self) -> String {
        if self.is_video() && !self.video_url.is_empty() {
            if let Some(url) = embed_url(&self.video_url, self.video_kind()) {
                return url;
            }
        }
        self.video_url.clone()
    }

    /// Uploaded thumbnail, or the one YouTube/Vimeo publish for the video
    pub fn thumbnail_url(&self, media: &MediaUrls) -> Option<String> {
        if let Some(url) = media.absolute_opt(self.thumbnail.as_deref()) {
            return Some(url);
        }
        if self.is_video() && !self.video_url.is_empty() {
            return video_thumbnail_url(&self.video_url, self.video_kind());
        }
        None
    }

    pub fn to_response(&self, media: &MediaUrls) -> GalleryItemResponse {
        GalleryItemResponse {
            id: self.id,
            title: self.title.clone(),
            description: self.description.clone(),
            media_type: self.media_type.clone(),
            event_type: self.event_type.clone(),
            event_date: self.event_date.clone(),
            image: media.relative_opt(self.image.as_deref()),
            image_url: media.absolute_opt(self.image.as_deref()),
            video_type: self.video_type.clone(),
            video_url: self.video_url.clone(),
            video_file: media.relative_opt(self.video_file.as_deref()),
            video_file_url: media.absolute_opt(self.video_file.as_deref()),
            thumbnail: media.relative_opt(self.thumbnail.as_deref()),
            thumbnail_url: self.thumbnail_url(media),
            embed_url: self.embed_url(),
            is_featured: self.is_featured,
            is_active: self.is_active,
            order: self.sort_order,
            created_at: self.created_at.clone(),
            updated_at: self.updated_at.clone(),
        }
    }

    pub async fn get(db: &SqlitePool, id: i64) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, Self>("SELECT * FROM gallery_items WHERE id = ?")
            .bind(id)
            .fetch_optional(db)
            .await
    }

    pub async fn create(db: &SqlitePool, req: &GalleryItemRequest) -> Result<Self, sqlx::Error> {
        let now = now_timestamp();
        let id = sqlx::query(
            r#"
            INSERT INTO gallery_items (
                title, description, media_type, event_type, image, video_type, video_url,
                video_file, thumbnail, event_date, is_featured, is_active, sort_order,
                created_at, updated_at
            )
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&req.title)
        .bind(&req.description)
        .bind(&req.media_type)
        .bind(&req.event_type)
        .bind(&req.image)
        .bind(&req.video_type)
        .bind(&req.video_url)
        .bind(&req.video_file)
        .bind(&req.thumbnail)
        .bind(&req.event_date)
        .bind(req.is_featured)
        .bind(req.is_active)
        .bind(req.order)
        .bind(&now)
        .bind(&now)
        .execute(db)
        .await?
        .last_insert_rowid();

        Self::get(db, id).await?.ok_or(sqlx::Error::RowNotFound)
    }

    pub async fn update(
        db: &SqlitePool,
        id: i64,
        req: &GalleryItemRequest,
    ) -> Result<Option<Self>, sqlx::Error> {
        let result = sqlx::query(
            r#"
            UPDATE gallery_items SET
                title = ?, description = ?, media_type = ?, event_type = ?, image = ?,
                video_type = ?, video_url = ?, video_file = ?, thumbnail = ?, event_date = ?,
                is_featured = ?, is_active = ?, sort_order = ?, updated_at = ?
            WHERE id = ?
            "#,
        )
        .bind(&req.title)
        .bind(&req.description)
        .bind(&req.media_type)
        .bind(&req.event_type)
        .bind(&req.image)
        .bind(&req.video_type)
        .bind(&req.video_url)
        .bind(&req.video_file)
        .bind(&req.thumbnail)
        .bind(&req.event_date)
        .bind(req.is_featured)
        .bind(req.is_active)
        .bind(req.order)
        .bind(now_timestamp())
        .bind(id)
        .execute(db)
        .await?;

        if result.rows_affected() == 0 {
            return Ok(None);
        }
        Self::get(db, id).await
    }

    pub async fn delete(db: &SqlitePool, id: i64) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM gallery_items WHERE id = ?")
            .bind(id)
            .execute(db)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
