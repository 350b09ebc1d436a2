//! Hero banner and per-page images.

use serde::{Deserialize, Serialize};
use sqlx::{FromRow, SqlitePool};

use super::common::now_timestamp;
use crate::content::MediaUrls;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct HeroImage {
    pub id: i64,
    pub title: String,
    pub image: String,
    pub is_active: bool,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct HeroImageResponse {
    pub id: i64,
    pub title: String,
    pub image: String,
    pub image_url: String,
    pub is_active: bool,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct HeroImageRequest {
    #[serde(default = "default_hero_title")]
    pub title: String,
    pub image: String,
    #[serde(default = "default_true")]
    pub is_active: bool,
}

fn default_hero_title() -> String {
    "Hero Image".to_string()
}

fn default_true() -> bool {
    true
}

#[derive(Debug, Deserialize, Default)]
pub struct HeroImageAdminQuery {
    pub is_active: Option<bool>,
    pub search: Option<String>,
}

impl HeroImage {
    pub fn to_response(&self, media: &MediaUrls) -> HeroImageResponse {
        HeroImageResponse {
            id: self.id,
            title: self.title.clone(),
            image: media.relative(&self.image),
            image_url: media.absolute(&self.image),
            is_active: self.is_active,
            created_at: self.created_at.clone(),
            updated_at: self.updated_at.clone(),
        }
    }

    pub async fn get(db: &SqlitePool, id: i64) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, Self>("SELECT * FROM hero_images WHERE id = ?")
            .bind(id)
            .fetch_optional(db)
            .await
    }

    /// The hero image currently shown on the site
    pub async fn current(db: &SqlitePool) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, Self>(
            "SELECT * FROM hero_images WHERE is_active = 1 ORDER BY created_at DESC, id DESC LIMIT 1",
        )
        .fetch_optional(db)
        .await
    }

    pub async fn create(db: &SqlitePool, req: &HeroImageRequest) -> Result<Self, sqlx::Error> {
        let now = now_timestamp();
        let id = sqlx::query(
            r#"
            INSERT INTO hero_images (title, image, is_active, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?)
            "#,
        )
        .bind(&req.title)
        .bind(&req.image)
        .bind(req.is_active)
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
        req: &HeroImageRequest,
    ) -> Result<Option<Self>, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE hero_images SET title = ?, image = ?, is_active = ?, updated_at = ? WHERE id = ?",
        )
        .bind(&req.title)
        .bind(&req.image)
        .bind(req.is_active)
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
        let result = sqlx::query("DELETE FROM hero_images WHERE id = ?")
            .bind(id)
            .execute(db)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct PageImage {
    pub id: i64,
    pub page: String,
    pub title: String,
    pub image: String,
    pub section: String,
    pub is_active: bool,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct PageImageResponse {
    pub id: i64,
    pub page: String,
    pub title: String,
    pub image: String,
    pub image_url: String,
    pub section: String,
    pub is_active: bool,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PageImageRequest {
    pub page: String,
    pub title: String,
    pub image: String,
    #[serde(default)]
    pub section: String,
    #[serde(default = "default_true")]
    pub is_active: bool,
}

#[derive(Debug, Deserialize, Default)]
pub struct PageImageQuery {
    pub page: Option<String>,
    pub section: Option<String>,
}

#[derive(Debug, Deserialize, Default)]
pub struct PageImageAdminQuery {
    pub page: Option<String>,
    pub section: Option<String>,
    pub is_active: Option<bool>,
    pub search: Option<String>,
}

impl PageImage {
    pub fn to_response(&self, media: &MediaUrls) -> PageImageResponse {
        PageImageResponse {
            id: self.id,
            page: self.page.clone(),
            title: self.title.clone(),
            image: media.relative(&self.image),
            image_url: media.absolute(&self.image),
            section: self.section.clone(),
            is_active: self.is_active,
            created_at: self.created_at.clone(),
            updated_at: self.updated_at.clone(),
        }
    }

    pub async fn get(db: &SqlitePool, id: i64) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, Self>("SELECT * FROM page_images WHERE id = ?")
            .bind(id)
            .fetch_optional(db)
            .await
    }

    pub async fn create(db: &SqlitePool, req: &PageImageRequest) -> Result<Self, sqlx::Error> {
        let now = now_timestamp();
        let id = sqlx::query(
            r#"
            INSERT INTO page_images (page, title, image, section, is_active, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&req.page)
        .bind(&req.title)
        .bind(&req.image)
        .bind(&req.section)
        .bind(req.is_active)
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
        req: &PageImageRequest,
    ) -> Result<Option<Self>, sqlx::Error> {
        let result = sqlx::query(
            r#"
            UPDATE page_images SET
                page = ?, title = ?, image = ?, section = ?, is_active = ?, updated_at = ?
            WHERE id = ?
            "#,
        )
        .bind(&req.page)
        .bind(&req.title)
        .bind(&req.image)
        .bind(&req.section)
        .bind(req.is_active)
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
        let result = sqlx::query("DELETE FROM page_images WHERE id = ?")
            .bind(id)
            .execute(db)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
