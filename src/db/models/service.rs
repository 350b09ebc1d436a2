//! Services offered and customer testimonials.

use serde::{Deserialize, Serialize};
use sqlx::{FromRow, SqlitePool};

use super::common::now_timestamp;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Service {
    pub id: i64,
    pub title: String,
    pub description: String,
    pub service_type: String,
    pub icon: String,
    pub is_active: bool,
    pub created_at: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServiceRequest {
    pub title: String,
    pub description: String,
    pub service_type: String,
    #[serde(default = "default_service_icon")]
    pub icon: String,
    #[serde(default = "default_true")]
    pub is_active: bool,
}

fn default_service_icon() -> String {
    "💰".to_string()
}

fn default_true() -> bool {
    true
}

#[derive(Debug, Deserialize, Default)]
pub struct ServiceAdminQuery {
    pub service_type: Option<String>,
    pub is_active: Option<bool>,
    pub search: Option<String>,
}

impl Service {
    pub async fn get(db: &SqlitePool, id: i64) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, Self>("SELECT * FROM services WHERE id = ?")
            .bind(id)
            .fetch_optional(db)
            .await
    }

    pub async fn create(db: &SqlitePool, req: &ServiceRequest) -> Result<Self, sqlx::Error> {
        let id = sqlx::query(
            r#"
            INSERT INTO services (title, description, service_type, icon, is_active, created_at)
            VALUES (?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&req.title)
        .bind(&req.description)
        .bind(&req.service_type)
        .bind(&req.icon)
        .bind(req.is_active)
        .bind(now_timestamp())
        .execute(db)
        .await?
        .last_insert_rowid();

        Self::get(db, id).await?.ok_or(sqlx::Error::RowNotFound)
    }

    pub async fn update(
        db: &SqlitePool,
        id: i64,
        req: &ServiceRequest,
    ) -> Result<Option<Self>, sqlx::Error> {
        let result = sqlx::query(
            r#"
            UPDATE services SET
                title = ?, description = ?, service_type = ?, icon = ?, is_active = ?
            WHERE id = ?
            "#,
        )
        .bind(&req.title)
        .bind(&req.description)
        .bind(&req.service_type)
        .bind(&req.icon)
        .bind(req.is_active)
        .bind(id)
        .execute(db)
        .await?;

        if result.rows_affected() == 0 {
            return Ok(None);
        }
        Self::get(db, id).await
    }

    pub async fn delete(db: &SqlitePool, id: i64) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM services WHERE id = ?")
            .bind(id)
            .execute(db)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Testimonial {
    pub id: i64,
    pub name: String,
    pub role: String,
    pub message: String,
    pub rating: i64,
    pub is_featured: bool,
    pub created_at: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TestimonialRequest {
    pub name: String,
    #[serde(default)]
    pub role: String,
    pub message: String,
    #[serde(default = "default_rating")]
    pub rating: i64,
    #[serde(default)]
    pub is_featured: bool,
}

fn default_rating() -> i64 {
    5
}

#[derive(Debug, Deserialize, Default)]
pub struct TestimonialAdminQuery {
    pub rating: Option<i64>,
    pub is_featured: Option<bool>,
    pub search: Option<String>,
}

/// Bulk featured/unfeatured toggle
#[derive(Debug, Deserialize)]
pub struct FeatureTestimonialsRequest {
    pub ids: Vec<i64>,
    pub is_featured: bool,
}

impl Testimonial {
    pub async fn get(db: &SqlitePool, id: i64) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, Self>("SELECT * FROM testimonials WHERE id = ?")
            .bind(id)
            .fetch_optional(db)
            .await
    }

    pub async fn create(db: &SqlitePool, req: &TestimonialRequest) -> Result<Self, sqlx::Error> {
        let id = sqlx::query(
            r#"
            INSERT INTO testimonials (name, role, message, rating, is_featured, created_at)
            VALUES (?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&req.name)
        .bind(&req.role)
        .bind(&req.message)
        .bind(req.rating)
        .bind(req.is_featured)
        .bind(now_timestamp())
        .execute(db)
        .await?
        .last_insert_rowid();

        Self::get(db, id).await?.ok_or(sqlx::Error::RowNotFound)
    }

    pub async fn update(
        db: &SqlitePool,
        id: i64,
        req: &TestimonialRequest,
    ) -> Result<Option<Self>, sqlx::Error> {
        let result = sqlx::query(
            r#"
            UPDATE testimonials SET
                name = ?, role = ?, message = ?, rating = ?, is_featured = ?
            WHERE id = ?
            "#,
        )
        .bind(&req.name)
        .bind(&req.role)
        .bind(&req.message)
        .bind(req.rating)
        .bind(req.is_featured)
        .bind(id)
        .execute(db)
        .await?;

        if result.rows_affected() == 0 {
            return Ok(None);
        }
        Self::get(db, id).await
    }

    pub async fn set_featured_many(
        db: &SqlitePool,
        ids: &[i64],
        is_featured: bool,
    ) -> Result<u64, sqlx::Error> {
        let mut updated = 0;
        for id in ids {
            updated += sqlx::query("UPDATE testimonials SET is_featured = ? WHERE id = ?")
                .bind(is_featured)
                .bind(id)
                .execute(db)
                .await?
                .rows_affected();
        }
        Ok(updated)
    }

    pub async fn delete(db: &SqlitePool, id: i64) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM testimonials WHERE id = ?")
            .bind(id)
            .execute(db)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
