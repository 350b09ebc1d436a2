//! Company announcements, alerts, news and events.

use serde::{Deserialize, Serialize};
use sqlx::{FromRow, SqlitePool};

use super::common::now_timestamp;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Update {
    pub id: i64,
    pub title: String,
    pub content: String,
    #[serde(rename = "type")]
    pub update_type: String,
    pub priority: String,
    pub published: bool,
    pub created_date: String,
    pub updated_date: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct UpdateRequest {
    pub title: String,
    pub content: String,
    #[serde(rename = "type", default = "default_update_type")]
    pub update_type: String,
    #[serde(default = "default_priority")]
    pub priority: String,
    #[serde(default)]
    pub published: bool,
}

fn default_update_type() -> String {
    "announcement".to_string()
}

fn default_priority() -> String {
    "low".to_string()
}

#[derive(Debug, Deserialize, Default)]
pub struct UpdateQuery {
    #[serde(rename = "type")]
    pub update_type: Option<String>,
    pub priority: Option<String>,
}

#[derive(Debug, Deserialize, Default)]
pub struct UpdateAdminQuery {
    #[serde(rename = "type")]
    pub update_type: Option<String>,
    pub priority: Option<String>,
    pub published: Option<bool>,
    pub search: Option<String>,
}

impl Update {
    pub async fn get(db: &SqlitePool, id: i64) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, Self>("SELECT * FROM updates WHERE id = ?")
            .bind(id)
            .fetch_optional(db)
            .await
    }

    pub async fn create(db: &SqlitePool, req: &UpdateRequest) -> Result<Self, sqlx::Error> {
        let now = now_timestamp();
        let id = sqlx::query(
            r#"
            INSERT INTO updates (title, content, update_type, priority, published, created_date, updated_date)
            VALUES (?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&req.title)
        .bind(&req.content)
        .bind(&req.update_type)
        .bind(&req.priority)
        .bind(req.published)
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
        req: &UpdateRequest,
    ) -> Result<Option<Self>, sqlx::Error> {
        let result = sqlx::query(
            r#"
            UPDATE updates SET
                title = ?, content = ?, update_type = ?, priority = ?, published = ?, updated_date = ?
            WHERE id = ?
            "#,
        )
        .bind(&req.title)
        .bind(&req.content)
        .bind(&req.update_type)
        .bind(&req.priority)
        .bind(req.published)
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
        let result = sqlx::query("DELETE FROM updates WHERE id = ?")
            .bind(id)
            .execute(db)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
