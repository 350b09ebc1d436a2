//! Contact form submissions.

use serde::{Deserialize, Serialize};
use sqlx::{FromRow, SqlitePool};

use super::common::now_timestamp;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ContactMessage {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub subject: String,
    pub message: String,
    pub is_read: bool,
    pub created_at: String,
}

/// Public contact form payload.
///
/// Fields are optional at the serde level so that a missing field turns
/// into a field-level validation error instead of a body rejection.
#[derive(Debug, Default, Deserialize)]
pub struct CreateContactMessageRequest {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub subject: Option<String>,
    pub message: Option<String>,
}

/// A validated message ready to store
#[derive(Debug, Clone)]
pub struct NewContactMessage {
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub subject: String,
    pub message: String,
}

#[derive(Debug, Deserialize, Default)]
pub struct ContactMessageQuery {
    pub is_read: Option<bool>,
    pub search: Option<String>,
}

/// Bulk read/unread toggle
#[derive(Debug, Deserialize)]
pub struct MarkMessagesRequest {
    pub ids: Vec<i64>,
    pub is_read: bool,
}

#[derive(Debug, Serialize)]
pub struct BulkUpdateResponse {
    pub updated: u64,
}

impl ContactMessage {
    pub async fn create(db: &SqlitePool, new: &NewContactMessage) -> Result<Self, sqlx::Error> {
        let now = now_timestamp();
        let id = sqlx::query(
            r#"
            INSERT INTO contact_messages (name, email, phone, subject, message, is_read, created_at)
            VALUES (?, ?, ?, ?, ?, 0, ?)
            "#,
        )
        .bind(&new.name)
        .bind(&new.email)
        .bind(&new.phone)
        .bind(&new.subject)
        .bind(&new.message)
        .bind(&now)
        .execute(db)
        .await?
        .last_insert_rowid();

        Self::get(db, id).await?.ok_or(sqlx::Error::RowNotFound)
    }

    pub async fn get(db: &SqlitePool, id: i64) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, Self>("SELECT * FROM contact_messages WHERE id = ?")
            .bind(id)
            .fetch_optional(db)
            .await
    }

    pub async fn set_read(db: &SqlitePool, id: i64, is_read: bool) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query("UPDATE contact_messages SET is_read = ? WHERE id = ?")
            .bind(is_read)
            .bind(id)
            .execute(db)
            .await?;
        Self::get(db, id).await
    }

    pub async fn mark_many(db: &SqlitePool, ids: &[i64], is_read: bool) -> Result<u64, sqlx::Error> {
        let mut updated = 0;
        for id in ids {
            updated += sqlx::query("UPDATE contact_messages SET is_read = ? WHERE id = ?")
                .bind(is_read)
                .bind(id)
                .execute(db)
                .await?
                .rows_affected();
        }
        Ok(updated)
    }

    pub async fn delete(db: &SqlitePool, id: i64) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM contact_messages WHERE id = ?")
            .bind(id)
            .execute(db)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
