use serde::{Deserialize, Serialize};
use sqlx::{FromRow, SqlitePool};

use super::common::now_timestamp;

/// Address, phone numbers, opening hours and social links shown in the footer
/// and on the contact page.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ContactInformation {
    pub id: i64,
    pub address_line1: String,
    pub address_line2: String,
    pub phone_primary: String,
    pub phone_secondary: String,
    pub email_primary: String,
    pub email_secondary: String,
    pub hours_weekdays: String,
    pub hours_weekend: String,
    pub facebook_url: String,
    pub twitter_url: String,
    pub instagram_url: String,
    pub linkedin_url: String,
    pub is_active: bool,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ContactInformationRequest {
    pub address_line1: String,
    pub address_line2: String,
    pub phone_primary: String,
    pub phone_secondary: String,
    pub email_primary: String,
    pub email_secondary: String,
    pub hours_weekdays: String,
    pub hours_weekend: String,
    pub facebook_url: String,
    pub twitter_url: String,
    pub instagram_url: String,
    pub linkedin_url: String,
    #[serde(default = "default_true")]
    pub is_active: bool,
}

fn default_true() -> bool {
    true
}

#[derive(Debug, Deserialize, Default)]
pub struct ContactInformationAdminQuery {
    pub is_active: Option<bool>,
    pub search: Option<String>,
}

impl ContactInformation {
    pub async fn get(db: &SqlitePool, id: i64) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, Self>("SELECT * FROM contact_information WHERE id = ?")
            .bind(id)
            .fetch_optional(db)
            .await
    }

    /// Most recently updated active record
    pub async fn current(db: &SqlitePool) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, Self>(
            r#"
            SELECT * FROM contact_information
            WHERE is_active = 1
            ORDER BY updated_at DESC, id DESC
            LIMIT 1
            "#,
        )
        .fetch_optional(db)
        .await
    }

    pub async fn create(
        db: &SqlitePool,
        req: &ContactInformationRequest,
    ) -> Result<Self, sqlx::Error> {
        let now = now_timestamp();
        let id = sqlx::query(
            r#"
            INSERT INTO contact_information (
                address_line1, address_line2, phone_primary, phone_secondary,
                email_primary, email_secondary, hours_weekdays, hours_weekend,
                facebook_url, twitter_url, instagram_url, linkedin_url,
                is_active, created_at, updated_at
            )
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&req.address_line1)
        .bind(&req.address_line2)
        .bind(&req.phone_primary)
        .bind(&req.phone_secondary)
        .bind(&req.email_primary)
        .bind(&req.email_secondary)
        .bind(&req.hours_weekdays)
        .bind(&req.hours_weekend)
        .bind(&req.facebook_url)
        .bind(&req.twitter_url)
        .bind(&req.instagram_url)
        .bind(&req.linkedin_url)
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
        req: &ContactInformationRequest,
    ) -> Result<Option<Self>, sqlx::Error> {
        let result = sqlx::query(
            r#"
            UPDATE contact_information SET
                address_line1 = ?, address_line2 = ?, phone_primary = ?, phone_secondary = ?,
                email_primary = ?, email_secondary = ?, hours_weekdays = ?, hours_weekend = ?,
                facebook_url = ?, twitter_url = ?, instagram_url = ?, linkedin_url = ?,
                is_active = ?, updated_at = ?
            WHERE id = ?
            "#,
        )
        .bind(&req.address_line1)
        .bind(&req.address_line2)
        .bind(&req.phone_primary)
        .bind(&req.phone_secondary)
        .bind(&req.email_primary)
        .bind(&req.email_secondary)
        .bind(&req.hours_weekdays)
        .bind(&req.hours_weekend)
        .bind(&req.facebook_url)
        .bind(&req.twitter_url)
        .bind(&req.instagram_url)
        .bind(&req.linkedin_url)
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
        let result = sqlx::query("DELETE FROM contact_information WHERE id = ?")
            .bind(id)
            .execute(db)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::init_in_memory;

    #[tokio::test]
    async fn test_current_prefers_latest_update() {
        let db = init_in_memory().await.unwrap();
        let first = ContactInformation::create(
            &db,
            &ContactInformationRequest {
                phone_primary: "+233 20 000 0001".to_string(),
                is_active: true,
                ..Default::default()
            },
        )
        .await
        .unwrap();
        let second = ContactInformation::create(
            &db,
            &ContactInformationRequest {
                phone_primary: "+233 20 000 0002".to_string(),
                is_active: true,
                ..Default::default()
            },
        )
        .await
        .unwrap();

        let current = ContactInformation::current(&db).await.unwrap().unwrap();
        assert_eq!(current.id, second.id);

        // touching the older record makes it the current one
        ContactInformation::update(
            &db,
            first.id,
            &ContactInformationRequest {
                phone_primary: "+233 20 000 0003".to_string(),
                is_active: true,
                ..Default::default()
            },
        )
        .await
        .unwrap();
        let current = ContactInformation::current(&db).await.unwrap().unwrap();
        assert_eq!(current.id, first.id);
    }
}
