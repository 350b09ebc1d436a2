//! Dashboard counters for the admin landing page.

use serde::Serialize;
use sqlx::SqlitePool;

#[derive(Debug, Clone, Default, Serialize, PartialEq, Eq)]
pub struct DashboardStats {
    pub total_messages: i64,
    pub unread_messages: i64,
    pub published_posts: i64,
    pub active_services: i64,
}

impl DashboardStats {
    pub async fn collect(db: &SqlitePool) -> Result<Self, sqlx::Error> {
        let (total_messages, unread_messages): (i64, i64) = sqlx::query_as(
            "SELECT COUNT(*), COALESCE(SUM(CASE WHEN is_read = 0 THEN 1 ELSE 0 END), 0) FROM contact_messages",
        )
        .fetch_one(db)
        .await?;

        let published_posts: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM blog_posts WHERE published = 1")
                .fetch_one(db)
                .await?;

        let active_services: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM services WHERE is_active = 1")
                .fetch_one(db)
                .await?;

        Ok(Self {
            total_messages,
            unread_messages,
            published_posts,
            active_services,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{init_in_memory, ContactMessage, NewContactMessage};

    #[tokio::test]
    async fn test_counts_unread_messages() {
        let db = init_in_memory().await.unwrap();
        assert_eq!(DashboardStats::collect(&db).await.unwrap(), DashboardStats::default());

        let new = NewContactMessage {
            name: "Ama".to_string(),
            email: "ama@example.com".to_string(),
            phone: None,
            subject: "Hello".to_string(),
            message: "Question about group susu".to_string(),
        };
        let first = ContactMessage::create(&db, &new).await.unwrap();
        ContactMessage::create(&db, &new).await.unwrap();
        ContactMessage::set_read(&db, first.id, true).await.unwrap();

        let stats = DashboardStats::collect(&db).await.unwrap();
        assert_eq!(stats.total_messages, 2);
        assert_eq!(stats.unread_messages, 1);
    }
}
