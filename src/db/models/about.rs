//! About page content: the five editable sections, core values and the
//! company timeline.

use serde::{Deserialize, Serialize};
use sqlx::{FromRow, SqlitePool};

use super::common::now_timestamp;

/// One of the independently editable blocks of the About page
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AboutSectionKind {
    Story,
    Mission,
    Vision,
    Values,
    Timeline,
}

impl AboutSectionKind {
    pub const ALL: [AboutSectionKind; 5] = [
        Self::Story,
        Self::Mission,
        Self::Vision,
        Self::Values,
        Self::Timeline,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Story => "story",
            Self::Mission => "mission",
            Self::Vision => "vision",
            Self::Values => "values",
            Self::Timeline => "timeline",
        }
    }

    pub fn default_title(&self) -> &'static str {
        match self {
            Self::Story => "Our Story",
            Self::Mission => "Our Mission",
            Self::Vision => "Our Vision",
            Self::Values => "Our Core Values",
            Self::Timeline => "Our Journey",
        }
    }

    /// Header sections carry an optional subtitle instead of required content
    pub fn is_header(&self) -> bool {
        matches!(self, Self::Values | Self::Timeline)
    }

    /// Name used by the About settings form (`values_header`, ...)
    pub fn settings_key(&self) -> &'static str {
        match self {
            Self::Story => "story",
            Self::Mission => "mission",
            Self::Vision => "vision",
            Self::Values => "values_header",
            Self::Timeline => "timeline_header",
        }
    }

    pub fn from_settings_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|k| k.settings_key() == key)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct AboutSection {
    pub id: i64,
    pub kind: String,
    pub title: String,
    pub body: String,
    pub is_active: bool,
    pub created_at: String,
    pub updated_at: String,
}

/// A section as the site sees it. `id` and timestamps are absent for the
/// unsaved defaults shown by the settings view.
#[derive(Debug, Clone, Serialize)]
pub struct AboutSectionResponse {
    pub id: Option<i64>,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subtitle: Option<String>,
    pub is_active: bool,
    pub created_at: Option<String>,
    pub updated_at: Option<String>,
}

impl AboutSectionResponse {
    pub fn defaults(kind: AboutSectionKind) -> Self {
        let (content, subtitle) = split_body(kind, String::new());
        Self {
            id: None,
            title: kind.default_title().to_string(),
            content,
            subtitle,
            is_active: true,
            created_at: None,
            updated_at: None,
        }
    }
}

fn split_body(kind: AboutSectionKind, body: String) -> (Option<String>, Option<String>) {
    if kind.is_header() {
        (None, Some(body))
    } else {
        (Some(body), None)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct AboutSectionRequest {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default)]
    pub subtitle: Option<String>,
    #[serde(default = "default_true")]
    pub is_active: bool,
}

impl AboutSectionRequest {
    pub fn title_for(&self, kind: AboutSectionKind) -> String {
        self.title
            .clone()
            .filter(|t| !t.trim().is_empty())
            .unwrap_or_else(|| kind.default_title().to_string())
    }

    /// The text stored in `body`: subtitle for headers, content otherwise
    pub fn body_for(&self, kind: AboutSectionKind) -> String {
        let body = if kind.is_header() {
            &self.subtitle
        } else {
            &self.content
        };
        body.clone().unwrap_or_default()
    }
}

/// Consolidated About settings form submission
#[derive(Debug, Clone, Deserialize)]
pub struct AboutSettingsRequest {
    pub section: String,
    #[serde(flatten)]
    pub fields: AboutSectionRequest,
}

#[derive(Debug, Serialize)]
pub struct AboutSettingsResponse {
    pub story: AboutSectionResponse,
    pub mission: AboutSectionResponse,
    pub vision: AboutSectionResponse,
    pub values_header: AboutSectionResponse,
    pub timeline_header: AboutSectionResponse,
    pub values: Vec<AboutValue>,
    pub timeline_items: Vec<AboutTimelineItem>,
}

#[derive(Debug, Deserialize, Default)]
pub struct AboutSectionAdminQuery {
    pub is_active: Option<bool>,
    pub search: Option<String>,
}

fn default_true() -> bool {
    true
}

impl AboutSection {
    pub fn kind(&self) -> AboutSectionKind {
        AboutSectionKind::ALL
            .into_iter()
            .find(|k| k.as_str() == self.kind)
            .unwrap_or(AboutSectionKind::Story)
    }

    pub fn to_response(&self) -> AboutSectionResponse {
        let (content, subtitle) = split_body(self.kind(), self.body.clone());
        AboutSectionResponse {
            id: Some(self.id),
            title: self.title.clone(),
            content,
            subtitle,
            is_active: self.is_active,
            created_at: Some(self.created_at.clone()),
            updated_at: Some(self.updated_at.clone()),
        }
    }

    pub async fn get(
        db: &SqlitePool,
        kind: AboutSectionKind,
        id: i64,
    ) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, Self>("SELECT * FROM about_sections WHERE kind = ? AND id = ?")
            .bind(kind.as_str())
            .bind(id)
            .fetch_optional(db)
            .await
    }

    /// Most recently updated active section of this kind
    pub async fn current(
        db: &SqlitePool,
        kind: AboutSectionKind,
    ) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, Self>(
            r#"
            SELECT * FROM about_sections
            WHERE kind = ? AND is_active = 1
            ORDER BY updated_at DESC, id DESC
            LIMIT 1
            "#,
        )
        .bind(kind.as_str())
        .fetch_optional(db)
        .await
    }

    /// The record the settings view edits: current active, else the latest of any state
    pub async fn editable(
        db: &SqlitePool,
        kind: AboutSectionKind,
    ) -> Result<Option<Self>, sqlx::Error> {
        if let Some(section) = Self::current(db, kind).await? {
            return Ok(Some(section));
        }
        sqlx::query_as::<_, Self>(
            "SELECT * FROM about_sections WHERE kind = ? ORDER BY updated_at DESC, id DESC LIMIT 1",
        )
        .bind(kind.as_str())
        .fetch_optional(db)
        .await
    }

    pub async fn create(
        db: &SqlitePool,
        kind: AboutSectionKind,
        req: &AboutSectionRequest,
    ) -> Result<Self, sqlx::Error> {
        let now = now_timestamp();
        let id = sqlx::query(
            r#"
            INSERT INTO about_sections (kind, title, body, is_active, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(kind.as_str())
        .bind(req.title_for(kind))
        .bind(req.body_for(kind))
        .bind(req.is_active)
        .bind(&now)
        .bind(&now)
        .execute(db)
        .await?
        .last_insert_rowid();

        Self::get(db, kind, id).await?.ok_or(sqlx::Error::RowNotFound)
    }

    pub async fn update(
        db: &SqlitePool,
        kind: AboutSectionKind,
        id: i64,
        req: &AboutSectionRequest,
    ) -> Result<Option<Self>, sqlx::Error> {
        let result = sqlx::query(
            r#"
            UPDATE about_sections SET title = ?, body = ?, is_active = ?, updated_at = ?
            WHERE kind = ? AND id = ?
            "#,
        )
        .bind(req.title_for(kind))
        .bind(req.body_for(kind))
        .bind(req.is_active)
        .bind(now_timestamp())
        .bind(kind.as_str())
        .bind(id)
        .execute(db)
        .await?;

        if result.rows_affected() == 0 {
            return Ok(None);
        }
        Self::get(db, kind, id).await
    }

    /// Save from the settings view: edit the record it showed, or create one
    pub async fn save_settings(
        db: &SqlitePool,
        kind: AboutSectionKind,
        req: &AboutSectionRequest,
    ) -> Result<Self, sqlx::Error> {
        match Self::editable(db, kind).await? {
            Some(existing) => Self::update(db, kind, existing.id, req)
                .await?
                .ok_or(sqlx::Error::RowNotFound),
            None => Self::create(db, kind, req).await,
        }
    }

    pub async fn delete(
        db: &SqlitePool,
        kind: AboutSectionKind,
        id: i64,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM about_sections WHERE kind = ? AND id = ?")
            .bind(kind.as_str())
            .bind(id)
            .execute(db)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct AboutValue {
    pub id: i64,
    pub icon: String,
    pub title: String,
    pub description: String,
    #[serde(rename = "order")]
    pub sort_order: i64,
    pub is_active: bool,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AboutValueRequest {
    #[serde(default = "default_value_icon")]
    pub icon: String,
    pub title: String,
    pub description: String,
    #[serde(default)]
    pub order: i64,
    #[serde(default = "default_true")]
    pub is_active: bool,
}

fn default_value_icon() -> String {
    "🎯".to_string()
}

impl AboutValue {
    pub async fn get(db: &SqlitePool, id: i64) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, Self>("SELECT * FROM about_values WHERE id = ?")
            .bind(id)
            .fetch_optional(db)
            .await
    }

    pub async fn list_active(db: &SqlitePool) -> Result<Vec<Self>, sqlx::Error> {
        sqlx::query_as::<_, Self>(
            "SELECT * FROM about_values WHERE is_active = 1 ORDER BY sort_order, id",
        )
        .fetch_all(db)
        .await
    }

    pub async fn create(db: &SqlitePool, req: &AboutValueRequest) -> Result<Self, sqlx::Error> {
        let now = now_timestamp();
        let id = sqlx::query(
            r#"
            INSERT INTO about_values (icon, title, description, sort_order, is_active, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&req.icon)
        .bind(&req.title)
        .bind(&req.description)
        .bind(req.order)
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
        req: &AboutValueRequest,
    ) -> Result<Option<Self>, sqlx::Error> {
        let result = sqlx::query(
            r#"
            UPDATE about_values SET
                icon = ?, title = ?, description = ?, sort_order = ?, is_active = ?, updated_at = ?
            WHERE id = ?
            "#,
        )
        .bind(&req.icon)
        .bind(&req.title)
        .bind(&req.description)
        .bind(req.order)
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
        let result = sqlx::query("DELETE FROM about_values WHERE id = ?")
            .bind(id)
            .execute(db)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct AboutTimelineItem {
    pub id: i64,
    pub year: String,
    pub title: String,
    pub description: String,
    #[serde(rename = "order")]
    pub sort_order: i64,
    pub is_active: bool,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AboutTimelineItemRequest {
    pub year: String,
    pub title: String,
    pub description: String,
    #[serde(default)]
    pub order: i64,
    #[serde(default = "default_true")]
    pub is_active: bool,
}

#[derive(Debug, Deserialize, Default)]
pub struct AboutItemAdminQuery {
    pub is_active: Option<bool>,
    pub search: Option<String>,
}

impl AboutTimelineItem {
    pub async fn get(db: &SqlitePool, id: i64) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, Self>("SELECT * FROM about_timeline_items WHERE id = ?")
            .bind(id)
            .fetch_optional(db)
            .await
    }

    pub async fn list_active(db: &SqlitePool) -> Result<Vec<Self>, sqlx::Error> {
        sqlx::query_as::<_, Self>(
            "SELECT * FROM about_timeline_items WHERE is_active = 1 ORDER BY sort_order, year",
        )
        .fetch_all(db)
        .await
    }

    pub async fn create(
        db: &SqlitePool,
        req: &AboutTimelineItemRequest,
    ) -> Result<Self, sqlx::Error> {
        let now = now_timestamp();
        let id = sqlx::query(
            r#"
            INSERT INTO about_timeline_items (year, title, description, sort_order, is_active, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&req.year)
        .bind(&req.title)
        .bind(&req.description)
        .bind(req.order)
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
        req: &AboutTimelineItemRequest,
    ) -> Result<Option<Self>, sqlx::Error> {
        let result = sqlx::query(
            r#"
            UPDATE about_timeline_items SET
                year = ?, title = ?, description = ?, sort_order = ?, is_active = ?, updated_at = ?
            WHERE id = ?
            "#,
        )
        .bind(&req.year)
        .bind(&req.title)
        .bind(&req.description)
        .bind(req.order)
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
        let result = sqlx::query("DELETE FROM about_timeline_items WHERE id = ?")
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

    fn story(title: &str, active: bool) -> AboutSectionRequest {
        AboutSectionRequest {
            title: Some(title.to_string()),
            content: Some(format!("{} content", title)),
            subtitle: None,
            is_active: active,
        }
    }

    #[tokio::test]
    async fn test_current_is_latest_active() {
        let db = init_in_memory().await.unwrap();
        AboutSection::create(&db, AboutSectionKind::Story, &story("First", true))
            .await
            .unwrap();
        let second = AboutSection::create(&db, AboutSectionKind::Story, &story("Second", true))
            .await
            .unwrap();
        AboutSection::create(&db, AboutSectionKind::Story, &story("Draft", false))
            .await
            .unwrap();

        let current = AboutSection::current(&db, AboutSectionKind::Story)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(current.id, second.id);

        // other kinds are unaffected
        assert!(AboutSection::current(&db, AboutSectionKind::Mission)
            .await
            .unwrap()
            .is_none());
    }

    #[tokio::test]
    async fn test_save_settings_edits_then_creates() {
        let db = init_in_memory().await.unwrap();
        let req = AboutSectionRequest {
            title: None,
            content: None,
            subtitle: Some("Milestones".to_string()),
            is_active: true,
        };

        let created = AboutSection::save_settings(&db, AboutSectionKind::Timeline, &req)
            .await
            .unwrap();
        assert_eq!(created.title, "Our Journey");
        let again = AboutSection::save_settings(&db, AboutSectionKind::Timeline, &req)
            .await
            .unwrap();
        assert_eq!(created.id, again.id);

        let response = again.to_response();
        assert_eq!(response.subtitle.as_deref(), Some("Milestones"));
        assert!(response.content.is_none());
    }

    #[tokio::test]
    async fn test_editable_falls_back_to_inactive() {
        let db = init_in_memory().await.unwrap();
        let draft = AboutSection::create(&db, AboutSectionKind::Vision, &story("Draft", false))
            .await
            .unwrap();
        let editable = AboutSection::editable(&db, AboutSectionKind::Vision)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(editable.id, draft.id);
    }

    #[test]
    fn test_settings_keys() {
        assert_eq!(
            AboutSectionKind::from_settings_key("values_header"),
            Some(AboutSectionKind::Values)
        );
        assert_eq!(AboutSectionKind::from_settings_key("values"), None);
        assert_eq!(
            AboutSectionResponse::defaults(AboutSectionKind::Mission).title,
            "Our Mission"
        );
    }
}
