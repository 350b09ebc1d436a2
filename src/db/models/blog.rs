//! Blog posts with their attached images and videos.

use serde::{Deserialize, Serialize};
use sqlx::{FromRow, SqlitePool};

use super::common::now_timestamp;
use crate::content::slug::numbered_slug;
use crate::content::{embed_url, slugify, MediaUrls, VideoType};

/// Used when a title has no characters that survive slugification
const FALLBACK_SLUG: &str = "post";

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct BlogPost {
    pub id: i64,
    pub title: String,
    pub slug: String,
    pub excerpt: String,
    pub content: String,
    pub category: String,
    pub author: String,
    pub featured_image: Option<String>,
    pub published: bool,
    pub created_date: String,
    pub updated_date: String,
    pub views: i64,
}

#[derive(Debug, Clone, Serialize)]
pub struct BlogPostResponse {
    pub id: i64,
    pub title: String,
    pub slug: String,
    pub excerpt: String,
    pub content: String,
    pub category: String,
    pub author: String,
    pub featured_image: Option<String>,
    pub featured_image_url: Option<String>,
    pub published: bool,
    pub created_date: String,
    pub updated_date: String,
    pub views: i64,
    pub images: Vec<BlogPostImageResponse>,
    pub videos: Vec<BlogPostVideoResponse>,
}

/// Create/replace payload; `content` and `excerpt` are sanitized before storage
#[derive(Debug, Clone, Deserialize)]
pub struct BlogPostRequest {
    pub title: String,
    #[serde(default)]
    pub slug: String,
    #[serde(default)]
    pub excerpt: String,
    pub content: String,
    #[serde(default = "default_category")]
    pub category: String,
    #[serde(default)]
    pub author: String,
    #[serde(default)]
    pub featured_image: Option<String>,
    #[serde(default)]
    pub published: bool,
}

fn default_category() -> String {
    "Company News".to_string()
}

#[derive(Debug, Deserialize, Default)]
pub struct BlogPostQuery {
    pub category: Option<String>,
    pub search: Option<String>,
}

#[derive(Debug, Deserialize, Default)]
pub struct BlogPostAdminQuery {
    pub category: Option<String>,
    pub published: Option<bool>,
    pub search: Option<String>,
}

impl BlogPost {
    /// Serialize together with the post's images and videos
    pub async fn to_response(
        &self,
        db: &SqlitePool,
        media: &MediaUrls,
    ) -> Result<BlogPostResponse, sqlx::Error> {
        let images = BlogPostImage::list_for_post(db, self.id)
            .await?
            .iter()
            .map(|i| i.to_response(media))
            .collect();
        let videos = BlogPostVideo::list_for_post(db, self.id)
            .await?
            .iter()
            .map(|v| v.to_response(media))
            .collect();

        Ok(BlogPostResponse {
            id: self.id,
            title: self.title.clone(),
            slug: self.slug.clone(),
            excerpt: self.excerpt.clone(),
            content: self.content.clone(),
            category: self.category.clone(),
            author: self.author.clone(),
            featured_image: media.relative_opt(self.featured_image.as_deref()),
            featured_image_url: media.absolute_opt(self.featured_image.as_deref()),
            published: self.published,
            created_date: self.created_date.clone(),
            updated_date: self.updated_date.clone(),
            views: self.views,
            images,
            videos,
        })
    }

    pub async fn get(db: &SqlitePool, id: i64) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, Self>("SELECT * FROM blog_posts WHERE id = ?")
            .bind(id)
            .fetch_optional(db)
            .await
    }

    pub async fn get_by_slug(db: &SqlitePool, slug: &str) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, Self>("SELECT * FROM blog_posts WHERE slug = ?")
            .bind(slug)
            .fetch_optional(db)
            .await
    }

    /// First free slug derived from `title`, ignoring the post being edited.
    pub async fn unique_slug(
        db: &SqlitePool,
        title: &str,
        exclude_id: Option<i64>,
    ) -> Result<String, sqlx::Error> {
        let mut base = slugify(title);
        if base.is_empty() {
            base = FALLBACK_SLUG.to_string();
        }

        let mut attempt = 0;
        loop {
            let candidate = numbered_slug(&base, attempt);
            let taken: Option<i64> =
                sqlx::query_scalar("SELECT id FROM blog_posts WHERE slug = ? AND id != ? LIMIT 1")
                    .bind(&candidate)
                    .bind(exclude_id.unwrap_or(-1))
                    .fetch_optional(db)
                    .await?;
            if taken.is_none() {
                return Ok(candidate);
            }
            attempt += 1;
        }
    }

    pub async fn create(db: &SqlitePool, req: &BlogPostRequest) -> Result<Self, sqlx::Error> {
        let slug = if req.slug.trim().is_empty() {
            Self::unique_slug(db, &req.title, None).await?
        } else {
            req.slug.trim().to_string()
        };

        let now = now_timestamp();
        let id = sqlx::query(
            r#"
            INSERT INTO blog_posts (
                title, slug, excerpt, content, category, author, featured_image,
                published, created_date, updated_date, views
            )
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, 0)
            "#,
        )
        .bind(&req.title)
        .bind(&slug)
        .bind(&req.excerpt)
        .bind(&req.content)
        .bind(&req.category)
        .bind(&req.author)
        .bind(&req.featured_image)
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
        req: &BlogPostRequest,
    ) -> Result<Option<Self>, sqlx::Error> {
        if Self::get(db, id).await?.is_none() {
            return Ok(None);
        }

        let slug = if req.slug.trim().is_empty() {
            Self::unique_slug(db, &req.title, Some(id)).await?
        } else {
            req.slug.trim().to_string()
        };

        sqlx::query(
            r#"
            UPDATE blog_posts SET
                title = ?, slug = ?, excerpt = ?, content = ?, category = ?, author = ?,
                featured_image = ?, published = ?, updated_date = ?
            WHERE id = ?
            "#,
        )
        .bind(&req.title)
        .bind(&slug)
        .bind(&req.excerpt)
        .bind(&req.content)
        .bind(&req.category)
        .bind(&req.author)
        .bind(&req.featured_image)
        .bind(req.published)
        .bind(now_timestamp())
        .bind(id)
        .execute(db)
        .await?;

        Self::get(db, id).await
    }

    /// Count a read and return the post with the new total
    pub async fn record_view(db: &SqlitePool, id: i64) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query("UPDATE blog_posts SET views = views + 1 WHERE id = ?")
            .bind(id)
            .execute(db)
            .await?;
        Self::get(db, id).await
    }

    pub async fn delete(db: &SqlitePool, id: i64) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM blog_posts WHERE id = ?")
            .bind(id)
            .execute(db)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct BlogPostImage {
    pub id: i64,
    pub blog_post_id: i64,
    pub image: String,
    pub caption: String,
    pub alt_text: String,
    pub sort_order: i64,
    pub created_at: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct BlogPostImageResponse {
    pub id: i64,
    pub image: String,
    pub image_url: String,
    pub caption: String,
    pub alt_text: String,
    pub order: i64,
    pub created_at: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct BlogPostImageRequest {
    pub image: String,
    #[serde(default)]
    pub caption: String,
    #[serde(default)]
    pub alt_text: String,
    #[serde(default)]
    pub order: i64,
}

impl BlogPostImage {
    pub fn to_response(&self, media: &MediaUrls) -> BlogPostImageResponse {
        BlogPostImageResponse {
            id: self.id,
            image: media.relative(&self.image),
            image_url: media.absolute(&self.image),
            caption: self.caption.clone(),
            alt_text: self.alt_text.clone(),
            order: self.sort_order,
            created_at: self.created_at.clone(),
        }
    }

    pub async fn list_for_post(db: &SqlitePool, post_id: i64) -> Result<Vec<Self>, sqlx::Error> {
        sqlx::query_as::<_, Self>(
            "SELECT * FROM blog_post_images WHERE blog_post_id = ? ORDER BY sort_order, created_at",
        )
        .bind(post_id)
        .fetch_all(db)
        .await
    }

    pub async fn get(db: &SqlitePool, post_id: i64, id: i64) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, Self>("SELECT * FROM blog_post_images WHERE blog_post_id = ? AND id = ?")
            .bind(post_id)
            .bind(id)
            .fetch_optional(db)
            .await
    }

    pub async fn create(
        db: &SqlitePool,
        post_id: i64,
        req: &BlogPostImageRequest,
    ) -> Result<Self, sqlx::Error> {
        let id = sqlx::query(
            r#"
            INSERT INTO blog_post_images (blog_post_id, image, caption, alt_text, sort_order, created_at)
            VALUES (?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(post_id)
        .bind(&req.image)
        .bind(&req.caption)
        .bind(&req.alt_text)
        .bind(req.order)
        .bind(now_timestamp())
        .execute(db)
        .await?
        .last_insert_rowid();

        Self::get(db, post_id, id).await?.ok_or(sqlx::Error::RowNotFound)
    }

    pub async fn update(
        db: &SqlitePool,
        post_id: i64,
        id: i64,
        req: &BlogPostImageRequest,
    ) -> Result<Option<Self>, sqlx::Error> {
        let result = sqlx::query(
            r#"
            UPDATE blog_post_images SET image = ?, caption = ?, alt_text = ?, sort_order = ?
            WHERE blog_post_id = ? AND id = ?
            "#,
        )
        .bind(&req.image)
        .bind(&req.caption)
        .bind(&req.alt_text)
        .bind(req.order)
        .bind(post_id)
        .bind(id)
        .execute(db)
        .await?;

        if result.rows_affected() == 0 {
            return Ok(None);
        }
        Self::get(db, post_id, id).await
    }

    pub async fn delete(db: &SqlitePool, post_id: i64, id: i64) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM blog_post_images WHERE blog_post_id = ? AND id = ?")
            .bind(post_id)
            .bind(id)
            .execute(db)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct BlogPostVideo {
    pub id: i64,
    pub blog_post_id: i64,
    pub video_type: String,
    pub video_url: String,
    pub video_file: Option<String>,
    pub title: String,
    pub thumbnail: Option<String>,
    pub sort_order: i64,
    pub created_at: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct BlogPostVideoResponse {
    pub id: i64,
    pub video_type: String,
    pub video_url: String,
    pub video_file: Option<String>,
    pub video_file_url: Option<String>,
    pub title: String,
    pub thumbnail: Option<String>,
    pub thumbnail_url: Option<String>,
    pub embed_url: String,
    pub order: i64,
    pub created_at: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct BlogPostVideoRequest {
    #[serde(default = "default_video_type")]
    pub video_type: String,
    #[serde(default)]
    pub video_url: String,
    #[serde(default)]
    pub video_file: Option<String>,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub thumbnail: Option<String>,
    #[serde(default)]
    pub order: i64,
}

pub(crate) fn default_video_type() -> String {
    VideoType::default().as_str().to_string()
}

impl BlogPostVideo {
    /// Player URL, or the stored URL when it can't be converted
    pub fn embed_url(&self) -> String {
        embed_url(&self.video_url, VideoType::from(self.video_type.clone()))
            .unwrap_or_else(|| self.video_url.clone())
    }

    pub fn to_response(&self, media: &MediaUrls) -> BlogPostVideoResponse {
        BlogPostVideoResponse {
            id: self.id,
            video_type: self.video_type.clone(),
            video_url: self.video_url.clone(),
            video_file: media.relative_opt(self.video_file.as_deref()),
            video_file_url: media.absolute_opt(self.video_file.as_deref()),
            title: self.title.clone(),
            thumbnail: media.relative_opt(self.thumbnail.as_deref()),
            thumbnail_url: media.absolute_opt(self.thumbnail.as_deref()),
            embed_url: self.embed_url(),
            order: self.sort_order,
            created_at: self.created_at.clone(),
        }
    }

    pub async fn list_for_post(db: &SqlitePool, post_id: i64) -> Result<Vec<Self>, sqlx::Error> {
        sqlx::query_as::<_, Self>(
            "SELECT * FROM blog_post_videos WHERE blog_post_id = ? ORDER BY sort_order, created_at",
        )
        .bind(post_id)
        .fetch_all(db)
        .await
    }

    pub async fn get(db: &SqlitePool, post_id: i64, id: i64) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, Self>("SELECT * FROM blog_post_videos WHERE blog_post_id = ? AND id = ?")
            .bind(post_id)
            .bind(id)
            .fetch_optional(db)
            .await
    }

    pub async fn create(
        db: &SqlitePool,
        post_id: i64,
        req: &BlogPostVideoRequest,
    ) -> Result<Self, sqlx::Error> {
        let id = sqlx::query(
            r#"
            INSERT INTO blog_post_videos (
                blog_post_id, video_type, video_url, video_file, title, thumbnail, sort_order, created_at
            )
            VALUES (?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(post_id)
        .bind(&req.video_type)
        .bind(&req.video_url)
        .bind(&req.video_file)
        .bind(&req.title)
        .bind(&req.thumbnail)
        .bind(req.order)
        .bind(now_timestamp())
        .execute(db)
        .await?
        .last_insert_rowid();

        Self::get(db, post_id, id).await?.ok_or(sqlx::Error::RowNotFound)
    }

    pub async fn update(
        db: &SqlitePool,
        post_id: i64,
        id: i64,
        req: &BlogPostVideoRequest,
    ) -> Result<Option<Self>, sqlx::Error> {
        let result = sqlx::query(
            r#"
            UPDATE blog_post_videos SET
                video_type = ?, video_url = ?, video_file = ?, title = ?, thumbnail = ?, sort_order = ?
            WHERE blog_post_id = ? AND id = ?
            "#,
        )
        .bind(&req.video_type)
        .bind(&req.video_url)
        .bind(&req.video_file)
        .bind(&req.title)
        .bind(&req.thumbnail)
        .bind(req.order)
        .bind(post_id)
        .bind(id)
        .execute(db)
        .await?;

        if result.rows_affected() == 0 {
            return Ok(None);
        }
        Self::get(db, post_id, id).await
    }

    pub async fn delete(db: &SqlitePool, post_id: i64, id: i64) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM blog_post_videos WHERE blog_post_id = ? AND id = ?")
            .bind(post_id)
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

    fn post(title: &str) -> BlogPostRequest {
        BlogPostRequest {
            title: title.to_string(),
            slug: String::new(),
            excerpt: String::new(),
            content: "<p>Body</p>".to_string(),
            category: default_category(),
            author: "Bencyn".to_string(),
            featured_image: None,
            published: true,
        }
    }

    #[tokio::test]
    async fn test_duplicate_titles_get_numbered_slugs() {
        let db = init_in_memory().await.unwrap();

        let a = BlogPost::create(&db, &post("Save Smart")).await.unwrap();
        let b = BlogPost::create(&db, &post("Save Smart")).await.unwrap();
        let c = BlogPost::create(&db, &post("Save Smart!")).await.unwrap();

        assert_eq!(a.slug, "save-smart");
        assert_eq!(b.slug, "save-smart-1");
        assert_eq!(c.slug, "save-smart-2");
    }

    #[tokio::test]
    async fn test_symbol_only_title_falls_back() {
        let db = init_in_memory().await.unwrap();
        let a = BlogPost::create(&db, &post("!!!")).await.unwrap();
        let b = BlogPost::create(&db, &post("???")).await.unwrap();
        assert_eq!(a.slug, "post");
        assert_eq!(b.slug, "post-1");
    }

    #[tokio::test]
    async fn test_update_keeps_own_slug() {
        let db = init_in_memory().await.unwrap();
        let a = BlogPost::create(&db, &post("Group Savings")).await.unwrap();

        let updated = BlogPost::update(&db, a.id, &post("Group Savings"))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(updated.slug, "group-savings");
        assert!(updated.updated_date >= a.updated_date);
    }

    #[tokio::test]
    async fn test_record_view_increments() {
        let db = init_in_memory().await.unwrap();
        let a = BlogPost::create(&db, &post("Views")).await.unwrap();
        BlogPost::record_view(&db, a.id).await.unwrap();
        let after = BlogPost::record_view(&db, a.id).await.unwrap().unwrap();
        assert_eq!(after.views, 2);
    }

    #[tokio::test]
    async fn test_delete_cascades_to_media() {
        let db = init_in_memory().await.unwrap();
        let a = BlogPost::create(&db, &post("Cascade")).await.unwrap();
        BlogPostImage::create(
            &db,
            a.id,
            &BlogPostImageRequest {
                image: "blog_content_images/x.png".to_string(),
                caption: String::new(),
                alt_text: String::new(),
                order: 0,
            },
        )
        .await
        .unwrap();

        assert!(BlogPost::delete(&db, a.id).await.unwrap());
        assert!(BlogPostImage::list_for_post(&db, a.id).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_video_response_embeds_youtube() {
        let db = init_in_memory().await.unwrap();
        let a = BlogPost::create(&db, &post("Video")).await.unwrap();
        let video = BlogPostVideo::create(
            &db,
            a.id,
            &BlogPostVideoRequest {
                video_type: "youtube".to_string(),
                video_url: "https://youtu.be/dQw4w9WgXcQ".to_string(),
                video_file: None,
                title: "Intro".to_string(),
                thumbnail: None,
                order: 0,
            },
        )
        .await
        .unwrap();

        let response = a.to_response(&db, &MediaUrls::default()).await.unwrap();
        assert_eq!(response.videos.len(), 1);
        assert_eq!(
            response.videos[0].embed_url,
            "https://www.youtube.com/embed/dQw4w9WgXcQ"
        );
        assert_eq!(video.embed_url(), response.videos[0].embed_url);
    }
}
