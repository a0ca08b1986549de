use crate::error::Result;
use crate::models::{FeedItem, Post};
use sqlx::PgPool;
use uuid::Uuid;

/// Shared projection: a post joined with author, first image and derived
/// engagement aggregates. Counts come from COUNT(*) over the live rows so
/// they always equal the actual cardinality.
const FEED_SELECT: &str = r#"
    SELECT p.id, p.user_id, p.title, p.content, p.created_at,
           u.display_name AS author_name, u.email AS author_email,
           (SELECT i.url FROM post_images i
            WHERE i.post_id = p.id
            ORDER BY i.sort_order ASC LIMIT 1) AS image_url,
           (SELECT COUNT(*) FROM likes l WHERE l.post_id = p.id) AS like_count,
           (SELECT COUNT(*) FROM comments c WHERE c.post_id = p.id) AS comment_count,
           ARRAY(SELECT l.user_id FROM likes l WHERE l.post_id = p.id) AS liked_by
    FROM posts p
    JOIN users u ON u.id = p.user_id
"#;

/// Repository for Post operations and feed selection
#[derive(Clone)]
pub struct PostRepository {
    pool: PgPool,
}

impl PostRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Check that a post exists
    pub async fn exists(&self, post_id: Uuid) -> Result<bool> {
        let exists: bool = sqlx::query_scalar(
            r#"
            SELECT EXISTS(SELECT 1 FROM posts WHERE id = $1)
            "#,
        )
        .bind(post_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(exists)
    }

    /// Create a post and its ordered images as a single transaction
    pub async fn create_post(
        &self,
        user_id: Uuid,
        title: &str,
        content: &str,
        image_urls: &[String],
    ) -> Result<Post> {
        let mut tx = self.pool.begin().await?;

        let post = sqlx::query_as::<_, Post>(
            r#"
            INSERT INTO posts (user_id, title, content)
            VALUES ($1, $2, $3)
            RETURNING id, user_id, title, content, created_at
            "#,
        )
        .bind(user_id)
        .bind(title)
        .bind(content)
        .fetch_one(&mut *tx)
        .await?;

        for (position, url) in image_urls.iter().enumerate() {
            sqlx::query(
                r#"
                INSERT INTO post_images (post_id, url, sort_order)
                VALUES ($1, $2, $3)
                "#,
            )
            .bind(post.id)
            .bind(url)
            .bind(position as i32)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;

        Ok(post)
    }

    /// Single post in feed projection, or None if absent
    pub async fn fetch_feed_item(&self, post_id: Uuid) -> Result<Option<FeedItem>> {
        let query = format!("{} WHERE p.id = $1", FEED_SELECT);
        let item = sqlx::query_as::<_, FeedItem>(&query)
            .bind(post_id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(item)
    }

    /// All posts, newest first
    pub async fn feed_all(&self) -> Result<Vec<FeedItem>> {
        let query = format!("{} ORDER BY p.created_at DESC", FEED_SELECT);
        let items = sqlx::query_as::<_, FeedItem>(&query)
            .fetch_all(&self.pool)
            .await?;

        Ok(items)
    }

    /// Posts authored by one user, newest first
    pub async fn feed_by_user(&self, user_id: Uuid) -> Result<Vec<FeedItem>> {
        let query = format!(
            "{} WHERE p.user_id = $1 ORDER BY p.created_at DESC",
            FEED_SELECT
        );
        let items = sqlx::query_as::<_, FeedItem>(&query)
            .bind(user_id)
            .fetch_all(&self.pool)
            .await?;

        Ok(items)
    }

    /// Posts a user has liked, newest first
    pub async fn feed_liked_by(&self, user_id: Uuid) -> Result<Vec<FeedItem>> {
        let query = format!(
            "{} WHERE EXISTS(SELECT 1 FROM likes l WHERE l.post_id = p.id AND l.user_id = $1) \
             ORDER BY p.created_at DESC",
            FEED_SELECT
        );
        let items = sqlx::query_as::<_, FeedItem>(&query)
            .bind(user_id)
            .fetch_all(&self.pool)
            .await?;

        Ok(items)
    }
}
