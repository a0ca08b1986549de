use crate::error::Result;
use crate::models::Like;
use sqlx::{PgPool, Row};
use uuid::Uuid;

/// Repository for Like operations
#[derive(Clone)]
pub struct LikeRepository {
    pool: PgPool,
}

impl LikeRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Create a like (idempotent - returns the existing row if the pair
    /// already exists). Returns (Like, was_created). The unique constraint
    /// on (user_id, post_id) serializes concurrent attempts, and
    /// `xmax = 0` distinguishes a fresh insert from a conflict-update in
    /// the same atomic statement, so two racing creates report exactly one
    /// `was_created = true`.
    pub async fn create_like(&self, user_id: Uuid, post_id: Uuid) -> Result<(Like, bool)> {
        let row = sqlx::query(
            r#"
            INSERT INTO likes (user_id, post_id)
            VALUES ($1, $2)
            ON CONFLICT (user_id, post_id) DO UPDATE
            SET user_id = EXCLUDED.user_id
            RETURNING id, user_id, post_id, created_at, (xmax = 0) AS was_created
            "#,
        )
        .bind(user_id)
        .bind(post_id)
        .fetch_one(&self.pool)
        .await?;

        let like = Like {
            id: row.get("id"),
            user_id: row.get("user_id"),
            post_id: row.get("post_id"),
            created_at: row.get("created_at"),
        };
        let was_created: bool = row.get("was_created");

        Ok((like, was_created))
    }

    /// Delete the unique like for the pair. Returns whether a row existed;
    /// the API layer maps false to NotFound.
    pub async fn delete_like(&self, user_id: Uuid, post_id: Uuid) -> Result<bool> {
        let result = sqlx::query(
            r#"
            DELETE FROM likes
            WHERE user_id = $1 AND post_id = $2
            "#,
        )
        .bind(user_id)
        .bind(post_id)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Check if user has liked a post
    pub async fn check_user_liked(&self, user_id: Uuid, post_id: Uuid) -> Result<bool> {
        let exists: bool = sqlx::query_scalar(
            r#"
            SELECT EXISTS(
                SELECT 1 FROM likes
                WHERE user_id = $1 AND post_id = $2
            )
            "#,
        )
        .bind(user_id)
        .bind(post_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(exists)
    }

    /// Like count for a post, derived from the live rows
    pub async fn like_count(&self, post_id: Uuid) -> Result<i64> {
        let count: i64 = sqlx::query_scalar(
            r#"
            SELECT COUNT(*) FROM likes
            WHERE post_id = $1
            "#,
        )
        .bind(post_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(count)
    }
}
