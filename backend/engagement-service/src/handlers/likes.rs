/// Like handlers - HTTP endpoints for like operations.
///
/// Both endpoints are safe to retry: create is idempotent through the
/// (user, post) uniqueness invariant, delete converges on the absent state.
use crate::db::{LikeRepository, PostRepository};
use crate::error::{AppError, Result};
use crate::middleware::UserId;
use actix_web::{web, HttpResponse};
use sqlx::PgPool;
use uuid::Uuid;

/// Like a post. Creating a like that already exists returns the existing
/// row; the repeated call leaves exactly one row for the pair.
pub async fn like_post(
    pool: web::Data<PgPool>,
    post_id: web::Path<Uuid>,
    user_id: UserId,
) -> Result<HttpResponse> {
    let posts = PostRepository::new((**pool).clone());
    if !posts.exists(*post_id).await? {
        return Err(AppError::NotFound(format!("post {} not found", *post_id)));
    }

    let likes = LikeRepository::new((**pool).clone());
    let (like, was_created) = likes.create_like(user_id.0, *post_id).await?;

    if was_created {
        tracing::info!(user_id = %user_id.0, post_id = %*post_id, "like created");
    } else {
        tracing::debug!(user_id = %user_id.0, post_id = %*post_id, "like already existed");
    }

    Ok(HttpResponse::Ok().json(like))
}

/// Remove the caller's like from a post
pub async fn unlike_post(
    pool: web::Data<PgPool>,
    post_id: web::Path<Uuid>,
    user_id: UserId,
) -> Result<HttpResponse> {
    let likes = LikeRepository::new((**pool).clone());
    let removed = likes.delete_like(user_id.0, *post_id).await?;

    if !removed {
        return Err(AppError::NotFound(format!(
            "no like by {} on post {}",
            user_id.0, *post_id
        )));
    }

    tracing::info!(user_id = %user_id.0, post_id = %*post_id, "like removed");

    Ok(HttpResponse::Ok().json(serde_json::json!({ "success": true })))
}
