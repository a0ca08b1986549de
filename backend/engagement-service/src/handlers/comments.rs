/// Comment handlers - HTTP endpoints for comment operations.
///
/// Unlike the like endpoints, comment creation is NOT idempotent: each
/// successful call creates a distinct row. Clients must not blindly re-send
/// on ambiguous failures.
use super::trimmed_non_empty;
use crate::db::{CommentRepository, PostRepository};
use crate::error::{AppError, Result};
use crate::middleware::UserId;
use actix_web::{web, HttpResponse};
use serde::Deserialize;
use sqlx::PgPool;
use uuid::Uuid;

/// List a post's comments, oldest first. Public read, no identity required.
pub async fn list_comments(
    pool: web::Data<PgPool>,
    post_id: web::Path<Uuid>,
) -> Result<HttpResponse> {
    let comments = CommentRepository::new((**pool).clone());
    let list = comments.list_comments(*post_id).await?;

    Ok(HttpResponse::Ok().json(list))
}

/// Create a comment on a post
pub async fn create_comment(
    pool: web::Data<PgPool>,
    post_id: web::Path<Uuid>,
    user_id: UserId,
    req: web::Json<CreateCommentRequest>,
) -> Result<HttpResponse> {
    let content = trimmed_non_empty(&req.content)
        .ok_or_else(|| AppError::InvalidInput("comment content must not be empty".to_string()))?;

    let posts = PostRepository::new((**pool).clone());
    if !posts.exists(*post_id).await? {
        return Err(AppError::NotFound(format!("post {} not found", *post_id)));
    }

    let comments = CommentRepository::new((**pool).clone());
    let comment = comments.create_comment(user_id.0, *post_id, content).await?;

    tracing::info!(user_id = %user_id.0, post_id = %*post_id, comment_id = %comment.id, "comment created");

    Ok(HttpResponse::Ok().json(comment))
}

/// Delete a comment. Only the comment's author may delete it - not the
/// post's author, not anyone else.
pub async fn delete_comment(
    pool: web::Data<PgPool>,
    path: web::Path<(Uuid, Uuid)>,
    user_id: UserId,
) -> Result<HttpResponse> {
    let (_post_id, comment_id) = path.into_inner();

    let comments = CommentRepository::new((**pool).clone());
    let author = comments
        .comment_author(comment_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("comment {} not found", comment_id)))?;

    if author != user_id.0 {
        return Err(AppError::Forbidden(
            "only the comment author may delete it".to_string(),
        ));
    }

    comments.delete_comment(comment_id).await?;

    tracing::info!(user_id = %user_id.0, comment_id = %comment_id, "comment deleted");

    Ok(HttpResponse::Ok().json(serde_json::json!({ "success": true })))
}

/// Request body for creating a comment
#[derive(Debug, Deserialize)]
pub struct CreateCommentRequest {
    pub content: String,
}
