/// Post handlers - feed retrieval and post creation
use super::trimmed_non_empty;
use crate::db::PostRepository;
use crate::error::{AppError, Result};
use crate::middleware::UserId;
use crate::services::{FeedOrder, FeedScope, FeedService};
use actix_web::{web, HttpResponse};
use serde::Deserialize;
use sqlx::PgPool;
use uuid::Uuid;

/// Query parameters for feed selection
#[derive(Debug, Deserialize)]
pub struct FeedQuery {
    /// Restrict to posts authored by this user
    pub user_id: Option<Uuid>,
    /// Restrict to posts this user has liked
    pub liked_by_user_id: Option<Uuid>,
    /// "random" for a fresh shuffle, anything else is newest-first
    pub order: Option<String>,
}

impl FeedQuery {
    fn scope(&self) -> FeedScope {
        if let Some(user_id) = self.user_id {
            FeedScope::ByUser(user_id)
        } else if let Some(user_id) = self.liked_by_user_id {
            FeedScope::LikedBy(user_id)
        } else {
            FeedScope::All
        }
    }

    fn order(&self) -> FeedOrder {
        match self.order.as_deref() {
            Some("random") => FeedOrder::Random,
            _ => FeedOrder::Recent,
        }
    }
}

/// Feed of posts with image, like and comment-count projections.
/// Public read, no identity required.
pub async fn get_posts(
    pool: web::Data<PgPool>,
    query: web::Query<FeedQuery>,
) -> Result<HttpResponse> {
    let feed = FeedService::new(PostRepository::new((**pool).clone()));
    let items = feed.assemble(query.scope(), query.order()).await?;

    Ok(HttpResponse::Ok().json(items))
}

/// Create a post with an ordered image sequence
pub async fn create_post(
    pool: web::Data<PgPool>,
    user_id: UserId,
    req: web::Json<CreatePostRequest>,
) -> Result<HttpResponse> {
    let title = trimmed_non_empty(&req.title)
        .ok_or_else(|| AppError::InvalidInput("title is required".to_string()))?;
    let content = trimmed_non_empty(&req.content)
        .ok_or_else(|| AppError::InvalidInput("content is required".to_string()))?;

    let posts = PostRepository::new((**pool).clone());
    let post = posts
        .create_post(user_id.0, title, content, &req.images)
        .await?;

    tracing::info!(user_id = %user_id.0, post_id = %post.id, "post created");

    // Respond with the same projection the feed uses
    let item = posts
        .fetch_feed_item(post.id)
        .await?
        .ok_or_else(|| AppError::Internal("created post missing from store".to_string()))?;

    Ok(HttpResponse::Ok().json(item))
}

/// Request body for creating a post
#[derive(Debug, Deserialize)]
pub struct CreatePostRequest {
    pub title: String,
    pub content: String,
    #[serde(default)]
    pub images: Vec<String>,
}
