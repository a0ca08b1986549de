/// Typed client for the engagement HTTP surface.
///
/// Retry semantics are asymmetric and callers must respect them: like
/// create/delete are idempotent (safe to re-send on an ambiguous network
/// failure), comment creation is NOT - every successful call creates a new
/// distinct comment.
use crate::models::{Comment, Like};
use async_trait::async_trait;
use serde::Deserialize;
use thiserror::Error;
use uuid::Uuid;

/// Client-side error taxonomy: the server statuses plus transport failure.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("unauthorized: {0}")]
    Unauthorized(String),

    #[error("forbidden: {0}")]
    Forbidden(String),

    #[error("not found: {0}")]
    NotFound(String),

    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("conflict: {0}")]
    Conflict(String),

    #[error("server error ({status}): {message}")]
    Server { status: u16, message: String },

    #[error("transport failure: {0}")]
    Transport(String),
}

/// Operations the engagement controllers need from the server.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait EngagementApi: Send + Sync {
    /// Idempotent: liking an already-liked post returns the existing like.
    async fn create_like(&self, post_id: Uuid) -> Result<Like, ApiError>;

    /// Fails with NotFound when no like exists for the caller and post.
    async fn delete_like(&self, post_id: Uuid) -> Result<(), ApiError>;

    /// Fresh snapshot of a post's comments, oldest first.
    async fn list_comments(&self, post_id: Uuid) -> Result<Vec<Comment>, ApiError>;

    /// NOT idempotent: each successful call creates a distinct comment.
    async fn create_comment(&self, post_id: Uuid, content: String) -> Result<Comment, ApiError>;

    /// Author-only; Forbidden when the caller does not own the comment.
    async fn delete_comment(&self, post_id: Uuid, comment_id: Uuid) -> Result<(), ApiError>;
}

/// Structured error body the server attaches to non-2xx responses
#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: Option<String>,
}

/// `EngagementApi` over the REST surface, authenticated with a bearer
/// session token. Public reads work without a token.
pub struct RestEngagementApi {
    http: reqwest::Client,
    base_url: String,
    bearer_token: Option<String>,
}

impl RestEngagementApi {
    pub fn new(base_url: impl Into<String>, bearer_token: Option<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            bearer_token,
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}/api/v1{}", self.base_url, path)
    }

    fn authorize(&self, req: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.bearer_token {
            Some(token) => req.bearer_auth(token),
            None => req,
        }
    }

    async fn check(resp: reqwest::Response) -> Result<reqwest::Response, ApiError> {
        let status = resp.status();
        if status.is_success() {
            return Ok(resp);
        }

        let message = resp
            .json::<ErrorBody>()
            .await
            .ok()
            .and_then(|b| b.error)
            .unwrap_or_else(|| status.to_string());

        Err(match status.as_u16() {
            401 => ApiError::Unauthorized(message),
            403 => ApiError::Forbidden(message),
            404 => ApiError::NotFound(message),
            400 => ApiError::InvalidInput(message),
            409 => ApiError::Conflict(message),
            code => ApiError::Server {
                status: code,
                message,
            },
        })
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        ApiError::Transport(err.to_string())
    }
}

#[async_trait]
impl EngagementApi for RestEngagementApi {
    async fn create_like(&self, post_id: Uuid) -> Result<Like, ApiError> {
        let resp = self
            .authorize(self.http.post(self.url(&format!("/posts/{}/like", post_id))))
            .send()
            .await?;
        Ok(Self::check(resp).await?.json().await?)
    }

    async fn delete_like(&self, post_id: Uuid) -> Result<(), ApiError> {
        let resp = self
            .authorize(
                self.http
                    .delete(self.url(&format!("/posts/{}/like", post_id))),
            )
            .send()
            .await?;
        Self::check(resp).await?;
        Ok(())
    }

    async fn list_comments(&self, post_id: Uuid) -> Result<Vec<Comment>, ApiError> {
        let resp = self
            .http
            .get(self.url(&format!("/posts/{}/comments", post_id)))
            .send()
            .await?;
        Ok(Self::check(resp).await?.json().await?)
    }

    async fn create_comment(&self, post_id: Uuid, content: String) -> Result<Comment, ApiError> {
        let resp = self
            .authorize(
                self.http
                    .post(self.url(&format!("/posts/{}/comments", post_id))),
            )
            .json(&serde_json::json!({ "content": content }))
            .send()
            .await?;
        Ok(Self::check(resp).await?.json().await?)
    }

    async fn delete_comment(&self, post_id: Uuid, comment_id: Uuid) -> Result<(), ApiError> {
        let resp = self
            .authorize(
                self.http
                    .delete(self.url(&format!("/posts/{}/comments/{}", post_id, comment_id))),
            )
            .send()
            .await?;
        Self::check(resp).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base_url_trailing_slash_is_normalized() {
        let api = RestEngagementApi::new("http://localhost:8084/", None);
        assert_eq!(
            api.url("/posts"),
            "http://localhost:8084/api/v1/posts".to_string()
        );
    }
}
