/// HTTP request handlers for the engagement API
pub mod comments;
pub mod likes;
pub mod posts;

pub use comments::{create_comment, delete_comment, list_comments};
pub use likes::{like_post, unlike_post};
pub use posts::{create_post, get_posts};

/// Returns the trimmed text, or None when it is empty after trimming.
/// Every free-text write goes through this check.
pub(crate) fn trimmed_non_empty(text: &str) -> Option<&str> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed)
    }
}
