/// Engagement Client Library
///
/// Client-side engagement state for a social feed: the typed API client and
/// the per-post controllers that keep an optimistic local view reconciled
/// with the authoritative server.
///
/// # Modules
///
/// - `api`: `EngagementApi` trait, error taxonomy and the REST implementation
/// - `models`: wire representations of likes and comments
/// - `like_button`: optimistic like toggle with exact-snapshot rollback
/// - `comment_dialog`: comment list lifecycle with a staleness guard
pub mod api;
pub mod comment_dialog;
pub mod like_button;
pub mod models;

pub use api::{ApiError, EngagementApi, RestEngagementApi};
pub use comment_dialog::{CommentDialog, FetchTicket};
pub use like_button::{LikeButton, ToggleOutcome};
