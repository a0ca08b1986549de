/// Engagement Service Library
///
/// Authoritative server for post engagement: likes, comments and the feed
/// projection. Like creation is idempotent per (user, post); comment
/// deletion is author-only; like/comment counts are always derived from the
/// live rows.
///
/// # Modules
///
/// - `handlers`: HTTP request handlers
/// - `models`: Entity rows and feed projections
/// - `services`: Feed assembly (scope selection + ordering policy)
/// - `db`: Repositories over PostgreSQL
/// - `middleware`: Session identity resolution
/// - `error`: Error taxonomy and HTTP translation
/// - `config`: Environment-driven configuration
pub mod config;
pub mod db;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod services;

pub use config::Config;
pub use error::{AppError, Result};
