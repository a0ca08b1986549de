/// Business logic layer
pub mod feed;

pub use feed::{FeedOrder, FeedScope, FeedService};
