/// Feed assembly: selects posts for a viewing scope and orders them.
///
/// Pure with respect to its inputs except for the randomized ordering's use
/// of an unseeded random source; performs no mutation.
use crate::db::PostRepository;
use crate::error::Result;
use crate::models::FeedItem;
use rand::Rng;
use uuid::Uuid;

/// Which posts the viewer asked for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeedScope {
    All,
    ByUser(Uuid),
    LikedBy(Uuid),
}

/// Ordering policy for the selected set
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeedOrder {
    /// Descending by creation timestamp
    Recent,
    /// Fresh uniform random permutation per request
    Random,
}

pub struct FeedService {
    posts: PostRepository,
}

impl FeedService {
    pub fn new(posts: PostRepository) -> Self {
        Self { posts }
    }

    pub async fn assemble(&self, scope: FeedScope, order: FeedOrder) -> Result<Vec<FeedItem>> {
        let mut items = match scope {
            FeedScope::All => self.posts.feed_all().await?,
            FeedScope::ByUser(user_id) => self.posts.feed_by_user(user_id).await?,
            FeedScope::LikedBy(user_id) => self.posts.feed_liked_by(user_id).await?,
        };

        if order == FeedOrder::Random {
            shuffle(&mut items);
        }

        Ok(items)
    }
}

/// Fisher-Yates: for i from the last index down to 1, swap element i with a
/// uniformly chosen element at index <= i. Never seeded; each call yields an
/// independent permutation.
pub fn shuffle<T>(items: &mut [T]) {
    let mut rng = rand::thread_rng();
    for i in (1..items.len()).rev() {
        let j = rng.gen_range(0..=i);
        items.swap(i, j);
    }
}
