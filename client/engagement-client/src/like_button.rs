/// Optimistic like toggle for a single displayed post.
///
/// Toggling captures a rollback snapshot, applies the optimistic transition
/// immediately, then issues the create/delete call. On any failure the
/// snapshot is restored exactly - not recomputed - so the displayed state
/// never drifts from server truth across a failed attempt. On success the
/// optimistic state stands; the server is not re-polled.
use crate::api::{ApiError, EngagementApi};
use uuid::Uuid;

/// Result of a toggle attempt
#[derive(Debug)]
pub enum ToggleOutcome {
    /// Optimistic state confirmed by the server
    Applied,
    /// Call failed; local state restored to the pre-toggle snapshot
    RolledBack(ApiError),
    /// A previous toggle is still in flight; input ignored. The rendering
    /// layer should disable the control while `in_flight()` is true.
    Busy,
}

/// Per-post like state
#[derive(Debug, Clone)]
pub struct LikeButton {
    post_id: Uuid,
    is_liked: bool,
    like_count: i64,
    in_flight: bool,
}

impl LikeButton {
    pub fn new(post_id: Uuid, like_count: i64, is_liked: bool) -> Self {
        Self {
            post_id,
            is_liked,
            like_count,
            in_flight: false,
        }
    }

    pub fn post_id(&self) -> Uuid {
        self.post_id
    }

    pub fn is_liked(&self) -> bool {
        self.is_liked
    }

    pub fn like_count(&self) -> i64 {
        self.like_count
    }

    pub fn in_flight(&self) -> bool {
        self.in_flight
    }

    /// Toggle the like state: optimistic flip, then commit-or-revert keyed
    /// strictly on the server response.
    pub async fn toggle<A: EngagementApi + ?Sized>(&mut self, api: &A) -> ToggleOutcome {
        if self.in_flight {
            return ToggleOutcome::Busy;
        }

        let snapshot = (self.is_liked, self.like_count);

        let liking = !self.is_liked;
        self.is_liked = liking;
        self.like_count += if liking { 1 } else { -1 };
        self.in_flight = true;

        let result = if liking {
            api.create_like(self.post_id).await.map(|_| ())
        } else {
            api.delete_like(self.post_id).await
        };

        self.in_flight = false;

        match result {
            Ok(()) => ToggleOutcome::Applied,
            Err(err) => {
                tracing::warn!(post_id = %self.post_id, error = %err, "like toggle failed, reverting");
                let (was_liked, count) = snapshot;
                self.is_liked = was_liked;
                self.like_count = count;
                ToggleOutcome::RolledBack(err)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::MockEngagementApi;
    use crate::models::Like;

    fn like_row(post_id: Uuid) -> Like {
        Like {
            id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            post_id,
            created_at: chrono::Utc::now(),
        }
    }

    #[tokio::test]
    async fn successful_like_keeps_optimistic_state() {
        let post = Uuid::new_v4();
        let mut api = MockEngagementApi::new();
        api.expect_create_like()
            .times(1)
            .returning(move |p| Ok(like_row(p)));

        let mut button = LikeButton::new(post, 3, false);
        let outcome = button.toggle(&api).await;

        assert!(matches!(outcome, ToggleOutcome::Applied));
        assert!(button.is_liked());
        assert_eq!(button.like_count(), 4);
    }

    #[tokio::test]
    async fn failed_like_restores_exact_snapshot() {
        // The revert must restore the captured values, for any starting count.
        for start in [0i64, 1, 5, 1000] {
            let mut api = MockEngagementApi::new();
            api.expect_create_like()
                .times(1)
                .returning(|_| Err(ApiError::Transport("connection reset".into())));

            let mut button = LikeButton::new(Uuid::new_v4(), start, false);
            let outcome = button.toggle(&api).await;

            assert!(matches!(outcome, ToggleOutcome::RolledBack(_)));
            assert!(!button.is_liked());
            assert_eq!(button.like_count(), start);
            assert!(!button.in_flight());
        }
    }

    #[tokio::test]
    async fn failed_unlike_restores_exact_snapshot() {
        let mut api = MockEngagementApi::new();
        api.expect_delete_like()
            .times(1)
            .returning(|_| Err(ApiError::NotFound("no like".into())));

        let mut button = LikeButton::new(Uuid::new_v4(), 2, true);
        let outcome = button.toggle(&api).await;

        assert!(matches!(outcome, ToggleOutcome::RolledBack(_)));
        assert!(button.is_liked());
        assert_eq!(button.like_count(), 2);
    }

    #[tokio::test]
    async fn successful_unlike_decrements() {
        let mut api = MockEngagementApi::new();
        api.expect_delete_like().times(1).returning(|_| Ok(()));

        let mut button = LikeButton::new(Uuid::new_v4(), 1, true);
        let outcome = button.toggle(&api).await;

        assert!(matches!(outcome, ToggleOutcome::Applied));
        assert!(!button.is_liked());
        assert_eq!(button.like_count(), 0);
    }

    #[tokio::test]
    async fn toggle_is_refused_while_in_flight() {
        let api = MockEngagementApi::new();

        let mut button = LikeButton::new(Uuid::new_v4(), 0, false);
        button.in_flight = true;

        let outcome = button.toggle(&api).await;
        assert!(matches!(outcome, ToggleOutcome::Busy));
        assert!(!button.is_liked());
        assert_eq!(button.like_count(), 0);
    }
}
