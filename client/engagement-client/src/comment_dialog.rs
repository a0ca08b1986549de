/// Comment dialog lifecycle for a single displayed post.
///
/// Opening the dialog starts a fresh fetch (no cache reuse across opens).
/// Fetches are not cancelled by closing; instead each open hands out a
/// ticket, and a response is applied only while the ticket still matches the
/// active (post, generation) pair. A response that lands after the dialog
/// was closed, or reopened for another post, is ignored.
///
/// Comments are never inserted optimistically: ids are server-assigned and
/// must be exact for later deletion, so submit and delete mutate local state
/// only after the server acknowledges.
use crate::api::{ApiError, EngagementApi};
use crate::models::Comment;
use uuid::Uuid;

/// Identifies the open-state a fetch was issued under
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FetchTicket {
    post_id: Uuid,
    generation: u64,
}

#[derive(Debug, Default)]
pub struct CommentDialog {
    active: Option<Uuid>,
    generation: u64,
    comments: Vec<Comment>,
}

impl CommentDialog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_open(&self) -> bool {
        self.active.is_some()
    }

    pub fn active_post(&self) -> Option<Uuid> {
        self.active
    }

    /// Ordered local comment state, oldest first
    pub fn comments(&self) -> &[Comment] {
        &self.comments
    }

    /// Open the dialog for a post. Clears local state and returns the ticket
    /// the caller must present when the fetch for this open completes.
    pub fn open_for(&mut self, post_id: Uuid) -> FetchTicket {
        self.active = Some(post_id);
        self.generation += 1;
        self.comments.clear();
        FetchTicket {
            post_id,
            generation: self.generation,
        }
    }

    /// Close the dialog. In-flight fetches are not cancelled; their results
    /// become stale and are dropped by `apply_fetched`.
    pub fn close(&mut self) {
        self.active = None;
        self.generation += 1;
        self.comments.clear();
    }

    fn ticket_is_current(&self, ticket: &FetchTicket) -> bool {
        self.active == Some(ticket.post_id) && self.generation == ticket.generation
    }

    /// Apply a fetched comment list. Returns false (dropping the data) when
    /// the ticket is stale.
    pub fn apply_fetched(&mut self, ticket: &FetchTicket, comments: Vec<Comment>) -> bool {
        if !self.ticket_is_current(ticket) {
            tracing::debug!(post_id = %ticket.post_id, "dropping stale comments response");
            return false;
        }
        self.comments = comments;
        true
    }

    /// Fetch comments for the given ticket and apply them if still current.
    pub async fn refresh<A: EngagementApi + ?Sized>(
        &mut self,
        api: &A,
        ticket: FetchTicket,
    ) -> Result<bool, ApiError> {
        let comments = api.list_comments(ticket.post_id).await?;
        Ok(self.apply_fetched(&ticket, comments))
    }

    /// Submit a new comment for the active post. Blank drafts are rejected
    /// locally; the returned comment is appended only after server success
    /// and only if the dialog still shows the same post.
    pub async fn submit<A: EngagementApi + ?Sized>(
        &mut self,
        api: &A,
        draft: &str,
    ) -> Result<Comment, ApiError> {
        let draft = draft.trim();
        if draft.is_empty() {
            return Err(ApiError::InvalidInput(
                "comment content must not be empty".to_string(),
            ));
        }

        let post_id = self
            .active
            .ok_or_else(|| ApiError::InvalidInput("comment dialog is not open".to_string()))?;
        let generation = self.generation;

        let comment = api.create_comment(post_id, draft.to_string()).await?;

        let still_current = FetchTicket {
            post_id,
            generation,
        };
        if self.ticket_is_current(&still_current) {
            self.comments.push(comment.clone());
        }

        Ok(comment)
    }

    /// Delete one of the displayed comments. Local state drops the item only
    /// after the server acknowledges the deletion.
    pub async fn delete<A: EngagementApi + ?Sized>(
        &mut self,
        api: &A,
        comment_id: Uuid,
    ) -> Result<(), ApiError> {
        let post_id = self
            .active
            .ok_or_else(|| ApiError::InvalidInput("comment dialog is not open".to_string()))?;

        api.delete_comment(post_id, comment_id).await?;

        self.comments.retain(|c| c.id != comment_id);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::MockEngagementApi;

    fn comment(post_id: Uuid, content: &str) -> Comment {
        Comment {
            id: Uuid::new_v4(),
            post_id,
            user_id: Uuid::new_v4(),
            content: content.to_string(),
            created_at: chrono::Utc::now(),
            author_name: Some("ana".to_string()),
            author_email: "ana@example.com".to_string(),
        }
    }

    #[test]
    fn stale_response_after_reopen_for_another_post_is_ignored() {
        let mut dialog = CommentDialog::new();
        let first_post = Uuid::new_v4();
        let second_post = Uuid::new_v4();

        let first_ticket = dialog.open_for(first_post);
        let second_ticket = dialog.open_for(second_post);

        // The first fetch resolves late, while the dialog shows second_post.
        let applied = dialog.apply_fetched(&first_ticket, vec![comment(first_post, "late")]);
        assert!(!applied);
        assert!(dialog.comments().is_empty());

        let applied = dialog.apply_fetched(&second_ticket, vec![comment(second_post, "fresh")]);
        assert!(applied);
        assert_eq!(dialog.comments().len(), 1);
    }

    #[test]
    fn response_after_close_is_ignored() {
        let mut dialog = CommentDialog::new();
        let post = Uuid::new_v4();

        let ticket = dialog.open_for(post);
        dialog.close();

        assert!(!dialog.apply_fetched(&ticket, vec![comment(post, "late")]));
        assert!(dialog.comments().is_empty());
    }

    #[test]
    fn reopening_the_same_post_invalidates_the_old_ticket() {
        let mut dialog = CommentDialog::new();
        let post = Uuid::new_v4();

        let old = dialog.open_for(post);
        let fresh = dialog.open_for(post);

        assert!(!dialog.apply_fetched(&old, vec![comment(post, "stale")]));
        assert!(dialog.apply_fetched(&fresh, vec![comment(post, "current")]));
    }

    #[tokio::test]
    async fn refresh_applies_a_fresh_snapshot() {
        let post = Uuid::new_v4();
        let mut api = MockEngagementApi::new();
        api.expect_list_comments()
            .times(1)
            .returning(move |p| Ok(vec![comment(p, "hello")]));

        let mut dialog = CommentDialog::new();
        let ticket = dialog.open_for(post);

        let applied = dialog.refresh(&api, ticket).await.unwrap();
        assert!(applied);
        assert_eq!(dialog.comments().len(), 1);
    }

    #[tokio::test]
    async fn submit_appends_the_server_returned_comment() {
        let post = Uuid::new_v4();
        let mut api = MockEngagementApi::new();
        api.expect_create_comment()
            .times(1)
            .returning(|p, content| {
                let mut c = comment(p, "");
                c.content = content;
                Ok(c)
            });

        let mut dialog = CommentDialog::new();
        dialog.open_for(post);

        let created = dialog.submit(&api, "  nice photo  ").await.unwrap();
        assert_eq!(created.content, "nice photo");
        assert_eq!(dialog.comments().len(), 1);
        assert_eq!(dialog.comments()[0].id, created.id);
    }

    #[tokio::test]
    async fn blank_draft_is_rejected_without_a_network_call() {
        // No expectations set: any call on the mock would panic.
        let api = MockEngagementApi::new();

        let mut dialog = CommentDialog::new();
        dialog.open_for(Uuid::new_v4());

        let err = dialog.submit(&api, "   ").await.unwrap_err();
        assert!(matches!(err, ApiError::InvalidInput(_)));
        assert!(dialog.comments().is_empty());
    }

    #[tokio::test]
    async fn failed_submit_leaves_local_state_untouched() {
        let mut api = MockEngagementApi::new();
        api.expect_create_comment()
            .times(1)
            .returning(|_, _| Err(ApiError::Unauthorized("session expired".into())));

        let mut dialog = CommentDialog::new();
        dialog.open_for(Uuid::new_v4());

        assert!(dialog.submit(&api, "hello").await.is_err());
        assert!(dialog.comments().is_empty());
    }

    #[tokio::test]
    async fn delete_keeps_the_comment_when_the_server_refuses() {
        let post = Uuid::new_v4();
        let existing = comment(post, "not yours");

        let mut api = MockEngagementApi::new();
        api.expect_delete_comment()
            .times(1)
            .returning(|_, _| Err(ApiError::Forbidden("not the author".into())));

        let mut dialog = CommentDialog::new();
        let ticket = dialog.open_for(post);
        dialog.apply_fetched(&ticket, vec![existing.clone()]);

        assert!(dialog.delete(&api, existing.id).await.is_err());
        assert_eq!(dialog.comments().len(), 1);
    }

    #[tokio::test]
    async fn delete_removes_the_comment_after_acknowledgment() {
        let post = Uuid::new_v4();
        let existing = comment(post, "mine");

        let mut api = MockEngagementApi::new();
        api.expect_delete_comment().times(1).returning(|_, _| Ok(()));

        let mut dialog = CommentDialog::new();
        let ticket = dialog.open_for(post);
        dialog.apply_fetched(&ticket, vec![existing.clone()]);

        dialog.delete(&api, existing.id).await.unwrap();
        assert!(dialog.comments().is_empty());
    }
}
