//! Comment service

use std::sync::Arc;

use tracing::{info, instrument};
use uuid::Uuid;

use crate::domain::Comment;
use crate::error::{DomainError, DomainResult, RepoError};
use crate::ports::{CommentRepository, PostRepository};
use crate::query::{CommentSortField, Page, PageRequest};

pub struct CommentService {
    posts: Arc<dyn PostRepository>,
    comments: Arc<dyn CommentRepository>,
}

impl CommentService {
    pub fn new(posts: Arc<dyn PostRepository>, comments: Arc<dyn CommentRepository>) -> Self {
        Self { posts, comments }
    }

    /// Attach a comment to an active post.
    #[instrument(skip(self, content))]
    pub async fn create_comment(&self, post_id: Uuid, content: &str) -> DomainResult<Comment> {
        let content = content.trim();
        if content.is_empty() {
            return Err(DomainError::invalid("comment must not be blank"));
        }

        let comment = self
            .comments
            .insert_for_active_post(Comment::new(post_id, content.to_string()))
            .await
            .map_err(|err| match err {
                RepoError::NotFound => DomainError::not_found("Post", post_id),
                other => other.into(),
            })?;

        info!(comment_id = %comment.id, post_id = %post_id, "Comment created");
        Ok(comment)
    }

    /// Comments of an active post, oldest first unless sorted otherwise.
    #[instrument(skip(self))]
    pub async fn get_all_by_post_id(
        &self,
        post_id: Uuid,
        request: &PageRequest<CommentSortField>,
    ) -> DomainResult<Page<Comment>> {
        self.ensure_active_post(post_id).await?;
        Ok(self.comments.find_by_post(post_id, request).await?)
    }

    async fn ensure_active_post(&self, post_id: Uuid) -> DomainResult<()> {
        match self.posts.find_active_by_id(post_id).await? {
            Some(_) => Ok(()),
            None => Err(DomainError::not_found("Post", post_id)),
        }
    }
}
