//! Like service

use std::sync::Arc;

use tracing::{info, instrument};
use uuid::Uuid;

use quill_shared::dto::LikedPostDto;

use crate::domain::Like;
use crate::error::{DomainError, DomainResult};
use crate::ports::{LikeRepository, PostRepository, UserRepository};
use crate::query::{LikeSortField, PostKeyword, Sort};

use super::projection::project_posts;

pub struct LikeService {
    posts: Arc<dyn PostRepository>,
    users: Arc<dyn UserRepository>,
    likes: Arc<dyn LikeRepository>,
}

impl LikeService {
    pub fn new(
        posts: Arc<dyn PostRepository>,
        users: Arc<dyn UserRepository>,
        likes: Arc<dyn LikeRepository>,
    ) -> Self {
        Self {
            posts,
            users,
            likes,
        }
    }

    /// Like an active post once per user.
    #[instrument(skip(self))]
    pub async fn like_post(&self, user_id: Uuid, post_id: Uuid) -> DomainResult<Like> {
        if self.users.find_by_id(user_id).await?.is_none() {
            return Err(DomainError::not_found("User", user_id));
        }
        self.ensure_active_post(post_id).await?;
        if self.likes.exists(user_id, post_id).await? {
            return Err(DomainError::Duplicate(format!(
                "post {post_id} is already liked"
            )));
        }

        let like = self.likes.insert(Like::new(user_id, post_id)).await?;
        info!(user_id = %user_id, post_id = %post_id, "Post liked");
        Ok(like)
    }

    #[instrument(skip(self))]
    pub async fn unlike_post(&self, user_id: Uuid, post_id: Uuid) -> DomainResult<()> {
        if !self.likes.delete(user_id, post_id).await? {
            return Err(DomainError::not_found("Like", post_id));
        }
        info!(user_id = %user_id, post_id = %post_id, "Post unliked");
        Ok(())
    }

    pub async fn count_likes(&self, post_id: Uuid) -> DomainResult<u64> {
        self.ensure_active_post(post_id).await?;
        Ok(self.likes.count_by_post(post_id).await?)
    }

    /// Active posts the user liked, filtered by keyword.
    #[instrument(skip(self))]
    pub async fn find_liked_posts(
        &self,
        user_id: Uuid,
        sort: &Sort<LikeSortField>,
        keyword: &PostKeyword,
    ) -> DomainResult<Vec<LikedPostDto>> {
        let liked = self.likes.find_by_user(user_id, sort, keyword).await?;
        let liked_at: Vec<_> = liked.iter().map(|l| l.like.created_at).collect();
        let posts = liked.into_iter().map(|l| l.post).collect();

        let posts = project_posts(self.posts.as_ref(), self.users.as_ref(), posts).await?;
        Ok(liked_at
            .into_iter()
            .zip(posts)
            .map(|(liked_at, post)| LikedPostDto { liked_at, post })
            .collect())
    }

    async fn ensure_active_post(&self, post_id: Uuid) -> DomainResult<()> {
        match self.posts.find_active_by_id(post_id).await? {
            Some(_) => Ok(()),
            None => Err(DomainError::not_found("Post", post_id)),
        }
    }
}
