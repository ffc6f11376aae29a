use std::collections::HashMap;

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::{Comment, Like, LikedPost, Post, User};
use crate::error::RepoError;
use crate::query::{
    CommentSortField, LikeSortField, Page, PageRequest, PostKeyword, PostSortField, Sort,
};

/// Generic repository trait defining standard CRUD operations.
#[async_trait]
pub trait BaseRepository<T, ID>: Send + Sync {
    /// Find an entity by its unique ID.
    async fn find_by_id(&self, id: ID) -> Result<Option<T>, RepoError>;

    /// Persist a new entity.
    async fn insert(&self, entity: T) -> Result<T, RepoError>;

    /// Physically delete an entity by its ID.
    async fn delete(&self, id: ID) -> Result<(), RepoError>;
}

/// User repository with domain-specific methods.
#[async_trait]
pub trait UserRepository: BaseRepository<User, Uuid> {
    async fn find_by_name(&self, name: &str) -> Result<Option<User>, RepoError>;

    async fn find_by_ids(&self, ids: &[Uuid]) -> Result<Vec<User>, RepoError>;

    /// Remove every user; posts, comments and likes cascade.
    async fn delete_all(&self) -> Result<u64, RepoError>;
}

/// Post query repository.
///
/// Everything except [`find_all_including_deleted`](Self::find_all_including_deleted)
/// and the by-id base lookup skips soft-deleted posts. All orderings end with
/// `id ASC`.
#[async_trait]
pub trait PostRepository: BaseRepository<Post, Uuid> {
    /// Unpaginated keyword listing that also returns soft-deleted posts.
    async fn find_all_including_deleted(
        &self,
        keyword: &PostKeyword,
        sort: &Sort<PostSortField>,
    ) -> Result<Vec<Post>, RepoError>;

    async fn find_all(
        &self,
        keyword: &PostKeyword,
        request: &PageRequest<PostSortField>,
    ) -> Result<Page<Post>, RepoError>;

    async fn find_by_author(
        &self,
        author_id: Uuid,
        keyword: &PostKeyword,
        request: &PageRequest<PostSortField>,
    ) -> Result<Page<Post>, RepoError>;

    async fn find_active_by_id(&self, id: Uuid) -> Result<Option<Post>, RepoError>;

    /// Active posts by `author_id` with no parent, newest first.
    async fn find_active_top_level_by_author(&self, author_id: Uuid)
    -> Result<Vec<Post>, RepoError>;

    async fn count_active_top_level_by_author(&self, author_id: Uuid) -> Result<u64, RepoError>;

    /// Replace title, content and tags of an active post in one transaction.
    async fn update_content(
        &self,
        id: Uuid,
        title: &str,
        content: &str,
        tags: &[String],
    ) -> Result<Post, RepoError>;

    /// Add one view to an active post and return it.
    /// `RepoError::NotFound` when the post is missing or soft-deleted.
    async fn increment_views(&self, id: Uuid) -> Result<Post, RepoError>;

    /// Flag a post as deleted. `RepoError::NotFound` when nothing changed.
    async fn soft_delete(&self, id: Uuid) -> Result<(), RepoError>;

    async fn tags_of(&self, ids: &[Uuid]) -> Result<HashMap<Uuid, Vec<String>>, RepoError>;
}

#[async_trait]
pub trait CommentRepository: BaseRepository<Comment, Uuid> {
    /// Insert only while the post exists and is not soft-deleted; otherwise
    /// `RepoError::NotFound`. The check and the insert are one unit of work.
    async fn insert_for_active_post(&self, comment: Comment) -> Result<Comment, RepoError>;

    async fn find_by_post(
        &self,
        post_id: Uuid,
        request: &PageRequest<CommentSortField>,
    ) -> Result<Page<Comment>, RepoError>;
}

/// Likes are keyed by the (user, post) pair.
#[async_trait]
pub trait LikeRepository: Send + Sync {
    /// Fails with `RepoError::Duplicate` when the pair already exists.
    async fn insert(&self, like: Like) -> Result<Like, RepoError>;

    /// Returns whether a like was removed.
    async fn delete(&self, user_id: Uuid, post_id: Uuid) -> Result<bool, RepoError>;

    async fn exists(&self, user_id: Uuid, post_id: Uuid) -> Result<bool, RepoError>;

    async fn count_by_post(&self, post_id: Uuid) -> Result<u64, RepoError>;

    /// The user's likes on active posts matching `keyword`.
    async fn find_by_user(
        &self,
        user_id: Uuid,
        sort: &Sort<LikeSortField>,
        keyword: &PostKeyword,
    ) -> Result<Vec<LikedPost>, RepoError>;
}
