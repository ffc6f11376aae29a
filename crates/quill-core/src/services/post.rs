//! Post service
//!
//! Creation, editing, soft deletion and view counting of posts, plus the
//! paginated listings projected into `PostDto`.

use std::sync::Arc;

use tracing::{info, instrument, warn};
use uuid::Uuid;

use quill_shared::dto::{PostDto, RootPostsDto};

use crate::domain::{Post, normalize_tags};
use crate::error::{DomainError, DomainResult, RepoError};
use crate::ports::{PostRepository, UserRepository};
use crate::query::{Page, PageRequest, PostKeyword, PostSortField, Sort};

use super::projection::project_posts;

pub struct PostService {
    posts: Arc<dyn PostRepository>,
    users: Arc<dyn UserRepository>,
}

impl PostService {
    pub fn new(posts: Arc<dyn PostRepository>, users: Arc<dyn UserRepository>) -> Self {
        Self { posts, users }
    }

    /// Create a top-level post and return its id.
    #[instrument(skip(self, title, content))]
    pub async fn register_post(
        &self,
        author_id: Uuid,
        title: &str,
        content: &str,
    ) -> DomainResult<Uuid> {
        self.ensure_author(author_id).await?;
        let title = require_title(title)?;

        let post = self
            .posts
            .insert(Post::new(author_id, title, content.to_string()))
            .await?;

        info!(post_id = %post.id, author_id = %author_id, "Post created");
        Ok(post.id)
    }

    /// Create a reply under an active parent post.
    #[instrument(skip(self, title, content))]
    pub async fn register_reply(
        &self,
        author_id: Uuid,
        parent_id: Uuid,
        title: &str,
        content: &str,
    ) -> DomainResult<Uuid> {
        self.ensure_author(author_id).await?;
        let title = require_title(title)?;
        self.get_by_id(parent_id).await?;

        let post = self
            .posts
            .insert(Post::reply(author_id, parent_id, title, content.to_string()))
            .await?;

        info!(post_id = %post.id, parent_id = %parent_id, "Reply created");
        Ok(post.id)
    }

    /// Edit title, content and tags of the requester's own post.
    #[instrument(skip(self, title, content, tags))]
    pub async fn update(
        &self,
        title: &str,
        content: &str,
        post_id: Uuid,
        requesting_user_id: Uuid,
        tags: &[String],
    ) -> DomainResult<()> {
        let post = self.get_by_id(post_id).await?;
        ensure_owner(&post, requesting_user_id)?;
        let title = require_title(title)?;

        self.posts
            .update_content(post_id, &title, content, &normalize_tags(tags))
            .await
            .map_err(|e| missing_post(e, post_id))?;

        info!(post_id = %post_id, "Post updated");
        Ok(())
    }

    /// Active post by id.
    pub async fn get_by_id(&self, post_id: Uuid) -> DomainResult<Post> {
        self.posts
            .find_active_by_id(post_id)
            .await?
            .ok_or_else(|| DomainError::not_found("Post", post_id))
    }

    /// Active post by id, counting the read as one view.
    pub async fn get_by_id_and_increase_views(&self, post_id: Uuid) -> DomainResult<Post> {
        self.posts
            .increment_views(post_id)
            .await
            .map_err(|e| missing_post(e, post_id))
    }

    /// Hide the requester's own post from every active listing.
    #[instrument(skip(self))]
    pub async fn soft_delete_my_post(
        &self,
        post_id: Uuid,
        requesting_user_id: Uuid,
    ) -> DomainResult<()> {
        let post = self.get_by_id(post_id).await?;
        ensure_owner(&post, requesting_user_id)?;

        self.posts
            .soft_delete(post_id)
            .await
            .map_err(|e| missing_post(e, post_id))?;

        info!(post_id = %post_id, "Post soft-deleted");
        Ok(())
    }

    pub async fn get_post_dto_by_id(&self, post_id: Uuid) -> DomainResult<PostDto> {
        let post = self.get_by_id(post_id).await?;
        self.project_one(post).await
    }

    pub async fn get_post_dto_by_id_and_increase_views(
        &self,
        post_id: Uuid,
    ) -> DomainResult<PostDto> {
        let post = self.get_by_id_and_increase_views(post_id).await?;
        self.project_one(post).await
    }

    #[instrument(skip(self))]
    pub async fn get_post_dto_all(
        &self,
        keyword: &PostKeyword,
        request: &PageRequest<PostSortField>,
    ) -> DomainResult<Page<PostDto>> {
        let page = self.posts.find_all(keyword, request).await?;
        self.project_page(page).await
    }

    #[instrument(skip(self))]
    pub async fn get_my_post_dto_all(
        &self,
        author_id: Uuid,
        keyword: &PostKeyword,
        request: &PageRequest<PostSortField>,
    ) -> DomainResult<Page<PostDto>> {
        let page = self.posts.find_by_author(author_id, keyword, request).await?;
        self.project_page(page).await
    }

    /// The author's active posts that are not replies.
    pub async fn get_my_root_posts(&self, author_id: Uuid) -> DomainResult<RootPostsDto> {
        let posts = self.posts.find_active_top_level_by_author(author_id).await?;
        let total = self.posts.count_active_top_level_by_author(author_id).await?;
        let posts = project_posts(self.posts.as_ref(), self.users.as_ref(), posts).await?;
        Ok(RootPostsDto { total, posts })
    }

    /// Admin listing, soft-deleted posts included.
    pub async fn get_all_including_deleted(
        &self,
        keyword: &PostKeyword,
        sort: &Sort<PostSortField>,
    ) -> DomainResult<Vec<PostDto>> {
        let posts = self.posts.find_all_including_deleted(keyword, sort).await?;
        project_posts(self.posts.as_ref(), self.users.as_ref(), posts).await
    }

    async fn ensure_author(&self, author_id: Uuid) -> DomainResult<()> {
        match self.users.find_by_id(author_id).await? {
            Some(_) => Ok(()),
            None => Err(DomainError::not_found("User", author_id)),
        }
    }

    async fn project_one(&self, post: Post) -> DomainResult<PostDto> {
        let post_id = post.id;
        project_posts(self.posts.as_ref(), self.users.as_ref(), vec![post])
            .await?
            .pop()
            .ok_or_else(|| DomainError::not_found("Post", post_id))
    }

    async fn project_page(&self, page: Page<Post>) -> DomainResult<Page<PostDto>> {
        let Page {
            content,
            page,
            size,
            total_elements,
            total_pages,
        } = page;
        let content = project_posts(self.posts.as_ref(), self.users.as_ref(), content).await?;
        Ok(Page {
            content,
            page,
            size,
            total_elements,
            total_pages,
        })
    }
}

fn require_title(title: &str) -> DomainResult<String> {
    let title = title.trim();
    if title.is_empty() {
        return Err(DomainError::invalid("title must not be blank"));
    }
    Ok(title.to_string())
}

fn ensure_owner(post: &Post, requesting_user_id: Uuid) -> DomainResult<()> {
    if post.is_authored_by(requesting_user_id) {
        return Ok(());
    }
    warn!(
        post_id = %post.id,
        requester = %requesting_user_id,
        "Rejected change to a post owned by another user"
    );
    Err(DomainError::Forbidden(format!(
        "post {} belongs to another user",
        post.id
    )))
}

/// A write that matched no row means the post went away or was deleted.
fn missing_post(err: RepoError, post_id: Uuid) -> DomainError {
    match err {
        RepoError::NotFound => DomainError::not_found("Post", post_id),
        other => other.into(),
    }
}
