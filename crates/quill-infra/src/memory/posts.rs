use std::cmp::Ordering;
use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;
use uuid::Uuid;

use quill_core::domain::Post;
use quill_core::error::RepoError;
use quill_core::ports::{BaseRepository, PostRepository};
use quill_core::query::{Page, PageRequest, PostKeyword, PostSortField, Sort};

use super::{Tables, compare_by, paginate};

pub struct InMemoryPostRepository {
    tables: Arc<RwLock<Tables>>,
}

impl InMemoryPostRepository {
    pub(crate) fn new(tables: Arc<RwLock<Tables>>) -> Self {
        Self { tables }
    }

    /// Posts accepted by `filter`, in `sort` order.
    async fn select(
        &self,
        sort: &Sort<PostSortField>,
        filter: impl Fn(&Post) -> bool,
    ) -> Vec<Post> {
        let tables = self.tables.read().await;
        let mut rows: Vec<Post> = tables.posts.values().filter(|p| filter(*p)).cloned().collect();
        rows.sort_by(|a, b| compare_posts(a, b, sort));
        rows
    }

    /// Run `change` against an active post under the write lock.
    async fn modify(&self, id: Uuid, change: impl FnOnce(&mut Post)) -> Result<Post, RepoError> {
        let mut tables = self.tables.write().await;
        let post = tables
            .posts
            .get_mut(&id)
            .filter(|p| p.is_active())
            .ok_or(RepoError::NotFound)?;
        change(post);
        Ok(post.clone())
    }
}

pub(crate) fn compare_posts(a: &Post, b: &Post, sort: &Sort<PostSortField>) -> Ordering {
    compare_by(
        a,
        b,
        sort,
        |a, b, field| match field {
            PostSortField::Created => a.created_at.cmp(&b.created_at),
            PostSortField::Updated => a.updated_at.cmp(&b.updated_at),
            PostSortField::Title => a.title.cmp(&b.title),
            PostSortField::Views => a.views.cmp(&b.views),
            PostSortField::Id => a.id.cmp(&b.id),
        },
        |p| p.id,
    )
}

#[async_trait]
impl BaseRepository<Post, Uuid> for InMemoryPostRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Post>, RepoError> {
        Ok(self.tables.read().await.posts.get(&id).cloned())
    }

    async fn insert(&self, post: Post) -> Result<Post, RepoError> {
        let mut tables = self.tables.write().await;
        if !tables.users.contains_key(&post.author_id) {
            return Err(RepoError::MissingReference(format!("user {}", post.author_id)));
        }
        if let Some(parent_id) = post.parent_id {
            if !tables.posts.contains_key(&parent_id) {
                return Err(RepoError::MissingReference(format!("post {parent_id}")));
            }
        }
        if tables.posts.contains_key(&post.id) {
            return Err(RepoError::Duplicate(format!("post {}", post.id)));
        }
        tables.posts.insert(post.id, post.clone());
        Ok(post)
    }

    async fn delete(&self, id: Uuid) -> Result<(), RepoError> {
        self.tables
            .write()
            .await
            .remove_post(id)
            .map(|_| ())
            .ok_or(RepoError::NotFound)
    }
}

#[async_trait]
impl PostRepository for InMemoryPostRepository {
    async fn find_all_including_deleted(
        &self,
        keyword: &PostKeyword,
        sort: &Sort<PostSortField>,
    ) -> Result<Vec<Post>, RepoError> {
        Ok(self
            .select(sort, |p| keyword.matches(&p.title, &p.content))
            .await)
    }

    async fn find_all(
        &self,
        keyword: &PostKeyword,
        request: &PageRequest<PostSortField>,
    ) -> Result<Page<Post>, RepoError> {
        let rows = self
            .select(request.sort(), |p| {
                p.is_active() && keyword.matches(&p.title, &p.content)
            })
            .await;
        Ok(paginate(rows, request))
    }

    async fn find_by_author(
        &self,
        author_id: Uuid,
        keyword: &PostKeyword,
        request: &PageRequest<PostSortField>,
    ) -> Result<Page<Post>, RepoError> {
        let rows = self
            .select(request.sort(), |p| {
                p.is_active() && p.is_authored_by(author_id) && keyword.matches(&p.title, &p.content)
            })
            .await;
        Ok(paginate(rows, request))
    }

    async fn find_active_by_id(&self, id: Uuid) -> Result<Option<Post>, RepoError> {
        let tables = self.tables.read().await;
        Ok(tables.posts.get(&id).filter(|p| p.is_active()).cloned())
    }

    async fn find_active_top_level_by_author(
        &self,
        author_id: Uuid,
    ) -> Result<Vec<Post>, RepoError> {
        Ok(self
            .select(&Sort::default(), |p| {
                p.is_active() && p.is_top_level() && p.is_authored_by(author_id)
            })
            .await)
    }

    async fn count_active_top_level_by_author(&self, author_id: Uuid) -> Result<u64, RepoError> {
        let tables = self.tables.read().await;
        Ok(tables
            .posts
            .values()
            .filter(|p| p.is_active() && p.is_top_level() && p.is_authored_by(author_id))
            .count() as u64)
    }

    async fn update_content(
        &self,
        id: Uuid,
        title: &str,
        content: &str,
        tags: &[String],
    ) -> Result<Post, RepoError> {
        let mut tables = self.tables.write().await;
        let post = tables
            .posts
            .get_mut(&id)
            .filter(|p| p.is_active())
            .ok_or(RepoError::NotFound)?;
        post.title = title.to_string();
        post.content = content.to_string();
        post.updated_at = Utc::now();
        let post = post.clone();

        if tags.is_empty() {
            tables.tags.remove(&id);
        } else {
            tables.tags.insert(id, tags.to_vec());
        }
        Ok(post)
    }

    async fn increment_views(&self, id: Uuid) -> Result<Post, RepoError> {
        self.modify(id, |p| p.views += 1).await
    }

    async fn soft_delete(&self, id: Uuid) -> Result<(), RepoError> {
        self.modify(id, |p| {
            p.deleted = true;
            p.updated_at = Utc::now();
        })
        .await
        .map(|_| ())
    }

    async fn tags_of(&self, ids: &[Uuid]) -> Result<HashMap<Uuid, Vec<String>>, RepoError> {
        let tables = self.tables.read().await;
        Ok(ids
            .iter()
            .filter_map(|id| tables.tags.get(id).map(|tags| (*id, tags.clone())))
            .collect())
    }
}
