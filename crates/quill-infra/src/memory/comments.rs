use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use quill_core::domain::Comment;
use quill_core::error::RepoError;
use quill_core::ports::{BaseRepository, CommentRepository};
use quill_core::query::{CommentSortField, Page, PageRequest};

use super::{Tables, compare_by, paginate};

pub struct InMemoryCommentRepository {
    tables: Arc<RwLock<Tables>>,
}

impl InMemoryCommentRepository {
    pub(crate) fn new(tables: Arc<RwLock<Tables>>) -> Self {
        Self { tables }
    }
}

#[async_trait]
impl BaseRepository<Comment, Uuid> for InMemoryCommentRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Comment>, RepoError> {
        Ok(self.tables.read().await.comments.get(&id).cloned())
    }

    async fn insert(&self, comment: Comment) -> Result<Comment, RepoError> {
        let mut tables = self.tables.write().await;
        if !tables.posts.contains_key(&comment.post_id) {
            return Err(RepoError::MissingReference(format!("post {}", comment.post_id)));
        }
        if tables.comments.contains_key(&comment.id) {
            return Err(RepoError::Duplicate(format!("comment {}", comment.id)));
        }
        tables.comments.insert(comment.id, comment.clone());
        Ok(comment)
    }

    async fn delete(&self, id: Uuid) -> Result<(), RepoError> {
        let mut tables = self.tables.write().await;
        tables
            .comments
            .remove(&id)
            .map(|_| ())
            .ok_or(RepoError::NotFound)
    }
}

#[async_trait]
impl CommentRepository for InMemoryCommentRepository {
    async fn insert_for_active_post(&self, comment: Comment) -> Result<Comment, RepoError> {
        let mut tables = self.tables.write().await;
        if !tables.posts.get(&comment.post_id).is_some_and(|p| !p.deleted) {
            return Err(RepoError::NotFound);
        }
        if tables.comments.contains_key(&comment.id) {
            return Err(RepoError::Duplicate(format!("comment {}", comment.id)));
        }
        tables.comments.insert(comment.id, comment.clone());
        Ok(comment)
    }

    async fn find_by_post(
        &self,
        post_id: Uuid,
        request: &PageRequest<CommentSortField>,
    ) -> Result<Page<Comment>, RepoError> {
        let tables = self.tables.read().await;
        let mut rows: Vec<Comment> = tables
            .comments
            .values()
            .filter(|c| c.post_id == post_id)
            .cloned()
            .collect();
        rows.sort_by(|a, b| {
            compare_by(
                a,
                b,
                request.sort(),
                |a, b, field| match field {
                    CommentSortField::Created => a.created_at.cmp(&b.created_at),
                    CommentSortField::Id => a.id.cmp(&b.id),
                },
                |c| c.id,
            )
        });
        Ok(paginate(rows, request))
    }
}
