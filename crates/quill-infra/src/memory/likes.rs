use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use quill_core::domain::{Like, LikedPost};
use quill_core::error::RepoError;
use quill_core::ports::LikeRepository;
use quill_core::query::{LikeSortField, PostKeyword, Sort};

use super::{Tables, compare_by};

pub struct InMemoryLikeRepository {
    tables: Arc<RwLock<Tables>>,
}

impl InMemoryLikeRepository {
    pub(crate) fn new(tables: Arc<RwLock<Tables>>) -> Self {
        Self { tables }
    }
}

#[async_trait]
impl LikeRepository for InMemoryLikeRepository {
    async fn insert(&self, like: Like) -> Result<Like, RepoError> {
        let mut tables = self.tables.write().await;
        if !tables.users.contains_key(&like.user_id) || !tables.posts.contains_key(&like.post_id) {
            return Err(RepoError::MissingReference(format!(
                "like ({}, {})",
                like.user_id, like.post_id
            )));
        }
        let key = (like.user_id, like.post_id);
        if tables.likes.contains_key(&key) {
            return Err(RepoError::Duplicate(format!(
                "like ({}, {})",
                like.user_id, like.post_id
            )));
        }
        tables.likes.insert(key, like.clone());
        Ok(like)
    }

    async fn delete(&self, user_id: Uuid, post_id: Uuid) -> Result<bool, RepoError> {
        let mut tables = self.tables.write().await;
        Ok(tables.likes.remove(&(user_id, post_id)).is_some())
    }

    async fn exists(&self, user_id: Uuid, post_id: Uuid) -> Result<bool, RepoError> {
        let tables = self.tables.read().await;
        Ok(tables.likes.contains_key(&(user_id, post_id)))
    }

    async fn count_by_post(&self, post_id: Uuid) -> Result<u64, RepoError> {
        let tables = self.tables.read().await;
        Ok(tables.likes.keys().filter(|(_, p)| *p == post_id).count() as u64)
    }

    async fn find_by_user(
        &self,
        user_id: Uuid,
        sort: &Sort<LikeSortField>,
        keyword: &PostKeyword,
    ) -> Result<Vec<LikedPost>, RepoError> {
        let tables = self.tables.read().await;
        let mut rows: Vec<LikedPost> = tables
            .likes
            .values()
            .filter(|like| like.user_id == user_id)
            .filter_map(|like| {
                let post = tables.posts.get(&like.post_id)?;
                (post.is_active() && keyword.matches(&post.title, &post.content)).then(|| {
                    LikedPost {
                        like: like.clone(),
                        post: post.clone(),
                    }
                })
            })
            .collect();
        rows.sort_by(|a, b| {
            compare_by(
                a,
                b,
                sort,
                |a, b, field| match field {
                    LikeSortField::Created => a.like.created_at.cmp(&b.like.created_at),
                },
                |row| row.like.post_id,
            )
        });
        Ok(rows)
    }
}
