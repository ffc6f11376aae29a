use async_trait::async_trait;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, QuerySelect,
    TransactionTrait,
};
use uuid::Uuid;

use quill_core::domain::Comment;
use quill_core::error::RepoError;
use quill_core::ports::CommentRepository;
use quill_core::query::{CommentSortField, Page, PageRequest};

use super::base::{SqlBaseRepository, map_db_err};
use super::entity::comment::{self, Entity as CommentEntity};
use super::entity::post;
use super::filters::{active, order_comments};

/// SQL comment repository.
pub type SqlCommentRepository = SqlBaseRepository<CommentEntity>;

#[async_trait]
impl CommentRepository for SqlCommentRepository {
    async fn insert_for_active_post(&self, comment: Comment) -> Result<Comment, RepoError> {
        let txn = self.db.begin().await.map_err(map_db_err)?;

        // Shared row lock holds off a concurrent soft delete until commit.
        let parent = post::Entity::find_by_id(comment.post_id)
            .filter(active())
            .lock_shared()
            .one(&txn)
            .await
            .map_err(map_db_err)?;
        if parent.is_none() {
            txn.rollback().await.map_err(map_db_err)?;
            return Err(RepoError::NotFound);
        }

        let active_model: comment::ActiveModel = comment.into();
        let model = active_model.insert(&txn).await.map_err(map_db_err)?;
        txn.commit().await.map_err(map_db_err)?;

        Ok(model.into())
    }

    async fn find_by_post(
        &self,
        post_id: Uuid,
        request: &PageRequest<CommentSortField>,
    ) -> Result<Page<Comment>, RepoError> {
        let select = CommentEntity::find().filter(comment::Column::PostId.eq(post_id));
        let paginator = order_comments(select, request.sort()).paginate(&self.db, request.size());

        let total = paginator.num_items().await.map_err(map_db_err)?;
        let models = paginator
            .fetch_page(request.page())
            .await
            .map_err(map_db_err)?;

        Ok(Page::new(
            models.into_iter().map(Into::into).collect(),
            request,
            total,
        ))
    }
}
