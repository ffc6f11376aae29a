//! SQL post repository: keyword search, active/author scoping, paging and
//! the transactional writes.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::Utc;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, QueryTrait, Set,
    TransactionTrait,
};
use uuid::Uuid;

use quill_core::domain::Post;
use quill_core::error::RepoError;
use quill_core::ports::PostRepository;
use quill_core::query::{Page, PageRequest, PostKeyword, PostSortField, Sort};

use super::base::{SqlBaseRepository, map_db_err};
use super::entity::post::{self, Entity as PostEntity};
use super::entity::post_tag;
use super::filters::{active, keyword_condition, order_posts};

/// SQL post repository.
pub type SqlPostRepository = SqlBaseRepository<PostEntity>;

impl SqlPostRepository {
    async fn fetch_page(
        &self,
        select: sea_orm::Select<PostEntity>,
        request: &PageRequest<PostSortField>,
    ) -> Result<Page<Post>, RepoError> {
        let paginator = order_posts(select, request.sort()).paginate(&self.db, request.size());
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

#[async_trait]
impl PostRepository for SqlPostRepository {
    async fn find_all_including_deleted(
        &self,
        keyword: &PostKeyword,
        sort: &Sort<PostSortField>,
    ) -> Result<Vec<Post>, RepoError> {
        let select =
            PostEntity::find().apply_if(keyword_condition(keyword), |q, c| q.filter(c));

        let result = order_posts(select, sort)
            .all(&self.db)
            .await
            .map_err(map_db_err)?;

        Ok(result.into_iter().map(Into::into).collect())
    }

    async fn find_all(
        &self,
        keyword: &PostKeyword,
        request: &PageRequest<PostSortField>,
    ) -> Result<Page<Post>, RepoError> {
        tracing::debug!(?keyword, page = request.page(), size = request.size(), "Listing posts");

        let select = PostEntity::find()
            .filter(active())
            .apply_if(keyword_condition(keyword), |q, c| q.filter(c));

        self.fetch_page(select, request).await
    }

    async fn find_by_author(
        &self,
        author_id: Uuid,
        keyword: &PostKeyword,
        request: &PageRequest<PostSortField>,
    ) -> Result<Page<Post>, RepoError> {
        tracing::debug!(%author_id, ?keyword, page = request.page(), "Listing posts by author");

        let select = PostEntity::find()
            .filter(active())
            .filter(post::Column::AuthorId.eq(author_id))
            .apply_if(keyword_condition(keyword), |q, c| q.filter(c));

        self.fetch_page(select, request).await
    }

    async fn find_active_by_id(&self, id: Uuid) -> Result<Option<Post>, RepoError> {
        let result = PostEntity::find_by_id(id)
            .filter(active())
            .one(&self.db)
            .await
            .map_err(map_db_err)?;

        Ok(result.map(Into::into))
    }

    async fn find_active_top_level_by_author(
        &self,
        author_id: Uuid,
    ) -> Result<Vec<Post>, RepoError> {
        let result = PostEntity::find()
            .filter(active())
            .filter(post::Column::AuthorId.eq(author_id))
            .filter(post::Column::ParentId.is_null())
            .order_by_desc(post::Column::CreatedAt)
            .order_by_asc(post::Column::Id)
            .all(&self.db)
            .await
            .map_err(map_db_err)?;

        Ok(result.into_iter().map(Into::into).collect())
    }

    async fn count_active_top_level_by_author(&self, author_id: Uuid) -> Result<u64, RepoError> {
        PostEntity::find()
            .filter(active())
            .filter(post::Column::AuthorId.eq(author_id))
            .filter(post::Column::ParentId.is_null())
            .count(&self.db)
            .await
            .map_err(map_db_err)
    }

    async fn update_content(
        &self,
        id: Uuid,
        title: &str,
        content: &str,
        tags: &[String],
    ) -> Result<Post, RepoError> {
        let txn = self.db.begin().await.map_err(map_db_err)?;

        let updated = PostEntity::update_many()
            .col_expr(post::Column::Title, Expr::value(title))
            .col_expr(post::Column::Content, Expr::value(content))
            .col_expr(post::Column::UpdatedAt, Expr::value(Utc::now().fixed_offset()))
            .filter(post::Column::Id.eq(id))
            .filter(active())
            .exec(&txn)
            .await
            .map_err(map_db_err)?;
        if updated.rows_affected == 0 {
            txn.rollback().await.map_err(map_db_err)?;
            return Err(RepoError::NotFound);
        }

        post_tag::Entity::delete_many()
            .filter(post_tag::Column::PostId.eq(id))
            .exec(&txn)
            .await
            .map_err(map_db_err)?;
        if !tags.is_empty() {
            let rows = tags.iter().zip(0i32..).map(|(name, position)| post_tag::ActiveModel {
                post_id: Set(id),
                position: Set(position),
                name: Set(name.clone()),
            });
            post_tag::Entity::insert_many(rows)
                .exec_without_returning(&txn)
                .await
                .map_err(map_db_err)?;
        }

        let model = PostEntity::find_by_id(id)
            .one(&txn)
            .await
            .map_err(map_db_err)?
            .ok_or(RepoError::NotFound)?;
        txn.commit().await.map_err(map_db_err)?;

        Ok(model.into())
    }

    async fn increment_views(&self, id: Uuid) -> Result<Post, RepoError> {
        let txn = self.db.begin().await.map_err(map_db_err)?;

        // Relative update: concurrent readers each add exactly one.
        let updated = PostEntity::update_many()
            .col_expr(post::Column::Views, Expr::col(post::Column::Views).add(1))
            .filter(post::Column::Id.eq(id))
            .filter(active())
            .exec(&txn)
            .await
            .map_err(map_db_err)?;
        if updated.rows_affected == 0 {
            txn.rollback().await.map_err(map_db_err)?;
            return Err(RepoError::NotFound);
        }

        let model = PostEntity::find_by_id(id)
            .one(&txn)
            .await
            .map_err(map_db_err)?
            .ok_or(RepoError::NotFound)?;
        txn.commit().await.map_err(map_db_err)?;

        Ok(model.into())
    }

    async fn soft_delete(&self, id: Uuid) -> Result<(), RepoError> {
        let updated = PostEntity::update_many()
            .col_expr(post::Column::Deleted, Expr::value(true))
            .col_expr(post::Column::UpdatedAt, Expr::value(Utc::now().fixed_offset()))
            .filter(post::Column::Id.eq(id))
            .filter(active())
            .exec(&self.db)
            .await
            .map_err(map_db_err)?;

        if updated.rows_affected == 0 {
            return Err(RepoError::NotFound);
        }
        Ok(())
    }

    async fn tags_of(&self, ids: &[Uuid]) -> Result<HashMap<Uuid, Vec<String>>, RepoError> {
        if ids.is_empty() {
            return Ok(HashMap::new());
        }

        let rows = post_tag::Entity::find()
            .filter(post_tag::Column::PostId.is_in(ids.iter().copied()))
            .order_by_asc(post_tag::Column::PostId)
            .order_by_asc(post_tag::Column::Position)
            .all(&self.db)
            .await
            .map_err(map_db_err)?;

        let mut tags: HashMap<Uuid, Vec<String>> = HashMap::new();
        for row in rows {
            tags.entry(row.post_id).or_default().push(row.name);
        }
        Ok(tags)
    }
}
