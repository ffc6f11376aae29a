//! Likes, keyed by (user, post). Duplicate inserts surface as
//! `RepoError::Duplicate` from the primary key.

use async_trait::async_trait;
use sea_orm::{
    ColumnTrait, DbConn, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, QueryTrait,
};
use uuid::Uuid;

use quill_core::domain::{Like, LikedPost};
use quill_core::error::RepoError;
use quill_core::ports::LikeRepository;
use quill_core::query::{LikeSortField, PostKeyword, Sort};

use super::base::map_db_err;
use super::entity::{like, post};
use super::filters::{active, keyword_condition, order};

pub struct SqlLikeRepository {
    db: DbConn,
}

impl SqlLikeRepository {
    pub fn new(db: DbConn) -> Self {
        Self { db }
    }
}

fn pair(user_id: Uuid, post_id: Uuid) -> sea_orm::Condition {
    sea_orm::Condition::all()
        .add(like::Column::UserId.eq(user_id))
        .add(like::Column::PostId.eq(post_id))
}

#[async_trait]
impl LikeRepository for SqlLikeRepository {
    async fn insert(&self, entity: Like) -> Result<Like, RepoError> {
        let model: like::ActiveModel = entity.clone().into();
        like::Entity::insert(model)
            .exec_without_returning(&self.db)
            .await
            .map_err(map_db_err)?;

        Ok(entity)
    }

    async fn delete(&self, user_id: Uuid, post_id: Uuid) -> Result<bool, RepoError> {
        let result = like::Entity::delete_many()
            .filter(pair(user_id, post_id))
            .exec(&self.db)
            .await
            .map_err(map_db_err)?;

        Ok(result.rows_affected > 0)
    }

    async fn exists(&self, user_id: Uuid, post_id: Uuid) -> Result<bool, RepoError> {
        let count = like::Entity::find()
            .filter(pair(user_id, post_id))
            .count(&self.db)
            .await
            .map_err(map_db_err)?;

        Ok(count > 0)
    }

    async fn count_by_post(&self, post_id: Uuid) -> Result<u64, RepoError> {
        like::Entity::find()
            .filter(like::Column::PostId.eq(post_id))
            .count(&self.db)
            .await
            .map_err(map_db_err)
    }

    async fn find_by_user(
        &self,
        user_id: Uuid,
        sort: &Sort<LikeSortField>,
        keyword: &PostKeyword,
    ) -> Result<Vec<LikedPost>, RepoError> {
        let mut select = like::Entity::find()
            .find_also_related(post::Entity)
            .filter(like::Column::UserId.eq(user_id))
            .filter(active())
            .apply_if(keyword_condition(keyword), |q, c| q.filter(c));
        for key in sort.orders() {
            let column = match key.field {
                LikeSortField::Created => like::Column::CreatedAt,
            };
            select = select.order_by(column, order(key.direction));
        }
        let rows = select
            .order_by_asc(like::Column::PostId)
            .all(&self.db)
            .await
            .map_err(map_db_err)?;

        Ok(rows
            .into_iter()
            .filter_map(|(like, post)| {
                post.map(|post| LikedPost {
                    like: like.into(),
                    post: post.into(),
                })
            })
            .collect())
    }
}
