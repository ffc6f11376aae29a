use chrono::Utc;
use sea_orm::{DatabaseBackend, MockDatabase, MockExecResult, Transaction};
use uuid::Uuid;

use quill_core::domain::{Comment, Post};
use quill_core::error::RepoError;
use quill_core::ports::{BaseRepository, CommentRepository, LikeRepository, PostRepository};
use quill_core::query::{PostKeyword, PostKeywordType, PostSortField, Sort};

use super::entity::post;
use super::{SqlCommentRepository, SqlLikeRepository, SqlPostRepository};

/// Every statement the mock connection saw, rendered with inlined values.
fn statements(log: Vec<Transaction>) -> Vec<String> {
    log.iter()
        .flat_map(|txn| txn.statements())
        .map(ToString::to_string)
        .collect()
}

fn post_model(id: Uuid, title: &str, views: i64) -> post::Model {
    let now = Utc::now();
    post::Model {
        id,
        author_id: Uuid::new_v4(),
        title: title.to_owned(),
        content: "Content".to_owned(),
        views,
        deleted: false,
        parent_id: None,
        created_at: now.into(),
        updated_at: now.into(),
    }
}

#[tokio::test]
async fn find_post_by_id_maps_every_column() {
    let post_id = Uuid::new_v4();
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([vec![post_model(post_id, "Test Post", 7)]])
        .into_connection();

    let repo = SqlPostRepository::new(db);
    let post: Option<Post> = repo.find_by_id(post_id).await.unwrap();

    let post = post.unwrap();
    assert_eq!(post.id, post_id);
    assert_eq!(post.title, "Test Post");
    assert_eq!(post.views, 7);
    assert!(post.is_active());
}

#[tokio::test]
async fn active_lookup_filters_deleted_rows() {
    let post_id = Uuid::new_v4();
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([Vec::<post::Model>::new()])
        .into_connection();

    let repo = SqlPostRepository::new(db);
    assert!(repo.find_active_by_id(post_id).await.unwrap().is_none());

    let sql = statements(repo.db.into_transaction_log()).join("\n");
    assert!(sql.contains(r#""posts"."deleted" = FALSE"#), "{sql}");
}

#[tokio::test]
async fn increment_views_is_a_relative_update() {
    let post_id = Uuid::new_v4();
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_exec_results([MockExecResult {
            last_insert_id: 0,
            rows_affected: 1,
        }])
        .append_query_results([vec![post_model(post_id, "t", 1)]])
        .into_connection();

    let repo = SqlPostRepository::new(db);
    let post = repo.increment_views(post_id).await.unwrap();
    assert_eq!(post.views, 1);

    let statements = statements(repo.db.into_transaction_log());
    let update = statements
        .iter()
        .find(|s| s.starts_with("UPDATE"))
        .unwrap();
    assert!(
        update.contains(r#"SET "views" = "views" + 1"#),
        "{update}"
    );
    assert!(update.contains(r#""posts"."deleted" = FALSE"#), "{update}");
}

#[tokio::test]
async fn increment_views_on_missing_post_is_not_found() {
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_exec_results([MockExecResult {
            last_insert_id: 0,
            rows_affected: 0,
        }])
        .into_connection();

    let repo = SqlPostRepository::new(db);
    let result = repo.increment_views(Uuid::new_v4()).await;
    assert!(matches!(result, Err(RepoError::NotFound)));
}

#[tokio::test]
async fn soft_delete_reports_untouched_rows() {
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_exec_results([MockExecResult {
            last_insert_id: 0,
            rows_affected: 0,
        }])
        .into_connection();

    let repo = SqlPostRepository::new(db);
    assert!(matches!(
        repo.soft_delete(Uuid::new_v4()).await,
        Err(RepoError::NotFound)
    ));
}

#[tokio::test]
async fn including_deleted_listing_has_no_active_filter() {
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([vec![post_model(Uuid::new_v4(), "title3", 0)]])
        .into_connection();

    let repo = SqlPostRepository::new(db);
    let keyword = PostKeyword::new(PostKeywordType::Title, "title3");
    let sort = Sort::by(PostSortField::Title, quill_core::query::Direction::Asc);
    let posts = repo.find_all_including_deleted(&keyword, &sort).await.unwrap();
    assert_eq!(posts.len(), 1);

    let sql = statements(repo.db.into_transaction_log()).join("\n");
    assert!(!sql.contains(r#""posts"."deleted" ="#), "{sql}");
    assert!(
        sql.ends_with(r#"ORDER BY "posts"."title" ASC, "posts"."id" ASC"#),
        "{sql}"
    );
}

#[tokio::test]
async fn tags_of_nothing_skips_the_query() {
    let db = MockDatabase::new(DatabaseBackend::Postgres).into_connection();
    let repo = SqlPostRepository::new(db);

    assert!(repo.tags_of(&[]).await.unwrap().is_empty());
    assert!(repo.db.into_transaction_log().is_empty());
}

#[tokio::test]
async fn unlike_reports_whether_a_row_went_away() {
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_exec_results([
            MockExecResult {
                last_insert_id: 0,
                rows_affected: 1,
            },
            MockExecResult {
                last_insert_id: 0,
                rows_affected: 0,
            },
        ])
        .into_connection();

    let repo = SqlLikeRepository::new(db);
    let (user, post) = (Uuid::new_v4(), Uuid::new_v4());
    assert!(repo.delete(user, post).await.unwrap());
    assert!(!repo.delete(user, post).await.unwrap());
}

#[tokio::test]
async fn comment_insert_locks_an_active_parent_first() {
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([Vec::<post::Model>::new()])
        .into_connection();

    let repo = SqlCommentRepository::new(db);
    let result = repo
        .insert_for_active_post(Comment::new(Uuid::new_v4(), "late".to_owned()))
        .await;
    assert!(matches!(result, Err(RepoError::NotFound)));

    let statements = statements(repo.db.into_transaction_log());
    let select = statements
        .iter()
        .find(|s| s.starts_with("SELECT"))
        .unwrap();
    assert!(select.contains(r#""posts"."deleted" = FALSE"#), "{select}");
    assert!(select.ends_with("FOR SHARE"), "{select}");
    assert!(!statements.iter().any(|s| s.starts_with("INSERT")), "{statements:?}");
}
