//! Typed predicates and orderings shared by the SQL repositories.
//!
//! Search terms are bound as parameters; `%`, `_` and `\` inside a term are
//! escaped so they match literally.
//!
//! The needle is lowercased in Rust (Unicode) and the column with SQL
//! `LOWER`. Postgres folds Unicode there too; SQLite's built-in `LOWER` folds
//! ASCII only, so on SQLite non-ASCII keywords match case-sensitively.

use sea_orm::sea_query::{Expr, Func, LikeExpr};
use sea_orm::{ColumnTrait, Condition, EntityTrait, Order, QueryOrder, Select};

use quill_core::query::{
    CommentSortField, Direction, PostKeyword, PostSortField, Sort, TextField,
};

use super::entity::{comment, post};

pub(crate) const LIKE_ESCAPE: char = '\\';

/// `%term%` with LIKE metacharacters escaped.
pub(crate) fn like_pattern(needle: &str) -> String {
    let mut pattern = String::with_capacity(needle.len() + 2);
    pattern.push('%');
    for c in needle.chars() {
        if matches!(c, '%' | '_' | '\\') {
            pattern.push(LIKE_ESCAPE);
        }
        pattern.push(c);
    }
    pattern.push('%');
    pattern
}

/// Case-insensitive substring match on the keyword's fields, OR-combined.
/// `None` when the keyword matches everything.
pub(crate) fn keyword_condition(keyword: &PostKeyword) -> Option<Condition> {
    let needle = keyword.needle()?;
    let pattern = like_pattern(&needle);

    let condition = keyword
        .fields()
        .iter()
        .fold(Condition::any(), |condition, field| {
            let column = match field {
                TextField::Title => post::Column::Title,
                TextField::Content => post::Column::Content,
            };
            condition.add(
                Expr::expr(Func::lower(Expr::col((post::Entity, column))))
                    .like(LikeExpr::new(pattern.clone()).escape(LIKE_ESCAPE)),
            )
        });
    Some(condition)
}

/// Posts that are not soft-deleted.
pub(crate) fn active() -> Condition {
    Condition::all().add(post::Column::Deleted.eq(false))
}

pub(crate) fn order(direction: Direction) -> Order {
    match direction {
        Direction::Asc => Order::Asc,
        Direction::Desc => Order::Desc,
    }
}

fn post_column(field: PostSortField) -> post::Column {
    match field {
        PostSortField::Created => post::Column::CreatedAt,
        PostSortField::Updated => post::Column::UpdatedAt,
        PostSortField::Title => post::Column::Title,
        PostSortField::Views => post::Column::Views,
        PostSortField::Id => post::Column::Id,
    }
}

fn comment_column(field: CommentSortField) -> comment::Column {
    match field {
        CommentSortField::Created => comment::Column::CreatedAt,
        CommentSortField::Id => comment::Column::Id,
    }
}

/// Apply the requested ordering, then `id ASC` unless the id is already a key.
pub(crate) fn order_posts(
    select: Select<post::Entity>,
    sort: &Sort<PostSortField>,
) -> Select<post::Entity> {
    order_by(select, sort, post_column, post::Column::Id)
}

pub(crate) fn order_comments(
    select: Select<comment::Entity>,
    sort: &Sort<CommentSortField>,
) -> Select<comment::Entity> {
    order_by(select, sort, comment_column, comment::Column::Id)
}

fn order_by<E, F>(
    mut select: Select<E>,
    sort: &Sort<F>,
    column: impl Fn(F) -> E::Column,
    id: E::Column,
) -> Select<E>
where
    E: EntityTrait,
    F: quill_core::query::SortField,
{
    for key in sort.orders() {
        select = select.order_by(column(key.field), order(key.direction));
    }
    if !sort.is_ordered_by_id() {
        select = select.order_by_asc(id);
    }
    select
}

#[cfg(test)]
mod tests {
    use sea_orm::{DatabaseBackend, QueryFilter, QueryTrait};

    use quill_core::query::PostKeywordType;

    use super::*;

    fn sql_for(keyword: &PostKeyword) -> String {
        post::Entity::find()
            .filter(active())
            .apply_if(keyword_condition(keyword), |q, c| q.filter(c))
            .build(DatabaseBackend::Postgres)
            .to_string()
    }

    #[test]
    fn like_metacharacters_are_escaped() {
        assert_eq!(like_pattern("50%_off"), "%50\\%\\_off%");
        assert_eq!(like_pattern("a\\b"), "%a\\\\b%");
    }

    #[test]
    fn needle_is_unicode_lowercased_before_binding() {
        let sql = sql_for(&PostKeyword::new(PostKeywordType::Title, "ÄPFEL"));
        assert!(sql.contains("%äpfel%"), "{sql}");
    }

    #[test]
    fn match_all_keyword_adds_no_predicate() {
        assert!(keyword_condition(&PostKeyword::any()).is_none());
    }

    #[test]
    fn title_keyword_only_touches_title() {
        let sql = sql_for(&PostKeyword::new(PostKeywordType::Title, "Title3"));
        assert!(sql.contains(r#"LOWER("posts"."title") LIKE"#), "{sql}");
        assert!(!sql.contains(r#"LOWER("posts"."content")"#), "{sql}");
        assert!(sql.contains("%title3%"), "{sql}");
        assert!(sql.contains("ESCAPE"), "{sql}");
    }

    #[test]
    fn both_fields_are_or_combined() {
        let sql = sql_for(&PostKeyword::new(PostKeywordType::TitleAndContent, "x"));
        assert!(sql.contains(r#"LOWER("posts"."title")"#), "{sql}");
        assert!(sql.contains(r#"LOWER("posts"."content")"#), "{sql}");
        assert!(sql.contains(" OR "), "{sql}");
    }

    #[test]
    fn default_post_order_ends_with_id() {
        let sql = order_posts(post::Entity::find(), &Sort::default())
            .build(DatabaseBackend::Postgres)
            .to_string();
        assert!(
            sql.ends_with(r#"ORDER BY "posts"."created_at" DESC, "posts"."id" ASC"#),
            "{sql}"
        );
    }
}
