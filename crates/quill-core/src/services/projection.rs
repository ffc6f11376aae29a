//! Projection of posts into their public view.

use std::collections::{HashMap, HashSet};

use uuid::Uuid;

use quill_shared::dto::PostDto;

use crate::domain::Post;
use crate::error::DomainResult;
use crate::ports::{PostRepository, UserRepository};

/// Resolve author names and tags by id and build one `PostDto` per post,
/// preserving order. Two lookups regardless of the number of posts.
pub(crate) async fn project_posts(
    posts_repo: &dyn PostRepository,
    users_repo: &dyn UserRepository,
    posts: Vec<Post>,
) -> DomainResult<Vec<PostDto>> {
    if posts.is_empty() {
        return Ok(Vec::new());
    }

    let mut seen = HashSet::new();
    let author_ids: Vec<Uuid> = posts
        .iter()
        .map(|p| p.author_id)
        .filter(|id| seen.insert(*id))
        .collect();
    let post_ids: Vec<Uuid> = posts.iter().map(|p| p.id).collect();

    let names: HashMap<Uuid, String> = users_repo
        .find_by_ids(&author_ids)
        .await?
        .into_iter()
        .map(|u| (u.id, u.name))
        .collect();
    let mut tags = posts_repo.tags_of(&post_ids).await?;

    Ok(posts
        .into_iter()
        .map(|post| PostDto {
            author_name: names.get(&post.author_id).cloned(),
            tags: tags.remove(&post.id).unwrap_or_default(),
            id: post.id,
            title: post.title,
            content: post.content,
            author_id: post.author_id,
            views: post.views,
            parent_id: post.parent_id,
            created_at: post.created_at,
            updated_at: post.updated_at,
        })
        .collect())
}
