use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Post entity - a blog post, or a reply when `parent_id` is set.
///
/// Soft-deleted posts keep their row; `deleted` only hides them from
/// the active queries.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Post {
    pub id: Uuid,
    pub author_id: Uuid,
    pub title: String,
    pub content: String,
    pub views: i64,
    pub deleted: bool,
    pub parent_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Post {
    /// Create a new top-level post.
    pub fn new(author_id: Uuid, title: String, content: String) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            author_id,
            title,
            content,
            views: 0,
            deleted: false,
            parent_id: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Create a reply under `parent_id`.
    pub fn reply(author_id: Uuid, parent_id: Uuid, title: String, content: String) -> Self {
        Self {
            parent_id: Some(parent_id),
            ..Self::new(author_id, title, content)
        }
    }

    pub fn is_active(&self) -> bool {
        !self.deleted
    }

    pub fn is_top_level(&self) -> bool {
        self.parent_id.is_none()
    }

    pub fn is_authored_by(&self, user_id: Uuid) -> bool {
        self.author_id == user_id
    }
}

/// Trim, lowercase and de-duplicate tags, keeping first-seen order.
pub fn normalize_tags<S: AsRef<str>>(tags: &[S]) -> Vec<String> {
    let mut out: Vec<String> = Vec::with_capacity(tags.len());
    for tag in tags {
        let tag = tag.as_ref().trim().to_lowercase();
        if !tag.is_empty() && !out.contains(&tag) {
            out.push(tag);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_post_is_active_top_level() {
        let author = Uuid::new_v4();
        let post = Post::new(author, "t".into(), "c".into());
        assert!(post.is_active());
        assert!(post.is_top_level());
        assert!(post.is_authored_by(author));
        assert_eq!(post.views, 0);
    }

    #[test]
    fn reply_keeps_parent() {
        let parent = Uuid::new_v4();
        let post = Post::reply(Uuid::new_v4(), parent, "re".into(), "c".into());
        assert_eq!(post.parent_id, Some(parent));
        assert!(!post.is_top_level());
    }

    #[test]
    fn tags_are_normalized() {
        let tags = normalize_tags(&[" Rust", "rust", "", "Web "]);
        assert_eq!(tags, vec!["rust".to_string(), "web".to_string()]);
    }
}
