//! In-memory store - used as fallback when no database is configured.
//!
//! All tables sit behind one `tokio::sync::RwLock`; every write holds the
//! lock for its whole read-modify-write. Foreign keys and cascades follow
//! the SQL schema. Data is lost on process restart.

mod comments;
mod likes;
mod posts;
mod users;

use std::cmp::Ordering;
use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::RwLock;
use uuid::Uuid;

use quill_core::domain::{Comment, Like, Post, User};
use quill_core::query::{Direction, Page, PageRequest, Sort, SortField};

pub use comments::InMemoryCommentRepository;
pub use likes::InMemoryLikeRepository;
pub use posts::InMemoryPostRepository;
pub use users::InMemoryUserRepository;

#[derive(Default)]
pub(crate) struct Tables {
    users: HashMap<Uuid, User>,
    posts: HashMap<Uuid, Post>,
    tags: HashMap<Uuid, Vec<String>>,
    comments: HashMap<Uuid, Comment>,
    likes: HashMap<(Uuid, Uuid), Like>,
}

impl Tables {
    /// Remove a post with everything hanging off it; replies lose their parent.
    fn remove_post(&mut self, id: Uuid) -> Option<Post> {
        let post = self.posts.remove(&id)?;
        self.tags.remove(&id);
        self.comments.retain(|_, comment| comment.post_id != id);
        self.likes.retain(|(_, post_id), _| *post_id != id);
        for reply in self.posts.values_mut() {
            if reply.parent_id == Some(id) {
                reply.parent_id = None;
            }
        }
        Some(post)
    }

    /// Remove a user, their posts and their likes.
    fn remove_user(&mut self, id: Uuid) -> Option<User> {
        let user = self.users.remove(&id)?;
        let authored: Vec<Uuid> = self
            .posts
            .values()
            .filter(|post| post.author_id == id)
            .map(|post| post.id)
            .collect();
        for post_id in authored {
            self.remove_post(post_id);
        }
        self.likes.retain(|(user_id, _), _| *user_id != id);
        Some(user)
    }
}

/// Shared handle to the in-memory tables; hands out one repository per port.
#[derive(Clone, Default)]
pub struct InMemoryStore {
    tables: Arc<RwLock<Tables>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn users(&self) -> InMemoryUserRepository {
        InMemoryUserRepository::new(self.tables.clone())
    }

    pub fn posts(&self) -> InMemoryPostRepository {
        InMemoryPostRepository::new(self.tables.clone())
    }

    pub fn comments(&self) -> InMemoryCommentRepository {
        InMemoryCommentRepository::new(self.tables.clone())
    }

    pub fn likes(&self) -> InMemoryLikeRepository {
        InMemoryLikeRepository::new(self.tables.clone())
    }
}

/// Compare two rows key by key, then by id ascending.
fn compare_by<T, F>(
    a: &T,
    b: &T,
    sort: &Sort<F>,
    key: impl Fn(&T, &T, F) -> Ordering,
    id: impl Fn(&T) -> Uuid,
) -> Ordering
where
    F: SortField,
{
    sort.orders()
        .iter()
        .map(|order| {
            let ordering = key(a, b, order.field);
            match order.direction {
                Direction::Asc => ordering,
                Direction::Desc => ordering.reverse(),
            }
        })
        .find(|ordering| ordering.is_ne())
        .unwrap_or_else(|| id(a).cmp(&id(b)))
}

/// Slice an already sorted result set.
fn paginate<T, F: SortField>(rows: Vec<T>, request: &PageRequest<F>) -> Page<T> {
    let total = rows.len() as u64;
    let content = rows
        .into_iter()
        .skip(usize::try_from(request.offset()).unwrap_or(usize::MAX))
        .take(usize::try_from(request.size()).unwrap_or(usize::MAX))
        .collect();
    Page::new(content, request, total)
}
