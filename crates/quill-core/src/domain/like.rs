use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use quill_shared::dto::LikeDto;

use super::Post;

/// A user's like on a post. The (user, post) pair is the identity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Like {
    pub user_id: Uuid,
    pub post_id: Uuid,
    pub created_at: DateTime<Utc>,
}

impl Like {
    pub fn new(user_id: Uuid, post_id: Uuid) -> Self {
        Self {
            user_id,
            post_id,
            created_at: Utc::now(),
        }
    }
}

impl From<Like> for LikeDto {
    fn from(like: Like) -> Self {
        Self {
            user_id: like.user_id,
            post_id: like.post_id,
            created_at: like.created_at,
        }
    }
}

/// A like joined with the post it points at.
#[derive(Debug, Clone)]
pub struct LikedPost {
    pub like: Like,
    pub post: Post,
}
