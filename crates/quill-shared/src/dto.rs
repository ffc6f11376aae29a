//! Data Transfer Objects - request/response types for the API.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Request to register a new user.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisterUserRequest {
    pub name: String,
    pub password: String,
    /// Grants the `admin` role when it matches the server's configured secret.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub admin_secret: Option<String>,
}

/// Response containing a user's public information.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserResponse {
    pub id: Uuid,
    pub name: String,
    pub created_at: DateTime<Utc>,
}

/// Registration result: the new user plus an access token for it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisteredUserResponse {
    pub user: UserResponse,
    pub access_token: String,
    pub token_type: String,
    pub expires_in: u64,
}

/// Request to create a post. A `parent_id` makes it a reply.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostCreateRequest {
    pub title: String,
    pub content: String,
    #[serde(default)]
    pub parent_id: Option<Uuid>,
}

/// Request to edit a post.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostUpdateRequest {
    pub title: String,
    pub content: String,
    #[serde(default)]
    pub tags: Vec<String>,
}

/// Public view of a post. The soft-delete flag never leaves the server.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PostDto {
    pub id: Uuid,
    pub title: String,
    pub content: String,
    pub author_id: Uuid,
    pub author_name: Option<String>,
    pub views: i64,
    pub parent_id: Option<Uuid>,
    pub tags: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// An author's top-level posts with their count.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RootPostsDto {
    pub total: u64,
    pub posts: Vec<PostDto>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommentCreateRequest {
    pub content: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommentDto {
    pub id: Uuid,
    pub post_id: Uuid,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LikeDto {
    pub user_id: Uuid,
    pub post_id: Uuid,
    pub created_at: DateTime<Utc>,
}

/// Like count for a single post.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LikeCountDto {
    pub post_id: Uuid,
    pub likes: u64,
}

/// A post the user liked, with the time of the like.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LikedPostDto {
    pub liked_at: DateTime<Utc>,
    pub post: PostDto,
}
