//! Service fixtures over each storage backend.

#![allow(dead_code)]

use std::sync::Arc;

use uuid::Uuid;

use quill_core::ports::{AuthError, PasswordService};
use quill_core::services::{CommentService, LikeService, PostService, UserService};
use quill_infra::InMemoryStore;
use quill_infra::database::{
    DatabaseConfig, DatabaseConnections, SqlCommentRepository, SqlLikeRepository,
    SqlPostRepository, SqlUserRepository,
};

/// Reversible stand-in so tests don't pay for Argon2.
pub struct PlainPasswords;

impl PasswordService for PlainPasswords {
    fn hash(&self, password: &str) -> Result<String, AuthError> {
        Ok(format!("plain:{password}"))
    }

    fn verify(&self, password: &str, hash: &str) -> Result<bool, AuthError> {
        Ok(hash == format!("plain:{password}"))
    }
}

pub struct Services {
    pub backend: &'static str,
    pub users: UserService,
    pub posts: PostService,
    pub comments: CommentService,
    pub likes: LikeService,
}

impl Services {
    pub async fn user(&self, name: &str) -> Uuid {
        self.users.register(name, "password123").await.unwrap().id
    }

    pub async fn post(&self, author: Uuid, title: &str, content: &str) -> Uuid {
        self.posts.register_post(author, title, content).await.unwrap()
    }
}

pub async fn sqlite_with(passwords: Arc<dyn PasswordService>) -> Services {
    // One connection: every new in-memory SQLite connection is a fresh database.
    let config = DatabaseConfig {
        max_connections: 1,
        min_connections: 1,
        create_schema: true,
        ..DatabaseConfig::new("sqlite::memory:")
    };
    let db = DatabaseConnections::init(&config).await.unwrap().main;

    let users = Arc::new(SqlUserRepository::new(db.clone()));
    let posts = Arc::new(SqlPostRepository::new(db.clone()));
    let comments = Arc::new(SqlCommentRepository::new(db.clone()));
    let likes = Arc::new(SqlLikeRepository::new(db));

    Services {
        backend: "sqlite",
        users: UserService::new(users.clone(), passwords),
        posts: PostService::new(posts.clone(), users.clone()),
        comments: CommentService::new(posts.clone(), comments),
        likes: LikeService::new(posts, users, likes),
    }
}

pub fn memory_with(passwords: Arc<dyn PasswordService>) -> Services {
    let store = InMemoryStore::new();
    let users = Arc::new(store.users());
    let posts = Arc::new(store.posts());

    Services {
        backend: "memory",
        users: UserService::new(users.clone(), passwords),
        posts: PostService::new(posts.clone(), users.clone()),
        comments: CommentService::new(posts.clone(), Arc::new(store.comments())),
        likes: LikeService::new(posts, users, Arc::new(store.likes())),
    }
}

/// A fresh, empty instance of every backend. Keyword fixtures stay ASCII:
/// SQLite's `LOWER` does not fold other characters.
pub async fn backends() -> Vec<Services> {
    vec![
        sqlite_with(Arc::new(PlainPasswords)).await,
        memory_with(Arc::new(PlainPasswords)),
    ]
}
