//! Application state - shared across all handlers.

use std::sync::Arc;

use quill_core::ports::{
    CommentRepository, LikeRepository, PasswordService, PostRepository, TokenService,
    UserRepository,
};
use quill_core::services::{CommentService, LikeService, PostService, UserService};
use quill_infra::{Argon2PasswordService, InMemoryStore, JwtTokenService};

#[cfg(feature = "postgres")]
use quill_infra::database::{
    DatabaseConnections, SqlCommentRepository, SqlLikeRepository, SqlPostRepository,
    SqlUserRepository,
};

use crate::config::AppConfig;
use crate::middleware::error::AppError;

pub const ADMIN_ROLE: &str = "admin";
pub const USER_ROLE: &str = "user";

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub posts: Arc<PostService>,
    pub comments: Arc<CommentService>,
    pub likes: Arc<LikeService>,
    pub users: Arc<UserService>,
    pub tokens: Arc<dyn TokenService>,
    admin_secret: Option<Arc<str>>,
    /// Which store backs the repositories, reported by the health check.
    pub storage: &'static str,
}

/// One implementation per repository port.
pub struct Repositories {
    pub users: Arc<dyn UserRepository>,
    pub posts: Arc<dyn PostRepository>,
    pub comments: Arc<dyn CommentRepository>,
    pub likes: Arc<dyn LikeRepository>,
}

impl Repositories {
    pub fn in_memory() -> Self {
        let store = InMemoryStore::new();
        Self {
            users: Arc::new(store.users()),
            posts: Arc::new(store.posts()),
            comments: Arc::new(store.comments()),
            likes: Arc::new(store.likes()),
        }
    }

    #[cfg(feature = "postgres")]
    pub fn sql(connections: &DatabaseConnections) -> Self {
        let db = &connections.main;
        Self {
            users: Arc::new(SqlUserRepository::new(db.clone())),
            posts: Arc::new(SqlPostRepository::new(db.clone())),
            comments: Arc::new(SqlCommentRepository::new(db.clone())),
            likes: Arc::new(SqlLikeRepository::new(db.clone())),
        }
    }
}

impl AppState {
    /// Build the application state, falling back to the in-memory store when
    /// no database is configured or reachable.
    pub async fn new(config: &AppConfig) -> Self {
        #[cfg(feature = "postgres")]
        let (repositories, storage) = match config.database.as_ref() {
            Some(db_config) => match DatabaseConnections::init(db_config).await {
                Ok(connections) => (Repositories::sql(&connections), "postgres"),
                Err(e) => {
                    tracing::error!(
                        "Failed to connect to database: {}. Using in-memory fallback.",
                        e
                    );
                    (Repositories::in_memory(), "memory")
                }
            },
            None => {
                tracing::warn!("DATABASE_URL not set. Running without database (in-memory mode).");
                (Repositories::in_memory(), "memory")
            }
        };

        #[cfg(not(feature = "postgres"))]
        let (repositories, storage) = {
            tracing::info!("Running without postgres feature - using in-memory repositories");
            (Repositories::in_memory(), "memory")
        };

        let state = Self::build(
            repositories,
            Arc::new(Argon2PasswordService::new()),
            Arc::new(JwtTokenService::new(config.jwt.clone())),
            config.admin_secret.as_deref(),
            storage,
        );
        tracing::info!(storage, "Application state initialized");
        state
    }

    /// Wire services over the given repositories.
    pub fn build(
        repositories: Repositories,
        passwords: Arc<dyn PasswordService>,
        tokens: Arc<dyn TokenService>,
        admin_secret: Option<&str>,
        storage: &'static str,
    ) -> Self {
        let Repositories {
            users,
            posts,
            comments,
            likes,
        } = repositories;

        Self {
            posts: Arc::new(PostService::new(posts.clone(), users.clone())),
            comments: Arc::new(CommentService::new(posts.clone(), comments)),
            likes: Arc::new(LikeService::new(posts, users.clone(), likes)),
            users: Arc::new(UserService::new(users, passwords)),
            tokens,
            admin_secret: admin_secret.map(Arc::from),
            storage,
        }
    }

    /// Roles granted at registration. `admin` needs the configured secret;
    /// presenting any other secret, or one when none is configured, is refused.
    pub fn roles_for(&self, presented_secret: Option<&str>) -> Result<Vec<String>, AppError> {
        let mut roles = vec![USER_ROLE.to_string()];
        let Some(presented) = presented_secret else {
            return Ok(roles);
        };

        match self.admin_secret.as_deref() {
            Some(expected) if constant_time_eq(expected.as_bytes(), presented.as_bytes()) => {
                roles.push(ADMIN_ROLE.to_string());
                Ok(roles)
            }
            _ => {
                tracing::warn!("Registration presented an invalid admin secret");
                Err(AppError::Forbidden("invalid admin secret".to_string()))
            }
        }
    }
}

fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    a.len() == b.len() && a.iter().zip(b).fold(0u8, |acc, (x, y)| acc | (x ^ y)) == 0
}
