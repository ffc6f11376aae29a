//! SQL persistence via SeaORM.

mod base;
mod comment_repo;
mod connections;
pub mod entity;
mod filters;
mod like_repo;
mod post_repo;
pub mod schema;
mod user_repo;

pub use base::SqlBaseRepository;
pub use comment_repo::SqlCommentRepository;
pub use connections::{DatabaseConfig, DatabaseConnections};
pub use like_repo::SqlLikeRepository;
pub use post_repo::SqlPostRepository;
pub use user_repo::SqlUserRepository;

#[cfg(test)]
mod tests;
