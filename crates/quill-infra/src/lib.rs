//! # Quill Infrastructure
//!
//! Concrete implementations of the ports defined in `quill-core`.
//!
//! ## Feature Flags
//!
//! - `postgres` (default) - SQL repositories via SeaORM
//!
//! The in-memory store is always available and backs the server when no
//! database is configured.

pub mod auth;
pub mod memory;

#[cfg(feature = "postgres")]
pub mod database;

pub use auth::{Argon2PasswordService, JwtConfig, JwtTokenService};
pub use memory::InMemoryStore;

#[cfg(feature = "postgres")]
pub use database::{DatabaseConfig, DatabaseConnections};
