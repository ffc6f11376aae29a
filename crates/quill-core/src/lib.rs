//! # Quill Core
//!
//! The domain layer of the Quill blogging backend: entities, the keyword and
//! paging query model, repository ports and the services that enforce
//! ownership and soft-delete rules. No infrastructure dependencies.

pub mod domain;
pub mod error;
pub mod ports;
pub mod query;
pub mod services;

pub use error::{DomainError, DomainResult, RepoError};
