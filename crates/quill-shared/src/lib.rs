//! # Quill Shared
//!
//! Wire types shared by the services and the HTTP layer: request bodies,
//! transport-safe views and the response envelope.

pub mod dto;
pub mod response;

pub use response::{ApiResponse, ErrorResponse};
