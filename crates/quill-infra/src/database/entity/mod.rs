//! SeaORM entities. Relations are plain foreign keys; the `posts` table
//! references itself through `parent_id`.

pub mod comment;
pub mod like;
pub mod post;
pub mod post_tag;
pub mod user;
