//! Domain entities - the core business objects.

mod comment;
mod like;
mod post;
mod user;

pub use comment::Comment;
pub use like::{Like, LikedPost};
pub use post::{Post, normalize_tags};
pub use user::User;
