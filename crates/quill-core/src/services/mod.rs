//! Application services: orchestrate repositories and enforce the
//! ownership, activity and uniqueness rules.

mod comment;
mod like;
mod post;
mod projection;
mod user;

pub use comment::CommentService;
pub use like::LikeService;
pub use post::PostService;
pub use user::UserService;
