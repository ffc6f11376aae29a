//! Query model shared by every repository implementation: keyword filters,
//! sort orders and pages.

pub mod keyword;
pub mod page;

pub use keyword::{PostKeyword, PostKeywordType, TextField};
pub use page::{
    CommentSortField, Direction, LikeSortField, Page, PageRequest, PostSortField, Sort,
    SortField, SortOrder,
};
