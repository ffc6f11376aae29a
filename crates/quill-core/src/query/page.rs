//! Sorting and pagination model.

use std::fmt::Debug;

use serde::Serialize;

use crate::error::DomainError;

/// Page size used when the caller does not send one.
pub const DEFAULT_PAGE_SIZE: u64 = 20;
/// Largest page a caller may request.
pub const MAX_PAGE_SIZE: u64 = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Asc,
    Desc,
}

impl Direction {
    fn parse(token: &str) -> Option<Self> {
        match token.trim().to_ascii_lowercase().as_str() {
            "asc" => Some(Self::Asc),
            "desc" => Some(Self::Desc),
            _ => None,
        }
    }
}

/// A column a listing can be ordered by.
pub trait SortField: Copy + Eq + Debug + Send + Sync + 'static {
    /// Parse a request token such as `created` or `title`.
    fn parse(token: &str) -> Option<Self>;

    /// Ordering applied when the request names none.
    fn default_sort() -> Sort<Self>;

    /// Whether ordering by this field already orders by primary key.
    fn is_id(self) -> bool;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SortOrder<F> {
    pub field: F,
    pub direction: Direction,
}

/// Ordered list of sort keys. Repositories always append `id ASC` after
/// these unless one of them already is the id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sort<F> {
    orders: Vec<SortOrder<F>>,
}

impl<F: SortField> Sort<F> {
    pub fn by(field: F, direction: Direction) -> Self {
        Self {
            orders: vec![SortOrder { field, direction }],
        }
    }

    pub fn then(mut self, field: F, direction: Direction) -> Self {
        self.orders.push(SortOrder { field, direction });
        self
    }

    pub fn orders(&self) -> &[SortOrder<F>] {
        &self.orders
    }

    /// True when no explicit id tie-break needs to be appended.
    pub fn is_ordered_by_id(&self) -> bool {
        self.orders.iter().any(|o| o.field.is_id())
    }

    /// Parse Spring-style `field[,direction]` parameters; an empty list
    /// yields the default ordering. Direction defaults to ascending.
    pub fn parse<S: AsRef<str>>(params: &[S]) -> Result<Self, DomainError> {
        let mut orders = Vec::with_capacity(params.len());
        for param in params {
            let param = param.as_ref();
            let (field, direction) = match param.split_once(',') {
                Some((field, direction)) => (field, Some(direction)),
                None => (param, None),
            };

            let field = F::parse(field)
                .ok_or_else(|| DomainError::invalid(format!("unknown sort field '{field}'")))?;
            let direction = match direction {
                None => Direction::Asc,
                Some(token) => Direction::parse(token).ok_or_else(|| {
                    DomainError::invalid(format!("unknown sort direction '{token}'"))
                })?,
            };
            orders.push(SortOrder { field, direction });
        }

        if orders.is_empty() {
            Ok(F::default_sort())
        } else {
            Ok(Self { orders })
        }
    }
}

impl<F: SortField> Default for Sort<F> {
    fn default() -> Self {
        F::default_sort()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PostSortField {
    Created,
    Updated,
    Title,
    Views,
    Id,
}

impl SortField for PostSortField {
    fn parse(token: &str) -> Option<Self> {
        match token.trim().to_ascii_lowercase().as_str() {
            "created" | "createdat" | "created_at" => Some(Self::Created),
            "updated" | "updatedat" | "updated_at" | "modified" => Some(Self::Updated),
            "title" => Some(Self::Title),
            "views" | "view" => Some(Self::Views),
            "id" => Some(Self::Id),
            _ => None,
        }
    }

    fn default_sort() -> Sort<Self> {
        Sort::by(Self::Created, Direction::Desc)
    }

    fn is_id(self) -> bool {
        self == Self::Id
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommentSortField {
    Created,
    Id,
}

impl SortField for CommentSortField {
    fn parse(token: &str) -> Option<Self> {
        match token.trim().to_ascii_lowercase().as_str() {
            "created" | "createdat" | "created_at" => Some(Self::Created),
            "id" => Some(Self::Id),
            _ => None,
        }
    }

    fn default_sort() -> Sort<Self> {
        Sort::by(Self::Created, Direction::Asc)
    }

    fn is_id(self) -> bool {
        self == Self::Id
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LikeSortField {
    Created,
}

impl SortField for LikeSortField {
    fn parse(token: &str) -> Option<Self> {
        match token.trim().to_ascii_lowercase().as_str() {
            "created" | "createdat" | "created_at" => Some(Self::Created),
            _ => None,
        }
    }

    fn default_sort() -> Sort<Self> {
        Sort::by(Self::Created, Direction::Desc)
    }

    fn is_id(self) -> bool {
        false
    }
}

/// A bounded slice request over an ordered result set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageRequest<F> {
    page: u64,
    size: u64,
    sort: Sort<F>,
}

impl<F: SortField> PageRequest<F> {
    /// `page` is zero-based; `size` must be within `1..=MAX_PAGE_SIZE`, and
    /// the row offset must fit a signed 64-bit SQL `OFFSET`.
    pub fn new(page: u64, size: u64, sort: Sort<F>) -> Result<Self, DomainError> {
        if size == 0 || size > MAX_PAGE_SIZE {
            return Err(DomainError::invalid(format!(
                "page size must be between 1 and {MAX_PAGE_SIZE}, got {size}"
            )));
        }
        match page.checked_mul(size) {
            Some(offset) if offset <= i64::MAX as u64 => {}
            _ => {
                return Err(DomainError::invalid(format!(
                    "page {page} is out of range for page size {size}"
                )));
            }
        }
        Ok(Self { page, size, sort })
    }

    /// Page with the field's default ordering.
    pub fn of(page: u64, size: u64) -> Result<Self, DomainError> {
        Self::new(page, size, F::default_sort())
    }

    /// Build from raw request parameters.
    pub fn parse<S: AsRef<str>>(
        page: Option<u64>,
        size: Option<u64>,
        sort: &[S],
    ) -> Result<Self, DomainError> {
        Self::new(
            page.unwrap_or(0),
            size.unwrap_or(DEFAULT_PAGE_SIZE),
            Sort::parse(sort)?,
        )
    }

    pub fn page(&self) -> u64 {
        self.page
    }

    pub fn size(&self) -> u64 {
        self.size
    }

    pub fn sort(&self) -> &Sort<F> {
        &self.sort
    }

    pub fn offset(&self) -> u64 {
        self.page * self.size
    }
}

impl<F: SortField> Default for PageRequest<F> {
    fn default() -> Self {
        Self {
            page: 0,
            size: DEFAULT_PAGE_SIZE,
            sort: F::default_sort(),
        }
    }
}

/// One page of results plus the totals of the whole result set.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Page<T> {
    pub content: Vec<T>,
    pub page: u64,
    pub size: u64,
    pub total_elements: u64,
    pub total_pages: u64,
}

impl<T> Page<T> {
    pub fn new<F: SortField>(content: Vec<T>, request: &PageRequest<F>, total_elements: u64) -> Self {
        Self {
            content,
            page: request.page(),
            size: request.size(),
            total_elements,
            total_pages: total_elements.div_ceil(request.size()),
        }
    }

    pub fn has_next(&self) -> bool {
        self.page + 1 < self.total_pages
    }

    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            content: self.content.into_iter().map(f).collect(),
            page: self.page,
            size: self.size,
            total_elements: self.total_elements,
            total_pages: self.total_pages,
        }
    }
}
