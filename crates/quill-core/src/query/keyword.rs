//! Keyword search descriptor for posts.
//!
//! A [`PostKeyword`] only describes *what* to match. The SQL repositories
//! turn it into a `LIKE` condition, the in-memory store calls
//! [`PostKeyword::matches`]; both read the same [`PostKeyword::fields`].

use std::fmt;
use std::str::FromStr;

use crate::error::DomainError;

/// A searchable text column of a post.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextField {
    Title,
    Content,
}

/// Which fields a keyword is matched against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PostKeywordType {
    Title,
    Content,
    #[default]
    TitleAndContent,
}

impl PostKeywordType {
    /// Token used when the caller does not send one.
    pub const DEFAULT_TOKEN: &'static str = "title,content";

    pub fn fields(self) -> &'static [TextField] {
        match self {
            Self::Title => &[TextField::Title],
            Self::Content => &[TextField::Content],
            Self::TitleAndContent => &[TextField::Title, TextField::Content],
        }
    }

    /// Parse an optional raw token; missing or blank means the default.
    pub fn parse(token: Option<&str>) -> Result<Self, DomainError> {
        match token.map(str::trim) {
            None | Some("") => Ok(Self::default()),
            Some(token) => token.parse(),
        }
    }
}

impl FromStr for PostKeywordType {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized: Vec<String> = s
            .split(',')
            .map(|part| part.trim().to_ascii_lowercase())
            .collect();
        let parts: Vec<&str> = normalized.iter().map(String::as_str).collect();

        match parts.as_slice() {
            ["title"] => Ok(Self::Title),
            ["content"] => Ok(Self::Content),
            ["title", "content"] | ["content", "title"] => Ok(Self::TitleAndContent),
            _ => Err(DomainError::invalid(format!(
                "unknown keyword type '{s}', expected one of: title, content, title,content"
            ))),
        }
    }
}

impl fmt::Display for PostKeywordType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Title => f.write_str("title"),
            Self::Content => f.write_str("content"),
            Self::TitleAndContent => f.write_str(Self::DEFAULT_TOKEN),
        }
    }
}

/// Keyword filter for post listings. A blank value matches everything.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PostKeyword {
    kind: PostKeywordType,
    value: Option<String>,
}

impl PostKeyword {
    pub fn new(kind: PostKeywordType, value: impl Into<String>) -> Self {
        let value = value.into();
        let value = value.trim();
        Self {
            kind,
            value: (!value.is_empty()).then(|| value.to_string()),
        }
    }

    /// Match-all filter.
    pub fn any() -> Self {
        Self::default()
    }

    /// Build a filter from raw request parameters.
    pub fn parse(type_token: Option<&str>, value: Option<&str>) -> Result<Self, DomainError> {
        let kind = PostKeywordType::parse(type_token)?;
        Ok(Self::new(kind, value.unwrap_or_default()))
    }

    pub fn kind(&self) -> PostKeywordType {
        self.kind
    }

    pub fn value(&self) -> Option<&str> {
        self.value.as_deref()
    }

    pub fn is_match_all(&self) -> bool {
        self.value.is_none()
    }

    pub fn fields(&self) -> &'static [TextField] {
        self.kind.fields()
    }

    /// Lowercased search term, or `None` when nothing is filtered.
    pub fn needle(&self) -> Option<String> {
        self.value.as_ref().map(|v| v.to_lowercase())
    }

    /// Case-insensitive substring match over the configured fields.
    pub fn matches(&self, title: &str, content: &str) -> bool {
        let Some(needle) = self.needle() else {
            return true;
        };
        self.fields().iter().any(|field| {
            let haystack = match field {
                TextField::Title => title,
                TextField::Content => content,
            };
            haystack.to_lowercase().contains(&needle)
        })
    }
}
