// src/domain/bookmark.rs
use chrono::{DateTime, Utc};
use std::fmt;

/// Represents a bookmark domain entity
///
/// There is no identity field: the title is the only externally
/// addressable key and it is not required to be unique.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Bookmark {
    pub title: String,
    /// A URL or a freeform note
    pub content: String,
    pub created_at: DateTime<Utc>,
}

impl Bookmark {
    /// Create a bookmark stamped with the current time
    pub fn new<S: Into<String>>(title: S, content: S) -> Self {
        Self::with_created_at(title, content, Utc::now())
    }

    pub fn with_created_at<S: Into<String>>(
        title: S,
        content: S,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            title: title.into(),
            content: content.into(),
            created_at,
        }
    }

    /// True if the content points to a web page
    pub fn content_is_web_url(&self) -> bool {
        is_web_url(&self.content)
    }

    /// A title is derived from the page only when none was given
    pub fn needs_title(&self) -> bool {
        self.title.is_empty() && self.content_is_web_url()
    }

    /// Case-sensitive substring match on title or content
    pub fn matches(&self, query: &str) -> bool {
        self.title.contains(query) || self.content.contains(query)
    }
}

impl fmt::Display for Bookmark {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: {} ({})",
            self.title,
            self.content,
            self.created_at.to_rfc3339()
        )
    }
}

pub fn is_web_url(s: &str) -> bool {
    s.starts_with("http://") || s.starts_with("https://")
}
