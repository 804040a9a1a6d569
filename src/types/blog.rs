use super::{Id, Timestamp};

/// A blog post together with all of its comments.
#[derive(Debug, Clone, PartialEq)]
pub struct BlogPost {
    pub id: Id,
    pub title: String,
    pub content: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,

    /// Comments in creation order, never absent (possibly empty)
    pub comments: Vec<Comment>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Comment {
    pub id: Id,
    pub blog_id: Id,
    pub content: String,
    pub author: String,
    pub created_at: Timestamp,
}

/// Listing projection of a [`BlogPost`]. Derived, never stored.
#[derive(Debug, Clone, PartialEq)]
pub struct BlogSummary {
    pub id: Id,
    pub title: String,
    pub comment_count: i32,
}

/// Partial update of a blog post, absent fields are left untouched.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BlogPatch {
    pub title: Option<String>,
    pub content: Option<String>,
}

impl BlogPatch {
    pub fn new(title: Option<String>, content: Option<String>) -> Self {
        Self { title, content }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn with_content(mut self, content: impl Into<String>) -> Self {
        self.content = Some(content.into());
        self
    }

    /// Returns `true` if the patch would not modify anything.
    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.content.is_none()
    }
}
