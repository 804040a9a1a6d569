use crate::types;

/// Values written by an insert, the creation time is assigned by the database.
#[derive(Debug, Clone)]
pub struct NewCommentRecord {
    pub id: String,
    pub blog_id: String,
    pub content: String,
    pub author: String,
}

impl NewCommentRecord {
    pub fn new(blog_id: &str, content: &str, author: &str) -> Self {
        Self {
            id: types::Id::generate().into_inner(),
            blog_id: blog_id.to_owned(),
            content: content.to_owned(),
            author: author.to_owned(),
        }
    }
}

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct CommentRecord {
    pub id: String,
    pub blog_id: String,
    pub content: String,
    pub author: String,

    pub(super) created_at: types::Timestamp,
}

impl From<CommentRecord> for types::Comment {
    fn from(value: CommentRecord) -> Self {
        Self {
            id: value.id.into(),
            blog_id: value.blog_id.into(),
            content: value.content,
            author: value.author,
            created_at: value.created_at,
        }
    }
}
