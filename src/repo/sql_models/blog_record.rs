use crate::types;

/// Values written by an insert, everything else is assigned by the database.
#[derive(Debug, Clone)]
pub struct NewBlogRecord {
    pub id: String,
    pub title: String,
    pub content: String,
}

impl NewBlogRecord {
    /// Creates the values of a new post under a fresh identifier.
    pub fn new(title: &str, content: &str) -> Self {
        Self {
            id: types::Id::generate().into_inner(),
            title: title.to_owned(),
            content: content.to_owned(),
        }
    }
}

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct BlogRecord {
    pub id: String,
    pub title: String,
    pub content: String,

    pub(super) created_at: types::Timestamp,
    pub(super) updated_at: types::Timestamp,
}

impl BlogRecord {
    pub fn into_blog_post(self, comments: Vec<super::CommentRecord>) -> types::BlogPost {
        types::BlogPost {
            id: self.id.into(),
            title: self.title,
            content: self.content,
            created_at: self.created_at,
            updated_at: self.updated_at,
            comments: comments.into_iter().map(types::Comment::from).collect(),
        }
    }
}

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct BlogSummaryRecord {
    pub id: String,
    pub title: String,
    pub comment_count: i32,
}

impl From<BlogSummaryRecord> for types::BlogSummary {
    fn from(value: BlogSummaryRecord) -> Self {
        Self {
            id: value.id.into(),
            title: value.title,
            comment_count: value.comment_count,
        }
    }
}

/// The statements a partial update can turn into, one per combination of
/// present fields.
///
/// Each variant owns a fixed statement whose placeholders are bound, in order,
/// to [`BlogUpdate::values`] followed by the blog identifier.
#[derive(Debug, Clone, PartialEq)]
pub enum BlogUpdate<'a> {
    Title(&'a str),
    Content(&'a str),
    TitleAndContent { title: &'a str, content: &'a str },
}

impl<'a> BlogUpdate<'a> {
    /// Returns [`None`] when the patch carries no field, i.e. there is nothing to update.
    pub fn from_patch(patch: &'a types::BlogPatch) -> Option<Self> {
        match (patch.title.as_deref(), patch.content.as_deref()) {
            (Some(title), Some(content)) => Some(Self::TitleAndContent { title, content }),
            (Some(title), None) => Some(Self::Title(title)),
            (None, Some(content)) => Some(Self::Content(content)),
            (None, None) => None,
        }
    }

    pub fn statement(&self) -> &'static str {
        match self {
            Self::Title(_) => {
                r#"UPDATE blogs
                SET title = $1, updated_at = GREATEST(clock_timestamp(), updated_at)
                WHERE id = $2"#
            }
            Self::Content(_) => {
                r#"UPDATE blogs
                SET content = $1, updated_at = GREATEST(clock_timestamp(), updated_at)
                WHERE id = $2"#
            }
            Self::TitleAndContent { .. } => {
                r#"UPDATE blogs
                SET title = $1, content = $2, updated_at = GREATEST(clock_timestamp(), updated_at)
                WHERE id = $3"#
            }
        }
    }

    /// Values to bind before the identifier, in placeholder order.
    pub fn values(&self) -> Vec<&'a str> {
        match *self {
            Self::Title(title) => vec![title],
            Self::Content(content) => vec![content],
            Self::TitleAndContent { title, content } => vec![title, content],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn placeholders(statement: &str) -> usize {
        (1..10)
            .take_while(|n| statement.contains(&format!("${n}")))
            .count()
    }

    #[test]
    fn new_records_get_fresh_ids() {
        let a = NewBlogRecord::new("title", "content");
        let b = NewBlogRecord::new("title", "content");

        assert_ne!(a.id, b.id);
        assert_eq!(a.title, "title");
        assert_eq!(a.content, "content");

        let comment = super::super::NewCommentRecord::new(&a.id, "nice", "ann");
        assert_eq!(comment.blog_id, a.id);
        assert_ne!(comment.id, a.id);
    }

    #[test]
    fn empty_patch_has_no_statement() {
        let patch = types::BlogPatch::default();
        assert!(BlogUpdate::from_patch(&patch).is_none());
    }

    #[test]
    fn variants_from_patch() {
        let patch = types::BlogPatch::default().with_title("t");
        assert_eq!(BlogUpdate::from_patch(&patch), Some(BlogUpdate::Title("t")));

        let patch = types::BlogPatch::default().with_content("c");
        assert_eq!(
            BlogUpdate::from_patch(&patch),
            Some(BlogUpdate::Content("c"))
        );

        let patch = types::BlogPatch::default().with_title("t").with_content("c");
        assert_eq!(
            BlogUpdate::from_patch(&patch),
            Some(BlogUpdate::TitleAndContent {
                title: "t",
                content: "c"
            })
        );
    }

    #[test]
    fn bind_order_matches_placeholders() {
        let updates = [
            BlogUpdate::Title("t"),
            BlogUpdate::Content("c"),
            BlogUpdate::TitleAndContent {
                title: "t",
                content: "c",
            },
        ];

        for update in updates {
            let statement = update.statement();
            let values = update.values();

            // values first, then the identifier in the WHERE clause
            assert_eq!(placeholders(statement), values.len() + 1);
            assert!(statement.contains(&format!("WHERE id = ${}", values.len() + 1)));
        }

        assert!(BlogUpdate::Content("c").statement().contains("content = $1"));
        assert!(!BlogUpdate::Content("c").statement().contains("title"));

        let both = BlogUpdate::TitleAndContent {
            title: "t",
            content: "c",
        };
        assert!(both.statement().contains("title = $1, content = $2"));
        assert_eq!(both.values(), vec!["t", "c"]);
    }
}
