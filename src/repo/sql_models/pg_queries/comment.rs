use crate::repo::{self, sql_models};

/// Inserts the comment only if its blog exists, in a single statement.
///
/// Returns [`None`] when the blog is missing. A blog deleted concurrently is
/// caught by the foreign key and surfaces as a foreign key violation.
pub async fn comment_create(
    exec: &mut impl repo::AsExec,
    record: &sql_models::NewCommentRecord,
) -> Result<Option<sql_models::CommentRecord>, repo::Error> {
    let res = sqlx::query_as::<_, sql_models::CommentRecord>(
        r#"INSERT INTO comments (id, blog_id, content, author)
        SELECT $1, $2, $3, $4
        WHERE EXISTS (SELECT 1 FROM blogs WHERE id = $2)
        RETURNING id, blog_id, content, author, created_at"#,
    )
    .bind(&record.id)
    .bind(&record.blog_id)
    .bind(&record.content)
    .bind(&record.author)
    .fetch_optional(exec.as_exec())
    .await?;
    Ok(res)
}

/// All comments of a blog, oldest first. Ties on the creation time are broken
/// by identifier so the order is stable.
pub async fn comment_find_by_blog(
    exec: &mut impl repo::AsExec,
    blog_id: &str,
) -> Result<Vec<sql_models::CommentRecord>, repo::Error> {
    let res = sqlx::query_as::<_, sql_models::CommentRecord>(
        r#"SELECT id, blog_id, content, author, created_at
        FROM comments
        WHERE blog_id = $1
        ORDER BY created_at, id"#,
    )
    .bind(blog_id)
    .fetch_all(exec.as_exec())
    .await?;
    Ok(res)
}
