use crate::repo::{self, sql_models};

pub async fn blog_create(
    exec: &mut impl repo::AsExec,
    record: &sql_models::NewBlogRecord,
) -> Result<sql_models::BlogRecord, repo::Error> {
    let res = sqlx::query_as::<_, sql_models::BlogRecord>(
        r#"INSERT INTO blogs (id, title, content)
        VALUES ($1, $2, $3)
        RETURNING id, title, content, created_at, updated_at"#,
    )
    .bind(&record.id)
    .bind(&record.title)
    .bind(&record.content)
    .fetch_one(exec.as_exec())
    .await?;
    Ok(res)
}

pub async fn blog_find_by_id(
    exec: &mut impl repo::AsExec,
    id: &str,
) -> Result<Option<sql_models::BlogRecord>, repo::Error> {
    let res = sqlx::query_as::<_, sql_models::BlogRecord>(
        r#"SELECT id, title, content, created_at, updated_at
        FROM blogs
        WHERE id = $1"#,
    )
    .bind(id)
    .fetch_optional(exec.as_exec())
    .await?;
    Ok(res)
}

/// Runs the statement matching `update` and returns the number of affected rows.
pub async fn blog_update(
    exec: &mut impl repo::AsExec,
    id: &str,
    update: &sql_models::BlogUpdate<'_>,
) -> Result<u64, repo::Error> {
    let mut query = sqlx::query(update.statement());
    for value in update.values() {
        query = query.bind(value);
    }

    let res = query.bind(id).execute(exec.as_exec()).await?;
    Ok(res.rows_affected())
}

/// Deletes a blog, comments are removed by the `ON DELETE CASCADE` constraint
/// within the same statement.
pub async fn blog_delete(exec: &mut impl repo::AsExec, id: &str) -> Result<u64, repo::Error> {
    let res = sqlx::query("DELETE FROM blogs WHERE id = $1")
        .bind(id)
        .execute(exec.as_exec())
        .await?;
    Ok(res.rows_affected())
}

/// Returns at most `limit` summaries ordered by identifier, starting strictly
/// after `after` when provided.
pub async fn blog_list_summaries(
    exec: &mut impl repo::AsExec,
    after: Option<&str>,
    limit: i64,
) -> Result<Vec<sql_models::BlogSummaryRecord>, repo::Error> {
    let res = match after {
        None => {
            sqlx::query_as::<_, sql_models::BlogSummaryRecord>(
                r#"SELECT b.id, b.title, COUNT(c.id)::INTEGER AS comment_count
                FROM blogs b
                LEFT JOIN comments c ON c.blog_id = b.id
                GROUP BY b.id, b.title
                ORDER BY b.id
                LIMIT $1"#,
            )
            .bind(limit)
            .fetch_all(exec.as_exec())
            .await?
        }
        Some(after) => {
            sqlx::query_as::<_, sql_models::BlogSummaryRecord>(
                r#"SELECT b.id, b.title, COUNT(c.id)::INTEGER AS comment_count
                FROM blogs b
                LEFT JOIN comments c ON c.blog_id = b.id
                WHERE b.id > $1
                GROUP BY b.id, b.title
                ORDER BY b.id
                LIMIT $2"#,
            )
            .bind(after)
            .bind(limit)
            .fetch_all(exec.as_exec())
            .await?
        }
    };
    Ok(res)
}
