use std::time::Duration;

use log::{trace, warn};

use super::FacadeError;
use crate::{repo, traits, types};

/// [`traits::BlogStore`] implementation on top of the PostgreSQL repository.
///
/// Each operation runs in its own transaction, bounded by the call budget and
/// committed as its last step.
#[derive(Clone)]
pub struct FacadeBlog {
    repo: repo::Repository,
}

impl FacadeBlog {
    pub fn new(repo: repo::Repository) -> Self {
        Self { repo }
    }

    async fn begin(&self, budget: Duration, context: &str) -> Result<repo::Tx, FacadeError> {
        let mut tx = self
            .repo
            .transaction()
            .await
            .map_err(FacadeError::repository(context))?;
        tx.statement_timeout(budget)
            .await
            .map_err(FacadeError::repository(context))?;
        Ok(tx)
    }
}

#[async_trait::async_trait]
impl traits::BlogStore for FacadeBlog {
    async fn create(
        &self,
        title: &str,
        content: &str,
        budget: Duration,
    ) -> Result<types::Id, FacadeError> {
        let mut tx = self.begin(budget, "create blog").await?;

        let record = repo::blog_create(&mut tx, &repo::NewBlogRecord::new(title, content))
            .await
            .map_err(FacadeError::repository("create blog"))?;
        tx.commit()
            .await
            .map_err(FacadeError::repository("create blog"))?;

        trace!("blog `{}` created", record.id);
        Ok(record.id.into())
    }

    async fn get(&self, id: &types::Id, budget: Duration) -> Result<types::BlogPost, FacadeError> {
        let context = format!("get blog `{id}`");
        let mut tx = self.begin(budget, &context).await?;

        let record = repo::blog_find_by_id(&mut tx, id.as_str())
            .await
            .map_err(FacadeError::repository(context.as_str()))?
            .ok_or_else(|| FacadeError::blog_not_found(id))?;

        // A failure here discards the post as well, partial results are never returned
        let comments = repo::comment_find_by_blog(&mut tx, id.as_str())
            .await
            .map_err(FacadeError::repository(format!("get comments of blog `{id}`")))?;
        tx.commit()
            .await
            .map_err(FacadeError::repository(context))?;

        trace!("blog `{}` fetched with {} comments", id, comments.len());
        Ok(record.into_blog_post(comments))
    }

    async fn update(
        &self,
        id: &types::Id,
        patch: types::BlogPatch,
        budget: Duration,
    ) -> Result<(), FacadeError> {
        let Some(update) = repo::BlogUpdate::from_patch(&patch) else {
            trace!("empty update for blog `{}`, nothing to do", id);
            return Ok(());
        };

        let context = format!("update blog `{id}`");
        let mut tx = self.begin(budget, &context).await?;

        let affected = repo::blog_update(&mut tx, id.as_str(), &update)
            .await
            .map_err(FacadeError::repository(context.as_str()))?;
        if affected == 0 {
            return Err(FacadeError::blog_not_found(id));
        }

        tx.commit()
            .await
            .map_err(FacadeError::repository(context))?;
        Ok(())
    }

    async fn delete(&self, id: &types::Id, budget: Duration) -> Result<(), FacadeError> {
        let context = format!("delete blog `{id}`");
        let mut tx = self.begin(budget, &context).await?;

        let affected = repo::blog_delete(&mut tx, id.as_str())
            .await
            .map_err(FacadeError::repository(context.as_str()))?;
        if affected == 0 {
            return Err(FacadeError::blog_not_found(id));
        }

        tx.commit()
            .await
            .map_err(FacadeError::repository(context))?;

        warn!("blog `{}` deleted", id);
        Ok(())
    }

    async fn list(
        &self,
        size: types::PageSize,
        token: &types::PageToken,
        budget: Duration,
    ) -> Result<types::Page<types::BlogSummary>, FacadeError> {
        let mut tx = self.begin(budget, "list blogs").await?;

        let cursor = token.cursor().map(types::Id::as_str);
        let rows = repo::blog_list_summaries(&mut tx, cursor, size.probe_limit())
            .await
            .map_err(FacadeError::repository("list blogs"))?;
        tx.commit()
            .await
            .map_err(FacadeError::repository("list blogs"))?;

        trace!("listing fetched {} rows (page size {})", rows.len(), size.get());

        let summaries = rows.into_iter().map(types::BlogSummary::from).collect();
        Ok(types::Page::from_probe(summaries, size, |s| &s.id))
    }

    async fn add_comment(
        &self,
        blog_id: &types::Id,
        content: &str,
        author: &str,
        budget: Duration,
    ) -> Result<types::Id, FacadeError> {
        let context = format!("add comment to blog `{blog_id}`");
        let mut tx = self.begin(budget, &context).await?;
        let record = repo::NewCommentRecord::new(blog_id.as_str(), content, author);

        let record = match repo::comment_create(&mut tx, &record).await {
            Ok(Some(record)) => record,
            Ok(None) => return Err(FacadeError::blog_not_found(blog_id)),
            Err(e) if e.is_foreign_key_violation() => {
                return Err(FacadeError::blog_not_found(blog_id));
            }
            Err(e) => return Err(FacadeError::repository(context)(e)),
        };

        tx.commit()
            .await
            .map_err(FacadeError::repository(context))?;

        trace!("comment `{}` added to blog `{}`", record.id, blog_id);
        Ok(record.id.into())
    }
}
