use std::sync::Arc;
use std::time::Duration;

use crate::{repo::FacadeError, types};

/// Shared handle to a storage engine.
pub type StoreRef = Arc<dyn BlogStore>;

/// Storage engine for blog posts and their comments.
///
/// Implementations hold no per-call mutable state: every method is a
/// self-contained unit of work and may run concurrently with any other.
/// Every method receives the time `budget` granted to the call: statements
/// running past it are aborted by the backend, and dropping a returned future
/// rolls back whatever it had not committed yet.
#[async_trait::async_trait]
pub trait BlogStore: Send + Sync {
    /// Persists a new post and returns its freshly generated identifier.
    async fn create(
        &self,
        title: &str,
        content: &str,
        budget: Duration,
    ) -> Result<types::Id, FacadeError>;

    /// Returns the post with all of its comments in creation order.
    async fn get(&self, id: &types::Id, budget: Duration) -> Result<types::BlogPost, FacadeError>;

    /// Applies a partial update. An empty patch succeeds without touching storage.
    async fn update(
        &self,
        id: &types::Id,
        patch: types::BlogPatch,
        budget: Duration,
    ) -> Result<(), FacadeError>;

    /// Removes the post, its comments go with it.
    async fn delete(&self, id: &types::Id, budget: Duration) -> Result<(), FacadeError>;

    /// Lists summaries in ascending identifier order, strictly after `token`.
    async fn list(
        &self,
        size: types::PageSize,
        token: &types::PageToken,
        budget: Duration,
    ) -> Result<types::Page<types::BlogSummary>, FacadeError>;

    /// Attaches a comment to an existing post.
    async fn add_comment(
        &self,
        blog_id: &types::Id,
        content: &str,
        author: &str,
        budget: Duration,
    ) -> Result<types::Id, FacadeError>;
}

#[cfg(test)]
pub mod testing;
