//! In-memory [`BlogStore`] used to exercise the request handling layer without a database.

use std::collections::BTreeMap;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use super::BlogStore;
use crate::{repo, repo::FacadeError, types};

#[derive(Default)]
pub struct MemoryStore {
    blogs: Mutex<BTreeMap<types::Id, types::BlogPost>>,
    calls: AtomicUsize,
    last_page_size: Mutex<Option<types::PageSize>>,

    failing: bool,
    delay: Option<Duration>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every call fails with a backend error.
    pub fn failing() -> Self {
        Self {
            failing: true,
            ..Self::default()
        }
    }

    /// Every call takes at least `delay` to complete.
    pub fn slow(delay: Duration) -> Self {
        Self {
            delay: Some(delay),
            ..Self::default()
        }
    }

    /// Inserts a blog with a chosen identifier.
    pub fn insert(&self, id: &str, title: &str) {
        let now = chrono::Utc::now();
        self.blogs.lock().unwrap().insert(
            id.into(),
            types::BlogPost {
                id: id.into(),
                title: title.to_owned(),
                content: String::new(),
                created_at: now,
                updated_at: now,
                comments: Vec::new(),
            },
        );
    }

    /// Number of calls that reached the store.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn last_page_size(&self) -> Option<types::PageSize> {
        *self.last_page_size.lock().unwrap()
    }

    async fn enter(&self, context: &str) -> Result<(), FacadeError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        if self.failing {
            return Err(FacadeError::repository(context)(repo::Error::Backend(
                sqlx::Error::PoolTimedOut,
            )));
        }
        Ok(())
    }
}

#[async_trait::async_trait]
impl BlogStore for MemoryStore {
    async fn create(
        &self,
        title: &str,
        content: &str,
        _budget: Duration,
    ) -> Result<types::Id, FacadeError> {
        self.enter("create blog").await?;

        let id = types::Id::generate();
        let now = chrono::Utc::now();
        self.blogs.lock().unwrap().insert(
            id.clone(),
            types::BlogPost {
                id: id.clone(),
                title: title.to_owned(),
                content: content.to_owned(),
                created_at: now,
                updated_at: now,
                comments: Vec::new(),
            },
        );
        Ok(id)
    }

    async fn get(&self, id: &types::Id, _budget: Duration) -> Result<types::BlogPost, FacadeError> {
        self.enter("get blog").await?;

        self.blogs
            .lock()
            .unwrap()
            .get(id)
            .cloned()
            .ok_or_else(|| FacadeError::blog_not_found(id))
    }

    async fn update(
        &self,
        id: &types::Id,
        patch: types::BlogPatch,
        _budget: Duration,
    ) -> Result<(), FacadeError> {
        if patch.is_empty() {
            return Ok(());
        }
        self.enter("update blog").await?;

        let mut blogs = self.blogs.lock().unwrap();
        let blog = blogs
            .get_mut(id)
            .ok_or_else(|| FacadeError::blog_not_found(id))?;
        if let Some(title) = patch.title {
            blog.title = title;
        }
        if let Some(content) = patch.content {
            blog.content = content;
        }
        blog.updated_at = chrono::Utc::now().max(blog.updated_at);
        Ok(())
    }

    async fn delete(&self, id: &types::Id, _budget: Duration) -> Result<(), FacadeError> {
        self.enter("delete blog").await?;

        self.blogs
            .lock()
            .unwrap()
            .remove(id)
            .map(|_| ())
            .ok_or_else(|| FacadeError::blog_not_found(id))
    }

    async fn list(
        &self,
        size: types::PageSize,
        token: &types::PageToken,
        _budget: Duration,
    ) -> Result<types::Page<types::BlogSummary>, FacadeError> {
        self.enter("list blogs").await?;
        *self.last_page_size.lock().unwrap() = Some(size);

        let rows: Vec<types::BlogSummary> = self
            .blogs
            .lock()
            .unwrap()
            .values()
            .filter(|b| token.cursor().is_none_or(|after| &b.id > after))
            .take(size.probe_limit() as usize)
            .map(|b| types::BlogSummary {
                id: b.id.clone(),
                title: b.title.clone(),
                comment_count: b.comments.len() as i32,
            })
            .collect();

        Ok(types::Page::from_probe(rows, size, |s| &s.id))
    }

    async fn add_comment(
        &self,
        blog_id: &types::Id,
        content: &str,
        author: &str,
        _budget: Duration,
    ) -> Result<types::Id, FacadeError> {
        self.enter("add comment").await?;

        let mut blogs = self.blogs.lock().unwrap();
        let blog = blogs
            .get_mut(blog_id)
            .ok_or_else(|| FacadeError::blog_not_found(blog_id))?;

        let id = types::Id::generate();
        blog.comments.push(types::Comment {
            id: id.clone(),
            blog_id: blog_id.clone(),
            content: content.to_owned(),
            author: author.to_owned(),
            created_at: chrono::Utc::now(),
        });
        Ok(id)
    }
}
