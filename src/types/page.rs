//! Keyset pagination primitives.
//!
//! A listing request asks for `k` items after an optional [`PageToken`]. The
//! storage layer fetches `k + 1` rows (the extra one is the _probe_ row) and
//! [`Page::from_probe`] decides, from the number of rows actually returned,
//! whether another page exists. No separate count query is ever needed.

use super::Id;
use crate::params;

/// Number of items returned by a single listing call.
///
/// Always in `1..=params::MAX_PAGE_SIZE`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageSize(u32);

impl PageSize {
    /// Clamps a caller supplied size: non-positive values fall back to
    /// [`params::DEFAULT_PAGE_SIZE`], values above [`params::MAX_PAGE_SIZE`]
    /// are capped.
    pub fn clamp(requested: i32) -> Self {
        if requested <= 0 {
            return Self(params::DEFAULT_PAGE_SIZE);
        }
        Self((requested as u32).min(params::MAX_PAGE_SIZE))
    }

    pub fn get(&self) -> u32 {
        self.0
    }

    /// Row limit used by the storage query, one more than the page size.
    pub fn probe_limit(&self) -> i64 {
        i64::from(self.0) + 1
    }
}

impl Default for PageSize {
    fn default() -> Self {
        Self(params::DEFAULT_PAGE_SIZE)
    }
}

/// Opaque continuation token, the identifier of the last item of the
/// previous page. An empty token means "start from the beginning" when
/// received and "no more pages" when returned.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PageToken(Option<Id>);

impl PageToken {
    pub fn start() -> Self {
        Self(None)
    }

    pub fn after(id: Id) -> Self {
        if id.is_empty() {
            return Self(None);
        }
        Self(Some(id))
    }

    /// Lower (exclusive) bound of the next query, if any.
    pub fn cursor(&self) -> Option<&Id> {
        self.0.as_ref()
    }

    pub fn is_end(&self) -> bool {
        self.0.is_none()
    }
}

impl From<String> for PageToken {
    fn from(value: String) -> Self {
        Self::after(Id::from(value))
    }
}

impl From<&str> for PageToken {
    fn from(value: &str) -> Self {
        Self::after(Id::from(value))
    }
}

impl From<PageToken> for String {
    fn from(value: PageToken) -> Self {
        value.0.map(Id::into_inner).unwrap_or_default()
    }
}

/// A page of results plus the token to request the following page.
#[derive(Debug, Clone, PartialEq)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub next_page_token: PageToken,
}

impl<T> Page<T> {
    /// Builds a page out of the rows returned by a `LIMIT k + 1` query.
    ///
    /// When more than `k` rows came back the probe row is dropped and the id of
    /// the last kept row becomes the next token; otherwise this is the last page.
    pub fn from_probe(mut rows: Vec<T>, size: PageSize, id_of: impl Fn(&T) -> &Id) -> Self {
        let size = size.get() as usize;

        if rows.len() <= size {
            return Self {
                items: rows,
                next_page_token: PageToken::start(),
            };
        }

        rows.truncate(size);
        let next_page_token = rows
            .last()
            .map(|last| PageToken::after(id_of(last).clone()))
            .unwrap_or_default();

        Self {
            items: rows,
            next_page_token,
        }
    }
}
