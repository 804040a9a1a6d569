//! JSON bodies returned by the HTTP gateway. Field names follow the protobuf
//! JSON mapping (lower camel case, RFC 3339 timestamps).

use chrono::SecondsFormat;
use serde::{Deserialize, Serialize};

use crate::types;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IdResponse {
    pub id: String,
}

impl From<types::Id> for IdResponse {
    fn from(value: types::Id) -> Self {
        Self {
            id: value.into_inner(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommentResponse {
    pub id: String,
    pub content: String,
    pub author: String,
    pub created_at: String,
}

impl From<types::Comment> for CommentResponse {
    fn from(value: types::Comment) -> Self {
        Self {
            id: value.id.into_inner(),
            content: value.content,
            author: value.author,
            created_at: rfc3339(&value.created_at),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BlogResponse {
    pub id: String,
    pub title: String,
    pub content: String,
    pub created_at: String,
    pub updated_at: String,
    pub comments: Vec<CommentResponse>,
}

impl From<types::BlogPost> for BlogResponse {
    fn from(value: types::BlogPost) -> Self {
        Self {
            id: value.id.into_inner(),
            title: value.title,
            content: value.content,
            created_at: rfc3339(&value.created_at),
            updated_at: rfc3339(&value.updated_at),
            comments: value
                .comments
                .into_iter()
                .map(CommentResponse::from)
                .collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BlogSummaryResponse {
    pub id: String,
    pub title: String,
    pub comment_count: i32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListResponse {
    pub blogs: Vec<BlogSummaryResponse>,
    /// Empty when there are no more pages
    pub next_page_token: String,
}

impl From<types::Page<types::BlogSummary>> for ListResponse {
    fn from(value: types::Page<types::BlogSummary>) -> Self {
        Self {
            blogs: value
                .items
                .into_iter()
                .map(|s| BlogSummaryResponse {
                    id: s.id.into_inner(),
                    title: s.title,
                    comment_count: s.comment_count,
                })
                .collect(),
            next_page_token: value.next_page_token.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub code: String,
    pub message: String,
}

fn rfc3339(ts: &types::Timestamp) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Micros, true)
}
