use crate::{blogpb, types};

use super::{AddCommentRequest, CreateRequest, DeleteRequest, GetRequest, ListRequest, UpdateRequest};

pub fn uuid(id: types::Id) -> blogpb::Uuid {
    blogpb::Uuid {
        value: id.into_inner(),
    }
}

pub fn timestamp(ts: &types::Timestamp) -> prost_types::Timestamp {
    prost_types::Timestamp {
        seconds: ts.timestamp(),
        nanos: ts.timestamp_subsec_nanos() as i32,
    }
}

fn id_value(id: Option<blogpb::Uuid>) -> Option<String> {
    id.map(|id| id.value)
}

impl From<blogpb::CreateReq> for CreateRequest {
    fn from(value: blogpb::CreateReq) -> Self {
        Self {
            title: value.title,
            content: value.content,
        }
    }
}

impl From<blogpb::GetReq> for GetRequest {
    fn from(value: blogpb::GetReq) -> Self {
        Self {
            id: id_value(value.id),
        }
    }
}

impl From<blogpb::UpdateReq> for UpdateRequest {
    fn from(value: blogpb::UpdateReq) -> Self {
        Self {
            id: id_value(value.id),
            title: value.title,
            content: value.content,
        }
    }
}

impl From<blogpb::DeleteReq> for DeleteRequest {
    fn from(value: blogpb::DeleteReq) -> Self {
        Self {
            id: id_value(value.id),
        }
    }
}

impl From<blogpb::ListReq> for ListRequest {
    fn from(value: blogpb::ListReq) -> Self {
        Self {
            page_size: value.page_size,
            page_token: value.page_token,
        }
    }
}

impl From<blogpb::AddCommentReq> for AddCommentRequest {
    fn from(value: blogpb::AddCommentReq) -> Self {
        Self {
            id: id_value(value.id),
            content: value.content,
            author: value.author,
        }
    }
}

impl From<types::Comment> for blogpb::Comment {
    fn from(value: types::Comment) -> Self {
        Self {
            created_at: Some(timestamp(&value.created_at)),
            id: Some(uuid(value.id)),
            content: value.content,
            author: value.author,
        }
    }
}

impl From<types::BlogPost> for blogpb::Blog {
    fn from(value: types::BlogPost) -> Self {
        Self {
            created_at: Some(timestamp(&value.created_at)),
            updated_at: Some(timestamp(&value.updated_at)),
            id: Some(uuid(value.id)),
            title: value.title,
            content: value.content,
            comments: value
                .comments
                .into_iter()
                .map(blogpb::Comment::from)
                .collect(),
        }
    }
}

impl From<types::BlogSummary> for blogpb::BlogSummary {
    fn from(value: types::BlogSummary) -> Self {
        Self {
            id: Some(uuid(value.id)),
            title: value.title,
            comment_count: value.comment_count,
        }
    }
}

impl From<types::Page<types::BlogSummary>> for blogpb::ListResp {
    fn from(value: types::Page<types::BlogSummary>) -> Self {
        Self {
            blogs: value
                .items
                .into_iter()
                .map(blogpb::BlogSummary::from)
                .collect(),
            next_page_token: value.next_page_token.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    #[test]
    fn timestamp_keeps_sub_second_precision() {
        let ts = chrono::Utc
            .timestamp_opt(1_700_000_000, 123_456_000)
            .single()
            .unwrap();
        let pb = timestamp(&ts);

        assert_eq!(pb.seconds, 1_700_000_000);
        assert_eq!(pb.nanos, 123_456_000);
    }

    #[test]
    fn missing_id_stays_missing() {
        let req = GetRequest::from(blogpb::GetReq { id: None });
        assert!(req.id.is_none());

        let req = UpdateRequest::from(blogpb::UpdateReq {
            id: Some(blogpb::Uuid {
                value: "abc".into(),
            }),
            title: None,
            content: Some("body".into()),
        });
        assert_eq!(req.id.as_deref(), Some("abc"));
        assert!(req.title.is_none());
        assert_eq!(req.content.as_deref(), Some("body"));
    }

    #[test]
    fn list_response_carries_token() {
        let page = types::Page::from_probe(
            vec![
                types::BlogSummary {
                    id: "a".into(),
                    title: "A".into(),
                    comment_count: 2,
                },
                types::BlogSummary {
                    id: "b".into(),
                    title: "B".into(),
                    comment_count: 0,
                },
            ],
            types::PageSize::clamp(1),
            |s| &s.id,
        );

        let resp = blogpb::ListResp::from(page);
        assert_eq!(resp.blogs.len(), 1);
        assert_eq!(resp.blogs[0].comment_count, 2);
        assert_eq!(resp.next_page_token, "a");
    }
}
