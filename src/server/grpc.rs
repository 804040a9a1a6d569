use std::sync::Arc;

use tonic::{Request, Response, Status};

use super::{
    Deadline,
    endpoints::{BlogEndpoint, EndpointContext},
};
use crate::{blogpb, marshal};

/// gRPC front of the blog endpoints.
#[derive(Clone)]
pub struct BlogService {
    ctx: Arc<EndpointContext>,
}

impl BlogService {
    pub fn new(ctx: Arc<EndpointContext>) -> Self {
        Self { ctx }
    }

    pub fn into_server(self) -> blogpb::blogs_server::BlogsServer<Self> {
        blogpb::blogs_server::BlogsServer::new(self)
    }

    fn deadline<T>(&self, request: &Request<T>) -> Deadline {
        let grpc_timeout = request
            .metadata()
            .get("grpc-timeout")
            .and_then(|v| v.to_str().ok());
        self.ctx.deadline().narrowed_by(grpc_timeout)
    }
}

#[tonic::async_trait]
impl blogpb::blogs_server::Blogs for BlogService {
    async fn create(
        &self,
        request: Request<blogpb::CreateReq>,
    ) -> Result<Response<blogpb::CreateResp>, Status> {
        let deadline = self.deadline(&request);
        let req = marshal::CreateRequest::from(request.into_inner());

        let id = BlogEndpoint::create(&self.ctx, req, deadline).await?;

        Ok(Response::new(blogpb::CreateResp {
            id: Some(marshal::uuid(id)),
        }))
    }

    async fn get(
        &self,
        request: Request<blogpb::GetReq>,
    ) -> Result<Response<blogpb::GetResp>, Status> {
        let deadline = self.deadline(&request);
        let req = marshal::GetRequest::from(request.into_inner());

        let blog = BlogEndpoint::get(&self.ctx, req, deadline).await?;

        Ok(Response::new(blogpb::GetResp {
            blog: Some(blog.into()),
        }))
    }

    async fn update(&self, request: Request<blogpb::UpdateReq>) -> Result<Response<()>, Status> {
        let deadline = self.deadline(&request);
        let req = marshal::UpdateRequest::from(request.into_inner());

        BlogEndpoint::update(&self.ctx, req, deadline).await?;

        Ok(Response::new(()))
    }

    async fn delete(&self, request: Request<blogpb::DeleteReq>) -> Result<Response<()>, Status> {
        let deadline = self.deadline(&request);
        let req = marshal::DeleteRequest::from(request.into_inner());

        BlogEndpoint::delete(&self.ctx, req, deadline).await?;

        Ok(Response::new(()))
    }

    async fn list(
        &self,
        request: Request<blogpb::ListReq>,
    ) -> Result<Response<blogpb::ListResp>, Status> {
        let deadline = self.deadline(&request);
        let req = marshal::ListRequest::from(request.into_inner());

        let page = BlogEndpoint::list(&self.ctx, req, deadline).await?;

        Ok(Response::new(page.into()))
    }

    async fn add_comment(
        &self,
        request: Request<blogpb::AddCommentReq>,
    ) -> Result<Response<()>, Status> {
        let deadline = self.deadline(&request);
        let req = marshal::AddCommentRequest::from(request.into_inner());

        BlogEndpoint::add_comment(&self.ctx, req, deadline).await?;

        Ok(Response::new(()))
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use tonic::Code;

    use super::*;
    use crate::blogpb::blogs_server::Blogs;
    use crate::traits::testing::MemoryStore;

    fn service(store: MemoryStore) -> (BlogService, Arc<MemoryStore>) {
        let store = Arc::new(store);
        let ctx = EndpointContext::new(store.clone());
        (BlogService::new(Arc::new(ctx)), store)
    }

    #[tokio::test]
    async fn create_get_and_comment() {
        let (svc, _) = service(MemoryStore::new());

        let created = svc
            .create(Request::new(blogpb::CreateReq {
                title: "Test Blog".into(),
                content: "This is a test blog content".into(),
            }))
            .await
            .unwrap()
            .into_inner();
        let id = created.id.unwrap();
        assert!(!id.value.is_empty());

        svc.add_comment(Request::new(blogpb::AddCommentReq {
            id: Some(id.clone()),
            content: "first".into(),
            author: "ann".into(),
        }))
        .await
        .unwrap();

        let blog = svc
            .get(Request::new(blogpb::GetReq { id: Some(id.clone()) }))
            .await
            .unwrap()
            .into_inner()
            .blog
            .unwrap();

        assert_eq!(blog.id, Some(id));
        assert_eq!(blog.title, "Test Blog");
        assert_eq!(blog.comments.len(), 1);
        assert_eq!(blog.comments[0].author, "ann");
        assert!(blog.created_at.is_some());
    }

    #[tokio::test]
    async fn errors_map_to_status_codes() {
        let (svc, store) = service(MemoryStore::new());

        let status = svc
            .get(Request::new(blogpb::GetReq { id: None }))
            .await
            .unwrap_err();
        assert_eq!(status.code(), Code::InvalidArgument);
        assert_eq!(status.message(), "blog ID is required");

        let status = svc
            .delete(Request::new(blogpb::DeleteReq {
                id: Some(blogpb::Uuid {
                    value: "missing".into(),
                }),
            }))
            .await
            .unwrap_err();
        assert_eq!(status.code(), Code::NotFound);
        assert_eq!(store.calls(), 1);
    }

    #[tokio::test]
    async fn caller_timeout_narrows_the_budget() {
        let (svc, _) = service(MemoryStore::slow(Duration::from_secs(5)));

        let mut request = Request::new(blogpb::ListReq {
            page_size: 10,
            page_token: String::new(),
        });
        request
            .metadata_mut()
            .insert("grpc-timeout", "20m".parse().unwrap());

        let status = svc.list(request).await.unwrap_err();
        assert_eq!(status.code(), Code::DeadlineExceeded);
    }
}
