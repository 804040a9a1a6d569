use log::{info, trace, warn};

use super::EndpointContext;
use crate::{
    marshal,
    server::{Deadline, errors::ServerError},
    types,
};

/// Handler for all blog related requests.
pub struct BlogEndpoint;

impl BlogEndpoint {
    pub async fn create(
        ctx: &EndpointContext,
        req: marshal::CreateRequest,
        deadline: Deadline,
    ) -> Result<types::Id, ServerError> {
        let title = required(req.title, "title")?;
        let content = required(req.content, "content")?;

        info!("requested blog creation");

        let id = deadline
            .run("create blog", |budget| {
                ctx.store.create(&title, &content, budget)
            })
            .await?;

        trace!("blog `{}` created", id);
        Ok(id)
    }

    pub async fn get(
        ctx: &EndpointContext,
        req: marshal::GetRequest,
        deadline: Deadline,
    ) -> Result<types::BlogPost, ServerError> {
        let id = required_id(req.id)?;

        info!("requested blog `{}`", id);

        deadline
            .run("get blog", |budget| ctx.store.get(&id, budget))
            .await
    }

    pub async fn update(
        ctx: &EndpointContext,
        req: marshal::UpdateRequest,
        deadline: Deadline,
    ) -> Result<(), ServerError> {
        let id = required_id(req.id)?;
        if req.title.as_deref() == Some("") {
            return Err(ServerError::InvalidArgument(
                "title cannot be empty".to_owned(),
            ));
        }

        let patch = types::BlogPatch::new(req.title, req.content);
        info!("requested update of blog `{}`", id);
        if patch.is_empty() {
            trace!("no fields to update for blog `{}`", id);
        }

        deadline
            .run("update blog", |budget| ctx.store.update(&id, patch, budget))
            .await
    }

    pub async fn delete(
        ctx: &EndpointContext,
        req: marshal::DeleteRequest,
        deadline: Deadline,
    ) -> Result<(), ServerError> {
        let id = required_id(req.id)?;

        warn!("requested deletion of blog `{}`", id);

        deadline
            .run("delete blog", |budget| ctx.store.delete(&id, budget))
            .await
    }

    pub async fn list(
        ctx: &EndpointContext,
        req: marshal::ListRequest,
        deadline: Deadline,
    ) -> Result<types::Page<types::BlogSummary>, ServerError> {
        let size = types::PageSize::clamp(req.page_size);
        let token = types::PageToken::from(req.page_token);

        info!(
            "listing blogs (requested size {}, using {})",
            req.page_size,
            size.get()
        );

        let page = deadline
            .run("list blogs", |budget| ctx.store.list(size, &token, budget))
            .await?;

        trace!(
            "returning {} blogs, last page: {}",
            page.items.len(),
            page.next_page_token.is_end()
        );
        Ok(page)
    }

    pub async fn add_comment(
        ctx: &EndpointContext,
        req: marshal::AddCommentRequest,
        deadline: Deadline,
    ) -> Result<types::Id, ServerError> {
        let blog_id = required_id(req.id)?;
        let content = required(req.content, "comment content")?;
        let author = required(req.author, "comment author")?;

        info!("new comment for blog `{}`", blog_id);

        deadline
            .run(
                "add comment",
                |budget| ctx.store.add_comment(&blog_id, &content, &author, budget),
            )
            .await
    }
}

fn required(value: String, field: &str) -> Result<String, ServerError> {
    if value.is_empty() {
        return Err(ServerError::missing(field));
    }
    Ok(value)
}

fn required_id(value: Option<String>) -> Result<types::Id, ServerError> {
    match value {
        Some(id) if !id.is_empty() => Ok(types::Id::from(id)),
        _ => Err(ServerError::missing("blog ID")),
    }
}
