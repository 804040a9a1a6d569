//! HTTP/JSON gateway mirroring the gRPC service.
//!
//! Routes:
//! - `POST   /v1/blogs`
//! - `GET    /v1/blogs?pageSize=&pageToken=`
//! - `GET    /v1/blogs/{id}`
//! - `PATCH  /v1/blogs/{id}`
//! - `DELETE /v1/blogs/{id}`
//! - `POST   /v1/blogs/{id}/comments`
//!
//! Operations answering `google.protobuf.Empty` on gRPC answer `{}` here.

use std::sync::Arc;

use log::error;
use salvo::prelude::*;
use tonic::Code;

use super::{
    endpoints::{BlogEndpoint, EndpointContext},
    errors::ServerError,
};
use crate::marshal;

type ContextRef = Arc<EndpointContext>;

/// Builds the gateway router on top of the shared endpoint context.
pub fn router(ctx: ContextRef) -> Router {
    Router::with_path("v1/blogs")
        .hoop(InjectContext(ctx))
        .post(create)
        .get(list)
        .push(
            Router::with_path("{id}")
                .get(get)
                .patch(update)
                .delete(delete)
                .push(Router::with_path("comments").post(add_comment)),
        )
}

/// Makes the endpoint context available to every handler of the router.
struct InjectContext(ContextRef);

#[async_trait]
impl Handler for InjectContext {
    async fn handle(
        &self,
        req: &mut Request,
        depot: &mut Depot,
        res: &mut Response,
        ctrl: &mut FlowCtrl,
    ) {
        depot.inject(self.0.clone());
        ctrl.call_next(req, depot, res).await;
    }
}

fn context(depot: &Depot) -> Option<ContextRef> {
    depot.obtain::<ContextRef>().ok().cloned()
}

fn code_name(code: Code) -> &'static str {
    match code {
        Code::InvalidArgument => "INVALID_ARGUMENT",
        Code::NotFound => "NOT_FOUND",
        Code::DeadlineExceeded => "DEADLINE_EXCEEDED",
        _ => "INTERNAL",
    }
}

fn render_error(res: &mut Response, err: ServerError) {
    let code = err.code();
    if code == Code::Internal {
        error!("{}", err);
    }

    res.status_code(err.http_status());
    res.render(Json(marshal::ErrorResponse {
        code: code_name(code).to_owned(),
        message: err.to_string(),
    }));
}

fn render_empty(res: &mut Response) {
    res.render(Json(serde_json::json!({})));
}

/// Resolves the context and parses the JSON body, rendering the failure if any.
async fn prepare<T>(req: &mut Request, depot: &Depot, res: &mut Response) -> Option<(ContextRef, T)>
where
    T: serde::de::DeserializeOwned + Default,
{
    let Some(ctx) = context(depot) else {
        render_missing_context(res);
        return None;
    };

    let payload = match req.payload().await {
        Ok(payload) => payload,
        Err(e) => {
            render_error(
                res,
                ServerError::InvalidArgument(format!("unreadable request body: {e}")),
            );
            return None;
        }
    };
    if payload.is_empty() {
        return Some((ctx, T::default()));
    }

    match serde_json::from_slice::<T>(payload) {
        Ok(body) => Some((ctx, body)),
        Err(e) => {
            render_error(
                res,
                ServerError::InvalidArgument(format!("malformed request body: {e}")),
            );
            None
        }
    }
}

fn render_missing_context(res: &mut Response) {
    error!("endpoint context not available in depot");
    res.status_code(StatusCode::INTERNAL_SERVER_ERROR);
    res.render(Json(marshal::ErrorResponse {
        code: code_name(Code::Internal).to_owned(),
        message: "service not ready".to_owned(),
    }));
}

/// Reads the optional `pageSize` query parameter. Values beyond the `i32`
/// range saturate, they are clamped to the page size limits afterwards.
fn page_size(req: &Request) -> Result<i32, ServerError> {
    let Some(raw) = req.query::<String>("pageSize").filter(|v| !v.is_empty()) else {
        return Ok(0);
    };

    let value: i128 = raw.trim().parse().map_err(|_| {
        ServerError::InvalidArgument(format!("invalid pageSize `{raw}`"))
    })?;
    Ok(value.clamp(i32::MIN.into(), i32::MAX.into()) as i32)
}

#[handler]
async fn create(req: &mut Request, depot: &mut Depot, res: &mut Response) {
    let Some((ctx, body)) = prepare::<marshal::CreateRequest>(req, depot, res).await else {
        return;
    };

    match BlogEndpoint::create(&ctx, body, ctx.deadline()).await {
        Ok(id) => res.render(Json(marshal::IdResponse::from(id))),
        Err(e) => render_error(res, e),
    }
}

#[handler]
async fn get(req: &mut Request, depot: &mut Depot, res: &mut Response) {
    let Some(ctx) = context(depot) else {
        return render_missing_context(res);
    };
    let body = marshal::GetRequest {
        id: req.param::<String>("id"),
    };

    match BlogEndpoint::get(&ctx, body, ctx.deadline()).await {
        Ok(blog) => res.render(Json(marshal::BlogResponse::from(blog))),
        Err(e) => render_error(res, e),
    }
}

#[handler]
async fn update(req: &mut Request, depot: &mut Depot, res: &mut Response) {
    let Some((ctx, mut body)) = prepare::<marshal::UpdateRequest>(req, depot, res).await else {
        return;
    };
    body.id = req.param::<String>("id");

    match BlogEndpoint::update(&ctx, body, ctx.deadline()).await {
        Ok(()) => render_empty(res),
        Err(e) => render_error(res, e),
    }
}

#[handler]
async fn delete(req: &mut Request, depot: &mut Depot, res: &mut Response) {
    let Some(ctx) = context(depot) else {
        return render_missing_context(res);
    };
    let body = marshal::DeleteRequest {
        id: req.param::<String>("id"),
    };

    match BlogEndpoint::delete(&ctx, body, ctx.deadline()).await {
        Ok(()) => render_empty(res),
        Err(e) => render_error(res, e),
    }
}

#[handler]
async fn list(req: &mut Request, depot: &mut Depot, res: &mut Response) {
    let Some(ctx) = context(depot) else {
        return render_missing_context(res);
    };
    let page_size = match page_size(req) {
        Ok(size) => size,
        Err(e) => return render_error(res, e),
    };
    let body = marshal::ListRequest {
        page_size,
        page_token: req.query::<String>("pageToken").unwrap_or_default(),
    };

    match BlogEndpoint::list(&ctx, body, ctx.deadline()).await {
        Ok(page) => res.render(Json(marshal::ListResponse::from(page))),
        Err(e) => render_error(res, e),
    }
}

#[handler]
async fn add_comment(req: &mut Request, depot: &mut Depot, res: &mut Response) {
    let Some((ctx, mut body)) = prepare::<marshal::AddCommentRequest>(req, depot, res).await
    else {
        return;
    };
    body.id = req.param::<String>("id");

    match BlogEndpoint::add_comment(&ctx, body, ctx.deadline()).await {
        Ok(_) => render_empty(res),
        Err(e) => render_error(res, e),
    }
}
