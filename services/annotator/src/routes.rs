use axum::{
    extract::{Request, State},
    http::{header, HeaderValue, Method, StatusCode},
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::{get, patch, post},
    Json, Router,
};
use tower_http::cors::CorsLayer;
use tracing::warn;

use crate::routes_files::*;
use crate::routes_session::*;
use crate::state::SharedState;

/// Build the HTTP surface. Browser requests are accepted only from the
/// service's own host or from `allowed_origin`; without one no CORS headers
/// are sent.
pub fn router(state: SharedState, allowed_origin: Option<HeaderValue>) -> Router {
    let app = Router::new()
        .route("/view", get(get_view))
        .route("/actions", post(post_action))
        .route("/dataset", post(post_dataset))
        .route("/task", post(post_task))
        .route("/rows", post(post_row))
        .route("/rows/:row", patch(patch_row).delete(delete_row))
        .route("/save", post(post_save))
        .route("/export", post(post_export))
        .route("/downloads/:file_name", get(get_download))
        .layer(middleware::from_fn_with_state(allowed_origin.clone(), guard_origin))
        .with_state(state);

    match allowed_origin {
        Some(origin) => app.layer(
            CorsLayer::new()
                .allow_origin(origin)
                .allow_methods([Method::GET, Method::POST, Method::PATCH, Method::DELETE])
                .allow_headers([header::CONTENT_TYPE]),
        ),
        None => app,
    }
}

async fn guard_origin(
    State(allowed): State<Option<HeaderValue>>,
    req: Request,
    next: Next,
) -> Response {
    let Some(origin) = req.headers().get(header::ORIGIN).cloned() else {
        return next.run(req).await;
    };
    if allowed.as_ref() == Some(&origin) || is_same_host(&origin, req.headers().get(header::HOST)) {
        return next.run(req).await;
    }

    warn!(origin = ?origin, path = %req.uri().path(), "rejected cross-origin request");
    let body = ApiError { error: "origin not allowed".to_string() };
    (StatusCode::FORBIDDEN, Json(body)).into_response()
}

fn is_same_host(origin: &HeaderValue, host: Option<&HeaderValue>) -> bool {
    let (Ok(origin), Some(Ok(host))) = (origin.to_str(), host.map(|h| h.to_str())) else {
        return false;
    };
    origin
        .strip_prefix("http://")
        .or_else(|| origin.strip_prefix("https://"))
        .is_some_and(|rest| rest.eq_ignore_ascii_case(host))
}
