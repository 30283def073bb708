use axum::{
    extract::{Path, State},
    http::{header, StatusCode},
    response::IntoResponse,
    Json,
};
use serde::Serialize;

use annotation::Action;

use crate::routes_session::{run, ViewResponse};
use crate::state::SharedState;

#[derive(Serialize)]
pub struct ApiError {
    pub error: String,
}

pub async fn post_save(State(state): State<SharedState>) -> ViewResponse {
    run(&state, Action::Save).await
}

pub async fn post_export(State(state): State<SharedState>) -> ViewResponse {
    run(&state, Action::Export).await
}

/// Serve the most recent export as an attachment.
pub async fn get_download(
    State(state): State<SharedState>,
    Path(file_name): Path<String>,
) -> Result<impl IntoResponse, (StatusCode, Json<ApiError>)> {
    let download = state
        .session
        .lock()
        .await
        .download(&file_name)
        .cloned()
        .ok_or_else(|| {
            (
                StatusCode::NOT_FOUND,
                Json(ApiError { error: format!("no export named {file_name}") }),
            )
        })?;

    Ok((
        [
            (header::CONTENT_TYPE, download.mime.to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}\"", download.file_name),
            ),
        ],
        download.data,
    ))
}
