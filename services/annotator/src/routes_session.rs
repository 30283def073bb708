use axum::{extract::{Path, State}, http::StatusCode, Json};
use serde::Deserialize;

use annotation::{Action, View};
use datasets::TaskKind;

use crate::state::SharedState;

pub type ViewResponse = (StatusCode, Json<View>);

#[derive(Deserialize)]
pub struct DatasetReq {
    pub name: String,
}

#[derive(Deserialize)]
pub struct TaskReq {
    pub task: TaskKind,
}

#[derive(Deserialize)]
pub struct EditCellReq {
    pub column: String,
    pub value: String,
}

/// Run one action against the session; an error banner maps to 422.
pub async fn run(state: &SharedState, action: Action) -> ViewResponse {
    let view = state.session.lock().await.dispatch(action).await;
    let status = match &view.banner {
        Some(b) if b.is_error() => StatusCode::UNPROCESSABLE_ENTITY,
        _ => StatusCode::OK,
    };
    (status, Json(view))
}

pub async fn get_view(State(state): State<SharedState>) -> Json<View> {
    Json(state.session.lock().await.view())
}

pub async fn post_action(
    State(state): State<SharedState>,
    Json(action): Json<Action>,
) -> ViewResponse {
    run(&state, action).await
}

pub async fn post_dataset(
    State(state): State<SharedState>,
    Json(req): Json<DatasetReq>,
) -> ViewResponse {
    run(&state, Action::SetDatasetName { name: req.name }).await
}

pub async fn post_task(
    State(state): State<SharedState>,
    Json(req): Json<TaskReq>,
) -> ViewResponse {
    run(&state, Action::SelectTask { task: req.task }).await
}

pub async fn post_row(State(state): State<SharedState>) -> ViewResponse {
    run(&state, Action::AddRow).await
}

pub async fn patch_row(
    State(state): State<SharedState>,
    Path(row): Path<usize>,
    Json(req): Json<EditCellReq>,
) -> ViewResponse {
    run(&state, Action::EditCell { row, column: req.column, value: req.value }).await
}

pub async fn delete_row(
    State(state): State<SharedState>,
    Path(row): Path<usize>,
) -> ViewResponse {
    run(&state, Action::DeleteRow { row }).await
}
