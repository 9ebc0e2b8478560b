//! `/subjects` handlers.
//!
//! Bodies are decoded into `serde_json::Value` first so every malformed
//! payload, syntax or shape, answers 400 with the same body.

use crate::error::ApiError;
use crate::state::AppState;
use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    routing::{get, put},
    Json, Router,
};
use notebook_core::{Subject, SubjectId, SubjectInput};
use serde_json::{json, Value};

pub fn subject_routes(state: AppState) -> Router {
    Router::new()
        .route("/subjects", get(list_subjects).post(create_subject))
        .route("/subjects/:id", put(replace_subject).delete(delete_subject))
        .with_state(state)
}

async fn list_subjects(State(state): State<AppState>) -> Result<Json<Vec<Subject>>, ApiError> {
    let subjects = state.with_store(|service| service.list_subjects()).await?;
    Ok(Json(subjects))
}

async fn create_subject(
    State(state): State<AppState>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<(StatusCode, Json<Subject>), ApiError> {
    let input = decode_input(payload)?;
    let created = state
        .with_store(move |service| service.create_subject(input))
        .await?;
    Ok((StatusCode::CREATED, Json(created)))
}

async fn replace_subject(
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<Json<Subject>, ApiError> {
    let id = parse_id(&id)?;
    let input = decode_input(payload)?;
    let replaced = state
        .with_store(move |service| service.replace_subject(id, input))
        .await?;
    Ok(Json(replaced))
}

async fn delete_subject(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Value>, ApiError> {
    let id = parse_id(&id)?;
    state
        .with_store(move |service| service.delete_subject(id))
        .await?;
    Ok(Json(json!({ "message": "Deleted" })))
}

/// Ids that are not UUIDs cannot name a stored subject.
fn parse_id(raw: &str) -> Result<SubjectId, ApiError> {
    SubjectId::parse_str(raw).map_err(|_| ApiError::NotFound)
}

fn decode_input(payload: Result<Json<Value>, JsonRejection>) -> Result<SubjectInput, ApiError> {
    let Json(value) = payload.map_err(|rejection| ApiError::Validation(rejection.body_text()))?;
    SubjectInput::from_json_value(value).map_err(|err| ApiError::Validation(err.to_string()))
}
