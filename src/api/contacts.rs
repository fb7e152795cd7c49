use axum::extract::rejection::{JsonRejection, PathRejection};
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use serde_json::Value;

use crate::api::AppState;
use crate::domain::{ContactId, ContactInsert, ContactRecord, ContactUpdate};
use crate::error::AppError;

fn body(payload: Result<Json<Value>, JsonRejection>) -> Result<Value, AppError> {
    payload
        .map(|Json(value)| value)
        .map_err(|e| AppError::BadRequest(e.body_text()))
}

fn contact_id(path: Result<Path<i64>, PathRejection>) -> Result<ContactId, AppError> {
    path.map(|Path(id)| ContactId::new(id))
        .map_err(|e| AppError::BadRequest(e.body_text()))
}

pub async fn create_contact(
    State(state): State<AppState>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<(StatusCode, Json<ContactRecord>), AppError> {
    let insert = ContactInsert::from_json(&body(payload)?)?;
    let record = state.store.insert(insert).await?;
    Ok((StatusCode::CREATED, Json(record)))
}

pub async fn get_contact(
    path: Result<Path<i64>, PathRejection>,
    State(state): State<AppState>,
) -> Result<Json<ContactRecord>, AppError> {
    let id = contact_id(path)?;
    Ok(Json(state.store.read(id).await?))
}

pub async fn update_contact(
    path: Result<Path<i64>, PathRejection>,
    State(state): State<AppState>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<Json<ContactRecord>, AppError> {
    let id = contact_id(path)?;
    let update = ContactUpdate::from_json(&body(payload)?)?;
    Ok(Json(state.store.update(id, update).await?))
}
