//! Transfer handlers.

use std::sync::Arc;

use axum::{extract::rejection::JsonRejection, extract::State, Json};

use crate::auth::{SessionCredentials, TransferCredentials};
use crate::transfer::{Direction, TransferError, TransferRequest, TransferResult};
use crate::web::dto::{TransferRequestBody, TransferResponse};
use crate::web::error::{ApiError, LOGIN_REQUIRED};
use crate::web::middleware::CurrentSession;

use super::AppState;

type TransferBody = Result<Json<TransferRequestBody>, JsonRejection>;

pub async fn send_to_box(
    State(state): State<Arc<AppState>>,
    CurrentSession(session): CurrentSession,
    body: TransferBody,
) -> Result<Json<TransferResponse>, ApiError> {
    run_transfer(&state, &session, Direction::ToBox, body).await
}

pub async fn send_to_data_management(
    State(state): State<Arc<AppState>>,
    CurrentSession(session): CurrentSession,
    body: TransferBody,
) -> Result<Json<TransferResponse>, ApiError> {
    run_transfer(&state, &session, Direction::ToDataManagement, body).await
}

async fn run_transfer(
    state: &AppState,
    session: &SessionCredentials,
    direction: Direction,
    body: TransferBody,
) -> Result<Json<TransferResponse>, ApiError> {
    // Sign-in is checked before the body and before any remote call
    let credentials = TransferCredentials::resolve(session, direction)
        .ok_or_else(|| TransferError::Unauthorized(LOGIN_REQUIRED.to_string()))?;
    let Json(body) = body.map_err(|e| ApiError::new(e.status(), e.body_text()))?;

    let request = TransferRequest {
        direction,
        source_file_id: body.source_file_id,
        destination_container_id: body.destination_container_id,
    };
    respond(state.orchestrator.transfer(&request, &credentials).await)
}

fn respond(result: TransferResult) -> Result<Json<TransferResponse>, ApiError> {
    if result.is_ok() {
        return Ok(Json(TransferResponse::ok(result.file_name.unwrap_or_default())));
    }
    Err(ApiError::from_status_code(
        result.status_code,
        result.error_message.unwrap_or_default(),
    ))
}
