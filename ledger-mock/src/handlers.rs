/// Axum HTTP handlers for the fullnode transaction API

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use std::sync::Arc;

use crate::store::{to_response, LedgerStore, StoreError};
use crate::types::*;

/// Shared application state
pub type AppState = Arc<LedgerStore>;

/// Custom error type for handlers
pub enum ApiError {
    NotFound(String),
    Conflict(String),
    BadRequest(String),
}

impl ApiError {
    fn parts(self) -> (StatusCode, &'static str, String) {
        match self {
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, "transaction_not_found", msg),
            ApiError::Conflict(msg) => (StatusCode::CONFLICT, "transaction_already_committed", msg),
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "invalid_input", msg),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_code, message) = self.parts();
        let body = ErrorResponse {
            message,
            error_code: error_code.to_string(),
        };

        (status, Json(body)).into_response()
    }
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::UnknownTransaction(_) => ApiError::NotFound(err.to_string()),
            StoreError::AlreadyCommitted(_) => ApiError::Conflict(err.to_string()),
        }
    }
}

/// GET /v1/transactions/by_hash/{hash}
/// Returns the pending or committed transaction as fullnode JSON
pub async fn get_transaction_by_hash(
    State(store): State<AppState>,
    Path(hash): Path<String>,
) -> Result<Json<TransactionResponse>, ApiError> {
    store.response(&hash).map(Json).ok_or_else(|| {
        ApiError::NotFound(format!(
            "Transaction not found by Transaction hash({})",
            hash
        ))
    })
}

/// POST /v1/mock/transactions
/// Seeds a transaction as pending, successful or failed
pub async fn seed_transaction(
    State(store): State<AppState>,
    Json(request): Json<SeedTransactionRequest>,
) -> Result<(StatusCode, Json<TransactionResponse>), ApiError> {
    if request.hash.trim().is_empty() {
        return Err(ApiError::BadRequest("hash must not be empty".to_string()));
    }

    let status = store.seed(&request.hash, request.status, request.vm_status);
    Ok((StatusCode::CREATED, Json(to_response(&request.hash, status))))
}

/// POST /v1/mock/transactions/{hash}/commit
/// Commits a pending transaction at the next ledger version
pub async fn commit_transaction(
    State(store): State<AppState>,
    Path(hash): Path<String>,
    Json(request): Json<CommitRequest>,
) -> Result<Json<TransactionResponse>, ApiError> {
    let status = store.commit(&hash, request.success, request.vm_status)?;
    Ok(Json(to_response(&hash, status)))
}

/// GET /health
pub async fn health_check(State(store): State<AppState>) -> impl IntoResponse {
    Json(json!({
        "status": "ok",
        "transactions": store.len(),
    }))
}
