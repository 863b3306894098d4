use axum::extract::{DefaultBodyLimit, Multipart, Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};
use paysnap_core::{ExtractionResult, OcrToken};
use paysnap_storage::PaymentRecord;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::trace::TraceLayer;

use crate::error::ApiError;
use crate::state::AppState;

const IMAGE_FIELD: &str = "image";

pub fn router(state: Arc<AppState>, body_limit_bytes: usize) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/upload", post(upload))
        .route("/extract", post(extract))
        .route("/history", get(history))
        .route("/history/{id}", get(history_entry).delete(delete_history_entry))
        .with_state(state)
        .layer(DefaultBodyLimit::disable())
        .layer(RequestBodyLimitLayer::new(body_limit_bytes))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}

async fn health() -> impl IntoResponse {
    (StatusCode::OK, Json(serde_json::json!({ "status": "ok" })))
}

#[derive(Debug, Serialize, Deserialize)]
pub struct UploadResponse {
    pub id: i64,
    #[serde(flatten)]
    pub result: ExtractionResult,
    pub image_hash: String,
    /// Earlier payment stored for the same image.
    pub duplicate_of: Option<i64>,
}

/// Multipart upload of a receipt image in the `image` field.
async fn upload(
    State(state): State<Arc<AppState>>,
    mut multipart: Multipart,
) -> Result<Json<UploadResponse>, ApiError> {
    let mut image = None;
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::BadRequest(e.to_string()))?
    {
        if field.name() == Some(IMAGE_FIELD) {
            let data = field
                .bytes()
                .await
                .map_err(|e| ApiError::BadRequest(e.to_string()))?;
            image = Some(data);
            break;
        }
    }
    let data = image
        .filter(|d| !d.is_empty())
        .ok_or_else(|| ApiError::BadRequest("No file uploaded".to_string()))?;

    let worker = state.clone();
    let outcome = tokio::task::spawn_blocking(move || worker.pipeline.process_bytes(&data))
        .await
        .map_err(|e| ApiError::Internal(format!("OCR task failed: {e}")))??;

    let duplicate_of = paysnap_storage::find_payment_by_hash(&state.db, &outcome.image_hash)
        .await?
        .map(|p| p.id);
    let id =
        paysnap_storage::insert_payment(&state.db, &outcome.result, Some(&outcome.image_hash))
            .await?;

    tracing::info!(
        id,
        image_hash = %outcome.image_hash,
        amount = %outcome.result.amount,
        duplicate_of = ?duplicate_of,
        "receipt stored"
    );

    Ok(Json(UploadResponse {
        id,
        result: outcome.result,
        image_hash: outcome.image_hash,
        duplicate_of,
    }))
}

#[derive(Debug, Deserialize)]
pub struct ExtractRequest {
    pub tokens: Vec<OcrToken>,
    #[serde(default)]
    pub save: bool,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ExtractResponse {
    pub id: Option<i64>,
    #[serde(flatten)]
    pub result: ExtractionResult,
}

/// Run the extractor on tokens produced by an OCR engine elsewhere.
async fn extract(
    State(state): State<Arc<AppState>>,
    Json(request): Json<ExtractRequest>,
) -> Result<Json<ExtractResponse>, ApiError> {
    let result = state.pipeline.extractor().extract(&request.tokens)?;
    let id = if request.save {
        let id = paysnap_storage::insert_payment(&state.db, &result, None).await?;
        tracing::info!(id, amount = %result.amount, "extraction stored");
        Some(id)
    } else {
        None
    };
    Ok(Json(ExtractResponse { id, result }))
}

#[derive(Debug, Serialize)]
pub struct HistoryResponse {
    pub payments: Vec<PaymentRecord>,
}

async fn history(State(state): State<Arc<AppState>>) -> Result<Json<HistoryResponse>, ApiError> {
    let payments = paysnap_storage::get_all_payments(&state.db).await?;
    Ok(Json(HistoryResponse { payments }))
}

async fn history_entry(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> Result<Json<PaymentRecord>, ApiError> {
    paysnap_storage::get_payment_by_id(&state.db, id)
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::NotFound(format!("Payment {id} not found")))
}

async fn delete_history_entry(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> Result<StatusCode, ApiError> {
    if paysnap_storage::delete_payment(&state.db, id).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(ApiError::NotFound(format!("Payment {id} not found")))
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
