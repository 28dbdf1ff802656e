//! HTTP handlers for the contract analysis API.

use std::sync::Arc;

use axum::{
    extract::{Multipart, State},
    http::header,
    response::{IntoResponse, Response},
    Json,
};
use chrono::Utc;
use serde_json::{json, Value};

use clause_guard_core::{
    analyze_with_model, build_report, render_pdf, try_extract_text, AnalysisRecord,
};

use crate::error::ApiError;
use crate::models::{AnalyzeRequest, AnalyzeResponse};
use crate::state::AppState;

pub async fn root() -> Json<Value> {
    Json(json!({
        "message": "Contract risk analyzer API",
        "status": "running",
    }))
}

pub async fn health() -> Json<Value> {
    Json(json!({
        "status": "healthy",
        "timestamp": Utc::now().to_rfc3339(),
    }))
}

/// Analyze contract text supplied as JSON.
pub async fn analyze(
    State(state): State<Arc<AppState>>,
    Json(request): Json<AnalyzeRequest>,
) -> Result<Json<AnalyzeResponse>, ApiError> {
    let record = run_analysis(&state, &request.content, &request.filename).await;
    Ok(Json(record.into()))
}

/// Analyze an uploaded contract file.
pub async fn analyze_file(
    State(state): State<Arc<AppState>>,
    multipart: Multipart,
) -> Result<Json<AnalyzeResponse>, ApiError> {
    let (filename, text) = read_document(multipart).await?;
    let record = run_analysis(&state, &text, &filename).await;
    Ok(Json(record.into()))
}

/// Analyze contract text and return a PDF report.
pub async fn generate_report(
    State(state): State<Arc<AppState>>,
    Json(request): Json<AnalyzeRequest>,
) -> Result<Response, ApiError> {
    let record = run_analysis(&state, &request.content, &request.filename).await;
    pdf_response(record)
}

/// Analyze an uploaded contract file and return a PDF report.
pub async fn analyze_file_report(
    State(state): State<Arc<AppState>>,
    multipart: Multipart,
) -> Result<Response, ApiError> {
    let (filename, text) = read_document(multipart).await?;
    let record = run_analysis(&state, &text, &filename).await;
    pdf_response(record)
}

async fn run_analysis(state: &AppState, content: &str, filename: &str) -> AnalysisRecord {
    let result = analyze_with_model(content, state.model.as_deref()).await;
    let record = AnalysisRecord::new(filename, result);
    tracing::info!(
        analysis_id = %record.analysis_id,
        risk_level = %record.result.risk_level,
        risk_score = record.result.risk_score,
        "analysis completed"
    );
    record
}

/// Pull the uploaded document out of the multipart body and extract its text.
async fn read_document(mut multipart: Multipart) -> Result<(String, String), ApiError> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|err| ApiError::InvalidRequest(format!("Invalid multipart body: {err}")))?
    {
        if field.name() != Some("file") {
            continue;
        }
        let filename = field
            .file_name()
            .map(str::to_string)
            .ok_or_else(|| ApiError::InvalidRequest("No file provided".to_string()))?;
        let mime = field
            .content_type()
            .map(str::to_string)
            .unwrap_or_else(|| "text/plain".to_string());
        let bytes = field
            .bytes()
            .await
            .map_err(|err| ApiError::InvalidRequest(format!("Failed to read file: {err}")))?;
        let text = try_extract_text(&bytes, &mime)
            .map_err(|err| ApiError::Document(err.to_string()))?;
        return Ok((filename, text));
    }
    Err(ApiError::InvalidRequest("No file provided".to_string()))
}

fn pdf_response(record: AnalysisRecord) -> Result<Response, ApiError> {
    let report = build_report(&record);
    let bytes = render_pdf(&report).map_err(|err| ApiError::Internal(err.into()))?;
    let short_id: String = record.analysis_id.chars().take(8).collect();
    Ok((
        [
            (header::CONTENT_TYPE, "application/pdf".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=contract_analysis_{short_id}.pdf"),
            ),
        ],
        bytes,
    )
        .into_response())
}
