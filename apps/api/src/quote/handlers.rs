//! Axum route handler for the Quote API.

use axum::{
    extract::State,
    http::header,
    response::{IntoResponse, Response},
    Json,
};
use chrono::Local;
use serde::Deserialize;
use tracing::info;

use crate::errors::AppError;
use crate::layout::fonts::FontSet;
use crate::pricing::handlers::{compute_estimate, EstimateRequest};
use crate::quote::builder::{build_quote, quote_file_name};
use crate::quote::models::{PartyInfo, QuoteMetadata, QuoteRequest};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct QuoteBody {
    pub job: EstimateRequest,
    #[serde(default)]
    pub vendor: PartyInfo,
    #[serde(default)]
    pub client: PartyInfo,
    #[serde(default)]
    pub metadata: QuoteMetadata,
}

/// POST /api/v1/quote
///
/// Estimates the job and returns the quote as a downloadable PDF named
/// `quote_<YYYYMMDD_HHMMSS>.pdf`.
pub async fn handle_quote(
    State(state): State<AppState>,
    Json(body): Json<QuoteBody>,
) -> Result<Response, AppError> {
    let input = body.job.to_input()?;
    let (estimate, _) = compute_estimate(&state, &input)?;

    let now = Local::now().naive_local();
    let request = QuoteRequest {
        input,
        estimate,
        vendor: body.vendor,
        client: body.client,
        metadata: body.metadata,
        issued_on: now.date(),
    };

    // Font discovery reads files and layout is CPU-bound: keep both off the executor.
    let font_dir = state.config.font_dir.clone();
    let page_config = state.page_config.clone();
    let rendered = tokio::task::spawn_blocking(move || {
        let fonts = FontSet::discover(&font_dir);
        build_quote(&request, &fonts, &page_config)
    })
    .await
    .map_err(|e| {
        AppError::Internal(anyhow::anyhow!("spawn_blocking failed in quote build: {e}"))
    })??;

    let file_name = quote_file_name(now);
    info!(
        "Built {file_name}: {} page(s), {} bytes, {:?} text",
        rendered.page_count,
        rendered.bytes.len(),
        rendered.mode
    );

    Ok((
        [
            (header::CONTENT_TYPE, "application/pdf".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{file_name}\""),
            ),
        ],
        rendered.bytes,
    )
        .into_response())
}
