//! Quote documents as HTML downloads.

use axum::body::Bytes;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::header;
use axum::response::{IntoResponse, Response};
use axum::Json;
use chrono::Utc;
use serde::Deserialize;
use solar_core::{estimate_savings, QuoteResult};
use tracing::info;

use crate::config::CompanyProfile;
use crate::error::{ApiError, ApiResult};
use crate::render::{render_quote, QuoteDocument};
use crate::routes::quotes::parse_session_id;
use crate::state::AppState;

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionDocumentRequest {
    #[serde(default)]
    pub company_info: Option<CompanyProfile>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateDocumentRequest {
    pub quote_data: QuoteResult,
    #[serde(default)]
    pub company_info: Option<CompanyProfile>,
}

/// `POST /api/quotes/{id}/document`: renders a stored session. The body is
/// optional and may carry `companyInfo` overrides.
pub async fn for_session(
    State(state): State<AppState>,
    Path(id): Path<String>,
    body: Bytes,
) -> ApiResult<Response> {
    let request: SessionDocumentRequest = if body.iter().all(u8::is_ascii_whitespace) {
        SessionDocumentRequest::default()
    } else {
        serde_json::from_slice(&body).map_err(|e| ApiError::validation(e.to_string()))?
    };

    let session_id = parse_session_id(&id)?;
    let session = state
        .sessions
        .get(&session_id)
        .ok_or_else(|| ApiError::not_found("Quote", &id))?;

    let company = state.company.merged_with(&request.company_info.unwrap_or_default());
    let document = render_quote(&session.to_result(), &session.savings, &company, Utc::now());
    info!(session = %session_id, file = %document.filename, "Quote document rendered");

    Ok(attachment(document))
}

/// `POST /api/generate-document`: renders a quote the caller holds.
pub async fn generate(
    State(state): State<AppState>,
    payload: Result<Json<GenerateDocumentRequest>, JsonRejection>,
) -> ApiResult<Response> {
    let Json(request) = payload?;
    let data = request.quote_data;

    let savings = estimate_savings(
        data.system.power_kw,
        data.customer.electricity_price,
        data.quote.total,
    );
    let company = state.company.merged_with(&request.company_info.unwrap_or_default());
    let document = render_quote(&data, &savings, &company, Utc::now());
    info!(file = %document.filename, "Quote document rendered");

    Ok(attachment(document))
}

fn attachment(document: QuoteDocument) -> Response {
    (
        [
            (header::CONTENT_TYPE, "text/html; charset=utf-8".to_string()),
            (header::CONTENT_DISPOSITION, content_disposition(&document.filename)),
        ],
        document.html,
    )
        .into_response()
}

/// `attachment` with an ASCII fallback name and the RFC 5987 UTF-8 name.
fn content_disposition(filename: &str) -> String {
    let fallback: String = filename
        .chars()
        .map(|c| if c.is_ascii_graphic() && c != '"' && c != '\\' { c } else { '_' })
        .collect();
    format!(
        "attachment; filename=\"{}\"; filename*=UTF-8''{}",
        fallback,
        percent_encode(filename)
    )
}

/// Percent-encodes everything outside the RFC 5987 `attr-char` set.
fn percent_encode(value: &str) -> String {
    let mut out = String::with_capacity(value.len() * 3);
    for byte in value.bytes() {
        match byte {
            b'A'..=b'Z'
            | b'a'..=b'z'
            | b'0'..=b'9'
            | b'!' | b'#' | b'$' | b'&' | b'+' | b'-' | b'.' | b'^' | b'_' | b'`' | b'|' | b'~' => {
                out.push(byte as char)
            }
            _ => out.push_str(&format!("%{:02X}", byte)),
        }
    }
    out
}
