//! Catalog listing and replacement.

use axum::body::Bytes;
use axum::extract::State;
use axum::Json;
use serde::Serialize;
use solar_core::Catalog;
use tracing::info;

use crate::error::{ApiError, ApiResult};
use crate::state::AppState;

/// `GET /api/equipment`: the catalog currently used for quoting.
pub async fn list(State(state): State<AppState>) -> Json<Catalog> {
    Json(Catalog::clone(&state.catalog.snapshot()))
}

#[derive(Debug, Serialize)]
pub struct UploadResponse {
    pub message: String,
    /// Name of the persisted upload.
    pub file: String,
    pub items: usize,
}

/// `POST /api/upload-database`: replaces the catalog with the JSON body.
///
/// The body is validated in full before anything is written; a rejected
/// upload leaves the current catalog live.
pub async fn upload(State(state): State<AppState>, body: Bytes) -> ApiResult<Json<UploadResponse>> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Err(ApiError::validation("No catalog uploaded"));
    }

    let receipt = state.catalog.replace_from_bytes(&body).await?;
    let file = receipt
        .path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    info!(file = %file, items = receipt.items, "Catalog upload accepted");

    Ok(Json(UploadResponse {
        message: "Catalog updated".to_string(),
        file,
        items: receipt.items,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;
    use crate::routes::test_support;

    #[tokio::test]
    async fn test_list_returns_current_catalog() {
        let state = test_support::state();
        let Json(catalog) = list(State(state)).await;
        assert_eq!(catalog.pv_panels.len(), 5);
        assert_eq!(catalog.inverters[0].code, "INV-5-1");
    }

    #[tokio::test]
    async fn test_upload_swaps_catalog() {
        let state = test_support::state();
        let body = Bytes::from_static(
            br#"{"pvPanels":[{"code":"PV-1","name":"Panel","powerW":500,"price":3000000,"warranty":25}]}"#,
        );

        let Json(response) = upload(State(state.clone()), body).await.unwrap();
        assert_eq!(response.items, 1);
        assert!(response.file.starts_with("uploaded_"));

        let Json(catalog) = list(State(state.clone())).await;
        assert_eq!(catalog.pv_panels.len(), 1);
        let _ = tokio::fs::remove_dir_all(&state.catalog.config().upload_dir).await;
    }

    #[tokio::test]
    async fn test_upload_rejects_empty_and_invalid_bodies() {
        let state = test_support::state();

        let err = upload(State(state.clone()), Bytes::new()).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationError);

        let duplicate = Bytes::from_static(
            br#"{"batteries":[
                {"code":"B-1","name":"A","capacity":5,"price":1,"warranty":10},
                {"code":"B-1","name":"B","capacity":6,"price":1,"warranty":10}
            ]}"#,
        );
        let err = upload(State(state.clone()), duplicate).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationError);

        let Json(catalog) = list(State(state)).await;
        assert_eq!(catalog.batteries.len(), 5);
    }
}
