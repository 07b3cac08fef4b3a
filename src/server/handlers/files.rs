//! Upload, listing and detail endpoints.

use axum::{
    extract::{rejection::PathRejection, Multipart, Path, State},
    Json,
};

use super::super::error::ApiError;
use super::super::AppState;
use crate::models::{FileSummary, ProcessResult};
use crate::services::FileDetail;

/// Multipart field carrying the uploaded file.
const FILE_FIELD: &str = "file";

/// Filename recorded when the client sends none.
const UNNAMED_UPLOAD: &str = "upload";

/// Process an uploaded file and return the extraction result.
pub async fn upload_file(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<ProcessResult>, ApiError> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::new(e.status(), "Invalid upload").with_detail(e.body_text()))?
    {
        if field.name() != Some(FILE_FIELD) {
            continue;
        }

        let filename = field
            .file_name()
            .filter(|name| !name.is_empty())
            .unwrap_or(UNNAMED_UPLOAD)
            .to_string();
        let content = field
            .bytes()
            .await
            .map_err(|e| ApiError::new(e.status(), "Invalid upload").with_detail(e.body_text()))?;

        tracing::debug!("Received upload {} ({} bytes)", filename, content.len());
        let result = state.processor.process(content.to_vec(), &filename).await?;
        return Ok(Json(result));
    }

    Err(ApiError::bad_request("No file provided"))
}

/// List processed files, newest first.
pub async fn list_files(State(state): State<AppState>) -> Result<Json<Vec<FileSummary>>, ApiError> {
    Ok(Json(state.processor.list().await?))
}

/// Stored extraction JSON for one file.
pub async fn file_json(
    State(state): State<AppState>,
    id: Result<Path<i64>, PathRejection>,
) -> Result<Json<FileDetail>, ApiError> {
    let Path(id) =
        id.map_err(|e| ApiError::bad_request("Invalid file id").with_detail(e.body_text()))?;

    state
        .processor
        .detail(id)
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::not_found("File not found"))
}
