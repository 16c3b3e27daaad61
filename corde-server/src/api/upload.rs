//! Upload and job-status API handlers
//!
//! POST /upload, GET /upload/status/{job_id}, POST /upload/reprocess/{code_id}
//!
//! The upload handler validates the file at the boundary (media type and
//! size, both rejected *before* a job record exists), persists the job,
//! answers immediately, and spawns the fire-and-forget pipeline
//! continuation. Results are observed only through the status poll.

use axum::{
    extract::{DefaultBodyLimit, Multipart, Path, State},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    error::{ApiError, ApiResult},
    models::{JobStatus, ProcessingJob, Style},
    pipeline, workflow, AppState,
};

/// Upload size limit
pub const MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

/// Request body limit: the upload limit plus multipart framing headroom.
const MULTIPART_BODY_LIMIT: usize = MAX_UPLOAD_BYTES + 2 * 1024 * 1024;

/// Accepted upload media types
const ALLOWED_MIME_TYPES: [&str; 3] = ["image/jpeg", "image/png", "image/webp"];

/// POST /upload and POST /upload/reprocess response
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadResponse {
    pub job_id: Uuid,
    pub estimated_processing_time_ms: u64,
    pub status: JobStatus,
}

/// POST /upload/reprocess/{code_id} request
#[derive(Debug, Deserialize)]
pub struct ReprocessRequest {
    pub style: String,
}

/// POST /upload
///
/// Multipart form: `image` (JPEG/PNG/WEBP, ≤10MB) and optional `style`.
/// Returns the job id immediately; the transform runs in the background.
pub async fn upload_image(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> ApiResult<Json<UploadResponse>> {
    let mut image: Option<Vec<u8>> = None;
    let mut style = Style::default();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::BadRequest(format!("Malformed multipart body: {}", e)))?
    {
        let name = field.name().unwrap_or("").to_string();
        match name.as_str() {
            "image" => {
                let content_type = field.content_type().unwrap_or("none").to_string();
                if !ALLOWED_MIME_TYPES.contains(&content_type.as_str()) {
                    return Err(ApiError::UnsupportedMediaType(format!(
                        "Only JPEG, PNG and WEBP images are accepted (got {})",
                        content_type
                    )));
                }

                let data = field
                    .bytes()
                    .await
                    .map_err(|e| ApiError::BadRequest(format!("Failed to read image: {}", e)))?;
                if data.len() > MAX_UPLOAD_BYTES {
                    return Err(ApiError::FileTooLarge {
                        size: data.len(),
                        limit: MAX_UPLOAD_BYTES,
                    });
                }
                image = Some(data.to_vec());
            }
            "style" => {
                let text = field
                    .text()
                    .await
                    .map_err(|e| ApiError::BadRequest(format!("Failed to read style: {}", e)))?;
                style = text.parse().map_err(ApiError::BadRequest)?;
            }
            _ => {}
        }
    }

    let image = image.ok_or_else(|| ApiError::BadRequest("Image file is required".to_string()))?;

    // Boundary checks passed: only now does a job record exist.
    let job = ProcessingJob::new(style);
    crate::db::jobs::save_job(&state.db, &job).await?;

    let estimated = pipeline::estimate_processing_time_ms(image.len() as u64);

    tracing::info!(
        job_id = %job.id,
        style = style.as_str(),
        size_bytes = image.len(),
        "Upload accepted, processing job created"
    );

    let response = UploadResponse {
        job_id: job.id,
        estimated_processing_time_ms: estimated,
        status: job.status,
    };

    // Fire-and-forget continuation; the response does not wait for it.
    tokio::spawn(workflow::run_job(state, job, image, "user_upload"));

    Ok(Json(response))
}

/// GET /upload/status/{job_id}
///
/// Full job record, or 404 for unknown ids.
pub async fn upload_status(
    State(state): State<AppState>,
    Path(job_id): Path<String>,
) -> ApiResult<Json<ProcessingJob>> {
    let job_id = Uuid::parse_str(&job_id)
        .map_err(|_| ApiError::NotFound(format!("Processing job not found: {}", job_id)))?;

    let job = crate::db::jobs::load_job(&state.db, job_id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("Processing job not found: {}", job_id)))?;

    Ok(Json(job))
}

/// POST /upload/reprocess/{code_id}
///
/// Re-runs the pipeline over an outfit's stored original photo with a new
/// style; same job lifecycle as a fresh upload.
pub async fn reprocess_code(
    State(state): State<AppState>,
    Path(code_id): Path<String>,
    Json(request): Json<ReprocessRequest>,
) -> ApiResult<Json<UploadResponse>> {
    let style: Style = request.style.parse().map_err(ApiError::BadRequest)?;

    let code = crate::db::codes::get_code(&state.db, &code_id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("Outfit not found: {}", code_id)))?;

    let original_url = code.original_url.ok_or_else(|| {
        ApiError::NotFound(format!("Outfit {} has no stored original image", code_id))
    })?;

    // The stored URL is "/uploads/<file>"; resolve it inside the uploads dir.
    let file_name = original_url.rsplit('/').next().unwrap_or_default();
    let original_path = state.uploads_dir.join(file_name);
    let image = tokio::fs::read(&original_path).await.map_err(|_| {
        ApiError::NotFound(format!("Original image for outfit {} is missing", code_id))
    })?;

    let job = ProcessingJob::new(style);
    crate::db::jobs::save_job(&state.db, &job).await?;

    let estimated = pipeline::estimate_processing_time_ms(image.len() as u64);

    tracing::info!(
        job_id = %job.id,
        code_id = %code_id,
        style = style.as_str(),
        "Re-style accepted, processing job created"
    );

    let response = UploadResponse {
        job_id: job.id,
        estimated_processing_time_ms: estimated,
        status: job.status,
    };

    tokio::spawn(workflow::run_job(state, job, image, "restyle"));

    Ok(Json(response))
}

/// Build upload routes
pub fn upload_routes() -> Router<AppState> {
    Router::new()
        .route("/upload", post(upload_image))
        .route("/upload/status/:job_id", get(upload_status))
        .route("/upload/reprocess/:code_id", post(reprocess_code))
        .layer(DefaultBodyLimit::max(MULTIPART_BODY_LIMIT))
}
