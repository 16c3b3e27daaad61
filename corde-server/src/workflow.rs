//! Job orchestration
//!
//! Drives one processing job from raw upload bytes to a persisted outfit
//! record: pipeline → classifier → artifact insert → category attachment →
//! terminal job update. Runs as a fire-and-forget background task spawned
//! by the upload handlers; the job record is its exclusive property until
//! a terminal state is written.

use tokio::sync::mpsc;
use uuid::Uuid;

use crate::classifier;
use crate::db;
use crate::db::codes::NewCode;
use crate::models::ProcessingJob;
use crate::pipeline::Pipeline;
use crate::AppState;

/// Execute a processing job to completion or failure
///
/// Every pipeline checkpoint is persisted as a whole-record update; the
/// final 100% checkpoint is folded into the terminal `completed` write, so
/// a poller never observes full progress on a non-terminal job.
pub async fn run_job(state: AppState, mut job: ProcessingJob, image: Vec<u8>, source: &'static str) {
    tracing::info!(
        job_id = %job.id,
        style = job.style.as_str(),
        source = source,
        "Background processing task started"
    );

    let (progress_tx, mut progress_rx) = mpsc::unbounded_channel();
    let pipeline = Pipeline::with_progress(
        state.uploads_dir.clone(),
        state.processed_dir.clone(),
        progress_tx,
    );

    let style = job.style;
    let handle = tokio::task::spawn_blocking(move || pipeline.process(&image, style));

    // Drain checkpoints until the pipeline drops its sender. The job record
    // has exactly one writer (this task), so each save is a consistent
    // snapshot for pollers.
    while let Some(event) = progress_rx.recv().await {
        job.set_progress(event.label, event.percent);
        if event.percent < 100 {
            if let Err(e) = db::jobs::save_job(&state.db, &job).await {
                tracing::warn!(job_id = %job.id, error = %e, "Failed to persist job progress");
            }
        }
    }

    let outcome = match handle.await {
        Ok(result) => result,
        Err(e) => {
            tracing::error!(job_id = %job.id, error = %e, "Processing task panicked");
            fail_job(&state, &mut job, "Image processing task aborted unexpectedly".to_string())
                .await;
            return;
        }
    };

    match outcome {
        Ok(processed) => {
            // Classifier tagging is best-effort: attachment problems are
            // logged per tag and never fail the job.
            let classification = classifier::classify(&processed.palette);

            let code_id = Uuid::new_v4().to_string();
            let new_code = NewCode {
                id: code_id.clone(),
                illustration_url: processed.illustration_url,
                original_url: processed.original_url,
                palette: processed.palette,
                style: job.style.as_str().to_string(),
                season_tags: classification.season_tags,
                scene_tags: classification.scene_tags,
                processing_time_ms: processed.processing_time_ms,
                source: source.to_string(),
            };

            match db::codes::insert_code(&state.db, &new_code).await {
                Ok(()) => {
                    db::codes::attach_categories(&state.db, &code_id, &classification.categories)
                        .await;

                    job.complete(code_id.clone());
                    if let Err(e) = db::jobs::save_job(&state.db, &job).await {
                        tracing::error!(job_id = %job.id, error = %e, "Failed to finalize job");
                    }

                    tracing::info!(
                        job_id = %job.id,
                        code_id = %code_id,
                        processing_time_ms = new_code.processing_time_ms,
                        palette_size = new_code.palette.len(),
                        "Processing job completed"
                    );
                }
                Err(e) => {
                    tracing::error!(job_id = %job.id, error = %e, "Failed to persist artifact");
                    fail_job(&state, &mut job, format!("Failed to persist artifact: {}", e)).await;
                }
            }
        }
        Err(e) => {
            tracing::warn!(job_id = %job.id, error = %e, "Pipeline stage failed");
            fail_job(&state, &mut job, e.to_string()).await;
        }
    }
}

/// Land the job in the `failed` state, best-effort
async fn fail_job(state: &AppState, job: &mut ProcessingJob, message: String) {
    job.fail(message);
    if let Err(e) = db::jobs::save_job(&state.db, job).await {
        tracing::error!(job_id = %job.id, error = %e, "Failed to record job failure");
    }
}
