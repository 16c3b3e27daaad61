//! Processing job persistence
//!
//! The job record is mutated only by its own pipeline continuation; every
//! update is a whole-record UPSERT, so status polls always read a
//! consistent snapshot.

use sqlx::{Row, SqlitePool};
use uuid::Uuid;

use corde_common::{Error, Result};

use crate::models::{JobStatus, ProcessingJob, Style};

/// Save a job, inserting or replacing the whole record
pub async fn save_job(pool: &SqlitePool, job: &ProcessingJob) -> Result<()> {
    sqlx::query(
        r#"
        INSERT INTO processing_jobs (
            id, code_id, status, current_step, progress, style,
            error_message, started_at, completed_at
        ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
        ON CONFLICT(id) DO UPDATE SET
            code_id = excluded.code_id,
            status = excluded.status,
            current_step = excluded.current_step,
            progress = excluded.progress,
            error_message = excluded.error_message,
            completed_at = excluded.completed_at
        "#,
    )
    .bind(job.id.to_string())
    .bind(&job.code_id)
    .bind(job.status.as_str())
    .bind(&job.current_step)
    .bind(job.progress as i64)
    .bind(job.style.as_str())
    .bind(&job.error_message)
    .bind(job.started_at.to_rfc3339())
    .bind(job.completed_at.map(|dt| dt.to_rfc3339()))
    .execute(pool)
    .await?;

    Ok(())
}

/// Load a job by id
pub async fn load_job(pool: &SqlitePool, job_id: Uuid) -> Result<Option<ProcessingJob>> {
    let row = sqlx::query(
        r#"
        SELECT id, code_id, status, current_step, progress, style,
               error_message, started_at, completed_at
        FROM processing_jobs
        WHERE id = ?
        "#,
    )
    .bind(job_id.to_string())
    .fetch_optional(pool)
    .await?;

    let Some(row) = row else {
        return Ok(None);
    };

    let status: String = row.get("status");
    let status: JobStatus = status
        .parse()
        .map_err(|e: String| Error::Internal(format!("Failed to parse job status: {}", e)))?;

    let style: String = row.get("style");
    let style: Style = style
        .parse()
        .map_err(|e: String| Error::Internal(format!("Failed to parse style: {}", e)))?;

    let started_at: String = row.get("started_at");
    let started_at = chrono::DateTime::parse_from_rfc3339(&started_at)
        .map_err(|e| Error::Internal(format!("Failed to parse started_at: {}", e)))?
        .with_timezone(&chrono::Utc);

    let completed_at: Option<String> = row.get("completed_at");
    let completed_at = completed_at
        .map(|s| chrono::DateTime::parse_from_rfc3339(&s))
        .transpose()
        .map_err(|e| Error::Internal(format!("Failed to parse completed_at: {}", e)))?
        .map(|dt| dt.with_timezone(&chrono::Utc));

    Ok(Some(ProcessingJob {
        id: job_id,
        code_id: row.get("code_id"),
        status,
        current_step: row.get("current_step"),
        progress: row.get::<i64, _>("progress").clamp(0, 100) as u8,
        style,
        error_message: row.get("error_message"),
        started_at,
        completed_at,
    }))
}

/// Mark jobs left `processing` by a dead process as failed
///
/// A job's continuation dies with its process; anything non-terminal at
/// startup can never complete and would otherwise poll as `processing`
/// forever.
pub async fn fail_stale_jobs(pool: &SqlitePool) -> Result<usize> {
    let result = sqlx::query(
        r#"
        UPDATE processing_jobs
        SET status = 'failed',
            error_message = 'Service restarted during processing',
            completed_at = ?
        WHERE status = 'processing'
        "#,
    )
    .bind(chrono::Utc::now().to_rfc3339())
    .execute(pool)
    .await?;

    Ok(result.rows_affected() as usize)
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn test_pool() -> (SqlitePool, tempfile::TempDir) {
        let tmp = tempfile::tempdir().unwrap();
        let pool = crate::db::init_database_pool(&tmp.path().join("test.db"))
            .await
            .unwrap();
        (pool, tmp)
    }

    #[tokio::test]
    async fn save_and_load_round_trips() {
        let (pool, _root) = test_pool().await;

        let mut job = ProcessingJob::new(Style::Sketch);
        job.set_progress("Applying style filter", 50);
        save_job(&pool, &job).await.unwrap();

        let loaded = load_job(&pool, job.id).await.unwrap().unwrap();
        assert_eq!(loaded.status, JobStatus::Processing);
        assert_eq!(loaded.progress, 50);
        assert_eq!(loaded.current_step, "Applying style filter");
        assert_eq!(loaded.style, Style::Sketch);
        assert!(loaded.code_id.is_none());
    }

    #[tokio::test]
    async fn updates_replace_the_whole_record() {
        let (pool, _root) = test_pool().await;

        let mut job = ProcessingJob::new(Style::Standard);
        save_job(&pool, &job).await.unwrap();

        job.set_progress("Saving outputs", 95);
        job.complete("code-42".to_string());
        save_job(&pool, &job).await.unwrap();

        let loaded = load_job(&pool, job.id).await.unwrap().unwrap();
        assert_eq!(loaded.status, JobStatus::Completed);
        assert_eq!(loaded.progress, 100);
        assert_eq!(loaded.code_id.as_deref(), Some("code-42"));
        assert!(loaded.completed_at.is_some());
    }

    #[tokio::test]
    async fn unknown_job_loads_as_none() {
        let (pool, _root) = test_pool().await;
        let missing = load_job(&pool, Uuid::new_v4()).await.unwrap();
        assert!(missing.is_none());
    }

    #[tokio::test]
    async fn stale_processing_jobs_are_failed_on_startup() {
        let (pool, _root) = test_pool().await;

        let running = ProcessingJob::new(Style::Minimal);
        save_job(&pool, &running).await.unwrap();

        let mut done = ProcessingJob::new(Style::Standard);
        done.complete("code-1".to_string());
        save_job(&pool, &done).await.unwrap();

        let failed = fail_stale_jobs(&pool).await.unwrap();
        assert_eq!(failed, 1);

        let stale = load_job(&pool, running.id).await.unwrap().unwrap();
        assert_eq!(stale.status, JobStatus::Failed);
        assert!(stale.error_message.is_some());

        let untouched = load_job(&pool, done.id).await.unwrap().unwrap();
        assert_eq!(untouched.status, JobStatus::Completed);
    }
}
