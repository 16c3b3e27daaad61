//! Processing job state machine
//!
//! One job tracks one upload (or re-style request) through the transform
//! pipeline: created as `processing` with progress 0, mutated only by its
//! own background continuation, terminal once `completed` or `failed`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use uuid::Uuid;

/// Illustration style, chosen at job creation and fixed for the job's
/// lifetime
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Style {
    Standard,
    Sketch,
    Minimal,
    Detailed,
}

impl Default for Style {
    fn default() -> Self {
        Style::Standard
    }
}

impl Style {
    pub fn as_str(&self) -> &'static str {
        match self {
            Style::Standard => "standard",
            Style::Sketch => "sketch",
            Style::Minimal => "minimal",
            Style::Detailed => "detailed",
        }
    }
}

impl FromStr for Style {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "standard" => Ok(Style::Standard),
            "sketch" => Ok(Style::Sketch),
            "minimal" => Ok(Style::Minimal),
            "detailed" => Ok(Style::Detailed),
            other => Err(format!("Unknown style: {}", other)),
        }
    }
}

/// Job lifecycle state
///
/// There is no queued state distinct from `processing`: the transform
/// begins immediately in the background when the job is created.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JobStatus {
    Processing,
    Completed,
    Failed,
}

impl JobStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            JobStatus::Processing => "processing",
            JobStatus::Completed => "completed",
            JobStatus::Failed => "failed",
        }
    }
}

impl FromStr for JobStatus {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "processing" => Ok(JobStatus::Processing),
            "completed" => Ok(JobStatus::Completed),
            "failed" => Ok(JobStatus::Failed),
            other => Err(format!("Unknown job status: {}", other)),
        }
    }
}

/// One tracked processing job
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProcessingJob {
    /// Unique job identifier
    pub id: Uuid,

    /// Resulting outfit record, set if and only if the job completed
    pub code_id: Option<String>,

    /// Current lifecycle state
    pub status: JobStatus,

    /// Human-readable label of the stage currently running
    pub current_step: String,

    /// Percentage complete, 0-100, non-decreasing while processing
    pub progress: u8,

    /// Illustration style for this job
    pub style: Style,

    /// Captured error text for failed jobs
    pub error_message: Option<String>,

    pub started_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
}

impl ProcessingJob {
    /// Create a new job in the `processing` state
    pub fn new(style: Style) -> Self {
        Self {
            id: Uuid::new_v4(),
            code_id: None,
            status: JobStatus::Processing,
            current_step: "Starting".to_string(),
            progress: 0,
            style,
            error_message: None,
            started_at: Utc::now(),
            completed_at: None,
        }
    }

    /// Record a progress checkpoint
    ///
    /// Progress never decreases; a checkpoint below the current value
    /// updates only the step label. Terminal jobs ignore updates entirely.
    pub fn set_progress(&mut self, step: &str, percent: u8) {
        if self.is_terminal() {
            return;
        }
        self.current_step = step.to_string();
        self.progress = self.progress.max(percent.min(100));
    }

    /// Transition to `completed`, linking the created outfit record
    pub fn complete(&mut self, code_id: String) {
        if self.is_terminal() {
            return;
        }
        self.code_id = Some(code_id);
        self.status = JobStatus::Completed;
        self.current_step = "Done".to_string();
        self.progress = 100;
        self.completed_at = Some(Utc::now());
    }

    /// Transition to `failed`, capturing the error text
    pub fn fail(&mut self, message: String) {
        if self.is_terminal() {
            return;
        }
        self.status = JobStatus::Failed;
        self.error_message = Some(message);
        self.completed_at = Some(Utc::now());
    }

    /// Whether the job has reached a terminal state
    pub fn is_terminal(&self) -> bool {
        matches!(self.status, JobStatus::Completed | JobStatus::Failed)
    }
}
