//! Download session state machine and temporary-directory lifecycle.
//!
//! One session tracks one URL context. State flow:
//! `Idle -> Downloading -> {Ready, Failed}`, and any state returns to `Idle`
//! when the context changes. The session owns the temp directory of the
//! current attempt; at most one such directory exists at a time, and every
//! transition that abandons an attempt removes it before anything else
//! happens.

use std::path::{Path, PathBuf};
use tempfile::TempDir;

use crate::core::config;
use crate::core::error::{AppError, AppResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SessionStatus {
    #[default]
    Idle,
    Downloading,
    Ready,
    Failed,
}

#[derive(Debug, Default)]
pub struct DownloadSession {
    context_url: Option<String>,
    temp_dir: Option<TempDir>,
    output_file: Option<PathBuf>,
    status: SessionStatus,
    progress: Option<f32>,
    error: Option<String>,
}

impl DownloadSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn status(&self) -> SessionStatus {
        self.status
    }

    /// Progress of the running attempt; `None` when idle, failed, or the
    /// engine cannot estimate completion.
    pub fn progress(&self) -> Option<f32> {
        self.progress
    }

    pub fn output_file(&self) -> Option<&Path> {
        self.output_file.as_deref()
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn context_url(&self) -> Option<&str> {
        self.context_url.as_deref()
    }

    /// Path of the current attempt's temp directory, if one exists.
    pub fn temp_dir(&self) -> Option<&Path> {
        self.temp_dir.as_ref().map(TempDir::path)
    }

    /// Switches to a new URL context. A different URL tears the session down
    /// (temp dir removed, all fields cleared); the same URL is a no-op.
    pub fn set_context(&mut self, url: &str) {
        if self.context_url.as_deref() == Some(url) {
            return;
        }
        self.reset();
        self.context_url = Some(url.to_string());
    }

    /// Returns the session to `Idle`, removing the temp directory first.
    pub fn reset(&mut self) {
        self.remove_temp_dir();
        self.context_url = None;
        self.output_file = None;
        self.status = SessionStatus::Idle;
        self.progress = None;
        self.error = None;
    }

    /// Starts a new attempt: removes any leftover directory from a previous
    /// attempt, creates a fresh one and moves to `Downloading`. Returns the
    /// directory the orchestrator should download into.
    pub fn begin_download(&mut self) -> AppResult<PathBuf> {
        self.remove_temp_dir();

        let dir = tempfile::Builder::new()
            .prefix(config::download::TEMP_DIR_PREFIX)
            .tempdir()
            .map_err(|e| {
                AppError::Unexpected(anyhow::anyhow!("failed to create temp directory: {}", e))
            })?;
        let path = dir.path().to_path_buf();
        log::debug!("Created temp directory {}", path.display());

        self.temp_dir = Some(dir);
        self.output_file = None;
        self.error = None;
        self.progress = Some(0.0);
        self.status = SessionStatus::Downloading;
        Ok(path)
    }

    /// Records a progress fraction; ignored outside the `Downloading` state
    /// so late callbacks cannot disturb a settled session.
    pub fn set_progress(&mut self, fraction: Option<f32>) {
        if self.status == SessionStatus::Downloading {
            self.progress = fraction;
        }
    }

    /// Completes the attempt. The path must exist on disk; a path that
    /// vanished counts as a failure.
    pub fn finish(&mut self, path: PathBuf) {
        if path.is_file() {
            self.progress = Some(1.0);
            self.output_file = Some(path);
            self.status = SessionStatus::Ready;
        } else {
            self.fail(format!("output file disappeared: {}", path.display()));
        }
    }

    /// Marks the attempt failed. The temp directory is kept until the next
    /// attempt or context change removes it.
    pub fn fail(&mut self, error: impl Into<String>) {
        let error = error.into();
        log::warn!("Download attempt failed: {}", error);
        self.error = Some(error);
        self.output_file = None;
        self.progress = None;
        self.status = SessionStatus::Failed;
    }

    // Best-effort recursive removal; a directory we cannot delete is logged
    // and forgotten, never fatal.
    fn remove_temp_dir(&mut self) {
        if let Some(dir) = self.temp_dir.take() {
            let path = dir.path().to_path_buf();
            if let Err(e) = dir.close() {
                log::warn!("Failed to remove temp directory {}: {}", path.display(), e);
            } else {
                log::debug!("Removed temp directory {}", path.display());
            }
        }
    }
}
