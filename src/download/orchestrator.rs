//! Download orchestration.
//!
//! [`download`] turns a request into an engine job, adapts engine events to
//! the caller's progress callback and resolves the produced file.
//! [`run`] wraps it with the session transitions: begin, track progress,
//! finish or fail. Both block their caller until the engine is done; there
//! is no cancellation and no automatic retry.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use crate::core::error::{AppError, AppResult};
use crate::download::engine::{DownloadJob, EngineError, MediaEngine};
use crate::download::progress::{adapt_engine_event, EngineEventFn, ProgressFn};
use crate::download::request::{DownloadRequest, MediaKind};
use crate::download::session::{DownloadSession, SessionStatus};

/// Runs one download into `target_dir` and returns the produced file.
///
/// The caller owns `target_dir`; this function never creates or removes it.
/// Progress callbacks fire synchronously from the engine's output reader.
pub async fn download(
    engine: &dyn MediaEngine,
    request: &DownloadRequest,
    target_dir: &Path,
    on_progress: ProgressFn,
) -> AppResult<PathBuf> {
    let job = DownloadJob {
        url: request.url.clone(),
        format_selector: request.format_selector(),
        output_template: target_dir
            .join("%(title)s.%(ext)s")
            .to_string_lossy()
            .into_owned(),
        post_process: request.post_process(),
    };

    let kind = match request.kind {
        MediaKind::Audio => "audio",
        MediaKind::Video => "video",
    };
    log::info!(
        "Starting {} download of {} into {}",
        kind,
        request.url,
        target_dir.display()
    );

    let on_event: EngineEventFn = Arc::new(move |event| on_progress(adapt_engine_event(event)));

    engine
        .download(job, on_event)
        .await
        .map_err(|e| match e {
            EngineError::Download(msg)
            | EngineError::Extraction(msg)
            | EngineError::Timeout(msg) => AppError::Download(msg),
            other => AppError::Unexpected(anyhow::Error::new(other)),
        })?;

    let output = resolve_output_file(target_dir)?;
    log::info!("Download produced {}", output.display());
    Ok(output)
}

/// Drives a full session attempt around [`download`]: establishes the URL
/// context, opens a fresh temp directory, mirrors progress into the session
/// and settles it as `Ready` or `Failed`.
pub async fn run(
    engine: &dyn MediaEngine,
    session: &Arc<Mutex<DownloadSession>>,
    request: DownloadRequest,
    on_progress: ProgressFn,
) -> AppResult<PathBuf> {
    let target_dir = {
        let mut guard = lock_session(session)?;
        guard.set_context(&request.url);
        guard.begin_download()?
    };

    let tracking: ProgressFn = {
        let session = Arc::clone(session);
        Arc::new(move |update| {
            if let Ok(mut guard) = session.lock() {
                guard.set_progress(update.fraction);
            }
            on_progress(update);
        })
    };

    let result = download(engine, &request, &target_dir, tracking).await;

    let mut guard = lock_session(session)?;
    match result {
        Ok(path) => {
            guard.finish(path.clone());
            if guard.status() == SessionStatus::Ready {
                Ok(path)
            } else {
                Err(AppError::Download(
                    guard
                        .error()
                        .unwrap_or("download did not produce a usable file")
                        .to_string(),
                ))
            }
        }
        Err(e) => {
            guard.fail(e.to_string());
            Err(e)
        }
    }
}

fn lock_session(
    session: &Arc<Mutex<DownloadSession>>,
) -> AppResult<std::sync::MutexGuard<'_, DownloadSession>> {
    session
        .lock()
        .map_err(|_| AppError::Unexpected(anyhow::anyhow!("session lock poisoned")))
}

/// Resolves which file in the target directory is the finished product.
/// One file: that file. Several (yt-dlp can leave fragment leftovers next
/// to the merged output): the newest by modification time. None:
/// `MissingOutput`.
fn resolve_output_file(dir: &Path) -> AppResult<PathBuf> {
    let entries = fs::read_dir(dir)
        .map_err(|e| AppError::Unexpected(anyhow::anyhow!("failed to list {}: {}", dir.display(), e)))?;

    let mut files: Vec<PathBuf> = entries
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| path.is_file())
        .collect();

    match files.len() {
        0 => {
            log::error!("Engine reported success but {} is empty", dir.display());
            Err(AppError::MissingOutput)
        }
        1 => Ok(files.swap_remove(0)),
        n => {
            log::debug!("{} files in {}, picking newest", n, dir.display());
            files.sort_by_key(|path| fs::metadata(path).and_then(|m| m.modified()).ok());
            files.pop().ok_or(AppError::MissingOutput)
        }
    }
}
