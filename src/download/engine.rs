//! External media engine boundary.
//!
//! [`MediaEngine`] is the seam between the orchestration layer and whatever
//! actually fetches media. The production implementation, [`YtDlpEngine`],
//! shells out to a yt-dlp binary: metadata probes run through
//! `tokio::process` under a timeout, downloads run on a blocking task that
//! streams the child's stdout line by line and turns `[download]` lines into
//! progress events.

use async_trait::async_trait;
use serde::Deserialize;
use std::collections::VecDeque;
use std::io::{BufRead, BufReader};
use std::process::{Command, Stdio};
use std::sync::{Arc, Mutex};
use thiserror::Error;
use tokio::process::Command as TokioCommand;
use tokio::time::{timeout, Duration};

use crate::core::config;
use crate::download::progress::{self, EngineEvent, EngineEventFn};

/// Error raised by an engine implementation. Converted to `AppError` at the
/// orchestration boundary; never exposed to callers of the public API.
#[derive(Debug, Error)]
pub enum EngineError {
    /// Metadata extraction failed (extractor error, unavailable video).
    #[error("{0}")]
    Extraction(String),

    /// The download itself failed.
    #[error("{0}")]
    Download(String),

    /// The engine process could not be spawned or crashed.
    #[error("{0}")]
    Process(String),

    /// The engine did not respond within the configured timeout.
    #[error("{0}")]
    Timeout(String),

    /// The engine produced output we could not parse.
    #[error("{0}")]
    Parse(String),
}

/// Raw metadata document as emitted by `yt-dlp --dump-json`. Normalization
/// into `VideoMetadata` happens in the metadata module.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawMetadata {
    pub title: Option<String>,
    pub thumbnail: Option<String>,
    pub duration: Option<f64>,
    pub uploader: Option<String>,
    pub view_count: Option<u64>,
    #[serde(default)]
    pub formats: Vec<RawFormat>,
}

/// One entry of the raw format list.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawFormat {
    pub vcodec: Option<String>,
    pub acodec: Option<String>,
    pub height: Option<u32>,
}

/// Post-download processing the engine applies to the fetched streams.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PostProcess {
    ExtractAudio { codec: &'static str, bitrate_kbps: u32 },
    MergeContainer { format: &'static str },
}

/// A fully specified unit of download work handed to the engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadJob {
    pub url: String,
    pub format_selector: String,
    /// yt-dlp output template, e.g. `/tmp/vidfetch_x/%(title)s.%(ext)s`.
    pub output_template: String,
    pub post_process: PostProcess,
}

/// Boundary trait for media engines. Implementations must be cheap to share
/// across tasks.
#[async_trait]
pub trait MediaEngine: Send + Sync {
    /// Probes metadata for a single video without downloading anything.
    async fn extract_metadata(&self, url: &str) -> Result<RawMetadata, EngineError>;

    /// Runs a download job to completion, reporting progress through
    /// `on_event`. Files land wherever the job's output template points.
    async fn download(&self, job: DownloadJob, on_event: EngineEventFn)
        -> Result<(), EngineError>;
}

/// Production engine backed by the yt-dlp binary from [`config::YTDL_BIN`].
pub struct YtDlpEngine {
    bin: String,
}

impl Default for YtDlpEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl YtDlpEngine {
    pub fn new() -> Self {
        Self {
            bin: config::YTDL_BIN.clone(),
        }
    }

    pub fn with_binary(bin: impl Into<String>) -> Self {
        Self { bin: bin.into() }
    }

    /// Reports the installed yt-dlp version, for startup diagnostics.
    pub async fn version(&self) -> Result<String, EngineError> {
        let output = timeout(
            Duration::from_secs(10),
            TokioCommand::new(&self.bin).arg("--version").output(),
        )
        .await
        .map_err(|_| EngineError::Timeout("yt-dlp --version timed out".to_string()))?
        .map_err(|e| EngineError::Process(format!("Failed to execute {}: {}", self.bin, e)))?;

        let version = String::from_utf8_lossy(&output.stdout).trim().to_string();
        if version.is_empty() {
            return Err(EngineError::Process(
                "yt-dlp --version produced no output".to_string(),
            ));
        }
        Ok(version)
    }
}

#[async_trait]
impl MediaEngine for YtDlpEngine {
    async fn extract_metadata(&self, url: &str) -> Result<RawMetadata, EngineError> {
        let mut args = vec![
            "--dump-json",
            "--no-playlist",
            "--skip-download",
            "--no-warnings",
        ];
        if let Some(location) = config::FFMPEG_LOCATION.as_deref() {
            args.push("--ffmpeg-location");
            args.push(location);
        }
        args.push(url);

        log::debug!("Probing metadata: {} {}", self.bin, args.join(" "));

        let output = timeout(
            config::download::ytdlp_timeout(),
            TokioCommand::new(&self.bin).args(&args).output(),
        )
        .await
        .map_err(|_| {
            log::error!(
                "Metadata probe timed out after {}s for {}",
                config::download::YTDLP_TIMEOUT_SECS,
                url
            );
            EngineError::Timeout("metadata extraction timed out".to_string())
        })?
        .map_err(|e| EngineError::Process(format!("Failed to execute {}: {}", self.bin, e)))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            log::error!("Metadata extraction failed for {}: {}", url, stderr.trim());
            return Err(EngineError::Extraction(primary_error_line(&stderr)));
        }

        serde_json::from_slice(&output.stdout)
            .map_err(|e| EngineError::Parse(format!("invalid metadata JSON: {}", e)))
    }

    async fn download(
        &self,
        job: DownloadJob,
        on_event: EngineEventFn,
    ) -> Result<(), EngineError> {
        let bin = self.bin.clone();
        tokio::task::spawn_blocking(move || run_download(&bin, &job, &on_event))
            .await
            .map_err(|e| EngineError::Process(format!("download task panicked: {}", e)))?
    }
}

/// Blocking download driver: spawns the child, drains stderr on a side
/// thread, reads stdout line by line and forwards progress events.
fn run_download(bin: &str, job: &DownloadJob, on_event: &EngineEventFn) -> Result<(), EngineError> {
    let mut args: Vec<String> = vec![
        "-o".to_string(),
        job.output_template.clone(),
        "--newline".to_string(),
        "--no-playlist".to_string(),
        "--no-warnings".to_string(),
        "--format".to_string(),
        job.format_selector.clone(),
    ];
    match &job.post_process {
        PostProcess::ExtractAudio { codec, bitrate_kbps } => {
            args.push("--extract-audio".to_string());
            args.push("--audio-format".to_string());
            args.push((*codec).to_string());
            args.push("--postprocessor-args".to_string());
            args.push(format!("ffmpeg:-b:a {}k", bitrate_kbps));
        }
        PostProcess::MergeContainer { format } => {
            args.push("--merge-output-format".to_string());
            args.push((*format).to_string());
        }
    }
    if let Some(location) = config::FFMPEG_LOCATION.as_deref() {
        args.push("--ffmpeg-location".to_string());
        args.push(location.to_string());
    }
    args.push(job.url.clone());

    log::debug!("Starting download: {} {}", bin, args.join(" "));

    let mut child = Command::new(bin)
        .args(&args)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .map_err(|e| EngineError::Process(format!("Failed to spawn {}: {}", bin, e)))?;

    // Drain stderr concurrently so the child never blocks on a full pipe;
    // keep a bounded tail for error reporting.
    let stderr_tail = Arc::new(Mutex::new(VecDeque::<String>::new()));
    if let Some(stderr) = child.stderr.take() {
        let tail = Arc::clone(&stderr_tail);
        std::thread::spawn(move || {
            for line in BufReader::new(stderr).lines().map_while(Result::ok) {
                log::debug!("engine stderr: {}", line);
                if let Ok(mut collected) = tail.lock() {
                    collected.push_back(line);
                    if collected.len() > 200 {
                        collected.pop_front();
                    }
                }
            }
        });
    }

    let mut finished_sent = false;
    if let Some(stdout) = child.stdout.take() {
        for line in BufReader::new(stdout).lines().map_while(Result::ok) {
            log::trace!("engine stdout: {}", line);
            if !finished_sent && is_postprocess_line(&line) {
                finished_sent = true;
                on_event(EngineEvent::Finished);
            } else if let Some(info) = progress::parse_progress(&line) {
                on_event(EngineEvent::Downloading {
                    fraction: info.fraction,
                });
            }
        }
    }

    let status = child
        .wait()
        .map_err(|e| EngineError::Process(format!("downloader process failed: {}", e)))?;

    if !status.success() {
        let stderr_text = stderr_tail
            .lock()
            .map(|tail| tail.iter().cloned().collect::<Vec<_>>().join("\n"))
            .unwrap_or_default();
        log::error!("Engine exited with {} for {}", status, job.url);
        return Err(EngineError::Download(primary_error_line(&stderr_text)));
    }

    if !finished_sent {
        on_event(EngineEvent::Finished);
    }
    Ok(())
}

// Post-processor banners mark the end of the transfer phase.
fn is_postprocess_line(line: &str) -> bool {
    line.starts_with("[Merger]")
        || line.starts_with("[ExtractAudio]")
        || line.starts_with("[ffmpeg]")
}

/// Picks the most useful line out of the engine's stderr: the first
/// `ERROR:` line if present, otherwise the last non-empty line.
fn primary_error_line(stderr: &str) -> String {
    stderr
        .lines()
        .find_map(|line| line.strip_prefix("ERROR:").map(|rest| rest.trim().to_string()))
        .or_else(|| {
            stderr
                .lines()
                .rev()
                .map(str::trim)
                .find(|line| !line.is_empty())
                .map(str::to_string)
        })
        .unwrap_or_else(|| "downloader failed with no diagnostic output".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    // ==================== Engine Helper Tests ====================

    #[test]
    fn test_primary_error_line_prefers_error_prefix() {
        let stderr = "WARNING: throttled\nERROR: Video unavailable\nexiting";
        assert_eq!(primary_error_line(stderr), "Video unavailable");
    }

    #[test]
    fn test_primary_error_line_falls_back_to_last_line() {
        let stderr = "something went wrong\nconnection reset by peer\n";
        assert_eq!(primary_error_line(stderr), "connection reset by peer");
    }

    #[test]
    fn test_primary_error_line_empty_stderr() {
        assert_eq!(
            primary_error_line(""),
            "downloader failed with no diagnostic output"
        );
    }

    #[test]
    fn test_postprocess_line_detection() {
        assert!(is_postprocess_line("[Merger] Merging formats into \"clip.mp4\""));
        assert!(is_postprocess_line("[ExtractAudio] Destination: song.mp3"));
        assert!(!is_postprocess_line("[download] 50.0% of 10.00MiB at 1.00MiB/s"));
    }

    #[test]
    fn test_raw_metadata_deserializes_partial_document() {
        let doc = r#"{"title": "Clip", "duration": 12.7, "formats": [{"vcodec": "avc1", "height": 720}]}"#;
        let raw: RawMetadata = serde_json::from_str(doc).unwrap();
        assert_eq!(raw.title.as_deref(), Some("Clip"));
        assert_eq!(raw.uploader, None);
        assert_eq!(raw.formats.len(), 1);
        assert_eq!(raw.formats[0].height, Some(720));
    }
}
