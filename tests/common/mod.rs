//! Shared test doubles for the download flow tests.

use std::io::Write;
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::{Duration, SystemTime};

use async_trait::async_trait;
use vidfetch::download::{
    DownloadJob, EngineError, EngineEvent, EngineEventFn, MediaEngine, RawFormat, RawMetadata,
};

/// What the mock engine does when asked to download.
pub enum DownloadOutcome {
    /// Write these files into the job's target directory, oldest first.
    Files(Vec<&'static str>),
    /// Report success but write nothing.
    Nothing,
    /// Fail with this message.
    Fail(&'static str),
}

/// Deterministic engine double: scripted download outcome, scripted progress
/// events, call counters and last-job capture for assertions.
pub struct MockEngine {
    outcome: DownloadOutcome,
    events: Vec<EngineEvent>,
    extract_calls: AtomicUsize,
    download_calls: AtomicUsize,
    last_job: Mutex<Option<DownloadJob>>,
}

impl MockEngine {
    fn with_outcome(outcome: DownloadOutcome) -> Self {
        Self {
            outcome,
            events: vec![
                EngineEvent::Downloading {
                    fraction: Some(0.5),
                },
                EngineEvent::Finished,
            ],
            extract_calls: AtomicUsize::new(0),
            download_calls: AtomicUsize::new(0),
            last_job: Mutex::new(None),
        }
    }

    pub fn succeeding(files: Vec<&'static str>) -> Self {
        Self::with_outcome(DownloadOutcome::Files(files))
    }

    pub fn empty_output() -> Self {
        Self::with_outcome(DownloadOutcome::Nothing)
    }

    pub fn failing(message: &'static str) -> Self {
        Self::with_outcome(DownloadOutcome::Fail(message))
    }

    pub fn extract_calls(&self) -> usize {
        self.extract_calls.load(Ordering::SeqCst)
    }

    pub fn download_calls(&self) -> usize {
        self.download_calls.load(Ordering::SeqCst)
    }

    pub fn last_job(&self) -> Option<DownloadJob> {
        self.last_job.lock().unwrap().clone()
    }

    /// Metadata document resembling a real probe: three video heights (one
    /// duplicated), an audio-only stream and a storyboard entry.
    pub fn sample_metadata() -> RawMetadata {
        let video = |height| RawFormat {
            vcodec: Some("avc1.640028".to_string()),
            acodec: Some("none".to_string()),
            height: Some(height),
        };
        RawMetadata {
            title: Some("Never Gonna Give You Up".to_string()),
            thumbnail: Some("https://i.ytimg.com/vi/dQw4w9WgXcQ/hq720.jpg".to_string()),
            duration: Some(213.0),
            uploader: Some("Rick Astley".to_string()),
            view_count: Some(1_700_000_000),
            formats: vec![
                video(360),
                video(480),
                video(720),
                video(720),
                RawFormat {
                    vcodec: Some("none".to_string()),
                    acodec: Some("opus".to_string()),
                    height: None,
                },
                RawFormat {
                    vcodec: None,
                    acodec: None,
                    height: None,
                },
            ],
        }
    }
}

#[async_trait]
impl MediaEngine for MockEngine {
    async fn extract_metadata(&self, _url: &str) -> Result<RawMetadata, EngineError> {
        self.extract_calls.fetch_add(1, Ordering::SeqCst);
        Ok(Self::sample_metadata())
    }

    async fn download(
        &self,
        job: DownloadJob,
        on_event: EngineEventFn,
    ) -> Result<(), EngineError> {
        self.download_calls.fetch_add(1, Ordering::SeqCst);
        let target_dir = Path::new(&job.output_template)
            .parent()
            .map(Path::to_path_buf);
        *self.last_job.lock().unwrap() = Some(job);

        for event in &self.events {
            on_event(*event);
        }

        match &self.outcome {
            DownloadOutcome::Fail(message) => {
                Err(EngineError::Download((*message).to_string()))
            }
            DownloadOutcome::Nothing => Ok(()),
            DownloadOutcome::Files(files) => {
                let dir = target_dir
                    .ok_or_else(|| EngineError::Process("job has no target directory".to_string()))?;
                // Stagger modification times so "newest file" is well defined.
                let base = SystemTime::now() - Duration::from_secs(files.len() as u64);
                for (i, name) in files.iter().enumerate() {
                    let mut file = std::fs::File::create(dir.join(name))
                        .map_err(|e| EngineError::Process(e.to_string()))?;
                    file.write_all(b"media")
                        .map_err(|e| EngineError::Process(e.to_string()))?;
                    file.set_modified(base + Duration::from_secs(i as u64 + 1))
                        .map_err(|e| EngineError::Process(e.to_string()))?;
                }
                Ok(())
            }
        }
    }
}
