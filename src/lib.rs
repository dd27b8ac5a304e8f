//! vidfetch — orchestration core for downloading video and audio through an
//! external yt-dlp engine.
//!
//! The crate validates video URLs, caches metadata probes with a TTL,
//! derives selectable resolutions from the engine's format list, and runs
//! downloads through a session state machine that owns the temporary
//! directory of each attempt.
//!
//! Typical flow:
//!
//! ```no_run
//! use std::sync::{Arc, Mutex};
//! use vidfetch::{
//!     is_valid_video_url, run, DownloadRequest, DownloadSession, MetadataCache, YtDlpEngine,
//! };
//!
//! # async fn demo() -> vidfetch::AppResult<()> {
//! let url = "https://www.youtube.com/watch?v=dQw4w9WgXcQ";
//! assert!(is_valid_video_url(url));
//!
//! let engine = YtDlpEngine::new();
//! let cache = MetadataCache::with_default_ttl();
//! let metadata = cache.get_or_fetch(&engine, url).await?;
//! println!("{} by {}", metadata.title, metadata.uploader);
//!
//! let session = Arc::new(Mutex::new(DownloadSession::new()));
//! let request = DownloadRequest::video(url, Some("720p".to_string()));
//! let output = run(&engine, &session, request, Arc::new(|_| {})).await?;
//! println!("saved to {}", output.display());
//! # Ok(())
//! # }
//! ```

pub mod core;
pub mod download;

pub use crate::core::{config, is_valid_video_url, AppError, AppResult};
pub use crate::download::{
    available_resolutions, download, run, CacheStats, CodecKind, DownloadRequest, DownloadSession,
    MediaEngine, MediaKind, MetadataCache, ProgressFn, ProgressPhase, ProgressUpdate,
    SessionStatus, StreamDescriptor, VideoMetadata, YtDlpEngine,
};
