//! Download pipeline: engine boundary, metadata cache, format handling,
//! request construction, progress reporting, session lifecycle and the
//! orchestrator that ties them together.

pub mod engine;
pub mod formats;
pub mod metadata;
pub mod orchestrator;
pub mod progress;
pub mod request;
pub mod session;

pub use engine::{
    DownloadJob, EngineError, MediaEngine, PostProcess, RawFormat, RawMetadata, YtDlpEngine,
};
pub use formats::{available_resolutions, CodecKind, StreamDescriptor};
pub use metadata::{CacheStats, MetadataCache, VideoMetadata};
pub use orchestrator::{download, run};
pub use progress::{
    adapt_engine_event, EngineEvent, EngineEventFn, ProgressFn, ProgressPhase, ProgressUpdate,
};
pub use request::{DownloadRequest, MediaKind};
pub use session::{DownloadSession, SessionStatus};
