//! Runtime configuration.
//!
//! Environment-driven settings are exposed as lazily initialized statics;
//! fixed operational constants live in the submodules below.

use once_cell::sync::Lazy;
use std::env;
use std::time::Duration;

/// Path to the yt-dlp binary. Override with `YTDL_BIN`.
pub static YTDL_BIN: Lazy<String> =
    Lazy::new(|| env::var("YTDL_BIN").unwrap_or_else(|_| "yt-dlp".to_string()));

/// Optional ffmpeg location (directory or binary path) passed to the engine
/// via `--ffmpeg-location`. Set with `FFMPEG_LOCATION`; when unset the engine
/// resolves ffmpeg from `PATH` on its own.
pub static FFMPEG_LOCATION: Lazy<Option<String>> = Lazy::new(|| {
    env::var("FFMPEG_LOCATION")
        .ok()
        .filter(|value| !value.trim().is_empty())
});

/// Metadata cache settings.
pub mod cache {
    use super::Duration;

    /// How long a cached metadata entry stays fresh.
    pub const METADATA_TTL_SECS: u64 = 600;

    pub fn metadata_ttl() -> Duration {
        Duration::from_secs(METADATA_TTL_SECS)
    }
}

/// Download engine settings.
pub mod download {
    use super::Duration;

    /// Hard cap on a single yt-dlp invocation (metadata probe or version check).
    pub const YTDLP_TIMEOUT_SECS: u64 = 120;

    /// Height cap used when a video request carries no resolution label.
    pub const DEFAULT_VIDEO_HEIGHT: u32 = 720;

    /// Audio extraction target.
    pub const AUDIO_CODEC: &str = "mp3";
    pub const AUDIO_BITRATE_KBPS: u32 = 192;

    /// Container the engine merges video+audio streams into.
    pub const VIDEO_CONTAINER: &str = "mp4";

    /// Prefix for per-session temporary directories.
    pub const TEMP_DIR_PREFIX: &str = "vidfetch_";

    pub fn ytdlp_timeout() -> Duration {
        Duration::from_secs(YTDLP_TIMEOUT_SECS)
    }
}
