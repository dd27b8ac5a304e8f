//! Download requests and engine format-selector construction.

use serde::{Deserialize, Serialize};

use crate::core::config;
use crate::download::engine::PostProcess;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaKind {
    Audio,
    Video,
}

/// One user-triggered download. Consumed by a single orchestrator call;
/// a retry builds a new request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadRequest {
    pub url: String,
    pub kind: MediaKind,
    /// Resolution label such as "720p"; only meaningful for video.
    pub resolution_label: Option<String>,
}

impl DownloadRequest {
    pub fn audio(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            kind: MediaKind::Audio,
            resolution_label: None,
        }
    }

    pub fn video(url: impl Into<String>, resolution_label: Option<String>) -> Self {
        Self {
            url: url.into(),
            kind: MediaKind::Video,
            resolution_label,
        }
    }

    /// Height cap for video requests: numeric prefix of the label, or the
    /// configured default when the label is absent or unparsable.
    pub fn target_height(&self) -> u32 {
        self.resolution_label
            .as_deref()
            .and_then(parse_height)
            .unwrap_or(config::download::DEFAULT_VIDEO_HEIGHT)
    }

    /// Builds the engine format-selector expression.
    pub fn format_selector(&self) -> String {
        match self.kind {
            MediaKind::Audio => "bestaudio/best".to_string(),
            MediaKind::Video => {
                let height = self.target_height();
                format!(
                    "bestvideo[height<={h}]+bestaudio/best[height<={h}]",
                    h = height
                )
            }
        }
    }

    /// Post-processing the engine applies after the transfer.
    pub fn post_process(&self) -> PostProcess {
        match self.kind {
            MediaKind::Audio => PostProcess::ExtractAudio {
                codec: config::download::AUDIO_CODEC,
                bitrate_kbps: config::download::AUDIO_BITRATE_KBPS,
            },
            MediaKind::Video => PostProcess::MergeContainer {
                format: config::download::VIDEO_CONTAINER,
            },
        }
    }
}

fn parse_height(label: &str) -> Option<u32> {
    let digits: String = label
        .trim()
        .chars()
        .take_while(char::is_ascii_digit)
        .collect();
    digits.parse().ok()
}
