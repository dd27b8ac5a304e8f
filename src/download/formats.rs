//! Stream format descriptors and resolution derivation.

use serde::{Deserialize, Serialize};

use crate::download::engine::RawFormat;

/// What a stream carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CodecKind {
    Video,
    Audio,
    /// Storyboards, subtitles, other non-media entries.
    None,
}

/// Minimal view of one engine-reported format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StreamDescriptor {
    pub codec_kind: CodecKind,
    pub height: Option<u32>,
}

impl From<&RawFormat> for StreamDescriptor {
    fn from(raw: &RawFormat) -> Self {
        // yt-dlp reports "none" (or omits the field) for absent codecs.
        let has_video = raw
            .vcodec
            .as_deref()
            .is_some_and(|v| v != "none" && !v.is_empty());
        let has_audio = raw
            .acodec
            .as_deref()
            .is_some_and(|a| a != "none" && !a.is_empty());
        let codec_kind = if has_video {
            CodecKind::Video
        } else if has_audio {
            CodecKind::Audio
        } else {
            CodecKind::None
        };
        Self {
            codec_kind,
            height: raw.height,
        }
    }
}

/// Derives the selectable resolution labels from a format list: distinct
/// heights of video streams, highest first, rendered as `"{height}p"`.
/// An empty result means "let the engine pick" and is not an error.
pub fn available_resolutions(formats: &[StreamDescriptor]) -> Vec<String> {
    let mut heights: Vec<u32> = formats
        .iter()
        .filter(|f| f.codec_kind == CodecKind::Video)
        .filter_map(|f| f.height)
        .collect();
    heights.sort_unstable_by(|a, b| b.cmp(a));
    heights.dedup();
    heights.into_iter().map(|h| format!("{}p", h)).collect()
}
