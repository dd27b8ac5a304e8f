//! Progress reporting.
//!
//! Two layers: raw engine events (what the yt-dlp stdout reader observes)
//! and the `ProgressUpdate` contract callers subscribe to. Fractions are in
//! `0.0..=1.0`; `None` means the total size is unknown and the consumer
//! should render an indeterminate indicator.

use std::sync::Arc;

/// Phase of a running download as exposed to callers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProgressPhase {
    /// Bytes are being transferred.
    Downloading,
    /// Transfer done; the engine is merging or transcoding.
    Processing,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProgressUpdate {
    pub phase: ProgressPhase,
    /// `None` = indeterminate (total size unknown).
    pub fraction: Option<f32>,
}

/// Caller-facing progress callback. Invoked synchronously from the engine's
/// output reader, so it must be cheap and must not block.
pub type ProgressFn = Arc<dyn Fn(ProgressUpdate) + Send + Sync>;

/// Raw event emitted by an engine implementation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum EngineEvent {
    Downloading { fraction: Option<f32> },
    /// The transfer finished; post-processing may still be running.
    Finished,
}

pub type EngineEventFn = Arc<dyn Fn(EngineEvent) + Send + Sync>;

/// Maps a raw engine event onto the caller-facing contract. `Finished`
/// becomes `Processing` at fraction 1.0 so consumers keep showing activity
/// while the engine merges or extracts.
pub fn adapt_engine_event(event: EngineEvent) -> ProgressUpdate {
    match event {
        EngineEvent::Downloading { fraction } => ProgressUpdate {
            phase: ProgressPhase::Downloading,
            fraction,
        },
        EngineEvent::Finished => ProgressUpdate {
            phase: ProgressPhase::Processing,
            fraction: Some(1.0),
        },
    }
}

/// Parsed form of a `[download]` progress line.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProgressInfo {
    /// `None` when yt-dlp does not know the total size.
    pub fraction: Option<f32>,
    pub total_size: Option<u64>,
}

/// Parses a yt-dlp `--newline` progress line, e.g.
/// `[download]  45.2% of   10.00MiB at  500.00KiB/s ETA 00:10`.
///
/// Returns `None` for non-progress lines (`Destination:`, playlist notices).
/// Lines with a speed but no percentage are downloads with an unknown total
/// and map to an indeterminate `ProgressInfo`.
pub fn parse_progress(line: &str) -> Option<ProgressInfo> {
    if !line.contains("[download]") {
        return None;
    }

    let parts: Vec<&str> = line.split_whitespace().collect();
    let mut fraction = None;
    let mut total_size = None;

    for (i, part) in parts.iter().enumerate() {
        if let Some(stripped) = part.strip_suffix('%') {
            if let Ok(percent) = stripped.parse::<f32>() {
                fraction = Some((percent / 100.0).clamp(0.0, 1.0));
            }
        }
        if *part == "of" || *part == "of~" {
            if let Some(size_str) = parts.get(i + 1) {
                total_size = parse_size(size_str);
            }
        }
    }

    if fraction.is_some() {
        Some(ProgressInfo {
            fraction,
            total_size,
        })
    } else if parts.iter().any(|p| p.ends_with("/s")) {
        // Byte-count line without a percentage: total size unknown.
        Some(ProgressInfo {
            fraction: None,
            total_size: None,
        })
    } else {
        None
    }
}

/// Parses a human-readable size ("10.00MiB", "1.5GiB", "~3.2MiB") into bytes.
pub fn parse_size(size_str: &str) -> Option<u64> {
    let s = size_str.trim().trim_start_matches('~');
    let (number, multiplier) = if let Some(n) = s.strip_suffix("GiB") {
        (n, 1024u64 * 1024 * 1024)
    } else if let Some(n) = s.strip_suffix("MiB") {
        (n, 1024u64 * 1024)
    } else if let Some(n) = s.strip_suffix("KiB") {
        (n, 1024u64)
    } else if let Some(n) = s.strip_suffix('B') {
        (n, 1)
    } else {
        return None;
    };

    number
        .trim()
        .parse::<f64>()
        .ok()
        .map(|value| (value * multiplier as f64) as u64)
}
