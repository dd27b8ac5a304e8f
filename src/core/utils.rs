//! Display formatting helpers and environment probes.

use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use crate::core::config;

/// Formats a duration in seconds for display: "1h 2m 3s" / "2m 3s".
/// Zero means the engine did not report a duration.
pub fn format_duration(seconds: u64) -> String {
    if seconds == 0 {
        return "Unknown".to_string();
    }
    let hours = seconds / 3600;
    let minutes = (seconds % 3600) / 60;
    let secs = seconds % 60;
    if hours > 0 {
        format!("{}h {}m {}s", hours, minutes, secs)
    } else {
        format!("{}m {}s", minutes, secs)
    }
}

/// Formats a view count for display: "1.2M views" / "3.4K views" / "512 views".
pub fn format_view_count(views: u64) -> String {
    if views >= 1_000_000 {
        format!("{:.1}M views", views as f64 / 1_000_000.0)
    } else if views >= 1_000 {
        format!("{:.1}K views", views as f64 / 1_000.0)
    } else {
        format!("{} views", views)
    }
}

/// Checks whether ffmpeg can be spawned. Respects `FFMPEG_LOCATION` (a
/// directory containing the binary, or the binary path itself); falls back
/// to `PATH` lookup.
pub fn ffmpeg_available() -> bool {
    let candidate: PathBuf = match config::FFMPEG_LOCATION.as_deref() {
        Some(location) if Path::new(location).is_dir() => Path::new(location).join("ffmpeg"),
        Some(location) => PathBuf::from(location),
        None => PathBuf::from("ffmpeg"),
    };

    Command::new(candidate)
        .arg("-version")
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .map(|status| status.success())
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    // ==================== Formatting Tests ====================

    #[test]
    fn test_format_duration_with_hours() {
        assert_eq!(format_duration(3723), "1h 2m 3s");
    }

    #[test]
    fn test_format_duration_under_an_hour() {
        assert_eq!(format_duration(123), "2m 3s");
        assert_eq!(format_duration(59), "0m 59s");
    }

    #[test]
    fn test_format_duration_zero_is_unknown() {
        assert_eq!(format_duration(0), "Unknown");
    }

    #[test]
    fn test_format_view_count_scales() {
        assert_eq!(format_view_count(1_234_567), "1.2M views");
        assert_eq!(format_view_count(3_400), "3.4K views");
        assert_eq!(format_view_count(512), "512 views");
        assert_eq!(format_view_count(0), "0 views");
    }
}
