//! URL validation.
//!
//! Syntactic checks only: no network access, no engine calls. The accepted
//! grammar covers the three canonical watch-page shapes with an 11-character
//! video id.

use once_cell::sync::Lazy;
use regex::Regex;

// Scheme and `www.` are optional; the id alphabet is `[A-Za-z0-9_-]`.
// Anchored at the start so a hostile prefix cannot smuggle a valid-looking
// suffix past the check.
static VIDEO_URL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"^(https?://)?(www\.)?(youtube\.com/watch\?v=|youtu\.be/|youtube\.com/shorts/)[A-Za-z0-9_-]{11}",
    )
    .expect("video URL pattern is valid")
});

/// Returns true if the trimmed input looks like a supported video URL.
///
/// # Examples
/// ```
/// use vidfetch::core::validation::is_valid_video_url;
///
/// assert!(is_valid_video_url("https://www.youtube.com/watch?v=dQw4w9WgXcQ"));
/// assert!(is_valid_video_url("youtu.be/dQw4w9WgXcQ"));
/// assert!(!is_valid_video_url("https://evil.com/watch?v=dQw4w9WgXcQ"));
/// ```
pub fn is_valid_video_url(url: &str) -> bool {
    VIDEO_URL_RE.is_match(url.trim())
}

#[cfg(test)]
mod tests {
    use super::*;

    // ==================== URL Validation Tests ====================

    #[test]
    fn test_accepts_watch_urls() {
        assert!(is_valid_video_url("https://www.youtube.com/watch?v=dQw4w9WgXcQ"));
        assert!(is_valid_video_url("http://youtube.com/watch?v=dQw4w9WgXcQ"));
        assert!(is_valid_video_url("youtube.com/watch?v=dQw4w9WgXcQ"));
    }

    #[test]
    fn test_accepts_short_links_and_shorts() {
        assert!(is_valid_video_url("https://youtu.be/dQw4w9WgXcQ"));
        assert!(is_valid_video_url("www.youtube.com/shorts/dQw4w9WgXcQ"));
    }

    #[test]
    fn test_accepts_ids_with_underscore_and_hyphen() {
        assert!(is_valid_video_url("https://youtu.be/a-b_c-d_e-f"));
    }

    #[test]
    fn test_trims_surrounding_whitespace() {
        assert!(is_valid_video_url("  https://youtu.be/dQw4w9WgXcQ  "));
    }

    #[test]
    fn test_rejects_empty_and_garbage() {
        assert!(!is_valid_video_url(""));
        assert!(!is_valid_video_url("   "));
        assert!(!is_valid_video_url("not a url"));
    }

    #[test]
    fn test_rejects_wrong_hosts() {
        assert!(!is_valid_video_url("https://evil.com/watch?v=dQw4w9WgXcQ"));
        assert!(!is_valid_video_url("https://vimeo.com/123456789"));
        // Hostile prefix in front of a valid-looking URL.
        assert!(!is_valid_video_url("https://evil.com/?u=youtube.com/watch?v=dQw4w9WgXcQ"));
    }

    #[test]
    fn test_rejects_short_video_ids() {
        assert!(!is_valid_video_url("https://youtu.be/tooshort"));
        assert!(!is_valid_video_url("https://www.youtube.com/watch?v=abcdefghij"));
    }

    #[test]
    fn test_rejects_playlist_only_urls() {
        assert!(!is_valid_video_url("https://www.youtube.com/playlist?list=PLabc"));
    }
}
