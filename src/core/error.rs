//! Central error type.
//!
//! Every fallible public operation returns [`AppResult`]. Engine failures are
//! converted at the boundary into one of these variants; raw engine error
//! types never escape the crate.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    /// The input does not look like a supported video URL.
    #[error("Invalid video URL: {0}")]
    InvalidUrl(String),

    /// Metadata extraction failed (network, extractor, or parse trouble).
    #[error("Could not fetch video info: {0}")]
    MetadataFetch(String),

    /// The download itself failed; carries the engine's message.
    #[error("Download failed: {0}")]
    Download(String),

    /// The engine reported success but left nothing in the target directory.
    #[error("Download finished but no output file was produced")]
    MissingOutput,

    /// Anything that does not fit the categories above.
    #[error("Unexpected error: {0}")]
    Unexpected(#[from] anyhow::Error),
}

impl AppError {
    /// Stable tag for logging and metrics grouping.
    pub fn kind(&self) -> &'static str {
        match self {
            AppError::InvalidUrl(_) => "invalid_url",
            AppError::MetadataFetch(_) => "metadata_fetch",
            AppError::Download(_) => "download",
            AppError::MissingOutput => "missing_output",
            AppError::Unexpected(_) => "unexpected",
        }
    }
}

impl From<String> for AppError {
    fn from(message: String) -> Self {
        AppError::Download(message)
    }
}

pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    // ==================== Error Tests ====================

    #[test]
    fn test_kind_tags_are_stable() {
        assert_eq!(AppError::InvalidUrl("x".to_string()).kind(), "invalid_url");
        assert_eq!(
            AppError::MetadataFetch("x".to_string()).kind(),
            "metadata_fetch"
        );
        assert_eq!(AppError::Download("x".to_string()).kind(), "download");
        assert_eq!(AppError::MissingOutput.kind(), "missing_output");
        assert_eq!(
            AppError::Unexpected(anyhow::anyhow!("boom")).kind(),
            "unexpected"
        );
    }

    #[test]
    fn test_display_carries_engine_message() {
        let err = AppError::Download("HTTP Error 403: Forbidden".to_string());
        assert_eq!(err.to_string(), "Download failed: HTTP Error 403: Forbidden");
    }

    #[test]
    fn test_string_converts_to_download_error() {
        let err: AppError = "timed out".to_string().into();
        assert_eq!(err.kind(), "download");
    }
}
