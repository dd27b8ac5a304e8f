//! Core infrastructure: configuration, errors, logging, validation,
//! display helpers.

pub mod config;
pub mod error;
pub mod logging;
pub mod utils;
pub mod validation;

pub use error::{AppError, AppResult};
pub use logging::init_logger;
pub use validation::is_valid_video_url;
