//! Logger initialization.

use anyhow::Result;
use simplelog::{
    ColorChoice, CombinedLogger, Config, LevelFilter, SharedLogger, TermLogger, TerminalMode,
    WriteLogger,
};
use std::fs::File;

/// Initializes the global logger: terminal output always, plus a log file
/// when a path is given. Call once at startup.
pub fn init_logger(log_file_path: Option<&str>) -> Result<()> {
    let mut loggers: Vec<Box<dyn SharedLogger>> = vec![TermLogger::new(
        LevelFilter::Info,
        Config::default(),
        TerminalMode::Mixed,
        ColorChoice::Auto,
    )];

    if let Some(path) = log_file_path {
        let log_file = File::create(path)
            .map_err(|e| anyhow::anyhow!("Failed to create log file {}: {}", path, e))?;
        loggers.push(WriteLogger::new(LevelFilter::Debug, Config::default(), log_file));
    }

    CombinedLogger::init(loggers)
        .map_err(|e| anyhow::anyhow!("Failed to initialize logger: {}", e))?;

    log::info!("Logger initialized");
    Ok(())
}
