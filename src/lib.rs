//! vlr-scout: a staged concurrent scraper for vlr.gg team rankings
//!
//! This crate implements a fan-out/fan-in crawl pipeline: a fixed pool of
//! fetch workers pulls page requests from a stage-priority scheduler, while a
//! single orchestrator consumes each page's outcome synchronously to decide
//! what to fetch next.

pub mod audit;
pub mod config;
pub mod crawler;
pub mod dataset;
pub mod extract;

use thiserror::Error;

/// Main error type for vlr-scout operations
#[derive(Debug, Error)]
pub enum ScoutError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Bootstrap failed for '{path}': {reason}")]
    Bootstrap { path: String, reason: String },

    #[error("Dataset error: {0}")]
    Dataset(#[from] dataset::DatasetError),

    #[error("HTTP client error: {0}")]
    Reqwest(#[from] reqwest::Error),

    #[error("URL parse error: {0}")]
    UrlParse(#[from] url::ParseError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// A recoverable failure while processing one region, team, or sub-page.
///
/// Stage failures never abort the run; the orchestrator skips the enclosing
/// unit and records the failure in the run report.
#[derive(Debug, Error)]
pub enum StageError {
    #[error("Timed out waiting for an outcome for '{path}'")]
    Timeout { path: String },

    #[error("HTTP {status} for '{path}'")]
    HttpStatus { path: String, status: u16 },

    #[error("Extraction failed on '{path}': {source}")]
    Extract {
        path: String,
        source: extract::ExtractError,
    },
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),
}

/// Result type alias for vlr-scout operations
pub type Result<T> = std::result::Result<T, ScoutError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

// Re-export commonly used types
pub use config::Config;
pub use crawler::{FetchOutcome, PageRequest, ResponseStore, RunReport, Scheduler, StagePriority};
pub use dataset::Dataset;
