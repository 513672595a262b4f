//! Configuration module for vlr-scout
//!
//! Handles loading, parsing, and validating TOML configuration files. Every
//! section has built-in defaults, so a config file only needs to name the
//! values it changes.

mod parser;
mod types;
mod validation;

pub use parser::{default_config, load_config};
pub use types::{Config, CrawlerConfig, OutputConfig, SiteConfig};
pub use validation::validate;
