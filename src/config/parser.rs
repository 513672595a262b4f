use crate::config::types::Config;
use crate::config::validation::validate;
use crate::ConfigError;
use std::path::Path;

/// Loads and parses a configuration file from the given path
///
/// # Arguments
///
/// * `path` - Path to the TOML configuration file
///
/// # Returns
///
/// * `Ok(Config)` - Successfully loaded and validated configuration
/// * `Err(ConfigError)` - Failed to load, parse, or validate the configuration
pub fn load_config(path: &Path) -> Result<Config, ConfigError> {
    let content = std::fs::read_to_string(path)?;

    let config: Config = toml::from_str(&content)?;

    validate(&config)?;

    Ok(config)
}

/// Returns the built-in default configuration, validated.
///
/// Used when the CLI is invoked without a config file; every field can still
/// be overridden by CLI flags afterwards.
pub fn default_config() -> Result<Config, ConfigError> {
    let config = Config::default();
    validate(&config)?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn create_temp_config(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file.flush().unwrap();
        file
    }

    #[test]
    fn test_load_valid_config() {
        let config_content = r#"
[crawler]
workers = 3
fetch-delay-ms = 500
retrieve-timeout-secs = 60
retry-attempts = 2
retry-backoff-ms = 100
request-timeout-secs = 10
teams-per-ranking = 50

[site]
host = "https://www.vlr.gg"
user-agent = "TestScout/1.0"

[output]
dataset-path = "./dataset.json"
audit-log-path = "./audit.txt"
"#;

        let file = create_temp_config(config_content);
        let config = load_config(file.path()).unwrap();

        assert_eq!(config.crawler.workers, 3);
        assert_eq!(config.crawler.teams_per_ranking, 50);
        assert_eq!(config.site.user_agent, "TestScout/1.0");
        assert_eq!(config.output.dataset_path, "./dataset.json");
    }

    #[test]
    fn test_partial_config_falls_back_to_defaults() {
        let config_content = r#"
[crawler]
workers = 2
"#;

        let file = create_temp_config(config_content);
        let config = load_config(file.path()).unwrap();

        assert_eq!(config.crawler.workers, 2);
        assert_eq!(config.crawler.teams_per_ranking, 100);
        assert_eq!(config.site.host, "https://www.vlr.gg");
    }

    #[test]
    fn test_load_config_with_invalid_path() {
        let result = load_config(Path::new("/nonexistent/config.toml"));
        assert!(result.is_err());
    }

    #[test]
    fn test_load_config_with_invalid_toml() {
        let config_content = "this is not valid TOML {{{";
        let file = create_temp_config(config_content);
        let result = load_config(file.path());
        assert!(result.is_err());
    }

    #[test]
    fn test_load_config_with_validation_error() {
        let config_content = r#"
[crawler]
workers = 0
"#;

        let file = create_temp_config(config_content);
        let result = load_config(file.path());
        assert!(result.is_err());
        assert!(matches!(result.unwrap_err(), ConfigError::Validation(_)));
    }

    #[test]
    fn test_default_config_is_valid() {
        assert!(default_config().is_ok());
    }
}
