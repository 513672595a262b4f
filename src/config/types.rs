use serde::Deserialize;

/// Main configuration structure for vlr-scout
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Config {
    pub crawler: CrawlerConfig,
    pub site: SiteConfig,
    pub output: OutputConfig,
}

/// Worker pool and scheduling behavior
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CrawlerConfig {
    /// Number of concurrent fetch workers
    pub workers: usize,

    /// Fixed delay each worker sleeps between fetches (milliseconds)
    #[serde(rename = "fetch-delay-ms")]
    pub fetch_delay_ms: u64,

    /// How long the orchestrator waits for a page outcome before treating
    /// the unit as failed (seconds)
    #[serde(rename = "retrieve-timeout-secs")]
    pub retrieve_timeout_secs: u64,

    /// Fetch attempts per request before the worker gives up on it
    #[serde(rename = "retry-attempts")]
    pub retry_attempts: u32,

    /// Base backoff between retry attempts, doubled per attempt (milliseconds)
    #[serde(rename = "retry-backoff-ms")]
    pub retry_backoff_ms: u64,

    /// HTTP request timeout (seconds)
    #[serde(rename = "request-timeout-secs")]
    pub request_timeout_secs: u64,

    /// How many teams to take from the top of each regional ranking
    #[serde(rename = "teams-per-ranking")]
    pub teams_per_ranking: usize,
}

/// Target site configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    /// Host prefix joined with every request path
    pub host: String,

    /// User-Agent header sent with every fetch
    #[serde(rename = "user-agent")]
    pub user_agent: String,
}

/// Output configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Path of the JSON dataset file
    #[serde(rename = "dataset-path")]
    pub dataset_path: String,

    /// Path of the per-fetch audit log
    #[serde(rename = "audit-log-path")]
    pub audit_log_path: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            crawler: CrawlerConfig::default(),
            site: SiteConfig::default(),
            output: OutputConfig::default(),
        }
    }
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self {
            workers: 5,
            fetch_delay_ms: 10_000,
            retrieve_timeout_secs: 600,
            retry_attempts: 3,
            retry_backoff_ms: 2_000,
            request_timeout_secs: 30,
            teams_per_ranking: 100,
        }
    }
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            host: "https://www.vlr.gg".to_string(),
            user_agent: "Mozilla/5.0 (compatible; vlr-scout/0.3)".to_string(),
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            dataset_path: "./vlrgg_dataset.json".to_string(),
            audit_log_path: "./download_log.txt".to_string(),
        }
    }
}
