//! Runtime configuration read from environment variables.

use std::path::PathBuf;
use std::time::Duration;

use violationtracker_api::{ClientOptions, RetryPolicy, DEFAULT_SEARCH_URL};

use crate::pipeline::PipelineConfig;

/// Everything one harvest run needs to know about its surroundings.
#[derive(Clone, Debug)]
pub struct Config {
    pub db_path: PathBuf,
    pub log_dir: PathBuf,
    pub base_url: String,
    pub pipeline: PipelineConfig,
    pub client: ClientOptions,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            db_path: PathBuf::from("violations.db"),
            log_dir: PathBuf::from("logs"),
            base_url: DEFAULT_SEARCH_URL.to_string(),
            pipeline: PipelineConfig::default(),
            client: ClientOptions::default(),
        }
    }
}

impl Config {
    /// Reads `VIOLATIONS_*` variables, falling back to defaults for anything
    /// missing or unparseable.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        let u64_var = |key: &str, default: u64| {
            lookup(key)
                .and_then(|val| val.trim().parse::<u64>().ok())
                .unwrap_or(default)
        };
        let u32_var = |key: &str, default: u32| {
            lookup(key)
                .and_then(|val| val.trim().parse::<u32>().ok())
                .unwrap_or(default)
        };

        let retry = RetryPolicy {
            max_attempts: u32_var("VIOLATIONS_RETRY_MAX", defaults.client.retry.max_attempts),
            base_delay: Duration::from_millis(u64_var(
                "VIOLATIONS_RETRY_BASE_MS",
                defaults.client.retry.base_delay.as_millis() as u64,
            )),
            max_delay: Duration::from_millis(u64_var(
                "VIOLATIONS_RETRY_MAX_MS",
                defaults.client.retry.max_delay.as_millis() as u64,
            )),
        };

        Self {
            db_path: lookup("VIOLATIONS_DB")
                .map(PathBuf::from)
                .unwrap_or(defaults.db_path),
            log_dir: lookup("VIOLATIONS_LOG_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.log_dir),
            base_url: lookup("VIOLATIONS_BASE_URL").unwrap_or(defaults.base_url),
            pipeline: PipelineConfig {
                page_count: u32_var("VIOLATIONS_PAGE_COUNT", defaults.pipeline.page_count),
                page_delay: Duration::from_secs(u64_var(
                    "VIOLATIONS_PAGE_DELAY_SECS",
                    defaults.pipeline.page_delay.as_secs(),
                )),
            },
            client: ClientOptions {
                timeout: Duration::from_secs(u64_var(
                    "VIOLATIONS_TIMEOUT_SECS",
                    defaults.client.timeout.as_secs(),
                )),
                retry,
                retry_timeouts: lookup("VIOLATIONS_RETRY_TIMEOUTS")
                    .map(|val| parse_flag(&val))
                    .unwrap_or(defaults.client.retry_timeouts),
            },
        }
    }
}

fn parse_flag(val: &str) -> bool {
    matches!(
        val.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}
