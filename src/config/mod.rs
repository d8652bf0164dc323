#[cfg(feature = "cli")]
pub mod cli;
pub mod toml_config;

#[cfg(feature = "cli")]
pub use cli::CliArgs;
pub use toml_config::TomlConfig;

use crate::utils::error::{ProviderError, ProviderKind, Result};
use crate::utils::validation::{validate_non_empty_string, validate_range, validate_url, Validate};

pub const AHREFS_API_KEY_VAR: &str = "AHREFS_API_KEY";
pub const SEMRUSH_API_KEY_VAR: &str = "SEMRUSH_API_KEY";

pub const DEFAULT_AHREFS_ENDPOINT: &str = "https://apiv2.ahrefs.com/";
pub const DEFAULT_TRENDS_BASE_URL: &str = "https://trends.google.com";
pub const DEFAULT_SEMRUSH_ENDPOINT: &str = "https://api.semrush.com/";
pub const DEFAULT_TIMEOUT_SECONDS: u64 = 30;
const MAX_TIMEOUT_SECONDS: u64 = 300;

#[derive(Debug, Clone, PartialEq)]
pub struct MetricsSettings {
    pub endpoint: String,
    pub api_key: Option<String>,
    pub timeout_seconds: u64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TrendsSettings {
    pub base_url: String,
    pub hl: String,
    /// Offset from UTC in minutes, as the Trends frontend sends it.
    pub tz: i32,
    pub geo: String,
    pub timeout_seconds: u64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CompetitorSettings {
    pub endpoint: String,
    pub api_key: Option<String>,
    pub database: String,
    pub timeout_seconds: u64,
}

/// Everything the aggregator needs, built once per process and read-only
/// afterwards.
#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    pub metrics: MetricsSettings,
    pub trends: TrendsSettings,
    pub competitors: CompetitorSettings,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            metrics: MetricsSettings {
                endpoint: DEFAULT_AHREFS_ENDPOINT.to_string(),
                api_key: None,
                timeout_seconds: DEFAULT_TIMEOUT_SECONDS,
            },
            trends: TrendsSettings {
                base_url: DEFAULT_TRENDS_BASE_URL.to_string(),
                hl: "en-US".to_string(),
                tz: 360,
                geo: String::new(),
                timeout_seconds: DEFAULT_TIMEOUT_SECONDS,
            },
            competitors: CompetitorSettings {
                endpoint: DEFAULT_SEMRUSH_ENDPOINT.to_string(),
                api_key: None,
                database: "us".to_string(),
                timeout_seconds: DEFAULT_TIMEOUT_SECONDS,
            },
        }
    }
}

/// Drops blank values and `${VAR}` placeholders left unresolved by the
/// TOML loader.
fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| {
        let v = v.trim();
        !v.is_empty() && !(v.starts_with("${") && v.ends_with('}'))
    })
}

impl AppConfig {
    /// Fills credentials that are still unset using `lookup`.
    pub fn with_env_credentials<F>(mut self, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        if self.metrics.api_key.is_none() {
            self.metrics.api_key = non_empty(lookup(AHREFS_API_KEY_VAR));
        }
        if self.competitors.api_key.is_none() {
            self.competitors.api_key = non_empty(lookup(SEMRUSH_API_KEY_VAR));
        }
        self
    }

    pub fn with_credentials(
        mut self,
        ahrefs_key: impl Into<String>,
        semrush_key: impl Into<String>,
    ) -> Self {
        self.metrics.api_key = Some(ahrefs_key.into());
        self.competitors.api_key = Some(semrush_key.into());
        self
    }

    /// Overrides every provider timeout.
    pub fn with_timeout(mut self, seconds: u64) -> Self {
        self.metrics.timeout_seconds = seconds;
        self.trends.timeout_seconds = seconds;
        self.competitors.timeout_seconds = seconds;
        self
    }

    /// Layers values from a TOML file over the current settings.
    pub fn apply_toml(mut self, file: &TomlConfig) -> Self {
        let default_timeout = file.defaults.as_ref().and_then(|d| d.timeout_seconds);
        if let Some(seconds) = default_timeout {
            self = self.with_timeout(seconds);
        }

        if let Some(section) = &file.metrics {
            if let Some(endpoint) = &section.endpoint {
                self.metrics.endpoint = endpoint.clone();
            }
            if let Some(key) = non_empty(section.api_key.clone()) {
                self.metrics.api_key = Some(key);
            }
            if let Some(seconds) = section.timeout_seconds {
                self.metrics.timeout_seconds = seconds;
            }
        }

        if let Some(section) = &file.trends {
            if let Some(base_url) = &section.base_url {
                self.trends.base_url = base_url.clone();
            }
            if let Some(hl) = &section.hl {
                self.trends.hl = hl.clone();
            }
            if let Some(tz) = section.tz {
                self.trends.tz = tz;
            }
            if let Some(geo) = &section.geo {
                self.trends.geo = geo.clone();
            }
            if let Some(seconds) = section.timeout_seconds {
                self.trends.timeout_seconds = seconds;
            }
        }

        if let Some(section) = &file.competitors {
            if let Some(endpoint) = &section.endpoint {
                self.competitors.endpoint = endpoint.clone();
            }
            if let Some(key) = non_empty(section.api_key.clone()) {
                self.competitors.api_key = Some(key);
            }
            if let Some(database) = &section.database {
                self.competitors.database = database.clone();
            }
            if let Some(seconds) = section.timeout_seconds {
                self.competitors.timeout_seconds = seconds;
            }
        }

        self
    }

    /// Credentials that are not configured. These are reported, not
    /// enforced: the provider call still goes out and fails on its own.
    pub fn missing_credentials(&self) -> Vec<ProviderError> {
        let mut missing = Vec::new();
        if self.metrics.api_key.is_none() {
            missing.push(ProviderError::MissingCredential {
                provider: ProviderKind::Metrics,
                variable: AHREFS_API_KEY_VAR.to_string(),
            });
        }
        if self.competitors.api_key.is_none() {
            missing.push(ProviderError::MissingCredential {
                provider: ProviderKind::Competitors,
                variable: SEMRUSH_API_KEY_VAR.to_string(),
            });
        }
        missing
    }
}

impl Validate for AppConfig {
    fn validate(&self) -> Result<()> {
        validate_url("metrics.endpoint", &self.metrics.endpoint)?;
        validate_url("trends.base_url", &self.trends.base_url)?;
        validate_url("competitors.endpoint", &self.competitors.endpoint)?;

        validate_range(
            "metrics.timeout_seconds",
            self.metrics.timeout_seconds,
            1,
            MAX_TIMEOUT_SECONDS,
        )?;
        validate_range(
            "trends.timeout_seconds",
            self.trends.timeout_seconds,
            1,
            MAX_TIMEOUT_SECONDS,
        )?;
        validate_range(
            "competitors.timeout_seconds",
            self.competitors.timeout_seconds,
            1,
            MAX_TIMEOUT_SECONDS,
        )?;

        validate_non_empty_string("trends.hl", &self.trends.hl)?;
        validate_non_empty_string("competitors.database", &self.competitors.database)?;
        Ok(())
    }
}
