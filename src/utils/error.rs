use std::fmt;
use thiserror::Error;

/// Which external data source an error came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProviderKind {
    Metrics,
    Trends,
    Competitors,
}

impl ProviderKind {
    pub fn label(&self) -> &'static str {
        match self {
            ProviderKind::Metrics => "Ahrefs",
            ProviderKind::Trends => "Google Trends",
            ProviderKind::Competitors => "SEMrush",
        }
    }
}

impl fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Failure of a single provider call.
///
/// The aggregator collapses every variant into an absent slot; the variant
/// only survives in the logged diagnostic.
#[derive(Error, Debug)]
pub enum ProviderError {
    #[error("request to {provider} failed: {source}")]
    Transport {
        provider: ProviderKind,
        #[source]
        source: reqwest::Error,
    },

    #[error("{provider} returned HTTP {status}")]
    Status { provider: ProviderKind, status: u16 },

    #[error("{provider} rejected the credentials: {message}")]
    Authentication {
        provider: ProviderKind,
        message: String,
    },

    #[error("{provider} rejected the request: {message}")]
    Rejected {
        provider: ProviderKind,
        message: String,
    },

    #[error("could not decode {provider} response: {message}")]
    Decode {
        provider: ProviderKind,
        message: String,
    },

    #[error("{provider} returned no data")]
    EmptyResult { provider: ProviderKind },

    #[error("{provider} credential {variable} is not set")]
    MissingCredential {
        provider: ProviderKind,
        variable: String,
    },
}

impl ProviderError {
    /// The request URL is stripped because it carries the API key.
    pub fn transport(provider: ProviderKind, source: reqwest::Error) -> Self {
        ProviderError::Transport {
            provider,
            source: source.without_url(),
        }
    }

    pub fn decode(provider: ProviderKind, message: impl Into<String>) -> Self {
        ProviderError::Decode {
            provider,
            message: message.into(),
        }
    }

    pub fn provider(&self) -> ProviderKind {
        match self {
            ProviderError::Transport { provider, .. }
            | ProviderError::Status { provider, .. }
            | ProviderError::Authentication { provider, .. }
            | ProviderError::Rejected { provider, .. }
            | ProviderError::Decode { provider, .. }
            | ProviderError::EmptyResult { provider }
            | ProviderError::MissingCredential { provider, .. } => *provider,
        }
    }

    /// Maps a non-success HTTP status to the matching variant.
    pub fn from_status(provider: ProviderKind, status: reqwest::StatusCode) -> Self {
        match status.as_u16() {
            401 | 403 => ProviderError::Authentication {
                provider,
                message: format!("HTTP {}", status.as_u16()),
            },
            code => ProviderError::Status {
                provider,
                status: code,
            },
        }
    }
}

pub type ProviderResult<T> = std::result::Result<T, ProviderError>;

#[derive(Error, Debug)]
pub enum SeoError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Invalid value for {field} ({value}): {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Failed to parse configuration {field}: {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Validation error: {message}")]
    ValidationError { message: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Configuration,
    Input,
    System,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl SeoError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            SeoError::ConfigError { .. }
            | SeoError::InvalidConfigValueError { .. }
            | SeoError::ConfigValidationError { .. } => ErrorCategory::Configuration,
            SeoError::ValidationError { .. } => ErrorCategory::Input,
            SeoError::IoError(_) => ErrorCategory::System,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            ErrorCategory::Input => ErrorSeverity::Medium,
            ErrorCategory::Configuration => ErrorSeverity::High,
            ErrorCategory::System => ErrorSeverity::Critical,
        }
    }

    pub fn recovery_suggestion(&self) -> String {
        match self {
            SeoError::ValidationError { .. } => {
                "Enter a non-empty keyword, e.g. `seo-planner \"running shoes\"`".to_string()
            }
            SeoError::InvalidConfigValueError { field, .. } => {
                format!("Check the value of `{}` in the config file or CLI flags", field)
            }
            SeoError::ConfigValidationError { .. } | SeoError::ConfigError { .. } => {
                "Make sure the config file exists and is valid TOML".to_string()
            }
            SeoError::IoError(_) => "Check that stdin/stdout are available".to_string(),
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self.category() {
            ErrorCategory::Input => format!("Invalid input: {}", self),
            ErrorCategory::Configuration => format!("Configuration problem: {}", self),
            ErrorCategory::System => format!("System error: {}", self),
        }
    }
}

pub type Result<T> = std::result::Result<T, SeoError>;
