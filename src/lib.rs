pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliArgs;

pub use config::AppConfig;
pub use core::aggregator::Aggregator;
pub use domain::model::{Keyword, Report};
pub use utils::error::{ProviderError, Result, SeoError};
