use super::{AppConfig, TomlConfig};
use crate::utils::error::Result;
use clap::Parser;
use std::path::PathBuf;

#[derive(Debug, Clone, Parser)]
#[command(name = "seo-planner")]
#[command(about = "Combine Ahrefs, Google Trends and SEMrush data into one keyword report")]
pub struct CliArgs {
    /// Keyword to analyse. Prompted for on stdin when omitted.
    pub keyword: Option<String>,

    /// Optional TOML file with provider endpoints and settings
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Request timeout in seconds for every provider
    #[arg(long)]
    pub timeout: Option<u64>,

    #[arg(short, long, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, help = "Emit logs as JSON lines on stderr")]
    pub log_json: bool,
}

impl CliArgs {
    /// Defaults, then the TOML file, then CLI flags, then environment
    /// credentials for anything still unset.
    pub fn load_config(&self) -> Result<AppConfig> {
        let mut config = AppConfig::default();

        if let Some(path) = &self.config {
            tracing::info!("📁 Loading configuration from: {}", path.display());
            let file = TomlConfig::from_file(path)?;
            config = config.apply_toml(&file);
        }

        if let Some(seconds) = self.timeout {
            config = config.with_timeout(seconds);
        }

        Ok(config.with_env_credentials(|name| std::env::var(name).ok()))
    }
}
