use anyhow::Context;
use clap::Parser;
use seo_planner::utils::error::ErrorSeverity;
use seo_planner::utils::{logger, validation::Validate};
use seo_planner::{Aggregator, AppConfig, CliArgs, Keyword, SeoError};
use std::io::{self, BufRead, Write};

const PROMPT: &str = "Enter a keyword for SEO analysis: ";

fn read_keyword(args: &CliArgs) -> Result<Keyword, SeoError> {
    if let Some(raw) = &args.keyword {
        return Keyword::parse(raw);
    }

    let mut stdout = io::stdout();
    write!(stdout, "{}", PROMPT)?;
    stdout.flush()?;

    let mut line = String::new();
    io::stdin().lock().read_line(&mut line)?;
    Keyword::parse(&line)
}

fn load_config(args: &CliArgs) -> Result<AppConfig, SeoError> {
    let config = args.load_config()?;
    config.validate()?;
    Ok(config)
}

fn exit_with(e: SeoError) -> ! {
    tracing::error!(
        "❌ {} (Category: {:?}, Severity: {:?})",
        e,
        e.category(),
        e.severity()
    );
    eprintln!("❌ {}", e.user_friendly_message());
    eprintln!("💡 Suggestion: {}", e.recovery_suggestion());

    let exit_code = match e.severity() {
        ErrorSeverity::Low => 0,
        ErrorSeverity::Medium => 2,
        ErrorSeverity::High => 1,
        ErrorSeverity::Critical => 3,
    };
    std::process::exit(exit_code);
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = CliArgs::parse();

    if args.log_json {
        logger::init_json_logger(args.verbose);
    } else {
        logger::init_cli_logger(args.verbose);
    }

    if args.verbose {
        tracing::debug!("CLI args: {:?}", args);
    }

    let config = load_config(&args).unwrap_or_else(|e| exit_with(e));

    // Missing keys are not fatal; the provider reports its own auth failure.
    for missing in config.missing_credentials() {
        tracing::warn!("⚠️  {}", missing);
    }

    let keyword = read_keyword(&args).unwrap_or_else(|e| exit_with(e));

    let aggregator = Aggregator::from_config(&config);
    let mut stdout = io::stdout();
    aggregator
        .run(&keyword, &mut stdout)
        .await
        .context("failed to write report to stdout")?;

    Ok(())
}
