//! well-forecast: command-line decline-curve forecaster
//!
//! Loads a forecast configuration, builds the facility tree, replays the rig
//! programs, and writes one production rollup.
//!
//! # Usage
//!
//! ```text
//! well-forecast --config forecast.toml --level platform --format csv
//! well-forecast --config forecast.toml --level field --format json --output field.json
//! ```
//!
//! # Environment Variables
//!
//! - `WELL_FORECAST_CONFIG`: Configuration path when `--config` is absent
//! - `RUST_LOG`: Logging level (default: info)

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use std::io::Write;
use std::path::PathBuf;
use tracing::info;

use well_forecast::config::defaults::CONFIG_ENV_VAR;
use well_forecast::profile::field_csv;
use well_forecast::{Forecast, ForecastConfig, Level};

// ============================================================================
// CLI Arguments
// ============================================================================

#[derive(Parser, Debug)]
#[command(name = "well-forecast")]
#[command(about = "Decline-curve production forecast for an asset hierarchy")]
#[command(version)]
struct CliArgs {
    /// Path to the forecast configuration (TOML)
    #[arg(long, short, env = CONFIG_ENV_VAR, value_name = "PATH")]
    config: PathBuf,

    /// Hierarchy level to roll production up to
    #[arg(long, value_enum, default_value = "field")]
    level: LevelArg,

    /// Output format
    #[arg(long, value_enum, default_value = "csv")]
    format: OutputFormat,

    /// Write to this file instead of stdout
    #[arg(long, short, value_name = "PATH")]
    output: Option<PathBuf>,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum LevelArg {
    Field,
    Pex,
    Platform,
    Well,
}

impl From<LevelArg> for Level {
    fn from(arg: LevelArg) -> Self {
        match arg {
            LevelArg::Field => Level::Field,
            LevelArg::Pex => Level::Pex,
            LevelArg::Platform => Level::Platform,
            LevelArg::Well => Level::Well,
        }
    }
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum OutputFormat {
    Csv,
    Json,
}

// ============================================================================
// Rendering
// ============================================================================

fn render(forecast: &Forecast, level: Level, format: OutputFormat) -> Result<String> {
    let rendered = match (level, format) {
        (Level::Field, OutputFormat::Csv) => field_csv(&forecast.field_production()),
        (Level::Field, OutputFormat::Json) => serde_json::to_string_pretty(&forecast.field_production())
            .context("Failed to serialize field production")?,
        (level, OutputFormat::Csv) => forecast.production(level).to_csv(),
        (level, OutputFormat::Json) => serde_json::to_string_pretty(&forecast.production(level))
            .with_context(|| format!("Failed to serialize {level} production"))?,
    };
    Ok(rendered)
}

// ============================================================================
// Main Entry Point
// ============================================================================

fn main() -> Result<()> {
    // Logs go to stderr so stdout carries only the rollup
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let args = CliArgs::parse();

    let config = ForecastConfig::load_from_file(&args.config)
        .with_context(|| format!("Failed to load config {}", args.config.display()))?;
    info!(
        case = %config.description.name,
        start = %config.start_date(),
        "Forecast configuration loaded"
    );

    let forecast = Forecast::build(&config).context("Forecast failed")?;

    let level = Level::from(args.level);
    let rendered = render(&forecast, level, args.format)?;

    match &args.output {
        Some(path) => {
            std::fs::write(path, &rendered)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            info!(path = %path.display(), level = %level, "Rollup written");
        }
        None => {
            let mut stdout = std::io::stdout().lock();
            stdout
                .write_all(rendered.as_bytes())
                .context("Failed to write to stdout")?;
            stdout.flush().context("Failed to flush stdout")?;
        }
    }

    Ok(())
}
