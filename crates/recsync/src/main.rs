// # recsync - single-record DNS sync
//
// CRITICAL RULES:
// - This is a THIN integration layer ONLY
// - DO NOT add reconciliation or provider logic here; it lives in recsync-core
//   and recsync-provider-cloudflare
// - Configuration is via environment variables ONLY
//
// The binary is responsible for:
// 1. Reading and validating configuration from environment variables
// 2. Building the log subscriber
// 3. Building the provider and engine
// 4. Running the engine once and mapping the result to an exit code
//
// ## Configuration
//
// ### Required
// - `INPUT_CLOUDFLARE_API_TOKEN`: Cloudflare API token
// - `INPUT_DOMAIN`: Fully-qualified record name (e.g., app.example.com)
// - `INPUT_TARGET`: Desired CNAME target
//
// ### Optional
// - `INPUT_COMMENT`: Annotation for newly created records
// - `RECSYNC_MODE`: `live` (default) or `dry-run`
// - `RECSYNC_LOG_LEVEL`: trace, debug, info (default), warn, error
//
// ## Example
//
// ```bash
// export INPUT_CLOUDFLARE_API_TOKEN=your_token
// export INPUT_DOMAIN=app.example.com
// export INPUT_TARGET=lb.example.net
//
// recsync
// ```

use anyhow::{Context, Result};
use recsync_core::{ReconcileOutcome, SyncConfig, SyncEngine};
use recsync_provider_cloudflare::CloudflareProvider;
use std::env;
use std::process::ExitCode;
use tracing::{Level, error, info};
use tracing_subscriber::FmtSubscriber;

/// Environment key selecting the log level
const ENV_LOG_LEVEL: &str = "RECSYNC_LOG_LEVEL";

/// Exit codes for different termination scenarios
///
/// - 0: Record converged (created, unchanged or updated)
/// - 1: Configuration or startup error
/// - 2: Sync failure (any pipeline step)
#[derive(Debug, Clone, Copy)]
enum RecsyncExitCode {
    /// Record converged
    Converged = 0,
    /// Configuration error or startup failure
    ConfigError = 1,
    /// A pipeline step failed
    SyncFailed = 2,
}

impl From<RecsyncExitCode> for ExitCode {
    fn from(code: RecsyncExitCode) -> Self {
        ExitCode::from(code as u8)
    }
}

/// Application configuration
struct Config {
    sync: SyncConfig,
    log_level: Level,
}

impl Config {
    /// Load and validate configuration from environment variables
    fn from_env() -> Result<Self> {
        let sync = SyncConfig::from_lookup(|key| env::var(key).ok())
            .context("invalid sync configuration")?;

        let log_level = parse_log_level(
            &env::var(ENV_LOG_LEVEL).unwrap_or_else(|_| "info".to_string()),
        )?;

        Ok(Self { sync, log_level })
    }
}

/// Parse a log level name
fn parse_log_level(value: &str) -> Result<Level> {
    match value.trim().to_lowercase().as_str() {
        "trace" => Ok(Level::TRACE),
        "debug" => Ok(Level::DEBUG),
        "info" => Ok(Level::INFO),
        "warn" => Ok(Level::WARN),
        "error" => Ok(Level::ERROR),
        other => anyhow::bail!(
            "{} '{}' is not valid. \
            Valid levels: trace, debug, info, warn, error",
            ENV_LOG_LEVEL,
            other
        ),
    }
}

fn main() -> ExitCode {
    let config = match Config::from_env() {
        Ok(cfg) => cfg,
        Err(e) => {
            eprintln!("Configuration error: {:#}", e);
            return RecsyncExitCode::ConfigError.into();
        }
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(config.log_level)
        .with_writer(std::io::stderr)
        .finish();

    // Scoped to this run; no global default is installed
    tracing::subscriber::with_default(subscriber, || run(config)).into()
}

/// Build the runtime, provider and engine, then sync once
fn run(config: Config) -> RecsyncExitCode {
    let rt = match tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
    {
        Ok(runtime) => runtime,
        Err(e) => {
            error!("Failed to create tokio runtime: {}", e);
            return RecsyncExitCode::ConfigError;
        }
    };

    let provider = match CloudflareProvider::from_config(&config.sync) {
        Ok(provider) => provider,
        Err(e) => {
            error!("Failed to create provider: {}", e);
            return RecsyncExitCode::ConfigError;
        }
    };

    let engine = SyncEngine::from_config(Box::new(provider), &config.sync);

    if engine.mode().is_dry_run() {
        info!("Running in DRY-RUN mode - no changes will be made");
    }

    let desired = config.sync.desired_record();
    match rt.block_on(engine.run(&desired)) {
        Ok(outcome) => {
            match outcome {
                ReconcileOutcome::Created { content } => {
                    info!(record = %desired.name, %content, "Sync finished: created");
                }
                ReconcileOutcome::Unchanged { content } => {
                    info!(record = %desired.name, %content, "Sync finished: unchanged");
                }
                ReconcileOutcome::Updated {
                    previous_content,
                    content,
                } => {
                    info!(
                        record = %desired.name,
                        from = %previous_content,
                        to = %content,
                        "Sync finished: updated"
                    );
                }
            }
            RecsyncExitCode::Converged
        }
        Err(e) => {
            let step = e
                .step()
                .map(|s| s.to_string())
                .unwrap_or_else(|| "sync".to_string());
            error!(
                step = %step,
                kind = e.kind(),
                "{}",
                e
            );
            RecsyncExitCode::SyncFailed
        }
    }
}
