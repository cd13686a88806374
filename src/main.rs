use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::Level;
use tracing_subscriber::fmt::writer::MakeWriterExt;
use ucmon::config::Config;
use ucmon::server::{self, AppState};
use ucmon::ucloud::client::UCloudClient;

/// UCloud monitor adapter
#[derive(Parser, Debug)]
#[command(name = "ucmon", version = ucmon::VERSION, about, long_about = None)]
struct Args {
    /// Config file (defaults to <config dir>/ucmon/config.json)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Address to listen on
    #[arg(short, long)]
    listen: Option<String>,

    /// Default UCloud project
    #[arg(short, long)]
    project: Option<String>,

    /// UCloud API endpoint
    #[arg(long)]
    base_url: Option<String>,

    /// Log level
    #[arg(long, value_enum, default_value = "info")]
    log_level: LogLevel,

    /// Write logs to this file instead of stdout
    #[arg(long)]
    log_file: Option<PathBuf>,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum LogLevel {
    Off,
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    fn to_tracing_level(self) -> Option<Level> {
        match self {
            LogLevel::Off => None,
            LogLevel::Error => Some(Level::ERROR),
            LogLevel::Warn => Some(Level::WARN),
            LogLevel::Info => Some(Level::INFO),
            LogLevel::Debug => Some(Level::DEBUG),
            LogLevel::Trace => Some(Level::TRACE),
        }
    }
}

fn setup_logging(
    level: LogLevel,
    log_file: Option<&Path>,
) -> Result<Option<tracing_appender::non_blocking::WorkerGuard>> {
    let Some(tracing_level) = level.to_tracing_level() else {
        return Ok(None);
    };

    let (non_blocking, guard) = match log_file {
        Some(path) => {
            if let Some(parent) = path.parent() {
                let _ = std::fs::create_dir_all(parent);
            }
            let file = std::fs::OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .with_context(|| format!("Failed to open log file {}", path.display()))?;
            tracing_appender::non_blocking(file)
        }
        None => tracing_appender::non_blocking(std::io::stdout()),
    };

    tracing_subscriber::fmt()
        .with_max_level(tracing_level)
        .with_writer(non_blocking.with_max_level(tracing_level))
        .with_ansi(log_file.is_none())
        .with_target(true)
        .with_thread_ids(false)
        .with_file(true)
        .with_line_number(true)
        .init();

    tracing::info!("ucmon {} started with log level: {:?}", ucmon::VERSION, level);
    if let Some(path) = log_file {
        tracing::info!("Log file: {:?}", path);
    }

    Ok(Some(guard))
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let _log_guard = setup_logging(args.log_level, args.log_file.as_deref())?;

    let mut config = Config::load(args.config.as_deref())?;
    config.apply_overrides(
        args.listen.as_deref(),
        args.project.as_deref(),
        args.base_url.as_deref(),
    );
    config.validate()?;
    tracing::debug!("Effective config: {:?}", config);

    let credentials = config.credentials();
    let health = credentials.check();
    if health.status != ucmon::ucloud::auth::HealthStatus::Ok {
        tracing::warn!("{}", health.message);
    }

    let client = UCloudClient::new(credentials.clone(), &config.client_options())
        .context("Failed to create UCloud client")?;
    tracing::info!(
        "Using UCloud API at {} (default project: {})",
        config.base_url,
        config.project_id.as_deref().unwrap_or("none")
    );

    let state = Arc::new(AppState::new(Arc::new(client), credentials));
    server::serve(&config.listen, state).await
}
