use anyhow::Result;
use cfgview::aws::client::AwsClients;
use cfgview::config::Config;
use cfgview::server;
use clap::{Parser, ValueEnum};
use std::path::PathBuf;
use tracing::Level;
use tracing_subscriber::EnvFilter;

/// Version injected at compile time via CFGVIEW_VERSION env var (set by CI/CD),
/// or "dev" for local builds.
pub const VERSION: &str = match option_env!("CFGVIEW_VERSION") {
    Some(v) => v,
    None => "dev",
};

/// Web viewer for AWS Config aggregator data
#[derive(Parser, Debug)]
#[command(name = "cfgview", version, about, long_about = None)]
struct Args {
    /// Configuration aggregator name (overrides CONFIG_AGGREGATOR_NAME)
    #[arg(short, long)]
    aggregator: Option<String>,

    /// Region the aggregator lives in (overrides AWS_REGION)
    #[arg(short, long)]
    region: Option<String>,

    /// Listen address (overrides CFGVIEW_BIND)
    #[arg(short, long)]
    bind: Option<String>,

    /// Alternate config file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Log level (RUST_LOG takes precedence when set)
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
    log_file: Option<&PathBuf>,
) -> Result<Option<tracing_appender::non_blocking::WorkerGuard>> {
    let Some(tracing_level) = level.to_tracing_level() else {
        return Ok(None);
    };

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!(
            "cfgview={},warn",
            tracing_level.to_string().to_lowercase()
        ))
    });

    let (non_blocking, guard) = match log_file {
        Some(path) => {
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent)?;
            }
            let file = std::fs::OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)?;
            tracing_appender::non_blocking(file)
        }
        None => tracing_appender::non_blocking(std::io::stdout()),
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(non_blocking)
        .with_ansi(log_file.is_none())
        .with_target(true)
        .with_thread_ids(false)
        .with_file(true)
        .with_line_number(true)
        .init();

    tracing::info!("cfgview {} started with log level: {:?}", VERSION, level);
    if let Some(path) = log_file {
        tracing::info!("Log file: {:?}", path);
    }

    Ok(Some(guard))
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let _log_guard = setup_logging(args.log_level, args.log_file.as_ref())?;

    let config = match &args.config {
        Some(path) => Config::load_from(path),
        None => Config::load(),
    };
    let settings = config.resolve(args.aggregator, args.region, args.bind)?;

    tracing::info!(
        "Using aggregator: {}, region: {}",
        settings.aggregator_name,
        settings.region
    );

    let clients = AwsClients::new(&settings.aggregator_name, &settings.region).await;

    server::serve(clients, &settings.bind).await
}
