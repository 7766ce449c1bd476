use anyhow::Result;
use clap::{Parser, ValueEnum};
use tracing_subscriber::EnvFilter;

#[derive(Clone, Copy, Debug, ValueEnum)]
enum LogFormat {
    Text,
    Json,
}

#[derive(Parser, Debug)]
#[command(name = "ingesta-raw")]
#[command(about = "RAW zone ingestion endpoint", long_about = None)]
struct Args {
    /// Path to config file
    #[arg(short, long)]
    config: Option<String>,

    /// Log output format
    #[arg(long, value_enum, default_value = "text", env = "INGESTA_LOG_FORMAT")]
    log_format: LogFormat,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let (writer, _guard) = tracing_appender::non_blocking(std::io::stdout());
    match args.log_format {
        LogFormat::Text => tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(writer)
            .init(),
        LogFormat::Json => tracing_subscriber::fmt()
            .json()
            .with_current_span(true)
            .with_env_filter(filter)
            .with_writer(writer)
            .init(),
    }

    if let Some(config) = args.config {
        std::env::set_var(ingesta_infrastructure::CONFIG_PATH_ENV, config);
    }

    ingesta_bootstrap::run_standalone().await
}
