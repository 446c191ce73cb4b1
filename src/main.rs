use clap::{Parser, Subcommand};
use miette::{IntoDiagnostic, Result};
use qrispay::config::GatewayConfig;
use qrispay::interfaces::commands::{self, CrcArgs, CreateArgs, InspectArgs, StatusArgs};
use std::io;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path to the configuration file (TOML). Defaults apply when it is missing.
    #[arg(short, long, default_value = "qrispay.toml")]
    config: PathBuf,

    /// Override the configured log level (trace, debug, info, warn, error).
    #[arg(long)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Create a dynamic QRIS payment from a static merchant code.
    Create(CreateArgs),
    /// Check once whether a payment has settled.
    Status(StatusArgs),
    /// Poll until a payment settles or its validity window elapses.
    Watch(StatusArgs),
    /// Print the CRC16 checksum of the input.
    Crc(CrcArgs),
    /// Decode a QRIS payload and verify its checksum.
    Inspect(InspectArgs),
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = GatewayConfig::load(&cli.config).into_diagnostic()?;
    if let Some(level) = cli.log_level {
        config.logging.level = level;
    }

    // Logs go to stderr, stdout carries the JSON results
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.logging.level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();

    let stdout = io::stdout();
    let mut out = stdout.lock();
    let result = match &cli.command {
        Command::Create(args) => commands::create(&config, args, &mut out),
        Command::Status(args) => commands::status(&config, args, &mut out).await,
        Command::Watch(args) => commands::watch(&config, args, &mut out).await,
        Command::Crc(args) => commands::crc(args, &mut out),
        Command::Inspect(args) => commands::inspect(args, &mut out),
    };
    result.into_diagnostic()
}
