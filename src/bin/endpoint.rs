//! Guestboard sheet endpoint
//!
//! Serves attendance data from a CSV export of the guest sheet.

use clap::Parser;
use guestboard::endpoint;
use guestboard::logging::init_logging;
use guestboard::Config;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "guestboard-endpoint")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Serve guest attendance from a CSV sheet export")]
struct Args {
    /// Config file (default: search the standard locations)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// CSV sheet export
    #[arg(short, long)]
    sheet: Option<PathBuf>,

    /// Port to listen on
    #[arg(short, long)]
    port: Option<u16>,

    /// 0-indexed column to group confirmed guests by
    #[arg(long)]
    category_column: Option<usize>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => Config::load_with_env(path)?,
        None => Config::load_default(),
    };

    if let Some(sheet) = args.sheet {
        config.endpoint.sheet_path = sheet.to_string_lossy().into_owned();
    }
    if let Some(port) = args.port {
        config.endpoint.port = port;
    }
    if args.category_column.is_some() {
        config.endpoint.category_column = args.category_column;
    }

    init_logging(&config.logging);

    tracing::info!("Guestboard endpoint v{}", env!("CARGO_PKG_VERSION"));
    tracing::info!("Sheet: {}", config.endpoint.sheet_path);

    endpoint::serve(config.endpoint.sheet_options(), &config.endpoint.addr()).await?;

    Ok(())
}
