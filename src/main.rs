//! Guestboard CLI
//!
//! Runs the event dashboard in the terminal:
//! - Live dinner and registration countdowns
//! - Guest count polled from the sheet endpoint
//! - Attendance chart written as SVG

use anyhow::Context;
use clap::{Parser, Subcommand};
use guestboard::chart::{render, SvgSurface};
use guestboard::dashboard::present_countdown;
use guestboard::guests::{parse_snapshot, GuestBoard, GuestClient};
use guestboard::logging::init_logging;
use guestboard::{
    ChartSurface, Config, Dashboard, DashboardSinks, GuestSink, GuestVariant, Surface,
    SvgChartSink, SystemClock, TerminalScreen,
};
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Parser)]
#[command(name = "guestboard")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Event countdowns and live guest attendance")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Config file (default: search the standard locations)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run the dashboard (default)
    Run {
        /// Guest data endpoint URL
        #[arg(short, long)]
        endpoint: Option<String>,
        /// Response shape (count, chart, auto)
        #[arg(long)]
        variant: Option<GuestVariant>,
        /// Refresh everything once and exit
        #[arg(long)]
        once: bool,
        /// Do not write the chart file
        #[arg(long)]
        no_chart: bool,
    },

    /// Print both countdowns once
    Countdown,

    /// Render a chart from a saved endpoint response
    Chart {
        /// JSON file in the endpoint's response format
        input: PathBuf,
        /// Output SVG file (default: the configured chart output)
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Width in layout units
        #[arg(long)]
        width: Option<f64>,
        /// Height in layout units
        #[arg(long)]
        height: Option<f64>,
        /// Device pixels per layout unit
        #[arg(long)]
        ratio: Option<f64>,
    },

    /// Generate default config file
    Config {
        /// Output path (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => Config::load_with_env(path)?,
        None => Config::load_default(),
    };

    let command = cli.command.unwrap_or(Commands::Run {
        endpoint: None,
        variant: None,
        once: false,
        no_chart: false,
    });

    match command {
        Commands::Config { output } => {
            let content = guestboard::config::generate_default_config();
            match output {
                Some(path) => {
                    std::fs::write(&path, content)
                        .with_context(|| format!("writing {}", path.display()))?;
                    println!("Config written to {}", path.display());
                }
                None => print!("{}", content),
            }
            return Ok(());
        }

        Commands::Countdown => {
            let dashboard = config.dashboard()?;
            let screen = TerminalScreen::with_writer(Box::new(std::io::stdout()), false);
            let now = chrono::Utc::now().timestamp_millis();
            for mut countdown in [dashboard.dinner, dashboard.registration] {
                let mut sink = screen.countdown_sink(countdown.name().to_string());
                present_countdown(&mut countdown, &mut sink, now);
            }
            return Ok(());
        }

        Commands::Chart {
            input,
            output,
            width,
            height,
            ratio,
        } => {
            init_logging(&config.logging);
            let dashboard = config.dashboard()?;

            let body = std::fs::read(&input).with_context(|| format!("reading {}", input.display()))?;
            let snapshot = parse_snapshot(&body, GuestVariant::Chart)?;

            let surface = Surface::new(
                width.unwrap_or(dashboard.surface.width),
                height.unwrap_or(dashboard.surface.height),
            )
            .with_pixel_ratio(ratio.unwrap_or(dashboard.surface.pixel_ratio));
            let commands = render(snapshot.categories(), surface, &dashboard.measure);

            let output = output.unwrap_or_else(|| PathBuf::from(&config.chart.output));
            std::fs::write(&output, SvgSurface::new().with_background("#ffffff").render(&commands))
                .with_context(|| format!("writing {}", output.display()))?;
            println!(
                "Chart with {} categories written to {}",
                snapshot.categories().len(),
                output.display()
            );
            return Ok(());
        }

        Commands::Run {
            endpoint,
            variant,
            once,
            no_chart,
        } => {
            if let Some(endpoint) = endpoint {
                config.guests.endpoint = endpoint;
            }
            if let Some(variant) = variant {
                config.guests.variant = variant;
            }
            if no_chart {
                config.chart.enabled = false;
            }

            init_logging(&config.logging);
            tracing::info!("Guestboard v{}", env!("CARGO_PKG_VERSION"));

            if once {
                run_once(&config).await
            } else {
                run_dashboard(&config).await
            }
        }
    }
}

fn chart_sink(config: &Config) -> Option<Box<dyn ChartSurface>> {
    config.chart.enabled.then(|| {
        tracing::info!("Writing guest chart to {}", config.chart.output);
        Box::new(SvgChartSink::new(&config.chart.output)) as Box<dyn ChartSurface>
    })
}

async fn run_dashboard(config: &Config) -> anyhow::Result<()> {
    let dashboard_config = config.dashboard()?;

    let screen = TerminalScreen::stdout();
    let sinks = DashboardSinks {
        dinner: Box::new(screen.countdown_sink(dashboard_config.dinner.name().to_string())),
        registration: Box::new(
            screen.countdown_sink(dashboard_config.registration.name().to_string()),
        ),
        guests: Box::new(screen.guest_sink()),
        chart: chart_sink(config),
    };

    let dashboard = Dashboard::start(dashboard_config, sinks, Arc::new(SystemClock))?;

    guestboard::endpoint::shutdown_signal().await;

    tracing::info!("Shutting down...");
    dashboard.shutdown().await;
    Ok(())
}

async fn run_once(config: &Config) -> anyhow::Result<()> {
    let dashboard_config = config.dashboard()?;
    let screen = TerminalScreen::with_writer(Box::new(std::io::stdout()), false);

    let now = chrono::Utc::now().timestamp_millis();
    for mut countdown in [dashboard_config.dinner, dashboard_config.registration] {
        let mut sink = screen.countdown_sink(countdown.name().to_string());
        present_countdown(&mut countdown, &mut sink, now);
    }

    let client = GuestClient::new(dashboard_config.guests.clone())?;
    let mut board = GuestBoard::new(
        dashboard_config.guests.variant,
        dashboard_config.poll_interval,
    );
    board.apply(client.poll().await);

    let mut guests = screen.guest_sink();
    if let Some(snapshot) = board.snapshot() {
        guests.show_total(snapshot.total());
    }
    guests.show_status(board.status());

    if let Some(mut chart) = chart_sink(config) {
        let categories = board.snapshot().map(|s| s.categories()).unwrap_or_default();
        chart.draw(&render(
            categories,
            dashboard_config.surface,
            &dashboard_config.measure,
        ))?;
    }

    Ok(())
}
