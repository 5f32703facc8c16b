//! # Guestboard
//!
//! Event dashboard: live countdowns to a dinner and a registration deadline,
//! plus a periodically refreshed guest-attendance count or bar chart sourced
//! from a spreadsheet-backed HTTP endpoint.
//!
//! ## Modules
//!
//! - [`countdown`]: time-remaining arithmetic
//! - [`guests`]: attendance endpoint client and last-known-good state
//! - [`chart`]: bar chart layout, drawing commands and SVG output
//! - [`dashboard`]: periodic tasks and presentation sinks
//! - [`endpoint`]: CSV-backed read-only data endpoint
//! - [`config`]: TOML configuration with environment overrides
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use guestboard::{Config, Dashboard, SystemClock, TerminalScreen, DashboardSinks};
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = Config::load_default().dashboard()?;
//!
//!     let screen = TerminalScreen::stdout();
//!     let sinks = DashboardSinks {
//!         dinner: Box::new(screen.countdown_sink("Dinner")),
//!         registration: Box::new(screen.countdown_sink("Registration")),
//!         guests: Box::new(screen.guest_sink()),
//!         chart: None,
//!     };
//!
//!     let dashboard = Dashboard::start(config, sinks, Arc::new(SystemClock))?;
//!     tokio::signal::ctrl_c().await?;
//!     dashboard.shutdown().await;
//!     Ok(())
//! }
//! ```

pub mod chart;
pub mod config;
pub mod countdown;
pub mod dashboard;
pub mod endpoint;
pub mod guests;
pub mod logging;

// Re-export top-level types for convenience
pub use chart::{layout, render, ChartLayout, DrawCommand, MonospaceMeasure, Surface, SvgSurface};

pub use config::{Config, ConfigError, LoggingConfig};

pub use countdown::{compute, Countdown, CountdownFields, CountdownResult};

pub use dashboard::{
    ChartSurface, Clock, CountdownSink, Dashboard, DashboardConfig, DashboardSinks, GuestSink,
    SvgChartSink, SystemClock, TaskHandle, TerminalScreen,
};

pub use endpoint::{EndpointError, SheetOptions};

pub use guests::{
    Category, ErrorKind, FetchError, GuestBoard, GuestClient, GuestClientConfig, GuestSnapshot,
    GuestVariant,
};
