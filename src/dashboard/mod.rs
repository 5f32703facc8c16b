//! Dashboard
//!
//! Wires the countdown engine, the guest data client and the chart renderer to
//! timers and presentation sinks.
//!
//! ## Data Flow
//!
//! 1. The countdown task ticks both countdowns into their sinks every second
//! 2. The guest task polls the endpoint every 30 seconds
//! 3. A successful poll replaces the snapshot; the total and chart are redrawn
//! 4. A resize makes the guest task poll and redraw right away

mod clock;
mod orchestrator;
mod sinks;

pub use clock::{Clock, ManualClock, SystemClock};
pub use orchestrator::{present_countdown, Dashboard, DashboardConfig, DashboardSinks, TaskHandle};
pub use sinks::{
    ChartSurface, CountdownSink, GuestSink, SinkError, SvgChartSink, TerminalCountdownSink,
    TerminalGuestSink, TerminalScreen,
};
