//! Dashboard Orchestrator
//!
//! Owns the two periodic tasks:
//!
//! - countdown tick: both countdowns, immediately and then every second
//! - guest poll: immediately, then every 30 seconds, and again on every resize
//!
//! The guest snapshot lives inside the guest task, so the chart is always
//! rendered from the same task that mutates it.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

use super::clock::Clock;
use super::sinks::{ChartSurface, CountdownSink, GuestSink};
use crate::chart::{render, MonospaceMeasure, Surface};
use crate::countdown::Countdown;
use crate::guests::{FetchError, GuestBoard, GuestClient, GuestClientConfig};

/// Runtime configuration of a dashboard
#[derive(Debug, Clone)]
pub struct DashboardConfig {
    pub dinner: Countdown,
    pub registration: Countdown,
    /// Countdown refresh period
    pub tick_interval: Duration,
    pub guests: GuestClientConfig,
    /// Guest endpoint polling period
    pub poll_interval: Duration,
    /// Initial chart surface
    pub surface: Surface,
    /// Label font advance used for word wrapping
    pub measure: MonospaceMeasure,
}

/// Where the dashboard presents its values
pub struct DashboardSinks {
    pub dinner: Box<dyn CountdownSink>,
    pub registration: Box<dyn CountdownSink>,
    pub guests: Box<dyn GuestSink>,
    pub chart: Option<Box<dyn ChartSurface>>,
}

/// Handle to one periodic task
pub struct TaskHandle {
    name: &'static str,
    handle: JoinHandle<()>,
}

impl TaskHandle {
    fn spawn<F>(name: &'static str, future: F) -> Self
    where
        F: std::future::Future<Output = ()> + Send + 'static,
    {
        tracing::debug!(task = name, "Starting dashboard task");
        Self {
            name,
            handle: tokio::spawn(future),
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Stop the task at its next suspension point
    pub fn cancel(&self) {
        tracing::debug!(task = self.name, "Cancelling dashboard task");
        self.handle.abort();
    }

    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }

    /// Wait for the task to end after a cancel
    pub async fn join(self) {
        if let Err(e) = self.handle.await {
            if !e.is_cancelled() {
                tracing::error!(task = self.name, error = %e, "Dashboard task panicked");
            }
        }
    }
}

/// A running dashboard.
///
/// Dropping it detaches both tasks; they keep running for the lifetime of the
/// runtime. Call [`Dashboard::shutdown`] to stop them.
pub struct Dashboard {
    countdowns: TaskHandle,
    guests: TaskHandle,
    resize_tx: mpsc::UnboundedSender<Surface>,
}

impl Dashboard {
    /// Start both periodic tasks. Must be called inside a tokio runtime.
    pub fn start(
        config: DashboardConfig,
        sinks: DashboardSinks,
        clock: Arc<dyn Clock>,
    ) -> Result<Self, FetchError> {
        let DashboardSinks {
            dinner,
            registration,
            guests,
            chart,
        } = sinks;

        let client = GuestClient::new(config.guests.clone())?;
        let board = GuestBoard::new(config.guests.variant, config.poll_interval);
        let (resize_tx, resize_rx) = mpsc::unbounded_channel();

        tracing::info!(
            dinner = %config.dinner.target(),
            registration = %config.registration.target(),
            endpoint_configured = client.is_configured(),
            "Starting dashboard"
        );

        let countdowns = TaskHandle::spawn(
            "countdown",
            run_countdowns(
                vec![(config.dinner, dinner), (config.registration, registration)],
                clock,
                config.tick_interval,
            ),
        );

        let worker = GuestWorker {
            client,
            board,
            sink: guests,
            chart,
            surface: config.surface,
            measure: config.measure,
        };
        let guests = TaskHandle::spawn(
            "guest-poll",
            worker.run(resize_rx, config.poll_interval),
        );

        Ok(Self {
            countdowns,
            guests,
            resize_tx,
        })
    }

    /// Report a new surface size; the guest task re-polls and re-renders
    pub fn resize(&self, surface: Surface) {
        if self.resize_tx.send(surface).is_err() {
            tracing::debug!("Guest task stopped, resize ignored");
        }
    }

    pub fn countdown_task(&self) -> &TaskHandle {
        &self.countdowns
    }

    pub fn guest_task(&self) -> &TaskHandle {
        &self.guests
    }

    /// Cancel both tasks and wait for them to stop
    pub async fn shutdown(self) {
        self.countdowns.cancel();
        self.guests.cancel();
        self.countdowns.join().await;
        self.guests.join().await;
        tracing::info!("Dashboard stopped");
    }
}

/// Render one countdown into its sink
pub fn present_countdown(countdown: &mut Countdown, sink: &mut dyn CountdownSink, now_ms: i64) {
    let result = countdown.tick(now_ms);
    sink.show_fields(&result.fields());
    if result.finished {
        sink.show_status(countdown.finished_message());
    }
}

async fn run_countdowns(
    mut countdowns: Vec<(Countdown, Box<dyn CountdownSink>)>,
    clock: Arc<dyn Clock>,
    tick_interval: Duration,
) {
    let mut ticker = tokio::time::interval(tick_interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        ticker.tick().await;

        let now = clock.now_ms();
        for (countdown, sink) in countdowns.iter_mut() {
            present_countdown(countdown, sink.as_mut(), now);
        }
    }
}

struct GuestWorker {
    client: GuestClient,
    board: GuestBoard,
    sink: Box<dyn GuestSink>,
    chart: Option<Box<dyn ChartSurface>>,
    surface: Surface,
    measure: MonospaceMeasure,
}

impl GuestWorker {
    async fn run(mut self, mut resize_rx: mpsc::UnboundedReceiver<Surface>, poll_interval: Duration) {
        if !self.client.is_configured() {
            self.board.apply(Err(FetchError::NotConfigured));
            self.present();

            // Nothing to poll; keep honouring resizes for the empty surface
            while let Some(surface) = resize_rx.recv().await {
                self.surface = surface;
                self.present();
            }
            return;
        }

        let mut ticker = tokio::time::interval(poll_interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        let mut resize_open = true;

        loop {
            let resized = tokio::select! {
                _ = ticker.tick() => false,
                resized = resize_rx.recv(), if resize_open => match resized {
                    Some(surface) => {
                        tracing::debug!(width = surface.width, height = surface.height, "Surface resized");
                        self.surface = surface;
                        true
                    }
                    None => {
                        resize_open = false;
                        continue;
                    }
                },
            };

            self.refresh(resized).await;
        }
    }

    /// Poll once. A failed poll leaves the chart as drawn unless the surface changed.
    async fn refresh(&mut self, resized: bool) {
        let result = self.client.poll().await;
        let polled = result.is_ok();
        self.board.apply(result);

        self.show_text();
        if polled || resized {
            self.draw_chart();
        }
    }

    fn present(&mut self) {
        self.show_text();
        self.draw_chart();
    }

    fn show_text(&mut self) {
        if let Some(snapshot) = self.board.snapshot() {
            self.sink.show_total(snapshot.total());
        }
        self.sink.show_status(self.board.status());
    }

    fn draw_chart(&mut self) {
        if let Some(chart) = self.chart.as_mut() {
            let categories = self
                .board
                .snapshot()
                .map(|s| s.categories())
                .unwrap_or_default();
            let commands = render(categories, self.surface, &self.measure);
            if let Err(e) = chart.draw(&commands) {
                tracing::warn!(error = %e, "Failed to draw guest chart");
            }
        }
    }
}
