//! Presentation sinks
//!
//! The orchestrator pushes display values into sinks; it never reads them back.
//! Two implementations ship with the crate: a terminal screen for the text
//! fields and an SVG file for the chart.

use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard};

use crossterm::cursor::MoveTo;
use crossterm::queue;
use crossterm::style::Print;
use crossterm::terminal::{Clear, ClearType};
use crossterm::tty::IsTty;
use thiserror::Error;

use crate::chart::{DrawCommand, SvgSurface};
use crate::countdown::CountdownFields;

/// Four numeric fields plus a status line for one countdown
pub trait CountdownSink: Send {
    fn show_fields(&mut self, fields: &CountdownFields);
    fn show_status(&mut self, message: &str);
}

/// Total confirmed guests plus a status line
pub trait GuestSink: Send {
    fn show_total(&mut self, total: u64);
    fn show_status(&mut self, message: &str);
}

/// 2D surface the attendance chart is drawn on
pub trait ChartSurface: Send {
    fn draw(&mut self, commands: &[DrawCommand]) -> Result<(), SinkError>;
}

/// Errors raised by presentation sinks
#[derive(Error, Debug)]
pub enum SinkError {
    #[error("Failed to write {path:?}: {error}")]
    Io {
        path: PathBuf,
        error: std::io::Error,
    },
}

// ============================================
// SVG chart file
// ============================================

/// Writes the chart to an SVG file on every draw
pub struct SvgChartSink {
    path: PathBuf,
    surface: SvgSurface,
}

impl SvgChartSink {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            surface: SvgSurface::new().with_background("#ffffff"),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ChartSurface for SvgChartSink {
    fn draw(&mut self, commands: &[DrawCommand]) -> Result<(), SinkError> {
        let svg = self.surface.render(commands);
        std::fs::write(&self.path, svg).map_err(|error| SinkError::Io {
            path: self.path.clone(),
            error,
        })?;

        tracing::debug!(path = ?self.path, commands = commands.len(), "Chart written");
        Ok(())
    }
}

// ============================================
// Terminal screen
// ============================================

/// Shared terminal output for all text sinks.
///
/// On an interactive terminal every update redraws the whole screen; otherwise
/// each update is printed as one line.
#[derive(Clone)]
pub struct TerminalScreen {
    inner: Arc<Mutex<Screen>>,
}

struct Screen {
    countdowns: Vec<CountdownPanel>,
    guest_total: Option<u64>,
    guest_status: String,
    interactive: bool,
    out: Box<dyn Write + Send>,
}

struct CountdownPanel {
    label: String,
    fields: Option<CountdownFields>,
    status: String,
}

impl TerminalScreen {
    /// Screen on standard output
    pub fn stdout() -> Self {
        let interactive = std::io::stdout().is_tty();
        Self::with_writer(Box::new(std::io::stdout()), interactive)
    }

    pub fn with_writer(out: Box<dyn Write + Send>, interactive: bool) -> Self {
        Self {
            inner: Arc::new(Mutex::new(Screen {
                countdowns: Vec::new(),
                guest_total: None,
                guest_status: String::new(),
                interactive,
                out,
            })),
        }
    }

    /// Add a countdown panel and return its sink
    pub fn countdown_sink(&self, label: impl Into<String>) -> TerminalCountdownSink {
        let mut screen = self.lock();
        screen.countdowns.push(CountdownPanel {
            label: label.into(),
            fields: None,
            status: String::new(),
        });

        TerminalCountdownSink {
            screen: self.clone(),
            panel: screen.countdowns.len() - 1,
        }
    }

    pub fn guest_sink(&self) -> TerminalGuestSink {
        TerminalGuestSink {
            screen: self.clone(),
        }
    }

    /// Current screen contents
    pub fn render(&self) -> String {
        self.lock().render()
    }

    fn lock(&self) -> MutexGuard<'_, Screen> {
        match self.inner.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }

    fn update(&self, line: String, apply: impl FnOnce(&mut Screen)) {
        let mut screen = self.lock();
        apply(&mut screen);

        let written = if screen.interactive {
            let text = screen.render();
            queue!(screen.out, Clear(ClearType::All), MoveTo(0, 0), Print(text))
        } else {
            writeln!(screen.out, "{}", line)
        };
        if let Err(e) = written.and_then(|_| screen.out.flush()) {
            tracing::debug!(error = %e, "Terminal write failed");
        }
    }
}

impl Screen {
    fn render(&self) -> String {
        let mut out = String::new();

        for panel in &self.countdowns {
            let remaining = panel
                .fields
                .as_ref()
                .map(|f| format!("{}d {}h {}m {}s", f.days, f.hours, f.minutes, f.seconds))
                .unwrap_or_else(|| "--".to_string());
            out.push_str(&format!("{:<14} {}\n", format!("{}:", panel.label), remaining));
            if !panel.status.is_empty() {
                out.push_str(&format!("{:<14} {}\n", "", panel.status));
            }
        }

        let total = self
            .guest_total
            .map(|t| t.to_string())
            .unwrap_or_else(|| "--".to_string());
        out.push_str(&format!("{:<14} {}\n", "Guests:", total));
        if !self.guest_status.is_empty() {
            out.push_str(&format!("{:<14} {}\n", "", self.guest_status));
        }

        out
    }
}

/// Terminal panel for one countdown
pub struct TerminalCountdownSink {
    screen: TerminalScreen,
    panel: usize,
}

impl CountdownSink for TerminalCountdownSink {
    fn show_fields(&mut self, fields: &CountdownFields) {
        let panel = self.panel;
        let fields = fields.clone();
        let line = {
            let screen = self.screen.lock();
            format!(
                "{}: {}d {}h {}m {}s",
                screen.countdowns[panel].label,
                fields.days,
                fields.hours,
                fields.minutes,
                fields.seconds
            )
        };
        self.screen.update(line, |screen| {
            screen.countdowns[panel].fields = Some(fields);
        });
    }

    fn show_status(&mut self, message: &str) {
        let panel = self.panel;
        let line = {
            let screen = self.screen.lock();
            if screen.countdowns[panel].status == message {
                return;
            }
            format!("{}: {}", screen.countdowns[panel].label, message)
        };
        self.screen.update(line, |screen| {
            screen.countdowns[panel].status = message.to_string();
        });
    }
}

/// Terminal panel for the guest count
pub struct TerminalGuestSink {
    screen: TerminalScreen,
}

impl GuestSink for TerminalGuestSink {
    fn show_total(&mut self, total: u64) {
        self.screen.update(format!("Guests: {}", total), |screen| {
            screen.guest_total = Some(total);
        });
    }

    fn show_status(&mut self, message: &str) {
        if self.screen.lock().guest_status == message {
            return;
        }
        self.screen
            .update(format!("Guests: {}", message), |screen| {
                screen.guest_status = message.to_string();
            });
    }
}
