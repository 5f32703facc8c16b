//! Guest Board
//!
//! Holds the last-known-good snapshot and the status line shown next to it.
//! Poll results are folded in with [`GuestBoard::apply`].

use std::time::Duration;

use super::error::{ErrorKind, FetchError};
use super::snapshot::{GuestSnapshot, GuestVariant};

pub const NOT_CONNECTED_MESSAGE: &str =
    "Guest counter not connected yet. Please add the data endpoint URL to the configuration.";

pub const NETWORK_FAILURE_MESSAGE: &str =
    "Error fetching guest count. Please check the data endpoint URL.";

const MISSING_COUNT_MESSAGE: &str = "Could not find 'confirmedGuests' in the response.";

const MISSING_CATEGORIES_MESSAGE: &str = "Could not read guest categories from the response.";

/// Display state for the guest section
#[derive(Debug, Clone)]
pub struct GuestBoard {
    variant: GuestVariant,
    poll_interval: Duration,
    snapshot: Option<GuestSnapshot>,
    status: String,
    last_error: Option<ErrorKind>,
}

impl GuestBoard {
    pub fn new(variant: GuestVariant, poll_interval: Duration) -> Self {
        Self {
            variant,
            poll_interval,
            snapshot: None,
            status: String::new(),
            last_error: None,
        }
    }

    /// Last successfully parsed snapshot, if any
    pub fn snapshot(&self) -> Option<&GuestSnapshot> {
        self.snapshot.as_ref()
    }

    pub fn status(&self) -> &str {
        &self.status
    }

    pub fn last_error(&self) -> Option<ErrorKind> {
        self.last_error
    }

    /// Fold a poll result into the board.
    ///
    /// Success replaces the snapshot wholesale; failure keeps it untouched.
    pub fn apply(&mut self, result: Result<GuestSnapshot, FetchError>) {
        match result {
            Ok(snapshot) => {
                self.status = self.live_message(&snapshot);
                self.snapshot = Some(snapshot);
                self.last_error = None;
            }
            Err(e) => {
                let kind = e.kind();
                match kind {
                    ErrorKind::ConfigurationMissing => {
                        tracing::info!("Guest data endpoint not configured, polling disabled");
                    }
                    ErrorKind::NetworkFailure => {
                        tracing::error!(error = %e, "Error fetching guest count");
                    }
                    ErrorKind::MalformedResponse => {
                        tracing::warn!(error = %e, "Unexpected guest data response");
                    }
                }
                self.status = self.error_message(&e).to_string();
                self.last_error = Some(kind);
            }
        }
    }

    fn live_message(&self, snapshot: &GuestSnapshot) -> String {
        let what = match snapshot {
            GuestSnapshot::Count { .. } => "Live count",
            GuestSnapshot::Chart { .. } => "Live breakdown",
        };
        format!(
            "{} from the guest sheet (updates every {} seconds).",
            what,
            self.poll_interval.as_secs()
        )
    }

    /// Chart-shaped bodies report categories even when the variant is `auto`
    fn error_message(&self, error: &FetchError) -> &'static str {
        match error {
            FetchError::NotConfigured => NOT_CONNECTED_MESSAGE,
            FetchError::Transport(_) | FetchError::HttpStatus { .. } => NETWORK_FAILURE_MESSAGE,
            FetchError::MalformedCategories(_) => MISSING_CATEGORIES_MESSAGE,
            FetchError::Malformed(_) if self.variant == GuestVariant::Chart => {
                MISSING_CATEGORIES_MESSAGE
            }
            FetchError::Malformed(_) => MISSING_COUNT_MESSAGE,
        }
    }
}
