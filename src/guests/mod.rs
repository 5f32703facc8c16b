//! Guest Data
//!
//! Polls the spreadsheet-backed attendance endpoint and keeps the last good
//! result for display.
//!
//! ## Architecture
//!
//! - **GuestClient**: cache-bypassing GET of the endpoint
//! - **GuestSnapshot**: count-only or categorized attendance data
//! - **GuestBoard**: last-known-good snapshot plus the status line

mod board;
mod client;
mod error;
mod snapshot;

pub use board::{GuestBoard, NETWORK_FAILURE_MESSAGE, NOT_CONNECTED_MESSAGE};
pub use client::{GuestClient, GuestClientConfig, PLACEHOLDER_ENDPOINT};
pub use error::{ErrorKind, FetchError, FetchResult};
pub use snapshot::{parse_snapshot, Category, GuestSnapshot, GuestVariant};

#[cfg(test)]
pub(crate) use client::tests::serve_fixed;
