//! Sheet Endpoint
//!
//! Read-only HTTP endpoint serving attendance data from a CSV export of the
//! guest spreadsheet.
//!
//! # Endpoints
//!
//! - `GET /` - `{"confirmedGuests": n}`, or `{"totalConfirmed": n, "categories": [...]}`
//!   when a category column is configured
//! - `GET /health` - Liveness probe
//!
//! The sheet is re-read on every request.

mod error;
mod sheet;

pub use error::{EndpointError, EndpointResult, ErrorBody, ErrorResponse};
pub use sheet::{read_sheet, read_sheet_str, SheetOptions, UNCATEGORIZED_LABEL};

use axum::{extract::State, http::StatusCode, routing::get, Json, Router};
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::guests::GuestSnapshot;

/// Build the endpoint router
pub fn build_router(options: SheetOptions) -> Router {
    Router::new()
        .route("/", get(guest_report))
        .route("/health", get(liveness))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(Arc::new(options))
}

/// GET /
async fn guest_report(
    State(options): State<Arc<SheetOptions>>,
) -> EndpointResult<Json<GuestSnapshot>> {
    let snapshot = tokio::task::spawn_blocking(move || read_sheet(&options))
        .await
        .map_err(|e| EndpointError::Internal(format!("Sheet reader failed: {}", e)))??;

    Ok(Json(snapshot))
}

/// GET /health
async fn liveness() -> StatusCode {
    StatusCode::OK
}

/// Start the endpoint server
pub async fn serve(options: SheetOptions, addr: &str) -> EndpointResult<()> {
    let router = build_router(options);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("Guest sheet endpoint listening on {}", listener.local_addr()?);

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Guest sheet endpoint shut down gracefully");
    Ok(())
}

/// Wait for Ctrl+C or SIGTERM
pub async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to install signal handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received, starting graceful shutdown");
}
