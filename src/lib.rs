//! Extrato is a web app for browsing a personal financial ledger.
//!
//! The heart of the crate is the [ledger] module: a pure view engine that
//! turns a raw, unordered set of transactions into a paginated, filterable,
//! sortable table with a running account balance. The rest of the crate is
//! the serving shell around it: a REST API that directly serves HTML pages.

#![warn(missing_docs)]

use std::{net::SocketAddr, time::Duration};

use axum_server::Handle;
use tokio::signal;

mod app_state;
mod csv;
mod currency;
mod endpoints;
mod error;
mod html;
mod internal_server_error;
pub mod ledger;
mod logging;
mod navigation;
mod not_found;
mod pagination;
mod routing;
mod timezone;

pub use app_state::AppState;
pub use crate::csv::{load_ledger_csv, parse_ledger_csv};
pub use currency::format_currency;
pub use error::Error;
pub use logging::{LOG_BODY_LENGTH_LIMIT, logging_middleware};
pub use pagination::{PaginationConfig, PaginationIndicator, create_pagination_indicators};
pub use routing::build_router;

/// An async task that waits for either the ctrl+c or terminate signal,
/// whichever comes first, and then signals the server to shut down
/// gracefully.
///
/// `handle` is a handle to an Axum `Server`.
pub async fn graceful_shutdown(handle: Handle<SocketAddr>) {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::debug!("Received ctrl+c signal.");
            handle.graceful_shutdown(Some(Duration::from_secs(1)));
        },
        _ = terminate => {
            tracing::debug!("Received terminate signal.");
            handle.graceful_shutdown(Some(Duration::from_secs(1)));
        },
    }
}
