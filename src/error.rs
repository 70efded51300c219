//! Defines the app level error type and conversions to rendered HTML pages.

use axum::response::{IntoResponse, Response};

use crate::{internal_server_error::InternalServerError, not_found::NotFoundError};

/// The errors that may occur in the application.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum Error {
    /// The ledger CSV file could not be opened or read.
    ///
    /// The string carries the file path and the underlying I/O error text.
    #[error("could not read the ledger file: {0}")]
    LedgerFileRead(String),

    /// The ledger CSV data was structurally invalid (bad quoting, wrong
    /// field counts). Degraded values inside valid rows are recovered
    /// instead of raising this.
    #[error("could not parse the ledger CSV: {0}")]
    InvalidCsv(String),

    /// An error occurred while getting the local timezone from a canonical
    /// timezone string.
    #[error("invalid timezone {0}")]
    InvalidTimezone(String),

    /// The requested resource was not found.
    #[error("the requested resource could not be found")]
    NotFound,
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        match self {
            Error::NotFound => NotFoundError.into_response(),
            Error::InvalidTimezone(timezone) => InternalServerError {
                description: "Invalid Timezone Settings",
                fix: &format!(
                    "Could not get local timezone \"{timezone}\". Check your server settings and \
                    ensure the timezone has been set to a valid, canonical timezone string"
                ),
            }
            .into_response(),
            // Any errors that are not handled above are not intended to be shown to the client.
            error => {
                tracing::error!("An unexpected error occurred: {}", error);
                InternalServerError::default().into_response()
            }
        }
    }
}
