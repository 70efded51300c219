//! Implements a struct that holds the state of the server.

use std::sync::Arc;

use crate::{Error, ledger::LedgerEntry, pagination::PaginationConfig, timezone::get_local_offset};

/// The state of the server.
#[derive(Debug, Clone)]
pub struct AppState {
    /// The ledger entries, loaded once at startup and shared read-only
    /// between requests. Each request recomputes its view from this set.
    pub entries: Arc<Vec<LedgerEntry>>,

    /// The local timezone as a canonical timezone name, e.g.
    /// "America/Sao_Paulo".
    pub local_timezone: String,

    /// The config that controls how to display pages of data.
    pub pagination_config: PaginationConfig,
}

impl AppState {
    /// Create a new [AppState] holding `entries`.
    ///
    /// `local_timezone` should be a valid, canonical timezone name, e.g.
    /// "America/Sao_Paulo".
    ///
    /// # Errors
    /// Returns [Error::InvalidTimezone] if the timezone name cannot be
    /// resolved, so a misconfigured server fails at startup instead of on
    /// every request.
    pub fn new(
        entries: Vec<LedgerEntry>,
        local_timezone: &str,
        pagination_config: PaginationConfig,
    ) -> Result<Self, Error> {
        if get_local_offset(local_timezone).is_none() {
            return Err(Error::InvalidTimezone(local_timezone.to_owned()));
        }

        Ok(Self {
            entries: Arc::new(entries),
            local_timezone: local_timezone.to_owned(),
            pagination_config,
        })
    }
}

#[cfg(test)]
mod tests {
    use crate::{Error, pagination::PaginationConfig};

    use super::AppState;

    #[test]
    fn rejects_invalid_timezones_at_startup() {
        let result = AppState::new(Vec::new(), "Terra/Nowhere", PaginationConfig::default());

        assert_eq!(
            result.map(|_| ()),
            Err(Error::InvalidTimezone("Terra/Nowhere".to_owned()))
        );
    }

    #[test]
    fn accepts_canonical_timezones() {
        let result = AppState::new(Vec::new(), "America/Sao_Paulo", PaginationConfig::default());

        assert!(result.is_ok());
    }
}
