//! The app's endpoint URIs.

/// The root route, which redirects to the transactions page.
pub const ROOT: &str = "/";
/// The page displaying the transaction ledger as a table.
pub const TRANSACTIONS_VIEW: &str = "/transactions";
/// The page to display when an internal server error occurs.
pub const INTERNAL_ERROR_VIEW: &str = "/error";
