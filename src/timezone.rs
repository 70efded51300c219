//! Local timezone resolution for display timestamps.

use time::format_description::BorrowedFormatItem;
use time::macros::format_description;
use time::{OffsetDateTime, UtcOffset};
use time_tz::{Offset, TimeZone};

/// Resolve a canonical timezone name, e.g. "America/Sao_Paulo", to the UTC
/// offset it currently has. Returns `None` for unknown names.
pub fn get_local_offset(canonical_timezone: &str) -> Option<UtcOffset> {
    time_tz::timezones::get_by_name(canonical_timezone)
        .map(|tz| tz.get_offset_utc(&OffsetDateTime::now_utc()).to_utc())
}

const GENERATED_AT_FORMAT: &[BorrowedFormatItem] =
    format_description!("[day]/[month]/[year] [hour]:[minute]");

/// The "statement generated at" label shown in the page footer, in local
/// time.
pub fn format_generated_at(now_utc: OffsetDateTime, local_offset: UtcOffset) -> String {
    let local = now_utc.to_offset(local_offset);

    local
        .format(GENERATED_AT_FORMAT)
        .unwrap_or_else(|_| local.to_string())
}
