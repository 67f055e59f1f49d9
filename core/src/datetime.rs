//! Naive timestamp handling between editable input, the wire and display.
//!
//! No timezone conversion happens anywhere: every value is wall-clock time
//! agreed on between client and server.

use chrono::NaiveDateTime;

/// Length of `YYYY-MM-DDTHH:mm`.
const MINUTE_PRECISION_LEN: usize = 16;

/// Convert a local editable timestamp to wire format.
///
/// Minute-precision input gets `:00` appended; anything longer passes through
/// unchanged. Empty input yields an empty string, which callers must treat as
/// "no value".
pub fn to_wire(local: &str) -> String {
    if local.is_empty() {
        return String::new();
    }
    if local.len() > MINUTE_PRECISION_LEN {
        local.to_string()
    } else {
        format!("{local}:00")
    }
}

/// `2024-03-05T14:30:00` -> `05/03/2024 14:30`.
pub fn format_date_time(wire: &str) -> String {
    if wire.is_empty() {
        return String::new();
    }
    let (date, time) = match wire.split_once('T') {
        Some((date, time)) => (date, time),
        None => return format_date(wire),
    };
    let mut parts = time.split(':');
    let hours = parts.next().unwrap_or_default();
    let minutes = parts.next().unwrap_or_default();
    format!("{} {hours}:{minutes}", format_date(date))
}

/// `2024-03-05T14:30:00` -> `05/03/2024`. The time part is ignored.
pub fn format_date(wire: &str) -> String {
    if wire.is_empty() {
        return String::new();
    }
    let date = wire.split('T').next().unwrap_or_default();
    let mut parts = date.split('-');
    let year = parts.next().unwrap_or_default();
    let month = parts.next().unwrap_or_default();
    let day = parts.next().unwrap_or_default();
    format!("{day}/{month}/{year}")
}

/// Parse a wire timestamp with minute or second precision.
pub fn parse_naive(wire: &str) -> Option<NaiveDateTime> {
    NaiveDateTime::parse_from_str(wire, "%Y-%m-%dT%H:%M:%S")
        .or_else(|_| NaiveDateTime::parse_from_str(wire, "%Y-%m-%dT%H:%M"))
        .ok()
}
