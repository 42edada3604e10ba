//! ISO-8601 timestamps in the `YYYY-MM-DDTHH:mm:ss.sssZ` shape.

use std::sync::OnceLock;

use regex::Regex;
use time::format_description::BorrowedFormatItem;
use time::macros::format_description;
use time::{OffsetDateTime, PrimitiveDateTime};

const ISO_MS: &[BorrowedFormatItem<'static>] =
    format_description!("[year]-[month]-[day]T[hour]:[minute]:[second].[subsecond digits:3]Z");

fn iso_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^\d{4}-\d{2}-\d{2}T\d{2}:\d{2}:\d{2}\.\d{3}Z$")
            .expect("valid ISO-8601 pattern")
    })
}

/// Whether `s` has the strict millisecond ISO-8601 shape. Says nothing about
/// whether the fields form a real calendar date.
pub fn is_iso_shaped(s: &str) -> bool {
    iso_regex().is_match(s)
}

/// Formats epoch milliseconds as `YYYY-MM-DDTHH:mm:ss.sssZ`.
///
/// Returns `None` for instants outside years 0000–9999.
pub fn format_iso(epoch_ms: i64) -> Option<String> {
    let nanos = i128::from(epoch_ms) * 1_000_000;
    let instant = OffsetDateTime::from_unix_timestamp_nanos(nanos).ok()?;
    if !(0..=9999).contains(&instant.year()) {
        return None;
    }
    instant.format(ISO_MS).ok()
}

/// Parses a strict millisecond ISO-8601 string into epoch milliseconds.
///
/// Shape-matching strings with impossible fields (month 13, February 30th)
/// yield `None`.
pub fn parse_iso(s: &str) -> Option<i64> {
    if !is_iso_shaped(s) {
        return None;
    }
    let parsed = PrimitiveDateTime::parse(s, ISO_MS).ok()?;
    let nanos = parsed.assume_utc().unix_timestamp_nanos();
    i64::try_from(nanos / 1_000_000).ok()
}
