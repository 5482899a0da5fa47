//! Display formatters for tables, cards and charts.
//!
//! All output follows en-US conventions. Dates are rendered in UTC.

use chrono::{DateTime, Utc};
use rust_decimal::{Decimal, RoundingStrategy};

use crate::types::CurrencyCode;

/// Detail level for [`format_date`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DateFormat {
    /// `Feb 8, 2026`
    Short,
    /// `Feb 8, 2026, 11:24 AM`
    #[default]
    Medium,
    /// `February 8, 2026, 11:24 AM`
    Long,
}

/// Format an amount as currency, e.g. `$1,234.50` or `-$5.00`.
#[must_use]
pub fn format_currency(amount: Decimal, currency: CurrencyCode) -> String {
    let rounded = amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    let sign = if rounded.is_sign_negative() && !rounded.is_zero() {
        "-"
    } else {
        ""
    };
    let body = format!("{:.2}", rounded.abs());
    let (int_part, frac_part) = body.split_once('.').unwrap_or((body.as_str(), "00"));
    format!(
        "{sign}{}{}.{frac_part}",
        currency.symbol(),
        group_thousands(int_part)
    )
}

/// Format a number with thousands separators and at most three fraction digits.
#[must_use]
pub fn format_number(value: Decimal) -> String {
    let rounded = value
        .round_dp_with_strategy(3, RoundingStrategy::MidpointAwayFromZero)
        .normalize();
    let sign = if rounded.is_sign_negative() && !rounded.is_zero() {
        "-"
    } else {
        ""
    };
    let body = rounded.abs().to_string();
    match body.split_once('.') {
        Some((int_part, frac_part)) => format!("{sign}{}.{frac_part}", group_thousands(int_part)),
        None => format!("{sign}{}", group_thousands(&body)),
    }
}

/// Format a percentage with a fixed number of decimals, e.g. `3.20%`.
#[must_use]
pub fn format_percentage(value: f64, decimals: usize) -> String {
    format!("{value:.decimals$}%")
}

/// Format a timestamp.
#[must_use]
pub fn format_date(date: DateTime<Utc>, format: DateFormat) -> String {
    let pattern = match format {
        DateFormat::Short => "%b %-d, %Y",
        DateFormat::Medium => "%b %-d, %Y, %-I:%M %p",
        DateFormat::Long => "%B %-d, %Y, %-I:%M %p",
    };
    date.format(pattern).to_string()
}

/// Format an RFC 3339 timestamp string, returning `None` if it does not parse.
#[must_use]
pub fn format_date_str(date: &str, format: DateFormat) -> Option<String> {
    DateTime::parse_from_rfc3339(date)
        .ok()
        .map(|parsed| format_date(parsed.with_timezone(&Utc), format))
}

/// Truncate text to `max_chars` characters, appending `...` when cut.
#[must_use]
pub fn truncate_text(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((cut, _)) => format!("{}...", &text[..cut]),
        None => text.to_owned(),
    }
}

fn group_thousands(digits: &str) -> String {
    let len = digits.len();
    let mut out = String::with_capacity(len + len / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (len - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}
