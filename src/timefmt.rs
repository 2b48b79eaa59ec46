//! Textual durations and timestamps.

use chrono::{NaiveDate, NaiveDateTime, TimeDelta};

use crate::error::{DurationError, TimestampError};

/// Layout used when a timestamp default carries no explicit layout.
pub const DEFAULT_LAYOUT: &str = "%Y-%m-%d %H:%M:%S";

const NANOSECOND: u64 = 1;
const MICROSECOND: u64 = 1_000 * NANOSECOND;
const MILLISECOND: u64 = 1_000 * MICROSECOND;
const SECOND: u64 = 1_000 * MILLISECOND;
const MINUTE: u64 = 60 * SECOND;
const HOUR: u64 = 60 * MINUTE;

fn unit(name: &str) -> Option<u64> {
    match name {
        "ns" => Some(NANOSECOND),
        "us" | "µs" | "μs" => Some(MICROSECOND),
        "ms" => Some(MILLISECOND),
        "s" => Some(SECOND),
        "m" => Some(MINUTE),
        "h" => Some(HOUR),
        _ => None,
    }
}

/// Parses expressions such as `300ms`, `-1.5h` or `2h45m`.
///
/// A duration is an optional sign followed by one or more decimal numbers,
/// each with an optional fraction and a mandatory unit. `0` on its own needs
/// no unit.
pub fn parse_duration(input: &str) -> Result<TimeDelta, DurationError> {
    let invalid = || DurationError::Invalid(input.to_string());
    let mut s = input;
    let mut negative = false;
    if let Some(rest) = s.strip_prefix('-') {
        negative = true;
        s = rest;
    } else if let Some(rest) = s.strip_prefix('+') {
        s = rest;
    }
    if s == "0" {
        return Ok(TimeDelta::zero());
    }
    if s.is_empty() {
        return Err(invalid());
    }

    let limit = 1u64 << 63;
    let mut total: u64 = 0;
    while !s.is_empty() {
        if !s.starts_with(|c: char| c == '.' || c.is_ascii_digit()) {
            return Err(invalid());
        }
        let (whole, rest, has_whole) = leading_int(s).ok_or_else(invalid)?;
        s = rest;
        let mut fraction = 0u64;
        let mut scale = 1f64;
        let mut has_fraction = false;
        if let Some(rest) = s.strip_prefix('.') {
            let (f, sc, rest, digits) = leading_fraction(rest);
            fraction = f;
            scale = sc;
            has_fraction = digits;
            s = rest;
        }
        if !has_whole && !has_fraction {
            return Err(invalid());
        }

        let unit_end = s
            .find(|c: char| c == '.' || c.is_ascii_digit())
            .unwrap_or(s.len());
        if unit_end == 0 {
            return Err(DurationError::MissingUnit(input.to_string()));
        }
        let name = &s[..unit_end];
        s = &s[unit_end..];
        let size = unit(name).ok_or_else(|| DurationError::UnknownUnit {
            unit: name.to_string(),
            input: input.to_string(),
        })?;

        let overflow = || DurationError::Overflow(input.to_string());
        if whole > limit / size {
            return Err(overflow());
        }
        let mut value = whole * size;
        if fraction > 0 {
            value += (fraction as f64 * (size as f64 / scale)) as u64;
            if value > limit {
                return Err(overflow());
            }
        }
        total = total.checked_add(value).filter(|t| *t <= limit).ok_or_else(overflow)?;
    }

    let nanos = if negative {
        // -2^63 is representable, +2^63 is not
        0i64.checked_sub_unsigned(total)
    } else {
        i64::try_from(total).ok()
    };
    nanos
        .map(TimeDelta::nanoseconds)
        .ok_or_else(|| DurationError::Overflow(input.to_string()))
}

/// Leading decimal digits as an integer, `None` on overflow.
fn leading_int(s: &str) -> Option<(u64, &str, bool)> {
    let end = s.find(|c: char| !c.is_ascii_digit()).unwrap_or(s.len());
    let mut value: u64 = 0;
    for digit in s[..end].bytes() {
        value = value.checked_mul(10)?.checked_add(u64::from(digit - b'0'))?;
        if value > 1 << 63 {
            return None;
        }
    }
    Some((value, &s[end..], end > 0))
}

/// Leading fraction digits; digits beyond what fits are dropped.
fn leading_fraction(s: &str) -> (u64, f64, &str, bool) {
    let end = s.find(|c: char| !c.is_ascii_digit()).unwrap_or(s.len());
    let mut value: u64 = 0;
    let mut scale = 1f64;
    let mut overflowed = false;
    for digit in s[..end].bytes() {
        if overflowed {
            continue;
        }
        match value
            .checked_mul(10)
            .and_then(|v| v.checked_add(u64::from(digit - b'0')))
            .filter(|v| *v <= 1 << 63)
        {
            Some(v) => {
                value = v;
                scale *= 10.0;
            }
            None => overflowed = true,
        }
    }
    (value, scale, &s[end..], end > 0)
}

/// Parses `value [layout]`.
///
/// The input is split on whitespace. A single token is rejected. With exactly
/// two tokens the whole input is read with [`DEFAULT_LAYOUT`]. With more, the
/// first half of the tokens is the value and the second half the layout.
///
/// ```
/// use prefill::timefmt::parse_timestamp;
///
/// let t = parse_timestamp("2024-03-01 12:30:00").unwrap();
/// assert_eq!(t.to_string(), "2024-03-01 12:30:00");
///
/// let t = parse_timestamp("01/03/2024 12:30 %d/%m/%Y %H:%M").unwrap();
/// assert_eq!(t.to_string(), "2024-03-01 12:30:00");
///
/// assert!(parse_timestamp("2024-03-01").is_err());
/// ```
pub fn parse_timestamp(input: &str) -> Result<NaiveDateTime, TimestampError> {
    let tokens: Vec<&str> = input.split_whitespace().collect();
    if tokens.len() < 2 {
        return Err(TimestampError::MissingLayout(input.to_string()));
    }
    if tokens.len() == 2 {
        return parse_with_layout(input, DEFAULT_LAYOUT);
    }
    let half = tokens.len() / 2;
    let value = tokens[..half].join(" ");
    let layout = tokens[half..].join(" ");
    parse_with_layout(&value, &layout)
}

fn parse_with_layout(value: &str, layout: &str) -> Result<NaiveDateTime, TimestampError> {
    match NaiveDateTime::parse_from_str(value, layout) {
        Ok(parsed) => Ok(parsed),
        Err(full) => NaiveDate::parse_from_str(value, layout)
            .ok()
            .and_then(|date| date.and_hms_opt(0, 0, 0))
            .ok_or_else(|| TimestampError::Layout {
                value: value.to_string(),
                layout: layout.to_string(),
                reason: full.to_string(),
            }),
    }
}
