//! Relative date and time placeholders.
//!
//! `{{date:Y,M,D}}` becomes today shifted by Y years, M months and D days,
//! written `YYYY-MM-DD`. `{{time:H,M,S}}` becomes the current time shifted by
//! H hours, M minutes and S seconds, written `HH:MM:SS`. Each number may be
//! negative or empty (zero). Other tags are left as written.

use chrono::{Datelike, Local, NaiveDate, NaiveDateTime, TimeDelta};
use lazy_static::lazy_static;
use regex::{Captures, Regex};

lazy_static! {
    static ref PLACEHOLDER: Regex =
        Regex::new(r"\{\{(\w+):(-?\d*),(-?\d*),(-?\d*)\}\}").unwrap();
}

/// Source of "now" for placeholder substitution.
pub trait Clock: Send + Sync {
    fn now(&self) -> NaiveDateTime;
}

/// Local wall clock.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> NaiveDateTime {
        Local::now().naive_local()
    }
}

/// Always answers the same instant.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub NaiveDateTime);

impl Clock for FixedClock {
    fn now(&self) -> NaiveDateTime {
        self.0
    }
}

/// Replaces every placeholder in `input`, all relative to the same `now`.
pub fn substitute(input: &str, now: NaiveDateTime) -> String {
    if !input.contains("{{") {
        return input.to_string();
    }
    PLACEHOLDER
        .replace_all(input, |caps: &Captures| {
            let offsets = [number(&caps[2]), number(&caps[3]), number(&caps[4])];
            let replaced = match &caps[1] {
                "date" => shift_date(now.date(), offsets).map(|d| d.format("%Y-%m-%d").to_string()),
                "time" => shift_time(now, offsets).map(|t| t.format("%H:%M:%S").to_string()),
                _ => None,
            };
            replaced.unwrap_or_else(|| caps[0].to_string())
        })
        .into_owned()
}

fn number(text: &str) -> i64 {
    text.parse().unwrap_or(0)
}

/// Calendar arithmetic that rolls overflowing days into the next month, so
/// January 31st plus one month lands in early March.
pub fn shift_date(date: NaiveDate, [years, months, days]: [i64; 3]) -> Option<NaiveDate> {
    let month_index = i64::from(date.year())
        .checked_mul(12)?
        .checked_add(i64::from(date.month0()))?
        .checked_add(years.checked_mul(12)?)?
        .checked_add(months)?;
    let year = i32::try_from(month_index.div_euclid(12)).ok()?;
    let month = u32::try_from(month_index.rem_euclid(12)).ok()? + 1;
    let first = NaiveDate::from_ymd_opt(year, month, 1)?;
    let offset = i64::from(date.day0()).checked_add(days)?;
    first.checked_add_signed(TimeDelta::try_days(offset)?)
}

pub fn shift_time(now: NaiveDateTime, [hours, minutes, seconds]: [i64; 3]) -> Option<NaiveDateTime> {
    let delta = TimeDelta::try_hours(hours)?
        .checked_add(&TimeDelta::try_minutes(minutes)?)?
        .checked_add(&TimeDelta::try_seconds(seconds)?)?;
    now.checked_add_signed(delta)
}
