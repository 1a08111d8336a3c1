//! Nanosecond time-of-day handling.
//!
//! A time value is a signed count of nanoseconds. As a time of day it lies in
//! `[0, NANOS_PER_DAY)`, as an interval it may take any sign and magnitude.

use alloc::string::String;

use crate::{
    calendar, date_value::DateValue, TemporalError, TemporalResult, NANOS_PER_DAY,
    NANOS_PER_HOUR, NANOS_PER_MILLI, NANOS_PER_MINUTE, NANOS_PER_SECOND,
};

/// Upper bound (exclusive) of the hour field of an interval literal.
const MAX_INTERVAL_HOURS: i64 = 2_000_000;

/// Folds `nanos` into `[0, NANOS_PER_DAY)`, moving whole days into
/// `absolute_day`. The day saturates at the bounds of `i64`.
#[inline]
#[must_use]
pub fn normalize(absolute_day: i64, nanos: i64) -> (i64, i64) {
    (
        absolute_day.saturating_add(nanos.div_euclid(NANOS_PER_DAY)),
        nanos.rem_euclid(NANOS_PER_DAY),
    )
}

/// Normalizes an absolute day and nanosecond pair into a date and a time of
/// day.
#[must_use]
pub fn normalize_timestamp(absolute_day: i64, nanos: i64) -> (DateValue, i64) {
    let (absolute_day, nanos) = normalize(absolute_day, nanos);
    (calendar::from_absolute_day(absolute_day), nanos)
}

/// Splits a non-negative nanosecond count into hour, minute, second and
/// millisecond fields. The hour is not wrapped at 24.
#[must_use]
pub fn split_nanos(nanos: i64) -> (i32, i32, i32, i32) {
    let hour = nanos / NANOS_PER_HOUR;
    let minute = nanos / NANOS_PER_MINUTE % 60;
    let second = nanos / NANOS_PER_SECOND % 60;
    let millis = nanos / NANOS_PER_MILLI % 1_000;
    (hour as i32, minute as i32, second as i32, millis as i32)
}

/// Builds a nanosecond count from the fields of a time of day.
#[inline]
#[must_use]
pub const fn nanos_from_fields(hour: i64, minute: i64, second: i64, millis: i64) -> i64 {
    hour * NANOS_PER_HOUR + minute * NANOS_PER_MINUTE + second * NANOS_PER_SECOND
        + millis * NANOS_PER_MILLI
}

/// Parses `[-]H:M:S[.fraction]`, or `[-]H.M.S[.fraction]` when the text has
/// no colon separators.
///
/// With `time_of_day` the result must lie within a single day, so negative
/// values (including `-0:..`) and hours past 23 are rejected. Without it the
/// result is a signed interval.
pub fn parse_time_of_day(text: &str, time_of_day: bool) -> TemporalResult<i64> {
    let malformed = || TemporalError::syntax().with_message(String::from(text));

    let (s1, s2) = separators(text, ':')
        .or_else(|| separators(text, '.'))
        .ok_or_else(malformed)?;
    let s3 = find_from(text, '.', s2 + 1);

    let mut hour = parse_field(&text[..s1]).map(i64::from).ok_or_else(malformed)?;
    let negative = hour < 0 || (hour == 0 && text.starts_with('-'));
    if negative {
        if time_of_day {
            return Err(malformed());
        }
        hour = -hour;
    }
    let minute = parse_field(&text[s1 + 1..s2]).ok_or_else(malformed)?;
    let (second, fraction) = match s3 {
        None => (parse_field(&text[s2 + 1..]).ok_or_else(malformed)?, 0),
        Some(s3) => (
            parse_field(&text[s2 + 1..s3]).ok_or_else(malformed)?,
            parse_fraction(&text[s3 + 1..]).ok_or_else(malformed)?,
        ),
    };
    if hour >= MAX_INTERVAL_HOURS || !(0..60).contains(&minute) || !(0..60).contains(&second) {
        return Err(malformed());
    }
    if time_of_day && hour >= 24 {
        return Err(malformed());
    }

    let nanos = fraction + nanos_from_fields(hour, i64::from(minute), i64::from(second), 0);
    Ok(if negative { -nanos } else { nanos })
}

/// Returns the first two positions of `separator`, the first one past the
/// start of `text`.
fn separators(text: &str, separator: char) -> Option<(usize, usize)> {
    let s1 = text.find(separator).filter(|&s1| s1 > 0)?;
    let s2 = find_from(text, separator, s1 + 1)?;
    Some((s1, s2))
}

pub(crate) fn find_from(text: &str, needle: char, from: usize) -> Option<usize> {
    text.get(from..)?.find(needle).map(|i| i + from)
}

/// Parses a signed decimal field.
pub(crate) fn parse_field(text: &str) -> Option<i32> {
    text.parse::<i32>().ok()
}

/// Right-pads or truncates `digits` to nanosecond precision.
fn parse_fraction(digits: &str) -> Option<i64> {
    if !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    let mut nanos = 0i64;
    let mut bytes = digits.bytes();
    for _ in 0..9 {
        let digit = bytes.next().map_or(0, |b| i64::from(b - b'0'));
        nanos = nanos * 10 + digit;
    }
    Some(nanos)
}
