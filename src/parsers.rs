//! This module implements parsing of date, time and timestamp literals.
//!
//! Grammars:
//!
//! - date: `[+|-]YYYY-MM-DD`
//! - time: `[-]H:M:S[.fraction]` or `[-]H.M.S[.fraction]`
//! - timestamp: `<date>(' '|'T'|'-')<time>[<zone>]` where the dash separator
//!   is only accepted with [`ParseOptions::dash_date_time_separator`] and the
//!   zone is `Z`, `[+-]HH[:MM]` or a space followed by a zone name.

use alloc::string::String;

use crate::{
    bridge::CalendarContext,
    date_value::DateValue,
    options::{LiteralKind, ParseOptions},
    provider::TimeZoneProvider,
    time::{self, find_from, parse_field},
    tz::TimeZone,
    TemporalError, TemporalResult, NANOS_PER_MILLI,
};

mod timezone;


use timezone::split_zone;

/// The result of parsing a literal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParsedTemporal {
    Date(DateValue),
    /// Nanoseconds of day.
    Time(i64),
    Timestamp {
        date: DateValue,
        nanos: i64,
    },
    TimestampWithOffset {
        date: DateValue,
        nanos: i64,
        /// Minutes east of UTC.
        offset_minutes: i32,
    },
}

/// Parses a literal of the given kind.
pub fn parse<P: TimeZoneProvider>(
    text: &str,
    kind: LiteralKind,
    options: &ParseOptions,
    ctx: &mut CalendarContext<P>,
) -> TemporalResult<ParsedTemporal> {
    match kind {
        LiteralKind::Date => parse_date(text).map(ParsedTemporal::Date),
        LiteralKind::Time => parse_time(text).map(ParsedTemporal::Time),
        LiteralKind::Timestamp => parse_timestamp(text, options, false, ctx),
        LiteralKind::TimestampWithTimeZone => parse_timestamp(text, options, true, ctx),
    }
}

/// Parses `[+|-]YYYY-MM-DD`.
///
/// The year may carry a sign, so the month and day separators are the first
/// two dashes after the first character.
pub fn parse_date(text: &str) -> TemporalResult<DateValue> {
    let malformed = || TemporalError::syntax().with_message(String::from(text));

    let start = usize::from(text.starts_with('+'));
    let s1 = find_from(text, '-', start + 1).ok_or_else(malformed)?;
    let s2 = find_from(text, '-', s1 + 1).ok_or_else(malformed)?;
    let year = parse_field(&text[start..s1]).ok_or_else(malformed)?;
    let month = parse_field(&text[s1 + 1..s2]).ok_or_else(malformed)?;
    let day = parse_field(&text[s2 + 1..]).ok_or_else(malformed)?;
    DateValue::try_new(year, month, day)
}

/// Parses a time of day.
#[inline]
pub fn parse_time(text: &str) -> TemporalResult<i64> {
    time::parse_time_of_day(text, true)
}

/// Parses a signed time interval, which may exceed a day.
#[inline]
pub fn parse_interval_time(text: &str) -> TemporalResult<i64> {
    time::parse_time_of_day(text, false)
}

/// Parses a timestamp literal.
///
/// Without a date and time separator the whole text is a date at midnight.
///
/// A zone designator is applied to the local fields. With `want_offset` the
/// result keeps the local fields and carries the zone's offset at that
/// instant, which is 0 for `Z`. Otherwise the instant is re-expressed in the
/// default zone of `ctx` and the designated zone is dropped.
pub fn parse_timestamp<P: TimeZoneProvider>(
    text: &str,
    options: &ParseOptions,
    want_offset: bool,
    ctx: &mut CalendarContext<P>,
) -> TemporalResult<ParsedTemporal> {
    let Some(date_end) = date_time_boundary(text, options) else {
        let date = parse_date(text)?;
        return Ok(timestamp(date, 0, want_offset.then_some(0)));
    };

    let date = parse_date(&text[..date_end])?;
    let (time_text, designator) = split_zone(&text[date_end + 1..]);
    let nanos = parse_time(time_text)?;
    let Some(designator) = designator else {
        return Ok(timestamp(date, nanos, want_offset.then_some(0)));
    };
    let zone = designator.resolve(ctx.provider())?;

    if want_offset {
        let offset_minutes = match zone {
            TimeZone::Utc => 0,
            _ => {
                let instant = ctx.date_time_to_instant(Some(&zone), date, nanos / NANOS_PER_MILLI)?;
                ctx.offset_seconds_at(Some(&zone), instant)? / 60
            }
        };
        return Ok(timestamp(date, nanos, Some(offset_minutes)));
    }

    let instant = ctx.date_time_to_instant(Some(&zone), date, nanos / NANOS_PER_MILLI)?;
    let local_date = ctx.instant_to_date_value(instant)?;
    let local_nanos = nanos % NANOS_PER_MILLI + ctx.instant_to_nanos(instant)?;
    Ok(timestamp(local_date, local_nanos, None))
}

fn timestamp(date: DateValue, nanos: i64, offset_minutes: Option<i32>) -> ParsedTemporal {
    match offset_minutes {
        Some(offset_minutes) => ParsedTemporal::TimestampWithOffset {
            date,
            nanos,
            offset_minutes,
        },
        None => ParsedTemporal::Timestamp { date, nanos },
    }
}

/// Returns the position of the character separating date and time: a space,
/// else a `T`, else the third dash after an optional sign if the dialect
/// allows it.
fn date_time_boundary(text: &str, options: &ParseOptions) -> Option<usize> {
    text.find(' ').or_else(|| text.find('T')).or_else(|| {
        if !options.dash_date_time_separator {
            return None;
        }
        let start = usize::from(text.starts_with(['+', '-']));
        text[start..]
            .match_indices('-')
            .nth(2)
            .map(|(position, _)| position + start)
    })
}
