//! The `dbtemporal` crate implements the temporal core of a database engine:
//! hybrid Julian/Gregorian calendar arithmetic on a compact date encoding,
//! nanosecond time of day handling, week numbering, and the parsing and
//! canonical formatting of date, time and timestamp literals.
//!
//! ```rust
//! use dbtemporal::{calendar, format, parsers, week, DateValue};
//!
//! let date = parsers::parse_date("2019-12-31").unwrap();
//! assert_eq!(date, DateValue::new_unchecked(2019, 12, 31));
//! assert_eq!(week::iso_week_of_year(date), 1);
//! assert_eq!(week::iso_week_year(date), 2020);
//!
//! let shifted = calendar::add_months(DateValue::new_unchecked(2007, 4, 30), -2);
//! assert_eq!(format::FormattableDate(shifted).to_string(), "2007-02-28");
//! ```
//!
//! Conversions that involve time zones go through a
//! [`CalendarContext`](bridge::CalendarContext), which owns a
//! [`TimeZoneProvider`](provider::TimeZoneProvider). With the `tzdb` feature
//! the bundled zone data is available through [`tzdb::TzdbProvider`].
#![no_std]
#![cfg_attr(not(test), forbid(clippy::unwrap_used))]
#![allow(
    clippy::module_name_repetitions,
    clippy::redundant_pub_crate,
    clippy::too_many_lines,
    clippy::too_many_arguments,
    clippy::missing_errors_doc,
    clippy::option_if_let_else,

    // Field values are range checked before narrowing.
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::cast_possible_wrap,
)]

extern crate alloc;
extern crate core;

#[cfg(feature = "std")]
extern crate std;

pub mod bridge;
pub mod calendar;
pub mod date_value;
pub mod error;
pub mod fields;
pub mod format;
pub mod host;
pub mod options;
pub mod parsers;
pub mod pattern;
pub mod provider;
pub mod time;
pub mod tz;
pub mod week;

#[cfg(feature = "sys")]
pub mod sys;

#[cfg(feature = "tzdb")]
pub mod tzdb;

#[doc(inline)]
pub use error::{CalendarField, ErrorKind, TemporalError};

pub use crate::{
    bridge::{CalendarContext, CalendarFields, DefaultZone},
    date_value::DateValue,
    fields::DateField,
    options::{LiteralKind, ParseOptions},
    parsers::ParsedTemporal,
    tz::{TimeZone, UtcOffset},
    week::WeekRules,
};

/// The `dbtemporal` result type
pub type TemporalResult<T> = Result<T, TemporalError>;

/// A library specific trait for unwrapping assertions.
pub(crate) trait TemporalUnwrap {
    type Output;

    /// `dbtemporal` based assertion for unwrapping. This will panic in
    /// debug builds, but throws error during runtime.
    fn temporal_unwrap(self) -> TemporalResult<Self::Output>;
}

impl<T> TemporalUnwrap for Option<T> {
    type Output = T;

    fn temporal_unwrap(self) -> TemporalResult<Self::Output> {
        debug_assert!(self.is_some());
        self.ok_or(TemporalError::assert())
    }
}

#[doc(hidden)]
#[macro_export]
macro_rules! temporal_assert {
    ($condition:expr $(,)*) => {
        if !$condition {
            return Err($crate::TemporalError::assert());
        }
    };
    ($condition:expr, $($args:tt)+) => {
        if !$condition {
            #[cfg(feature = "log")]
            log::error!($($args)+);
            return Err($crate::TemporalError::assert());
        }
    };
}

// Relevant numeric constants
/// Nanoseconds per day constant: 8.64e+13
pub const NANOS_PER_DAY: i64 = MILLIS_PER_DAY * NANOS_PER_MILLI;
/// Nanoseconds per hour constant: 3.6e+12
pub const NANOS_PER_HOUR: i64 = 60 * NANOS_PER_MINUTE;
/// Nanoseconds per minute constant: 6e+10
pub const NANOS_PER_MINUTE: i64 = 60 * NANOS_PER_SECOND;
/// Nanoseconds per second constant: 1e+9
pub const NANOS_PER_SECOND: i64 = 1_000_000_000;
/// Nanoseconds per millisecond constant: 1e+6
pub const NANOS_PER_MILLI: i64 = 1_000_000;
/// Milliseconds per day constant: 8.64e+7
pub const MILLIS_PER_DAY: i64 = 24 * 60 * 60 * 1000;
/// Seconds per day constant: 86400
pub const SECONDS_PER_DAY: i64 = 86_400;
