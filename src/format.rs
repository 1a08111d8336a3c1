//! Canonical text rendering of dates, times and zone offsets.
//!
//! Every formattable type implements [`Writeable`], so it can be written to
//! any `fmt::Write` sink or turned into a `String` without intermediate
//! allocations.

use alloc::string::String;
use core::fmt::Write;

use writeable::{impl_display_with_writeable, LengthHint, Writeable};

use crate::{date_value::DateValue, NANOS_PER_MILLI, NANOS_PER_SECOND};

/// Renders `YYYY-MM-DD`. Years in `1..=9999` are padded to four digits,
/// all others are written as is.
#[derive(Debug, Clone, Copy)]
pub struct FormattableDate(pub DateValue);

impl Writeable for FormattableDate {
    fn write_to<W: Write + ?Sized>(&self, sink: &mut W) -> core::fmt::Result {
        let year = self.0.year();
        if year > 0 && year < 10_000 {
            write_zero_padded(u64::from(year.unsigned_abs()), 4, sink)?;
        } else {
            year.write_to(sink)?;
        }
        sink.write_char('-')?;
        write_zero_padded(u64::from(self.0.month()), 2, sink)?;
        sink.write_char('-')?;
        write_zero_padded(u64::from(self.0.day()), 2, sink)
    }

    fn writeable_length_hint(&self) -> LengthHint {
        let year = self.0.year();
        let year_length = if year > 0 && year < 10_000 {
            LengthHint::exact(4)
        } else {
            year.writeable_length_hint()
        };
        year_length + 6
    }
}

/// Renders `[-]HH:MM:SS[.fraction]` for a nanosecond count.
///
/// The fraction is written when `always_fraction` is set or the value has a
/// sub-second part. It is made of the milliseconds and, if non-zero, the six
/// sub-millisecond digits, with trailing zeros removed down to one digit.
#[derive(Debug, Clone, Copy)]
pub struct FormattableTime {
    pub nanos: i64,
    pub always_fraction: bool,
}

impl Writeable for FormattableTime {
    fn write_to<W: Write + ?Sized>(&self, sink: &mut W) -> core::fmt::Result {
        if self.nanos < 0 {
            sink.write_char('-')?;
        }
        // `unsigned_abs` keeps `i64::MIN` representable.
        let nanos = self.nanos.unsigned_abs();
        let total_millis = nanos / NANOS_PER_MILLI as u64;
        let sub_millis = nanos % NANOS_PER_MILLI as u64;
        let millis = total_millis % 1_000;
        let total_seconds = total_millis / 1_000;
        let seconds = total_seconds % 60;
        let total_minutes = total_seconds / 60;
        let minutes = total_minutes % 60;
        let hours = total_minutes / 60;

        write_zero_padded(hours, 2, sink)?;
        sink.write_char(':')?;
        write_zero_padded(minutes, 2, sink)?;
        sink.write_char(':')?;
        write_zero_padded(seconds, 2, sink)?;
        if !self.always_fraction && millis == 0 && sub_millis == 0 {
            return Ok(());
        }
        sink.write_char('.')?;
        let (digits, len) = fraction_digits(millis, sub_millis);
        for digit in &digits[..len] {
            sink.write_char(char::from(b'0' + digit))?;
        }
        Ok(())
    }

    fn writeable_length_hint(&self) -> LengthHint {
        let sign = usize::from(self.nanos < 0);
        let base = LengthHint::at_least(8 + sign);
        if !self.always_fraction && self.nanos % NANOS_PER_SECOND == 0 {
            return base;
        }
        base + LengthHint::between(2, 10)
    }
}

/// Collects the nine fraction digits of `millis` and `sub_millis` and returns
/// them with the number of digits to keep.
fn fraction_digits(millis: u64, sub_millis: u64) -> ([u8; 9], usize) {
    let mut digits = [0u8; 9];
    let mut value = millis * 1_000_000 + sub_millis;
    for digit in digits.iter_mut().rev() {
        *digit = (value % 10) as u8;
        value /= 10;
    }
    let len = digits
        .iter()
        .rposition(|&d| d != 0)
        .map_or(1, |last| last + 1);
    (digits, len)
}

/// Renders a zone offset in minutes as `±HH[:MM]`.
#[derive(Debug, Clone, Copy)]
pub struct FormattableTimeZone(pub i32);

impl Writeable for FormattableTimeZone {
    fn write_to<W: Write + ?Sized>(&self, sink: &mut W) -> core::fmt::Result {
        sink.write_char(if self.0 < 0 { '-' } else { '+' })?;
        let minutes = self.0.unsigned_abs();
        write_zero_padded(u64::from(minutes / 60), 2, sink)?;
        if minutes % 60 != 0 {
            sink.write_char(':')?;
            write_zero_padded(u64::from(minutes % 60), 2, sink)?;
        }
        Ok(())
    }

    fn writeable_length_hint(&self) -> LengthHint {
        if self.0 % 60 == 0 {
            LengthHint::exact(3)
        } else {
            LengthHint::exact(6)
        }
    }
}

/// Renders `YYYY-MM-DD HH:MM:SS[.fraction][±HH[:MM]]`.
#[derive(Debug, Clone, Copy)]
pub struct FormattableTimestamp {
    pub date: DateValue,
    pub time: FormattableTime,
    pub offset_minutes: Option<i32>,
}

impl Writeable for FormattableTimestamp {
    fn write_to<W: Write + ?Sized>(&self, sink: &mut W) -> core::fmt::Result {
        FormattableDate(self.date).write_to(sink)?;
        sink.write_char(' ')?;
        self.time.write_to(sink)?;
        if let Some(offset) = self.offset_minutes {
            FormattableTimeZone(offset).write_to(sink)?;
        }
        Ok(())
    }

    fn writeable_length_hint(&self) -> LengthHint {
        let offset = self
            .offset_minutes
            .map_or(LengthHint::exact(0), |o| FormattableTimeZone(o).writeable_length_hint());
        FormattableDate(self.date).writeable_length_hint()
            + 1
            + self.time.writeable_length_hint()
            + offset
    }
}

impl_display_with_writeable!(FormattableDate);
impl_display_with_writeable!(FormattableTime);
impl_display_with_writeable!(FormattableTimeZone);
impl_display_with_writeable!(FormattableTimestamp);

fn write_zero_padded<W: Write + ?Sized>(value: u64, width: usize, sink: &mut W) -> core::fmt::Result {
    let mut threshold = 1u64;
    for _ in 1..width {
        threshold *= 10;
        if value < threshold {
            sink.write_char('0')?;
        }
    }
    value.write_to(sink)
}

/// Appends the canonical form of `date` to `buf`.
pub fn append_date(buf: &mut String, date: DateValue) {
    // Writing into a `String` cannot fail.
    let _ = FormattableDate(date).write_to(buf);
}

/// Appends the canonical form of the time `nanos` to `buf`.
pub fn append_time(buf: &mut String, nanos: i64, always_add_fraction: bool) {
    let _ = FormattableTime {
        nanos,
        always_fraction: always_add_fraction,
    }
    .write_to(buf);
}

/// Appends the canonical form of a zone offset in minutes to `buf`.
pub fn append_time_zone(buf: &mut String, offset_minutes: i32) {
    let _ = FormattableTimeZone(offset_minutes).write_to(buf);
}

/// Formats a timestamp without zone as `YYYY-MM-DD HH:MM:SS[.fraction]`.
#[must_use]
pub fn timestamp_to_string(date: DateValue, nanos: i64) -> String {
    FormattableTimestamp {
        date,
        time: FormattableTime {
            nanos,
            always_fraction: false,
        },
        offset_minutes: None,
    }
    .write_to_string()
    .into_owned()
}

/// Formats a timestamp with zone offset. The fraction is always written.
#[must_use]
pub fn timestamp_with_time_zone_to_string(date: DateValue, nanos: i64, offset_minutes: i32) -> String {
    FormattableTimestamp {
        date,
        time: FormattableTime {
            nanos,
            always_fraction: true,
        },
        offset_minutes: Some(offset_minutes),
    }
    .write_to_string()
    .into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::string::ToString;

    use crate::NANOS_PER_HOUR;

    fn time(nanos: i64, always_fraction: bool) -> String {
        let mut buf = String::new();
        append_time(&mut buf, nanos, always_fraction);
        buf
    }

    #[test]
    fn dates() {
        assert_eq!(DateValue::new_unchecked(2020, 1, 5).to_string(), "2020-01-05");
        assert_eq!(DateValue::new_unchecked(33, 12, 25).to_string(), "0033-12-25");
        assert_eq!(DateValue::new_unchecked(0, 1, 1).to_string(), "0-01-01");
        assert_eq!(DateValue::new_unchecked(-44, 3, 15).to_string(), "-44-03-15");
        assert_eq!(DateValue::new_unchecked(12345, 6, 7).to_string(), "12345-06-07");

        let mut buf = String::from("DATE '");
        append_date(&mut buf, DateValue::new_unchecked(1999, 10, 31));
        buf.push('\'');
        assert_eq!(buf, "DATE '1999-10-31'");
    }

    #[test]
    fn times_without_fraction() {
        assert_eq!(time(0, false), "00:00:00");
        assert_eq!(time(NANOS_PER_HOUR * 13 + NANOS_PER_SECOND * 5, false), "13:00:05");
        assert_eq!(time(NANOS_PER_HOUR * 125, false), "125:00:00");
        assert_eq!(time(-NANOS_PER_HOUR, false), "-01:00:00");
    }

    #[test]
    fn times_with_fraction() {
        assert_eq!(time(0, true), "00:00:00.0");
        assert_eq!(time(1_500_000, false), "00:00:00.0015");
        assert_eq!(time(500_000_000, false), "00:00:00.5");
        assert_eq!(time(123_000_000, false), "00:00:00.123");
        assert_eq!(time(1, false), "00:00:00.000000001");
        assert_eq!(time(NANOS_PER_SECOND + 10_000, true), "00:00:01.00001");
        assert_eq!(time(-1_500_000, false), "-00:00:00.0015");
    }

    #[test]
    fn most_negative_time() {
        assert_eq!(time(i64::MIN, false), "-2562047:47:16.854775808");
    }

    #[test]
    fn zone_offsets() {
        let zone = |minutes| {
            let mut buf = String::new();
            append_time_zone(&mut buf, minutes);
            buf
        };
        assert_eq!(zone(0), "+00");
        assert_eq!(zone(60), "+01");
        assert_eq!(zone(-300), "-05");
        assert_eq!(zone(330), "+05:30");
        assert_eq!(zone(-570), "-09:30");
        assert_eq!(FormattableTimeZone(345).to_string(), "+05:45");
    }

    #[test]
    fn timestamps() {
        let date = DateValue::new_unchecked(2020, 2, 29);
        assert_eq!(timestamp_to_string(date, 0), "2020-02-29 00:00:00");
        assert_eq!(
            timestamp_with_time_zone_to_string(date, NANOS_PER_HOUR * 8 + 250_000_000, -480),
            "2020-02-29 08:00:00.25-08"
        );
        assert_eq!(
            timestamp_with_time_zone_to_string(date, 0, 0),
            "2020-02-29 00:00:00.0+00"
        );
    }
}
