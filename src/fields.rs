//! Extraction of single fields from dates and times.

use core::{fmt, str::FromStr};

use crate::{
    date_value::DateValue,
    parsers::ParsedTemporal,
    week::{self, WeekRules},
    NANOS_PER_HOUR, NANOS_PER_MILLI, NANOS_PER_MINUTE, NANOS_PER_SECOND,
};

/// A field that can be extracted with [`date_part`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DateField {
    Year,
    Month,
    DayOfMonth,
    Hour,
    Minute,
    Second,
    Millisecond,
    DayOfYear,
    /// Sunday is 1.
    DayOfWeek,
    /// The week of year under the caller's [`WeekRules`].
    Week,
    Quarter,
    IsoYear,
    IsoWeek,
    /// Monday is 1.
    IsoDayOfWeek,
}

/// A parsing error for `DateField`
#[derive(Debug, Clone, Copy)]
pub struct ParseDateFieldError;

impl fmt::Display for ParseDateFieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("provided string was not a valid DateField")
    }
}

impl FromStr for DateField {
    type Err = ParseDateFieldError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "YEAR" => Ok(Self::Year),
            "MONTH" => Ok(Self::Month),
            "DAY_OF_MONTH" => Ok(Self::DayOfMonth),
            "HOUR" => Ok(Self::Hour),
            "MINUTE" => Ok(Self::Minute),
            "SECOND" => Ok(Self::Second),
            "MILLISECOND" => Ok(Self::Millisecond),
            "DAY_OF_YEAR" => Ok(Self::DayOfYear),
            "DAY_OF_WEEK" => Ok(Self::DayOfWeek),
            "WEEK" => Ok(Self::Week),
            "QUARTER" => Ok(Self::Quarter),
            "ISO_YEAR" => Ok(Self::IsoYear),
            "ISO_WEEK" => Ok(Self::IsoWeek),
            "ISO_DAY_OF_WEEK" => Ok(Self::IsoDayOfWeek),
            _ => Err(ParseDateFieldError),
        }
    }
}

impl fmt::Display for DateField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Year => "YEAR",
            Self::Month => "MONTH",
            Self::DayOfMonth => "DAY_OF_MONTH",
            Self::Hour => "HOUR",
            Self::Minute => "MINUTE",
            Self::Second => "SECOND",
            Self::Millisecond => "MILLISECOND",
            Self::DayOfYear => "DAY_OF_YEAR",
            Self::DayOfWeek => "DAY_OF_WEEK",
            Self::Week => "WEEK",
            Self::Quarter => "QUARTER",
            Self::IsoYear => "ISO_YEAR",
            Self::IsoWeek => "ISO_WEEK",
            Self::IsoDayOfWeek => "ISO_DAY_OF_WEEK",
        }
        .fmt(f)
    }
}

/// Returns `field` of the date and nanoseconds of day.
///
/// Time fields wrap within their unit, so the hour of an interval longer
/// than a day is taken modulo 24.
#[must_use]
pub fn date_part(date: DateValue, nanos: i64, field: DateField, rules: WeekRules) -> i32 {
    match field {
        DateField::Year => date.year(),
        DateField::Month => i32::from(date.month()),
        DateField::DayOfMonth => i32::from(date.day()),
        DateField::Hour => (nanos / NANOS_PER_HOUR % 24) as i32,
        DateField::Minute => (nanos / NANOS_PER_MINUTE % 60) as i32,
        DateField::Second => (nanos / NANOS_PER_SECOND % 60) as i32,
        DateField::Millisecond => (nanos / NANOS_PER_MILLI % 1_000) as i32,
        DateField::DayOfYear => i32::from(week::day_of_year(date)),
        DateField::DayOfWeek => i32::from(week::sunday_day_of_week(date)),
        DateField::Week => i32::from(week::week_of_year(date, rules)),
        DateField::Quarter => (i32::from(date.month()) - 1) / 3 + 1,
        DateField::IsoYear => week::iso_week_year(date),
        DateField::IsoWeek => i32::from(week::iso_week_of_year(date)),
        DateField::IsoDayOfWeek => i32::from(week::iso_day_of_week(date)),
    }
}

impl ParsedTemporal {
    /// Returns `field` of this value. A time has the date 1970-01-01 and a
    /// date has the time 00:00.
    #[must_use]
    pub fn date_part(&self, field: DateField, rules: WeekRules) -> i32 {
        let (date, nanos) = match *self {
            Self::Date(date) => (date, 0),
            Self::Time(nanos) => (DateValue::EPOCH, nanos),
            Self::Timestamp { date, nanos } | Self::TimestampWithOffset { date, nanos, .. } => {
                (date, nanos)
            }
        };
        date_part(date, nanos, field, rules)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::string::ToString;

    const NOON_AND_A_BIT: i64 = 12 * NANOS_PER_HOUR + 34 * NANOS_PER_MINUTE + 56 * NANOS_PER_SECOND + 789_000_000;

    #[test]
    fn date_fields() {
        // A Tuesday.
        let date = DateValue::new_unchecked(2019, 12, 31);
        let part = |field| date_part(date, 0, field, WeekRules::ISO);
        assert_eq!(part(DateField::Year), 2019);
        assert_eq!(part(DateField::Month), 12);
        assert_eq!(part(DateField::DayOfMonth), 31);
        assert_eq!(part(DateField::DayOfYear), 365);
        assert_eq!(part(DateField::DayOfWeek), 3);
        assert_eq!(part(DateField::IsoDayOfWeek), 2);
        assert_eq!(part(DateField::Quarter), 4);
        assert_eq!(part(DateField::IsoYear), 2020);
        assert_eq!(part(DateField::IsoWeek), 1);
        assert_eq!(part(DateField::Week), 1);
    }

    #[test]
    fn week_uses_caller_rules() {
        let date = DateValue::new_unchecked(2005, 1, 1);
        assert_eq!(date_part(date, 0, DateField::Week, WeekRules::ISO), 53);
        assert_eq!(date_part(date, 0, DateField::Week, WeekRules::SUNDAY_START), 1);
    }

    #[test]
    fn time_fields() {
        let date = DateValue::EPOCH;
        let part = |nanos, field| date_part(date, nanos, field, WeekRules::ISO);
        assert_eq!(part(NOON_AND_A_BIT, DateField::Hour), 12);
        assert_eq!(part(NOON_AND_A_BIT, DateField::Minute), 34);
        assert_eq!(part(NOON_AND_A_BIT, DateField::Second), 56);
        assert_eq!(part(NOON_AND_A_BIT, DateField::Millisecond), 789);
        assert_eq!(part(25 * NANOS_PER_HOUR, DateField::Hour), 1);
    }

    #[test]
    fn parsed_values() {
        let time = ParsedTemporal::Time(NOON_AND_A_BIT);
        assert_eq!(time.date_part(DateField::Year, WeekRules::ISO), 1970);
        assert_eq!(time.date_part(DateField::Hour, WeekRules::ISO), 12);
        let date = ParsedTemporal::Date(DateValue::new_unchecked(-44, 3, 15));
        assert_eq!(date.date_part(DateField::Year, WeekRules::ISO), -44);
        assert_eq!(date.date_part(DateField::Minute, WeekRules::ISO), 0);
    }

    #[test]
    fn field_names() {
        assert_eq!("ISO_DAY_OF_WEEK".parse::<DateField>().ok(), Some(DateField::IsoDayOfWeek));
        assert_eq!(DateField::DayOfMonth.to_string(), "DAY_OF_MONTH");
        assert!("FORTNIGHT".parse::<DateField>().is_err());
    }
}
