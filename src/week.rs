//! Day of week, day of year and week numbering.

use crate::{calendar, date_value::DateValue, TemporalError, TemporalResult};

/// The rules defining the first week of a year.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct WeekRules {
    first_day_of_week: u8,
    minimal_days: u8,
}

impl WeekRules {
    /// ISO 8601 weeks: starting on Monday, week 1 holds at least four days.
    pub const ISO: Self = Self {
        first_day_of_week: 1,
        minimal_days: 4,
    };

    /// Weeks starting on Sunday where week 1 is the week holding January 1.
    pub const SUNDAY_START: Self = Self {
        first_day_of_week: 0,
        minimal_days: 1,
    };

    /// Creates new week rules.
    ///
    /// `first_day_of_week` uses Monday as 1 and Sunday as either 0 or 7.
    /// `minimal_days` is the number of days of the new year required in its
    /// first week.
    pub fn try_new(first_day_of_week: u8, minimal_days: u8) -> TemporalResult<Self> {
        if first_day_of_week > 7 || !(1..=7).contains(&minimal_days) {
            return Err(TemporalError::general(alloc::format!(
                "Invalid week rules: first day {first_day_of_week}, minimal days {minimal_days}."
            )));
        }
        Ok(Self {
            first_day_of_week,
            minimal_days,
        })
    }

    #[inline]
    #[must_use]
    pub const fn first_day_of_week(self) -> u8 {
        self.first_day_of_week
    }

    #[inline]
    #[must_use]
    pub const fn minimal_days(self) -> u8 {
        self.minimal_days
    }
}

impl Default for WeekRules {
    fn default() -> Self {
        Self::ISO
    }
}

/// Returns the day of week of `date` in `1..=7`, where 1 is
/// `first_day_of_week` (Monday as 1, Sunday as 0 or 7).
#[must_use]
pub fn day_of_week(date: DateValue, first_day_of_week: u8) -> u8 {
    day_of_week_from_absolute(calendar::to_absolute_day(date), first_day_of_week)
}

fn day_of_week_from_absolute(absolute_day: i64, first_day_of_week: u8) -> u8 {
    let first = i64::from(first_day_of_week);
    // `%` truncates, so days before the epoch need their own branch.
    if absolute_day >= 0 {
        ((absolute_day - first + 11) % 7 + 1) as u8
    } else {
        ((absolute_day - first - 2) % 7 + 7) as u8
    }
}

/// Returns the ISO day of week, Monday as 1 to Sunday as 7.
#[inline]
#[must_use]
pub fn iso_day_of_week(date: DateValue) -> u8 {
    day_of_week(date, 1)
}

/// Returns the day of week with Sunday as 1 to Saturday as 7.
#[inline]
#[must_use]
pub fn sunday_day_of_week(date: DateValue) -> u8 {
    day_of_week(date, 0)
}

/// Returns the one-based day number within the year of `date`.
#[must_use]
pub fn day_of_year(date: DateValue) -> u16 {
    let first = DateValue::new_unchecked(date.year(), 1, 1);
    (calendar::to_absolute_day(date) - calendar::to_absolute_day(first) + 1) as u16
}

/// Returns the absolute day on which week 1 of `year` starts.
fn week_one_start(year: i32, rules: WeekRules) -> i64 {
    let first = calendar::to_absolute_day(DateValue::new_unchecked(year, 1, 1));
    let days_in_first_week = 8 - i64::from(day_of_week_from_absolute(first, rules.first_day_of_week));
    let mut base = first + days_in_first_week;
    if days_in_first_week >= i64::from(rules.minimal_days) {
        base -= 7;
    }
    base
}

/// Where a date falls relative to the week-numbered year of its calendar
/// year.
enum WeekPosition {
    PreviousYear,
    NextYear,
    SameYear(i64),
}

fn week_position(date: DateValue, rules: WeekRules) -> (i64, WeekPosition) {
    let absolute_day = calendar::to_absolute_day(date);
    let year = date.year();
    let base = week_one_start(year, rules);
    if absolute_day < base {
        return (absolute_day, WeekPosition::PreviousYear);
    }
    if date.month() == 12
        && 24 + rules.minimal_days < date.day()
        && absolute_day >= week_one_start(year + 1, rules)
    {
        return (absolute_day, WeekPosition::NextYear);
    }
    (absolute_day, WeekPosition::SameYear(base))
}

/// Returns the week number of `date` under `rules`.
#[must_use]
pub fn week_of_year(date: DateValue, rules: WeekRules) -> u8 {
    let (absolute_day, base) = match week_position(date, rules) {
        (_, WeekPosition::NextYear) => return 1,
        (absolute_day, WeekPosition::PreviousYear) => {
            (absolute_day, week_one_start(date.year() - 1, rules))
        }
        (absolute_day, WeekPosition::SameYear(base)) => (absolute_day, base),
    };
    ((absolute_day - base) / 7 + 1) as u8
}

/// Returns the year that the week of `date` is numbered in under `rules`.
#[must_use]
pub fn week_year(date: DateValue, rules: WeekRules) -> i32 {
    match week_position(date, rules).1 {
        WeekPosition::PreviousYear => date.year() - 1,
        WeekPosition::NextYear => date.year() + 1,
        WeekPosition::SameYear(_) => date.year(),
    }
}

/// Returns the ISO 8601 week number of `date`.
#[inline]
#[must_use]
pub fn iso_week_of_year(date: DateValue) -> u8 {
    week_of_year(date, WeekRules::ISO)
}

/// Returns the ISO 8601 week-numbering year of `date`.
#[inline]
#[must_use]
pub fn iso_week_year(date: DateValue) -> i32 {
    week_year(date, WeekRules::ISO)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ymd(year: i32, month: u8, day: u8) -> DateValue {
        DateValue::new_unchecked(year, month, day)
    }

    #[test]
    fn day_of_week_around_epoch() {
        // 1970-01-01 was a Thursday.
        assert_eq!(iso_day_of_week(ymd(1970, 1, 1)), 4);
        assert_eq!(iso_day_of_week(ymd(1969, 12, 31)), 3);
        assert_eq!(iso_day_of_week(ymd(1969, 12, 28)), 7);
        assert_eq!(iso_day_of_week(ymd(1969, 12, 29)), 1);
        assert_eq!(sunday_day_of_week(ymd(1970, 1, 1)), 5);
        assert_eq!(sunday_day_of_week(ymd(1969, 12, 28)), 1);
        assert_eq!(day_of_week(ymd(1970, 1, 1), 7), day_of_week(ymd(1970, 1, 1), 0));
    }

    #[test]
    fn day_of_week_is_cyclic_before_epoch() {
        let mut expected = iso_day_of_week(ymd(1500, 1, 1));
        let start = calendar::to_absolute_day(ymd(1500, 1, 1));
        for absolute in start..start + 200_000 {
            let date = calendar::from_absolute_day(absolute);
            assert_eq!(iso_day_of_week(date), expected, "{date}");
            expected = expected % 7 + 1;
        }
    }

    #[test]
    fn cutover_weekdays() {
        // Thursday 1582-10-04 was followed by Friday 1582-10-15.
        assert_eq!(iso_day_of_week(ymd(1582, 10, 4)), 4);
        assert_eq!(iso_day_of_week(ymd(1582, 10, 15)), 5);
    }

    #[test]
    fn day_of_year_values() {
        assert_eq!(day_of_year(ymd(2020, 1, 1)), 1);
        assert_eq!(day_of_year(ymd(2020, 12, 31)), 366);
        assert_eq!(day_of_year(ymd(2019, 12, 31)), 365);
        assert_eq!(day_of_year(ymd(1582, 12, 31)), 355);
        assert_eq!(day_of_year(ymd(-1, 3, 1)), 60);
    }

    #[test]
    fn iso_week_boundaries() {
        assert_eq!(iso_week_of_year(ymd(2019, 12, 31)), 1);
        assert_eq!(iso_week_year(ymd(2019, 12, 31)), 2020);
        assert_eq!(iso_week_of_year(ymd(2005, 1, 1)), 53);
        assert_eq!(iso_week_year(ymd(2005, 1, 1)), 2004);
        assert_eq!(iso_week_of_year(ymd(2005, 1, 3)), 1);
        assert_eq!(iso_week_year(ymd(2005, 1, 3)), 2005);
        assert_eq!(iso_week_of_year(ymd(2008, 12, 29)), 1);
        assert_eq!(iso_week_year(ymd(2008, 12, 29)), 2009);
        assert_eq!(iso_week_of_year(ymd(2010, 1, 3)), 53);
        assert_eq!(iso_week_of_year(ymd(2020, 12, 31)), 53);
        assert_eq!(iso_week_year(ymd(2020, 12, 31)), 2020);
        assert_eq!(iso_week_of_year(ymd(2021, 6, 15)), 24);
    }

    #[test]
    fn sunday_start_weeks() {
        // January 1 is always in week 1.
        assert_eq!(week_of_year(ymd(2022, 1, 1), WeekRules::SUNDAY_START), 1);
        assert_eq!(week_of_year(ymd(2022, 1, 2), WeekRules::SUNDAY_START), 2);
        assert_eq!(week_of_year(ymd(2022, 12, 31), WeekRules::SUNDAY_START), 53);
        assert_eq!(week_of_year(ymd(2021, 12, 26), WeekRules::SUNDAY_START), 1);
        assert_eq!(week_year(ymd(2021, 12, 26), WeekRules::SUNDAY_START), 2022);
    }

    #[test]
    fn week_rules_validation() {
        assert!(WeekRules::try_new(8, 4).is_err());
        assert!(WeekRules::try_new(1, 0).is_err());
        assert!(WeekRules::try_new(1, 8).is_err());
        let rules = WeekRules::try_new(7, 1).unwrap();
        assert_eq!(rules.first_day_of_week(), 7);
        assert_eq!(WeekRules::default(), WeekRules::ISO);
    }
}
