//! Proleptic Julian/Gregorian calendar equations.
//!
//! An absolute day is the signed number of days since 1970-01-01. Dates at
//! or before 1582-10-04 are Julian, dates at or after 1582-10-15 are
//! Gregorian, and the ten days in between do not exist.

use crate::date_value::DateValue;

/// The last Julian year; 1582-10-04 is directly followed by 1582-10-15.
pub const CUTOVER_YEAR: i32 = 1582;

const NORMAL_DAYS_PER_MONTH: [u8; 13] = [0, 31, 28, 31, 30, 31, 30, 31, 31, 30, 31, 30, 31];

/// Offsets of each month within a year starting with March.
const DAYS_OFFSET: [i64; 13] = [0, 31, 61, 92, 122, 153, 184, 214, 245, 275, 306, 337, 366];

/// Days in 400 Gregorian years.
const DAYS_PER_400_YEARS: i64 = 146_097;
/// Days in 100 Gregorian years (the last one without leap day).
const DAYS_PER_100_YEARS: i64 = 36_524;
/// Days in 4 Julian years.
const DAYS_PER_4_YEARS: i64 = 1_461;

/// Day count between 0000-03-01 (Gregorian) and 1970-01-01.
const MARCH_BASED_EPOCH_SHIFT: i64 = 719_468;
/// The last day of the Julian calendar relative to `MARCH_BASED_EPOCH_SHIFT`.
const LAST_JULIAN_DAY: i64 = 578_040;
/// 800 million Julian years plus the two day difference at year zero.
const JULIAN_DAY_SHIFT: i64 = 292_200_000_002;
const JULIAN_YEAR_SHIFT: i64 = -800_000_000;
/// Absolute days are clamped to about 800 million years around the epoch.
const MAX_ABSOLUTE_DAY: i64 = 292_200_000_000;

/// Returns whether `year` is a leap year in the hybrid calendar.
#[inline]
#[must_use]
pub fn is_leap_year(year: i32) -> bool {
    if year > CUTOVER_YEAR {
        (year & 3) == 0 && (year % 100 != 0 || year % 400 == 0)
    } else {
        (year & 3) == 0
    }
}

/// Returns the length of `month` in `year`.
///
/// October 1582 reports 31 days even though ten of them do not exist.
#[must_use]
pub fn days_in_month(year: i32, month: u8) -> u8 {
    debug_assert!((1..=12).contains(&month));
    if month == 2 && is_leap_year(year) {
        29
    } else {
        NORMAL_DAYS_PER_MONTH[usize::from(month)]
    }
}

/// Verify if the specified year, month (January is 1), and day name a real
/// date of the hybrid calendar.
#[must_use]
pub fn is_valid_date(year: i32, month: i32, day: i32) -> bool {
    if !(1..=12).contains(&month) || day < 1 {
        return false;
    }
    if year == CUTOVER_YEAR && month == 10 {
        // 1582-10-05 ..= 1582-10-14 were skipped.
        return day <= 31 && !(5..=14).contains(&day);
    }
    day <= i32::from(days_in_month(year, month as u8))
}

/// Converts a `DateValue` to its absolute day.
#[must_use]
pub fn to_absolute_day(date: DateValue) -> i64 {
    let mut y = i64::from(date.year());
    let mut m = i64::from(date.month());
    let d = i64::from(date.day());
    if m <= 2 {
        y -= 1;
        m += 12;
    }
    // (y * 2922) >> 3 == floor(365.25 * y), also for negative years.
    let mut a = ((y * 2922) >> 3) + DAYS_OFFSET[(m - 3) as usize] + d - 719_484;
    if y <= i64::from(CUTOVER_YEAR) && (y < i64::from(CUTOVER_YEAR) || m * 100 + d < 1005) {
        a += 13;
    } else if !(1901..=2099).contains(&y) {
        // Outside of 1901..=2099 the 365.25 factor misses the century rule.
        a += (y / 400) - (y / 100) + 15;
    }
    a
}

/// Converts an absolute day to its `DateValue`.
///
/// Days beyond ±292,200,000,000 are clamped to that range.
#[must_use]
pub fn from_absolute_day(absolute_day: i64) -> DateValue {
    let mut d = absolute_day.clamp(-MAX_ABSOLUTE_DAY, MAX_ABSOLUTE_DAY) + MARCH_BASED_EPOCH_SHIFT;
    let mut y100 = 0;
    let offset;
    if d > LAST_JULIAN_DAY {
        let y400 = d / DAYS_PER_400_YEARS;
        d -= y400 * DAYS_PER_400_YEARS;
        y100 = d / DAYS_PER_100_YEARS;
        d -= y100 * DAYS_PER_100_YEARS;
        offset = y400 * 400 + y100 * 100;
    } else {
        d += JULIAN_DAY_SHIFT;
        offset = JULIAN_YEAR_SHIFT;
    }
    let y4 = d / DAYS_PER_4_YEARS;
    d -= y4 * DAYS_PER_4_YEARS;
    let mut y = d / 365;
    d -= y * 365;
    // The leap day closing a 4 or 400 year block lands one year too far.
    if d == 0 && (y == 4 || y100 == 4) {
        y -= 1;
        d += 365;
    }
    y += offset + y4 * 4;
    // March-based month of the day in year.
    let mut m = (d * 2 + 1) * 5 / 306;
    d -= DAYS_OFFSET[m as usize] - 1;
    if m >= 10 {
        y += 1;
        m -= 12;
    }
    DateValue::new_unchecked(y as i32, (m + 3) as u8, d as u8)
}

/// Adds `months` to `date`, clamping the day of month to the length of the
/// resulting month (2007-04-30 minus two months is 2007-02-28).
#[must_use]
pub fn add_months(date: DateValue, months: i32) -> DateValue {
    let total = i64::from(date.year()) * 12 + i64::from(date.month()) - 1 + i64::from(months);
    let year = total.div_euclid(12) as i32;
    let month = (total.rem_euclid(12) + 1) as u8;
    let day = date.day().min(days_in_month(year, month));
    let mut result = DateValue::new_unchecked(year, month, day);
    if !result.is_valid() {
        // Landed inside the 1582 gap, continue on the first Gregorian day.
        result = DateValue::new_unchecked(CUTOVER_YEAR, 10, 15);
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ymd(year: i32, month: u8, day: u8) -> DateValue {
        DateValue::new_unchecked(year, month, day)
    }

    #[test]
    fn epoch_and_well_known_days() {
        assert_eq!(to_absolute_day(ymd(1970, 1, 1)), 0);
        assert_eq!(to_absolute_day(ymd(1969, 12, 31)), -1);
        assert_eq!(to_absolute_day(ymd(2000, 3, 1)), 11_017);
        assert_eq!(to_absolute_day(ymd(2038, 1, 19)), 24_855);
        assert_eq!(to_absolute_day(ymd(1900, 1, 1)), -25_567);
        assert_eq!(to_absolute_day(ymd(2100, 3, 1)), 47_541);
    }

    #[test]
    fn cutover_days_are_adjacent() {
        let last_julian = to_absolute_day(ymd(1582, 10, 4));
        let first_gregorian = to_absolute_day(ymd(1582, 10, 15));
        assert_eq!(last_julian, -141_428);
        assert_eq!(first_gregorian, last_julian + 1);
        assert_eq!(from_absolute_day(last_julian), ymd(1582, 10, 4));
        assert_eq!(from_absolute_day(first_gregorian), ymd(1582, 10, 15));
    }

    #[test]
    fn julian_leap_days_exist_before_cutover() {
        assert!(is_valid_date(1500, 2, 29));
        assert!(is_valid_date(1100, 2, 29));
        assert!(!is_valid_date(1700, 2, 29));
        assert!(is_valid_date(1600, 2, 29));
        assert!(is_valid_date(-4, 2, 29));
        assert!(!is_valid_date(-3, 2, 29));
        let feb_29 = to_absolute_day(ymd(1500, 2, 29));
        assert_eq!(from_absolute_day(feb_29 + 1), ymd(1500, 3, 1));
    }

    #[test]
    fn cutover_gap_is_invalid() {
        for day in 5..=14 {
            assert!(!is_valid_date(1582, 10, day), "1582-10-{day}");
        }
        assert!(is_valid_date(1582, 10, 4));
        assert!(is_valid_date(1582, 10, 15));
        assert!(is_valid_date(1582, 10, 31));
        assert!(!is_valid_date(1582, 10, 32));
    }

    #[test]
    fn rejects_out_of_range_fields() {
        assert!(!is_valid_date(2020, 0, 1));
        assert!(!is_valid_date(2020, 13, 1));
        assert!(!is_valid_date(2020, 4, 0));
        assert!(!is_valid_date(2020, 4, 31));
        assert!(!is_valid_date(2019, 2, 29));
        assert!(!is_valid_date(1900, 2, 29));
        assert!(is_valid_date(2000, 2, 29));
    }

    #[test]
    fn round_trip_all_legal_dates() {
        let mut expected_day = to_absolute_day(ymd(-9999, 1, 1));
        for year in -9999..=9999 {
            for month in 1..=12u8 {
                for day in 1..=days_in_month(year, month) {
                    if !is_valid_date(year, i32::from(month), i32::from(day)) {
                        continue;
                    }
                    let date = ymd(year, month, day);
                    let absolute = to_absolute_day(date);
                    assert_eq!(absolute, expected_day, "{year}-{month}-{day}");
                    assert_eq!(from_absolute_day(absolute), date);
                    expected_day += 1;
                }
            }
        }
    }

    #[test]
    fn absolute_days_round_trip() {
        for absolute in (-5_000_000..5_000_000).step_by(997) {
            assert_eq!(to_absolute_day(from_absolute_day(absolute)), absolute);
        }
        for absolute in -200_000..-100_000 {
            assert_eq!(to_absolute_day(from_absolute_day(absolute)), absolute);
        }
    }

    #[test]
    fn extreme_absolute_days_are_clamped() {
        assert_eq!(from_absolute_day(i64::MAX), from_absolute_day(MAX_ABSOLUTE_DAY));
        assert_eq!(from_absolute_day(i64::MIN), from_absolute_day(-MAX_ABSOLUTE_DAY));
        assert!(from_absolute_day(i64::MAX).year() > 800_000_000);
        assert!(from_absolute_day(i64::MIN).year() < -799_000_000);
    }

    #[test]
    fn block_boundaries() {
        assert_eq!(from_absolute_day(to_absolute_day(ymd(2000, 2, 29))), ymd(2000, 2, 29));
        assert_eq!(from_absolute_day(to_absolute_day(ymd(1600, 2, 29))), ymd(1600, 2, 29));
        assert_eq!(from_absolute_day(to_absolute_day(ymd(2400, 2, 29))), ymd(2400, 2, 29));
        assert_eq!(from_absolute_day(to_absolute_day(ymd(2004, 2, 29))), ymd(2004, 2, 29));
        assert_eq!(from_absolute_day(to_absolute_day(ymd(1999, 12, 31)) + 1), ymd(2000, 1, 1));
    }

    #[test]
    fn add_months_clamps_day() {
        assert_eq!(add_months(ymd(2007, 4, 30), -2), ymd(2007, 2, 28));
        assert_eq!(add_months(ymd(2008, 1, 31), 1), ymd(2008, 2, 29));
        assert_eq!(add_months(ymd(2020, 11, 15), 3), ymd(2021, 2, 15));
        assert_eq!(add_months(ymd(1, 1, 10), -1), ymd(0, 12, 10));
        assert_eq!(add_months(ymd(-1, 12, 31), 2), ymd(0, 2, 29));
        assert_eq!(add_months(ymd(1582, 9, 10), 1), ymd(1582, 10, 15));
    }
}
