//! The packed `DateValue` representation.
//!
//! A `DateValue` stores a year, month, and day as bit fields of a single
//! signed integer:
//!
//! | bits   | field                 |
//! |--------|-----------------------|
//! | `>= 9` | year (sign preserved) |
//! | `5..9` | month                 |
//! | `0..5` | day                   |
//!
//! This layout is persisted by the value layer and must not change.
//!
//! Packing performs no validation. Use [`DateValue::try_new`] when the
//! fields come from user input.

use core::fmt;

use crate::{calendar, format::FormattableDate, TemporalError, TemporalResult};

pub(crate) const SHIFT_YEAR: u32 = 9;
pub(crate) const SHIFT_MONTH: u32 = 5;

const MONTH_MASK: i64 = 0b1111;
const DAY_MASK: i64 = 0b1_1111;

/// A packed (year, month, day) triple.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct DateValue(i64);

impl DateValue {
    /// The date value for 1970-01-01.
    pub const EPOCH: Self = Self::new_unchecked(1970, 1, 1);

    /// Packs the fields without checking that they name a real day.
    #[inline]
    #[must_use]
    pub const fn new_unchecked(year: i32, month: u8, day: u8) -> Self {
        Self(((year as i64) << SHIFT_YEAR) | ((month as i64) << SHIFT_MONTH) | day as i64)
    }

    /// Packs the fields after validating them with [`calendar::is_valid_date`].
    pub fn try_new(year: i32, month: i32, day: i32) -> TemporalResult<Self> {
        if !calendar::is_valid_date(year, month, day) {
            return Err(TemporalError::invalid_date().with_message(alloc::format!(
                "{year}-{month}-{day} is not a valid calendar date."
            )));
        }
        Ok(Self::new_unchecked(year, month as u8, day as u8))
    }

    /// Reinterprets raw persisted bits as a `DateValue`.
    #[inline]
    #[must_use]
    pub const fn from_bits(bits: i64) -> Self {
        Self(bits)
    }

    /// Returns the raw persisted bits.
    #[inline]
    #[must_use]
    pub const fn to_bits(self) -> i64 {
        self.0
    }

    #[inline]
    #[must_use]
    pub const fn year(self) -> i32 {
        (self.0 >> SHIFT_YEAR) as i32
    }

    /// Returns the month, `1..=12` for a legal date.
    #[inline]
    #[must_use]
    pub const fn month(self) -> u8 {
        ((self.0 >> SHIFT_MONTH) & MONTH_MASK) as u8
    }

    /// Returns the day of month, `1..=31` for a legal date.
    #[inline]
    #[must_use]
    pub const fn day(self) -> u8 {
        (self.0 & DAY_MASK) as u8
    }

    /// Returns whether the packed fields name a real calendar day.
    #[inline]
    #[must_use]
    pub fn is_valid(self) -> bool {
        calendar::is_valid_date(self.year(), i32::from(self.month()), i32::from(self.day()))
    }
}

impl fmt::Display for DateValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&FormattableDate(*self), f)
    }
}
