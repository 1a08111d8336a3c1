//! Conversions between local calendar fields and instants.
//!
//! A [`CalendarContext`] owns a time zone provider, the default zone and two
//! reusable [`Calendar`] computation contexts: one for the default zone and
//! one for the most recently used explicit zone. A context is meant to be
//! owned by a single worker and passed by `&mut`.
//!
//! Instants are counted in milliseconds since 1970-01-01T00:00:00Z unless a
//! function says otherwise.

use num_traits::ToPrimitive;

use crate::{
    calendar,
    date_value::DateValue,
    error::CalendarField,
    host::HostHooks,
    provider::{CandidateOffsets, LocalTimeRecord, TimeZoneProvider},
    time,
    tz::TimeZone,
    TemporalError, TemporalResult, TemporalUnwrap, MILLIS_PER_DAY, NANOS_PER_MILLI,
};

/// Hours added to a local time the zone rejected on its day of month before
/// the lenient retry.
const DAY_OF_MONTH_HOP_HOURS: i32 = 6;

/// The seven fields of a local date time.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct CalendarFields {
    pub year: i32,
    /// January is 1.
    pub month: i32,
    pub day: i32,
    pub hour: i32,
    pub minute: i32,
    pub second: i32,
    pub millisecond: i32,
}

impl CalendarFields {
    #[must_use]
    pub const fn new(
        year: i32,
        month: i32,
        day: i32,
        hour: i32,
        minute: i32,
        second: i32,
        millisecond: i32,
    ) -> Self {
        Self {
            year,
            month,
            day,
            hour,
            minute,
            second,
            millisecond,
        }
    }

    /// Creates fields from a date and a millisecond of day.
    #[must_use]
    pub fn from_date_and_millis(date: DateValue, millis_of_day: i64) -> Self {
        let (hour, minute, second, millisecond) = time::split_nanos(millis_of_day * NANOS_PER_MILLI);
        Self::new(
            date.year(),
            i32::from(date.month()),
            i32::from(date.day()),
            hour,
            minute,
            second,
            millisecond,
        )
    }

    /// Returns the date part, which is only meaningful for valid fields.
    #[must_use]
    pub fn date(&self) -> DateValue {
        DateValue::new_unchecked(self.year, self.month as u8, self.day as u8)
    }

    /// Returns the time part as nanoseconds of day.
    #[must_use]
    pub fn nanos_of_day(&self) -> i64 {
        time::nanos_from_fields(
            i64::from(self.hour),
            i64::from(self.minute),
            i64::from(self.second),
            i64::from(self.millisecond),
        )
    }

    /// Returns the first field outside of its calendar range.
    fn first_overflow(&self) -> Option<CalendarField> {
        if !(1..=12).contains(&self.month) {
            Some(CalendarField::Month)
        } else if !calendar::is_valid_date(self.year, self.month, self.day) {
            Some(CalendarField::DayOfMonth)
        } else if !(0..=23).contains(&self.hour) {
            Some(CalendarField::HourOfDay)
        } else if !(0..=59).contains(&self.minute) {
            Some(CalendarField::Minute)
        } else if !(0..=59).contains(&self.second) {
            Some(CalendarField::Second)
        } else if !(0..=999).contains(&self.millisecond) {
            Some(CalendarField::Millisecond)
        } else {
            None
        }
    }

    /// Returns local milliseconds since 1970-01-01T00:00, carrying
    /// out-of-range fields into the next larger field.
    fn lenient_local_millis(&self) -> i64 {
        let months = i64::from(self.year) * 12 + i64::from(self.month) - 1;
        let year = months.div_euclid(12) as i32;
        let month = (months.rem_euclid(12) + 1) as u8;
        let first = calendar::to_absolute_day(DateValue::new_unchecked(year, month, 1));
        let day = first + i64::from(self.day) - 1;
        day * MILLIS_PER_DAY
            + i64::from(self.hour) * 3_600_000
            + i64::from(self.minute) * 60_000
            + i64::from(self.second) * 1_000
            + i64::from(self.millisecond)
    }
}

/// A reusable calendar computation context for a single zone.
#[derive(Debug, Clone)]
pub struct Calendar {
    zone: TimeZone,
    lenient: bool,
    fields: Option<CalendarFields>,
}

impl Calendar {
    #[must_use]
    pub fn new(zone: TimeZone) -> Self {
        Self {
            zone,
            lenient: false,
            fields: None,
        }
    }

    #[inline]
    #[must_use]
    pub fn zone(&self) -> &TimeZone {
        &self.zone
    }

    /// Forgets all previously set fields.
    pub fn clear(&mut self) {
        self.fields = None;
    }

    pub fn set_lenient(&mut self, lenient: bool) {
        self.lenient = lenient;
    }

    pub fn set(&mut self, fields: CalendarFields) {
        self.fields = Some(fields);
    }

    /// Computes the instant of the fields that were set.
    ///
    /// In strict mode the first out-of-range field, or the hour of a local
    /// time skipped by a transition, fails with a field overflow error. In
    /// lenient mode excess values carry over and skipped local times are
    /// interpreted with the offset in effect before the transition.
    pub fn compute_instant(&self, provider: &impl TimeZoneProvider) -> TemporalResult<i64> {
        let fields = self.fields.temporal_unwrap()?;
        let local_millis = if self.lenient {
            fields.lenient_local_millis()
        } else {
            if let Some(field) = fields.first_overflow() {
                return Err(TemporalError::field_overflow(field).with_message(alloc::format!(
                    "{}-{}-{} {}:{}:{}.{}",
                    fields.year,
                    fields.month,
                    fields.day,
                    fields.hour,
                    fields.minute,
                    fields.second,
                    fields.millisecond
                )));
            }
            calendar::to_absolute_day(fields.date()) * MILLIS_PER_DAY
                + fields.nanos_of_day() / NANOS_PER_MILLI
        };

        let record = match self.zone.candidate_offsets(provider, local_millis.div_euclid(1_000))? {
            CandidateOffsets::One(record) => record,
            CandidateOffsets::Two(first, second) => prefer_standard(first, second),
            CandidateOffsets::Gap { before, .. } if self.lenient => before,
            CandidateOffsets::Gap { .. } => {
                return Err(TemporalError::field_overflow(CalendarField::HourOfDay)
                    .with_message("Local time does not exist in this time zone."))
            }
        };
        Ok(local_millis - i64::from(record.offset_seconds) * 1_000)
    }

    /// Returns the local fields of `epoch_millis` in this calendar's zone.
    pub fn fields_at(
        &self,
        provider: &impl TimeZoneProvider,
        epoch_millis: i64,
    ) -> TemporalResult<CalendarFields> {
        let offset = self
            .zone
            .offset_at(provider, epoch_millis.div_euclid(1_000))?
            .offset_seconds;
        let local = epoch_millis + i64::from(offset) * 1_000;
        let date = calendar::from_absolute_day(local.div_euclid(MILLIS_PER_DAY));
        Ok(CalendarFields::from_date_and_millis(
            date,
            local.rem_euclid(MILLIS_PER_DAY),
        ))
    }
}

fn prefer_standard(first: LocalTimeRecord, second: LocalTimeRecord) -> LocalTimeRecord {
    if first.is_dst && !second.is_dst {
        second
    } else {
        first
    }
}

/// The default zone of a context together with the snapshot of its
/// standard offset.
///
/// The snapshot is taken once and only changes through
/// [`CalendarContext::reset_default_zone`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DefaultZone {
    zone: TimeZone,
    standard_offset_seconds: i32,
}

impl Default for DefaultZone {
    fn default() -> Self {
        Self::utc()
    }
}

impl DefaultZone {
    /// Creates a default zone, measuring its standard offset at
    /// `reference_epoch_millis`.
    pub fn new(
        zone: TimeZone,
        provider: &impl TimeZoneProvider,
        reference_epoch_millis: i64,
    ) -> TemporalResult<Self> {
        let standard_offset_seconds =
            zone.standard_offset_at(provider, reference_epoch_millis.div_euclid(1_000))?;
        Ok(Self {
            zone,
            standard_offset_seconds,
        })
    }

    #[must_use]
    pub fn utc() -> Self {
        Self {
            zone: TimeZone::Utc,
            standard_offset_seconds: 0,
        }
    }

    /// Creates the default zone from the host's zone and clock.
    pub fn from_host(host: &impl HostHooks, provider: &impl TimeZoneProvider) -> TemporalResult<Self> {
        let zone = host.get_system_time_zone(provider)?;
        let now = host.get_system_epoch_milliseconds()?;
        Self::new(zone, provider, now)
    }

    #[inline]
    #[must_use]
    pub fn zone(&self) -> &TimeZone {
        &self.zone
    }

    #[inline]
    #[must_use]
    pub fn standard_offset_millis(&self) -> i64 {
        i64::from(self.standard_offset_seconds) * 1_000
    }
}

/// The per-worker state for converting between local fields and instants.
#[derive(Debug)]
pub struct CalendarContext<P: TimeZoneProvider> {
    provider: P,
    default_zone: DefaultZone,
    default_calendar: Calendar,
    zone_calendar: Option<Calendar>,
}

impl<P: TimeZoneProvider> CalendarContext<P> {
    #[must_use]
    pub fn new(provider: P, default_zone: DefaultZone) -> Self {
        let default_calendar = Calendar::new(default_zone.zone.clone());
        Self {
            provider,
            default_zone,
            default_calendar,
            zone_calendar: None,
        }
    }

    /// Creates a context whose default zone is UTC.
    #[must_use]
    pub fn utc(provider: P) -> Self {
        Self::new(provider, DefaultZone::utc())
    }

    /// Creates a context whose default zone is the host's zone.
    pub fn from_host(provider: P, host: &impl HostHooks) -> TemporalResult<Self> {
        let default_zone = DefaultZone::from_host(host, &provider)?;
        Ok(Self::new(provider, default_zone))
    }

    #[inline]
    #[must_use]
    pub fn provider(&self) -> &P {
        &self.provider
    }

    #[inline]
    #[must_use]
    pub fn default_zone(&self) -> &DefaultZone {
        &self.default_zone
    }

    /// Replaces the default zone and drops the calendar cached for the
    /// previous one.
    pub fn reset_default_zone(&mut self, default_zone: DefaultZone) {
        self.default_calendar = Calendar::new(default_zone.zone.clone());
        self.default_zone = default_zone;
    }

    /// Returns the provider and the cleared calendar of `zone`, or of the
    /// default zone.
    fn calendar(&mut self, zone: Option<&TimeZone>) -> (&P, &mut Calendar) {
        let calendar = match zone {
            None => &mut self.default_calendar,
            Some(zone) => {
                let cached = self.zone_calendar.take().filter(|c| c.zone() == zone);
                self.zone_calendar
                    .insert(cached.unwrap_or_else(|| Calendar::new(zone.clone())))
            }
        };
        calendar.clear();
        (&self.provider, calendar)
    }

    /// Returns the instant of the local fields in `zone`, or in the default
    /// zone if `zone` is `None`.
    ///
    /// Fields are first computed strictly. When that fails on the hour of a
    /// valid hour (a local time skipped by a transition), or on any field other
    /// than the day of month, the computation is repeated leniently. A day of
    /// month that exists in the calendar is retried leniently six hours later.
    pub fn to_instant(&mut self, zone: Option<&TimeZone>, fields: CalendarFields) -> TemporalResult<i64> {
        let (provider, calendar) = self.calendar(zone);
        calendar.set_lenient(false);
        calendar.set(fields);
        let err = match calendar.compute_instant(provider) {
            Ok(instant) => return Ok(instant),
            Err(err) => err,
        };

        let mut fields = fields;
        match err.overflow_field() {
            Some(CalendarField::HourOfDay) => {
                if !(0..=23).contains(&fields.hour) {
                    return Err(err);
                }
                #[cfg(feature = "log")]
                log::debug!("local time {fields:?} skipped in {:?}, resolving leniently", calendar.zone());
            }
            Some(CalendarField::DayOfMonth) => {
                let max_day = i32::from(calendar::days_in_month(fields.year, fields.month as u8));
                if fields.day < 1 || fields.day > max_day {
                    return Err(err);
                }
                #[cfg(feature = "log")]
                log::debug!("day of month rejected for {fields:?}, retrying six hours later");
                fields.hour += DAY_OF_MONTH_HOP_HOURS;
            }
            Some(_) => {}
            None => return Err(err),
        }
        calendar.clear();
        calendar.set_lenient(true);
        calendar.set(fields);
        calendar.compute_instant(provider)
    }

    /// Returns the instant of a date and a millisecond of day.
    pub fn date_time_to_instant(
        &mut self,
        zone: Option<&TimeZone>,
        date: DateValue,
        millis_of_day: i64,
    ) -> TemporalResult<i64> {
        self.to_instant(zone, CalendarFields::from_date_and_millis(date, millis_of_day))
    }

    /// Returns the instant of the start of `date`.
    pub fn date_to_instant(&mut self, zone: Option<&TimeZone>, date: DateValue) -> TemporalResult<i64> {
        self.date_time_to_instant(zone, date, 0)
    }

    /// Returns the instant of a time of day on 1970-01-01 in the default
    /// zone. The hour wraps at 24.
    pub fn time_to_instant(&mut self, nanos: i64) -> TemporalResult<i64> {
        let (hour, minute, second, millisecond) = time::split_nanos(nanos);
        self.to_instant(
            None,
            CalendarFields::new(1970, 1, 1, hour % 24, minute, second, millisecond),
        )
    }

    /// Returns the instant of a timestamp in nanoseconds since the epoch.
    pub fn timestamp_to_instant(
        &mut self,
        zone: Option<&TimeZone>,
        date: DateValue,
        nanos: i64,
    ) -> TemporalResult<i128> {
        let millis = self.date_time_to_instant(zone, date, nanos / NANOS_PER_MILLI)?;
        Ok(i128::from(millis) * i128::from(NANOS_PER_MILLI) + i128::from(nanos % NANOS_PER_MILLI))
    }

    /// Returns the date of `epoch_millis` in the default zone.
    pub fn instant_to_date_value(&mut self, epoch_millis: i64) -> TemporalResult<DateValue> {
        let (provider, calendar) = self.calendar(None);
        Ok(calendar.fields_at(provider, epoch_millis)?.date())
    }

    /// Returns the nanoseconds of day of `epoch_millis` in the default zone.
    pub fn instant_to_nanos(&mut self, epoch_millis: i64) -> TemporalResult<i64> {
        let (provider, calendar) = self.calendar(None);
        Ok(calendar.fields_at(provider, epoch_millis)?.nanos_of_day())
    }

    /// Returns the local date and nanoseconds of day of an instant in
    /// nanoseconds since the epoch.
    pub fn instant_to_timestamp(
        &mut self,
        zone: Option<&TimeZone>,
        epoch_nanos: i128,
    ) -> TemporalResult<(DateValue, i64)> {
        let nanos_per_milli = i128::from(NANOS_PER_MILLI);
        let millis = epoch_nanos
            .div_euclid(nanos_per_milli)
            .to_i64()
            .ok_or(TemporalError::general("Instant is out of range."))?;
        let sub_millis = epoch_nanos.rem_euclid(nanos_per_milli).to_i64().temporal_unwrap()?;
        let (provider, calendar) = self.calendar(zone);
        let fields = calendar.fields_at(provider, millis)?;
        Ok((fields.date(), fields.nanos_of_day() + sub_millis))
    }

    /// Returns the offset in seconds of `zone`, or of the default zone, at
    /// `epoch_millis`.
    pub fn offset_seconds_at(&self, zone: Option<&TimeZone>, epoch_millis: i64) -> TemporalResult<i32> {
        let zone = zone.unwrap_or(&self.default_zone.zone);
        Ok(zone
            .offset_at(&self.provider, epoch_millis.div_euclid(1_000))?
            .offset_seconds)
    }

    /// Shifts an instant into the default zone using its standard offset,
    /// ignoring daylight saving time.
    #[must_use]
    pub fn local_without_dst(&self, epoch_millis: i64) -> i64 {
        epoch_millis + self.default_zone.standard_offset_millis()
    }

    /// Inverse of [`Self::local_without_dst`].
    #[must_use]
    pub fn utc_without_dst(&self, local_millis: i64) -> i64 {
        local_millis - self.default_zone.standard_offset_millis()
    }
}
