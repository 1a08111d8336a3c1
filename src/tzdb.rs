//! A `TimeZoneProvider` backed by compiled TZif data.
//!
//! Zone data is taken from the copy of the IANA database bundled by
//! `jiff-tzdb`. On Unix systems identifiers missing from the bundle are
//! looked up in the system zoneinfo directory.
//!
//! Instants before the first transition use the first local time type of
//! the file, instants after the last transition are resolved with the POSIX
//! TZ string found in the footer of TZif v2+ files.

use std::path::Path;
#[cfg(unix)]
use std::path::PathBuf;

use alloc::borrow::Cow;
use alloc::collections::BTreeMap;
use alloc::string::{String, ToString};
use core::cell::{Ref, RefCell};

use combine::Parser;

use tzif::data::{
    posix::{PosixTzString, TransitionDate, TransitionDay},
    time::Seconds,
    tzif::{DataBlock, LocalTimeTypeRecord, TzifData},
};

use crate::{
    calendar,
    date_value::DateValue,
    provider::{LocalTimeRecord, TimeZoneProvider},
    week, TemporalError, TemporalResult, TemporalUnwrap, SECONDS_PER_DAY,
};

#[cfg(unix)]
const ZONEINFO_DIR: &str = "/usr/share/zoneinfo/";

impl From<LocalTimeTypeRecord> for LocalTimeRecord {
    fn from(value: LocalTimeTypeRecord) -> Self {
        Self {
            offset_seconds: value.utoff.0 as i32,
            is_dst: value.is_dst,
        }
    }
}

/// `TZif` is the time zone information format of [RFC 8536][rfc8536].
///
/// Only the v2+ data block and footer are kept.
///
/// [rfc8536]: https://datatracker.ietf.org/doc/html/rfc8536
#[derive(Debug, Clone)]
pub struct Tzif {
    data_block: DataBlock,
    footer: Option<PosixTzString>,
}

impl TryFrom<TzifData> for Tzif {
    type Error = TemporalError;

    fn try_from(value: TzifData) -> Result<Self, Self::Error> {
        let TzifData {
            data_block2,
            footer,
            ..
        } = value;
        let data_block = data_block2
            .ok_or_else(|| TemporalError::general("Only TZif v2+ is supported."))?;
        crate::temporal_assert!(
            !data_block.local_time_type_records.is_empty(),
            "TZif data block without local time types"
        );
        Ok(Self { data_block, footer })
    }
}

impl Tzif {
    pub fn from_bytes(data: &[u8]) -> TemporalResult<Self> {
        let Ok((parse_result, _)) = tzif::parse::tzif::tzif().parse(data) else {
            return Err(TemporalError::general("Illformed TZif data."));
        };
        Self::try_from(parse_result)
    }

    #[cfg(unix)]
    pub fn read_tzif(identifier: &str) -> TemporalResult<Self> {
        if identifier.starts_with('/') || identifier.split('/').any(|part| part == "..") {
            return Err(TemporalError::time_zone()
                .with_message(alloc::format!("{identifier} is not a zone identifier.")));
        }
        let mut path = PathBuf::from(ZONEINFO_DIR);
        path.push(identifier);
        Self::from_path(&path)
    }

    pub fn from_path<P: AsRef<Path>>(path: P) -> TemporalResult<Self> {
        tzif::parse_tzif_file(path.as_ref())
            .map_err(|e| TemporalError::general(e.to_string()))
            .and_then(Self::try_from)
    }

    fn record(&self, idx: usize) -> TemporalResult<LocalTimeRecord> {
        let db = &self.data_block;
        db.transition_types
            .get(idx)
            .and_then(|&ty| db.local_time_type_records.get(ty))
            .map(|&record| record.into())
            .temporal_unwrap()
    }

    fn first_record(&self) -> TemporalResult<LocalTimeRecord> {
        self.data_block
            .local_time_type_records
            .first()
            .map(|&record| record.into())
            .temporal_unwrap()
    }

    /// Returns the index of the transition in effect at `epoch_seconds`, or
    /// `None` before the first transition.
    fn transition_index(&self, epoch_seconds: i64) -> Option<usize> {
        match self
            .data_block
            .transition_times
            .binary_search(&Seconds(epoch_seconds))
        {
            Ok(idx) => Some(idx),
            Err(0) => None,
            Err(idx) => Some(idx - 1),
        }
    }

    /// Returns whether `epoch_seconds` lies past the last transition and the
    /// footer has to be consulted.
    fn uses_footer(&self, epoch_seconds: i64) -> bool {
        self.footer.is_some()
            && self
                .data_block
                .transition_times
                .last()
                .map_or(true, |last| epoch_seconds > last.0)
    }

    /// Returns the offset record in effect at `epoch_seconds`.
    pub fn get(&self, epoch_seconds: i64) -> TemporalResult<LocalTimeRecord> {
        if let Some(footer) = self.footer.as_ref().filter(|_| self.uses_footer(epoch_seconds)) {
            return Ok(resolve_posix_tz_string(footer, epoch_seconds));
        }
        match self.transition_index(epoch_seconds) {
            Some(idx) => self.record(idx),
            None => self.first_record(),
        }
    }

    /// Returns the standard time offset in effect at `epoch_seconds`.
    pub fn standard_offset(&self, epoch_seconds: i64) -> TemporalResult<i32> {
        if let Some(footer) = self.footer.as_ref().filter(|_| self.uses_footer(epoch_seconds)) {
            return Ok(-footer.std_info.offset.0 as i32);
        }
        let Some(idx) = self.transition_index(epoch_seconds) else {
            return Ok(self.first_record()?.offset_seconds);
        };
        for idx in (0..=idx).rev() {
            let record = self.record(idx)?;
            if !record.is_dst {
                return Ok(record.offset_seconds);
            }
        }
        Ok(self.first_record()?.offset_seconds)
    }
}

/// Resolves `epoch_seconds` with the rule of a POSIX TZ string.
fn resolve_posix_tz_string(posix_tz_string: &PosixTzString, epoch_seconds: i64) -> LocalTimeRecord {
    // POSIX offsets count hours west of UTC.
    let std_offset = -posix_tz_string.std_info.offset.0;
    let Some(dst) = &posix_tz_string.dst_info else {
        // Regardless of the time, there is one variant and we can return it.
        return LocalTimeRecord::standard(std_offset as i32);
    };
    let dst_offset = -dst.variant_info.offset.0;

    let local_day = (epoch_seconds + std_offset).div_euclid(SECONDS_PER_DAY);
    let year = calendar::from_absolute_day(local_day).year();
    let start = transition_seconds_for_year(year, &dst.start_date, std_offset);
    let end = transition_seconds_for_year(year, &dst.end_date, dst_offset);

    let is_dst = if start < end {
        (start..end).contains(&epoch_seconds)
    } else {
        // Southern hemisphere: daylight saving time spans the new year.
        !(end..start).contains(&epoch_seconds)
    };
    if is_dst {
        LocalTimeRecord::daylight(dst_offset as i32)
    } else {
        LocalTimeRecord::standard(std_offset as i32)
    }
}

/// Returns the instant of `transition_date` in `year`, where the transition
/// time is local time at `offset` seconds east of UTC.
fn transition_seconds_for_year(year: i32, transition_date: &TransitionDate, offset: i64) -> i64 {
    let year_start = calendar::to_absolute_day(DateValue::new_unchecked(year, 1, 1));
    let day_in_year = match transition_date.day {
        // `Jn` never counts February 29.
        TransitionDay::NoLeap(day) => {
            let leap_day = calendar::is_leap_year(year) && day > 59;
            i64::from(day) - 1 + i64::from(leap_day)
        }
        TransitionDay::WithLeap(day) => i64::from(day),
        TransitionDay::Mwd(month, week_of_month, day_of_week) => {
            let month = month as u8;
            let first_of_month = DateValue::new_unchecked(year, month, 1);
            // Sunday is 0 in POSIX rules.
            let first_day_of_week = i64::from(week::sunday_day_of_week(first_of_month)) - 1;
            let mut day_of_month =
                (i64::from(day_of_week) - first_day_of_week).rem_euclid(7) + (i64::from(week_of_month) - 1) * 7;
            // Week 5 means the last such day of the month.
            while day_of_month >= i64::from(calendar::days_in_month(year, month)) {
                day_of_month -= 7;
            }
            calendar::to_absolute_day(first_of_month) - year_start + day_of_month
        }
    };
    (year_start + day_in_year) * SECONDS_PER_DAY + transition_date.time.0 - offset
}

/// A `TimeZoneProvider` reading TZif data, caching parsed zones per instance.
#[derive(Debug, Default)]
pub struct TzdbProvider {
    cache: RefCell<BTreeMap<String, Tzif>>,
}

impl TzdbProvider {
    /// Returns the parsed data of `identifier`, loading it on first use.
    pub fn get(&self, identifier: &str) -> TemporalResult<Ref<'_, Tzif>> {
        if !self.cache.borrow().contains_key(identifier) {
            let tzif = Self::load(identifier)?;
            self.cache.borrow_mut().insert(identifier.into(), tzif);
        }
        Ref::filter_map(self.cache.borrow(), |cache| cache.get(identifier))
            .map_err(|_| TemporalError::assert())
    }

    fn load(identifier: &str) -> TemporalResult<Tzif> {
        if let Some((_, data)) = jiff_tzdb::get(identifier) {
            return Tzif::from_bytes(data);
        }
        #[cfg(unix)]
        {
            Tzif::read_tzif(identifier)
        }
        #[cfg(not(unix))]
        {
            Err(TemporalError::time_zone()
                .with_message(alloc::format!("Unknown time zone identifier: {identifier}.")))
        }
    }
}

impl TimeZoneProvider for TzdbProvider {
    fn canonicalize_identifier(&self, identifier: &str) -> TemporalResult<Cow<'_, str>> {
        if let Some((canonical, _)) = jiff_tzdb::get(identifier) {
            return Ok(Cow::Borrowed(canonical));
        }
        match self.get(identifier) {
            Ok(_) => Ok(Cow::Owned(identifier.into())),
            Err(_) => Err(TemporalError::time_zone()
                .with_message(alloc::format!("Unknown time zone identifier: {identifier}."))),
        }
    }

    fn offset_at(&self, identifier: &str, epoch_seconds: i64) -> TemporalResult<LocalTimeRecord> {
        self.get(identifier)?.get(epoch_seconds)
    }

    fn standard_offset_at(&self, identifier: &str, epoch_seconds: i64) -> TemporalResult<i32> {
        self.get(identifier)?.standard_offset(epoch_seconds)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{provider::CandidateOffsets, ErrorKind};

    fn local_seconds(year: i32, month: u8, day: u8, hour: i64, minute: i64) -> i64 {
        let day = calendar::to_absolute_day(DateValue::new_unchecked(year, month, day));
        day * SECONDS_PER_DAY + hour * 3600 + minute * 60
    }

    #[test]
    fn zoneinfo_files_are_read_by_path() {
        let err = Tzif::from_path("/nonexistent/zoneinfo/Mars/Olympus").err();
        assert_eq!(err.map(|e| e.kind()), Some(ErrorKind::Generic));
        let err = Tzif::from_path(Path::new("/nonexistent/zoneinfo/UTC")).err();
        assert_eq!(err.map(|e| e.kind()), Some(ErrorKind::Generic));
    }

    #[cfg(unix)]
    #[test]
    fn zoneinfo_lookup_stays_in_the_zoneinfo_directory() {
        for identifier in ["/etc/localtime", "../../etc/passwd", "Europe/../../etc"] {
            let err = Tzif::read_tzif(identifier).err();
            assert_eq!(err.map(|e| e.kind()), Some(ErrorKind::TimeZone));
        }
    }

    #[test]
    fn new_york_spring_gap() {
        let provider = TzdbProvider::default();
        let result = provider
            .candidate_offsets("America/New_York", local_seconds(2017, 3, 12, 2, 30))
            .unwrap();
        assert_eq!(
            result,
            CandidateOffsets::Gap {
                before: LocalTimeRecord::standard(-18_000),
                after: LocalTimeRecord::daylight(-14_400),
            }
        );

        let result = provider
            .candidate_offsets("America/New_York", local_seconds(2017, 3, 12, 3, 0))
            .unwrap();
        assert_eq!(result, CandidateOffsets::One(LocalTimeRecord::daylight(-14_400)));

        let result = provider
            .candidate_offsets("America/New_York", local_seconds(2017, 3, 12, 1, 59))
            .unwrap();
        assert_eq!(result, CandidateOffsets::One(LocalTimeRecord::standard(-18_000)));
    }

    #[test]
    fn new_york_fall_overlap() {
        let provider = TzdbProvider::default();
        let result = provider
            .candidate_offsets("America/New_York", local_seconds(2017, 11, 5, 1, 30))
            .unwrap();
        assert_eq!(
            result,
            CandidateOffsets::Two(
                LocalTimeRecord::daylight(-14_400),
                LocalTimeRecord::standard(-18_000),
            )
        );
    }

    #[test]
    fn sydney_gap_and_overlap() {
        let provider = TzdbProvider::default();
        let gap = provider
            .candidate_offsets("Australia/Sydney", local_seconds(2017, 10, 1, 2, 30))
            .unwrap();
        assert!(matches!(gap, CandidateOffsets::Gap { .. }));

        let overlap = provider
            .candidate_offsets("Australia/Sydney", local_seconds(2017, 4, 2, 2, 30))
            .unwrap();
        assert_eq!(
            overlap,
            CandidateOffsets::Two(
                LocalTimeRecord::daylight(39_600),
                LocalTimeRecord::standard(36_000),
            )
        );
    }

    #[test]
    fn posix_footer_beyond_transitions() {
        let provider = TzdbProvider::default();
        let summer = local_seconds(2100, 7, 1, 12, 0);
        let winter = local_seconds(2100, 1, 15, 12, 0);
        assert_eq!(
            provider.offset_at("America/New_York", summer).unwrap(),
            LocalTimeRecord::daylight(-14_400)
        );
        assert_eq!(
            provider.offset_at("America/New_York", winter).unwrap(),
            LocalTimeRecord::standard(-18_000)
        );
        assert_eq!(
            provider.offset_at("Australia/Sydney", summer).unwrap(),
            LocalTimeRecord::standard(36_000)
        );
        assert_eq!(
            provider.offset_at("Australia/Sydney", winter).unwrap(),
            LocalTimeRecord::daylight(39_600)
        );
        assert_eq!(provider.standard_offset_at("America/New_York", summer), Ok(-18_000));
    }

    #[test]
    fn mwd_transition_instants() {
        // Second Sunday of March at 02:00 EST.
        let date = TransitionDate {
            day: TransitionDay::Mwd(3, 2, 0),
            time: Seconds(7_200),
        };
        assert_eq!(transition_seconds_for_year(2017, &date, -18_000), 1_489_302_000);

        // Last Sunday of October at 01:00 UTC, 2021-10-31.
        let date = TransitionDate {
            day: TransitionDay::Mwd(10, 5, 0),
            time: Seconds(3_600),
        };
        assert_eq!(
            transition_seconds_for_year(2021, &date, 0),
            local_seconds(2021, 10, 31, 1, 0)
        );

        // `J60` is March 1 in both leap and common years.
        let date = TransitionDate {
            day: TransitionDay::NoLeap(60),
            time: Seconds(0),
        };
        assert_eq!(transition_seconds_for_year(2020, &date, 0), local_seconds(2020, 3, 1, 0, 0));
        assert_eq!(transition_seconds_for_year(2021, &date, 0), local_seconds(2021, 3, 1, 0, 0));
    }

    #[test]
    fn historic_offsets() {
        let provider = TzdbProvider::default();
        // Before standard time was adopted New York used local mean time.
        let lmt = provider
            .offset_at("America/New_York", local_seconds(1850, 1, 1, 0, 0))
            .unwrap();
        assert_eq!(lmt.offset_seconds, -17_762);
        assert_eq!(
            provider.offset_at("Europe/Berlin", local_seconds(2017, 7, 1, 0, 0)),
            Ok(LocalTimeRecord::daylight(7_200))
        );
    }

    #[test]
    fn canonical_identifiers() {
        let provider = TzdbProvider::default();
        assert_eq!(
            provider.canonicalize_identifier("america/new_york").unwrap(),
            "America/New_York"
        );
        let err = provider.canonicalize_identifier("Mars/Olympus_Mons").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::TimeZone);
    }
}
