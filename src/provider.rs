//! The `TimeZoneProvider` trait.

use alloc::borrow::Cow;

use crate::{TemporalError, TemporalResult};

/// Seconds searched on each side of a local time for a transition.
const TRANSITION_SEARCH_SECONDS: i64 = 86_400;

/// `LocalTimeRecord` represents a local time offset record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LocalTimeRecord {
    /// The UTC offset in seconds.
    pub offset_seconds: i32,
    /// Whether the record is daylight saving time.
    pub is_dst: bool,
}

impl LocalTimeRecord {
    pub const UTC: Self = Self::standard(0);

    #[inline]
    #[must_use]
    pub const fn standard(offset_seconds: i32) -> Self {
        Self {
            offset_seconds,
            is_dst: false,
        }
    }

    #[inline]
    #[must_use]
    pub const fn daylight(offset_seconds: i32) -> Self {
        Self {
            offset_seconds,
            is_dst: true,
        }
    }
}

/// The offsets a local wall clock time may resolve to in a zone.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CandidateOffsets {
    /// The local time was skipped by a transition.
    Gap {
        before: LocalTimeRecord,
        after: LocalTimeRecord,
    },
    /// The local time maps to exactly one instant.
    One(LocalTimeRecord),
    /// The local time was repeated by a transition. The record of the earlier
    /// instant comes first.
    Two(LocalTimeRecord, LocalTimeRecord),
}

/// The `TimeZoneProvider` trait provides the time zone data that resolving
/// named zones requires.
pub trait TimeZoneProvider {
    /// Returns the canonical spelling of `identifier`.
    fn canonicalize_identifier(&self, identifier: &str) -> TemporalResult<Cow<'_, str>>;

    /// Returns the offset record in effect at `epoch_seconds`.
    fn offset_at(&self, identifier: &str, epoch_seconds: i64) -> TemporalResult<LocalTimeRecord>;

    /// Returns the standard (non daylight saving) offset in effect at
    /// `epoch_seconds`.
    fn standard_offset_at(&self, identifier: &str, epoch_seconds: i64) -> TemporalResult<i32>;

    /// Returns the records that `local_seconds`, a wall clock time counted in
    /// seconds from 1970-01-01T00:00, may resolve to.
    ///
    /// The default implementation probes the offsets in effect one day before
    /// and after the local time, which assumes transitions are at least two
    /// days apart.
    fn candidate_offsets(
        &self,
        identifier: &str,
        local_seconds: i64,
    ) -> TemporalResult<CandidateOffsets> {
        let before = self.offset_at(identifier, local_seconds - TRANSITION_SEARCH_SECONDS)?;
        let after = self.offset_at(identifier, local_seconds + TRANSITION_SEARCH_SECONDS)?;

        let mut matches = [None, None];
        let mut count = 0;
        for candidate in [before, after] {
            if count > 0 && matches[0] == Some(candidate) {
                continue;
            }
            let instant = local_seconds - i64::from(candidate.offset_seconds);
            if self.offset_at(identifier, instant)?.offset_seconds == candidate.offset_seconds {
                matches[count] = Some(candidate);
                count += 1;
            }
        }

        Ok(match matches {
            [Some(first), Some(second)] => {
                // A larger offset maps the same wall clock time to an earlier instant.
                if first.offset_seconds >= second.offset_seconds {
                    CandidateOffsets::Two(first, second)
                } else {
                    CandidateOffsets::Two(second, first)
                }
            }
            [Some(only), None] | [None, Some(only)] => CandidateOffsets::One(only),
            [None, None] => CandidateOffsets::Gap { before, after },
        })
    }
}

/// A provider without any zone data. Every named zone fails to resolve.
#[derive(Debug, Default, Clone, Copy)]
pub struct NeverProvider;

impl TimeZoneProvider for NeverProvider {
    fn canonicalize_identifier(&self, identifier: &str) -> TemporalResult<Cow<'_, str>> {
        Err(TemporalError::time_zone().with_message(alloc::format!(
            "No time zone data available for {identifier}."
        )))
    }

    fn offset_at(&self, identifier: &str, _: i64) -> TemporalResult<LocalTimeRecord> {
        Err(TemporalError::time_zone().with_message(alloc::format!(
            "No time zone data available for {identifier}."
        )))
    }

    fn standard_offset_at(&self, identifier: &str, _: i64) -> TemporalResult<i32> {
        Err(TemporalError::time_zone().with_message(alloc::format!(
            "No time zone data available for {identifier}."
        )))
    }
}
