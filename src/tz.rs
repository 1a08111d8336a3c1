//! The `TimeZone` model: UTC, fixed offsets and provider backed named zones.

use alloc::{borrow::Cow, string::String};
use core::{fmt, str::FromStr};

use writeable::{impl_display_with_writeable, LengthHint, Writeable};

use crate::{
    provider::{CandidateOffsets, LocalTimeRecord, TimeZoneProvider},
    TemporalError, TemporalResult,
};

/// Offsets are limited to less than a day in either direction.
const MAX_OFFSET_MINUTES: i32 = 24 * 60 - 1;

/// A fixed UTC offset in minutes east of UTC.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct UtcOffset(i32);

impl UtcOffset {
    pub const UTC: Self = Self(0);

    pub fn from_minutes(minutes: i32) -> TemporalResult<Self> {
        if !(-MAX_OFFSET_MINUTES..=MAX_OFFSET_MINUTES).contains(&minutes) {
            return Err(TemporalError::time_zone()
                .with_message(alloc::format!("Offset of {minutes} minutes is out of range.")));
        }
        Ok(Self(minutes))
    }

    #[inline]
    #[must_use]
    pub const fn minutes(self) -> i32 {
        self.0
    }

    #[inline]
    #[must_use]
    pub const fn seconds(self) -> i32 {
        self.0 * 60
    }
}

/// A parsing error for `UtcOffset`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParseUtcOffsetError;

impl fmt::Display for ParseUtcOffsetError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("provided string was not a valid UTC offset")
    }
}

impl FromStr for UtcOffset {
    type Err = ParseUtcOffsetError;

    /// Parses `±H`, `±HH`, `±H:MM`, `±HH:MM` or `±HHMM`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let bytes = s.as_bytes();
        let sign = match bytes.first() {
            Some(b'+') => 1,
            Some(b'-') => -1,
            _ => return Err(ParseUtcOffsetError),
        };
        let (hours, minutes) = offset_fields(&bytes[1..]).ok_or(ParseUtcOffsetError)?;
        if hours > 23 || minutes > 59 {
            return Err(ParseUtcOffsetError);
        }
        Ok(Self(sign * (hours * 60 + minutes)))
    }
}

/// Canonical form: `±HH:MM`.
impl Writeable for UtcOffset {
    fn write_to<W: fmt::Write + ?Sized>(&self, sink: &mut W) -> fmt::Result {
        sink.write_char(if self.0 < 0 { '-' } else { '+' })?;
        let minutes = self.0.unsigned_abs();
        write_two_digits(minutes / 60, sink)?;
        sink.write_char(':')?;
        write_two_digits(minutes % 60, sink)
    }

    fn writeable_length_hint(&self) -> LengthHint {
        LengthHint::exact(6)
    }
}

impl_display_with_writeable!(UtcOffset);

fn write_two_digits<W: fmt::Write + ?Sized>(value: u32, sink: &mut W) -> fmt::Result {
    if value < 10 {
        sink.write_char('0')?;
    }
    value.write_to(sink)
}

/// Splits the unsigned part of an offset designator into hours and minutes.
fn offset_fields(rest: &[u8]) -> Option<(i32, i32)> {
    let digit = |b: u8| b.is_ascii_digit().then(|| i32::from(b - b'0'));
    let two = |tens: u8, ones: u8| Some(digit(tens)? * 10 + digit(ones)?);
    match *rest {
        [h] => Some((digit(h)?, 0)),
        [h1, h2] => Some((two(h1, h2)?, 0)),
        [h, b':', m1, m2] => Some((digit(h)?, two(m1, m2)?)),
        [h1, h2, b':', m1, m2] | [h1, h2, m1, m2] => Some((two(h1, h2)?, two(m1, m2)?)),
        _ => None,
    }
}

/// A time zone that local date times are interpreted in.
#[derive(Debug, Default, Clone, PartialEq, Eq, Hash)]
pub enum TimeZone {
    #[default]
    Utc,
    Offset(UtcOffset),
    /// A canonical zone identifier of the provider.
    Named(String),
}

impl TimeZone {
    /// Resolves a named zone through `provider`.
    ///
    /// The canonical identifier must start with `identifier` as written.
    pub fn try_from_identifier(
        identifier: &str,
        provider: &impl TimeZoneProvider,
    ) -> TemporalResult<Self> {
        let canonical = provider.canonicalize_identifier(identifier)?;
        if !canonical.starts_with(identifier) {
            #[cfg(feature = "log")]
            log::warn!("time zone {identifier} resolved to {canonical}");
            return Err(TemporalError::time_zone()
                .with_message(alloc::format!("{identifier} ({canonical}?)")));
        }
        Ok(Self::Named(canonical.into_owned()))
    }

    /// Resolves an offset designator such as `+05` or `-03:30`.
    ///
    /// The canonical `±HH:MM` form must start with the designator as written.
    pub fn try_from_offset(designator: &str) -> TemporalResult<Self> {
        let mismatch = || TemporalError::time_zone().with_message(String::from(designator));
        let offset = designator.parse::<UtcOffset>().map_err(|_| mismatch())?;
        let canonical = offset.write_to_string();
        if !canonical.starts_with(designator) {
            #[cfg(feature = "log")]
            log::warn!("offset {designator} resolved to {canonical}");
            return Err(mismatch());
        }
        Ok(Self::Offset(offset))
    }

    /// Returns the identifier of this zone: `UTC`, `±HH:MM` or the zone name.
    #[must_use]
    pub fn identifier(&self) -> Cow<'_, str> {
        match self {
            Self::Utc => Cow::Borrowed("UTC"),
            Self::Offset(offset) => offset.write_to_string(),
            Self::Named(name) => Cow::Borrowed(name),
        }
    }

    /// Returns the offset record in effect at `epoch_seconds`.
    pub fn offset_at(
        &self,
        provider: &impl TimeZoneProvider,
        epoch_seconds: i64,
    ) -> TemporalResult<LocalTimeRecord> {
        match self {
            Self::Utc => Ok(LocalTimeRecord::UTC),
            Self::Offset(offset) => Ok(LocalTimeRecord::standard(offset.seconds())),
            Self::Named(name) => provider.offset_at(name, epoch_seconds),
        }
    }

    /// Returns the standard offset in seconds in effect at `epoch_seconds`.
    pub fn standard_offset_at(
        &self,
        provider: &impl TimeZoneProvider,
        epoch_seconds: i64,
    ) -> TemporalResult<i32> {
        match self {
            Self::Utc => Ok(0),
            Self::Offset(offset) => Ok(offset.seconds()),
            Self::Named(name) => provider.standard_offset_at(name, epoch_seconds),
        }
    }

    /// Returns the records a wall clock time in seconds may resolve to.
    pub fn candidate_offsets(
        &self,
        provider: &impl TimeZoneProvider,
        local_seconds: i64,
    ) -> TemporalResult<CandidateOffsets> {
        match self {
            Self::Utc => Ok(CandidateOffsets::One(LocalTimeRecord::UTC)),
            Self::Offset(offset) => Ok(CandidateOffsets::One(LocalTimeRecord::standard(
                offset.seconds(),
            ))),
            Self::Named(name) => provider.candidate_offsets(name, local_seconds),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{provider::tests::SingleRuleProvider, ErrorKind};

    #[test]
    fn offset_forms() {
        assert_eq!("+5".parse::<UtcOffset>(), Ok(UtcOffset(300)));
        assert_eq!("-05".parse::<UtcOffset>(), Ok(UtcOffset(-300)));
        assert_eq!("+5:30".parse::<UtcOffset>(), Ok(UtcOffset(330)));
        assert_eq!("+05:30".parse::<UtcOffset>(), Ok(UtcOffset(330)));
        assert_eq!("-0930".parse::<UtcOffset>(), Ok(UtcOffset(-570)));
        assert!("05:00".parse::<UtcOffset>().is_err());
        assert!("+24".parse::<UtcOffset>().is_err());
        assert!("+05:60".parse::<UtcOffset>().is_err());
        assert!("+05:0".parse::<UtcOffset>().is_err());
        assert!("+".parse::<UtcOffset>().is_err());
        assert!("+:".parse::<UtcOffset>().is_err());
    }

    #[test]
    fn canonical_offset() {
        assert_eq!(UtcOffset(0).to_string(), "+00:00");
        assert_eq!(UtcOffset(-570).to_string(), "-09:30");
        assert_eq!(UtcOffset(60).to_string(), "+01:00");
    }

    #[test]
    fn offset_designator_must_prefix_canonical_form() {
        assert_eq!(
            TimeZone::try_from_offset("+01"),
            Ok(TimeZone::Offset(UtcOffset(60)))
        );
        assert_eq!(
            TimeZone::try_from_offset("-03:30"),
            Ok(TimeZone::Offset(UtcOffset(-210)))
        );
        for designator in ["+1", "+0100", "+1:00", "+01:00:00", "+xx"] {
            let err = TimeZone::try_from_offset(designator).unwrap_err();
            assert_eq!(err.kind(), ErrorKind::TimeZone, "{designator}");
        }
    }

    #[test]
    fn named_zone_must_prefix_canonical_name() {
        let provider = SingleRuleProvider::new_york_2017();
        assert_eq!(
            TimeZone::try_from_identifier("Test/Single", &provider),
            Ok(TimeZone::Named("Test/Single".into()))
        );
        let err = TimeZone::try_from_identifier("test/single", &provider).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::TimeZone);
        assert!(TimeZone::try_from_identifier("Mars/Olympus", &provider).is_err());
    }

    #[test]
    fn identifiers() {
        assert_eq!(TimeZone::Utc.identifier(), "UTC");
        assert_eq!(TimeZone::Offset(UtcOffset(-300)).identifier(), "-05:00");
        assert_eq!(TimeZone::Named("Asia/Tokyo".into()).identifier(), "Asia/Tokyo");
    }
}
