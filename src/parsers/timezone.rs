//! Detection of the zone designator that may trail a timestamp's time part.

use crate::{provider::TimeZoneProvider, tz::TimeZone, TemporalResult};

/// A zone designator as written after the time of a timestamp literal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ZoneDesignator<'a> {
    /// A trailing `Z`.
    Utc,
    /// `[+-]HH[:MM]` directly after the time.
    Offset(&'a str),
    /// A zone name separated from the time by a space.
    Named(&'a str),
}

impl ZoneDesignator<'_> {
    pub(crate) fn resolve(self, provider: &impl TimeZoneProvider) -> TemporalResult<TimeZone> {
        match self {
            Self::Utc => Ok(TimeZone::Utc),
            Self::Offset(designator) => TimeZone::try_from_offset(designator),
            Self::Named(name) => TimeZone::try_from_identifier(name, provider),
        }
    }
}

/// Splits the text following the date into the time and its zone designator.
///
/// A trailing `Z` wins over an offset, and an offset wins over a named zone.
/// Offset signs are only searched for before the first space, so names such
/// as `America/Port-au-Prince` are not mistaken for offsets.
pub(crate) fn split_zone(rest: &str) -> (&str, Option<ZoneDesignator<'_>>) {
    if let Some(time) = rest.strip_suffix('Z') {
        return (time, Some(ZoneDesignator::Utc));
    }
    let space = rest.find(' ');
    let head = &rest[..space.unwrap_or(rest.len())];
    if let Some(sign) = head.find('+').or_else(|| head.find('-')) {
        return (&rest[..sign], Some(ZoneDesignator::Offset(&rest[sign..])));
    }
    match space {
        Some(space) => (&rest[..space], Some(ZoneDesignator::Named(&rest[space + 1..]))),
        None => (rest, None),
    }
}
