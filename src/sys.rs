use web_time::{SystemTime, UNIX_EPOCH};

use crate::host::{HostClock, HostHooks, HostTimeZone};
use crate::provider::TimeZoneProvider;
use crate::tz::TimeZone;
use crate::{TemporalError, TemporalResult};

/// A UTC host system implementation that reads the current time from the
/// system clock and always reports UTC as its zone.
///
/// This implementation is backed by [`std::time::SystemTime`].
#[derive(Debug, Default, Clone, Copy)]
pub struct UtcHostSystem;

impl HostHooks for UtcHostSystem {}

impl HostClock for UtcHostSystem {
    fn get_host_epoch_milliseconds(&self) -> TemporalResult<i64> {
        get_system_milliseconds()
    }
}

impl HostTimeZone for UtcHostSystem {
    fn get_host_time_zone(&self, _: &impl TimeZoneProvider) -> TemporalResult<TimeZone> {
        Ok(TimeZone::Utc)
    }
}

/// A local host system implementation that reports the system time zone.
///
/// This implementation is backed by [`std::time::SystemTime`] and [`iana_time_zone`].
#[derive(Debug, Default, Clone, Copy)]
pub struct LocalHostSystem;

impl HostHooks for LocalHostSystem {}

impl HostClock for LocalHostSystem {
    fn get_host_epoch_milliseconds(&self) -> TemporalResult<i64> {
        get_system_milliseconds()
    }
}

impl HostTimeZone for LocalHostSystem {
    fn get_host_time_zone(&self, provider: &impl TimeZoneProvider) -> TemporalResult<TimeZone> {
        get_system_timezone(provider)
    }
}

#[inline]
pub(crate) fn get_system_timezone(provider: &impl TimeZoneProvider) -> TemporalResult<TimeZone> {
    let identifier = iana_time_zone::get_timezone()
        .map_err(|_| TemporalError::general("Error fetching system time zone"))?;
    TimeZone::try_from_identifier(&identifier, provider)
}

/// Returns the system time in milliseconds.
pub(crate) fn get_system_milliseconds() -> TemporalResult<i64> {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_err(|_| TemporalError::general("Error fetching system time"))
        .map(|d| d.as_millis() as i64)
}
