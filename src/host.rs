//! Trait definitions for accessing values from the host environment.
//!
//! The host decides which zone is the default zone of a
//! [`CalendarContext`](crate::bridge::CalendarContext) and the reference
//! instant its standard offset is measured at.

use crate::{provider::TimeZoneProvider, tz::TimeZone, TemporalResult};

/// The `HostClock` trait defines an accessor to the host's clock.
pub trait HostClock {
    /// Returns the current instant in milliseconds since the epoch.
    fn get_host_epoch_milliseconds(&self) -> TemporalResult<i64>;
}

/// The `HostTimeZone` trait defines the host's time zone.
pub trait HostTimeZone {
    fn get_host_time_zone(&self, provider: &impl TimeZoneProvider) -> TemporalResult<TimeZone>;
}

/// `HostHooks` marks whether a trait implements the required host hooks with some
/// system methods.
pub trait HostHooks: HostClock + HostTimeZone {
    fn get_system_epoch_milliseconds(&self) -> TemporalResult<i64> {
        self.get_host_epoch_milliseconds()
    }

    fn get_system_time_zone(&self, provider: &impl TimeZoneProvider) -> TemporalResult<TimeZone> {
        self.get_host_time_zone(provider)
    }
}

// Implement empty providers

impl HostClock for () {
    fn get_host_epoch_milliseconds(&self) -> TemporalResult<i64> {
        Ok(0)
    }
}

impl HostTimeZone for () {
    fn get_host_time_zone(&self, _: &impl TimeZoneProvider) -> TemporalResult<TimeZone> {
        Ok(TimeZone::Utc)
    }
}

impl HostHooks for () {}

/// A fixed host, mostly useful for tests and embedding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FixedHost {
    pub epoch_milliseconds: i64,
    pub time_zone: TimeZone,
}

impl HostClock for FixedHost {
    fn get_host_epoch_milliseconds(&self) -> TemporalResult<i64> {
        Ok(self.epoch_milliseconds)
    }
}

impl HostTimeZone for FixedHost {
    fn get_host_time_zone(&self, _: &impl TimeZoneProvider) -> TemporalResult<TimeZone> {
        Ok(self.time_zone.clone())
    }
}

impl HostHooks for FixedHost {}
