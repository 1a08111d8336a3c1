//! The seam for locale dependent pattern formatting and parsing.
//!
//! The crate does not ship a pattern engine. Callers provide one through
//! [`PatternFormatter`] and describe each call with a validated
//! [`PatternRequest`].

use alloc::string::String;

use icu_locale::Locale;

use crate::{provider::TimeZoneProvider, tz::TimeZone, TemporalError, TemporalResult};

/// A pattern together with the locale and zone it is applied with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PatternRequest {
    pattern: String,
    locale: Option<Locale>,
    time_zone: Option<TimeZone>,
}

impl PatternRequest {
    /// Validates a locale identifier and resolves a zone identifier or
    /// offset for `pattern`.
    ///
    /// Failures are reported as `pattern/locale/timeZone`.
    pub fn try_new(
        pattern: &str,
        locale: Option<&str>,
        time_zone: Option<&str>,
        provider: &impl TimeZoneProvider,
    ) -> TemporalResult<Self> {
        let rejected = || {
            TemporalError::syntax().with_message(alloc::format!(
                "{pattern}/{}/{}",
                locale.unwrap_or_default(),
                time_zone.unwrap_or_default()
            ))
        };
        let locale = locale
            .map(|locale| locale.parse::<Locale>())
            .transpose()
            .map_err(|_| rejected())?;
        let time_zone = time_zone
            .map(|zone| match zone {
                "UTC" | "Z" => Ok(TimeZone::Utc),
                _ if zone.starts_with(['+', '-']) => TimeZone::try_from_offset(zone),
                _ => TimeZone::try_from_identifier(zone, provider),
            })
            .transpose()
            .map_err(|_| rejected())?;
        Ok(Self {
            pattern: String::from(pattern),
            locale,
            time_zone,
        })
    }

    #[inline]
    #[must_use]
    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    /// The locale, or `None` for the formatter's default.
    #[inline]
    #[must_use]
    pub fn locale(&self) -> Option<&Locale> {
        self.locale.as_ref()
    }

    /// The zone, or `None` for the formatter's default.
    #[inline]
    #[must_use]
    pub fn time_zone(&self) -> Option<&TimeZone> {
        self.time_zone.as_ref()
    }
}

/// A pattern engine supplied by the embedding application.
pub trait PatternFormatter {
    /// Formats an instant in milliseconds since the epoch.
    fn format(&self, epoch_millis: i64, request: &PatternRequest) -> TemporalResult<String>;

    /// Parses `text` into an instant in milliseconds since the epoch.
    fn parse(&self, text: &str, request: &PatternRequest) -> TemporalResult<i64>;
}

/// Formats `epoch_millis` with `formatter`.
pub fn format_date_time(
    formatter: &impl PatternFormatter,
    epoch_millis: i64,
    request: &PatternRequest,
) -> TemporalResult<String> {
    formatter.format(epoch_millis, request)
}

/// Parses `text` with `formatter`. Any failure is reported as a malformed
/// literal carrying `text`.
pub fn parse_date_time(
    formatter: &impl PatternFormatter,
    text: &str,
    request: &PatternRequest,
) -> TemporalResult<i64> {
    formatter.parse(text, request).map_err(|_err| {
        #[cfg(feature = "log")]
        log::debug!("pattern {} rejected {text}: {_err}", request.pattern());
        TemporalError::syntax().with_message(String::from(text))
    })
}
