//! This module implements `TemporalError`.

use alloc::borrow::Cow;
use core::fmt;

/// A calendar field that a strict calendar computation may reject.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CalendarField {
    Month,
    DayOfMonth,
    HourOfDay,
    Minute,
    Second,
    Millisecond,
}

impl fmt::Display for CalendarField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Month => "MONTH",
            Self::DayOfMonth => "DAY_OF_MONTH",
            Self::HourOfDay => "HOUR_OF_DAY",
            Self::Minute => "MINUTE",
            Self::Second => "SECOND",
            Self::Millisecond => "MILLISECOND",
        }
        .fmt(f)
    }
}

/// `TemporalError`'s error type.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Error for a collaborator failure.
    #[default]
    Generic,
    /// Error for a malformed literal.
    Syntax,
    /// Error for year, month and day fields that do not name a calendar day.
    InvalidDate,
    /// Error for a time zone that could not be resolved or resolved to
    /// a different zone than requested.
    TimeZone,
    /// Error for a field rejected by a strict calendar computation.
    FieldOverflow(CalendarField),
    /// Error for an internal invariant violation.
    Assert,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Generic => "Error",
            Self::Syntax => "SyntaxError",
            Self::InvalidDate => "InvalidDateError",
            Self::TimeZone => "TimeZoneError",
            Self::FieldOverflow(_) => "FieldOverflowError",
            Self::Assert => "ImplementationError",
        }
        .fmt(f)
    }
}

/// The error type for `dbtemporal`.
#[derive(Debug, Clone, PartialEq)]
pub struct TemporalError {
    kind: ErrorKind,
    msg: Cow<'static, str>,
}

impl TemporalError {
    fn new(kind: ErrorKind) -> Self {
        Self {
            kind,
            msg: Cow::Borrowed(""),
        }
    }

    /// Create a generic error
    #[must_use]
    pub fn general<S>(msg: S) -> Self
    where
        S: Into<Cow<'static, str>>,
    {
        Self::new(ErrorKind::Generic).with_message(msg)
    }

    /// Create a syntax error for a malformed literal.
    #[must_use]
    pub fn syntax() -> Self {
        Self::new(ErrorKind::Syntax)
    }

    /// Create an invalid calendar date error.
    #[must_use]
    pub fn invalid_date() -> Self {
        Self::new(ErrorKind::InvalidDate)
    }

    /// Create a time zone resolution error.
    #[must_use]
    pub fn time_zone() -> Self {
        Self::new(ErrorKind::TimeZone)
    }

    /// Create a field overflow error for `field`.
    #[must_use]
    pub fn field_overflow(field: CalendarField) -> Self {
        Self::new(ErrorKind::FieldOverflow(field))
    }

    /// Create an assertion error.
    #[must_use]
    pub fn assert() -> Self {
        Self::new(ErrorKind::Assert).with_message("Implementation error: an assertion failed.")
    }

    /// Add a message to the error.
    #[must_use]
    pub fn with_message<S>(mut self, msg: S) -> Self
    where
        S: Into<Cow<'static, str>>,
    {
        self.msg = msg.into();
        self
    }

    /// Returns this error's kind.
    #[inline]
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    /// Returns the error message.
    #[inline]
    #[must_use]
    pub fn message(&self) -> &str {
        &self.msg
    }

    /// Extracts the error message.
    #[inline]
    #[must_use]
    pub fn into_message(self) -> Cow<'static, str> {
        self.msg
    }

    /// Returns the rejected field if this is a field overflow error.
    #[inline]
    #[must_use]
    pub fn overflow_field(&self) -> Option<CalendarField> {
        match self.kind {
            ErrorKind::FieldOverflow(field) => Some(field),
            _ => None,
        }
    }
}

impl fmt::Display for TemporalError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.kind)?;
        if let ErrorKind::FieldOverflow(field) = self.kind {
            write!(f, " [{field}]")?;
        }

        let msg = self.msg.trim();
        if !msg.is_empty() {
            write!(f, ": {msg}")?;
        }

        Ok(())
    }
}

#[cfg(feature = "std")]
impl std::error::Error for TemporalError {}
