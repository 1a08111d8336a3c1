//! Configuration for literal parsing.

use core::{fmt, str::FromStr};

/// Dialect options consulted while parsing literals.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ParseOptions {
    /// Accepts a `-` between the date and the time of a timestamp, as in
    /// `2020-01-01-10.30.00`.
    pub dash_date_time_separator: bool,
}

impl ParseOptions {
    /// Only the standard separators are accepted.
    pub const STANDARD: Self = Self {
        dash_date_time_separator: false,
    };

    #[must_use]
    pub const fn with_dash_date_time_separator(mut self, enabled: bool) -> Self {
        self.dash_date_time_separator = enabled;
        self
    }
}

/// The kind of literal being parsed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LiteralKind {
    Date,
    Time,
    Timestamp,
    TimestampWithTimeZone,
}

/// A parsing error for `LiteralKind`
#[derive(Debug, Clone, Copy)]
pub struct ParseLiteralKindError;

impl fmt::Display for ParseLiteralKindError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("provided string was not a valid LiteralKind")
    }
}

impl FromStr for LiteralKind {
    type Err = ParseLiteralKindError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "DATE" => Ok(Self::Date),
            "TIME" => Ok(Self::Time),
            "TIMESTAMP" => Ok(Self::Timestamp),
            "TIMESTAMP WITH TIME ZONE" => Ok(Self::TimestampWithTimeZone),
            _ => Err(ParseLiteralKindError),
        }
    }
}

impl fmt::Display for LiteralKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Date => "DATE",
            Self::Time => "TIME",
            Self::Timestamp => "TIMESTAMP",
            Self::TimestampWithTimeZone => "TIMESTAMP WITH TIME ZONE",
        }
        .fmt(f)
    }
}
