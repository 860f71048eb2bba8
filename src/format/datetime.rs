//! Danish date-time formatting

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, TimeZone, Utc};

use super::{DisplayZone, FormatError};

/// Danish numeric date plus hour and minute, e.g. `15.01.2024, 10.05`
///
/// Matches CLDR 42+ `da` medium date-time glue, which puts a comma after
/// the date.
pub const DATE_TIME_PATTERN: &str = "%d.%m.%Y, %H.%M";

/// Naive formats tried in order, all interpreted as display-zone wall time
const LOCAL_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M",
];

/// Anything `format_date_time` accepts
#[derive(Debug, Clone, PartialEq)]
pub enum DateTimeInput {
    /// An absolute instant
    Instant(DateTime<Utc>),
    /// Wall-clock time already in the display zone
    Local(NaiveDateTime),
    /// Text to be parsed (RFC 3339, ISO local date-time, or ISO date)
    Text(String),
}

impl From<DateTime<Utc>> for DateTimeInput {
    fn from(value: DateTime<Utc>) -> Self {
        DateTimeInput::Instant(value)
    }
}

impl From<DateTime<FixedOffset>> for DateTimeInput {
    fn from(value: DateTime<FixedOffset>) -> Self {
        DateTimeInput::Instant(value.with_timezone(&Utc))
    }
}

impl From<NaiveDateTime> for DateTimeInput {
    fn from(value: NaiveDateTime) -> Self {
        DateTimeInput::Local(value)
    }
}

impl From<&str> for DateTimeInput {
    fn from(value: &str) -> Self {
        DateTimeInput::Text(value.to_string())
    }
}

impl From<String> for DateTimeInput {
    fn from(value: String) -> Self {
        DateTimeInput::Text(value)
    }
}

impl From<&String> for DateTimeInput {
    fn from(value: &String) -> Self {
        DateTimeInput::Text(value.clone())
    }
}

/// Formats date-times in a chosen display zone
#[derive(Debug, Clone, Copy, Default)]
pub struct DateTimeFormatter {
    zone: DisplayZone,
}

impl DateTimeFormatter {
    pub fn new(zone: DisplayZone) -> Self {
        Self { zone }
    }

    pub fn zone(&self) -> DisplayZone {
        self.zone
    }

    /// Format as `DD.MM.YYYY, HH.MM` in this formatter's zone
    ///
    /// Strings with an offset (`2024-01-15T09:05:00Z`) are converted into the
    /// zone. Strings without one (`2024-01-15T09:05:00`) are taken as wall
    /// time in the zone; a wall time skipped by the start of summer time
    /// moves forward an hour. A bare date (`2024-01-15`) means midnight UTC.
    pub fn format(&self, input: impl Into<DateTimeInput>) -> Result<String, FormatError> {
        let local = self.resolve(input.into())?;
        Ok(local.format(DATE_TIME_PATTERN).to_string())
    }

    fn resolve(&self, input: DateTimeInput) -> Result<NaiveDateTime, FormatError> {
        match input {
            DateTimeInput::Instant(instant) => Ok(self.zone.to_local(instant)),
            DateTimeInput::Local(local) => Ok(self.zone.to_local(self.zone.from_local(local))),
            DateTimeInput::Text(text) => parse_text(&text).and_then(|parsed| self.resolve(parsed)),
        }
    }
}

fn parse_text(text: &str) -> Result<DateTimeInput, FormatError> {
    let trimmed = text.trim();

    if let Ok(instant) = DateTime::parse_from_rfc3339(trimmed) {
        return Ok(instant.into());
    }

    for format in LOCAL_FORMATS {
        if let Ok(local) = NaiveDateTime::parse_from_str(trimmed, format) {
            return Ok(DateTimeInput::Local(local));
        }
    }

    if let Ok(date) = NaiveDate::parse_from_str(trimmed, "%Y-%m-%d") {
        if let Some(midnight) = date.and_hms_opt(0, 0, 0) {
            return Ok(DateTimeInput::Instant(Utc.from_utc_datetime(&midnight)));
        }
    }

    Err(FormatError::InvalidDateTime(text.to_string()))
}
