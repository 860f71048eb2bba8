//! Display zone for date-time formatting
//!
//! Danish wall-clock time is CET (UTC+1) with EU summer time (UTC+2) from
//! the last Sunday of March 01:00 UTC until the last Sunday of October
//! 01:00 UTC.

use chrono::{
    DateTime, Datelike, Duration, FixedOffset, NaiveDate, NaiveDateTime, Offset, TimeZone, Utc,
};
use std::fmt;
use std::str::FromStr;

use super::FormatError;

const HOUR: i32 = 3600;

/// Zone in which date-times are rendered
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DisplayZone {
    /// Europe/Copenhagen (CET/CEST)
    #[default]
    Copenhagen,
    /// Coordinated Universal Time
    Utc,
    /// A fixed offset from UTC
    Fixed(FixedOffset),
}

impl DisplayZone {
    /// UTC offset in effect at the given instant
    pub fn offset_at(&self, instant: DateTime<Utc>) -> FixedOffset {
        match self {
            DisplayZone::Copenhagen => {
                let secs = if is_summer_time(instant) { 2 * HOUR } else { HOUR };
                fixed(secs)
            }
            DisplayZone::Utc => fixed(0),
            DisplayZone::Fixed(offset) => *offset,
        }
    }

    /// Wall-clock time of an instant in this zone
    pub fn to_local(&self, instant: DateTime<Utc>) -> NaiveDateTime {
        instant.with_timezone(&self.offset_at(instant)).naive_local()
    }

    /// Instant for a wall-clock time in this zone
    ///
    /// Ambiguous times at the end of summer resolve to the earlier instant;
    /// times skipped at the start of summer resolve forward by an hour.
    pub fn from_local(&self, local: NaiveDateTime) -> DateTime<Utc> {
        match self {
            DisplayZone::Copenhagen => {
                let summer = Utc.from_utc_datetime(&(local - Duration::hours(2)));
                if is_summer_time(summer) {
                    summer
                } else {
                    Utc.from_utc_datetime(&(local - Duration::hours(1)))
                }
            }
            DisplayZone::Utc => Utc.from_utc_datetime(&local),
            DisplayZone::Fixed(offset) => {
                let secs = i64::from(offset.local_minus_utc());
                Utc.from_utc_datetime(&(local - Duration::seconds(secs)))
            }
        }
    }
}

impl fmt::Display for DisplayZone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DisplayZone::Copenhagen => write!(f, "Europe/Copenhagen"),
            DisplayZone::Utc => write!(f, "UTC"),
            DisplayZone::Fixed(offset) => write!(f, "{}", offset),
        }
    }
}

impl FromStr for DisplayZone {
    type Err = FormatError;

    /// Accepts `Europe/Copenhagen`, `UTC`/`Z`, or an offset like `+01:00`
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        match trimmed.to_ascii_lowercase().as_str() {
            "europe/copenhagen" | "copenhagen" | "cet" => return Ok(DisplayZone::Copenhagen),
            "utc" | "z" | "gmt" => return Ok(DisplayZone::Utc),
            _ => {}
        }

        parse_offset(trimmed)
            .map(DisplayZone::Fixed)
            .ok_or_else(|| FormatError::InvalidTimezone(s.to_string()))
    }
}

fn fixed(secs: i32) -> FixedOffset {
    // Offsets used here are all well inside the +-24h range.
    FixedOffset::east_opt(secs).unwrap_or_else(|| Utc.fix())
}

/// Parse `+HH:MM`, `-HH:MM`, `+HHMM` or `+HH`
fn parse_offset(s: &str) -> Option<FixedOffset> {
    let (sign, rest) = match s.as_bytes().first()? {
        b'+' => (1, &s[1..]),
        b'-' => (-1, &s[1..]),
        _ => return None,
    };
    if !rest.is_ascii() {
        return None;
    }

    let (hours, minutes) = match rest.split_once(':') {
        Some((h, m)) => (h, m),
        None if rest.len() == 4 => rest.split_at(2),
        None => (rest, "0"),
    };

    if hours.is_empty() || !hours.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    let hours: i32 = hours.parse().ok()?;
    let minutes: i32 = minutes.parse().ok()?;
    if hours > 23 || minutes > 59 {
        return None;
    }

    FixedOffset::east_opt(sign * (hours * HOUR + minutes * 60))
}

fn last_sunday(year: i32, month: u32) -> Option<NaiveDate> {
    let last_day = NaiveDate::from_ymd_opt(year, month + 1, 1)?.pred_opt()?;
    let back = i64::from(last_day.weekday().num_days_from_sunday());
    Some(last_day - Duration::days(back))
}

fn is_summer_time(instant: DateTime<Utc>) -> bool {
    let year = instant.year();
    let bounds = last_sunday(year, 3)
        .and_then(|d| d.and_hms_opt(1, 0, 0))
        .zip(last_sunday(year, 10).and_then(|d| d.and_hms_opt(1, 0, 0)));

    match bounds {
        Some((start, end)) => {
            let now = instant.naive_utc();
            now >= start && now < end
        }
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn utc(s: &str) -> DateTime<Utc> {
        DateTime::parse_from_rfc3339(s).unwrap().with_timezone(&Utc)
    }

    fn naive(s: &str) -> NaiveDateTime {
        NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S").unwrap()
    }

    #[test]
    fn test_last_sunday() {
        assert_eq!(last_sunday(2024, 3), NaiveDate::from_ymd_opt(2024, 3, 31));
        assert_eq!(last_sunday(2024, 10), NaiveDate::from_ymd_opt(2024, 10, 27));
        assert_eq!(last_sunday(2025, 3), NaiveDate::from_ymd_opt(2025, 3, 30));
    }

    #[test]
    fn test_copenhagen_offsets() {
        let zone = DisplayZone::Copenhagen;
        assert_eq!(zone.offset_at(utc("2024-01-15T09:05:00Z")).local_minus_utc(), 3600);
        assert_eq!(zone.offset_at(utc("2024-07-01T12:00:00Z")).local_minus_utc(), 7200);

        // Summer time starts 2024-03-31 01:00 UTC
        assert_eq!(zone.offset_at(utc("2024-03-31T00:59:59Z")).local_minus_utc(), 3600);
        assert_eq!(zone.offset_at(utc("2024-03-31T01:00:00Z")).local_minus_utc(), 7200);

        // and ends 2024-10-27 01:00 UTC
        assert_eq!(zone.offset_at(utc("2024-10-27T00:59:59Z")).local_minus_utc(), 7200);
        assert_eq!(zone.offset_at(utc("2024-10-27T01:00:00Z")).local_minus_utc(), 3600);
    }

    #[test]
    fn test_from_local_round_trips_outside_transitions() {
        let zone = DisplayZone::Copenhagen;
        let local = naive("2024-07-01T14:00:00");
        assert_eq!(zone.from_local(local), utc("2024-07-01T12:00:00Z"));
        assert_eq!(zone.to_local(zone.from_local(local)), local);
    }

    #[test]
    fn test_from_local_transitions() {
        let zone = DisplayZone::Copenhagen;

        // 02:30 does not exist on 2024-03-31
        let skipped = zone.from_local(naive("2024-03-31T02:30:00"));
        assert_eq!(zone.to_local(skipped), naive("2024-03-31T03:30:00"));

        // 02:30 happens twice on 2024-10-27; the first one wins
        let ambiguous = zone.from_local(naive("2024-10-27T02:30:00"));
        assert_eq!(ambiguous, utc("2024-10-27T00:30:00Z"));
    }

    #[test]
    fn test_parse_zone() {
        assert_eq!("Europe/Copenhagen".parse::<DisplayZone>().unwrap(), DisplayZone::Copenhagen);
        assert_eq!("utc".parse::<DisplayZone>().unwrap(), DisplayZone::Utc);

        let zone: DisplayZone = "+05:30".parse().unwrap();
        assert_eq!(zone, DisplayZone::Fixed(FixedOffset::east_opt(5 * 3600 + 1800).unwrap()));

        let zone: DisplayZone = "-0300".parse().unwrap();
        assert_eq!(zone, DisplayZone::Fixed(FixedOffset::west_opt(3 * 3600).unwrap()));

        assert!(matches!(
            "Mars/Olympus".parse::<DisplayZone>(),
            Err(FormatError::InvalidTimezone(_))
        ));
        assert!("+25:00".parse::<DisplayZone>().is_err());
    }

    #[test]
    fn test_parse_zone_rejects_non_ascii_offset() {
        for input in ["+€1", "-1€", "+é:00", "+１２３４"] {
            assert!(matches!(
                input.parse::<DisplayZone>(),
                Err(FormatError::InvalidTimezone(text)) if text == input
            ));
        }
    }

    #[test]
    fn test_zone_display() {
        assert_eq!(DisplayZone::Copenhagen.to_string(), "Europe/Copenhagen");
        assert_eq!(DisplayZone::Utc.to_string(), "UTC");
    }
}
