//! Time zone resolution for sessions.
use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

use chrono::FixedOffset;
use chrono_tz::Tz;
use regex::Regex;

use crate::errors::{Result, SessionError};

/// Largest offset from UTC accepted for fixed offset zones.
const MAX_OFFSET_SECONDS: i32 = 14 * 3600;

/// Zone ids that are just different spellings of UTC.
const UTC_EQUIVALENTS: &[&str] = &[
    "z",
    "ut",
    "uct",
    "utc",
    "gmt",
    "gmt0",
    "greenwich",
    "universal",
    "zulu",
    "etc/uct",
    "etc/utc",
    "etc/ut",
    "etc/gmt",
    "etc/gmt0",
    "etc/gmt+0",
    "etc/gmt-0",
    "etc/greenwich",
    "etc/universal",
    "etc/zulu",
];

static OFFSET_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^([+-])(\d{1,2})(?::?(\d{2}))?$").unwrap());

/// Resolved time zone of a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimeZoneKey {
    /// IANA named zone.
    Named(Tz),
    /// Fixed, non-zero offset from UTC.
    Offset(FixedOffset),
}

impl TimeZoneKey {
    pub const UTC: TimeZoneKey = TimeZoneKey::Named(Tz::UTC);

    /// Resolve a zone id to a key.
    ///
    /// Accepts IANA names (case-insensitive), offsets like `+05:30`, `-0800`
    /// or `+3`, and offsets prefixed with `UTC`/`GMT`/`UT`. Every zero offset
    /// resolves to [`TimeZoneKey::UTC`].
    pub fn parse(zone_id: &str) -> Result<Self> {
        let trimmed = zone_id.trim();
        let lower = trimmed.to_ascii_lowercase();

        if UTC_EQUIVALENTS.contains(&lower.as_str()) {
            return Ok(Self::UTC);
        }

        let offset_part = ["utc", "gmt", "ut"]
            .iter()
            .find_map(|prefix| {
                lower
                    .strip_prefix(prefix)
                    .filter(|rest| rest.starts_with(['+', '-']))
            })
            .unwrap_or(lower.as_str());

        if offset_part.starts_with(['+', '-']) {
            return match parse_offset_seconds(offset_part) {
                Some(0) => Ok(Self::UTC),
                Some(secs) => FixedOffset::east_opt(secs)
                    .map(TimeZoneKey::Offset)
                    .ok_or_else(|| SessionError::InvalidTimeZone(zone_id.to_string())),
                None => Err(SessionError::InvalidTimeZone(zone_id.to_string())),
            };
        }

        match Tz::from_str_insensitive(trimmed) {
            Ok(tz) => Ok(TimeZoneKey::Named(tz)),
            Err(_) => Err(SessionError::InvalidTimeZone(zone_id.to_string())),
        }
    }

    /// Canonical id of this zone.
    pub fn id(&self) -> String {
        match self {
            Self::Named(tz) => tz.name().to_string(),
            Self::Offset(offset) => offset.to_string(),
        }
    }
}

fn parse_offset_seconds(s: &str) -> Option<i32> {
    let caps = OFFSET_RE.captures(s)?;
    let hours: i32 = caps.get(2)?.as_str().parse().ok()?;
    let minutes: i32 = match caps.get(3) {
        Some(m) => m.as_str().parse().ok()?,
        None => 0,
    };
    if minutes >= 60 {
        return None;
    }

    let secs = hours * 3600 + minutes * 60;
    if secs > MAX_OFFSET_SECONDS {
        return None;
    }

    match &caps[1] {
        "-" => Some(-secs),
        _ => Some(secs),
    }
}

impl fmt::Display for TimeZoneKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.id())
    }
}

impl FromStr for TimeZoneKey {
    type Err = SessionError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn utc_spellings() {
        for id in ["UTC", "utc", "Z", "GMT", "Etc/UTC", "Zulu", "+00:00", "-00:00", "UTC+0", "gmt-00:00"] {
            assert_eq!(TimeZoneKey::UTC, TimeZoneKey::parse(id).unwrap(), "id: {id}");
        }
    }

    #[test]
    fn named_zones() {
        let key = TimeZoneKey::parse("America/Los_Angeles").unwrap();
        assert_eq!(TimeZoneKey::Named(Tz::America__Los_Angeles), key);
        assert_eq!("America/Los_Angeles", key.id());

        let key = TimeZoneKey::parse("asia/kolkata").unwrap();
        assert_eq!("Asia/Kolkata", key.id());
    }

    #[test]
    fn fixed_offsets() {
        struct Test {
            input: &'static str,
            expected: &'static str,
        }

        let tests = [
            Test {
                input: "+05:30",
                expected: "+05:30",
            },
            Test {
                input: "-0800",
                expected: "-08:00",
            },
            Test {
                input: "+3",
                expected: "+03:00",
            },
            Test {
                input: "UTC+14:00",
                expected: "+14:00",
            },
            Test {
                input: "GMT-7",
                expected: "-07:00",
            },
        ];

        for test in tests {
            let key = TimeZoneKey::parse(test.input).unwrap();
            assert_eq!(test.expected, key.id(), "input: {}", test.input);
        }
    }

    #[test]
    fn invalid_zones() {
        for id in ["", "Mars/Olympus_Mons", "+15:00", "+05:60", "+5:3", "UTC+", "--01"] {
            let err = TimeZoneKey::parse(id).unwrap_err();
            assert!(
                matches!(&err, SessionError::InvalidTimeZone(raw) if raw == id),
                "id: {id}, err: {err}"
            );
        }
    }
}
