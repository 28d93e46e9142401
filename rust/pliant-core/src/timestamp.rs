//! Points in time that remember how their zone was written.

use std::fmt;

use chrono::{DateTime, FixedOffset, Utc};
use serde::{Serialize, Serializer};

use crate::convert::time::CANONICAL_LAYOUT;

const MAX_ZONE_NAME: usize = 5;

/// A zone abbreviation such as `MST`: one to five ASCII capitals.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ZoneName {
    bytes: [u8; MAX_ZONE_NAME],
    len: u8,
}

impl ZoneName {
    pub fn new(name: &str) -> Option<Self> {
        if !(1..=MAX_ZONE_NAME).contains(&name.len()) || !name.bytes().all(|b| b.is_ascii_uppercase()) {
            return None;
        }
        let mut bytes = [0; MAX_ZONE_NAME];
        bytes[..name.len()].copy_from_slice(name.as_bytes());
        Some(ZoneName {
            bytes,
            len: name.len() as u8,
        })
    }

    pub fn as_str(&self) -> &str {
        std::str::from_utf8(&self.bytes[..usize::from(self.len)]).unwrap_or_default()
    }
}

/// An instant with the offset it was written with. Text that named its zone
/// by abbreviation keeps the abbreviation, so it can be printed back.
///
/// Abbreviations carry no offset of their own: `15:04:05 MST` is 15:04:05
/// at offset zero, labelled `MST`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timestamp {
    instant: DateTime<FixedOffset>,
    zone: Option<ZoneName>,
}

impl Timestamp {
    pub fn new(instant: DateTime<FixedOffset>) -> Self {
        Timestamp { instant, zone: None }
    }

    pub fn unix_epoch() -> Self {
        Timestamp::new(DateTime::<Utc>::UNIX_EPOCH.fixed_offset())
    }

    pub fn with_zone_name(self, zone: ZoneName) -> Self {
        Timestamp {
            zone: Some(zone),
            ..self
        }
    }

    pub fn instant(&self) -> DateTime<FixedOffset> {
        self.instant
    }

    pub fn zone_name(&self) -> Option<&str> {
        self.zone.as_ref().map(ZoneName::as_str)
    }

    /// The same instant at offset zero, without a zone abbreviation.
    pub fn to_utc(&self) -> Self {
        Timestamp::new(self.instant.with_timezone(&Utc).fixed_offset())
    }
}

impl From<DateTime<FixedOffset>> for Timestamp {
    fn from(instant: DateTime<FixedOffset>) -> Self {
        Timestamp::new(instant)
    }
}

impl From<DateTime<Utc>> for Timestamp {
    fn from(instant: DateTime<Utc>) -> Self {
        Timestamp::new(instant.fixed_offset())
    }
}

/// Canonical text, followed by the zone abbreviation when there is one.
impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.instant.format(CANONICAL_LAYOUT))?;
        if let Some(zone) = self.zone_name() {
            write!(f, " {zone}")?;
        }
        Ok(())
    }
}

/// Serialized as RFC 3339; the abbreviation is dropped.
impl Serialize for Timestamp {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.instant.serialize(serializer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_zone_names_are_short_capitals() {
        assert_eq!(ZoneName::new("MST").unwrap().as_str(), "MST");
        assert_eq!(ZoneName::new("AEDST").unwrap().as_str(), "AEDST");
        assert!(ZoneName::new("").is_none());
        assert!(ZoneName::new("mst").is_none());
        assert!(ZoneName::new("ABCDEF").is_none());
        assert!(ZoneName::new("+0700").is_none());
    }

    #[test]
    fn test_display_appends_zone_name() {
        let ts = Timestamp::from(Utc.with_ymd_and_hms(2006, 1, 2, 15, 4, 5).unwrap());
        assert_eq!(ts.to_string(), "2006-01-02 15:04:05 +0000");
        let named = ts.with_zone_name(ZoneName::new("MST").unwrap());
        assert_eq!(named.to_string(), "2006-01-02 15:04:05 +0000 MST");
        assert_eq!(named.to_utc(), ts);
    }

    #[test]
    fn test_equality_includes_zone_name() {
        let ts = Timestamp::from(Utc.with_ymd_and_hms(2006, 1, 2, 15, 4, 5).unwrap());
        let named = ts.with_zone_name(ZoneName::new("PST").unwrap());
        assert_ne!(ts, named);
        assert_eq!(ts.instant(), named.instant());
    }

    #[test]
    fn test_serializes_as_rfc3339() {
        let ts = Timestamp::unix_epoch().with_zone_name(ZoneName::new("UTC").unwrap());
        assert_eq!(serde_json::to_string(&ts).unwrap(), "\"1970-01-01T00:00:00+00:00\"");
    }
}
