//! Timestamp targets and the fallback layout chain.

use std::fmt::Write as _;

use chrono::format::{Fixed, Item, ParseErrorKind, StrftimeItems};
use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, SecondsFormat, Utc};

use super::{resolve, Indirection};
use crate::error::{ConvertError, Result};
use crate::options::{FormatOptions, TimeOptions};
use crate::timestamp::{Timestamp, ZoneName};
use crate::value::Value;

/// Default text rendering of a timestamp. Part of the fallback chain, so
/// rendered text always parses back.
pub const CANONICAL_LAYOUT: &str = "%Y-%m-%d %H:%M:%S%.f %z";

/// How a layout's pattern is matched against text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Shape {
    /// RFC 3339 with `T` separator and `Z` or a numeric offset.
    Rfc3339,
    /// Pattern carries a numeric offset.
    Offset,
    /// Pattern carries date and time, no zone. Resolves to UTC.
    Naive,
    /// A zone abbreviation sits at the given whitespace token, counted from
    /// the end. Resolves to offset zero and keeps the abbreviation.
    ZoneName { from_end: usize },
    /// Numeric offset optionally followed by a zone abbreviation.
    OffsetZoneName,
    /// `Z` or a colon offset glued to the seconds.
    ZuluOffset,
    /// Date only. Resolves to midnight UTC.
    Date,
    /// Time only. Resolves to January 1 of year 0, UTC.
    Time,
    /// Month, day and time without a year. Resolves to year 0, UTC.
    Stamp,
}

/// One entry of the fallback layout chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeLayout {
    pub name: &'static str,
    /// chrono pattern used for parsing.
    pub pattern: &'static str,
    /// chrono pattern used for rendering.
    pub output: &'static str,
    /// A literal in this layout.
    pub example: &'static str,
    shape: Shape,
}

const fn layout(name: &'static str, pattern: &'static str, output: &'static str, example: &'static str, shape: Shape) -> TimeLayout {
    TimeLayout {
        name,
        pattern,
        output,
        example,
        shape,
    }
}

/// Layouts tried in order when text is converted without an explicit
/// layout. First match wins.
pub const TIME_LAYOUTS: [TimeLayout; 24] = [
    layout("rfc3339", "%Y-%m-%dT%H:%M:%S%.f%:z", "%Y-%m-%dT%H:%M:%S%.f%:z", "2006-01-02T15:04:05+07:00", Shape::Rfc3339),
    layout("iso8601", "%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S%.f", "2006-01-02T15:04:05", Shape::Naive),
    layout("rfc1123z", "%a, %d %b %Y %H:%M:%S%.f %z", "%a, %d %b %Y %H:%M:%S %z", "Mon, 02 Jan 2006 15:04:05 -0700", Shape::Offset),
    layout("rfc1123", "%a, %d %b %Y %H:%M:%S%.f", "%a, %d %b %Y %H:%M:%S %Z", "Mon, 02 Jan 2006 15:04:05 MST", Shape::ZoneName { from_end: 0 }),
    layout("rfc822z", "%d %b %y %H:%M %z", "%d %b %y %H:%M %z", "02 Jan 06 15:04 -0700", Shape::Offset),
    layout("rfc822", "%d %b %y %H:%M", "%d %b %y %H:%M %Z", "02 Jan 06 15:04 MST", Shape::ZoneName { from_end: 0 }),
    layout("rfc850", "%A, %d-%b-%y %H:%M:%S%.f", "%A, %d-%b-%y %H:%M:%S %Z", "Monday, 02-Jan-06 15:04:05 MST", Shape::ZoneName { from_end: 0 }),
    layout("ansic", "%a %b %e %H:%M:%S%.f %Y", "%a %b %e %H:%M:%S %Y", "Mon Jan  2 15:04:05 2006", Shape::Naive),
    layout("unix_date", "%a %b %e %H:%M:%S%.f %Y", "%a %b %e %H:%M:%S %Z %Y", "Mon Jan  2 15:04:05 MST 2006", Shape::ZoneName { from_end: 1 }),
    layout("ruby_date", "%a %b %d %H:%M:%S%.f %z %Y", "%a %b %d %H:%M:%S %z %Y", "Mon Jan 02 15:04:05 -0700 2006", Shape::Offset),
    layout("canonical", "%Y-%m-%d %H:%M:%S%.f %z", CANONICAL_LAYOUT, "2006-01-02 15:04:05.999999999 -0700 MST", Shape::OffsetZoneName),
    layout("date", "%Y-%m-%d", "%Y-%m-%d", "2006-01-02", Shape::Date),
    layout("time", "%H:%M:%S%.f", "%H:%M:%S", "15:04:05", Shape::Time),
    layout("day_month_year", "%d %b %Y", "%d %b %Y", "02 Jan 2006", Shape::Date),
    layout("date_time_colon_offset", "%Y-%m-%d %H:%M:%S%.f %:z", "%Y-%m-%d %H:%M:%S %:z", "2006-01-02 15:04:05 -07:00", Shape::Offset),
    layout("date_time_offset", "%Y-%m-%d %H:%M:%S%.f %z", "%Y-%m-%d %H:%M:%S %z", "2006-01-02 15:04:05 -0700", Shape::Offset),
    layout("rfc3339_space", "%Y-%m-%d %H:%M:%S%.f%:z", "%Y-%m-%d %H:%M:%S%:z", "2006-01-02 15:04:05Z", Shape::ZuluOffset),
    layout("date_time", "%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%d %H:%M:%S", "2006-01-02 15:04:05", Shape::Naive),
    layout("date_hour_minute", "%Y-%m-%d %H:%M", "%Y-%m-%d %H:%M", "2006-01-02 15:04", Shape::Naive),
    layout("kitchen", "%I:%M%p", "%-I:%M%p", "3:04PM", Shape::Time),
    layout("stamp", "%b %e %H:%M:%S%.f", "%b %e %H:%M:%S", "Jan  2 15:04:05", Shape::Stamp),
    layout("stamp_milli", "%b %e %H:%M:%S%.f", "%b %e %H:%M:%S%.3f", "Jan  2 15:04:05.000", Shape::Stamp),
    layout("stamp_micro", "%b %e %H:%M:%S%.f", "%b %e %H:%M:%S%.6f", "Jan  2 15:04:05.000000", Shape::Stamp),
    layout("stamp_nano", "%b %e %H:%M:%S%.f", "%b %e %H:%M:%S%.9f", "Jan  2 15:04:05.000000000", Shape::Stamp),
];

impl TimeLayout {
    pub fn parse(&self, text: &str) -> Option<Timestamp> {
        match self.shape {
            Shape::Rfc3339 => DateTime::parse_from_rfc3339(text).ok().map(Timestamp::new),
            Shape::Offset => with_offset(text, self.pattern),
            Shape::Naive => naive(text, self.pattern),
            Shape::ZoneName { from_end } => {
                let (rest, zone) = strip_zone_name(text, from_end)?;
                naive(&rest, self.pattern).map(|ts| ts.with_zone_name(zone))
            }
            Shape::OffsetZoneName => match strip_zone_name(text, 0) {
                Some((rest, zone)) => with_offset(&rest, self.pattern).map(|ts| ts.with_zone_name(zone)),
                None => with_offset(text, self.pattern),
            },
            Shape::ZuluOffset => match text.strip_suffix(|c: char| c.eq_ignore_ascii_case(&'Z')) {
                Some(local) => naive(local, self.pattern.trim_end_matches("%:z")),
                None => with_offset(text, self.pattern),
            },
            Shape::Date => NaiveDate::parse_from_str(text, self.pattern)
                .ok()
                .map(|date| Timestamp::new(date.and_time(NaiveTime::MIN).and_utc().fixed_offset())),
            Shape::Time => naive(&format!("0000-01-01 {text}"), &format!("%Y-%m-%d {}", self.pattern)),
            Shape::Stamp => naive(&format!("0000 {text}"), &format!("%Y {}", self.pattern)),
        }
    }

    /// Render in this layout. A timestamp without a zone abbreviation,
    /// rendered in a layout that needs one, is shown at offset zero as `UTC`.
    pub fn render(&self, timestamp: &Timestamp) -> String {
        match self.shape {
            Shape::Rfc3339 => timestamp.instant().to_rfc3339_opts(SecondsFormat::AutoSi, true),
            Shape::ZoneName { .. } if timestamp.zone_name().is_none() => format_zoned(&timestamp.to_utc(), self.output),
            Shape::OffsetZoneName => timestamp.to_string(),
            Shape::ZuluOffset if timestamp.instant().offset().local_minus_utc() == 0 => {
                let rendered = timestamp.instant().format(self.output).to_string();
                match rendered.strip_suffix("+00:00") {
                    Some(local) => format!("{local}Z"),
                    None => rendered,
                }
            }
            _ => format_zoned(timestamp, self.output),
        }
    }
}

/// Formatting items for `pattern` with `%Z` spelled as the zone
/// abbreviation. Without one, offset zero is spelled `UTC` and any other
/// offset is left to chrono.
fn zoned_items<'a>(pattern: &'a str, timestamp: &'a Timestamp) -> Vec<Item<'a>> {
    let zone = timestamp
        .zone_name()
        .or_else(|| (timestamp.instant().offset().local_minus_utc() == 0).then_some("UTC"));
    StrftimeItems::new(pattern)
        .map(|item| match (item, zone) {
            (Item::Fixed(Fixed::TimezoneName), Some(name)) => Item::Literal(name),
            (item, _) => item,
        })
        .collect()
}

fn format_zoned(timestamp: &Timestamp, pattern: &str) -> String {
    let items = zoned_items(pattern, timestamp);
    timestamp.instant().format_with_items(items.iter()).to_string()
}

fn with_offset(text: &str, pattern: &str) -> Option<Timestamp> {
    DateTime::parse_from_str(text, pattern).ok().map(Timestamp::new)
}

fn naive(text: &str, pattern: &str) -> Option<Timestamp> {
    NaiveDateTime::parse_from_str(text, pattern)
        .ok()
        .map(|dt| Timestamp::new(dt.and_utc().fixed_offset()))
}

/// Removes the zone abbreviation at token `from_end` (0 is the last token).
/// The remaining tokens are rejoined with single spaces.
fn strip_zone_name(text: &str, from_end: usize) -> Option<(String, ZoneName)> {
    let tokens: Vec<&str> = text.split_whitespace().collect();
    let index = tokens.len().checked_sub(from_end + 1)?;
    let zone = ZoneName::new(tokens[index])?;
    let kept: Vec<&str> = tokens
        .iter()
        .enumerate()
        .filter(|(i, _)| *i != index)
        .map(|(_, token)| *token)
        .collect();
    Some((kept.join(" "), zone))
}

/// Parse text as a timestamp. With a layout, the text must match it;
/// without, the fallback chain is tried in order.
pub fn parse_timestamp(text: &str, layout: Option<&str>) -> Result<Timestamp> {
    if let Some(layout) = layout {
        return parse_with_layout(text, layout).map_err(|reason| ConvertError::Layout {
            input: text.to_string(),
            layout: layout.to_string(),
            reason,
        });
    }

    for candidate in &TIME_LAYOUTS {
        if let Some(ts) = candidate.parse(text) {
            return Ok(ts);
        }
        tracing::trace!(layout = candidate.name, input = text, "layout did not match");
    }
    Err(ConvertError::Date {
        input: text.to_string(),
    })
}

/// Strict parse against a caller pattern. Missing zone means UTC, missing
/// time means midnight, missing date means January 1 of year 0.
fn parse_with_layout(text: &str, layout: &str) -> std::result::Result<Timestamp, String> {
    match DateTime::parse_from_str(text, layout) {
        Err(e) if e.kind() == ParseErrorKind::NotEnough => {}
        other => return other.map(Timestamp::new).map_err(|e| e.to_string()),
    }
    match NaiveDateTime::parse_from_str(text, layout) {
        Err(e) if e.kind() == ParseErrorKind::NotEnough => {}
        other => return other.map(|dt| Timestamp::new(dt.and_utc().fixed_offset())).map_err(|e| e.to_string()),
    }
    match NaiveDate::parse_from_str(text, layout) {
        Err(e) if e.kind() == ParseErrorKind::NotEnough => {}
        other => {
            return other
                .map(|date| Timestamp::new(date.and_time(NaiveTime::MIN).and_utc().fixed_offset()))
                .map_err(|e| e.to_string())
        }
    }
    let time = NaiveTime::parse_from_str(text, layout).map_err(|e| e.to_string())?;
    NaiveDate::from_ymd_opt(0, 1, 1)
        .map(|date| Timestamp::new(date.and_time(time).and_utc().fixed_offset()))
        .ok_or_else(|| "date out of range".to_string())
}

fn from_epoch(seconds: i64, value: &Value) -> Result<Timestamp> {
    DateTime::<Utc>::from_timestamp(seconds, 0)
        .map(Timestamp::from)
        .ok_or_else(|| ConvertError::OutOfRange {
            value: value.describe(),
            target: "timestamp",
        })
}

pub fn to_timestamp(value: &Value, options: &TimeOptions) -> Result<Timestamp> {
    let value = resolve(value, Indirection::Follow);
    match value.as_ref() {
        Value::Timestamp(ts) => Ok(*ts),
        Value::Text(s) => parse_timestamp(s, options.layout.as_deref()),
        Value::I8(n) => from_epoch(i64::from(*n), &value),
        Value::I16(n) => from_epoch(i64::from(*n), &value),
        Value::I32(n) => from_epoch(i64::from(*n), &value),
        Value::I64(n) => from_epoch(*n, &value),
        Value::U8(n) => from_epoch(i64::from(*n), &value),
        Value::U16(n) => from_epoch(i64::from(*n), &value),
        Value::U32(n) => from_epoch(i64::from(*n), &value),
        Value::U64(n) => {
            let seconds = i64::try_from(*n).map_err(|_| ConvertError::OutOfRange {
                value: n.to_string(),
                target: "timestamp",
            })?;
            from_epoch(seconds, &value)
        }
        other => Err(ConvertError::unsupported(other, "timestamp")),
    }
}

/// Resolve a value to a timestamp and render it.
pub fn format_timestamp(value: &Value, options: &FormatOptions) -> Result<String> {
    let ts = to_timestamp(
        value,
        &TimeOptions {
            layout: options.input.clone(),
        },
    )?;
    match options.output.as_deref() {
        Some(pattern) => render(&ts, pattern),
        None => Ok(ts.to_string()),
    }
}

fn render(ts: &Timestamp, pattern: &str) -> Result<String> {
    let invalid = || ConvertError::OutputLayout {
        layout: pattern.to_string(),
    };
    let items = zoned_items(pattern, ts);
    if items.iter().any(|item| matches!(item, Item::Error)) {
        return Err(invalid());
    }
    let mut out = String::new();
    write!(out, "{}", ts.instant().format_with_items(items.iter())).map_err(|_| invalid())?;
    Ok(out)
}
