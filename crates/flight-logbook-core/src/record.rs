// SPDX-License-Identifier: MIT
// Copyright (c) 2026 StarTuz

use crate::source::RawRow;
use chrono::{NaiveTime, Timelike};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::OnceLock;

/// A normalized leg: the raw row plus every field the views need, derived once.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlightRecord {
    pub raw: RawRow,
    /// AIRLINE followed by FLIGHT, e.g. "AS331".
    pub airline_flight: String,
    /// "ORIGIN ‣ DESTINATION".
    pub origin_dest: String,
    /// Milliseconds since midnight of the reference day. `None` when DEPART is unreadable.
    pub depart_millis: Option<i64>,
    pub arrive_millis: Option<i64>,
    pub duration_millis: Option<i64>,
    /// Signed; negative means an early arrival.
    pub delay_millis: Option<i64>,
    pub distance: i64,
    pub seat_number: String,
    pub seat_class: String,
    pub seat_position: String,
}

impl FlightRecord {
    pub fn from_raw(raw: RawRow) -> Self {
        let (seat_number, seat_class, seat_position) = split_seat(&raw.seat);
        Self {
            airline_flight: format!("{}{}", raw.airline, raw.flight),
            origin_dest: format!("{} ‣ {}", raw.origin, raw.destination),
            depart_millis: parse_clock_millis(&raw.depart),
            arrive_millis: parse_clock_millis(&raw.arrive),
            duration_millis: parse_duration_millis(&raw.time),
            delay_millis: parse_duration_millis(&raw.delay),
            distance: parse_distance(&raw.distance),
            seat_number,
            seat_class,
            seat_position,
            raw,
        }
    }

    /// The year part of DATE (`"2023-05-02"` gives `"2023"`).
    pub fn year(&self) -> &str {
        self.raw.date.split('-').next().unwrap_or("").trim()
    }

    /// Lowercased text of every raw and derived field, one field per line.
    pub fn search_text(&self) -> String {
        let numbers = [
            self.depart_millis,
            self.arrive_millis,
            self.duration_millis,
            self.delay_millis,
            Some(self.distance),
        ];
        let mut text = String::new();
        for (_, value) in self.raw.fields() {
            text.push_str(value);
            text.push('\n');
        }
        for value in [
            &self.airline_flight,
            &self.origin_dest,
            &self.seat_number,
            &self.seat_class,
            &self.seat_position,
        ] {
            text.push_str(value);
            text.push('\n');
        }
        for n in numbers.into_iter().flatten() {
            text.push_str(&n.to_string());
            text.push('\n');
        }
        text.to_lowercase()
    }

    /// Case-insensitive substring match over [`Self::search_text`].
    pub fn matches(&self, needle: &str) -> bool {
        needle.is_empty() || self.search_text().contains(&needle.to_lowercase())
    }
}

/// One record per row, in input order. Never fails.
pub fn normalize<I>(rows: I) -> Vec<FlightRecord>
where
    I: IntoIterator<Item = RawRow>,
{
    rows.into_iter().map(FlightRecord::from_raw).collect()
}

/// Parses a 12-hour clock time such as `7:05PM` or `11:30 am`.
pub fn parse_clock_millis(value: &str) -> Option<i64> {
    let compact: String = value
        .chars()
        .filter(|c| !c.is_whitespace())
        .collect::<String>()
        .to_uppercase();
    if compact.is_empty() {
        return None;
    }
    let time = NaiveTime::parse_from_str(&compact, "%I:%M%p").ok()?;
    Some(i64::from(time.num_seconds_from_midnight()) * 1000)
}

/// Parses an `HhMm` duration token (`1H30M`, `-0H45M`, `2H`, `45M`) into signed milliseconds.
pub fn parse_duration_millis(value: &str) -> Option<i64> {
    static DURATION_RE: OnceLock<Regex> = OnceLock::new();
    let re = DURATION_RE
        .get_or_init(|| Regex::new(r"(?i)^\s*(-)?\s*(?:(\d+)\s*H)?\s*(?:(\d+)\s*M)?\s*$").unwrap());

    let caps = re.captures(value)?;
    if caps.get(2).is_none() && caps.get(3).is_none() {
        return None;
    }

    let hours: i64 = caps
        .get(2)
        .map_or(Some(0), |m| m.as_str().parse().ok())?;
    let minutes: i64 = caps
        .get(3)
        .map_or(Some(0), |m| m.as_str().parse().ok())?;

    let millis = hours
        .checked_mul(3_600_000)?
        .checked_add(minutes.checked_mul(60_000)?)?;
    Some(if caps.get(1).is_some() { -millis } else { millis })
}

/// Leading-integer parse: `"679"`, `" 250 mi"` and `"1,234"` (as 1) all read a number;
/// anything without leading digits is 0.
pub fn parse_distance(value: &str) -> i64 {
    let trimmed = value.trim_start();
    let (negative, digits) = match trimmed.as_bytes().first() {
        Some(b'-') => (true, &trimmed[1..]),
        Some(b'+') => (false, &trimmed[1..]),
        _ => (false, trimmed),
    };
    let end = digits
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(digits.len());
    match digits[..end].parse::<i64>() {
        Ok(n) if negative => -n,
        Ok(n) => n,
        Err(_) => 0,
    }
}

/// Splits `number|class|position`; absent segments come back empty.
pub fn split_seat(value: &str) -> (String, String, String) {
    let mut parts = value.split('|');
    let mut next = || parts.next().unwrap_or("").to_string();
    let number = next();
    let class = next();
    let position = next();
    (number, class, position)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(pairs: &[(&str, &str)]) -> RawRow {
        RawRow::from_pairs(pairs.iter().copied())
    }

    #[test]
    fn test_derived_fields() {
        let record = FlightRecord::from_raw(row(&[
            ("AIRLINE", "AS"),
            ("FLIGHT", "331"),
            ("ORIGIN", "SEA"),
            ("DESTINATION", "SFO"),
            ("DATE", "2023-05-02"),
            ("DEPART", "7:05AM"),
            ("ARRIVE", "9:12pm"),
            ("TIME", "2H07M"),
            ("DELAY", "-0H45M"),
            ("DISTANCE", "679"),
            ("SEAT", "12A|Y|W"),
        ]));

        assert_eq!(record.airline_flight, "AS331");
        assert_eq!(record.origin_dest, "SEA ‣ SFO");
        assert_eq!(record.depart_millis, Some((7 * 3600 + 5 * 60) * 1000));
        assert_eq!(record.arrive_millis, Some((21 * 3600 + 12 * 60) * 1000));
        assert_eq!(record.duration_millis, Some((2 * 60 + 7) * 60_000));
        assert_eq!(record.delay_millis, Some(-45 * 60_000));
        assert_eq!(record.distance, 679);
        assert_eq!(record.seat_number, "12A");
        assert_eq!(record.seat_class, "Y");
        assert_eq!(record.seat_position, "W");
        assert_eq!(record.year(), "2023");
        assert_eq!(record.raw.date, "2023-05-02");
    }

    #[test]
    fn test_clock_edges() {
        assert_eq!(parse_clock_millis("12:00AM"), Some(0));
        assert_eq!(parse_clock_millis("12:30PM"), Some((12 * 3600 + 30 * 60) * 1000));
        assert_eq!(parse_clock_millis(" 6:15 pm "), Some((18 * 3600 + 15 * 60) * 1000));
        assert_eq!(parse_clock_millis(""), None);
        assert_eq!(parse_clock_millis("18:15"), None);
        assert_eq!(parse_clock_millis("13:00PM"), None);
    }

    #[test]
    fn test_duration_tokens() {
        assert_eq!(parse_duration_millis("1H30M"), Some(90 * 60_000));
        assert_eq!(parse_duration_millis("-0H45M"), Some(-45 * 60_000));
        assert_eq!(parse_duration_millis("2h"), Some(2 * 3_600_000));
        assert_eq!(parse_duration_millis("45M"), Some(45 * 60_000));
        assert_eq!(parse_duration_millis("0H0M"), Some(0));
        assert_eq!(parse_duration_millis(""), None);
        assert_eq!(parse_duration_millis("-"), None);
        assert_eq!(parse_duration_millis("soon"), None);
        assert_eq!(parse_duration_millis("1H30"), None);
    }

    #[test]
    fn test_distance_fallbacks() {
        assert_eq!(parse_distance("250"), 250);
        assert_eq!(parse_distance(" 250 mi"), 250);
        assert_eq!(parse_distance("1,234"), 1);
        assert_eq!(parse_distance(""), 0);
        assert_eq!(parse_distance("n/a"), 0);
        assert_eq!(parse_distance("99999999999999999999999"), 0);
    }

    #[test]
    fn test_seat_split() {
        assert_eq!(
            split_seat("12A|Y|W"),
            ("12A".to_string(), "Y".to_string(), "W".to_string())
        );
        assert_eq!(
            split_seat("12A|Y"),
            ("12A".to_string(), "Y".to_string(), String::new())
        );
        assert_eq!(split_seat(""), (String::new(), String::new(), String::new()));
    }

    #[test]
    fn test_garbage_row_still_normalizes() {
        let records = normalize(vec![
            row(&[("DEPART", "later"), ("TIME", "long"), ("DISTANCE", "far")]),
            RawRow::default(),
        ]);

        assert_eq!(records.len(), 2);
        assert_eq!(records[0].depart_millis, None);
        assert_eq!(records[0].duration_millis, None);
        assert_eq!(records[0].distance, 0);
        assert_eq!(records[1].origin_dest, " ‣ ");
    }

    #[test]
    fn test_matches_is_case_insensitive() {
        let record = FlightRecord::from_raw(row(&[("AIRLINE", "AA"), ("TAIL", "N123AB")]));
        assert!(record.matches("n123"));
        assert!(record.matches("AA"));
        assert!(record.matches(""));
        assert!(!record.matches("KLM"));
    }

    #[test]
    fn test_matches_derived_fields() {
        let record = FlightRecord::from_raw(row(&[
            ("AIRLINE", "AS"),
            ("FLIGHT", "331"),
            ("ORIGIN", "SEA"),
            ("DESTINATION", "SFO"),
        ]));
        // AIRLINE and FLIGHT sit on separate lines, so only the joined field matches
        assert!(!record.raw.fields().any(|(_, v)| v.to_lowercase().contains("as331")));
        assert!(record.matches("AS331"));
        assert!(record.matches("sea ‣ sfo"));
    }
}
