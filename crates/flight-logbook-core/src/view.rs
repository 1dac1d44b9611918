// SPDX-License-Identifier: MIT
// Copyright (c) 2026 StarTuz

use crate::record::FlightRecord;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown sort key '{0}'")]
pub struct UnknownSortKey(pub String);

/// Columns the table can be ordered by. Serialized as the column name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SortKey {
    Flight,
    Route,
    Date,
    Depart,
    Arrive,
    Duration,
    Delay,
    Distance,
    Tail,
    AircraftType,
    Seat,
    Airline,
    Origin,
    Destination,
    SeatClass,
}

impl SortKey {
    pub const ALL: [SortKey; 15] = [
        SortKey::Flight,
        SortKey::Route,
        SortKey::Date,
        SortKey::Depart,
        SortKey::Arrive,
        SortKey::Duration,
        SortKey::Delay,
        SortKey::Distance,
        SortKey::Tail,
        SortKey::AircraftType,
        SortKey::Seat,
        SortKey::Airline,
        SortKey::Origin,
        SortKey::Destination,
        SortKey::SeatClass,
    ];

    /// Canonical column name, as accepted by [`FromStr`].
    pub fn column(self) -> &'static str {
        match self {
            SortKey::Flight => "AIRLINE_FLIGHT",
            SortKey::Route => "ORIGIN_DEST",
            SortKey::Date => "DATE",
            SortKey::Depart => "DEPART_MILLIS",
            SortKey::Arrive => "ARRIVE_MILLIS",
            SortKey::Duration => "TIME_MILLIS",
            SortKey::Delay => "DELAY_MILLIS",
            SortKey::Distance => "DISTANCE_NUM",
            SortKey::Tail => "TAIL",
            SortKey::AircraftType => "TYPE",
            SortKey::Seat => "SEAT",
            SortKey::Airline => "AIRLINE",
            SortKey::Origin => "ORIGIN",
            SortKey::Destination => "DESTINATION",
            SortKey::SeatClass => "SEAT_CLASS",
        }
    }

    /// Ascending comparison. Missing times and durations order before any value.
    pub fn compare(self, a: &FlightRecord, b: &FlightRecord) -> Ordering {
        match self {
            SortKey::Flight => a.airline_flight.cmp(&b.airline_flight),
            SortKey::Route => a.origin_dest.cmp(&b.origin_dest),
            SortKey::Date => a.raw.date.cmp(&b.raw.date),
            SortKey::Depart => a.depart_millis.cmp(&b.depart_millis),
            SortKey::Arrive => a.arrive_millis.cmp(&b.arrive_millis),
            SortKey::Duration => a.duration_millis.cmp(&b.duration_millis),
            SortKey::Delay => a.delay_millis.cmp(&b.delay_millis),
            SortKey::Distance => a.distance.cmp(&b.distance),
            SortKey::Tail => a.raw.tail.cmp(&b.raw.tail),
            SortKey::AircraftType => a.raw.aircraft_type.cmp(&b.raw.aircraft_type),
            SortKey::Seat => a.raw.seat.cmp(&b.raw.seat),
            SortKey::Airline => a.raw.airline.cmp(&b.raw.airline),
            SortKey::Origin => a.raw.origin.cmp(&b.raw.origin),
            SortKey::Destination => a.raw.destination.cmp(&b.raw.destination),
            SortKey::SeatClass => a.seat_class.cmp(&b.seat_class),
        }
    }
}

impl fmt::Display for SortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.column())
    }
}

impl FromStr for SortKey {
    type Err = UnknownSortKey;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = s.trim().to_ascii_uppercase().replace('-', "_");
        let parsed = match key.as_str() {
            "AIRLINE_FLIGHT" | "FLIGHT" => SortKey::Flight,
            "ORIGIN_DEST" | "ROUTE" => SortKey::Route,
            "DATE" => SortKey::Date,
            "DEPART_MILLIS" | "DEPART" => SortKey::Depart,
            "ARRIVE_MILLIS" | "ARRIVE" => SortKey::Arrive,
            "TIME_MILLIS" | "TIME" | "DURATION" => SortKey::Duration,
            "DELAY_MILLIS" | "DELAY" => SortKey::Delay,
            "DISTANCE_NUM" | "DISTANCE" => SortKey::Distance,
            "TAIL" | "AIRCRAFT" => SortKey::Tail,
            "TYPE" => SortKey::AircraftType,
            "SEAT" => SortKey::Seat,
            "AIRLINE" => SortKey::Airline,
            "ORIGIN" => SortKey::Origin,
            "DESTINATION" => SortKey::Destination,
            "SEAT_CLASS" | "CLASS" => SortKey::SeatClass,
            _ => return Err(UnknownSortKey(s.to_string())),
        };
        Ok(parsed)
    }
}

impl Serialize for SortKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.column())
    }
}

impl<'de> Deserialize<'de> for SortKey {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        use serde::de::Error;

        let name = String::deserialize(deserializer)?;
        name.parse().map_err(D::Error::custom)
    }
}

/// Records whose text contains `filter_text`, ignoring case. Empty text keeps everything.
pub fn filter<'a>(records: &'a [FlightRecord], filter_text: &str) -> Vec<&'a FlightRecord> {
    records.iter().filter(|r| r.matches(filter_text)).collect()
}

/// Filters then stably sorts. Equal keys keep their input order in both directions.
pub fn view<'a>(
    records: &'a [FlightRecord],
    filter_text: &str,
    sort_key: SortKey,
    ascending: bool,
) -> Vec<&'a FlightRecord> {
    let mut rows = filter(records, filter_text);
    rows.sort_by(|a, b| {
        let ord = sort_key.compare(a, b);
        if ascending {
            ord
        } else {
            ord.reverse()
        }
    });
    rows
}

/// Filter text plus sort column and direction for one table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ViewState {
    pub filter_text: String,
    pub sort_key: SortKey,
    pub ascending: bool,
}

impl Default for ViewState {
    fn default() -> Self {
        Self {
            filter_text: String::new(),
            sort_key: SortKey::Date,
            ascending: false,
        }
    }
}

impl ViewState {
    pub fn apply<'a>(&self, records: &'a [FlightRecord]) -> Vec<&'a FlightRecord> {
        view(records, &self.filter_text, self.sort_key, self.ascending)
    }

    /// Header click: the active column flips direction, a new column starts ascending.
    pub fn toggle_sort(&mut self, key: SortKey) {
        if self.sort_key == key {
            self.ascending = !self.ascending;
        } else {
            self.sort_key = key;
            self.ascending = true;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::normalize;
    use crate::source::RawRow;

    fn records() -> Vec<FlightRecord> {
        normalize(vec![
            RawRow::from_pairs([("AIRLINE", "AS"), ("DEPART", "9:00AM"), ("DISTANCE", "679")]),
            RawRow::from_pairs([("AIRLINE", "UA"), ("DEPART", "bogus"), ("DISTANCE", "8446")]),
            RawRow::from_pairs([("AIRLINE", "AA"), ("DEPART", "6:30AM"), ("DISTANCE", "2475")]),
        ])
    }

    fn airlines(rows: &[&FlightRecord]) -> Vec<String> {
        rows.iter().map(|r| r.raw.airline.clone()).collect()
    }

    #[test]
    fn test_sort_key_parsing() {
        assert_eq!("DATE".parse::<SortKey>(), Ok(SortKey::Date));
        assert_eq!("distance".parse::<SortKey>(), Ok(SortKey::Distance));
        assert_eq!("DELAY_MILLIS".parse::<SortKey>(), Ok(SortKey::Delay));
        assert_eq!("seat-class".parse::<SortKey>(), Ok(SortKey::SeatClass));
        assert_eq!(
            "altitude".parse::<SortKey>(),
            Err(UnknownSortKey("altitude".to_string()))
        );
        for key in SortKey::ALL {
            assert_eq!(key.column().parse::<SortKey>(), Ok(key));
        }
    }

    #[test]
    fn test_sort_key_serializes_as_column_name() {
        assert_eq!(
            serde_json::to_string(&SortKey::Delay).unwrap(),
            r#""DELAY_MILLIS""#
        );
        assert_eq!(
            serde_json::from_str::<SortKey>(r#""seat-class""#).unwrap(),
            SortKey::SeatClass
        );
        assert!(serde_json::from_str::<SortKey>(r#""altitude""#).is_err());
    }

    #[test]
    fn test_numeric_sort() {
        let records = records();
        let rows = view(&records, "", SortKey::Distance, true);
        assert_eq!(airlines(&rows), ["AS", "AA", "UA"]);
    }

    #[test]
    fn test_missing_times_lead_ascending_and_trail_descending() {
        let records = records();
        assert_eq!(
            airlines(&view(&records, "", SortKey::Depart, true)),
            ["UA", "AA", "AS"]
        );
        assert_eq!(
            airlines(&view(&records, "", SortKey::Depart, false)),
            ["AS", "AA", "UA"]
        );
    }

    #[test]
    fn test_descending_keeps_ties_in_input_order() {
        let records = normalize(vec![
            RawRow::from_pairs([("AIRLINE", "AS"), ("FLIGHT", "1")]),
            RawRow::from_pairs([("AIRLINE", "UA"), ("FLIGHT", "2")]),
            RawRow::from_pairs([("AIRLINE", "AS"), ("FLIGHT", "3")]),
        ]);
        let rows = view(&records, "", SortKey::Airline, false);
        let flights: Vec<_> = rows.iter().map(|r| r.raw.flight.as_str()).collect();
        assert_eq!(flights, ["2", "1", "3"]);
    }

    #[test]
    fn test_filter_then_sort() {
        let records = records();
        let rows = view(&records, "a", SortKey::Airline, true);
        assert_eq!(airlines(&rows), ["AA", "AS", "UA"]);

        let rows = view(&records, "as", SortKey::Airline, true);
        assert_eq!(airlines(&rows), ["AS"]);
    }

    #[test]
    fn test_toggle_sort() {
        let mut state = ViewState::default();
        assert_eq!(state.sort_key, SortKey::Date);
        assert!(!state.ascending);

        state.toggle_sort(SortKey::Date);
        assert!(state.ascending);

        state.toggle_sort(SortKey::Distance);
        assert_eq!(state.sort_key, SortKey::Distance);
        assert!(state.ascending);

        state.toggle_sort(SortKey::Distance);
        assert!(!state.ascending);
    }
}
