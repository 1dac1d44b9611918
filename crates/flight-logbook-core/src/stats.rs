// SPDX-License-Identifier: MIT
// Copyright (c) 2026 StarTuz

use crate::record::FlightRecord;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// `(key, count)` pairs, most frequent first. Equal counts keep first-seen order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FrequencyTable {
    entries: Vec<(String, usize)>,
}

impl FrequencyTable {
    pub fn count<I, S>(keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut index: HashMap<String, usize> = HashMap::new();
        let mut entries: Vec<(String, usize)> = Vec::new();

        for key in keys {
            let key = key.as_ref();
            match index.get(key) {
                Some(&slot) => entries[slot].1 += 1,
                None => {
                    index.insert(key.to_string(), entries.len());
                    entries.push((key.to_string(), 1));
                }
            }
        }

        // sort_by is stable, so ties stay in first-seen order
        entries.sort_by(|a, b| b.1.cmp(&a.1));
        Self { entries }
    }

    pub fn entries(&self) -> &[(String, usize)] {
        &self.entries
    }

    /// The first `n` entries, or all of them when there are fewer.
    pub fn top(&self, n: usize) -> &[(String, usize)] {
        &self.entries[..n.min(self.entries.len())]
    }

    pub fn get(&self, key: &str) -> Option<usize> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, count)| *count)
    }

    /// Number of distinct keys.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Sum of all counts.
    pub fn total(&self) -> usize {
        self.entries.iter().map(|(_, count)| count).sum()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, usize)> {
        self.entries.iter().map(|(k, c)| (k.as_str(), *c))
    }
}

/// Summary of a record list. Durations are raw milliseconds; see
/// [`crate::display`] for day/hour splits.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Stats {
    pub flight_count: usize,
    pub total_distance: i64,
    pub total_flight_time: i64,
    /// Only late legs count; early arrivals add zero.
    pub total_delay: i64,
    /// Origins and destinations counted separately.
    pub airports: FrequencyTable,
    pub airlines: FrequencyTable,
    pub aircraft: FrequencyTable,
    pub seat_classes: FrequencyTable,
}

fn saturating_total(values: impl Iterator<Item = i64>) -> i64 {
    values.fold(0i64, |acc, v| acc.saturating_add(v))
}

/// Empty input gives zeroed stats. Unreadable durations count as zero.
/// Totals clamp at the `i64` bounds instead of overflowing.
pub fn aggregate(records: &[FlightRecord]) -> Stats {
    let total_distance = saturating_total(records.iter().map(|r| r.distance));
    let total_flight_time = saturating_total(records.iter().filter_map(|r| r.duration_millis));
    let total_delay = saturating_total(
        records
            .iter()
            .filter_map(|r| r.delay_millis)
            .map(|d| d.max(0)),
    );

    let airports = FrequencyTable::count(
        records
            .iter()
            .map(|r| r.raw.origin.as_str())
            .chain(records.iter().map(|r| r.raw.destination.as_str())),
    );

    Stats {
        flight_count: records.len(),
        total_distance,
        total_flight_time,
        total_delay,
        airports,
        airlines: FrequencyTable::count(records.iter().map(|r| r.raw.airline.as_str())),
        aircraft: FrequencyTable::count(records.iter().map(|r| r.raw.aircraft_type.as_str())),
        seat_classes: FrequencyTable::count(records.iter().map(|r| r.seat_class.as_str())),
    }
}
