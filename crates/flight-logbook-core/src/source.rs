// SPDX-License-Identifier: MIT
// Copyright (c) 2026 StarTuz

use crate::LogbookError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

/// Column names the logbook understands, in table order.
pub const COLUMNS: [&str; 13] = [
    "AIRLINE",
    "FLIGHT",
    "ORIGIN",
    "DESTINATION",
    "DATE",
    "DEPART",
    "ARRIVE",
    "TIME",
    "DELAY",
    "DISTANCE",
    "SEAT",
    "TAIL",
    "TYPE",
];

/// One leg exactly as it appears in the CSV. Missing columns read as "".
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawRow {
    pub airline: String,
    pub flight: String,
    pub origin: String,
    pub destination: String,
    pub date: String,
    pub depart: String,
    pub arrive: String,
    pub time: String,
    pub delay: String,
    pub distance: String,
    pub seat: String,
    pub tail: String,
    pub aircraft_type: String,
    /// Columns outside [`COLUMNS`], kept verbatim.
    #[serde(default)]
    pub extra: BTreeMap<String, String>,
}

impl RawRow {
    /// Builds a row from `(column, value)` pairs. Unknown columns land in `extra`.
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<String>,
    {
        let mut row = RawRow::default();
        for (column, value) in pairs {
            row.set(column.as_ref(), value.into());
        }
        row
    }

    pub fn get(&self, column: &str) -> Option<&str> {
        let value = match column {
            "AIRLINE" => &self.airline,
            "FLIGHT" => &self.flight,
            "ORIGIN" => &self.origin,
            "DESTINATION" => &self.destination,
            "DATE" => &self.date,
            "DEPART" => &self.depart,
            "ARRIVE" => &self.arrive,
            "TIME" => &self.time,
            "DELAY" => &self.delay,
            "DISTANCE" => &self.distance,
            "SEAT" => &self.seat,
            "TAIL" => &self.tail,
            "TYPE" => &self.aircraft_type,
            other => return self.extra.get(other).map(String::as_str),
        };
        Some(value.as_str())
    }

    pub fn set(&mut self, column: &str, value: String) {
        let slot = match column {
            "AIRLINE" => &mut self.airline,
            "FLIGHT" => &mut self.flight,
            "ORIGIN" => &mut self.origin,
            "DESTINATION" => &mut self.destination,
            "DATE" => &mut self.date,
            "DEPART" => &mut self.depart,
            "ARRIVE" => &mut self.arrive,
            "TIME" => &mut self.time,
            "DELAY" => &mut self.delay,
            "DISTANCE" => &mut self.distance,
            "SEAT" => &mut self.seat,
            "TAIL" => &mut self.tail,
            "TYPE" => &mut self.aircraft_type,
            other => {
                self.extra.insert(other.to_string(), value);
                return;
            }
        };
        *slot = value;
    }

    /// Every column with its value: known columns first, then extras by name.
    pub fn fields(&self) -> impl Iterator<Item = (&str, &str)> + '_ {
        COLUMNS
            .iter()
            .map(move |column| (*column, self.get(column).unwrap_or("")))
            .chain(self.extra.iter().map(|(k, v)| (k.as_str(), v.as_str())))
    }
}

pub struct LogbookReader;

impl LogbookReader {
    pub fn parse_file<P: AsRef<Path>>(path: P) -> Result<Vec<RawRow>, LogbookError> {
        let file = File::open(path)?;
        Self::parse(BufReader::new(file))
    }

    /// Reads a header-led CSV into raw rows.
    ///
    /// Rows are read as bytes and decoded lossily, and short or long rows are
    /// accepted, so a single bad line never stops the rows after it.
    pub fn parse<R: Read>(reader: R) -> Result<Vec<RawRow>, LogbookError> {
        let mut rdr = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .from_reader(reader);

        let headers: Vec<String> = rdr
            .byte_headers()?
            .iter()
            .map(|h| {
                String::from_utf8_lossy(h)
                    .trim_start_matches('\u{feff}')
                    .trim()
                    .to_string()
            })
            .collect();

        if headers.iter().all(|h| h.is_empty()) {
            return Ok(Vec::new());
        }
        if !headers.iter().any(|h| COLUMNS.contains(&h.as_str())) {
            return Err(LogbookError::MissingHeader(headers.join(",")));
        }

        let mut rows = Vec::new();
        for result in rdr.byte_records() {
            let record = result?;
            if record.len() > headers.len() {
                log::debug!(
                    "Row {} has {} fields but the header has {}; extra fields ignored",
                    rows.len() + 1,
                    record.len(),
                    headers.len()
                );
            }
            let row = RawRow::from_pairs(
                headers
                    .iter()
                    .zip(record.iter())
                    .map(|(h, v)| (h.as_str(), String::from_utf8_lossy(v).into_owned())),
            );
            rows.push(row);
        }

        log::debug!("Read {} logbook rows", rows.len());
        Ok(rows)
    }
}
