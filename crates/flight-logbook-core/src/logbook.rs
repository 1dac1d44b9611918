// SPDX-License-Identifier: MIT
// Copyright (c) 2026 StarTuz

use crate::period::{available_years, YearFilter};
use crate::record::{normalize, FlightRecord};
use crate::source::{LogbookReader, RawRow};
use crate::stats::{aggregate, Stats};
use crate::view::ViewState;
use crate::LogbookError;
use std::borrow::Cow;
use std::io::Read;
use std::path::Path;

/// Owns the normalized legs of one loaded log, newest DATE first.
///
/// Everything downstream reads a [`Selection`] taken from the full list, so
/// switching years never compounds an earlier filter.
#[derive(Debug, Clone, Default)]
pub struct Logbook {
    records: Vec<FlightRecord>,
}

impl Logbook {
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, LogbookError> {
        let path = path.as_ref();
        let rows = LogbookReader::parse_file(path)?;
        log::debug!("Loaded {} legs from {}", rows.len(), path.display());
        Ok(Self::from_rows(rows))
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Self, LogbookError> {
        Ok(Self::from_rows(LogbookReader::parse(reader)?))
    }

    pub fn from_rows(rows: Vec<RawRow>) -> Self {
        let mut records = normalize(rows);
        records.sort_by(|a, b| b.raw.date.cmp(&a.raw.date));
        Self { records }
    }

    pub fn records(&self) -> &[FlightRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn years(&self) -> Vec<String> {
        available_years(&self.records)
    }

    pub fn select(&self, year: &YearFilter) -> Selection<'_> {
        Selection {
            year: year.clone(),
            records: year.select(&self.records),
        }
    }
}

/// The legs of one period. Stats and table views are recomputed on demand.
#[derive(Debug, Clone)]
pub struct Selection<'a> {
    year: YearFilter,
    records: Cow<'a, [FlightRecord]>,
}

impl Selection<'_> {
    pub fn year(&self) -> &YearFilter {
        &self.year
    }

    pub fn records(&self) -> &[FlightRecord] {
        &self.records
    }

    pub fn stats(&self) -> Stats {
        aggregate(&self.records)
    }

    pub fn view(&self, state: &ViewState) -> Vec<&FlightRecord> {
        state.apply(&self.records)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::view::SortKey;
    use std::io::Cursor;

    const SAMPLE: &str = "AIRLINE,FLIGHT,ORIGIN,DESTINATION,DATE,DEPART,ARRIVE,TIME,DELAY,DISTANCE,SEAT,TAIL,TYPE\n\
        AS,331,SEA,SFO,2022-05-02,7:05AM,9:12AM,2H07M,0H12M,679,12A|Y|W,N413AS,B739\n\
        UA,1,SFO,SIN,2023-06-10,11:25PM,6:30AM,16H05M,-0H20M,8446,4K|F|A,N2352U,B789\n\
        AS,332,SFO,SEA,2022-05-09,5:40PM,7:45PM,2H05M,1H03M,679,14C|Y|A,N413AS,B739";

    #[test]
    fn test_canonical_order_is_newest_first() {
        let logbook = Logbook::from_reader(Cursor::new(SAMPLE)).unwrap();
        let dates: Vec<_> = logbook.records().iter().map(|r| r.raw.date.as_str()).collect();
        assert_eq!(dates, ["2023-06-10", "2022-05-09", "2022-05-02"]);
        assert_eq!(logbook.years(), ["2023", "2022"]);
    }

    #[test]
    fn test_year_switch_recomputes_from_full_list() {
        let logbook = Logbook::from_reader(Cursor::new(SAMPLE)).unwrap();

        let year = logbook.select(&YearFilter::Year("2023".to_string()));
        assert_eq!(year.stats().flight_count, 1);

        let all = logbook.select(&YearFilter::AllTime);
        let stats = all.stats();
        assert_eq!(stats.flight_count, 3);
        assert_eq!(stats.total_distance, 679 + 8446 + 679);
        assert_eq!(stats.total_delay, (12 + 63) * 60_000);
    }

    #[test]
    fn test_selection_view() {
        let logbook = Logbook::from_reader(Cursor::new(SAMPLE)).unwrap();
        let selection = logbook.select(&YearFilter::Year("2022".to_string()));
        let state = ViewState {
            filter_text: "n413".to_string(),
            sort_key: SortKey::Depart,
            ascending: true,
        };
        let rows = selection.view(&state);
        let flights: Vec<_> = rows.iter().map(|r| r.airline_flight.as_str()).collect();
        assert_eq!(flights, ["AS331", "AS332"]);
    }
}
