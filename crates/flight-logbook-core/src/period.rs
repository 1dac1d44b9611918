// SPDX-License-Identifier: MIT
// Copyright (c) 2026 StarTuz

use crate::record::FlightRecord;
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::cmp::Ordering;
use std::collections::HashSet;
use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum YearFilter {
    #[default]
    AllTime,
    Year(String),
}

impl YearFilter {
    pub fn includes(&self, record: &FlightRecord) -> bool {
        match self {
            YearFilter::AllTime => true,
            YearFilter::Year(year) => record.year() == year,
        }
    }

    /// Records in this period, borrowed untouched for `AllTime`.
    pub fn select<'a>(&self, records: &'a [FlightRecord]) -> Cow<'a, [FlightRecord]> {
        match self {
            YearFilter::AllTime => Cow::Borrowed(records),
            YearFilter::Year(_) => Cow::Owned(
                records
                    .iter()
                    .filter(|r| self.includes(r))
                    .cloned()
                    .collect(),
            ),
        }
    }
}

impl fmt::Display for YearFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            YearFilter::AllTime => f.write_str("All Time"),
            YearFilter::Year(year) => f.write_str(year),
        }
    }
}

impl FromStr for YearFilter {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.is_empty()
            || trimmed.eq_ignore_ascii_case("all")
            || trimmed.eq_ignore_ascii_case("all time")
        {
            Ok(YearFilter::AllTime)
        } else {
            Ok(YearFilter::Year(trimmed.to_string()))
        }
    }
}

/// Distinct years present in DATE, newest first. Non-numeric years sort last.
pub fn available_years(records: &[FlightRecord]) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut years: Vec<String> = records
        .iter()
        .map(FlightRecord::year)
        .filter(|y| !y.is_empty())
        .filter(|y| seen.insert(y.to_string()))
        .map(str::to_string)
        .collect();

    years.sort_by(|a, b| match (a.parse::<i64>(), b.parse::<i64>()) {
        (Ok(x), Ok(y)) => y.cmp(&x),
        (Ok(_), Err(_)) => Ordering::Less,
        (Err(_), Ok(_)) => Ordering::Greater,
        (Err(_), Err(_)) => a.cmp(b),
    });
    years
}
