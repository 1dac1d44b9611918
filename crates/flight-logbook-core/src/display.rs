// SPDX-License-Identifier: MIT
// Copyright (c) 2026 StarTuz

//! Presentation helpers shared by every front end.

use crate::record::FlightRecord;
use serde::{Deserialize, Serialize};

const MINUTE_MS: i64 = 60_000;
const HOUR_MS: i64 = 60 * MINUTE_MS;
const DAY_MS: i64 = 24 * HOUR_MS;

/// Whole days and leftover whole hours. Negative input reads as zero.
pub fn days_hours(millis: i64) -> (i64, i64) {
    let millis = millis.max(0);
    (millis / DAY_MS, (millis % DAY_MS) / HOUR_MS)
}

/// Whole hours and leftover whole minutes. Negative input reads as zero.
pub fn hours_minutes(millis: i64) -> (i64, i64) {
    let millis = millis.max(0);
    (millis / HOUR_MS, (millis % HOUR_MS) / MINUTE_MS)
}

/// `"1H30M"` becomes `"1h 30m"`. The sign, if any, is kept.
pub fn format_duration_token(token: &str) -> String {
    token.trim().replace(['H', 'h'], "h ").to_lowercase()
}

/// Delay colours: green for on time or early, red for late.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DelayStatus {
    OnTime,
    Late,
}

impl DelayStatus {
    /// Zero, negative and unreadable delays are all on time.
    pub fn from_millis(delay: Option<i64>) -> Self {
        match delay {
            Some(ms) if ms > 0 => DelayStatus::Late,
            _ => DelayStatus::OnTime,
        }
    }

    pub fn color(self) -> &'static str {
        match self {
            DelayStatus::OnTime => "green",
            DelayStatus::Late => "red",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            DelayStatus::OnTime => "on time",
            DelayStatus::Late => "late",
        }
    }
}

/// The delay cell of a table row: unsigned text plus its status.
pub fn delay_cell(record: &FlightRecord) -> (String, DelayStatus) {
    let text = format_duration_token(&record.raw.delay).replace('-', "");
    (text, DelayStatus::from_millis(record.delay_millis))
}

/// Chart colour for a seat class badge.
pub fn seat_class_color(class: &str) -> &'static str {
    match class {
        "F" => "#7A36B1",
        "P" => "#F13D65",
        "E+" => "#FDAD0F",
        _ => "#05BA48",
    }
}
