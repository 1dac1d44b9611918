// SPDX-License-Identifier: MIT
// Copyright (c) 2026 StarTuz

pub mod config;
pub mod display;
pub mod kml;
pub mod logbook;
pub mod period;
pub mod record;
pub mod source;
pub mod stats;
pub mod view;

use std::path::PathBuf;
use thiserror::Error;

pub use logbook::{Logbook, Selection};
pub use period::YearFilter;
pub use record::{normalize, FlightRecord};
pub use source::{LogbookReader, RawRow};
pub use stats::{aggregate, FrequencyTable, Stats};
pub use view::{view, SortKey, UnknownSortKey, ViewState};

#[derive(Error, Debug)]
pub enum LogbookError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
    #[error("CSV header has none of the logbook columns (found: {0})")]
    MissingHeader(String),
}

/// Directory holding `config.json`.
///
/// Falls back to `.flight-logbook` in the working directory when the platform
/// has no notion of a config dir.
pub fn get_config_root() -> PathBuf {
    directories::ProjectDirs::from("org", "flight-logbook", "Flight Logbook")
        .map(|dirs| dirs.config_dir().to_path_buf())
        .unwrap_or_else(|| PathBuf::from(".flight-logbook"))
}
