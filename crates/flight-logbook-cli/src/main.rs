// SPDX-License-Identifier: MIT
// Copyright (c) 2026 StarTuz

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use flight_logbook_core::config::{ConfigManager, LogbookConfig};
use flight_logbook_core::display::{self, DelayStatus};
use flight_logbook_core::kml::{build_kml, AirportDirectory};
use flight_logbook_core::{FlightRecord, FrequencyTable, Logbook, SortKey, ViewState, YearFilter};
use simplelog::{ColorChoice, LevelFilter, TermLogger, TerminalMode};
use std::path::PathBuf;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path to the flight log CSV
    #[arg(short, long, env = "FLIGHT_LOGBOOK_CSV")]
    csv: Option<PathBuf>,

    /// Use this config file instead of the default one
    #[arg(long)]
    config: Option<PathBuf>,

    /// Limit to one year ("all" for every flight)
    #[arg(short, long, default_value = "all")]
    year: YearFilter,

    /// Log debug output to stderr
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show totals and top rankings
    Stats {
        /// Rows per ranking
        #[arg(long)]
        top: Option<usize>,
        /// Print the full statistics as JSON
        #[arg(long)]
        json: bool,
    },
    /// Print the flight table
    Table {
        /// Case-insensitive text that must appear somewhere in the row
        #[arg(short, long, default_value = "")]
        filter: String,
        /// Column to sort by (e.g. date, distance, DELAY_MILLIS)
        #[arg(short, long)]
        sort: Option<SortKey>,
        /// Sort ascending
        #[arg(long, conflicts_with = "desc")]
        asc: bool,
        /// Sort descending
        #[arg(long)]
        desc: bool,
    },
    /// List the years present in the log
    Years,
    /// Write the route map as KML
    Kml {
        /// Colon-delimited airport database
        #[arg(short, long)]
        airports: Option<PathBuf>,
        /// Output file
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Document name shown in the map viewer
        #[arg(long)]
        name: Option<String>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = if cli.verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Warn
    };
    TermLogger::init(
        level,
        simplelog::Config::default(),
        TerminalMode::Stderr,
        ColorChoice::Auto,
    )?;

    let manager = match &cli.config {
        Some(path) => ConfigManager::with_path(path),
        None => ConfigManager::new(),
    };
    let config = manager.load()?;

    let csv = cli.csv.clone().or_else(|| config.csv_path.clone()).ok_or_else(|| {
        anyhow::anyhow!(
            "No flight log given. Use --csv or set csv_path in {}",
            manager.path().display()
        )
    })?;

    let logbook = Logbook::open(&csv)
        .inspect_err(|e| log::error!("Failed to load {}: {}", csv.display(), e))
        .with_context(|| format!("Could not load flight log {}", csv.display()))?;

    if let YearFilter::Year(year) = &cli.year {
        if !logbook.years().contains(year) {
            log::warn!("No flights logged in {}", year);
        }
    }
    let selection = logbook.select(&cli.year);

    match &cli.command {
        Commands::Stats { top, json } => {
            let stats = selection.stats();
            if *json {
                println!("{}", serde_json::to_string_pretty(&stats)?);
                return Ok(());
            }

            let top = top.unwrap_or(config.top_n);
            let (days, hours) = display::days_hours(stats.total_flight_time);
            let (delay_h, delay_m) = display::hours_minutes(stats.total_delay);

            println!("{}", selection.year());
            println!("  Flights      {}", stats.flight_count);
            println!("  Distance     {} mi", stats.total_distance);
            println!("  Flight Time  {}d {}h", days, hours);
            println!("  Delays       {}h {}m", delay_h, delay_m);
            println!("  Airports     {}", stats.airports.len());
            println!("  Airlines     {}", stats.airlines.len());

            print_ranking("Top Airports", &stats.airports, top);
            print_ranking("Top Airlines", &stats.airlines, top);
            print_ranking("Top Aircraft", &stats.aircraft, top);

            println!();
            println!("Seat Classes");
            for (class, count) in stats.seat_classes.iter() {
                println!(
                    "  {:<4} {:>5}  {}",
                    class,
                    count,
                    display::seat_class_color(class)
                );
            }
        }
        Commands::Table {
            filter,
            sort,
            asc,
            desc,
        } => {
            let state = table_state(filter, *sort, *asc, *desc, &config);

            let rows = selection.view(&state);
            print_table(&rows);
            println!(
                "{} of {} flights, sorted by {} {}",
                rows.len(),
                selection.records().len(),
                state.sort_key,
                if state.ascending { "↑" } else { "↓" }
            );
        }
        Commands::Years => {
            println!("{}", YearFilter::AllTime);
            for year in logbook.years() {
                println!("{}", year);
            }
        }
        Commands::Kml {
            airports,
            output,
            name,
        } => {
            let airports_path = airports
                .clone()
                .or_else(|| config.airports_path.clone())
                .ok_or_else(|| {
                    anyhow::anyhow!("No airport database given. Use --airports or set airports_path")
                })?;
            let directory = AirportDirectory::parse_file(&airports_path).with_context(|| {
                format!("Could not read airport database {}", airports_path.display())
            })?;

            let name = name.clone().unwrap_or_else(|| config.document_name.clone());
            let export = build_kml(&directory, selection.records(), &name);
            let output = output.clone().unwrap_or_else(|| config.kml_output.clone());
            export
                .save(&output)
                .with_context(|| format!("Failed to write {}", output.display()))?;

            println!(
                "Wrote {} routes and {} airports to {}",
                export.routes,
                export.airports,
                output.display()
            );
            if !export.unresolved.is_empty() {
                println!("{} flights skipped (unknown airport):", export.unresolved.len());
                for label in &export.unresolved {
                    println!("  {}", label);
                }
            }
        }
    }

    Ok(())
}

/// `--asc`/`--desc` win; an explicit `--sort` alone starts ascending like a
/// header click; otherwise the configured column and direction apply.
fn table_state(
    filter: &str,
    sort: Option<SortKey>,
    asc: bool,
    desc: bool,
    config: &LogbookConfig,
) -> ViewState {
    let ascending = if asc {
        true
    } else if desc {
        false
    } else if sort.is_some() {
        true
    } else {
        config.default_ascending
    };
    ViewState {
        filter_text: filter.to_string(),
        sort_key: sort.unwrap_or(config.default_sort),
        ascending,
    }
}

fn print_ranking(title: &str, table: &FrequencyTable, top: usize) {
    println!();
    println!("{}", title);
    for (key, count) in table.top(top) {
        println!("  {:<10} {:>5}", key, count);
    }
}

fn print_table(rows: &[&FlightRecord]) {
    println!(
        "{:<9} {:<12} {:<10} {:>8} {:>8} {:>8} {:>16} {:>9}  {:<8} {:<6} {}",
        "Flight",
        "From ‣ To",
        "Date",
        "Depart",
        "Arrive",
        "Duration",
        "Delay",
        "Distance",
        "Aircraft",
        "Type",
        "Seat"
    );
    for record in rows {
        let (delay, status) = display::delay_cell(record);
        let delay = match status {
            DelayStatus::Late => format!("{} {}", delay, status.label()),
            DelayStatus::OnTime => delay,
        };
        let seat = [
            record.seat_number.as_str(),
            record.seat_class.as_str(),
            record.seat_position.as_str(),
        ]
        .iter()
        .filter(|s| !s.is_empty())
        .copied()
        .collect::<Vec<_>>()
        .join(" ");

        println!(
            "{:<9} {:<12} {:<10} {:>8} {:>8} {:>8} {:>16} {:>6} mi  {:<8} {:<6} {}",
            record.airline_flight,
            record.origin_dest,
            record.raw.date,
            record.raw.depart,
            record.raw.arrive,
            display::format_duration_token(&record.raw.time),
            delay,
            record.distance,
            record.raw.tail,
            record.raw.aircraft_type,
            seat
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_table_arguments() {
        let cli = Cli::try_parse_from([
            "flight-logbook",
            "--csv",
            "log.csv",
            "--year",
            "2023",
            "table",
            "--sort",
            "distance",
            "--desc",
        ])
        .unwrap();

        assert_eq!(cli.year, YearFilter::Year("2023".to_string()));
        match cli.command {
            Commands::Table { sort, desc, .. } => {
                assert_eq!(sort, Some(SortKey::Distance));
                assert!(desc);
            }
            _ => panic!("Wrong subcommand"),
        }
    }

    #[test]
    fn test_unknown_sort_key_is_rejected() {
        let result = Cli::try_parse_from(["flight-logbook", "table", "--sort", "altitude"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_table_state_falls_back_to_config() {
        let config = LogbookConfig {
            default_sort: SortKey::Distance,
            default_ascending: true,
            ..LogbookConfig::default()
        };
        let state = table_state("sfo", None, false, false, &config);
        assert_eq!(state.filter_text, "sfo");
        assert_eq!(state.sort_key, SortKey::Distance);
        assert!(state.ascending);

        let state = table_state("", None, false, false, &LogbookConfig::default());
        assert_eq!(state.sort_key, SortKey::Date);
        assert!(!state.ascending);
    }

    #[test]
    fn test_table_state_flags_override_config() {
        let config = LogbookConfig::default();

        let state = table_state("", Some(SortKey::Delay), false, false, &config);
        assert_eq!(state.sort_key, SortKey::Delay);
        assert!(state.ascending);

        let state = table_state("", Some(SortKey::Delay), false, true, &config);
        assert!(!state.ascending);

        let state = table_state("", None, true, false, &config);
        assert_eq!(state.sort_key, SortKey::Date);
        assert!(state.ascending);
    }
}
