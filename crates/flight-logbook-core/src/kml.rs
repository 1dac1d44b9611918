// SPDX-License-Identifier: MIT
// Copyright (c) 2026 StarTuz

//! Route map export: airports as points and each leg as a straight
//! `LineString` between its two airports.

use crate::record::FlightRecord;
use html_escape::encode_text;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;
use thiserror::Error;

const AIRPORT_ICON: &str = "https://maps.google.com/mapfiles/kml/paddle/blu-blank-lv.png";
/// Light steel blue in KML's aabbggrr order.
const ROUTE_COLOR: &str = "ffdec4b0";
const ROUTE_WIDTH: u32 = 4;

#[derive(Error, Debug)]
pub enum AirportDbError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
    #[error("Airport database is missing the {0} column")]
    MissingColumn(&'static str),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AirportInfo {
    pub iata: String,
    pub name: String,
    pub city: String,
    pub lat: f64,
    pub lon: f64,
}

#[derive(Debug, Clone, Default)]
pub struct AirportDirectory {
    airports: Vec<AirportInfo>,
}

impl AirportDirectory {
    pub fn new(airports: Vec<AirportInfo>) -> Self {
        Self { airports }
    }

    pub fn parse_file<P: AsRef<Path>>(path: P) -> Result<Self, AirportDbError> {
        let file = File::open(path)?;
        Self::parse(BufReader::new(file))
    }

    /// Reads a colon-delimited database with a header row naming at least
    /// `IATA`, `LATITUDE` and `LONGITUDE`. Rows without usable coordinates are skipped.
    pub fn parse<R: Read>(reader: R) -> Result<Self, AirportDbError> {
        let mut rdr = csv::ReaderBuilder::new()
            .delimiter(b':')
            .flexible(true)
            .from_reader(reader);

        let headers = rdr.headers()?.clone();
        let column = |name: &'static str| {
            headers
                .iter()
                .position(|h| h.trim() == name)
                .ok_or(AirportDbError::MissingColumn(name))
        };
        let iata_idx = column("IATA")?;
        let lat_idx = column("LATITUDE")?;
        let lon_idx = column("LONGITUDE")?;
        let name_idx = column("NAME").ok();
        let city_idx = column("CITY").ok();

        let mut airports = Vec::new();
        for (line, result) in rdr.records().enumerate() {
            let record = match result {
                Ok(record) => record,
                Err(e) => {
                    log::warn!("Skipping airport row {}: {}", line + 2, e);
                    continue;
                }
            };
            let field = |idx: Option<usize>| {
                idx.and_then(|i| record.get(i))
                    .map(|s| s.trim().to_string())
                    .unwrap_or_default()
            };

            let coords = (
                field(Some(lat_idx)).parse::<f64>(),
                field(Some(lon_idx)).parse::<f64>(),
            );
            let (lat, lon) = match coords {
                (Ok(lat), Ok(lon)) => (lat, lon),
                _ => {
                    log::warn!(
                        "Skipping airport row {}: unreadable coordinates for '{}'",
                        line + 2,
                        field(Some(iata_idx))
                    );
                    continue;
                }
            };

            airports.push(AirportInfo {
                iata: field(Some(iata_idx)),
                name: field(name_idx),
                city: field(city_idx),
                lat,
                lon,
            });
        }

        log::debug!("Airport database holds {} entries", airports.len());
        Ok(Self { airports })
    }

    /// First entry for `iata` with a real position (latitude other than 0).
    pub fn lookup(&self, iata: &str) -> Option<&AirportInfo> {
        self.airports
            .iter()
            .find(|a| a.iata == iata && a.lat != 0.0)
    }

    pub fn len(&self) -> usize {
        self.airports.len()
    }

    pub fn is_empty(&self) -> bool {
        self.airports.is_empty()
    }
}

#[derive(Debug, Clone)]
pub struct KmlExport {
    pub document: String,
    pub routes: usize,
    pub airports: usize,
    /// Legs left off the map because an airport was not in the directory.
    pub unresolved: Vec<String>,
}

impl KmlExport {
    pub fn save<P: AsRef<Path>>(&self, path: P) -> std::io::Result<()> {
        std::fs::write(path, &self.document)
    }
}

pub fn build_kml(
    directory: &AirportDirectory,
    records: &[FlightRecord],
    document_name: &str,
) -> KmlExport {
    let mut routes = String::new();
    let mut route_count = 0;
    let mut airport_points = String::new();
    let mut placed: HashSet<&str> = HashSet::new();
    let mut unresolved = Vec::new();

    for record in records {
        let origin = directory.lookup(&record.raw.origin);
        let dest = directory.lookup(&record.raw.destination);
        let (origin, dest) = match (origin, dest) {
            (Some(o), Some(d)) => (o, d),
            _ => {
                let label = format!("{} [{}]", record.origin_dest, record.raw.date);
                log::warn!("No coordinates for {}; leaving it off the map", label);
                unresolved.push(label);
                continue;
            }
        };

        routes.push_str(&route_placemark(record, origin, dest));
        route_count += 1;

        for airport in [origin, dest] {
            if placed.insert(airport.iata.as_str()) {
                airport_points.push_str(&airport_placemark(airport));
            }
        }
    }

    let mut document = String::new();
    document.push_str("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n");
    document.push_str("<kml xmlns=\"http://www.opengis.net/kml/2.2\">\n");
    document.push_str("<Document>\n");
    document.push_str(&format!("  <name>{}</name>\n", encode_text(document_name)));
    document.push_str(&format!(
        "  <Style id=\"airport\">\n    <IconStyle>\n      <scale>0.5</scale>\n      <Icon><href>{}</href></Icon>\n    </IconStyle>\n    <LabelStyle><scale>0</scale></LabelStyle>\n  </Style>\n",
        AIRPORT_ICON
    ));
    document.push_str(&format!(
        "  <Style id=\"route\">\n    <LineStyle>\n      <color>{}</color>\n      <width>{}</width>\n    </LineStyle>\n  </Style>\n",
        ROUTE_COLOR, ROUTE_WIDTH
    ));
    document.push_str("  <Folder>\n    <name>Airports</name>\n");
    document.push_str(&airport_points);
    document.push_str("  </Folder>\n");
    document.push_str(&routes);
    document.push_str("</Document>\n</kml>\n");

    KmlExport {
        document,
        routes: route_count,
        airports: placed.len(),
        unresolved,
    }
}

fn airport_placemark(airport: &AirportInfo) -> String {
    format!(
        "    <Placemark>\n      <name>{}</name>\n      <styleUrl>#airport</styleUrl>\n      <Point><coordinates>{},{},0</coordinates></Point>\n    </Placemark>\n",
        encode_text(&airport.iata),
        airport.lon,
        airport.lat
    )
}

fn route_placemark(record: &FlightRecord, origin: &AirportInfo, dest: &AirportInfo) -> String {
    let raw = &record.raw;
    let name = format!("{} ‣ {} [{}]", origin.iata, dest.iata, raw.date);
    let description = format!(
        "<img src=\"https://content.airhex.com/content/logos/airlines_{}_15_15_s.png\"> \
         <b>{}</b> - {}<br>{} to {}<hr>\
         🛫 {} - {}<br>🛬 {} - {}<br>⏱️ {}<br>🌎 {}<br>✈️ {} ({})",
        raw.airline,
        record.airline_flight,
        raw.date,
        origin.city,
        dest.city,
        origin.name,
        raw.depart,
        dest.name,
        raw.arrive,
        raw.time,
        raw.distance,
        raw.tail,
        raw.aircraft_type
    );
    format!(
        "  <Placemark>\n    <name>{}</name>\n    <description>{}</description>\n    <styleUrl>#route</styleUrl>\n    <LineString>\n      <coordinates>{},{},0 {},{},0</coordinates>\n    </LineString>\n  </Placemark>\n",
        encode_text(&name),
        encode_text(&description),
        origin.lon,
        origin.lat,
        dest.lon,
        dest.lat
    )
}
