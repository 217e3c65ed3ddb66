//! City data files.
//!
//! The text format is one city per line: `longitude latitude [name]`,
//! whitespace separated. Lines starting with `#` and blank lines are
//! ignored; lines whose first two fields are not finite numbers are skipped
//! with a warning. The solver itself never touches files; this module only feeds
//! it coordinates and writes its tours back out.

use crate::error::Result;
use crate::geo::{Coordinate, DistanceMatrix};
use crate::tour::Tour;
use log::warn;
use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;

/// Header line written before a route.
pub const ROUTE_HEADER: &str = "#longitude   latitude    City";

/// Coordinates with parallel display names.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Cities {
    pub coords: Vec<Coordinate>,
    /// One entry per coordinate; empty when the line had no name.
    pub names: Vec<String>,
}

impl Cities {
    pub fn len(&self) -> usize {
        self.coords.len()
    }

    pub fn is_empty(&self) -> bool {
        self.coords.is_empty()
    }

    pub fn push(&mut self, coord: Coordinate, name: impl Into<String>) {
        self.coords.push(coord);
        self.names.push(name.into());
    }

    /// Pairwise distances between all cities.
    pub fn distance_matrix(&self) -> DistanceMatrix {
        DistanceMatrix::from_coordinates(&self.coords)
    }

    /// City names in tour order, closing back at the start.
    pub fn names_along<'a>(&'a self, tour: &Tour) -> Result<Vec<&'a str>> {
        tour.ensure_len(self.len())?;
        Ok(tour
            .closed()
            .iter()
            .map(|&i| self.names[i].as_str())
            .collect())
    }
}

/// Splits off the first whitespace-delimited field.
fn split_field(s: &str) -> Option<(&str, &str)> {
    let s = s.trim_start();
    if s.is_empty() {
        return None;
    }
    let end = s.find(char::is_whitespace).unwrap_or(s.len());
    Some((&s[..end], &s[end..]))
}

fn parse_line(line: &str) -> Option<(Coordinate, String)> {
    let (lon, rest) = split_field(line)?;
    let (lat, rest) = split_field(rest)?;
    let lon: f64 = lon.parse().ok()?;
    let lat: f64 = lat.parse().ok()?;
    if !(lon.is_finite() && lat.is_finite()) {
        return None;
    }
    Some((Coordinate::from_lon_lat(lon, lat), rest.trim().to_string()))
}

/// Reads cities from `reader`.
pub fn read_cities<R: BufRead>(reader: R) -> Result<Cities> {
    let mut cities = Cities::default();
    for (lineno, line) in reader.lines().enumerate() {
        let line = line?;
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }
        match parse_line(trimmed) {
            Some((coord, name)) => cities.push(coord, name),
            None => warn!("skipping malformed line {}: {trimmed}", lineno + 1),
        }
    }
    Ok(cities)
}

/// Reads cities from the file at `path`.
pub fn load_cities(path: impl AsRef<Path>) -> Result<Cities> {
    let file = File::open(path.as_ref())?;
    read_cities(BufReader::new(file))
}

/// Writes `tour` as one `lon\tlat\tname` line per city, two decimals,
/// without repeating the start city at the end.
pub fn write_route<W: Write>(mut writer: W, tour: &Tour, cities: &Cities) -> Result<()> {
    tour.ensure_len(cities.len())?;
    writeln!(writer, "{ROUTE_HEADER}")?;
    for &i in tour.as_slice() {
        let c = &cities.coords[i];
        writeln!(writer, "{:.2}\t{:.2}\t{}", c.lon, c.lat, cities.names[i])?;
    }
    writer.flush()?;
    Ok(())
}

/// Writes `tour` to the file at `path`, replacing it.
pub fn save_route(path: impl AsRef<Path>, tour: &Tour, cities: &Cities) -> Result<()> {
    let file = File::create(path.as_ref())?;
    write_route(BufWriter::new(file), tour, cities)
}
