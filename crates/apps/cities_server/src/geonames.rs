//! GeoNames `cities*.txt` dumps: one tab-separated row per place.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use crate::quadtree::City;

const COL_ID: usize = 0;
const COL_NAME: usize = 1;
const COL_LAT: usize = 4;
const COL_LON: usize = 5;
const COL_POPULATION: usize = 14;
const COL_ELEVATION: usize = 16;

#[derive(Debug)]
pub enum GeoNamesError {
    Io(std::io::Error),
    Parse { line: usize, reason: String },
}

impl std::fmt::Display for GeoNamesError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GeoNamesError::Io(err) => write!(f, "failed to read cities: {err}"),
            GeoNamesError::Parse { line, reason } => write!(f, "line {line}: {reason}"),
        }
    }
}

impl std::error::Error for GeoNamesError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            GeoNamesError::Io(err) => Some(err),
            GeoNamesError::Parse { .. } => None,
        }
    }
}

impl From<std::io::Error> for GeoNamesError {
    fn from(err: std::io::Error) -> Self {
        GeoNamesError::Io(err)
    }
}

pub fn load_cities(path: &Path) -> Result<Vec<City>, GeoNamesError> {
    let file = File::open(path)?;
    read_cities(BufReader::new(file))
}

/// Blank lines are skipped; an empty elevation reads as 0.
pub fn read_cities<R: BufRead>(reader: R) -> Result<Vec<City>, GeoNamesError> {
    let mut cities = Vec::new();
    for (idx, line) in reader.lines().enumerate() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        cities.push(parse_row(&line).map_err(|reason| GeoNamesError::Parse {
            line: idx + 1,
            reason,
        })?);
    }
    Ok(cities)
}

fn parse_row(line: &str) -> Result<City, String> {
    let cols: Vec<&str> = line.split('\t').collect();
    let col = |i: usize| {
        cols.get(i)
            .copied()
            .map(str::trim)
            .ok_or_else(|| format!("missing column {i}"))
    };
    let number = |i: usize| -> Result<f64, String> {
        let raw = col(i)?;
        raw.parse::<f64>()
            .map_err(|_| format!("column {i}: not a number: {raw:?}"))
    };

    let id_raw = col(COL_ID)?;
    let id = id_raw
        .parse::<u64>()
        .map_err(|_| format!("column {COL_ID}: bad id {id_raw:?}"))?;
    let population_raw = col(COL_POPULATION)?;
    let population = population_raw
        .parse::<u64>()
        .map_err(|_| format!("column {COL_POPULATION}: bad population {population_raw:?}"))?;
    let elevation_raw = col(COL_ELEVATION)?;
    let elevation = if elevation_raw.is_empty() {
        0
    } else {
        elevation_raw
            .parse::<i64>()
            .map_err(|_| format!("column {COL_ELEVATION}: bad elevation {elevation_raw:?}"))?
    };

    Ok(City {
        id,
        name: col(COL_NAME)?.to_string(),
        position: [number(COL_LON)?, number(COL_LAT)?],
        population,
        elevation,
    })
}

#[cfg(test)]
mod tests {
    use super::{GeoNamesError, read_cities};
    use pretty_assertions::assert_eq;

    const BERLIN: &str = "2950159\tBerlin\tBerlin\tBER,Berlin\t52.52437\t13.41053\tP\tPPLC\tDE\t\t16\t00\t11000\t11000000\t3426354\t\t74\tEurope/Berlin\t2022-03-09";
    const TROMSO: &str = "3133880\tTromsø\tTromso\t\t69.6489\t18.95508\tP\tPPLA\tNO\t\t54\t5401\t\t\t38980\t\t\tEurope/Oslo\t2023-01-03";

    #[test]
    fn reads_geonames_rows() {
        let input = format!("{BERLIN}\n\n{TROMSO}\n");
        let cities = read_cities(input.as_bytes()).expect("parse");
        assert_eq!(cities.len(), 2);

        let berlin = &cities[0];
        assert_eq!(berlin.id, 2950159);
        assert_eq!(berlin.name, "Berlin");
        assert_eq!(berlin.position, [13.41053, 52.52437]);
        assert_eq!(berlin.population, 3426354);
        assert_eq!(berlin.elevation, 74);

        assert_eq!(cities[1].name, "Tromsø");
        assert_eq!(cities[1].elevation, 0);
    }

    #[test]
    fn reports_the_failing_line() {
        let input = format!("{BERLIN}\nnot-a-city\tX\n");
        let err = read_cities(input.as_bytes()).unwrap_err();
        match err {
            GeoNamesError::Parse { line, reason } => {
                assert_eq!(line, 2);
                assert_eq!(reason, "column 0: bad id \"not-a-city\"");
            }
            other => panic!("unexpected error: {other}"),
        }
    }
}
