//! CSV scenario loader.
//!
//! # CSV format
//!
//! One row per entity present when the run starts.  Destination and
//! magnitude are only meaningful for parcels; magnitude defaults to 1.
//!
//! ```csv
//! kind,x,y,dest_x,dest_y,magnitude
//! vehicle,0.0,0.0,,,
//! parcel,5.0,0.0,5.0,5.0,2
//! ```

use std::io::Read;
use std::path::Path;

use pd_core::Point;
use serde::Deserialize;

use crate::{ConfigError, ConfigResult};

#[derive(Copy, Clone, PartialEq, Eq, Debug, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScenarioKind {
    Vehicle,
    Parcel,
}

/// One parsed scenario row.
#[derive(Copy, Clone, PartialEq, Debug)]
pub struct ScenarioRow {
    pub kind:        ScenarioKind,
    pub start:       Point,
    /// `Some` for parcels only.
    pub destination: Option<Point>,
    pub magnitude:   f64,
}

// ── CSV record ────────────────────────────────────────────────────────────────

#[derive(Deserialize)]
struct ScenarioRecord {
    kind:      ScenarioKind,
    x:         f64,
    y:         f64,
    dest_x:    Option<f64>,
    dest_y:    Option<f64>,
    magnitude: Option<f64>,
}

// ── Public API ────────────────────────────────────────────────────────────────

/// Load scenario rows from a CSV file.
pub fn load_scenario_csv(path: &Path) -> ConfigResult<Vec<ScenarioRow>> {
    let file = std::fs::File::open(path)?;
    load_scenario_reader(file)
}

/// Like [`load_scenario_csv`] but accepts any `Read` source.
pub fn load_scenario_reader<R: Read>(reader: R) -> ConfigResult<Vec<ScenarioRow>> {
    let mut csv_reader = csv::Reader::from_reader(reader);
    let mut rows = Vec::new();

    for (i, result) in csv_reader.deserialize::<ScenarioRecord>().enumerate() {
        let rec = result?;
        let row = i + 1;
        let destination = match (rec.kind, rec.dest_x, rec.dest_y) {
            (ScenarioKind::Vehicle, _, _) => None,
            (ScenarioKind::Parcel, Some(x), Some(y)) => Some(Point::new(x, y)),
            (ScenarioKind::Parcel, _, _) => {
                return Err(ConfigError::Scenario { row, reason: "parcel needs dest_x and dest_y".into() });
            }
        };
        let magnitude = rec.magnitude.unwrap_or(1.0);
        if !(magnitude.is_finite() && magnitude >= 0.0) {
            return Err(ConfigError::Scenario { row, reason: format!("invalid magnitude {magnitude}") });
        }
        rows.push(ScenarioRow { kind: rec.kind, start: Point::new(rec.x, rec.y), destination, magnitude });
    }

    Ok(rows)
}
