use crate::error::PipelineError;
use crate::normalize::{decode_list_literal, decode_timestamp, trim_name};
use crate::types::{
    AssessmentRecord, FireSummaryTable, RawAssessmentRow, RawIncident, RawIncidentRow,
};
use crate::util::parse_f64_safe;
use csv::{ReaderBuilder, StringRecord};
use std::fs::File;
use std::io::Read;
use std::path::Path;

pub const ASSESSMENTS: &str = "assessment table";
pub const FIRE_SUMMARY: &str = "fire summary table";
pub const INCIDENTS: &str = "incident table";

const ASSESSMENT_COLUMNS: &[&str] = &["County", "NetTotal"];
const INCIDENT_COLUMNS: &[&str] = &[
    "Name",
    "Started",
    "Counties",
    "AcresBurned",
    "StructuresDestroyed",
    "StructuresDamaged",
];

#[derive(Debug, Clone, Default)]
pub struct AssessmentLoad {
    pub records: Vec<AssessmentRecord>,
    pub total_rows: usize,
    pub skipped_rows: usize,
}

#[derive(Debug, Clone, Default)]
pub struct IncidentLoad {
    pub incidents: Vec<RawIncident>,
    /// Both `Latitude` and `Longitude` columns are present.
    pub has_coordinates: bool,
}

fn csv_reader<R: Read>(reader: R) -> csv::Reader<R> {
    ReaderBuilder::new().flexible(true).trim(csv::Trim::Headers).from_reader(reader)
}

fn require_columns(
    source_name: &str,
    headers: &StringRecord,
    required: &[&str],
) -> Result<(), PipelineError> {
    for column in required {
        if !headers.iter().any(|h| h == *column) {
            return Err(PipelineError::missing_column(source_name, column));
        }
    }
    Ok(())
}

fn open(source_name: &str, path: &Path) -> Result<File, PipelineError> {
    File::open(path).map_err(|e| PipelineError::load(source_name, &path.display().to_string(), e))
}

/// Tag read errors from a path-based load with the source and path they came
/// from. `Load` and `MissingColumn` already name their source and pass through.
fn with_source<T>(
    source_name: &str,
    path: &Path,
    result: Result<T, PipelineError>,
) -> Result<T, PipelineError> {
    result.map_err(|e| match e {
        e @ (PipelineError::Load { .. } | PipelineError::MissingColumn { .. }) => e,
        e => PipelineError::load(source_name, &path.display().to_string(), e),
    })
}

/// Data rows as text. Invalid UTF-8 inside a cell is replaced rather than
/// failing the whole table.
fn lossy_records<R: Read>(
    rdr: &mut csv::Reader<R>,
) -> impl Iterator<Item = Result<StringRecord, csv::Error>> + '_ {
    rdr.byte_records()
        .map(|r| r.map(StringRecord::from_byte_record_lossy))
}

/// Read assessment rows. Rows without a county or with a non-numeric
/// `NetTotal` are counted and skipped.
pub fn load_assessments<R: Read>(reader: R) -> Result<AssessmentLoad, PipelineError> {
    let mut rdr = csv_reader(reader);
    let headers = rdr.headers()?.clone();
    require_columns(ASSESSMENTS, &headers, ASSESSMENT_COLUMNS)?;

    let mut load = AssessmentLoad::default();
    for record in lossy_records(&mut rdr) {
        load.total_rows += 1;
        let row = match record?.deserialize::<RawAssessmentRow>(Some(&headers)) {
            Ok(row) => row,
            Err(e) => {
                log::debug!("skipping assessment row {}: {e}", load.total_rows);
                load.skipped_rows += 1;
                continue;
            }
        };
        let county = row.county.unwrap_or_default();
        let net_total = parse_f64_safe(row.net_total.as_deref());
        match net_total {
            Some(net_total) if !county.is_empty() => {
                load.records.push(AssessmentRecord { county, net_total });
            }
            _ => {
                log::debug!("skipping assessment row {}: county={county:?}", load.total_rows);
                load.skipped_rows += 1;
            }
        }
    }
    Ok(load)
}

pub fn load_assessments_from_path(path: &Path) -> Result<AssessmentLoad, PipelineError> {
    let file = open(ASSESSMENTS, path)?;
    with_source(ASSESSMENTS, path, load_assessments(file))
}

/// Read the fire summary table without interpreting its columns.
pub fn load_fire_summary<R: Read>(reader: R) -> Result<FireSummaryTable, PipelineError> {
    let mut rdr = csv_reader(reader);
    let columns = rdr.headers()?.iter().map(str::to_string).collect();
    let mut rows = 0usize;
    for record in rdr.byte_records() {
        record?;
        rows += 1;
    }
    Ok(FireSummaryTable { columns, rows })
}

pub fn load_fire_summary_from_path(path: &Path) -> Result<FireSummaryTable, PipelineError> {
    let file = open(FIRE_SUMMARY, path)?;
    with_source(FIRE_SUMMARY, path, load_fire_summary(file))
}

/// Read and normalize incident rows. No row is dropped: malformed cells
/// become missing values.
pub fn load_incidents<R: Read>(reader: R) -> Result<IncidentLoad, PipelineError> {
    let mut rdr = csv_reader(reader);
    let headers = rdr.headers()?.clone();
    require_columns(INCIDENTS, &headers, INCIDENT_COLUMNS)?;
    let has_coordinates = ["Latitude", "Longitude"]
        .iter()
        .all(|c| headers.iter().any(|h| h == *c));

    let mut incidents = Vec::new();
    for record in lossy_records(&mut rdr) {
        let row = record?
            .deserialize::<RawIncidentRow>(Some(&headers))
            .unwrap_or_else(|e| {
                let row_no = incidents.len() + 1;
                log::debug!("incident row {row_no} unreadable, keeping it empty: {e}");
                RawIncidentRow::default()
            });
        incidents.push(normalize_row(row));
    }
    Ok(IncidentLoad {
        incidents,
        has_coordinates,
    })
}

pub fn load_incidents_from_path(path: &Path) -> Result<IncidentLoad, PipelineError> {
    let file = open(INCIDENTS, path)?;
    with_source(INCIDENTS, path, load_incidents(file))
}

fn normalize_row(row: RawIncidentRow) -> RawIncident {
    RawIncident {
        name: trim_name(row.name.as_deref().unwrap_or_default()),
        started: decode_timestamp(row.started.as_deref()),
        counties: decode_list_literal(row.counties.as_deref()),
        acres_burned: parse_f64_safe(row.acres_burned.as_deref()).unwrap_or(0.0),
        structures_destroyed: parse_f64_safe(row.structures_destroyed.as_deref()),
        structures_damaged: parse_f64_safe(row.structures_damaged.as_deref()),
        latitude: parse_f64_safe(row.latitude.as_deref()),
        longitude: parse_f64_safe(row.longitude.as_deref()),
        updated: decode_timestamp(row.updated.as_deref()),
        extinguished: decode_timestamp(row.extinguished_date.as_deref()),
        extinguished_date_only: decode_timestamp(row.extinguished_date_only.as_deref()),
        started_date_only: decode_timestamp(row.started_date_only.as_deref()),
        expected_containment: decode_timestamp(row.expected_containment.as_deref()),
    }
}
